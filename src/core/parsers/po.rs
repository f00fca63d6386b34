//! Reader and writer for the line-oriented persisted catalog form (gettext PO).
//!
//! The writer never emits timestamps, so saving the same catalog twice
//! produces byte-identical output.

use indexmap::IndexMap;

use crate::core::{
    catalog::Catalog,
    data::{Location, Message},
    error::{CatalogError, Result},
};

/// Ordered `Key: Value` pairs of the header entry (`msgid ""`).
pub type HeaderFields = IndexMap<String, String>;

const GENERATED_BY: &str = concat!("podcat ", env!("CARGO_PKG_VERSION"));

/// Isolation marks around location paths that contain whitespace.
const LOCATION_OPEN: char = '\u{2068}';
const LOCATION_CLOSE: char = '\u{2069}';

/// How entries are ordered in the written file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Alphabetical by message id (then context).
    #[default]
    ById,
    /// By first source location, then id.
    ByFile,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct WriteOptions {
    pub include_header: bool,
    pub include_obsolete: bool,
    pub sort: SortOrder,
}

/// Result of parsing a persisted catalog.
#[derive(Debug, Default)]
pub struct ParsedPo {
    pub header: HeaderFields,
    pub messages: Vec<Message>,
}

// ============================================================
// Reading
// ============================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Context,
    Id,
    Str,
}

#[derive(Debug, Default)]
struct EntryBuilder {
    id_line: usize,
    user_comments: Vec<String>,
    auto_comments: Vec<String>,
    locations: Vec<Location>,
    flags: Vec<String>,
    context: Option<String>,
    id: Option<String>,
    string: Option<String>,
    obsolete: bool,
    last: Option<Field>,
}

impl EntryBuilder {
    fn has_keyword(&self) -> bool {
        self.last.is_some()
    }

    fn is_complete(&self) -> bool {
        self.last == Some(Field::Str)
    }

    fn append(&mut self, text: &str) {
        let target = match self.last {
            Some(Field::Context) => self.context.as_mut(),
            Some(Field::Id) => self.id.as_mut(),
            Some(Field::Str) => self.string.as_mut(),
            None => None,
        };
        if let Some(target) = target {
            target.push_str(text);
        }
    }
}

/// Parses persisted catalog text. `path` is only used in error messages.
pub fn parse_po(content: &str, path: &str) -> Result<ParsedPo> {
    let mut parsed = ParsedPo::default();
    let mut header_seen = false;
    let mut entry = EntryBuilder::default();

    for (index, raw_line) in content.lines().enumerate() {
        let line_no = index + 1;
        let line = raw_line.trim();

        if line.is_empty() {
            if entry.has_keyword() {
                finish_entry(&mut entry, &mut parsed, &mut header_seen, path)?;
            }
            continue;
        }

        if let Some(rest) = line.strip_prefix("#~") {
            let rest = rest.trim_start();
            if rest.is_empty() || rest.starts_with('#') {
                continue;
            }
            parse_keyword_line(rest, true, line_no, &mut entry, &mut parsed, &mut header_seen, path)?;
            continue;
        }

        if line.starts_with('#') {
            if entry.is_complete() {
                finish_entry(&mut entry, &mut parsed, &mut header_seen, path)?;
            }
            parse_comment_line(line, &mut entry);
            continue;
        }

        parse_keyword_line(line, false, line_no, &mut entry, &mut parsed, &mut header_seen, path)?;
    }

    if entry.has_keyword() {
        finish_entry(&mut entry, &mut parsed, &mut header_seen, path)?;
    }

    Ok(parsed)
}

fn parse_comment_line(line: &str, entry: &mut EntryBuilder) {
    if let Some(rest) = line.strip_prefix("#.") {
        entry.auto_comments.push(strip_one_space(rest).to_string());
    } else if let Some(rest) = line.strip_prefix("#:") {
        entry.locations.extend(split_locations(rest).map(parse_location));
    } else if let Some(rest) = line.strip_prefix("#,") {
        entry.flags.extend(
            rest.split(',')
                .map(str::trim)
                .filter(|flag| !flag.is_empty())
                .map(String::from),
        );
    } else if line.starts_with("#|") {
        // previous msgid, not tracked
    } else if let Some(rest) = line.strip_prefix('#') {
        entry.user_comments.push(strip_one_space(rest).to_string());
    }
}

fn strip_one_space(text: &str) -> &str {
    text.strip_prefix(' ').unwrap_or(text)
}

/// Splits a `#:` line into location tokens. Paths containing whitespace are
/// wrapped in U+2068 .. U+2069, as GNU gettext writes them.
fn split_locations(rest: &str) -> impl Iterator<Item = &str> {
    let mut remaining = rest;
    std::iter::from_fn(move || {
        remaining = remaining.trim_start();
        if remaining.is_empty() {
            return None;
        }
        if let Some(isolated) = remaining.strip_prefix(LOCATION_OPEN)
            && let Some(close) = isolated.find(LOCATION_CLOSE)
        {
            let end = close + LOCATION_CLOSE.len_utf8();
            let token_end = isolated[end..]
                .find(char::is_whitespace)
                .map_or(isolated.len(), |i| end + i);
            let token = &isolated[..token_end];
            remaining = &isolated[token_end..];
            return Some(token);
        }
        let end = remaining.find(char::is_whitespace).unwrap_or(remaining.len());
        let token = &remaining[..end];
        remaining = &remaining[end..];
        Some(token)
    })
}

fn parse_location(token: &str) -> Location {
    if let Some((path, line)) = token.split_once(LOCATION_CLOSE) {
        let line = line
            .strip_prefix(':')
            .and_then(|line| line.parse::<usize>().ok())
            .unwrap_or(0);
        return Location::new(path, line);
    }
    match token.rsplit_once(':') {
        Some((path, line)) if !path.is_empty() => match line.parse::<usize>() {
            Ok(line) => Location::new(path, line),
            Err(_) => Location::new(token, 0),
        },
        _ => Location::new(token, 0),
    }
}

fn parse_keyword_line(
    line: &str,
    obsolete: bool,
    line_no: usize,
    entry: &mut EntryBuilder,
    parsed: &mut ParsedPo,
    header_seen: &mut bool,
    path: &str,
) -> Result<()> {
    if line.starts_with('"') {
        if entry.last.is_none() {
            return Err(CatalogError::parse(
                path,
                line_no,
                "continuation line without a preceding keyword",
            ));
        }
        let text = parse_quoted(line, path, line_no)?;
        entry.append(&text);
        return Ok(());
    }

    let (keyword, rest) = match line.split_once(char::is_whitespace) {
        Some((keyword, rest)) => (keyword, rest.trim()),
        None => (line, ""),
    };

    match keyword {
        "msgctxt" => {
            if entry.is_complete() {
                finish_entry(entry, parsed, header_seen, path)?;
            }
            if entry.id.is_some() {
                return Err(CatalogError::parse(path, line_no, "msgctxt after msgid"));
            }
            entry.context = Some(parse_quoted(rest, path, line_no)?);
            entry.obsolete |= obsolete;
            entry.last = Some(Field::Context);
        }
        "msgid" => {
            if entry.is_complete() {
                finish_entry(entry, parsed, header_seen, path)?;
            }
            if entry.id.is_some() {
                return Err(CatalogError::parse(path, line_no, "duplicate msgid"));
            }
            entry.id = Some(parse_quoted(rest, path, line_no)?);
            entry.id_line = line_no;
            entry.obsolete |= obsolete;
            entry.last = Some(Field::Id);
        }
        "msgstr" => {
            if entry.id.is_none() {
                return Err(CatalogError::parse(path, line_no, "msgstr without msgid"));
            }
            if entry.string.is_some() {
                return Err(CatalogError::parse(path, line_no, "duplicate msgstr"));
            }
            entry.string = Some(parse_quoted(rest, path, line_no)?);
            entry.last = Some(Field::Str);
        }
        "msgid_plural" => {
            return Err(CatalogError::parse(
                path,
                line_no,
                "plural forms are not supported",
            ));
        }
        _ if keyword.starts_with("msgstr[") => {
            return Err(CatalogError::parse(
                path,
                line_no,
                "plural forms are not supported",
            ));
        }
        _ => {
            return Err(CatalogError::parse(
                path,
                line_no,
                format!("unknown keyword: {}", keyword),
            ));
        }
    }
    Ok(())
}

fn finish_entry(
    entry: &mut EntryBuilder,
    parsed: &mut ParsedPo,
    header_seen: &mut bool,
    path: &str,
) -> Result<()> {
    let builder = std::mem::take(entry);
    let Some(id) = builder.id else {
        return Err(CatalogError::parse(
            path,
            builder.id_line,
            "msgctxt without msgid",
        ));
    };
    let Some(string) = builder.string else {
        return Err(CatalogError::parse(
            path,
            builder.id_line,
            "entry is missing msgstr",
        ));
    };

    if id.is_empty() && builder.context.is_none() && !builder.obsolete && !*header_seen {
        *header_seen = true;
        parsed.header = parse_header_fields(&string);
        return Ok(());
    }

    parsed.messages.push(Message {
        id,
        string: (!string.is_empty()).then_some(string),
        locations: builder.locations,
        auto_comments: builder.auto_comments,
        user_comments: builder.user_comments,
        context: builder.context,
        flags: builder.flags.into_iter().collect(),
        obsolete: builder.obsolete,
    });
    Ok(())
}

fn parse_header_fields(text: &str) -> HeaderFields {
    text.lines()
        .filter_map(|line| line.split_once(':'))
        .map(|(key, value)| (key.trim().to_string(), value.trim().to_string()))
        .collect()
}

/// Parses a `"..."` literal, resolving backslash escapes.
fn parse_quoted(text: &str, path: &str, line_no: usize) -> Result<String> {
    let inner = text
        .strip_prefix('"')
        .and_then(|t| t.strip_suffix('"'))
        .filter(|_| text.len() >= 2)
        .ok_or_else(|| CatalogError::parse(path, line_no, "expected a quoted string"))?;

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                let escaped = match chars.next() {
                    Some('n') => '\n',
                    Some('t') => '\t',
                    Some('r') => '\r',
                    Some('"') => '"',
                    Some('\\') => '\\',
                    Some(other) => {
                        return Err(CatalogError::parse(
                            path,
                            line_no,
                            format!("invalid escape sequence: \\{}", other),
                        ));
                    }
                    None => {
                        return Err(CatalogError::parse(
                            path,
                            line_no,
                            "unterminated escape sequence",
                        ));
                    }
                };
                out.push(escaped);
            }
            '"' => {
                return Err(CatalogError::parse(
                    path,
                    line_no,
                    "unescaped quote inside string",
                ));
            }
            _ => out.push(c),
        }
    }
    Ok(out)
}

// ============================================================
// Writing
// ============================================================

/// Serializes a catalog to persisted text.
pub fn write_po(catalog: &Catalog, options: &WriteOptions) -> String {
    let mut blocks: Vec<String> = Vec::new();

    if options.include_header {
        blocks.push(render_header(catalog));
    }

    let mut active: Vec<&Message> = catalog.iter().filter(|m| !m.obsolete).collect();
    match options.sort {
        SortOrder::ById => active.sort_by(|a, b| (&a.id, &a.context).cmp(&(&b.id, &b.context))),
        SortOrder::ByFile => active.sort_by(|a, b| {
            (&a.locations, &a.id, &a.context).cmp(&(&b.locations, &b.id, &b.context))
        }),
    }
    blocks.extend(active.into_iter().map(|m| render_message(m, "")));

    if options.include_obsolete {
        let mut obsolete: Vec<&Message> = catalog.iter().filter(|m| m.obsolete).collect();
        obsolete.sort_by(|a, b| (&a.id, &a.context).cmp(&(&b.id, &b.context)));
        blocks.extend(obsolete.into_iter().map(|m| render_message(m, "#~ ")));
    }

    blocks.join("\n")
}

fn render_header(catalog: &Catalog) -> String {
    let mut fields = HeaderFields::new();
    fields.insert("Project-Id-Version".into(), "PROJECT VERSION".into());
    for (key, value) in catalog.header() {
        fields.insert(key.clone(), value.clone());
    }
    match catalog.locale() {
        Some(locale) => {
            fields.insert("Language".into(), locale.to_string());
        }
        None => {
            fields.shift_remove("Language");
        }
    }
    fields.insert("MIME-Version".into(), "1.0".into());
    fields.insert(
        "Content-Type".into(),
        "text/plain; charset=utf-8".into(),
    );
    fields.insert("Content-Transfer-Encoding".into(), "8bit".into());
    fields.insert("Generated-By".into(), GENERATED_BY.into());

    let mut out = String::new();
    match catalog.locale() {
        Some(locale) => out.push_str(&format!("# Translations for {}.\n", locale)),
        None => out.push_str("# Translations template.\n"),
    }
    out.push_str("#\n");
    out.push_str("msgid \"\"\n");
    out.push_str("msgstr \"\"\n");
    for (key, value) in &fields {
        out.push_str(&format!("\"{}\"\n", escape(&format!("{}: {}\n", key, value))));
    }
    out
}

fn render_message(message: &Message, prefix: &str) -> String {
    let mut out = String::new();
    for line in message.user_comments.iter().flat_map(|c| comment_lines(c)) {
        if line.is_empty() {
            out.push_str("#\n");
        } else {
            out.push_str(&format!("# {}\n", line));
        }
    }
    for line in message.auto_comments.iter().flat_map(|c| comment_lines(c)) {
        out.push_str(&format!("#. {}\n", line));
    }
    if !message.obsolete && !message.locations.is_empty() {
        let locations: Vec<String> = message.locations.iter().map(render_location).collect();
        out.push_str(&format!("#: {}\n", locations.join(" ")));
    }
    if !message.flags.is_empty() {
        let flags: Vec<&str> = message.flags.iter().map(String::as_str).collect();
        out.push_str(&format!("#, {}\n", flags.join(", ")));
    }
    if let Some(context) = &message.context {
        render_field(&mut out, prefix, "msgctxt", context);
    }
    render_field(&mut out, prefix, "msgid", &message.id);
    render_field(
        &mut out,
        prefix,
        "msgstr",
        message.string.as_deref().unwrap_or(""),
    );
    out
}

/// A comment spanning several lines is written as one comment line each.
fn comment_lines(comment: &str) -> impl Iterator<Item = &str> {
    let lines: Vec<&str> = comment.lines().map(|l| l.trim_end_matches('\r')).collect();
    let lines = if lines.is_empty() { vec![""] } else { lines };
    lines.into_iter()
}

fn render_location(location: &Location) -> String {
    if !location.path.contains(char::is_whitespace) {
        return location.to_string();
    }
    let path = format!("{}{}{}", LOCATION_OPEN, location.path, LOCATION_CLOSE);
    if location.line == 0 {
        path
    } else {
        format!("{}:{}", path, location.line)
    }
}

fn render_field(out: &mut String, prefix: &str, keyword: &str, value: &str) {
    let lines: Vec<&str> = value.split_inclusive('\n').collect();
    if lines.len() <= 1 {
        out.push_str(&format!("{}{} \"{}\"\n", prefix, keyword, escape(value)));
        return;
    }
    out.push_str(&format!("{}{} \"\"\n", prefix, keyword));
    for line in lines {
        out.push_str(&format!("{}\"{}\"\n", prefix, escape(line)));
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
    out
}
