//! Message extraction from Jinja-style template text.
//!
//! Recognized forms:
//!
//! - `{{ _('Hello') }}`, `{{ gettext("Hello") }}` and
//!   `{{ pgettext('menu', 'Open') }}`, also inside `{% ... %}` tags
//! - `{% trans %}Hello {{ name }}{% endtrans %}`, extracted as
//!   `Hello %(name)s`
//! - `{#: Shown on the home page #}` comments, attached to the next message
//!   on the same or following line
//!
//! Calls whose arguments are not string literals are skipped.

use std::sync::LazyLock;

use regex::Regex;

use crate::core::error::{CatalogError, Result};

/// Comment prefix that marks a comment for translators.
pub const COMMENT_TAG: &str = ":";

static CALL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(_|gettext|pgettext)\s*\(").unwrap());

static TRIM_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*\n\s*").unwrap());

/// A message found in template text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedMessage {
    /// Line (1-indexed) of the call or `trans` tag.
    pub line: usize,
    pub msgid: String,
    pub comments: Vec<String>,
    pub context: Option<String>,
}

/// Scans template text and returns its messages in source order.
///
/// `path` is only used for error reporting.
pub fn extract_messages(source: &str, path: &str) -> Result<Vec<ExtractedMessage>> {
    Scanner::new(source, path).run()
}

struct Scanner<'a> {
    source: &'a str,
    path: &'a str,
    line_starts: Vec<usize>,
    pending_comments: Vec<(usize, String)>,
    messages: Vec<ExtractedMessage>,
}

impl<'a> Scanner<'a> {
    fn new(source: &'a str, path: &'a str) -> Self {
        let line_starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self {
            source,
            path,
            line_starts,
            pending_comments: Vec::new(),
            messages: Vec::new(),
        }
    }

    fn line_at(&self, offset: usize) -> usize {
        self.line_starts.partition_point(|&start| start <= offset)
    }

    fn error(&self, offset: usize, message: impl Into<String>) -> CatalogError {
        CatalogError::Extraction {
            path: self.path.to_string(),
            line: self.line_at(offset),
            message: message.into(),
        }
    }

    fn run(mut self) -> Result<Vec<ExtractedMessage>> {
        let source = self.source;
        let mut pos = 0;
        while let Some(found) = source[pos..].find('{') {
            let start = pos + found;
            let rest = &source[start..];

            if rest.starts_with("{#") {
                let end = self.find_close(start, "#}", false)?;
                let text = source[start + 2..end].trim();
                if let Some(comment) = text.strip_prefix(COMMENT_TAG) {
                    let line = self.line_at(end);
                    self.pending_comments.push((line, comment.trim().to_string()));
                }
                pos = end + 2;
            } else if rest.starts_with("{{") {
                let end = self.find_close(start, "}}", true)?;
                self.scan_calls(start + 2, end)?;
                pos = end + 2;
            } else if rest.starts_with("{%") {
                let end = self.find_close(start, "%}", true)?;
                let tag = tag_name(&source[start + 2..end]);
                if tag == "trans" || tag.starts_with("trans ") {
                    pos = self.scan_trans(start, tag, end + 2)?;
                } else {
                    self.scan_calls(start + 2, end)?;
                    pos = end + 2;
                }
            } else {
                pos = start + 1;
            }
        }
        Ok(self.messages)
    }

    /// Finds the closing delimiter of the block opened at `open`.
    fn find_close(&self, open: usize, close: &str, skip_strings: bool) -> Result<usize> {
        let mut pos = open + 2;
        let bytes = self.source.as_bytes();
        while pos < bytes.len() {
            if self.source[pos..].starts_with(close) {
                return Ok(pos);
            }
            let byte = bytes[pos];
            if skip_strings && (byte == b'"' || byte == b'\'') {
                let (_, next) = self.read_string(pos)?;
                pos = next;
                continue;
            }
            pos += 1;
        }
        Err(self.error(open, format!("unterminated block, expected '{}'", close)))
    }

    /// Reads a quoted literal starting at `start`. Returns the unescaped value
    /// and the offset just past the closing quote.
    fn read_string(&self, start: usize) -> Result<(String, usize)> {
        let quote = self.source.as_bytes()[start] as char;
        let mut value = String::new();
        let mut chars = self.source[start + 1..].char_indices();
        while let Some((i, c)) = chars.next() {
            match c {
                '\\' => match chars.next() {
                    Some((_, 'n')) => value.push('\n'),
                    Some((_, 't')) => value.push('\t'),
                    Some((_, 'r')) => value.push('\r'),
                    Some((_, escaped @ ('\\' | '\'' | '"'))) => value.push(escaped),
                    Some((_, other)) => {
                        value.push('\\');
                        value.push(other);
                    }
                    None => break,
                },
                c if c == quote => return Ok((value, start + 1 + i + c.len_utf8())),
                c => value.push(c),
            }
        }
        Err(self.error(start, "unterminated string literal"))
    }

    fn skip_whitespace(&self, mut pos: usize, end: usize) -> usize {
        while pos < end && self.source.as_bytes()[pos].is_ascii_whitespace() {
            pos += 1;
        }
        pos
    }

    /// Reads a string literal argument at `pos`, if there is one.
    fn literal_arg(&self, pos: usize, end: usize) -> Result<Option<(String, usize)>> {
        let pos = self.skip_whitespace(pos, end);
        match self.source.as_bytes().get(pos) {
            Some(b'"' | b'\'') if pos < end => self.read_string(pos).map(Some),
            _ => Ok(None),
        }
    }

    fn scan_calls(&mut self, start: usize, end: usize) -> Result<()> {
        let expression = &self.source[start..end];
        let calls: Vec<(usize, String, usize)> = CALL_REGEX
            .captures_iter(expression)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                let name = caps.get(1)?.as_str().to_string();
                let preceded_by_dot = expression[..whole.start()].trim_end().ends_with('.');
                (!preceded_by_dot).then_some((start + whole.start(), name, start + whole.end()))
            })
            .collect();

        for (call_start, name, args_start) in calls {
            let Some((first, next)) = self.literal_arg(args_start, end)? else {
                continue;
            };
            let (context, msgid) = if name == "pgettext" {
                let comma = self.skip_whitespace(next, end);
                if self.source.as_bytes().get(comma) != Some(&b',') {
                    continue;
                }
                let Some((msgid, _)) = self.literal_arg(comma + 1, end)? else {
                    continue;
                };
                (Some(first), msgid)
            } else {
                (None, first)
            };
            self.push_message(self.line_at(call_start), msgid, context);
        }
        Ok(())
    }

    /// Collects a `{% trans %}` body up to `{% endtrans %}` and returns the
    /// offset after the closing tag.
    fn scan_trans(&mut self, tag_start: usize, tag: &str, body_start: usize) -> Result<usize> {
        let source = self.source;
        let trimmed = tag.split_whitespace().any(|word| word == "trimmed");
        let mut msgid = String::new();
        let mut pos = body_start;

        loop {
            let Some(found) = source[pos..].find('{') else {
                return Err(self.error(tag_start, "unterminated trans block"));
            };
            let start = pos + found;
            msgid.push_str(&source[pos..start].replace('%', "%%"));
            let rest = &source[start..];

            if rest.starts_with("{{") {
                let end = self.find_close(start, "}}", true)?;
                let name = source[start + 2..end].trim();
                if name.is_empty() || !name.chars().all(|c| c.is_alphanumeric() || c == '_') {
                    return Err(self.error(start, "expected a variable name in trans block"));
                }
                msgid.push_str(&format!("%({})s", name));
                pos = end + 2;
            } else if rest.starts_with("{%") {
                let end = self.find_close(start, "%}", true)?;
                match tag_name(&source[start + 2..end]) {
                    "endtrans" => {
                        pos = end + 2;
                        break;
                    }
                    "pluralize" => {
                        return Err(self.error(start, "plural forms are not supported"));
                    }
                    other => {
                        return Err(self.error(start, format!("unexpected '{}' in trans block", other)));
                    }
                }
            } else if rest.starts_with("{#") {
                pos = self.find_close(start, "#}", false)? + 2;
            } else {
                msgid.push('{');
                pos = start + 1;
            }
        }

        let msgid = if trimmed {
            TRIM_REGEX.replace_all(msgid.trim(), " ").into_owned()
        } else {
            msgid
        };
        if !msgid.trim().is_empty() {
            self.push_message(self.line_at(tag_start), msgid, None);
        }
        Ok(pos)
    }

    fn push_message(&mut self, line: usize, msgid: String, context: Option<String>) {
        let comments = self
            .pending_comments
            .drain(..)
            .filter(|(comment_line, _)| line >= *comment_line && line - comment_line <= 1)
            .map(|(_, text)| text)
            .collect();
        if msgid.is_empty() {
            return;
        }
        self.messages.push(ExtractedMessage {
            line,
            msgid,
            comments,
            context,
        });
    }
}

/// Tag text without whitespace-control markers (`{%- ... -%}`).
fn tag_name(inner: &str) -> &str {
    inner.trim_matches(|c: char| c.is_whitespace() || c == '-' || c == '+')
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn msgids(source: &str) -> Vec<String> {
        extract_messages(source, "/views/test.html")
            .unwrap()
            .into_iter()
            .map(|m| m.msgid)
            .collect()
    }

    #[test]
    fn test_gettext_calls() {
        let source = "<h1>{{ _('Hello') }}</h1>\n<p>{{ gettext(\"World\") }}</p>\n";
        let messages = extract_messages(source, "/views/base.html").unwrap();
        assert_eq!(
            messages,
            vec![
                ExtractedMessage {
                    line: 1,
                    msgid: "Hello".into(),
                    comments: vec![],
                    context: None,
                },
                ExtractedMessage {
                    line: 2,
                    msgid: "World".into(),
                    comments: vec![],
                    context: None,
                },
            ]
        );
    }

    #[test]
    fn test_pgettext_and_escapes() {
        let source = "{{ pgettext('menu', 'Open') }} {{ _('It\\'s \"here\"') }}";
        let messages = extract_messages(source, "/views/a.html").unwrap();
        assert_eq!(messages[0].context.as_deref(), Some("menu"));
        assert_eq!(messages[0].msgid, "Open");
        assert_eq!(messages[1].msgid, "It's \"here\"");
    }

    #[test]
    fn test_calls_in_statements_and_filters() {
        let source = "{% set title = _('Title') %}{{ _('Name')|upper }}{{ x._('skip') }}{{ _(var) }}";
        assert_eq!(msgids(source), vec!["Title", "Name"]);
    }

    #[test]
    fn test_multiple_calls_in_one_expression() {
        assert_eq!(
            msgids("{{ _('a') if x else _(\"b\") }}"),
            vec!["a", "b"]
        );
    }

    #[test]
    fn test_trans_block() {
        let source = "{% trans %}Hello {{ name }}, 100% sure{% endtrans %}";
        assert_eq!(msgids(source), vec!["Hello %(name)s, 100%% sure"]);
    }

    #[test]
    fn test_trans_trimmed() {
        let source = "{% trans trimmed %}\n  Hello\n  world\n{% endtrans %}";
        assert_eq!(msgids(source), vec!["Hello world"]);
    }

    #[test]
    fn test_comment_attaches_to_next_line() {
        let source = "{#: Greeting on the home page #}\n{{ _('Hello') }}\n\n{#: Too far #}\n\n{{ _('Bye') }}";
        let messages = extract_messages(source, "/views/a.html").unwrap();
        assert_eq!(messages[0].comments, vec!["Greeting on the home page"]);
        assert!(messages[1].comments.is_empty());
    }

    #[test]
    fn test_plain_comment_is_ignored() {
        let source = "{# not for translators #}{{ _('Hello') }}";
        let messages = extract_messages(source, "/views/a.html").unwrap();
        assert!(messages[0].comments.is_empty());
    }

    #[test]
    fn test_plain_text_is_ignored() {
        assert!(msgids("function() { return _('x'); }").is_empty());
    }

    #[test]
    fn test_unterminated_expression_is_error() {
        let err = extract_messages("line one\n{{ _('Hello') ", "/views/bad.html").unwrap_err();
        assert!(
            matches!(err, CatalogError::Extraction { line: 2, .. }),
            "{err}"
        );
    }

    #[test]
    fn test_unterminated_string_is_error() {
        let err = extract_messages("{{ _('Hello) }}", "/views/bad.html").unwrap_err();
        assert!(matches!(err, CatalogError::Extraction { .. }), "{err}");
    }

    #[test]
    fn test_unterminated_trans_is_error() {
        let err = extract_messages("\n\n{% trans %}Hello", "/views/bad.html").unwrap_err();
        assert!(
            matches!(err, CatalogError::Extraction { line: 3, .. }),
            "{err}"
        );
    }

    #[test]
    fn test_pluralize_is_error() {
        let source = "{% trans count=n %}One{% pluralize %}Many{% endtrans %}";
        assert!(extract_messages(source, "/views/bad.html").is_err());
    }

    #[test]
    fn test_empty_msgids_are_dropped() {
        let source = "{{ _('') }}{{ _('Hi') }}\n{{ pgettext('menu', '') }}\n{% trans %}{% endtrans %}\n";
        assert_eq!(msgids(source), vec!["Hi"]);
    }
}
