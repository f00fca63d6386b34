//! Splitting document files into front matter, parts and body.

/// A YAML part of a multi-part document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part<'a> {
    /// Line (1-indexed) where the part's text starts in the file.
    pub start_line: usize,
    pub text: &'a str,
}

fn is_separator(line: &str) -> bool {
    line.trim_end() == "---"
}

/// Splits `---` delimited front matter from the body.
///
/// Returns `(None, content)` when the file has no front matter. An unclosed
/// front matter block is treated as all front matter.
pub fn split_front_matter(content: &str) -> (Option<&str>, &str) {
    let mut lines = content.split_inclusive('\n');
    match lines.next() {
        Some(first) if is_separator(first) => {}
        _ => return (None, content),
    }

    let start = content.find('\n').map(|i| i + 1).unwrap_or(content.len());
    let mut offset = start;
    for line in lines {
        if is_separator(line) {
            let front = &content[start..offset];
            let body = &content[offset + line.len()..];
            return (Some(front), body);
        }
        offset += line.len();
    }
    (Some(&content[start..]), "")
}

/// Splits a YAML file into `---` separated parts. A leading separator does
/// not produce an empty first part.
pub fn split_yaml_parts(content: &str) -> Vec<Part<'_>> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut start_line = 1;
    let mut offset = 0;

    for (index, line) in content.split_inclusive('\n').enumerate() {
        if is_separator(line) {
            if offset > start || index > 0 {
                parts.push(Part {
                    start_line,
                    text: &content[start..offset],
                });
            }
            start = offset + line.len();
            start_line = index + 2;
        }
        offset += line.len();
    }
    parts.push(Part {
        start_line,
        text: &content[start..],
    });

    parts
        .into_iter()
        .enumerate()
        .filter(|(i, part)| *i == 0 || !part.text.trim().is_empty())
        .map(|(_, part)| part)
        .collect()
}

/// Splits `name@locale.ext` into (`name.ext`, `Some(locale)`).
///
/// ```
/// use podcat::core::content::front_matter::parse_localized_path;
///
/// assert_eq!(
///     parse_localized_path("/content/pages/file@de.yaml"),
///     ("/content/pages/file.yaml".to_string(), Some("de".to_string()))
/// );
/// ```
pub fn parse_localized_path(path: &str) -> (String, Option<String>) {
    let (dir, file_name) = match path.rsplit_once('/') {
        Some((dir, file_name)) => (Some(dir), file_name),
        None => (None, path),
    };
    let (stem, ext) = match file_name.rfind('.') {
        Some(idx) if idx > 0 => (&file_name[..idx], &file_name[idx..]),
        _ => (file_name, ""),
    };
    let Some((base, locale)) = stem.rsplit_once('@').filter(|(b, l)| !b.is_empty() && !l.is_empty())
    else {
        return (path.to_string(), None);
    };

    let file_name = format!("{}{}", base, ext);
    let path = match dir {
        Some(dir) => format!("{}/{}", dir, file_name),
        None => file_name,
    };
    (path, Some(locale.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_front_matter() {
        let content = "---\n$title@: HTML Page\n$hidden: true\n---\n<div>HTML Content.</div>\n";
        let (front, body) = split_front_matter(content);
        assert_eq!(front, Some("$title@: HTML Page\n$hidden: true\n"));
        assert_eq!(body, "<div>HTML Content.</div>\n");
    }

    #[test]
    fn test_split_without_front_matter() {
        let (front, body) = split_front_matter("About page.\n");
        assert_eq!(front, None);
        assert_eq!(body, "About page.\n");
    }

    #[test]
    fn test_split_unclosed_front_matter() {
        let (front, body) = split_front_matter("---\nfoo: bar\n");
        assert_eq!(front, Some("foo: bar\n"));
        assert_eq!(body, "");
    }

    #[test]
    fn test_split_yaml_parts() {
        let content = "foo: base\n---\n$locale: de\nfoo: de\n---\n$locales: [it, fr]\nfoo: it_fr\n";
        let parts = split_yaml_parts(content);
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], Part { start_line: 1, text: "foo: base\n" });
        assert_eq!(parts[1], Part { start_line: 3, text: "$locale: de\nfoo: de\n" });
        assert_eq!(parts[2].start_line, 6);
    }

    #[test]
    fn test_split_yaml_leading_separator() {
        let parts = split_yaml_parts("---\nfoo: bar\n");
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].text, "foo: bar\n");
        assert_eq!(parts[0].start_line, 2);
    }

    #[test]
    fn test_parse_localized_path() {
        assert_eq!(
            parse_localized_path("/content/pages/file@locale.ext"),
            ("/content/pages/file.ext".to_string(), Some("locale".to_string()))
        );
        assert_eq!(
            parse_localized_path("/content/pages/file.ext"),
            ("/content/pages/file.ext".to_string(), None)
        );
        assert_eq!(
            parse_localized_path("/content/pages/@file.ext"),
            ("/content/pages/@file.ext".to_string(), None)
        );
    }
}
