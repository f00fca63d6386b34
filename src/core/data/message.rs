use std::{
    collections::BTreeSet,
    fmt,
    hash::{Hash, Hasher},
};

/// Flag marking a translation carried over by approximate matching.
pub const FUZZY_FLAG: &str = "fuzzy";

/// A source reference for a message.
///
/// Line `0` means "the whole file" and is used for structured fields, which
/// have no meaningful line number.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Location {
    /// Pod path of the source (e.g., "/content/pages/about.yaml").
    pub path: String,
    /// Line number (1-indexed), or 0 when unknown.
    pub line: usize,
}

impl Location {
    pub fn new(path: impl Into<String>, line: usize) -> Self {
        Self {
            path: path.into(),
            line,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.line == 0 {
            write!(f, "{}", self.path)
        } else {
            write!(f, "{}:{}", self.path, self.line)
        }
    }
}

/// Identity of a message within a catalog: the id plus its optional context.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MessageKey {
    pub context: Option<String>,
    pub id: String,
}

impl MessageKey {
    pub fn new(id: impl Into<String>, context: Option<String>) -> Self {
        Self {
            context,
            id: id.into(),
        }
    }
}

/// A single translatable unit.
///
/// Two messages are equal when their id and context are equal; the rest of
/// the entry (translation, locations, comments, flags) is payload.
#[derive(Debug, Clone, Default)]
pub struct Message {
    pub id: String,
    /// Translated value. `None` or an empty string means untranslated.
    pub string: Option<String>,
    pub locations: Vec<Location>,
    /// Comments attached by the extractor (`#.`).
    pub auto_comments: Vec<String>,
    /// Comments written by translators (`# `); never produced by extraction.
    pub user_comments: Vec<String>,
    pub context: Option<String>,
    pub flags: BTreeSet<String>,
    pub obsolete: bool,
}

impl Message {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn with_string(mut self, string: impl Into<String>) -> Self {
        self.string = Some(string.into());
        self
    }

    pub fn with_location(mut self, path: impl Into<String>, line: usize) -> Self {
        self.locations.push(Location::new(path, line));
        self
    }

    pub fn with_auto_comment(mut self, comment: impl Into<String>) -> Self {
        self.auto_comments.push(comment.into());
        self
    }

    pub fn with_context(mut self, context: Option<String>) -> Self {
        self.context = context;
        self
    }

    pub fn with_flag(mut self, flag: impl Into<String>) -> Self {
        self.flags.insert(flag.into());
        self
    }

    pub fn key(&self) -> MessageKey {
        MessageKey::new(self.id.clone(), self.context.clone())
    }

    pub fn is_translated(&self) -> bool {
        self.string.as_deref().is_some_and(|s| !s.is_empty())
    }

    pub fn is_fuzzy(&self) -> bool {
        self.flags.contains(FUZZY_FLAG)
    }

    /// Appends locations and comments from `other`, skipping ones that are
    /// already present.
    pub fn merge_in(&mut self, other: &Message) {
        for location in &other.locations {
            if !self.locations.contains(location) {
                self.locations.push(location.clone());
            }
        }
        append_missing(&mut self.auto_comments, &other.auto_comments);
        append_missing(&mut self.user_comments, &other.user_comments);
    }
}

fn append_missing(target: &mut Vec<String>, items: &[String]) {
    for item in items {
        if !target.contains(item) {
            target.push(item.clone());
        }
    }
}

impl PartialEq for Message {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.context == other.context
    }
}

impl Eq for Message {}

impl Hash for Message {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
        self.context.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_display() {
        assert_eq!(
            Location::new("/views/base.html", 12).to_string(),
            "/views/base.html:12"
        );
        assert_eq!(
            Location::new("/content/pages/a.yaml", 0).to_string(),
            "/content/pages/a.yaml"
        );
    }

    #[test]
    fn test_equality_by_id_and_context() {
        let a = Message::new("Hello").with_string("Hallo");
        let b = Message::new("Hello").with_location("/views/a.html", 3);
        let c = Message::new("Hello").with_context(Some("menu".to_string()));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_merge_in_skips_duplicates() {
        let mut message = Message::new("Hello")
            .with_location("/views/a.html", 3)
            .with_auto_comment("Greeting");
        let other = Message::new("Hello")
            .with_location("/views/a.html", 3)
            .with_location("/views/b.html", 9)
            .with_auto_comment("Greeting");

        message.merge_in(&other);

        assert_eq!(
            message.locations,
            vec![
                Location::new("/views/a.html", 3),
                Location::new("/views/b.html", 9)
            ]
        );
        assert_eq!(message.auto_comments, vec!["Greeting"]);
    }

    #[test]
    fn test_is_translated() {
        assert!(!Message::new("a").is_translated());
        assert!(!Message::new("a").with_string("").is_translated());
        assert!(Message::new("a").with_string("b").is_translated());
    }
}
