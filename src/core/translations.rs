use std::collections::HashMap;

use crate::core::{
    error::Result,
    parsers::mo::{CONTEXT_SEPARATOR, encode_key, read_mo},
};

/// Compiled id → translation lookup for one locale.
///
/// A null lookup (no compiled artifact) returns every id unchanged.
#[derive(Debug, Clone, Default)]
pub struct Translations {
    messages: HashMap<String, String>,
    metadata: HashMap<String, String>,
    null: bool,
}

impl Translations {
    /// The identity translator.
    pub fn null() -> Self {
        Self {
            null: true,
            ..Default::default()
        }
    }

    pub fn from_mo_bytes(bytes: &[u8]) -> Result<Self> {
        let mut translations = Self::default();
        for (key, value) in read_mo(bytes)? {
            if key.is_empty() {
                translations.metadata = value
                    .lines()
                    .filter_map(|line| line.split_once(':'))
                    .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
                    .collect();
            } else {
                translations.messages.insert(key, value);
            }
        }
        Ok(translations)
    }

    pub fn is_null(&self) -> bool {
        self.null
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Header value from the compiled catalog (e.g. "Language").
    pub fn metadata(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str)
    }

    pub fn gettext<'a>(&'a self, msgid: &'a str) -> &'a str {
        self.messages.get(msgid).map(String::as_str).unwrap_or(msgid)
    }

    pub fn pgettext<'a>(&'a self, context: &str, msgid: &'a str) -> &'a str {
        self.messages
            .get(&encode_key(Some(context), msgid))
            .map(String::as_str)
            .unwrap_or(msgid)
    }

    /// Iterates `(context, id, translation)` triples.
    pub fn iter(&self) -> impl Iterator<Item = (Option<&str>, &str, &str)> {
        self.messages.iter().map(|(key, value)| {
            match key.split_once(CONTEXT_SEPARATOR) {
                Some((context, id)) => (Some(context), id, value.as_str()),
                None => (None, key.as_str(), value.as_str()),
            }
        })
    }
}
