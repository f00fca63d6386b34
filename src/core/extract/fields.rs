//! Tagged-field extraction from structured data.
//!
//! A field is translatable when its key ends with `@` (`title@: Hello`). A
//! sibling key with a trailing `#` (`title@#: Page title`) becomes the
//! extracted comment. Lists under a tagged key yield one message per item.

use serde_yaml::Value;

use crate::core::pod::CsvRow;

pub const TAGGED_SUFFIX: char = '@';
pub const COMMENT_SUFFIX: char = '#';

/// A translatable string found in a field tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedField {
    pub key: String,
    pub msgid: String,
    pub comment: Option<String>,
}

fn is_tagged(key: &str) -> bool {
    key.len() > 1 && key.ends_with(TAGGED_SUFFIX)
}

fn comment_key(key: &str) -> String {
    format!("{}{}", key, COMMENT_SUFFIX)
}

/// Walks a YAML tree and collects every tagged string leaf.
pub fn walk_tagged_fields(fields: &Value) -> Vec<TaggedField> {
    let mut found = Vec::new();
    visit(fields, None, None, &mut found);
    found
}

fn visit(node: &Value, key: Option<&str>, parent: Option<&Value>, found: &mut Vec<TaggedField>) {
    match node {
        Value::Mapping(mapping) => {
            for (child_key, child) in mapping {
                let child_key = child_key.as_str();
                visit(child, child_key, Some(node), found);
            }
        }
        Value::Sequence(items) => {
            for item in items {
                visit(item, key, parent, found);
            }
        }
        Value::Tagged(tagged) => visit(&tagged.value, key, parent, found),
        Value::String(msgid) => {
            let Some(key) = key.filter(|k| is_tagged(k)) else {
                return;
            };
            if msgid.is_empty() {
                return;
            }
            let comment = parent
                .and_then(|p| p.get(comment_key(key)))
                .and_then(Value::as_str)
                .filter(|c| !c.is_empty())
                .map(String::from);
            found.push(TaggedField {
                key: key.to_string(),
                msgid: msgid.clone(),
                comment,
            });
        }
        Value::Null | Value::Bool(_) | Value::Number(_) => {}
    }
}

/// Collects tagged columns of CSV rows, using `column#` for comments.
pub fn csv_tagged_fields(rows: &[CsvRow]) -> Vec<TaggedField> {
    let mut found = Vec::new();
    for row in rows {
        for (key, msgid) in row {
            if !is_tagged(key) || msgid.is_empty() {
                continue;
            }
            let comment = row
                .get(&comment_key(key))
                .filter(|c| !c.is_empty())
                .cloned();
            found.push(TaggedField {
                key: key.clone(),
                msgid: msgid.clone(),
                comment,
            });
        }
    }
    found
}
