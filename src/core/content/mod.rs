//! The content tree walked by extraction.
//!
//! Collections are directories under `/content/` holding a `_blueprint.yaml`.
//! Documents are the YAML, Markdown and HTML files directly inside them.
//!
//! ## Module Structure
//!
//! - `front_matter`: splitting files into front matter, parts and body

pub mod front_matter;

use serde_yaml::Value;

use crate::{
    core::{
        error::Result,
        pod::{Pod, locales_of, parse_yaml},
    },
    utils::{extension, join_pod_path},
};

use front_matter::{parse_localized_path, split_front_matter, split_yaml_parts};

pub const CONTENT_ROOT: &str = "/content/";
pub const BLUEPRINT_NAME: &str = "_blueprint.yaml";

const DOCUMENT_EXTENSIONS: &[&str] = &[".yaml", ".yml", ".md", ".html"];

/// One document, or one localized part of a multi-part document.
#[derive(Debug, Clone)]
pub struct Document {
    pub pod_path: String,
    /// Set for localized parts (`$locale`, or a `name@locale.ext` file).
    pub locale: Option<String>,
    /// Locales the document is published in.
    pub locales: Vec<String>,
    pub body: Option<String>,
    pub hidden: bool,
    fields: Value,
}

impl Document {
    /// Fields as written in the file, `@` suffixes included.
    pub fn get_tagged_fields(&self) -> &Value {
        &self.fields
    }

    /// Locales whose catalogs receive this document's messages.
    ///
    /// A localized part only feeds its own locale; a base document feeds all
    /// of its locales; a document without locales only feeds the template.
    pub fn extraction_locales(&self) -> Vec<String> {
        match &self.locale {
            Some(locale) => vec![locale.clone()],
            None => self.locales.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Collection {
    /// Directory of the collection, with a trailing slash.
    pub pod_path: String,
    pub locales: Vec<String>,
    pub tagged_fields: Value,
    docs: Vec<Document>,
}

impl Collection {
    pub fn blueprint_path(&self) -> String {
        join_pod_path(&self.pod_path, BLUEPRINT_NAME)
    }

    pub fn list_docs(&self, include_hidden: bool) -> impl Iterator<Item = &Document> {
        self.docs.iter().filter(move |d| include_hidden || !d.hidden)
    }
}

/// Finds every collection under `/content/` and loads its documents.
///
/// Collections without `$localization.locales` in their blueprint inherit
/// `pod_locales`.
pub fn list_collections(pod: &Pod, pod_locales: &[String]) -> Result<Vec<Collection>> {
    let mut collections = Vec::new();
    for path in pod.list_dir(CONTENT_ROOT, true)? {
        let Some(dir) = path.strip_suffix(BLUEPRINT_NAME).filter(|d| d.ends_with('/')) else {
            continue;
        };
        let collection_path = join_pod_path(CONTENT_ROOT, dir);
        collections.push(load_collection(pod, &collection_path, pod_locales)?);
    }
    Ok(collections)
}

fn load_collection(pod: &Pod, collection_path: &str, pod_locales: &[String]) -> Result<Collection> {
    let blueprint_path = join_pod_path(collection_path, BLUEPRINT_NAME);
    let tagged_fields = pod.read_yaml(&blueprint_path)?;
    let mut locales = locales_of(tagged_fields.get("$localization"));
    if locales.is_empty() {
        locales = pod_locales.to_vec();
    }

    let mut docs = Vec::new();
    for file in pod.list_dir(collection_path, false)? {
        let is_document = extension(&file).is_some_and(|ext| DOCUMENT_EXTENSIONS.contains(&ext.as_str()));
        if file.starts_with("/_") || !is_document {
            continue;
        }
        let doc_path = join_pod_path(collection_path, &file);
        docs.extend(load_documents(pod, &doc_path, &locales)?);
    }

    Ok(Collection {
        pod_path: collection_path.to_string(),
        locales,
        tagged_fields,
        docs,
    })
}

/// Loads a document file into its base document plus any localized parts.
pub fn load_documents(pod: &Pod, pod_path: &str, inherited_locales: &[String]) -> Result<Vec<Document>> {
    let content = pod.read_file(pod_path)?;
    let (_, path_locale) = parse_localized_path(pod_path);
    let is_yaml = matches!(extension(pod_path).as_deref(), Some(".yaml" | ".yml"));

    let mut docs = Vec::new();
    if is_yaml {
        for (index, part) in split_yaml_parts(&content).into_iter().enumerate() {
            let fields = parse_yaml(part.text, pod_path)?;
            let part_locales: Vec<Option<String>> = if index == 0 {
                vec![path_locale.clone().or_else(|| string_field(&fields, "$locale"))]
            } else {
                part_locales(&fields)
            };
            for locale in part_locales {
                docs.push(build_document(pod_path, locale, fields.clone(), None, inherited_locales));
            }
        }
    } else {
        let (front, body) = split_front_matter(&content);
        let fields = match front {
            Some(front) => parse_yaml(front, pod_path)?,
            None => Value::Mapping(Default::default()),
        };
        let locale = path_locale.or_else(|| string_field(&fields, "$locale"));
        let body = (!body.trim().is_empty()).then(|| body.to_string());
        docs.push(build_document(pod_path, locale, fields, body, inherited_locales));
    }
    Ok(docs)
}

fn part_locales(fields: &Value) -> Vec<Option<String>> {
    if let Some(locale) = string_field(fields, "$locale") {
        return vec![Some(locale)];
    }
    let locales: Vec<Option<String>> = fields
        .get("$locales")
        .and_then(Value::as_sequence)
        .map(|seq| seq.iter().filter_map(Value::as_str).map(|s| Some(s.to_string())).collect())
        .unwrap_or_default();
    if locales.is_empty() { vec![None] } else { locales }
}

fn string_field(fields: &Value, key: &str) -> Option<String> {
    fields.get(key).and_then(Value::as_str).map(String::from)
}

fn build_document(
    pod_path: &str,
    locale: Option<String>,
    fields: Value,
    body: Option<String>,
    inherited_locales: &[String],
) -> Document {
    let mut locales = locales_of(fields.get("$localization"));
    if locales.is_empty() {
        locales = inherited_locales.to_vec();
    }
    let hidden = fields.get("$hidden").and_then(Value::as_bool).unwrap_or(false);
    Document {
        pod_path: pod_path.to_string(),
        locale,
        locales,
        body,
        hidden,
        fields,
    }
}
