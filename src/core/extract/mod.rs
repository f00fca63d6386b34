//! Extraction: collecting messages from the pod into catalogs.
//!
//! Sources are walked in a fixed order:
//!
//! 1. collections under `/content/`: blueprint fields, documents (tagged
//!    fields and body) and CSV files
//! 2. YAML files at the root of `/content/`
//! 3. every file under `/views/`
//! 4. `/podspec.yaml`
//!
//! Every message goes into a scratch catalog for each of its locales and
//! into one unlocalized aggregate. The scratch catalogs are then reconciled
//! with the persisted ones via [`Catalog::update_using_catalog`].
//!
//! ## Module Structure
//!
//! - `fields`: tagged-field walking over YAML values and CSV rows
//! - `template`: message scanning over template text

pub mod fields;
pub mod template;

use std::collections::BTreeMap;

use tracing::{debug, error, info};

use crate::{
    core::{
        catalog::{Catalog, DEFAULT_BASENAME, UpdateOptions, UpdateStats, locale_catalog_path},
        content::{CONTENT_ROOT, list_collections, load_documents},
        data::Message,
        error::Result,
        parsers::po::WriteOptions,
        pod::{PODSPEC_PATH, Pod},
        utils::PathFilter,
    },
    utils::{extension, join_pod_path, plural},
};

use fields::{TaggedField, csv_tagged_fields, walk_tagged_fields};
use template::extract_messages;

pub const VIEWS_ROOT: &str = "/views/";
pub const DEFAULT_TRANSLATABLE_EXTENSIONS: &[&str] = &[".html", ".md", ".yaml", ".yml"];

#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Reconcile with each locale catalog instead of the template.
    pub localized: bool,
    /// Only extract sources matching these paths or patterns.
    pub paths: Option<PathFilter>,
    /// In localized mode, only save these locales.
    pub locales: Option<Vec<String>>,
    /// Sources that are never extracted.
    pub ignores: Option<PathFilter>,
    /// Document extensions whose body is scanned for template messages.
    pub translatable_extensions: Vec<String>,
    pub update: UpdateOptions,
    pub write: WriteOptions,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            localized: false,
            paths: None,
            locales: None,
            ignores: None,
            translatable_extensions: DEFAULT_TRANSLATABLE_EXTENSIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            update: UpdateOptions::default(),
            write: WriteOptions::default(),
        }
    }
}

/// A catalog written by extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedCatalog {
    pub pod_path: String,
    pub locale: Option<String>,
    pub translated: usize,
    pub total: usize,
    pub stats: UpdateStats,
}

#[derive(Debug, Clone, Default)]
pub struct ExtractReport {
    /// Number of source files read.
    pub sources: usize,
    pub saved: Vec<SavedCatalog>,
}

/// Extracts messages from the pod and saves them into the template, or into
/// each locale catalog when `options.localized`.
///
/// A template body that fails to scan stops the run. Catalogs are only
/// written after every source has been extracted.
pub fn extract(pod: &Pod, template_path: &str, options: &ExtractOptions) -> Result<ExtractReport> {
    let pod_locales = pod.list_locales()?;
    let mut extraction = Extraction::new(options);

    for collection in list_collections(pod, &pod_locales)? {
        info!("Extracting collection: {}", collection.pod_path);

        let blueprint_path = collection.blueprint_path();
        if extraction.should_extract(&blueprint_path) {
            let found = walk_tagged_fields(&collection.tagged_fields);
            extraction.add_fields(&blueprint_path, &collection.locales, found);
        }

        let mut last_pod_path: Option<&str> = None;
        for doc in collection.list_docs(true) {
            if !extraction.should_extract(&doc.pod_path) {
                continue;
            }
            if last_pod_path != Some(doc.pod_path.as_str()) {
                info!(
                    "Extracting: {} ({} {})",
                    doc.pod_path,
                    doc.locales.len(),
                    plural(doc.locales.len(), "locale", "locales")
                );
                extraction.sources += 1;
                last_pod_path = Some(doc.pod_path.as_str());
            }

            let locales = doc.extraction_locales();
            extraction.add_fields(&doc.pod_path, &locales, walk_tagged_fields(doc.get_tagged_fields()));
            if let Some(body) = &doc.body
                && extraction.is_translatable(&doc.pod_path)
            {
                extraction.add_template(&doc.pod_path, &locales, body)?;
            }
        }

        for file in pod.list_dir(&collection.pod_path, false)? {
            let pod_path = join_pod_path(&collection.pod_path, &file);
            if extension(&pod_path).as_deref() != Some(".csv") || !extraction.should_extract(&pod_path) {
                continue;
            }
            info!("Extracting: {}", pod_path);
            extraction.sources += 1;
            let rows = pod.read_csv(&pod_path)?;
            extraction.add_fields(&pod_path, &collection.locales, csv_tagged_fields(&rows));
        }
    }

    for file in pod.list_dir(CONTENT_ROOT, false)? {
        let pod_path = join_pod_path(CONTENT_ROOT, &file);
        let is_yaml = matches!(extension(&pod_path).as_deref(), Some(".yaml" | ".yml"));
        if !is_yaml || !extraction.should_extract(&pod_path) {
            continue;
        }
        info!("Extracting: {}", pod_path);
        extraction.sources += 1;
        for doc in load_documents(pod, &pod_path, &pod_locales)? {
            let locales = doc.extraction_locales();
            extraction.add_fields(&pod_path, &locales, walk_tagged_fields(doc.get_tagged_fields()));
        }
    }

    for file in pod.list_dir(VIEWS_ROOT, true)? {
        let pod_path = join_pod_path(VIEWS_ROOT, &file);
        if !extraction.should_extract(&pod_path) {
            continue;
        }
        let Ok(source) = String::from_utf8(pod.read_bytes(&pod_path)?) else {
            debug!("Skipping non-text file: {}", pod_path);
            continue;
        };
        info!("Extracting: {}", pod_path);
        extraction.sources += 1;
        extraction.add_template(&pod_path, &pod_locales, &source)?;
    }

    if pod.file_exists(PODSPEC_PATH) && extraction.should_extract(PODSPEC_PATH) {
        info!("Extracting: {}", PODSPEC_PATH);
        extraction.sources += 1;
        let podspec = pod.read_yaml(PODSPEC_PATH)?;
        extraction.add_fields(PODSPEC_PATH, &pod_locales, walk_tagged_fields(&podspec));
    }

    extraction.save(pod, template_path)
}

/// Scratch catalogs built up while walking the pod.
struct Extraction<'a> {
    options: &'a ExtractOptions,
    localized: BTreeMap<String, Catalog>,
    unlocalized: Catalog,
    sources: usize,
}

impl<'a> Extraction<'a> {
    fn new(options: &'a ExtractOptions) -> Self {
        Self {
            options,
            localized: BTreeMap::new(),
            unlocalized: Catalog::scratch(None),
            sources: 0,
        }
    }

    fn should_extract(&self, pod_path: &str) -> bool {
        let ignored = self
            .options
            .ignores
            .as_ref()
            .is_some_and(|ignores| ignores.matches(pod_path));
        let selected = self
            .options
            .paths
            .as_ref()
            .is_none_or(|paths| paths.matches(pod_path));
        !ignored && selected
    }

    fn is_translatable(&self, pod_path: &str) -> bool {
        extension(pod_path).is_some_and(|ext| self.options.translatable_extensions.contains(&ext))
    }

    fn add(&mut self, message: Message, locales: &[String]) {
        for locale in locales {
            self.localized
                .entry(locale.clone())
                .or_insert_with(|| Catalog::scratch(Some(locale)))
                .add(message.clone());
        }
        self.unlocalized.add(message);
    }

    fn add_fields(&mut self, pod_path: &str, locales: &[String], found: Vec<TaggedField>) {
        for field in found {
            let mut message = Message::new(field.msgid).with_location(pod_path, 0);
            if let Some(comment) = field.comment {
                message = message.with_auto_comment(comment);
            }
            self.add(message, locales);
        }
    }

    fn add_template(&mut self, pod_path: &str, locales: &[String], source: &str) -> Result<()> {
        let extracted = extract_messages(source, pod_path).inspect_err(|e| {
            error!("Problem extracting body: {} ({})", pod_path, e);
        })?;
        for item in extracted {
            let message = Message {
                auto_comments: item.comments,
                ..Message::new(item.msgid)
                    .with_location(pod_path, item.line)
                    .with_context(item.context)
            };
            self.add(message, locales);
        }
        Ok(())
    }

    fn save(self, pod: &Pod, template_path: &str) -> Result<ExtractReport> {
        let mut report = ExtractReport {
            sources: self.sources,
            saved: Vec::new(),
        };

        if !self.options.localized {
            let mut template = Catalog::open(pod, None, template_path)?;
            let stats = template.update_using_catalog(&self.unlocalized, &self.options.update);
            template.save(pod, &self.options.write)?;
            info!("Saved: {} ({} messages)", template_path, template.len());
            report.saved.push(SavedCatalog {
                pod_path: template_path.to_string(),
                locale: None,
                translated: 0,
                total: template.len(),
                stats,
            });
            return Ok(report);
        }

        for (locale, new_catalog) in &self.localized {
            if let Some(locales) = &self.options.locales
                && !locales.contains(locale)
            {
                continue;
            }
            let pod_path = locale_catalog_path(locale, DEFAULT_BASENAME, None);
            let mut existing = Catalog::open(pod, Some(locale), &pod_path)?;
            let stats = existing.update_using_catalog(new_catalog, &self.options.update);
            existing.save(pod, &self.options.write)?;

            let total = existing.len();
            let translated = total - existing.list_untranslated(None).len();
            info!("Saved: {} ({}/{})", pod_path, translated, total);
            report.saved.push(SavedCatalog {
                pod_path,
                locale: Some(locale.clone()),
                translated,
                total,
                stats,
            });
        }
        Ok(report)
    }
}
