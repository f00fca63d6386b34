//! The set of catalogs under `/translations/`.
//!
//! [`CatalogSet`] fans catalog operations out across locales and owns the
//! runtime lookup cache of compiled translations.

use std::{
    collections::{BTreeSet, HashMap},
    rc::Rc,
};

use tracing::{info, warn};

use crate::core::{
    catalog::{
        COMPILED_BASENAME, Catalog, DEFAULT_BASENAME, TEMPLATE_BASENAME, TRANSLATIONS_ROOT,
        UpdateOptions, UpdateStats, locale_catalog_path,
    },
    data::FUZZY_FLAG,
    error::{CatalogError, Result},
    extract::{ExtractOptions, ExtractReport, extract},
    parsers::po::{SortOrder, WriteOptions},
    pod::Pod,
    translations::Translations,
    utils::PathFilter,
};

/// Default pod path of the template catalog.
pub fn default_template_path() -> String {
    format!("{}/{}", TRANSLATIONS_ROOT, TEMPLATE_BASENAME)
}

/// Expands a locale into the identifiers searched for compiled catalogs,
/// most specific first.
///
/// ```
/// use podcat::core::catalogs::expand_locale;
///
/// assert_eq!(expand_locale("de_AT"), vec!["de_AT", "de"]);
/// assert_eq!(expand_locale("fr"), vec!["fr"]);
/// ```
pub fn expand_locale(locale: &str) -> Vec<String> {
    let (rest, modifier) = split_keep(locale, '@');
    let (rest, codeset) = split_keep(rest, '.');
    let (language, territory) = split_keep(rest, '_');

    let components = [territory, codeset, modifier];
    let mask: usize = components
        .iter()
        .enumerate()
        .filter(|(_, c)| !c.is_empty())
        .map(|(i, _)| 1 << i)
        .sum();

    let mut expanded: Vec<String> = (0..=mask)
        .filter(|i| i & !mask == 0)
        .map(|i| {
            let mut value = language.to_string();
            for (bit, component) in components.iter().enumerate() {
                if i & (1 << bit) != 0 {
                    value.push_str(component);
                }
            }
            value
        })
        .collect();
    expanded.reverse();
    expanded
}

/// Splits at the first `sep`, keeping the separator on the tail.
fn split_keep(value: &str, sep: char) -> (&str, &str) {
    match value.find(sep) {
        Some(idx) => (&value[..idx], &value[idx..]),
        None => (value, ""),
    }
}

#[derive(Debug, Clone, Default)]
pub struct FilterOptions {
    /// Output catalog for the merged (non-localized) mode.
    pub out_path: Option<String>,
    /// Output root for per-locale catalogs in localized mode.
    pub out_dir: Option<String>,
    pub localized: bool,
    pub paths: Option<PathFilter>,
    /// Defaults to every locale under `/translations/`.
    pub locales: Option<Vec<String>>,
    pub write: WriteOptions,
}

/// Outcome of compiling every locale.
#[derive(Debug, Default)]
pub struct CompileReport {
    pub compiled: Vec<String>,
    /// Locales whose compiled artifact was already up to date.
    pub fresh: Vec<String>,
    /// Locales without a persisted catalog.
    pub missing: Vec<String>,
    pub failed: Vec<(String, CatalogError)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleStats {
    pub locale: String,
    pub pod_path: String,
    pub translated: usize,
    pub fuzzy: usize,
    pub total: usize,
}

#[derive(Debug)]
pub struct CatalogSet {
    pod: Pod,
    template_path: String,
    gettext_translations: HashMap<String, Rc<Translations>>,
}

impl CatalogSet {
    pub fn new(pod: Pod, template_path: Option<&str>) -> Self {
        Self {
            pod,
            template_path: template_path
                .map(String::from)
                .unwrap_or_else(default_template_path),
            gettext_translations: HashMap::new(),
        }
    }

    pub fn pod(&self) -> &Pod {
        &self.pod
    }

    pub fn template_path(&self) -> &str {
        &self.template_path
    }

    /// Opens the catalog for `locale`, loading it when it exists.
    pub fn get(&self, locale: &str, basename: Option<&str>, dir_path: Option<&str>) -> Result<Catalog> {
        let pod_path = locale_catalog_path(locale, basename.unwrap_or(DEFAULT_BASENAME), dir_path);
        Catalog::open(&self.pod, Some(locale), &pod_path)
    }

    pub fn get_template(&self) -> Result<Catalog> {
        Catalog::open(&self.pod, None, &self.template_path)
    }

    /// Locales with content under `/translations/`, sorted.
    pub fn list_locales(&self) -> Result<Vec<String>> {
        let locales: BTreeSet<String> = self
            .pod
            .list_dir(TRANSLATIONS_ROOT, true)?
            .iter()
            .filter_map(|path| {
                let parts: Vec<&str> = path.split('/').collect();
                (parts.len() > 2).then(|| parts[1].to_string())
            })
            .collect();
        Ok(locales.into_iter().collect())
    }

    /// Warns about locales whose territory is not upper case.
    ///
    /// Returns `(locale, suggested)` pairs; nothing is renamed.
    pub fn validate_locales(&self, locales: &[String]) -> Vec<(String, String)> {
        let mut suggestions = Vec::new();
        for locale in locales {
            let mut parts: Vec<String> = locale.split('_').map(String::from).collect();
            if parts.len() < 2 || parts[1] == parts[1].to_uppercase() {
                continue;
            }
            parts[1] = parts[1].to_uppercase();
            let suggested = parts.join("_");
            warn!(
                "WARNING: Locale using incorrect case: {} -> {} (rename directory to fix)",
                locale, suggested
            );
            suggestions.push((locale.clone(), suggested));
        }
        suggestions
    }

    /// Compiles every locale catalog whose artifact is stale, or all of them
    /// with `force`. A failing locale does not stop the others.
    pub fn compile(&mut self, force: bool, use_fuzzy: bool) -> Result<CompileReport> {
        self.clear_gettext_cache();
        let locales = self.list_locales()?;
        self.validate_locales(&locales);

        let mut report = CompileReport::default();
        for locale in locales {
            let pod_path = locale_catalog_path(&locale, DEFAULT_BASENAME, None);
            let catalog = Catalog::at_path(Some(&locale), pod_path);
            if !catalog.exists(&self.pod) {
                info!("Does not exist: {}", catalog);
                report.missing.push(locale);
                continue;
            }
            if !force && !catalog.needs_compilation(&self.pod) {
                report.fresh.push(locale);
                continue;
            }
            match catalog.compile(&self.pod, use_fuzzy) {
                Ok(()) => report.compiled.push(locale),
                Err(e) => {
                    warn!("{}", e);
                    report.failed.push((locale, e));
                }
            }
        }
        Ok(report)
    }

    /// Seeds each locale catalog from the template.
    pub fn init(&self, locales: &[String], write: &WriteOptions) -> Result<Vec<Catalog>> {
        let mut catalogs = Vec::new();
        for locale in locales {
            let pod_path = locale_catalog_path(locale, DEFAULT_BASENAME, None);
            let mut catalog = Catalog::at_path(Some(locale), pod_path);
            catalog.init(&self.pod, &self.template_path, write)?;
            catalogs.push(catalog);
        }
        Ok(catalogs)
    }

    /// Reconciles each locale catalog with the template.
    pub fn update(
        &self,
        locales: &[String],
        update: &UpdateOptions,
        write: &WriteOptions,
    ) -> Result<Vec<(String, UpdateStats)>> {
        let mut results = Vec::new();
        for locale in locales {
            info!("Updating: {}", locale);
            let mut catalog = self.get(locale, None, None)?;
            let stats = catalog.update(&self.pod, &self.template_path, update, write)?;
            results.push((locale.clone(), stats));
        }
        Ok(results)
    }

    pub fn extract(&self, options: &ExtractOptions) -> Result<ExtractReport> {
        extract(&self.pod, &self.template_path, options)
    }

    /// Writes the untranslated messages of each locale, either one catalog
    /// per locale under `out_dir` or a single merged catalog at `out_path`.
    pub fn filter(&self, options: &FilterOptions) -> Result<Vec<Catalog>> {
        if options.localized && options.out_dir.is_none() {
            return Err(CatalogError::usage(
                "Must specify --out-dir when using --localized in order to generate localized catalogs.",
            ));
        }
        let out_path = match (&options.out_path, options.localized) {
            (Some(path), false) => Some(path.as_str()),
            (None, false) => {
                return Err(CatalogError::usage("Must specify -o when not using --localized."));
            }
            (_, true) => None,
        };
        let locales = match &options.locales {
            Some(locales) => locales.clone(),
            None => self.list_locales()?,
        };

        let mut filtered_catalogs = Vec::new();
        let mut merged = Catalog::at_path(None, out_path.unwrap_or_default());
        for locale in &locales {
            let catalog = self.get(locale, None, None)?;
            let missing = catalog.list_untranslated(options.paths.as_ref());
            let total = catalog.len();

            if !options.localized {
                for message in missing {
                    merged.add(message.clone());
                }
                continue;
            }

            let mut filtered = self.get(locale, None, options.out_dir.as_deref())?;
            let num_missing = missing.len();
            for message in missing {
                filtered.add(message.clone());
            }
            if filtered.is_empty() {
                info!("Skipping: {} (0 missing of {})", filtered, total);
            } else {
                info!("Saving: {} ({} missing of {})", filtered, num_missing, total);
                filtered.save(&self.pod, &options.write)?;
            }
            filtered_catalogs.push(filtered);
        }

        if options.localized {
            return Ok(filtered_catalogs);
        }
        let write = WriteOptions {
            include_obsolete: false,
            sort: SortOrder::ByFile,
            ..options.write
        };
        merged.save(&self.pod, &write)?;
        info!("Saved: {} ({} messages)", merged, merged.len());
        Ok(vec![merged])
    }

    /// Pod path of the compiled artifact used for `locale`, if any.
    pub fn find_mo_file(&self, locale: &str) -> Option<String> {
        expand_locale(locale)
            .into_iter()
            .map(|identifier| locale_catalog_path(&identifier, COMPILED_BASENAME, None))
            .find(|path| self.pod.file_exists(path))
    }

    /// Compiled translations for `locale`, loaded once and cached.
    ///
    /// Without a compiled artifact this is the identity translator.
    pub fn get_gettext_translations(&mut self, locale: &str) -> Result<Rc<Translations>> {
        if let Some(translations) = self.gettext_translations.get(locale) {
            return Ok(Rc::clone(translations));
        }
        let translations = match self.find_mo_file(locale) {
            Some(path) => Translations::from_mo_bytes(&self.pod.read_bytes(&path)?)?,
            None => Translations::null(),
        };
        let translations = Rc::new(translations);
        self.gettext_translations
            .insert(locale.to_string(), Rc::clone(&translations));
        Ok(translations)
    }

    pub fn clear_gettext_cache(&mut self) {
        self.gettext_translations.clear();
    }

    /// Compiles persisted-form `content` in memory and serves it for
    /// `locale` until the cache is cleared. Nothing is written to disk.
    pub fn inject_translations(&mut self, locale: &str, content: &str) -> Result<()> {
        let catalog = Catalog::from_po(content, "<injected>", Some(locale))?;
        let translations = Translations::from_mo_bytes(&catalog.to_mo_bytes(false))?;
        self.gettext_translations
            .insert(locale.to_string(), Rc::new(translations));
        info!("Injected translations -> {}", locale);
        Ok(())
    }

    /// Copies translations from external persisted-form `content` into the
    /// catalog for `locale` and saves it. Returns the number imported.
    pub fn import_translations(
        &self,
        content: &str,
        source: &str,
        locale: &str,
        write: &WriteOptions,
    ) -> Result<usize> {
        let external = Catalog::from_po(content, source, Some(locale))?;
        let mut catalog = self.get(locale, None, None)?;

        let mut imported = 0;
        for message in external.iter().filter(|m| !m.obsolete && m.is_translated()) {
            match catalog.get_mut(&message.id, message.context.as_deref()) {
                Some(existing) => {
                    existing.string = message.string.clone();
                    existing.obsolete = false;
                    if message.is_fuzzy() {
                        existing.flags.insert(FUZZY_FLAG.to_string());
                    } else {
                        existing.flags.remove(FUZZY_FLAG);
                    }
                }
                None => {
                    catalog.add(message.clone());
                }
            }
            imported += 1;
        }

        catalog.save(&self.pod, write)?;
        info!("Imported: {} translations -> {}", imported, catalog);
        Ok(imported)
    }

    /// Translation progress of every existing locale catalog.
    pub fn stats(&self) -> Result<Vec<LocaleStats>> {
        let mut stats = Vec::new();
        for locale in self.list_locales()? {
            let catalog = self.get(&locale, None, None)?;
            let Some(pod_path) = catalog.pod_path().filter(|_| catalog.exists(&self.pod)) else {
                continue;
            };
            stats.push(LocaleStats {
                locale: locale.clone(),
                pod_path: pod_path.to_string(),
                translated: catalog.translated_count(),
                fuzzy: catalog.fuzzy_count(),
                total: catalog.len(),
            });
        }
        Ok(stats)
    }
}
