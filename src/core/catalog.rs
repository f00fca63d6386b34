//! A message catalog for one locale, or the language-neutral template.
//!
//! The catalog owns the merge rules that protect translator work:
//!
//! - [`Catalog::add`] is an upsert that merges into an existing entry and
//!   never replaces a translation with a blank one.
//! - [`Catalog::update_using_catalog`] reconciles a persisted catalog with a
//!   fresh extraction, retaining translations, tracking obsolete entries and
//!   optionally carrying translations over by fuzzy matching.

use std::collections::HashSet;

use indexmap::{IndexMap, map::Entry};
use tracing::{debug, info};

use crate::core::{
    data::{FUZZY_FLAG, Message, MessageKey},
    error::{CatalogError, Result},
    fuzzy,
    parsers::{
        mo::{encode_key, write_mo},
        po::{HeaderFields, WriteOptions, parse_po, write_po},
    },
    pod::Pod,
    utils::PathFilter,
};

pub const TRANSLATIONS_ROOT: &str = "/translations";
pub const DEFAULT_BASENAME: &str = "messages.po";
pub const TEMPLATE_BASENAME: &str = "messages.pot";
pub const COMPILED_BASENAME: &str = "messages.mo";

/// Pod path of a locale catalog: `<dir>/<locale>/LC_MESSAGES/<basename>`.
pub fn locale_catalog_path(locale: &str, basename: &str, dir_path: Option<&str>) -> String {
    let dir = dir_path.unwrap_or(TRANSLATIONS_ROOT).trim_end_matches('/');
    format!("{}/{}/LC_MESSAGES/{}", dir, locale, basename)
}

/// Options for [`Catalog::update_using_catalog`].
#[derive(Debug, Clone, Copy)]
pub struct UpdateOptions {
    /// Keep dropped ids as obsolete entries instead of removing them.
    pub include_obsolete: bool,
    /// Carry translations of dropped ids over to similar new ids.
    pub use_fuzzy_matching: bool,
    pub fuzzy_cutoff: f32,
}

impl Default for UpdateOptions {
    fn default() -> Self {
        Self {
            include_obsolete: false,
            use_fuzzy_matching: false,
            fuzzy_cutoff: fuzzy::DEFAULT_CUTOFF,
        }
    }
}

/// What an update did to the catalog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateStats {
    pub added: usize,
    pub updated: usize,
    pub fuzzy: usize,
    pub obsolete: usize,
    pub removed: usize,
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    locale: Option<String>,
    pod_path: Option<String>,
    header: HeaderFields,
    messages: IndexMap<MessageKey, Message>,
}

impl Catalog {
    /// An in-memory catalog with no backing file.
    pub fn scratch(locale: Option<&str>) -> Self {
        Self {
            locale: locale.map(String::from),
            ..Default::default()
        }
    }

    /// A catalog backed by `pod_path`. Nothing is read until [`Catalog::load`].
    pub fn at_path(locale: Option<&str>, pod_path: impl Into<String>) -> Self {
        Self {
            locale: locale.map(String::from),
            pod_path: Some(pod_path.into()),
            ..Default::default()
        }
    }

    /// Parses persisted text into a catalog without a backing file.
    pub fn from_po(content: &str, source: &str, locale: Option<&str>) -> Result<Self> {
        let parsed = parse_po(content, source)?;
        let mut catalog = Self::scratch(locale);
        catalog.header = parsed.header;
        for message in parsed.messages {
            catalog.add(message);
        }
        Ok(catalog)
    }

    /// Opens a catalog at `pod_path`, loading it when the file exists.
    pub fn open(pod: &Pod, locale: Option<&str>, pod_path: &str) -> Result<Self> {
        let mut catalog = Self::at_path(locale, pod_path);
        if catalog.exists(pod) {
            catalog.load(pod)?;
        }
        Ok(catalog)
    }

    pub fn locale(&self) -> Option<&str> {
        self.locale.as_deref()
    }

    pub fn pod_path(&self) -> Option<&str> {
        self.pod_path.as_deref()
    }

    pub fn header(&self) -> &HeaderFields {
        &self.header
    }

    /// Number of active (non-obsolete) messages.
    pub fn len(&self) -> usize {
        self.messages.values().filter(|m| !m.obsolete).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn obsolete_count(&self) -> usize {
        self.messages.values().filter(|m| m.obsolete).count()
    }

    pub fn translated_count(&self) -> usize {
        self.messages
            .values()
            .filter(|m| !m.obsolete && m.is_translated())
            .count()
    }

    pub fn fuzzy_count(&self) -> usize {
        self.messages
            .values()
            .filter(|m| !m.obsolete && m.is_fuzzy())
            .count()
    }

    /// All entries, obsolete ones included, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.messages.values()
    }

    pub fn get(&self, id: &str, context: Option<&str>) -> Option<&Message> {
        self.messages
            .get(&MessageKey::new(id, context.map(String::from)))
    }

    pub fn get_mut(&mut self, id: &str, context: Option<&str>) -> Option<&mut Message> {
        self.messages
            .get_mut(&MessageKey::new(id, context.map(String::from)))
    }

    pub fn contains(&self, id: &str, context: Option<&str>) -> bool {
        self.get(id, context).is_some()
    }

    /// Inserts `message`, or merges it into the entry with the same id and
    /// context.
    ///
    /// Merging appends new locations and comments, unions flags, and keeps
    /// the existing translation unless it is blank.
    pub fn add(&mut self, message: Message) -> &mut Message {
        match self.messages.entry(message.key()) {
            Entry::Occupied(entry) => {
                let existing = entry.into_mut();
                existing.merge_in(&message);
                if !existing.is_translated() && message.is_translated() {
                    existing.string = message.string;
                }
                existing.flags.extend(message.flags);
                existing.obsolete = existing.obsolete && message.obsolete;
                existing
            }
            Entry::Vacant(entry) => entry.insert(message),
        }
    }

    /// Reconciles this (persisted) catalog with a freshly extracted one.
    ///
    /// - ids only in `new_catalog` are appended untranslated, in its order
    /// - ids in both keep this catalog's translation and flags, and take
    ///   locations and auto comments from `new_catalog`
    /// - ids only in this catalog become obsolete, or are removed when
    ///   obsolete entries are not kept
    ///
    /// With fuzzy matching, a new id first tries to adopt the translation of
    /// the most similar dropped id; the adopted entry is flagged fuzzy and the
    /// dropped one disappears.
    pub fn update_using_catalog(
        &mut self,
        new_catalog: &Catalog,
        options: &UpdateOptions,
    ) -> UpdateStats {
        let mut stats = UpdateStats::default();

        let dropped: Vec<MessageKey> = self
            .messages
            .keys()
            .filter(|key| !new_catalog.messages.get(*key).is_some_and(|m| !m.obsolete))
            .cloned()
            .collect();
        let mut fuzzy_pool: Vec<MessageKey> = if options.use_fuzzy_matching {
            dropped
                .iter()
                .filter(|key| self.messages[*key].is_translated())
                .cloned()
                .collect()
        } else {
            Vec::new()
        };
        let mut consumed: HashSet<MessageKey> = HashSet::new();

        for (key, incoming) in &new_catalog.messages {
            if incoming.obsolete {
                continue;
            }

            if let Some(existing) = self.messages.get_mut(key) {
                existing.locations = incoming.locations.clone();
                existing.auto_comments = incoming.auto_comments.clone();
                existing.obsolete = false;
                stats.updated += 1;
                continue;
            }

            let mut message = Message {
                string: None,
                user_comments: Vec::new(),
                obsolete: false,
                ..incoming.clone()
            };
            message.flags.remove(FUZZY_FLAG);

            let matched = if options.use_fuzzy_matching {
                let eligible: Vec<usize> = fuzzy_pool
                    .iter()
                    .enumerate()
                    .filter(|(_, candidate)| candidate.context == key.context)
                    .map(|(index, _)| index)
                    .collect();
                fuzzy::best_match(
                    &key.id,
                    eligible.iter().map(|&i| fuzzy_pool[i].id.as_str()),
                    options.fuzzy_cutoff,
                )
                .map(|pos| fuzzy_pool.remove(eligible[pos]))
            } else {
                None
            };

            match matched.and_then(|old_key| self.messages.get(&old_key).map(|old| (old_key, old))) {
                Some((old_key, old)) => {
                    debug!("Fuzzy match: {:?} -> {:?}", old_key.id, key.id);
                    message.string = old.string.clone();
                    message.user_comments = old.user_comments.clone();
                    message.flags.extend(old.flags.iter().cloned());
                    message.flags.insert(FUZZY_FLAG.to_string());
                    consumed.insert(old_key);
                    stats.fuzzy += 1;
                }
                None => stats.added += 1,
            }
            self.messages.insert(key.clone(), message);
        }

        for key in dropped {
            if consumed.contains(&key) || !options.include_obsolete {
                self.messages.shift_remove(&key);
                if !consumed.contains(&key) {
                    stats.removed += 1;
                }
                continue;
            }
            if let Some(message) = self.messages.get_mut(&key)
                && !message.obsolete
            {
                message.obsolete = true;
                stats.obsolete += 1;
            }
        }

        stats
    }

    /// Active messages without a translation, optionally restricted to those
    /// with a location matched by `paths`.
    pub fn list_untranslated(&self, paths: Option<&PathFilter>) -> Vec<&Message> {
        self.messages
            .values()
            .filter(|m| !m.obsolete && !m.is_translated())
            .filter(|m| {
                paths.is_none_or(|filter| m.locations.iter().any(|loc| filter.matches(&loc.path)))
            })
            .collect()
    }

    // ============================================================
    // Persistence
    // ============================================================

    fn require_path(&self) -> Result<&str> {
        self.pod_path
            .as_deref()
            .ok_or_else(|| CatalogError::usage("Catalog has no file path"))
    }

    pub fn exists(&self, pod: &Pod) -> bool {
        self.pod_path.as_deref().is_some_and(|p| pod.file_exists(p))
    }

    /// Replaces the in-memory entries with the persisted ones.
    pub fn load(&mut self, pod: &Pod) -> Result<()> {
        let path = self.require_path()?.to_string();
        let content = pod.read_file(&path)?;
        let loaded = Self::from_po(&content, &path, self.locale())?;
        self.header = loaded.header;
        self.messages = loaded.messages;
        Ok(())
    }

    pub fn save(&self, pod: &Pod, options: &WriteOptions) -> Result<()> {
        let path = self.require_path()?;
        pod.write_file(path, write_po(self, options))?;
        debug!("Wrote: {} ({} messages)", path, self.len());
        Ok(())
    }

    /// Pod path of the compiled artifact next to this catalog.
    pub fn compiled_pod_path(&self) -> Option<String> {
        let path = self.pod_path.as_deref()?;
        let dir = path.rsplit_once('/').map(|(dir, _)| dir).unwrap_or("");
        Some(format!("{}/{}", dir, COMPILED_BASENAME))
    }

    /// True when the compiled artifact is missing or older than the catalog.
    pub fn needs_compilation(&self, pod: &Pod) -> bool {
        let (Some(source), Some(compiled)) = (self.pod_path.as_deref(), self.compiled_pod_path())
        else {
            return false;
        };
        match (pod.modified(source), pod.modified(&compiled)) {
            (_, None) => true,
            (Some(source_time), Some(compiled_time)) => source_time > compiled_time,
            (None, Some(_)) => false,
        }
    }

    /// Serializes translated, non-obsolete entries into the compiled form.
    /// Fuzzy entries are skipped unless `use_fuzzy`.
    pub fn to_mo_bytes(&self, use_fuzzy: bool) -> Vec<u8> {
        let mut entries = vec![(String::new(), self.compiled_header())];
        entries.extend(
            self.messages
                .values()
                .filter(|m| !m.obsolete && m.is_translated())
                .filter(|m| use_fuzzy || !m.is_fuzzy())
                .map(|m| {
                    (
                        encode_key(m.context.as_deref(), &m.id),
                        m.string.clone().unwrap_or_default(),
                    )
                }),
        );
        write_mo(&entries)
    }

    fn compiled_header(&self) -> String {
        let mut fields = self.header.clone();
        if let Some(locale) = &self.locale {
            fields.insert("Language".into(), locale.clone());
        }
        fields.insert("Content-Type".into(), "text/plain; charset=UTF-8".into());
        fields
            .iter()
            .map(|(key, value)| format!("{}: {}\n", key, value))
            .collect()
    }

    /// Re-reads the persisted catalog and writes its compiled artifact.
    pub fn compile(&self, pod: &Pod, use_fuzzy: bool) -> Result<()> {
        let path = self.require_path()?;
        let compiled_path = self
            .compiled_pod_path()
            .ok_or_else(|| CatalogError::usage("Catalog has no file path"))?;

        let source = pod
            .read_file(path)
            .and_then(|content| Self::from_po(&content, path, self.locale()))
            .map_err(|e| CatalogError::compile(path, e))?;

        pod.write_file(&compiled_path, source.to_mo_bytes(use_fuzzy))?;
        info!(
            "Compiled: {} ({}/{} translated)",
            compiled_path,
            source.translated_count(),
            source.len()
        );
        Ok(())
    }

    /// Replaces this catalog with the template's ids, all untranslated, and
    /// saves it.
    pub fn init(&mut self, pod: &Pod, template_path: &str, options: &WriteOptions) -> Result<()> {
        let template = Self::open(pod, None, template_path)?;
        self.header.clear();
        self.messages = template
            .messages
            .into_iter()
            .filter(|(_, m)| !m.obsolete)
            .map(|(key, mut message)| {
                message.string = None;
                message.flags.remove(FUZZY_FLAG);
                (key, message)
            })
            .collect();
        self.save(pod, options)?;
        info!(
            "Created: {} ({} messages)",
            self.pod_path.as_deref().unwrap_or_default(),
            self.len()
        );
        Ok(())
    }

    /// Loads this catalog (if persisted), reconciles it with the template
    /// and saves it.
    pub fn update(
        &mut self,
        pod: &Pod,
        template_path: &str,
        update: &UpdateOptions,
        write: &WriteOptions,
    ) -> Result<UpdateStats> {
        if self.exists(pod) {
            self.load(pod)?;
        }
        let template = Self::open(pod, None, template_path)?;
        let stats = self.update_using_catalog(&template, update);
        self.save(pod, write)?;
        Ok(stats)
    }
}

impl std::fmt::Display for Catalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.pod_path, &self.locale) {
            (Some(path), _) => write!(f, "{}", path),
            (None, Some(locale)) => write!(f, "<catalog {}>", locale),
            (None, None) => write!(f, "<template catalog>"),
        }
    }
}
