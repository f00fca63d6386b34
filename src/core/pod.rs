//! File access rooted at a pod directory.
//!
//! Every path handed to `Pod` is a pod path: absolute within the pod
//! (e.g. "/translations/de/LC_MESSAGES/messages.po") and resolved against
//! the pod root on disk.

use std::{
    fs, io,
    path::{Path, PathBuf},
    time::SystemTime,
};

use indexmap::IndexMap;
use serde_yaml::Value;
use walkdir::WalkDir;

use crate::core::error::{CatalogError, Result};

pub const PODSPEC_PATH: &str = "/podspec.yaml";

/// One CSV row, keyed by header column.
pub type CsvRow = IndexMap<String, String>;

#[derive(Debug, Clone)]
pub struct Pod {
    root: PathBuf,
}

impl Pod {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves a pod path to a path on disk.
    pub fn abs_path(&self, pod_path: &str) -> PathBuf {
        self.root.join(pod_path.trim_start_matches('/'))
    }

    /// Lists files under `pod_path`, relative to it and prefixed with `/`.
    ///
    /// A missing directory lists as empty.
    pub fn list_dir(&self, pod_path: &str, recursive: bool) -> Result<Vec<String>> {
        let dir = self.abs_path(pod_path);
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let max_depth = if recursive { usize::MAX } else { 1 };
        let mut paths = Vec::new();
        for entry in WalkDir::new(&dir)
            .min_depth(1)
            .max_depth(max_depth)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| CatalogError::io(pod_path, io::Error::from(e)))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let Ok(relative) = entry.path().strip_prefix(&dir) else {
                continue;
            };
            let parts: Vec<String> = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy().to_string())
                .collect();
            paths.push(format!("/{}", parts.join("/")));
        }
        Ok(paths)
    }

    pub fn file_exists(&self, pod_path: &str) -> bool {
        self.abs_path(pod_path).is_file()
    }

    pub fn read_file(&self, pod_path: &str) -> Result<String> {
        fs::read_to_string(self.abs_path(pod_path)).map_err(|e| CatalogError::io(pod_path, e))
    }

    pub fn read_bytes(&self, pod_path: &str) -> Result<Vec<u8>> {
        fs::read(self.abs_path(pod_path)).map_err(|e| CatalogError::io(pod_path, e))
    }

    /// Writes a file, creating parent directories as needed.
    pub fn write_file(&self, pod_path: &str, content: impl AsRef<[u8]>) -> Result<()> {
        let path = self.abs_path(pod_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| CatalogError::io(pod_path, e))?;
        }
        fs::write(&path, content).map_err(|e| CatalogError::io(pod_path, e))
    }

    pub fn modified(&self, pod_path: &str) -> Option<SystemTime> {
        fs::metadata(self.abs_path(pod_path))
            .and_then(|m| m.modified())
            .ok()
    }

    pub fn read_yaml(&self, pod_path: &str) -> Result<Value> {
        let content = self.read_file(pod_path)?;
        parse_yaml(&content, pod_path)
    }

    /// Reads a CSV file with a header row.
    pub fn read_csv(&self, pod_path: &str) -> Result<Vec<CsvRow>> {
        let content = self.read_bytes(pod_path)?;
        let csv_error = |source| CatalogError::Csv {
            path: pod_path.to_string(),
            source,
        };

        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(content.as_slice());
        let headers = reader.headers().map_err(csv_error)?.clone();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(csv_error)?;
            let row: CsvRow = headers
                .iter()
                .zip(record.iter())
                .map(|(key, value)| (key.to_string(), value.to_string()))
                .collect();
            rows.push(row);
        }
        Ok(rows)
    }

    /// Locales declared in `podspec.yaml` under `localization.locales`.
    pub fn list_locales(&self) -> Result<Vec<String>> {
        if !self.file_exists(PODSPEC_PATH) {
            return Ok(Vec::new());
        }
        let podspec = self.read_yaml(PODSPEC_PATH)?;
        Ok(locales_of(podspec.get("localization")))
    }
}

/// Parses YAML text; an empty document parses as an empty mapping.
pub fn parse_yaml(content: &str, pod_path: &str) -> Result<Value> {
    if content.trim().is_empty() {
        return Ok(Value::Mapping(Default::default()));
    }
    serde_yaml::from_str(content).map_err(|source| CatalogError::Yaml {
        path: pod_path.to_string(),
        source,
    })
}

/// Reads `locales: [...]` from a localization block.
pub fn locales_of(localization: Option<&Value>) -> Vec<String> {
    localization
        .and_then(|l| l.get("locales"))
        .and_then(Value::as_sequence)
        .map(|seq| {
            seq.iter()
                .filter_map(Value::as_str)
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}
