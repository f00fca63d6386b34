use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Ok, Result, bail};
use glob::Pattern;
use serde::{Deserialize, Serialize};

use crate::core::{catalogs::default_template_path, extract::DEFAULT_TRANSLATABLE_EXTENSIONS, fuzzy};

pub const CONFIG_FILE_NAME: &str = ".podcatrc.json";

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_template_path")]
    pub template_path: String,
    #[serde(default)]
    pub include_header: bool,
    #[serde(default)]
    pub include_obsolete: bool,
    #[serde(default)]
    pub use_fuzzy_matching: bool,
    #[serde(default = "default_fuzzy_cutoff")]
    pub fuzzy_cutoff: f32,
    #[serde(default)]
    pub sort_by_file: bool,
    #[serde(default)]
    pub compile_fuzzy: bool,
    #[serde(default = "default_translatable_extensions")]
    pub translatable_extensions: Vec<String>,
    #[serde(default)]
    pub ignores: Vec<String>,
}

fn default_fuzzy_cutoff() -> f32 {
    fuzzy::DEFAULT_CUTOFF
}

fn default_translatable_extensions() -> Vec<String> {
    DEFAULT_TRANSLATABLE_EXTENSIONS
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            template_path: default_template_path(),
            include_header: false,
            include_obsolete: false,
            use_fuzzy_matching: false,
            fuzzy_cutoff: default_fuzzy_cutoff(),
            sort_by_file: false,
            compile_fuzzy: false,
            translatable_extensions: default_translatable_extensions(),
            ignores: Vec::new(),
        }
    }
}

impl Config {
    /// Validate configuration values.
    ///
    /// Rejects invalid `ignores` globs, a `fuzzyCutoff` outside `(0, 1]` and a
    /// `templatePath` that is not a pod path.
    pub fn validate(&self) -> Result<()> {
        for pattern in &self.ignores {
            Pattern::new(pattern)
                .with_context(|| format!("Invalid glob pattern in 'ignores': \"{}\"", pattern))?;
        }

        if !(self.fuzzy_cutoff > 0.0 && self.fuzzy_cutoff <= 1.0) {
            bail!(
                "Invalid 'fuzzyCutoff': {} (expected a value in (0, 1])",
                self.fuzzy_cutoff
            );
        }

        if !self.template_path.starts_with('/') {
            bail!(
                "Invalid 'templatePath': \"{}\" (must start with '/')",
                self.template_path
            );
        }

        Ok(())
    }
}

pub fn default_config_json() -> Result<String> {
    let config = Config::default();
    serde_json::to_string_pretty(&config).context("Failed to generate default config.")
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Result of loading configuration.
pub struct ConfigLoadResult {
    pub config: Config,
    /// True if config was loaded from a file, false if using defaults.
    pub from_file: bool,
}

pub fn load_config(start_dir: &Path) -> Result<ConfigLoadResult> {
    match find_config_file(start_dir) {
        Some(path) => {
            let content = fs::read_to_string(&path)?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            config.validate()?;
            Ok(ConfigLoadResult {
                config,
                from_file: true,
            })
        }
        None => Ok(ConfigLoadResult {
            config: Config::default(),
            from_file: false,
        }),
    }
}
