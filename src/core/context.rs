use std::path::PathBuf;

use anyhow::{Context as _, Result, bail};
use tracing::debug;

use crate::{
    cli::args::CommonArgs,
    config::{CONFIG_FILE_NAME, Config, load_config},
    core::{
        catalog::UpdateOptions,
        catalogs::CatalogSet,
        parsers::po::{SortOrder, WriteOptions},
        pod::Pod,
        utils::PathFilter,
    },
};

/// Everything a command needs to work on one pod.
///
/// # Configuration Priority
///
/// Settings are merged with the following priority (highest to lowest):
/// 1. CLI arguments (e.g., `--template-path`, `--include-obsolete`)
/// 2. `.podcatrc.json` config file
/// 3. Built-in defaults
pub struct CatalogContext {
    /// Merged configuration (CLI args > config file > defaults).
    pub config: Config,

    /// Pod root directory on disk.
    pub pod_root: PathBuf,

    pub verbose: bool,

    pub catalogs: CatalogSet,
}

impl CatalogContext {
    /// Loads the configuration for the pod named by `common_args`.
    ///
    /// # Errors
    ///
    /// Returns error if the pod root is not a directory or the config file
    /// is invalid.
    pub fn new(common_args: &CommonArgs) -> Result<Self> {
        let pod_root = common_args
            .pod_root
            .clone()
            .unwrap_or_else(|| PathBuf::from("."));
        if !pod_root.is_dir() {
            bail!("Pod root is not a directory: {}", pod_root.display());
        }

        let config_result = load_config(&pod_root)
            .with_context(|| format!("Failed to load config for {}", pod_root.display()))?;
        if !config_result.from_file {
            debug!("No {} found, using default configuration", CONFIG_FILE_NAME);
        }

        let mut config = config_result.config;
        if let Some(template_path) = &common_args.template_path {
            config.template_path = template_path.clone();
        }
        config.validate()?;

        let catalogs = CatalogSet::new(Pod::new(pod_root.clone()), Some(&config.template_path));
        Ok(Self {
            config,
            pod_root,
            verbose: common_args.verbose,
            catalogs,
        })
    }

    pub fn pod(&self) -> &Pod {
        self.catalogs.pod()
    }

    pub fn write_options(&self, include_header: bool, include_obsolete: bool) -> WriteOptions {
        WriteOptions {
            include_header: include_header || self.config.include_header,
            include_obsolete: include_obsolete || self.config.include_obsolete,
            sort: if self.config.sort_by_file {
                SortOrder::ByFile
            } else {
                SortOrder::ById
            },
        }
    }

    pub fn update_options(&self, include_obsolete: bool, fuzzy: bool, cutoff: Option<f32>) -> UpdateOptions {
        UpdateOptions {
            include_obsolete: include_obsolete || self.config.include_obsolete,
            use_fuzzy_matching: fuzzy || self.config.use_fuzzy_matching,
            fuzzy_cutoff: cutoff.unwrap_or(self.config.fuzzy_cutoff),
        }
    }

    /// The given locales, or the pod's locales, or the locales that already
    /// have catalogs.
    pub fn locales_or_default(&self, given: &[String]) -> Result<Vec<String>> {
        if !given.is_empty() {
            return Ok(given.to_vec());
        }
        let pod_locales = self.pod().list_locales()?;
        if !pod_locales.is_empty() {
            return Ok(pod_locales);
        }
        Ok(self.catalogs.list_locales()?)
    }

    /// Ignore patterns from the config.
    pub fn ignores(&self) -> Result<Option<PathFilter>> {
        path_filter(&self.config.ignores)
    }
}

/// Builds a filter from CLI paths; no paths means no filtering.
pub fn path_filter(paths: &[String]) -> Result<Option<PathFilter>> {
    if paths.is_empty() {
        return Ok(None);
    }
    let filter = PathFilter::new(paths).context("Invalid path pattern")?;
    Ok(Some(filter))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use tempfile::tempdir;

    fn common(root: &std::path::Path) -> CommonArgs {
        CommonArgs {
            pod_root: Some(root.to_path_buf()),
            template_path: None,
            verbose: false,
        }
    }

    #[test]
    fn test_cli_overrides_config() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            r#"{ "templatePath": "/translations/site.pot", "includeObsolete": true }"#,
        )
        .unwrap();

        let ctx = CatalogContext::new(&common(dir.path())).unwrap();
        assert_eq!(ctx.catalogs.template_path(), "/translations/site.pot");
        assert!(ctx.write_options(false, false).include_obsolete);

        let args = CommonArgs {
            template_path: Some("/translations/other.pot".to_string()),
            ..common(dir.path())
        };
        let ctx = CatalogContext::new(&args).unwrap();
        assert_eq!(ctx.catalogs.template_path(), "/translations/other.pot");
    }

    #[test]
    fn test_update_options_merge() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();
        let ctx = CatalogContext::new(&common(dir.path())).unwrap();

        let options = ctx.update_options(false, true, None);
        assert!(options.use_fuzzy_matching);
        assert!(!options.include_obsolete);
        assert_eq!(options.fuzzy_cutoff, ctx.config.fuzzy_cutoff);
        assert_eq!(ctx.update_options(false, false, Some(0.9)).fuzzy_cutoff, 0.9);
    }

    #[test]
    fn test_locales_fallback_order() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();
        let ctx = CatalogContext::new(&common(dir.path())).unwrap();

        ctx.pod()
            .write_file("/translations/ja/LC_MESSAGES/messages.po", "")
            .unwrap();
        assert_eq!(ctx.locales_or_default(&[]).unwrap(), vec!["ja"]);

        ctx.pod()
            .write_file("/podspec.yaml", "localization:\n  locales: [de]\n")
            .unwrap();
        assert_eq!(ctx.locales_or_default(&[]).unwrap(), vec!["de"]);
        assert_eq!(
            ctx.locales_or_default(&["fr".to_string()]).unwrap(),
            vec!["fr"]
        );
    }

    #[test]
    fn test_missing_pod_root() {
        let dir = tempdir().unwrap();
        let result = CatalogContext::new(&common(&dir.path().join("missing")));
        assert!(result.is_err());
    }

    #[test]
    fn test_path_filter() {
        assert!(path_filter(&[]).unwrap().is_none());
        let filter = path_filter(&["/views/*.html".to_string()]).unwrap().unwrap();
        assert!(filter.matches("/views/base.html"));
        assert!(path_filter(&["[bad".to_string()]).is_err());
    }
}
