use std::{fs, path::PathBuf};

use anyhow::{Context, Result};

use super::{CommandKind, CommandResult, CommandSummary, InitConfigSummary, helper::finish};
use crate::{
    cli::args::CommonArgs,
    config::{CONFIG_FILE_NAME, default_config_json},
};

/// Writes the default config at the pod root; an existing file is reported,
/// never overwritten.
pub fn init_config(common: &CommonArgs) -> Result<CommandResult> {
    let root = common
        .pod_root
        .clone()
        .unwrap_or_else(|| PathBuf::from("."));
    let config_path = root.join(CONFIG_FILE_NAME);

    let error = if config_path.exists() {
        Some(format!("{} already exists", CONFIG_FILE_NAME))
    } else {
        fs::write(&config_path, default_config_json()?)
            .with_context(|| format!("Failed to write {}", config_path.display()))?;
        None
    };

    Ok(finish(
        CommandKind::InitConfig,
        CommandSummary::InitConfig(InitConfigSummary { error }),
        0,
        true,
    ))
}
