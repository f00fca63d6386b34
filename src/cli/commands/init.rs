use anyhow::{Context, Result, bail};

use super::{
    CommandKind, CommandResult, CommandSummary, InitSummary,
    helper::{finish, written},
};
use crate::{
    cli::args::{CommonArgs, InitCommand},
    core::context::CatalogContext,
};

pub fn init(common: &CommonArgs, cmd: InitCommand) -> Result<CommandResult> {
    let ctx = CatalogContext::new(common)?;
    let locales = ctx.locales_or_default(&cmd.locales)?;
    if locales.is_empty() {
        bail!("No locales to initialize. Pass --locale or list locales in podspec.yaml.");
    }

    let write = ctx.write_options(cmd.write.include_header, false);
    let catalogs = ctx
        .catalogs
        .init(&locales, &write)
        .with_context(|| format!("Failed to initialize from {}", ctx.catalogs.template_path()))?;

    Ok(finish(
        CommandKind::Init,
        CommandSummary::Init(InitSummary {
            catalogs: catalogs.iter().map(written).collect(),
        }),
        0,
        true,
    ))
}
