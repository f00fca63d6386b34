use std::fs;

use anyhow::{Context, Result};

use super::{CommandKind, CommandResult, CommandSummary, ImportSummary, helper::finish};
use crate::{
    cli::args::{CommonArgs, ImportCommand},
    core::context::CatalogContext,
};

pub fn import(common: &CommonArgs, cmd: ImportCommand) -> Result<CommandResult> {
    let ctx = CatalogContext::new(common)?;

    let source = cmd.source.display().to_string();
    let content = fs::read_to_string(&cmd.source)
        .with_context(|| format!("Failed to read {}", source))?;

    let write = ctx.write_options(cmd.write.include_header, false);
    let imported = ctx
        .catalogs
        .import_translations(&content, &source, &cmd.locale, &write)?;

    Ok(finish(
        CommandKind::Import,
        CommandSummary::Import(ImportSummary {
            source,
            locale: cmd.locale,
            imported,
        }),
        0,
        true,
    ))
}
