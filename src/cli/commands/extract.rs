use anyhow::{Context, Result};

use super::{CommandKind, CommandResult, CommandSummary, helper::finish};
use crate::{
    cli::args::{CommonArgs, ExtractCommand},
    core::{
        context::{CatalogContext, path_filter},
        extract::ExtractOptions,
    },
};

pub fn extract(common: &CommonArgs, cmd: ExtractCommand) -> Result<CommandResult> {
    let ctx = CatalogContext::new(common)?;

    let options = ExtractOptions {
        localized: cmd.localized,
        paths: path_filter(&cmd.paths)?,
        locales: (!cmd.locales.is_empty()).then_some(cmd.locales),
        ignores: ctx.ignores()?,
        translatable_extensions: ctx.config.translatable_extensions.clone(),
        update: ctx.update_options(
            cmd.merge.include_obsolete,
            cmd.merge.fuzzy_matching,
            cmd.merge.fuzzy_cutoff,
        ),
        write: ctx.write_options(cmd.write.include_header, cmd.merge.include_obsolete),
    };

    let report = ctx
        .catalogs
        .extract(&options)
        .context("Extraction failed")?;

    Ok(finish(
        CommandKind::Extract,
        CommandSummary::Extract(report),
        0,
        true,
    ))
}
