use anyhow::{Context, Result};

use super::{CommandKind, CommandResult, CommandSummary, UpdateSummary, helper::finish};
use crate::{
    cli::args::{CommonArgs, UpdateCommand},
    core::context::CatalogContext,
};

pub fn update(common: &CommonArgs, cmd: UpdateCommand) -> Result<CommandResult> {
    let ctx = CatalogContext::new(common)?;
    let locales = ctx.locales_or_default(&cmd.locales)?;

    let options = ctx.update_options(
        cmd.merge.include_obsolete,
        cmd.merge.fuzzy_matching,
        cmd.merge.fuzzy_cutoff,
    );
    let write = ctx.write_options(cmd.write.include_header, cmd.merge.include_obsolete);
    let results = ctx
        .catalogs
        .update(&locales, &options, &write)
        .with_context(|| format!("Failed to update from {}", ctx.catalogs.template_path()))?;

    Ok(finish(
        CommandKind::Update,
        CommandSummary::Update(UpdateSummary { locales: results }),
        0,
        true,
    ))
}
