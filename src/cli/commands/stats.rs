use anyhow::Result;

use super::{CommandKind, CommandResult, CommandSummary, helper::finish};
use crate::{cli::args::CommonArgs, core::context::CatalogContext};

pub fn stats(common: &CommonArgs) -> Result<CommandResult> {
    let ctx = CatalogContext::new(common)?;
    let stats = ctx.catalogs.stats()?;

    Ok(finish(
        CommandKind::Stats,
        CommandSummary::Stats(stats),
        0,
        false,
    ))
}
