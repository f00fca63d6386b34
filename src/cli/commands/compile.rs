use anyhow::Result;

use super::{CommandKind, CommandResult, CommandSummary, helper::finish};
use crate::{
    cli::args::{CommonArgs, CompileCommand},
    core::context::CatalogContext,
};

pub fn compile(common: &CommonArgs, cmd: CompileCommand) -> Result<CommandResult> {
    let mut ctx = CatalogContext::new(common)?;
    let use_fuzzy = cmd.fuzzy || ctx.config.compile_fuzzy;

    let report = ctx.catalogs.compile(cmd.force, use_fuzzy)?;
    let warning_count = report.missing.len();

    Ok(finish(
        CommandKind::Compile,
        CommandSummary::Compile(report),
        warning_count,
        true,
    ))
}
