use anyhow::Result;

use super::{
    CommandKind, CommandResult, CommandSummary, FilterSummary,
    helper::{finish, written},
};
use crate::{
    cli::args::{CommonArgs, FilterCommand},
    core::{
        catalogs::FilterOptions,
        context::{CatalogContext, path_filter},
    },
};

pub fn filter(common: &CommonArgs, cmd: FilterCommand) -> Result<CommandResult> {
    let ctx = CatalogContext::new(common)?;

    let options = FilterOptions {
        out_path: cmd.out_path,
        out_dir: cmd.out_dir,
        localized: cmd.localized,
        paths: path_filter(&cmd.paths)?,
        locales: (!cmd.locales.is_empty()).then_some(cmd.locales),
        write: ctx.write_options(cmd.write.include_header, false),
    };
    let catalogs = ctx.catalogs.filter(&options)?;

    Ok(finish(
        CommandKind::Filter,
        CommandSummary::Filter(FilterSummary {
            catalogs: catalogs.iter().map(written).collect(),
        }),
        0,
        true,
    ))
}
