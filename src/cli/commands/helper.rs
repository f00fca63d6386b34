use super::{CommandKind, CommandResult, CommandSummary, WrittenCatalog};
use crate::core::Catalog;

pub fn finish(
    kind: CommandKind,
    summary: CommandSummary,
    warning_count: usize,
    exit_on_errors: bool,
) -> CommandResult {
    let error_count = match &summary {
        CommandSummary::Compile(report) => report.failed.len(),
        CommandSummary::InitConfig(summary) if summary.error.is_some() => 1,
        _ => 0,
    };

    CommandResult {
        kind,
        summary,
        error_count,
        warning_count,
        exit_on_errors,
    }
}

pub fn written(catalog: &Catalog) -> WrittenCatalog {
    WrittenCatalog {
        locale: catalog.locale().map(String::from),
        pod_path: catalog.pod_path().unwrap_or_default().to_string(),
        messages: catalog.len(),
    }
}
