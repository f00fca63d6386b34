use crate::core::{CompileReport, ExtractReport, LocaleStats, UpdateStats};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Extract,
    Init,
    Update,
    Compile,
    Filter,
    Import,
    Stats,
    InitConfig,
}

#[derive(Debug)]
pub enum CommandSummary {
    Extract(ExtractReport),
    Init(InitSummary),
    Update(UpdateSummary),
    Compile(CompileReport),
    Filter(FilterSummary),
    Import(ImportSummary),
    Stats(Vec<LocaleStats>),
    InitConfig(InitConfigSummary),
}

/// One catalog written by `init` or `filter`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenCatalog {
    pub locale: Option<String>,
    pub pod_path: String,
    pub messages: usize,
}

#[derive(Debug)]
pub struct InitSummary {
    pub catalogs: Vec<WrittenCatalog>,
}

#[derive(Debug)]
pub struct UpdateSummary {
    pub locales: Vec<(String, UpdateStats)>,
}

#[derive(Debug)]
pub struct FilterSummary {
    pub catalogs: Vec<WrittenCatalog>,
}

#[derive(Debug)]
pub struct ImportSummary {
    pub source: String,
    pub locale: String,
    pub imported: usize,
}

#[derive(Debug)]
pub struct InitConfigSummary {
    /// Set when the config file already existed.
    pub error: Option<String>,
}

/// Result of running podcat commands
pub struct CommandResult {
    pub kind: CommandKind,
    pub summary: CommandSummary,
    pub error_count: usize,
    pub warning_count: usize,
    /// If true, exit code 1 should be returned when error_count > 0.
    pub exit_on_errors: bool,
}
