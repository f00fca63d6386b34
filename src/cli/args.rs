//! CLI argument definitions using clap.
//!
//! This module defines the command-line interface structure for all podcat commands.
//! It uses clap's derive API for declarative argument parsing.
//!
//! ## Commands
//!
//! - `extract`: Extract messages into the template or locale catalogs
//! - `init`: Create locale catalogs from the template
//! - `update`: Merge the template into existing locale catalogs
//! - `compile`: Compile locale catalogs for runtime lookup
//! - `filter`: Write catalogs holding only untranslated messages
//! - `import`: Copy translations from an external PO file
//! - `stats`: Show translation progress per locale
//! - `init-config`: Initialize podcat configuration file

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(flatten)]
    pub common: CommonArgs,

    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }
}

/// Common arguments shared by all commands.
#[derive(Debug, Clone, Default, Args)]
pub struct CommonArgs {
    /// Pod root directory (default: current directory)
    #[arg(long, global = true, env = "PODCAT_POD_ROOT")]
    pub pod_root: Option<PathBuf>,

    /// Template catalog pod path (overrides config file)
    #[arg(long, global = true)]
    pub template_path: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Flags shared by commands that write catalogs.
#[derive(Debug, Clone, Default, Args)]
pub struct WriteArgs {
    /// Write the catalog header entry
    #[arg(long)]
    pub include_header: bool,
}

/// Flags shared by commands that merge a fresh catalog into an existing one.
#[derive(Debug, Clone, Default, Args)]
pub struct MergeArgs {
    /// Keep messages that disappeared as obsolete entries
    #[arg(long)]
    pub include_obsolete: bool,

    /// Carry translations over to similar new messages, marked fuzzy
    #[arg(long)]
    pub fuzzy_matching: bool,

    /// Minimum similarity for fuzzy matching, in (0, 1]
    #[arg(long)]
    pub fuzzy_cutoff: Option<f32>,
}

#[derive(Debug, Args)]
pub struct ExtractCommand {
    /// Merge into each locale catalog instead of the template
    #[arg(long)]
    pub localized: bool,

    /// Locales to save in localized mode (default: all)
    /// Can be specified multiple times: --locale de --locale fr
    #[arg(short, long = "locale")]
    pub locales: Vec<String>,

    /// Only extract these pod paths or glob patterns
    #[arg(long = "path")]
    pub paths: Vec<String>,

    #[command(flatten)]
    pub merge: MergeArgs,

    #[command(flatten)]
    pub write: WriteArgs,
}

#[derive(Debug, Args)]
pub struct InitCommand {
    /// Locales to initialize (default: pod locales)
    #[arg(short, long = "locale")]
    pub locales: Vec<String>,

    #[command(flatten)]
    pub write: WriteArgs,
}

#[derive(Debug, Args)]
pub struct UpdateCommand {
    /// Locales to update (default: pod locales)
    #[arg(short, long = "locale")]
    pub locales: Vec<String>,

    #[command(flatten)]
    pub merge: MergeArgs,

    #[command(flatten)]
    pub write: WriteArgs,
}

#[derive(Debug, Args)]
pub struct CompileCommand {
    /// Recompile catalogs that are already up to date
    #[arg(short, long)]
    pub force: bool,

    /// Include fuzzy translations in compiled catalogs
    #[arg(long)]
    pub fuzzy: bool,
}

#[derive(Debug, Args)]
pub struct FilterCommand {
    /// Output catalog pod path (merged mode)
    #[arg(short, long = "out")]
    pub out_path: Option<String>,

    /// Output directory pod path (localized mode)
    #[arg(long)]
    pub out_dir: Option<String>,

    /// Write one catalog per locale under --out-dir
    #[arg(long)]
    pub localized: bool,

    /// Locales to filter (default: all)
    #[arg(short, long = "locale")]
    pub locales: Vec<String>,

    /// Only keep messages found in these pod paths or glob patterns
    #[arg(long = "path")]
    pub paths: Vec<String>,

    #[command(flatten)]
    pub write: WriteArgs,
}

#[derive(Debug, Args)]
pub struct ImportCommand {
    /// External PO file to import
    pub source: PathBuf,

    /// Locale receiving the translations
    #[arg(short, long)]
    pub locale: String,

    #[command(flatten)]
    pub write: WriteArgs,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract translatable messages from content, views and podspec
    Extract(ExtractCommand),
    /// Create locale catalogs from the template
    Init(InitCommand),
    /// Merge the template into existing locale catalogs
    Update(UpdateCommand),
    /// Compile locale catalogs into MO files
    Compile(CompileCommand),
    /// Write catalogs containing only untranslated messages
    Filter(FilterCommand),
    /// Import translations from an external PO file
    Import(ImportCommand),
    /// Show translation progress per locale
    Stats,
    /// Initialize a new .podcatrc.json configuration file
    InitConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        Arguments::command().debug_assert();
    }

    #[test]
    fn test_global_args_after_command() {
        let args =
            Arguments::try_parse_from(["podcat", "extract", "--pod-root", "site", "-v"]).unwrap();
        assert!(args.common.verbose);
        assert_eq!(args.common.pod_root, Some(PathBuf::from("site")));
    }

    #[test]
    fn test_repeated_locales() {
        let args = Arguments::try_parse_from([
            "podcat", "filter", "--localized", "--out-dir", "/out", "-l", "de", "--locale", "fr",
        ])
        .unwrap();
        let Some(Command::Filter(cmd)) = args.command else {
            panic!("expected filter");
        };
        assert_eq!(cmd.locales, vec!["de", "fr"]);
        assert_eq!(cmd.out_dir.as_deref(), Some("/out"));
    }
}
