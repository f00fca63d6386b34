//! Report formatting and printing utilities.
//!
//! Commands return plain summaries; this module turns them into the
//! human-readable report on stdout. Progress logging goes through `tracing`
//! on stderr instead.

use std::io::{self, Write};

use colored::Colorize;
use unicode_width::UnicodeWidthStr;

use super::commands::{
    CommandResult, CommandSummary, FilterSummary, ImportSummary, InitConfigSummary, InitSummary,
    UpdateSummary, WrittenCatalog,
};
use crate::config::CONFIG_FILE_NAME;
use crate::core::{CompileReport, ExtractReport, LocaleStats, UpdateStats};
use crate::utils::plural;

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

pub fn print(result: &CommandResult, verbose: bool) {
    print_to(result, verbose, &mut io::stdout().lock());
}

/// Print a command report to a custom writer.
///
/// Useful for testing or redirecting output.
pub fn print_to<W: Write>(result: &CommandResult, verbose: bool, writer: &mut W) {
    match &result.summary {
        CommandSummary::Extract(report) => print_extract(report, verbose, writer),
        CommandSummary::Init(summary) => print_init(summary, writer),
        CommandSummary::Update(summary) => print_update(summary, writer),
        CommandSummary::Compile(report) => print_compile(report, writer),
        CommandSummary::Filter(summary) => print_filter(summary, writer),
        CommandSummary::Import(summary) => print_import(summary, writer),
        CommandSummary::Stats(stats) => print_stats(stats, writer),
        CommandSummary::InitConfig(summary) => print_init_config(summary, writer),
    }
}

// ============================================================
// Internal Functions
// ============================================================

/// Pads `text` to `width` display columns.
fn pad(text: &str, width: usize) -> String {
    let padding = width.saturating_sub(UnicodeWidthStr::width(text));
    format!("{}{}", text, " ".repeat(padding))
}

fn column_width<'a>(values: impl Iterator<Item = &'a str>) -> usize {
    values.map(UnicodeWidthStr::width).max().unwrap_or(0)
}

fn success_line<W: Write>(writer: &mut W, message: String) {
    let _ = writeln!(writer, "{} {}", SUCCESS_MARK.green(), message.green());
}

fn print_extract<W: Write>(report: &ExtractReport, verbose: bool, writer: &mut W) {
    let width = column_width(report.saved.iter().map(|s| s.locale.as_deref().unwrap_or("")));

    for saved in &report.saved {
        match &saved.locale {
            Some(locale) => {
                let _ = writeln!(
                    writer,
                    "  {}  {}/{} translated  {}",
                    pad(locale, width).bold(),
                    saved.translated,
                    saved.total,
                    saved.pod_path.dimmed()
                );
            }
            None => {
                let _ = writeln!(
                    writer,
                    "  {} ({} {})",
                    saved.pod_path,
                    saved.total,
                    plural(saved.total, "message", "messages")
                );
            }
        }
        if verbose {
            let _ = writeln!(writer, "      {}", format_update_stats(&saved.stats).dimmed());
        }
    }

    success_line(
        writer,
        format!(
            "Extracted {} {}, saved {} {}",
            report.sources,
            plural(report.sources, "source", "sources"),
            report.saved.len(),
            plural(report.saved.len(), "catalog", "catalogs")
        ),
    );
}

fn print_written<W: Write>(catalogs: &[WrittenCatalog], verb: &str, writer: &mut W) {
    let width = column_width(catalogs.iter().map(|c| c.locale.as_deref().unwrap_or("")));
    for catalog in catalogs {
        let locale = catalog.locale.as_deref().unwrap_or("");
        let _ = writeln!(
            writer,
            "{} {}  {} ({} {})",
            SUCCESS_MARK.green(),
            pad(locale, width).bold(),
            catalog.pod_path,
            catalog.messages,
            plural(catalog.messages, "message", "messages")
        );
    }
    success_line(
        writer,
        format!(
            "{} {} {}",
            verb,
            catalogs.len(),
            plural(catalogs.len(), "catalog", "catalogs")
        ),
    );
}

fn print_init<W: Write>(summary: &InitSummary, writer: &mut W) {
    print_written(&summary.catalogs, "Initialized", writer);
}

fn format_update_stats(stats: &UpdateStats) -> String {
    format!(
        "+{} added, {} updated, ~{} fuzzy, {} obsolete, -{} removed",
        stats.added, stats.updated, stats.fuzzy, stats.obsolete, stats.removed
    )
}

fn print_update<W: Write>(summary: &UpdateSummary, writer: &mut W) {
    let width = column_width(summary.locales.iter().map(|(l, _)| l.as_str()));
    for (locale, stats) in &summary.locales {
        let _ = writeln!(
            writer,
            "  {}  {}",
            pad(locale, width).bold(),
            format_update_stats(stats)
        );
    }
    success_line(
        writer,
        format!(
            "Updated {} {}",
            summary.locales.len(),
            plural(summary.locales.len(), "catalog", "catalogs")
        ),
    );
}

fn print_compile<W: Write>(report: &CompileReport, writer: &mut W) {
    let width = column_width(
        report
            .compiled
            .iter()
            .chain(&report.fresh)
            .chain(&report.missing)
            .chain(report.failed.iter().map(|(l, _)| l))
            .map(String::as_str),
    );

    for locale in &report.compiled {
        let _ = writeln!(
            writer,
            "{} {}  compiled",
            SUCCESS_MARK.green(),
            pad(locale, width).bold()
        );
    }
    for locale in &report.fresh {
        let _ = writeln!(
            writer,
            "{} {}  {}",
            SUCCESS_MARK.green(),
            pad(locale, width).bold(),
            "up to date".dimmed()
        );
    }
    for locale in &report.missing {
        let _ = writeln!(
            writer,
            "{} {}  {}",
            "warning:".bold().yellow(),
            pad(locale, width).bold(),
            "catalog does not exist"
        );
    }
    for (locale, err) in &report.failed {
        let _ = writeln!(
            writer,
            "{} {}  {}",
            FAILURE_MARK.red(),
            pad(locale, width).bold(),
            err.to_string().red()
        );
    }

    if report.failed.is_empty() {
        success_line(
            writer,
            format!(
                "Compiled {} {}",
                report.compiled.len(),
                plural(report.compiled.len(), "catalog", "catalogs")
            ),
        );
    } else {
        let _ = writeln!(
            writer,
            "{} {}",
            FAILURE_MARK.red(),
            format!(
                "{} {} failed to compile",
                report.failed.len(),
                plural(report.failed.len(), "catalog", "catalogs")
            )
            .red()
        );
    }
}

fn print_filter<W: Write>(summary: &FilterSummary, writer: &mut W) {
    if summary.catalogs.is_empty() {
        success_line(writer, "No untranslated messages".to_string());
        return;
    }
    print_written(&summary.catalogs, "Wrote", writer);
}

fn print_import<W: Write>(summary: &ImportSummary, writer: &mut W) {
    success_line(
        writer,
        format!(
            "Imported {} {} from {} into {}",
            summary.imported,
            plural(summary.imported, "translation", "translations"),
            summary.source,
            summary.locale
        ),
    );
}

fn print_stats<W: Write>(stats: &[LocaleStats], writer: &mut W) {
    if stats.is_empty() {
        let _ = writeln!(writer, "No locale catalogs found");
        return;
    }

    let width = column_width(stats.iter().map(|s| s.locale.as_str()));
    for entry in stats {
        let percent = if entry.total == 0 {
            100
        } else {
            entry.translated * 100 / entry.total
        };
        let progress = format!("{}/{} ({}%)", entry.translated, entry.total, percent);
        let progress = if entry.translated == entry.total {
            progress.green()
        } else {
            progress.yellow()
        };
        let _ = writeln!(
            writer,
            "  {}  {}  {} fuzzy  {}",
            pad(&entry.locale, width).bold(),
            progress,
            entry.fuzzy,
            entry.pod_path.dimmed()
        );
    }
}

fn print_init_config<W: Write>(summary: &InitConfigSummary, writer: &mut W) {
    match &summary.error {
        None => success_line(writer, format!("Created {}", CONFIG_FILE_NAME)),
        Some(error) => {
            let _ = writeln!(writer, "{} {}", FAILURE_MARK.red(), error.red());
        }
    }
}

// ============================================================
// Tests
// ============================================================

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::cli::commands::{CommandKind, helper::finish};
    use crate::core::{CatalogError, SavedCatalog};

    fn strip_ansi(s: &str) -> String {
        // Simple ANSI escape code stripper for testing
        let mut result = String::new();
        let mut chars = s.chars().peekable();
        while let Some(c) = chars.next() {
            if c == '\x1b' {
                // Skip until 'm'
                while let Some(&next) = chars.peek() {
                    chars.next();
                    if next == 'm' {
                        break;
                    }
                }
            } else {
                result.push(c);
            }
        }
        result
    }

    fn render(kind: CommandKind, summary: CommandSummary, verbose: bool) -> String {
        let result = finish(kind, summary, 0, true);
        let mut output = Vec::new();
        print_to(&result, verbose, &mut output);
        strip_ansi(&String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_extract_template() {
        let report = ExtractReport {
            sources: 3,
            saved: vec![SavedCatalog {
                pod_path: "/translations/messages.pot".to_string(),
                locale: None,
                translated: 0,
                total: 1,
                stats: UpdateStats::default(),
            }],
        };
        let output = render(CommandKind::Extract, CommandSummary::Extract(report), false);
        assert_eq!(
            output,
            "  /translations/messages.pot (1 message)\n\
             \u{2713} Extracted 3 sources, saved 1 catalog\n"
        );
    }

    #[test]
    fn test_extract_localized_aligns_locales() {
        let saved = |locale: &str, translated| SavedCatalog {
            pod_path: format!("/translations/{}/LC_MESSAGES/messages.po", locale),
            locale: Some(locale.to_string()),
            translated,
            total: 4,
            stats: UpdateStats {
                added: 1,
                ..Default::default()
            },
        };
        let report = ExtractReport {
            sources: 1,
            saved: vec![saved("de", 2), saved("zh_Hant", 4)],
        };
        let output = render(CommandKind::Extract, CommandSummary::Extract(report), true);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(
            lines[0],
            "  de       2/4 translated  /translations/de/LC_MESSAGES/messages.po"
        );
        assert!(lines[1].contains("+1 added"));
        assert!(lines[2].starts_with("  zh_Hant  4/4 translated"));
        assert!(output.ends_with("Extracted 1 source, saved 2 catalogs\n"));
    }

    #[test]
    fn test_compile_failure() {
        let report = CompileReport {
            compiled: vec!["de".to_string()],
            fresh: vec![],
            missing: vec!["it".to_string()],
            failed: vec![("fr".to_string(), CatalogError::usage("broken"))],
        };
        let result = finish(CommandKind::Compile, CommandSummary::Compile(report), 1, true);
        assert_eq!(result.error_count, 1);

        let mut output = Vec::new();
        print_to(&result, false, &mut output);
        let output = strip_ansi(&String::from_utf8(output).unwrap());
        assert!(output.contains("\u{2713} de  compiled"));
        assert!(output.contains("warning: it  catalog does not exist"));
        assert!(output.contains("\u{2718} fr  broken"));
        assert!(output.contains("1 catalog failed to compile"));
    }

    #[test]
    fn test_stats() {
        let stats = vec![LocaleStats {
            locale: "de".to_string(),
            pod_path: "/translations/de/LC_MESSAGES/messages.po".to_string(),
            translated: 1,
            fuzzy: 1,
            total: 4,
        }];
        let output = render(CommandKind::Stats, CommandSummary::Stats(stats), false);
        assert_eq!(
            output,
            "  de  1/4 (25%)  1 fuzzy  /translations/de/LC_MESSAGES/messages.po\n"
        );
        let output = render(CommandKind::Stats, CommandSummary::Stats(vec![]), false);
        assert_eq!(output, "No locale catalogs found\n");
    }

    #[test]
    fn test_filter_empty() {
        let summary = FilterSummary { catalogs: vec![] };
        let output = render(CommandKind::Filter, CommandSummary::Filter(summary), false);
        assert_eq!(output, "\u{2713} No untranslated messages\n");
    }

    #[test]
    fn test_init_config_exists() {
        let summary = InitConfigSummary {
            error: Some(format!("{} already exists", CONFIG_FILE_NAME)),
        };
        let result = finish(CommandKind::InitConfig, CommandSummary::InitConfig(summary), 0, true);
        assert_eq!(result.error_count, 1);
    }

    #[test]
    fn test_pad_uses_display_width() {
        assert_eq!(pad("日本", 6), "日本  ");
        assert_eq!(pad("de", 2), "de");
    }
}
