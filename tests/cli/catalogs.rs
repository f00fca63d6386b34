use anyhow::Result;
use insta_cmd::assert_cmd_snapshot;
use pretty_assertions::assert_eq;

use crate::{CliTest, stderr, stdout};

const DE_PO: &str = "translations/de/LC_MESSAGES/messages.po";
const DE_MO: &str = "translations/de/LC_MESSAGES/messages.mo";

const DE_CATALOG: &str = r#"#: /views/base.html:1
msgid "Welcome"
msgstr "Willkommen"

#: /views/base.html:2
msgid "Contact"
msgstr ""
"#;

fn pod_with_german() -> Result<CliTest> {
    let test = CliTest::sample_pod()?;
    test.write_file(DE_PO, DE_CATALOG)?;
    Ok(test)
}

#[test]
fn test_init_creates_locale_catalogs() -> Result<()> {
    let test = CliTest::sample_pod()?;
    test.run(&["extract"])?;

    let output = test.run(&["init"])?;

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Initialized 2 catalogs"));
    let fr = test.read_file("translations/fr/LC_MESSAGES/messages.po")?;
    assert!(fr.contains("msgid \"About\"\nmsgstr \"\""));

    Ok(())
}

#[test]
fn test_update_keeps_translations() -> Result<()> {
    let test = pod_with_german()?;
    test.run(&["extract"])?;

    let output = test.run(&["update", "--locale", "de"])?;

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let de = test.read_file(DE_PO)?;
    assert!(de.contains("msgid \"Welcome\"\nmsgstr \"Willkommen\""));
    assert!(de.contains("msgid \"About\""));
    assert!(stdout(&output).contains("Updated 1 catalog"));

    Ok(())
}

#[test]
fn test_compile_then_fresh() -> Result<()> {
    let test = pod_with_german()?;

    let output = test.run(&["compile"])?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("de  compiled"));
    assert!(test.root().join(DE_MO).exists());

    let output = test.run(&["compile"])?;
    assert!(stdout(&output).contains("de  up to date"));

    let output = test.run(&["compile", "--force"])?;
    assert!(stdout(&output).contains("de  compiled"));

    Ok(())
}

#[test]
fn test_compile_failure_reports_error() -> Result<()> {
    let test = pod_with_german()?;
    test.write_file(
        "translations/fr/LC_MESSAGES/messages.po",
        "msgid \"Welcome\"\nbogus \"x\"\n",
    )?;

    assert_cmd_snapshot!(test.command_with(&["compile"]), @r"
    success: false
    exit_code: 1
    ----- stdout -----
    ✓ de  compiled
    ✘ fr  Failed to compile /translations/fr/LC_MESSAGES/messages.po: /translations/fr/LC_MESSAGES/messages.po:2: unknown keyword: bogus
    ✘ 1 catalog failed to compile

    ----- stderr -----
     INFO Compiled: /translations/de/LC_MESSAGES/messages.mo (1/2 translated)
     WARN Failed to compile /translations/fr/LC_MESSAGES/messages.po: /translations/fr/LC_MESSAGES/messages.po:2: unknown keyword: bogus
    ");
    assert!(test.root().join(DE_MO).exists());

    Ok(())
}

#[test]
fn test_stats() -> Result<()> {
    let test = pod_with_german()?;

    let output = test.run(&["stats"])?;

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(
        stdout(&output),
        "  de  1/2 (50%)  0 fuzzy  /translations/de/LC_MESSAGES/messages.po\n"
    );

    Ok(())
}

#[test]
fn test_filter_requires_out() -> Result<()> {
    let test = pod_with_german()?;

    let output = test.run(&["filter"])?;

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("Must specify -o when not using --localized."));

    let output = test.run(&["filter", "--localized"])?;
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("Must specify --out-dir"));

    Ok(())
}

#[test]
fn test_filter_writes_untranslated() -> Result<()> {
    let test = pod_with_german()?;

    let output = test.run(&["filter", "-o", "/filtered/untranslated.po"])?;

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let filtered = test.read_file("filtered/untranslated.po")?;
    assert!(filtered.contains("msgid \"Contact\""));
    assert!(!filtered.contains("Welcome"));

    Ok(())
}

#[test]
fn test_filter_localized() -> Result<()> {
    let test = pod_with_german()?;

    let output = test.run(&["filter", "--localized", "--out-dir", "/filtered"])?;

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let filtered = test.read_file("filtered/de/LC_MESSAGES/messages.po")?;
    assert!(filtered.contains("msgid \"Contact\""));
    assert!(!filtered.contains("Welcome"));

    Ok(())
}

#[test]
fn test_import_translations() -> Result<()> {
    let test = pod_with_german()?;
    test.write_file(
        "external.po",
        "msgid \"Contact\"\nmsgstr \"Kontakt\"\n\nmsgid \"Untranslated\"\nmsgstr \"\"\n",
    )?;

    let output = test.run(&["import", "external.po", "--locale", "de"])?;

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Imported 1 translation from external.po into de"));
    let de = test.read_file(DE_PO)?;
    assert!(de.contains("msgid \"Contact\"\nmsgstr \"Kontakt\""));
    assert!(!de.contains("Untranslated"));

    Ok(())
}
