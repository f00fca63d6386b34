use anyhow::Result;
use pretty_assertions::assert_eq;

use crate::{CliTest, stderr, stdout};

const TEMPLATE: &str = "translations/messages.pot";

#[test]
fn test_extract_writes_template() -> Result<()> {
    let test = CliTest::sample_pod()?;

    let output = test.run(&["extract"])?;

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stderr(&output).contains("Extracting: /views/base.html"));
    insta::assert_snapshot!(stdout(&output), @r"
      /translations/messages.pot (5 messages)
    ✓ Extracted 3 sources, saved 1 catalog
    ");
    insta::assert_snapshot!(test.read_file(TEMPLATE)?, @r#"
    #: /content/pages/about.yaml
    msgid "About"
    msgstr ""

    #: /views/base.html:2
    msgid "Contact"
    msgstr ""

    #: /podspec.yaml
    msgid "Example Site"
    msgstr ""

    #: /content/pages/_blueprint.yaml
    msgid "Pages"
    msgstr ""

    #: /views/base.html:1
    msgid "Welcome"
    msgstr ""
    "#);

    Ok(())
}

#[test]
fn test_extract_twice_is_stable() -> Result<()> {
    let test = CliTest::sample_pod()?;

    test.run(&["extract", "--include-header"])?;
    let first = test.read_file(TEMPLATE)?;
    test.run(&["extract", "--include-header"])?;

    assert_eq!(test.read_file(TEMPLATE)?, first);
    assert!(first.contains("Generated-By"));

    Ok(())
}

#[test]
fn test_extract_path_filter() -> Result<()> {
    let test = CliTest::sample_pod()?;

    let output = test.run(&["extract", "--path", "/views/*.html"])?;

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let template = test.read_file(TEMPLATE)?;
    assert!(template.contains("msgid \"Welcome\""));
    assert!(!template.contains("msgid \"About\""));

    Ok(())
}

#[test]
fn test_extract_localized_single_locale() -> Result<()> {
    let test = CliTest::sample_pod()?;

    let output = test.run(&["extract", "--localized", "--locale", "de"])?;

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("0/5 translated"));
    assert!(test.read_file("translations/de/LC_MESSAGES/messages.po")?.contains("msgid \"About\""));
    assert!(!test.root().join("translations/fr").exists());
    assert!(!test.root().join(TEMPLATE).exists());

    Ok(())
}

#[test]
fn test_extract_syntax_error_is_fatal() -> Result<()> {
    let test = CliTest::sample_pod()?;
    test.write_file("views/broken.html", "<p>\n{{ _('unterminated) }}\n")?;

    let output = test.run(&["extract"])?;

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("/views/broken.html:2"));
    assert!(!test.root().join(TEMPLATE).exists());

    Ok(())
}
