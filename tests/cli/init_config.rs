use anyhow::{Context, Result};
use insta_cmd::assert_cmd_snapshot;
use serde_json::Value;

use crate::{CliTest, stderr, stdout};

#[test]
fn test_init_config_creates_config() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.run(&["init-config"])?;

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Created .podcatrc.json"));
    let content = test.read_file(".podcatrc.json")?;
    let parsed: Value = serde_json::from_str(&content).context("Config should be valid JSON")?;
    assert_eq!(parsed["templatePath"], "/translations/messages.pot");
    assert_eq!(parsed["fuzzyCutoff"], 0.6);
    assert!(parsed["ignores"].as_array().is_some_and(|a| a.is_empty()));

    Ok(())
}

#[test]
fn test_init_config_fails_if_exists() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(".podcatrc.json", "{}")?;

    let output = test.run(&["init-config"])?;

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains(".podcatrc.json already exists"));
    assert_eq!(test.read_file(".podcatrc.json")?, "{}");

    Ok(())
}

#[test]
fn test_invalid_config_is_fatal() -> Result<()> {
    let test = CliTest::sample_pod()?;
    test.write_file(".podcatrc.json", r#"{ "fuzzyCutoff": 2.0 }"#)?;

    let pod_root = test.root().display().to_string();
    let (root, replacement) = test.root_filter();

    insta::with_settings!({ filters => vec![(root.as_str(), replacement)] }, {
        assert_cmd_snapshot!(test.command_with(&["--pod-root", &pod_root, "extract"]), @r"
        success: false
        exit_code: 2
        ----- stdout -----

        ----- stderr -----
        Error: Failed to load config for [POD]: Invalid 'fuzzyCutoff': 2 (expected a value in (0, 1])
        ");
    });
    assert!(!test.root().join("translations").exists());

    Ok(())
}

#[test]
fn test_no_command_prints_help() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.run(&[])?;

    assert!(output.status.success());
    assert!(stdout(&output).contains("Usage"));

    Ok(())
}
