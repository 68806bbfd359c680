/*!
 * Tests for application configuration functionality
 */

use anyhow::Result;
use std::path::PathBuf;
use texbuild::app_config::{Config, FilenameStyle, LogLevel};
use crate::common;

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.project_dir, PathBuf::from("."));
    assert_eq!(config.output_dir, PathBuf::from("PDFs"));
    assert_eq!(config.source_extension, "tex");
    assert_eq!(config.max_job_name_len, 100);
    assert_eq!(config.filename_style, FilenameStyle::Verbatim);
    assert_eq!(config.aux_extensions, vec!["aux", "log", "fdb_latexmk", "fls", "toc", "out"]);
    assert_eq!(config.compiler.command, "latexmk");
    assert_eq!(config.compiler.build_args, vec!["-pdf"]);
    assert_eq!(config.compiler.clean_args, vec!["-c"]);
    assert_eq!(config.compiler.timeout_secs, None);
    assert_eq!(config.log_level, LogLevel::Info);
}

/// Test configuration validation
#[test]
fn test_config_validation_withVariousConfigs_shouldValidateCorrectly() {
    let mut config = Config::default();
    assert!(config.validate().is_ok());

    // Pattern without a capture group
    config.title_pattern = r"pdftitle=\{[^}]*\}".to_string();
    assert!(config.validate().is_err());

    // Pattern that doesn't compile
    config.title_pattern = r"pdftitle=\{(".to_string();
    assert!(config.validate().is_err());
    config = Config::default();

    config.max_job_name_len = 0;
    assert!(config.validate().is_err());
    config.max_job_name_len = 100;

    config.compiler.command = "  ".to_string();
    assert!(config.validate().is_err());
    config.compiler.command = "latexmk".to_string();

    config.compiler.timeout_secs = Some(0);
    assert!(config.validate().is_err());
    config.compiler.timeout_secs = Some(600);
    assert!(config.validate().is_ok());
}

/// Test that a relative output directory resolves against the project directory
#[test]
fn test_resolved_output_dir_withRelativeAndAbsolutePaths_shouldResolveCorrectly() {
    let mut config = Config {
        project_dir: PathBuf::from("/work/thesis"),
        ..Config::default()
    };
    assert_eq!(config.resolved_output_dir(), PathBuf::from("/work/thesis/PDFs"));

    config.output_dir = PathBuf::from("/srv/pdfs");
    assert_eq!(config.resolved_output_dir(), PathBuf::from("/srv/pdfs"));
}

/// Test that a partial config file is completed with defaults
#[test]
fn test_load_or_default_withPartialFile_shouldFillDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        temp_dir.path(),
        "texbuild.json",
        r#"{ "output_dir": "out", "filename_style": "underscored", "compiler": { "timeout_secs": 120 } }"#,
    )?;

    let config = Config::load_or_default(&path)?;

    assert_eq!(config.output_dir, PathBuf::from("out"));
    assert_eq!(config.filename_style, FilenameStyle::Underscored);
    assert_eq!(config.compiler.timeout_secs, Some(120));
    assert_eq!(config.compiler.command, "latexmk");
    assert_eq!(config.source_extension, "tex");
    Ok(())
}

/// Test that a missing file yields the defaults and a broken one is an error
#[test]
fn test_load_or_default_withMissingOrBrokenFile_shouldBehaveCorrectly() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;

    let config = Config::load_or_default(temp_dir.path().join("absent.json"))?;
    assert_eq!(config.output_dir, PathBuf::from("PDFs"));

    let broken = common::create_test_file(temp_dir.path(), "broken.json", "{ not json")?;
    assert!(Config::load_or_default(&broken).is_err());
    Ok(())
}

/// Test the filename styles
#[test]
fn test_filename_style_apply_shouldFollowStyle() {
    assert_eq!(FilenameStyle::Verbatim.apply("My Great Paper"), "My Great Paper");
    assert_eq!(FilenameStyle::Underscored.apply("My Great Paper"), "My_Great_Paper");
    assert_eq!(FilenameStyle::Underscored.to_string(), "underscored");
}
