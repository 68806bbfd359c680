/*!
 * Integration tests for controller setup and dry runs
 */

use anyhow::Result;
use std::path::PathBuf;
use texbuild::app_config::Config;
use texbuild::app_controller::Controller;
use texbuild::compiler::mock::MockCompiler;
use texbuild::errors::BuildError;
use crate::common;

/// Test the controller initialization with default config
#[test]
fn test_controller_initialization_withDefaultConfig_shouldSucceed() -> Result<()> {
    let controller = Controller::with_config(Config::default())?;
    assert_eq!(controller.output_dir(), PathBuf::from("./PDFs"));
    Ok(())
}

/// Test that an invalid configuration is refused
#[test]
fn test_controller_initialization_withInvalidConfig_shouldFail() {
    let config = Config {
        title_pattern: "no group here".to_string(),
        ..Config::default()
    };
    assert!(Controller::with_config(config).is_err());
}

/// Test that a missing project directory is reported
#[test]
fn test_discover_withMissingProjectDir_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config = common::test_config(&temp_dir.path().join("missing"));
    let controller = Controller::with_config(config)?;
    assert!(controller.discover().is_err());
    Ok(())
}

/// Test dry run functionality
#[test]
fn test_plan_withTestData_shouldNotProduceOutput() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path();
    let paper = common::create_titled_tex(root, "papers/paper1.tex", "My Great Paper")?;
    common::create_untitled_tex(root, "draft.tex")?;

    let compiler = MockCompiler::working();
    let controller = Controller::with_compiler(common::test_config(root), Box::new(compiler.clone()))?;
    let planned = controller.plan()?;

    assert_eq!(planned.len(), 1);
    assert_eq!(planned[0].source, paper);
    assert_eq!(planned[0].title, "My Great Paper");
    assert_eq!(planned[0].job_name.as_str(), "My_Great_Paper");
    assert_eq!(planned[0].destination, root.join("PDFs/My Great Paper.pdf"));

    // Nothing compiled, nothing written
    assert_eq!(compiler.build_count(), 0);
    assert!(!root.join("PDFs").exists());

    Ok(())
}

/// Test that a dry run leaves out titles the build would reject
#[test]
fn test_plan_withUnsafeTitle_shouldLeaveItOut() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path();
    common::create_titled_tex(root, "evil.tex", "../outside")?;
    let fine = common::create_titled_tex(root, "fine.tex", "Fine")?;

    let controller = Controller::with_compiler(common::test_config(root), Box::new(MockCompiler::working()))?;
    let planned = controller.plan()?;

    assert_eq!(planned.len(), 1);
    assert_eq!(planned[0].source, fine);
    assert!(planned.iter().all(|p| p.destination.starts_with(root.join("PDFs"))
        && !p.destination.to_string_lossy().contains("..")));
    assert!(matches!(
        controller.check_publishable("../outside"),
        Err(BuildError::UnsafeTitle(_))
    ));

    Ok(())
}

/// Test single-document builds through the blocking test runtime
#[test]
fn test_build_document_withWorkingCompiler_shouldReturnDestination() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path();
    let source = common::create_titled_tex(root, "solo.tex", "Solo")?;

    let controller = Controller::with_compiler(common::test_config(root), Box::new(MockCompiler::working()))?;
    let destination = tokio_test::block_on(controller.build_document(&source, "Solo"))?;

    assert_eq!(destination, root.join("PDFs/Solo.pdf"));
    assert!(destination.is_file());
    Ok(())
}
