/*!
 * Tests for error types and conversions
 */

use std::path::PathBuf;
use texbuild::errors::{AppError, BuildError, CompileError};

#[test]
fn test_compileError_failed_shouldDisplayStatusAndJob() {
    let error = CompileError::Failed {
        job_name: "My_Paper".to_string(),
        status: Some(12),
        log_tail: "! Undefined control sequence.".to_string(),
    };
    let display = format!("{}", error);
    assert!(display.contains("status 12"));
    assert!(display.contains("My_Paper"));
}

#[test]
fn test_compileError_failedWithoutStatus_shouldMentionSignal() {
    let error = CompileError::Failed {
        job_name: "job".to_string(),
        status: None,
        log_tail: String::new(),
    };
    assert!(format!("{}", error).contains("signal"));
}

#[test]
fn test_compileError_timeout_shouldDisplayLimit() {
    let error = CompileError::Timeout { job_name: "job".to_string(), secs: 30 };
    assert!(format!("{}", error).contains("30s"));
}

#[test]
fn test_buildError_fromCompileError_shouldWrapAndNotBeFatal() {
    let compile_error = CompileError::Timeout { job_name: "job".to_string(), secs: 5 };
    let build_error: BuildError = compile_error.into();
    assert!(format!("{}", build_error).contains("Compilation failed"));
    assert!(!build_error.is_fatal());
}

#[test]
fn test_buildError_isFatal_shouldOnlyFlagRunWideErrors() {
    let missing = BuildError::MissingArtifact(PathBuf::from("doc/job.pdf"));
    let unsafe_title = BuildError::UnsafeTitle("a/b".to_string());
    let output_dir = BuildError::OutputDir {
        path: PathBuf::from("/readonly/PDFs"),
        source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
    };

    assert!(!missing.is_fatal());
    assert!(!unsafe_title.is_fatal());
    assert!(output_dir.is_fatal());
    assert!(format!("{}", missing).contains("job.pdf"));
}

#[test]
fn test_buildError_isFatal_withSpawnFailure_shouldStopRun() {
    let spawn: BuildError = CompileError::Spawn {
        command: "latexmk".to_string(),
        source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
    }
    .into();
    let failed: BuildError = CompileError::Failed {
        job_name: "job".to_string(),
        status: Some(12),
        log_tail: String::new(),
    }
    .into();

    assert!(spawn.is_fatal());
    assert!(!failed.is_fatal());
}

#[test]
fn test_appError_fromIoError_shouldWrapAsFileError() {
    let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
    let app_error: AppError = io_error.into();
    let display = format!("{}", app_error);
    assert!(display.contains("File error"));
    assert!(display.contains("File not found"));
}

#[test]
fn test_appError_fromAnyhowError_shouldWrapAsUnknown() {
    let anyhow_error = anyhow::anyhow!("Something went wrong");
    let app_error: AppError = anyhow_error.into();
    let display = format!("{}", app_error);
    assert!(display.contains("Unknown error"));
    assert!(display.contains("Something went wrong"));
}

#[test]
fn test_appError_fromBuildError_shouldWrapAsBuildError() {
    let app_error: AppError = BuildError::UnsafeTitle("..".to_string()).into();
    assert!(format!("{}", app_error).contains("Build error"));
}

#[test]
fn test_appError_debug_shouldBeImplemented() {
    let error = AppError::File("test".to_string());
    let debug = format!("{:?}", error);
    assert!(debug.contains("File"));
}
