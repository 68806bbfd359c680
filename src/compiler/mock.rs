/*!
 * Mock compiler implementation for testing.
 *
 * The mock writes placeholder outputs next to the source instead of running a
 * TeX toolchain:
 * - `MockCompiler::working()` - Writes the PDF and the usual auxiliary files
 * - `MockCompiler::failing()` - Every build exits unsuccessfully
 * - `MockCompiler::no_artifact()` - Reports success without writing a PDF
 * - `MockCompiler::clean_failing()` - Builds succeed, clean always fails
 */

use async_trait::async_trait;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::compiler::{expected_artifact, source_dir, Compiler};
use crate::errors::CompileError;
use crate::title_utils::JobName;

/// Auxiliary files the mock leaves behind after a build
pub const MOCK_AUX_EXTENSIONS: [&str; 6] = ["aux", "log", "fls", "fdb_latexmk", "toc", "out"];

/// Auxiliary files the mock's clean removes; `log`, `toc` and `out` stay behind
const MOCK_CLEANED_EXTENSIONS: [&str; 3] = ["aux", "fls", "fdb_latexmk"];

/// Behavior mode for the mock compiler
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Builds produce a PDF and auxiliary files
    Working,
    /// Builds exit with status 1
    Failing,
    /// Builds succeed but no PDF is written
    NoArtifact,
    /// Builds succeed, clean exits with status 1
    CleanFailing,
}

/// A recorded compiler invocation
#[derive(Debug, Clone, PartialEq)]
pub enum MockCall {
    Build { job_name: String, source: PathBuf },
    Clean { job_name: String, source: PathBuf },
}

/// Mock compiler for testing the build workflow
#[derive(Debug, Clone)]
pub struct MockCompiler {
    /// Behavior mode
    behavior: MockBehavior,
    /// Source file names whose build fails regardless of behavior
    failing_sources: Vec<String>,
    /// Every invocation, in order; shared between clones
    calls: Arc<Mutex<Vec<MockCall>>>,
}

impl MockCompiler {
    /// Create a new mock compiler with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            failing_sources: Vec::new(),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a working mock compiler
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create a mock compiler whose builds always fail
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Create a mock compiler that never writes a PDF
    pub fn no_artifact() -> Self {
        Self::new(MockBehavior::NoArtifact)
    }

    /// Create a mock compiler whose clean step always fails
    pub fn clean_failing() -> Self {
        Self::new(MockBehavior::CleanFailing)
    }

    /// Fail the build of any source with this file name
    pub fn fail_on(mut self, file_name: &str) -> Self {
        self.failing_sources.push(file_name.to_string());
        self
    }

    /// Snapshot of the recorded invocations
    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }

    /// Number of build invocations so far
    pub fn build_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, MockCall::Build { .. }))
            .count()
    }

    fn record(&self, call: MockCall) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }

    fn should_fail(&self, source: &Path) -> bool {
        if self.behavior == MockBehavior::Failing {
            return true;
        }
        source
            .file_name()
            .map(|name| name.to_string_lossy())
            .is_some_and(|name| self.failing_sources.iter().any(|f| *f == name))
    }

    fn io_failure(job_name: &JobName, error: std::io::Error) -> CompileError {
        CompileError::Failed {
            job_name: job_name.to_string(),
            status: Some(1),
            log_tail: error.to_string(),
        }
    }
}

#[async_trait]
impl Compiler for MockCompiler {
    async fn build(&self, job_name: &JobName, source: &Path) -> Result<PathBuf, CompileError> {
        self.record(MockCall::Build {
            job_name: job_name.to_string(),
            source: source.to_path_buf(),
        });

        if self.should_fail(source) {
            return Err(CompileError::Failed {
                job_name: job_name.to_string(),
                status: Some(1),
                log_tail: "! Simulated LaTeX error.".to_string(),
            });
        }

        let dir = source_dir(source);
        for ext in MOCK_AUX_EXTENSIONS {
            fs::write(dir.join(job_name.file_name(ext)), "mock")
                .map_err(|e| Self::io_failure(job_name, e))?;
        }

        let artifact = expected_artifact(job_name, source);
        if self.behavior != MockBehavior::NoArtifact {
            fs::write(&artifact, b"%PDF-1.5\n%mock\n")
                .map_err(|e| Self::io_failure(job_name, e))?;
        }

        Ok(artifact)
    }

    async fn clean(&self, job_name: &JobName, source: &Path) -> Result<(), CompileError> {
        self.record(MockCall::Clean {
            job_name: job_name.to_string(),
            source: source.to_path_buf(),
        });

        if self.behavior == MockBehavior::CleanFailing {
            return Err(CompileError::Failed {
                job_name: job_name.to_string(),
                status: Some(1),
                log_tail: "Simulated clean failure".to_string(),
            });
        }

        let dir = source_dir(source);
        for ext in MOCK_CLEANED_EXTENSIONS {
            let _ = fs::remove_file(dir.join(job_name.file_name(ext)));
        }
        Ok(())
    }
}
