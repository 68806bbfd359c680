/*!
 * Compiler backends that turn LaTeX sources into PDFs.
 *
 * This module contains the backends the controller can drive:
 * - `latexmk`: the real latexmk build automation tool
 * - `mock`: an in-process stand-in that fakes outputs on disk, for tests
 */

use async_trait::async_trait;
use std::fmt::Debug;
use std::path::{Path, PathBuf};

use crate::errors::CompileError;
use crate::title_utils::JobName;

/// Common trait for all compiler backends
///
/// Both operations run with the source file's directory as the working
/// directory, and name every output after `job_name`.
#[async_trait]
pub trait Compiler: Send + Sync + Debug {
    /// Compile `source` under the given job name
    ///
    /// # Returns
    /// * `Result<PathBuf, CompileError>` - Where the PDF is expected to be on success.
    ///   The caller still checks that it exists.
    async fn build(&self, job_name: &JobName, source: &Path) -> Result<PathBuf, CompileError>;

    /// Remove the intermediate files of a previous build
    async fn clean(&self, job_name: &JobName, source: &Path) -> Result<(), CompileError>;
}

/// Directory a source compiles in
pub fn source_dir(source: &Path) -> &Path {
    match source.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

/// Location of the PDF produced for a job
pub fn expected_artifact(job_name: &JobName, source: &Path) -> PathBuf {
    source_dir(source).join(job_name.file_name("pdf"))
}

pub mod latexmk;
pub mod mock;
