/*!
 * Error types for the texbuild application.
 *
 * This module contains custom error types for the different stages of a build,
 * using the thiserror crate for ergonomic error definitions.
 */

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by a compiler backend
#[derive(Error, Debug)]
pub enum CompileError {
    /// The compiler process could not be started
    #[error("Failed to launch '{command}': {source}")]
    Spawn {
        /// Command that was launched
        command: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The compiler ran but exited unsuccessfully
    #[error("Compiler exited with {} for job '{job_name}'", describe_status(.status))]
    Failed {
        /// Job name passed to the compiler
        job_name: String,
        /// Exit code, if the process was not killed by a signal
        status: Option<i32>,
        /// Last lines of the compiler output
        log_tail: String,
    },

    /// The compiler did not finish within the configured limit
    #[error("Compiler timed out after {secs}s for job '{job_name}'")]
    Timeout {
        /// Job name passed to the compiler
        job_name: String,
        /// Configured limit in seconds
        secs: u64,
    },
}

fn describe_status(status: &Option<i32>) -> String {
    match status {
        Some(code) => format!("status {}", code),
        None => "no status (terminated by signal)".to_string(),
    }
}

/// Errors that can occur while compiling and publishing one document
#[derive(Error, Debug)]
pub enum BuildError {
    /// Compilation failed
    #[error("Compilation failed: {0}")]
    Compile(#[from] CompileError),

    /// The compiler reported success but produced no artifact
    #[error("Expected output not found: {0:?}")]
    MissingArtifact(PathBuf),

    /// The title cannot be used as a file name
    #[error("Title cannot be used as a file name: {0:?}")]
    UnsafeTitle(String),

    /// The output directory could not be created
    #[error("Failed to create output directory {path:?}: {source}")]
    OutputDir {
        /// Directory that was being created
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The artifact could not be moved into the output directory
    #[error("Failed to move {from:?} to {to:?}: {source}")]
    Move {
        /// Artifact location
        from: PathBuf,
        /// Destination path
        to: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl BuildError {
    /// Whether this error should stop the whole run rather than just the current file
    ///
    /// A compiler that can't be launched would fail every remaining file the same way.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::OutputDir { .. } | Self::Move { .. } | Self::Compile(CompileError::Spawn { .. })
        )
    }
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from building a document
    #[error("Build error: {0}")]
    Build(#[from] BuildError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
