/*!
 * # texbuild - batch LaTeX builds named after their pdftitle
 *
 * A Rust library and CLI that compiles every LaTeX source in a project tree
 * and collects the PDFs in one folder, each named after the `pdftitle`
 * declared in its `\hypersetup` block.
 *
 * ## Features
 *
 * - Recursive discovery of `.tex` sources, ignoring the output folder
 * - Title extraction tolerant of invalid UTF-8
 * - Job names sanitized for latexmk
 * - Compilation through latexmk, or any backend implementing `Compiler`
 * - Auxiliary file cleanup after each build
 * - Per-file failures reported without aborting the batch
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `title_utils`: Title extraction and job name sanitizing
 * - `file_utils`: File system operations
 * - `compiler`: Compiler backends:
 *   - `compiler::latexmk`: latexmk process runner
 *   - `compiler::mock`: Fake backend for tests
 * - `app_controller`: Discovery, build and publish loop
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod title_utils;
pub mod file_utils;
pub mod compiler;
pub mod app_controller;
pub mod errors;

// Re-export main types for easier usage
pub use app_config::{Config, FilenameStyle};
pub use app_controller::{Controller, DocumentOutcome, RunSummary, SourceDocument};
pub use compiler::Compiler;
pub use title_utils::{extract_title, sanitize_job_name, JobName, TitleExtractor};
pub use errors::{AppError, BuildError, CompileError};
