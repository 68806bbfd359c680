/*!
 * latexmk backend.
 *
 * Runs `latexmk <build_args> -jobname=<job> <file>` and
 * `latexmk <clean_args> -jobname=<job> <file>` in the source directory.
 */

use async_trait::async_trait;
use log::{debug, trace};
use std::path::{Path, PathBuf};
use std::process::Output;
use std::time::Duration;
use tokio::process::Command;

use crate::app_config::CompilerConfig;
use crate::compiler::{expected_artifact, source_dir, Compiler};
use crate::errors::CompileError;
use crate::title_utils::JobName;

/// Number of output lines kept when a build fails
const LOG_TAIL_LINES: usize = 20;

/// latexmk client
#[derive(Debug, Clone)]
pub struct Latexmk {
    command: String,
    build_args: Vec<String>,
    clean_args: Vec<String>,
    timeout: Option<Duration>,
}

impl Latexmk {
    /// Create a client from the compiler section of the configuration
    pub fn new(config: &CompilerConfig) -> Self {
        Self {
            command: config.command.clone(),
            build_args: config.build_args.clone(),
            clean_args: config.clean_args.clone(),
            timeout: config.timeout_secs.map(Duration::from_secs),
        }
    }

    /// Full argument list for one invocation
    pub fn arguments(mode_args: &[String], job_name: &JobName, source: &Path) -> Vec<String> {
        // The working directory is the source's directory, so pass just the file name
        let file_arg = source
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| source.to_string_lossy().into_owned());

        let mut args = mode_args.to_vec();
        args.push(format!("-jobname={}", job_name));
        args.push(file_arg);
        args
    }

    async fn run(&self, mode_args: &[String], job_name: &JobName, source: &Path) -> Result<Output, CompileError> {
        let args = Self::arguments(mode_args, job_name, source);
        let cwd = source_dir(source);
        debug!("Running {} {} in {:?}", self.command, args.join(" "), cwd);

        let output_future = Command::new(&self.command)
            .args(&args)
            .current_dir(cwd)
            .stdin(std::process::Stdio::null())
            .kill_on_drop(true)
            .output();

        let result = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, output_future).await {
                Ok(result) => result,
                Err(_) => {
                    return Err(CompileError::Timeout {
                        job_name: job_name.to_string(),
                        secs: limit.as_secs(),
                    });
                }
            },
            None => output_future.await,
        };

        result.map_err(|source| CompileError::Spawn {
            command: self.command.clone(),
            source,
        })
    }

    // Last lines of stdout and stderr combined
    fn log_tail(output: &Output) -> String {
        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        let lines: Vec<&str> = stdout.lines().chain(stderr.lines()).collect();
        let start = lines.len().saturating_sub(LOG_TAIL_LINES);
        lines[start..].join("\n")
    }
}

#[async_trait]
impl Compiler for Latexmk {
    async fn build(&self, job_name: &JobName, source: &Path) -> Result<PathBuf, CompileError> {
        let output = self.run(&self.build_args, job_name, source).await?;
        trace!("{} output:\n{}", self.command, String::from_utf8_lossy(&output.stdout));

        if !output.status.success() {
            return Err(CompileError::Failed {
                job_name: job_name.to_string(),
                status: output.status.code(),
                log_tail: Self::log_tail(&output),
            });
        }

        Ok(expected_artifact(job_name, source))
    }

    async fn clean(&self, job_name: &JobName, source: &Path) -> Result<(), CompileError> {
        let output = self.run(&self.clean_args, job_name, source).await?;

        if !output.status.success() {
            return Err(CompileError::Failed {
                job_name: job_name.to_string(),
                status: output.status.code(),
                log_tail: Self::log_tail(&output),
            });
        }

        Ok(())
    }
}
