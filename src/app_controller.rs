use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};

use crate::app_config::Config;
use crate::compiler::latexmk::Latexmk;
use crate::compiler::{source_dir, Compiler};
use crate::errors::BuildError;
use crate::file_utils::FileManager;
use crate::title_utils::{self, JobName, TitleExtractor};

// @module: Application controller for LaTeX batch builds

/// A discovered LaTeX source and the title found in it
#[derive(Debug, Clone, PartialEq)]
pub struct SourceDocument {
    /// Path of the source file
    pub path: PathBuf,
    /// Title extracted from the source, if any
    pub title: Option<String>,
}

/// What a build of one document would do, for dry runs
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedBuild {
    pub source: PathBuf,
    pub title: String,
    pub job_name: JobName,
    pub destination: PathBuf,
}

/// Result of processing one source file
#[derive(Debug)]
pub enum DocumentOutcome {
    /// The PDF was built and moved to the output directory
    Published {
        source: PathBuf,
        title: String,
        output: PathBuf,
    },
    /// The source has no title and was not built
    Skipped { source: PathBuf },
    /// Building this source failed; the run continued
    Failed {
        source: PathBuf,
        title: String,
        error: BuildError,
    },
}

impl DocumentOutcome {
    pub fn source(&self) -> &Path {
        match self {
            Self::Published { source, .. } | Self::Skipped { source } | Self::Failed { source, .. } => source,
        }
    }
}

/// Outcomes of a whole run
#[derive(Debug)]
pub struct RunSummary {
    /// Where the PDFs were written
    pub output_dir: PathBuf,
    /// One entry per discovered source, in discovery order
    pub outcomes: Vec<DocumentOutcome>,
}

impl RunSummary {
    pub fn discovered_count(&self) -> usize {
        self.outcomes.len()
    }

    pub fn published_count(&self) -> usize {
        self.outcomes.iter().filter(|o| matches!(o, DocumentOutcome::Published { .. })).count()
    }

    pub fn skipped_count(&self) -> usize {
        self.outcomes.iter().filter(|o| matches!(o, DocumentOutcome::Skipped { .. })).count()
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| matches!(o, DocumentOutcome::Failed { .. })).count()
    }

    /// Output paths of every published PDF
    pub fn published_outputs(&self) -> Vec<&Path> {
        self.outcomes
            .iter()
            .filter_map(|o| match o {
                DocumentOutcome::Published { output, .. } => Some(output.as_path()),
                _ => None,
            })
            .collect()
    }

    /// Outcome recorded for a given source file
    pub fn outcome_for<P: AsRef<Path>>(&self, source: P) -> Option<&DocumentOutcome> {
        self.outcomes.iter().find(|o| o.source() == source.as_ref())
    }
}

/// Main application controller for building LaTeX documents
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Title lookup built from the configured pattern
    extractor: TitleExtractor,
    // @field: Backend invoked for builds and cleans
    compiler: Box<dyn Compiler>,
}

impl Controller {
    // @method: Create a new controller driving latexmk with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        let compiler = Latexmk::new(&config.compiler);
        Self::with_compiler(config, Box::new(compiler))
    }

    // @method: Create a new controller with a specific compiler backend
    pub fn with_compiler(config: Config, compiler: Box<dyn Compiler>) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;
        let extractor = TitleExtractor::new(&config.title_pattern)?;

        Ok(Self {
            config,
            extractor,
            compiler,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Output directory with relative paths resolved
    pub fn output_dir(&self) -> PathBuf {
        self.config.resolved_output_dir()
    }

    /// Find every source file under the project directory, outside the output directory
    pub fn discover(&self) -> Result<Vec<PathBuf>> {
        let project_dir = &self.config.project_dir;
        if !FileManager::dir_exists(project_dir) {
            return Err(anyhow::anyhow!("Project directory does not exist: {:?}", project_dir));
        }

        FileManager::find_files_excluding(project_dir, &self.config.source_extension, self.output_dir())
            .with_context(|| format!("Failed to scan project directory: {:?}", project_dir))
    }

    /// Read a source file and extract its title
    pub fn inspect<P: AsRef<Path>>(&self, path: P) -> Result<SourceDocument> {
        let path = path.as_ref();
        let title = self.extractor.extract_from_file(path)?;
        Ok(SourceDocument {
            path: path.to_path_buf(),
            title,
        })
    }

    /// Job name the compiler gets for a title
    pub fn job_name_for(&self, title: &str) -> JobName {
        title_utils::sanitize_job_name(title, self.config.max_job_name_len)
    }

    /// Final location of the PDF for a title
    pub fn destination_for(&self, title: &str) -> PathBuf {
        let stem = self.config.filename_style.apply(title);
        self.output_dir().join(format!("{}.pdf", stem))
    }

    /// Reject titles whose published file would land outside the output directory
    pub fn check_publishable(&self, title: &str) -> Result<(), BuildError> {
        let file_stem = self.config.filename_style.apply(title);
        if title_utils::is_publishable_title(&file_stem) {
            Ok(())
        } else {
            Err(BuildError::UnsafeTitle(title.to_string()))
        }
    }

    /// Describe what a build would do without running the compiler
    ///
    /// Titles a real build would reject are left out of the plan with a warning.
    pub fn plan(&self) -> Result<Vec<PlannedBuild>> {
        let mut planned = Vec::new();
        for path in self.discover()? {
            let document = self.inspect(&path)?;
            let Some(title) = document.title else {
                warn!("No pdftitle in {}, skipping", path.display());
                continue;
            };
            if let Err(e) = self.check_publishable(&title) {
                warn!("Cannot build {}: {}", path.display(), e);
                continue;
            }
            planned.push(PlannedBuild {
                source: document.path,
                job_name: self.job_name_for(&title),
                destination: self.destination_for(&title),
                title,
            });
        }
        Ok(planned)
    }

    /// Compile one source and publish its PDF under the title
    pub async fn build_document(&self, source: &Path, title: &str) -> Result<PathBuf, BuildError> {
        self.check_publishable(title)?;

        let job_name = self.job_name_for(title);
        let destination = self.destination_for(title);
        info!("Building {} → {}", source.display(), destination.display());

        let artifact = self.compiler.build(&job_name, source).await?;
        if !artifact.is_file() {
            return Err(BuildError::MissingArtifact(artifact));
        }

        let output_dir = self.output_dir();
        FileManager::ensure_dir(&output_dir).map_err(|source| BuildError::OutputDir {
            path: output_dir.clone(),
            source,
        })?;

        FileManager::move_file(&artifact, &destination).map_err(|source| BuildError::Move {
            from: artifact.clone(),
            to: destination.clone(),
            source,
        })?;

        if let Err(e) = self.compiler.clean(&job_name, source).await {
            debug!("Clean step failed for {}: {}", source.display(), e);
        }
        self.remove_aux_files(&job_name, source);

        Ok(destination)
    }

    // Delete whatever the clean step left behind
    fn remove_aux_files(&self, job_name: &JobName, source: &Path) {
        let dir = source_dir(source);
        for ext in &self.config.aux_extensions {
            let path = dir.join(job_name.file_name(ext));
            match FileManager::remove_if_exists(&path) {
                Ok(true) => debug!("Removed {}", path.display()),
                Ok(false) => {}
                Err(e) => warn!("Failed to remove {}: {}", path.display(), e),
            }
        }
    }

    /// Process one discovered source, turning per-file failures into an outcome
    pub async fn process_source(&self, path: &Path) -> Result<DocumentOutcome> {
        let document = self.inspect(path)?;

        let Some(title) = document.title else {
            warn!("No pdftitle in {}, skipping", path.display());
            return Ok(DocumentOutcome::Skipped { source: document.path });
        };

        match self.build_document(path, &title).await {
            Ok(output) => Ok(DocumentOutcome::Published {
                source: document.path,
                title,
                output,
            }),
            Err(e) if e.is_fatal() => Err(e.into()),
            Err(e) => {
                error!("Failed to compile {}: {}", path.display(), e);
                if let BuildError::Compile(crate::errors::CompileError::Failed { log_tail, .. }) = &e {
                    if !log_tail.is_empty() {
                        debug!("Compiler output:\n{}", log_tail);
                    }
                }
                Ok(DocumentOutcome::Failed {
                    source: document.path,
                    title,
                    error: e,
                })
            }
        }
    }

    /// Run the whole pipeline over the project directory
    ///
    /// Files without a title are skipped and per-file build failures are
    /// recorded; only errors that affect every file abort the run.
    pub async fn run(&self) -> Result<RunSummary> {
        let start_time = std::time::Instant::now();

        let sources = self.discover()?;
        info!("Found {} .{} files", sources.len(), self.config.source_extension);
        debug!(
            "Compiler: {}, filename style: {}, output: {}",
            self.config.compiler.command,
            self.config.filename_style,
            self.output_dir().display()
        );

        let progress_bar = ProgressBar::new(sources.len() as u64);
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(template_result.progress_chars("█▓▒░"));

        let mut outcomes = Vec::with_capacity(sources.len());
        for source in &sources {
            let file_name = source
                .file_name()
                .map(|f| f.to_string_lossy().to_string())
                .unwrap_or_else(|| "unknown".to_string());
            progress_bar.set_message(format!("Processing: {}", file_name));

            let outcome = match self.process_source(source).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    progress_bar.abandon();
                    return Err(e);
                }
            };
            outcomes.push(outcome);
            progress_bar.inc(1);
        }
        progress_bar.finish_and_clear();

        let summary = RunSummary {
            output_dir: self.output_dir(),
            outcomes,
        };

        info!(
            "Build completed in {}: {} published, {} skipped, {} failed",
            Self::format_duration(start_time.elapsed()),
            summary.published_count(),
            summary.skipped_count(),
            summary.failed_count()
        );
        info!("All PDFs saved to: {}", FileManager::display_path(&summary.output_dir).display());

        Ok(summary)
    }

    // Format duration in a human-readable format (HH:MM:SS)
    fn format_duration(duration: std::time::Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
