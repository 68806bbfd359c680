use anyhow::{anyhow, Context, Result};
use regex::Regex;
use serde::Deserialize;
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and resolving configuration settings.
/// Represents the application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Root of the tree scanned for LaTeX sources
    #[serde(default = "default_project_dir")]
    pub project_dir: PathBuf,

    /// Folder receiving the finished PDFs (relative paths resolve against `project_dir`)
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Extension of the source files to compile, without the dot
    #[serde(default = "default_source_extension")]
    pub source_extension: String,

    /// Pattern locating the title; capture group 1 holds the value
    #[serde(default = "default_title_pattern")]
    pub title_pattern: String,

    /// Maximum job name length accepted by the compiler
    #[serde(default = "default_max_job_name_len")]
    pub max_job_name_len: usize,

    /// How the published file is named after the title
    #[serde(default)]
    pub filename_style: FilenameStyle,

    /// Leftover files removed after each build, by extension
    #[serde(default = "default_aux_extensions")]
    pub aux_extensions: Vec<String>,

    /// Compiler invocation settings
    #[serde(default)]
    pub compiler: CompilerConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Naming scheme for published PDFs
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum FilenameStyle {
    // @style: Title used as-is
    #[default]
    Verbatim,
    // @style: Spaces in the title replaced by underscores
    Underscored,
}

impl FilenameStyle {
    // @returns: Output file stem for a title
    pub fn apply(&self, title: &str) -> String {
        match self {
            Self::Verbatim => title.to_string(),
            Self::Underscored => title.replace(' ', "_"),
        }
    }

    // @returns: Lowercase style identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::Verbatim => "verbatim".to_string(),
            Self::Underscored => "underscored".to_string(),
        }
    }
}

impl std::fmt::Display for FilenameStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

/// External compiler configuration
#[derive(Debug, Deserialize, Clone)]
pub struct CompilerConfig {
    // @field: Executable name or path
    #[serde(default = "default_compiler_command")]
    pub command: String,

    // @field: Flags placed before the job name on a build
    #[serde(default = "default_build_args")]
    pub build_args: Vec<String>,

    // @field: Flags placed before the job name on a clean
    #[serde(default = "default_clean_args")]
    pub clean_args: Vec<String>,

    /// Upper bound for one compiler invocation in seconds.
    /// None waits indefinitely.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            command: default_compiler_command(),
            build_args: default_build_args(),
            clean_args: default_clean_args(),
            timeout_secs: None,
        }
    }
}

/// Log verbosity level
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_project_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("PDFs")
}

fn default_source_extension() -> String {
    "tex".to_string()
}

fn default_title_pattern() -> String {
    crate::title_utils::DEFAULT_TITLE_PATTERN.to_string()
}

fn default_max_job_name_len() -> usize {
    crate::title_utils::MAX_JOB_NAME_LEN
}

fn default_aux_extensions() -> Vec<String> {
    ["aux", "log", "fdb_latexmk", "fls", "toc", "out"]
        .iter()
        .map(|ext| ext.to_string())
        .collect()
}

fn default_compiler_command() -> String {
    "latexmk".to_string()
}

fn default_build_args() -> Vec<String> {
    vec!["-pdf".to_string()]
}

fn default_clean_args() -> Vec<String> {
    vec!["-c".to_string()]
}

impl Config {
    /// Load the configuration from a JSON file, or use defaults if it doesn't exist
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {:?}", path))?;
        let reader = BufReader::new(file);
        let config: Config = serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        Ok(config)
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        let pattern = Regex::new(&self.title_pattern)
            .with_context(|| format!("Invalid title pattern: {}", self.title_pattern))?;
        if pattern.captures_len() < 2 {
            return Err(anyhow!("Title pattern must contain a capture group: {}", self.title_pattern));
        }

        if self.max_job_name_len == 0 {
            return Err(anyhow!("max_job_name_len must be greater than zero"));
        }

        if self.source_extension.trim_start_matches('.').is_empty() {
            return Err(anyhow!("source_extension must not be empty"));
        }

        if self.compiler.command.trim().is_empty() {
            return Err(anyhow!("Compiler command must not be empty"));
        }

        if self.compiler.timeout_secs == Some(0) {
            return Err(anyhow!("Compiler timeout must be greater than zero when set"));
        }

        Ok(())
    }

    /// Output directory with relative paths anchored at the project directory
    pub fn resolved_output_dir(&self) -> PathBuf {
        if self.output_dir.is_absolute() {
            self.output_dir.clone()
        } else {
            self.project_dir.join(&self.output_dir)
        }
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            project_dir: default_project_dir(),
            output_dir: default_output_dir(),
            source_extension: default_source_extension(),
            title_pattern: default_title_pattern(),
            max_job_name_len: default_max_job_name_len(),
            filename_style: FilenameStyle::default(),
            aux_extensions: default_aux_extensions(),
            compiler: CompilerConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
