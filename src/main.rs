// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{info, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::PathBuf;

use texbuild::app_config::{self, Config, FilenameStyle};
use texbuild::app_controller::Controller;

/// Config file looked up in the project directory when --config is not given
const DEFAULT_CONFIG_FILE: &str = "texbuild.json";

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

/// CLI Wrapper for FilenameStyle to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliFilenameStyle {
    Verbatim,
    Underscored,
}

impl From<CliFilenameStyle> for FilenameStyle {
    fn from(cli_style: CliFilenameStyle) -> Self {
        match cli_style {
            CliFilenameStyle::Verbatim => FilenameStyle::Verbatim,
            CliFilenameStyle::Underscored => FilenameStyle::Underscored,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate shell completions for texbuild
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug)]
struct BuildArgs {
    /// Directory scanned recursively for LaTeX sources
    #[arg(value_name = "PROJECT_DIR")]
    project_dir: Option<PathBuf>,

    /// Folder receiving the PDFs (relative to PROJECT_DIR unless absolute)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long)]
    config_path: Option<PathBuf>,

    /// Compiler executable
    #[arg(long, env = "TEXBUILD_COMPILER")]
    compiler: Option<String>,

    /// How PDFs are named after their title
    #[arg(long, value_enum)]
    filename_style: Option<CliFilenameStyle>,

    /// Give up on a single compiler run after this many seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// List what would be built without running the compiler
    #[arg(short = 'n', long)]
    dry_run: bool,
}

/// texbuild - compile LaTeX sources into PDFs named after their pdftitle
#[derive(Parser, Debug)]
#[command(name = "texbuild")]
#[command(version)]
#[command(about = "Batch-compile LaTeX sources into PDFs named after their pdftitle")]
#[command(args_conflicts_with_subcommands = true)]
#[command(long_about = "texbuild finds every .tex file under a project directory, reads the
pdftitle from its \\hypersetup block, compiles it with latexmk and moves the
PDF into one output folder under that title.

EXAMPLES:
    texbuild                                  # Build everything under the current directory
    texbuild notes/ -o out                    # Write PDFs to notes/out
    texbuild -n                               # Show what would be built
    texbuild --filename-style underscored     # My_Great_Paper.pdf instead of My Great Paper.pdf
    texbuild --log-level debug                # Show compiler output on failures
    texbuild completions bash > texbuild.bash # Generate bash completions

CONFIGURATION:
    Settings are read from texbuild.json in the project directory when present,
    or from the file given with --config. Command line flags take precedence.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    build: BuildArgs,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji and ANSI color for log level
    fn decoration_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("❌", "1;31"),
            Level::Warn => ("⚠️", "1;33"),
            Level::Info => ("▶", "1;32"),
            Level::Debug => ("🔍", "1;36"),
            Level::Trace => ("📋", "1;35"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        // The max level set through log::set_max_level is the effective filter
        metadata.level() <= self.level.max(log::max_level())
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (emoji, color) = Self::decoration_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "\x1B[{}m{} {} {}\x1B[0m", color, now, emoji, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Info by default; adjusted once the config is loaded
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "texbuild", &mut std::io::stdout());
            Ok(())
        }
        None => run_build(cli.build).await,
    }
}

// Load the config file and apply command line overrides
fn resolve_config(options: &BuildArgs) -> Result<Config> {
    let project_dir = options.project_dir.clone().unwrap_or_else(|| PathBuf::from("."));

    let mut config = match &options.config_path {
        Some(path) => {
            if !path.exists() {
                return Err(anyhow!("Config file not found: {:?}", path));
            }
            Config::load_or_default(path)?
        }
        None => Config::load_or_default(project_dir.join(DEFAULT_CONFIG_FILE))?,
    };

    if options.project_dir.is_some() {
        config.project_dir = project_dir;
    }

    if let Some(output_dir) = &options.output_dir {
        config.output_dir = output_dir.clone();
    }

    if let Some(compiler) = &options.compiler {
        config.compiler.command = compiler.clone();
    }

    if let Some(style) = &options.filename_style {
        config.filename_style = style.clone().into();
    }

    if let Some(timeout) = options.timeout {
        config.compiler.timeout_secs = Some(timeout);
    }

    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }

    Ok(config)
}

async fn run_build(options: BuildArgs) -> Result<()> {
    let config = resolve_config(&options)?;
    log::set_max_level(config.log_level.to_level_filter());

    let controller = Controller::with_config(config)?;

    if options.dry_run {
        let planned = controller.plan().context("Failed to plan build")?;
        info!("{} document(s) would be built", planned.len());
        for build in planned {
            println!(
                "{} -> {} (job name: {})",
                build.source.display(),
                build.destination.display(),
                build.job_name
            );
        }
        return Ok(());
    }

    controller.run().await?;
    Ok(())
}
