// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

use vocabcut::app_config::{self, Config};
use vocabcut::app_controller::{BurnOptions, BurnOutcome, Controller};
use vocabcut::database::Repository;
use vocabcut::file_utils::FileManager;
use vocabcut::models::BurnMode;

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

/// CLI Wrapper for BurnMode to implement ValueEnum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliBurnMode {
    Full,
    KeywordsOnly,
    TitleOnly,
}

impl From<CliBurnMode> for BurnMode {
    fn from(cli_mode: CliBurnMode) -> Self {
        match cli_mode {
            CliBurnMode::Full => BurnMode::Full,
            CliBurnMode::KeywordsOnly => BurnMode::KeywordsOnly,
            CliBurnMode::TitleOnly => BurnMode::TitleOnly,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Burn a job file, or every job file in a directory
    Burn(BurnArgs),

    /// Burn a series from the vocabulary store
    Series(SeriesArgs),

    /// Print a summary of a job as JSON without rendering
    Preview(PreviewArgs),

    /// Print the timed segments of a job file as JSON
    Split {
        /// Job file to split
        #[arg(value_name = "JOB_PATH")]
        job_path: PathBuf,
    },

    /// Generate shell completions for vocabcut
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Overrides shared by the burning commands
#[derive(Parser, Debug)]
struct RenderArgs {
    /// Output video file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Overlay elements to burn
    #[arg(short, long, value_enum)]
    mode: Option<CliBurnMode>,

    /// Title shown in the header bar
    #[arg(short, long)]
    title: Option<String>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,
}

impl From<&RenderArgs> for BurnOptions {
    fn from(args: &RenderArgs) -> Self {
        BurnOptions {
            output: args.output.clone(),
            mode: args.mode.map(Into::into),
            title: args.title.clone(),
            force_overwrite: args.force_overwrite,
        }
    }
}

#[derive(Parser, Debug)]
struct BurnArgs {
    /// Job file or directory of job files
    #[arg(value_name = "JOB_PATH")]
    job_path: PathBuf,

    #[command(flatten)]
    render: RenderArgs,
}

#[derive(Parser, Debug)]
struct SeriesArgs {
    /// Vocabulary store, defaults to the configured path
    #[arg(long)]
    db: Option<PathBuf>,

    /// Series id in the store
    #[arg(short, long)]
    series: i64,

    #[command(flatten)]
    render: RenderArgs,
}

#[derive(Parser, Debug)]
struct PreviewArgs {
    /// Job file to preview
    #[arg(value_name = "JOB_PATH", required_unless_present = "series")]
    job_path: Option<PathBuf>,

    /// Vocabulary store, defaults to the configured path
    #[arg(long)]
    db: Option<PathBuf>,

    /// Series id in the store
    #[arg(short, long, conflicts_with = "job_path")]
    series: Option<i64>,
}

/// vocabcut - vocabulary short-video burner
///
/// Turns transcribed, annotated videos into vocabulary-learning shorts with
/// bilingual subtitles and a highlighted focus word.
#[derive(Parser, Debug)]
#[command(name = "vocabcut")]
#[command(author = "vocabcut contributors")]
#[command(version = "1.0.0")]
#[command(about = "Burn vocabulary overlays into short videos")]
#[command(long_about = "vocabcut splits subtitle lines into short segments, picks a focus word for each and burns a title bar, bilingual subtitles and a word card into every clip.

EXAMPLES:
    vocabcut burn job.json                      # Burn one job file
    vocabcut burn -f -m keywords-only jobs/     # Burn every job in a directory
    vocabcut series --db store.db -s 9          # Burn series 9 from the store
    vocabcut preview job.json                   # Summarize a job as JSON
    vocabcut split job.json                     # Show the timed segments
    vocabcut completions bash > vocabcut.bash   # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, global = true, value_enum)]
    log_level: Option<CliLogLevel>,
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

    // @returns: Emoji for log level
    fn get_emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "❌ ",
            Level::Warn => "🚧 ",
            Level::Info => " ",
            Level::Debug => "🔍 ",
            Level::Trace => "📋 ",
        }
    }

    // @returns: ANSI color for log level
    fn get_color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let level = record.level();

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {} {}\x1B[0m",
                Self::get_color_for_level(level),
                now,
                Self::get_emoji_for_level(level),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Accept everything; the effective level is set through set_max_level
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(shell, &mut cmd, "vocabcut", &mut std::io::stdout());
        return Ok(());
    }

    if let Some(ref cmd_log_level) = cli.log_level {
        let level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(LevelFilter::from(&level));
    }

    let config = load_config(&cli.config_path, cli.log_level.clone())?;
    config.validate().context("Configuration validation failed")?;

    if cli.log_level.is_none() {
        log::set_max_level(LevelFilter::from(&config.log_level));
    }

    let controller = Controller::with_config(config.clone())?;

    match cli.command {
        Commands::Burn(args) => {
            let repository = configured_repository(&config, None)?;
            let lookup = repository.as_ref().map(|r| r as &dyn vocabcut::FrequencyLookup);
            let options = BurnOptions::from(&args.render);

            if FileManager::file_exists(&args.job_path) {
                controller.run_job_file(&args.job_path, &options, lookup).await?;
            } else if FileManager::dir_exists(&args.job_path) {
                let summary = controller.run_folder(&args.job_path, &options, lookup).await?;
                if summary.failed > 0 {
                    return Err(anyhow!("{} of the jobs failed", summary.failed));
                }
            } else {
                return Err(anyhow!("Job path does not exist: {:?}", args.job_path));
            }
        }
        Commands::Series(args) => {
            let repository = configured_repository(&config, args.db.as_deref())?
                .ok_or_else(|| anyhow!("No vocabulary store given (use --db or database.path)"))?;
            let options = BurnOptions::from(&args.render);

            if let BurnOutcome::Skipped(output) = controller.run_series(&repository, args.series, &options).await? {
                warn!("Series {} already burned to {:?}", args.series, output);
            }
        }
        Commands::Preview(args) => {
            let preview = match (args.job_path, args.series) {
                (Some(job_path), _) => {
                    let repository = configured_repository(&config, args.db.as_deref())?;
                    let lookup = repository.as_ref().map(|r| r as &dyn vocabcut::FrequencyLookup);
                    controller.preview_job_file(&job_path, lookup)?
                }
                (None, Some(series_id)) => {
                    let repository = configured_repository(&config, args.db.as_deref())?
                        .ok_or_else(|| anyhow!("No vocabulary store given (use --db or database.path)"))?;
                    controller.preview_series(&repository, series_id).await?
                }
                (None, None) => return Err(anyhow!("Either JOB_PATH or --series is required")),
            };
            println!("{}", serde_json::to_string_pretty(&preview)?);
        }
        Commands::Split { job_path } => {
            let segments = controller.split_job_file(&job_path)?;
            println!("{}", serde_json::to_string_pretty(&segments)?);
        }
        Commands::Completions { .. } => {}
    }

    Ok(())
}

/// Load the configuration file, creating a default one when it is missing
fn load_config(config_path: &str, log_level: Option<CliLogLevel>) -> Result<Config> {
    let mut config = if Path::new(config_path).exists() {
        let file = File::open(config_path).context(format!("Failed to open config file: {}", config_path))?;
        let reader = BufReader::new(file);
        serde_json::from_reader::<_, Config>(reader).context(format!("Failed to parse config file: {}", config_path))?
    } else {
        warn!("Config file not found at '{}', creating default config.", config_path);

        let config = Config::default();
        let config_json =
            serde_json::to_string_pretty(&config).context("Failed to serialize default config to JSON")?;
        FileManager::write_to_file(config_path, &config_json)
            .context(format!("Failed to write default config to file: {}", config_path))?;
        config
    };

    if let Some(log_level) = log_level {
        config.log_level = log_level.into();
    }

    Ok(config)
}

/// Open the store named on the command line or in the configuration
fn configured_repository(config: &Config, cli_path: Option<&Path>) -> Result<Option<Repository>> {
    let path = cli_path
        .map(Path::to_path_buf)
        .or_else(|| config.database.path.as_ref().map(PathBuf::from));

    match path {
        Some(path) => {
            if !path.exists() {
                return Err(anyhow!("Vocabulary store not found: {:?}", path));
            }
            Ok(Some(Repository::open(&path)?))
        }
        None => Ok(None),
    }
}
