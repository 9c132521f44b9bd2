// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, debug};
use std::io::Write;
use std::path::PathBuf;

use doctran::app_config::{self, Config, ProviderOverrides, TranslationProvider};
use doctran::app_controller::{Controller, RunOptions};
use doctran::translation::{TranslationService, Translator};

/// CLI Wrapper for TranslationProvider to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliTranslationProvider {
    #[value(name = "openai")]
    OpenAI,
    Anthropic,
}

impl From<CliTranslationProvider> for TranslationProvider {
    fn from(cli_provider: CliTranslationProvider) -> Self {
        match cli_provider {
            CliTranslationProvider::OpenAI => TranslationProvider::OpenAI,
            CliTranslationProvider::Anthropic => TranslationProvider::Anthropic,
        }
    }
}

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

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate shell completions for doctran
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug)]
struct TranslateArgs {
    /// File or directory to translate
    #[arg(value_name = "PATH", default_value = ".")]
    path: PathBuf,

    /// Force re-translation even if a translation exists
    #[arg(short, long)]
    force: bool,

    /// Don't search subdirectories
    #[arg(long)]
    no_recursive: bool,

    /// Model to use for translation (OpenAI default: $OPENAI_MODEL or gpt-4o)
    #[arg(short, long)]
    model: Option<String>,

    /// File extension to translate (repeatable, default: .md .txt)
    #[arg(short = 'e', long = "ext", value_name = "EXT")]
    extensions: Vec<String>,

    /// Show files that would be translated without translating them
    #[arg(long)]
    dry_run: bool,

    /// Translation provider to use
    #[arg(short, long, value_enum)]
    provider: Option<CliTranslationProvider>,

    /// API key for the provider (default: $OPENAI_API_KEY or $ANTHROPIC_API_KEY)
    #[arg(long)]
    api_key: Option<String>,

    /// Base URL of the provider API, e.g. an OpenAI-compatible local server
    #[arg(long)]
    base_url: Option<String>,

    /// Source language code (e.g., 'en')
    #[arg(short, long)]
    source_language: Option<String>,

    /// Target language code (e.g., 'zh', 'zh-Hant', 'fr')
    #[arg(short, long)]
    target_language: Option<String>,

    /// Suffix of translated file stems (default: '_' + target language, e.g. '_zh')
    #[arg(long)]
    marker: Option<String>,

    /// Optional JSON configuration file
    #[arg(short, long = "config")]
    config_path: Option<PathBuf>,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// doctran - batch document translation with AI
///
/// Translates text documents into a sibling file with a language marker
/// (`guide.md` -> `guide_zh.md`), skipping documents that already have one.
#[derive(Parser, Debug)]
#[command(name = "doctran")]
#[command(version)]
#[command(about = "Batch-translate text documents with AI providers")]
#[command(args_conflicts_with_subcommands = true)]
#[command(long_about = "doctran translates text documents with an AI provider and writes each
translation next to its source, e.g. guide.md -> guide_zh.md. Documents that
already have a translation are skipped unless --force is given, so an
interrupted run is resumed by running the same command again.

EXAMPLES:
    doctran                              # Translate .md and .txt under the current directory
    doctran docs/ --dry-run              # List what would be translated
    doctran -f README.md                 # Re-translate a single file
    doctran -e rst -e md --no-recursive  # Only top-level .rst and .md files
    doctran -p anthropic -t ja docs/     # Japanese with Anthropic, writes guide_ja.md
    doctran completions bash > doctran.bash

ENVIRONMENT:
    OPENAI_API_KEY                    API key for openai
    OPENAI_API_BASE / OPENAI_BASE_URL Custom OpenAI-compatible endpoint
    OPENAI_MODEL                      Default model for openai
    ANTHROPIC_API_KEY                 API key for anthropic
    ANTHROPIC_BASE_URL                Custom Anthropic endpoint

Command line options take precedence over the environment. Only the
variables of the selected provider are read.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    translate: TranslateArgs,
}

/// Coloured, timestamped stderr logger
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    /// New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    /// Install as the global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    /// Color escape and prefix for a log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("\x1B[1;31m", "✖ "),
            Level::Warn => ("\x1B[1;33m", "⚠ "),
            Level::Info => ("\x1B[1;32m", ""),
            Level::Debug => ("\x1B[1;36m", "» "),
            Level::Trace => ("\x1B[1;35m", "· "),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level && metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (color, prefix) = Self::style_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "{}{} {}{}\x1B[0m", color, now, prefix, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // The logger accepts everything; the effective level is set once config is loaded
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "doctran", &mut std::io::stdout());
            Ok(())
        }
        None => run_translate(cli.translate).await,
    }
}

/// Build the configuration from the optional config file and CLI/env overrides
fn load_config(options: &TranslateArgs) -> Result<Config> {
    let mut config = match &options.config_path {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    if let Some(provider) = &options.provider {
        config.translation.provider = provider.clone().into();
    }

    if let Some(source_lang) = &options.source_language {
        config.source_language = source_lang.clone();
    }

    if let Some(target_lang) = &options.target_language {
        config.target_language = target_lang.clone();
    }

    if !options.extensions.is_empty() {
        config.extensions = options.extensions.clone();
    }

    if options.no_recursive {
        config.recursive = false;
    }

    if let Some(marker) = &options.marker {
        config.translation_marker = Some(marker.clone());
    }

    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }

    let overrides = ProviderOverrides {
        model: options.model.clone(),
        api_key: options.api_key.clone(),
        base_url: options.base_url.clone(),
    };
    config.translation.apply_overrides(&overrides, |name| std::env::var(name).ok());

    Ok(config)
}

async fn run_translate(options: TranslateArgs) -> Result<()> {
    let config = load_config(&options)?;
    log::set_max_level(level_filter(&config.log_level));

    if !options.dry_run {
        config.validate_for_translation()
            .context("Configuration validation failed")?;
    }

    let run_options = RunOptions {
        force: options.force,
        recursive: config.recursive,
        extensions: config.extension_set(),
        dry_run: options.dry_run,
    };

    let service = if options.dry_run {
        None
    } else {
        let service = TranslationService::new(config.translation.clone());
        debug!("Using {} at {}", service.provider_name(), config.translation.get_endpoint());
        Some(service)
    };

    let controller = Controller::with_config(config)?;
    let translator = service.as_ref().map(|s| s as &dyn Translator);

    controller.run(&options.path, &run_options, translator).await?;

    Ok(())
}
