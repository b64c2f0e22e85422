// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, error, info};
use once_cell::sync::OnceCell;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use polytrans::app_config::{self, Config, Credentials};
use polytrans::app_controller::{
    Controller, DEFAULT_EVALUATION_FILE, DEFAULT_SCRAPED_FILE, DEFAULT_TRANSLATIONS_FILE, TextSource,
};
use polytrans::evaluation::GoogleTranslate;
use polytrans::language_utils::SupportedLanguage;
use polytrans::providers::ProviderAdapter;

/// Text translated when no source is given
const DEFAULT_TEXT: &str = "Best forex brokers in [country]";

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
    /// Translate a text into every selected provider and language
    Translate(TranslateArgs),

    /// Score a translation table against baseline translations
    Evaluate {
        /// CSV file whose first column is 'Original Text' or 'English'
        #[arg(value_name = "INPUT_CSV")]
        input: PathBuf,

        /// Output CSV file
        #[arg(short, long, default_value = DEFAULT_EVALUATION_FILE)]
        output: PathBuf,
    },

    /// Extract the main text of a web page
    Scrape {
        /// Page URL
        url: String,

        /// Output text file
        #[arg(short, long, default_value = DEFAULT_SCRAPED_FILE)]
        output: PathBuf,

        /// Print the text instead of writing a file
        #[arg(long)]
        stdout: bool,
    },

    /// Generate shell completions for polytrans
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug)]
struct TranslateArgs {
    /// Text to translate
    #[arg(short, long, conflicts_with_all = ["url", "file"])]
    text: Option<String>,

    /// Translate the main text of this web page
    #[arg(short, long, conflicts_with = "file")]
    url: Option<String>,

    /// Translate the contents of this text file
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Providers to use (comma separated)
    #[arg(short, long, value_delimiter = ',', default_value = "OpenAI")]
    providers: Vec<String>,

    /// Target languages (comma separated names or codes)
    #[arg(short, long, value_delimiter = ',', default_value = "Spanish")]
    languages: Vec<SupportedLanguage>,

    /// Output CSV file
    #[arg(short, long, default_value = DEFAULT_TRANSLATIONS_FILE)]
    output: PathBuf,
}

impl TranslateArgs {
    fn source(&self) -> TextSource {
        if let Some(url) = &self.url {
            TextSource::Url(url.clone())
        } else if let Some(path) = &self.file {
            TextSource::File(path.clone())
        } else {
            TextSource::Literal(self.text.clone().unwrap_or_else(|| DEFAULT_TEXT.to_string()))
        }
    }
}

/// polytrans - translate with several LLM providers and score the results
#[derive(Parser, Debug)]
#[command(name = "polytrans")]
#[command(version)]
#[command(about = "Multi-provider translation with placeholder preservation and quality scoring")]
#[command(long_about = "polytrans translates a text with several LLM providers into several languages,
keeping bracketed placeholders such as [country] intact, and scores translation
tables against a baseline translation (BLEU, METEOR, fluency, word matching).

EXAMPLES:
    polytrans translate -t \"Best forex brokers in [country]\" -p OpenAI,Anthropic -l Spanish,French
    polytrans translate -u https://example.com/page -p DeepSeek -l ja
    polytrans evaluate translations.csv -o evaluation.csv
    polytrans scrape https://example.com/page --stdout
    polytrans completions bash > polytrans.bash

CONFIGURATION:
    Configuration is stored in conf.json by default. If the file doesn't exist,
    a default one is created. API keys are read from the environment
    (OPENAI_API_KEY, DEEPSEEK_API_KEY, ANTHROPIC_API_KEY); a .env file in the
    working directory is loaded first.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(long, global = true, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// Plain-text copy of every log line
static LOG_FILE: OnceCell<Mutex<File>> = OnceCell::new();

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

    // @attaches: Log file receiving uncolored lines
    fn attach_file(path: &str) -> Result<()> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open log file: {}", path))?;
        let _ = LOG_FILE.set(Mutex::new(file));
        Ok(())
    }

    // @returns: Color code for log level
    fn get_color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "1;31",
            Level::Warn => "1;33",
            Level::Info => "1;32",
            Level::Debug => "1;36",
            Level::Trace => "1;35",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now();

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "\x1B[{}m{} {}\x1B[0m",
                Self::get_color_for_level(record.level()),
                now.format("%H:%M:%S.%3f"),
                record.args()
            );

            if let Some(Ok(mut file)) = LOG_FILE.get().map(|f| f.lock()) {
                let _ = writeln!(
                    file,
                    "{} - {} - {}",
                    now.format("%Y-%m-%d %H:%M:%S,%3f"),
                    record.level(),
                    record.args()
                );
            }
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
        if let Some(Ok(mut file)) = LOG_FILE.get().map(|f| f.lock()) {
            let _ = file.flush();
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger with the most verbose level; the effective level
    // is applied through set_max_level once the config is known
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    // Parse command line arguments using clap
    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "polytrans", &mut std::io::stdout());
        return Ok(());
    }

    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            return Err(e).context("Failed to load .env file");
        }
    }

    // Every pipeline command needs the provider keys, checked before any setup
    let credentials = Credentials::from_env()?;

    // Load or create configuration, then apply the command line log level
    let mut config = Config::load_or_create(&cli.config_path)?;
    if let Some(log_level) = &cli.log_level {
        config.log_level = log_level.clone().into();
    }
    log::set_max_level(config.log_level.to_level_filter());
    if let Some(path) = &config.log_file {
        CustomLogger::attach_file(path)?;
    }

    let controller = Controller::with_config(config)?;

    let outcome = run(&controller, &credentials, cli.command).await;
    if let Err(e) = &outcome {
        error!("{:#}", e);
    }
    log::logger().flush();
    outcome
}

async fn run(controller: &Controller, credentials: &Credentials, command: Commands) -> Result<()> {
    match command {
        Commands::Translate(args) => {
            let adapter = ProviderAdapter::from_config(controller.config(), credentials)?;

            let batch = controller
                .translate(adapter, &args.source(), &args.providers, &args.languages, &args.output)
                .await?;
            for result in &batch.results {
                println!("{}: {}", result.key(), result.cell());
            }
        }
        Commands::Evaluate { input, output } => {
            let baseline = Arc::new(GoogleTranslate::from_config(&controller.config().baseline));
            let report = controller.evaluate(baseline, &input, &output).await?;
            if report.is_empty() {
                println!("No evaluation data generated.");
            }
        }
        Commands::Scrape { url, output, stdout } => {
            let output = if stdout { None } else { Some(output.as_path()) };
            controller.scrape(&url, output).await?;
        }
        Commands::Completions { .. } => {
            info!("Completions are generated before configuration is loaded");
        }
    }
    Ok(())
}
