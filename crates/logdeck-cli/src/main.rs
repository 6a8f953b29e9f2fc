//! logdeck CLI
//!
//! Sample programs for the logdeck logging core.
//!
//! ## Usage
//!
//! ```bash
//! # Walk through the main features
//! logdeck demo
//!
//! # Emit one record
//! logdeck emit --subject api --level info "server started"
//!
//! # Emit as JSON with two frames of call-site trace
//! logdeck emit --subject api --level error --format json --trace-depth 2 "boom"
//!
//! # Apply a configuration file and append to a log file
//! logdeck emit --config logging.json --file ./logs/app.log --level debug "cache warm"
//!
//! # Show the effective default level options
//! logdeck levels --config logging.json
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{TimeZone, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use logdeck_core::driver::FileDriver;
use logdeck_core::formatter::{formatter_fn, Entry, JsonFormatter, TextFormatter};
use logdeck_core::{Factory, LevelSet, LevelUpdate, LoggingConfig, Registry};

/// logdeck - per-level configurable loggers
#[derive(Parser)]
#[command(name = "logdeck")]
#[command(version = "0.1.0")]
#[command(about = "logdeck - per-level configurable loggers")]
struct Cli {
    /// Increase verbosity of logdeck's own diagnostics (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Walk through muting, tracing, factories and cloning
    Demo,

    /// Emit a single log record
    Emit {
        /// Logger subject
        #[arg(short, long, default_value = "logdeck")]
        subject: String,

        /// Level name
        #[arg(short, long, default_value = "info")]
        level: String,

        /// Number of call-site frames to append
        #[arg(short, long, allow_negative_numbers = true)]
        trace_depth: Option<i64>,

        /// Output format
        #[arg(short, long, value_enum)]
        format: Option<Format>,

        /// JSON logging configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Append to this file instead of writing to stdout
        #[arg(long)]
        file: Option<PathBuf>,

        /// The message to log
        message: String,
    },

    /// Print the default level options
    Levels {
        /// JSON logging configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn setup_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .init();
}

/// Factory from an optional configuration file.
fn load_factory(config: Option<&PathBuf>, registry: &Registry<str>) -> Result<Factory<str>> {
    match config {
        Some(path) => {
            let config = LoggingConfig::load(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?;
            Ok(config.build_factory(registry)?)
        }
        None => Ok(Factory::new(LevelSet::default())),
    }
}

fn run_demo() -> Result<()> {
    println!("------------------ Quick Start ------------------");

    let mut logger_a = logdeck_core::create_logger("A");
    logger_a.info("This is INFO log.")?;
    logger_a.error("This is ERROR log.")?;

    logger_a.set_level_options(LevelUpdate::new().level("debug").enabled(false));
    logger_a.debug("This is DEBUG log but it won't be output because it's muted.")?;
    logger_a.warning("This is WARNING log.")?;
    logger_a.notice("This is NOTICE log.")?;

    logger_a.set_level_options(LevelUpdate::new().level("debug").enabled(true));
    logger_a.debug("This is DEBUG log.")?;

    logger_a.set_level_options(LevelUpdate::new().trace_depth(2));
    logger_a.info("This is INFO log with at most 2 lines of stack traces.")?;
    logger_a.set_level_options(LevelUpdate::new().trace_depth(0));

    logger_a.set_level_options(LevelUpdate::new().level("debug").trace_depth(10));
    logger_a.error("This is ERROR log without stack traces.")?;
    logger_a.debug("This is DEBUG log with at most 10 lines of stack traces.")?;
    logger_a.set_level_options(LevelUpdate::new().trace_depth(0));

    let fixed = Utc
        .with_ymd_and_hms(2018, 2, 1, 11, 22, 33)
        .single()
        .context("invalid demo timestamp")?;
    logger_a.debug_at("See the log time", fixed)?;

    // New defaults only reach loggers created afterwards.
    logdeck_core::default_factory()
        .lock()
        .set_level_options(LevelUpdate::new().levels(["error", "debug", "warning"]).enabled(false));
    let logger_b = logdeck_core::create_logger("B");
    logger_b.info("This is INFO log.")?;
    logger_b.error("This is ERROR log. but will not be output.")?;
    logger_b.debug("This is DEBUG log. but will not be output.")?;
    logger_a.warning("This is WARNING log from A, still enabled.")?;

    println!("------------------ Clone Method ------------------");

    let mut logger_a = logdeck_core::create_logger("A");
    logger_a.set_level_options(LevelUpdate::new().enabled(true));
    logger_a.set_level_options(LevelUpdate::new().level("debug").enabled(false));
    logger_a.info("This is INFO log.")?;

    let mut logger_b = logger_a.clone();
    logger_b.set_subject("B");
    logger_b.info("This is INFO log from B.")?;
    logger_b.debug("This is DEBUG log from B but will not be output.")?;

    logger_a.set_level_options(LevelUpdate::new().level("debug").enabled(true));
    logger_a.debug("This is DEBUG log from A and will be output.")?;
    logger_b.debug("This is DEBUG log from B but will not be output.")?;

    println!("------------------ Custom Formatter ------------------");

    let formatter = formatter_fn(|e: &Entry<'_, str>| {
        Ok(format!("{} - {} - {} - {}", e.time.to_rfc3339(), e.subject, e.level, e.log))
    });
    let mut factory = Factory::<str>::new(LevelSet::default());
    factory.set_level_options(LevelUpdate::new().formatter(formatter));
    factory.create_logger("Custom").info_at("Login succeed", fixed)?;

    Ok(())
}

fn run_emit(
    subject: &str,
    level: &str,
    trace_depth: Option<i64>,
    format: Option<Format>,
    config: Option<&PathBuf>,
    file: Option<&PathBuf>,
    message: &str,
) -> Result<()> {
    let registry = Registry::<str>::with_builtins();
    let factory = load_factory(config, &registry)?;
    let mut logger = factory.create_logger(subject);

    let mut update = LevelUpdate::<str>::new();
    if let Some(depth) = trace_depth {
        update = update.trace_depth(depth);
    }
    match format {
        Some(Format::Text) => update = update.formatter(Arc::new(TextFormatter)),
        Some(Format::Json) => update = update.formatter(Arc::new(JsonFormatter)),
        None => {}
    }
    if let Some(path) = file {
        let driver = FileDriver::new(path)
            .with_context(|| format!("Failed to open log file {}", path.display()))?;
        update = update.driver(Arc::new(driver));
    }
    logger.set_level_options(update);

    tracing::debug!(subject, level, "emitting record");
    logger.log(level, message)?;
    if let Some(result) = logger.flush(level).ready() {
        result?;
    }
    Ok(())
}

fn run_levels(config: Option<&PathBuf>) -> Result<()> {
    let registry = Registry::<str>::with_builtins();
    let factory = load_factory(config, &registry)?;

    for name in factory.levels().iter() {
        let Some(options) = factory.get_level_options(name) else {
            continue;
        };
        println!(
            "{:<10} {:<8} trace_depth={}",
            name,
            if options.enabled { "enabled" } else { "muted" },
            options.trace_depth
        );
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    match cli.command {
        Commands::Demo => run_demo(),
        Commands::Emit {
            subject,
            level,
            trace_depth,
            format,
            config,
            file,
            message,
        } => run_emit(
            &subject,
            &level,
            trace_depth,
            format,
            config.as_ref(),
            file.as_ref(),
            &message,
        ),
        Commands::Levels { config } => run_levels(config.as_ref()),
    }
}
