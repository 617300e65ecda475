//! Call Monitor CLI
//!
//! Screens one call per run and writes its audit record.

use call_monitor::{
    AlertError, CallLogger, CallMonitor, CallRecord, Config, InputCollector, KeywordRegistry,
    Notifier, READY_BANNER, VERSION,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "call-monitor")]
#[command(version = VERSION)]
#[command(about = "Heuristic call screening with JSON audit logs", long_about = None)]
struct Cli {
    /// Directory for per-call log files (overrides the config file)
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// Extra fraud keyword to watch for (repeatable)
    #[arg(long = "keyword", global = true)]
    keywords: Vec<String>,

    /// Do not send email alerts for flagged calls
    #[arg(long, global = true)]
    no_email: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Prompt for one call and analyze it (default)
    Analyze,

    /// Analyze one call given on the command line
    Check {
        #[arg(long)]
        id: String,

        /// Call duration in seconds
        #[arg(long)]
        duration: String,

        /// Number of calls from this caller
        #[arg(long)]
        frequency: String,

        #[arg(long)]
        transcript: String,
    },

    /// List the active fraud keywords
    Keywords,

    /// Show configuration
    Config {
        /// Write the default configuration file if none exists
        #[arg(long)]
        init: bool,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let mut config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("Could not load configuration, using defaults: {e}");
            Config::default()
        }
    };
    if let Some(dir) = cli.log_dir {
        config.log_dir = dir;
    }
    if cli.no_email {
        config.alert.enabled = false;
    }
    config.extra_keywords.extend(cli.keywords);

    match cli.command.unwrap_or(Commands::Analyze) {
        Commands::Analyze => cmd_analyze(&config).await,
        Commands::Check {
            id,
            duration,
            frequency,
            transcript,
        } => cmd_check(&config, &id, &duration, &frequency, &transcript).await,
        Commands::Keywords => cmd_keywords(&config),
        Commands::Config { init } => cmd_config(&config, init),
    }
}

async fn cmd_analyze(config: &Config) {
    let Some(monitor) = build_monitor(config) else {
        return;
    };
    tracing::info!("{READY_BANNER}");

    let stdin = std::io::stdin();
    let mut collector = InputCollector::new(stdin.lock(), std::io::stdout());
    let record = match collector.collect() {
        Ok(record) => record,
        Err(e) => {
            tracing::error!("{e}");
            return;
        }
    };

    run_call(&monitor, &record).await;
}

async fn cmd_check(config: &Config, id: &str, duration: &str, frequency: &str, transcript: &str) {
    let record = match CallRecord::parse(id, duration, frequency, transcript) {
        Ok(record) => record,
        Err(e) => {
            tracing::error!("{e}. Aborting analysis.");
            return;
        }
    };

    let Some(monitor) = build_monitor(config) else {
        return;
    };
    run_call(&monitor, &record).await;
}

fn cmd_keywords(config: &Config) {
    let registry = build_registry(config);

    println!("Fraud keywords ({})", registry.len());
    println!("==============");
    for keyword in registry.iter() {
        println!("  {keyword}");
    }
}

fn cmd_config(config: &Config, init: bool) {
    let path = Config::config_path();

    if init {
        if path.exists() {
            println!("Config file already exists: {path:?}");
        } else if let Err(e) = Config::default().save() {
            eprintln!("Error saving config: {e}");
        } else {
            println!("Wrote default config to {path:?}");
        }
    }

    println!("Configuration");
    println!("=============");
    println!();
    println!("Config file: {path:?}");
    println!();

    let mut shown = config.clone();
    shown.alert = config.alert.redacted();
    println!(
        "{}",
        serde_json::to_string_pretty(&shown).unwrap_or_else(|_| "Error".to_string())
    );
}

/// Process one call and wait for its alert so the runtime does not drop it.
async fn run_call(monitor: &CallMonitor, record: &CallRecord) {
    match monitor.process(record) {
        Ok(outcome) => {
            if let Some(alert) = outcome.alert {
                // Transport results are logged by the alert task itself.
                if let Err(e @ AlertError::Task(_)) = alert.wait().await {
                    tracing::error!("Failed to send email alert: {e}");
                }
            }
        }
        Err(e) => tracing::error!("{e}"),
    }
}

fn build_registry(config: &Config) -> KeywordRegistry {
    let mut registry = KeywordRegistry::new();
    for keyword in &config.extra_keywords {
        if let Err(e) = registry.add(keyword) {
            tracing::warn!("Skipping keyword {keyword:?}: {e}");
        }
    }
    registry
}

fn build_monitor(config: &Config) -> Option<CallMonitor> {
    let logger = match CallLogger::open(&config.log_dir) {
        Ok(logger) => logger,
        Err(e) => {
            tracing::error!("{e}");
            return None;
        }
    };

    let notifier = match Notifier::from_config(&config.alert) {
        Ok(notifier) => notifier,
        Err(e) => {
            tracing::warn!("Email alerts unavailable: {e}");
            Notifier::disabled()
        }
    };

    Some(
        CallMonitor::new(build_registry(config), logger, notifier)
            .with_strict_audit(config.strict_audit),
    )
}
