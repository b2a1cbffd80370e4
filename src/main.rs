use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::args::{FilterArgs, SourceArgs, WindowArgs};
use commands::reconcile::ReportOptions;

#[derive(Parser)]
#[command(
    name = "berthwatch",
    version,
    about = "Reconcile shipment orders against the terminal's vessel arrival schedule",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (TOML); defaults to BERTHWATCH_* environment variables
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log format (text, json); overrides the configured format
    #[arg(long, global = true)]
    log_format: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch and print the normalized vessel schedule
    Schedule {
        #[command(flatten)]
        window: WindowArgs,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Reconcile orders against the schedule
    Reconcile {
        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        window: WindowArgs,

        #[command(flatten)]
        filter: FilterArgs,

        /// Also list orders without a forecast
        #[arg(long)]
        unmatched: bool,

        /// Also list schedule entries no order referenced
        #[arg(long)]
        unused: bool,

        /// Print JSON instead of tables
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = commands::load_config(cli.config.as_deref())?;

    // Initialize tracing/logging
    let log_format = cli.log_format.as_deref().unwrap_or(&config.logging.format);
    setup_tracing(log_format, &config.logging.level, cli.verbose)?;

    tracing::info!("berthwatch starting");

    match cli.command {
        Commands::Schedule { window, json } => {
            tracing::info!(
                since = ?window.since,
                key_schema = ?window.key_schema,
                json = %json,
                "Starting schedule command"
            );
            commands::apply_key_schema(&mut config, window.key_schema);
            commands::schedule(config, window.since, json).await?;
        }

        Commands::Reconcile {
            source,
            window,
            filter,
            unmatched,
            unused,
            json,
        } => {
            let source = source.into_source()?;
            tracing::info!(
                mode = source.mode(),
                since = ?window.since,
                key_schema = ?window.key_schema,
                "Starting reconcile command"
            );
            commands::apply_key_schema(&mut config, window.key_schema);
            let options = ReportOptions {
                unmatched,
                unused,
                json,
            };
            commands::reconcile(config, source, window.since, filter.to_filter(), options).await?;
        }
    }

    tracing::info!("berthwatch completed successfully");
    Ok(())
}

fn setup_tracing(format: &str, level: &str, verbose: bool) -> Result<()> {
    let env_filter = if verbose {
        tracing_subscriber::EnvFilter::new("berthwatch=debug,info")
    } else {
        tracing_subscriber::EnvFilter::try_new(format!("berthwatch={level},warn"))?
    };

    // Logs go to stderr so tables and JSON on stdout stay clean
    match format {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
                .init();
        }
    }

    Ok(())
}
