use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use time::OffsetDateTime;
use tracing_subscriber::EnvFilter;
use verdant_core::{
    FeedClient, Poller, PollerConfig, Snapshot, export_file_name, serialize_csv,
};

mod format;

use format::{FormatOptions, OutputFormat};

#[derive(Parser)]
#[command(name = "verdant")]
#[command(author, version, about = "Viewer for environmental sensor feeds", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the feed once and print a snapshot
    Fetch {
        /// Feed endpoint URL
        #[arg(short, long)]
        url: String,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Poll the feed continuously and print a snapshot per interval
    Watch {
        /// Feed endpoint URL
        #[arg(short, long)]
        url: String,

        /// Poll interval in seconds
        #[arg(short, long, default_value = "5")]
        interval: u64,

        /// Stop after this many snapshots (runs until Ctrl-C if omitted)
        #[arg(short, long)]
        count: Option<u64>,
    },

    /// Fetch the feed once and write the readings to a CSV file
    Export {
        /// Feed endpoint URL
        #[arg(short, long)]
        url: String,

        /// Output path (defaults to readings-<date>.csv in the current directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // When quiet mode is enabled, suppress info-level logging
    let filter = if cli.quiet {
        EnvFilter::new("warn")
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt().with_env_filter(filter).init();

    let opts = FormatOptions::new(cli.no_color);

    match cli.command {
        Commands::Fetch { url, format } => {
            let snapshot = fetch_once(&url).await?;
            match format {
                OutputFormat::Text => print!("{}", format::render_snapshot(&snapshot, &opts)),
                OutputFormat::Json => print!("{}", opts.as_json(&snapshot)?),
            }
        }
        Commands::Watch {
            url,
            interval,
            count,
        } => {
            watch(&url, Duration::from_secs(interval), count, &opts).await?;
        }
        Commands::Export { url, output } => {
            let snapshot = fetch_once(&url).await?;
            if snapshot.is_empty() {
                bail!("nothing to export: the feed returned no readings");
            }
            let path = output.unwrap_or_else(|| {
                PathBuf::from(export_file_name(OffsetDateTime::now_utc().date()))
            });
            fs::write(&path, serialize_csv(&snapshot.readings))
                .with_context(|| format!("failed to write {}", path.display()))?;
            if !cli.quiet {
                tracing::info!(
                    "wrote {} readings to {}",
                    snapshot.readings.len(),
                    path.display()
                );
            }
        }
    }

    Ok(())
}

/// Run a single refresh cycle against `url` and return the resulting snapshot.
///
/// Fetch failures are reflected in the snapshot rather than aborting, so the
/// caller can still show stale data alongside the error. A failure with no
/// data at all is reported as an error.
async fn fetch_once(url: &str) -> Result<Snapshot> {
    let client = FeedClient::new(url)?;
    let poller = Poller::new(client, PollerConfig::default())?;
    poller.refresh().await;
    let snapshot = poller.snapshot().await;
    if let Some(err) = &snapshot.last_error {
        if snapshot.is_empty() {
            bail!("fetch failed: {}", err.message);
        }
        tracing::warn!("fetch failed, showing stale data: {}", err.message);
    }
    Ok(snapshot)
}

async fn watch(
    url: &str,
    interval: Duration,
    count: Option<u64>,
    opts: &FormatOptions,
) -> Result<()> {
    let client = FeedClient::new(url)?;
    let config = PollerConfig::default().with_poll_interval(interval);
    let poller = Arc::new(Poller::new(client, config)?);
    let handle = poller.spawn();

    tracing::info!("watching {} every {}s", url, interval.as_secs());

    let mut printed = 0u64;
    let mut ticker = tokio::time::interval(interval);
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            _ = ticker.tick() => {
                // The spawned loop refreshes on its own schedule; this one
                // only decides when to print.
                let snapshot = poller.snapshot().await;
                print!("{}", format::render_snapshot(&snapshot, opts));
                println!("---");
                printed += 1;
                if count.is_some_and(|limit| printed >= limit) {
                    break;
                }
            }
        }
    }

    handle.close();
    Ok(())
}
