//! Polymarket YES/NO mispricing scanner entry point.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use rust_decimal::Decimal;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use clob_scan::config::Config;
use clob_scan::error::BotError;
use clob_scan::desk::{proposals_for, HttpTradeDesk, TradeDesk};
use clob_scan::market::ClobClient;
use clob_scan::metrics;
use clob_scan::pipeline::run_scan;
use clob_scan::report::{print_summary, read_snapshot};

/// Polymarket YES/NO mispricing scanner.
#[derive(Parser, Debug)]
#[command(name = "clob-scan")]
#[command(about = "Scan Polymarket binary markets for YES/NO pairs priced below 1.00")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one scan and write the snapshot (default).
    Scan {
        /// Snapshot path (overrides SNAPSHOT_PATH).
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print Prometheus metrics after the summary.
        #[arg(long)]
        metrics: bool,
    },

    /// Check configuration validity.
    CheckConfig,

    /// Propose trades for the top opportunities of a snapshot.
    Propose {
        /// Trade desk base URL.
        #[arg(long, env = "TRADE_DESK_URL")]
        desk_url: String,

        /// Agent name recorded on each proposal.
        #[arg(long, default_value = "clob-scan")]
        agent: String,

        /// Shares per leg.
        #[arg(long, default_value = "5")]
        quantity: Decimal,

        /// Opportunities to propose, in snapshot order.
        #[arg(long, default_value = "3")]
        top: usize,

        /// Snapshot path (overrides SNAPSHOT_PATH).
        #[arg(long)]
        snapshot: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Configuration feeds the log setup, so report a load failure after it
    let loaded = Config::load();

    // Initialize logging
    let (verbose, log_json, level) = match &loaded {
        Ok(c) => (args.verbose || c.verbose, c.log_json, c.rust_log.clone()),
        Err(_) => (args.verbose, false, "info".to_string()),
    };
    init_tracing(verbose, log_json, &level);

    match args.command {
        Some(Command::CheckConfig) => cmd_check_config(loaded),
        Some(Command::Scan { output, metrics }) => cmd_scan(load_valid(loaded)?, output, metrics).await,
        Some(Command::Propose {
            desk_url,
            agent,
            quantity,
            top,
            snapshot,
        }) => cmd_propose(load_valid(loaded)?, &desk_url, &agent, quantity, top, snapshot).await,
        None => cmd_scan(load_valid(loaded)?, None, false).await,
    }
}

fn init_tracing(verbose: bool, json: bool, level: &str) {
    let filter = if verbose {
        EnvFilter::new("clob_scan=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    };

    // stdout is reserved for the summary
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry.with(fmt::layer().with_writer(std::io::stderr)).init();
    }
}

fn load_valid(loaded: Result<Config, envy::Error>) -> clob_scan::Result<Config> {
    let config = loaded.map_err(|e| {
        let err = BotError::from(e);
        error!("Failed to load configuration: {}", err);
        err
    })?;

    config.validated().map_err(|e| {
        error!("{}", e);
        e
    })
}

/// Check configuration validity.
fn cmd_check_config(loaded: Result<Config, envy::Error>) -> anyhow::Result<()> {
    println!("======================================================================");
    println!("CLOB SCAN - CONFIGURATION CHECK");
    println!("======================================================================");

    print!("Loading configuration... ");
    let config = match loaded {
        Ok(c) => {
            println!("OK");
            c
        }
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration load failed"));
        }
    };

    print!("Validating configuration... ");
    match config.validate() {
        Ok(()) => println!("OK"),
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration validation failed"));
        }
    }

    println!("----------------------------------------------------------------------");
    println!("Configuration Summary:");
    println!("  CLOB URL: {}", config.polymarket_clob_url);
    println!("  Page Size: {} (max {} pages)", config.page_size, config.max_pages);
    println!(
        "  Timeouts: catalog {}ms, book {}ms",
        config.catalog_timeout_ms, config.book_timeout_ms
    );
    println!("  Book Concurrency: {}", config.book_concurrency);
    println!("  Mispricing Threshold: {}", config.mispricing_threshold);
    println!("  Snapshot: {}", config.snapshot_path.display());
    println!("======================================================================");
    println!("CONFIGURATION CHECK PASSED");
    println!("======================================================================");

    Ok(())
}

/// Run one scan.
async fn cmd_scan(config: Config, output: Option<PathBuf>, with_metrics: bool) -> anyhow::Result<()> {
    let prometheus = if with_metrics {
        Some(install_prometheus()?)
    } else {
        None
    };
    metrics::init_metrics();

    let snapshot_path = output.unwrap_or_else(|| config.snapshot_path.clone());
    let client = ClobClient::new(&config).map_err(BotError::from)?;

    info!(
        url = %client.clob_url(),
        threshold = %config.mispricing_threshold,
        "Starting scan"
    );

    let report = tokio::select! {
        result = run_scan(&client, &config, &snapshot_path) => result?,
        _ = tokio::signal::ctrl_c() => {
            warn!("Interrupted; no snapshot written");
            return Err(anyhow::anyhow!("scan interrupted"));
        }
    };

    print_summary(
        &report.stats,
        &report.catalog_stop,
        &report.snapshot.arbitrage_opportunities,
        config.summary_top_n,
    );

    if let Some(handle) = prometheus {
        println!("{}", handle.render());
    }

    Ok(())
}

fn install_prometheus() -> anyhow::Result<PrometheusHandle> {
    PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics recorder: {}", e))
}

/// Propose the top opportunities of a snapshot to a trade desk.
async fn cmd_propose(
    config: Config,
    desk_url: &str,
    agent: &str,
    quantity: Decimal,
    top: usize,
    snapshot: Option<PathBuf>,
) -> anyhow::Result<()> {
    let path = snapshot.unwrap_or_else(|| config.snapshot_path.clone());
    let snapshot = read_snapshot(&path).map_err(BotError::from)?;
    let desk = HttpTradeDesk::new(desk_url).map_err(BotError::from)?;

    info!(
        path = %path.display(),
        opportunities = snapshot.arbitrage_opportunities.len(),
        desk = %desk.base_url(),
        "Proposing trades"
    );

    let mut proposed = 0usize;
    let mut failed = 0usize;

    for opp in snapshot.arbitrage_opportunities.iter().take(top) {
        for proposal in proposals_for(opp, agent, quantity) {
            match desk.propose(&proposal).await {
                Ok(record) => {
                    proposed += 1;
                    println!(
                        "  {} | {} {} @ {} | {}",
                        record.id,
                        record.side,
                        record.symbol,
                        record
                            .price_limit
                            .map(|p| p.to_string())
                            .unwrap_or_else(|| "-".to_string()),
                        record.status
                    );
                }
                Err(e) => {
                    failed += 1;
                    warn!(symbol = %proposal.symbol, error = %e, "Proposal failed");
                }
            }
        }
    }

    println!("Proposed {} trades ({} failed)", proposed, failed);

    Ok(())
}
