//! One full run: catalog, scan, snapshot.

use std::path::Path;

use tracing::info;

use crate::arbitrage::{scan_markets, ScanStats};
use crate::config::Config;
use crate::error::Result;
use crate::market::{fetch_active_markets, StopReason, Venue};
use crate::report::{emit, ScanSnapshot};

/// What a run produced, for the console summary.
#[derive(Debug, Clone)]
pub struct ScanReport {
    /// Catalog pages requested.
    pub pages_requested: usize,
    /// Why the catalog walk stopped.
    pub catalog_stop: StopReason,
    /// Scanner counters.
    pub stats: ScanStats,
    /// The snapshot that was written.
    pub snapshot: ScanSnapshot,
}

/// Fetch the catalog, scan it, and write the snapshot to `snapshot_path`.
///
/// Venue failures only shrink the result. The only error is a failed
/// snapshot write.
pub async fn run_scan<V>(venue: &V, config: &Config, snapshot_path: &Path) -> Result<ScanReport>
where
    V: Venue + ?Sized,
{
    info!("Fetching active markets...");
    let catalog = fetch_active_markets(venue, config).await;
    info!(count = catalog.markets.len(), "Found active markets");

    info!("Scanning for YES+NO arbitrage...");
    let scan = scan_markets(venue, &catalog.markets, config).await;

    let snapshot = emit(snapshot_path, catalog.markets.len(), &scan.opportunities)?;

    Ok(ScanReport {
        pages_requested: catalog.pages_requested,
        catalog_stop: catalog.stop,
        stats: scan.stats,
        snapshot,
    })
}
