//! The scan snapshot artifact.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::{info, instrument};

use crate::arbitrage::ArbitrageOpportunity;
use crate::error::ReportError;

/// Everything one run produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanSnapshot {
    /// When the run finished, UTC.
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    /// Markets examined.
    pub markets_count: usize,
    /// Flagged markets in scan order.
    pub arbitrage_opportunities: Vec<ArbitrageOpportunity>,
}

impl ScanSnapshot {
    /// Snapshot stamped with the current UTC time.
    pub fn new(markets_count: usize, opportunities: Vec<ArbitrageOpportunity>) -> Self {
        Self {
            timestamp: OffsetDateTime::now_utc(),
            markets_count,
            arbitrage_opportunities: opportunities,
        }
    }
}

/// Build the snapshot for this run and write it to `path`, replacing any prior file.
pub fn emit(
    path: &Path,
    markets_count: usize,
    opportunities: &[ArbitrageOpportunity],
) -> Result<ScanSnapshot, ReportError> {
    let snapshot = ScanSnapshot::new(markets_count, opportunities.to_vec());
    write_snapshot(path, &snapshot)?;
    Ok(snapshot)
}

/// Serialize `snapshot` as pretty JSON in a single write.
#[instrument(skip(snapshot), fields(path = %path.display()))]
pub fn write_snapshot(path: &Path, snapshot: &ScanSnapshot) -> Result<(), ReportError> {
    let body = serde_json::to_vec_pretty(snapshot)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| ReportError::Write {
            path: path.to_path_buf(),
            source,
        })?;
    }

    fs::write(path, body).map_err(|source| ReportError::Write {
        path: path.to_path_buf(),
        source,
    })?;

    info!(
        opportunities = snapshot.arbitrage_opportunities.len(),
        "Snapshot written"
    );

    Ok(())
}

/// Parse a snapshot artifact.
pub fn read_snapshot(path: &Path) -> Result<ScanSnapshot, ReportError> {
    let body = fs::read_to_string(path).map_err(|source| ReportError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&body).map_err(|e| ReportError::Parse {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}
