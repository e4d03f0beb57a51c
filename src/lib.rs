//! Polymarket YES/NO mispricing scanner.
//!
//! Walks the CLOB catalog of active markets, reads the best ask on both
//! outcome tokens of every binary market, and flags the pairs that cost less
//! than the 1.00 a resolved market pays out.
//!
//! # Strategy
//!
//! Exactly one side of a YES/NO market pays $1.00 per share. If buying one
//! share of each costs less than that, the difference is locked in:
//!
//! ```text
//! YES ask:   $0.48
//! NO ask:    $0.50
//! ─────────────────
//! Implied:   $0.98 < $0.99 threshold
//! Edge:      $0.02 per pair (2.00%)
//! ```
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`market`]: Catalog pagination and the CLOB client
//! - [`orderbook`]: Order book types and fetching
//! - [`arbitrage`]: Token pairing and the pair-cost test
//! - [`report`]: Snapshot artifact and console summary
//! - [`pipeline`]: One end-to-end scan
//! - [`desk`]: Advisory trade proposals
//! - [`metrics`]: Counters and histograms

pub mod arbitrage;
pub mod config;
pub mod desk;
pub mod error;
pub mod market;
pub mod metrics;
pub mod orderbook;
pub mod pipeline;
pub mod report;

pub use config::Config;
pub use error::{BotError, Result};
pub use pipeline::{run_scan, ScanReport};
