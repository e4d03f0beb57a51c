//! Unified error types for the scanner.

use std::path::PathBuf;

use thiserror::Error;

use crate::desk::TradeStatus;

/// Unified error type for the scanner.
#[derive(Error, Debug)]
pub enum BotError {
    /// Configuration loading error.
    #[error("configuration error: {0}")]
    Config(#[from] envy::Error),

    /// Configuration loaded but failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Venue (catalog or order book) error.
    #[error("market error: {0}")]
    Market(#[from] MarketError),

    /// Snapshot artifact error.
    #[error("report error: {0}")]
    Report(#[from] ReportError),

    /// Trade desk error.
    #[error("desk error: {0}")]
    Desk(#[from] DeskError),
}

/// Errors talking to the venue's public API.
///
/// None of these end a scan. The catalog treats them as end of data and the
/// order book fetcher turns them into an absent book.
#[derive(Error, Debug)]
pub enum MarketError {
    /// The venue answered with a non-success status.
    #[error("{endpoint} returned HTTP {status}")]
    Status {
        /// Request path that failed.
        endpoint: String,
        /// HTTP status code.
        status: u16,
    },

    /// Timeout, refused connection, DNS failure.
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    /// Body was not the JSON shape we expect.
    #[error("malformed response: {0}")]
    Malformed(String),

    /// HTTP client could not be constructed.
    #[error("failed to build http client: {0}")]
    ClientBuild(String),
}

impl MarketError {
    /// Short label used for log fields and metric labels.
    pub fn kind(&self) -> &'static str {
        match self {
            MarketError::Status { .. } => "status",
            MarketError::Transport(_) => "transport",
            MarketError::Malformed(_) => "malformed",
            MarketError::ClientBuild(_) => "client",
        }
    }
}

/// Snapshot write/read errors.
#[derive(Error, Debug)]
pub enum ReportError {
    /// Snapshot could not be serialized.
    #[error("failed to serialize snapshot: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Snapshot could not be written.
    #[error("failed to write snapshot {path}: {source}")]
    Write {
        /// Artifact path.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Snapshot could not be read.
    #[error("failed to read snapshot {path}: {source}")]
    Read {
        /// Artifact path.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Snapshot file exists but does not parse.
    #[error("failed to parse snapshot {path}: {reason}")]
    Parse {
        /// Artifact path.
        path: PathBuf,
        /// Parser message.
        reason: String,
    },
}

/// Trade desk errors.
#[derive(Error, Debug)]
pub enum DeskError {
    /// Proposal is missing a required field.
    #[error("missing fields: {0}")]
    MissingFields(String),

    /// Quantity must be positive.
    #[error("quantity must be positive, got {0}")]
    InvalidQuantity(rust_decimal::Decimal),

    /// No trade with this id.
    #[error("trade {0} not found")]
    NotFound(String),

    /// Status transition not allowed from the current state.
    #[error("trade is {from}, cannot {action}")]
    InvalidTransition {
        /// Current status.
        from: TradeStatus,
        /// Attempted action.
        action: &'static str,
    },

    /// Desk answered with an unexpected status.
    #[error("desk returned HTTP {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body.
        body: String,
    },

    /// HTTP request error.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, BotError>;
