//! Arbitrage module for detecting YES/NO mispricing.
//!
//! This module handles:
//! - Pairing YES and NO tokens of binary markets
//! - The pair-cost test and edge calculation
//! - Scanning a market list against live books

pub mod calculator;
pub mod pairing;
pub mod scanner;

pub use calculator::{evaluate_pair, implied_total, ArbitrageOpportunity};
pub use pairing::{pair_tokens, BinaryPair, PairingSkip};
pub use scanner::{scan_markets, scan_yes_no_arbitrage, ScanResult, ScanStats};
