//! Market module for the venue catalog.
//!
//! This module handles:
//! - Market and token types
//! - The venue seam and the CLOB HTTP client
//! - Paginated catalog discovery
//! - Mock venue for testing

pub mod catalog;
pub mod client;
pub mod mock;
pub mod types;

pub use catalog::{fetch_active_markets, CatalogFetch, StopReason};
pub use client::{ClobClient, Venue};
pub use mock::{binary_market, sample_markets, MockBook, MockOrderBookBuilder, MockVenue};
pub use types::{Market, Outcome, Token};
