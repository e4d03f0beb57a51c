//! Order book module for top-of-book data.
//!
//! This module handles:
//! - Order book types and API response conversion
//! - Single-token book retrieval with typed absence

pub mod fetch;
pub mod types;

pub use fetch::fetch_orderbook;
pub use types::{AbsentReason, BookFetch, OrderBook, PriceLevel};
