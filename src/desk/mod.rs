//! Advisory trade desk: proposals derived from scan results.

pub mod client;
pub mod proposal;
pub mod store;
pub mod types;

pub use client::HttpTradeDesk;
pub use proposal::proposals_for;
pub use store::{InMemoryTradeDesk, TradeDesk};
pub use types::{TradeProposal, TradeRecord, TradeSide, TradeStatus};
