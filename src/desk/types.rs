//! Trade desk records and the status state machine.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use time::OffsetDateTime;

use crate::error::DeskError;

/// Trade side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
pub enum TradeSide {
    /// Buy.
    #[strum(serialize = "buy", serialize = "BUY")]
    Buy,
    /// Sell.
    #[strum(serialize = "sell", serialize = "SELL")]
    Sell,
}

/// Lifecycle of a proposed trade.
///
/// `Advisory` is the only state with outgoing transitions.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum TradeStatus {
    /// Proposed, awaiting a decision.
    #[default]
    #[strum(serialize = "advisory")]
    Advisory,
    /// Approved for execution.
    #[strum(serialize = "approved")]
    Approved,
    /// Cancelled.
    #[strum(serialize = "cancelled")]
    Cancelled,
}

impl TradeStatus {
    /// Advisory -> Approved.
    pub fn confirm(self) -> Result<Self, DeskError> {
        match self {
            TradeStatus::Advisory => Ok(TradeStatus::Approved),
            from => Err(DeskError::InvalidTransition {
                from,
                action: "confirm",
            }),
        }
    }

    /// Advisory -> Cancelled.
    pub fn cancel(self) -> Result<Self, DeskError> {
        match self {
            TradeStatus::Advisory => Ok(TradeStatus::Cancelled),
            from => Err(DeskError::InvalidTransition {
                from,
                action: "cancel",
            }),
        }
    }

    /// No further transitions are possible.
    pub fn is_terminal(self) -> bool {
        !matches!(self, TradeStatus::Advisory)
    }
}

/// Body of a "propose trade" call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeProposal {
    /// Proposing agent.
    pub agent: String,
    /// Instrument symbol (token ID for CLOB outcomes).
    pub symbol: String,
    /// Buy or sell.
    pub side: TradeSide,
    /// Shares.
    #[serde(with = "rust_decimal::serde::float")]
    pub quantity: Decimal,
    /// Optional limit price.
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub price_limit: Option<Decimal>,
    /// Free-text rationale.
    #[serde(default)]
    pub thesis: String,
}

impl TradeProposal {
    /// Check required fields before submitting.
    pub fn validate(&self) -> Result<(), DeskError> {
        let mut missing = Vec::new();
        if self.agent.trim().is_empty() {
            missing.push("agent");
        }
        if self.symbol.trim().is_empty() {
            missing.push("symbol");
        }
        if !missing.is_empty() {
            return Err(DeskError::MissingFields(missing.join(", ")));
        }

        if self.quantity <= Decimal::ZERO {
            return Err(DeskError::InvalidQuantity(self.quantity));
        }

        Ok(())
    }
}

/// Trade as stored by the desk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeRecord {
    /// Desk-generated ID.
    pub id: String,
    /// Proposing agent.
    pub agent: String,
    /// Uppercased symbol.
    pub symbol: String,
    /// Buy or sell.
    pub side: TradeSide,
    /// Shares.
    #[serde(with = "rust_decimal::serde::float")]
    pub quantity: Decimal,
    /// Optional limit price.
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub price_limit: Option<Decimal>,
    /// Free-text rationale.
    #[serde(default)]
    pub thesis: String,
    /// Current status.
    pub status: TradeStatus,
    /// When the proposal was recorded.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// When the trade was approved.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub approved_at: Option<OffsetDateTime>,
}
