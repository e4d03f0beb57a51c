//! Trade desk seam and the in-memory implementation.

use async_trait::async_trait;
use dashmap::DashMap;
use time::OffsetDateTime;
use tracing::{debug, info};
use uuid::Uuid;

use super::types::{TradeProposal, TradeRecord, TradeStatus};
use crate::error::DeskError;

/// Downstream sink that records proposed trades.
#[async_trait]
pub trait TradeDesk: Send + Sync {
    /// Record a proposal; the new trade starts as advisory.
    async fn propose(&self, proposal: &TradeProposal) -> Result<TradeRecord, DeskError>;

    /// Look up a trade.
    async fn get(&self, id: &str) -> Result<TradeRecord, DeskError>;

    /// Approve an advisory trade.
    async fn confirm(&self, id: &str) -> Result<TradeRecord, DeskError>;

    /// Cancel an advisory trade.
    async fn cancel(&self, id: &str) -> Result<TradeRecord, DeskError>;
}

/// Owned trade store for local runs and tests.
#[derive(Debug, Default)]
pub struct InMemoryTradeDesk {
    trades: DashMap<String, TradeRecord>,
}

impl InMemoryTradeDesk {
    /// Create an empty desk.
    pub fn new() -> Self {
        Self::default()
    }

    /// All trades, in no particular order.
    pub fn trades(&self) -> Vec<TradeRecord> {
        self.trades.iter().map(|entry| entry.value().clone()).collect()
    }

    fn transition(
        &self,
        id: &str,
        step: impl FnOnce(TradeStatus) -> Result<TradeStatus, DeskError>,
    ) -> Result<TradeRecord, DeskError> {
        let mut trade = self
            .trades
            .get_mut(id)
            .ok_or_else(|| DeskError::NotFound(id.to_string()))?;

        let next = step(trade.status)?;
        trade.status = next;
        if next == TradeStatus::Approved {
            trade.approved_at = Some(OffsetDateTime::now_utc());
        }

        debug!(id, status = %next, "Trade status changed");
        Ok(trade.clone())
    }
}

/// First eight characters of a fresh v4 UUID.
fn short_id() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_string()
}

#[async_trait]
impl TradeDesk for InMemoryTradeDesk {
    async fn propose(&self, proposal: &TradeProposal) -> Result<TradeRecord, DeskError> {
        proposal.validate()?;

        let record = TradeRecord {
            id: short_id(),
            agent: proposal.agent.clone(),
            symbol: proposal.symbol.to_uppercase(),
            side: proposal.side,
            quantity: proposal.quantity,
            price_limit: proposal.price_limit,
            thesis: proposal.thesis.clone(),
            status: TradeStatus::Advisory,
            created_at: OffsetDateTime::now_utc(),
            approved_at: None,
        };

        info!(id = %record.id, symbol = %record.symbol, side = %record.side, "Trade proposed");
        self.trades.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    async fn get(&self, id: &str) -> Result<TradeRecord, DeskError> {
        self.trades
            .get(id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| DeskError::NotFound(id.to_string()))
    }

    async fn confirm(&self, id: &str) -> Result<TradeRecord, DeskError> {
        self.transition(id, TradeStatus::confirm)
    }

    async fn cancel(&self, id: &str) -> Result<TradeRecord, DeskError> {
        self.transition(id, TradeStatus::cancel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::desk::types::TradeSide;
    use rust_decimal_macros::dec;

    fn proposal() -> TradeProposal {
        TradeProposal {
            agent: "scanner".to_string(),
            symbol: "abc123".to_string(),
            side: TradeSide::Buy,
            quantity: dec!(10),
            price_limit: Some(dec!(0.40)),
            thesis: "cheap pair".to_string(),
        }
    }

    #[tokio::test]
    async fn propose_creates_advisory_trade() {
        let desk = InMemoryTradeDesk::new();

        let record = desk.propose(&proposal()).await.unwrap();

        assert_eq!(record.id.len(), 8);
        assert_eq!(record.symbol, "ABC123");
        assert_eq!(record.status, TradeStatus::Advisory);
        assert_eq!(desk.get(&record.id).await.unwrap(), record);
    }

    #[tokio::test]
    async fn confirm_then_cancel_is_rejected() {
        let desk = InMemoryTradeDesk::new();
        let record = desk.propose(&proposal()).await.unwrap();

        let approved = desk.confirm(&record.id).await.unwrap();
        assert_eq!(approved.status, TradeStatus::Approved);
        assert!(approved.approved_at.is_some());

        let err = desk.cancel(&record.id).await.unwrap_err();
        assert!(matches!(
            err,
            DeskError::InvalidTransition {
                from: TradeStatus::Approved,
                ..
            }
        ));
        assert_eq!(desk.get(&record.id).await.unwrap().status, TradeStatus::Approved);
    }

    #[tokio::test]
    async fn cancelled_trade_cannot_be_confirmed() {
        let desk = InMemoryTradeDesk::new();
        let record = desk.propose(&proposal()).await.unwrap();

        desk.cancel(&record.id).await.unwrap();

        assert!(desk.confirm(&record.id).await.is_err());
    }

    #[tokio::test]
    async fn unknown_trade_is_not_found() {
        let desk = InMemoryTradeDesk::new();

        assert!(matches!(desk.get("nope").await, Err(DeskError::NotFound(_))));
        assert!(matches!(desk.confirm("nope").await, Err(DeskError::NotFound(_))));
    }

    #[test]
    fn desk_works_outside_a_runtime() {
        let desk = InMemoryTradeDesk::new();

        let record = tokio_test::block_on(desk.propose(&proposal())).unwrap();

        tokio_test::assert_ok!(tokio_test::block_on(desk.get(&record.id)));
        tokio_test::assert_err!(tokio_test::block_on(desk.get("missing")));
    }

    #[tokio::test]
    async fn invalid_proposal_is_not_stored() {
        let desk = InMemoryTradeDesk::new();
        let bad = TradeProposal {
            agent: String::new(),
            ..proposal()
        };

        assert!(desk.propose(&bad).await.is_err());
        assert!(desk.trades().is_empty());
    }
}
