//! Turn detected mispricings into desk proposals.

use rust_decimal::Decimal;

use super::types::{TradeProposal, TradeSide};
use crate::arbitrage::ArbitrageOpportunity;

/// Two BUY legs, YES first, each limited at the ask it was priced at.
pub fn proposals_for(
    opportunity: &ArbitrageOpportunity,
    agent: &str,
    quantity: Decimal,
) -> Vec<TradeProposal> {
    let thesis = format!(
        "YES/NO pair on \"{}\" costs {:.4} for a 1.00 payout (edge {:.2}%)",
        opportunity.market,
        opportunity.implied_total,
        opportunity.edge_pct()
    );

    [
        (&opportunity.token_yes, opportunity.yes_ask),
        (&opportunity.token_no, opportunity.no_ask),
    ]
    .into_iter()
    .map(|(token_id, ask)| TradeProposal {
        agent: agent.to_string(),
        symbol: token_id.clone(),
        side: TradeSide::Buy,
        quantity,
        price_limit: Some(ask),
        thesis: thesis.clone(),
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn both_legs_are_buys_at_the_ask() {
        let opp = ArbitrageOpportunity {
            market: "Will it rain?".to_string(),
            market_id: Some("0xabc".to_string()),
            implied_total: dec!(0.95),
            yes_ask: dec!(0.45),
            no_ask: dec!(0.50),
            edge: dec!(0.05),
            token_yes: "111".to_string(),
            token_no: "222".to_string(),
        };

        let proposals = proposals_for(&opp, "scanner", dec!(5));

        assert_eq!(proposals.len(), 2);
        assert_eq!(proposals[0].symbol, "111");
        assert_eq!(proposals[0].price_limit, Some(dec!(0.45)));
        assert_eq!(proposals[1].symbol, "222");
        assert_eq!(proposals[1].price_limit, Some(dec!(0.50)));
        for proposal in &proposals {
            assert_eq!(proposal.side, TradeSide::Buy);
            assert_eq!(proposal.quantity, dec!(5));
            assert!(proposal.validate().is_ok());
            assert!(proposal.thesis.contains("0.9500"));
            assert!(proposal.thesis.contains("5.00%"));
        }
    }
}
