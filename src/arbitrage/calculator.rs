//! Pair-cost test for YES/NO mispricing.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::pairing::BinaryPair;

/// Detected YES/NO mispricing.
///
/// Field names match the snapshot artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArbitrageOpportunity {
    /// Market question.
    pub market: String,
    /// Market condition ID.
    pub market_id: Option<String>,
    /// Cost of buying one YES and one NO at best ask.
    #[serde(with = "rust_decimal::serde::float")]
    pub implied_total: Decimal,
    /// Best YES ask.
    #[serde(with = "rust_decimal::serde::float")]
    pub yes_ask: Decimal,
    /// Best NO ask.
    #[serde(with = "rust_decimal::serde::float")]
    pub no_ask: Decimal,
    /// Profit per share pair before fees (1.0 - implied_total).
    #[serde(with = "rust_decimal::serde::float")]
    pub edge: Decimal,
    /// YES token ID.
    pub token_yes: String,
    /// NO token ID.
    pub token_no: String,
}

impl ArbitrageOpportunity {
    /// Edge as a percentage of the 1.00 payout.
    pub fn edge_pct(&self) -> Decimal {
        self.edge * Decimal::ONE_HUNDRED
    }
}

/// Combined cost of buying both outcomes.
pub fn implied_total(yes_ask: Decimal, no_ask: Decimal) -> Decimal {
    yes_ask + no_ask
}

/// Flag the pair when its implied total is strictly below `threshold`.
pub fn evaluate_pair(
    pair: &BinaryPair<'_>,
    yes_ask: Decimal,
    no_ask: Decimal,
    threshold: Decimal,
) -> Option<ArbitrageOpportunity> {
    let total = implied_total(yes_ask, no_ask);

    if total >= threshold {
        return None;
    }

    Some(ArbitrageOpportunity {
        market: pair.market.question_or_unknown().to_string(),
        market_id: pair.market.condition_id.clone(),
        implied_total: total,
        yes_ask,
        no_ask,
        edge: Decimal::ONE - total,
        token_yes: pair.yes.token_id.clone(),
        token_no: pair.no.token_id.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arbitrage::pairing::pair_tokens;
    use crate::market::binary_market;
    use rust_decimal_macros::dec;

    const THRESHOLD: Decimal = dec!(0.99);

    #[test]
    fn flags_sum_below_threshold() {
        let market = binary_market("0xabc", "yes-token", "no-token");
        let pair = pair_tokens(&market).unwrap();

        let opp = evaluate_pair(&pair, dec!(0.40), dec!(0.58), THRESHOLD).unwrap();

        assert_eq!(opp.implied_total, dec!(0.98));
        assert_eq!(opp.edge, dec!(0.02));
        assert_eq!(opp.edge_pct(), dec!(2.00));
        assert_eq!(opp.market_id.as_deref(), Some("0xabc"));
        assert_eq!(opp.token_yes, "yes-token");
        assert_eq!(opp.token_no, "no-token");
    }

    #[test]
    fn fair_price_is_not_flagged() {
        let market = binary_market("0xabc", "y", "n");
        let pair = pair_tokens(&market).unwrap();

        assert!(evaluate_pair(&pair, dec!(0.50), dec!(0.50), THRESHOLD).is_none());
    }

    #[test]
    fn threshold_itself_is_excluded() {
        let market = binary_market("0xabc", "y", "n");
        let pair = pair_tokens(&market).unwrap();

        // 0.40 + 0.59 = 0.99, not strictly below 0.99
        assert!(evaluate_pair(&pair, dec!(0.40), dec!(0.59), THRESHOLD).is_none());
    }

    #[test]
    fn threshold_is_configurable() {
        let market = binary_market("0xabc", "y", "n");
        let pair = pair_tokens(&market).unwrap();

        assert!(evaluate_pair(&pair, dec!(0.49), dec!(0.50), dec!(1.00)).is_some());
        assert!(evaluate_pair(&pair, dec!(0.40), dec!(0.58), dec!(0.97)).is_none());
    }
}
