//! Order book types and data structures.

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::MarketError;

/// Decimal places kept on book prices.
///
/// Venue ticks are at most 4 places; 6 keeps every price, sum and edge
/// exactly representable in the snapshot's JSON numbers.
pub const PRICE_DP: u32 = 6;

/// Single price level in an order book.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PriceLevel {
    /// Price at this level.
    pub price: Decimal,
    /// Total size available at this price.
    pub size: Decimal,
}

impl PriceLevel {
    /// Create a new price level.
    pub fn new(price: Decimal, size: Decimal) -> Self {
        Self { price, size }
    }
}

/// Top-of-book snapshot for one token.
#[derive(Debug, Clone)]
pub struct OrderBook {
    /// Token ID this book represents.
    pub token_id: String,
    /// Bid levels sorted by price descending.
    pub bids: Vec<PriceLevel>,
    /// Ask levels sorted by price ascending.
    pub asks: Vec<PriceLevel>,
}

impl OrderBook {
    /// Build a book from raw levels, sorting both sides.
    pub fn new(token_id: impl Into<String>, bids: Vec<PriceLevel>, asks: Vec<PriceLevel>) -> Self {
        let mut bids = bids;
        let mut asks = asks;

        // Sort bids descending by price
        bids.sort_by(|a, b| b.price.cmp(&a.price));
        // Sort asks ascending by price
        asks.sort_by(|a, b| a.price.cmp(&b.price));

        Self {
            token_id: token_id.into(),
            bids,
            asks,
        }
    }

    /// Convert an API response, dropping empty or unparseable levels.
    ///
    /// Prices are limited to [`PRICE_DP`] places: asks round up and bids
    /// round down, so rounding never makes a pair look cheaper.
    pub fn from_response(token_id: &str, response: OrderBookResponse) -> Self {
        let parse_levels = |levels: Option<Vec<OrderLevel>>, strategy: RoundingStrategy| -> Vec<PriceLevel> {
            levels
                .unwrap_or_default()
                .into_iter()
                .filter_map(|level| {
                    let price = parse_decimal(&level.price)?
                        .round_dp_with_strategy(PRICE_DP, strategy);
                    let size = parse_decimal(&level.size)?;
                    if size > Decimal::ZERO {
                        Some(PriceLevel { price, size })
                    } else {
                        None
                    }
                })
                .collect()
        };

        Self::new(
            token_id,
            parse_levels(response.bids, RoundingStrategy::ToNegativeInfinity),
            parse_levels(response.asks, RoundingStrategy::ToPositiveInfinity),
        )
    }

    /// Get the best bid price.
    pub fn best_bid(&self) -> Option<Decimal> {
        self.bids.first().map(|l| l.price)
    }

    /// Get the best ask price.
    pub fn best_ask(&self) -> Option<Decimal> {
        self.asks.first().map(|l| l.price)
    }
}

/// Order book response from `GET /book/<token_id>`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderBookResponse {
    /// Bid levels.
    #[serde(default)]
    pub bids: Option<Vec<OrderLevel>>,
    /// Ask levels.
    #[serde(default)]
    pub asks: Option<Vec<OrderLevel>>,
}

/// Single price level as sent by the venue; string or number.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OrderLevel {
    /// Price at this level.
    #[serde(default)]
    pub price: Value,
    /// Size available at this level.
    #[serde(default)]
    pub size: Value,
}

fn parse_decimal(value: &Value) -> Option<Decimal> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}

/// Why a book could not be used this round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbsentReason {
    /// Venue answered with a non-success status.
    Status(u16),
    /// Timeout or connection failure.
    Transport(String),
    /// Body did not parse.
    Malformed(String),
}

impl AbsentReason {
    /// Short label for log fields and metric labels.
    pub fn kind(&self) -> &'static str {
        match self {
            AbsentReason::Status(_) => "status",
            AbsentReason::Transport(_) => "transport",
            AbsentReason::Malformed(_) => "malformed",
        }
    }
}

impl std::fmt::Display for AbsentReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AbsentReason::Status(code) => write!(f, "HTTP {}", code),
            AbsentReason::Transport(msg) => write!(f, "transport: {}", msg),
            AbsentReason::Malformed(msg) => write!(f, "malformed: {}", msg),
        }
    }
}

impl From<MarketError> for AbsentReason {
    fn from(err: MarketError) -> Self {
        match err {
            MarketError::Status { status, .. } => AbsentReason::Status(status),
            MarketError::Transport(e) => AbsentReason::Transport(e.to_string()),
            MarketError::Malformed(msg) => AbsentReason::Malformed(msg),
            MarketError::ClientBuild(msg) => AbsentReason::Transport(msg),
        }
    }
}

/// Outcome of a single order book fetch.
#[derive(Debug, Clone)]
pub enum BookFetch {
    /// The venue returned a book.
    Book(OrderBook),
    /// No book this round.
    Absent(AbsentReason),
}

impl BookFetch {
    /// The book, if one was returned.
    pub fn book(&self) -> Option<&OrderBook> {
        match self {
            BookFetch::Book(book) => Some(book),
            BookFetch::Absent(_) => None,
        }
    }

    /// Best ask of a returned book. `None` for absent books and empty ask sides.
    pub fn best_ask(&self) -> Option<Decimal> {
        self.book().and_then(OrderBook::best_ask)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn price_level_creation() {
        let level = PriceLevel::new(dec!(0.50), dec!(100));
        assert_eq!(level.price, dec!(0.50));
        assert_eq!(level.size, dec!(100));
    }

    #[test]
    fn new_book_sorts_both_sides() {
        let book = OrderBook::new(
            "test",
            vec![
                PriceLevel::new(dec!(0.47), dec!(100)),
                PriceLevel::new(dec!(0.48), dec!(50)),
            ],
            vec![
                PriceLevel::new(dec!(0.99), dec!(10)),
                PriceLevel::new(dec!(0.50), dec!(50)),
                PriceLevel::new(dec!(0.51), dec!(100)),
            ],
        );

        assert_eq!(book.best_bid(), Some(dec!(0.48)));
        assert_eq!(book.best_ask(), Some(dec!(0.50)));
        assert_eq!(book.asks[0].size, dec!(50));
    }

    #[test]
    fn from_response_accepts_strings_and_numbers() {
        let json = serde_json::json!({
            "market": "0xabc",
            "asset_id": "123",
            "bids": [{"price": "0.39", "size": "20"}],
            "asks": [{"price": 0.42, "size": 15}, {"price": "0.41", "size": "5"}]
        });
        let response: OrderBookResponse = serde_json::from_value(json).unwrap();

        let book = OrderBook::from_response("123", response);

        assert_eq!(book.best_ask(), Some(dec!(0.41)));
        assert_eq!(book.best_bid(), Some(dec!(0.39)));
        assert_eq!(book.asks.len(), 2);
    }

    #[test]
    fn from_response_drops_bad_and_empty_levels() {
        let json = serde_json::json!({
            "asks": [
                {"price": "abc", "size": "10"},
                {"price": "0.30", "size": "0"},
                {"price": null, "size": "10"},
                {"price": "0.55", "size": "10"}
            ]
        });
        let response: OrderBookResponse = serde_json::from_value(json).unwrap();

        let book = OrderBook::from_response("t", response);

        assert_eq!(book.asks, vec![PriceLevel::new(dec!(0.55), dec!(10))]);
        assert!(book.bids.is_empty());
    }

    #[test]
    fn from_response_limits_price_precision_conservatively() {
        let json = serde_json::json!({
            "bids": [{"price": "0.123456789012345678", "size": "10"}],
            "asks": [
                {"price": "0.123456789012345678", "size": "10"},
                {"price": "0.4512", "size": "10"}
            ]
        });
        let response: OrderBookResponse = serde_json::from_value(json).unwrap();

        let book = OrderBook::from_response("t", response);

        assert_eq!(book.best_ask(), Some(dec!(0.123457)));
        assert_eq!(book.best_bid(), Some(dec!(0.123456)));
        // Tick-sized prices are untouched
        assert_eq!(book.asks[1].price, dec!(0.4512));
    }

    #[test]
    fn book_fetch_best_ask_is_none_for_empty_asks() {
        let fetch = BookFetch::Book(OrderBook::new(
            "t",
            vec![PriceLevel::new(dec!(0.40), dec!(10))],
            vec![],
        ));
        assert!(fetch.book().is_some());
        assert_eq!(fetch.best_ask(), None);

        let absent = BookFetch::Absent(AbsentReason::Status(404));
        assert!(absent.book().is_none());
        assert_eq!(absent.best_ask(), None);
    }
}
