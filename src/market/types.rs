//! Catalog types for binary prediction markets.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Outcome label of a binary market token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "UPPERCASE")]
pub enum Outcome {
    /// YES token.
    #[strum(serialize = "YES")]
    Yes,
    /// NO token.
    #[strum(serialize = "NO")]
    No,
}

impl Outcome {
    /// Classify a raw outcome label, ignoring case.
    ///
    /// Anything other than YES/NO (e.g. "Trump", "Over") is `None`.
    pub fn classify(label: &str) -> Option<Self> {
        label.to_uppercase().parse().ok()
    }
}

/// One tradable outcome of a market.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// CLOB token ID.
    pub token_id: String,
    /// Raw outcome label as listed by the venue.
    pub outcome: String,
}

impl Token {
    /// Create a token.
    pub fn new(token_id: impl Into<String>, outcome: impl Into<String>) -> Self {
        Self {
            token_id: token_id.into(),
            outcome: outcome.into(),
        }
    }
}

/// Market listed in the venue catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Market {
    /// Condition ID.
    pub condition_id: Option<String>,
    /// Market question text.
    pub question: Option<String>,
    /// Outcome tokens, in venue order.
    pub tokens: Vec<Token>,
}

impl Market {
    /// Question text for reports.
    pub fn question_or_unknown(&self) -> &str {
        self.question.as_deref().unwrap_or("Unknown")
    }
}

/// One page of `GET /markets`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MarketsPage {
    /// Markets on this page.
    #[serde(default)]
    pub data: Option<Vec<MarketResponse>>,
}

/// Market entry as returned by the API.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MarketResponse {
    /// Condition ID.
    #[serde(default)]
    pub condition_id: Option<String>,
    /// Market question.
    #[serde(default)]
    pub question: Option<String>,
    /// Outcome tokens.
    #[serde(default)]
    pub tokens: Option<Vec<TokenResponse>>,
}

/// Token entry as returned by the API.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenResponse {
    /// CLOB token ID.
    #[serde(default)]
    pub token_id: Option<String>,
    /// Outcome label.
    #[serde(default)]
    pub outcome: Option<String>,
}

impl From<MarketResponse> for Market {
    fn from(raw: MarketResponse) -> Self {
        let tokens = raw
            .tokens
            .unwrap_or_default()
            .into_iter()
            .map(|t| Token {
                token_id: t.token_id.unwrap_or_default(),
                outcome: t.outcome.unwrap_or_default(),
            })
            .collect();

        Market {
            condition_id: raw.condition_id,
            question: raw.question,
            tokens,
        }
    }
}
