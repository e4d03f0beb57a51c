//! YES/NO token pairing for binary markets.

use crate::market::{Market, Outcome, Token};

/// A market whose two tokens classify as exactly one YES and one NO.
#[derive(Debug, Clone, Copy)]
pub struct BinaryPair<'a> {
    /// The market.
    pub market: &'a Market,
    /// YES token.
    pub yes: &'a Token,
    /// NO token.
    pub no: &'a Token,
}

/// Why a market is not scannable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairingSkip {
    /// Market does not have exactly two tokens.
    TokenCount(usize),
    /// Two tokens, but not one YES and one NO.
    Labels,
    /// A YES or NO token has no ID to fetch a book for.
    MissingTokenId,
}

impl PairingSkip {
    /// Short label for log fields and metric labels.
    pub fn kind(&self) -> &'static str {
        match self {
            PairingSkip::TokenCount(_) => "token_count",
            PairingSkip::Labels => "labels",
            PairingSkip::MissingTokenId => "missing_token_id",
        }
    }
}

/// Locate the YES and NO tokens of a market.
pub fn pair_tokens(market: &Market) -> Result<BinaryPair<'_>, PairingSkip> {
    if market.tokens.len() != 2 {
        return Err(PairingSkip::TokenCount(market.tokens.len()));
    }

    let find = |outcome: Outcome| {
        market
            .tokens
            .iter()
            .find(|t| Outcome::classify(&t.outcome) == Some(outcome))
    };

    // With exactly two tokens, a duplicate label leaves the other side unmatched.
    let (yes, no) = match (find(Outcome::Yes), find(Outcome::No)) {
        (Some(yes), Some(no)) => (yes, no),
        _ => return Err(PairingSkip::Labels),
    };

    if yes.token_id.is_empty() || no.token_id.is_empty() {
        return Err(PairingSkip::MissingTokenId);
    }

    Ok(BinaryPair { market, yes, no })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn market(tokens: Vec<Token>) -> Market {
        Market {
            condition_id: Some("0xabc".to_string()),
            question: Some("Will it rain?".to_string()),
            tokens,
        }
    }

    #[test]
    fn mixed_case_labels_pair() {
        let m = market(vec![Token::new("2", "No"), Token::new("1", "Yes")]);

        let pair = pair_tokens(&m).unwrap();

        assert_eq!(pair.yes.token_id, "1");
        assert_eq!(pair.no.token_id, "2");
    }

    #[test]
    fn wrong_token_counts_are_skipped() {
        assert_eq!(pair_tokens(&market(vec![])).unwrap_err(), PairingSkip::TokenCount(0));
        assert_eq!(
            pair_tokens(&market(vec![Token::new("1", "Yes")])).unwrap_err(),
            PairingSkip::TokenCount(1)
        );
        assert_eq!(
            pair_tokens(&market(vec![
                Token::new("1", "Yes"),
                Token::new("2", "No"),
                Token::new("3", "Maybe"),
            ]))
            .unwrap_err(),
            PairingSkip::TokenCount(3)
        );
    }

    #[test]
    fn duplicate_or_foreign_labels_are_skipped() {
        let dup = market(vec![Token::new("1", "YES"), Token::new("2", "yes")]);
        assert_eq!(pair_tokens(&dup).unwrap_err(), PairingSkip::Labels);

        let teams = market(vec![Token::new("1", "Lakers"), Token::new("2", "Celtics")]);
        assert_eq!(pair_tokens(&teams).unwrap_err(), PairingSkip::Labels);
    }

    #[test]
    fn empty_token_id_is_skipped() {
        let m = market(vec![Token::new("", "Yes"), Token::new("2", "No")]);
        assert_eq!(pair_tokens(&m).unwrap_err(), PairingSkip::MissingTokenId);
    }
}
