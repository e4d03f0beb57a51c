//! Single-token order book retrieval.

use std::time::Instant;

use crate::market::Venue;
use crate::metrics;

use super::types::BookFetch;

/// Fetch the current book for one token.
///
/// Never fails. Any venue error becomes [`BookFetch::Absent`] carrying the
/// reason; callers log it and skip the market for this round.
pub async fn fetch_orderbook<V>(venue: &V, token_id: &str) -> BookFetch
where
    V: Venue + ?Sized,
{
    let start = Instant::now();
    let result = venue.order_book(token_id).await;
    metrics::record_orderbook_fetch_latency(start);

    match result {
        Ok(book) => BookFetch::Book(book),
        Err(e) => {
            let kind = e.kind();
            metrics::inc_orderbook_absent(kind);
            BookFetch::Absent(e.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::{MockBook, MockOrderBookBuilder, MockVenue};
    use crate::orderbook::types::AbsentReason;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn returns_book_on_success() {
        let venue = MockVenue::new().with_book(
            MockOrderBookBuilder::new("t1")
                .ask(dec!(0.40), dec!(10))
                .bid(dec!(0.38), dec!(10))
                .build(),
        );

        let fetch = fetch_orderbook(&venue, "t1").await;

        assert_eq!(fetch.best_ask(), Some(dec!(0.40)));
    }

    #[tokio::test]
    async fn status_and_malformed_become_absent() {
        let venue = MockVenue::new()
            .with_response("gone", MockBook::Status(404))
            .with_response("junk", MockBook::Malformed);

        match fetch_orderbook(&venue, "gone").await {
            BookFetch::Absent(reason) => assert_eq!(reason, AbsentReason::Status(404)),
            other => panic!("expected absent, got {:?}", other),
        }

        match fetch_orderbook(&venue, "junk").await {
            BookFetch::Absent(reason) => assert_eq!(reason.kind(), "malformed"),
            other => panic!("expected absent, got {:?}", other),
        }
    }
}
