//! Scripted venue for tests.
//!
//! Serves a fixed catalog through offset pagination and per-token books,
//! and records every request so tests can assert on call counts.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use dashmap::DashMap;
use rust_decimal::Decimal;

use super::client::Venue;
use super::types::{Market, Token};
use crate::error::MarketError;
use crate::orderbook::types::{OrderBook, PriceLevel};

/// Scripted response for one token's book.
#[derive(Debug, Clone)]
pub enum MockBook {
    /// Serve this book.
    Book(OrderBook),
    /// Answer with this HTTP status.
    Status(u16),
    /// Answer with an unparseable body.
    Malformed,
}

/// Mock venue for testing.
#[derive(Debug, Default)]
pub struct MockVenue {
    /// Catalog served by offset.
    markets: Vec<Market>,
    /// Serve full pages forever.
    endless: bool,
    /// Page index and status to fail with.
    fail_page: Option<(usize, u16)>,
    /// Page index to answer with an unparseable body.
    malformed_page: Option<usize>,
    /// Books by token ID.
    books: DashMap<String, MockBook>,
    /// Offsets of every page request, in order.
    page_offsets: Mutex<Vec<usize>>,
    /// Book requests by token ID.
    book_requests: DashMap<String, usize>,
    /// Total book requests.
    book_total: AtomicUsize,
}

impl MockVenue {
    /// Create an empty mock venue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve this catalog.
    pub fn with_markets(mut self, markets: Vec<Market>) -> Self {
        self.markets = markets;
        self
    }

    /// Serve full pages of generated markets without end.
    pub fn endless_catalog(mut self) -> Self {
        self.endless = true;
        self
    }

    /// Fail the zero-based `page` with `status`.
    pub fn fail_page_at(mut self, page: usize, status: u16) -> Self {
        self.fail_page = Some((page, status));
        self
    }

    /// Answer the zero-based `page` with an unparseable body.
    pub fn fail_page_malformed_at(mut self, page: usize) -> Self {
        self.malformed_page = Some(page);
        self
    }

    /// Serve a book for a token.
    pub fn with_book(self, book: OrderBook) -> Self {
        self.books.insert(book.token_id.clone(), MockBook::Book(book));
        self
    }

    /// Script a non-book response for a token.
    pub fn with_response(self, token_id: impl Into<String>, response: MockBook) -> Self {
        self.books.insert(token_id.into(), response);
        self
    }

    /// Number of catalog page requests received.
    pub fn page_requests(&self) -> usize {
        self.offsets_guard().len()
    }

    /// Offsets of every catalog page request, in order.
    pub fn page_offsets(&self) -> Vec<usize> {
        self.offsets_guard().clone()
    }

    /// Total order book requests received.
    pub fn book_requests(&self) -> usize {
        self.book_total.load(Ordering::SeqCst)
    }

    /// Order book requests received for one token.
    pub fn book_requests_for(&self, token_id: &str) -> usize {
        self.book_requests.get(token_id).map(|c| *c).unwrap_or(0)
    }

    fn offsets_guard(&self) -> std::sync::MutexGuard<'_, Vec<usize>> {
        self.page_offsets
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[async_trait]
impl Venue for MockVenue {
    async fn market_page(&self, limit: usize, offset: usize) -> Result<Vec<Market>, MarketError> {
        let page_index = {
            let mut offsets = self.offsets_guard();
            offsets.push(offset);
            offsets.len() - 1
        };

        if let Some((fail_at, status)) = self.fail_page {
            if page_index == fail_at {
                return Err(MarketError::Status {
                    endpoint: "/markets".to_string(),
                    status,
                });
            }
        }

        if self.malformed_page == Some(page_index) {
            return Err(MarketError::Malformed(
                "Failed to parse markets page: expected value at line 1 column 1".to_string(),
            ));
        }

        if self.endless {
            return Ok(sample_markets_from(offset, limit));
        }

        Ok(self
            .markets
            .iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn order_book(&self, token_id: &str) -> Result<OrderBook, MarketError> {
        self.book_total.fetch_add(1, Ordering::SeqCst);
        *self.book_requests.entry(token_id.to_string()).or_insert(0) += 1;

        let response = self.books.get(token_id).map(|r| r.value().clone());
        match response {
            Some(MockBook::Book(book)) => Ok(book),
            Some(MockBook::Status(status)) => Err(MarketError::Status {
                endpoint: "/book".to_string(),
                status,
            }),
            Some(MockBook::Malformed) => Err(MarketError::Malformed(
                "Failed to parse order book: expected value at line 1 column 1".to_string(),
            )),
            None => Err(MarketError::Status {
                endpoint: "/book".to_string(),
                status: 404,
            }),
        }
    }
}

/// Builder for mock order books.
pub struct MockOrderBookBuilder {
    token_id: String,
    bids: Vec<PriceLevel>,
    asks: Vec<PriceLevel>,
}

impl MockOrderBookBuilder {
    /// Create a new builder for the given token.
    pub fn new(token_id: impl Into<String>) -> Self {
        Self {
            token_id: token_id.into(),
            bids: Vec::new(),
            asks: Vec::new(),
        }
    }

    /// Add a bid level.
    pub fn bid(mut self, price: Decimal, size: Decimal) -> Self {
        self.bids.push(PriceLevel { price, size });
        self
    }

    /// Add an ask level.
    pub fn ask(mut self, price: Decimal, size: Decimal) -> Self {
        self.asks.push(PriceLevel { price, size });
        self
    }

    /// Build the order book.
    pub fn build(self) -> OrderBook {
        OrderBook::new(self.token_id, self.bids, self.asks)
    }
}

/// A YES/NO market with the given ids.
pub fn binary_market(condition_id: &str, yes_token: &str, no_token: &str) -> Market {
    Market {
        condition_id: Some(condition_id.to_string()),
        question: Some(format!("Question for {}?", condition_id)),
        tokens: vec![Token::new(yes_token, "Yes"), Token::new(no_token, "No")],
    }
}

/// `count` binary markets with ids `cond-<i>`, `yes-<i>`, `no-<i>`.
pub fn sample_markets(count: usize) -> Vec<Market> {
    sample_markets_from(0, count)
}

fn sample_markets_from(start: usize, count: usize) -> Vec<Market> {
    (start..start + count)
        .map(|i| {
            binary_market(
                &format!("cond-{}", i),
                &format!("yes-{}", i),
                &format!("no-{}", i),
            )
        })
        .collect()
}
