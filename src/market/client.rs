//! Polymarket CLOB public API client.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::config::Config;
use crate::error::MarketError;
use crate::orderbook::types::{OrderBook, OrderBookResponse};

use super::types::{Market, MarketsPage};

/// Read-only venue endpoints the scanner depends on.
///
/// Implemented by [`ClobClient`] for the real venue and by
/// [`MockVenue`](super::mock::MockVenue) in tests.
#[async_trait]
pub trait Venue: Send + Sync {
    /// One page of active markets starting at `offset`.
    async fn market_page(&self, limit: usize, offset: usize) -> Result<Vec<Market>, MarketError>;

    /// Current order book for one token.
    async fn order_book(&self, token_id: &str) -> Result<OrderBook, MarketError>;
}

/// Polymarket CLOB API client.
#[derive(Debug, Clone)]
pub struct ClobClient {
    /// HTTP client for API requests.
    http: reqwest::Client,
    /// Base URL for CLOB API.
    clob_url: String,
    /// Per-request timeout for catalog pages.
    catalog_timeout: Duration,
    /// Per-request timeout for order books.
    book_timeout: Duration,
}

impl ClobClient {
    /// Create a new CLOB client from config.
    pub fn new(config: &Config) -> Result<Self, MarketError> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(3))
            // TCP_NODELAY for low-latency (disable Nagle's algorithm)
            .tcp_nodelay(true)
            .tcp_keepalive(Duration::from_secs(30))
            .pool_max_idle_per_host(config.book_concurrency.max(1) * 2)
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .map_err(|e| MarketError::ClientBuild(e.to_string()))?;

        Ok(Self {
            http,
            clob_url: config.polymarket_clob_url.trim_end_matches('/').to_string(),
            catalog_timeout: config.catalog_timeout(),
            book_timeout: config.book_timeout(),
        })
    }

    /// Get the CLOB base URL.
    pub fn clob_url(&self) -> &str {
        &self.clob_url
    }

    async fn get_text(
        &self,
        endpoint: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<String, MarketError> {
        let response = request.send().await?;

        if !response.status().is_success() {
            return Err(MarketError::Status {
                endpoint: endpoint.to_string(),
                status: response.status().as_u16(),
            });
        }

        Ok(response.text().await?)
    }
}

#[async_trait]
impl Venue for ClobClient {
    #[instrument(skip(self))]
    async fn market_page(&self, limit: usize, offset: usize) -> Result<Vec<Market>, MarketError> {
        let url = format!("{}/markets", self.clob_url);
        let request = self
            .http
            .get(&url)
            .query(&[
                ("active", "true".to_string()),
                ("limit", limit.to_string()),
                ("offset", offset.to_string()),
            ])
            .timeout(self.catalog_timeout);

        let body = self.get_text("/markets", request).await?;
        let page: MarketsPage = serde_json::from_str(&body)
            .map_err(|e| MarketError::Malformed(format!("Failed to parse markets page: {}", e)))?;

        let markets: Vec<Market> = page
            .data
            .unwrap_or_default()
            .into_iter()
            .map(Market::from)
            .collect();

        debug!(count = markets.len(), "Fetched markets page");

        Ok(markets)
    }

    #[instrument(skip(self), fields(token_id = %token_id))]
    async fn order_book(&self, token_id: &str) -> Result<OrderBook, MarketError> {
        let url = format!("{}/book/{}", self.clob_url, token_id);
        let request = self.http.get(&url).timeout(self.book_timeout);

        let body = self.get_text("/book", request).await?;
        let book: OrderBookResponse = serde_json::from_str(&body)
            .map_err(|e| MarketError::Malformed(format!("Failed to parse order book: {}", e)))?;

        Ok(OrderBook::from_response(token_id, book))
    }
}
