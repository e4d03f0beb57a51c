//! Paginated discovery of every active market in the venue catalog.

use std::time::Instant;

use tracing::{debug, info, instrument, warn};

use super::client::Venue;
use super::types::Market;
use crate::config::Config;
use crate::error::MarketError;
use crate::metrics;

/// Why pagination ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    /// A page came back empty.
    EmptyPage,
    /// A page came back with fewer markets than requested.
    ShortPage,
    /// The venue answered a page with a non-success status.
    Status(u16),
    /// Transport failure or malformed page body.
    Failed(String),
    /// `max_pages` full pages were fetched and the catalog had not ended.
    PageCap,
}

impl StopReason {
    /// Whether the catalog ended on its own rather than on a failure or the cap.
    pub fn is_exhausted(&self) -> bool {
        matches!(self, StopReason::EmptyPage | StopReason::ShortPage)
    }
}

/// Markets accumulated by one catalog walk.
#[derive(Debug, Clone)]
pub struct CatalogFetch {
    /// Markets in venue order.
    pub markets: Vec<Market>,
    /// Page requests issued.
    pub pages_requested: usize,
    /// Why the walk stopped.
    pub stop: StopReason,
}

/// Fetch all active markets, page by page.
///
/// Never fails: a bad status, transport error, or malformed page ends the
/// walk and whatever was accumulated is returned.
#[instrument(skip(venue, config), fields(page_size = config.page_size, max_pages = config.max_pages))]
pub async fn fetch_active_markets<V>(venue: &V, config: &Config) -> CatalogFetch
where
    V: Venue + ?Sized,
{
    let limit = config.page_size;
    let mut markets: Vec<Market> = Vec::new();
    let mut offset = 0;
    let mut pages_requested = 0;

    let stop = loop {
        if pages_requested >= config.max_pages {
            warn!(
                pages = pages_requested,
                markets = markets.len(),
                "Reached max pages limit, catalog may be incomplete"
            );
            break StopReason::PageCap;
        }

        let start = Instant::now();
        pages_requested += 1;
        metrics::inc_catalog_pages();

        let batch = match venue.market_page(limit, offset).await {
            Ok(batch) => batch,
            Err(MarketError::Status { status, .. }) => {
                warn!(offset, status, "Catalog page returned non-success status, stopping");
                break StopReason::Status(status);
            }
            Err(e) => {
                warn!(offset, error = %e, "Catalog page failed, stopping");
                break StopReason::Failed(e.to_string());
            }
        };

        let fetched = batch.len();
        metrics::record_catalog_page(start, fetched);
        debug!(offset, fetched, "Fetched catalog page");

        if fetched == 0 {
            break StopReason::EmptyPage;
        }

        markets.extend(batch);

        if fetched < limit {
            break StopReason::ShortPage;
        }

        offset += limit;
    };

    info!(
        markets = markets.len(),
        pages = pages_requested,
        stop = ?stop,
        "Catalog fetch finished"
    );

    CatalogFetch {
        markets,
        pages_requested,
        stop,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::mock::{sample_markets, MockVenue};
    use metrics_exporter_prometheus::PrometheusBuilder;

    fn config(page_size: usize) -> Config {
        Config {
            page_size,
            ..Config::default()
        }
    }

    #[tokio::test]
    async fn page_requests_for_catalog_sizes() {
        let p = 10;
        for k in [0, p - 1, p, p + 1, 3 * p] {
            let venue = MockVenue::new().with_markets(sample_markets(k));

            let fetch = fetch_active_markets(&venue, &config(p)).await;

            assert_eq!(fetch.markets.len(), k, "k={}", k);
            // A catalog that is an exact multiple of the page size needs one
            // trailing empty page to prove it has ended.
            assert_eq!(venue.page_requests(), k / p + 1, "k={}", k);
            assert_eq!(fetch.pages_requested, venue.page_requests());
            assert!(fetch.stop.is_exhausted());
        }
    }

    #[tokio::test]
    async fn offsets_advance_by_page_size() {
        let venue = MockVenue::new().with_markets(sample_markets(25));

        fetch_active_markets(&venue, &config(10)).await;

        assert_eq!(venue.page_offsets(), vec![0, 10, 20]);
    }

    #[tokio::test]
    async fn markets_keep_catalog_order() {
        let venue = MockVenue::new().with_markets(sample_markets(15));

        let fetch = fetch_active_markets(&venue, &config(10)).await;

        let ids: Vec<_> = fetch.markets.iter().map(|m| m.condition_id.clone().unwrap()).collect();
        let expected: Vec<_> = (0..15).map(|i| format!("cond-{}", i)).collect();
        assert_eq!(ids, expected);
    }

    #[tokio::test]
    async fn status_failure_keeps_earlier_pages() {
        let venue = MockVenue::new()
            .with_markets(sample_markets(50))
            .fail_page_at(2, 503);

        let fetch = fetch_active_markets(&venue, &config(10)).await;

        assert_eq!(fetch.markets.len(), 20);
        assert_eq!(fetch.stop, StopReason::Status(503));
        assert_eq!(venue.page_requests(), 3);
    }

    #[tokio::test]
    async fn malformed_page_keeps_earlier_pages() {
        let venue = MockVenue::new()
            .with_markets(sample_markets(50))
            .fail_page_malformed_at(1);

        let fetch = fetch_active_markets(&venue, &config(10)).await;

        assert_eq!(fetch.markets.len(), 10);
        assert!(matches!(fetch.stop, StopReason::Failed(_)));
        assert!(!fetch.stop.is_exhausted());
        assert_eq!(venue.page_requests(), 2);
        assert_eq!(fetch.pages_requested, 2);
        assert_eq!(venue.page_offsets(), vec![0, 10]);
    }

    #[test]
    fn every_page_request_is_counted() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();
        let venue = MockVenue::new()
            .with_markets(sample_markets(50))
            .fail_page_at(2, 503);

        let fetch = ::metrics::with_local_recorder(&recorder, || {
            tokio_test::block_on(fetch_active_markets(&venue, &config(10)))
        });

        assert_eq!(fetch.pages_requested, 3);
        let rendered = handle.render();
        assert!(
            rendered.contains(&format!("{} 3", metrics::METRIC_CATALOG_PAGES)),
            "{}",
            rendered
        );
        assert!(rendered.contains(&format!("{} 20", metrics::METRIC_MARKETS_FETCHED)));
    }

    #[tokio::test]
    async fn page_cap_stops_endless_catalog() {
        let venue = MockVenue::new().endless_catalog();
        let config = Config {
            page_size: 5,
            max_pages: 4,
            ..Config::default()
        };

        let fetch = fetch_active_markets(&venue, &config).await;

        assert_eq!(fetch.stop, StopReason::PageCap);
        assert_eq!(venue.page_requests(), 4);
        assert_eq!(fetch.markets.len(), 20);
        assert!(!fetch.stop.is_exhausted());
    }
}
