//! Prometheus metrics for scan progress and venue latency.
//!
//! Without an installed recorder every call here is a no-op, so library code
//! records unconditionally and the binary decides whether to export.

use std::time::Instant;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use tracing::debug;

// === Metric Name Constants ===

/// Catalog pages requested counter metric name.
pub const METRIC_CATALOG_PAGES: &str = "catalog_pages_total";
/// Markets received from the catalog counter metric name.
pub const METRIC_MARKETS_FETCHED: &str = "markets_fetched_total";
/// Catalog page fetch latency metric name.
pub const METRIC_CATALOG_PAGE_LATENCY: &str = "catalog_page_latency_ms";
/// Order book fetch latency metric name.
pub const METRIC_ORDERBOOK_FETCH_LATENCY: &str = "orderbook_fetch_latency_ms";
/// Absent order books counter metric name.
pub const METRIC_ORDERBOOK_ABSENT: &str = "orderbook_absent_total";
/// Skipped markets counter metric name.
pub const METRIC_MARKETS_SKIPPED: &str = "markets_skipped_total";
/// Opportunities detected counter metric name.
pub const METRIC_OPPORTUNITIES_DETECTED: &str = "opportunities_detected_total";

/// Initialize all metric descriptions.
/// Call this once at startup to register metrics with descriptions.
pub fn init_metrics() {
    describe_counter!(METRIC_CATALOG_PAGES, "Total number of catalog pages requested");
    describe_counter!(METRIC_MARKETS_FETCHED, "Total number of markets received from the catalog");
    describe_histogram!(
        METRIC_CATALOG_PAGE_LATENCY,
        "Catalog page fetch latency in milliseconds"
    );
    describe_histogram!(
        METRIC_ORDERBOOK_FETCH_LATENCY,
        "Order book fetch latency in milliseconds"
    );
    describe_counter!(
        METRIC_ORDERBOOK_ABSENT,
        "Order book fetches that returned no usable book, by reason"
    );
    describe_counter!(METRIC_MARKETS_SKIPPED, "Markets skipped by the scanner, by reason");
    describe_counter!(
        METRIC_OPPORTUNITIES_DETECTED,
        "Total number of mispriced YES/NO pairs detected"
    );

    debug!("Metrics initialized");
}

/// Increment catalog page counter, once per request issued.
pub fn inc_catalog_pages() {
    counter!(METRIC_CATALOG_PAGES).increment(1);
}

/// Record latency and market count of a page the venue answered.
pub fn record_catalog_page(start: Instant, markets: usize) {
    let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
    histogram!(METRIC_CATALOG_PAGE_LATENCY).record(latency_ms);
    counter!(METRIC_MARKETS_FETCHED).increment(markets as u64);
}

/// Record order book fetch latency.
pub fn record_orderbook_fetch_latency(start: Instant) {
    let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
    histogram!(METRIC_ORDERBOOK_FETCH_LATENCY).record(latency_ms);
}

/// Increment absent order book counter.
pub fn inc_orderbook_absent(reason: &'static str) {
    counter!(METRIC_ORDERBOOK_ABSENT, "reason" => reason).increment(1);
}

/// Increment skipped markets counter.
pub fn inc_markets_skipped(reason: &'static str) {
    counter!(METRIC_MARKETS_SKIPPED, "reason" => reason).increment(1);
}

/// Increment opportunities detected counter.
pub fn inc_opportunities_detected() {
    counter!(METRIC_OPPORTUNITIES_DETECTED).increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_without_recorder_is_a_no_op() {
        init_metrics();
        inc_catalog_pages();
        record_catalog_page(Instant::now(), 100);
        record_orderbook_fetch_latency(Instant::now());
        inc_orderbook_absent("status");
        inc_markets_skipped("not_binary");
        inc_opportunities_detected();
    }
}
