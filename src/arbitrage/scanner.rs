//! Scan a market list for YES/NO mispricing.

use futures::stream::{self, StreamExt};
use rust_decimal::Decimal;
use tracing::{debug, info, instrument, warn};

use super::calculator::{evaluate_pair, ArbitrageOpportunity};
use super::pairing::{pair_tokens, BinaryPair};
use crate::config::Config;
use crate::market::{Market, Venue};
use crate::metrics;
use crate::orderbook::{fetch_orderbook, AbsentReason, BookFetch};

/// Counters describing one scan pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStats {
    /// Markets handed to the scanner.
    pub markets: usize,
    /// Markets skipped before any fetch (not a YES/NO pair).
    pub not_binary: usize,
    /// Pairs skipped because a book was absent.
    pub missing_book: usize,
    /// Pairs skipped because a book had no asks.
    pub no_asks: usize,
    /// Pairs whose implied total was computed.
    pub evaluated: usize,
    /// Pairs flagged as mispriced.
    pub opportunities: usize,
}

impl ScanStats {
    /// Pairs that reached the fetch stage.
    pub fn pairs(&self) -> usize {
        self.missing_book + self.no_asks + self.evaluated
    }
}

/// Opportunities in input order, plus scan counters.
#[derive(Debug, Clone, Default)]
pub struct ScanResult {
    /// Flagged markets, in the order they were given.
    pub opportunities: Vec<ArbitrageOpportunity>,
    /// Counters.
    pub stats: ScanStats,
}

/// What happened to one pair.
#[derive(Debug)]
enum PairOutcome {
    Flagged(ArbitrageOpportunity),
    Fair,
    MissingBook,
    NoAsks,
}

/// Scan `markets` and return only the opportunities.
pub async fn scan_yes_no_arbitrage<V>(
    venue: &V,
    markets: &[Market],
    config: &Config,
) -> Vec<ArbitrageOpportunity>
where
    V: Venue + ?Sized,
{
    scan_markets(venue, markets, config).await.opportunities
}

/// Scan `markets`, fetching both books of every YES/NO pair.
///
/// Non-binary markets are dropped without a fetch. A missing or empty book
/// skips only its own market. Up to `book_concurrency` markets are in flight
/// at once; output order always matches input order.
#[instrument(skip_all, fields(markets = markets.len()))]
pub async fn scan_markets<V>(venue: &V, markets: &[Market], config: &Config) -> ScanResult
where
    V: Venue + ?Sized,
{
    let threshold = config.mispricing_threshold;
    let mut stats = ScanStats {
        markets: markets.len(),
        ..ScanStats::default()
    };

    let pairs: Vec<BinaryPair<'_>> = markets
        .iter()
        .filter_map(|market| match pair_tokens(market) {
            Ok(pair) => Some(pair),
            Err(skip) => {
                debug!(
                    market_id = market.condition_id.as_deref().unwrap_or("-"),
                    reason = skip.kind(),
                    "Skipping non-binary market"
                );
                metrics::inc_markets_skipped(skip.kind());
                stats.not_binary += 1;
                None
            }
        })
        .collect();

    let outcomes: Vec<PairOutcome> = stream::iter(pairs)
        .map(|pair| evaluate_market(venue, pair, threshold))
        .buffered(config.book_concurrency.max(1))
        .collect()
        .await;

    let mut opportunities = Vec::new();
    for outcome in outcomes {
        match outcome {
            PairOutcome::Flagged(opp) => {
                stats.evaluated += 1;
                stats.opportunities += 1;
                opportunities.push(opp);
            }
            PairOutcome::Fair => stats.evaluated += 1,
            PairOutcome::MissingBook => stats.missing_book += 1,
            PairOutcome::NoAsks => stats.no_asks += 1,
        }
    }

    info!(
        markets = stats.markets,
        evaluated = stats.evaluated,
        skipped = stats.not_binary + stats.missing_book + stats.no_asks,
        opportunities = stats.opportunities,
        "Scan finished"
    );

    ScanResult {
        opportunities,
        stats,
    }
}

async fn evaluate_market<V>(venue: &V, pair: BinaryPair<'_>, threshold: Decimal) -> PairOutcome
where
    V: Venue + ?Sized,
{
    let market_id = pair.market.condition_id.as_deref().unwrap_or("-");

    let yes_book = fetch_orderbook(venue, &pair.yes.token_id).await;
    let no_book = fetch_orderbook(venue, &pair.no.token_id).await;

    for (side, fetch, token_id) in [
        ("YES", &yes_book, &pair.yes.token_id),
        ("NO", &no_book, &pair.no.token_id),
    ] {
        if let BookFetch::Absent(reason) = fetch {
            log_absent(market_id, side, token_id, reason);
        }
    }

    if yes_book.book().is_none() || no_book.book().is_none() {
        metrics::inc_markets_skipped("missing_book");
        return PairOutcome::MissingBook;
    }

    let (yes_ask, no_ask) = match (yes_book.best_ask(), no_book.best_ask()) {
        (Some(yes), Some(no)) => (yes, no),
        _ => {
            debug!(market_id, "No asks available in order book");
            metrics::inc_markets_skipped("no_asks");
            return PairOutcome::NoAsks;
        }
    };

    match evaluate_pair(&pair, yes_ask, no_ask, threshold) {
        Some(opp) => {
            info!(
                market_id,
                yes_ask = %opp.yes_ask,
                no_ask = %opp.no_ask,
                implied_total = %opp.implied_total,
                edge = %opp.edge,
                "Mispriced YES/NO pair detected"
            );
            metrics::inc_opportunities_detected();
            PairOutcome::Flagged(opp)
        }
        None => {
            debug!(
                market_id,
                implied_total = %(yes_ask + no_ask),
                threshold = %threshold,
                "No mispricing"
            );
            PairOutcome::Fair
        }
    }
}

fn log_absent(market_id: &str, side: &str, token_id: &str, reason: &AbsentReason) {
    match reason {
        AbsentReason::Status(_) => {
            debug!(market_id, side, token_id, reason = %reason, "Order book unavailable")
        }
        _ => warn!(market_id, side, token_id, reason = %reason, "Order book fetch failed"),
    }
}
