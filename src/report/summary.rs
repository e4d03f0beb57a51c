//! Console summary printed after each run.

use std::fmt::Write;

use crate::arbitrage::{ArbitrageOpportunity, ScanStats};
use crate::market::StopReason;

/// Characters of question text shown per opportunity line.
const QUESTION_WIDTH: usize = 60;

/// Render the run summary.
///
/// Partial data is reported as-is: skipped pairs and an early catalog stop
/// are spelled out rather than folded into the totals.
pub fn format_summary(
    stats: &ScanStats,
    catalog_stop: &StopReason,
    opportunities: &[ArbitrageOpportunity],
    top_n: usize,
) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Found {} active markets", stats.markets);

    match catalog_stop {
        StopReason::EmptyPage | StopReason::ShortPage => {}
        StopReason::PageCap => {
            let _ = writeln!(
                out,
                "WARNING: catalog hit the page limit; market list may be incomplete"
            );
        }
        StopReason::Status(code) => {
            let _ = writeln!(
                out,
                "WARNING: catalog stopped on HTTP {}; market list may be incomplete",
                code
            );
        }
        StopReason::Failed(reason) => {
            let _ = writeln!(
                out,
                "WARNING: catalog stopped early ({}); market list may be incomplete",
                reason
            );
        }
    }

    let _ = writeln!(
        out,
        "Scanned {} YES/NO pairs: {} priced, {} missing book, {} without asks ({} markets not binary)",
        stats.pairs(),
        stats.evaluated,
        stats.missing_book,
        stats.no_asks,
        stats.not_binary,
    );

    let _ = writeln!(out, "Found {} arbitrage opportunities", opportunities.len());

    for opp in opportunities.iter().take(top_n) {
        let question: String = opp.market.chars().take(QUESTION_WIDTH).collect();
        let _ = writeln!(
            out,
            "  {}... | Implied: {:.4} | Edge: {:.2}%",
            question,
            opp.implied_total,
            opp.edge_pct()
        );
    }

    out
}

/// Print the run summary to stdout.
pub fn print_summary(
    stats: &ScanStats,
    catalog_stop: &StopReason,
    opportunities: &[ArbitrageOpportunity],
    top_n: usize,
) {
    print!("{}", format_summary(stats, catalog_stop, opportunities, top_n));
}
