//! Application configuration loaded from environment variables.

use std::path::PathBuf;
use std::time::Duration;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::BotError;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // === Venue ===
    /// CLOB API base URL.
    #[serde(default = "default_clob_url")]
    pub polymarket_clob_url: String,

    // === Catalog ===
    /// Markets requested per catalog page.
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Hard cap on catalog pages per run.
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,

    /// Timeout for one catalog page request.
    #[serde(default = "default_catalog_timeout_ms")]
    pub catalog_timeout_ms: u64,

    // === Order books ===
    /// Timeout for one order book request.
    #[serde(default = "default_book_timeout_ms")]
    pub book_timeout_ms: u64,

    /// Markets with book fetches in flight at once (1 = strictly sequential).
    #[serde(default = "default_book_concurrency")]
    pub book_concurrency: usize,

    // === Detection ===
    /// Flag a market when YES ask + NO ask is strictly below this (e.g., 0.99).
    #[serde(default = "default_mispricing_threshold")]
    pub mispricing_threshold: Decimal,

    // === Report ===
    /// Where the scan snapshot is written.
    #[serde(default = "default_snapshot_path")]
    pub snapshot_path: PathBuf,

    /// Opportunities listed in the console summary.
    #[serde(default = "default_summary_top_n")]
    pub summary_top_n: usize,

    // === Logging ===
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub rust_log: String,

    /// Emit logs as JSON lines.
    #[serde(default)]
    pub log_json: bool,

    /// Enable verbose logging.
    #[serde(default)]
    pub verbose: bool,
}

fn default_clob_url() -> String {
    "https://clob.polymarket.com".to_string()
}

fn default_page_size() -> usize {
    100
}

fn default_max_pages() -> usize {
    1_000 // 100k markets at the default page size
}

fn default_catalog_timeout_ms() -> u64 {
    10_000
}

fn default_book_timeout_ms() -> u64 {
    5_000
}

fn default_book_concurrency() -> usize {
    1
}

fn default_mispricing_threshold() -> Decimal {
    Decimal::new(99, 2) // 0.99, ~1% fee buffer
}

fn default_snapshot_path() -> PathBuf {
    PathBuf::from("/workspace/state/market_scan.json")
}

fn default_summary_top_n() -> usize {
    3
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            polymarket_clob_url: default_clob_url(),
            page_size: default_page_size(),
            max_pages: default_max_pages(),
            catalog_timeout_ms: default_catalog_timeout_ms(),
            book_timeout_ms: default_book_timeout_ms(),
            book_concurrency: default_book_concurrency(),
            mispricing_threshold: default_mispricing_threshold(),
            snapshot_path: default_snapshot_path(),
            summary_top_n: default_summary_top_n(),
            rust_log: default_log_level(),
            log_json: false,
            verbose: false,
        }
    }
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> Result<(), String> {
        if self.polymarket_clob_url.is_empty() {
            return Err("POLYMARKET_CLOB_URL must not be empty".to_string());
        }

        if self.page_size == 0 {
            return Err("PAGE_SIZE must be at least 1".to_string());
        }

        if self.max_pages == 0 {
            return Err("MAX_PAGES must be at least 1".to_string());
        }

        if self.catalog_timeout_ms == 0 || self.book_timeout_ms == 0 {
            return Err("CATALOG_TIMEOUT_MS and BOOK_TIMEOUT_MS must be positive".to_string());
        }

        if self.book_concurrency == 0 {
            return Err("BOOK_CONCURRENCY must be at least 1".to_string());
        }

        if self.mispricing_threshold <= Decimal::ZERO || self.mispricing_threshold > Decimal::ONE {
            return Err("MISPRICING_THRESHOLD must be in (0, 1]".to_string());
        }

        Ok(())
    }

    /// Validate, keeping the config only if it passes.
    pub fn validated(self) -> crate::Result<Self> {
        self.validate().map_err(BotError::InvalidConfig)?;
        Ok(self)
    }

    /// Catalog page timeout.
    pub fn catalog_timeout(&self) -> Duration {
        Duration::from_millis(self.catalog_timeout_ms)
    }

    /// Order book timeout.
    pub fn book_timeout(&self) -> Duration {
        Duration::from_millis(self.book_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn default_values_are_sensible() {
        let config = Config::default();
        assert_eq!(config.page_size, 100);
        assert_eq!(config.mispricing_threshold, dec!(0.99));
        assert_eq!(config.catalog_timeout(), Duration::from_secs(10));
        assert_eq!(config.book_timeout(), Duration::from_secs(5));
        assert_eq!(config.book_concurrency, 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn book_timeout_is_shorter_than_catalog_timeout() {
        let config = Config::default();
        assert!(config.book_timeout() < config.catalog_timeout());
    }

    #[test]
    fn validate_rejects_zero_page_size() {
        let config = Config {
            page_size: 0,
            ..Config::default()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_threshold_above_one() {
        let config = Config {
            mispricing_threshold: dec!(1.01),
            ..Config::default()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_concurrency() {
        let config = Config {
            book_concurrency: 0,
            ..Config::default()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn validated_reports_invalid_config() {
        let config = Config {
            page_size: 0,
            ..Config::default()
        };

        match config.validated() {
            Err(BotError::InvalidConfig(msg)) => assert!(msg.contains("PAGE_SIZE")),
            other => panic!("unexpected {:?}", other.map(|_| ())),
        }
        assert!(Config::default().validated().is_ok());
    }

    #[test]
    fn unparseable_env_value_is_config_error() {
        let vars = vec![("PAGE_SIZE".to_string(), "lots".to_string())];

        let err = envy::from_iter::<_, Config>(vars).unwrap_err();

        assert!(matches!(BotError::from(err), BotError::Config(_)));
    }
}
