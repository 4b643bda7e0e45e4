//! Quote service configuration.

use chrono::Duration;
use easner_common::constants;

use crate::cache::CatalogCacheConfig;

/// Configuration for the quote service.
#[derive(Debug, Clone)]
pub struct QuoteConfig {
    /// How long a fetched catalog is reused.
    pub catalog_ttl: Duration,
    /// Whether to reuse fetched catalogs at all.
    pub use_cache: bool,
    /// Log level.
    pub log_level: String,
}

impl Default for QuoteConfig {
    fn default() -> Self {
        Self {
            catalog_ttl: constants::catalog_ttl(),
            use_cache: true,
            log_level: "info".to_string(),
        }
    }
}

impl QuoteConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(secs) = lookup("EASNER_CATALOG_TTL_SECS") {
            if let Some(ttl) = secs
                .trim()
                .parse::<i64>()
                .ok()
                .and_then(Duration::try_seconds)
            {
                config.catalog_ttl = ttl;
            }
        }

        if let Some(flag) = lookup("EASNER_USE_CACHE") {
            match flag.trim().to_ascii_lowercase().as_str() {
                "0" | "false" | "no" | "off" => config.use_cache = false,
                "1" | "true" | "yes" | "on" => config.use_cache = true,
                _ => {}
            }
        }

        if let Some(level) = lookup("LOG_LEVEL") {
            config.log_level = level;
        }

        config
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.use_cache && self.catalog_ttl <= Duration::zero() {
            return Err("Catalog TTL must be positive when caching is enabled".to_string());
        }

        if self.log_level.trim().is_empty() {
            return Err("Log level cannot be empty".to_string());
        }

        Ok(())
    }

    /// Cache settings derived from this configuration.
    pub fn cache_config(&self) -> CatalogCacheConfig {
        CatalogCacheConfig {
            ttl: self.catalog_ttl,
        }
    }
}
