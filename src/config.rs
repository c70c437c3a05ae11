use std::env;
use std::path::PathBuf;

use crate::services::features::DEFAULT_ROLLING_WINDOW;

/// Backend configuration derived from environment variables (and `.env`).
#[derive(Debug, Clone)]
pub struct Config {
    /// CSV with `Timestamp,Open,High,Low,Close,Volume`
    pub dataset_path: PathBuf,
    pub bind_addr: String,
    /// Trailing window (rows) for the rolling close volatility
    pub rolling_window: usize,
    /// Optional remote stopword list, fetched once at startup
    pub stopwords_url: Option<String>,
    pub bucket_cache_ttl_secs: u64,
}

fn env_str(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn env_opt(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn env_u64(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

impl Config {
    pub fn from_env() -> Self {
        let rolling_window = env_u64("ROLLING_WINDOW", DEFAULT_ROLLING_WINDOW as u64).max(1) as usize;

        Self {
            dataset_path: PathBuf::from(env_str("DATASET_PATH", "data/DATASET_BTC.csv")),
            bind_addr: env_str("BIND_ADDR", "0.0.0.0:3000"),
            rolling_window,
            stopwords_url: env_opt("STOPWORDS_URL"),
            bucket_cache_ttl_secs: env_u64("BUCKET_CACHE_TTL_SECS", 3600),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from("data/DATASET_BTC.csv"),
            bind_addr: "0.0.0.0:3000".to_string(),
            rolling_window: DEFAULT_ROLLING_WINDOW,
            stopwords_url: None,
            bucket_cache_ttl_secs: 3600,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.rolling_window, 60);
        assert_eq!(config.dataset_path, PathBuf::from("data/DATASET_BTC.csv"));
        assert!(config.stopwords_url.is_none());
    }

    #[test]
    fn test_env_u64_fallback() {
        assert_eq!(env_u64("BTC_DASHBOARD_TEST_UNSET_VARIABLE", 42), 42);
        assert!(env_opt("BTC_DASHBOARD_TEST_UNSET_VARIABLE").is_none());
    }
}
