// =============================================================================
// Runtime Configuration — Signal board settings with atomic save
// =============================================================================
//
// All fields carry `#[serde(default)]` so that adding new fields never breaks
// loading an older config file. Indicator periods and classifier thresholds
// are deliberately absent: they are fixed in code.
//
// Persistence uses an atomic tmp + rename pattern to prevent corruption on
// crash.
// =============================================================================

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_symbols() -> Vec<String> {
    vec![
        "EURUSD=X".to_string(),
        "GBPUSD=X".to_string(),
        "USDJPY=X".to_string(),
        "AUDUSD=X".to_string(),
        "USDCAD=X".to_string(),
        "USDCHF=X".to_string(),
        "NZDUSD=X".to_string(),
    ]
}

fn default_lookback_days() -> u32 {
    7
}

fn default_bar_interval() -> String {
    "15m".to_string()
}

fn default_provider_base_url() -> String {
    crate::market_data::yahoo::DEFAULT_BASE_URL.to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_cache_ttl_secs() -> u64 {
    900
}

fn default_bind_addr() -> String {
    "0.0.0.0:3001".to_string()
}

// =============================================================================
// RuntimeConfig
// =============================================================================

/// Top-level configuration for the signal board.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Currency pairs to evaluate, in display order.
    #[serde(default = "default_symbols")]
    pub symbols: Vec<String>,

    /// How many days of history each fetch requests.
    #[serde(default = "default_lookback_days")]
    pub lookback_days: u32,

    /// Bar interval passed to the provider (e.g. "15m").
    #[serde(default = "default_bar_interval")]
    pub bar_interval: String,

    /// Chart API host. Overridable for mirrors or a local fixture server.
    #[serde(default = "default_provider_base_url")]
    pub provider_base_url: String,

    /// Per-request timeout for the provider; expiry counts as no data.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// How long a fetched series is reused before refetching.
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    /// Address the dashboard server listens on.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            symbols: default_symbols(),
            lookback_days: default_lookback_days(),
            bar_interval: default_bar_interval(),
            provider_base_url: default_provider_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            cache_ttl_secs: default_cache_ttl_secs(),
            bind_addr: default_bind_addr(),
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// If the file does not exist, returns an error so the caller can fall
    /// back to defaults with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read runtime config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse runtime config from {}", path.display()))?;

        info!(
            path = %path.display(),
            symbols = ?config.symbols,
            interval = %config.bar_interval,
            "runtime config loaded"
        );

        Ok(config)
    }

    /// Persist the current configuration to `path` using an atomic write
    /// (write to `.tmp`, then rename).
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        let content = serde_json::to_string_pretty(self)
            .context("failed to serialise runtime config to JSON")?;

        let tmp_path = path.with_extension("json.tmp");

        std::fs::write(&tmp_path, &content)
            .with_context(|| format!("failed to write tmp config to {}", tmp_path.display()))?;

        std::fs::rename(&tmp_path, path)
            .with_context(|| format!("failed to rename tmp config to {}", path.display()))?;

        info!(path = %path.display(), "runtime config saved (atomic)");
        Ok(())
    }

    /// Apply a comma-separated symbol override (e.g. from `FXSIG_SYMBOLS`).
    /// Blank entries are ignored; an override with no symbols is ignored.
    pub fn apply_symbol_override(&mut self, raw: &str) {
        let symbols: Vec<String> = raw
            .split(',')
            .map(|s| s.trim().to_uppercase())
            .filter(|s| !s.is_empty())
            .collect();
        if !symbols.is_empty() {
            self.symbols = symbols;
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_expected_values() {
        let cfg = RuntimeConfig::default();
        assert_eq!(cfg.symbols.len(), 7);
        assert_eq!(cfg.symbols[0], "EURUSD=X");
        assert_eq!(cfg.symbols[6], "NZDUSD=X");
        assert_eq!(cfg.lookback_days, 7);
        assert_eq!(cfg.bar_interval, "15m");
        assert_eq!(cfg.request_timeout(), Duration::from_secs(10));
        assert_eq!(cfg.cache_ttl(), Duration::from_secs(900));
    }

    #[test]
    fn deserialise_empty_json_uses_defaults() {
        let cfg: RuntimeConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg.symbols.len(), 7);
        assert_eq!(cfg.bind_addr, "0.0.0.0:3001");
        assert_eq!(cfg.provider_base_url, "https://query1.finance.yahoo.com");
    }

    #[test]
    fn deserialise_partial_json_fills_defaults() {
        let json = r#"{ "symbols": ["EURGBP=X"], "cache_ttl_secs": 60 }"#;
        let cfg: RuntimeConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.symbols, vec!["EURGBP=X"]);
        assert_eq!(cfg.cache_ttl_secs, 60);
        assert_eq!(cfg.lookback_days, 7);
    }

    #[test]
    fn symbol_override_trims_and_uppercases() {
        let mut cfg = RuntimeConfig::default();
        cfg.apply_symbol_override(" eurusd=x, ,gbpjpy=x ");
        assert_eq!(cfg.symbols, vec!["EURUSD=X", "GBPJPY=X"]);
    }

    #[test]
    fn blank_symbol_override_keeps_defaults() {
        let mut cfg = RuntimeConfig::default();
        cfg.apply_symbol_override(" , ");
        assert_eq!(cfg.symbols.len(), 7);
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("runtime_config.json");

        let mut cfg = RuntimeConfig::default();
        cfg.symbols = vec!["AUDNZD=X".to_string()];
        cfg.save(&path).unwrap();

        let loaded = RuntimeConfig::load(&path).unwrap();
        assert_eq!(loaded.symbols, vec!["AUDNZD=X"]);
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn save_overwrites_existing_file() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("runtime_config.json");

        RuntimeConfig::default().save(&path).unwrap();
        let mut cfg = RuntimeConfig::default();
        cfg.cache_ttl_secs = 120;
        cfg.save(&path).unwrap();

        assert_eq!(RuntimeConfig::load(&path).unwrap().cache_ttl_secs, 120);
    }

    #[test]
    fn load_missing_file_is_error() {
        assert!(RuntimeConfig::load("/nonexistent/runtime_config.json").is_err());
    }
}
