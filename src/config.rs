//! Configuration loader — merges env vars, .env file, and config.toml.

use common::Error;
use serde::{Deserialize, Serialize};
use std::path::Path;

use surebet_strategy::config::{ProjectionConfig, ScanConfig, StakeConfig, TimingConfig};

const DEFAULT_CONFIG_PATH: &str = "config.toml";

// ── Bot config ────────────────────────────────────────────────────────

/// Top-level scanner configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurebetBotConfig {
    /// JSON odds feed produced by the scraping side.
    #[serde(default = "default_feed_path")]
    pub feed_path: String,

    /// Scan thresholds.
    #[serde(default)]
    pub scan: ScanConfig,

    /// Stake sizing.
    #[serde(default)]
    pub stakes: StakeConfig,

    /// Bankroll growth goal.
    #[serde(default)]
    pub projection: ProjectionConfig,

    /// Watch-mode timing.
    #[serde(default)]
    pub timing: TimingConfig,
}

fn default_feed_path() -> String {
    "feeds/sample.json".into()
}

impl Default for SurebetBotConfig {
    fn default() -> Self {
        Self {
            feed_path: default_feed_path(),
            scan: ScanConfig::default(),
            stakes: StakeConfig::default(),
            projection: ProjectionConfig::default(),
            timing: TimingConfig::default(),
        }
    }
}

// ── Config loader ─────────────────────────────────────────────────────

/// Load configuration from environment and an optional config file.
///
/// An explicit `path` must exist; the default `config.toml` is optional.
pub fn load_config(path: Option<&Path>) -> Result<SurebetBotConfig, Error> {
    // 1. Load .env file from project root or parent directories.
    if let Err(e) = dotenvy::dotenv() {
        tracing::debug!("No .env file loaded: {}", e);
    }

    // 2. Start with defaults, then config.toml if present.
    let config_path = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_PATH));
    let mut config = if config_path.exists() {
        let contents = std::fs::read_to_string(config_path).map_err(|e| {
            Error::Config(format!("Failed to read {}: {}", config_path.display(), e))
        })?;
        parse_config(&contents)?
    } else if path.is_some() {
        return Err(Error::Config(format!(
            "Config file not found: {}",
            config_path.display()
        )));
    } else {
        SurebetBotConfig::default()
    };

    // 3. Override with environment variables (highest priority).
    apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;

    // 4. Validate.
    validate(&config)?;

    Ok(config)
}

pub fn parse_config(contents: &str) -> Result<SurebetBotConfig, Error> {
    toml::from_str(contents).map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))
}

/// Apply `SUREBET_*` overrides read through `lookup`.
pub fn apply_env_overrides<F>(config: &mut SurebetBotConfig, lookup: F) -> Result<(), Error>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(path) = lookup("SUREBET_FEED_PATH") {
        config.feed_path = path;
    }
    if let Some(raw) = lookup("SUREBET_BANKROLL") {
        config.stakes.bankroll = parse_number("SUREBET_BANKROLL", &raw)?;
    }
    if let Some(raw) = lookup("SUREBET_MIN_PROFIT_PCT") {
        config.scan.min_profit_pct = parse_number("SUREBET_MIN_PROFIT_PCT", &raw)?;
    }
    Ok(())
}

fn parse_number(key: &str, raw: &str) -> Result<f64, Error> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| Error::Config(format!("{} must be a number, got {:?}", key, raw)))
}

pub fn validate(config: &SurebetBotConfig) -> Result<(), Error> {
    if config.feed_path.trim().is_empty() {
        return Err(Error::Config("feed_path is required".into()));
    }
    if !config.stakes.bankroll.is_finite() || config.stakes.bankroll <= 0.0 {
        return Err(Error::Config(format!(
            "stakes.bankroll must be positive, got {}",
            config.stakes.bankroll
        )));
    }
    if !config.scan.min_profit_pct.is_finite() || config.scan.min_profit_pct < 0.0 {
        return Err(Error::Config(format!(
            "scan.min_profit_pct must be non-negative, got {}",
            config.scan.min_profit_pct
        )));
    }
    let projection = &config.projection;
    if !projection.start_bankroll.is_finite()
        || projection.start_bankroll <= 0.0
        || !projection.target_bankroll.is_finite()
        || projection.target_bankroll <= projection.start_bankroll
    {
        return Err(Error::Config(format!(
            "projection needs 0 < start_bankroll < target_bankroll, got {} -> {}",
            projection.start_bankroll, projection.target_bankroll
        )));
    }
    if projection.horizon_days == 0 {
        return Err(Error::Config("projection.horizon_days must be at least 1".into()));
    }
    if config.timing.rescan_interval_secs == 0 {
        return Err(Error::Config("timing.rescan_interval_secs must be at least 1".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_parse_partial_toml() {
        let config = parse_config(
            r#"
            feed_path = "feeds/today.json"

            [scan]
            min_profit_pct = 1.5

            [stakes]
            bankroll = 250.0
            "#,
        )
        .unwrap();
        assert_eq!(config.feed_path, "feeds/today.json");
        assert_eq!(config.scan.min_profit_pct, 1.5);
        assert_eq!(config.scan.top_n, 3);
        assert_eq!(config.stakes.bankroll, 250.0);
        assert_eq!(config.projection.horizon_days, 30);
        assert_eq!(config.timing.rescan_interval_secs, 60);
    }

    #[test]
    fn test_parse_rejects_bad_toml() {
        assert!(matches!(
            parse_config("[stakes]\nbankroll = \"lots\""),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("SUREBET_FEED_PATH", "/tmp/feed.json"),
            ("SUREBET_BANKROLL", " 500 "),
            ("SUREBET_MIN_PROFIT_PCT", "2.5"),
        ]
        .into_iter()
        .collect();

        let mut config = SurebetBotConfig::default();
        apply_env_overrides(&mut config, |k| env.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(config.feed_path, "/tmp/feed.json");
        assert_eq!(config.stakes.bankroll, 500.0);
        assert_eq!(config.scan.min_profit_pct, 2.5);
    }

    #[test]
    fn test_env_override_must_be_numeric() {
        let mut config = SurebetBotConfig::default();
        let err = apply_env_overrides(&mut config, |k| {
            (k == "SUREBET_BANKROLL").then(|| "abc".to_string())
        })
        .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_validate() {
        assert!(validate(&SurebetBotConfig::default()).is_ok());

        let mut config = SurebetBotConfig::default();
        config.stakes.bankroll = 0.0;
        assert!(validate(&config).is_err());

        let mut config = SurebetBotConfig::default();
        config.scan.min_profit_pct = -1.0;
        assert!(validate(&config).is_err());

        let mut config = SurebetBotConfig::default();
        config.projection.horizon_days = 0;
        assert!(validate(&config).is_err());

        let mut config = SurebetBotConfig::default();
        config.projection.target_bankroll = config.projection.start_bankroll;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_explicit_missing_config_is_an_error() {
        let err = load_config(Some(Path::new("does/not/exist.toml"))).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
