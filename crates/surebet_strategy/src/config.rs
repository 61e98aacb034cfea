//! Configuration structs for the surebet strategy.

use serde::{Deserialize, Serialize};

/// Scan thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Drop opportunities whose profit (percent of total stake) is below this.
    #[serde(default)]
    pub min_profit_pct: f64,

    /// Number of opportunities listed in a report.
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

/// Stake sizing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StakeConfig {
    /// Bankroll split across the two legs of each surebet.
    #[serde(default = "default_bankroll")]
    pub bankroll: f64,
}

/// Bankroll growth goal used by `project`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionConfig {
    #[serde(default = "default_start_bankroll")]
    pub start_bankroll: f64,

    #[serde(default = "default_target_bankroll")]
    pub target_bankroll: f64,

    #[serde(default = "default_horizon_days")]
    pub horizon_days: u32,
}

/// Timing configuration for watch mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingConfig {
    #[serde(default = "default_rescan_interval")]
    pub rescan_interval_secs: u64,

    #[serde(default = "default_heartbeat_interval")]
    pub heartbeat_interval_secs: u64,
}

// ── Defaults ──────────────────────────────────────────────────────────

fn default_top_n() -> usize {
    3
}
fn default_bankroll() -> f64 {
    1000.0
}
fn default_start_bankroll() -> f64 {
    1000.0
}
fn default_target_bankroll() -> f64 {
    2000.0
}
fn default_horizon_days() -> u32 {
    30
}
fn default_rescan_interval() -> u64 {
    60
}
fn default_heartbeat_interval() -> u64 {
    300
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            min_profit_pct: 0.0,
            top_n: default_top_n(),
        }
    }
}

impl Default for StakeConfig {
    fn default() -> Self {
        Self {
            bankroll: default_bankroll(),
        }
    }
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            start_bankroll: default_start_bankroll(),
            target_bankroll: default_target_bankroll(),
            horizon_days: default_horizon_days(),
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            rescan_interval_secs: default_rescan_interval(),
            heartbeat_interval_secs: default_heartbeat_interval(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_tables_fill_defaults() {
        let scan: ScanConfig = serde_json::from_str(r#"{"min_profit_pct": 1.5}"#).unwrap();
        assert_eq!(scan.min_profit_pct, 1.5);
        assert_eq!(scan.top_n, 3);

        let projection: ProjectionConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(projection.start_bankroll, 1000.0);
        assert_eq!(projection.target_bankroll, 2000.0);
        assert_eq!(projection.horizon_days, 30);
    }
}
