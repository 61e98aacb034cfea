//! Surebet strategy crate.
//!
//! Matches odds quotes across bookmakers, detects two-way arbitrage
//! ("surebets"), splits a bankroll across the legs and projects bankroll
//! growth. Every function here is pure: no I/O, no shared state.

pub mod aggregate;
pub mod arb;
pub mod config;
pub mod normalize;
pub mod projection;
pub mod quotes;
pub mod stakes;

pub use aggregate::{build_report, plan_stakes, scan_feed, ScanReport, StakePlan};
pub use arb::{find_opportunities, margin, profit_percentage, ArbitrageOpportunity};
pub use config::{ProjectionConfig, ScanConfig, StakeConfig, TimingConfig};
pub use normalize::{normalize, normalize_label};
pub use projection::{
    project, required_daily_rate, simulate, ProfitProjection, ProjectionPoint,
};
pub use quotes::{Market, OddsFeed, OddsQuote, Outcome, OutcomeLabel, TotalSide};
pub use stakes::{
    allocate, expected_profit, roi_percentage, round_currency, ExpectedProfit, StakeAllocation,
};
