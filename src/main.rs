//! Surebet Bot Entry Point.
//!
//! Loads an odds feed and runs one of:
//! 1. Feed listing (`odds`)
//! 2. Surebet scan with stake plans, once or in a watch loop (`scan`)
//! 3. Stake split for a single pair of odds (`stakes`)
//! 4. Bankroll projection (`project`)
//! 5. Full scan report (`report`)
//!
//! Results go to stdout as JSON; logs go to stderr.

mod config;
mod feed;

use std::collections::HashSet;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::{Duration, Instant};

use chrono::Utc;
use clap::{Parser, Subcommand};
use common::Error;
use serde::Serialize;
use serde_json::json;
use surebet_strategy::{
    allocate, build_report, expected_profit, margin, normalize, plan_stakes, profit_percentage,
    project, roi_percentage, scan_feed, ArbitrageOpportunity, StakePlan,
};
use tokio::time::sleep;
use tracing::{error, info, warn};

use crate::config::{load_config, SurebetBotConfig};
use crate::feed::load_feed;

#[derive(Parser)]
#[command(name = "surebet-bot", about = "Find two-way arbitrage across bookmaker odds")]
struct Cli {
    /// Config file (defaults to ./config.toml when present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Odds feed JSON, overrides `feed_path` from config.
    #[arg(long, global = true)]
    feed: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the loaded feed, or one bookmaker's quotes.
    Odds {
        #[arg(long)]
        bookmaker: Option<String>,
    },
    /// Print ranked surebets with stake plans.
    Scan {
        #[arg(long)]
        bankroll: Option<f64>,

        /// Re-read the feed every `timing.rescan_interval_secs`.
        #[arg(long)]
        watch: bool,
    },
    /// Split a bankroll across two odds.
    Stakes {
        #[arg(long)]
        bankroll: f64,

        #[arg(long)]
        odd_a: f64,

        #[arg(long)]
        odd_b: f64,
    },
    /// Daily return needed to grow a bankroll to a target.
    Project {
        #[arg(long)]
        start: Option<f64>,

        #[arg(long)]
        target: Option<f64>,

        #[arg(long)]
        days: Option<u32>,

        /// Include the day-by-day trajectory.
        #[arg(long)]
        trajectory: bool,
    },
    /// Scan summary plus the stake plan for the best surebet.
    Report {
        #[arg(long)]
        bankroll: Option<f64>,

        #[arg(long)]
        top: Option<usize>,
    },
}

fn opportunity_fingerprint(opp: &ArbitrageOpportunity) -> u64 {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    normalize(&opp.event).hash(&mut hasher);
    opp.market.to_string().hash(&mut hasher);
    opp.bookmaker_a.to_lowercase().hash(&mut hasher);
    opp.outcome_a.hash(&mut hasher);
    opp.odd_a.to_bits().hash(&mut hasher);
    opp.bookmaker_b.to_lowercase().hash(&mut hasher);
    opp.outcome_b.hash(&mut hasher);
    opp.odd_b.to_bits().hash(&mut hasher);
    hasher.finish()
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn check_bankroll(bankroll: f64) -> Result<f64, Error> {
    if !bankroll.is_finite() || bankroll <= 0.0 {
        return Err(Error::InvalidInput(format!(
            "bankroll must be positive, got {}",
            bankroll
        )));
    }
    Ok(bankroll)
}

/// Stake plans for every opportunity; degenerate splits are skipped.
fn plans_for(opportunities: &[ArbitrageOpportunity], bankroll: f64) -> Vec<StakePlan> {
    opportunities
        .iter()
        .filter_map(|opp| match plan_stakes(opp, bankroll) {
            Ok(plan) => Some(plan),
            Err(e) => {
                warn!("Skipping stake plan for {}: {}", opp.event, e);
                None
            }
        })
        .collect()
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "surebet_bot=info,surebet_strategy=info".into()),
        )
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if e.is_rejection() => {
            error!("Request rejected: {}", e);
            ExitCode::from(2)
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), Error> {
    let cfg = load_config(cli.config.as_deref())?;
    let feed_path = cli
        .feed
        .clone()
        .unwrap_or_else(|| PathBuf::from(&cfg.feed_path));

    match cli.command {
        Command::Odds { bookmaker } => {
            let feed = load_feed(&feed_path)?;
            match bookmaker {
                Some(name) => {
                    let quotes = feed.quotes(&name).ok_or_else(|| {
                        Error::InvalidInput(format!("Unknown bookmaker: {}", name))
                    })?;
                    print_json(&json!({ "bookmaker": name, "quotes": quotes }))
                }
                None => print_json(&feed),
            }
        }

        Command::Scan { bankroll, watch } => {
            let bankroll = check_bankroll(bankroll.unwrap_or(cfg.stakes.bankroll))?;
            if watch {
                return watch_feed(&feed_path, &cfg, bankroll).await;
            }
            let feed = load_feed(&feed_path)?;
            let opportunities = scan_feed(&feed, &cfg.scan);
            info!(
                "{} surebets across {} bookmakers",
                opportunities.len(),
                feed.bookmaker_count()
            );
            print_json(&plans_for(&opportunities, bankroll))
        }

        Command::Stakes {
            bankroll,
            odd_a,
            odd_b,
        } => {
            let allocation = allocate(bankroll, odd_a, odd_b)?;
            let margin = margin(odd_a, odd_b);
            if margin >= 1.0 {
                warn!(
                    "{:.2} / {:.2} is not a surebet (margin {:.4}), profit is not guaranteed",
                    odd_a, odd_b, margin
                );
            }
            let profit = expected_profit(allocation.stake_a, odd_a, allocation.stake_b, odd_b);
            let roi = roi_percentage(profit.average_profit, bankroll)?;
            print_json(&json!({
                "bankroll": bankroll,
                "odd_a": odd_a,
                "odd_b": odd_b,
                "margin": margin,
                "is_surebet": margin < 1.0,
                "profit_percentage": (margin < 1.0).then(|| profit_percentage(margin)),
                "allocation": allocation,
                "expected_profit": profit,
                "roi_percentage": roi,
            }))
        }

        Command::Project {
            start,
            target,
            days,
            trajectory,
        } => {
            let start = start.unwrap_or(cfg.projection.start_bankroll);
            let target = target.unwrap_or(cfg.projection.target_bankroll);
            let days = days.unwrap_or(cfg.projection.horizon_days);
            let projection = project(start, target, days)?;

            let mut out = json!({
                "start_bankroll": start,
                "target_bankroll": target,
                "horizon_days": days,
                "daily_rate": projection.daily_rate,
                "daily_rate_pct": projection.daily_rate * 100.0,
                "final_bankroll": projection.final_bankroll(),
            });
            if trajectory {
                out["trajectory"] = serde_json::to_value(&projection.trajectory)?;
            }
            print_json(&out)
        }

        Command::Report { bankroll, top } => {
            let bankroll = check_bankroll(bankroll.unwrap_or(cfg.stakes.bankroll))?;
            let top_n = top.unwrap_or(cfg.scan.top_n);
            let feed = load_feed(&feed_path)?;
            let opportunities = scan_feed(&feed, &cfg.scan);
            let report = build_report(&feed, &opportunities, top_n, Utc::now());
            let best_plan = opportunities
                .first()
                .map(|opp| plan_stakes(opp, bankroll))
                .transpose()?;
            let goal = &cfg.projection;
            let projection = project(goal.start_bankroll, goal.target_bankroll, goal.horizon_days)?;

            print_json(&json!({
                "report": report,
                "best_plan": best_plan,
                "projection": {
                    "start_bankroll": goal.start_bankroll,
                    "target_bankroll": goal.target_bankroll,
                    "horizon_days": goal.horizon_days,
                    "daily_rate": projection.daily_rate,
                    "daily_rate_pct": projection.daily_rate * 100.0,
                },
            }))
        }
    }
}

// ── Watch loop ────────────────────────────────────────────────────────

/// Rescan `feed_path` until Ctrl-C, printing a stake plan (one JSON line)
/// for each surebet not present in the previous cycle.
async fn watch_feed(feed_path: &Path, cfg: &SurebetBotConfig, bankroll: f64) -> Result<(), Error> {
    let rescan_interval = Duration::from_secs(cfg.timing.rescan_interval_secs);
    let heartbeat_interval = Duration::from_secs(cfg.timing.heartbeat_interval_secs);

    info!(
        "🚀 Watching {} every {}s (bankroll {:.2})",
        feed_path.display(),
        cfg.timing.rescan_interval_secs,
        bankroll
    );

    let mut prev_cycle_opps: HashSet<u64> = HashSet::new();
    let mut last_heartbeat = Instant::now();
    let mut cycles_since_heartbeat: u64 = 0;
    let mut new_opps_since_heartbeat: usize = 0;
    let mut feed_errors_since_heartbeat: usize = 0;

    loop {
        cycles_since_heartbeat = cycles_since_heartbeat.saturating_add(1);

        match load_feed(feed_path) {
            Ok(feed) => {
                let opportunities = scan_feed(&feed, &cfg.scan);
                let mut current_cycle_opps: HashSet<u64> = HashSet::new();

                for opp in &opportunities {
                    let fingerprint = opportunity_fingerprint(opp);
                    current_cycle_opps.insert(fingerprint);
                    if prev_cycle_opps.contains(&fingerprint) {
                        continue;
                    }

                    new_opps_since_heartbeat = new_opps_since_heartbeat.saturating_add(1);
                    info!("SUREBET FOUND: {}", opp);
                    match plan_stakes(opp, bankroll) {
                        Ok(plan) => println!("{}", serde_json::to_string(&plan)?),
                        Err(e) => warn!("Skipping stake plan for {}: {}", opp.event, e),
                    }
                }

                prev_cycle_opps = current_cycle_opps;
            }
            Err(e) => {
                feed_errors_since_heartbeat = feed_errors_since_heartbeat.saturating_add(1);
                warn!("Feed reload failed, keeping previous state: {}", e);
            }
        }

        if last_heartbeat.elapsed() >= heartbeat_interval {
            info!(
                "Heartbeat: cycles={} new_surebets={} active_surebets={} feed_errors={}",
                cycles_since_heartbeat,
                new_opps_since_heartbeat,
                prev_cycle_opps.len(),
                feed_errors_since_heartbeat
            );
            last_heartbeat = Instant::now();
            cycles_since_heartbeat = 0;
            new_opps_since_heartbeat = 0;
            feed_errors_since_heartbeat = 0;
        }

        tokio::select! {
            _ = sleep(rescan_interval) => {}
            _ = tokio::signal::ctrl_c() => {
                info!("Shutting down watch loop");
                return Ok(());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use surebet_strategy::{find_opportunities, Market, OddsQuote};

    fn opportunity(event_b: &str, odd_b: f64) -> ArbitrageOpportunity {
        let a = OddsQuote::new(
            "Flamengo x Palmeiras",
            Market::Result,
            "Bet365",
            [("Flamengo", 2.10), ("Palmeiras", 1.85)],
        )
        .unwrap();
        let b = OddsQuote::new(
            event_b,
            Market::Result,
            "Betano",
            [("Flamengo", 1.95), ("Palmeiras", odd_b)],
        )
        .unwrap();
        find_opportunities(&[a], &[b]).remove(0)
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_parses_subcommands() {
        let cli = Cli::try_parse_from([
            "surebet-bot",
            "stakes",
            "--bankroll",
            "1000",
            "--odd-a",
            "2.10",
            "--odd-b",
            "2.05",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Command::Stakes { bankroll, odd_a, odd_b }
                if bankroll == 1000.0 && odd_a == 2.10 && odd_b == 2.05
        ));

        let cli =
            Cli::try_parse_from(["surebet-bot", "scan", "--watch", "--feed", "feed.json"]).unwrap();
        assert_eq!(cli.feed, Some(PathBuf::from("feed.json")));
        assert!(matches!(cli.command, Command::Scan { bankroll: None, watch: true }));

        assert!(Cli::try_parse_from(["surebet-bot", "stakes", "--bankroll", "10"]).is_err());
    }

    #[test]
    fn test_fingerprint_ignores_event_formatting() {
        let a = opportunity("Flamengo vs Palmeiras", 2.05);
        let b = opportunity("FLAMENGO x PALMEIRAS", 2.05);
        let mut c = a.clone();
        c.event = "  flamengo   X palmeiras ".into();
        assert_eq!(opportunity_fingerprint(&a), opportunity_fingerprint(&b));
        assert_eq!(opportunity_fingerprint(&a), opportunity_fingerprint(&c));
    }

    #[test]
    fn test_fingerprint_changes_with_odds() {
        let a = opportunity("Flamengo vs Palmeiras", 2.05);
        let b = opportunity("Flamengo vs Palmeiras", 2.15);
        assert_ne!(opportunity_fingerprint(&a), opportunity_fingerprint(&b));
    }

    #[test]
    fn test_check_bankroll() {
        assert_eq!(check_bankroll(250.0).unwrap(), 250.0);
        assert!(matches!(check_bankroll(0.0), Err(Error::InvalidInput(_))));
        assert!(matches!(check_bankroll(f64::NAN), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_plans_for_skips_degenerate_splits() {
        let opp = opportunity("Flamengo vs Palmeiras", 2.05);
        assert_eq!(plans_for(&[opp.clone()], 1000.0).len(), 1);
        assert!(plans_for(&[opp], 0.01).is_empty());
    }
}
