//! Aggregation across bookmakers — runs the matcher over every bookmaker
//! pair, ranks the results and summarizes a scan.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use common::Error;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::arb::{find_opportunities, ArbitrageOpportunity};
use crate::config::ScanConfig;
use crate::quotes::OddsFeed;
use crate::stakes::{allocate, expected_profit, roi_percentage, ExpectedProfit, StakeAllocation};

/// A surebet with its stake split for a given bankroll.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StakePlan {
    pub opportunity: ArbitrageOpportunity,
    pub bankroll: f64,
    pub allocation: StakeAllocation,
    pub expected_profit: ExpectedProfit,
    pub roi_percentage: f64,
}

/// Summary of one scan over a feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanReport {
    pub generated_at: DateTime<Utc>,
    pub bookmakers: usize,
    pub total_events: usize,
    pub total_quotes: usize,
    pub total_surebets: usize,
    pub best_profit_percentage: Option<f64>,
    pub average_profit_percentage: Option<f64>,
    pub top: Vec<ArbitrageOpportunity>,
}

fn by_profit_desc(a: &ArbitrageOpportunity, b: &ArbitrageOpportunity) -> Ordering {
    b.profit_percentage
        .partial_cmp(&a.profit_percentage)
        .unwrap_or(Ordering::Equal)
}

/// Run the matcher over every unordered bookmaker pair of the feed.
///
/// Results below `config.min_profit_pct` are dropped; the rest are sorted
/// by profit, best first. Equal profits keep feed order.
pub fn scan_feed(feed: &OddsFeed, config: &ScanConfig) -> Vec<ArbitrageOpportunity> {
    let books: Vec<_> = feed.iter().collect();
    let mut opportunities = Vec::new();

    for (i, (name_a, quotes_a)) in books.iter().enumerate() {
        for (name_b, quotes_b) in &books[i + 1..] {
            let found = find_opportunities(quotes_a, quotes_b);
            debug!("{} vs {}: {} surebets", name_a, name_b, found.len());
            opportunities.extend(
                found
                    .into_iter()
                    .filter(|opp| opp.profit_percentage >= config.min_profit_pct),
            );
        }
    }

    opportunities.sort_by(by_profit_desc);
    opportunities
}

/// Split `bankroll` across the legs of `opportunity`.
pub fn plan_stakes(opportunity: &ArbitrageOpportunity, bankroll: f64) -> Result<StakePlan, Error> {
    let allocation = allocate(bankroll, opportunity.odd_a, opportunity.odd_b)?;
    let expected_profit = expected_profit(
        allocation.stake_a,
        opportunity.odd_a,
        allocation.stake_b,
        opportunity.odd_b,
    );
    let roi_percentage = roi_percentage(expected_profit.average_profit, bankroll)?;

    Ok(StakePlan {
        opportunity: opportunity.clone(),
        bankroll,
        allocation,
        expected_profit,
        roi_percentage,
    })
}

/// Summarize a scan. `opportunities` is expected ranked, as `scan_feed`
/// returns them.
pub fn build_report(
    feed: &OddsFeed,
    opportunities: &[ArbitrageOpportunity],
    top_n: usize,
    generated_at: DateTime<Utc>,
) -> ScanReport {
    let best_profit_percentage = opportunities
        .iter()
        .map(|opp| opp.profit_percentage)
        .max_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

    let average_profit_percentage = if opportunities.is_empty() {
        None
    } else {
        let total: f64 = opportunities.iter().map(|opp| opp.profit_percentage).sum();
        Some(total / opportunities.len() as f64)
    };

    ScanReport {
        generated_at,
        bookmakers: feed.bookmaker_count(),
        total_events: feed.event_count(),
        total_quotes: feed.quote_count(),
        total_surebets: opportunities.len(),
        best_profit_percentage,
        average_profit_percentage,
        top: opportunities.iter().take(top_n).cloned().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quotes::{Market, OddsQuote};

    fn quote(event: &str, bookmaker: &str, outcomes: &[(&str, f64)]) -> OddsQuote {
        OddsQuote::new(
            event,
            Market::Result,
            bookmaker,
            outcomes.iter().map(|(l, o)| (*l, *o)),
        )
        .unwrap()
    }

    fn three_book_feed() -> OddsFeed {
        vec![
            quote("Flamengo x Palmeiras", "Bet365", &[("Flamengo", 2.10), ("Palmeiras", 1.85)]),
            quote("Flamengo vs Palmeiras", "Betano", &[("Flamengo", 1.95), ("Palmeiras", 2.05)]),
            quote("Flamengo x Palmeiras", "Superbet", &[("Flamengo", 1.90), ("Palmeiras", 2.25)]),
            quote("Santos x Corinthians", "Bet365", &[("Santos", 2.60), ("Corinthians", 1.55)]),
            quote("Santos x Corinthians", "Superbet", &[("Santos", 2.50), ("Corinthians", 1.70)]),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_scan_covers_every_pair_and_ranks() {
        let feed = three_book_feed();
        let opps = scan_feed(&feed, &ScanConfig::default());

        // Flamengo on all three pairs, Santos on Bet365/Superbet only.
        assert_eq!(opps.len(), 4, "{:#?}", opps);
        assert!(opps
            .windows(2)
            .all(|w| w[0].profit_percentage >= w[1].profit_percentage));

        let best = &opps[0];
        assert_eq!(best.bookmaker_a, "Bet365");
        assert_eq!(best.outcome_a, "Flamengo");
        assert_eq!(best.bookmaker_b, "Superbet");
        assert_eq!(best.outcome_b, "Palmeiras");
    }

    #[test]
    fn test_scan_applies_min_profit() {
        let feed = three_book_feed();
        let config = ScanConfig {
            min_profit_pct: 5.0,
            ..ScanConfig::default()
        };
        let opps = scan_feed(&feed, &config);
        assert!(opps.iter().all(|o| o.profit_percentage >= 5.0));
        assert_eq!(opps.len(), 1);
    }

    #[test]
    fn test_scan_of_single_bookmaker_is_empty() {
        let feed: OddsFeed = vec![quote("Flamengo x Palmeiras", "Bet365", &[("Flamengo", 3.0)])]
            .into_iter()
            .collect();
        assert!(scan_feed(&feed, &ScanConfig::default()).is_empty());
    }

    #[test]
    fn test_plan_stakes() {
        let feed = three_book_feed();
        let opps = scan_feed(&feed, &ScanConfig::default());
        let plan = plan_stakes(&opps[0], 1000.0).unwrap();
        assert!((plan.allocation.total() - 1000.0).abs() < 0.011);
        assert!(plan.expected_profit.profit_if_a > 0.0);
        assert!(plan.expected_profit.profit_if_b > 0.0);
        assert!((plan.roi_percentage - plan.opportunity.profit_percentage).abs() < 0.01);

        assert!(plan_stakes(&opps[0], 0.0).is_err());
    }

    #[test]
    fn test_report_statistics() {
        let feed = three_book_feed();
        let opps = scan_feed(&feed, &ScanConfig::default());
        let now = Utc::now();
        let report = build_report(&feed, &opps, 2, now);

        assert_eq!(report.generated_at, now);
        assert_eq!(report.bookmakers, 3);
        assert_eq!(report.total_events, 2);
        assert_eq!(report.total_quotes, 5);
        assert_eq!(report.total_surebets, 4);
        assert_eq!(report.top.len(), 2);
        assert_eq!(report.best_profit_percentage, Some(opps[0].profit_percentage));

        let mean = opps.iter().map(|o| o.profit_percentage).sum::<f64>() / 4.0;
        assert!((report.average_profit_percentage.unwrap() - mean).abs() < 1e-12);
    }

    #[test]
    fn test_report_without_surebets() {
        let feed = OddsFeed::new();
        let report = build_report(&feed, &[], 3, Utc::now());
        assert_eq!(report.total_surebets, 0);
        assert!(report.best_profit_percentage.is_none());
        assert!(report.average_profit_percentage.is_none());
        assert!(report.top.is_empty());
    }
}
