//! Arbitrage matcher — pairs quotes from two bookmakers and looks for
//! opposing outcomes whose implied probabilities sum to less than 1.
//!
//! Checks for:
//! 1. Result markets: any two different outcomes (bet on A's team with one
//!    bookmaker, on B's team with the other).
//! 2. Total-goals markets: over with one bookmaker, under with the other,
//!    only when both quote the same line.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::quotes::{Market, OddsQuote, Outcome};

// ── Public Types ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArbitrageOpportunity {
    /// Event name as quoted by bookmaker A.
    pub event: String,
    #[serde(flatten)]
    pub market: Market,
    pub bookmaker_a: String,
    pub outcome_a: String,
    pub odd_a: f64,
    pub bookmaker_b: String,
    pub outcome_b: String,
    pub odd_b: f64,
    /// Sum of implied probabilities, strictly below 1.
    pub margin: f64,
    /// Guaranteed return on the total stake, in percent.
    pub profit_percentage: f64,
}

impl ArbitrageOpportunity {
    /// Evaluate one outcome pair; `None` unless the pair is arbitrable.
    fn evaluate(
        quote_a: &OddsQuote,
        outcome_a: &Outcome,
        quote_b: &OddsQuote,
        outcome_b: &Outcome,
    ) -> Option<Self> {
        let margin = margin(outcome_a.odds.value(), outcome_b.odds.value());
        if margin >= 1.0 {
            return None;
        }

        Some(Self {
            event: quote_a.event().to_string(),
            market: quote_a.market(),
            bookmaker_a: quote_a.bookmaker().to_string(),
            outcome_a: outcome_a.label.as_str().to_string(),
            odd_a: outcome_a.odds.value(),
            bookmaker_b: quote_b.bookmaker().to_string(),
            outcome_b: outcome_b.label.as_str().to_string(),
            odd_b: outcome_b.odds.value(),
            margin,
            profit_percentage: profit_percentage(margin),
        })
    }
}

impl fmt::Display for ArbitrageOpportunity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}]: {} {} @ {:.2} + {} {} @ {:.2}; margin={:.4} profit={:.2}%",
            self.event,
            self.market,
            self.bookmaker_a,
            self.outcome_a,
            self.odd_a,
            self.bookmaker_b,
            self.outcome_b,
            self.odd_b,
            self.margin,
            self.profit_percentage
        )
    }
}

// ── Arithmetic ────────────────────────────────────────────────────────

/// Sum of implied probabilities `1/odd_a + 1/odd_b`.
pub fn margin(odd_a: f64, odd_b: f64) -> f64 {
    1.0 / odd_a + 1.0 / odd_b
}

/// Guaranteed profit as a percentage of the total stake.
///
/// `(1 - margin) / margin * 100`. Staking `1/odd_i` on each side costs
/// `margin` and pays exactly 1, so this is the return on capital.
pub fn profit_percentage(margin: f64) -> f64 {
    (1.0 - margin) / margin * 100.0
}

// ── Matcher ───────────────────────────────────────────────────────────

/// Whether two outcomes hedge each other within a market.
fn is_opposing(market: Market, a: &Outcome, b: &Outcome) -> bool {
    match market {
        Market::Result => a.label != b.label,
        Market::TotalGoals { .. } => match (a.label.total_side(), b.label.total_side()) {
            (Some(side_a), Some(side_b)) => side_a != side_b,
            _ => false,
        },
    }
}

/// Whether two quotes price the same market (same kind, same line).
fn same_market(a: Market, b: Market) -> bool {
    match (a, b) {
        (Market::Result, Market::Result) => true,
        (Market::TotalGoals { line: line_a }, Market::TotalGoals { line: line_b }) => {
            line_a == line_b
        }
        _ => false,
    }
}

/// Find every arbitrage opportunity between two bookmakers' quotes.
///
/// Quotes are paired when their canonical event names and markets match.
/// Ties are all retained; ranking is left to the caller.
pub fn find_opportunities(
    feed_a: &[OddsQuote],
    feed_b: &[OddsQuote],
) -> Vec<ArbitrageOpportunity> {
    let mut opportunities = Vec::new();

    for quote_a in feed_a {
        for quote_b in feed_b {
            if quote_a.event_key() != quote_b.event_key() {
                continue;
            }
            if !same_market(quote_a.market(), quote_b.market()) {
                continue;
            }
            if quote_a.same_bookmaker(quote_b) {
                debug!(
                    "{}: both quotes from {}, skipping",
                    quote_a.event(),
                    quote_a.bookmaker()
                );
                continue;
            }

            for outcome_a in quote_a.outcomes() {
                for outcome_b in quote_b.outcomes() {
                    if !is_opposing(quote_a.market(), outcome_a, outcome_b) {
                        continue;
                    }
                    if let Some(opp) =
                        ArbitrageOpportunity::evaluate(quote_a, outcome_a, quote_b, outcome_b)
                    {
                        debug!("SUREBET: {}", opp);
                        opportunities.push(opp);
                    }
                }
            }
        }
    }

    opportunities
}
