//! Stake allocation — splits a bankroll across the two legs of a surebet so
//! both outcomes pay the same, and reports the resulting profit.

use common::{DecimalOdds, Error};
use serde::{Deserialize, Serialize};

/// Two-way split of a bankroll, rounded to cents.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StakeAllocation {
    pub stake_a: f64,
    pub stake_b: f64,
}

impl StakeAllocation {
    pub fn total(&self) -> f64 {
        self.stake_a + self.stake_b
    }
}

/// Profit of a stake split under each outcome.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExpectedProfit {
    pub profit_if_a: f64,
    pub profit_if_b: f64,
    pub average_profit: f64,
}

/// Round to 2 decimal places (currency).
pub fn round_currency(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Split `bankroll` so that `stake_a * odd_a == stake_b * odd_b`.
///
/// `stake_a = bankroll / (1 + odd_a / odd_b)`, `stake_b = bankroll - stake_a`,
/// both rounded to cents. The rounding can leave the two payouts a fraction
/// of a cent apart.
pub fn allocate(bankroll: f64, odd_a: f64, odd_b: f64) -> Result<StakeAllocation, Error> {
    if !bankroll.is_finite() || bankroll <= 0.0 {
        return Err(Error::InvalidInput(format!(
            "bankroll must be positive, got {}",
            bankroll
        )));
    }
    let odd_a = DecimalOdds::new(odd_a)?.value();
    let odd_b = DecimalOdds::new(odd_b)?.value();

    let raw_a = bankroll / (1.0 + odd_a / odd_b);
    let raw_b = bankroll - raw_a;
    let stake_a = round_currency(raw_a);
    let stake_b = round_currency(raw_b);

    if stake_a <= 0.0 || stake_b <= 0.0 {
        return Err(Error::DegenerateAllocation { stake_a, stake_b });
    }

    Ok(StakeAllocation { stake_a, stake_b })
}

/// Profit under each outcome for a given stake split.
///
/// `profit_if_x = stake_x * odd_x - (stake_a + stake_b)`.
pub fn expected_profit(stake_a: f64, odd_a: f64, stake_b: f64, odd_b: f64) -> ExpectedProfit {
    let total = stake_a + stake_b;
    let profit_if_a = stake_a * odd_a - total;
    let profit_if_b = stake_b * odd_b - total;
    ExpectedProfit {
        profit_if_a,
        profit_if_b,
        average_profit: (profit_if_a + profit_if_b) / 2.0,
    }
}

/// Profit as a percentage of the bankroll that produced it.
pub fn roi_percentage(profit: f64, bankroll: f64) -> Result<f64, Error> {
    if !bankroll.is_finite() || bankroll <= 0.0 {
        return Err(Error::InvalidInput(format!(
            "bankroll must be positive, got {}",
            bankroll
        )));
    }
    Ok(profit / bankroll * 100.0)
}
