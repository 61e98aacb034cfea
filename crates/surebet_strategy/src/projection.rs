//! Bankroll projection — the constant daily compound rate needed to reach
//! a target, and the day-by-day trajectory it produces.

use common::Error;
use serde::{Deserialize, Serialize};

use crate::stakes::round_currency;

/// One simulated day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectionPoint {
    pub day: u32,
    pub bankroll: f64,
    pub cumulative_profit: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfitProjection {
    pub daily_rate: f64,
    pub horizon_days: u32,
    pub trajectory: Vec<ProjectionPoint>,
}

impl ProfitProjection {
    /// Bankroll on the last simulated day.
    pub fn final_bankroll(&self) -> Option<f64> {
        self.trajectory.last().map(|p| p.bankroll)
    }
}

/// Daily rate `r` with `start * (1 + r)^days == target`.
pub fn required_daily_rate(start: f64, target: f64, days: u32) -> Result<f64, Error> {
    if !start.is_finite() || start <= 0.0 {
        return Err(Error::InvalidProjection(format!(
            "starting bankroll must be positive, got {}",
            start
        )));
    }
    if !target.is_finite() || target <= start {
        return Err(Error::InvalidProjection(format!(
            "target {} must exceed starting bankroll {}",
            target, start
        )));
    }
    if days == 0 {
        return Err(Error::InvalidProjection("horizon must be at least one day".into()));
    }

    Ok((target / start).powf(1.0 / f64::from(days)) - 1.0)
}

/// Compound `start` at `rate` for days `1..=days`.
///
/// Each day's bankroll is computed from `start` directly rather than from
/// the previous rounded value, so rounding never accumulates.
pub fn simulate(start: f64, rate: f64, days: u32) -> Result<Vec<ProjectionPoint>, Error> {
    if !start.is_finite() || start <= 0.0 {
        return Err(Error::InvalidProjection(format!(
            "starting bankroll must be positive, got {}",
            start
        )));
    }
    if !rate.is_finite() || rate <= -1.0 {
        return Err(Error::InvalidProjection(format!(
            "daily rate must be greater than -100%, got {}",
            rate
        )));
    }
    if days == 0 {
        return Err(Error::InvalidProjection("horizon must be at least one day".into()));
    }

    let growth = 1.0 + rate;
    let trajectory = (1..=days)
        .map(|day| {
            let bankroll = round_currency(start * growth.powf(f64::from(day)));
            ProjectionPoint {
                day,
                bankroll,
                cumulative_profit: round_currency(bankroll - start),
            }
        })
        .collect();

    Ok(trajectory)
}

/// Required rate plus the trajectory it produces.
pub fn project(start: f64, target: f64, days: u32) -> Result<ProfitProjection, Error> {
    let daily_rate = required_daily_rate(start, target, days)?;
    let trajectory = simulate(start, daily_rate, days)?;
    Ok(ProfitProjection {
        daily_rate,
        horizon_days: days,
        trajectory,
    })
}
