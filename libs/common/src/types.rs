//! Primitive value types shared across the scanner.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Error;

// ── Odds ──────────────────────────────────────────────────────────────

/// Decimal (European) odds. Always finite and strictly greater than 1.0.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct DecimalOdds(f64);

impl DecimalOdds {
    pub fn new(value: f64) -> Result<Self, Error> {
        if !value.is_finite() || value <= 1.0 {
            return Err(Error::InvalidInput(format!(
                "decimal odds must be greater than 1.0, got {}",
                value
            )));
        }
        Ok(Self(value))
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// Implied probability `1 / odds`.
    pub fn implied_probability(self) -> f64 {
        1.0 / self.0
    }
}

impl TryFrom<f64> for DecimalOdds {
    type Error = Error;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DecimalOdds> for f64 {
    fn from(odds: DecimalOdds) -> Self {
        odds.0
    }
}

impl fmt::Display for DecimalOdds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

// ── Totals line ───────────────────────────────────────────────────────

/// Goal line of a totals market (e.g. 2.5).
///
/// Feeds write it either as a number or as a numeric string ("2.5").
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGoalLine", into = "f64")]
pub struct GoalLine(f64);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawGoalLine {
    Number(f64),
    Text(String),
}

impl GoalLine {
    pub fn new(value: f64) -> Result<Self, Error> {
        if !value.is_finite() || value < 0.0 {
            return Err(Error::InvalidInput(format!(
                "goal line must be a non-negative number, got {}",
                value
            )));
        }
        Ok(Self(value))
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl TryFrom<RawGoalLine> for GoalLine {
    type Error = Error;

    fn try_from(raw: RawGoalLine) -> Result<Self, Self::Error> {
        match raw {
            RawGoalLine::Number(value) => Self::new(value),
            RawGoalLine::Text(text) => {
                let value = text.trim().parse::<f64>().map_err(|_| {
                    Error::InvalidInput(format!("goal line is not a number: {:?}", text))
                })?;
                Self::new(value)
            }
        }
    }
}

impl From<GoalLine> for f64 {
    fn from(line: GoalLine) -> Self {
        line.0
    }
}

impl fmt::Display for GoalLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
