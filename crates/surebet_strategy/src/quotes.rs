//! Odds quotes and feeds — the normalized records supplied per bookmaker.
//!
//! Every quote is validated on construction (and on deserialization):
//! odds must be > 1.0, the outcome map must be non-empty, and no two
//! labels may fold to the same outcome key.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::hash::{Hash, Hasher};

use common::{DecimalOdds, Error, GoalLine};
use serde::{Deserialize, Serialize};

use crate::normalize::{normalize, normalize_label};

// ── Market ────────────────────────────────────────────────────────────

/// Market kind of a quote.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "market", rename_all = "snake_case")]
pub enum Market {
    /// Match result, outcomes are the competitors.
    #[serde(alias = "1X2", alias = "1x2", alias = "resultado")]
    Result,
    /// Over/under on total goals at a given line.
    #[serde(alias = "totals")]
    TotalGoals { line: GoalLine },
}

impl fmt::Display for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Market::Result => write!(f, "result"),
            Market::TotalGoals { line } => write!(f, "total_goals({})", line),
        }
    }
}

/// Side of a totals outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TotalSide {
    Over,
    Under,
}

// ── Outcome labels ────────────────────────────────────────────────────

/// An outcome label as quoted by a bookmaker, compared by normalized key.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct OutcomeLabel {
    raw: String,
    key: String,
}

impl OutcomeLabel {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into().trim().to_string();
        let key = normalize_label(&raw);
        Self { raw, key }
    }

    /// Label as the bookmaker wrote it (trimmed).
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Normalized comparison key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Over/under side, for totals labels such as "Over 2.5" or "Menos de 2.5".
    pub fn total_side(&self) -> Option<TotalSide> {
        let first = self.key.split_whitespace().next()?;
        match first {
            "over" | "mais" => Some(TotalSide::Over),
            "under" | "menos" => Some(TotalSide::Under),
            _ => None,
        }
    }
}

impl PartialEq for OutcomeLabel {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for OutcomeLabel {}

impl Hash for OutcomeLabel {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl From<String> for OutcomeLabel {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}

impl From<OutcomeLabel> for String {
    fn from(label: OutcomeLabel) -> Self {
        label.raw
    }
}

impl fmt::Display for OutcomeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// One priced outcome of a quote.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub label: OutcomeLabel,
    pub odds: DecimalOdds,
}

// ── Quote ─────────────────────────────────────────────────────────────

/// Odds offered by one bookmaker on one market of one event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "RawOddsQuote", into = "RawOddsQuote")]
pub struct OddsQuote {
    event: String,
    event_key: String,
    market: Market,
    bookmaker: String,
    outcomes: Vec<Outcome>,
}

/// Wire shape of a quote. `bookmaker` may be omitted inside a feed, where
/// the map key supplies it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawOddsQuote {
    pub event: String,
    #[serde(flatten)]
    pub market: Market,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bookmaker: Option<String>,
    pub outcomes: BTreeMap<String, f64>,
}

impl OddsQuote {
    pub fn new<L>(
        event: impl Into<String>,
        market: Market,
        bookmaker: impl Into<String>,
        outcomes: impl IntoIterator<Item = (L, f64)>,
    ) -> Result<Self, Error>
    where
        L: Into<String>,
    {
        let event = event.into().trim().to_string();
        let bookmaker = bookmaker.into().trim().to_string();

        if event.is_empty() {
            return Err(Error::InvalidInput("quote event name is empty".into()));
        }
        if bookmaker.is_empty() {
            return Err(Error::InvalidInput(format!(
                "quote for '{}' has no bookmaker",
                event
            )));
        }

        let mut seen = BTreeSet::new();
        let mut parsed = Vec::new();
        for (label, value) in outcomes {
            let label = OutcomeLabel::new(label);
            if label.key().is_empty() {
                return Err(Error::InvalidInput(format!(
                    "{} / {}: empty outcome label",
                    bookmaker, event
                )));
            }
            let odds = DecimalOdds::new(value).map_err(|e| {
                Error::InvalidInput(format!("{} / {} / {}: {}", bookmaker, event, label, e))
            })?;
            if !seen.insert(label.key().to_string()) {
                return Err(Error::InvalidInput(format!(
                    "{} / {}: duplicate outcome '{}'",
                    bookmaker, event, label
                )));
            }
            parsed.push(Outcome { label, odds });
        }

        if parsed.is_empty() {
            return Err(Error::InvalidInput(format!(
                "{} / {}: quote has no outcomes",
                bookmaker, event
            )));
        }

        Ok(Self {
            event_key: normalize(&event),
            event,
            market,
            bookmaker,
            outcomes: parsed,
        })
    }

    pub fn event(&self) -> &str {
        &self.event
    }

    /// Canonical event identity used for matching.
    pub fn event_key(&self) -> &str {
        &self.event_key
    }

    pub fn market(&self) -> Market {
        self.market
    }

    pub fn bookmaker(&self) -> &str {
        &self.bookmaker
    }

    pub fn outcomes(&self) -> &[Outcome] {
        &self.outcomes
    }

    /// Odds for an outcome label, compared by normalized key.
    pub fn odds_for(&self, label: &str) -> Option<DecimalOdds> {
        let key = normalize_label(label);
        self.outcomes
            .iter()
            .find(|o| o.label.key() == key)
            .map(|o| o.odds)
    }

    /// Whether both quotes come from the same bookmaker (case-insensitive).
    pub fn same_bookmaker(&self, other: &OddsQuote) -> bool {
        self.bookmaker.to_lowercase() == other.bookmaker.to_lowercase()
    }
}

impl TryFrom<RawOddsQuote> for OddsQuote {
    type Error = Error;

    fn try_from(raw: RawOddsQuote) -> Result<Self, Self::Error> {
        let bookmaker = raw.bookmaker.unwrap_or_default();
        OddsQuote::new(raw.event, raw.market, bookmaker, raw.outcomes)
    }
}

impl From<OddsQuote> for RawOddsQuote {
    fn from(quote: OddsQuote) -> Self {
        RawOddsQuote {
            event: quote.event,
            market: quote.market,
            bookmaker: Some(quote.bookmaker),
            outcomes: quote
                .outcomes
                .into_iter()
                .map(|o| (String::from(o.label), o.odds.value()))
                .collect(),
        }
    }
}

// ── Feed ──────────────────────────────────────────────────────────────

/// Quotes grouped by bookmaker, ordered by bookmaker name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, Vec<RawOddsQuote>>",
    into = "BTreeMap<String, Vec<OddsQuote>>"
)]
pub struct OddsFeed {
    books: BTreeMap<String, Vec<OddsQuote>>,
}

impl OddsFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a quote under its own bookmaker.
    pub fn push(&mut self, quote: OddsQuote) {
        self.books
            .entry(quote.bookmaker().to_string())
            .or_default()
            .push(quote);
    }

    /// Bookmaker names in pairing order.
    pub fn bookmakers(&self) -> impl Iterator<Item = &str> {
        self.books.keys().map(String::as_str)
    }

    /// Quotes of one bookmaker (case-insensitive name lookup).
    pub fn quotes(&self, bookmaker: &str) -> Option<&[OddsQuote]> {
        let wanted = bookmaker.trim().to_lowercase();
        self.books
            .iter()
            .find(|(name, _)| name.to_lowercase() == wanted)
            .map(|(_, quotes)| quotes.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[OddsQuote])> {
        self.books
            .iter()
            .map(|(name, quotes)| (name.as_str(), quotes.as_slice()))
    }

    pub fn bookmaker_count(&self) -> usize {
        self.books.len()
    }

    /// Total number of quotes across all bookmakers.
    pub fn quote_count(&self) -> usize {
        self.books.values().map(Vec::len).sum()
    }

    /// Number of distinct events (by canonical identity) across the feed.
    pub fn event_count(&self) -> usize {
        self.books
            .values()
            .flatten()
            .map(OddsQuote::event_key)
            .collect::<BTreeSet<_>>()
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.quote_count() == 0
    }
}

impl TryFrom<BTreeMap<String, Vec<RawOddsQuote>>> for OddsFeed {
    type Error = Error;

    fn try_from(raw: BTreeMap<String, Vec<RawOddsQuote>>) -> Result<Self, Self::Error> {
        let mut books = BTreeMap::new();
        for (name, quotes) in raw {
            let parsed = quotes
                .into_iter()
                .map(|mut q| {
                    if q.bookmaker.is_none() {
                        q.bookmaker = Some(name.clone());
                    }
                    OddsQuote::try_from(q)
                })
                .collect::<Result<Vec<_>, _>>()?;
            books.insert(name, parsed);
        }
        Ok(Self { books })
    }
}

impl From<OddsFeed> for BTreeMap<String, Vec<OddsQuote>> {
    fn from(feed: OddsFeed) -> Self {
        feed.books
    }
}

impl FromIterator<OddsQuote> for OddsFeed {
    fn from_iter<I: IntoIterator<Item = OddsQuote>>(iter: I) -> Self {
        let mut feed = OddsFeed::new();
        for quote in iter {
            feed.push(quote);
        }
        feed
    }
}
