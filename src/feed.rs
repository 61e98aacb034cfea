//! Odds feed loader — reads the bookmaker → quotes JSON document.

use std::path::Path;

use common::Error;
use surebet_strategy::OddsFeed;
use tracing::{debug, warn};

/// Read and validate the feed at `path`.
pub fn load_feed(path: &Path) -> Result<OddsFeed, Error> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| Error::Feed(format!("Failed to read {}: {}", path.display(), e)))?;
    let feed = parse_feed(&contents)
        .map_err(|e| Error::Feed(format!("{}: {}", path.display(), e)))?;

    if feed.is_empty() {
        warn!("Feed {} has no quotes", path.display());
    }
    debug!(
        "Loaded {} quotes from {} bookmakers ({})",
        feed.quote_count(),
        feed.bookmaker_count(),
        path.display()
    );
    Ok(feed)
}

pub fn parse_feed(contents: &str) -> Result<OddsFeed, Error> {
    serde_json::from_str(contents).map_err(|e| Error::Feed(format!("Invalid feed: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_feed() {
        let feed = parse_feed(
            r#"{
                "Bet365": [{"event": "Flamengo x Palmeiras", "market": "result",
                            "outcomes": {"Flamengo": 2.10, "Palmeiras": 1.85}}],
                "Betano": [{"event": "Flamengo vs Palmeiras", "market": "resultado",
                            "outcomes": {"Flamengo": 1.95, "Palmeiras": 2.05}}]
            }"#,
        )
        .unwrap();
        assert_eq!(feed.bookmaker_count(), 2);
        assert_eq!(feed.quote_count(), 2);
        assert_eq!(feed.event_count(), 1);
    }

    #[test]
    fn test_parse_feed_rejects_bad_odds() {
        let err = parse_feed(
            r#"{"Bet365": [{"event": "A x B", "market": "result",
                            "outcomes": {"A": 0.9, "B": 2.0}}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::Feed(_)));
    }

    #[test]
    fn test_parse_feed_rejects_malformed_json() {
        assert!(matches!(parse_feed("{not json"), Err(Error::Feed(_))));
    }

    #[test]
    fn test_missing_file() {
        let err = load_feed(Path::new("no/such/feed.json")).unwrap_err();
        assert!(matches!(err, Error::Feed(_)));
    }

    #[test]
    fn test_bundled_sample_feed_loads() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("feeds/sample.json");
        let feed = load_feed(&path).unwrap();
        assert!(feed.bookmaker_count() >= 3);
        assert!(!feed.is_empty());
    }
}
