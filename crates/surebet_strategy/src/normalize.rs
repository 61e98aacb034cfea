//! Event and outcome-label normalization.
//!
//! Bookmakers format the same fixture differently ("Flamengo x Palmeiras",
//! "FLAMENGO vs Palmeiras"). These helpers produce canonical strings so
//! records from different sources compare equal.

/// Tokens accepted as the home/away separator.
const SEPARATORS: &[&str] = &["x", "vs", "vs.", "v"];

/// Canonical separator used in normalized event names.
const CANONICAL_SEPARATOR: &str = "vs";

/// Normalize an event name to `"<home> vs <away>"`.
///
/// Rules applied:
/// 1. Lowercase and trim
/// 2. Split on the first standalone separator token (`x`, `vs`, `vs.`, `v`)
/// 3. Collapse whitespace on both sides
///
/// Home/away order is kept. A name without a separator comes back only
/// lower-cased and trimmed.
///
/// ```
/// use surebet_strategy::normalize::normalize;
///
/// assert_eq!(normalize("Flamengo x Palmeiras"), normalize(" flamengo VS palmeiras "));
/// assert_eq!(normalize("Flamengo x Palmeiras"), "flamengo vs palmeiras");
/// ```
pub fn normalize(name: &str) -> String {
    let lowered = name.trim().to_lowercase();
    let tokens: Vec<&str> = lowered.split_whitespace().collect();

    let split_at = tokens
        .iter()
        .enumerate()
        .position(|(i, token)| i > 0 && i + 1 < tokens.len() && SEPARATORS.contains(token));

    match split_at {
        Some(i) => format!(
            "{} {} {}",
            tokens[..i].join(" "),
            CANONICAL_SEPARATOR,
            tokens[i + 1..].join(" ")
        ),
        None => lowered,
    }
}

/// Normalize an outcome label into a comparison key.
///
/// Trims, lower-cases, folds common Latin accents and collapses
/// whitespace, so "Grêmio" and " gremio" produce the same key.
pub fn normalize_label(label: &str) -> String {
    label
        .to_lowercase()
        .chars()
        .map(fold_accent)
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn fold_accent(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ã' | 'ä' | 'å' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ç' => 'c',
        'ñ' => 'n',
        other => other,
    }
}
