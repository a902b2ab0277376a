//! Mapping between free-text rating labels and the ordinal 1–5 scale.
//!
//! Two lookups exist on purpose and must not be merged:
//!
//! | Label           | [`to_ordinal`] | [`to_ordinal_or_neutral`] |
//! |-----------------|----------------|---------------------------|
//! | known label     | 1–5            | 1–5                       |
//! | empty / missing | 0              | 0                         |
//! | whitespace only | 0              | 0                         |
//! | unknown text    | 0              | 3                         |
//!
//! Labels are trimmed before lookup, so a whitespace-only label counts as
//! missing on both paths rather than as an unknown "Average".
//!
//! Averages use [`to_ordinal_or_neutral`]; histograms use [`to_ordinal`].
//! Whether an unknown label should count as "Average" is an open product
//! question (see DESIGN.md).

use serde::{Deserialize, Serialize};

/// Ordinal used for unrecognized labels on the averaging path.
pub const NEUTRAL_ORDINAL: u8 = 3;

/// Accepted labels, lower-case, and the ordinal each maps to.
static RATING_LABELS: &[(&str, u8)] = &[
    ("excellent", 5),
    ("very good", 4),
    ("good", 4),
    ("average", 3),
    ("fair", 3),
    ("poor", 2),
    ("bad", 2),
    ("very bad", 1),
    ("terrible", 1),
];

/// A recognized rating value in `1..=5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct RatingCode(u8);

impl RatingCode {
    pub fn new(value: u8) -> Option<Self> {
        (1..=5).contains(&value).then_some(RatingCode(value))
    }

    /// Exact, case-insensitive lookup of a label.
    pub fn from_label(label: &str) -> Option<Self> {
        let wanted = label.trim().to_lowercase();
        RATING_LABELS
            .iter()
            .find(|(text, _)| *text == wanted)
            .map(|&(_, value)| RatingCode(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Canonical label for this value.
    pub fn label(self) -> &'static str {
        match self.0 {
            5 => "Excellent",
            4 => "Very Good",
            3 => "Average",
            2 => "Poor",
            _ => "Very Bad",
        }
    }
}

impl TryFrom<u8> for RatingCode {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        RatingCode::new(value).ok_or_else(|| format!("rating {value} outside 1..=5"))
    }
}

impl From<RatingCode> for u8 {
    fn from(code: RatingCode) -> Self {
        code.0
    }
}

/// Strict lookup: `1..=5` for a known label, `0` for empty or unknown text.
pub fn to_ordinal(label: &str) -> u8 {
    RatingCode::from_label(label).map_or(0, RatingCode::value)
}

/// Averaging lookup: `0` for empty text, `1..=5` for a known label, and
/// [`NEUTRAL_ORDINAL`] for any other non-empty text.
pub fn to_ordinal_or_neutral(label: &str) -> u8 {
    if label.trim().is_empty() {
        return 0;
    }
    RatingCode::from_label(label).map_or(NEUTRAL_ORDINAL, RatingCode::value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_labels() {
        assert_eq!(to_ordinal("Excellent"), 5);
        assert_eq!(to_ordinal("poor"), 2);
        assert_eq!(to_ordinal("  VERY good "), 4);
        assert_eq!(to_ordinal("Good"), 4);
        assert_eq!(to_ordinal("Fair"), 3);
        assert_eq!(to_ordinal("terrible"), 1);
    }

    #[test]
    fn test_empty_label_is_absent_on_both_paths() {
        assert_eq!(to_ordinal(""), 0);
        assert_eq!(to_ordinal_or_neutral(""), 0);
        assert_eq!(to_ordinal_or_neutral("   "), 0);
    }

    #[test]
    fn test_unknown_label_defaults_to_neutral_when_averaging() {
        assert_eq!(to_ordinal_or_neutral("xyz"), 3);
    }

    #[test]
    fn test_unknown_label_is_excluded_from_distribution() {
        assert_eq!(to_ordinal("xyz"), 0);
    }

    #[test]
    fn test_no_fuzzy_matching() {
        assert_eq!(to_ordinal("excellent!"), 0);
        assert_eq!(to_ordinal("verygood"), 0);
    }

    #[test]
    fn test_rating_code_bounds_and_labels() {
        assert!(RatingCode::new(0).is_none());
        assert!(RatingCode::new(6).is_none());
        assert_eq!(RatingCode::new(5).unwrap().label(), "Excellent");
        assert_eq!(RatingCode::new(1).unwrap().label(), "Very Bad");
        for value in 1..=5 {
            let code = RatingCode::new(value).unwrap();
            assert_eq!(to_ordinal(code.label()), value);
        }
    }
}
