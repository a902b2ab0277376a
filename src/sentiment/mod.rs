//! Sentiment labelling of review text and ordinal ratings.
//!
//! Polarity comes from a [`PolarityScorer`], an injected capability so the
//! classifier can run against a lexicon engine in production and a fixed
//! table in tests. [`lexicon::LexiconScorer`] is the built-in implementation.

pub mod lexicon;

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::analyzers::utility::round_to;
use crate::error::Result;
use crate::review::SENTINEL;
use crate::text::clean_text;

pub use lexicon::LexiconScorer;

/// Polarity above this is happy.
pub const HAPPY_THRESHOLD: f64 = 0.1;
/// Polarity below this is bad.
pub const BAD_THRESHOLD: f64 = -0.1;

/// Three-way sentiment bucket used by every analytics view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Happy,
    Neutral,
    Bad,
}

impl SentimentLabel {
    pub fn from_polarity(polarity: f64) -> Self {
        if polarity > HAPPY_THRESHOLD {
            SentimentLabel::Happy
        } else if polarity < BAD_THRESHOLD {
            SentimentLabel::Bad
        } else {
            SentimentLabel::Neutral
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::Happy => "happy",
            SentimentLabel::Neutral => "neutral",
            SentimentLabel::Bad => "bad",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw output of a polarity scorer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolarityScore {
    /// In `[-1.0, 1.0]`; positive is favorable.
    pub polarity: f64,
    /// In `[0.0, 1.0]`.
    pub subjectivity: f64,
}

/// Scores free text for polarity and subjectivity.
pub trait PolarityScorer: Send + Sync {
    fn score(&self, text: &str) -> Result<PolarityScore>;
}

impl<S: PolarityScorer + ?Sized> PolarityScorer for &S {
    fn score(&self, text: &str) -> Result<PolarityScore> {
        (**self).score(text)
    }
}

impl<S: PolarityScorer + ?Sized> PolarityScorer for Box<S> {
    fn score(&self, text: &str) -> Result<PolarityScore> {
        (**self).score(text)
    }
}

/// Classification of a piece of text.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SentimentResult {
    pub label: SentimentLabel,
    /// Rounded to 3 decimals.
    pub polarity: f64,
    /// Rounded to 3 decimals.
    pub subjectivity: f64,
}

impl SentimentResult {
    pub fn neutral() -> Self {
        SentimentResult {
            label: SentimentLabel::Neutral,
            polarity: 0.0,
            subjectivity: 0.0,
        }
    }
}

/// Labels text through a [`PolarityScorer`] and ratings by threshold.
pub struct SentimentClassifier<S> {
    scorer: S,
}

impl<S: PolarityScorer> SentimentClassifier<S> {
    pub fn new(scorer: S) -> Self {
        Self { scorer }
    }

    pub fn scorer(&self) -> &S {
        &self.scorer
    }

    /// Classifies `text` after [`clean_text`] (stopwords are kept).
    ///
    /// Empty and sentinel input return a neutral 0.0/0.0 result without
    /// calling the scorer. Scorer errors and non-finite scores also degrade
    /// to neutral.
    pub fn classify_text(&self, text: &str) -> SentimentResult {
        if text.is_empty() || text == SENTINEL {
            return SentimentResult::neutral();
        }

        let cleaned = clean_text(text);
        if cleaned.is_empty() {
            return SentimentResult::neutral();
        }

        let score = match self.scorer.score(&cleaned) {
            Ok(score) => score,
            Err(e) => {
                warn!(error = %e, "Polarity scorer failed, using neutral");
                return SentimentResult::neutral();
            }
        };

        if !score.polarity.is_finite() || !score.subjectivity.is_finite() {
            warn!(
                polarity = score.polarity,
                subjectivity = score.subjectivity,
                "Polarity scorer returned a non-finite score, using neutral"
            );
            return SentimentResult::neutral();
        }

        let polarity = score.polarity.clamp(-1.0, 1.0);
        let subjectivity = score.subjectivity.clamp(0.0, 1.0);

        SentimentResult {
            label: SentimentLabel::from_polarity(polarity),
            polarity: round_to(polarity, 3),
            subjectivity: round_to(subjectivity, 3),
        }
    }
}

/// Labels an ordinal rating: `>= 4` happy, `3` neutral, `<= 2` bad.
pub fn classify_ordinal(rating: i64) -> SentimentLabel {
    match rating {
        r if r >= 4 => SentimentLabel::Happy,
        3 => SentimentLabel::Neutral,
        _ => SentimentLabel::Bad,
    }
}

/// Like [`classify_ordinal`] for a raw value; anything that does not parse
/// as an integer is neutral.
pub fn classify_rating_value(raw: &str) -> SentimentLabel {
    raw.trim()
        .parse::<i64>()
        .map_or(SentimentLabel::Neutral, classify_ordinal)
}
