//! Built-in lexicon polarity scorer.
//!
//! Averages per-word `(polarity, subjectivity)` entries over the words of a
//! text that appear in the lexicon. An intensifier directly before a word
//! scales its polarity by 1.3; a negator within the two preceding words
//! flips and halves it.

use std::collections::HashMap;
use std::path::Path;

use tracing::debug;

use super::{PolarityScore, PolarityScorer};
use crate::error::Result;

const INTENSITY: f64 = 1.3;
const NEGATION: f64 = -0.5;

static INTENSIFIERS: &[&str] = &[
    "very", "really", "extremely", "highly", "so", "too", "quite", "truly", "super",
];

static NEGATORS: &[&str] = &[
    "not", "no", "never", "nothing", "hardly", "without", "dont", "didnt", "isnt", "wasnt",
];

/// Default word table: `(word, polarity, subjectivity)`.
static DEFAULT_LEXICON: &[(&str, f64, f64)] = &[
    // rating labels
    ("excellent", 1.0, 1.0),
    ("good", 0.7, 0.6),
    ("average", 0.0, 0.4),
    ("fair", 0.2, 0.6),
    ("poor", -0.4, 0.6),
    ("bad", -0.7, 0.67),
    ("terrible", -1.0, 1.0),
    // praise
    ("great", 0.8, 0.75),
    ("best", 1.0, 0.3),
    ("outstanding", 0.5, 0.5),
    ("amazing", 0.6, 0.9),
    ("awesome", 1.0, 1.0),
    ("wonderful", 1.0, 1.0),
    ("helpful", 0.5, 0.5),
    ("clear", 0.1, 0.38),
    ("engaging", 0.5, 0.6),
    ("interesting", 0.5, 0.5),
    ("knowledgeable", 0.5, 0.6),
    ("organized", 0.3, 0.4),
    ("useful", 0.3, 0.1),
    ("easy", 0.43, 0.83),
    ("nice", 0.6, 1.0),
    ("love", 0.5, 0.6),
    ("loved", 0.7, 0.8),
    ("enjoyed", 0.4, 0.5),
    ("recommend", 0.3, 0.4),
    ("satisfied", 0.5, 1.0),
    ("supportive", 0.4, 0.5),
    ("decent", 0.17, 0.67),
    ("okay", 0.05, 0.5),
    ("ok", 0.05, 0.5),
    // criticism
    ("boring", -1.0, 1.0),
    ("confusing", -0.3, 0.7),
    ("difficult", -0.5, 1.0),
    ("hard", -0.29, 0.54),
    ("outdated", -0.3, 0.5),
    ("inadequate", -0.6, 0.7),
    ("worst", -1.0, 1.0),
    ("awful", -1.0, 1.0),
    ("horrible", -1.0, 1.0),
    ("useless", -0.5, 0.2),
    ("unclear", -0.3, 0.5),
    ("disorganized", -0.4, 0.6),
    ("unhelpful", -0.5, 0.6),
    ("lacking", -0.3, 0.4),
    ("lack", -0.3, 0.4),
    ("slow", -0.3, 0.4),
    ("rude", -0.6, 0.8),
    ("late", -0.3, 0.6),
    ("disappointed", -0.75, 0.75),
    ("disappointing", -0.6, 0.7),
    ("hate", -0.8, 0.9),
];

/// Lexicon-backed [`PolarityScorer`].
#[derive(Debug, Clone)]
pub struct LexiconScorer {
    entries: HashMap<String, (f64, f64)>,
}

impl Default for LexiconScorer {
    fn default() -> Self {
        let entries = DEFAULT_LEXICON
            .iter()
            .map(|&(word, polarity, subjectivity)| (word.to_string(), (polarity, subjectivity)))
            .collect();
        Self { entries }
    }
}

impl LexiconScorer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges word entries from a JSON file over the default table.
    ///
    /// The file is a plain object of `[polarity, subjectivity]` pairs:
    /// ```json
    /// {
    ///   "brilliant": [0.9, 1.0],
    ///   "average": [-0.15, 0.4]
    /// }
    /// ```
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let overrides: HashMap<String, (f64, f64)> = serde_json::from_str(&content)?;
        debug!(
            path = %path.as_ref().display(),
            entries = overrides.len(),
            "Loaded lexicon overrides"
        );
        Ok(Self::default().with_entries(overrides))
    }

    /// Adds or replaces entries; words are lower-cased.
    pub fn with_entries(mut self, entries: impl IntoIterator<Item = (String, (f64, f64))>) -> Self {
        for (word, score) in entries {
            self.entries.insert(word.to_lowercase(), score);
        }
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl PolarityScorer for LexiconScorer {
    fn score(&self, text: &str) -> Result<PolarityScore> {
        let lowered = text.to_lowercase();
        let words: Vec<&str> = lowered.split_whitespace().collect();

        let mut polarities = Vec::new();
        let mut subjectivities = Vec::new();

        for (i, word) in words.iter().enumerate() {
            let Some(&(base, subjectivity)) = self.entries.get(*word) else {
                continue;
            };
            let mut polarity = base;

            if i >= 1 && INTENSIFIERS.contains(&words[i - 1]) {
                polarity = (polarity * INTENSITY).clamp(-1.0, 1.0);
            }

            let negated = (1..=2).any(|k| i >= k && NEGATORS.contains(&words[i - k]));
            if negated {
                polarity *= NEGATION;
            }

            polarities.push(polarity);
            subjectivities.push(subjectivity);
        }

        if polarities.is_empty() {
            return Ok(PolarityScore {
                polarity: 0.0,
                subjectivity: 0.0,
            });
        }

        let n = polarities.len() as f64;
        Ok(PolarityScore {
            polarity: (polarities.iter().sum::<f64>() / n).clamp(-1.0, 1.0),
            subjectivity: (subjectivities.iter().sum::<f64>() / n).clamp(0.0, 1.0),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs;

    #[test]
    fn test_unknown_words_score_zero() {
        let score = LexiconScorer::new().score("the lab is on monday").unwrap();
        assert_eq!(score.polarity, 0.0);
        assert_eq!(score.subjectivity, 0.0);
    }

    #[test]
    fn test_positive_and_negative_words() {
        let scorer = LexiconScorer::new();
        assert!(scorer.score("great class").unwrap().polarity > 0.1);
        assert!(scorer.score("boring lectures").unwrap().polarity < -0.1);
    }

    #[test]
    fn test_average_labels_are_neutral() {
        let score = LexiconScorer::new().score("average average").unwrap();
        assert_eq!(score.polarity, 0.0);
    }

    #[test]
    fn test_intensifier_and_negation() {
        let scorer = LexiconScorer::new();
        let plain = scorer.score("good").unwrap().polarity;
        let very = scorer.score("very good").unwrap().polarity;
        let negated = scorer.score("not good").unwrap().polarity;

        assert!(very > plain);
        assert!((negated - plain * NEGATION).abs() < 1e-9);
    }

    #[test]
    fn test_load_merges_overrides() {
        let path = format!("{}/feedback_rater_test_lexicon.json", env::temp_dir().display());
        fs::write(&path, r#"{ "Brilliant": [0.9, 1.0], "average": [-0.15, 0.4] }"#).unwrap();

        let scorer = LexiconScorer::load(&path).unwrap();
        assert_eq!(scorer.len(), LexiconScorer::new().len() + 1);
        assert_eq!(scorer.score("brilliant").unwrap().polarity, 0.9);
        assert_eq!(scorer.score("average").unwrap().polarity, -0.15);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_rejects_malformed_file() {
        let path = format!("{}/feedback_rater_test_bad_lexicon.json", env::temp_dir().display());
        fs::write(&path, r#"{ "brilliant": "very" }"#).unwrap();

        assert!(LexiconScorer::load(&path).is_err());

        fs::remove_file(&path).unwrap();
    }
}
