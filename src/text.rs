//! Text normalization for keyword extraction and pre-scoring cleanup.
//!
//! [`clean_text`] only lower-cases and strips noise; it is what the polarity
//! scorer sees. [`normalize`] additionally drops stopwords and short words
//! and is used for keyword counting only.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::review::SENTINEL;

static URL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"http\S+|www\S+|https\S+").expect("valid url regex"));
static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\S+@\S+").expect("valid email regex"));
static NON_ALPHA_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-zA-Z\s]").expect("valid non-alpha regex"));
static WHITESPACE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

const STOPWORD_LIST: &[&str] = &[
    // pronouns
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "your", "yours",
    "yourself", "yourselves", "he", "him", "his", "himself", "she", "her", "hers", "herself",
    "it", "its", "itself", "they", "them", "their", "theirs", "themselves", "what", "which",
    "who", "whom", "this", "that", "these", "those",
    // auxiliaries
    "am", "is", "are", "was", "were", "be", "been", "being", "have", "has", "had", "having",
    "do", "does", "did", "doing", "can", "will", "would", "should", "could", "may",
    "might", "must",
    // articles and conjunctions
    "a", "an", "the", "and", "but", "if", "or", "because", "as", "until", "while", "so",
    "than", "nor",
    // prepositions
    "of", "at", "by", "for", "with", "about", "against", "between", "into", "through",
    "during", "before", "after", "above", "below", "to", "from", "up", "down", "in", "out",
    "on", "off", "over", "under", "within", "without",
    // adverbs and determiners
    "again", "further", "then", "once", "here", "there", "when", "where", "why", "how",
    "all", "any", "both", "each", "few", "more", "most", "other", "some", "such", "only",
    "own", "same", "too", "very", "just", "now", "also",
];

static STOPWORDS: Lazy<HashSet<&'static str>> =
    Lazy::new(|| STOPWORD_LIST.iter().copied().collect());

/// Returns true if `word` is in the fixed stopword set.
pub fn is_stopword(word: &str) -> bool {
    STOPWORDS.contains(word)
}

/// Lower-cases `raw`, strips URLs, emails, digits and punctuation, and
/// collapses whitespace. Empty and sentinel input yield `""`.
pub fn clean_text(raw: &str) -> String {
    if raw.is_empty() || raw == SENTINEL {
        return String::new();
    }

    let text = raw.to_lowercase();
    let text = URL_PATTERN.replace_all(&text, "");
    let text = EMAIL_PATTERN.replace_all(&text, "");
    let mut text = NON_ALPHA_PATTERN.replace_all(&text, "").into_owned();
    // stripping punctuation can join letters into a new URL prefix
    while URL_PATTERN.is_match(&text) {
        text = URL_PATTERN.replace_all(&text, "").into_owned();
    }
    let text = WHITESPACE_PATTERN.replace_all(&text, " ");

    text.trim().to_string()
}

/// Full normalization: [`clean_text`] followed by stopword and short-word
/// removal. Idempotent, and never yields the sentinel.
pub fn normalize(raw: &str) -> String {
    let cleaned = clean_text(raw);

    let normalized = cleaned
        .split(' ')
        .filter(|word| keep_word(word))
        .collect::<Vec<_>>()
        .join(" ");

    if normalized == SENTINEL {
        String::new()
    } else {
        normalized
    }
}

/// Same as [`normalize`], treating a missing value as empty.
pub fn normalize_opt(raw: Option<&str>) -> String {
    raw.map(normalize).unwrap_or_default()
}

fn keep_word(word: &str) -> bool {
    word.len() > 2 && !is_stopword(word)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_and_sentinel_normalize_to_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize_opt(None), "");
        assert_eq!(normalize("submitted"), "");
        assert_eq!(normalize("Submitted!"), "");
    }

    #[test]
    fn test_normalize_pipeline() {
        let raw = "The Professor's labs were GREAT!!! See https://example.com or mail me@uni.edu 2024";
        assert_eq!(normalize(raw), "professors labs great see mail");
    }

    #[test]
    fn test_normalize_drops_short_words_and_stopwords() {
        assert_eq!(normalize("it is ok to go by the lab"), "lab");
        assert_eq!(normalize("Very Good"), "good");
    }

    #[test]
    fn test_normalize_collapses_whitespace() {
        assert_eq!(normalize("  clear \t\n explanations   always "), "clear explanations always");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let inputs = [
            "Great course content, learned a lot",
            "ht.tpx works www.site.org?",
            "the submitted",
            "Poor lab facilities and support!!",
            "   ",
            "ÜBER cool café",
            "fooh.ttpbar",
            "see w.w.w.example and h-t-t-p-s-site",
        ];
        for input in inputs {
            let once = normalize(input);
            assert_eq!(normalize(&once), once, "input: {input:?}");
        }
    }

    #[test]
    fn test_url_prefix_joined_by_punctuation_is_stripped() {
        assert_eq!(clean_text("fooh.ttpbar"), "foo");
        assert_eq!(normalize("fooh.ttpbar"), "foo");
        assert_eq!(normalize("great w.w.wsite labs"), "great labs");
    }

    #[test]
    fn test_clean_text_keeps_stopwords() {
        assert_eq!(clean_text("Not a GOOD lab, 10/10?"), "not a good lab");
        assert_eq!(clean_text("submitted"), "");
    }

    #[test]
    fn test_stopword_set_size() {
        assert!(STOPWORDS.len() >= 110 && STOPWORDS.len() <= 135);
        assert!(is_stopword("the"));
        assert!(!is_stopword("teaching"));
    }
}
