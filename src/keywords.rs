//! Frequency-ranked keywords over normalized review text.

use std::collections::HashMap;

use crate::review::ReviewRecord;
use crate::text::normalize;

/// Top-N used for the overview statistics.
pub const DEFAULT_TOP_N: usize = 15;
/// Top-N used for the dedicated themes view.
pub const THEMES_TOP_N: usize = 20;

/// Joins `corpus` with spaces, normalizes it once, and returns the `top_n`
/// most frequent words. Ties keep first-encountered order.
pub fn extract_keywords<I, S>(corpus: I, top_n: usize) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let joined = corpus
        .into_iter()
        .map(|text| text.as_ref().to_string())
        .collect::<Vec<_>>()
        .join(" ");
    let normalized = normalize(&joined);

    let mut counts: Vec<(String, usize)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for word in normalized.split_whitespace() {
        match index.get(word) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(word, counts.len());
                counts.push((word.to_string(), 1));
            }
        }
    }

    // stable: equal counts stay in first-seen order
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.truncate(top_n);
    counts
}

/// Text used for theme extraction: every written comment plus every
/// non-empty rating label, record by record.
pub fn theme_corpus(records: &[ReviewRecord]) -> Vec<&str> {
    let mut corpus = Vec::new();

    for record in records {
        if let Some(comment) = record.written_comment() {
            corpus.push(comment);
        }
        corpus.extend(record.rating_labels());
    }

    corpus
}

/// Most frequent words across the comments and rating labels of `records`.
pub fn common_themes(records: &[ReviewRecord], top_n: usize) -> Vec<(String, usize)> {
    let corpus = theme_corpus(records);
    if corpus.is_empty() {
        return Vec::new();
    }
    extract_keywords(corpus, top_n)
}
