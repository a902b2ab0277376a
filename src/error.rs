use thiserror::Error;

/// Errors surfaced by the analytics library.
///
/// Per-record problems (empty labels, unparseable ratings, odd text) are
/// never reported here; they are defaulted or skipped where they occur.
#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("polarity scorer failed: {0}")]
    Scorer(String),
    #[error("unknown rating category '{0}'")]
    UnknownCategory(String),
    #[error("unknown group key '{0}' (expected semester, subject, regulation or student)")]
    UnknownGroupKey(String),
    #[error("invalid lexicon: {0}")]
    Lexicon(#[from] serde_json::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AnalyticsError>;
