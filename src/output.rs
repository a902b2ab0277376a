//! Output formatting and persistence for review analytics.
//!
//! Supports pretty-printing, JSON serialization to logs or files, and CSV
//! export of processed reviews.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info};

use crate::analyzers::types::ProcessedReview;
use crate::review::Category;
use csv::WriterBuilder;
use std::fmt::Debug;
use std::fs::{self, File};
use std::path::Path;

/// Logs a value using Rust's debug pretty-print format.
pub fn print_pretty(value: &impl Debug) {
    debug!("{:#?}", value);
}

/// Logs a value as pretty-printed JSON.
pub fn print_json(value: &impl Serialize) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Writes a value as pretty-printed JSON to `path`, creating parent
/// directories as needed.
pub fn write_json(path: &Path, value: &impl Serialize) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
    }

    let body = serde_json::to_vec_pretty(value)?;
    fs::write(path, body).with_context(|| format!("writing {}", path.display()))?;
    info!(path = %path.display(), "JSON written");
    Ok(())
}

/// Column names of the processed-review export.
pub fn processed_headers() -> Vec<String> {
    let mut headers: Vec<String> = [
        "id",
        "student_id",
        "regulation_id",
        "semester_id",
        "subject_id",
        "created_at",
    ]
    .into_iter()
    .map(String::from)
    .collect();

    for category in Category::ALL {
        headers.push(category.to_string());
        headers.push(format!("{category}_rating"));
        headers.push(format!("{category}_sentiment"));
    }

    headers.extend(
        [
            "comment",
            "comment_sentiment",
            "comment_polarity",
            "comment_subjectivity",
            "cleaned_comment",
        ]
        .into_iter()
        .map(String::from),
    );
    headers
}

fn processed_row(review: &ProcessedReview) -> Vec<String> {
    fn id(value: Option<u64>) -> String {
        value.map(|v| v.to_string()).unwrap_or_default()
    }

    let mut row = vec![
        review.id.to_string(),
        id(review.student_id),
        id(review.regulation_id),
        id(review.semester_id),
        id(review.subject_id),
        review.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
    ];

    for assessment in &review.ratings {
        row.push(assessment.label.clone());
        row.push(assessment.rating.to_string());
        row.push(assessment.sentiment.to_string());
    }

    row.push(review.comment.clone());
    row.push(review.comment_sentiment.label.to_string());
    row.push(review.comment_sentiment.polarity.to_string());
    row.push(review.comment_sentiment.subjectivity.to_string());
    row.push(review.cleaned_comment.clone());
    row
}

/// Writes processed reviews to a CSV file at `path`, replacing it.
pub fn write_processed_csv(path: &str, reviews: &[ProcessedReview]) -> Result<()> {
    debug!(path, rows = reviews.len(), "Writing processed reviews");

    let file = File::create(path).with_context(|| format!("creating {path}"))?;
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);

    writer.write_record(processed_headers())?;
    for review in reviews {
        writer.write_record(processed_row(review))?;
    }
    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::aggregate::ReviewAggregator;
    use crate::review::{ReviewRecord, parse_timestamp};
    use crate::sentiment::LexiconScorer;
    use std::env;

    fn temp_path(name: &str) -> String {
        format!("{}/{}", env::temp_dir().display(), name)
    }

    #[test]
    fn test_print_pretty_does_not_panic() {
        print_pretty(&sample_review());
    }

    #[test]
    fn test_print_json_does_not_panic() {
        print_json(&sample_review()).unwrap();
    }

    #[test]
    fn test_write_json_creates_parent_dirs() {
        let dir = temp_path("feedback_rater_test_json");
        let _ = fs::remove_dir_all(&dir);
        let path = Path::new(&dir).join("nested/report.json");

        write_json(&path, &sample_review()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed["id"], 1);
        assert_eq!(parsed["comment_sentiment"]["label"], "happy");

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_headers_match_row_width() {
        assert_eq!(processed_headers().len(), 6 + 6 * 3 + 5);
        assert_eq!(processed_row(&sample_review()).len(), processed_headers().len());
    }

    #[test]
    fn test_write_processed_csv() {
        let path = temp_path("feedback_rater_test_processed.csv");
        let _ = fs::remove_file(&path);

        write_processed_csv(&path, &[sample_review(), sample_review()]).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("id,student_id"));
        assert!(lines[0].contains("teaching_rating"));
        assert!(lines[1].contains("Excellent,5,happy"));

        fs::remove_file(&path).unwrap();
    }

    // Helper functions for tests
    fn sample_review() -> ProcessedReview {
        let record = ReviewRecord::new(1, parse_timestamp("2024-01-01 09:00:00").unwrap())
            .with_rating(Category::Teaching, "Excellent")
            .with_comment("Great labs");
        ReviewAggregator::new(LexiconScorer::new()).process_review(&record)
    }
}
