//! Data types produced by the aggregation pipeline.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::review::Category;
use crate::sentiment::{SentimentLabel, SentimentResult};

/// Average ordinal rating per category, rounded to 2 decimals.
pub type CategoryAverages = BTreeMap<Category, f64>;

/// Count of each rating value `1..=5`; every key is always present.
pub type RatingHistogram = BTreeMap<u8, usize>;

/// Counts of records per sentiment bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SentimentCounts {
    pub happy: usize,
    pub neutral: usize,
    pub bad: usize,
}

impl SentimentCounts {
    pub fn record(&mut self, label: SentimentLabel) {
        match label {
            SentimentLabel::Happy => self.happy += 1,
            SentimentLabel::Neutral => self.neutral += 1,
            SentimentLabel::Bad => self.bad += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.happy + self.neutral + self.bad
    }
}

/// Sentiment of all records created on one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub counts: SentimentCounts,
    /// Rounded to 3 decimals.
    pub average_polarity: f64,
}

/// Summary of the records sharing one semester/subject/regulation/student id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupBreakdown {
    pub group_by: &'static str,
    pub key: u64,
    pub total_reviews: usize,
    pub average_ratings: CategoryAverages,
    pub sentiment_distribution: SentimentCounts,
    pub overall_score: f64,
}

/// Complete statistics for a set of reviews.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateStatistics {
    pub total_reviews: usize,
    pub average_ratings: CategoryAverages,
    pub rating_distributions: BTreeMap<Category, RatingHistogram>,
    pub sentiment_distribution: SentimentCounts,
    pub overall_satisfaction: f64,
    pub common_themes: Vec<(String, usize)>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_series: Option<Vec<TrendPoint>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub groups: Option<Vec<GroupBreakdown>>,
}

/// Sentiment distribution together with the number of reviews it covers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverallSentiment {
    pub sentiment_distribution: SentimentCounts,
    pub total_reviews: usize,
}

/// One category of a processed review.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryAssessment {
    pub category: Category,
    pub label: String,
    /// `0` when the label is empty or not recognized.
    pub rating: u8,
    pub sentiment: SentimentLabel,
}

/// A review with every field interpreted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessedReview {
    pub id: u64,
    pub student_id: Option<u64>,
    pub regulation_id: Option<u64>,
    pub semester_id: Option<u64>,
    pub subject_id: Option<u64>,
    pub created_at: NaiveDateTime,
    pub ratings: Vec<CategoryAssessment>,
    pub comment: String,
    pub comment_sentiment: SentimentResult,
    pub cleaned_comment: String,
}
