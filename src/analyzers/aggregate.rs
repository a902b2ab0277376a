use crate::analyzers::types::{
    AggregateStatistics, CategoryAssessment, CategoryAverages, GroupBreakdown, OverallSentiment,
    ProcessedReview, RatingHistogram, SentimentCounts, TrendPoint,
};
use crate::analyzers::utility::{mean, round_to};
use crate::error::Result;
use crate::keywords::common_themes;
use crate::rating::{RatingCode, to_ordinal, to_ordinal_or_neutral};
use crate::review::{Category, GroupKey, ReviewRecord};
use crate::sentiment::{
    PolarityScorer, SentimentClassifier, SentimentLabel, SentimentResult, classify_ordinal,
};
use crate::text::normalize;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use tracing::debug;

/// Average rating per category over `records`, rounded to 2 decimals.
///
/// Empty labels are skipped; unrecognized non-empty labels count as 3. A
/// category with no usable values averages to 0.
pub fn average_ratings(records: &[ReviewRecord]) -> CategoryAverages {
    Category::ALL
        .into_iter()
        .map(|category| {
            let values: Vec<f64> = records
                .iter()
                .map(|r| to_ordinal_or_neutral(r.rating(category)))
                .filter(|&v| v > 0)
                .map(f64::from)
                .collect();

            (category, round_to(mean(&values), 2))
        })
        .collect()
}

/// Histogram of rating values `1..=5` for one category. Empty and
/// unrecognized labels are not counted.
pub fn rating_distribution(records: &[ReviewRecord], category: Category) -> RatingHistogram {
    let mut histogram: RatingHistogram = (1..=5).map(|v| (v, 0)).collect();

    for record in records {
        let value = to_ordinal(record.rating(category));
        if let Some(count) = histogram.get_mut(&value) {
            *count += 1;
        }
    }

    histogram
}

/// [`rating_distribution`] for a category given by name.
///
/// # Errors
///
/// Returns [`crate::error::AnalyticsError::UnknownCategory`] if `category`
/// names none of the six categories.
pub fn rating_distribution_by_name(
    records: &[ReviewRecord],
    category: &str,
) -> Result<RatingHistogram> {
    Ok(rating_distribution(records, category.parse()?))
}

/// Histograms for all six categories.
pub fn rating_distributions(records: &[ReviewRecord]) -> BTreeMap<Category, RatingHistogram> {
    Category::ALL
        .into_iter()
        .map(|category| (category, rating_distribution(records, category)))
        .collect()
}

/// Mean of the category averages (categories without data count as 0),
/// rounded to 2 decimals.
pub fn satisfaction_score(averages: &CategoryAverages) -> f64 {
    let values: Vec<f64> = averages.values().copied().collect();
    round_to(mean(&values), 2)
}

/// Computes every review analytics view over caller-selected records.
///
/// Holds no state besides the classifier; every call is a pure function of
/// its input.
pub struct ReviewAggregator<S> {
    classifier: SentimentClassifier<S>,
}

impl<S: PolarityScorer> ReviewAggregator<S> {
    pub fn new(scorer: S) -> Self {
        Self {
            classifier: SentimentClassifier::new(scorer),
        }
    }

    pub fn classifier(&self) -> &SentimentClassifier<S> {
        &self.classifier
    }

    /// Sentiment of a record's composite text (comment plus rating labels).
    pub fn classify_record(&self, record: &ReviewRecord) -> SentimentResult {
        self.classifier.classify_text(&record.composite_text())
    }

    /// Happy/neutral/bad counts over the composite text of each record.
    #[tracing::instrument(skip_all, fields(records = records.len()))]
    pub fn sentiment_distribution(&self, records: &[ReviewRecord]) -> SentimentCounts {
        let mut counts = SentimentCounts::default();
        for record in records {
            counts.record(self.classify_record(record).label);
        }
        debug!(?counts, "Sentiment distribution computed");
        counts
    }

    /// Sentiment distribution together with the record count.
    pub fn overall_sentiment(&self, records: &[ReviewRecord]) -> OverallSentiment {
        OverallSentiment {
            sentiment_distribution: self.sentiment_distribution(records),
            total_reviews: records.len(),
        }
    }

    /// Per-day sentiment counts and average polarity, dates ascending.
    #[tracing::instrument(skip_all, fields(records = records.len()))]
    pub fn time_series(&self, records: &[ReviewRecord]) -> Vec<TrendPoint> {
        let mut days: BTreeMap<NaiveDate, (SentimentCounts, f64)> = BTreeMap::new();

        for record in records {
            let result = self.classify_record(record);
            let entry = days.entry(record.date()).or_default();
            entry.0.record(result.label);
            entry.1 += result.polarity;
        }

        days.into_iter()
            .map(|(date, (counts, polarity_sum))| {
                let total = counts.total();
                let average_polarity = if total == 0 {
                    0.0
                } else {
                    round_to(polarity_sum / total as f64, 3)
                };
                TrendPoint {
                    date,
                    counts,
                    average_polarity,
                }
            })
            .collect()
    }

    /// Averages, histograms, sentiment counts, satisfaction and the
    /// `top_n` most common themes.
    #[tracing::instrument(skip(self, records), fields(records = records.len()))]
    pub fn overall_statistics(
        &self,
        records: &[ReviewRecord],
        top_n: usize,
    ) -> AggregateStatistics {
        let average_ratings = average_ratings(records);
        let overall_satisfaction = satisfaction_score(&average_ratings);

        AggregateStatistics {
            total_reviews: records.len(),
            rating_distributions: rating_distributions(records),
            sentiment_distribution: self.sentiment_distribution(records),
            overall_satisfaction,
            common_themes: common_themes(records, top_n),
            average_ratings,
            time_series: None,
            groups: None,
        }
    }

    /// One summary per distinct `key` value, ordered by key. Records that
    /// lack the key are left out.
    #[tracing::instrument(
        skip(self, records),
        fields(records = records.len(), group_by = key.as_str())
    )]
    pub fn group_breakdown(&self, records: &[ReviewRecord], key: GroupKey) -> Vec<GroupBreakdown> {
        let mut groups: BTreeMap<u64, Vec<ReviewRecord>> = BTreeMap::new();
        let mut unkeyed = 0usize;

        for record in records {
            match key.key_of(record) {
                Some(id) => groups.entry(id).or_default().push(record.clone()),
                None => unkeyed += 1,
            }
        }

        if unkeyed > 0 {
            debug!(unkeyed, "Records without a group id skipped");
        }

        groups
            .into_iter()
            .map(|(id, members)| {
                let average_ratings = average_ratings(&members);
                GroupBreakdown {
                    group_by: key.as_str(),
                    key: id,
                    total_reviews: members.len(),
                    overall_score: satisfaction_score(&average_ratings),
                    average_ratings,
                    sentiment_distribution: self.sentiment_distribution(&members),
                }
            })
            .collect()
    }

    /// Interprets every field of a single record.
    pub fn process_review(&self, record: &ReviewRecord) -> ProcessedReview {
        let ratings = Category::ALL
            .into_iter()
            .map(|category| {
                let label = record.rating(category);
                let code = RatingCode::from_label(label);
                CategoryAssessment {
                    category,
                    label: label.to_string(),
                    rating: code.map_or(0, RatingCode::value),
                    sentiment: code.map_or(SentimentLabel::Neutral, |c| {
                        classify_ordinal(i64::from(c.value()))
                    }),
                }
            })
            .collect();

        let (comment, comment_sentiment, cleaned_comment) = match record.written_comment() {
            Some(comment) => (
                comment.to_string(),
                self.classifier.classify_text(comment),
                normalize(comment),
            ),
            None => (String::new(), SentimentResult::neutral(), String::new()),
        };

        ProcessedReview {
            id: record.id,
            student_id: record.student_id,
            regulation_id: record.regulation_id,
            semester_id: record.semester_id,
            subject_id: record.subject_id,
            created_at: record.created_at,
            ratings,
            comment,
            comment_sentiment,
            cleaned_comment,
        }
    }

    pub fn process_reviews(&self, records: &[ReviewRecord]) -> Vec<ProcessedReview> {
        records.iter().map(|r| self.process_review(r)).collect()
    }
}

/// The `limit` groups with the most reviews, largest first; ties keep key order.
pub fn largest_groups(mut groups: Vec<GroupBreakdown>, limit: usize) -> Vec<GroupBreakdown> {
    groups.sort_by(|a, b| b.total_reviews.cmp(&a.total_reviews));
    groups.truncate(limit);
    groups
}
