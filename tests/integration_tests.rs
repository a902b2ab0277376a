use feedback_rater::analyzers::aggregate::{ReviewAggregator, average_ratings};
use feedback_rater::analyzers::analyzer::{ReportOptions, ReviewFilter, analyze, load_reviews};
use feedback_rater::output::write_processed_csv;
use feedback_rater::sentiment::LexiconScorer;
use feedback_rater::{Category, GroupKey, SentimentLabel};
use std::path::Path;

const FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/sample_reviews.csv");

#[test]
fn test_full_pipeline() {
    let aggregator = ReviewAggregator::new(LexiconScorer::new());
    let options = ReportOptions {
        include_trends: true,
        group_by: Some(GroupKey::Semester),
        ..Default::default()
    };

    let stats = analyze(&aggregator, Path::new(FIXTURE), &ReviewFilter::default(), &options)
        .expect("Failed to analyze fixture");

    // Row 5 has an unparseable timestamp and is skipped
    assert_eq!(stats.total_reviews, 4);
    assert_eq!(stats.average_ratings[&Category::Teaching], 3.5);
    assert!((stats.overall_satisfaction - 3.25).abs() < 1e-9);

    assert_eq!(stats.sentiment_distribution.happy, 2);
    assert_eq!(stats.sentiment_distribution.neutral, 1);
    assert_eq!(stats.sentiment_distribution.bad, 1);
    assert_eq!(stats.sentiment_distribution.total(), stats.total_reviews);

    assert_eq!(stats.common_themes[0], ("average".to_string(), 6));
    assert!(stats.common_themes.iter().all(|(word, _)| word != "submitted"));

    let series = stats.time_series.as_ref().expect("trends requested");
    let dates: Vec<String> = series.iter().map(|p| p.date.to_string()).collect();
    assert_eq!(dates, vec!["2024-03-01", "2024-03-02", "2024-03-03"]);
    assert_eq!(series[0].counts.total(), 2);

    let groups = stats.groups.as_ref().expect("groups requested");
    assert_eq!(groups.len(), 2);
    assert!(groups.iter().all(|g| g.total_reviews == 2));
}

#[test]
fn test_filtered_pipeline() {
    let records = load_reviews(Path::new(FIXTURE)).expect("Failed to load fixture");
    let filter = ReviewFilter {
        regulation_id: Some(2),
        ..Default::default()
    };
    let selected = filter.apply(records);

    assert_eq!(selected.len(), 2);
    assert_eq!(average_ratings(&selected)[&Category::Teaching], 3.5);
    assert_eq!(average_ratings(&selected)[&Category::LabSupport], 3.0);
}

#[test]
fn test_export_processed_reviews() {
    let records = load_reviews(Path::new(FIXTURE)).expect("Failed to load fixture");
    let aggregator = ReviewAggregator::new(LexiconScorer::new());
    let processed = aggregator.process_reviews(&records);

    assert_eq!(processed[0].comment_sentiment.label, SentimentLabel::Happy);
    assert_eq!(processed[2].comment, "");
    assert_eq!(processed[3].ratings[1].rating, 0);

    let path = std::env::temp_dir().join("feedback_rater_integration_export.csv");
    let path = path.to_string_lossy().into_owned();
    write_processed_csv(&path, &processed).expect("Failed to export");

    let content = std::fs::read_to_string(&path).unwrap();
    assert_eq!(content.lines().count(), 5);
    std::fs::remove_file(&path).unwrap();
}

#[test]
fn test_classify_free_text() {
    let aggregator = ReviewAggregator::new(LexiconScorer::new());

    let result = aggregator.classifier().classify_text("The labs were boring and confusing");
    assert_eq!(result.label, SentimentLabel::Bad);

    let result = aggregator.classifier().classify_text("submitted");
    assert_eq!(result.label, SentimentLabel::Neutral);
    assert_eq!(result.polarity, 0.0);
}
