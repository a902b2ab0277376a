pub mod analyzers;
pub mod error;
pub mod keywords;
pub mod output;
pub mod rating;
pub mod review;
pub mod sentiment;
pub mod text;

pub use analyzers::aggregate::ReviewAggregator;
pub use analyzers::types::AggregateStatistics;
pub use error::AnalyticsError;
pub use review::{Category, GroupKey, ReviewRecord};
pub use sentiment::{PolarityScorer, SentimentClassifier, SentimentLabel};
