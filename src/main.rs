//! CLI entry point for the course feedback rater.
//!
//! Loads review exports, narrows them with the requested filters, and
//! reports averages, rating histograms, sentiment, trends, themes and
//! group breakdowns as JSON.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use feedback_rater::analyzers::aggregate::{
    ReviewAggregator, average_ratings, largest_groups, rating_distributions,
};
use feedback_rater::analyzers::analyzer::{ReportOptions, ReviewFilter, analyze, load_reviews};
use feedback_rater::keywords::{DEFAULT_TOP_N, THEMES_TOP_N, common_themes};
use feedback_rater::output::{print_json, print_pretty, write_json, write_processed_csv};
use feedback_rater::review::{GroupKey, ReviewRecord};
use feedback_rater::sentiment::LexiconScorer;
use serde::Serialize;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "feedback_rater")]
#[command(about = "Analytics over student course feedback", long_about = None)]
struct Cli {
    /// JSON lexicon overrides for the built-in polarity scorer
    #[arg(long, global = true)]
    lexicon: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Where reviews come from and which of them to keep.
#[derive(Args)]
struct Selection {
    /// Review CSV file (.csv or .csv.gz) or a directory of them
    #[arg(short, long, value_name = "FILE_OR_DIR")]
    input: PathBuf,

    /// Only reviews for this regulation id
    #[arg(long)]
    regulation: Option<u64>,

    /// Only reviews for this semester id
    #[arg(long)]
    semester: Option<u64>,

    /// Only reviews for this subject id
    #[arg(long)]
    subject: Option<u64>,

    /// Only reviews by this student id
    #[arg(long)]
    student: Option<u64>,

    /// Write the JSON result to this file instead of logging it
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl Selection {
    fn filter(&self) -> ReviewFilter {
        ReviewFilter {
            regulation_id: self.regulation,
            semester_id: self.semester,
            subject_id: self.subject,
            student_id: self.student,
        }
    }

    fn load(&self) -> Result<Vec<ReviewRecord>> {
        let records = self.filter().apply(load_reviews(&self.input)?);
        info!(records = records.len(), input = %self.input.display(), "Reviews loaded");
        Ok(records)
    }

    fn emit(&self, value: &impl Serialize) -> Result<()> {
        match &self.output {
            Some(path) => write_json(path, value),
            None => print_json(value),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Full statistics: averages, histograms, sentiment, satisfaction, themes
    Overview {
        #[command(flatten)]
        selection: Selection,

        /// Number of common themes to report
        #[arg(long, default_value_t = DEFAULT_TOP_N)]
        top_n: usize,

        /// Include the daily sentiment trend
        #[arg(long, default_value_t = false)]
        trends: bool,

        /// Include a breakdown by semester, subject, regulation or student
        #[arg(long, value_parser = parse_group_key)]
        group_by: Option<GroupKey>,
    },
    /// Average rating per category
    Averages {
        #[command(flatten)]
        selection: Selection,
    },
    /// Rating histograms for every category
    Ratings {
        #[command(flatten)]
        selection: Selection,
    },
    /// Happy/neutral/bad counts
    Sentiment {
        #[command(flatten)]
        selection: Selection,
    },
    /// Sentiment per day
    Trends {
        #[command(flatten)]
        selection: Selection,
    },
    /// Most frequent words in comments and rating labels
    Themes {
        #[command(flatten)]
        selection: Selection,

        #[arg(long, default_value_t = THEMES_TOP_N)]
        top_n: usize,
    },
    /// Per-group averages and sentiment
    Groups {
        #[command(flatten)]
        selection: Selection,

        /// semester, subject, regulation or student
        #[arg(long, value_parser = parse_group_key)]
        by: GroupKey,

        /// Keep only the N groups with the most reviews
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Write every review with its interpreted fields to CSV
    Export {
        #[command(flatten)]
        selection: Selection,

        /// CSV file to write
        #[arg(long, default_value = "cleaned_reviews.csv")]
        out: String,
    },
    /// Classify a single piece of text
    Classify {
        #[arg(value_name = "TEXT")]
        text: String,
    },
}

fn parse_group_key(raw: &str) -> Result<GroupKey, String> {
    raw.parse().map_err(|e: feedback_rater::AnalyticsError| e.to_string())
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/feedback_rater.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("feedback_rater.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();
    let aggregator = ReviewAggregator::new(load_scorer(cli.lexicon.as_deref())?);

    match cli.command {
        Commands::Overview {
            selection,
            top_n,
            trends,
            group_by,
        } => {
            let options = ReportOptions {
                top_n,
                include_trends: trends,
                group_by,
                group_limit: None,
            };
            let stats = analyze(&aggregator, &selection.input, &selection.filter(), &options)?;
            selection.emit(&stats)?;
        }
        Commands::Averages { selection } => {
            let records = selection.load()?;
            selection.emit(&average_ratings(&records))?;
        }
        Commands::Ratings { selection } => {
            let records = selection.load()?;
            selection.emit(&rating_distributions(&records))?;
        }
        Commands::Sentiment { selection } => {
            let records = selection.load()?;
            selection.emit(&aggregator.overall_sentiment(&records))?;
        }
        Commands::Trends { selection } => {
            let records = selection.load()?;
            selection.emit(&aggregator.time_series(&records))?;
        }
        Commands::Themes { selection, top_n } => {
            let records = selection.load()?;
            let themes: Vec<Theme> = common_themes(&records, top_n)
                .into_iter()
                .map(|(word, count)| Theme { word, count })
                .collect();
            selection.emit(&themes)?;
        }
        Commands::Groups {
            selection,
            by,
            limit,
        } => {
            let records = selection.load()?;
            let groups = aggregator.group_breakdown(&records, by);
            let groups = match limit {
                Some(limit) => largest_groups(groups, limit),
                None => groups,
            };
            if groups.is_empty() {
                warn!(group_by = by.as_str(), "No reviews carry this group id");
            }
            selection.emit(&groups)?;
        }
        Commands::Export { selection, out } => {
            let records = selection.load()?;
            let processed = aggregator.process_reviews(&records);
            write_processed_csv(&out, &processed)?;
            info!(rows = processed.len(), path = %out, "Processed reviews exported");
        }
        Commands::Classify { text } => {
            let result = aggregator.classifier().classify_text(&text);
            print_pretty(&result);
            print_json(&result)?;
        }
    }

    Ok(())
}

/// Word-cloud entry for the themes view.
#[derive(Serialize)]
struct Theme {
    word: String,
    count: usize,
}

/// Built-in scorer, with overrides from `--lexicon` or `FEEDBACK_LEXICON_PATH`.
fn load_scorer(lexicon: Option<&Path>) -> Result<LexiconScorer> {
    let path = lexicon
        .map(Path::to_path_buf)
        .or_else(|| std::env::var_os("FEEDBACK_LEXICON_PATH").map(PathBuf::from));

    match path {
        Some(path) => {
            let scorer = LexiconScorer::load(&path)
                .with_context(|| format!("loading lexicon {}", path.display()))?;
            info!(path = %path.display(), entries = scorer.len(), "Lexicon loaded");
            Ok(scorer)
        }
        None => Ok(LexiconScorer::new()),
    }
}
