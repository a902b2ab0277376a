use crate::analyzers::aggregate::{ReviewAggregator, largest_groups};
use crate::analyzers::types::AggregateStatistics;
use crate::review::{GroupKey, ReviewRecord};
use crate::sentiment::PolarityScorer;
use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Selection applied to loaded reviews before aggregation. `None` fields
/// match everything.
#[derive(Debug, Clone, Default)]
pub struct ReviewFilter {
    pub regulation_id: Option<u64>,
    pub semester_id: Option<u64>,
    pub subject_id: Option<u64>,
    pub student_id: Option<u64>,
}

impl ReviewFilter {
    pub fn matches(&self, record: &ReviewRecord) -> bool {
        fn check(wanted: Option<u64>, actual: Option<u64>) -> bool {
            wanted.is_none_or(|id| actual == Some(id))
        }

        check(self.regulation_id, record.regulation_id)
            && check(self.semester_id, record.semester_id)
            && check(self.subject_id, record.subject_id)
            && check(self.student_id, record.student_id)
    }

    pub fn apply(&self, records: Vec<ReviewRecord>) -> Vec<ReviewRecord> {
        records.into_iter().filter(|r| self.matches(r)).collect()
    }
}

/// Options for [`analyze`].
#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub top_n: usize,
    pub include_trends: bool,
    pub group_by: Option<GroupKey>,
    pub group_limit: Option<usize>,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            top_n: crate::keywords::DEFAULT_TOP_N,
            include_trends: false,
            group_by: None,
            group_limit: None,
        }
    }
}

/// Loads reviews from `input`, filters them and computes the overview
/// statistics, optionally with the daily trend and a group breakdown.
#[tracing::instrument(skip(aggregator, input), fields(input = %input.display()))]
pub fn analyze<S: PolarityScorer>(
    aggregator: &ReviewAggregator<S>,
    input: &Path,
    filter: &ReviewFilter,
    options: &ReportOptions,
) -> Result<AggregateStatistics> {
    let records = filter.apply(load_reviews(input)?);
    info!(records = records.len(), "Reviews selected for analysis");

    let mut stats = aggregator.overall_statistics(&records, options.top_n);

    if options.include_trends {
        stats.time_series = Some(aggregator.time_series(&records));
    }

    if let Some(key) = options.group_by {
        let groups = aggregator.group_breakdown(&records, key);
        stats.groups = Some(match options.group_limit {
            Some(limit) => largest_groups(groups, limit),
            None => groups,
        });
    }

    info!(
        total_reviews = stats.total_reviews,
        overall_satisfaction = stats.overall_satisfaction,
        "Analysis complete"
    );
    Ok(stats)
}

/// Loads reviews from a CSV file, a gzip-compressed CSV file, or every such
/// file in a directory (in file-name order).
pub fn load_reviews(input: &Path) -> Result<Vec<ReviewRecord>> {
    let files = if input.is_dir() {
        review_files(input)?
    } else {
        vec![input.to_path_buf()]
    };

    let mut records = Vec::new();
    for path in files {
        let loaded = load_review_file(&path)?;
        debug!(path = %path.display(), records = loaded.len(), "Loaded review file");
        records.extend(loaded);
    }

    Ok(records)
}

fn review_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in fs::read_dir(dir).with_context(|| format!("reading {}", dir.display()))? {
        let path = entry?.path();
        if path.is_file() && is_review_file(&path) {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

fn is_review_file(path: &Path) -> bool {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    name.ends_with(".csv") || name.ends_with(".csv.gz")
}

fn load_review_file(path: &Path) -> Result<Vec<ReviewRecord>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let reader: Box<dyn Read> = if path.extension().and_then(|e| e.to_str()) == Some("gz") {
        Box::new(GzDecoder::new(file))
    } else {
        Box::new(file)
    };

    read_reviews(reader, path)
}

/// Deserializes review rows from CSV. Rows that fail to parse are skipped.
pub fn read_reviews<R: Read>(reader: R, source: &Path) -> Result<Vec<ReviewRecord>> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::Headers).from_reader(reader);
    let mut rows = Vec::new();

    for (line, result) in rdr.deserialize::<ReviewRecord>().enumerate() {
        match result {
            Ok(record) => rows.push(record),
            Err(e) if e.is_io_error() => {
                return Err(e).with_context(|| format!("reading {}", source.display()));
            }
            Err(e) => {
                warn!(
                    source = %source.display(),
                    row = line + 1,
                    error = %e,
                    "Skipping malformed review row"
                );
            }
        }
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::review::Category;
    use crate::sentiment::LexiconScorer;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::env;
    use std::io::Write;

    const SAMPLE: &str = "\
id,student_id,regulation_id,semester_id,subject_id,teaching,course_content,examination,lab_support,teaching_method,library_support,comment,created_at,subject_name
1,10,1,1,100,Excellent,Good,Average,Poor,Very Good,Fair,Great course content,2024-01-01 09:00:00,Maths
2,11,1,2,101,Poor,Bad,Average,,,,submitted,2024-01-01 15:30:00,Physics
3,12,2,2,101,Average,,,,,,,2024-01-03T08:00:00,Physics
4,13,2,2,101,Good,Good,Good,Good,Good,Good,nice,not-a-date,Physics
";

    #[test]
    fn test_read_reviews_skips_malformed_rows() {
        let rows = read_reviews(SAMPLE.as_bytes(), Path::new("sample.csv")).unwrap();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].rating(Category::Teaching), "Excellent");
        assert_eq!(rows[1].rating(Category::LabSupport), "");
        assert_eq!(rows[1].written_comment(), None);
        assert_eq!(rows[2].date().to_string(), "2024-01-03");
    }

    #[test]
    fn test_filter_matches_selected_ids() {
        let rows = read_reviews(SAMPLE.as_bytes(), Path::new("sample.csv")).unwrap();

        let filter = ReviewFilter {
            semester_id: Some(2),
            ..Default::default()
        };
        assert_eq!(filter.apply(rows.clone()).len(), 2);

        let filter = ReviewFilter {
            semester_id: Some(2),
            regulation_id: Some(1),
            ..Default::default()
        };
        assert_eq!(filter.apply(rows.clone()).len(), 1);

        assert_eq!(ReviewFilter::default().apply(rows).len(), 3);
    }

    #[test]
    fn test_load_reviews_from_directory_with_gzip() {
        let dir = env::temp_dir().join("feedback_rater_test_load_dir");
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();

        fs::write(dir.join("a.csv"), SAMPLE).unwrap();
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(SAMPLE.as_bytes()).unwrap();
        fs::write(dir.join("b.csv.gz"), encoder.finish().unwrap()).unwrap();
        fs::write(dir.join("notes.txt"), "ignored").unwrap();

        let records = load_reviews(&dir).unwrap();
        assert_eq!(records.len(), 6);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_load_reviews_missing_file_errors() {
        assert!(load_reviews(Path::new("/nonexistent/reviews.csv")).is_err());
    }

    #[test]
    fn test_analyze_with_trends_and_groups() {
        let path = env::temp_dir().join("feedback_rater_test_analyze.csv");
        fs::write(&path, SAMPLE).unwrap();

        let aggregator = ReviewAggregator::new(LexiconScorer::new());
        let options = ReportOptions {
            include_trends: true,
            group_by: Some(GroupKey::Semester),
            ..Default::default()
        };
        let stats = analyze(&aggregator, &path, &ReviewFilter::default(), &options).unwrap();

        assert_eq!(stats.total_reviews, 3);
        assert_eq!(stats.time_series.as_ref().unwrap().len(), 2);
        let groups = stats.groups.as_ref().unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[1].total_reviews, 2);

        fs::remove_file(&path).unwrap();
    }
}
