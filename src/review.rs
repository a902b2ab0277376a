//! Review records as supplied by the persistence layer, and the fixed set of
//! rating categories every record carries.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::AnalyticsError;

/// Placeholder stored when a student submitted the form without writing anything.
pub const SENTINEL: &str = "submitted";

/// The six rating categories of a course review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Teaching,
    CourseContent,
    Examination,
    LabSupport,
    TeachingMethod,
    LibrarySupport,
}

impl Category {
    /// All categories in form order.
    pub const ALL: [Category; 6] = [
        Category::Teaching,
        Category::CourseContent,
        Category::Examination,
        Category::LabSupport,
        Category::TeachingMethod,
        Category::LibrarySupport,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Teaching => "teaching",
            Category::CourseContent => "course_content",
            Category::Examination => "examination",
            Category::LabSupport => "lab_support",
            Category::TeachingMethod => "teaching_method",
            Category::LibrarySupport => "library_support",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| AnalyticsError::UnknownCategory(s.to_string()))
    }
}

/// Context a caller may group reviews by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKey {
    Semester,
    Subject,
    Regulation,
    Student,
}

impl GroupKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            GroupKey::Semester => "semester",
            GroupKey::Subject => "subject",
            GroupKey::Regulation => "regulation",
            GroupKey::Student => "student",
        }
    }

    /// Returns the id this key selects from `record`, if the record has one.
    pub fn key_of(&self, record: &ReviewRecord) -> Option<u64> {
        match self {
            GroupKey::Semester => record.semester_id,
            GroupKey::Subject => record.subject_id,
            GroupKey::Regulation => record.regulation_id,
            GroupKey::Student => record.student_id,
        }
    }
}

impl FromStr for GroupKey {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "semester" => Ok(GroupKey::Semester),
            "subject" => Ok(GroupKey::Subject),
            "regulation" => Ok(GroupKey::Regulation),
            "student" => Ok(GroupKey::Student),
            _ => Err(AnalyticsError::UnknownGroupKey(s.to_string())),
        }
    }
}

/// A single submitted course review.
///
/// Rating fields hold the free-text label picked in the form (e.g.
/// `"Excellent"`); any of them may be missing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReviewRecord {
    pub id: u64,
    #[serde(default)]
    pub student_id: Option<u64>,
    #[serde(default)]
    pub regulation_id: Option<u64>,
    #[serde(default)]
    pub semester_id: Option<u64>,
    #[serde(default)]
    pub subject_id: Option<u64>,

    // rating labels
    #[serde(default)]
    pub teaching: Option<String>,
    #[serde(default)]
    pub course_content: Option<String>,
    #[serde(default)]
    pub examination: Option<String>,
    #[serde(default)]
    pub lab_support: Option<String>,
    #[serde(default)]
    pub teaching_method: Option<String>,
    #[serde(default)]
    pub library_support: Option<String>,

    #[serde(default)]
    pub comment: Option<String>,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub created_at: NaiveDateTime,
}

impl ReviewRecord {
    pub fn new(id: u64, created_at: NaiveDateTime) -> Self {
        ReviewRecord {
            id,
            created_at,
            ..Default::default()
        }
    }

    /// Raw label stored for `category`, or `""` when absent.
    pub fn rating(&self, category: Category) -> &str {
        let value = match category {
            Category::Teaching => &self.teaching,
            Category::CourseContent => &self.course_content,
            Category::Examination => &self.examination,
            Category::LabSupport => &self.lab_support,
            Category::TeachingMethod => &self.teaching_method,
            Category::LibrarySupport => &self.library_support,
        };
        value.as_deref().unwrap_or("")
    }

    /// Set the label for `category`.
    pub fn with_rating(mut self, category: Category, label: &str) -> Self {
        let slot = match category {
            Category::Teaching => &mut self.teaching,
            Category::CourseContent => &mut self.course_content,
            Category::Examination => &mut self.examination,
            Category::LabSupport => &mut self.lab_support,
            Category::TeachingMethod => &mut self.teaching_method,
            Category::LibrarySupport => &mut self.library_support,
        };
        *slot = Some(label.to_string());
        self
    }

    pub fn with_comment(mut self, comment: &str) -> Self {
        self.comment = Some(comment.to_string());
        self
    }

    /// Set the semester/subject/regulation/student context.
    pub fn with_context(
        mut self,
        regulation_id: u64,
        semester_id: u64,
        subject_id: u64,
        student_id: u64,
    ) -> Self {
        self.regulation_id = Some(regulation_id);
        self.semester_id = Some(semester_id);
        self.subject_id = Some(subject_id);
        self.student_id = Some(student_id);
        self
    }

    /// The comment if one was actually written: trimmed, non-empty and not
    /// the sentinel.
    pub fn written_comment(&self) -> Option<&str> {
        self.comment
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty() && *c != SENTINEL)
    }

    /// Non-empty rating labels in category order, trimmed.
    pub fn rating_labels(&self) -> impl Iterator<Item = &str> + '_ {
        Category::ALL
            .into_iter()
            .map(|c| self.rating(c).trim())
            .filter(|label| !label.is_empty())
    }

    /// Text fed to the sentiment classifier for this record: the comment
    /// followed by every non-empty rating label, space-joined. A record with
    /// neither yields the sentinel.
    pub fn composite_text(&self) -> String {
        let comment = self.comment.as_deref().unwrap_or("").trim();
        let mut parts = vec![comment];
        parts.extend(self.rating_labels());

        let joined = parts.join(" ");
        let joined = joined.trim();
        if joined.is_empty() {
            SENTINEL.to_string()
        } else {
            joined.to_string()
        }
    }

    /// Calendar day of `created_at`, taken as stored.
    pub fn date(&self) -> NaiveDate {
        self.created_at.date()
    }
}

const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parses the timestamp formats found in review exports.
///
/// Offsets are not applied: an RFC 3339 value keeps its own wall-clock time.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }

    for format in TIMESTAMP_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt);
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("unrecognized timestamp '{raw}'")))
}
