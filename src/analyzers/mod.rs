//! Review aggregation and reporting.
//!
//! [`aggregate`] folds review records into averages, histograms, sentiment
//! counts, daily trends and group breakdowns. [`analyzer`] loads review CSVs
//! from disk, applies caller filters and assembles a full report.

pub mod aggregate;
pub mod analyzer;
pub mod types;
pub mod utility;
