// src/config.rs

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// Input file read by both binaries.
pub const DATASET_PATH: &str = "data/dataset.csv";

/// Column holding the country/area name.
pub const AREA_COLUMN: &str = "GeoAreaName";

/// Column holding the settlement type (rural/urban).
pub const LOCATION_COLUMN: &str = "Location";

/// Worker threads used by the parallel binary.
pub const PARALLEL_WORKERS: usize = 4;

/// Inclusive span of year columns, serialized as `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "[u16; 2]", into = "[u16; 2]")]
pub struct YearRange {
    pub start: u16,
    pub end: u16,
}

impl YearRange {
    pub fn new(start: u16, end: u16) -> Self {
        Self { start, end }
    }

    /// Column names for every year in the range, in ascending order.
    pub fn columns(&self) -> Vec<String> {
        (self.start..=self.end).map(|y| y.to_string()).collect()
    }
}

impl Default for YearRange {
    fn default() -> Self {
        Self::new(2000, 2022)
    }
}

impl From<[u16; 2]> for YearRange {
    fn from([start, end]: [u16; 2]) -> Self {
        Self { start, end }
    }
}

impl From<YearRange> for [u16; 2] {
    fn from(r: YearRange) -> Self {
        [r.start, r.end]
    }
}

impl std::fmt::Display for YearRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Values of the `Location` column that select each class (matched case-insensitively).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationLabels {
    pub rural: String,
    pub urban: String,
}

impl Default for LocationLabels {
    fn default() -> Self {
        Self {
            rural: "Rural".into(),
            urban: "Urban".into(),
        }
    }
}

/// Everything the aggregators need to know, passed in at call time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Year column used for extrema and target-year averages.
    pub target_year: String,
    /// Years scanned by range averages.
    pub year_range: YearRange,
    pub location_labels: LocationLabels,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            target_year: "2021".into(),
            year_range: YearRange::default(),
            location_labels: LocationLabels::default(),
        }
    }
}

impl AnalysisConfig {
    pub fn validate(&self) -> Result<()> {
        if self.target_year.trim().is_empty() {
            bail!("target_year must not be empty");
        }
        if self.year_range.start > self.year_range.end {
            bail!(
                "year_range start {} is after end {}",
                self.year_range.start,
                self.year_range.end
            );
        }
        let labels = &self.location_labels;
        if labels.rural.trim().is_empty() || labels.urban.trim().is_empty() {
            bail!("location labels must not be empty");
        }
        if labels.rural.to_lowercase() == labels.urban.to_lowercase() {
            bail!("rural and urban labels are identical: {:?}", labels.rural);
        }
        Ok(())
    }
}
