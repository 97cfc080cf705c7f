// src/analysis/mod.rs
use serde::Serialize;
use thiserror::Error;

use crate::config::{LocationLabels, AREA_COLUMN};
use crate::ingest::Record;

pub mod parallel;
pub mod sequential;

/// A year cell that holds text but not a usable percentage.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("not a percentage: {raw:?}")]
pub struct InvalidValue {
    pub raw: String,
}

/// Parse a percentage cell such as `"87.5"` or `" 87.5 % "`.
///
/// Returns `None` when the cell carries no value: absent, empty, or the `"0"`
/// placeholder written for blanks. Non-numeric text and non-finite numbers
/// are `Some(Err(..))`.
pub fn parse_percentage(raw: Option<&str>) -> Option<Result<f64, InvalidValue>> {
    match raw? {
        "0" => None,
        raw => parse_measurement(Some(raw)),
    }
}

/// Like [`parse_percentage`], but a literal `"0"` is a measured 0%.
///
/// Only absent and empty cells carry no value.
pub fn parse_measurement(raw: Option<&str>) -> Option<Result<f64, InvalidValue>> {
    let raw = raw?;
    if raw.is_empty() {
        return None;
    }

    let trimmed = raw.trim();
    let number = trimmed.strip_suffix('%').unwrap_or(trimmed).trim();
    let parsed = number
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| InvalidValue {
            raw: raw.to_string(),
        });
    Some(parsed)
}

/// Area name of a record, `""` when the column is missing.
pub fn area_name<'a>(record: &Record<'a>) -> &'a str {
    record.get(AREA_COLUMN).unwrap_or_default()
}

/// Whether an area name counts toward the unique-area total.
pub fn is_countable_area(name: &str) -> bool {
    !name.is_empty() && name != "0"
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocationClass {
    Rural,
    Urban,
}

impl LocationClass {
    /// Case-insensitive match of a `Location` value against the configured labels.
    pub fn classify(location: &str, labels: &LocationLabels) -> Option<Self> {
        let location = location.to_lowercase();
        if location == labels.rural.to_lowercase() {
            Some(LocationClass::Rural)
        } else if location == labels.urban.to_lowercase() {
            Some(LocationClass::Urban)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LocationClass::Rural => "rural",
            LocationClass::Urban => "urban",
        }
    }
}

/// Which year cells feed a location average.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AverageScope {
    /// Only the configured target year.
    TargetYear,
    /// Every year in the configured range, one sample per numeric cell (a literal `0` included).
    YearRange,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Extremum {
    pub area: String,
    pub value: f64,
}

/// Highest and lowest value seen. Ties keep the first record offered.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Extrema {
    pub highest: Option<Extremum>,
    pub lowest: Option<Extremum>,
}

impl Extrema {
    pub fn offer(&mut self, area: &str, value: f64) {
        if self.highest.as_ref().map_or(true, |h| value > h.value) {
            self.highest = Some(Extremum {
                area: area.to_string(),
                value,
            });
        }
        if self.lowest.as_ref().map_or(true, |l| value < l.value) {
            self.lowest = Some(Extremum {
                area: area.to_string(),
                value,
            });
        }
    }
}

/// Running sum and sample count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Mean {
    pub sum: f64,
    pub count: usize,
}

impl Mean {
    pub fn add(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    /// `None` when nothing was added.
    pub fn value(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}
