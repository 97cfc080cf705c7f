// src/analysis/sequential.rs
use std::collections::HashSet;

use serde::Serialize;
use tracing::{instrument, warn};

use super::{area_name, is_countable_area, parse_percentage, Extrema, LocationClass, Mean};
use crate::config::{AnalysisConfig, LOCATION_COLUMN};
use crate::ingest::{Dataset, Record};

/// Result of one sequential pass. Averages cover the target year only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub target_year: String,
    pub unique_areas: usize,
    pub extrema: Extrema,
    pub rural: Mean,
    pub urban: Mean,
    /// Target-year cells that held text but no number.
    pub invalid_cells: usize,
}

/// Single-pass accumulator: feed records with `observe`, then `finish`.
pub struct Aggregator<'c> {
    config: &'c AnalysisConfig,
    areas: HashSet<String>,
    extrema: Extrema,
    rural: Mean,
    urban: Mean,
    invalid_cells: usize,
}

impl<'c> Aggregator<'c> {
    pub fn new(config: &'c AnalysisConfig) -> Self {
        Self {
            config,
            areas: HashSet::new(),
            extrema: Extrema::default(),
            rural: Mean::default(),
            urban: Mean::default(),
            invalid_cells: 0,
        }
    }

    pub fn observe(&mut self, record: &Record<'_>) {
        let area = area_name(record);
        if is_countable_area(area) && !self.areas.contains(area) {
            self.areas.insert(area.to_string());
        }

        let year = self.config.target_year.as_str();
        let value = match parse_percentage(record.get(year)) {
            None => return,
            Some(Ok(v)) => v,
            Some(Err(e)) => {
                warn!(area = %area, year = %year, value = %e.raw, "invalid number format, skipping");
                self.invalid_cells += 1;
                return;
            }
        };

        self.extrema.offer(area, value);

        let class = record
            .get(LOCATION_COLUMN)
            .and_then(|loc| LocationClass::classify(loc, &self.config.location_labels));
        match class {
            Some(LocationClass::Rural) => self.rural.add(value),
            Some(LocationClass::Urban) => self.urban.add(value),
            None => {}
        }
    }

    pub fn finish(self) -> Summary {
        Summary {
            target_year: self.config.target_year.clone(),
            unique_areas: self.areas.len(),
            extrema: self.extrema,
            rural: self.rural,
            urban: self.urban,
            invalid_cells: self.invalid_cells,
        }
    }
}

/// Run the single-pass analysis over every record, in file order.
#[instrument(level = "info", skip(dataset, config), fields(rows = dataset.len(), year = %config.target_year))]
pub fn analyze(dataset: &Dataset, config: &AnalysisConfig) -> Summary {
    let mut agg = Aggregator::new(config);
    for record in dataset.records() {
        agg.observe(&record);
    }
    agg.finish()
}
