// src/analysis/parallel.rs
use std::collections::HashSet;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info, instrument};

use super::{
    area_name, is_countable_area, parse_measurement, parse_percentage, AverageScope, Extrema,
    InvalidValue, LocationClass, Mean,
};
use crate::config::{AnalysisConfig, YearRange, LOCATION_COLUMN};
use crate::ingest::Dataset;

/// Result of the four concurrent computations. Averages cover the whole year range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParallelSummary {
    pub target_year: String,
    pub year_range: YearRange,
    pub unique_areas: usize,
    pub extrema: Extrema,
    pub rural: Mean,
    pub urban: Mean,
}

/// Number of distinct, non-blank area names.
pub fn unique_areas(dataset: &Dataset) -> usize {
    let areas: HashSet<&str> = dataset
        .records()
        .map(|r| area_name(&r))
        .filter(|a| is_countable_area(a))
        .collect();
    areas.len()
}

/// Highest and lowest target-year value across all records.
pub fn target_year_extrema(dataset: &Dataset, config: &AnalysisConfig) -> Extrema {
    let year = config.target_year.as_str();
    let mut extrema = Extrema::default();
    for record in dataset.records() {
        match parse_percentage(record.get(year)) {
            Some(Ok(v)) => extrema.offer(area_name(&record), v),
            Some(Err(e)) => debug!(area = area_name(&record), year = %year, error = %e, "skipped"),
            None => {}
        }
    }
    extrema
}

type CellParser = fn(Option<&str>) -> Option<Result<f64, InvalidValue>>;

/// Mean of every numeric cell in `scope` over records of the given location class.
pub fn location_average(
    dataset: &Dataset,
    config: &AnalysisConfig,
    class: LocationClass,
    scope: AverageScope,
) -> Mean {
    let (years, parse): (Vec<String>, CellParser) = match scope {
        AverageScope::TargetYear => (vec![config.target_year.clone()], parse_percentage),
        AverageScope::YearRange => (config.year_range.columns(), parse_measurement),
    };

    let mut mean = Mean::default();
    for record in dataset.records() {
        let matches = record
            .get(LOCATION_COLUMN)
            .and_then(|loc| LocationClass::classify(loc, &config.location_labels))
            == Some(class);
        if !matches {
            continue;
        }
        for year in &years {
            match parse(record.get(year)) {
                Some(Ok(v)) => mean.add(v),
                Some(Err(e)) => {
                    debug!(area = area_name(&record), year = %year, error = %e, "skipped")
                }
                None => {}
            }
        }
    }
    mean
}

/// Run the four computations on a dedicated pool of `workers` threads and wait for all of them.
///
/// Every task only reads `dataset`, so the join needs no locks and has no timeout.
#[instrument(level = "info", skip(dataset, config), fields(rows = dataset.len()))]
pub fn analyze(
    dataset: &Dataset,
    config: &AnalysisConfig,
    workers: usize,
) -> Result<ParallelSummary> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("analysis-{}", i))
        .build()
        .context("building analysis thread pool")?;

    let ((unique, extrema), (rural, urban)) = pool.install(|| {
        rayon::join(
            || {
                rayon::join(
                    || {
                        let n = unique_areas(dataset);
                        info!(task = "unique_areas", unique = n, "done");
                        n
                    },
                    || {
                        let ex = target_year_extrema(dataset, config);
                        info!(
                            task = "extrema",
                            highest = ?ex.highest,
                            lowest = ?ex.lowest,
                            "done"
                        );
                        ex
                    },
                )
            },
            || {
                rayon::join(
                    || range_average_task(dataset, config, LocationClass::Rural),
                    || range_average_task(dataset, config, LocationClass::Urban),
                )
            },
        )
    });

    Ok(ParallelSummary {
        target_year: config.target_year.clone(),
        year_range: config.year_range,
        unique_areas: unique,
        extrema,
        rural,
        urban,
    })
}

fn range_average_task(dataset: &Dataset, config: &AnalysisConfig, class: LocationClass) -> Mean {
    let mean = location_average(dataset, config, class, AverageScope::YearRange);
    info!(
        task = class.as_str(),
        average = ?mean.value(),
        samples = mean.count,
        "done"
    );
    mean
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::sequential;
    use crate::ingest::{parse_dataset, IngestOptions};
    use crate::test_support::init_test_logging;
    use anyhow::Result;

    const SAMPLE: &str = "\
GeoAreaName,Location,2000,2001,2021
A,Rural,20,30,10
B,Urban,80%,N/A,20
C,Rural,,,5
A,Urban,90,100,
D,Total,1,1,1
";

    fn dataset() -> Dataset {
        parse_dataset(SAMPLE, &IngestOptions::default()).expect("sample parses")
    }

    fn config() -> AnalysisConfig {
        let mut cfg = AnalysisConfig::default();
        cfg.year_range = YearRange::new(2000, 2021);
        cfg
    }

    #[test]
    fn unique_areas_counts_distinct_names() {
        assert_eq!(unique_areas(&dataset()), 4);
    }

    #[test]
    fn extrema_follow_target_year() {
        let ex = target_year_extrema(&dataset(), &config());
        assert_eq!(ex.highest.map(|e| e.area), Some("B".to_string()));
        // D@1 is lowest; C@5 would win without it
        assert_eq!(ex.lowest.map(|e| (e.area, e.value)), Some(("D".to_string(), 1.0)));
    }

    #[test]
    fn range_average_sums_every_numeric_year() {
        let ds = dataset();
        let cfg = config();

        // rural: A → 20, 30, 10; C → 5
        let rural = location_average(&ds, &cfg, LocationClass::Rural, AverageScope::YearRange);
        assert_eq!(rural.count, 4);
        assert_eq!(rural.value(), Some(16.25));

        // urban: B → 80, 20 (N/A skipped); A → 90, 100
        let urban = location_average(&ds, &cfg, LocationClass::Urban, AverageScope::YearRange);
        assert_eq!(urban.count, 4);
        assert_eq!(urban.value(), Some(72.5));
    }

    #[test]
    fn range_average_counts_every_spelling_of_zero() -> Result<()> {
        let ds = parse_dataset(
            "GeoAreaName,Location,2000,2001,2002,2003\nA,Rural,0,0.0,0%,60\nB,Rural,,,,\n",
            &IngestOptions::default(),
        )?;
        let mut cfg = AnalysisConfig::default();
        cfg.year_range = YearRange::new(2000, 2003);

        let rural = location_average(&ds, &cfg, LocationClass::Rural, AverageScope::YearRange);
        assert_eq!(rural.count, 4);
        assert_eq!(rural.value(), Some(15.0));
        Ok(())
    }

    #[test]
    fn target_year_scope_skips_zero_placeholder() -> Result<()> {
        let ds = parse_dataset(
            "GeoAreaName,Location,2021\nA,Rural,0\nB,Rural,0.0\nC,Rural,60\n",
            &IngestOptions::default(),
        )?;
        let cfg = AnalysisConfig::default();

        // "0" is the blank placeholder; "0.0" is a measurement
        let rural = location_average(&ds, &cfg, LocationClass::Rural, AverageScope::TargetYear);
        assert_eq!(rural.count, 2);
        assert_eq!(rural.value(), Some(30.0));
        Ok(())
    }

    #[test]
    fn target_year_scope_matches_sequential_pass() {
        let ds = dataset();
        let cfg = config();
        let seq = sequential::analyze(&ds, &cfg);

        let rural = location_average(&ds, &cfg, LocationClass::Rural, AverageScope::TargetYear);
        let urban = location_average(&ds, &cfg, LocationClass::Urban, AverageScope::TargetYear);
        assert_eq!(rural, seq.rural);
        assert_eq!(urban, seq.urban);
        assert_eq!(target_year_extrema(&ds, &cfg), seq.extrema);
        assert_eq!(unique_areas(&ds), seq.unique_areas);
    }

    #[test]
    fn parallel_run_combines_all_tasks() -> Result<()> {
        init_test_logging();
        let ds = dataset();
        let s = analyze(&ds, &config(), 4)?;

        assert_eq!(s.unique_areas, 4);
        assert_eq!(s.year_range, YearRange::new(2000, 2021));
        assert_eq!(s.rural.value(), Some(16.25));
        assert_eq!(s.urban.value(), Some(72.5));
        assert_eq!(s.extrema.highest.map(|e| e.value), Some(20.0));
        Ok(())
    }

    #[test]
    fn parallel_runs_are_deterministic() -> Result<()> {
        let ds = dataset();
        let cfg = config();
        let first = analyze(&ds, &cfg, 4)?;
        for workers in [1, 2, 4, 8] {
            assert_eq!(analyze(&ds, &cfg, workers)?, first);
        }
        Ok(())
    }

    #[test]
    fn empty_classes_have_no_average() -> Result<()> {
        let ds = parse_dataset("GeoAreaName,Location,2021\nA,Total,50\n", &IngestOptions::default())?;
        let s = analyze(&ds, &AnalysisConfig::default(), 4)?;
        assert_eq!(s.rural.value(), None);
        assert_eq!(s.urban.value(), None);
        assert_eq!(s.unique_areas, 1);
        Ok(())
    }
}
