// src/report.rs
//! Human-readable rendering of analysis results.

use std::fmt;

use crate::analysis::{parallel::ParallelSummary, sequential::Summary, Extremum, Mean};

fn write_extremum(
    f: &mut fmt::Formatter<'_>,
    label: &str,
    extremum: Option<&Extremum>,
) -> fmt::Result {
    match extremum {
        Some(e) => writeln!(f, "{}: {} with {:.2}%", label, e.area, e.value),
        None => writeln!(f, "{}: no data", label),
    }
}

fn write_mean(
    f: &mut fmt::Formatter<'_>,
    heading: &str,
    class: &str,
    period: &str,
    mean: &Mean,
    unit: &str,
) -> fmt::Result {
    match mean.value() {
        Some(avg) => writeln!(f, "{}: {:.2}% ({} {})", heading, avg, mean.count, unit),
        None => writeln!(f, "No {} data available for {}", class, period),
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "===== Analysis Results for Year {} =====", self.target_year)?;
        writeln!(f, "Number of unique countries/areas: {}", self.unique_areas)?;
        write_extremum(f, "Highest water access", self.extrema.highest.as_ref())?;
        write_extremum(f, "Lowest water access", self.extrema.lowest.as_ref())?;
        let year = self.target_year.as_str();
        write_mean(f, "Average rural water access", "rural", year, &self.rural, "records")?;
        write_mean(f, "Average urban water access", "urban", year, &self.urban, "records")?;
        if self.invalid_cells > 0 {
            writeln!(
                f,
                "Skipped {} non-numeric value(s) in {}",
                self.invalid_cells, self.target_year
            )?;
        }
        Ok(())
    }
}

impl fmt::Display for ParallelSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let year = &self.target_year;
        let range = self.year_range.to_string();

        writeln!(f, "===== Parallel Analysis Results =====")?;
        writeln!(f, "Unique countries: {}", self.unique_areas)?;
        write_extremum(
            f,
            &format!("Highest water access in {}", year),
            self.extrema.highest.as_ref(),
        )?;
        write_extremum(
            f,
            &format!("Lowest water access in {}", year),
            self.extrema.lowest.as_ref(),
        )?;
        write_mean(
            f,
            &format!("Average rural water access ({})", range),
            "rural",
            &range,
            &self.rural,
            "values",
        )?;
        write_mean(
            f,
            &format!("Average urban water access ({})", range),
            "urban",
            &range,
            &self.urban,
            "values",
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{parallel, sequential};
    use crate::config::{AnalysisConfig, YearRange};
    use crate::ingest::{parse_dataset, IngestOptions};
    use anyhow::Result;

    #[test]
    fn sequential_report_lines() -> Result<()> {
        let ds = parse_dataset(
            "GeoAreaName,Location,2021\nA,Rural,40\nB,Rural,60\nC,Total,75.5\n",
            &IngestOptions::default(),
        )?;
        let text = sequential::analyze(&ds, &AnalysisConfig::default()).to_string();

        assert!(text.starts_with("===== Analysis Results for Year 2021 =====\n"));
        assert!(text.contains("Number of unique countries/areas: 3\n"));
        assert!(text.contains("Highest water access: C with 75.50%\n"));
        assert!(text.contains("Lowest water access: A with 40.00%\n"));
        assert!(text.contains("Average rural water access: 50.00% (2 records)\n"));
        assert!(text.contains("No urban data available for 2021\n"));
        assert!(!text.contains("Average urban"));
        assert!(!text.contains("Skipped"));
        Ok(())
    }

    #[test]
    fn empty_extrema_say_no_data() -> Result<()> {
        let ds = parse_dataset("GeoAreaName,Location,2021\nA,Rural,N/A\n", &IngestOptions::default())?;
        let text = sequential::analyze(&ds, &AnalysisConfig::default()).to_string();
        assert!(text.contains("Highest water access: no data\n"));
        assert!(text.contains("Lowest water access: no data\n"));
        assert!(text.contains("No rural data available for 2021\n"));
        assert!(text.contains("Skipped 1 non-numeric value(s) in 2021\n"));
        Ok(())
    }

    #[test]
    fn parallel_report_lines() -> Result<()> {
        let ds = parse_dataset(
            "GeoAreaName,Location,2020,2021\nA,Urban,10,20\nB,Urban,30,40\n",
            &IngestOptions::default(),
        )?;
        let mut cfg = AnalysisConfig::default();
        cfg.year_range = YearRange::new(2020, 2021);
        let text = parallel::analyze(&ds, &cfg, 2)?.to_string();

        assert!(text.starts_with("===== Parallel Analysis Results =====\n"));
        assert!(text.contains("Unique countries: 2\n"));
        assert!(text.contains("Highest water access in 2021: B with 40.00%\n"));
        assert!(text.contains("Lowest water access in 2021: A with 20.00%\n"));
        assert!(text.contains("No rural data available for 2020-2021\n"));
        assert!(text.contains("Average urban water access (2020-2021): 25.00% (4 values)\n"));
        Ok(())
    }
}
