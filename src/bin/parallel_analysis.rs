use anyhow::{Context, Result};
use std::time::Instant;
use tracing::{debug, info, warn};
use tracing_subscriber::{fmt, EnvFilter};
use water_access::{
    analysis::parallel,
    config::{AnalysisConfig, AREA_COLUMN, DATASET_PATH, LOCATION_COLUMN, PARALLEL_WORKERS},
    ingest::{self, IngestOptions},
};

fn main() -> Result<()> {
    let start = Instant::now();

    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .with_thread_names(true)
        .init();

    // ─── 2) configure ────────────────────────────────────────────────
    let config = AnalysisConfig::default();
    config.validate()?;
    debug!(config = %serde_json::to_string(&config)?, workers = PARALLEL_WORKERS, "effective config");

    // ─── 3) load dataset ─────────────────────────────────────────────
    println!("Reading data from: {}", DATASET_PATH);
    let dataset = ingest::read_dataset(DATASET_PATH, &IngestOptions::default())?;

    if dataset.is_empty() {
        warn!(path = DATASET_PATH, "no data records");
        println!("Warning: No data records were found in the file");
        return Ok(());
    }
    println!("Successfully read {} records", dataset.len());
    for column in dataset.missing_columns(&[AREA_COLUMN, LOCATION_COLUMN, config.target_year.as_str()]) {
        warn!(column = %column, path = DATASET_PATH, "expected column not in header");
    }

    // ─── 4) analyse on the worker pool + report ──────────────────────
    let summary = parallel::analyze(&dataset, &config, PARALLEL_WORKERS)
        .context("parallel analysis failed")?;
    debug!(summary = %serde_json::to_string(&summary)?, "analysis finished");

    println!();
    print!("{}", summary);

    let elapsed = start.elapsed();
    println!("[Parallel] Total time: {:.3} s", elapsed.as_secs_f64());
    info!(elapsed = ?elapsed, "all done");
    Ok(())
}
