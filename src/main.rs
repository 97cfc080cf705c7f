use anyhow::Result;
use tracing::{debug, info, warn};
use tracing_subscriber::{fmt, EnvFilter};
use water_access::{
    analysis::sequential,
    config::{AnalysisConfig, AREA_COLUMN, DATASET_PATH, LOCATION_COLUMN},
    ingest::{self, IngestOptions},
};

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();

    // ─── 2) configure ────────────────────────────────────────────────
    let config = AnalysisConfig::default();
    config.validate()?;
    debug!(config = %serde_json::to_string(&config)?, "effective config");

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

    // ─── 4) analyse + report ─────────────────────────────────────────
    let summary = sequential::analyze(&dataset, &config);
    debug!(summary = %serde_json::to_string(&summary)?, "analysis finished");
    println!();
    print!("{}", summary);

    info!("all done");
    Ok(())
}
