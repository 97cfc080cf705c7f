pub mod analysis;
pub mod config;
pub mod ingest;
pub mod report;
