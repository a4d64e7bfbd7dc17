use serde::Deserialize;
use shared_kernel::configuration::config;
use sqlx_postgres::configuration::DbSettings;
use std::path::PathBuf;
use std::sync::Arc;
use timezone_regions::extractor::ShapefileSource;
use timezone_regions::loader::DEFAULT_BATCH_SIZE;
use timezone_regions::{ExtractionReport, Extractor, IanaTimezoneRegistry, TimezoneRegion};

#[derive(Debug, Deserialize)]
pub struct SourceSettings {
    pub shapefile: PathBuf,
}

#[derive(Debug, Deserialize)]
pub struct LoaderSettings {
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub database: DbSettings,
    pub source: SourceSettings,
    pub loader: LoaderSettings,
}

#[derive(Debug, Deserialize)]
pub struct ExtractionSettings {
    pub source: SourceSettings,
}

impl Settings {
    pub fn parse() -> anyhow::Result<Self> {
        config::<Settings>()
    }
}

impl ExtractionSettings {
    pub fn parse() -> anyhow::Result<Self> {
        config::<ExtractionSettings>()
    }
}

/// Reads every region of the configured shapefile.
pub fn extract_regions(
    source: &SourceSettings,
) -> anyhow::Result<(Vec<TimezoneRegion>, ExtractionReport)> {
    let mut shapefile = ShapefileSource::open(&source.shapefile)?;
    Extractor::new(Arc::new(IanaTimezoneRegistry)).extract_with_report(shapefile.records())
}
