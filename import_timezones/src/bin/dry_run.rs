use import_timezones::{extract_regions, ExtractionSettings};
use itertools::Itertools;
use tracing::info;

/// Extracts the configured shapefile without touching the store.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _telemetry = shared_kernel::tracing::config_telemetry("import_timezones_dry_run")?;

    let settings = ExtractionSettings::parse()?;
    let (regions, report) = extract_regions(&settings.source)?;

    let timezones = regions
        .iter()
        .map(|region| region.timezone_id.as_str())
        .unique()
        .count();
    info!(
        records_read = report.records_read,
        regions = report.regions_emitted(),
        distinct_timezones = timezones,
        "Dry run finished"
    );
    Ok(())
}
