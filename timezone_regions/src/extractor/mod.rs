mod shapefile_source;

pub use shapefile_source::ShapefileSource;

use crate::region::{Coordinate, PolygonRing, TimezoneId, TimezoneRegion};
use crate::registry::TimezoneRegistry;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// One decoded shape with its attribute row, attributes in column order.
/// The first attribute carries the timezone name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawShapeRecord {
    pub attributes: Vec<String>,
    pub points: Vec<Coordinate>,
}

impl RawShapeRecord {
    pub fn timezone_name(&self) -> &str {
        self.attributes.first().map(String::as_str).unwrap_or_default()
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ExtractionReport {
    pub records_read: usize,
    pub skipped_unknown_timezone: usize,
    pub skipped_degenerate_polygon: usize,
}

impl ExtractionReport {
    pub fn regions_emitted(&self) -> usize {
        self.records_read - self.skipped_unknown_timezone - self.skipped_degenerate_polygon
    }
}

pub struct Extractor {
    registry: Arc<dyn TimezoneRegistry>,
}

impl Extractor {
    pub fn new(registry: Arc<dyn TimezoneRegistry>) -> Self {
        Self { registry }
    }

    pub fn extract<I>(&self, records: I) -> anyhow::Result<Vec<TimezoneRegion>>
    where
        I: IntoIterator<Item = anyhow::Result<RawShapeRecord>>,
    {
        self.extract_with_report(records).map(|(regions, _)| regions)
    }

    /// Consumes `records` once, in order. Records with an unknown timezone
    /// name or a degenerate ring are left out; errors from the source abort
    /// the extraction.
    #[tracing::instrument(err, skip_all, level = "info")]
    pub fn extract_with_report<I>(
        &self,
        records: I,
    ) -> anyhow::Result<(Vec<TimezoneRegion>, ExtractionReport)>
    where
        I: IntoIterator<Item = anyhow::Result<RawShapeRecord>>,
    {
        let mut report = ExtractionReport::default();
        let mut regions = vec![];

        for record in records {
            let record = record?;
            report.records_read += 1;

            let timezone_id = match TimezoneId::try_from(record.timezone_name()) {
                Ok(id) if self.registry.is_valid_timezone(id.as_str()) => id,
                _ => {
                    debug!(name = record.timezone_name(), "Skipping unknown timezone");
                    report.skipped_unknown_timezone += 1;
                    continue;
                }
            };

            let polygon = match PolygonRing::try_from(record.points) {
                Ok(polygon) => polygon,
                Err(error) => {
                    warn!(timezone = %timezone_id, %error, "Skipping degenerate shape");
                    report.skipped_degenerate_polygon += 1;
                    continue;
                }
            };

            regions.push(TimezoneRegion {
                timezone_id,
                polygon,
            });
        }

        info!(
            records_read = report.records_read,
            skipped_unknown_timezone = report.skipped_unknown_timezone,
            skipped_degenerate_polygon = report.skipped_degenerate_polygon,
            regions = regions.len(),
            "Extracted timezone regions"
        );

        Ok((regions, report))
    }
}
