//! Timezone boundary regions: extraction from shape records, normalization
//! into polygon documents and the replace-and-index load into a store.

pub mod document;
pub mod extractor;
pub mod loader;
pub mod region;
pub mod registry;

#[cfg(test)]
pub(crate) mod testing;

pub use document::TimezoneDocument;
pub use extractor::{ExtractionReport, Extractor, RawShapeRecord};
pub use loader::{LoadSummary, Loader, TimezoneRegionStore};
pub use region::{Coordinate, InvalidPolygon, PolygonRing, TimezoneId, TimezoneRegion};
pub use registry::{IanaTimezoneRegistry, TimezoneRegistry};
