use crate::region::{Coordinate, TimezoneRegion};
use anyhow::Context;
use geojson::{Geometry, Value};
use serde::{Deserialize, Serialize};

/// The stored shape of one timezone region: the id and a GeoJSON polygon
/// whose outer ring holds the coordinates exactly as they were read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimezoneDocument {
    pub timezone_id: String,
    pub geometry: Geometry,
}

impl TimezoneDocument {
    /// The coordinate pairs of `geometry.coordinates[0]`.
    pub fn polygon(&self) -> Vec<Coordinate> {
        match &self.geometry.value {
            Value::Polygon(rings) => rings
                .first()
                .map(|ring| {
                    ring.iter()
                        .filter_map(|position| match position.as_slice() {
                            [x, y, ..] => Some(Coordinate { x: *x, y: *y }),
                            _ => None,
                        })
                        .collect()
                })
                .unwrap_or_default(),
            _ => vec![],
        }
    }

    /// The geometry with its rings closed, as spatial indexes expect.
    pub fn spatial_geometry(&self) -> anyhow::Result<Geometry> {
        let polygon = geo_types::Polygon::<f64>::try_from(self.geometry.clone())
            .with_context(|| format!("{} does not hold a polygon", self.timezone_id))?;
        Ok(Geometry::new(Value::from(&polygon)))
    }
}

impl From<TimezoneRegion> for TimezoneDocument {
    fn from(region: TimezoneRegion) -> Self {
        let ring = region
            .polygon
            .points()
            .iter()
            .map(|point| vec![point.x, point.y])
            .collect();

        Self {
            timezone_id: region.timezone_id.into_inner(),
            geometry: Geometry::new(Value::Polygon(vec![ring])),
        }
    }
}
