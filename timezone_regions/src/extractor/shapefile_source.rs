use crate::extractor::RawShapeRecord;
use crate::region::Coordinate;
use anyhow::Context;
use shapefile::dbase::{FieldValue, Record};
use shapefile::{Shape, ShapeReader};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::debug;

// dbase lists the record deletion marker alongside the real columns.
const DELETION_FLAG_FIELD: &str = "DeletionFlag";

/// Lazily reads shapes and their attribute rows from a `.shp`/`.dbf` pair.
pub struct ShapefileSource {
    path: PathBuf,
    reader: shapefile::Reader<BufReader<File>, BufReader<File>>,
    columns: Vec<String>,
}

impl ShapefileSource {
    #[tracing::instrument(err, level = "info")]
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        let shapes = ShapeReader::from_path(path)
            .with_context(|| format!("Failed to open shapefile {}", path.display()))?;

        let table_path = path.with_extension("dbf");
        let table = shapefile::dbase::Reader::from_path(&table_path)
            .with_context(|| format!("Failed to open attribute table {}", table_path.display()))?;

        // Rows come back keyed by name, so column order is only known from the header.
        let columns = table
            .fields()
            .iter()
            .map(|field| field.name().to_owned())
            .filter(|name| name != DELETION_FLAG_FIELD)
            .collect::<Vec<_>>();
        debug!(?columns, "Read attribute table header");

        Ok(Self {
            path: path.to_owned(),
            reader: shapefile::Reader::new(shapes, table),
            columns,
        })
    }

    /// One pass over the file, in file order.
    pub fn records(&mut self) -> impl Iterator<Item = anyhow::Result<RawShapeRecord>> + '_ {
        let path = &self.path;
        let columns = &self.columns;
        self.reader
            .iter_shapes_and_records()
            .map(move |shape_record| {
                let (shape, record) = shape_record
                    .with_context(|| format!("Failed to read a record from {}", path.display()))?;
                Ok(raw_record(&shape, &record, columns))
            })
    }
}

fn raw_record(shape: &Shape, record: &Record, columns: &[String]) -> RawShapeRecord {
    let attributes = columns
        .iter()
        .map(|column| record.get(column).map(text_value).unwrap_or_default())
        .collect();

    RawShapeRecord {
        attributes,
        points: shape_points(shape),
    }
}

fn text_value(value: &FieldValue) -> String {
    match value {
        FieldValue::Character(Some(text)) => text.trim().to_owned(),
        FieldValue::Memo(text) => text.trim().to_owned(),
        _ => String::new(),
    }
}

/// Every point of every ring, in file order. Non-polygon shapes have none.
fn shape_points(shape: &Shape) -> Vec<Coordinate> {
    match shape {
        Shape::Polygon(polygon) => polygon
            .rings()
            .iter()
            .flat_map(|ring| ring.points().iter().map(|p| Coordinate { x: p.x, y: p.y }))
            .collect(),
        Shape::PolygonM(polygon) => polygon
            .rings()
            .iter()
            .flat_map(|ring| ring.points().iter().map(|p| Coordinate { x: p.x, y: p.y }))
            .collect(),
        Shape::PolygonZ(polygon) => polygon
            .rings()
            .iter()
            .flat_map(|ring| ring.points().iter().map(|p| Coordinate { x: p.x, y: p.y }))
            .collect(),
        _ => vec![],
    }
}
