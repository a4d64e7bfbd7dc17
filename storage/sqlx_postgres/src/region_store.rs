use crate::repository::Repository;
use anyhow::Context;
use async_trait::async_trait;
use timezone_regions::{Coordinate, TimezoneDocument, TimezoneRegionStore};

#[async_trait]
impl TimezoneRegionStore for Repository {
    #[tracing::instrument(err, skip(self), level = "info")]
    async fn delete_all(&self) -> anyhow::Result<u64> {
        let result = sqlx::query("DELETE FROM timezone.regions")
            .execute(self.pool())
            .await
            .context("Failed to delete timezone regions")?;

        Ok(result.rows_affected())
    }

    #[tracing::instrument(err, skip_all, fields(documents = documents.len()), level = "debug")]
    async fn insert_many(&self, documents: &[TimezoneDocument]) -> anyhow::Result<()> {
        let mut timezone_ids = Vec::with_capacity(documents.len());
        let mut bodies = Vec::with_capacity(documents.len());
        let mut shapes = Vec::with_capacity(documents.len());
        for document in documents {
            timezone_ids.push(document.timezone_id.clone());
            bodies.push(serde_json::to_string(document).context("Failed to serialize document")?);
            shapes.push(
                serde_json::to_string(&document.spatial_geometry()?)
                    .context("Failed to serialize geometry")?,
            );
        }

        sqlx::query(
            "
            INSERT INTO timezone.regions (timezone_id, document, geometry)
            SELECT input.timezone_id, input.document::jsonb, ST_GeomFromGeoJSON(input.shape)::geography
            FROM UNNEST($1::text[], $2::text[], $3::text[]) AS input(timezone_id, document, shape)
            ",
        )
        .bind(timezone_ids)
        .bind(bodies)
        .bind(shapes)
        .execute(self.pool())
        .await
        .context("Failed to insert timezone regions")?;

        Ok(())
    }

    #[tracing::instrument(err, skip(self), level = "info")]
    async fn ensure_spatial_index(&self) -> anyhow::Result<()> {
        sqlx::query(
            "CREATE INDEX IF NOT EXISTS regions_geometry_idx ON timezone.regions USING GIST (geometry)",
        )
        .execute(self.pool())
        .await
        .context("Failed to create spatial index")?;

        Ok(())
    }
}

impl Repository {
    /// Stored documents, in insertion order.
    pub async fn documents(&self) -> anyhow::Result<Vec<TimezoneDocument>> {
        let bodies = sqlx::query_scalar::<_, String>(
            "SELECT document::text FROM timezone.regions ORDER BY id",
        )
        .fetch_all(self.pool())
        .await
        .context("Failed to fetch timezone regions")?;

        bodies
            .iter()
            .map(|body| serde_json::from_str(body).context("Invalid stored document"))
            .collect()
    }

    /// Timezone ids of every region covering `point`.
    #[tracing::instrument(err, skip(self), level = "debug")]
    pub async fn timezones_at(&self, point: Coordinate) -> anyhow::Result<Vec<String>> {
        sqlx::query_scalar::<_, String>(
            "
            SELECT timezone_id FROM timezone.regions
            WHERE ST_Covers(geometry, ST_SetSRID(ST_MakePoint($1, $2), 4326)::geography)
            ORDER BY timezone_id
            ",
        )
        .bind(point.x)
        .bind(point.y)
        .fetch_all(self.pool())
        .await
        .context("Failed to look up timezone")
    }
}

#[cfg(test)]
mod tests {
    use crate::repository::Repository;
    use std::sync::Arc;
    use timezone_regions::{
        Coordinate, Extractor, IanaTimezoneRegistry, Loader, RawShapeRecord,
    };

    fn record(name: &str, points: &[(f64, f64)]) -> anyhow::Result<RawShapeRecord> {
        Ok(RawShapeRecord {
            attributes: vec![name.to_owned()],
            points: points.iter().copied().map(Coordinate::from).collect(),
        })
    }

    fn records() -> Vec<anyhow::Result<RawShapeRecord>> {
        vec![
            record("America/New_York", &[(-74.0, 40.0), (-73.0, 41.0), (-72.0, 40.0)]),
            record("uninhabited", &[(0.0, 0.0), (1.0, 1.0), (1.0, 0.0)]),
            record("Europe/London", &[(-1.0, 51.0), (0.0, 52.0), (0.0, 51.0)]),
        ]
    }

    #[tokio::test]
    #[ignore = "needs a PostGIS server configured in configuration/base.yaml"]
    async fn test_regions_round_trip_and_are_queryable_by_point() {
        let repository = Repository::new_test_repo().await;
        let extractor = Extractor::new(Arc::new(IanaTimezoneRegistry));
        let loader = Loader::new(Arc::new(repository.clone()));

        let regions = extractor.extract(records()).unwrap();
        loader.load(regions.clone()).await.unwrap();
        let summary = loader.load(regions.clone()).await.unwrap();
        assert_eq!(summary.deleted, 2);

        let documents = repository.documents().await.unwrap();
        assert_eq!(documents.len(), 2);
        for (document, region) in documents.iter().zip(&regions) {
            assert_eq!(document.timezone_id, region.timezone_id.as_str());
            assert_eq!(document.polygon(), region.polygon.points());
        }

        let found = repository
            .timezones_at(Coordinate { x: -73.0, y: 40.5 })
            .await
            .unwrap();
        assert_eq!(found, vec!["America/New_York"]);

        let indexes = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM pg_indexes WHERE schemaname = 'timezone' AND indexname = 'regions_geometry_idx'",
        )
        .fetch_one(repository.pool())
        .await
        .unwrap();
        assert_eq!(indexes, 1);
    }
}
