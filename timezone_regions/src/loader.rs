use crate::document::TimezoneDocument;
use crate::region::TimezoneRegion;
use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use std::sync::Arc;
use tracing::info;

pub const DEFAULT_BATCH_SIZE: usize = 500;

/// The collection holding timezone region documents.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait TimezoneRegionStore: Send + Sync {
    /// Removes every stored document, returning how many were removed.
    async fn delete_all(&self) -> anyhow::Result<u64>;

    async fn insert_many(&self, documents: &[TimezoneDocument]) -> anyhow::Result<()>;

    /// Creates the spherical spatial index on the geometry if it is missing.
    async fn ensure_spatial_index(&self) -> anyhow::Result<()>;
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LoadSummary {
    pub deleted: u64,
    pub inserted: usize,
}

pub struct Loader {
    store: Arc<dyn TimezoneRegionStore>,
    batch_size: usize,
}

impl Loader {
    pub fn new(store: Arc<dyn TimezoneRegionStore>) -> Self {
        Self {
            store,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Replaces the stored dataset with `regions` and makes sure the spatial
    /// index exists. Not transactional: a failure after the delete leaves the
    /// collection empty or partially loaded.
    #[tracing::instrument(err, skip_all, fields(regions = regions.len()), level = "info")]
    pub async fn load(&self, regions: Vec<TimezoneRegion>) -> anyhow::Result<LoadSummary> {
        let deleted = self.store.delete_all().await?;

        let documents = regions
            .into_iter()
            .map(TimezoneDocument::from)
            .collect::<Vec<_>>();
        for batch in documents.chunks(self.batch_size) {
            self.store.insert_many(batch).await?;
        }

        self.store.ensure_spatial_index().await?;

        let summary = LoadSummary {
            deleted,
            inserted: documents.len(),
        };
        info!(
            deleted = summary.deleted,
            inserted = summary.inserted,
            "Replaced timezone regions"
        );
        Ok(summary)
    }
}
