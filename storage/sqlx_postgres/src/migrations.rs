use anyhow::Context;
use sqlx::postgres::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct MigrationManager {
    pg_pool: Arc<PgPool>,
}

impl MigrationManager {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pg_pool: pool }
    }

    /// Creates the region collection (and the PostGIS extension) if missing.
    pub async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::migrate!()
            .run(self.pg_pool.as_ref())
            .await
            .context("Failed to run migration")
    }
}
