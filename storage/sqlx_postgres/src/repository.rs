use crate::configuration::DbSettings;
use crate::connection::connect_with_fallback;
use crate::migrations::MigrationManager;
use anyhow::Context;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::sync::Arc;

/// Handle on the timezone region collection, scoped to one run.
#[derive(Clone)]
pub struct Repository {
    pg_pool: Arc<PgPool>,
}

impl Repository {
    pub fn pool(&self) -> &PgPool {
        self.pg_pool.as_ref()
    }

    /// Connects to the cluster, or to the standalone server when the cluster
    /// is not configured, and makes sure the region table exists.
    #[tracing::instrument(err, skip_all, level = "info")]
    pub async fn connect(settings: &DbSettings) -> anyhow::Result<Self> {
        let pg_pool = connect_with_fallback(settings.cluster(), settings.standalone(), |options| {
            PgPoolOptions::new()
                .max_connections(1)
                .connect_with(options)
        })
        .await
        .context("Failed to connect to DB")
        .map(Arc::new)?;

        MigrationManager::new(Arc::clone(&pg_pool)).migrate().await?;

        Ok(Self { pg_pool })
    }

    /// Waits for in-flight queries and closes every pooled connection.
    pub async fn close(self) {
        self.pg_pool.close().await
    }

    #[cfg(test)]
    pub(crate) async fn new_test_repo() -> Self {
        use crate::configuration::Settings;
        use sqlx::{Connection, Executor, PgConnection};
        use uuid::Uuid;

        let settings = Settings::parse().unwrap().database;
        let connection_options = settings.without_db();

        let mut connection = PgConnection::connect_with(&connection_options)
            .await
            .expect("Failed to connect to Postgres");

        let db_name = Uuid::new_v4();
        connection
            .execute(&*format!(r#"CREATE DATABASE "{}";"#, db_name))
            .await
            .expect("Failed to create database.");

        let connection_pool = PgPool::connect_with(connection_options.database(&db_name.to_string()))
            .await
            .map(Arc::new)
            .expect("Failed to connect to Postgres.");
        MigrationManager::new(Arc::clone(&connection_pool))
            .migrate()
            .await
            .expect("Failed to migrate the database");

        Self {
            pg_pool: connection_pool,
        }
    }
}
