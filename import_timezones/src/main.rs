use import_timezones::{extract_regions, Settings};
use sqlx_postgres::repository::Repository;
use std::sync::Arc;
use timezone_regions::Loader;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _telemetry = shared_kernel::tracing::config_telemetry("import_timezones")?;
    start().await
}

async fn start() -> anyhow::Result<()> {
    let settings = Settings::parse()?;

    let (regions, _) = extract_regions(&settings.source)?;

    let repository = Repository::connect(&settings.database).await?;
    let result = Loader::new(Arc::new(repository.clone()))
        .with_batch_size(settings.loader.batch_size)
        .load(regions)
        .await;
    repository.close().await;

    result.map(|_| ())
}
