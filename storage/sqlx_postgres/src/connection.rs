use sqlx::postgres::PgConnectOptions;
use std::future::Future;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum ConnectionError {
    /// The requested topology cannot be used as configured.
    #[error("store configuration unavailable: {0}")]
    Configuration(String),
    #[error(transparent)]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for ConnectionError {
    fn from(error: sqlx::Error) -> Self {
        match error {
            sqlx::Error::Configuration(reason) => ConnectionError::Configuration(reason.to_string()),
            other => ConnectionError::Database(other),
        }
    }
}

/// Connects with `preferred`; only when that fails with a configuration
/// error is a single attempt made with `standalone`. Every other error is
/// returned as is.
pub async fn connect_with_fallback<T, F, Fut>(
    preferred: Result<PgConnectOptions, ConnectionError>,
    standalone: PgConnectOptions,
    connect: F,
) -> Result<T, ConnectionError>
where
    F: Fn(PgConnectOptions) -> Fut,
    Fut: Future<Output = Result<T, sqlx::Error>>,
{
    let attempt = match preferred {
        Ok(options) => connect(options).await.map_err(ConnectionError::from),
        Err(error) => Err(error),
    };

    match attempt {
        Err(ConnectionError::Configuration(reason)) => {
            warn!(%reason, "Cluster connection unavailable, using the standalone server");
            connect(standalone).await.map_err(ConnectionError::from)
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::{connect_with_fallback, ConnectionError};
    use sqlx::postgres::PgConnectOptions;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_configuration_errors_are_classified() {
        let error = ConnectionError::from(sqlx::Error::Configuration("unsupported".into()));
        assert!(matches!(error, ConnectionError::Configuration(_)));

        let error = ConnectionError::from(sqlx::Error::PoolTimedOut);
        assert!(matches!(error, ConnectionError::Database(_)));
    }

    #[tokio::test]
    async fn test_falls_back_once_when_preferred_topology_is_misconfigured() {
        let attempts = AtomicUsize::new(0);
        let result = connect_with_fallback(
            Ok(PgConnectOptions::new()),
            PgConnectOptions::new(),
            |_| {
                let attempt = attempts.fetch_add(1, Ordering::SeqCst);
                async move {
                    if attempt == 0 {
                        Err(sqlx::Error::Configuration("replica set not found".into()))
                    } else {
                        Ok(attempt)
                    }
                }
            },
        )
        .await;

        assert_eq!(result.unwrap(), 1);
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_falls_back_when_no_cluster_is_configured() {
        let attempts = AtomicUsize::new(0);
        let result = connect_with_fallback(
            Err(ConnectionError::Configuration("no cluster_url configured".to_owned())),
            PgConnectOptions::new(),
            |_| {
                attempts.fetch_add(1, Ordering::SeqCst);
                async { Ok::<_, sqlx::Error>("standalone") }
            },
        )
        .await;

        assert_eq!(result.unwrap(), "standalone");
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_other_errors_do_not_trigger_the_fallback() {
        let attempts = AtomicUsize::new(0);
        let result: Result<(), _> = connect_with_fallback(
            Ok(PgConnectOptions::new()),
            PgConnectOptions::new(),
            |_| {
                attempts.fetch_add(1, Ordering::SeqCst);
                async { Err(sqlx::Error::PoolTimedOut) }
            },
        )
        .await;

        assert!(matches!(result, Err(ConnectionError::Database(_))));
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_fallback_is_not_retried() {
        let attempts = AtomicUsize::new(0);
        let result: Result<(), _> = connect_with_fallback(
            Ok(PgConnectOptions::new()),
            PgConnectOptions::new(),
            |_| {
                attempts.fetch_add(1, Ordering::SeqCst);
                async { Err(sqlx::Error::Configuration("still misconfigured".into())) }
            },
        )
        .await;

        assert!(result.is_err());
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }
}
