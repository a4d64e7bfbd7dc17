use crate::connection::ConnectionError;
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use serde_aux::field_attributes::deserialize_number_from_string;
use shared_kernel::configuration::config;
use sqlx::postgres::{PgConnectOptions, PgSslMode};
use std::str::FromStr;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub database: DbSettings,
}

impl Settings {
    pub fn parse() -> anyhow::Result<Self> {
        config::<Settings>()
    }
}

type DbName = String;

#[derive(Debug, Deserialize)]
pub struct DbSettings {
    host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    port: u16,
    username: String,
    password: Secret<String>,
    database_name: DbName,
    require_ssl: bool,
    /// Connection URL of the replicated cluster, preferred when present.
    #[serde(default)]
    cluster_url: Option<Secret<String>>,
}

impl DbSettings {
    pub fn without_db(&self) -> PgConnectOptions {
        let ssl_mode = if self.require_ssl {
            PgSslMode::Require
        } else {
            PgSslMode::Prefer
        };
        PgConnectOptions::new()
            .host(&self.host)
            .username(&self.username)
            .password(self.password.expose_secret())
            .port(self.port)
            .ssl_mode(ssl_mode)
    }

    /// Standalone server built from the individual connection fields.
    pub fn standalone(&self) -> PgConnectOptions {
        self.without_db().database(&self.database_name)
    }

    pub fn cluster(&self) -> Result<PgConnectOptions, ConnectionError> {
        let url = self.cluster_url.as_ref().ok_or_else(|| {
            ConnectionError::Configuration("no cluster_url configured".to_owned())
        })?;
        PgConnectOptions::from_str(url.expose_secret()).map_err(ConnectionError::from)
    }
}
