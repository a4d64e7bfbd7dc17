use anyhow::Context;
use serde::de::DeserializeOwned;
use std::path::PathBuf;

const CONFIGURATION_DIRECTORY_VAR: &str = "APP_CONFIGURATION_DIRECTORY";

fn configuration_directory() -> anyhow::Result<PathBuf> {
    if let Ok(directory) = std::env::var(CONFIGURATION_DIRECTORY_VAR) {
        return Ok(PathBuf::from(directory));
    }
    let base_path = std::env::current_dir().context("Failed to determine the current directory")?;
    Ok(base_path.join("configuration"))
}

/// Loads `Settings` from `configuration/base.yaml` (`test.yaml` in tests),
/// overridden by `APP_` prefixed environment variables,
/// e.g. `APP_DATABASE__HOST=db.internal`.
pub fn config<Settings: DeserializeOwned>() -> anyhow::Result<Settings> {
    let configuration_directory = configuration_directory()?;
    let file = if cfg!(test) { "test.yaml" } else { "base.yaml" };
    let settings = config::Config::builder()
        .add_source(config::File::from(configuration_directory.join(file)))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()
        .with_context(|| {
            format!(
                "Failed to build configuration from {}",
                configuration_directory.display()
            )
        })?;

    settings
        .try_deserialize::<Settings>()
        .context("Failed to deserialize settings")
}

#[cfg(test)]
mod tests {
    use super::config;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct LoaderSettings {
        batch_size: usize,
    }

    #[derive(Deserialize)]
    struct Settings {
        loader: LoaderSettings,
    }

    #[test]
    fn test_settings_are_read_from_the_test_configuration_file() {
        let settings = config::<Settings>().unwrap();
        assert_eq!(settings.loader.batch_size, 2)
    }
}
