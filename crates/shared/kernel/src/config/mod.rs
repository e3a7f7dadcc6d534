use bizhub_domain::constants::CONFIG_ENV_PREFIX;
use config::{Config, Environment, File};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::info;

const DEFAULT_CONFIG_FILE: &str = "server";

#[bizhub_derive::bizhub_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

/// Loads configuration from a file with environment overrides.
///
/// 1. **Base file**: `path` (default `server`, any extension `config` understands, e.g.
///    `server.toml`). A missing file is tolerated so a deployment can run on defaults and
///    environment variables alone.
/// 2. **Environment**: variables prefixed with `BIZHUB__`, nested with `__`
///    (`BIZHUB__SERVER__PORT=8080` maps to `server.port`).
///
/// # Errors
/// Returns [`ConfigError::Config`] if the file is malformed or the merged values do not
/// deserialize into `T`.
///
/// # Example
/// ```rust
/// use bizhub_kernel::config::load_config;
///
/// #[derive(Default, serde::Deserialize)]
/// struct AppConfig {
///     port: u16,
/// }
///
/// let cfg: AppConfig = load_config(Some("config/local")).unwrap_or_default();
/// ```
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let path = path.map_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE), |p| p.as_ref().to_path_buf());

    info!(path = %path.display(), "Loading configuration");

    Config::builder()
        .add_source(File::from(path.as_path()).required(false))
        .add_source(
            Environment::with_prefix(CONFIG_ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .context("Failed to build config")?
        .try_deserialize::<T>()
        .context("Failed to deserialize config")
}

#[cfg(test)]
mod tests {
    use super::*;
    use bizhub_domain::config::ApiConfig;
    use std::fs;

    #[test]
    fn loads_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("server.toml");
        fs::write(
            &file,
            r#"
                [server]
                port = 9100

                [logging]
                level = "debug"

                [[entitlements.requirements]]
                group = "orders"
                requires = ["ORDERS.CORE"]
            "#,
        )
        .unwrap();

        let cfg: ApiConfig = load_config(Some(&file)).unwrap();
        assert_eq!(cfg.server.port, 9100);
        assert_eq!(cfg.logging.level, "debug");
        assert_eq!(cfg.entitlements.requirements.len(), 1);
        assert_eq!(cfg.entitlements.requirements[0].requires, ["ORDERS.CORE"]);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg: ApiConfig = load_config(Some(dir.path().join("absent.toml"))).unwrap();
        assert_eq!(cfg.server.port, 4680);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("broken.toml");
        fs::write(&file, "[server]\nport = \"not a number\"\n").unwrap();

        let err = load_config::<ApiConfig>(Some(&file)).unwrap_err();
        assert!(err.to_string().contains("Failed to deserialize config"), "{err}");
    }
}
