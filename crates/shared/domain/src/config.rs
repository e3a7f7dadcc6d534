use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};
use std::ops::{Deref, DerefMut};
use std::path::PathBuf;
use std::sync::Arc;

/// Top-level API configuration shared across services.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfigInner {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub entitlements: EntitlementsConfig,
}

/// Thin Arc-wrapped config for inexpensive cloning into subsystems.
#[derive(Default, Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(flatten, default)]
    inner: Arc<ApiConfigInner>,
}

impl Deref for ApiConfig {
    type Target = ApiConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for ApiConfig {
    fn deref_mut(&mut self) -> &mut ApiConfigInner {
        Arc::make_mut(&mut self.inner)
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub address: IpAddr,
    pub port: u16,
    pub ssl: Option<SslConfig>,
    /// Accept `x-actor-id` / `x-tenant-id` / `x-actor-role` headers as the authenticated
    /// principal. Only enable behind a gateway that strips these headers from client requests.
    pub trusted_identity_headers: bool,
}

/// TLS certificate/key paths.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SslConfig {
    pub cert: PathBuf,
    pub key: PathBuf,
}

/// Logging output settings consumed by the server binary.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default level (`trace`, `debug`, `info`, `warn`, `error`).
    pub level: String,
    /// Extra filter directives, e.g. `bizhub_entitlements=debug`.
    pub filter: Option<String>,
    pub console: bool,
    /// Rolling log files are written here when set.
    pub directory: Option<PathBuf>,
    pub json: bool,
    pub max_files: usize,
}

/// Entitlement engine settings.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EntitlementsConfig {
    /// JSON catalog file; the built-in standard catalog is used when absent.
    pub catalog_path: Option<PathBuf>,
    /// Capability requirements attached to gated operations.
    pub requirements: Vec<RequirementConfig>,
}

/// One capability declaration.
///
/// Without `operation` the entry applies to the whole `group`; with it, the entry applies to
/// that single operation and overrides the group entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RequirementConfig {
    pub group: String,
    #[serde(default)]
    pub operation: Option<String>,
    pub requires: Vec<String>,
}

// --- Default ---

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 4680,
            ssl: None,
            trusted_identity_headers: false,
        }
    }
}

impl Default for SslConfig {
    fn default() -> Self {
        Self { cert: PathBuf::from("cert.pem"), key: PathBuf::from("key.pem") }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            filter: None,
            console: true,
            directory: None,
            json: false,
            max_files: 14,
        }
    }
}
