//! # Logger
//!
//! Central tracing setup for `BizHub` binaries.
//!
//! * Console output (compact, ANSI) and/or a rolling log file written through a
//!   non-blocking worker.
//! * File output can be switched to JSON lines for log shippers.
//! * `RUST_LOG` always applies; [`LoggerBuilder::env_filter`] sets a programmatic default
//!   such as `"bizhub_entitlements=debug,tower_http=info"`.
//!
//! ## Example
//!
//! ```rust
//! # use bizhub_logger::{Logger, LevelFilter};
//! let _logger = Logger::builder()
//!     .name("bizhub-server")
//!     .console(true)
//!     .level(LevelFilter::DEBUG)
//!     .init()
//!     .unwrap();
//! ```

mod error;

pub use crate::error::{LoggerError, LoggerErrorExt};
pub use tracing::level_filters::LevelFilter;
pub use tracing_appender::rolling::Rotation;

use std::fs;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::fmt::layer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

const DEFAULT_MAX_FILES: usize = 14;
const LOG_FILE_SUFFIX: &str = "log";

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

#[derive(Debug)]
struct LoggerConfig {
    console: bool,
    directory: Option<PathBuf>,
    level: LevelFilter,
    rotation: Rotation,
    max_files: usize,
    json: bool,
    env_filter: Option<String>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            console: true,
            directory: None,
            level: LevelFilter::INFO,
            rotation: Rotation::DAILY,
            max_files: DEFAULT_MAX_FILES,
            json: false,
            env_filter: None,
        }
    }
}

mod state {
    pub trait Sealed {}

    #[derive(Debug)]
    pub struct Unnamed;
    #[derive(Debug)]
    pub struct Named(pub(crate) String);
    #[derive(Debug)]
    pub struct ConsoleOnly;
    #[derive(Debug)]
    pub struct WithFile;

    impl Sealed for Unnamed {}
    impl Sealed for Named {}
    impl Sealed for ConsoleOnly {}
    impl Sealed for WithFile {}
}

pub use state::{ConsoleOnly, Named, Unnamed, WithFile};
use state::Sealed;

/// Builder for the global tracing subscriber.
///
/// A name is mandatory before [`LoggerBuilder::init`] becomes available; file-only options
/// unlock after [`LoggerBuilder::directory`].
#[derive(Debug)]
pub struct LoggerBuilder<N: Sealed = Unnamed, F: Sealed = ConsoleOnly> {
    config: LoggerConfig,
    name: N,
    output: PhantomData<F>,
}

impl<F: Sealed> LoggerBuilder<Unnamed, F> {
    /// Names the logger. The name prefixes rolling log files.
    pub fn name(self, name: impl Into<String>) -> LoggerBuilder<Named, F> {
        LoggerBuilder { config: self.config, name: Named(name.into()), output: PhantomData }
    }
}

impl LoggerBuilder<Named, WithFile> {
    /// Maximum number of rotated files kept on disk.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn max_files(mut self, max: usize) -> Self {
        self.config.max_files = max;
        self
    }

    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn rotation(mut self, rotation: Rotation) -> Self {
        self.config.rotation = rotation;
        self
    }

    /// Writes file output as JSON lines.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn json(mut self, enabled: bool) -> Self {
        self.config.json = enabled;
        self
    }
}

impl<F: Sealed> LoggerBuilder<Named, F> {
    /// Minimum level used when neither `RUST_LOG` nor an explicit filter matches.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn level(mut self, level: LevelFilter) -> Self {
        self.config.level = level;
        self
    }

    /// Programmatic filter directives; invalid directives fail [`LoggerBuilder::init`].
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub fn env_filter(mut self, filter: impl Into<String>) -> Self {
        self.config.env_filter = Some(filter.into());
        self
    }

    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn console(mut self, enabled: bool) -> Self {
        self.config.console = enabled;
        self
    }

    /// Enables file output into `directory`.
    pub fn directory(self, directory: impl Into<PathBuf>) -> LoggerBuilder<Named, WithFile> {
        let mut config = self.config;
        config.directory = Some(directory.into());
        LoggerBuilder { config, name: self.name, output: PhantomData }
    }

    /// Installs the global subscriber.
    ///
    /// Keep the returned [`Logger`] alive for the lifetime of the process; dropping it stops
    /// the background file writer.
    ///
    /// # Errors
    /// * [`LoggerError::InvalidConfiguration`] for an empty name, `max_files == 0`, an invalid
    ///   filter, or when no output is enabled.
    /// * [`LoggerError::Appender`] if the rolling file appender cannot be created.
    /// * [`LoggerError::Subscriber`] if a global subscriber is already installed.
    pub fn init(self) -> Result<Logger, LoggerError> {
        let Self { config, name: Named(name), .. } = self;
        validate(&config, &name)?;

        let filter = env_filter(&config)?;
        let mut layers: Vec<BoxedLayer> = Vec::new();

        if config.console {
            layers.push(layer().compact().with_ansi(true).boxed());
        }

        let guard = match &config.directory {
            Some(directory) => {
                let (file_layer, guard) = file_layer(&config, &name, directory)?;
                layers.push(file_layer);
                Some(guard)
            },
            None => None,
        };

        if layers.is_empty() {
            return Err(LoggerError::InvalidConfiguration {
                message: "No logging output enabled; enable the console or a log directory".into(),
                context: None,
            });
        }

        tracing_subscriber::registry().with(layers).with(filter).try_init()?;

        Ok(Logger { name, guard })
    }
}

/// Handle to the installed logging system.
#[must_use = "Dropping this handle will stop background logging threads."]
#[derive(Debug)]
pub struct Logger {
    name: String,
    guard: Option<WorkerGuard>,
}

impl Logger {
    /// Starts configuring the global subscriber.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder { config: LoggerConfig::default(), name: Unnamed, output: PhantomData }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns `true` when file output is active.
    #[must_use]
    pub const fn writes_files(&self) -> bool {
        self.guard.is_some()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if self.guard.is_some() {
            tracing::info!(logger = %self.name, "Logging system shutting down, flushing buffers");
        }
    }
}

fn validate(config: &LoggerConfig, name: &str) -> Result<(), LoggerError> {
    if name.trim().is_empty() {
        return Err(LoggerError::InvalidConfiguration {
            message: "Logger name cannot be empty".into(),
            context: None,
        });
    }
    if config.max_files == 0 {
        return Err(LoggerError::InvalidConfiguration {
            message: "max_files must be greater than zero".into(),
            context: None,
        });
    }
    Ok(())
}

fn env_filter(config: &LoggerConfig) -> Result<EnvFilter, LoggerError> {
    let builder = EnvFilter::builder().with_default_directive(config.level.into());
    match &config.env_filter {
        None => Ok(builder.from_env_lossy()),
        Some(directives) => {
            builder.parse(directives).map_err(|e| LoggerError::InvalidConfiguration {
                message: format!("Invalid env filter '{directives}': {e}").into(),
                context: None,
            })
        },
    }
}

fn file_layer(
    config: &LoggerConfig,
    name: &str,
    directory: &Path,
) -> Result<(BoxedLayer, WorkerGuard), LoggerError> {
    fs::create_dir_all(directory).map_err(|e| LoggerError::Internal {
        message: e.to_string().into(),
        context: Some(format!("Failed to create log directory {}", directory.display()).into()),
    })?;

    let appender = RollingFileAppender::builder()
        .rotation(config.rotation.clone())
        .filename_prefix(name)
        .filename_suffix(LOG_FILE_SUFFIX)
        .max_log_files(config.max_files)
        .build(directory)
        .context("Building rolling file appender")?;

    let (writer, guard) = tracing_appender::non_blocking(appender);
    let base = layer().with_writer(writer).with_ansi(false);
    let boxed = if config.json { base.json().boxed() } else { base.boxed() };

    Ok((boxed, guard))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults() {
        let builder = Logger::builder().name("test-app").env_filter("bizhub=debug");
        assert!(builder.config.console);
        assert_eq!(builder.config.level, LevelFilter::INFO);
        assert_eq!(builder.config.env_filter.as_deref(), Some("bizhub=debug"));
        assert!(builder.config.directory.is_none());
    }

    #[test]
    fn builder_file_options() {
        let builder = Logger::builder()
            .name("test-app")
            .level(LevelFilter::DEBUG)
            .directory("/tmp/bizhub-logs")
            .max_files(3)
            .json(true);

        assert_eq!(builder.config.level, LevelFilter::DEBUG);
        assert_eq!(builder.config.max_files, 3);
        assert!(builder.config.json);
        assert_eq!(builder.config.directory.as_deref(), Some(std::path::Path::new("/tmp/bizhub-logs")));
    }

    #[test]
    fn rejects_blank_name_before_touching_the_subscriber() {
        let err = Logger::builder().name("  ").init().unwrap_err();
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));
    }

    #[test]
    fn rejects_invalid_filter() {
        let err = Logger::builder().name("filters").env_filter("bizhub=notalevel").init().unwrap_err();
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));
    }

    #[test]
    fn rejects_no_output() {
        let err = Logger::builder().name("silent").console(false).init().unwrap_err();
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));
    }
}
