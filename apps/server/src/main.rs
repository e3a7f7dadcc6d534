use anyhow::Context;
use bizhub::domain::config::{ApiConfig, LoggingConfig};
use bizhub::kernel::config::load_config;
use bizhub_logger::{LevelFilter, Logger};
use bizhub_server::Server;
use std::str::FromStr;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg: ApiConfig = load_config(Some("server")).context("Critical: Configuration is malformed")?;

    let _log = init_logger(&cfg.logging)?;

    Server::builder().config(cfg).build()?.run().await
}

fn init_logger(cfg: &LoggingConfig) -> anyhow::Result<Logger> {
    let level = LevelFilter::from_str(&cfg.level)
        .with_context(|| format!("Invalid log level '{}'", cfg.level))?;

    let mut builder =
        Logger::builder().name(env!("CARGO_PKG_NAME")).level(level).console(cfg.console);
    if let Some(filter) = &cfg.filter {
        builder = builder.env_filter(filter);
    }

    let logger = match &cfg.directory {
        Some(directory) => {
            builder.directory(directory).max_files(cfg.max_files).json(cfg.json).init()?
        },
        None => builder.init()?,
    };
    Ok(logger)
}
