use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Directory for daily rotated log files; `None` logs to stderr
    pub log_dir: Option<PathBuf>,
    /// File name prefix inside `log_dir`
    pub file_name: String,
    /// Filter used when `RUST_LOG` is not set
    pub default_filter: String,
    /// Emit JSON lines instead of plain text
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_dir: None,
            file_name: "permissions.log".to_string(),
            default_filter: "info".to_string(),
            json: false,
        }
    }
}

impl LoggingConfig {
    pub fn with_log_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.log_dir = Some(dir.into());
        self
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.default_filter = filter.into();
        self
    }

    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }
}

/// Initialize the logging system
///
/// Can only succeed once per process; later calls return an error.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    // Default to the configured level, can be overridden with RUST_LOG env var
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.default_filter));

    let registry = tracing_subscriber::registry().with(env_filter);

    match &config.log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let file_appender = RollingFileAppender::new(Rotation::DAILY, dir, &config.file_name);
            let layer = fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true)
                .with_line_number(true);
            if config.json {
                registry.with(layer.json()).try_init()?;
            } else {
                registry.with(layer).try_init()?;
            }
            tracing::info!(
                "Log files location: {}",
                dir.join(&config.file_name).display()
            );
        }
        None => {
            let layer = fmt::layer().with_writer(std::io::stderr).with_target(true);
            if config.json {
                registry.with(layer.json()).try_init()?;
            } else {
                registry.with(layer).try_init()?;
            }
        }
    }

    tracing::info!("Logging system initialized");
    Ok(())
}

/// Check if the configured logs directory exists
pub fn logs_dir_exists(config: &LoggingConfig) -> bool {
    config.log_dir.as_deref().is_some_and(Path::exists)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LoggingConfig::default();
        assert_eq!(config.log_dir, None);
        assert_eq!(config.default_filter, "info");
        assert!(!logs_dir_exists(&config));
    }

    #[test]
    fn test_logs_dir_exists() {
        let dir = tempfile::tempdir().unwrap();
        let config = LoggingConfig::default().with_log_dir(dir.path());
        assert!(logs_dir_exists(&config));

        let missing = LoggingConfig::default().with_log_dir(dir.path().join("missing"));
        assert!(!logs_dir_exists(&missing));
    }

    #[test]
    fn test_config_from_json() {
        let config: LoggingConfig =
            serde_json::from_str(r#"{ "log_dir": "logs", "json": true }"#).unwrap();
        assert_eq!(config.log_dir, Some(PathBuf::from("logs")));
        assert!(config.json);
        assert_eq!(config.file_name, "permissions.log");
    }
}
