use serde_json::Value;
use tracing::Level;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::writer::MakeWriterExt;

use crate::config::LoggerConfig;
use crate::utils::error::{AppError, Result};

pub struct StructuredLogger;

impl StructuredLogger {
    /// Installs the global JSON subscriber. ERROR events also go to a daily
    /// (UTC) rolling `<file_name>.<date>.error.log` when a logger config is given.
    pub fn init(level: &str, logger_config: Option<LoggerConfig>) -> Result<()> {
        let filter = match level.to_lowercase().as_str() {
            "error" => "error",
            "warn" => "warn",
            "info" => "info",
            "debug" => "debug",
            "trace" => "trace",
            _ => "info",
        };

        let installed = if let Some(config) = logger_config {
            std::fs::create_dir_all(&config.dir)?;

            let mut builder = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .filename_prefix(config.file_name.as_str())
                .filename_suffix("error.log");
            if config.max_backups > 0 {
                builder = builder.max_log_files(config.max_backups as usize);
            }
            let error_file_writer = builder.build(&config.dir)?.with_max_level(Level::ERROR);

            tracing_subscriber::fmt()
                .json()
                .with_env_filter(filter)
                .with_writer(std::io::stdout.and(error_file_writer))
                .try_init()
        } else {
            tracing_subscriber::fmt()
                .json()
                .with_env_filter(filter)
                .try_init()
        };

        installed.map_err(|e| AppError::configuration(format!("failed to install logger: {}", e)))
    }

    pub fn log_error(error: &str, unique_id: Option<&str>, request_id: Option<&str>) {
        let (unique_id, request_id) = Self::ids(unique_id, request_id);
        tracing::error!("uniqueId" = unique_id, "x-request-id" = request_id, "{}", error);
    }

    pub fn log_info(
        message: &str,
        unique_id: Option<&str>,
        request_id: Option<&str>,
        additional_data: Option<Value>,
    ) {
        let (unique_id, request_id) = Self::ids(unique_id, request_id);
        match additional_data {
            Some(data) => tracing::info!(
                "uniqueId" = unique_id,
                "x-request-id" = request_id,
                data = %data,
                "{}",
                message
            ),
            None => tracing::info!("uniqueId" = unique_id, "x-request-id" = request_id, "{}", message),
        }
    }

    pub fn log_warning(message: &str, unique_id: Option<&str>, request_id: Option<&str>) {
        let (unique_id, request_id) = Self::ids(unique_id, request_id);
        tracing::warn!("uniqueId" = unique_id, "x-request-id" = request_id, "{}", message);
    }

    fn ids<'a>(unique_id: Option<&'a str>, request_id: Option<&'a str>) -> (&'a str, &'a str) {
        let unique_id = unique_id.unwrap_or("MAIN");
        (unique_id, request_id.unwrap_or(unique_id))
    }
}
