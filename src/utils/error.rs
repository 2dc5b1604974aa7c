use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("HTTP request error: {0}")]
    HttpRequest(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Missing credential: {field} must not be empty")]
    MissingCredential { field: String },

    #[error("Invalid credential: {message}")]
    InvalidCredential { message: String },

    #[error("Invalid request body: {message}")]
    InvalidBody { message: String },

    #[error("Invalid authorization header: {message}")]
    InvalidHeader { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Logging initialization error: {0}")]
    LoggingInit(#[from] tracing_appender::rolling::InitError),

    #[error("HMAC error: {0}")]
    Hmac(#[from] hmac::digest::InvalidLength),
}

impl AppError {
    pub fn missing_credential(field: impl Into<String>) -> Self {
        Self::MissingCredential {
            field: field.into(),
        }
    }

    pub fn invalid_credential(message: impl Into<String>) -> Self {
        Self::InvalidCredential {
            message: message.into(),
        }
    }

    pub fn invalid_body(message: impl Into<String>) -> Self {
        Self::InvalidBody {
            message: message.into(),
        }
    }

    pub fn invalid_header(message: impl Into<String>) -> Self {
        Self::InvalidHeader {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
