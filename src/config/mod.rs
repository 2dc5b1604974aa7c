use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::models::Credentials;
use crate::utils::error::Result;
use crate::utils::BodyEncoding;

pub const PROD_BASE_URL: &str = "https://api.urb-it.com/v2/";
pub const STAGE_BASE_URL: &str = "https://stage-api.urb-it.com/v2/";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub uwa: UwaConfig,
    #[serde(default)]
    pub webclient: WebClientConfig,
    #[serde(default)]
    pub logger: Option<LoggerConfig>,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct UwaConfig {
    pub store_key: String,
    pub shared_secret: String,
    #[serde(default)]
    pub stage: bool,
    /// Overrides the stage/production URL selection.
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub body_encoding: BodyEncoding,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebClientConfig {
    pub timeout: u64,
    pub connect_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggerConfig {
    pub dir: String,
    pub file_name: String,
    #[serde(default)]
    pub max_backups: u32,
}

impl Default for WebClientConfig {
    fn default() -> Self {
        Self {
            timeout: 15,
            connect_timeout: 15,
        }
    }
}

impl std::fmt::Debug for UwaConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UwaConfig")
            .field("store_key", &self.store_key)
            .field("shared_secret", &"<redacted>")
            .field("stage", &self.stage)
            .field("base_url", &self.base_url)
            .field("body_encoding", &self.body_encoding)
            .finish()
    }
}

impl UwaConfig {
    pub fn base_url(&self) -> &str {
        match &self.base_url {
            Some(url) => url.as_str(),
            None if self.stage => STAGE_BASE_URL,
            None => PROD_BASE_URL,
        }
    }

    pub fn credentials(&self) -> Result<Credentials> {
        Credentials::new(self.store_key.clone(), self.shared_secret.clone())
    }
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        Self::load_from("config.yaml")
    }

    /// Reads `path`, then lets `APP_*` variables override it
    /// (`APP_UWA__STORE_KEY`, `APP_UWA__STAGE`, ...).
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    pub fn credentials(&self) -> Result<Credentials> {
        self.uwa.credentials()
    }
}
