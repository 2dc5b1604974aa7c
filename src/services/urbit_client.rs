use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::Serialize;

use crate::config::{AppConfig, WebClientConfig};
use crate::providers::StructuredLogger;
use crate::services::{authorize_request, UwaAuth};
use crate::utils::error::Result;

/// Thin HTTP caller that attaches a fresh UWA header to every request.
///
/// Responses are handed back untouched: status handling and retries are up
/// to the caller.
#[derive(Clone)]
pub struct UrbitClient {
    client: Client,
    base_url: String,
    auth: UwaAuth,
}

impl UrbitClient {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let auth = UwaAuth::from_config(&config.uwa)?;
        Self::with_auth(&config.webclient, auth, config.uwa.base_url())
    }

    pub fn with_auth(webclient: &WebClientConfig, auth: UwaAuth, base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(webclient.timeout))
            .connect_timeout(Duration::from_secs(webclient.connect_timeout))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            auth,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn auth(&self) -> &UwaAuth {
        &self.auth
    }

    /// Absolute URL for `path` under the configured base URL.
    pub fn url_for(&self, path: &str) -> String {
        match (self.base_url.ends_with('/'), path.starts_with('/')) {
            (true, true) => format!("{}{}", self.base_url, &path[1..]),
            (false, false) if !path.is_empty() => format!("{}/{}", self.base_url, path),
            _ => format!("{}{}", self.base_url, path),
        }
    }

    pub async fn request(&self, method: Method, path: &str, body: Option<Vec<u8>>) -> Result<Response> {
        let mut builder = self.client.request(method, self.url_for(path));
        if let Some(body) = body {
            builder = builder.body(body);
        }

        self.send(builder).await
    }

    /// Serializes `payload` once so the signed digest covers exactly the
    /// bytes that go on the wire.
    pub async fn request_json<T: Serialize + ?Sized>(&self, method: Method, path: &str, payload: &T) -> Result<Response> {
        let body = serde_json::to_vec(payload)?;
        let builder = self
            .client
            .request(method, self.url_for(path))
            .header(CONTENT_TYPE, "application/json")
            .body(body);

        self.send(builder).await
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response> {
        let mut request = builder.build()?;

        if let Err(e) = authorize_request(&self.auth, &mut request) {
            StructuredLogger::log_error(
                &format!("Failed to sign {} {}: {}", request.method(), request.url(), e),
                None,
                None,
            );
            return Err(e);
        }

        StructuredLogger::log_info(
            &format!("Sending {} {}", request.method(), request.url()),
            None,
            None,
            Some(serde_json::json!({
                "store_key": self.auth.store_key(),
            })),
        );

        Ok(self.client.execute(request).await?)
    }
}
