use std::fmt;
use std::sync::Arc;

use crate::config::UwaConfig;
use crate::models::{AuthorizationHeader, Credentials, SigningInput, SigningRequest};
use crate::providers::{Clock, NonceSource, SystemClock, UuidNonceSource};
use crate::services::AuthorizationProvider;
use crate::utils::error::Result;
use crate::utils::{decode_secret, sign_input, BodyEncoding};

/// Signing bound to one set of credentials.
///
/// The shared secret is decoded once in [`UwaAuth::new`]; afterwards the
/// context is immutable and can be cloned or shared across threads freely.
#[derive(Clone)]
pub struct UwaAuth {
    store_key: String,
    secret_key: Arc<[u8]>,
    body_encoding: BodyEncoding,
    clock: Arc<dyn Clock>,
    nonce_source: Arc<dyn NonceSource>,
}

impl UwaAuth {
    pub fn new(credentials: &Credentials) -> Result<Self> {
        let secret_key = decode_secret(credentials.shared_secret())?;

        Ok(Self {
            store_key: credentials.store_key().to_string(),
            secret_key: secret_key.into(),
            body_encoding: BodyEncoding::default(),
            clock: Arc::new(SystemClock),
            nonce_source: Arc::new(UuidNonceSource),
        })
    }

    pub fn from_config(config: &UwaConfig) -> Result<Self> {
        let auth = Self::new(&config.credentials()?)?;
        Ok(auth.with_body_encoding(config.body_encoding))
    }

    pub fn with_body_encoding(mut self, body_encoding: BodyEncoding) -> Self {
        self.body_encoding = body_encoding;
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn with_nonce_source(mut self, nonce_source: impl NonceSource + 'static) -> Self {
        self.nonce_source = Arc::new(nonce_source);
        self
    }

    pub fn store_key(&self) -> &str {
        &self.store_key
    }

    pub fn body_encoding(&self) -> BodyEncoding {
        self.body_encoding
    }

    /// Fills a missing timestamp from the clock and a missing nonce from
    /// the nonce source. Supplied values are kept as they are.
    pub fn resolve(&self, request: SigningRequest) -> SigningInput {
        let timestamp = request.timestamp.unwrap_or_else(|| self.clock.now_unix());
        let nonce = request.nonce.unwrap_or_else(|| self.nonce_source.generate());

        SigningInput {
            method: request.method,
            url: request.url,
            body: request.body,
            timestamp,
            nonce,
        }
    }

    pub fn sign(&self, request: SigningRequest) -> Result<AuthorizationHeader> {
        let input = self.resolve(request);
        sign_input(&self.store_key, &self.secret_key, &input, self.body_encoding)
    }

    /// Returns the `Authorization` header value for one request.
    pub fn authorization_header(
        &self,
        method: &str,
        url: &str,
        body: &[u8],
        timestamp: Option<i64>,
        nonce: Option<&str>,
    ) -> Result<String> {
        let request = SigningRequest {
            method: method.to_string(),
            url: url.to_string(),
            body: body.to_vec(),
            timestamp,
            nonce: nonce.map(str::to_string),
        };

        Ok(self.sign(request)?.to_string())
    }
}

impl AuthorizationProvider for UwaAuth {
    fn authorization_header_for(&self, method: &str, url: &str, body: &[u8]) -> Result<String> {
        self.authorization_header(method, url, body, None, None)
    }
}

impl fmt::Debug for UwaAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UwaAuth")
            .field("store_key", &self.store_key)
            .field("secret_key", &"<redacted>")
            .field("body_encoding", &self.body_encoding)
            .finish_non_exhaustive()
    }
}
