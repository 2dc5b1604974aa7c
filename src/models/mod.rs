use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::utils::error::{AppError, Result};

/// Authorization scheme name sent in front of the header fields.
pub const UWA_SCHEME: &str = "UWA";

/// Store key and base64 shared secret issued to an API caller.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    store_key: String,
    shared_secret: String,
}

impl Credentials {
    pub fn new(store_key: impl Into<String>, shared_secret: impl Into<String>) -> Result<Self> {
        let store_key = store_key.into();
        let shared_secret = shared_secret.into();

        if store_key.is_empty() {
            return Err(AppError::missing_credential("store_key"));
        }

        if shared_secret.is_empty() {
            return Err(AppError::missing_credential("shared_secret"));
        }

        if store_key.contains(':') {
            return Err(AppError::invalid_credential("store key must not contain ':'"));
        }

        Ok(Self {
            store_key,
            shared_secret,
        })
    }

    pub fn store_key(&self) -> &str {
        &self.store_key
    }

    pub fn shared_secret(&self) -> &str {
        &self.shared_secret
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("store_key", &self.store_key)
            .field("shared_secret", &"<redacted>")
            .finish()
    }
}

/// Fully resolved inputs of a single signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningInput {
    pub method: String,
    pub url: String,
    pub body: Vec<u8>,
    pub timestamp: i64,
    pub nonce: String,
}

impl SigningInput {
    pub fn new(
        method: impl Into<String>,
        url: impl Into<String>,
        body: impl Into<Vec<u8>>,
        timestamp: i64,
        nonce: impl Into<String>,
    ) -> Self {
        Self {
            method: method.into(),
            url: url.into(),
            body: body.into(),
            timestamp,
            nonce: nonce.into(),
        }
    }
}

/// A request about to be signed.
///
/// `timestamp` defaults to the current Unix time and `nonce` to a fresh v4
/// UUID when left as `None`; see [`crate::services::UwaAuth::resolve`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SigningRequest {
    pub method: String,
    pub url: String,
    pub body: Vec<u8>,
    pub timestamp: Option<i64>,
    pub nonce: Option<String>,
}

impl SigningRequest {
    pub fn new(method: impl Into<String>, url: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        Self {
            method: method.into(),
            url: url.into(),
            body: body.into(),
            timestamp: None,
            nonce: None,
        }
    }

    pub fn with_timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// The nonce ends up in a colon separated header, so signing rejects
    /// nonces that are empty or contain `:`.
    pub fn with_nonce(mut self, nonce: impl Into<String>) -> Self {
        self.nonce = Some(nonce.into());
        self
    }
}

/// `UWA <store_key>:<signature>:<nonce>:<timestamp>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationHeader {
    pub store_key: String,
    pub signature: String,
    pub nonce: String,
    pub timestamp: i64,
}

impl fmt::Display for AuthorizationHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}:{}:{}:{}",
            UWA_SCHEME, self.store_key, self.signature, self.nonce, self.timestamp
        )
    }
}

impl FromStr for AuthorizationHeader {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self> {
        let fields = value
            .strip_prefix(UWA_SCHEME)
            .and_then(|rest| rest.strip_prefix(' '))
            .ok_or_else(|| AppError::invalid_header("expected the UWA scheme"))?;

        let parts: Vec<&str> = fields.split(':').collect();
        let [store_key, signature, nonce, timestamp] = parts.as_slice() else {
            return Err(AppError::invalid_header(format!(
                "expected 4 colon separated fields, found {}",
                parts.len()
            )));
        };

        if [store_key, signature, nonce, timestamp].iter().any(|part| part.is_empty()) {
            return Err(AppError::invalid_header("header fields must not be empty"));
        }

        let parsed_timestamp: i64 = timestamp
            .parse()
            .map_err(|_| AppError::invalid_header(format!("timestamp {:?} is not an integer", timestamp)))?;

        // The signed message uses the canonical decimal form; "+5" or "0005" never round-trip.
        if parsed_timestamp.to_string() != *timestamp {
            return Err(AppError::invalid_header(format!(
                "timestamp {:?} is not in canonical decimal form",
                timestamp
            )));
        }

        Ok(Self {
            store_key: store_key.to_string(),
            signature: signature.to_string(),
            nonce: nonce.to_string(),
            timestamp: parsed_timestamp,
        })
    }
}
