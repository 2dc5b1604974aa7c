use std::borrow::Cow;

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, STANDARD};
use base64::engine::DecodePaddingMode;
use base64::Engine;
use hmac::{Hmac, Mac};
use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use tracing::debug;

use crate::models::{AuthorizationHeader, Credentials, SigningInput};
use crate::utils::error::{AppError, Result};

type HmacSha256 = Hmac<Sha256>;

/// Standard alphabet, padding optional. Secrets stored without `=` padding
/// by older SDK users still decode.
const SECRET_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// How request bodies (and the signed message) are turned into bytes
/// before hashing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyEncoding {
    /// Bytes must already be UTF-8 and are hashed unchanged.
    #[default]
    Utf8,
    /// Every byte is read as an ISO-8859-1 code point and re-encoded as
    /// UTF-8, matching older PHP SDK releases byte for byte. Valid UTF-8
    /// input is transcoded too.
    Latin1Legacy,
}

impl BodyEncoding {
    pub fn normalize<'a>(&self, bytes: &'a [u8]) -> Result<Cow<'a, [u8]>> {
        match self {
            BodyEncoding::Utf8 => {
                std::str::from_utf8(bytes)
                    .map_err(|e| AppError::invalid_body(format!("body is not valid UTF-8: {}", e)))?;
                Ok(Cow::Borrowed(bytes))
            }
            BodyEncoding::Latin1Legacy if bytes.is_ascii() => Ok(Cow::Borrowed(bytes)),
            BodyEncoding::Latin1Legacy => {
                let transcoded: String = bytes.iter().map(|&b| char::from(b)).collect();
                Ok(Cow::Owned(transcoded.into_bytes()))
            }
        }
    }
}

/// Base64 MD5 checksum of the body. An empty body yields an empty digest.
pub fn digest(body: &[u8], encoding: BodyEncoding) -> Result<String> {
    if body.is_empty() {
        return Ok(String::new());
    }

    let normalized = encoding.normalize(body)?;
    Ok(STANDARD.encode(Md5::digest(&*normalized)))
}

/// Builds the canonical string covered by the signature.
///
/// Fields are concatenated without separators in a fixed order: store key,
/// upper-cased method, lower-cased URL, timestamp, nonce, body digest.
/// Case folding is ASCII only and applies to the whole URL, query included.
pub fn message_to_sign(
    store_key: &str,
    method: &str,
    url: &str,
    timestamp: i64,
    nonce: &str,
    digest: &str,
) -> String {
    format!(
        "{}{}{}{}{}{}",
        store_key,
        method.to_ascii_uppercase(),
        url.to_ascii_lowercase(),
        timestamp,
        nonce,
        digest
    )
}

/// Decodes a base64 shared secret into raw key bytes.
pub fn decode_secret(secret_key_b64: &str) -> Result<Vec<u8>> {
    let key = SECRET_ENGINE
        .decode(secret_key_b64)
        .map_err(|e| AppError::invalid_credential(format!("shared secret is not valid base64: {}", e)))?;

    if key.is_empty() {
        return Err(AppError::missing_credential("shared_secret"));
    }

    Ok(key)
}

/// Signs `message` with a base64 encoded secret.
pub fn sign(secret_key_b64: &str, message: &str) -> Result<String> {
    let key = decode_secret(secret_key_b64)?;
    sign_with_key(&key, message.as_bytes())
}

/// Base64 HMAC-SHA256 of `message` under an already decoded key.
pub fn sign_with_key(key: &[u8], message: &[u8]) -> Result<String> {
    let mut mac = HmacSha256::new_from_slice(key)?;
    mac.update(message);

    Ok(STANDARD.encode(mac.finalize().into_bytes()))
}

/// Runs the whole pipeline (digest, message, signature) for one request.
pub fn sign_input(
    store_key: &str,
    key: &[u8],
    input: &SigningInput,
    encoding: BodyEncoding,
) -> Result<AuthorizationHeader> {
    // Header fields are colon separated; a colon here could never parse back.
    if store_key.contains(':') {
        return Err(AppError::invalid_header("store key must not contain ':'"));
    }
    if input.nonce.is_empty() || input.nonce.contains(':') {
        return Err(AppError::invalid_header("nonce must be non-empty and must not contain ':'"));
    }

    let body_digest = digest(&input.body, encoding)?;
    let message = message_to_sign(
        store_key,
        &input.method,
        &input.url,
        input.timestamp,
        &input.nonce,
        &body_digest,
    );
    let message_bytes = encoding.normalize(message.as_bytes())?;
    let signature = sign_with_key(key, &message_bytes)?;

    debug!(
        store_key = store_key,
        method = %input.method,
        timestamp = input.timestamp,
        nonce = %input.nonce,
        body_size = input.body.len(),
        "Signed UWA request"
    );

    Ok(AuthorizationHeader {
        store_key: store_key.to_string(),
        signature,
        nonce: input.nonce.clone(),
        timestamp: input.timestamp,
    })
}

/// Stateless form of header assembly: decodes the secret on every call.
pub fn authorization_header(
    credentials: &Credentials,
    input: &SigningInput,
    encoding: BodyEncoding,
) -> Result<AuthorizationHeader> {
    let key = decode_secret(credentials.shared_secret())?;
    sign_input(credentials.store_key(), &key, input, encoding)
}
