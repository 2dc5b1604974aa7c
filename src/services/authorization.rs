use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::Request;

use crate::models::UWA_SCHEME;
use crate::providers::StructuredLogger;
use crate::utils::error::{AppError, Result};

/// Anything able to produce an `Authorization` header value for a request.
pub trait AuthorizationProvider: Send + Sync {
    fn authorization_header_for(&self, method: &str, url: &str, body: &[u8]) -> Result<String>;
}

/// Signs `request` in place, replacing any existing `Authorization` header.
///
/// The body has to be buffered: a streaming body cannot be digested before
/// it is sent, so it is rejected.
pub fn authorize_request(provider: &dyn AuthorizationProvider, request: &mut Request) -> Result<()> {
    let body: &[u8] = match request.body() {
        Some(body) => body
            .as_bytes()
            .ok_or_else(|| AppError::invalid_body("streaming request bodies cannot be signed"))?,
        None => &[],
    };

    let header = provider.authorization_header_for(request.method().as_str(), request.url().as_str(), body)?;
    let value = HeaderValue::from_str(&header)
        .map_err(|e| AppError::invalid_header(format!("header value is not valid: {}", e)))?;

    if let Some(existing) = request.headers().get(AUTHORIZATION) {
        if !is_uwa_header(existing) {
            StructuredLogger::log_warning(
                &format!(
                    "Replacing non-UWA Authorization header on {} {}",
                    request.method(),
                    request.url()
                ),
                None,
                None,
            );
        }
    }

    request.headers_mut().insert(AUTHORIZATION, value);
    Ok(())
}

fn is_uwa_header(value: &HeaderValue) -> bool {
    value
        .to_str()
        .ok()
        .and_then(|value| value.strip_prefix(UWA_SCHEME))
        .is_some_and(|rest| rest.starts_with(' '))
}
