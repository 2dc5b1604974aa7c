use uuid::Uuid;

/// Generates the per-request nonce when the caller did not pick one.
///
/// Implementations only produce values; nothing here remembers or rejects
/// nonces that were used before.
pub trait NonceSource: Send + Sync {
    fn generate(&self) -> String;
}

/// Random RFC 4122 version 4 UUIDs in lower-case hyphenated form.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidNonceSource;

impl NonceSource for UuidNonceSource {
    fn generate(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedNonce(pub String);

impl FixedNonce {
    pub fn new(nonce: impl Into<String>) -> Self {
        Self(nonce.into())
    }
}

impl NonceSource for FixedNonce {
    fn generate(&self) -> String {
        self.0.clone()
    }
}
