pub mod clock;
pub mod logging;
pub mod nonce;

pub use clock::{Clock, FixedClock, SystemClock};
pub use logging::StructuredLogger;
pub use nonce::{FixedNonce, NonceSource, UuidNonceSource};
