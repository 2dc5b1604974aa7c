pub mod error;
pub mod signature;

pub use error::*;
pub use signature::*;
