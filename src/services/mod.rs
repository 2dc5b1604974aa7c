pub mod authorization;
pub mod urbit_client;
pub mod uwa_auth;

pub use authorization::{authorize_request, AuthorizationProvider};
pub use urbit_client::UrbitClient;
pub use uwa_auth::UwaAuth;
