// REST boundary: token sources, the HTTP client, and response normalisation.
pub mod auth;
pub mod envelope;
pub mod http;

pub use auth::{NoAuth, SessionToken, StaticToken, TokenSource};
pub use envelope::{error_message, normalize, Envelope};
pub use http::ApiClient;
