// Client library for the maintenance backend.
// Everything that talks to the REST API, or owns state that outlives a
// single list page (session, language, stored preferences), lives here.

pub mod api;
pub mod config;
pub mod context;
pub mod data;
pub mod error;
pub mod i18n;
pub mod notice;
pub mod prefs;
pub mod services;

pub use context::{AppContext, Session};
pub use error::ClientError;
