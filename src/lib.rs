//! GrupoPaz Rust Client
//!
//! A client library for the GrupoPaz admin API: login, admin accounts,
//! events, meetings and the secretariat ledger, with bearer-token attachment
//! and a one-shot token refresh on authorization failure.

pub mod auth_client;
pub mod config;
pub mod error;
pub mod format;
pub mod request;
pub mod schedule;
pub mod services;
pub mod token;
pub mod token_store;
pub mod transport;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;

pub use auth_client::{
    AuthenticatedHttpClient, RefreshFailure, RefreshOutcome, SessionState, REFRESH_PATH,
};
pub use config::ClientConfig;
pub use error::{ClientError, Result};
pub use request::ApiRequest;
pub use token::{is_token_valid, is_token_valid_at};
pub use token_store::{FileStore, MemoryStore, SessionStore, TokenStore};
pub use transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport};
pub use types::*;
