//! Typed calls for each API resource, as methods on [`AuthenticatedHttpClient`]
//!
//! [`AuthenticatedHttpClient`]: crate::auth_client::AuthenticatedHttpClient

mod admins;
mod auth;
mod events;
mod meetings;
mod secretariat;
