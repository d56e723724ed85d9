//! # Quiz Front-end Library
//!
//! Lists and creates quiz questions on a backend API. Every backend call goes
//! through an authenticated fetch that attaches a metadata-service identity
//! token when one is available and silently sends the call without it otherwise.
//!
//! Modules:
//! - `config` — backend address, token audience, server and logging settings
//! - `sources` — identity token acquisition and the authenticated fetch wrapper
//! - `questions` — typed questions API client
//! - `server` — JSON front-end routes

pub mod config;
pub mod helpers;
pub mod observability;
pub mod questions;
pub mod server;
pub mod sources;
pub mod utils;

#[cfg(test)]
pub mod tests;

pub use crate::config::api::ApiConfig;
pub use crate::sources::fetch::{AuthedClient, FetchOptions};
pub use crate::sources::token::TokenOutcome;
