//! # bloggy
//!
//! Client core for the Bloggy publishing platform: the session lifecycle
//! (login, silent token refresh, bearer-authenticated requests, route guarding)
//! and the incremental article list synchronizer used by the admin and public
//! article browsers.
//!
//! SYSTEM CONTEXT
//! ==============
//! `net` is the HTTP leaf, `auth` owns the persisted session on top of it,
//! `api` wraps the REST endpoints, and `articles` drives paginated lists over
//! an `api` source. Rendering is left to whatever UI consumes these types.

pub mod api;
pub mod articles;
pub mod auth;
pub mod config;
pub mod net;

#[cfg(test)]
pub(crate) mod test_helpers;
