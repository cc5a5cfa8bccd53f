//! Networking modules for the identity and blog REST APIs.
//!
//! SYSTEM CONTEXT
//! ==============
//! `transport` is the only place that touches the HTTP client; everything
//! above it builds typed `HttpRequest`s and reads `HttpResponse`s. `types`
//! defines the shared wire schema.

pub mod transport;
pub mod types;
