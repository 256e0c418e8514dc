//! Networking modules for the auth endpoints.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` performs the HTTP calls, `types` defines the wire envelopes, and
//! `query`/`retry` provide the request bookkeeping the session controller
//! relies on.

pub mod api;
pub mod query;
pub mod retry;
pub mod types;
