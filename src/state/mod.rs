//! Client-side auth session state.
//!
//! DESIGN
//! ======
//! `session` is the pure state machine, `controller` drives it against an
//! `AuthApi`, and `auth` is the context handle components consume.

pub mod auth;
pub mod controller;
pub mod session;

#[cfg(test)]
pub mod test_helpers;
