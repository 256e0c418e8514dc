//! # auth-provider
//!
//! Leptos + WASM client-side auth session. `AuthProvider` refreshes the
//! access token from the ambient refresh cookie, fetches the authenticated
//! user, and exposes both to descendants through `AuthContext`.
//!
//! The session rules live in `state::session` as a plain state machine;
//! `state::controller` drives it over the `AuthApi` seam so the whole flow can
//! be exercised without a browser.

pub mod app;
pub mod components;
pub mod config;
pub mod error;
pub mod net;
pub mod pages;
pub mod state;

/// WASM entry point: hydrate the server-rendered shell.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Debug) {
        leptos::logging::warn!("console logger already installed: {e}");
    }
    leptos::mount::hydrate_body(app::App);
}
