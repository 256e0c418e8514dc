//! Reusable UI components.

pub mod auth_provider;
pub mod lazy_loader;
