//! Auth provider configuration.
//!
//! DESIGN
//! ======
//! Defaults match the server routes so most apps can use
//! `AuthConfig::default()`. A page can also embed the config as JSON; missing
//! fields fall back to the defaults.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};

/// Path of the refresh-token endpoint.
pub const DEFAULT_REFRESH_PATH: &str = "/api/auth/refresh";
/// Path of the authenticated-user endpoint.
pub const DEFAULT_USER_PATH: &str = "/api/auth/me";

/// How many times a failed request is re-attempted and how long to wait
/// between attempts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Additional attempts after the first failure.
    pub retries: u32,
    /// Delay before each retry, in milliseconds.
    pub delay_ms: u32,
}

impl RetryPolicy {
    /// Never retry.
    pub const NONE: Self = Self { retries: 0, delay_ms: 0 };

    pub fn new(retries: u32, delay_ms: u32) -> Self {
        Self { retries, delay_ms }
    }

    /// Total attempts including the first one.
    pub fn max_attempts(self) -> u32 {
        self.retries.saturating_add(1)
    }
}

/// Endpoint and retry settings for the auth session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Origin prefix for both endpoints; empty means same-origin.
    pub base_url: String,
    pub refresh_path: String,
    pub user_path: String,
    /// Retry policy for the refresh-token fetch.
    pub refresh_retry: RetryPolicy,
    /// Retry policy for the user-profile fetch.
    pub profile_retry: RetryPolicy,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            refresh_path: DEFAULT_REFRESH_PATH.to_owned(),
            user_path: DEFAULT_USER_PATH.to_owned(),
            refresh_retry: RetryPolicy::NONE,
            profile_retry: RetryPolicy::NONE,
        }
    }
}

impl AuthConfig {
    /// Parse a JSON config blob, e.g. one embedded in the page.
    ///
    /// # Errors
    ///
    /// Returns the serde error if `raw` is not a valid config object.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    #[must_use]
    pub fn with_refresh_path(mut self, path: impl Into<String>) -> Self {
        self.refresh_path = path.into();
        self
    }

    #[must_use]
    pub fn with_user_path(mut self, path: impl Into<String>) -> Self {
        self.user_path = path.into();
        self
    }

    #[must_use]
    pub fn with_refresh_retry(mut self, policy: RetryPolicy) -> Self {
        self.refresh_retry = policy;
        self
    }

    #[must_use]
    pub fn with_profile_retry(mut self, policy: RetryPolicy) -> Self {
        self.profile_retry = policy;
        self
    }

    /// Absolute or same-origin URL of the refresh endpoint.
    pub fn refresh_url(&self) -> String {
        join_url(&self.base_url, &self.refresh_path)
    }

    /// Absolute or same-origin URL of the authenticated-user endpoint.
    pub fn user_url(&self) -> String {
        join_url(&self.base_url, &self.user_path)
    }
}

fn join_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    if base.is_empty() {
        return path.to_owned();
    }
    if path.starts_with('/') {
        format!("{base}{path}")
    } else {
        format!("{base}/{path}")
    }
}
