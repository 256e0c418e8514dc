//! Wire-shaped DTOs for the auth endpoints.
//!
//! DESIGN
//! ======
//! Both endpoints wrap their payload as `{ "data": ... }`. The HTTP status is
//! kept next to the decoded body because session state only changes on an
//! exact 200.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};

/// Status code that is allowed to change session state.
pub const STATUS_OK: u16 = 200;

/// `{ "data": T }` wrapper used by the auth API.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

/// A successful (2xx) response: status plus the decoded envelope, if any.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiResponse<T> {
    pub status: u16,
    /// `None` for empty or undecodable bodies (e.g. `204 No Content`).
    pub body: Option<Envelope<T>>,
}

impl<T> ApiResponse<T> {
    pub fn new(status: u16, data: T) -> Self {
        Self { status, body: Some(Envelope { data }) }
    }

    pub fn empty(status: u16) -> Self {
        Self { status, body: None }
    }

    /// Payload inside the envelope.
    pub fn data(&self) -> Option<&T> {
        self.body.as_ref().map(|envelope| &envelope.data)
    }

    pub fn into_data(self) -> Option<T> {
        self.body.map(|envelope| envelope.data)
    }

    pub fn is_ok(&self) -> bool {
        self.status == STATUS_OK
    }
}

/// Payload of the refresh-token endpoint.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshPayload {
    #[serde(rename = "accessToken", default)]
    pub access_token: Option<String>,
}

impl ApiResponse<RefreshPayload> {
    /// The access token carried by a refresh response, if present.
    pub fn access_token(&self) -> Option<&str> {
        self.data().and_then(|payload| payload.access_token.as_deref())
    }
}

/// Authenticated user profile. The session treats it as opaque JSON.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserProfile(pub serde_json::Value);

impl UserProfile {
    /// Top-level string field, e.g. `name` or `email`.
    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(serde_json::Value::as_str)
    }
}

impl From<serde_json::Value> for UserProfile {
    fn from(value: serde_json::Value) -> Self {
        Self(value)
    }
}
