//! HTTP access to the auth endpoints.
//!
//! Client-side (hydrate): real HTTP calls via `gloo-net`.
//! Server-side (SSR): `AuthError::Unavailable`, since the refresh cookie only
//! exists in the browser.
//!
//! ERROR HANDLING
//! ==============
//! Non-2xx statuses become `AuthError::Status` so callers see the same split an
//! axios-style client gives: 2xx resolves with a status, anything else fails.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use std::future::Future;

#[cfg(any(test, feature = "hydrate"))]
use serde::de::DeserializeOwned;

use super::types::{ApiResponse, RefreshPayload, UserProfile};
#[cfg(any(test, feature = "hydrate"))]
use super::types::Envelope;
use crate::config::AuthConfig;
use crate::error::AuthError;

/// The two endpoints the session depends on.
///
/// The provider takes an implementation by value, so tests and alternative
/// transports can stand in for [`HttpAuthApi`].
pub trait AuthApi {
    /// Exchange ambient credentials (the refresh cookie) for an access token.
    fn refresh_access_token(&self) -> impl Future<Output = Result<ApiResponse<RefreshPayload>, AuthError>>;

    /// Fetch the profile of the user that owns `access_token`.
    fn get_authenticated_user(
        &self,
        access_token: &str,
    ) -> impl Future<Output = Result<ApiResponse<UserProfile>, AuthError>>;
}

/// [`AuthApi`] over `fetch`, configured by [`AuthConfig`].
#[derive(Clone, Debug, Default)]
pub struct HttpAuthApi {
    config: AuthConfig,
}

impl HttpAuthApi {
    pub fn new(config: AuthConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }
}

impl AuthApi for HttpAuthApi {
    async fn refresh_access_token(&self) -> Result<ApiResponse<RefreshPayload>, AuthError> {
        #[cfg(feature = "hydrate")]
        {
            let resp = gloo_net::http::Request::post(&self.config.refresh_url())
                .credentials(web_sys::RequestCredentials::Include)
                .send()
                .await
                .map_err(|e| AuthError::Transport(e.to_string()))?;
            read_response(resp).await
        }
        #[cfg(not(feature = "hydrate"))]
        {
            Err(AuthError::Unavailable)
        }
    }

    async fn get_authenticated_user(&self, access_token: &str) -> Result<ApiResponse<UserProfile>, AuthError> {
        #[cfg(feature = "hydrate")]
        {
            let resp = gloo_net::http::Request::get(&self.config.user_url())
                .header("Authorization", &bearer(access_token))
                .credentials(web_sys::RequestCredentials::Include)
                .send()
                .await
                .map_err(|e| AuthError::Transport(e.to_string()))?;
            read_response(resp).await
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = access_token;
            Err(AuthError::Unavailable)
        }
    }
}

#[cfg(feature = "hydrate")]
async fn read_response<T: DeserializeOwned>(resp: gloo_net::http::Response) -> Result<ApiResponse<T>, AuthError> {
    let status = resp.status();
    check_status(status)?;
    let text = resp
        .text()
        .await
        .map_err(|e| AuthError::Transport(e.to_string()))?;
    Ok(decode_body(status, &text))
}

#[cfg(any(test, feature = "hydrate"))]
fn bearer(access_token: &str) -> String {
    format!("Bearer {access_token}")
}

#[cfg(any(test, feature = "hydrate"))]
fn check_status(status: u16) -> Result<(), AuthError> {
    if (200..300).contains(&status) {
        Ok(())
    } else {
        Err(AuthError::Status(status))
    }
}

/// Decode a 2xx body. Empty or malformed bodies keep the status but carry no
/// envelope, which the session treats as "nothing to apply".
#[cfg(any(test, feature = "hydrate"))]
fn decode_body<T: DeserializeOwned>(status: u16, text: &str) -> ApiResponse<T> {
    if text.trim().is_empty() {
        return ApiResponse::empty(status);
    }
    match serde_json::from_str::<Envelope<T>>(text) {
        Ok(envelope) => ApiResponse { status, body: Some(envelope) },
        Err(e) => {
            leptos::logging::warn!("auth response body not decodable: {e}");
            ApiResponse::empty(status)
        }
    }
}
