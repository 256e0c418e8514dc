//! Auth session state machine.
//!
//! SYSTEM CONTEXT
//! ==============
//! The controller feeds fetch lifecycle events into [`Session::apply`]; the
//! provider mirrors the resulting snapshot into signals. All state rules live
//! here so they can be tested without a reactive runtime.
//!
//! INVARIANTS
//! ==========
//! - `access_token` only changes from a refresh result with status 200, a
//!   refresh failure (forced to `None`), or an explicit assignment.
//! - `user` only changes from a profile result with status 200 for the
//!   current token.
//! - `profile_key` is `None` unless the token is a non-empty string.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use crate::net::types::{ApiResponse, RefreshPayload, STATUS_OK, UserProfile};

/// Where the session is in its refresh → profile lifecycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SessionPhase {
    #[default]
    Idle,
    RefreshingToken,
    TokenReady,
    FetchingProfile,
    Ready,
    RefreshFailed,
    ProfileFetchFailed,
}

/// The part of a refresh response the session depends on.
///
/// The session reads only these two values, never the response object.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RefreshDerived {
    pub status: u16,
    pub access_token: Option<String>,
}

impl RefreshDerived {
    pub fn from_response(resp: &ApiResponse<RefreshPayload>) -> Self {
        Self {
            status: resp.status,
            access_token: resp.access_token().map(str::to_owned),
        }
    }
}

/// Fetch lifecycle inputs to the state machine.
#[derive(Clone, Debug, PartialEq)]
pub enum SessionEvent {
    RefreshStarted,
    RefreshCompleted(RefreshDerived),
    RefreshFailed,
    /// Token set directly by a consumer, bypassing the refresh flow.
    TokenAssigned(Option<String>),
    ProfileStarted { token: String },
    ProfileCompleted { token: String, status: u16, user: Option<UserProfile> },
    ProfileFailed { token: String },
}

/// Snapshot of the auth session.
#[derive(Clone, Debug, PartialEq)]
pub struct Session {
    phase: SessionPhase,
    access_token: Option<String>,
    user: Option<UserProfile>,
    refresh_pending: bool,
    /// Set once any refresh result (success or failure) has arrived.
    refresh_settled: bool,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether `token` can authorize a profile fetch.
pub fn is_usable_token(token: Option<&str>) -> bool {
    token.is_some_and(|t| !t.is_empty())
}

impl Session {
    /// A freshly mounted session: no token, refresh about to start.
    pub fn new() -> Self {
        Self {
            phase: SessionPhase::Idle,
            access_token: None,
            user: None,
            refresh_pending: true,
            refresh_settled: false,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    pub fn user(&self) -> Option<&UserProfile> {
        self.user.as_ref()
    }

    pub fn refresh_pending(&self) -> bool {
        self.refresh_pending
    }

    pub fn has_token(&self) -> bool {
        is_usable_token(self.access_token())
    }

    /// Key for the profile fetch; `None` keeps the fetch disabled.
    pub fn profile_key(&self) -> Option<&str> {
        self.access_token().filter(|t| !t.is_empty())
    }

    /// Whether the provider renders the loading placeholder instead of its
    /// children.
    ///
    /// Only the refresh fetch gates rendering, and only until its first
    /// result; a pending profile fetch never does.
    pub fn shows_loader(&self) -> bool {
        let refreshing_over_token = self.refresh_pending && self.has_token();
        refreshing_over_token || self.refresh_pending
    }

    fn is_current(&self, token: &str) -> bool {
        self.profile_key() == Some(token)
    }

    /// Apply `event`. Returns `false` when a stale profile event was ignored.
    pub fn apply(&mut self, event: SessionEvent) -> bool {
        match event {
            SessionEvent::RefreshStarted => {
                self.phase = SessionPhase::RefreshingToken;
                // Later cycles run in the background; only the first one gates.
                self.refresh_pending = !self.refresh_settled;
            }
            SessionEvent::RefreshCompleted(derived) => {
                self.refresh_pending = false;
                self.refresh_settled = true;
                if derived.status != STATUS_OK {
                    self.phase = SessionPhase::RefreshFailed;
                    return true;
                }
                self.access_token = derived.access_token;
                self.phase = if self.has_token() {
                    SessionPhase::TokenReady
                } else {
                    SessionPhase::RefreshFailed
                };
            }
            SessionEvent::RefreshFailed => {
                self.refresh_pending = false;
                self.refresh_settled = true;
                self.access_token = None;
                self.phase = SessionPhase::RefreshFailed;
            }
            SessionEvent::TokenAssigned(token) => {
                self.access_token = token;
                self.phase = if self.has_token() {
                    SessionPhase::TokenReady
                } else {
                    SessionPhase::Idle
                };
            }
            SessionEvent::ProfileStarted { token } => {
                if !self.is_current(&token) {
                    return false;
                }
                self.phase = SessionPhase::FetchingProfile;
            }
            SessionEvent::ProfileCompleted { token, status, user } => {
                if !self.is_current(&token) {
                    return false;
                }
                if status == STATUS_OK {
                    self.user = user;
                    self.phase = SessionPhase::Ready;
                } else {
                    self.phase = SessionPhase::ProfileFetchFailed;
                }
            }
            SessionEvent::ProfileFailed { token } => {
                if !self.is_current(&token) {
                    return false;
                }
                self.phase = SessionPhase::ProfileFetchFailed;
            }
        }
        true
    }
}
