//! Auth context handed to components below `AuthProvider`.
//!
//! SYSTEM CONTEXT
//! ==============
//! Route components read the session through `use_auth()` instead of touching
//! the controller. Reads are signals; the only write is `set_access_token`.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use leptos::prelude::*;

use crate::net::types::UserProfile;
use crate::state::session::{Session, SessionPhase};

/// Writable mirror of a [`Session`] snapshot, owned by the provider.
#[derive(Clone, Copy, Debug)]
pub struct SessionSignals {
    access_token: RwSignal<Option<String>>,
    user: RwSignal<Option<UserProfile>>,
    loading: RwSignal<bool>,
    phase: RwSignal<SessionPhase>,
}

impl SessionSignals {
    pub fn new(initial: &Session) -> Self {
        Self {
            access_token: RwSignal::new(initial.access_token().map(str::to_owned)),
            user: RwSignal::new(initial.user().cloned()),
            loading: RwSignal::new(initial.shows_loader()),
            phase: RwSignal::new(initial.phase()),
        }
    }

    /// Copy `session` into the signals, notifying only fields that changed.
    pub fn mirror(&self, session: &Session) {
        if self.access_token.with_untracked(|t| t.as_deref() != session.access_token()) {
            self.access_token.set(session.access_token().map(str::to_owned));
        }
        if self.user.with_untracked(|u| u.as_ref() != session.user()) {
            self.user.set(session.user().cloned());
        }
        if self.loading.get_untracked() != session.shows_loader() {
            self.loading.set(session.shows_loader());
        }
        if self.phase.get_untracked() != session.phase() {
            self.phase.set(session.phase());
        }
    }

    pub fn loading(&self) -> ReadSignal<bool> {
        self.loading.read_only()
    }
}

/// Read/write handle to the auth session.
#[derive(Clone, Copy)]
pub struct AuthContext {
    access_token: ReadSignal<Option<String>>,
    user: ReadSignal<Option<UserProfile>>,
    loading: ReadSignal<bool>,
    phase: ReadSignal<SessionPhase>,
    setter: Callback<Option<String>>,
}

impl AuthContext {
    pub fn new(signals: &SessionSignals, setter: Callback<Option<String>>) -> Self {
        Self {
            access_token: signals.access_token.read_only(),
            user: signals.user.read_only(),
            loading: signals.loading.read_only(),
            phase: signals.phase.read_only(),
            setter,
        }
    }

    pub fn access_token(&self) -> ReadSignal<Option<String>> {
        self.access_token
    }

    /// Replace the access token, e.g. after an explicit login. A usable token
    /// triggers a profile fetch keyed on it; `None` starts a new refresh.
    pub fn set_access_token(&self, token: Option<String>) {
        self.setter.run(token);
    }

    pub fn user(&self) -> ReadSignal<Option<UserProfile>> {
        self.user
    }

    /// Whether the initial refresh is still holding back rendering.
    pub fn is_loading(&self) -> ReadSignal<bool> {
        self.loading
    }

    pub fn phase(&self) -> ReadSignal<SessionPhase> {
        self.phase
    }
}

/// The auth context provided by the nearest `AuthProvider`.
///
/// # Panics
///
/// Panics when called outside an `AuthProvider`.
pub fn use_auth() -> AuthContext {
    expect_context::<AuthContext>()
}
