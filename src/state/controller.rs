//! Drives the auth session against an [`AuthApi`].
//!
//! SYSTEM CONTEXT
//! ==============
//! `AuthProvider` owns one controller per mount. Every state change is
//! published as a [`Session`] snapshot to the observer, which the provider
//! mirrors into signals.
//!
//! DESIGN
//! ======
//! `sync` is a reconciliation loop: it looks at the current session and runs
//! whichever fetch is enabled and not yet settled, until nothing is left to
//! do. The refresh fetch is enabled while no usable token exists; the profile
//! fetch is keyed on the token. Concurrent `sync` calls are safe because each
//! fetch goes through a [`QueryCell`], which drops duplicate and superseded
//! requests.
//!
//! Single-threaded: state sits in `RefCell`s and no borrow is held across an
//! `.await`.

#[cfg(test)]
#[path = "controller_test.rs"]
mod controller_test;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::config::AuthConfig;
use crate::net::api::AuthApi;
use crate::net::query::QueryCell;
use crate::net::retry::with_retry;
use crate::state::session::{RefreshDerived, Session, SessionEvent};

type Observer = Rc<dyn Fn(&Session)>;

enum Step {
    Refresh,
    Profile(String),
    Done,
}

/// Owner of the session state for one provider mount.
pub struct SessionController<A> {
    api: A,
    config: AuthConfig,
    session: RefCell<Session>,
    refresh: RefCell<QueryCell<()>>,
    profile: RefCell<QueryCell<String>>,
    mounted: Cell<bool>,
    observer: RefCell<Option<Observer>>,
}

impl<A: AuthApi> SessionController<A> {
    pub fn new(api: A, config: AuthConfig) -> Self {
        Self {
            api,
            config,
            session: RefCell::new(Session::new()),
            refresh: RefCell::new(QueryCell::new()),
            profile: RefCell::new(QueryCell::new()),
            mounted: Cell::new(true),
            observer: RefCell::new(None),
        }
    }

    /// Register the callback that receives every published snapshot.
    pub fn set_observer(&self, observer: impl Fn(&Session) + 'static) {
        *self.observer.borrow_mut() = Some(Rc::new(observer));
    }

    pub fn snapshot(&self) -> Session {
        self.session.borrow().clone()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.get()
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Set the access token directly, bypassing the refresh flow.
    ///
    /// Clearing a usable token arms a new refresh cycle. Call [`Self::sync`]
    /// afterwards to run whatever fetch the new token enables.
    pub fn assign_access_token(&self, token: Option<String>) {
        if !self.is_mounted() {
            return;
        }
        let had_token = self.session.borrow().has_token();
        self.update(SessionEvent::TokenAssigned(token));
        if had_token && !self.session.borrow().has_token() {
            self.refresh.borrow_mut().invalidate();
        }
    }

    /// Run enabled fetches until the session settles.
    pub async fn sync(&self) {
        loop {
            match self.next_step() {
                Step::Refresh => self.run_refresh().await,
                Step::Profile(token) => self.run_profile(token).await,
                Step::Done => return,
            }
        }
    }

    /// Abandon in-flight fetches and stop publishing. Results that arrive
    /// afterwards are dropped.
    pub fn unmount(&self) {
        self.mounted.set(false);
        self.refresh.borrow_mut().cancel();
        self.profile.borrow_mut().cancel();
        self.observer.borrow_mut().take();
    }

    fn next_step(&self) -> Step {
        if !self.is_mounted() {
            return Step::Done;
        }
        let session = self.session.borrow();
        match session.profile_key() {
            None if self.refresh.borrow().needs_fetch(&()) => Step::Refresh,
            None => Step::Done,
            Some(token) => {
                let token = token.to_owned();
                if self.profile.borrow().needs_fetch(&token) {
                    Step::Profile(token)
                } else {
                    Step::Done
                }
            }
        }
    }

    async fn run_refresh(&self) {
        let Some(ticket) = self.refresh.borrow_mut().begin(()) else {
            return;
        };
        self.update(SessionEvent::RefreshStarted);

        let api = &self.api;
        let result = with_retry(self.config.refresh_retry, move || api.refresh_access_token()).await;

        if !self.refresh.borrow_mut().finish(&ticket) {
            return;
        }
        match result {
            Ok(resp) => self.update(SessionEvent::RefreshCompleted(RefreshDerived::from_response(&resp))),
            Err(e) => {
                leptos::logging::error!("Error refreshing accessToken: {e}");
                self.update(SessionEvent::RefreshFailed);
            }
        }
    }

    async fn run_profile(&self, token: String) {
        let Some(ticket) = self.profile.borrow_mut().begin(token.clone()) else {
            return;
        };
        self.update(SessionEvent::ProfileStarted { token: token.clone() });

        let api = &self.api;
        let key = token.as_str();
        let result = with_retry(self.config.profile_retry, move || api.get_authenticated_user(key)).await;

        if !self.profile.borrow_mut().finish(&ticket) {
            return;
        }
        match result {
            Ok(resp) => self.update(SessionEvent::ProfileCompleted {
                token,
                status: resp.status,
                user: resp.into_data(),
            }),
            Err(e) => {
                leptos::logging::error!("Error fetching user: {e}");
                self.update(SessionEvent::ProfileFailed { token });
            }
        }
    }

    fn update(&self, event: SessionEvent) {
        let applied = self.session.borrow_mut().apply(event);
        if applied {
            self.publish();
        }
    }

    fn publish(&self) {
        let snapshot = self.snapshot();
        let observer = self.observer.borrow().clone();
        if let Some(observer) = observer {
            observer(&snapshot);
        }
    }
}
