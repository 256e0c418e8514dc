//! Provider that owns the auth session for its subtree.
//!
//! SYSTEM CONTEXT
//! ==============
//! Wrap the router in `AuthProvider`. On mount it refreshes the access token,
//! then fetches the authenticated user, and provides an `AuthContext` to every
//! descendant. Children are replaced by `LazyLoader` while the refresh is
//! pending.
//!
//! TRADE-OFFS
//! ==========
//! Fetches only run in the browser (effects do not run during SSR), so the
//! server always renders the loading placeholder.

#[cfg(test)]
#[path = "auth_provider_test.rs"]
mod auth_provider_test;

use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;

use leptos::prelude::*;

use crate::components::lazy_loader::LazyLoader;
use crate::config::AuthConfig;
use crate::net::api::AuthApi;
use crate::state::auth::{AuthContext, SessionSignals};
use crate::state::controller::SessionController;
use crate::state::session::Session;

/// Provides [`AuthContext`] to `children` and gates them on the token refresh.
#[component]
pub fn AuthProvider<A>(
    /// Endpoint implementation, usually `HttpAuthApi`.
    api: A,
    /// Retry settings; defaults to no retries.
    #[prop(optional)]
    config: Option<AuthConfig>,
    children: ChildrenFn,
) -> impl IntoView
where
    A: AuthApi + 'static,
{
    let controller = Rc::new(SessionController::new(api, config.unwrap_or_default()));
    let signals = SessionSignals::new(&controller.snapshot());
    controller.set_observer(move |session: &Session| signals.mirror(session));
    let controller = StoredValue::new_local(controller);

    let set_access_token = Callback::new(move |token: Option<String>| {
        if let Some(ctl) = controller.try_get_value() {
            assign_and_sync(ctl, token, spawn_local_task);
        }
    });
    provide_context(AuthContext::new(&signals, set_access_token));

    // Kick off the refresh once the provider is live in the browser.
    Effect::new(move || {
        if let Some(ctl) = controller.try_get_value() {
            start_sync(ctl, spawn_local_task);
        }
    });

    on_cleanup(move || {
        if let Some(ctl) = controller.try_get_value() {
            release(&ctl);
        }
    });

    let loading = signals.loading();
    move || {
        if loading.get() {
            view! { <LazyLoader/> }.into_any()
        } else {
            children().into_any()
        }
    }
}

type SyncTask = Pin<Box<dyn Future<Output = ()>>>;

fn spawn_local_task(task: SyncTask) {
    leptos::task::spawn_local(task);
}

/// Schedule a `sync` pass on `spawn` unless the provider is gone.
fn start_sync<A, S>(controller: Rc<SessionController<A>>, spawn: S)
where
    A: AuthApi + 'static,
    S: FnOnce(SyncTask),
{
    if !controller.is_mounted() {
        return;
    }
    spawn(Box::pin(async move {
        controller.sync().await;
    }));
}

/// Body of `AuthContext::set_access_token`: assign, then fetch what the new
/// token enables.
fn assign_and_sync<A, S>(controller: Rc<SessionController<A>>, token: Option<String>, spawn: S)
where
    A: AuthApi + 'static,
    S: FnOnce(SyncTask),
{
    controller.assign_access_token(token);
    start_sync(controller, spawn);
}

/// Cleanup for the provider's owner: drop in-flight results and stop publishing.
fn release<A: AuthApi>(controller: &SessionController<A>) {
    controller.unmount();
}
