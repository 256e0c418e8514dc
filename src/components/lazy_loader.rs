//! Placeholder shown while the auth session is loading.

use leptos::prelude::*;

#[component]
pub fn LazyLoader(#[prop(optional, into)] label: Option<String>) -> impl IntoView {
    let label = label.unwrap_or_else(|| "Loading…".to_owned());
    view! {
        <div class="lazy-loader" role="status" aria-live="polite">
            <span class="lazy-loader__spinner"></span>
            <span class="lazy-loader__label">{label}</span>
        </div>
    }
}
