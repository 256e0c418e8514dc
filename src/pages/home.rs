//! Landing page showing the current auth session.
//!
//! Doubles as a manual check of the context contract: the token form calls
//! `set_access_token` directly, which skips the refresh flow and fetches the
//! profile for the entered token.

#[cfg(test)]
#[path = "home_test.rs"]
mod home_test;

use leptos::prelude::*;

use crate::net::types::UserProfile;
use crate::state::auth::use_auth;

/// Display name for a profile: `name`, then `email`, then `username`.
fn display_name(user: &UserProfile) -> Option<&str> {
    ["name", "email", "username"]
        .into_iter()
        .find_map(|key| user.str_field(key))
}

fn greeting(user: Option<&UserProfile>) -> String {
    match user {
        Some(user) => match display_name(user) {
            Some(name) => format!("Signed in as {name}"),
            None => "Signed in".to_owned(),
        },
        None => "Not signed in".to_owned(),
    }
}

#[component]
pub fn HomePage() -> impl IntoView {
    let auth = use_auth();
    let user = auth.user();
    let access_token = auth.access_token();
    let draft = RwSignal::new(String::new());

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let token = draft.get().trim().to_owned();
        if token.is_empty() {
            return;
        }
        auth.set_access_token(Some(token));
        draft.set(String::new());
    };

    view! {
        <div class="home-page">
            <h1>{move || user.with(|u| greeting(u.as_ref()))}</h1>
            <p class="home-page__phase">{move || format!("{:?}", auth.phase().get())}</p>
            <Show when=move || access_token.with(Option::is_none)>
                <form class="home-page__token-form" on:submit=on_submit>
                    <input
                        class="home-page__token-input"
                        type="text"
                        placeholder="access token"
                        prop:value=move || draft.get()
                        on:input=move |ev| draft.set(event_target_value(&ev))
                    />
                    <button class="home-page__token-button" type="submit">
                        "Use token"
                    </button>
                </form>
            </Show>
        </div>
    }
}
