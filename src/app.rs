//! Root application component with routing and the auth provider.

use leptos::prelude::*;
use leptos_meta::{MetaTags, Title, provide_meta_context};
use leptos_router::{
    StaticSegment,
    components::{Route, Router, Routes},
};

use crate::components::auth_provider::AuthProvider;
use crate::config::AuthConfig;
use crate::net::api::HttpAuthApi;
use crate::pages::home::HomePage;

/// HTML shell rendered on the server for SSR + hydration.
pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

/// Root application component.
///
/// Everything under the router can call `use_auth()`.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let config = AuthConfig::default();
    let api = HttpAuthApi::new(config.clone());

    view! {
        <Title text="Auth Provider"/>

        <AuthProvider api=api config=config>
            <Router>
                <Routes fallback=|| "Page not found.".into_view()>
                    <Route path=StaticSegment("") view=HomePage/>
                </Routes>
            </Router>
        </AuthProvider>
    }
}
