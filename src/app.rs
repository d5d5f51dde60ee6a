use leptos::prelude::*;
use leptos_router::components::*;
use leptos_router::path;

use crate::components::notification_host::NotificationHost;
use crate::components::sidebar::Sidebar;
use crate::config::AppConfig;
use crate::notifications::Notifier;
use crate::pages::auth::AuthPage;
use crate::pages::cards::CardsPage;
use crate::pages::dashboard::DashboardPage;
use crate::pages::decks::DecksPage;
use crate::session::SessionStore;
use crate::theme::{apply_theme, initial_theme, system_prefers_dark, ThemeContext};

pub const LOGIN_PATH: &str = "/login";
pub const DASHBOARD_PATH: &str = "/dashboard";
pub const DECKS_PATH: &str = "/decks";
pub const CARDS_PATH: &str = "/cards";

/// Cards page filtered to one deck.
pub fn cards_for_deck(deck_id: &str) -> String {
    format!("{}?deck={}", CARDS_PATH, deck_id)
}

#[component]
pub fn App() -> impl IntoView {
    let config = AppConfig::load();
    provide_context(Notifier::new(config.notification_ttl));

    let saved = initial_theme(SessionStore::browser().store().as_ref(), system_prefers_dark());
    let (theme, set_theme) = signal(saved);
    provide_context(ThemeContext { theme, set_theme });

    // Apply theme to DOM whenever the signal changes
    Effect::new(move |_| {
        apply_theme(theme.get());
    });

    view! {
        <style>{include_str!("styles.css")}</style>
        <Router>
            <NotificationHost />
            <Routes fallback=|| view! { <p class="not-found">"Page not found"</p> }>
                <Route path=path!("/") view=AuthPage />
                <Route path=path!("/login") view=AuthPage />
                <Route path=path!("/dashboard") view=|| view! { <Protected><DashboardPage /></Protected> } />
                <Route path=path!("/decks") view=|| view! { <Protected><DecksPage /></Protected> } />
                <Route path=path!("/cards") view=|| view! { <Protected><CardsPage /></Protected> } />
            </Routes>
        </Router>
    }
}

/// Layout for signed-in pages. Without a stored session it redirects to login.
#[component]
fn Protected(children: Children) -> impl IntoView {
    if !SessionStore::browser().has_session() {
        leptos::logging::log!("no session, redirecting to {}", LOGIN_PATH);
        return view! { <Redirect path=LOGIN_PATH /> }.into_any();
    }

    view! {
        <div class="app-layout">
            <Sidebar />
            <main class="content">{children()}</main>
        </div>
    }
    .into_any()
}
