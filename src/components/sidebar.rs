use leptos::prelude::*;
use leptos_router::hooks::use_location;

use crate::app::{CARDS_PATH, DASHBOARD_PATH, DECKS_PATH};
use crate::session::SessionStore;
use crate::theme::{toggle_theme, ThemeContext};
use crate::transport::ApiClient;

const NAV_ITEMS: &[(&str, &str, &str)] = &[
    (DASHBOARD_PATH, "fa-house", "Dashboard"),
    (DECKS_PATH, "fa-layer-group", "Decks"),
    (CARDS_PATH, "fa-clone", "Cards"),
];

#[component]
pub fn Sidebar() -> impl IntoView {
    let user = SessionStore::browser().user();
    let user_name = user.as_ref().map(|u| u.name.clone()).unwrap_or_default();
    let initial = user
        .as_ref()
        .and_then(|u| u.initial())
        .map(|c| c.to_string())
        .unwrap_or_default();
    let location = use_location();
    let theme_ctx = use_context::<ThemeContext>();

    let on_toggle_theme = move |_| {
        if let Some(ctx) = theme_ctx {
            let store = SessionStore::browser().store();
            let next = toggle_theme(store.as_ref(), ctx.theme.get_untracked());
            ctx.set_theme.set(next);
        }
    };

    let on_logout = move |_| {
        leptos::logging::log!("user logged out");
        ApiClient::browser().logout();
    };

    view! {
        <nav class="sidebar">
            <div class="sidebar-header">
                <h1 class="sidebar-title"><i class="fas fa-bolt"></i>" Flashdeck"</h1>
                <p class="sidebar-subtitle">"Study decks and cards"</p>
            </div>
            <ul class="nav-list">
                {NAV_ITEMS
                    .iter()
                    .map(|&(href, icon, label)| {
                        let active = move || location.pathname.get() == href;
                        view! {
                            <li class="nav-item">
                                <a href=href class="nav-link" class:active=active>
                                    <i class=format!("fas {}", icon)></i>
                                    " "
                                    {label}
                                </a>
                            </li>
                        }
                    })
                    .collect::<Vec<_>>()}
            </ul>
            <div class="sidebar-footer">
                <div class="sidebar-user">
                    <span class="user-avatar">{initial}</span>
                    <span class="user-name">{user_name}</span>
                </div>
                <div class="sidebar-actions">
                    <button class="btn-icon" title="Toggle theme" on:click=on_toggle_theme>
                        <i class=move || {
                            let icon = theme_ctx
                                .map(|ctx| ctx.theme.get().toggle_icon())
                                .unwrap_or("fa-moon");
                            format!("fas {}", icon)
                        }></i>
                    </button>
                    <button class="btn btn-secondary btn-logout" on:click=on_logout>
                        <i class="fas fa-right-from-bracket"></i>
                        " Log out"
                    </button>
                </div>
            </div>
        </nav>
    }
}
