use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::app::{CARDS_PATH, DECKS_PATH};
use crate::calendar::{date_display, month_grid, today, CalendarCell, WEEKDAY_LABELS};
use crate::error::{user_message, Action};
use crate::notifications::{use_notifier, Notice};
use crate::session::SessionStore;
use crate::transport::ApiClient;

#[component]
pub fn DashboardPage() -> impl IntoView {
    let notifier = use_notifier();
    let user = SessionStore::browser().user();
    let greeting = match user.as_ref().map(|u| u.name.trim()).filter(|n| !n.is_empty()) {
        Some(name) => format!("Hello, {}!", name),
        None => "Hello!".to_string(),
    };

    let today = today();
    let grid = month_grid(today);
    let (selected_day, set_selected_day) = signal(today);
    let (deck_count, set_deck_count) = signal::<Option<u64>>(None);
    let (card_count, set_card_count) = signal::<Option<u64>>(None);

    // Load counts on mount
    Effect::new(move |_| {
        spawn_local(async move {
            let client = ApiClient::browser();
            match client.decks().count().await {
                Ok(n) => set_deck_count.set(Some(n)),
                Err(e) => {
                    notifier.notify(Notice::error(user_message(&e, Action::Load)));
                    if e.is_auth_failure() {
                        return;
                    }
                }
            }
            match client.cards().count().await {
                Ok(n) => set_card_count.set(Some(n)),
                Err(e) => notifier.notify(Notice::error(user_message(&e, Action::Load))),
            }
        });
    });

    let count_text = |count: Option<u64>| count.map(|n| n.to_string()).unwrap_or_else(|| "-".to_string());

    view! {
        <div class="page dashboard-page">
            <header class="dashboard-header">
                <div>
                    <h2>{greeting}</h2>
                    <p class="page-description">{date_display(today)}</p>
                </div>
            </header>

            <section class="stat-row">
                <div class="stat-tile">
                    <i class="fas fa-layer-group"></i>
                    <span class="stat-value">{move || count_text(deck_count.get())}</span>
                    <span class="stat-label">"Decks"</span>
                </div>
                <div class="stat-tile">
                    <i class="fas fa-clone"></i>
                    <span class="stat-value">{move || count_text(card_count.get())}</span>
                    <span class="stat-label">"Cards"</span>
                </div>
            </section>

            <section class="nav-tiles">
                <a href=DECKS_PATH class="nav-tile">
                    <i class="fas fa-layer-group"></i>
                    <h3>"My decks"</h3>
                    <p>"Create and organize decks by subject."</p>
                </a>
                <a href=CARDS_PATH class="nav-tile">
                    <i class="fas fa-clone"></i>
                    <h3>"My cards"</h3>
                    <p>"Search, filter and edit every card."</p>
                </a>
            </section>

            <section class="calendar">
                <h3 class="calendar-title">{grid.title.clone()}</h3>
                <div class="calendar-grid">
                    {WEEKDAY_LABELS
                        .iter()
                        .map(|d| view! { <span class="calendar-weekday">{*d}</span> })
                        .collect::<Vec<_>>()}
                    {grid
                        .cells
                        .into_iter()
                        .map(|cell| match cell {
                            CalendarCell::Blank => view! { <span class="calendar-day blank"></span> }.into_any(),
                            CalendarCell::Day { date, today } => {
                                view! {
                                    <button
                                        class="calendar-day"
                                        class:today=today
                                        class:selected=move || selected_day.get() == date
                                        on:click=move |_| set_selected_day.set(date)
                                    >
                                        {date.format("%-d").to_string()}
                                    </button>
                                }
                                    .into_any()
                            }
                        })
                        .collect::<Vec<_>>()}
                </div>
                <p class="calendar-selected">
                    {move || format!("Selected: {}", date_display(selected_day.get()))}
                </p>
            </section>
        </div>
    }
}
