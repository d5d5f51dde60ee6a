use leptos::prelude::*;
use leptos_router::hooks::use_query_map;
use wasm_bindgen_futures::spawn_local;

use crate::collection::{LoadState, SortKey};
use crate::components::modal::Modal;
use crate::controller::{delete_and_reload, empty_message, save_and_reload, CardsState, FormMode};
use crate::error::{user_message, Action};
use crate::forms::CardForm;
use crate::model::{Card, Difficulty, EntityId};
use crate::notifications::{use_notifier, Notice};
use crate::transport::ApiClient;

fn sort_label(key: SortKey) -> &'static str {
    match key {
        SortKey::Recent => "Most recent",
        SortKey::AlphaAsc => "Question (A-Z)",
        SortKey::AlphaDesc => "Question (Z-A)",
        SortKey::NumberDesc => "Hardest first",
        SortKey::NumberAsc => "Easiest first",
    }
}

#[component]
pub fn CardsPage() -> impl IntoView {
    let notifier = use_notifier();
    let query = use_query_map();
    let state = RwSignal::new(CardsState::default());

    // Pre-filter from `?deck=<id>`
    Effect::new(move |_| {
        let deck = query.with(|q| q.get("deck")).unwrap_or_default();
        state.update(|s| s.set_deck_filter(&deck));
    });

    let load_all = move || {
        let Some(tickets) = state.try_update(|s| (s.decks.begin_load(), s.page.items.begin_load())) else {
            return;
        };
        let (deck_ticket, card_ticket) = tickets;
        spawn_local(async move {
            let client = ApiClient::browser();
            let decks = client.decks().fetch_all().await;
            if let Err(e) = &decks {
                if e.is_auth_failure() {
                    notifier.notify(Notice::error(user_message(e, Action::Load)));
                    return;
                }
            }
            let deck_notice = state
                .try_update(|s| match decks {
                    Ok(items) => {
                        s.decks.finish_load(deck_ticket, Ok(items));
                        None
                    }
                    Err(e) => {
                        let message = user_message(&e, Action::Load);
                        s.decks
                            .finish_load(deck_ticket, Err(message.clone()))
                            .then(|| Notice::error(message))
                    }
                })
                .flatten();
            notifier.notify_all(deck_notice);

            let cards = client.cards().fetch_all().await;
            if let Some(Some(notice)) = state.try_update(|s| s.page.apply_load(card_ticket, cards)) {
                notifier.notify(notice);
            }
        });
    };

    // Load decks and cards on mount
    Effect::new(move |_| {
        load_all();
    });

    let listing = Memo::new(move |_| state.with(|s| s.page.listing()));
    let load_state = Memo::new(move |_| state.with(|s| s.page.items.state().clone()));
    let deck_options = Memo::new(move |_| state.with(|s| s.deck_options()));

    let open_create = move || {
        if let Some(Err(notice)) = state.try_update(|s| s.open_create()) {
            notifier.notify(notice);
        }
    };

    let open_edit = move |id: EntityId| {
        if let Some(Err(notice)) = state.try_update(|s| s.page.open_edit(&id)) {
            notifier.notify(notice);
        }
    };

    let save_card = move || {
        let Some(begun) = state.try_update(|s| s.page.begin_save()) else {
            return;
        };
        let (mode, draft) = match begun {
            Ok(pending) => pending,
            Err(notice) => return notifier.notify(notice),
        };
        spawn_local(async move {
            let client = ApiClient::browser();
            let (outcome, reload) = save_and_reload(&client.cards(), &mode, &draft).await;
            let notices = state.try_update(|s| {
                let saved = s.page.finish_save(&mode, outcome);
                let reloaded = reload.and_then(|r| s.page.apply_reload(r));
                [Some(saved), reloaded]
            });
            notifier.notify_all(notices.into_iter().flatten().flatten());
        });
    };

    let confirm_delete = move || {
        let Some(Some(id)) = state.try_update(|s| s.page.begin_delete()) else {
            return;
        };
        spawn_local(async move {
            let client = ApiClient::browser();
            let (outcome, reload) = delete_and_reload(&client.cards(), &id).await;
            let notices = state.try_update(|s| {
                let deleted = s.page.finish_delete(outcome);
                let reloaded = reload.and_then(|r| s.page.apply_reload(r));
                [Some(deleted), reloaded]
            });
            notifier.notify_all(notices.into_iter().flatten().flatten());
        });
    };

    let close_modals = move || state.update(|s| s.page.dismiss_modals());

    let editor_open = move || state.with(|s| s.page.editor.is_open());
    let editor_title = move || {
        state.with(|s| match s.page.editor.get().map(|e| &e.mode) {
            Some(FormMode::Edit(_)) => "Edit card".to_string(),
            _ => "New card".to_string(),
        })
    };
    let editor_saving = move || state.with(|s| s.page.editor.get().is_some_and(|e| e.saving));
    let form_value = move |f: fn(&CardForm) -> String| {
        state.with(|s| s.page.editor.get().map(|e| f(&e.form)).unwrap_or_default())
    };

    view! {
        <div class="page cards-page">
            <div class="page-header">
                <div>
                    <h2>"My cards"</h2>
                    <p class="page-description">"Every card across your decks."</p>
                </div>
                <button class="btn btn-primary" on:click=move |_| open_create()>
                    <i class="fas fa-plus"></i>" New card"
                </button>
            </div>

            <div class="list-toolbar">
                <input
                    type="text"
                    class="input filter-input"
                    placeholder="Search questions and answers..."
                    prop:value=move || state.with(|s| s.page.criteria.text.clone())
                    on:input=move |ev| state.update(|s| s.page.criteria.text = event_target_value(&ev))
                />
                <select
                    class="input"
                    prop:value=move || state.with(|s| s.page.criteria.deck.as_ref().map(|d| d.to_string()).unwrap_or_default())
                    on:change=move |ev| {
                        let value = event_target_value(&ev);
                        state.update(|s| s.set_deck_filter(&value));
                    }
                >
                    <option value="">"All decks"</option>
                    <For
                        each=move || deck_options.get()
                        key=|(value, label)| (value.clone(), label.clone())
                        children=|(value, label)| view! { <option value=value>{label}</option> }
                    />
                </select>
                <select
                    class="input"
                    prop:value=move || state.with(|s| s.page.criteria.difficulty.map(|d| d.value()).unwrap_or_default())
                    on:change=move |ev| {
                        let value = event_target_value(&ev);
                        state.update(|s| s.set_difficulty_filter(&value));
                    }
                >
                    <option value="">"All difficulties"</option>
                    {Difficulty::ALL
                        .into_iter()
                        .map(|d| view! { <option value=d.value()>{d.label()}</option> })
                        .collect::<Vec<_>>()}
                </select>
                <select
                    class="input sort-select"
                    prop:value=move || state.with(|s| SortKey::choice_value(s.page.sort))
                    on:change=move |ev| {
                        let sort = SortKey::from_choice(&event_target_value(&ev));
                        state.update(|s| s.page.sort = sort);
                    }
                >
                    <option value="">"Default order"</option>
                    {SortKey::ALL
                        .into_iter()
                        .map(|key| view! { <option value=key.value()>{sort_label(key)}</option> })
                        .collect::<Vec<_>>()}
                </select>
            </div>

            {move || match load_state.get() {
                LoadState::Loading => view! {
                    <div class="list-loading">"Loading cards..."</div>
                }.into_any(),
                LoadState::Failed(message) => view! {
                    <div class="list-error">
                        <span>{message}</span>
                        <button class="btn btn-secondary" on:click=move |_| load_all()>"Retry"</button>
                    </div>
                }.into_any(),
                LoadState::Ready => view! {
                    <div class="card-list">
                        <For
                            each=move || listing.with(|l| l.items.clone())
                            key=|card: &Card| {
                                (card.id.clone(), card.question.clone(), card.answer.clone(), card.deck_id.clone(), card.difficulty)
                            }
                            children=move |card: Card| {
                                let badge_card = card.clone();
                                let badge = Memo::new(move |_| state.with(|s| s.badge(&badge_card)));
                                let (edit_id, delete_id) = (card.id.clone(), card.id.clone());
                                view! {
                                    <div class="card-item">
                                        <div class="card-item-header">
                                            <span
                                                class="deck-badge"
                                                style=move || badge.with(|b| format!("background-color: {}", b.color))
                                            >
                                                {move || badge.with(|b| b.name.clone())}
                                            </span>
                                            <span class=format!("difficulty-label {}", card.difficulty.css_class())>
                                                {card.difficulty.label()}
                                            </span>
                                        </div>
                                        <p class="card-question">{card.question.clone()}</p>
                                        <p class="card-answer">{card.answer.clone()}</p>
                                        <div class="card-item-footer">
                                            <span class="card-date">{card.created_label().unwrap_or_default()}</span>
                                            <div class="card-item-actions">
                                                <button class="btn-icon" title="Edit" on:click=move |_| open_edit(edit_id.clone())>
                                                    <i class="fas fa-pen"></i>
                                                </button>
                                                <button
                                                    class="btn-icon btn-danger"
                                                    title="Delete"
                                                    on:click=move |_| state.update(|s| s.page.ask_delete(delete_id.clone()))
                                                >
                                                    <i class="fas fa-trash"></i>
                                                </button>
                                            </div>
                                        </div>
                                    </div>
                                }
                            }
                        />
                    </div>
                    {move || listing.with(|l| l.empty).map(|empty| view! {
                        <div class="list-empty">{empty_message(empty, "cards")}</div>
                    })}
                }.into_any(),
            }}

            // Create / edit modal
            <Show when=editor_open>
                <Modal title=Signal::derive(editor_title) on_close=move |_| close_modals()>
                    <form class="modal-form" on:submit=move |ev| { ev.prevent_default(); save_card(); }>
                        <div class="form-group">
                            <label for="card-question">"Question"</label>
                            <textarea
                                id="card-question"
                                class="input"
                                rows="3"
                                prop:value=move || form_value(|f| f.question.clone())
                                on:input=move |ev| state.update(|s| s.page.update_form(|f| f.question = event_target_value(&ev)))
                            ></textarea>
                        </div>
                        <div class="form-group">
                            <label for="card-answer">"Answer"</label>
                            <textarea
                                id="card-answer"
                                class="input"
                                rows="3"
                                prop:value=move || form_value(|f| f.answer.clone())
                                on:input=move |ev| state.update(|s| s.page.update_form(|f| f.answer = event_target_value(&ev)))
                            ></textarea>
                        </div>
                        <div class="form-row">
                            <div class="form-group">
                                <label for="card-deck">"Deck"</label>
                                <select
                                    id="card-deck"
                                    class="input"
                                    prop:value=move || form_value(|f| f.deck_id.clone())
                                    on:change=move |ev| state.update(|s| s.page.update_form(|f| f.deck_id = event_target_value(&ev)))
                                >
                                    <option value="">"Select a deck"</option>
                                    {move || deck_options
                                        .get()
                                        .into_iter()
                                        .map(|(value, label)| view! { <option value=value>{label}</option> })
                                        .collect::<Vec<_>>()}
                                </select>
                            </div>
                            <div class="form-group">
                                <label for="card-difficulty">"Difficulty"</label>
                                <select
                                    id="card-difficulty"
                                    class="input"
                                    prop:value=move || form_value(|f| f.difficulty.clone())
                                    on:change=move |ev| state.update(|s| s.page.update_form(|f| f.difficulty = event_target_value(&ev)))
                                >
                                    {Difficulty::ALL
                                        .into_iter()
                                        .map(|d| view! { <option value=d.value()>{d.label()}</option> })
                                        .collect::<Vec<_>>()}
                                </select>
                            </div>
                        </div>
                        <div class="modal-actions">
                            <button type="button" class="btn btn-secondary" on:click=move |_| close_modals()>"Cancel"</button>
                            <button type="submit" class="btn btn-primary" disabled=editor_saving>
                                {move || if editor_saving() { "Saving..." } else { "Save" }}
                            </button>
                        </div>
                    </form>
                </Modal>
            </Show>

            // Delete confirmation
            <Show when=move || state.with(|s| s.page.confirm_delete.is_open())>
                <Modal title="Delete card?".to_string() on_close=move |_| close_modals()>
                    <p>"This card will be permanently deleted. This cannot be undone."</p>
                    <div class="modal-actions">
                        <button class="btn btn-secondary" on:click=move |_| close_modals()>"Cancel"</button>
                        <button
                            class="btn btn-danger"
                            disabled=move || state.with(|s| s.page.deleting)
                            on:click=move |_| confirm_delete()
                        >
                            {move || if state.with(|s| s.page.deleting) { "Deleting..." } else { "Delete" }}
                        </button>
                    </div>
                </Modal>
            </Show>
        </div>
    }
}
