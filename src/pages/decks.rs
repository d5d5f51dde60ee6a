use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::app::cards_for_deck;
use crate::collection::{LoadState, SortKey};
use crate::components::modal::Modal;
use crate::controller::{
    delete_and_reload, empty_message, import_and_reload, quick_add_and_reload, save_and_reload,
    DecksState, FormMode,
};
use crate::forms::{COLOR_PRESETS, ICON_OPTIONS};
use crate::model::{Deck, Difficulty, EntityId};
use crate::notifications::{use_notifier, Notice};
use crate::transport::ApiClient;

fn sort_label(key: SortKey) -> &'static str {
    match key {
        SortKey::Recent => "Most recent",
        SortKey::AlphaAsc => "Title (A-Z)",
        SortKey::AlphaDesc => "Title (Z-A)",
        SortKey::NumberDesc => "Most cards",
        SortKey::NumberAsc => "Fewest cards",
    }
}

fn card_count_label(count: u32) -> String {
    match count {
        1 => "1 card".to_string(),
        n => format!("{} cards", n),
    }
}

#[component]
pub fn DecksPage() -> impl IntoView {
    let notifier = use_notifier();
    let state = RwSignal::new(DecksState::default());

    let load_decks = move || {
        let Some(ticket) = state.try_update(|s| s.page.items.begin_load()) else {
            return;
        };
        spawn_local(async move {
            let result = ApiClient::browser().decks().fetch_all().await;
            if let Some(Some(notice)) = state.try_update(|s| s.page.apply_load(ticket, result)) {
                notifier.notify(notice);
            }
        });
    };

    // Load decks on mount
    Effect::new(move |_| {
        load_decks();
    });

    let listing = Memo::new(move |_| state.with(|s| s.page.listing()));
    let load_state = Memo::new(move |_| state.with(|s| s.page.items.state().clone()));

    let open_edit = move |id: EntityId| {
        if let Some(Err(notice)) = state.try_update(|s| s.page.open_edit(&id)) {
            notifier.notify(notice);
        }
    };

    let save_deck = move || {
        let Some(begun) = state.try_update(|s| s.page.begin_save()) else {
            return;
        };
        let (mode, draft) = match begun {
            Ok(pending) => pending,
            Err(notice) => return notifier.notify(notice),
        };
        spawn_local(async move {
            let client = ApiClient::browser();
            let (outcome, reload) = save_and_reload(&client.decks(), &mode, &draft).await;
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
            let (outcome, reload) = delete_and_reload(&client.decks(), &id).await;
            let notices = state.try_update(|s| {
                let deleted = s.page.finish_delete(outcome);
                let reloaded = reload.and_then(|r| s.page.apply_reload(r));
                [Some(deleted), reloaded]
            });
            notifier.notify_all(notices.into_iter().flatten().flatten());
        });
    };

    let save_quick_card = move || {
        let Some(begun) = state.try_update(|s| s.begin_quick_add()) else {
            return;
        };
        let (deck_id, content) = match begun {
            Ok(pending) => pending,
            Err(notice) => return notifier.notify(notice),
        };
        spawn_local(async move {
            let client = ApiClient::browser();
            let (outcome, reload) = quick_add_and_reload(&client, &deck_id, &content).await;
            let notices = state.try_update(|s| {
                let added = s.finish_quick_add(outcome);
                let reloaded = reload.and_then(|r| s.page.apply_reload(r));
                [Some(added), reloaded]
            });
            notifier.notify_all(notices.into_iter().flatten().flatten());
        });
    };

    let run_import = move || {
        let Some(begun) = state.try_update(|s| s.begin_import()) else {
            return;
        };
        let (deck_id, cards) = match begun {
            Ok(pending) => pending,
            Err(notice) => return notifier.notify(notice),
        };
        spawn_local(async move {
            let client = ApiClient::browser();
            let (outcome, reload) = import_and_reload(&client, &deck_id, &cards).await;
            let notices = state.try_update(|s| {
                let imported = s.finish_import(outcome);
                let reloaded = reload.and_then(|r| s.page.apply_reload(r));
                [Some(imported), reloaded]
            });
            notifier.notify_all(notices.into_iter().flatten().flatten());
        });
    };

    let close_modals = move || state.update(|s| s.dismiss_modals());

    let editor_open = move || state.with(|s| s.page.editor.is_open());
    let editor_title = move || {
        state.with(|s| match s.page.editor.get().map(|e| &e.mode) {
            Some(FormMode::Edit(_)) => "Edit deck".to_string(),
            _ => "New deck".to_string(),
        })
    };
    let editor_saving = move || state.with(|s| s.page.editor.get().is_some_and(|e| e.saving));
    let form_value = move |f: fn(&crate::forms::DeckForm) -> String| {
        state.with(|s| s.page.editor.get().map(|e| f(&e.form)).unwrap_or_default())
    };

    view! {
        <div class="page decks-page">
            <h2>"My decks"</h2>
            <p class="page-description">"Group your cards by subject."</p>

            <div class="list-toolbar">
                <input
                    type="text"
                    class="input filter-input"
                    placeholder="Filter decks..."
                    prop:value=move || state.with(|s| s.page.criteria.text.clone())
                    on:input=move |ev| state.update(|s| s.page.criteria.text = event_target_value(&ev))
                />
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
                <span class="list-count">
                    {move || listing.with(|l| {
                        if l.items.len() == l.total {
                            format!("{} decks", l.total)
                        } else {
                            format!("{} / {}", l.items.len(), l.total)
                        }
                    })}
                </span>
            </div>

            {move || match load_state.get() {
                LoadState::Loading => view! {
                    <div class="list-loading">"Loading decks..."</div>
                }.into_any(),
                LoadState::Failed(message) => view! {
                    <div class="list-error">
                        <span>{message}</span>
                        <button class="btn btn-secondary" on:click=move |_| load_decks()>"Retry"</button>
                    </div>
                }.into_any(),
                LoadState::Ready => view! {
                    <div class="deck-grid">
                        <button class="deck-tile deck-tile-new" on:click=move |_| state.update(|s| s.page.open_create())>
                            <i class="fas fa-plus"></i>
                            <span>"Create deck"</span>
                        </button>
                        <For
                            each=move || listing.with(|l| l.items.clone())
                            key=|deck: &Deck| (deck.id.clone(), deck.title.clone(), deck.color.clone(), deck.icon.clone(), deck.card_count)
                            children=move |deck: Deck| {
                                let id = deck.id.clone();
                                let (edit_id, delete_id, add_id, import_id) = (id.clone(), id.clone(), id.clone(), id.clone());
                                let title = deck.title.clone();
                                let study_title = deck.title.clone();
                                view! {
                                    <div class="deck-tile" style=format!("--deck-color: {}", deck.color)>
                                        <div class="deck-tile-header">
                                            <i class=format!("fas {} deck-icon", deck.icon)></i>
                                            <div class="deck-tile-actions">
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
                                        <h3 class="deck-title">{title}</h3>
                                        <p class="deck-count">{card_count_label(deck.card_count)}</p>
                                        <div class="deck-tile-footer">
                                            <a class="btn btn-secondary" href=cards_for_deck(id.as_str())>
                                                <i class="fas fa-eye"></i>" View cards"
                                            </a>
                                            <button class="btn btn-secondary" on:click=move |_| state.update(|s| s.open_quick_add(add_id.clone()))>
                                                <i class="fas fa-plus"></i>" Add card"
                                            </button>
                                            <button class="btn btn-secondary" on:click=move |_| state.update(|s| s.open_import(import_id.clone()))>
                                                <i class="fas fa-file-import"></i>" Import"
                                            </button>
                                            <button
                                                class="btn btn-primary"
                                                on:click=move |_| notifier.notify(Notice::info(format!("Study mode for \"{}\" is coming soon.", study_title)))
                                            >
                                                <i class="fas fa-graduation-cap"></i>" Study"
                                            </button>
                                        </div>
                                    </div>
                                }
                            }
                        />
                    </div>
                    {move || listing.with(|l| l.empty).map(|empty| view! {
                        <div class="list-empty">{empty_message(empty, "decks")}</div>
                    })}
                }.into_any(),
            }}

            // Create / edit modal
            <Show when=editor_open>
                <Modal title=Signal::derive(editor_title) on_close=move |_| close_modals()>
                    <form class="modal-form" on:submit=move |ev| { ev.prevent_default(); save_deck(); }>
                        <div class="form-group">
                            <label for="deck-title">"Title"</label>
                            <input
                                id="deck-title"
                                type="text"
                                class="input"
                                prop:value=move || form_value(|f| f.title.clone())
                                on:input=move |ev| state.update(|s| s.page.update_form(|f| f.title = event_target_value(&ev)))
                            />
                        </div>
                        <div class="form-group">
                            <label>"Color"</label>
                            <div class="color-presets">
                                {COLOR_PRESETS
                                    .iter()
                                    .map(|&color| view! {
                                        <button
                                            type="button"
                                            class="color-swatch"
                                            class:selected=move || form_value(|f| f.color.clone()) == color
                                            style=format!("background-color: {}", color)
                                            title=color
                                            on:click=move |_| state.update(|s| s.page.update_form(|f| f.color = color.to_string()))
                                        ></button>
                                    })
                                    .collect::<Vec<_>>()}
                                <input
                                    type="color"
                                    class="color-custom"
                                    title="Custom color"
                                    prop:value=move || form_value(|f| f.color.clone())
                                    on:input=move |ev| state.update(|s| s.page.update_form(|f| f.color = event_target_value(&ev)))
                                />
                            </div>
                        </div>
                        <div class="form-group">
                            <label for="deck-icon">"Icon"</label>
                            <div class="icon-select">
                                <select
                                    id="deck-icon"
                                    class="input"
                                    prop:value=move || form_value(|f| f.icon.clone())
                                    on:change=move |ev| state.update(|s| s.page.update_form(|f| f.icon = event_target_value(&ev)))
                                >
                                    {ICON_OPTIONS
                                        .iter()
                                        .map(|&(value, label)| view! { <option value=value>{label}</option> })
                                        .collect::<Vec<_>>()}
                                </select>
                                <span class="icon-preview" style=move || format!("color: {}", form_value(|f| f.color.clone()))>
                                    <i class=move || format!("fas {}", form_value(|f| f.icon.clone()))></i>
                                </span>
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
                <Modal title="Delete deck?".to_string() on_close=move |_| close_modals()>
                    <p>
                        "This will permanently delete \""
                        {move || state.with(|s| s.page.confirm_delete.get().map(|id| s.deck_title(id)).unwrap_or_default())}
                        "\". This cannot be undone."
                    </p>
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

            // Quick add card
            <Show when=move || state.with(|s| s.quick_add.is_open())>
                <Modal
                    title=Signal::derive(move || state.with(|s| {
                        let title = s.quick_add.get().map(|q| s.deck_title(&q.deck_id)).unwrap_or_default();
                        format!("Add card to {}", title)
                    }))
                    on_close=move |_| close_modals()
                >
                    <form class="modal-form" on:submit=move |ev| { ev.prevent_default(); save_quick_card(); }>
                        <div class="form-group">
                            <label for="quick-question">"Question"</label>
                            <textarea
                                id="quick-question"
                                class="input"
                                rows="3"
                                prop:value=move || state.with(|s| s.quick_add.get().map(|q| q.form.question.clone()).unwrap_or_default())
                                on:input=move |ev| {
                                    let value = event_target_value(&ev);
                                    state.update(|s| if let Some(q) = s.quick_add.get_mut() { q.form.question = value; });
                                }
                            ></textarea>
                        </div>
                        <div class="form-group">
                            <label for="quick-answer">"Answer"</label>
                            <textarea
                                id="quick-answer"
                                class="input"
                                rows="3"
                                prop:value=move || state.with(|s| s.quick_add.get().map(|q| q.form.answer.clone()).unwrap_or_default())
                                on:input=move |ev| {
                                    let value = event_target_value(&ev);
                                    state.update(|s| if let Some(q) = s.quick_add.get_mut() { q.form.answer = value; });
                                }
                            ></textarea>
                        </div>
                        <div class="form-group">
                            <label for="quick-difficulty">"Difficulty"</label>
                            <select
                                id="quick-difficulty"
                                class="input"
                                prop:value=move || state.with(|s| s.quick_add.get().map(|q| q.form.difficulty.clone()).unwrap_or_default())
                                on:change=move |ev| {
                                    let value = event_target_value(&ev);
                                    state.update(|s| if let Some(q) = s.quick_add.get_mut() { q.form.difficulty = value; });
                                }
                            >
                                {Difficulty::ALL
                                    .into_iter()
                                    .map(|d| view! { <option value=d.value()>{d.label()}</option> })
                                    .collect::<Vec<_>>()}
                            </select>
                        </div>
                        <div class="modal-actions">
                            <button type="button" class="btn btn-secondary" on:click=move |_| close_modals()>"Cancel"</button>
                            <button
                                type="submit"
                                class="btn btn-primary"
                                disabled=move || state.with(|s| s.quick_add.get().is_some_and(|q| q.saving))
                            >
                                {move || if state.with(|s| s.quick_add.get().is_some_and(|q| q.saving)) { "Adding..." } else { "Add card" }}
                            </button>
                        </div>
                    </form>
                </Modal>
            </Show>

            // Import cards
            <Show when=move || state.with(|s| s.import.is_open())>
                <Modal
                    title=Signal::derive(move || state.with(|s| {
                        let title = s.import.get().map(|i| s.deck_title(&i.deck_id)).unwrap_or_default();
                        format!("Import cards into {}", title)
                    }))
                    on_close=move |_| close_modals()
                >
                    <form class="modal-form" on:submit=move |ev| { ev.prevent_default(); run_import(); }>
                        <p class="form-hint">
                            "One card per line: question and answer separated by a tab, ';' or '|'."
                        </p>
                        <div class="form-group">
                            <textarea
                                class="input import-text"
                                rows="10"
                                placeholder="Capital of France; Paris"
                                prop:value=move || state.with(|s| s.import.get().map(|i| i.text.clone()).unwrap_or_default())
                                on:input=move |ev| {
                                    let value = event_target_value(&ev);
                                    state.update(|s| if let Some(i) = s.import.get_mut() { i.text = value; });
                                }
                            ></textarea>
                        </div>
                        <div class="form-group">
                            <label for="import-difficulty">"Difficulty for all cards"</label>
                            <select
                                id="import-difficulty"
                                class="input"
                                prop:value=move || state.with(|s| s.import.get().map(|i| i.difficulty.clone()).unwrap_or_default())
                                on:change=move |ev| {
                                    let value = event_target_value(&ev);
                                    state.update(|s| if let Some(i) = s.import.get_mut() { i.difficulty = value; });
                                }
                            >
                                {Difficulty::ALL
                                    .into_iter()
                                    .map(|d| view! { <option value=d.value()>{d.label()}</option> })
                                    .collect::<Vec<_>>()}
                            </select>
                        </div>
                        <div class="modal-actions">
                            <button type="button" class="btn btn-secondary" on:click=move |_| close_modals()>"Cancel"</button>
                            <button
                                type="submit"
                                class="btn btn-primary"
                                disabled=move || state.with(|s| s.import.get().is_some_and(|i| i.saving))
                            >
                                {move || if state.with(|s| s.import.get().is_some_and(|i| i.saving)) { "Importing..." } else { "Import" }}
                            </button>
                        </div>
                    </form>
                </Modal>
            </Show>
        </div>
    }
}
