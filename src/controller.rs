//! Page state and the async flows that drive it, kept free of DOM access.

use std::fmt::Debug;

use crate::api::{Resource, ResourceClient};
use crate::collection::{
    project, CardFilter, Collection, DeckFilter, EmptyState, Filter, Listing, SortKey, Sortable,
};
use crate::error::{user_message, Action, ApiError};
use crate::forms::{CardForm, DeckForm, QuickCardForm};
use crate::import::parse_import;
use crate::model::{Card, CardContent, Deck, Difficulty, EntityId};
use crate::notifications::Notice;
use crate::transport::ApiClient;

#[derive(Debug, Clone, PartialEq)]
pub enum Modal<T> {
    Closed,
    Open(T),
}

impl<T> Default for Modal<T> {
    fn default() -> Self {
        Modal::Closed
    }
}

impl<T> Modal<T> {
    pub fn is_open(&self) -> bool {
        matches!(self, Modal::Open(_))
    }

    pub fn get(&self) -> Option<&T> {
        match self {
            Modal::Open(value) => Some(value),
            Modal::Closed => None,
        }
    }

    pub fn get_mut(&mut self) -> Option<&mut T> {
        match self {
            Modal::Open(value) => Some(value),
            Modal::Closed => None,
        }
    }

    pub fn close(&mut self) {
        *self = Modal::Closed;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FormMode {
    Create,
    Edit(EntityId),
}

/// An open create/edit form.
#[derive(Debug, Clone, PartialEq)]
pub struct Editor<F> {
    pub mode: FormMode,
    pub form: F,
    /// Set while the save request is in flight; disables the submit button.
    pub saving: bool,
}

impl<F> Editor<F> {
    fn new(mode: FormMode, form: F) -> Self {
        Self {
            mode,
            form,
            saving: false,
        }
    }
}

/// A resource with a create/edit form and a list filter.
pub trait Editable: Sortable + Debug + PartialEq {
    type Form: Clone + Debug + PartialEq;
    type Criteria: Filter<Self> + Clone + Debug + Default + PartialEq;

    const NOUN: &'static str;

    fn blank_form(criteria: &Self::Criteria) -> Self::Form;
    fn edit_form(&self) -> Self::Form;
    fn validate(form: &Self::Form) -> Result<Self::Draft, ApiError>;
}

impl Editable for Deck {
    type Form = DeckForm;
    type Criteria = DeckFilter;

    const NOUN: &'static str = "Deck";

    fn blank_form(_: &DeckFilter) -> DeckForm {
        DeckForm::default()
    }

    fn edit_form(&self) -> DeckForm {
        DeckForm::from_deck(self)
    }

    fn validate(form: &DeckForm) -> Result<Self::Draft, ApiError> {
        form.validate()
    }
}

impl Editable for Card {
    type Form = CardForm;
    type Criteria = CardFilter;

    const NOUN: &'static str = "Card";

    /// New cards default to the deck currently filtered on.
    fn blank_form(criteria: &CardFilter) -> CardForm {
        CardForm::blank(criteria.deck.as_ref())
    }

    fn edit_form(&self) -> CardForm {
        CardForm::from_card(self)
    }

    fn validate(form: &CardForm) -> Result<Self::Draft, ApiError> {
        form.validate()
    }
}

/// State shared by every list page: the snapshot, its projection settings,
/// the editor modal and the delete confirmation modal.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityPage<R: Editable> {
    pub items: Collection<R>,
    pub criteria: R::Criteria,
    pub sort: Option<SortKey>,
    pub editor: Modal<Editor<R::Form>>,
    pub confirm_delete: Modal<EntityId>,
    pub deleting: bool,
}

impl<R: Editable> Default for EntityPage<R> {
    fn default() -> Self {
        Self {
            items: Collection::default(),
            criteria: R::Criteria::default(),
            sort: None,
            editor: Modal::Closed,
            confirm_delete: Modal::Closed,
            deleting: false,
        }
    }
}

impl<R: Editable> EntityPage<R> {
    pub fn listing(&self) -> Listing<R> {
        project(self.items.items(), &self.criteria, self.sort)
    }

    pub fn open_create(&mut self) {
        let form = R::blank_form(&self.criteria);
        self.editor = Modal::Open(Editor::new(FormMode::Create, form));
    }

    pub fn open_edit(&mut self, id: &EntityId) -> Result<(), Notice> {
        let item = self
            .items
            .find(id)
            .ok_or_else(|| Notice::error(format!("{} not found.", R::NOUN)))?;
        let form = item.edit_form();
        self.editor = Modal::Open(Editor::new(FormMode::Edit(id.clone()), form));
        Ok(())
    }

    pub fn update_form(&mut self, f: impl FnOnce(&mut R::Form)) {
        if let Some(editor) = self.editor.get_mut() {
            f(&mut editor.form);
        }
    }

    /// Validate the open form and mark it as saving. A validation failure
    /// leaves the modal open and sends nothing.
    pub fn begin_save(&mut self) -> Result<(FormMode, R::Draft), Notice> {
        let editor = self
            .editor
            .get_mut()
            .ok_or_else(|| Notice::error("Nothing to save."))?;
        if editor.saving {
            return Err(Notice::info("Already saving."));
        }
        let draft = R::validate(&editor.form).map_err(|e| Notice::error(user_message(&e, Action::Save)))?;
        editor.saving = true;
        Ok((editor.mode.clone(), draft))
    }

    pub fn finish_save(&mut self, mode: &FormMode, result: Result<(), ApiError>) -> Notice {
        match result {
            Ok(()) => {
                self.editor.close();
                let verb = match mode {
                    FormMode::Create => "created",
                    FormMode::Edit(_) => "updated",
                };
                Notice::success(format!("{} {} successfully!", R::NOUN, verb))
            }
            Err(e) => {
                if let Some(editor) = self.editor.get_mut() {
                    editor.saving = false;
                }
                Notice::error(user_message(&e, Action::Save))
            }
        }
    }

    /// Replace the snapshot with a fresh fetch.
    pub fn apply_reload(&mut self, result: Result<Vec<R>, ApiError>) -> Option<Notice> {
        let ticket = self.items.begin_load();
        self.apply_load(ticket, result)
    }

    /// Apply a load started with `items.begin_load()`. Stale loads are ignored.
    pub fn apply_load(&mut self, ticket: u64, result: Result<Vec<R>, ApiError>) -> Option<Notice> {
        match result {
            Ok(items) => {
                self.items.finish_load(ticket, Ok(items));
                None
            }
            Err(e) => {
                let message = user_message(&e, Action::Load);
                if self.items.finish_load(ticket, Err(message.clone())) {
                    Some(Notice::error(message))
                } else {
                    None
                }
            }
        }
    }

    pub fn ask_delete(&mut self, id: EntityId) {
        self.confirm_delete = Modal::Open(id);
    }

    pub fn cancel_delete(&mut self) {
        if !self.deleting {
            self.confirm_delete.close();
        }
    }

    pub fn begin_delete(&mut self) -> Option<EntityId> {
        if self.deleting {
            return None;
        }
        let id = self.confirm_delete.get().cloned();
        if id.is_some() {
            self.deleting = true;
        } else {
            self.confirm_delete.close();
        }
        id
    }

    pub fn finish_delete(&mut self, result: Result<(), ApiError>) -> Notice {
        self.deleting = false;
        self.confirm_delete.close();
        match result {
            Ok(()) => Notice::success(format!("{} deleted successfully!", R::NOUN)),
            Err(e) => Notice::error(user_message(&e, Action::Delete)),
        }
    }

    /// Escape key: close whatever modal is open, unless a request is pending.
    pub fn dismiss_modals(&mut self) {
        if !self.editor.get().is_some_and(|e| e.saving) {
            self.editor.close();
        }
        self.cancel_delete();
    }
}

/// Create or update, then re-fetch once on success.
pub async fn save_and_reload<R: Resource>(
    resources: &ResourceClient<'_, R>,
    mode: &FormMode,
    draft: &R::Draft,
) -> (Result<(), ApiError>, Option<Result<Vec<R>, ApiError>>) {
    let outcome = match mode {
        FormMode::Create => resources.create(draft).await,
        FormMode::Edit(id) => resources.update(id, draft).await,
    };
    if let Err(e) = &outcome {
        leptos::logging::warn!("saving {} failed: {}", R::COLLECTION, e);
        return (outcome, None);
    }
    let reload = resources.fetch_all().await;
    (outcome, Some(reload))
}

/// Delete, then re-fetch whatever the outcome. After an auth failure the
/// session is gone, so there is nothing to re-fetch.
pub async fn delete_and_reload<R: Resource>(
    resources: &ResourceClient<'_, R>,
    id: &EntityId,
) -> (Result<(), ApiError>, Option<Result<Vec<R>, ApiError>>) {
    let outcome = resources.delete(id).await;
    if let Err(e) = &outcome {
        leptos::logging::warn!("deleting {} {} failed: {}", R::COLLECTION, id, e);
        if e.is_auth_failure() {
            return (outcome, None);
        }
    }
    let reload = resources.fetch_all().await;
    (outcome, Some(reload))
}

/// Add one card to a deck, then re-fetch decks for the new card count.
pub async fn quick_add_and_reload(
    api: &ApiClient,
    deck_id: &EntityId,
    content: &CardContent,
) -> (Result<(), ApiError>, Option<Result<Vec<Deck>, ApiError>>) {
    let decks = api.decks();
    let outcome = decks.add_card(deck_id, content).await;
    if let Err(e) = &outcome {
        leptos::logging::warn!("adding a card to deck {} failed: {}", deck_id, e);
        return (outcome, None);
    }
    (outcome, Some(decks.fetch_all().await))
}

pub async fn import_and_reload(
    api: &ApiClient,
    deck_id: &EntityId,
    cards: &[CardContent],
) -> (Result<usize, ApiError>, Option<Result<Vec<Deck>, ApiError>>) {
    let decks = api.decks();
    let outcome = decks.import_cards(deck_id, cards).await;
    match &outcome {
        Ok(count) => leptos::logging::log!("imported {} cards into deck {}", count, deck_id),
        Err(e) => {
            leptos::logging::warn!("import into deck {} failed: {}", deck_id, e);
            return (outcome, None);
        }
    }
    (outcome, Some(decks.fetch_all().await))
}

/// Text shown in place of an empty list.
pub fn empty_message(empty: EmptyState, plural: &str) -> String {
    match empty {
        EmptyState::NoItems => format!("No {} yet. Create the first one!", plural),
        EmptyState::NoMatches => format!("No {} match the current filters.", plural),
    }
}

/// Deck name and color shown on a card.
#[derive(Debug, Clone, PartialEq)]
pub struct DeckBadge {
    pub name: String,
    pub color: String,
}

const PLACEHOLDER_COLOR: &str = "#A5B4FC";

pub fn deck_badge(decks: &Collection<Deck>, card: &Card) -> DeckBadge {
    match &card.deck_id {
        None => DeckBadge {
            name: "No deck".to_string(),
            color: PLACEHOLDER_COLOR.to_string(),
        },
        Some(id) => match decks.find(id) {
            Some(deck) => DeckBadge {
                name: deck.title.clone(),
                color: deck.color.clone(),
            },
            None => DeckBadge {
                name: "Deck not found".to_string(),
                color: PLACEHOLDER_COLOR.to_string(),
            },
        },
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CardsState {
    pub decks: Collection<Deck>,
    pub page: EntityPage<Card>,
}

impl CardsState {
    /// Cards need a deck; with no decks the editor does not open.
    pub fn open_create(&mut self) -> Result<(), Notice> {
        if self.decks.is_empty() {
            return Err(Notice::warning("Create a deck before adding cards."));
        }
        self.page.open_create();
        Ok(())
    }

    /// `(value, label)` pairs for deck `<select>`s.
    pub fn deck_options(&self) -> Vec<(String, String)> {
        self.decks
            .items()
            .iter()
            .map(|d| (d.id.to_string(), d.title.clone()))
            .collect()
    }

    pub fn badge(&self, card: &Card) -> DeckBadge {
        deck_badge(&self.decks, card)
    }

    pub fn set_deck_filter(&mut self, value: &str) {
        self.page.criteria.deck = Some(value.trim())
            .filter(|v| !v.is_empty())
            .map(EntityId::new);
    }

    pub fn set_difficulty_filter(&mut self, value: &str) {
        self.page.criteria.difficulty = Difficulty::parse(value);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuickAdd {
    pub deck_id: EntityId,
    pub form: QuickCardForm,
    pub saving: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportDraft {
    pub deck_id: EntityId,
    pub text: String,
    pub difficulty: String,
    pub saving: bool,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DecksState {
    pub page: EntityPage<Deck>,
    pub quick_add: Modal<QuickAdd>,
    pub import: Modal<ImportDraft>,
}

impl DecksState {
    pub fn open_quick_add(&mut self, deck_id: EntityId) {
        self.quick_add = Modal::Open(QuickAdd {
            deck_id,
            form: QuickCardForm::default(),
            saving: false,
        });
    }

    pub fn open_import(&mut self, deck_id: EntityId) {
        self.import = Modal::Open(ImportDraft {
            deck_id,
            text: String::new(),
            difficulty: Difficulty::default().value(),
            saving: false,
        });
    }

    pub fn deck_title(&self, id: &EntityId) -> String {
        self.page
            .items
            .find(id)
            .map(|d| d.title.clone())
            .unwrap_or_default()
    }

    pub fn begin_quick_add(&mut self) -> Result<(EntityId, CardContent), Notice> {
        let quick = self
            .quick_add
            .get_mut()
            .ok_or_else(|| Notice::error("Nothing to save."))?;
        if quick.saving {
            return Err(Notice::info("Already saving."));
        }
        let content = quick
            .form
            .validate()
            .map_err(|e| Notice::error(user_message(&e, Action::Save)))?;
        quick.saving = true;
        Ok((quick.deck_id.clone(), content))
    }

    pub fn finish_quick_add(&mut self, result: Result<(), ApiError>) -> Notice {
        match result {
            Ok(()) => {
                self.quick_add.close();
                Notice::success("Card added successfully!")
            }
            Err(e) => {
                if let Some(quick) = self.quick_add.get_mut() {
                    quick.saving = false;
                }
                Notice::error(user_message(&e, Action::Save))
            }
        }
    }

    /// Parse the pasted text. Malformed lines keep the modal open.
    pub fn begin_import(&mut self) -> Result<(EntityId, Vec<CardContent>), Notice> {
        let draft = self
            .import
            .get_mut()
            .ok_or_else(|| Notice::error("Nothing to import."))?;
        if draft.saving {
            return Err(Notice::info("Already importing."));
        }
        let difficulty = Difficulty::parse(&draft.difficulty).unwrap_or_default();
        let cards = parse_import(&draft.text, difficulty).map_err(|e| Notice::error(e.to_string()))?;
        draft.saving = true;
        Ok((draft.deck_id.clone(), cards))
    }

    pub fn finish_import(&mut self, result: Result<usize, ApiError>) -> Notice {
        match result {
            Ok(count) => {
                self.import.close();
                let noun = if count == 1 { "card" } else { "cards" };
                Notice::success(format!("{} {} imported.", count, noun))
            }
            Err(e) => {
                if let Some(draft) = self.import.get_mut() {
                    draft.saving = false;
                }
                Notice::error(user_message(&e, Action::Import))
            }
        }
    }

    pub fn dismiss_modals(&mut self) {
        self.page.dismiss_modals();
        if !self.quick_add.get().is_some_and(|q| q.saving) {
            self.quick_add.close();
        }
        if !self.import.get().is_some_and(|i| i.saving) {
            self.import.close();
        }
    }
}

#[cfg(test)]
mod tests {
    use reqwest::Method;
    use serde_json::json;

    use super::*;
    use crate::notifications::Severity;
    use crate::testing::FakeServer;

    fn seeded_server() -> FakeServer {
        let server = FakeServer::new();
        server.seed_decks(json!([
            {"id": 5, "title": "Geography", "color": "#009688", "icon": "fa-globe", "cardCount": 1},
            {"id": 6, "title": "Music", "color": "#673ab7", "icon": "fa-music", "cardCount": 0}
        ]));
        server.seed_cards(json!([
            {"id": 1, "deckId": 5, "question": "Capital of Japan?", "answer": "Tokyo", "difficulty": 1}
        ]));
        server
    }

    async fn loaded_cards_state(server: &FakeServer) -> CardsState {
        let client = server.client();
        let mut state = CardsState::default();
        let ticket = state.decks.begin_load();
        state.decks.finish_load(ticket, Ok(client.decks().fetch_all().await.unwrap()));
        state.page.apply_reload(client.cards().fetch_all().await);
        state
    }

    #[test]
    fn test_new_card_blocked_without_decks() {
        let mut state = CardsState::default();
        let notice = state.open_create().unwrap_err();
        assert_eq!(notice.severity, Severity::Warning);
        assert!(!state.page.editor.is_open());
    }

    #[tokio::test]
    async fn test_create_card_posts_fields_and_reloads_once() {
        let server = seeded_server();
        let mut state = loaded_cards_state(&server).await;
        let requests_before = server.requests().len();

        state.open_create().unwrap();
        state.page.update_form(|form| {
            form.question = "Q".to_string();
            form.answer = "A".to_string();
            form.deck_id = "5".to_string();
            form.difficulty = "2".to_string();
        });
        let (mode, draft) = state.page.begin_save().unwrap();
        assert!(state.page.editor.get().unwrap().saving);

        let client = server.client();
        let (outcome, reload) = save_and_reload(&client.cards(), &mode, &draft).await;
        let notice = state.page.finish_save(&mode, outcome);
        state.page.apply_reload(reload.unwrap());

        let requests = &server.requests()[requests_before..];
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].method, Method::POST);
        assert_eq!(requests[0].path, "/api/cards");
        assert_eq!(
            requests[0].body,
            Some(json!({"question": "Q", "answer": "A", "deckId": 5, "difficulty": 2}))
        );
        assert_eq!(requests[1].method, Method::GET);
        assert_eq!(requests[1].path, "/api/cards");

        assert_eq!(notice, Notice::success("Card created successfully!"));
        assert!(!state.page.editor.is_open());
        assert_eq!(state.page.items.len(), 2);
    }

    #[tokio::test]
    async fn test_invalid_form_stays_open_without_request() {
        let server = seeded_server();
        let mut state = loaded_cards_state(&server).await;
        let requests_before = server.requests().len();

        state.open_create().unwrap();
        state.page.update_form(|form| form.question = "Only a question".to_string());
        let notice = state.page.begin_save().unwrap_err();

        assert_eq!(notice.severity, Severity::Error);
        assert!(state.page.editor.is_open());
        assert!(!state.page.editor.get().unwrap().saving);
        assert_eq!(server.requests().len(), requests_before);
    }

    #[tokio::test]
    async fn test_failed_save_keeps_modal_open_and_reenables_submit() {
        let server = seeded_server();
        let mut state = loaded_cards_state(&server).await;

        state.page.open_edit(&EntityId::from(1)).unwrap();
        let (_, draft) = state.page.begin_save().unwrap();
        let missing = FormMode::Edit(EntityId::from(404));

        let client = server.client();
        let (outcome, reload) = save_and_reload(&client.cards(), &missing, &draft).await;
        assert!(reload.is_none());
        let notice = state.page.finish_save(&missing, outcome);

        assert_eq!(notice, Notice::error("Not found"));
        let editor = state.page.editor.get().unwrap();
        assert!(!editor.saving);
        assert_eq!(editor.form.answer, "Tokyo");
    }

    #[tokio::test]
    async fn test_delete_missing_card_reloads_and_reports_error() {
        let server = seeded_server();
        let mut state = loaded_cards_state(&server).await;

        state.page.ask_delete(EntityId::from(7));
        let id = state.page.begin_delete().unwrap();
        let client = server.client();
        let (outcome, reload) = delete_and_reload(&client.cards(), &id).await;
        let notice = state.page.finish_delete(outcome);
        state.page.apply_reload(reload.unwrap());

        assert_eq!(notice.severity, Severity::Error);
        assert!(!state.page.confirm_delete.is_open());
        assert!(state.page.items.find(&EntityId::from(7)).is_none());
        assert_eq!(state.page.items.len(), 1);
        assert_eq!(server.requests().last().unwrap().method, Method::GET);
    }

    #[tokio::test]
    async fn test_delete_existing_deck() {
        let server = seeded_server();
        let client = server.client();
        let mut state = DecksState::default();
        state.page.apply_reload(client.decks().fetch_all().await);

        state.page.ask_delete(EntityId::from(6));
        let id = state.page.begin_delete().unwrap();
        assert!(state.page.begin_delete().is_none(), "second confirm is ignored while deleting");
        let (outcome, reload) = delete_and_reload(&client.decks(), &id).await;
        let notice = state.page.finish_delete(outcome);
        state.page.apply_reload(reload.unwrap());

        assert_eq!(notice, Notice::success("Deck deleted successfully!"));
        assert_eq!(state.page.items.len(), 1);
    }

    #[tokio::test]
    async fn test_session_expiry_during_delete_skips_reload() {
        let server = seeded_server();
        let client = server.client();
        client.session().clear();

        let (outcome, reload) = delete_and_reload(&client.cards(), &EntityId::from(1)).await;
        assert_eq!(outcome, Err(ApiError::Unauthorized));
        assert!(reload.is_none());
        assert!(server.requests().is_empty());
        assert_eq!(server.navigator().visits(), vec!["/login".to_string()]);
    }

    #[tokio::test]
    async fn test_edit_prefills_form() {
        let server = seeded_server();
        let mut state = loaded_cards_state(&server).await;
        state.page.open_edit(&EntityId::from(1)).unwrap();

        let editor = state.page.editor.get().unwrap();
        assert_eq!(editor.mode, FormMode::Edit(EntityId::from(1)));
        assert_eq!(editor.form.question, "Capital of Japan?");
        assert_eq!(editor.form.deck_id, "5");
        assert_eq!(editor.form.difficulty, "1");

        assert!(state.page.open_edit(&EntityId::from(99)).is_err());
    }

    #[test]
    fn test_blank_card_form_uses_deck_filter() {
        let mut state = CardsState::default();
        let ticket = state.decks.begin_load();
        state.decks.finish_load(
            ticket,
            Ok(serde_json::from_value(json!([{"id": 5, "title": "Geo"}])).unwrap()),
        );
        state.set_deck_filter("5");
        state.open_create().unwrap();
        assert_eq!(state.page.editor.get().unwrap().form.deck_id, "5");

        state.set_deck_filter("");
        assert_eq!(state.page.criteria.deck, None);
    }

    #[test]
    fn test_dismiss_modals_respects_pending_requests() {
        let mut state = DecksState::default();
        state.page.open_create();
        state.page.update_form(|f| f.title = "Art".to_string());
        state.page.begin_save().unwrap();
        state.open_import(EntityId::from(1));

        state.dismiss_modals();
        assert!(state.page.editor.is_open());
        assert!(!state.import.is_open());
    }

    #[test]
    fn test_deck_badge_placeholders() {
        let mut decks = Collection::default();
        let ticket = decks.begin_load();
        decks.finish_load(
            ticket,
            Ok(serde_json::from_value(json!([{"id": 1, "title": "Art", "color": "#e91e63"}])).unwrap()),
        );
        let card = |deck: serde_json::Value| -> Card {
            serde_json::from_value(json!({"id": 10, "deckId": deck})).unwrap()
        };

        assert_eq!(deck_badge(&decks, &card(json!(1))).name, "Art");
        assert_eq!(deck_badge(&decks, &card(json!(2))).name, "Deck not found");
        assert_eq!(deck_badge(&decks, &card(json!(null))).name, "No deck");
    }

    #[test]
    fn test_badge_follows_deck_reload() {
        let mut state = CardsState::default();
        let card: Card = serde_json::from_value(json!({"id": 10, "deckId": 1})).unwrap();

        let ticket = state.decks.begin_load();
        state.decks.finish_load(ticket, Err("offline".to_string()));
        assert_eq!(state.badge(&card).name, "Deck not found");

        let ticket = state.decks.begin_load();
        state.decks.finish_load(
            ticket,
            Ok(serde_json::from_value(json!([{"id": 1, "title": "History", "color": "#ff9800"}])).unwrap()),
        );
        assert_eq!(
            state.badge(&card),
            DeckBadge {
                name: "History".to_string(),
                color: "#ff9800".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_quick_add_refreshes_deck_counts() {
        let server = seeded_server();
        let client = server.client();
        let mut state = DecksState::default();
        state.page.apply_reload(client.decks().fetch_all().await);

        state.open_quick_add(EntityId::from(6));
        if let Some(quick) = state.quick_add.get_mut() {
            quick.form.question = "Who wrote the Ninth?".to_string();
            quick.form.answer = "Beethoven".to_string();
        }
        let (deck_id, content) = state.begin_quick_add().unwrap();
        let (outcome, reload) = quick_add_and_reload(&client, &deck_id, &content).await;
        let notice = state.finish_quick_add(outcome);
        state.page.apply_reload(reload.unwrap());

        assert_eq!(notice.severity, Severity::Success);
        assert!(!state.quick_add.is_open());
        let post = server
            .requests()
            .into_iter()
            .find(|r| r.method == Method::POST)
            .unwrap();
        assert_eq!(post.path, "/api/decks/6/cards");
        assert_eq!(
            post.body,
            Some(json!({"question": "Who wrote the Ninth?", "answer": "Beethoven", "difficulty": 2}))
        );
    }

    #[tokio::test]
    async fn test_import_parses_then_posts_batch() {
        let server = seeded_server();
        let client = server.client();
        let mut state = DecksState::default();

        state.open_import(EntityId::from(5));
        if let Some(draft) = state.import.get_mut() {
            draft.text = "Capital of Peru; Lima\nCapital of Chile | Santiago".to_string();
            draft.difficulty = "3".to_string();
        }
        let (deck_id, cards) = state.begin_import().unwrap();
        assert_eq!(cards.len(), 2);
        let (outcome, reload) = import_and_reload(&client, &deck_id, &cards).await;
        let notice = state.finish_import(outcome);

        assert_eq!(notice, Notice::success("2 cards imported."));
        assert!(reload.unwrap().is_ok());
        assert_eq!(client.cards().fetch_all().await.unwrap().len(), 3);
    }

    #[test]
    fn test_malformed_import_keeps_modal_open() {
        let mut state = DecksState::default();
        state.open_import(EntityId::from(5));
        if let Some(draft) = state.import.get_mut() {
            draft.text = "no separator here".to_string();
        }
        let notice = state.begin_import().unwrap_err();
        assert_eq!(notice.severity, Severity::Error);
        assert!(state.import.is_open());
        assert!(!state.import.get().unwrap().saving);
    }

    #[test]
    fn test_empty_messages() {
        assert_eq!(empty_message(EmptyState::NoItems, "decks"), "No decks yet. Create the first one!");
        assert_eq!(
            empty_message(EmptyState::NoMatches, "cards"),
            "No cards match the current filters."
        );
    }

    #[test]
    fn test_stale_failure_is_silent() {
        let mut page: EntityPage<Deck> = EntityPage::default();
        let old = page.items.begin_load();
        let new = page.items.begin_load();
        assert!(page.apply_load(old, Err(ApiError::Network("slow".into()))).is_none());
        assert!(page.apply_load(new, Ok(vec![])).is_none());
        assert_eq!(page.items.state(), &crate::collection::LoadState::Ready);
    }
}
