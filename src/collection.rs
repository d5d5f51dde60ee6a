use std::cmp::Ordering;

use crate::api::Resource;
use crate::model::{Card, Deck, Difficulty, EntityId};

#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    Loading,
    Ready,
    Failed(String),
}

/// Client-side snapshot of a REST collection.
///
/// Loads are ticketed: only the completion of the most recently started load
/// is applied, so a slow response can never overwrite a newer one.
#[derive(Debug, Clone, PartialEq)]
pub struct Collection<R> {
    items: Vec<R>,
    state: LoadState,
    ticket: u64,
}

impl<R> Default for Collection<R> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            state: LoadState::Loading,
            ticket: 0,
        }
    }
}

impl<R: Resource> Collection<R> {
    pub fn items(&self) -> &[R] {
        &self.items
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn find(&self, id: &EntityId) -> Option<&R> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn begin_load(&mut self) -> u64 {
        self.ticket += 1;
        self.state = LoadState::Loading;
        self.ticket
    }

    /// Apply a finished load. Returns false when the ticket is stale.
    pub fn finish_load(&mut self, ticket: u64, result: Result<Vec<R>, String>) -> bool {
        if ticket != self.ticket {
            return false;
        }
        match result {
            Ok(items) => {
                self.items = items;
                self.state = LoadState::Ready;
            }
            Err(message) => self.state = LoadState::Failed(message),
        }
        true
    }
}

/// Predicate over a snapshot. Empty criteria match everything.
pub trait Filter<R> {
    fn is_empty(&self) -> bool;
    fn matches(&self, item: &R) -> bool;
}

fn contains_ci(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeckFilter {
    pub text: String,
}

impl Filter<Deck> for DeckFilter {
    fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }

    fn matches(&self, deck: &Deck) -> bool {
        contains_ci(&deck.title, &self.text.trim().to_lowercase())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CardFilter {
    pub text: String,
    pub deck: Option<EntityId>,
    pub difficulty: Option<Difficulty>,
}

impl Filter<Card> for CardFilter {
    fn is_empty(&self) -> bool {
        self.text.trim().is_empty() && self.deck.is_none() && self.difficulty.is_none()
    }

    fn matches(&self, card: &Card) -> bool {
        let needle = self.text.trim().to_lowercase();
        let text_ok =
            needle.is_empty() || contains_ci(&card.question, &needle) || contains_ci(&card.answer, &needle);
        let deck_ok = self
            .deck
            .as_ref()
            .map_or(true, |deck| card.deck_id.as_ref() == Some(deck));
        let difficulty_ok = self.difficulty.map_or(true, |d| card.difficulty == d);
        text_ok && deck_ok && difficulty_ok
    }
}

pub fn filter<R: Clone, F: Filter<R>>(items: &[R], criteria: &F) -> Vec<R> {
    if criteria.is_empty() {
        return items.to_vec();
    }
    items
        .iter()
        .filter(|item| criteria.matches(item))
        .cloned()
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Newest first, using the id as a stand-in for creation order.
    #[default]
    Recent,
    AlphaAsc,
    AlphaDesc,
    NumberAsc,
    NumberDesc,
}

impl SortKey {
    pub const ALL: [SortKey; 5] = [
        SortKey::Recent,
        SortKey::AlphaAsc,
        SortKey::AlphaDesc,
        SortKey::NumberDesc,
        SortKey::NumberAsc,
    ];

    pub fn value(self) -> &'static str {
        match self {
            SortKey::Recent => "recent",
            SortKey::AlphaAsc => "alpha-asc",
            SortKey::AlphaDesc => "alpha-desc",
            SortKey::NumberAsc => "number-asc",
            SortKey::NumberDesc => "number-desc",
        }
    }

    /// Unknown values fall back to `Recent`.
    pub fn from_value(value: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|key| key.value() == value)
            .unwrap_or_default()
    }

    /// `<select>` value for an optional sort; empty means server order.
    pub fn choice_value(sort: Option<SortKey>) -> &'static str {
        sort.map_or("", SortKey::value)
    }

    pub fn from_choice(value: &str) -> Option<SortKey> {
        match value.trim() {
            "" => None,
            other => Some(Self::from_value(other)),
        }
    }
}

/// Fields a collection can be ordered by.
pub trait Sortable: Resource {
    fn sort_text(&self) -> &str;
    fn sort_number(&self) -> i64;
}

impl Sortable for Deck {
    fn sort_text(&self) -> &str {
        &self.title
    }

    fn sort_number(&self) -> i64 {
        i64::from(self.card_count)
    }
}

impl Sortable for Card {
    fn sort_text(&self) -> &str {
        &self.question
    }

    fn sort_number(&self) -> i64 {
        i64::from(self.difficulty.rank())
    }
}

fn compare<R: Sortable>(a: &R, b: &R, key: SortKey) -> Ordering {
    let primary = match key {
        SortKey::Recent => Ordering::Equal,
        SortKey::AlphaAsc => a.sort_text().to_lowercase().cmp(&b.sort_text().to_lowercase()),
        SortKey::AlphaDesc => b.sort_text().to_lowercase().cmp(&a.sort_text().to_lowercase()),
        SortKey::NumberAsc => a.sort_number().cmp(&b.sort_number()),
        SortKey::NumberDesc => b.sort_number().cmp(&a.sort_number()),
    };
    primary.then_with(|| b.id().cmp(a.id()))
}

/// Sort a copy. Ties fall back to newest-first so the order is total.
pub fn sort<R: Sortable>(mut items: Vec<R>, key: SortKey) -> Vec<R> {
    items.sort_by(|a, b| compare(a, b, key));
    items
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyState {
    /// The collection itself has nothing in it.
    NoItems,
    /// Items exist but none pass the current filter.
    NoMatches,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Listing<R> {
    pub items: Vec<R>,
    pub total: usize,
    pub empty: Option<EmptyState>,
}

/// What a page renders for a snapshot under the current filter and sort.
/// With an empty filter and no sort the server order is kept.
pub fn project<R: Sortable, F: Filter<R>>(
    snapshot: &[R],
    criteria: &F,
    key: Option<SortKey>,
) -> Listing<R> {
    let filtered = filter(snapshot, criteria);
    let items = match key {
        Some(key) => sort(filtered, key),
        None => filtered,
    };
    let empty = if snapshot.is_empty() {
        Some(EmptyState::NoItems)
    } else if items.is_empty() {
        Some(EmptyState::NoMatches)
    } else {
        None
    };
    Listing {
        total: snapshot.len(),
        items,
        empty,
    }
}
