use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub const DEFAULT_DECK_COLOR: &str = "#4f6bed";
pub const DEFAULT_DECK_ICON: &str = "fa-book";

/// Server-assigned identifier. The backend may send numbers or strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntityId(String);

impl EntityId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn as_int(&self) -> Option<i64> {
        self.0.parse().ok()
    }
}

impl From<i64> for EntityId {
    fn from(value: i64) -> Self {
        Self(value.to_string())
    }
}

impl From<&str> for EntityId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Integer ids order numerically and before any non-integer id.
impl Ord for EntityId {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.as_int(), other.as_int()) {
            (Some(a), Some(b)) => a.cmp(&b).then_with(|| self.0.cmp(&other.0)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.0.cmp(&other.0),
        }
    }
}

impl PartialOrd for EntityId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawScalar {
    Int(i64),
    Text(String),
}

impl Serialize for EntityId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.as_int() {
            Some(n) if n.to_string() == self.0 => serializer.serialize_i64(n),
            _ => serializer.serialize_str(&self.0),
        }
    }
}

impl<'de> Deserialize<'de> for EntityId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match RawScalar::deserialize(deserializer)? {
            RawScalar::Int(n) => EntityId::from(n),
            RawScalar::Text(s) => EntityId(s),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn rank(self) -> u8 {
        match self {
            Difficulty::Easy => 1,
            Difficulty::Medium => 2,
            Difficulty::Hard => 3,
        }
    }

    pub fn from_rank(rank: i64) -> Option<Self> {
        match rank {
            1 => Some(Difficulty::Easy),
            2 => Some(Difficulty::Medium),
            3 => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Parse a form or wire value: `1..3`, or an English or Portuguese name.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim().to_lowercase();
        if let Ok(rank) = value.parse::<i64>() {
            return Self::from_rank(rank);
        }
        match value.as_str() {
            "facil" | "fácil" | "easy" => Some(Difficulty::Easy),
            "medio" | "médio" | "medium" => Some(Difficulty::Medium),
            "dificil" | "difícil" | "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            Difficulty::Easy => "difficulty-easy",
            Difficulty::Medium => "difficulty-medium",
            Difficulty::Hard => "difficulty-hard",
        }
    }

    /// Value used in `<select>` options.
    pub fn value(self) -> String {
        self.rank().to_string()
    }
}

impl Serialize for Difficulty {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.rank())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDifficulty {
    Int(i64),
    Text(String),
    Other(serde::de::IgnoredAny),
}

/// Null or unrecognized values read as the default difficulty.
impl<'de> Deserialize<'de> for Difficulty {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let parsed = match RawDifficulty::deserialize(deserializer)? {
            RawDifficulty::Int(n) => Difficulty::from_rank(n),
            RawDifficulty::Text(s) => Difficulty::parse(&s),
            RawDifficulty::Other(_) => None,
        };
        Ok(parsed.unwrap_or_default())
    }
}

fn default_color() -> String {
    DEFAULT_DECK_COLOR.to_string()
}

fn default_icon() -> String {
    DEFAULT_DECK_ICON.to_string()
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn color_or_default<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?
        .filter(|c| !c.trim().is_empty())
        .unwrap_or_else(default_color))
}

fn icon_or_default<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?
        .filter(|i| !i.trim().is_empty())
        .unwrap_or_else(default_icon))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deck {
    pub id: EntityId,
    #[serde(alias = "name", default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default = "default_color", deserialize_with = "color_or_default")]
    pub color: String,
    #[serde(default = "default_icon", deserialize_with = "icon_or_default")]
    pub icon: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub card_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckDraft {
    pub title: String,
    pub color: String,
    pub icon: String,
}

#[cfg(test)]
impl Deck {
    pub fn matches_draft(&self, draft: &DeckDraft) -> bool {
        self.title == draft.title && self.color == draft.color && self.icon == draft.icon
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: EntityId,
    #[serde(default)]
    pub deck_id: Option<EntityId>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub question: String,
    #[serde(alias = "response", default, deserialize_with = "null_as_default")]
    pub answer: String,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Fields of a card create/update request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardDraft {
    pub question: String,
    pub answer: String,
    pub deck_id: EntityId,
    pub difficulty: Difficulty,
}

/// A card without its deck, as posted to a deck's own card endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardContent {
    pub question: String,
    pub answer: String,
    pub difficulty: Difficulty,
}

impl Card {
    #[cfg(test)]
    pub fn matches_draft(&self, draft: &CardDraft) -> bool {
        self.question == draft.question
            && self.answer == draft.answer
            && self.deck_id.as_ref() == Some(&draft.deck_id)
            && self.difficulty == draft.difficulty
    }

    /// Creation date as shown on the card, e.g. `05 Mar 2025`.
    pub fn created_label(&self) -> Option<String> {
        let raw = self.created_at.as_deref()?.trim();
        if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
            return Some(ts.format("%d %b %Y").to_string());
        }
        let date_part = raw.get(..10).unwrap_or(raw);
        NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
            .ok()
            .map(|d| d.format("%d %b %Y").to_string())
    }
}
