use crate::error::ApiError;
use crate::model::{
    Card, CardContent, CardDraft, Deck, DeckDraft, Difficulty, EntityId, DEFAULT_DECK_COLOR,
    DEFAULT_DECK_ICON,
};

pub const COLOR_PRESETS: &[&str] = &[
    "#4f6bed", "#4caf50", "#ff9800", "#e91e63", "#009688", "#673ab7",
];

/// Font Awesome icons offered for decks, with their labels.
pub const ICON_OPTIONS: &[(&str, &str)] = &[
    ("fa-book", "Book"),
    ("fa-square-root-variable", "Math"),
    ("fa-language", "Languages"),
    ("fa-code", "Programming"),
    ("fa-landmark", "History"),
    ("fa-dna", "Biology"),
    ("fa-flask", "Chemistry"),
    ("fa-bullhorn", "Marketing"),
];

fn invalid(message: &str) -> ApiError {
    ApiError::Validation(message.to_string())
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.email.trim().is_empty() || self.password.is_empty() {
            return Err(invalid("Email and password are required."));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegisterForm {
    pub fn validate(&self, min_password_len: usize) -> Result<(), ApiError> {
        if self.username.trim().is_empty()
            || self.email.trim().is_empty()
            || self.password.is_empty()
            || self.confirm_password.is_empty()
        {
            return Err(invalid("All fields are required."));
        }
        if self.password != self.confirm_password {
            return Err(invalid("Passwords do not match."));
        }
        if self.password.chars().count() < min_password_len {
            return Err(ApiError::Validation(format!(
                "Password must be at least {} characters.",
                min_password_len
            )));
        }
        Ok(())
    }
}

/// Card editor contents, as typed into the form controls.
#[derive(Debug, Clone, PartialEq)]
pub struct CardForm {
    pub question: String,
    pub answer: String,
    /// Selected deck option value; empty when nothing is selected.
    pub deck_id: String,
    pub difficulty: String,
}

impl CardForm {
    pub fn blank(deck: Option<&EntityId>) -> Self {
        Self {
            question: String::new(),
            answer: String::new(),
            deck_id: deck.map(|d| d.to_string()).unwrap_or_default(),
            difficulty: Difficulty::default().value(),
        }
    }

    pub fn from_card(card: &Card) -> Self {
        Self {
            question: card.question.clone(),
            answer: card.answer.clone(),
            deck_id: card.deck_id.as_ref().map(|d| d.to_string()).unwrap_or_default(),
            difficulty: card.difficulty.value(),
        }
    }

    pub fn validate(&self) -> Result<CardDraft, ApiError> {
        let question = self.question.trim();
        let answer = self.answer.trim();
        let deck_id = self.deck_id.trim();
        if question.is_empty() || answer.is_empty() || deck_id.is_empty() {
            return Err(invalid("Fill in all required fields."));
        }
        Ok(CardDraft {
            question: question.to_string(),
            answer: answer.to_string(),
            deck_id: EntityId::new(deck_id),
            difficulty: Difficulty::parse(&self.difficulty).unwrap_or_default(),
        })
    }
}

/// Quick-add form on a deck tile; the deck is implied.
#[derive(Debug, Clone, PartialEq)]
pub struct QuickCardForm {
    pub question: String,
    pub answer: String,
    pub difficulty: String,
}

impl Default for QuickCardForm {
    fn default() -> Self {
        Self {
            question: String::new(),
            answer: String::new(),
            difficulty: Difficulty::default().value(),
        }
    }
}

impl QuickCardForm {
    pub fn validate(&self) -> Result<CardContent, ApiError> {
        let question = self.question.trim();
        let answer = self.answer.trim();
        if question.is_empty() || answer.is_empty() {
            return Err(invalid("Fill in all required fields."));
        }
        Ok(CardContent {
            question: question.to_string(),
            answer: answer.to_string(),
            difficulty: Difficulty::parse(&self.difficulty).unwrap_or_default(),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeckForm {
    pub title: String,
    pub color: String,
    pub icon: String,
}

impl Default for DeckForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            color: DEFAULT_DECK_COLOR.to_string(),
            icon: DEFAULT_DECK_ICON.to_string(),
        }
    }
}

impl DeckForm {
    pub fn from_deck(deck: &Deck) -> Self {
        Self {
            title: deck.title.clone(),
            color: deck.color.clone(),
            icon: deck.icon.clone(),
        }
    }

    pub fn validate(&self) -> Result<DeckDraft, ApiError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(invalid("Deck title is required."));
        }
        let color = match self.color.trim() {
            "" => DEFAULT_DECK_COLOR.to_string(),
            c if is_hex_color(c) => c.to_lowercase(),
            _ => return Err(invalid("Choose a valid color, e.g. #4f6bed.")),
        };
        let icon = match self.icon.trim() {
            "" => DEFAULT_DECK_ICON.to_string(),
            i => i.to_string(),
        };
        Ok(DeckDraft {
            title: title.to_string(),
            color,
            icon,
        })
    }
}

fn is_hex_color(value: &str) -> bool {
    let Some(digits) = value.strip_prefix('#') else {
        return false;
    };
    matches!(digits.len(), 3 | 6) && digits.chars().all(|c| c.is_ascii_hexdigit())
}
