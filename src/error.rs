use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// Rejected locally before any request was sent.
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Session expired")]
    Unauthorized,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Unexpected response status {status}")]
    Unexpected { status: u16 },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response: {0}")]
    Decode(String),
}

/// Error taxonomy used to decide how a failure is surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Authentication,
    Rejected,
    Unavailable,
}

/// The user action that produced an error, used to pick a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Login,
    Register,
    Load,
    Save,
    Delete,
    Import,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl ApiError {
    /// Map a non-success HTTP status and its body to an error.
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = server_message(body).unwrap_or_default();
        match status {
            401 => ApiError::Unauthorized,
            403 => ApiError::Forbidden(message),
            404 => ApiError::NotFound(message),
            409 => ApiError::Conflict(message),
            400 | 422 => ApiError::BadRequest(message),
            500..=599 => ApiError::Server { status, message },
            _ => ApiError::Unexpected { status },
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Validation(_) => ErrorKind::Validation,
            ApiError::Unauthorized => ErrorKind::Authentication,
            ApiError::Forbidden(_)
            | ApiError::NotFound(_)
            | ApiError::Conflict(_)
            | ApiError::BadRequest(_) => ErrorKind::Rejected,
            ApiError::Server { .. }
            | ApiError::Unexpected { .. }
            | ApiError::Network(_)
            | ApiError::Decode(_) => ErrorKind::Unavailable,
        }
    }

    pub fn is_auth_failure(&self) -> bool {
        self.kind() == ErrorKind::Authentication
    }

    /// Message the server attached to the error, if any.
    pub fn server_detail(&self) -> Option<&str> {
        match self {
            ApiError::Forbidden(m)
            | ApiError::NotFound(m)
            | ApiError::Conflict(m)
            | ApiError::BadRequest(m)
            | ApiError::Server { message: m, .. } => {
                if m.is_empty() {
                    None
                } else {
                    Some(m.as_str())
                }
            }
            _ => None,
        }
    }
}

fn server_message(body: &str) -> Option<String> {
    let body = serde_json::from_str::<ErrorBody>(body).ok()?;
    [body.error, body.message]
        .into_iter()
        .flatten()
        .map(|m| m.trim().to_string())
        .find(|m| !m.is_empty())
}

/// Translate an error into the text shown to the user.
pub fn user_message(error: &ApiError, action: Action) -> String {
    if let ApiError::Validation(msg) = error {
        return msg.clone();
    }

    match (action, error) {
        (Action::Login, ApiError::Unauthorized) => {
            return "Incorrect email or password.".to_string();
        }
        (Action::Login, ApiError::NotFound(_)) => {
            return "Email not found. Check the address or create an account.".to_string();
        }
        (Action::Register, ApiError::Conflict(_)) => {
            return "This email is already registered. Log in or use another email.".to_string();
        }
        _ => {}
    }

    match error.kind() {
        ErrorKind::Authentication => "Session expired. Please log in again.".to_string(),
        ErrorKind::Unavailable => match error {
            ApiError::Network(_) => {
                "Could not reach the server. Check your connection.".to_string()
            }
            _ => "Server unavailable. Please try again later.".to_string(),
        },
        ErrorKind::Rejected => {
            if let Some(detail) = error.server_detail() {
                return detail.to_string();
            }
            match (action, error) {
                (_, ApiError::NotFound(_)) => "The item no longer exists.".to_string(),
                (_, ApiError::Forbidden(_)) => {
                    "You do not have permission to do that.".to_string()
                }
                (_, ApiError::BadRequest(_)) => {
                    "Invalid form data. Check the fields.".to_string()
                }
                _ => generic_failure(action),
            }
        }
        ErrorKind::Validation => generic_failure(action),
    }
}

fn generic_failure(action: Action) -> String {
    match action {
        Action::Login => "Could not log in.",
        Action::Register => "Could not create the account.",
        Action::Load => "Could not load data. Please try again later.",
        Action::Save => "Could not save. Please try again.",
        Action::Delete => "Could not delete. Please try again.",
        Action::Import => "Could not import cards. Please try again.",
    }
    .to_string()
}
