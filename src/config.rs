use std::time::Duration;

const DEFAULT_API_URL: &str = "https://flashcards-backend-ejyn.onrender.com";
const DEFAULT_RESOURCE_PREFIX: &str = "/api";

/// Application settings, fixed at build time.
///
/// `FLASHDECK_API_URL` and `FLASHDECK_API_PREFIX` may be set in the build
/// environment to point the front-end at another backend.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub api_base_url: String,
    pub resource_prefix: String,
    pub notification_ttl: Duration,
    pub redirect_delay: Duration,
    pub tab_switch_delay: Duration,
    pub min_password_len: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL, DEFAULT_RESOURCE_PREFIX)
    }
}

impl AppConfig {
    pub fn new(base_url: &str, resource_prefix: &str) -> Self {
        Self {
            api_base_url: base_url.trim().trim_end_matches('/').to_string(),
            resource_prefix: normalize_prefix(resource_prefix),
            notification_ttl: Duration::from_millis(3000),
            redirect_delay: Duration::from_millis(1000),
            tab_switch_delay: Duration::from_millis(2000),
            min_password_len: 8,
        }
    }

    pub fn load() -> Self {
        Self::new(
            option_env!("FLASHDECK_API_URL").unwrap_or(DEFAULT_API_URL),
            option_env!("FLASHDECK_API_PREFIX").unwrap_or(DEFAULT_RESOURCE_PREFIX),
        )
    }

    /// Path of an entity endpoint, e.g. `resource_path("cards/7")` -> `/api/cards/7`.
    pub fn resource_path(&self, rest: &str) -> String {
        format!("{}/{}", self.resource_prefix, rest.trim_start_matches('/'))
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base_url, path)
    }
}

fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let config = AppConfig::new("http://localhost:3001/", "/api");
        assert_eq!(config.url("/login"), "http://localhost:3001/login");
    }

    #[test]
    fn test_resource_paths() {
        let config = AppConfig::new("http://localhost:3001", "api/");
        assert_eq!(config.resource_path("cards"), "/api/cards");
        assert_eq!(config.resource_path("/decks/3/cards"), "/api/decks/3/cards");

        let bare = AppConfig::new("http://localhost:3001", "");
        assert_eq!(bare.resource_path("decks/count"), "/decks/count");
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.resource_prefix, "/api");
        assert_eq!(config.notification_ttl, Duration::from_secs(3));
        assert_eq!(config.min_password_len, 8);
    }
}
