use leptos::prelude::*;

use crate::session::{KeyValueStore, THEME_KEY};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Font Awesome icon for the toggle button: the theme it switches to.
    pub fn toggle_icon(self) -> &'static str {
        match self {
            Theme::Light => "fa-moon",
            Theme::Dark => "fa-sun",
        }
    }
}

/// Stored preference, else the system preference. The result is persisted
/// so later visits do not depend on the media query.
pub fn initial_theme(store: &dyn KeyValueStore, prefers_dark: bool) -> Theme {
    if let Some(theme) = store.get(THEME_KEY).as_deref().and_then(Theme::parse) {
        return theme;
    }
    let theme = if prefers_dark { Theme::Dark } else { Theme::Light };
    store.set(THEME_KEY, theme.as_str());
    theme
}

pub fn toggle_theme(store: &dyn KeyValueStore, current: Theme) -> Theme {
    let next = current.toggled();
    store.set(THEME_KEY, next.as_str());
    next
}

pub fn system_prefers_dark() -> bool {
    web_sys::window()
        .and_then(|w| w.match_media("(prefers-color-scheme: dark)").ok().flatten())
        .map(|mq| mq.matches())
        .unwrap_or(false)
}

#[derive(Clone, Copy)]
pub struct ThemeContext {
    pub theme: ReadSignal<Theme>,
    pub set_theme: WriteSignal<Theme>,
}

/// Apply the theme by setting the `data-theme` attribute on `<html>`.
pub fn apply_theme(theme: Theme) {
    if let Some(html) = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.document_element())
    {
        if html.set_attribute("data-theme", theme.as_str()).is_err() {
            leptos::logging::warn!("could not apply theme {}", theme.as_str());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MemoryStore;

    #[test]
    fn test_stored_theme_wins() {
        let store = MemoryStore::default();
        store.set(THEME_KEY, "dark");
        assert_eq!(initial_theme(&store, false), Theme::Dark);
    }

    #[test]
    fn test_system_preference_is_persisted() {
        let store = MemoryStore::default();
        assert_eq!(initial_theme(&store, true), Theme::Dark);
        assert_eq!(store.get(THEME_KEY).as_deref(), Some("dark"));

        let store = MemoryStore::default();
        store.set(THEME_KEY, "sepia");
        assert_eq!(initial_theme(&store, false), Theme::Light);
        assert_eq!(store.get(THEME_KEY).as_deref(), Some("light"));
    }

    #[test]
    fn test_toggle_persists() {
        let store = MemoryStore::default();
        let next = toggle_theme(&store, Theme::Light);
        assert_eq!(next, Theme::Dark);
        assert_eq!(store.get(THEME_KEY).as_deref(), Some("dark"));
        assert_eq!(toggle_theme(&store, next), Theme::Light);
    }
}
