pub mod auth;
pub mod cards;
pub mod dashboard;
pub mod decks;
