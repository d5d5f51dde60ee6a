use std::marker::PhantomData;

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::model::{Card, CardContent, CardDraft, Deck, DeckDraft, EntityId};
use crate::session::Profile;
use crate::transport::{decode, encode, ApiClient};

/// A REST collection that the front-end caches and edits.
pub trait Resource: DeserializeOwned + Clone + 'static {
    type Draft: Serialize;

    /// Path segment under the resource prefix, e.g. `decks`.
    const COLLECTION: &'static str;

    fn id(&self) -> &EntityId;
}

impl Resource for Deck {
    type Draft = DeckDraft;
    const COLLECTION: &'static str = "decks";

    fn id(&self) -> &EntityId {
        &self.id
    }
}

impl Resource for Card {
    type Draft = CardDraft;
    const COLLECTION: &'static str = "cards";

    fn id(&self) -> &EntityId {
        &self.id
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ListBody<T> {
    Bare(Vec<T>),
    Wrapped {
        #[serde(alias = "items", alias = "decks", alias = "cards")]
        data: Vec<T>,
    },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CountBody {
    Bare(u64),
    Wrapped { count: u64 },
}

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct Registration<'a> {
    username: &'a str,
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    token: String,
    user: Profile,
}

#[derive(Serialize)]
struct ImportRequest<'a> {
    cards: &'a [CardContent],
}

#[derive(Deserialize)]
struct ImportResponse {
    imported: Option<usize>,
}

impl ApiClient {
    /// Log in and persist the returned session.
    pub async fn login(&self, email: &str, password: &str) -> Result<Profile, ApiError> {
        let body = encode(&Credentials { email, password })?;
        let raw = self.send_public(Method::POST, "/login", Some(body)).await?;
        let response: LoginResponse = decode(&raw)?;
        self.session().save(&response.token, &response.user);
        leptos::logging::log!("logged in as {}", response.user.email);
        Ok(response.user)
    }

    pub async fn register(&self, username: &str, email: &str, password: &str) -> Result<(), ApiError> {
        let body = encode(&Registration {
            username,
            email,
            password,
        })?;
        self.send_public(Method::POST, "/register", Some(body))
            .await
            .map(|_| ())
    }

    pub fn decks(&self) -> ResourceClient<'_, Deck> {
        ResourceClient::new(self)
    }

    pub fn cards(&self) -> ResourceClient<'_, Card> {
        ResourceClient::new(self)
    }
}

/// CRUD over one resource collection. Mutations return nothing: callers
/// re-fetch the collection afterwards instead of patching their copy.
pub struct ResourceClient<'a, R> {
    api: &'a ApiClient,
    _resource: PhantomData<R>,
}

impl<'a, R: Resource> ResourceClient<'a, R> {
    fn new(api: &'a ApiClient) -> Self {
        Self {
            api,
            _resource: PhantomData,
        }
    }

    fn path(&self, rest: Option<&str>) -> String {
        match rest {
            Some(rest) => self
                .api
                .config()
                .resource_path(&format!("{}/{}", R::COLLECTION, rest)),
            None => self.api.config().resource_path(R::COLLECTION),
        }
    }

    pub async fn fetch_all(&self) -> Result<Vec<R>, ApiError> {
        let body: ListBody<R> = self.api.get_json(&self.path(None)).await?;
        Ok(match body {
            ListBody::Bare(items) => items,
            ListBody::Wrapped { data } => data,
        })
    }

    pub async fn create(&self, draft: &R::Draft) -> Result<(), ApiError> {
        self.api.post_json(&self.path(None), draft).await.map(|_| ())
    }

    pub async fn update(&self, id: &EntityId, draft: &R::Draft) -> Result<(), ApiError> {
        self.api
            .put_json(&self.path(Some(id.as_str())), draft)
            .await
            .map(|_| ())
    }

    pub async fn delete(&self, id: &EntityId) -> Result<(), ApiError> {
        self.api.delete(&self.path(Some(id.as_str()))).await
    }

    pub async fn count(&self) -> Result<u64, ApiError> {
        let body: CountBody = self.api.get_json(&self.path(Some("count"))).await?;
        Ok(match body {
            CountBody::Bare(n) => n,
            CountBody::Wrapped { count } => count,
        })
    }
}

impl ResourceClient<'_, Deck> {
    pub async fn add_card(&self, deck_id: &EntityId, card: &CardContent) -> Result<(), ApiError> {
        let path = self.path(Some(&format!("{}/cards", deck_id)));
        self.api.post_json(&path, card).await.map(|_| ())
    }

    /// Bulk-create cards in a deck. Returns how many the server accepted.
    pub async fn import_cards(
        &self,
        deck_id: &EntityId,
        cards: &[CardContent],
    ) -> Result<usize, ApiError> {
        let path = self.path(Some(&format!("{}/cards/import", deck_id)));
        let raw = self.api.post_json(&path, &ImportRequest { cards }).await?;
        let imported = serde_json::from_str::<ImportResponse>(&raw)
            .ok()
            .and_then(|r| r.imported)
            .unwrap_or(cards.len());
        Ok(imported)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::model::Difficulty;
    use crate::testing::{client_with, logged_in_client, respond, FakeServer};

    fn card_draft(question: &str, deck: i64) -> CardDraft {
        CardDraft {
            question: question.to_string(),
            answer: "A".to_string(),
            deck_id: EntityId::from(deck),
            difficulty: Difficulty::Hard,
        }
    }

    #[tokio::test]
    async fn test_login_persists_session() {
        let (client, backend, _) = client_with(respond(
            200,
            r#"{"token":"jwt-1","user":{"id":4,"name":"Rui","email":"rui@x.io"}}"#,
        ));

        let user = client.login("rui@x.io", "secret123").await.unwrap();
        assert_eq!(user.name, "Rui");
        assert_eq!(client.session().token().as_deref(), Some("jwt-1"));

        let request = &backend.requests()[0];
        assert_eq!(request.path, "/login");
        assert_eq!(request.body, Some(json!({"email": "rui@x.io", "password": "secret123"})));
    }

    #[tokio::test]
    async fn test_register_sends_username() {
        let (client, backend, _) = client_with(respond(201, "{}"));
        client.register("bruna", "b@x.io", "longpassword").await.unwrap();
        assert_eq!(
            backend.requests()[0].body,
            Some(json!({"username": "bruna", "email": "b@x.io", "password": "longpassword"}))
        );
        assert!(!client.session().has_session());
    }

    #[tokio::test]
    async fn test_fetch_all_accepts_wrapped_lists() {
        let (client, _, _) = logged_in_client(respond(
            200,
            r#"{"decks":[{"id":1,"title":"Math"},{"id":2,"title":"Art"}]}"#,
        ));
        let decks = client.decks().fetch_all().await.unwrap();
        assert_eq!(decks.len(), 2);
        assert_eq!(decks[1].title, "Art");
    }

    #[tokio::test]
    async fn test_fetch_all_tolerates_null_fields() {
        let (client, _, _) = logged_in_client(respond(
            200,
            r#"[{"id":1,"deckId":3,"question":"Q1","answer":"A1","difficulty":1},
                {"id":2,"deckId":3,"question":"Q2","answer":null,"difficulty":null},
                {"id":3,"deckId":3,"question":"Q3","answer":"A3","difficulty":"extreme"}]"#,
        ));
        let cards = client.cards().fetch_all().await.unwrap();
        assert_eq!(cards.len(), 3);
        assert_eq!(cards[1].answer, "");
        assert_eq!(cards[1].difficulty, Difficulty::Medium);
        assert_eq!(cards[2].difficulty, Difficulty::Medium);

        let (client, _, _) = logged_in_client(respond(
            200,
            r#"{"data":[{"id":1,"title":"Math","color":null,"cardCount":null}]}"#,
        ));
        let decks = client.decks().fetch_all().await.unwrap();
        assert_eq!(decks[0].card_count, 0);
        assert_eq!(decks[0].color, crate::model::DEFAULT_DECK_COLOR);
    }

    #[tokio::test]
    async fn test_fetch_all_preserves_server_order() {
        let (client, _, _) = logged_in_client(respond(
            200,
            r#"[{"id":9,"question":"b"},{"id":2,"question":"a"},{"id":5,"question":"c"}]"#,
        ));
        let ids: Vec<_> = client
            .cards()
            .fetch_all()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.id.to_string())
            .collect();
        assert_eq!(ids, vec!["9", "2", "5"]);
    }

    #[tokio::test]
    async fn test_create_then_fetch_round_trip() {
        let server = FakeServer::new();
        let client = server.client();

        let draft = card_draft("What is 2+2?", 3);
        client.cards().create(&draft).await.unwrap();
        let cards = client.cards().fetch_all().await.unwrap();
        assert!(cards.iter().any(|c| c.matches_draft(&draft)));

        let deck = DeckDraft {
            title: "Chemistry".to_string(),
            color: "#009688".to_string(),
            icon: "fa-flask".to_string(),
        };
        client.decks().create(&deck).await.unwrap();
        let decks = client.decks().fetch_all().await.unwrap();
        assert!(decks.iter().any(|d| d.matches_draft(&deck)));
    }

    #[tokio::test]
    async fn test_update_and_delete_paths() {
        let (client, backend, _) = logged_in_client(respond(204, ""));
        client.cards().update(&EntityId::from(7), &card_draft("Q", 1)).await.unwrap();
        client.decks().delete(&EntityId::from("abc")).await.unwrap();

        let requests = backend.requests();
        assert_eq!(requests[0].method, Method::PUT);
        assert_eq!(requests[0].path, "/api/cards/7");
        assert_eq!(requests[1].method, Method::DELETE);
        assert_eq!(requests[1].path, "/api/decks/abc");
        assert_eq!(requests[1].body, None);
    }

    #[tokio::test]
    async fn test_count_formats() {
        let (client, _, _) = logged_in_client(respond(200, "12"));
        assert_eq!(client.decks().count().await.unwrap(), 12);

        let (client, backend, _) = logged_in_client(respond(200, r#"{"count":40}"#));
        assert_eq!(client.cards().count().await.unwrap(), 40);
        assert_eq!(backend.requests()[0].path, "/api/cards/count");
    }

    #[tokio::test]
    async fn test_deck_card_endpoints() {
        let (client, backend, _) = logged_in_client(respond(200, r#"{"imported":1}"#));
        let content = CardContent {
            question: "Sun?".to_string(),
            answer: "Star".to_string(),
            difficulty: Difficulty::Easy,
        };
        let deck = EntityId::from(4);

        client.decks().add_card(&deck, &content).await.unwrap();
        let imported = client
            .decks()
            .import_cards(&deck, &[content.clone(), content.clone()])
            .await
            .unwrap();
        assert_eq!(imported, 1);

        let requests = backend.requests();
        assert_eq!(requests[0].path, "/api/decks/4/cards");
        assert_eq!(requests[1].path, "/api/decks/4/cards/import");
        assert_eq!(
            requests[1].body.as_ref().unwrap()["cards"][0],
            json!({"question": "Sun?", "answer": "Star", "difficulty": 1})
        );
    }
}
