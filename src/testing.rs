//! In-memory stand-ins for the browser and the REST backend.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::config::AppConfig;
use crate::error::ApiError;
use crate::model::EntityId;
use crate::session::{MemoryStore, Profile, SessionStore};
use crate::transport::{ApiClient, ApiRequest, ApiResponse, HttpBackend, Navigator};

type Handler = Box<dyn Fn(&ApiRequest) -> ApiResponse>;

pub struct FakeBackend {
    handler: Handler,
    requests: RefCell<Vec<ApiRequest>>,
}

impl FakeBackend {
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.borrow().clone()
    }
}

#[async_trait(?Send)]
impl HttpBackend for FakeBackend {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let response = (self.handler)(&request);
        self.requests.borrow_mut().push(request);
        Ok(response)
    }
}

pub fn respond(status: u16, body: &'static str) -> impl Fn(&ApiRequest) -> ApiResponse + 'static {
    move |_| ApiResponse::new(status, body)
}

#[derive(Default)]
pub struct RecordingNavigator {
    visits: RefCell<Vec<String>>,
}

impl RecordingNavigator {
    pub fn visits(&self) -> Vec<String> {
        self.visits.borrow().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, path: &str) {
        self.visits.borrow_mut().push(path.to_string());
    }
}

pub fn profile() -> Profile {
    Profile {
        id: Some(EntityId::from(1)),
        name: "Tester".to_string(),
        email: "tester@example.com".to_string(),
    }
}

fn test_config() -> AppConfig {
    AppConfig::new("http://api.test", "/api")
}

pub fn client_with(
    handler: impl Fn(&ApiRequest) -> ApiResponse + 'static,
) -> (ApiClient, Rc<FakeBackend>, Rc<RecordingNavigator>) {
    let backend = Rc::new(FakeBackend {
        handler: Box::new(handler),
        requests: RefCell::new(Vec::new()),
    });
    let navigator = Rc::new(RecordingNavigator::default());
    let session = SessionStore::new(Rc::new(MemoryStore::default()));
    let client = ApiClient::new(backend.clone(), session, navigator.clone(), test_config());
    (client, backend, navigator)
}

pub fn logged_in_client(
    handler: impl Fn(&ApiRequest) -> ApiResponse + 'static,
) -> (ApiClient, Rc<FakeBackend>, Rc<RecordingNavigator>) {
    let (client, backend, navigator) = client_with(handler);
    client.session().save("token-1", &profile());
    (client, backend, navigator)
}

/// A tiny REST server keeping decks and cards in memory.
#[derive(Default)]
pub struct FakeServerState {
    decks: RefCell<Vec<Value>>,
    cards: RefCell<Vec<Value>>,
    next_id: Cell<i64>,
    requests: RefCell<Vec<ApiRequest>>,
}

impl FakeServerState {
    fn table(&self, name: &str) -> Option<&RefCell<Vec<Value>>> {
        match name {
            "decks" => Some(&self.decks),
            "cards" => Some(&self.cards),
            _ => None,
        }
    }

    fn allocate_id(&self) -> i64 {
        let id = self.next_id.get() + 100;
        self.next_id.set(self.next_id.get() + 1);
        id
    }

    fn insert_card(&self, deck_id: &str, mut card: Value) -> Value {
        card["id"] = json!(self.allocate_id());
        card["deckId"] = json!(deck_id.parse::<i64>().map(Value::from).unwrap_or(json!(deck_id)));
        self.cards.borrow_mut().push(card.clone());
        card
    }

    fn route(&self, request: &ApiRequest) -> ApiResponse {
        let segments: Vec<&str> = request
            .path
            .trim_start_matches("/api/")
            .split('/')
            .collect();
        let not_found = ApiResponse::new(404, r#"{"error":"Not found"}"#);

        match (request.method.as_str(), segments.as_slice()) {
            ("GET", [name]) => match self.table(name) {
                Some(table) => ApiResponse::new(200, Value::from(table.borrow().clone()).to_string()),
                None => not_found,
            },
            ("GET", [name, "count"]) => match self.table(name) {
                Some(table) => ApiResponse::new(200, json!({"count": table.borrow().len()}).to_string()),
                None => not_found,
            },
            ("POST", [name]) => {
                let Some(table) = self.table(name) else {
                    return not_found;
                };
                let mut item = request.body.clone().unwrap_or_else(|| json!({}));
                item["id"] = json!(self.allocate_id());
                if *name == "decks" {
                    item["cardCount"] = json!(0);
                }
                table.borrow_mut().push(item.clone());
                ApiResponse::new(201, item.to_string())
            }
            ("PUT", [name, id]) => {
                let Some(table) = self.table(name) else {
                    return not_found;
                };
                let mut rows = table.borrow_mut();
                let found = rows.iter_mut().find(|row| id_matches(row, id));
                match found {
                    Some(row) => {
                        if let (Some(target), Some(Value::Object(fields))) =
                            (row.as_object_mut(), request.body.clone())
                        {
                            target.extend(fields);
                        }
                        ApiResponse::new(200, row.to_string())
                    }
                    None => not_found,
                }
            }
            ("DELETE", [name, id]) => {
                let Some(table) = self.table(name) else {
                    return not_found;
                };
                let mut rows = table.borrow_mut();
                let before = rows.len();
                rows.retain(|row| !id_matches(row, id));
                if rows.len() == before {
                    not_found
                } else {
                    ApiResponse::new(204, "")
                }
            }
            ("POST", ["decks", id, "cards"]) => {
                let card = self.insert_card(id, request.body.clone().unwrap_or_default());
                ApiResponse::new(201, card.to_string())
            }
            ("POST", ["decks", id, "cards", "import"]) => {
                let cards = request
                    .body
                    .as_ref()
                    .and_then(|b| b["cards"].as_array().cloned())
                    .unwrap_or_default();
                for card in &cards {
                    self.insert_card(id, card.clone());
                }
                ApiResponse::new(200, json!({"imported": cards.len()}).to_string())
            }
            _ => not_found,
        }
    }
}

fn id_matches(row: &Value, id: &str) -> bool {
    match &row["id"] {
        Value::Number(n) => n.to_string() == id,
        Value::String(s) => s == id,
        _ => false,
    }
}

#[async_trait(?Send)]
impl HttpBackend for FakeServerState {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let response = if request.bearer.is_none() {
            ApiResponse::new(401, "")
        } else {
            self.route(&request)
        };
        self.requests.borrow_mut().push(request);
        Ok(response)
    }
}

pub struct FakeServer {
    state: Rc<FakeServerState>,
    navigator: Rc<RecordingNavigator>,
}

impl FakeServer {
    pub fn new() -> Self {
        Self {
            state: Rc::new(FakeServerState::default()),
            navigator: Rc::new(RecordingNavigator::default()),
        }
    }

    pub fn seed_decks(&self, decks: Value) {
        if let Value::Array(rows) = decks {
            self.state.decks.borrow_mut().extend(rows);
        }
    }

    pub fn seed_cards(&self, cards: Value) {
        if let Value::Array(rows) = cards {
            self.state.cards.borrow_mut().extend(rows);
        }
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.state.requests.borrow().clone()
    }

    pub fn navigator(&self) -> Rc<RecordingNavigator> {
        self.navigator.clone()
    }

    /// A client that is already logged in.
    pub fn client(&self) -> ApiClient {
        let session = SessionStore::new(Rc::new(MemoryStore::default()));
        session.save("server-token", &profile());
        ApiClient::new(self.state.clone(), session, self.navigator.clone(), test_config())
    }
}
