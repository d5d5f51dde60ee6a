use std::rc::Rc;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::app::LOGIN_PATH;
use crate::config::AppConfig;
use crate::error::ApiError;
use crate::session::SessionStore;

#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub bearer: Option<String>,
    pub body: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn into_result(self) -> Result<String, ApiError> {
        if self.is_success() {
            Ok(self.body)
        } else {
            Err(ApiError::from_status(self.status, &self.body))
        }
    }
}

/// Sends one request and reports the raw status and body. Implementations
/// never retry and never interpret the status.
#[async_trait(?Send)]
pub trait HttpBackend {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError>;
}

pub struct ReqwestBackend {
    client: reqwest::Client,
    config: AppConfig,
}

impl ReqwestBackend {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config: config.clone(),
        }
    }
}

#[async_trait(?Send)]
impl HttpBackend for ReqwestBackend {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let url = self.config.url(&request.path);
        let mut builder = self
            .client
            .request(request.method, url)
            .header(CONTENT_TYPE, "application/json");
        if let Some(token) = &request.bearer {
            builder = builder.header(AUTHORIZATION, format!("Bearer {}", token));
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Ok(ApiResponse { status, body })
    }
}

/// Moves the user to another page.
pub trait Navigator {
    fn navigate(&self, path: &str);
}

/// Full-page navigation through `window.location`.
pub struct BrowserNavigator;

impl Navigator for BrowserNavigator {
    fn navigate(&self, path: &str) {
        if let Some(window) = web_sys::window() {
            if window.location().set_href(path).is_err() {
                leptos::logging::error!("navigation to {} failed", path);
            }
        }
    }
}

/// Entry point for every REST call the front-end makes.
#[derive(Clone)]
pub struct ApiClient {
    backend: Rc<dyn HttpBackend>,
    session: SessionStore,
    navigator: Rc<dyn Navigator>,
    config: Rc<AppConfig>,
}

impl ApiClient {
    pub fn new(
        backend: Rc<dyn HttpBackend>,
        session: SessionStore,
        navigator: Rc<dyn Navigator>,
        config: AppConfig,
    ) -> Self {
        Self {
            backend,
            session,
            navigator,
            config: Rc::new(config),
        }
    }

    pub fn browser() -> Self {
        let config = AppConfig::load();
        Self::new(
            Rc::new(ReqwestBackend::new(&config)),
            SessionStore::browser(),
            Rc::new(BrowserNavigator),
            config,
        )
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// User-initiated logout.
    pub fn logout(&self) {
        self.session.clear();
        self.navigator.navigate(LOGIN_PATH);
    }

    /// Request without credentials. A 401 here is an ordinary error.
    pub async fn send_public(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<String, ApiError> {
        let request = ApiRequest {
            method,
            path: path.to_string(),
            bearer: None,
            body,
        };
        self.backend.send(request).await?.into_result()
    }

    /// Request carrying the current bearer token, read at send time.
    ///
    /// Without a token nothing is sent. A 401 answer clears the session and
    /// sends the user to the login page before the error is returned.
    pub async fn send_authed(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<String, ApiError> {
        let Some(token) = self.session.token() else {
            leptos::logging::warn!("{} {} attempted without a session", method, path);
            self.logout();
            return Err(ApiError::Unauthorized);
        };

        let request = ApiRequest {
            method,
            path: path.to_string(),
            bearer: Some(token),
            body,
        };
        let response = self.backend.send(request).await?;
        if response.status == 401 {
            leptos::logging::warn!("{} rejected the session token, logging out", path);
            self.logout();
            return Err(ApiError::Unauthorized);
        }
        response.into_result()
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let body = self.send_authed(Method::GET, path, None).await?;
        decode(&body)
    }

    pub async fn post_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<String, ApiError> {
        self.send_authed(Method::POST, path, Some(encode(body)?)).await
    }

    pub async fn put_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<String, ApiError> {
        self.send_authed(Method::PUT, path, Some(encode(body)?)).await
    }

    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.send_authed(Method::DELETE, path, None).await.map(|_| ())
    }
}

pub fn encode<B: Serialize + ?Sized>(body: &B) -> Result<serde_json::Value, ApiError> {
    serde_json::to_value(body).map_err(|e| ApiError::Decode(e.to_string()))
}

pub fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{client_with, logged_in_client, respond};

    #[tokio::test]
    async fn test_bearer_token_read_at_send_time() {
        let (client, backend, _) = logged_in_client(respond(200, "[]"));

        client.get_json::<Vec<serde_json::Value>>("/api/decks").await.unwrap();
        client.session().save("rotated", &crate::testing::profile());
        client.get_json::<Vec<serde_json::Value>>("/api/decks").await.unwrap();

        let requests = backend.requests();
        assert_eq!(requests[0].bearer.as_deref(), Some("token-1"));
        assert_eq!(requests[1].bearer.as_deref(), Some("rotated"));
    }

    #[tokio::test]
    async fn test_unauthorized_clears_session_and_blocks_further_calls() {
        let (client, backend, navigator) = logged_in_client(respond(401, ""));

        let err = client.get_json::<Vec<serde_json::Value>>("/api/cards").await.unwrap_err();
        assert_eq!(err, ApiError::Unauthorized);
        assert!(!client.session().has_session());
        assert_eq!(navigator.visits(), vec![LOGIN_PATH.to_string()]);

        let err = client.delete("/api/cards/1").await.unwrap_err();
        assert_eq!(err, ApiError::Unauthorized);
        assert_eq!(backend.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_other_errors_propagate_without_logout() {
        let (client, _, navigator) = logged_in_client(respond(404, r#"{"error":"gone"}"#));

        let err = client.delete("/api/cards/9").await.unwrap_err();
        assert_eq!(err, ApiError::NotFound("gone".to_string()));
        assert!(client.session().has_session());
        assert!(navigator.visits().is_empty());
    }

    #[tokio::test]
    async fn test_public_requests_carry_no_token() {
        let (client, backend, navigator) = client_with(respond(401, r#"{"error":"bad credentials"}"#));

        let err = client
            .send_public(Method::POST, "/login", Some(serde_json::json!({"email": "a"})))
            .await
            .unwrap_err();
        assert_eq!(err, ApiError::Unauthorized);
        assert_eq!(backend.requests()[0].bearer, None);
        assert!(navigator.visits().is_empty());
    }

    #[test]
    fn test_response_into_result() {
        assert_eq!(ApiResponse::new(204, "").into_result(), Ok(String::new()));
        assert_eq!(
            ApiResponse::new(409, r#"{"error":"exists"}"#).into_result(),
            Err(ApiError::Conflict("exists".to_string()))
        );
    }
}
