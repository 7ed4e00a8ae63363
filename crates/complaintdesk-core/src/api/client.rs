//! Authenticated HTTP client for the complaints API.
//!
//! Every call goes through [`ApiClient::request`], which attaches the session
//! token and recovers once from an expired token by re-authenticating with
//! the cached credentials.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{header, Client, Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize};
use tracing::{debug, info, warn};

use crate::auth::{
    LogNavigator, MemorySessionStore, Navigator, Session, SessionKey, SessionStore, LOGIN_ROUTE,
};

use super::{ApiError, ApiRequest};

// ============================================================================
// Constants
// ============================================================================

/// Token issuance endpoint (form-encoded username/password)
pub const TOKEN_PATH: &str = "/users/token";

/// Re-authentication attempts allowed per request. The replay that follows a
/// successful refresh is final, whatever its outcome.
const MAX_REAUTH_ATTEMPTS: u32 = 1;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    token_type: Option<String>,
}

/// API client for the complaints service.
/// Clone is cheap - the connection pool, store and navigator are shared.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    store: Arc<dyn SessionStore>,
    navigator: Arc<dyn Navigator>,
}

pub struct ApiClientBuilder {
    base_url: String,
    timeout: Option<Duration>,
    store: Option<Arc<dyn SessionStore>>,
    navigator: Option<Arc<dyn Navigator>>,
}

impl ApiClientBuilder {
    /// Transport timeout for each HTTP exchange. Unset means no deadline.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn session_store(mut self, store: Arc<dyn SessionStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = Some(navigator);
        self
    }

    pub fn build(self) -> Result<ApiClient, ApiError> {
        let mut builder = Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(ApiClient {
            client: builder.build()?,
            base_url: self.base_url.trim_end_matches('/').to_string(),
            store: self
                .store
                .unwrap_or_else(|| Arc::new(MemorySessionStore::new())),
            navigator: self.navigator.unwrap_or_else(|| Arc::new(LogNavigator)),
        })
    }
}

impl ApiClient {
    /// Create a new API client with an explicit store and navigator
    pub fn new(
        base_url: impl Into<String>,
        store: Arc<dyn SessionStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, ApiError> {
        Self::builder(base_url)
            .session_store(store)
            .navigator(navigator)
            .build()
    }

    pub fn builder(base_url: impl Into<String>) -> ApiClientBuilder {
        ApiClientBuilder {
            base_url: base_url.into(),
            timeout: None,
            store: None,
            navigator: None,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session_store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    /// The current session, if one is fully cached
    pub fn session(&self) -> Option<Session> {
        Session::load(self.store.as_ref())
    }

    pub fn is_authenticated(&self) -> bool {
        self.store.get(SessionKey::Token).is_some()
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    // ===== Authentication =====

    /// Log in, caching the token and the credentials used for silent refresh
    pub async fn login(&self, username: &str, password: &str) -> Result<Session, ApiError> {
        let access_token = self.authenticate(username, password).await?;
        let session = Session::new(access_token, username.to_string(), password.to_string());
        session.save(self.store.as_ref())?;
        info!(username, "Login successful");
        Ok(session)
    }

    /// Drop the cached session. Navigation is left to the caller.
    pub fn logout(&self) -> Result<(), ApiError> {
        self.store.clear()?;
        info!("Logged out");
        Ok(())
    }

    /// Exchange credentials for an access token.
    ///
    /// Sent without a bearer token and never intercepted, so a 401 here is final.
    async fn authenticate(&self, username: &str, password: &str) -> Result<String, ApiError> {
        let response = self
            .client
            .post(self.url(TOKEN_PATH))
            .header(header::ACCEPT, "application/json")
            .form(&[("username", username), ("password", password)])
            .send()
            .await?;

        let response = Self::check_response(response).await?;
        let text = response.text().await?;
        let token: TokenResponse = serde_json::from_str(&text)
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse token response: {}", e)))?;

        debug!(token_type = ?token.token_type, "Access token issued");
        Ok(token.access_token)
    }

    // ===== Request pipeline =====

    /// Send a request with the session token attached.
    ///
    /// A first `401` triggers one re-authentication with the cached username
    /// and password followed by a single replay whose result is returned as
    /// is. If re-authentication fails the session is cleared, the navigator
    /// is sent to the login route and the re-authentication error is
    /// returned. Transport errors and every other status are returned
    /// untouched.
    pub async fn request(&self, request: &ApiRequest) -> Result<Response, ApiError> {
        let mut token = self.store.get(SessionKey::Token);
        let mut attempts = 0;

        loop {
            let response = self.send(request, token.as_deref()).await?;

            if response.status() != StatusCode::UNAUTHORIZED || attempts >= MAX_REAUTH_ATTEMPTS {
                return Self::check_response(response).await;
            }
            attempts += 1;

            let (Some(username), Some(password)) = (
                self.store.get(SessionKey::Username),
                self.store.get(SessionKey::TempPassword),
            ) else {
                debug!(path = request.path(), "Unauthorized with no cached credentials");
                return Self::check_response(response).await;
            };

            debug!(path = request.path(), username = %username, "Token rejected, re-authenticating");
            match self.authenticate(&username, &password).await {
                Ok(new_token) => {
                    self.store.set(SessionKey::Token, &new_token)?;
                    info!(username = %username, "Session token refreshed");
                    token = Some(new_token);
                }
                Err(e) => {
                    warn!(error = %e, "Re-authentication failed, ending session");
                    self.end_session();
                    return Err(e);
                }
            }
        }
    }

    /// Discard the whole session and return the application to login.
    fn end_session(&self) {
        if let Err(e) = self.store.clear() {
            warn!(error = %e, "Failed to clear session store");
        }
        self.navigator.navigate(LOGIN_ROUTE);
    }

    async fn send(&self, request: &ApiRequest, token: Option<&str>) -> Result<Response, ApiError> {
        let mut headers = request.headers().clone();
        match token {
            Some(token) => {
                let mut value = header::HeaderValue::from_str(&format!("Bearer {}", token))?;
                value.set_sensitive(true);
                headers.insert(header::AUTHORIZATION, value);
            }
            None => {
                headers.remove(header::AUTHORIZATION);
            }
        }

        let mut builder = self
            .client
            .request(request.method().clone(), self.url(request.path()))
            .headers(headers);
        if !request.query_params().is_empty() {
            builder = builder.query(request.query_params());
        }
        if let Some(body) = request.body() {
            builder = builder.json(body);
        }

        debug!(
            method = %request.method(),
            path = request.path(),
            authenticated = token.is_some(),
            "Sending request"
        );
        let response = builder.send().await?;
        debug!(path = request.path(), status = response.status().as_u16(), "Response received");
        Ok(response)
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: Response) -> Result<Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    /// Send a request and decode the JSON response body
    pub(crate) async fn fetch<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ApiError> {
        let response = self.request(&request).await?;
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| {
            ApiError::InvalidResponse(format!(
                "Failed to parse JSON response from {}: {}",
                request.path(),
                e
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{ChannelNavigator, KeyringSessionStore, MemoryCredentials};
    use mockito::Matcher;
    use tokio::sync::mpsc::UnboundedReceiver;

    struct Harness {
        client: ApiClient,
        store: Arc<MemorySessionStore>,
        navigations: UnboundedReceiver<String>,
    }

    fn harness(base_url: &str, token: Option<&str>, credentials: Option<(&str, &str)>) -> Harness {
        let store = Arc::new(MemorySessionStore::new());
        if let Some(token) = token {
            store.set(SessionKey::Token, token).unwrap();
        }
        if let Some((username, password)) = credentials {
            store.set(SessionKey::Username, username).unwrap();
            store.set(SessionKey::TempPassword, password).unwrap();
        }
        let (navigator, navigations) = ChannelNavigator::new();
        let client = ApiClient::new(base_url, store.clone(), Arc::new(navigator)).unwrap();
        Harness {
            client,
            store,
            navigations,
        }
    }

    fn token_form(username: &str, password: &str) -> Matcher {
        Matcher::AllOf(vec![
            Matcher::UrlEncoded("username".into(), username.into()),
            Matcher::UrlEncoded("password".into(), password.into()),
        ])
    }

    #[test]
    fn test_url_joins_path() {
        let h = harness("http://localhost:8000/", None, None);
        assert_eq!(h.client.base_url(), "http://localhost:8000");
        assert_eq!(h.client.url("/complaints/"), "http://localhost:8000/complaints/");
        assert_eq!(h.client.url("tags/"), "http://localhost:8000/tags/");
    }

    #[tokio::test]
    async fn test_request_attaches_bearer_token() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/complaints/")
            .match_header("authorization", "Bearer abc")
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let h = harness(&server.url(), Some("abc"), None);
        let response = h.client.request(&ApiRequest::get("/complaints/")).await.unwrap();
        assert_eq!(response.text().await.unwrap(), "[]");

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_request_without_session_is_unauthenticated() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/tags/")
            .match_header("authorization", Matcher::Missing)
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let h = harness(&server.url(), None, None);
        h.client.request(&ApiRequest::get("/tags/")).await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_query_parameters_are_sent() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/complaints/")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("search".into(), "late delivery".into()),
                Matcher::UrlEncoded("status".into(), "open".into()),
            ]))
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let h = harness(&server.url(), Some("abc"), None);
        let request = ApiRequest::get("/complaints/")
            .query("search", "late delivery")
            .query("status", "open");
        h.client.request(&request).await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_expired_token_is_refreshed_and_request_replayed() {
        let mut server = mockito::Server::new_async().await;
        let expired = server
            .mock("GET", "/complaints/")
            .match_header("authorization", "Bearer OLD")
            .with_status(401)
            .with_body(r#"{"detail": "Could not validate credentials"}"#)
            .expect(1)
            .create_async()
            .await;
        let refresh = server
            .mock("POST", "/users/token")
            .match_header("authorization", Matcher::Missing)
            .match_body(token_form("admin", "pw"))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"access_token": "NEW", "token_type": "bearer"}"#)
            .expect(1)
            .create_async()
            .await;
        let replay = server
            .mock("GET", "/complaints/")
            .match_header("authorization", "Bearer NEW")
            .with_status(200)
            .with_body(r#"[{"id": 7}]"#)
            .expect(1)
            .create_async()
            .await;

        let mut h = harness(&server.url(), Some("OLD"), Some(("admin", "pw")));
        let response = h.client.request(&ApiRequest::get("/complaints/")).await.unwrap();

        assert_eq!(response.text().await.unwrap(), r#"[{"id": 7}]"#);
        assert_eq!(h.store.get(SessionKey::Token).as_deref(), Some("NEW"));
        assert_eq!(h.store.get(SessionKey::Username).as_deref(), Some("admin"));
        assert!(h.navigations.try_recv().is_err());

        expired.assert_async().await;
        refresh.assert_async().await;
        replay.assert_async().await;
    }

    #[tokio::test]
    async fn test_replay_body_is_resent() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/complaints/3/comments")
            .match_header("authorization", "Bearer OLD")
            .with_status(401)
            .create_async()
            .await;
        server
            .mock("POST", "/users/token")
            .with_status(200)
            .with_body(r#"{"access_token": "NEW"}"#)
            .create_async()
            .await;
        let replay = server
            .mock("POST", "/complaints/3/comments")
            .match_header("authorization", "Bearer NEW")
            .match_body(Matcher::Json(serde_json::json!({"content": "Called the customer"})))
            .with_status(200)
            .with_body("{}")
            .expect(1)
            .create_async()
            .await;

        let h = harness(&server.url(), Some("OLD"), Some(("admin", "pw")));
        let request = ApiRequest::post("/complaints/3/comments")
            .json(&serde_json::json!({"content": "Called the customer"}))
            .unwrap();
        h.client.request(&request).await.unwrap();

        replay.assert_async().await;
    }

    #[tokio::test]
    async fn test_failed_refresh_clears_session_and_navigates_to_login() {
        let mut server = mockito::Server::new_async().await;
        let expired = server
            .mock("GET", "/complaints/")
            .with_status(401)
            .expect(1)
            .create_async()
            .await;
        let refresh = server
            .mock("POST", "/users/token")
            .match_body(token_form("admin", "pw"))
            .with_status(401)
            .with_body(r#"{"detail": "Incorrect username or password"}"#)
            .expect(1)
            .create_async()
            .await;

        let mut h = harness(&server.url(), Some("OLD"), Some(("admin", "pw")));
        let result = h.client.request(&ApiRequest::get("/complaints/")).await;

        assert!(matches!(result, Err(ApiError::Unauthorized)));
        for key in SessionKey::ALL {
            assert!(h.store.get(key).is_none(), "{} should be removed", key);
        }
        assert_eq!(h.navigations.try_recv().unwrap(), LOGIN_ROUTE);
        assert!(h.navigations.try_recv().is_err());

        expired.assert_async().await;
        refresh.assert_async().await;
    }

    #[tokio::test]
    async fn test_failed_refresh_clears_keychain_credential() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/complaints/")
            .with_status(401)
            .create_async()
            .await;
        let refresh = server
            .mock("POST", "/users/token")
            .match_body(token_form("admin", "pw"))
            .with_status(401)
            .expect(1)
            .create_async()
            .await;

        let credentials = Arc::new(MemoryCredentials::new());
        let store = Arc::new(KeyringSessionStore::with_backend(
            MemorySessionStore::new(),
            credentials.clone(),
        ));
        Session::new("OLD".into(), "admin".into(), "pw".into())
            .save(store.as_ref())
            .unwrap();
        let (navigator, mut navigations) = ChannelNavigator::new();
        let client = ApiClient::new(&server.url(), store.clone(), Arc::new(navigator)).unwrap();

        let result = client.request(&ApiRequest::get("/complaints/")).await;

        assert!(matches!(result, Err(ApiError::Unauthorized)));
        for key in SessionKey::ALL {
            assert!(store.get(key).is_none(), "{} should be removed", key);
        }
        assert!(store.inner().is_empty());
        assert!(credentials.is_empty());
        assert_eq!(navigations.try_recv().unwrap(), LOGIN_ROUTE);
        assert!(navigations.try_recv().is_err());

        refresh.assert_async().await;
    }

    #[tokio::test]
    async fn test_refresh_server_error_is_propagated() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/users/me")
            .with_status(401)
            .create_async()
            .await;
        server
            .mock("POST", "/users/token")
            .with_status(503)
            .with_body("maintenance")
            .create_async()
            .await;

        let mut h = harness(&server.url(), Some("OLD"), Some(("admin", "pw")));
        let result = h.client.request(&ApiRequest::get("/users/me")).await;

        assert!(matches!(result, Err(ApiError::ServerError(msg)) if msg == "maintenance"));
        assert!(h.store.is_empty());
        assert_eq!(h.navigations.try_recv().unwrap(), LOGIN_ROUTE);
    }

    #[tokio::test]
    async fn test_no_cached_credentials_skips_refresh() {
        let mut server = mockito::Server::new_async().await;
        let expired = server
            .mock("GET", "/complaints/")
            .with_status(401)
            .expect(1)
            .create_async()
            .await;
        let refresh = server
            .mock("POST", "/users/token")
            .expect(0)
            .create_async()
            .await;

        let mut h = harness(&server.url(), Some("OLD"), None);
        let result = h.client.request(&ApiRequest::get("/complaints/")).await;

        assert!(matches!(result, Err(ApiError::Unauthorized)));
        // Nothing is cleared and nobody is sent to login
        assert_eq!(h.store.get(SessionKey::Token).as_deref(), Some("OLD"));
        assert!(h.navigations.try_recv().is_err());

        expired.assert_async().await;
        refresh.assert_async().await;
    }

    #[tokio::test]
    async fn test_missing_password_skips_refresh() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/complaints/")
            .with_status(401)
            .create_async()
            .await;
        let refresh = server
            .mock("POST", "/users/token")
            .expect(0)
            .create_async()
            .await;

        let h = harness(&server.url(), None, None);
        h.store.set(SessionKey::Username, "admin").unwrap();
        let result = h.client.request(&ApiRequest::get("/complaints/")).await;

        assert!(matches!(result, Err(ApiError::Unauthorized)));
        refresh.assert_async().await;
    }

    #[tokio::test]
    async fn test_unauthorized_replay_is_not_retried() {
        let mut server = mockito::Server::new_async().await;
        let complaints = server
            .mock("GET", "/complaints/")
            .with_status(401)
            .expect(2)
            .create_async()
            .await;
        let refresh = server
            .mock("POST", "/users/token")
            .with_status(200)
            .with_body(r#"{"access_token": "NEW"}"#)
            .expect(1)
            .create_async()
            .await;

        let mut h = harness(&server.url(), Some("OLD"), Some(("admin", "pw")));
        let result = h.client.request(&ApiRequest::get("/complaints/")).await;

        assert!(matches!(result, Err(ApiError::Unauthorized)));
        // The refresh itself succeeded, so the session stays
        assert_eq!(h.store.get(SessionKey::Token).as_deref(), Some("NEW"));
        assert!(h.navigations.try_recv().is_err());

        complaints.assert_async().await;
        refresh.assert_async().await;
    }

    #[tokio::test]
    async fn test_replay_failure_is_returned_as_is() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/complaints/9")
            .match_header("authorization", "Bearer OLD")
            .with_status(401)
            .create_async()
            .await;
        server
            .mock("POST", "/users/token")
            .with_status(200)
            .with_body(r#"{"access_token": "NEW"}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/complaints/9")
            .match_header("authorization", "Bearer NEW")
            .with_status(404)
            .with_body(r#"{"detail": "Complaint not found"}"#)
            .create_async()
            .await;

        let h = harness(&server.url(), Some("OLD"), Some(("admin", "pw")));
        let result = h.client.request(&ApiRequest::get("/complaints/9")).await;

        assert!(matches!(result, Err(ApiError::NotFound(msg)) if msg == "Complaint not found"));
    }

    #[tokio::test]
    async fn test_other_errors_are_not_retried() {
        let mut server = mockito::Server::new_async().await;
        let forbidden = server
            .mock("GET", "/admin/users/")
            .with_status(403)
            .with_body(r#"{"detail": "Not enough permissions"}"#)
            .expect(1)
            .create_async()
            .await;
        let broken = server
            .mock("GET", "/complaints/")
            .with_status(500)
            .expect(1)
            .create_async()
            .await;
        let refresh = server
            .mock("POST", "/users/token")
            .expect(0)
            .create_async()
            .await;

        let h = harness(&server.url(), Some("abc"), Some(("admin", "pw")));

        let result = h.client.request(&ApiRequest::get("/admin/users/")).await;
        assert!(matches!(result, Err(ApiError::AccessDenied(msg)) if msg == "Not enough permissions"));

        let result = h.client.request(&ApiRequest::get("/complaints/")).await;
        assert!(matches!(result, Err(ApiError::ServerError(_))));

        assert_eq!(h.store.get(SessionKey::Token).as_deref(), Some("abc"));
        forbidden.assert_async().await;
        broken.assert_async().await;
        refresh.assert_async().await;
    }

    #[tokio::test]
    async fn test_network_error_is_propagated() {
        // Nothing listens on port 1
        let mut h = harness("http://127.0.0.1:1", Some("abc"), Some(("admin", "pw")));
        let result = h.client.request(&ApiRequest::get("/complaints/")).await;

        assert!(matches!(result, Err(ApiError::NetworkError(_))));
        assert_eq!(h.store.get(SessionKey::Token).as_deref(), Some("abc"));
        assert!(h.navigations.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_concurrent_unauthorized_requests_refresh_independently() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", Matcher::Any)
            .match_header("authorization", "Bearer OLD")
            .with_status(401)
            .expect(2)
            .create_async()
            .await;
        let refresh = server
            .mock("POST", "/users/token")
            .with_status(200)
            .with_body(r#"{"access_token": "NEW"}"#)
            .expect(2)
            .create_async()
            .await;
        let replays = server
            .mock("GET", Matcher::Any)
            .match_header("authorization", "Bearer NEW")
            .with_status(200)
            .with_body("[]")
            .expect(2)
            .create_async()
            .await;

        let h = harness(&server.url(), Some("OLD"), Some(("admin", "pw")));
        let complaints = ApiRequest::get("/complaints/");
        let tags = ApiRequest::get("/tags/");
        let (a, b) = tokio::join!(h.client.request(&complaints), h.client.request(&tags));

        assert!(a.is_ok());
        assert!(b.is_ok());
        assert_eq!(h.store.get(SessionKey::Token).as_deref(), Some("NEW"));
        refresh.assert_async().await;
        replays.assert_async().await;
    }

    #[tokio::test]
    async fn test_login_caches_session() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/users/token")
            .match_body(token_form("admin", "s3cret"))
            .with_status(200)
            .with_body(r#"{"access_token": "T1", "token_type": "bearer"}"#)
            .create_async()
            .await;

        let h = harness(&server.url(), None, None);
        let session = h.client.login("admin", "s3cret").await.unwrap();

        assert_eq!(session.access_token, "T1");
        assert_eq!(h.client.session(), Some(session));
        assert!(h.client.is_authenticated());
        mock.assert_async().await;

        h.client.logout().unwrap();
        assert!(h.store.is_empty());
        assert!(!h.client.is_authenticated());
    }

    #[tokio::test]
    async fn test_login_failure_leaves_store_untouched() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/users/token")
            .with_status(401)
            .with_body(r#"{"detail": "Incorrect username or password"}"#)
            .create_async()
            .await;

        let mut h = harness(&server.url(), None, None);
        let result = h.client.login("admin", "wrong").await;

        assert!(matches!(result, Err(ApiError::Unauthorized)));
        assert!(h.store.is_empty());
        assert!(h.navigations.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_malformed_token_response() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/users/token")
            .with_status(200)
            .with_body(r#"{"token": "wrong-field"}"#)
            .create_async()
            .await;

        let h = harness(&server.url(), None, None);
        let result = h.client.login("admin", "pw").await;
        assert!(matches!(result, Err(ApiError::InvalidResponse(_))));
    }
}
