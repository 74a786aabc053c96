//! Configured API client
//!
//! One [`ApiClient`] exists per backend. It attaches the bearer token at send
//! time and applies the refresh-then-logout policy when a request is rejected
//! with 401.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;

use super::error::ApiError;
use super::request::{ApiRequest, RawResponse};
use super::transport::Transport;
use crate::core::config::DEFAULT_REQUEST_TIMEOUT;
use crate::core::models::auth::{RefreshTokenRequest, RefreshTokenResponse};

/// Live view of the credentials a client sends.
pub trait TokenProvider: Send + Sync {
    fn access_token(&self) -> Option<String>;

    fn refresh_token(&self) -> Option<String>;

    fn update_tokens(&self, access_token: String, refresh_token: String);

    /// Drop every credential and the persisted session.
    fn discard(&self);
}

/// Called after the session has been discarded because of a 401.
pub type UnauthorizedHook = Arc<dyn Fn() + Send + Sync>;

/// What to do when a non-auth request is rejected with 401.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshPolicy {
    /// Exchange the refresh token at `url`, then replay once.
    Refresh { url: String },
    /// Discard the session immediately.
    HardLogout,
}

struct ClientInner<T> {
    base_url: String,
    tokens: Arc<dyn TokenProvider>,
    policy: RefreshPolicy,
    on_unauthorized: Option<UnauthorizedHook>,
    timeout: Duration,
    transport: T,
}

pub struct ApiClient<T: Transport = super::transport::DefaultTransport> {
    inner: Arc<ClientInner<T>>,
}

impl<T: Transport> Clone for ApiClient<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Transport> std::fmt::Debug for ApiClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url)
            .field("policy", &self.inner.policy)
            .field("timeout", &self.inner.timeout)
            .finish()
    }
}

impl<T: Transport + Default> ApiClient<T> {
    pub fn builder(base_url: impl Into<String>, tokens: Arc<dyn TokenProvider>) -> ApiClientBuilder<T> {
        ApiClientBuilder::new(base_url, tokens, T::default())
    }
}

impl<T: Transport> ApiClient<T> {
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    pub fn policy(&self) -> &RefreshPolicy {
        &self.inner.policy
    }

    pub fn transport(&self) -> &T {
        &self.inner.transport
    }

    /// Send `request`, returning the response on 2xx.
    pub async fn execute(&self, request: ApiRequest) -> Result<RawResponse, ApiError> {
        let mut request = request;
        loop {
            let response = self.dispatch(&request).await?;
            if response.status != 401 || request.is_auth_endpoint() || request.tolerate_unauthorized {
                return response.into_result();
            }
            if request.retried || !self.try_refresh().await {
                self.reject_session();
                return Err(ApiError::Unauthorized);
            }
            request.retried = true;
        }
    }

    /// Send `request` and decode the JSON body.
    pub async fn fetch<R: DeserializeOwned>(&self, request: ApiRequest) -> Result<R, ApiError> {
        self.execute(request).await?.json()
    }

    /// Send `request`, ignoring the body.
    pub async fn send(&self, request: ApiRequest) -> Result<(), ApiError> {
        self.execute(request).await.map(|_| ())
    }

    async fn dispatch(&self, request: &ApiRequest) -> Result<RawResponse, ApiError> {
        let mut request = request.clone();
        if !request.is_auth_endpoint() && !request.has_header("Authorization") {
            if let Some(token) = self.inner.tokens.access_token() {
                request = request.bearer(&token);
            }
        }

        tracing::debug!(
            method = %request.method,
            path = %request.path,
            retried = request.retried,
            "api request"
        );

        let prepared = request.prepare(&self.inner.base_url);
        let response = self
            .inner
            .transport
            .send(prepared, self.inner.timeout)
            .await?;

        tracing::debug!(status = response.status, path = %request.path, "api response");
        Ok(response)
    }

    /// Exchange the refresh token for a new pair; `false` if that is not possible.
    async fn try_refresh(&self) -> bool {
        let RefreshPolicy::Refresh { url } = &self.inner.policy else {
            return false;
        };
        let Some(refresh_token) = self.inner.tokens.refresh_token() else {
            tracing::warn!("no refresh token available");
            return false;
        };

        let request = match ApiRequest::post(url.as_str()).json(&RefreshTokenRequest { refresh_token }) {
            Ok(request) => request,
            Err(err) => {
                tracing::warn!(error = %err, "failed to encode refresh request");
                return false;
            }
        };

        let refreshed = match self.dispatch(&request).await {
            Ok(response) => response
                .into_result()
                .and_then(|r| r.json::<RefreshTokenResponse>()),
            Err(err) => Err(err),
        };

        match refreshed {
            Ok(tokens) => {
                tracing::debug!("access token refreshed");
                self.inner
                    .tokens
                    .update_tokens(tokens.access_token, tokens.refresh_token);
                true
            }
            Err(err) => {
                tracing::warn!(error = %err, "token refresh failed");
                false
            }
        }
    }

    fn reject_session(&self) {
        tracing::error!(base_url = %self.inner.base_url, "session rejected, signing out");
        self.inner.tokens.discard();
        if let Some(hook) = &self.inner.on_unauthorized {
            hook();
        }
    }
}

pub struct ApiClientBuilder<T> {
    base_url: String,
    tokens: Arc<dyn TokenProvider>,
    policy: RefreshPolicy,
    on_unauthorized: Option<UnauthorizedHook>,
    timeout: Duration,
    transport: T,
}

impl<T: Transport> ApiClientBuilder<T> {
    pub fn new(base_url: impl Into<String>, tokens: Arc<dyn TokenProvider>, transport: T) -> Self {
        Self {
            base_url: base_url.into(),
            tokens,
            policy: RefreshPolicy::HardLogout,
            on_unauthorized: None,
            timeout: DEFAULT_REQUEST_TIMEOUT,
            transport,
        }
    }

    pub fn refresh_url(mut self, url: impl Into<String>) -> Self {
        self.policy = RefreshPolicy::Refresh { url: url.into() };
        self
    }

    pub fn hard_logout(mut self) -> Self {
        self.policy = RefreshPolicy::HardLogout;
        self
    }

    pub fn on_unauthorized(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_unauthorized = Some(Arc::new(hook));
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn transport(mut self, transport: T) -> Self {
        self.transport = transport;
        self
    }

    pub fn build(self) -> ApiClient<T> {
        ApiClient {
            inner: Arc::new(ClientInner {
                base_url: self.base_url,
                tokens: self.tokens,
                policy: self.policy,
                on_unauthorized: self.on_unauthorized,
                timeout: self.timeout,
                transport: self.transport,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use serde_json::json;

    use super::*;
    use crate::core::http::mock::MockTransport;
    use crate::core::http::request::Method;
    use crate::core::session::{MemoryStorage, SESSION_STORAGE_KEY, SessionHandle};

    const BASE: &str = "https://api.test";
    const REFRESH: &str = "https://api.test/auth/refresh";

    fn session_with_tokens(storage: &MemoryStorage) -> SessionHandle {
        let session = SessionHandle::new(Arc::new(storage.clone()));
        session.hydrate();
        session.update(|s| s.update_tokens("old-access", "old-refresh"));
        session
    }

    fn client(session: &SessionHandle, mock: &MockTransport) -> ApiClient<MockTransport> {
        ApiClientBuilder::new(BASE, Arc::new(session.clone()), mock.clone())
            .refresh_url(REFRESH)
            .build()
    }

    #[tokio::test]
    async fn test_no_token_no_authorization_header() {
        let session = SessionHandle::in_memory();
        let mock = MockTransport::new();
        mock.push(RawResponse::json_body(200, &json!({"ok": true})));

        client(&session, &mock)
            .send(ApiRequest::get("/emails/x"))
            .await
            .unwrap();

        assert_eq!(mock.requests()[0].header("Authorization"), None);
    }

    #[tokio::test]
    async fn test_header_reads_token_at_send_time() {
        let session = SessionHandle::in_memory();
        let mock = MockTransport::new();
        let api = client(&session, &mock);
        mock.push(RawResponse::new(200, "{}"));
        mock.push(RawResponse::new(200, "{}"));

        session.update(|s| s.set_access_token("first"));
        api.send(ApiRequest::get("/a")).await.unwrap();
        session.update(|s| s.set_access_token("second"));
        api.send(ApiRequest::get("/b")).await.unwrap();

        let requests = mock.requests();
        assert_eq!(requests[0].header("Authorization"), Some("Bearer first"));
        assert_eq!(requests[1].header("Authorization"), Some("Bearer second"));
        assert_eq!(requests[1].url, "https://api.test/b");
    }

    #[tokio::test]
    async fn test_auth_endpoints_never_get_bearer() {
        let storage = MemoryStorage::new();
        let session = session_with_tokens(&storage);
        let mock = MockTransport::new();
        mock.push(RawResponse::new(200, "{}"));

        client(&session, &mock)
            .send(ApiRequest::post("/auth/token").form(&[("username", "a"), ("password", "b")]))
            .await
            .unwrap();

        assert_eq!(mock.requests()[0].header("Authorization"), None);
    }

    #[tokio::test]
    async fn test_explicit_authorization_is_kept() {
        let storage = MemoryStorage::new();
        let session = session_with_tokens(&storage);
        let mock = MockTransport::new();
        mock.push(RawResponse::new(200, "{}"));

        client(&session, &mock)
            .send(ApiRequest::get("/auth/me").bearer("explicit"))
            .await
            .unwrap();

        let requests = mock.requests();
        assert_eq!(requests[0].header("Authorization"), Some("Bearer explicit"));
        assert_eq!(
            requests[0]
                .headers
                .iter()
                .filter(|(k, _)| k == "Authorization")
                .count(),
            1
        );
    }

    #[tokio::test]
    async fn test_refresh_then_replay() {
        let storage = MemoryStorage::new();
        let session = session_with_tokens(&storage);
        let mock = MockTransport::new();
        mock.push(RawResponse::new(401, r#"{"detail":"Token expired"}"#));
        mock.push(RawResponse::json_body(
            200,
            &json!({"access_token": "new-access", "refresh_token": "new-refresh", "token_type": "bearer"}),
        ));
        mock.push(RawResponse::json_body(200, &json!({"value": 7})));

        let value: serde_json::Value = client(&session, &mock)
            .fetch(ApiRequest::get("/ai/1/stats"))
            .await
            .unwrap();

        assert_eq!(value["value"], 7);
        let requests = mock.requests();
        assert_eq!(requests.len(), 3);
        assert_eq!(requests[1].method, Method::Post);
        assert_eq!(requests[1].url, REFRESH);
        assert_eq!(requests[1].header("Authorization"), None);
        assert_eq!(requests[1].body.as_deref(), Some(r#"{"refresh_token":"old-refresh"}"#));
        assert_eq!(requests[2].header("Authorization"), Some("Bearer new-access"));
        assert_eq!(session.access_token().as_deref(), Some("new-access"));
        assert_eq!(session.refresh_token().as_deref(), Some("new-refresh"));
    }

    #[tokio::test]
    async fn test_failed_refresh_discards_session() {
        let storage = MemoryStorage::new();
        let session = session_with_tokens(&storage);
        let mock = MockTransport::new();
        mock.push(RawResponse::new(401, "{}"));
        mock.push(RawResponse::new(401, r#"{"detail":"Invalid refresh token"}"#));

        let redirects = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&redirects);
        let api = ApiClientBuilder::new(BASE, Arc::new(session.clone()), mock.clone())
            .refresh_url(REFRESH)
            .on_unauthorized(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .build();

        let err = api.send(ApiRequest::get("/emails/x")).await.unwrap_err();

        assert_eq!(err, ApiError::Unauthorized);
        assert_eq!(redirects.load(Ordering::SeqCst), 1);
        assert!(session.access_token().is_none());
        assert!(!storage.contains(SESSION_STORAGE_KEY));
    }

    #[tokio::test]
    async fn test_replayed_401_is_unrecoverable() {
        let storage = MemoryStorage::new();
        let session = session_with_tokens(&storage);
        let mock = MockTransport::new();
        mock.push(RawResponse::new(401, "{}"));
        mock.push(RawResponse::json_body(
            200,
            &json!({"access_token": "a2", "refresh_token": "r2", "token_type": "bearer"}),
        ));
        mock.push(RawResponse::new(401, "{}"));

        let err = client(&session, &mock)
            .send(ApiRequest::get("/emails/x"))
            .await
            .unwrap_err();

        assert_eq!(err, ApiError::Unauthorized);
        assert_eq!(mock.requests().len(), 3);
        assert!(session.refresh_token().is_none());
        assert!(!storage.contains(SESSION_STORAGE_KEY));
    }

    #[tokio::test]
    async fn test_hard_logout_skips_refresh() {
        let storage = MemoryStorage::new();
        let session = session_with_tokens(&storage);
        let mock = MockTransport::new();
        mock.push(RawResponse::new(401, "{}"));

        let api = ApiClientBuilder::new(BASE, Arc::new(session.clone()), mock.clone())
            .hard_logout()
            .build();
        let err = api.send(ApiRequest::get("/conversations/x")).await.unwrap_err();

        assert_eq!(err, ApiError::Unauthorized);
        assert_eq!(mock.requests().len(), 1);
        assert!(session.access_token().is_none());
    }

    #[tokio::test]
    async fn test_401_on_auth_endpoint_is_plain_error() {
        let storage = MemoryStorage::new();
        let session = session_with_tokens(&storage);
        let mock = MockTransport::new();
        mock.push(RawResponse::new(401, r#"{"detail":"Incorrect email or password"}"#));

        let err = client(&session, &mock)
            .send(ApiRequest::post("/auth/token"))
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(401));
        assert_eq!(err.message_or("Login failed"), "Incorrect email or password");
        assert_eq!(session.access_token().as_deref(), Some("old-access"));
    }

    #[tokio::test]
    async fn test_tolerated_401_keeps_session() {
        let storage = MemoryStorage::new();
        let session = session_with_tokens(&storage);
        let mock = MockTransport::new();
        mock.push(RawResponse::new(401, "{}"));

        let err = client(&session, &mock)
            .send(ApiRequest::get("/auth/me").tolerate_unauthorized())
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(401));
        assert_ne!(err, ApiError::Unauthorized);
        assert_eq!(mock.requests().len(), 1);
        assert_eq!(session.access_token().as_deref(), Some("old-access"));
    }

    #[tokio::test]
    async fn test_transport_errors_surface() {
        let session = SessionHandle::in_memory();
        let mock = MockTransport::new();
        mock.push_error(crate::core::http::TransportError::Timeout);

        let err = client(&session, &mock)
            .send(ApiRequest::get("/x"))
            .await
            .unwrap_err();

        assert_eq!(err, ApiError::Timeout);
        assert!(err.is_retryable());
    }
}
