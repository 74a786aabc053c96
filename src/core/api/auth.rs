//! Dashboard authentication endpoints

use crate::core::http::{ApiClient, ApiError, ApiRequest, DefaultTransport, Transport};
use crate::core::models::auth::{
    AuthResponse, LoginRequest, RefreshTokenRequest, RefreshTokenResponse, SignupRequest,
};
use crate::core::session::{ServiceTag, SessionHandle, UserRecord};

#[derive(Debug, Clone)]
pub struct AuthApi<T: Transport = DefaultTransport> {
    client: ApiClient<T>,
}

impl<T: Transport> AuthApi<T> {
    pub fn new(client: ApiClient<T>) -> Self {
        Self { client }
    }

    /// Password login, sent as an OAuth2 form with the email as `username`.
    pub async fn login(&self, credentials: &LoginRequest) -> Result<AuthResponse, ApiError> {
        let request = ApiRequest::post("/auth/token").form(&[
            ("username", credentials.email.as_str()),
            ("password", credentials.password.as_str()),
        ]);
        self.client.fetch(request).await
    }

    pub async fn signup(&self, details: &SignupRequest) -> Result<AuthResponse, ApiError> {
        self.client
            .fetch(ApiRequest::post("/auth/signup").json(details)?)
            .await
    }

    pub async fn refresh(&self, refresh_token: &str) -> Result<RefreshTokenResponse, ApiError> {
        let body = RefreshTokenRequest {
            refresh_token: refresh_token.to_string(),
        };
        self.client
            .fetch(ApiRequest::post("/auth/refresh").json(&body)?)
            .await
    }

    /// Identity behind `access_token`.
    pub async fn me(&self, access_token: &str) -> Result<UserRecord, ApiError> {
        self.client
            .fetch(ApiRequest::get("/auth/me").bearer(access_token))
            .await
    }

    /// Identity behind the session's current access token.
    pub async fn current_user(&self) -> Result<UserRecord, ApiError> {
        self.client.fetch(ApiRequest::get("/auth/me")).await
    }

    /// There is no server-side logout; only local state is cleared.
    pub fn logout(&self, session: &SessionHandle) {
        tracing::info!("signing out");
        session.logout();
    }
}

/// Store the user and credentials returned by login or signup.
pub fn store_auth_response(session: &SessionHandle, auth: AuthResponse) -> UserRecord {
    let user = auth.user.tagged(ServiceTag::dashboard());
    session.update(|s| {
        s.set_user(user.clone());
        s.update_tokens(auth.access_token, auth.refresh_token);
        s.set_service_tokens(auth.service_tokens);
        s.set_loading(false);
    });
    tracing::info!(user_id = user.id, "signed in");
    user
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::core::http::mock::MockTransport;
    use crate::core::http::{ApiClientBuilder, Method, TokenProvider};

    fn api(session: &SessionHandle, mock: &MockTransport) -> AuthApi<MockTransport> {
        AuthApi::new(
            ApiClientBuilder::new("https://dash.test", Arc::new(session.clone()), mock.clone())
                .refresh_url("https://dash.test/auth/refresh")
                .build(),
        )
    }

    fn auth_json() -> serde_json::Value {
        json!({
            "access_token": "abc",
            "refresh_token": "ref",
            "token_type": "bearer",
            "expires_in": 1800,
            "user": {"id": 1, "email": "ana@example.com", "first_name": "Ana", "last_name": "Lee",
                     "created_at": "2025-01-01", "updated_at": "2025-01-01", "microsoft_user_id": null},
            "service_tokens": [{
                "user_id": 1, "service_id": 2, "token": "obwb-token", "token_type": "bearer",
                "expires_at": "2030-01-01", "id": 4, "is_active": true,
                "created_at": "2025-01-01", "updated_at": "2025-01-01",
                "service": {"name": "obwb", "login_endpoint": "/login", "signup_endpoint": "/signup",
                            "id": 2, "is_active": true, "created_at": "2025-01-01", "updated_at": null}
            }]
        })
    }

    #[tokio::test]
    async fn test_login_then_protected_request_carries_token() {
        let session = SessionHandle::in_memory();
        session.hydrate();
        let mock = MockTransport::new();
        mock.push_json(200, auth_json());
        mock.push_json(200, json!({"ok": true}));
        let auth = api(&session, &mock);

        let response = auth
            .login(&LoginRequest {
                email: "ana@example.com".to_string(),
                password: "secret".to_string(),
            })
            .await
            .unwrap();
        let user = store_auth_response(&session, response);

        assert_eq!(user.id, 1);
        assert_eq!(session.access_token().as_deref(), Some("abc"));
        assert_eq!(session.user().unwrap().id, 1);
        assert_eq!(session.user().unwrap().service, "dashboard");
        assert_eq!(session.get_service_token("obwb").as_deref(), Some("obwb-token"));

        let login = &mock.requests()[0];
        assert_eq!(login.method, Method::Post);
        assert_eq!(login.url, "https://dash.test/auth/token");
        assert_eq!(login.header("Authorization"), None);
        assert_eq!(
            login.body.as_deref(),
            Some("username=ana%40example.com&password=secret")
        );

        auth.client
            .send(ApiRequest::get("/optical/inventory"))
            .await
            .unwrap();
        assert_eq!(mock.requests()[1].header("Authorization"), Some("Bearer abc"));
    }

    #[tokio::test]
    async fn test_login_failure_keeps_detail() {
        let session = SessionHandle::in_memory();
        let mock = MockTransport::new();
        mock.push_json(401, json!({"detail": "Incorrect email or password"}));

        let err = api(&session, &mock)
            .login(&LoginRequest::default())
            .await
            .unwrap_err();

        assert_eq!(err.message_or("Login failed"), "Incorrect email or password");
    }

    #[tokio::test]
    async fn test_signup_validation_detail() {
        let session = SessionHandle::in_memory();
        let mock = MockTransport::new();
        mock.push_json(
            422,
            json!({"detail": [{"loc": ["body", "email"], "msg": "value is not a valid email address", "type": "value_error"}]}),
        );

        let err = api(&session, &mock)
            .signup(&SignupRequest::default())
            .await
            .unwrap_err();

        assert_eq!(err.message_or("Signup failed"), "value is not a valid email address");
        let body: serde_json::Value =
            serde_json::from_str(mock.requests()[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(body["first_name"], "");
    }

    #[tokio::test]
    async fn test_me_uses_explicit_token() {
        let session = SessionHandle::in_memory();
        session.update(|s| s.set_access_token("stored"));
        let mock = MockTransport::new();
        mock.push_json(200, json!({"id": 9, "email": "x@y.z"}));

        let user = api(&session, &mock).me("given").await.unwrap();

        assert_eq!(user.id, 9);
        assert_eq!(mock.requests()[0].header("Authorization"), Some("Bearer given"));
    }

    #[test]
    fn test_logout_clears_session() {
        let session = SessionHandle::in_memory();
        session.hydrate();
        session.update(|s| s.set_access_token("abc"));

        api(&session, &MockTransport::new()).logout(&session);

        assert!(session.access_token().is_none());
    }
}
