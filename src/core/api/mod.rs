//! Typed backend services and the two configured clients behind them.

mod ai;
mod auth;
mod conversations;
mod emails;
mod optical;

use std::sync::Arc;

pub use ai::AiApi;
pub use auth::{AuthApi, store_auth_response};
pub use conversations::ConversationApi;
pub use emails::EmailApi;
pub use optical::OpticalApi;

use crate::core::config::ApiConfig;
use crate::core::http::{ApiClient, ApiClientBuilder, DefaultTransport, Transport, UnauthorizedHook};
use crate::core::session::{ServiceTag, SessionHandle};

/// Percent-encode one path segment.
pub(crate) fn segment(raw: &str) -> std::borrow::Cow<'_, str> {
    urlencoding::encode(raw)
}

/// Every service module, wired to the dashboard and email-service clients.
#[derive(Debug, Clone)]
pub struct ApiServices<T: Transport + Clone = DefaultTransport> {
    pub auth: AuthApi<T>,
    pub optical: OpticalApi<T>,
    pub emails: EmailApi<T>,
    pub conversations: ConversationApi<T>,
    pub ai: AiApi<T>,
    /// The email-service client, for the secondary identity check.
    pub obwb_client: ApiClient<T>,
}

impl<T: Transport + Clone + Default> ApiServices<T> {
    pub fn new(session: &SessionHandle, config: &ApiConfig, on_unauthorized: Option<UnauthorizedHook>) -> Self {
        Self::with_transport(session, config, T::default(), on_unauthorized)
    }
}

impl<T: Transport + Clone> ApiServices<T> {
    /// Both clients refresh once on 401 before signing out; the email-service
    /// client prefers the `obwb` service token.
    pub fn with_transport(
        session: &SessionHandle,
        config: &ApiConfig,
        transport: T,
        on_unauthorized: Option<UnauthorizedHook>,
    ) -> Self {
        let mut dashboard = ApiClientBuilder::new(
            config.dashboard_url.clone(),
            Arc::new(session.clone()),
            transport.clone(),
        )
        .refresh_url(config.refresh_url())
        .timeout(config.request_timeout);

        let mut obwb = ApiClientBuilder::new(
            config.obwb_url.clone(),
            Arc::new(session.scoped_to(ServiceTag::obwb())),
            transport,
        )
        .refresh_url(config.refresh_url())
        .timeout(config.request_timeout);

        if let Some(hook) = on_unauthorized {
            let dashboard_hook = Arc::clone(&hook);
            dashboard = dashboard.on_unauthorized(move || dashboard_hook());
            obwb = obwb.on_unauthorized(move || hook());
        }

        let dashboard = dashboard.build();
        let obwb = obwb.build();

        Self {
            auth: AuthApi::new(dashboard.clone()),
            optical: OpticalApi::new(dashboard),
            emails: EmailApi::new(obwb.clone()),
            conversations: ConversationApi::new(obwb.clone()),
            ai: AiApi::new(obwb.clone()),
            obwb_client: obwb,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};

    use serde_json::json;

    use super::*;
    use crate::core::http::mock::MockTransport;
    use crate::core::http::{ApiError, RawResponse, RefreshPolicy, TokenProvider};
    use crate::core::session::ServiceToken;

    fn config() -> ApiConfig {
        ApiConfig::default()
            .with_dashboard_url("https://dash.test")
            .with_obwb_url("https://mail.test")
    }

    #[test]
    fn test_client_policies() {
        let session = SessionHandle::in_memory();
        let services = ApiServices::with_transport(&session, &config(), MockTransport::new(), None);

        assert_eq!(
            services.obwb_client.policy(),
            &RefreshPolicy::Refresh {
                url: "https://dash.test/auth/refresh".to_string()
            }
        );
        assert_eq!(services.obwb_client.base_url(), "https://mail.test");
    }

    #[tokio::test]
    async fn test_obwb_client_prefers_service_token() {
        let session = SessionHandle::in_memory();
        session.update(|s| {
            s.set_access_token("primary");
            s.set_service_tokens(vec![ServiceToken::new("obwb", "mail-token")]);
        });
        let mock = MockTransport::new();
        mock.push_json(200, json!({"auth_url": "https://login.test", "state": "s"}));
        mock.push_json(200, json!({"branches": []}));
        let services = ApiServices::with_transport(&session, &config(), mock.clone(), None);

        services.emails.auth_url().await.unwrap();
        services.optical.branch_performance().await.unwrap();

        let requests = mock.requests();
        assert_eq!(requests[0].header("Authorization"), Some("Bearer mail-token"));
        assert_eq!(requests[1].header("Authorization"), Some("Bearer primary"));
    }

    #[tokio::test]
    async fn test_obwb_refreshes_expired_primary_token() {
        let session = SessionHandle::in_memory();
        session.hydrate();
        session.update(|s| s.update_tokens("expired", "r1"));
        let mock = MockTransport::new();
        mock.push(RawResponse::new(401, "{}"));
        mock.push_json(
            200,
            json!({"access_token": "fresh", "refresh_token": "r2", "token_type": "bearer"}),
        );
        mock.push_json(200, json!({"total_responses_generated": 3}));

        let fired = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&fired);
        let hook: UnauthorizedHook = Arc::new(move || flag.store(true, Ordering::SeqCst));
        let services = ApiServices::with_transport(&session, &config(), mock.clone(), Some(hook));

        let stats = services.ai.stats("ms-1").await.unwrap();

        assert_eq!(stats.total_responses_generated, 3);
        assert!(!fired.load(Ordering::SeqCst));
        assert_eq!(session.access_token().as_deref(), Some("fresh"));
        let requests = mock.requests();
        assert_eq!(requests.len(), 3);
        assert_eq!(requests[1].url, "https://dash.test/auth/refresh");
        assert_eq!(requests[2].header("Authorization"), Some("Bearer fresh"));
    }

    #[tokio::test]
    async fn test_unauthorized_hook_runs_for_obwb_after_failed_refresh() {
        let session = SessionHandle::in_memory();
        session.hydrate();
        session.update(|s| s.update_tokens("a", "r"));
        let mock = MockTransport::new();
        mock.push(RawResponse::new(401, "{}"));
        mock.push(RawResponse::new(401, r#"{"detail":"Invalid refresh token"}"#));

        let fired = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&fired);
        let hook: UnauthorizedHook = Arc::new(move || flag.store(true, Ordering::SeqCst));
        let services = ApiServices::with_transport(&session, &config(), mock.clone(), Some(hook));

        let err = services.ai.stats("ms-1").await.unwrap_err();

        assert_eq!(err, ApiError::Unauthorized);
        assert!(fired.load(Ordering::SeqCst));
        assert!(session.access_token().is_none());
        assert_eq!(mock.requests().len(), 2);
    }
}
