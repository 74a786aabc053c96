//! Protected-route guard
//!
//! The guard moves `Pending -> Validating -> Authorized | Unauthorized`.
//! [`RouteGuard`] holds the transitions; [`validate_session`] performs the
//! network checks; [`GuardView`] is what the layout should render.

use derive_more::Display;

use crate::core::api::ApiServices;
use crate::core::http::{ApiRequest, Transport};
use crate::core::routes;
use crate::core::session::{ServiceTag, SessionHandle, SessionStore, UserRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
pub enum GuardState {
    #[default]
    Pending,
    Validating,
    Authorized,
    Unauthorized,
}

/// What a protected layout renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardView {
    Loading,
    Redirect(String),
    /// Signed in, but the page belongs to a service the user lacks.
    ServiceInactive(ServiceTag),
    Render,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RouteGuard {
    state: GuardState,
}

impl RouteGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> GuardState {
        self.state
    }

    /// Hydration finished. Without a token there is nothing to validate.
    pub fn hydrated(&mut self, has_token: bool) -> GuardState {
        if self.state == GuardState::Pending {
            self.state = if has_token {
                GuardState::Validating
            } else {
                GuardState::Unauthorized
            };
        }
        self.state
    }

    /// Result of the primary identity check.
    pub fn validated(&mut self, primary_ok: bool) -> GuardState {
        if self.state == GuardState::Validating {
            self.state = if primary_ok {
                GuardState::Authorized
            } else {
                GuardState::Unauthorized
            };
        }
        self.state
    }

    /// Explicit logout or a later 401.
    pub fn revoke(&mut self) -> GuardState {
        self.state = GuardState::Unauthorized;
        self.state
    }

    /// Back to `Pending`, for a fresh sign-in.
    pub fn reset(&mut self) {
        self.state = GuardState::Pending;
    }

    pub fn view(&self, store: &SessionStore, path: &str) -> GuardView {
        if !store.is_hydrated() {
            return GuardView::Loading;
        }
        match self.state {
            GuardState::Pending | GuardState::Validating => GuardView::Loading,
            GuardState::Unauthorized => GuardView::Redirect(routes::HOME.to_string()),
            GuardState::Authorized => match required_service(path) {
                Some(service) if !store.has_service_access(service.as_str()) => {
                    GuardView::ServiceInactive(service)
                }
                _ => GuardView::Render,
            },
        }
    }
}

/// Service entitlement needed to view `path`.
pub fn required_service(path: &str) -> Option<ServiceTag> {
    if path.starts_with(routes::OBWB_PREFIX) {
        Some(ServiceTag::obwb())
    } else if path.starts_with(routes::OPTICAL_PREFIX) {
        Some(ServiceTag::optical())
    } else {
        None
    }
}

/// Run the identity checks for a hydrated session and return the final state.
///
/// The primary check against the dashboard API decides the outcome; the
/// email-service check only refreshes the `obwb` record and may fail. Both
/// checks present the primary access token.
pub async fn validate_session<T: Transport + Clone>(
    session: &SessionHandle,
    services: &ApiServices<T>,
) -> GuardState {
    let mut guard = RouteGuard::new();
    let has_token = session.read(|s| s.access_token().is_some());
    if guard.hydrated(has_token) == GuardState::Unauthorized {
        tracing::debug!("no stored access token");
        return guard.state();
    }

    match services.auth.current_user().await {
        Ok(user) => {
            session.update(|s| s.set_user(user.tagged(ServiceTag::dashboard())));
            guard.validated(true);
        }
        Err(err) => {
            tracing::error!(error = %err, "session validation failed");
            session.logout();
            return guard.validated(false);
        }
    }

    let mut identity = ApiRequest::get("/auth/me").tolerate_unauthorized();
    if let Some(token) = session.read(|s| s.access_token().map(str::to_string)) {
        identity = identity.bearer(&token);
    }
    let secondary = services.obwb_client.fetch::<UserRecord>(identity).await;
    match secondary {
        Ok(user) => session.update(|s| s.set_service_user(user.tagged(ServiceTag::obwb()))),
        Err(err) => tracing::warn!(error = %err, "email service validation failed"),
    }

    guard.state()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::core::config::ApiConfig;
    use crate::core::http::mock::MockTransport;
    use crate::core::http::{RawResponse, TokenProvider};
    use crate::core::session::{MemoryStorage, ServiceToken};

    fn user_record(id: i64, service: &str) -> UserRecord {
        serde_json::from_value::<UserRecord>(json!({"id": id, "email": "a@b.co"}))
            .unwrap()
            .tagged(service)
    }

    fn services(session: &SessionHandle, mock: &MockTransport) -> ApiServices<MockTransport> {
        let config = ApiConfig::default()
            .with_dashboard_url("https://dash.test")
            .with_obwb_url("https://mail.test");
        ApiServices::with_transport(session, &config, mock.clone(), None)
    }

    #[test]
    fn test_not_hydrated_is_loading_even_with_token() {
        let mut store = SessionStore::new(Arc::new(MemoryStorage::new()));
        store.set_access_token("abc");
        let mut guard = RouteGuard::new();
        guard.hydrated(true);
        guard.validated(true);

        assert_eq!(guard.view(&store, "/dashboard"), GuardView::Loading);
    }

    #[test]
    fn test_hydrated_without_token_redirects() {
        let mut store = SessionStore::new(Arc::new(MemoryStorage::new()));
        store.hydrate();
        let mut guard = RouteGuard::new();

        assert_eq!(guard.hydrated(false), GuardState::Unauthorized);
        assert_eq!(
            guard.view(&store, "/dashboard"),
            GuardView::Redirect("/".to_string())
        );
    }

    #[test]
    fn test_validating_shows_loading() {
        let mut store = SessionStore::new(Arc::new(MemoryStorage::new()));
        store.hydrate();
        let mut guard = RouteGuard::new();
        guard.hydrated(true);

        assert_eq!(guard.state(), GuardState::Validating);
        assert_eq!(guard.view(&store, "/dashboard"), GuardView::Loading);
    }

    #[test]
    fn test_service_entitlement() {
        let mut store = SessionStore::new(Arc::new(MemoryStorage::new()));
        store.hydrate();
        store.set_user(user_record(1, "dashboard"));
        store.set_service_user(user_record(2, "obwb"));
        let mut guard = RouteGuard::new();
        guard.hydrated(true);
        guard.validated(true);

        assert_eq!(guard.view(&store, "/dashboard"), GuardView::Render);
        assert_eq!(guard.view(&store, "/dashboard/Obwb/emails"), GuardView::Render);
        assert_eq!(
            guard.view(&store, "/dashboard/Optical/inventory"),
            GuardView::ServiceInactive(ServiceTag::optical())
        );
    }

    #[test]
    fn test_transitions_only_move_forward() {
        let mut guard = RouteGuard::new();
        assert_eq!(guard.validated(true), GuardState::Pending);
        guard.hydrated(true);
        guard.validated(true);
        assert_eq!(guard.hydrated(false), GuardState::Authorized);
        assert_eq!(guard.revoke(), GuardState::Unauthorized);
        guard.reset();
        assert_eq!(guard.state(), GuardState::Pending);
    }

    #[test]
    fn test_required_service() {
        assert_eq!(required_service("/dashboard/Obwb/emails/1"), Some(ServiceTag::obwb()));
        assert_eq!(
            required_service("/dashboard/Optical/inventory"),
            Some(ServiceTag::optical())
        );
        assert_eq!(required_service("/dashboard"), None);
    }

    #[tokio::test]
    async fn test_valid_primary_failing_secondary_is_authorized() {
        let session = SessionHandle::in_memory();
        session.hydrate();
        session.update(|s| s.update_tokens("abc", "ref"));
        let mock = MockTransport::new();
        mock.push_json(200, json!({"id": 1, "email": "ana@example.com", "first_name": "Ana"}));
        mock.push(RawResponse::new(401, r#"{"detail":"Not authenticated"}"#));

        let state = validate_session(&session, &services(&session, &mock)).await;

        assert_eq!(state, GuardState::Authorized);
        assert_eq!(session.user().unwrap().service, "dashboard");
        assert_eq!(session.access_token().as_deref(), Some("abc"));
        assert!(!session.has_service_access("obwb"));
        let requests = mock.requests();
        assert_eq!(requests[0].url, "https://dash.test/auth/me");
        assert_eq!(requests[1].url, "https://mail.test/auth/me");
    }

    #[tokio::test]
    async fn test_secondary_success_records_obwb_user() {
        let session = SessionHandle::in_memory();
        session.hydrate();
        session.update(|s| s.update_tokens("abc", "ref"));
        let mock = MockTransport::new();
        mock.push_json(200, json!({"id": 1, "email": "ana@example.com"}));
        mock.push_json(200, json!({"id": 7, "email": "ana@example.com", "microsoft_user_id": "ms-7"}));

        let state = validate_session(&session, &services(&session, &mock)).await;

        assert_eq!(state, GuardState::Authorized);
        assert!(session.has_service_access("obwb"));
        assert_eq!(session.microsoft_user_id().as_deref(), Some("ms-7"));
    }

    #[tokio::test]
    async fn test_secondary_check_uses_primary_token() {
        let session = SessionHandle::in_memory();
        session.hydrate();
        session.update(|s| {
            s.update_tokens("abc", "ref");
            s.set_service_tokens(vec![ServiceToken::new("obwb", "mail-token")]);
        });
        let mock = MockTransport::new();
        mock.push_json(200, json!({"id": 1, "email": "ana@example.com"}));
        mock.push_json(200, json!({"id": 7, "email": "ana@example.com"}));

        validate_session(&session, &services(&session, &mock)).await;

        let requests = mock.requests();
        assert_eq!(requests[1].url, "https://mail.test/auth/me");
        assert_eq!(requests[1].header("Authorization"), Some("Bearer abc"));
    }

    #[tokio::test]
    async fn test_no_token_is_unauthorized_without_requests() {
        let session = SessionHandle::in_memory();
        session.hydrate();
        let mock = MockTransport::new();

        let state = validate_session(&session, &services(&session, &mock)).await;

        assert_eq!(state, GuardState::Unauthorized);
        assert!(mock.requests().is_empty());
    }

    #[tokio::test]
    async fn test_failing_primary_clears_session() {
        let storage = MemoryStorage::new();
        let session = SessionHandle::new(Arc::new(storage.clone()));
        session.hydrate();
        session.update(|s| s.update_tokens("abc", "ref"));
        let mock = MockTransport::new();
        mock.push(RawResponse::new(500, "{}"));

        let state = validate_session(&session, &services(&session, &mock)).await;

        assert_eq!(state, GuardState::Unauthorized);
        assert!(session.access_token().is_none());
        assert!(!storage.contains(crate::core::session::SESSION_STORAGE_KEY));
        assert_eq!(mock.requests().len(), 1);
    }
}
