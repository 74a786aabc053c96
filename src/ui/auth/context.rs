//! Auth context for the component tree
//!
//! Wraps the shared [`SessionHandle`], the backend services and the query
//! cache. Session and cache changes arrive on watch channels; after
//! hydration they are mirrored into signals so views re-render when tokens
//! are refreshed, a user signs out, or a query is invalidated.

use leptos::prelude::*;

use crate::core::api::{ApiServices, store_auth_response};
use crate::core::config::ApiConfig;
use crate::core::models::auth::{LoginRequest, SignupRequest};
use crate::core::query::QueryClient;
use crate::core::session::{ServiceTag, SessionHandle, SessionStore, UserRecord};

#[derive(Clone, Copy)]
pub struct AuthContext {
    session: StoredValue<SessionHandle>,
    services: StoredValue<ApiServices>,
    queries: StoredValue<QueryClient>,
    /// Bumped on every session change
    pub revision: RwSignal<u64>,
    /// Persisted state has been loaded
    pub hydrated: RwSignal<bool>,
    /// Bumped on every cache invalidation
    pub query_epoch: RwSignal<u64>,
    /// A login or signup request is in flight
    pub loading: RwSignal<bool>,
    /// Error message from the last login or signup
    pub error: RwSignal<Option<String>>,
}

impl AuthContext {
    pub fn session(&self) -> SessionHandle {
        self.session.get_value()
    }

    pub fn services(&self) -> ApiServices {
        self.services.get_value()
    }

    pub fn queries(&self) -> QueryClient {
        self.queries.get_value()
    }

    /// Read the store, subscribing the caller to session changes.
    pub fn read<R>(&self, f: impl FnOnce(&SessionStore) -> R) -> R {
        self.revision.track();
        self.session.with_value(|session| session.read(f))
    }

    pub fn is_hydrated(&self) -> bool {
        self.hydrated.get()
    }

    pub fn is_authenticated(&self) -> bool {
        self.read(SessionStore::is_authenticated)
    }

    pub fn user(&self) -> Option<UserRecord> {
        self.read(|store| store.user().cloned())
    }

    pub fn has_service_access(&self, service_name: &str) -> bool {
        self.read(|store| store.has_service_access(service_name))
    }

    /// Linked mailbox of the email-service user, falling back to the primary user.
    pub fn microsoft_user_id(&self) -> Option<String> {
        self.read(|store| {
            store
                .user_by_service(ServiceTag::OBWB)
                .or(store.user())
                .and_then(|u| u.microsoft_user_id.clone())
        })
    }

    pub fn set_microsoft_user_id(&self, microsoft_user_id: Option<String>) {
        self.session()
            .update(|store| store.set_microsoft_user_id(microsoft_user_id));
    }

    pub fn clear_error(&self) {
        self.error.set(None);
    }

    pub async fn login(&self, credentials: LoginRequest) -> Result<UserRecord, String> {
        self.begin();
        let result = self.services().auth.login(&credentials).await;
        self.finish(result.map(|auth| store_auth_response(&self.session(), auth)), "Login failed")
    }

    pub async fn signup(&self, details: SignupRequest) -> Result<UserRecord, String> {
        self.begin();
        let result = self.services().auth.signup(&details).await;
        self.finish(result.map(|auth| store_auth_response(&self.session(), auth)), "Signup failed")
    }

    /// Clear the session and every cached query.
    pub fn logout(&self) {
        self.services().auth.logout(&self.session());
        self.queries().clear();
    }

    fn begin(&self) {
        self.loading.set(true);
        self.error.set(None);
        self.session().update(|store| store.set_loading(true));
    }

    fn finish(
        &self,
        result: Result<UserRecord, crate::core::http::ApiError>,
        fallback: &str,
    ) -> Result<UserRecord, String> {
        self.loading.set(false);
        match result {
            Ok(user) => {
                self.queries().clear();
                Ok(user)
            }
            Err(err) => {
                leptos::logging::warn!("authentication failed: {}", err);
                self.session().update(|store| store.set_loading(false));
                let message = err.message_or(fallback);
                self.error.set(Some(message.clone()));
                Err(message)
            }
        }
    }
}

/// Send the browser back to the landing page once a session is rejected.
fn redirect_home() {
    if let Err(err) = set_location(crate::core::routes::HOME) {
        leptos::logging::warn!("could not redirect to the landing page: {}", err);
    }
}

#[cfg(feature = "hydrate")]
fn set_location(href: &str) -> Result<(), String> {
    let window = web_sys::window().ok_or("No window available")?;
    window
        .location()
        .set_href(href)
        .map_err(|e| format!("{:?}", e))
}

#[cfg(not(feature = "hydrate"))]
fn set_location(_href: &str) -> Result<(), String> {
    Err("No window available".to_string())
}

/// Provide auth context to the component tree
pub fn provide_auth_context() -> AuthContext {
    #[cfg(feature = "hydrate")]
    let session = SessionHandle::browser();
    #[cfg(not(feature = "hydrate"))]
    let session = SessionHandle::in_memory();

    let hook: crate::core::http::UnauthorizedHook = std::sync::Arc::new(redirect_home);
    let services = ApiServices::new(&session, &ApiConfig::default(), Some(hook));
    let queries = QueryClient::new();

    let ctx = AuthContext {
        session: StoredValue::new(session),
        services: StoredValue::new(services),
        queries: StoredValue::new(queries),
        revision: RwSignal::new(0),
        hydrated: RwSignal::new(false),
        query_epoch: RwSignal::new(0),
        loading: RwSignal::new(false),
        error: RwSignal::new(None),
    };

    // Both server and client render the unhydrated state first; persisted
    // state is only read after hydration.
    #[cfg(feature = "hydrate")]
    Effect::new(move |_| {
        use leptos::task::spawn_local;

        let session = ctx.session();
        let mut revisions = session.subscribe();
        spawn_local(async move {
            while revisions.changed().await.is_ok() {
                let rev = *revisions.borrow_and_update();
                ctx.hydrated.set(rev.hydrated);
                ctx.revision.set(rev.revision);
            }
        });

        let mut epochs = ctx.queries().subscribe();
        spawn_local(async move {
            while epochs.changed().await.is_ok() {
                let epoch = *epochs.borrow_and_update();
                ctx.query_epoch.set(epoch);
            }
        });

        session.hydrate();
    });

    provide_context(ctx);
    ctx
}

/// Get auth context from the component tree
pub fn use_auth_context() -> AuthContext {
    expect_context::<AuthContext>()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(not(feature = "hydrate"))]
    #[test]
    fn test_redirect_without_browser_reports_failure() {
        assert_eq!(
            set_location(crate::core::routes::HOME),
            Err("No window available".to_string())
        );
    }
}
