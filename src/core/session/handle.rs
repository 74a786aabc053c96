//! Shared session handle
//!
//! One [`SessionHandle`] exists per client runtime. Clones point at the same
//! store; every mutation bumps a revision on a watch channel so observers
//! (the UI, the route guard) can react without polling.

use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::watch;

use super::model::{ServiceTag, UserRecord};
use super::storage::{MemoryStorage, SessionStorage};
use super::store::SessionStore;
use crate::core::http::TokenProvider;

/// Value broadcast after every session change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionRevision {
    pub revision: u64,
    pub hydrated: bool,
}

#[derive(Clone)]
pub struct SessionHandle {
    store: Arc<RwLock<SessionStore>>,
    notify: Arc<watch::Sender<SessionRevision>>,
}

impl std::fmt::Debug for SessionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionHandle")
            .field("revision", &*self.notify.borrow())
            .finish()
    }
}

impl SessionHandle {
    pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
        Self::from_store(SessionStore::new(storage))
    }

    pub fn from_store(store: SessionStore) -> Self {
        let initial = SessionRevision {
            revision: 0,
            hydrated: store.is_hydrated(),
        };
        let (notify, _) = watch::channel(initial);
        Self {
            store: Arc::new(RwLock::new(store)),
            notify: Arc::new(notify),
        }
    }

    /// Handle over process memory, used for server rendering and tests.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()))
    }

    /// Handle over `window.localStorage`.
    #[cfg(feature = "hydrate")]
    pub fn browser() -> Self {
        Self::new(Arc::new(super::storage::LocalStorage))
    }

    /// Run `f` against the store under a read lock.
    pub fn read<R>(&self, f: impl FnOnce(&SessionStore) -> R) -> R {
        f(&self.store.read())
    }

    /// Run `f` against the store under a write lock and notify observers.
    pub fn update<R>(&self, f: impl FnOnce(&mut SessionStore) -> R) -> R {
        let (result, hydrated) = {
            let mut store = self.store.write();
            let result = f(&mut store);
            (result, store.is_hydrated())
        };
        self.notify.send_modify(|rev| {
            rev.revision += 1;
            rev.hydrated = hydrated;
        });
        result
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionRevision> {
        self.notify.subscribe()
    }

    pub fn revision(&self) -> SessionRevision {
        *self.notify.borrow()
    }

    // ========================================================================
    // Hydration
    // ========================================================================

    pub fn hydrate(&self) {
        self.update(SessionStore::hydrate);
    }

    pub fn is_hydrated(&self) -> bool {
        self.revision().hydrated
    }

    /// Resolve once persisted state has been loaded.
    pub async fn wait_hydrated(&self) {
        let mut rx = self.subscribe();
        // The sender lives as long as `self`, so the channel cannot close here.
        let _ = rx.wait_for(|rev| rev.hydrated).await;
    }

    // ========================================================================
    // Convenience accessors
    // ========================================================================

    pub fn user(&self) -> Option<UserRecord> {
        self.read(|s| s.user().cloned())
    }

    pub fn user_by_service(&self, service_name: &str) -> Option<UserRecord> {
        self.read(|s| s.user_by_service(service_name).cloned())
    }

    pub fn has_service_access(&self, service_name: &str) -> bool {
        self.read(|s| s.has_service_access(service_name))
    }

    pub fn is_authenticated(&self) -> bool {
        self.read(SessionStore::is_authenticated)
    }

    pub fn get_service_token(&self, service_name: &str) -> Option<String> {
        self.read(|s| s.get_service_token(service_name).map(str::to_string))
    }

    /// Linked Microsoft mailbox of the email-service user, if any.
    pub fn microsoft_user_id(&self) -> Option<String> {
        self.read(|s| {
            s.user_by_service(ServiceTag::OBWB)
                .or(s.user())
                .and_then(|u| u.microsoft_user_id.clone())
        })
    }

    pub fn logout(&self) {
        self.update(SessionStore::logout);
    }

    /// Token provider that prefers `service`'s token over the primary one.
    pub fn scoped_to(&self, service: impl Into<ServiceTag>) -> ServiceTokens {
        ServiceTokens {
            session: self.clone(),
            service: service.into(),
        }
    }
}

impl TokenProvider for SessionHandle {
    fn access_token(&self) -> Option<String> {
        self.read(|s| s.access_token().map(str::to_string))
    }

    fn refresh_token(&self) -> Option<String> {
        self.read(|s| s.refresh_token().map(str::to_string))
    }

    fn update_tokens(&self, access_token: String, refresh_token: String) {
        self.update(|s| s.update_tokens(access_token, refresh_token));
    }

    fn discard(&self) {
        self.logout();
    }
}

/// Tokens for one backend service, falling back to the primary access token.
#[derive(Debug, Clone)]
pub struct ServiceTokens {
    session: SessionHandle,
    service: ServiceTag,
}

impl TokenProvider for ServiceTokens {
    fn access_token(&self) -> Option<String> {
        self.session
            .get_service_token(self.service.as_str())
            .or_else(|| self.session.access_token())
    }

    fn refresh_token(&self) -> Option<String> {
        self.session.refresh_token()
    }

    fn update_tokens(&self, access_token: String, refresh_token: String) {
        self.session.update_tokens(access_token, refresh_token);
    }

    fn discard(&self) {
        self.session.discard();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::session::model::ServiceToken;

    #[test]
    fn test_update_bumps_revision() {
        let session = SessionHandle::in_memory();
        assert_eq!(session.revision().revision, 0);

        session.update(|s| s.set_access_token("t"));
        session.update(|s| s.set_refresh_token("r"));

        assert_eq!(session.revision().revision, 2);
        assert_eq!(session.access_token().as_deref(), Some("t"));
    }

    #[test]
    fn test_clones_share_state() {
        let session = SessionHandle::in_memory();
        let other = session.clone();
        session.update(|s| s.set_access_token("shared"));

        assert_eq!(other.access_token().as_deref(), Some("shared"));
    }

    #[tokio::test]
    async fn test_wait_hydrated_resolves_after_hydrate() {
        let session = SessionHandle::in_memory();
        assert!(!session.is_hydrated());

        let waiter = session.clone();
        let task = tokio::spawn(async move {
            waiter.wait_hydrated().await;
            waiter.is_hydrated()
        });
        tokio::task::yield_now().await;
        session.hydrate();

        assert!(task.await.unwrap());
    }

    #[tokio::test]
    async fn test_wait_hydrated_returns_immediately_when_ready() {
        let session = SessionHandle::in_memory();
        session.hydrate();
        session.wait_hydrated().await;
        assert!(session.is_hydrated());
    }

    #[test]
    fn test_service_tokens_fall_back_to_primary() {
        let session = SessionHandle::in_memory();
        session.update(|s| s.set_access_token("primary"));
        let obwb = session.scoped_to(ServiceTag::obwb());

        assert_eq!(obwb.access_token().as_deref(), Some("primary"));

        session.update(|s| s.set_service_tokens(vec![ServiceToken::new("obwb", "svc")]));
        assert_eq!(obwb.access_token().as_deref(), Some("svc"));
    }

    #[test]
    fn test_discard_logs_out() {
        let session = SessionHandle::in_memory();
        session.hydrate();
        session.update(|s| s.update_tokens("a", "r"));

        session.discard();

        assert!(session.access_token().is_none());
        assert!(session.refresh_token().is_none());
        assert!(session.is_hydrated());
    }
}
