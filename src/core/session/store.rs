//! Session store
//!
//! Holds the authenticated user, the per-service user records and tokens, and
//! the hydration state. Every mutation is written through to the configured
//! [`SessionStorage`]; storage failures are logged and never surface to the
//! caller.

use std::sync::Arc;

use super::model::{PersistedSession, ServiceTag, ServiceToken, Session, UserRecord};
use super::storage::SessionStorage;

/// Storage key of the persisted session.
pub const SESSION_STORAGE_KEY: &str = "auth-storage";

/// Whether persisted state has been loaded into memory yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Hydration {
    #[default]
    Uninitialized,
    Hydrated,
}

pub struct SessionStore {
    session: Session,
    hydration: Hydration,
    loading: bool,
    storage: Arc<dyn SessionStorage>,
    storage_key: String,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("session", &self.session)
            .field("hydration", &self.hydration)
            .field("loading", &self.loading)
            .field("storage_key", &self.storage_key)
            .finish()
    }
}

impl SessionStore {
    /// Empty, un-hydrated store backed by `storage`.
    pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
        Self::with_key(storage, SESSION_STORAGE_KEY)
    }

    pub fn with_key(storage: Arc<dyn SessionStorage>, key: impl Into<String>) -> Self {
        Self {
            session: Session::default(),
            hydration: Hydration::Uninitialized,
            loading: false,
            storage,
            storage_key: key.into(),
        }
    }

    // ========================================================================
    // Hydration
    // ========================================================================

    /// Load the persisted session and mark the store hydrated.
    ///
    /// Runs once; later calls leave the in-memory state untouched.
    pub fn hydrate(&mut self) {
        if self.is_hydrated() {
            return;
        }
        match self.storage.load(&self.storage_key) {
            Ok(Some(raw)) => self.session = PersistedSession::parse(&raw),
            Ok(None) => {}
            Err(err) => tracing::warn!(error = %err, "session storage unreadable"),
        }
        self.set_hydrated();
    }

    pub fn set_hydrated(&mut self) {
        self.hydration = Hydration::Hydrated;
        self.loading = false;
    }

    pub fn hydration(&self) -> Hydration {
        self.hydration
    }

    pub fn is_hydrated(&self) -> bool {
        self.hydration == Hydration::Hydrated
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn user(&self) -> Option<&UserRecord> {
        self.session.user.as_ref()
    }

    pub fn users_by_service(&self) -> &[UserRecord] {
        &self.session.users_by_service
    }

    pub fn access_token(&self) -> Option<&str> {
        self.session.access_token.as_deref()
    }

    pub fn refresh_token(&self) -> Option<&str> {
        self.session.refresh_token.as_deref()
    }

    pub fn service_tokens(&self) -> &[ServiceToken] {
        &self.session.service_tokens
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.user.is_some() && self.session.access_token.is_some()
    }

    /// Token of the first service token registered under `service_name`.
    pub fn get_service_token(&self, service_name: &str) -> Option<&str> {
        self.session
            .service_tokens
            .iter()
            .find(|t| t.service_name() == service_name)
            .map(|t| t.token.as_str())
    }

    /// Primary user if it carries the tag, otherwise the per-service record.
    pub fn user_by_service(&self, service_name: &str) -> Option<&UserRecord> {
        self.session
            .user
            .as_ref()
            .filter(|u| u.service == service_name)
            .or_else(|| {
                self.session
                    .users_by_service
                    .iter()
                    .find(|u| u.service == service_name)
            })
    }

    pub fn has_service_access(&self, service_name: &str) -> bool {
        self.session
            .users_by_service
            .iter()
            .any(|u| u.service == service_name)
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Set the primary user and upsert it into the per-service records.
    pub fn set_user(&mut self, user: UserRecord) {
        self.session.user = Some(user.clone());
        self.upsert_service_user(user);
        self.persist();
    }

    /// Upsert a per-service record without touching the primary user.
    pub fn set_service_user(&mut self, user: UserRecord) {
        self.upsert_service_user(user);
        self.persist();
    }

    pub fn set_access_token(&mut self, token: impl Into<String>) {
        self.session.access_token = Some(token.into());
        self.persist();
    }

    pub fn set_refresh_token(&mut self, token: impl Into<String>) {
        self.session.refresh_token = Some(token.into());
        self.persist();
    }

    pub fn update_tokens(&mut self, access_token: impl Into<String>, refresh_token: impl Into<String>) {
        self.session.access_token = Some(access_token.into());
        self.session.refresh_token = Some(refresh_token.into());
        self.persist();
    }

    pub fn set_service_tokens(&mut self, tokens: Vec<ServiceToken>) {
        self.session.service_tokens = tokens;
        self.persist();
    }

    /// Link (`Some`) or unlink (`None`) the Microsoft mailbox.
    ///
    /// An empty id unlinks, matching how a stored `""` is read back.
    pub fn set_microsoft_user_id(&mut self, microsoft_user_id: Option<String>) {
        let microsoft_user_id = microsoft_user_id.filter(|id| !id.is_empty());
        if let Some(user) = self.session.user.as_mut() {
            user.microsoft_user_id = microsoft_user_id.clone();
        }
        for user in self
            .session
            .users_by_service
            .iter_mut()
            .filter(|u| u.service == ServiceTag::OBWB)
        {
            user.microsoft_user_id = microsoft_user_id.clone();
        }
        self.persist();
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    /// Clear every field and the persisted copy.
    pub fn logout(&mut self) {
        self.session = Session::default();
        self.loading = false;
        self.hydration = Hydration::Hydrated;
        if let Err(err) = self.storage.remove(&self.storage_key) {
            tracing::warn!(error = %err, "failed to remove persisted session");
        }
    }

    fn upsert_service_user(&mut self, user: UserRecord) {
        let users = &mut self.session.users_by_service;
        match users.iter_mut().find(|u| u.service == user.service) {
            Some(existing) => *existing = user,
            None => users.push(user),
        }
    }

    fn persist(&self) {
        let persisted = PersistedSession::new(self.session.clone());
        let result = serde_json::to_string(&persisted)
            .map_err(|e| e.to_string())
            .and_then(|json| {
                self.storage
                    .save(&self.storage_key, &json)
                    .map_err(|e| e.to_string())
            });
        if let Err(err) = result {
            tracing::warn!(error = %err, "failed to persist session");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::session::storage::MemoryStorage;

    fn user(id: i64, service: &str) -> UserRecord {
        UserRecord {
            id,
            email: format!("user{}@example.com", id),
            first_name: "Test".to_string(),
            last_name: format!("User{}", id),
            microsoft_user_id: None,
            created_at: None,
            updated_at: None,
            service: ServiceTag::new(service),
        }
    }

    fn store() -> (SessionStore, MemoryStorage) {
        let storage = MemoryStorage::new();
        let mut store = SessionStore::new(Arc::new(storage.clone()));
        store.hydrate();
        (store, storage)
    }

    #[test]
    fn test_set_user_keeps_one_record_per_service() {
        let (mut store, _) = store();

        store.set_user(user(1, "dashboard"));
        store.set_service_user(user(2, "obwb"));
        store.set_user(user(3, "dashboard"));
        store.set_service_user(user(4, "optical"));
        store.set_service_user(user(5, "obwb"));

        let users = store.users_by_service();
        assert_eq!(users.len(), 3);
        assert_eq!(store.user_by_service("dashboard").unwrap().id, 3);
        assert_eq!(store.user_by_service("obwb").unwrap().id, 5);
        assert_eq!(store.user_by_service("optical").unwrap().id, 4);
        assert_eq!(store.user().unwrap().id, 3);
    }

    #[test]
    fn test_upsert_replaces_in_place() {
        let (mut store, _) = store();
        store.set_service_user(user(1, "obwb"));
        store.set_service_user(user(2, "optical"));

        let mut updated = user(1, "obwb");
        updated.first_name = "Changed".to_string();
        store.set_service_user(updated);

        assert_eq!(store.users_by_service()[0].first_name, "Changed");
        assert_eq!(store.users_by_service()[1].service, "optical");
    }

    #[test]
    fn test_user_by_service_prefers_primary_user() {
        let (mut store, _) = store();
        store.set_service_user(user(7, "dashboard"));
        store.session.user = Some(user(8, "dashboard"));

        assert_eq!(store.user_by_service("dashboard").unwrap().id, 8);
        assert!(store.user_by_service("missing").is_none());
    }

    #[test]
    fn test_get_service_token_first_match() {
        let (mut store, _) = store();
        assert_eq!(store.get_service_token("obwb"), None);

        store.set_service_tokens(vec![
            ServiceToken::new("optical", "opt-1"),
            ServiceToken::new("obwb", "obwb-1"),
            ServiceToken::new("obwb", "obwb-2"),
        ]);

        assert_eq!(store.get_service_token("obwb"), Some("obwb-1"));
        assert_eq!(store.get_service_token("optical"), Some("opt-1"));
        assert_eq!(store.get_service_token("dashboard"), None);
    }

    #[test]
    fn test_logout_clears_everything() {
        let (mut store, storage) = store();
        store.set_user(user(1, "dashboard"));
        store.update_tokens("a", "r");
        store.set_service_tokens(vec![ServiceToken::new("obwb", "t")]);
        store.set_loading(true);
        assert!(storage.contains(SESSION_STORAGE_KEY));

        store.logout();

        assert!(store.session().is_empty());
        assert!(store.user().is_none());
        assert!(store.access_token().is_none());
        assert!(store.refresh_token().is_none());
        assert!(store.service_tokens().is_empty());
        assert!(!store.is_loading());
        assert!(store.is_hydrated());
        assert!(!storage.contains(SESSION_STORAGE_KEY));

        store.logout();
        assert!(store.session().is_empty());
    }

    #[test]
    fn test_persist_then_rehydrate_roundtrip() {
        let (mut store, storage) = store();
        store.set_user(user(1, "dashboard"));
        store.set_service_user(user(2, "obwb"));
        store.update_tokens("access", "refresh");
        store.set_service_tokens(vec![ServiceToken::new("obwb", "svc")]);
        store.set_loading(true);

        let mut restored = SessionStore::new(Arc::new(storage.clone()));
        assert_eq!(restored.hydration(), Hydration::Uninitialized);
        restored.hydrate();

        assert_eq!(restored.session(), store.session());
        assert!(!restored.is_loading());
        assert!(restored.is_hydrated());
    }

    #[test]
    fn test_hydrate_runs_once() {
        let storage = MemoryStorage::new();
        let mut store = SessionStore::new(Arc::new(storage.clone()));
        store.hydrate();
        store.session.access_token = Some("in-memory".to_string());

        let other = Session {
            access_token: Some("persisted".to_string()),
            ..Session::default()
        };
        storage
            .save(
                SESSION_STORAGE_KEY,
                &serde_json::to_string(&PersistedSession::new(other)).unwrap(),
            )
            .unwrap();
        store.hydrate();

        assert_eq!(store.access_token(), Some("in-memory"));
    }

    #[test]
    fn test_hydrate_malformed_entry_is_empty() {
        let storage = MemoryStorage::with_entry(SESSION_STORAGE_KEY, "{{{garbage");
        let mut store = SessionStore::new(Arc::new(storage));
        store.hydrate();

        assert!(store.is_hydrated());
        assert!(store.session().is_empty());
    }

    #[test]
    fn test_set_microsoft_user_id_updates_obwb_records() {
        let (mut store, _) = store();
        store.set_user(user(1, "dashboard"));
        store.set_service_user(user(2, "obwb"));

        store.set_microsoft_user_id(Some("ms-42".to_string()));
        assert_eq!(
            store.user().unwrap().microsoft_user_id.as_deref(),
            Some("ms-42")
        );
        assert_eq!(
            store.user_by_service("obwb").unwrap().microsoft_user_id.as_deref(),
            Some("ms-42")
        );
        assert!(
            store
                .users_by_service()
                .iter()
                .find(|u| u.service == "dashboard")
                .unwrap()
                .microsoft_user_id
                .is_none()
        );

        store.set_microsoft_user_id(None);
        assert!(store.user_by_service("obwb").unwrap().microsoft_user_id.is_none());
    }

    #[test]
    fn test_empty_microsoft_user_id_unlinks_and_survives_reload() {
        let (mut store, storage) = store();
        store.set_user(user(1, "dashboard"));
        store.set_service_user(user(2, "obwb"));
        store.set_microsoft_user_id(Some("ms-42".to_string()));

        store.set_microsoft_user_id(Some(String::new()));
        assert!(store.user().unwrap().microsoft_user_id.is_none());
        assert!(store.user_by_service("obwb").unwrap().microsoft_user_id.is_none());

        let mut restored = SessionStore::new(Arc::new(storage.clone()));
        restored.hydrate();
        assert_eq!(restored.session(), store.session());
    }

    #[test]
    fn test_has_service_access() {
        let (mut store, _) = store();
        assert!(!store.has_service_access("obwb"));

        store.set_service_user(user(2, "obwb"));
        assert!(store.has_service_access("obwb"));
        assert!(!store.has_service_access("optical"));
    }
}
