//! Authenticated session: model, persistence and the shared handle.

mod handle;
mod model;
mod storage;
mod store;

pub use handle::{ServiceTokens, SessionHandle, SessionRevision};
pub use model::{
    PERSISTED_VERSION, PersistedSession, ServiceInfo, ServiceTag, ServiceToken, Session,
    UserRecord,
};
#[cfg(feature = "hydrate")]
pub use storage::LocalStorage;
pub use storage::{MemoryStorage, SessionStorage, StorageError};
pub use store::{Hydration, SESSION_STORAGE_KEY, SessionStore};
