//! Framework-independent logic: session, HTTP plumbing, backend services,
//! route guard, query cache and form validation.

pub mod api;
pub mod config;
pub mod format;
pub mod guard;
pub mod http;
pub mod models;
pub mod query;
pub mod routes;
pub mod session;
pub mod validation;

pub use guard::{GuardState, GuardView, RouteGuard};
pub use query::{QueryClient, QueryKey};
pub use session::SessionHandle;
