//! HTTP client plumbing shared by every backend service module.

mod client;
mod error;
#[cfg(test)]
pub(crate) mod mock;
mod request;
mod transport;

pub use client::{ApiClient, ApiClientBuilder, RefreshPolicy, TokenProvider, UnauthorizedHook};
pub use error::{ApiError, ErrorDetail, TransportError, ValidationIssue};
pub use request::{
    AUTH_ENDPOINTS, ApiRequest, Body, Method, PreparedRequest, RawResponse, is_auth_endpoint,
};
#[cfg(feature = "hydrate")]
pub use transport::BrowserTransport;
#[cfg(any(feature = "ssr", feature = "hydrate"))]
pub use transport::DefaultTransport;
#[cfg(feature = "ssr")]
pub use transport::ReqwestTransport;
pub use transport::Transport;
