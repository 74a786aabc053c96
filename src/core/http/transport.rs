//! Network transports
//!
//! The server build sends requests with `reqwest`; the browser build goes
//! through `fetch` via `gloo-net`. Both enforce the per-request timeout.

use std::time::Duration;

use super::error::TransportError;
use super::request::{PreparedRequest, RawResponse};

/// Sends one prepared request and returns the raw status and body.
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn send(
        &self,
        request: PreparedRequest,
        timeout: Duration,
    ) -> Result<RawResponse, TransportError>;
}

#[cfg(feature = "ssr")]
pub type DefaultTransport = ReqwestTransport;

#[cfg(all(feature = "hydrate", not(feature = "ssr")))]
pub type DefaultTransport = BrowserTransport;

#[cfg(feature = "ssr")]
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

#[cfg(feature = "ssr")]
impl ReqwestTransport {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[cfg(feature = "ssr")]
impl Transport for ReqwestTransport {
    async fn send(
        &self,
        request: PreparedRequest,
        timeout: Duration,
    ) -> Result<RawResponse, TransportError> {
        use super::request::Method;

        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self.client.request(method, &request.url).timeout(timeout);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(map_reqwest_error)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(map_reqwest_error)?;
        Ok(RawResponse { status, body })
    }
}

#[cfg(feature = "ssr")]
fn map_reqwest_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout
    } else {
        TransportError::Network(err.to_string())
    }
}

/// `fetch`-backed transport for the hydrated client.
#[cfg(feature = "hydrate")]
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserTransport;

#[cfg(feature = "hydrate")]
impl Transport for BrowserTransport {
    async fn send(
        &self,
        request: PreparedRequest,
        timeout: Duration,
    ) -> Result<RawResponse, TransportError> {
        use futures::future::{Either, select};
        use gloo_net::http::{Method as FetchMethod, RequestBuilder};
        use gloo_timers::future::TimeoutFuture;

        use super::request::Method;

        let method = match request.method {
            Method::Get => FetchMethod::GET,
            Method::Post => FetchMethod::POST,
            Method::Put => FetchMethod::PUT,
            Method::Patch => FetchMethod::PATCH,
            Method::Delete => FetchMethod::DELETE,
        };

        let mut builder = RequestBuilder::new(&request.url).method(method);
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        let built = match request.body {
            Some(body) => builder.body(body),
            None => builder.build(),
        }
        .map_err(|e| TransportError::Network(e.to_string()))?;

        let millis = u32::try_from(timeout.as_millis()).unwrap_or(u32::MAX);
        let exchange = Box::pin(async move {
            let response = built.send().await?;
            let status = response.status();
            let body = response.text().await?;
            Ok::<_, gloo_net::Error>(RawResponse { status, body })
        });

        match select(exchange, TimeoutFuture::new(millis)).await {
            Either::Left((result, _)) => result.map_err(|e| TransportError::Network(e.to_string())),
            Either::Right(_) => Err(TransportError::Timeout),
        }
    }
}
