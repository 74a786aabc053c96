//! Scripted transport for tests

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use super::error::TransportError;
use super::request::{PreparedRequest, RawResponse};
use super::transport::Transport;

#[derive(Default)]
struct MockState {
    requests: Vec<PreparedRequest>,
    responses: VecDeque<Result<RawResponse, TransportError>>,
}

/// Records every request and answers from a queue; an empty queue answers 404.
#[derive(Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, response: RawResponse) {
        self.state.lock().responses.push_back(Ok(response));
    }

    pub fn push_json(&self, status: u16, value: serde_json::Value) {
        self.push(RawResponse::json_body(status, &value));
    }

    pub fn push_error(&self, err: TransportError) {
        self.state.lock().responses.push_back(Err(err));
    }

    pub fn requests(&self) -> Vec<PreparedRequest> {
        self.state.lock().requests.clone()
    }

    pub fn last_request(&self) -> Option<PreparedRequest> {
        self.state.lock().requests.last().cloned()
    }
}

impl Transport for MockTransport {
    async fn send(
        &self,
        request: PreparedRequest,
        _timeout: Duration,
    ) -> Result<RawResponse, TransportError> {
        let mut state = self.state.lock();
        state.requests.push(request);
        state
            .responses
            .pop_front()
            .unwrap_or_else(|| Ok(RawResponse::new(404, r#"{"detail":"Not Found"}"#)))
    }
}
