use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;

use super::{ClientRequest, Transport};
use crate::connectors::errors::ConnectorError;

/// In-memory transport for tests: replays queued responses in order and
/// records every request it receives.
#[derive(Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<Result<Value, ConnectorError>>>,
    requests: Mutex<Vec<(Method, ClientRequest)>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_response(&self, payload: Value) {
        lock(&self.responses).push_back(Ok(payload));
    }

    pub fn push_error(&self, error: ConnectorError) {
        lock(&self.responses).push_back(Err(error));
    }

    /// Requests received so far, oldest first
    pub fn requests(&self) -> Vec<(Method, ClientRequest)> {
        lock(&self.requests).clone()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, method: Method, request: ClientRequest) -> Result<Value, ConnectorError> {
        lock(&self.requests).push((method, request));
        lock(&self.responses).pop_front().unwrap_or_else(|| {
            Err(ConnectorError::Internal(
                "MockTransport has no queued response".to_string(),
            ))
        })
    }
}
