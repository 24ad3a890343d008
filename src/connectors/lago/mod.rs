//! Lago API connector
//!
//! `Client` wraps an injected [`Transport`] and hands out resource-scoped
//! request objects (`client.subscription()`). Routes, CLIs and tests only
//! depend on the trait, so the HTTP implementation can be swapped for
//! [`MockTransport`].

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::connectors::config::LagoConfig;
use crate::connectors::errors::ConnectorError;

pub mod mock;
pub mod subscription;
pub mod transport;


pub use mock::MockTransport;
pub use subscription::{
    BillingTime, Metadata, Subscription, SubscriptionInput, SubscriptionListInput,
    SubscriptionParams, SubscriptionRequest, SubscriptionResult, SubscriptionStatus,
};
pub use transport::HttpTransport;

/// A single call against the Lago API, relative to the configured base URL
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientRequest {
    pub path: String,
    pub query_params: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ClientRequest {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn with_query(mut self, query_params: Vec<(String, String)>) -> Self {
        self.query_params = query_params;
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// Performs one HTTP round trip and returns the response body as JSON.
///
/// Implementations map transport failures and non-2xx statuses to
/// [`ConnectorError`]; they are responsible for their own timeouts.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, method: Method, request: ClientRequest) -> Result<Value, ConnectorError>;
}

/// Shared handle to the Lago API
#[derive(Clone)]
pub struct Client {
    transport: Arc<dyn Transport>,
}

impl Client {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Build a client backed by [`HttpTransport`]
    pub fn from_config(config: LagoConfig) -> Result<Self, ConnectorError> {
        tracing::info!("Initializing Lago connector: {}", config.base_url);
        Ok(Self::new(Arc::new(HttpTransport::new(config)?)))
    }

    pub fn subscription(&self) -> SubscriptionRequest<'_> {
        SubscriptionRequest::new(self)
    }

    pub async fn get<T: DeserializeOwned>(&self, request: ClientRequest) -> Result<T, ConnectorError> {
        self.call(Method::GET, request).await
    }

    pub async fn post<T: DeserializeOwned>(&self, request: ClientRequest) -> Result<T, ConnectorError> {
        self.call(Method::POST, request).await
    }

    pub async fn delete<T: DeserializeOwned>(
        &self,
        request: ClientRequest,
    ) -> Result<T, ConnectorError> {
        self.call(Method::DELETE, request).await
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: Method,
        request: ClientRequest,
    ) -> Result<T, ConnectorError> {
        let path = request.path.clone();
        let payload = self.transport.send(method.clone(), request).await?;

        serde_json::from_value::<T>(payload).map_err(|err| {
            tracing::error!(method = %method, path = %path, "Failed to decode Lago response: {}", err);
            ConnectorError::InvalidResponse(format!(
                "Failed to decode {} {} response: {}",
                method, path, err
            ))
        })
    }
}
