use std::time::Duration;

use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;
use tracing::Instrument;

use super::{ClientRequest, Transport};
use crate::connectors::config::LagoConfig;
use crate::connectors::errors::ConnectorError;

/// reqwest-backed [`Transport`] talking to a Lago instance
pub struct HttpTransport {
    base_url: String,
    http_client: reqwest::Client,
    auth_header: Option<String>,
    user_agent: String,
}

impl HttpTransport {
    pub fn new(config: LagoConfig) -> Result<Self, ConnectorError> {
        let timeout = Duration::from_secs(config.timeout_secs.max(1));
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| ConnectorError::Internal(format!("HTTP client error: {}", err)))?;

        let auth_header = config
            .api_key
            .as_ref()
            .filter(|key| !key.is_empty())
            .map(|key| format!("Bearer {}", key));

        if auth_header.is_none() {
            tracing::warn!("Lago API key is not configured; requests will be unauthenticated");
        }

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http_client,
            auth_header,
            user_agent: format!("lago-rust-client/{}", env!("CARGO_PKG_VERSION")),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn execute(&self, method: Method, request: ClientRequest) -> Result<Value, ConnectorError> {
        let url = self.url(&request.path);
        let mut builder = self
            .http_client
            .request(method.clone(), &url)
            .header("User-Agent", &self.user_agent)
            .header("Accept", "application/json");

        if let Some(auth) = &self.auth_header {
            builder = builder.header("Authorization", auth);
        }

        if !request.query_params.is_empty() {
            builder = builder.query(&request.query_params);
        }

        if let Some(body) = &request.body {
            tracing::debug!("Lago request body: {}", body);
            builder = builder.json(body);
        }

        let resp = builder.send().await.map_err(|err| {
            tracing::error!("Lago {} {} failed: {:?}", method, request.path, err);
            ConnectorError::from(err)
        })?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|err| ConnectorError::HttpError(err.to_string()))?;
        tracing::debug!(status = status.as_u16(), "Lago response body: {}", text);

        if !status.is_success() {
            let error = ConnectorError::from_status(status, text);
            tracing::error!("Lago {} {} rejected: {}", method, request.path, error);
            return Err(error);
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str::<Value>(&text).map_err(|_| ConnectorError::InvalidResponse(text))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, method: Method, request: ClientRequest) -> Result<Value, ConnectorError> {
        let span = tracing::info_span!(
            "lago_http_request",
            method = %method,
            path = %request.path,
        );

        // the whole round trip, body read and error logging included, runs in the span
        self.execute(method, request).instrument(span).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt;
    use std::sync::{Arc, Mutex};
    use tracing::field::{Field, Visit};
    use tracing::{Event, Subscriber};
    use tracing_subscriber::layer::{Context, SubscriberExt};
    use tracing_subscriber::registry::LookupSpan;
    use tracing_subscriber::{Layer, Registry};
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Records every event message and whether it fired inside `lago_http_request`
    #[derive(Clone, Default)]
    struct RequestSpanEvents(Arc<Mutex<Vec<(String, bool)>>>);

    struct MessageVisitor(String);

    impl Visit for MessageVisitor {
        fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
            if field.name() == "message" {
                self.0 = format!("{:?}", value);
            }
        }
    }

    impl<S> Layer<S> for RequestSpanEvents
    where
        S: Subscriber + for<'a> LookupSpan<'a>,
    {
        fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
            let in_request = ctx.event_scope(event).map_or(false, |mut scope| {
                scope.any(|span| span.name() == "lago_http_request")
            });
            let mut visitor = MessageVisitor(String::new());
            event.record(&mut visitor);
            self.0.lock().unwrap().push((visitor.0, in_request));
        }
    }

    fn transport(base_url: &str) -> HttpTransport {
        HttpTransport::new(LagoConfig {
            base_url: base_url.to_string(),
            api_key: Some("key".to_string()),
            timeout_secs: 5,
        })
        .unwrap()
    }

    #[test]
    fn test_url_joins_with_single_slash() {
        assert_eq!(
            transport("https://api.getlago.com/api/v1/").url("subscriptions"),
            "https://api.getlago.com/api/v1/subscriptions"
        );
        assert_eq!(
            transport("http://localhost:3000/api/v1").url("/subscriptions"),
            "http://localhost:3000/api/v1/subscriptions"
        );
    }

    #[test]
    fn test_bearer_header_from_api_key() {
        let transport = transport("http://localhost:3000/api/v1");
        assert_eq!(transport.auth_header.as_deref(), Some("Bearer key"));
        assert_eq!(transport.base_url(), "http://localhost:3000/api/v1");
    }

    #[test]
    fn test_empty_api_key_sends_no_auth() {
        let transport = HttpTransport::new(LagoConfig {
            api_key: Some(String::new()),
            ..LagoConfig::default()
        })
        .unwrap();
        assert!(transport.auth_header.is_none());
    }

    #[tokio::test]
    async fn test_response_handling_is_logged_inside_request_span() {
        let events = RequestSpanEvents::default();
        let _guard = tracing::subscriber::set_default(Registry::default().with(events.clone()));

        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .respond_with(ResponseTemplate::new(422).set_body_string("rejected"))
            .mount(&server)
            .await;

        let result = transport(&server.uri())
            .send(Method::DELETE, ClientRequest::new("subscriptions"))
            .await;
        assert!(matches!(result, Err(ConnectorError::Validation(_))));

        let events = events.0.lock().unwrap().clone();
        let response_logged = events
            .iter()
            .find(|(message, _)| message.starts_with("Lago response body"))
            .expect("response body event");
        assert!(response_logged.1);
        let rejection_logged = events
            .iter()
            .find(|(message, _)| message.contains("rejected: Validation failed"))
            .expect("rejection event");
        assert!(rejection_logged.1);
    }
}
