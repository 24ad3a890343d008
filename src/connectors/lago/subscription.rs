use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::Instrument;
use uuid::Uuid;

use super::{Client, ClientRequest};
use crate::connectors::errors::ConnectorError;

const SUBSCRIPTIONS_PATH: &str = "subscriptions";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    Active,
    Pending,
    Terminated,
    Canceled,
}

/// Billing anchor of a subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillingTime {
    /// Billed on the anniversary of the subscription date
    Anniversary,
    /// Billed at the start of each calendar period
    Calendar,
}

impl fmt::Display for BillingTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Anniversary => write!(f, "anniversary"),
            Self::Calendar => write!(f, "calendar"),
        }
    }
}

impl FromStr for BillingTime {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "anniversary" => Ok(Self::Anniversary),
            "calendar" => Ok(Self::Calendar),
            other => Err(format!(
                "unknown billing time '{}', expected anniversary or calendar",
                other
            )),
        }
    }
}

/// Subscription as returned by Lago. Status and timestamps are owned by the
/// remote service; only `lago_id` is required, anything else Lago leaves out
/// decodes to its empty value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    pub lago_id: Uuid,
    #[serde(default)]
    pub lago_customer_id: Option<Uuid>,
    #[serde(default)]
    pub external_customer_id: String,

    #[serde(default)]
    pub plan_code: String,

    #[serde(default)]
    pub status: Option<SubscriptionStatus>,
    #[serde(default)]
    pub billing_time: Option<BillingTime>,
    #[serde(default)]
    pub subscription_date: Option<String>,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub canceled_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub terminated_at: Option<DateTime<Utc>>,
}

/// Fields sent when creating or terminating a subscription. Unset or empty
/// fields are left out of the body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionInput {
    #[serde(default, skip_serializing_if = "is_blank")]
    pub external_customer_id: Option<String>,
    #[serde(default, skip_serializing_if = "is_blank")]
    pub plan_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billing_time: Option<BillingTime>,
}

impl SubscriptionInput {
    pub fn new(external_customer_id: impl Into<String>, plan_code: impl Into<String>) -> Self {
        Self {
            external_customer_id: Some(external_customer_id.into()),
            plan_code: Some(plan_code.into()),
            billing_time: None,
        }
    }

    pub fn with_billing_time(mut self, billing_time: BillingTime) -> Self {
        self.billing_time = Some(billing_time);
        self
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, str::is_empty)
}

/// `{"subscription": {...}}` request envelope
#[derive(Debug, Clone, Serialize)]
pub struct SubscriptionParams {
    pub subscription: SubscriptionInput,
}

/// Filter for listing subscriptions. Zero and empty values are not sent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubscriptionListInput {
    pub external_customer_id: Option<String>,
    pub per_page: u32,
    pub page: u32,
}

impl SubscriptionListInput {
    pub fn query_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        if let Some(customer_id) = self.external_customer_id.as_deref() {
            if !customer_id.is_empty() {
                params.push(("external_customer_id".to_string(), customer_id.to_string()));
            }
        }
        if self.per_page != 0 {
            params.push(("per_page".to_string(), self.per_page.to_string()));
        }
        if self.page != 0 {
            params.push(("page".to_string(), self.page.to_string()));
        }
        params
    }
}

/// Pagination metadata attached to list responses
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(default)]
    pub current_page: Option<u64>,
    #[serde(default)]
    pub next_page: Option<u64>,
    #[serde(default)]
    pub prev_page: Option<u64>,
    #[serde(default)]
    pub total_pages: Option<u64>,
    #[serde(default)]
    pub total_count: Option<u64>,
}

/// Response envelope: `subscription` for create/terminate, `subscriptions`
/// and `meta` for list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription: Option<Subscription>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscriptions: Option<Vec<Subscription>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Metadata>,
}

impl SubscriptionResult {
    fn into_subscription(self, operation: &str) -> Result<Subscription, ConnectorError> {
        self.subscription.ok_or_else(|| {
            ConnectorError::InvalidResponse(format!(
                "Lago {} response has no subscription",
                operation
            ))
        })
    }
}

/// Requests against the `subscriptions` resource
pub struct SubscriptionRequest<'a> {
    client: &'a Client,
}

impl<'a> SubscriptionRequest<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Create a subscription. Input is not validated locally; Lago rejects
    /// incomplete input with a 422.
    pub async fn create(&self, input: SubscriptionInput) -> Result<Subscription, ConnectorError> {
        let span = tracing::info_span!(
            "lago_create_subscription",
            external_customer_id = ?input.external_customer_id,
            plan_code = ?input.plan_code
        );

        let body = to_body(&SubscriptionParams { subscription: input })?;
        let request = ClientRequest::new(SUBSCRIPTIONS_PATH).with_body(body);

        let result = self.client.post::<SubscriptionResult>(request).instrument(span).await?;
        result.into_subscription("create")
    }

    /// Terminate the subscription of a customer. Lago expects DELETE with a
    /// JSON body here. An empty id is left out, so the body is `{}`.
    pub async fn terminate(&self, external_customer_id: &str) -> Result<Subscription, ConnectorError> {
        let span = tracing::info_span!(
            "lago_terminate_subscription",
            external_customer_id = %external_customer_id
        );

        let input = SubscriptionInput {
            external_customer_id: Some(external_customer_id.to_string()),
            ..SubscriptionInput::default()
        };
        let request = ClientRequest::new(SUBSCRIPTIONS_PATH).with_body(to_body(&input)?);

        let result = self.client.delete::<SubscriptionResult>(request).instrument(span).await?;
        result.into_subscription("terminate")
    }

    /// List subscriptions; returns the whole envelope including pagination.
    pub async fn get_list(
        &self,
        filter: SubscriptionListInput,
    ) -> Result<SubscriptionResult, ConnectorError> {
        let span = tracing::info_span!(
            "lago_list_subscriptions",
            external_customer_id = ?filter.external_customer_id,
            page = filter.page,
            per_page = filter.per_page
        );

        let request = ClientRequest::new(SUBSCRIPTIONS_PATH).with_query(filter.query_params());
        self.client
            .get::<SubscriptionResult>(request)
            .instrument(span)
            .await
    }
}

fn to_body<T: Serialize>(value: &T) -> Result<serde_json::Value, ConnectorError> {
    serde_json::to_value(value)
        .map_err(|err| ConnectorError::Internal(format!("Failed to encode request body: {}", err)))
}
