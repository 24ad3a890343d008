pub mod configuration;
pub mod connectors;
pub mod telemetry;

pub use connectors::lago::{
    BillingTime, Client, ClientRequest, Metadata, Subscription, SubscriptionInput,
    SubscriptionListInput, SubscriptionRequest, SubscriptionResult, SubscriptionStatus, Transport,
};
pub use connectors::{ApiError, ConnectorError, LagoConfig};
