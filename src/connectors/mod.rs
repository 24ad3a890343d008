//! External Service Connectors
//!
//! Adapters for the Lago billing API. Callers hold a [`lago::Client`] and
//! never touch HTTP directly.
//!
//! ## Architecture Pattern
//!
//! 1. `lago::Transport` trait → allows mocking in tests
//! 2. `lago::HttpTransport` implements it with reqwest
//! 3. Configuration in `config.rs`
//! 4. Inject the transport into `lago::Client::new` → resources never depend on HTTP details
//!
//! ## Testing
//!
//! ```ignore
//! let transport = Arc::new(MockTransport::new());
//! transport.push_response(json!({"subscription": {...}}));
//! let client = Client::new(transport.clone());
//! client.subscription().terminate("cust_1").await?;
//! ```

pub mod config;
pub mod errors;
pub mod lago;

pub use config::LagoConfig;
pub use errors::{ApiError, ConnectorError};
pub use lago::{Client, ClientRequest, HttpTransport, MockTransport, Transport};
