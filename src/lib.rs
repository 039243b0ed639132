//! Seyren: client for the Seyren alerting service
//!
//! Models the service's checks, subscriptions and alerts, and talks to its
//! HTTP API.
//!
//! # Features
//!
//! - **Schema-Validated Records**: `Check` and `Subscription` are backed by a
//!   declarative field schema; every construction and every `set` is validated
//! - **Strict Alerts**: alert records must carry all ten fields
//! - **Paged Retrieval**: alert collections are walked to completeness using
//!   the server-reported cursor
//! - **Check & Subscription Management**: create, update, delete and test
//!
//! # Example
//!
//! ```no_run
//! use seyren::{SeyrenClient, Subscription};
//!
//! # async fn run() -> seyren::Result<()> {
//! let client = SeyrenClient::new("http://localhost:8081")?;
//!
//! for alert in client.get_alerts(0, 20).await? {
//!     println!("{}", alert);
//! }
//!
//! let mut subscription = Subscription::from_value(&serde_json::json!({
//!     "target": "ops@example.com",
//!     "type": "EMAIL",
//!     "fromTime": "0800",
//!     "toTime": "1800",
//! }))?;
//! // rejected: hours run 00-24
//! assert!(subscription.set("toTime", "2500").is_err());
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod data;
pub mod error;
pub mod model;

// Re-export commonly used types
pub use client::{Auth, ClientConfig, SeyrenClient};
pub use data::{FieldSpec, FieldType, FieldValue, Record, Schema, ValidationErrors};
pub use error::{Result, SeyrenError};
pub use model::{Alert, Check, CheckFilter, NewCheck, Subscription};
