use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::LazyLock;

use super::{record_entity, Alert, Subscription, HEX_ID};
use crate::client::SeyrenClient;
use crate::data::{FieldSpec, Record, Schema};
use crate::error::{Result, SeyrenError};

/// Check documents carry server-managed fields (name, state, subscriptions)
/// that this schema does not model, so unknown keys are ignored here.
pub static CHECK_SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
    let hex = || FieldSpec::string().with_format(HEX_ID).expect("valid id regex");

    Schema::builder("check")
        .field("id", hex())
        .field("checkId", hex())
        .field("fromType", FieldSpec::string())
        .field("toType", FieldSpec::string())
        .field("target", FieldSpec::string())
        .field("timestamp", FieldSpec::integer())
        .field("value", FieldSpec::number())
        .field("warn", FieldSpec::string())
        .field("error", FieldSpec::string())
        .field("targetHash", FieldSpec::string())
        .allow_unknown(true)
        .build()
});

/// A monitoring rule tracked by the service
#[derive(Debug, Clone)]
pub struct Check {
    record: Record,
}

record_entity!(Check, CHECK_SCHEMA);

impl Check {
    pub fn id(&self) -> Option<&str> {
        self.record.get_str("id")
    }

    pub fn target(&self) -> Option<&str> {
        self.record.get_str("target")
    }

    /// The id addressing this check on the server
    pub(crate) fn require_id(&self) -> Result<&str> {
        self.id()
            .ok_or_else(|| SeyrenError::check("check has no id"))
    }

    /// All alerts raised for this check
    pub async fn get_alerts(&self, client: &SeyrenClient) -> Result<Vec<Alert>> {
        let id = self.require_id()?;
        client.get_check_alerts(id, 0, 20).await
    }

    /// Delete this check's alerts raised before `before`
    pub async fn delete_alerts(
        &self,
        client: &SeyrenClient,
        before: DateTime<Utc>,
    ) -> Result<()> {
        let id = self.require_id()?;
        client.delete_check_alerts(id, before).await
    }

    /// Create a new check on the server, returning its id when reported
    pub async fn create(client: &SeyrenClient, check: &NewCheck) -> Result<Option<String>> {
        client.create_check(check).await
    }

    /// Push this check's current fields to the server
    pub async fn update(&self, client: &SeyrenClient) -> Result<()> {
        client.update_check(self).await
    }

    pub async fn delete(&self, client: &SeyrenClient) -> Result<()> {
        let id = self.require_id()?;
        client.delete_check(id).await
    }

    pub async fn create_subscription(
        &self,
        client: &SeyrenClient,
        subscription: &Subscription,
    ) -> Result<Option<String>> {
        let id = self.require_id()?;
        client.create_subscription(id, subscription).await
    }

    pub async fn update_subscription(
        &self,
        client: &SeyrenClient,
        subscription: &Subscription,
    ) -> Result<()> {
        let id = self.require_id()?;
        client.update_subscription(id, subscription).await
    }

    pub async fn delete_subscription(
        &self,
        client: &SeyrenClient,
        subscription: &Subscription,
    ) -> Result<()> {
        let id = self.require_id()?;
        client.delete_subscription(id, subscription).await
    }

    /// Ask the server to send a test notification through `subscription`
    pub async fn test_subscription(
        &self,
        client: &SeyrenClient,
        subscription: &Subscription,
    ) -> Result<()> {
        let id = self.require_id()?;
        client.test_subscription(id, subscription).await
    }
}

/// Payload for creating a check
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCheck {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Graphite metric path
    pub target: String,
    pub warn: String,
    pub error: String,
    pub enabled: bool,
    /// Evaluate on the live pickle feed instead of polling
    #[serde(skip_serializing_if = "Option::is_none")]
    pub live: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub until: Option<String>,
}

impl NewCheck {
    pub fn new(
        name: impl Into<String>,
        target: impl Into<String>,
        warn: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: None,
            target: target.into(),
            warn: warn.into(),
            error: error.into(),
            enabled: true,
            live: None,
            from: None,
            until: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_live(mut self, live: bool) -> Self {
        self.live = Some(live);
        self
    }

    /// Graphite time range, e.g. `-11minutes` / `-1minutes`
    pub fn with_range(mut self, from: impl Into<String>, until: impl Into<String>) -> Self {
        self.from = Some(from.into());
        self.until = Some(until.into());
        self
    }
}

/// Filters for listing checks
#[derive(Debug, Clone, Default)]
pub struct CheckFilter {
    pub states: Vec<String>,
    pub enabled: Option<bool>,
    pub name: Option<String>,
    /// Fields to match, each flagged as a regex or a literal
    pub fields: Vec<(String, bool)>,
}

impl CheckFilter {
    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.states.push(state.into());
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_field(mut self, field: impl Into<String>, regex: bool) -> Self {
        self.fields.push((field.into(), regex));
        self
    }

    pub(crate) fn query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        for state in &self.states {
            query.push(("state", state.clone()));
        }
        if let Some(enabled) = self.enabled {
            query.push(("enabled", enabled.to_string()));
        }
        if let Some(name) = &self.name {
            query.push(("name", name.clone()));
        }
        for (field, _) in &self.fields {
            query.push(("fields", field.clone()));
        }
        for (_, regex) in &self.fields {
            query.push(("regexes", regex.to_string()));
        }
        query
    }
}
