use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::{Result, SeyrenError};

/// Keys every alert record must carry
pub const ALERT_FIELDS: [&str; 10] = [
    "checkId",
    "fromType",
    "toType",
    "target",
    "timestamp",
    "value",
    "warn",
    "error",
    "targetHash",
    "id",
];

/// A check changing state, as recorded by the service.
///
/// Alerts are facts: they are only ever built from a server record and are
/// never modified afterwards. Two alerts are equal when their ids are.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: String,
    pub check_id: String,
    pub from_type: String,
    pub to_type: String,
    pub target: String,
    pub target_hash: String,
    /// Epoch milliseconds
    pub timestamp: i64,
    /// Absent when the target had no datapoints
    pub value: Option<f64>,
    #[serde(deserialize_with = "threshold")]
    pub warn: String,
    #[serde(deserialize_with = "threshold")]
    pub error: String,
}

impl Alert {
    /// Build an alert from a raw record, requiring all ten fields
    pub fn from_json(record: &serde_json::Map<String, serde_json::Value>) -> Result<Self> {
        if let Some(missing) = ALERT_FIELDS.iter().find(|f| !record.contains_key(**f)) {
            return Err(SeyrenError::alert(format!("Missing required field: {}", missing)));
        }

        Self::deserialize(serde_json::Value::Object(record.clone()))
            .map_err(|e| SeyrenError::alert(format!("Malformed alert record: {}", e)))
    }

    pub fn from_value(record: &serde_json::Value) -> Result<Self> {
        record
            .as_object()
            .ok_or_else(|| SeyrenError::alert("Alert record is not an object"))
            .and_then(Self::from_json)
    }

    /// Timestamp as a UTC datetime
    pub fn time(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        chrono::DateTime::<chrono::Utc>::from_timestamp_millis(self.timestamp)
    }
}

impl PartialEq for Alert {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Alert {}

impl Hash for Alert {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Alert(id: {}, checkId: {}, target: {}, change: {}->{})",
            self.id, self.check_id, self.target, self.from_type, self.to_type
        )
    }
}

/// Thresholds arrive as strings or as bare decimals
fn threshold<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    })
}
