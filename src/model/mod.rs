//! Domain entities of the Seyren API
//!
//! `Check` and `Subscription` are thin bindings of [`Record`](crate::data::Record)
//! to a fixed schema; `Alert` is a strict, required-field record.

/// Format shared by check and subscription ids
pub(crate) const HEX_ID: &str = "[0-9a-f]+";

/// Generates the record-backed accessors of an entity bound to `$schema`
macro_rules! record_entity {
    ($entity:ident, $schema:ident) => {
        impl $entity {
            /// Validate `data` against the schema and build the entity
            pub fn new(
                data: &serde_json::Map<String, serde_json::Value>,
            ) -> $crate::error::Result<Self> {
                Ok(Self {
                    record: $crate::data::Record::new(&$schema, data)?,
                })
            }

            pub fn from_value(data: &serde_json::Value) -> $crate::error::Result<Self> {
                let map = data.as_object().ok_or_else(|| {
                    $crate::error::SeyrenError::MalformedResponse(format!(
                        "{} is not a JSON object",
                        $schema.name()
                    ))
                })?;
                Self::new(map)
            }

            pub fn get(&self, field: &str) -> Option<&$crate::data::FieldValue> {
                self.record.get(field)
            }

            pub fn set(
                &mut self,
                field: &str,
                value: impl Into<$crate::data::FieldValue>,
            ) -> $crate::error::Result<()> {
                Ok(self.record.set(field, value)?)
            }

            pub fn clear(&mut self, field: &str) -> $crate::error::Result<()> {
                Ok(self.record.clear(field)?)
            }

            pub fn record(&self) -> &$crate::data::Record {
                &self.record
            }

            pub fn to_json(&self) -> serde_json::Map<String, serde_json::Value> {
                self.record.to_json()
            }
        }

        impl serde::Serialize for $entity {
            fn serialize<S: serde::Serializer>(
                &self,
                serializer: S,
            ) -> std::result::Result<S::Ok, S::Error> {
                serde::Serialize::serialize(&self.record, serializer)
            }
        }
    };
}

pub(crate) use record_entity;

pub mod alert;
pub mod check;
pub mod subscription;

pub use alert::{Alert, ALERT_FIELDS};
pub use check::{Check, CheckFilter, NewCheck, CHECK_SCHEMA};
pub use subscription::{Subscription, SUBSCRIPTION_SCHEMA};
