use serde::ser::{Serialize, SerializeMap, Serializer};

use super::schema::{FieldSpec, Schema, ValidationErrors, Violation};
use super::value::FieldValue;

/// Keyed store whose every present value satisfies its schema.
///
/// Slots are indexed like the schema's fields; a `None` slot is an absent
/// field. Values only enter through [`Record::new`] or [`Record::set`], both
/// of which validate first.
#[derive(Debug, Clone)]
pub struct Record {
    schema: &'static Schema,
    values: Vec<Option<FieldValue>>,
}

impl Record {
    /// Validate `data` as a whole and build a record from it
    pub fn new(
        schema: &'static Schema,
        data: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<Self, ValidationErrors> {
        let values = schema.coerce(data).map_err(|errors| {
            tracing::debug!(schema = schema.name(), errors = %errors, "Record validation failed");
            errors
        })?;
        Ok(Self { schema, values })
    }

    /// Record with every field absent
    pub fn empty(schema: &'static Schema) -> Self {
        Self {
            schema,
            values: vec![None; schema.len()],
        }
    }

    pub fn schema(&self) -> &'static Schema {
        self.schema
    }

    /// Current value, or `None` when absent or undeclared
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.schema
            .index_of(field)
            .and_then(|idx| self.values[idx].as_ref())
    }

    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(FieldValue::as_str)
    }

    /// Validate and store a single field; the old value survives a failure
    pub fn set(
        &mut self,
        field: &str,
        value: impl Into<FieldValue>,
    ) -> Result<(), ValidationErrors> {
        let value = value.into();
        let (idx, spec) = self.declared(field)?;

        spec.check(&value)
            .map_err(|violation| ValidationErrors::single(field, violation))?;

        self.values[idx] = Some(value);
        Ok(())
    }

    /// Reset a field to absent
    pub fn clear(&mut self, field: &str) -> Result<(), ValidationErrors> {
        let (idx, _) = self.declared(field)?;
        self.values[idx] = None;
        Ok(())
    }

    pub fn is_set(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    /// Present fields in schema order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &FieldValue)> + '_ {
        self.schema
            .field_names()
            .zip(self.values.iter())
            .filter_map(|(name, value)| value.as_ref().map(|v| (name, v)))
    }

    /// JSON object of the present fields
    pub fn to_json(&self) -> serde_json::Map<String, serde_json::Value> {
        self.iter()
            .map(|(name, value)| (name.to_string(), value.to_json()))
            .collect()
    }

    fn declared(&self, field: &str) -> Result<(usize, &'static FieldSpec), ValidationErrors> {
        let schema: &'static Schema = self.schema;
        schema
            .lookup(field)
            .ok_or_else(|| ValidationErrors::single(field, Violation::UnknownField))
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for (name, value) in self.iter() {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
