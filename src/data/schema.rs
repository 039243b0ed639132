//! Declarative field schemas and the validator that enforces them
//!
//! A [`Schema`] is an ordered list of field names, each with a [`FieldSpec`]
//! (type plus optional format regex). Validation is a pure function of the
//! schema and the input; it holds no state between calls, so one schema can
//! be shared by every record of an entity type.

use regex::Regex;
use std::collections::BTreeMap;
use std::fmt;

use super::value::{FieldType, FieldValue};

/// Constraint for a single field
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub field_type: FieldType,
    /// Anchored to the whole value when checked
    pub format: Option<Regex>,
}

impl FieldSpec {
    pub fn new(field_type: FieldType) -> Self {
        Self {
            field_type,
            format: None,
        }
    }

    pub fn string() -> Self {
        Self::new(FieldType::String)
    }

    pub fn boolean() -> Self {
        Self::new(FieldType::Boolean)
    }

    pub fn integer() -> Self {
        Self::new(FieldType::Integer)
    }

    pub fn number() -> Self {
        Self::new(FieldType::Number)
    }

    /// Require string values to match `pattern` in full
    pub fn with_format(mut self, pattern: &str) -> Result<Self, regex::Error> {
        self.format = Some(Regex::new(&format!("^(?:{})$", pattern))?);
        Ok(self)
    }

    /// Check an already-converted value against this constraint
    pub fn check(&self, value: &FieldValue) -> Result<(), Violation> {
        if !self.field_type.accepts(value) {
            return Err(Violation::Type {
                expected: self.field_type,
                found: value.type_name(),
            });
        }

        if let FieldValue::Number(n) = value {
            if !n.is_finite() {
                return Err(Violation::NonFinite);
            }
        }

        if let (Some(format), FieldValue::String(s)) = (&self.format, value) {
            if !format.is_match(s) {
                return Err(Violation::Format {
                    pattern: format.as_str().to_string(),
                    value: s.clone(),
                });
            }
        }

        Ok(())
    }

    /// Convert and check a raw JSON value
    pub fn check_json(&self, json: &serde_json::Value) -> Result<FieldValue, Violation> {
        let value = FieldValue::from_json(json).map_err(|found| match found {
            "null" => Violation::Null,
            found => Violation::Type {
                expected: self.field_type,
                found,
            },
        })?;
        self.check(&value)?;
        Ok(value)
    }
}

/// Ordered field schema for one entity type
#[derive(Debug, Clone)]
pub struct Schema {
    name: &'static str,
    fields: Vec<(&'static str, FieldSpec)>,
    allow_unknown: bool,
}

impl Schema {
    pub fn builder(name: &'static str) -> SchemaBuilder {
        SchemaBuilder {
            schema: Schema {
                name,
                fields: Vec::new(),
                allow_unknown: false,
            },
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn allow_unknown(&self) -> bool {
        self.allow_unknown
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Position of a declared field
    pub fn index_of(&self, field: &str) -> Option<usize> {
        self.fields.iter().position(|(name, _)| *name == field)
    }

    pub fn spec(&self, field: &str) -> Option<&FieldSpec> {
        self.lookup(field).map(|(_, spec)| spec)
    }

    /// Position and spec of a declared field
    pub fn lookup(&self, field: &str) -> Option<(usize, &FieldSpec)> {
        self.fields
            .iter()
            .enumerate()
            .find(|(_, (name, _))| *name == field)
            .map(|(idx, (_, spec))| (idx, spec))
    }

    /// Declared field names in schema order
    pub fn field_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|(name, _)| *name)
    }

    /// Validate a whole mapping and convert every declared field.
    ///
    /// The result is indexed like the schema; omitted fields are `None`.
    /// All violations are collected before failing.
    pub fn coerce(
        &self,
        data: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<Vec<Option<FieldValue>>, ValidationErrors> {
        let mut values = vec![None; self.fields.len()];
        let mut errors = ValidationErrors::default();

        for (key, json) in data {
            match self.index_of(key) {
                Some(idx) => match self.fields[idx].1.check_json(json) {
                    Ok(value) => values[idx] = Some(value),
                    Err(violation) => errors.insert(key.clone(), violation),
                },
                None if self.allow_unknown => {}
                None => errors.insert(key.clone(), Violation::UnknownField),
            }
        }

        if errors.is_empty() {
            Ok(values)
        } else {
            Err(errors)
        }
    }
}

pub struct SchemaBuilder {
    schema: Schema,
}

impl SchemaBuilder {
    pub fn field(mut self, name: &'static str, spec: FieldSpec) -> Self {
        self.schema.fields.retain(|(existing, _)| *existing != name);
        self.schema.fields.push((name, spec));
        self
    }

    /// Ignore keys the schema does not declare instead of rejecting them
    pub fn allow_unknown(mut self, allow: bool) -> Self {
        self.schema.allow_unknown = allow;
        self
    }

    pub fn build(self) -> Schema {
        self.schema
    }
}

/// Validate `data` against `schema` without building a record
pub fn validate(
    schema: &Schema,
    data: &serde_json::Map<String, serde_json::Value>,
) -> Result<(), ValidationErrors> {
    schema.coerce(data).map(|_| ())
}

/// Reason a single field failed validation
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Violation {
    #[error("unknown field")]
    UnknownField,

    #[error("null value not allowed")]
    Null,

    #[error("number must be finite")]
    NonFinite,

    #[error("must be of {expected} type, got {found}")]
    Type {
        expected: FieldType,
        found: &'static str,
    },

    #[error("value '{value}' does not match format '{pattern}'")]
    Format { pattern: String, value: String },
}

/// Per-field violations, keyed by field name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationErrors {
    fields: BTreeMap<String, Violation>,
}

impl ValidationErrors {
    pub fn single(field: impl Into<String>, violation: Violation) -> Self {
        let mut errors = Self::default();
        errors.insert(field.into(), violation);
        errors
    }

    pub fn insert(&mut self, field: String, violation: Violation) {
        self.fields.insert(field, violation);
    }

    pub fn get(&self, field: &str) -> Option<&Violation> {
        self.fields.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Violation)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (field, violation)) in self.fields.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", field, violation)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}
