use serde::{Deserialize, Serialize};
use std::fmt;

/// Scalar values a record field can hold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Integer(i64),
    Number(f64),
    String(String),
}

impl FieldValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldValue::Bool(_) => "boolean",
            FieldValue::Integer(_) => "integer",
            FieldValue::Number(_) => "number",
            FieldValue::String(_) => "string",
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Number(v) => Some(*v),
            FieldValue::Integer(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Convert a raw JSON value, returning the JSON type name when the shape
    /// has no scalar equivalent (null, arrays, objects, out-of-range numbers).
    pub fn from_json(json: &serde_json::Value) -> Result<Self, &'static str> {
        match json {
            serde_json::Value::Null => Err("null"),
            serde_json::Value::Bool(b) => Ok(FieldValue::Bool(*b)),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(FieldValue::Integer(i))
                } else if let Some(f) = n.as_f64() {
                    Ok(FieldValue::Number(f))
                } else {
                    Err("number")
                }
            }
            serde_json::Value::String(s) => Ok(FieldValue::String(s.clone())),
            serde_json::Value::Array(_) => Err("array"),
            serde_json::Value::Object(_) => Err("object"),
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            FieldValue::Bool(b) => serde_json::Value::Bool(*b),
            FieldValue::Integer(i) => serde_json::Value::from(*i),
            FieldValue::Number(f) => serde_json::Value::from(*f),
            FieldValue::String(s) => serde_json::Value::String(s.clone()),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Integer(i) => write!(f, "{}", i),
            FieldValue::Number(v) => write!(f, "{}", v),
            FieldValue::String(s) => write!(f, "{}", s),
        }
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Integer(value as i64)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::String(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::String(value)
    }
}

/// Declared type of a schema field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Boolean,
    Integer,
    Number,
}

impl FieldType {
    /// Whether a value has an acceptable shape for this type.
    /// Numbers accept integers; nothing else widens.
    pub fn accepts(&self, value: &FieldValue) -> bool {
        matches!(
            (self, value),
            (FieldType::String, FieldValue::String(_))
                | (FieldType::Boolean, FieldValue::Bool(_))
                | (FieldType::Integer, FieldValue::Integer(_))
                | (FieldType::Number, FieldValue::Integer(_))
                | (FieldType::Number, FieldValue::Number(_))
        )
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::String => write!(f, "string"),
            FieldType::Boolean => write!(f, "boolean"),
            FieldType::Integer => write!(f, "integer"),
            FieldType::Number => write!(f, "number"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_from_json() {
        let json = serde_json::json!(42);
        assert!(matches!(FieldValue::from_json(&json), Ok(FieldValue::Integer(42))));

        let json = serde_json::json!(95.2);
        assert!(matches!(FieldValue::from_json(&json), Ok(FieldValue::Number(_))));

        let json = serde_json::json!("hello");
        assert!(matches!(FieldValue::from_json(&json), Ok(FieldValue::String(_))));

        let json = serde_json::json!(true);
        assert!(matches!(FieldValue::from_json(&json), Ok(FieldValue::Bool(true))));
    }

    #[test]
    fn test_non_scalar_shapes_rejected() {
        assert_eq!(FieldValue::from_json(&serde_json::Value::Null), Err("null"));
        assert_eq!(FieldValue::from_json(&serde_json::json!([1, 2])), Err("array"));
        assert_eq!(FieldValue::from_json(&serde_json::json!({"a": 1})), Err("object"));
    }

    #[test]
    fn test_type_acceptance() {
        assert!(FieldType::Number.accepts(&FieldValue::Integer(3)));
        assert!(FieldType::Number.accepts(&FieldValue::Number(3.5)));
        assert!(!FieldType::Integer.accepts(&FieldValue::Number(3.5)));
        assert!(!FieldType::Integer.accepts(&FieldValue::Bool(true)));
        assert!(!FieldType::String.accepts(&FieldValue::Integer(1)));
        assert!(FieldType::Boolean.accepts(&FieldValue::Bool(false)));
    }

    #[test]
    fn test_json_round_trip_keeps_integers() {
        assert_eq!(FieldValue::Integer(7).to_json(), serde_json::json!(7));
        assert_eq!(FieldValue::from("x").to_json(), serde_json::json!("x"));
    }
}
