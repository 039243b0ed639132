pub mod record;
pub mod schema;
pub mod value;

pub use record::Record;
pub use schema::{validate, FieldSpec, Schema, SchemaBuilder, ValidationErrors, Violation};
pub use value::{FieldType, FieldValue};
