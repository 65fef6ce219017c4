//! Rule option validation.

use jsonschema::Validator;
use serde_json::{Map, Value};

/// Validates and coerces raw rule options against a rule's schema.
pub trait OptionsValidator {
    /// Returns the options a rule should see, or a message describing why
    /// `raw` does not match `schema`.
    fn parse(&self, schema: &Value, raw: &Value) -> Result<Value, String>;
}

/// [`OptionsValidator`] backed by `jsonschema`.
///
/// Before validation, `null` options become `{}` when the schema describes an
/// object, and missing top-level properties take their schema `default`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSchemaValidator;

impl OptionsValidator for JsonSchemaValidator {
    fn parse(&self, schema: &Value, raw: &Value) -> Result<Value, String> {
        let mut options = raw.clone();

        if options.is_null() && describes_object(schema) {
            options = Value::Object(Map::new());
        }

        if let (Value::Object(values), Some(Value::Object(properties))) =
            (&mut options, schema.get("properties"))
        {
            for (name, property) in properties {
                if let Some(default) = property.get("default")
                    && !values.contains_key(name)
                {
                    values.insert(name.clone(), default.clone());
                }
            }
        }

        let validator =
            Validator::new(schema).map_err(|e| format!("Invalid options schema: {}", e))?;
        if let Err(e) = validator.validate(&options) {
            return Err(format!("{} at {}", e, e.instance_path()));
        }

        Ok(options)
    }
}

fn describes_object(schema: &Value) -> bool {
    match schema.get("type") {
        Some(Value::String(kind)) => kind == "object",
        Some(Value::Array(kinds)) => kinds.iter().any(|kind| kind == "object"),
        _ => schema.get("properties").is_some(),
    }
}
