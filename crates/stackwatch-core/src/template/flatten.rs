//! Flatten nested parameter documents into dotted keys.
//!
//! `{"connections":{"auth":"x"}}` becomes `connections.auth = x` and
//! `{"list":["a","b"]}` becomes `list.0 = a`, `list.1 = b`.

use serde_json::Value;

use crate::error::{StackwatchError, StackwatchResult};
use crate::provider::Parameter;

/// Key reported when the document itself is not an object.
const ROOT_KEY: &str = "<document>";

/// Flatten a JSON object into `(key, value)` parameters.
///
/// Strings pass through, numbers and booleans use their JSON text, and `null`
/// is rejected. Sibling order is not significant.
pub fn flatten_parameters(document: &Value) -> StackwatchResult<Vec<Parameter>> {
    let Value::Object(map) = document else {
        return Err(StackwatchError::ParameterType {
            key: ROOT_KEY.to_string(),
            found: json_type(document),
        });
    };

    let mut parameters = Vec::new();
    for (key, value) in map {
        flatten_value(key.clone(), value, &mut parameters)?;
    }
    Ok(parameters)
}

fn flatten_value(path: String, value: &Value, out: &mut Vec<Parameter>) -> StackwatchResult<()> {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                flatten_value(format!("{path}.{key}"), child, out)?;
            }
        }
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                flatten_value(format!("{path}.{index}"), child, out)?;
            }
        }
        Value::String(s) => out.push(Parameter::new(path, s.clone())),
        Value::Number(n) => out.push(Parameter::new(path, n.to_string())),
        Value::Bool(b) => out.push(Parameter::new(path, b.to_string())),
        Value::Null => {
            return Err(StackwatchError::ParameterType {
                key: path,
                found: "null",
            });
        }
    }
    Ok(())
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
