//! JSON -> record conversion

use super::CliError;
use crate::{Record, Value};

/// Convert a JSON object into a record.
///
/// Scalars map one to one; nested arrays and objects are rejected since no
/// comparison can match them.
pub fn json_to_record(v: serde_json::Value) -> Result<Record, CliError> {
    let serde_json::Value::Object(obj) = v else {
        return Err(CliError::NotAnObject);
    };

    obj.into_iter()
        .map(|(k, v)| {
            let value = match v {
                serde_json::Value::Null => Value::Null,
                serde_json::Value::Bool(b) => Value::Boolean(b),
                serde_json::Value::Number(n) => match n.as_f64() {
                    Some(n) => Value::Number(n),
                    None => return Err(CliError::UnsupportedValue(k)),
                },
                serde_json::Value::String(s) => Value::String(s),
                serde_json::Value::Array(_) | serde_json::Value::Object(_) => {
                    return Err(CliError::UnsupportedValue(k));
                }
            };
            Ok((k, value))
        })
        .collect()
}
