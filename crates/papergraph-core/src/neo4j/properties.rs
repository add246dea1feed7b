//! Conversion of JSON property maps into Bolt parameters

use neo4rs::{
    BoltBoolean, BoltFloat, BoltInteger, BoltList, BoltMap, BoltNull, BoltString, BoltType,
};
use serde_json::Value;

use crate::error::GraphError;
use crate::types::Properties;

/// Integers outside the signed 64-bit range have no Bolt representation
fn out_of_range(n: &serde_json::Number) -> bool {
    n.is_u64() && n.as_i64().is_none()
}

fn out_of_range_error(key: &str, n: &serde_json::Number) -> GraphError {
    GraphError::InvalidProperty {
        key: key.to_string(),
        reason: format!("integer {n} does not fit in 64 bits"),
    }
}

/// Check that every value can be used in a property filter: a scalar, null
/// (matches a missing property) or a list whose elements are all the same
/// scalar kind.
pub fn validate_properties(properties: &Properties) -> Result<(), GraphError> {
    for (key, value) in properties {
        if key.is_empty() {
            return Err(GraphError::InvalidProperty {
                key: key.clone(),
                reason: "property names cannot be empty".to_string(),
            });
        }
        match value {
            Value::Object(_) => {
                return Err(GraphError::InvalidProperty {
                    key: key.clone(),
                    reason: "maps cannot be stored as property values".to_string(),
                })
            }
            Value::Array(items) => validate_list(key, items)?,
            Value::Number(n) if out_of_range(n) => return Err(out_of_range_error(key, n)),
            _ => {}
        }
    }
    Ok(())
}

/// Like [`validate_properties`], but for values that are written. Neo4j
/// never stores null, so a null would silently vanish from the record.
pub fn validate_write_properties(properties: &Properties) -> Result<(), GraphError> {
    validate_properties(properties)?;
    match properties.iter().find(|(_, value)| value.is_null()) {
        Some((key, _)) => Err(GraphError::InvalidProperty {
            key: key.clone(),
            reason: "null cannot be stored; leave the property out instead".to_string(),
        }),
        None => Ok(()),
    }
}

fn validate_list(key: &str, items: &[Value]) -> Result<(), GraphError> {
    let mut kind = None;
    for item in items {
        let item_kind = match item {
            Value::Bool(_) => "boolean",
            Value::Number(n) if out_of_range(n) => return Err(out_of_range_error(key, n)),
            Value::Number(n) if n.is_i64() || n.is_u64() => "integer",
            Value::Number(_) => "float",
            Value::String(_) => "string",
            Value::Null => {
                return Err(GraphError::InvalidProperty {
                    key: key.to_string(),
                    reason: "lists cannot contain null".to_string(),
                })
            }
            Value::Array(_) | Value::Object(_) => {
                return Err(GraphError::InvalidProperty {
                    key: key.to_string(),
                    reason: "lists must contain scalar values".to_string(),
                })
            }
        };
        match kind {
            None => kind = Some(item_kind),
            Some(k) if k == item_kind => {}
            Some(k) => {
                return Err(GraphError::InvalidProperty {
                    key: key.to_string(),
                    reason: format!("list mixes {k} and {item_kind} values"),
                })
            }
        }
    }
    Ok(())
}

/// Convert a JSON value into its Bolt representation
pub fn to_bolt(value: &Value) -> Result<BoltType, GraphError> {
    Ok(match value {
        Value::Null => BoltType::Null(BoltNull),
        Value::Bool(b) => BoltType::Boolean(BoltBoolean::new(*b)),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                BoltType::Integer(BoltInteger::new(i))
            } else if out_of_range(n) {
                return Err(out_of_range_error("", n));
            } else if let Some(f) = n.as_f64() {
                BoltType::Float(BoltFloat::new(f))
            } else {
                return Err(GraphError::InvalidProperty {
                    key: String::new(),
                    reason: format!("number {n} is out of range"),
                });
            }
        }
        Value::String(s) => BoltType::String(BoltString::from(s.as_str())),
        Value::Array(items) => {
            let mut list = BoltList::new();
            for item in items {
                list.push(to_bolt(item)?);
            }
            BoltType::List(list)
        }
        Value::Object(map) => BoltType::Map(to_bolt_map(map)?),
    })
}

pub fn to_bolt_map(properties: &Properties) -> Result<BoltMap, GraphError> {
    let mut map = BoltMap::new();
    for (key, value) in properties {
        let bolt = to_bolt(value).map_err(|e| match e {
            GraphError::InvalidProperty { reason, .. } => GraphError::InvalidProperty {
                key: key.clone(),
                reason,
            },
            other => other,
        })?;
        map.put(BoltString::from(key.as_str()), bolt);
    }
    Ok(map)
}

/// Validate then convert a filter map into a single Bolt map parameter
pub fn filter_param(properties: &Properties) -> Result<BoltType, GraphError> {
    validate_properties(properties)?;
    Ok(BoltType::Map(to_bolt_map(properties)?))
}

/// Validate then convert a map of values to store into a Bolt map parameter
pub fn write_param(properties: &Properties) -> Result<BoltType, GraphError> {
    validate_write_properties(properties)?;
    Ok(BoltType::Map(to_bolt_map(properties)?))
}

/// Normalise a property map read back from the store into a `Properties`
pub fn from_json(value: Value) -> Result<Properties, GraphError> {
    match value {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Properties::new()),
        other => Err(GraphError::UnexpectedResult(format!(
            "expected a property map, got {other}"
        ))),
    }
}
