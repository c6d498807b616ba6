//! Global variable values.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_yaml::Value;

/// The blueprint's global variable table.
pub type VarTable = BTreeMap<String, VarValue>;

/// A global variable value.
///
/// Only the shapes validation cares about get their own variant; numbers,
/// lists and anything else land in `Other`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum VarValue {
    String(String),
    /// A mapping whose keys are all strings
    Map(BTreeMap<String, VarValue>),
    Null,
    Other(Value),
}

impl VarValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            VarValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, VarValue::Null)
    }

    pub fn is_map(&self) -> bool {
        matches!(self, VarValue::Map(_))
    }
}

impl From<&str> for VarValue {
    fn from(s: &str) -> Self {
        VarValue::String(s.to_string())
    }
}

impl From<String> for VarValue {
    fn from(s: String) -> Self {
        VarValue::String(s)
    }
}

impl From<Value> for VarValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => VarValue::Null,
            Value::String(s) => VarValue::String(s),
            Value::Mapping(mapping) => {
                if !mapping.keys().all(Value::is_string) {
                    return VarValue::Other(Value::Mapping(mapping));
                }
                let map = mapping
                    .into_iter()
                    .filter_map(|(k, v)| match k {
                        Value::String(k) => Some((k, VarValue::from(v))),
                        _ => None,
                    })
                    .collect();
                VarValue::Map(map)
            }
            other => VarValue::Other(other),
        }
    }
}

impl From<VarValue> for Value {
    fn from(value: VarValue) -> Self {
        match value {
            VarValue::String(s) => Value::String(s),
            VarValue::Map(map) => Value::Mapping(
                map.into_iter()
                    .map(|(k, v)| (Value::String(k), Value::from(v)))
                    .collect(),
            ),
            VarValue::Null => Value::Null,
            VarValue::Other(v) => v,
        }
    }
}
