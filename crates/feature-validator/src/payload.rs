//! Predictor Request Payloads

use crate::record::{Feature, FeatureRecord, FeatureValue};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// JSON body layout sent to the predictor
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayloadFormat {
    /// `{"Nitrogen": 90, ..., "Rainfall": 202.9}`
    #[default]
    Named,
    /// `{"features": [90, ..., 202.9]}`
    Array,
}

impl PayloadFormat {
    /// Build the request body for a record
    pub fn build(&self, record: &FeatureRecord) -> Value {
        match self {
            PayloadFormat::Named => Value::Object(build_payload(record)),
            PayloadFormat::Array => build_array_payload(record),
        }
    }
}

fn to_json(value: FeatureValue) -> Value {
    match value {
        FeatureValue::Int(v) => json!(v),
        FeatureValue::Float(v) => json!(v),
    }
}

/// Flat field name to value mapping, in canonical order
pub fn build_payload(record: &FeatureRecord) -> Map<String, Value> {
    Feature::ALL
        .into_iter()
        .map(|f| (f.name().to_string(), to_json(record.get(f))))
        .collect()
}

/// Ordered feature array wrapped in a `features` object
pub fn build_array_payload(record: &FeatureRecord) -> Value {
    let features: Vec<Value> = record.values().into_iter().map(to_json).collect();
    json!({ "features": features })
}
