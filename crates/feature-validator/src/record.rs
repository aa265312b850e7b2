//! Feature Record Types

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Number of features the predictor expects
pub const FEATURE_COUNT: usize = 7;

/// Agronomic input feature, declared in canonical column order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Feature {
    Nitrogen,
    Phosphorus,
    Potassium,
    Temperature,
    Humidity,
    #[serde(rename = "pH_Value")]
    PhValue,
    Rainfall,
}

/// Storage type of a feature column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureKind {
    Integer,
    Float,
}

impl Feature {
    /// All features in canonical column order
    pub const ALL: [Feature; FEATURE_COUNT] = [
        Feature::Nitrogen,
        Feature::Phosphorus,
        Feature::Potassium,
        Feature::Temperature,
        Feature::Humidity,
        Feature::PhValue,
        Feature::Rainfall,
    ];

    /// Canonical column / JSON key name
    pub fn name(&self) -> &'static str {
        match self {
            Feature::Nitrogen => "Nitrogen",
            Feature::Phosphorus => "Phosphorus",
            Feature::Potassium => "Potassium",
            Feature::Temperature => "Temperature",
            Feature::Humidity => "Humidity",
            Feature::PhValue => "pH_Value",
            Feature::Rainfall => "Rainfall",
        }
    }

    /// Soil nutrients are whole numbers, weather readings are decimals
    pub fn kind(&self) -> FeatureKind {
        match self {
            Feature::Nitrogen | Feature::Phosphorus | Feature::Potassium => FeatureKind::Integer,
            _ => FeatureKind::Float,
        }
    }

    /// Position in canonical column order
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Feature {
    type Err = ValidationError;

    /// Accepts canonical names case-insensitively, with spaces or underscores
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().replace(' ', "_");
        Feature::ALL
            .into_iter()
            .find(|f| f.name().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| ValidationError::UnknownField(s.to_string()))
    }
}

/// Numeric value of a single feature
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FeatureValue {
    Int(i64),
    Float(f64),
}

impl FeatureValue {
    /// Value widened to f64 for range comparisons
    pub fn as_f64(&self) -> f64 {
        match *self {
            FeatureValue::Int(v) => v as f64,
            FeatureValue::Float(v) => v,
        }
    }
}

impl fmt::Display for FeatureValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureValue::Int(v) => write!(f, "{}", v),
            FeatureValue::Float(v) => write!(f, "{}", v),
        }
    }
}

/// One candidate planting scenario
///
/// Serializes with the canonical field names expected by the predictor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureRecord {
    #[serde(rename = "Nitrogen")]
    pub nitrogen: i64,
    #[serde(rename = "Phosphorus")]
    pub phosphorus: i64,
    #[serde(rename = "Potassium")]
    pub potassium: i64,
    #[serde(rename = "Temperature")]
    pub temperature: f64,
    #[serde(rename = "Humidity")]
    pub humidity: f64,
    #[serde(rename = "pH_Value")]
    pub ph_value: f64,
    #[serde(rename = "Rainfall")]
    pub rainfall: f64,
}

impl FeatureRecord {
    /// Get the value of one feature
    pub fn get(&self, feature: Feature) -> FeatureValue {
        match feature {
            Feature::Nitrogen => FeatureValue::Int(self.nitrogen),
            Feature::Phosphorus => FeatureValue::Int(self.phosphorus),
            Feature::Potassium => FeatureValue::Int(self.potassium),
            Feature::Temperature => FeatureValue::Float(self.temperature),
            Feature::Humidity => FeatureValue::Float(self.humidity),
            Feature::PhValue => FeatureValue::Float(self.ph_value),
            Feature::Rainfall => FeatureValue::Float(self.rainfall),
        }
    }

    /// All values in canonical column order
    pub fn values(&self) -> [FeatureValue; FEATURE_COUNT] {
        Feature::ALL.map(|f| self.get(f))
    }

    /// Convert back into a name/value mapping for validation
    pub fn to_raw(&self) -> RawRecord {
        Feature::ALL
            .into_iter()
            .fold(RawRecord::new(), |raw, f| raw.with(f, self.get(f).as_f64()))
    }
}

/// Ordered batch of feature records, one per table row
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureBatch {
    records: Vec<FeatureRecord>,
}

impl FeatureBatch {
    /// Create a batch from records in row order
    pub fn new(records: Vec<FeatureRecord>) -> Self {
        Self { records }
    }

    /// Records in row order
    pub fn records(&self) -> &[FeatureRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate records with their 1-based row numbers
    pub fn rows(&self) -> impl Iterator<Item = (usize, &FeatureRecord)> {
        self.records.iter().enumerate().map(|(i, r)| (i + 1, r))
    }
}

/// Unvalidated field name to value mapping
///
/// Values are already numeric; integer fields are checked for whole
/// numbers during validation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecord {
    fields: BTreeMap<Feature, f64>,
}

impl RawRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, feature: Feature, value: f64) -> Self {
        self.fields.insert(feature, value);
        self
    }

    /// Insert or replace a value
    pub fn insert(&mut self, feature: Feature, value: f64) {
        self.fields.insert(feature, value);
    }

    /// Get a value if present
    pub fn get(&self, feature: Feature) -> Option<f64> {
        self.fields.get(&feature).copied()
    }

    /// Build from `(name, value)` pairs, rejecting unknown names
    pub fn from_named<'a, I>(pairs: I) -> Result<Self, Vec<ValidationError>>
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        let mut raw = RawRecord::new();
        let mut errors = Vec::new();
        for (name, value) in pairs {
            match name.parse::<Feature>() {
                Ok(feature) => raw.insert(feature, value),
                Err(e) => errors.push(e),
            }
        }
        if errors.is_empty() {
            Ok(raw)
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_order_and_kind() {
        let names: Vec<_> = Feature::ALL.iter().map(|f| f.name()).collect();
        assert_eq!(
            names,
            [
                "Nitrogen",
                "Phosphorus",
                "Potassium",
                "Temperature",
                "Humidity",
                "pH_Value",
                "Rainfall"
            ]
        );
        assert_eq!(Feature::Potassium.kind(), FeatureKind::Integer);
        assert_eq!(Feature::Temperature.kind(), FeatureKind::Float);
        assert_eq!(Feature::Rainfall.index(), 6);
    }

    #[test]
    fn test_feature_from_str() {
        assert_eq!("pH_Value".parse::<Feature>().unwrap(), Feature::PhValue);
        assert_eq!("ph value".parse::<Feature>().unwrap(), Feature::PhValue);
        assert_eq!("NITROGEN".parse::<Feature>().unwrap(), Feature::Nitrogen);
        assert!("Sunlight".parse::<Feature>().is_err());
    }

    #[test]
    fn test_raw_record_from_named_rejects_unknown() {
        let errors = RawRecord::from_named([("Nitrogen", 10.0), ("Zinc", 1.0)]).unwrap_err();
        assert_eq!(errors, vec![ValidationError::UnknownField("Zinc".to_string())]);
    }

    #[test]
    fn test_record_values_in_canonical_order() {
        let record = FeatureRecord {
            nitrogen: 90,
            phosphorus: 42,
            potassium: 43,
            temperature: 20.8,
            humidity: 82.0,
            ph_value: 6.5,
            rainfall: 202.9,
        };
        let values = record.values();
        assert_eq!(values[0], FeatureValue::Int(90));
        assert_eq!(values[5], FeatureValue::Float(6.5));
        assert_eq!(record.to_raw().get(Feature::Rainfall), Some(202.9));
    }
}
