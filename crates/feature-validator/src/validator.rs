//! Feature Validator for Range Checking

use crate::error::{RowValidationError, ValidationError};
use crate::record::{Feature, FeatureBatch, FeatureKind, FeatureRecord, RawRecord};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Inclusive value range
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureRange {
    pub min: f64,
    pub max: f64,
}

impl FeatureRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// NaN is never contained
    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }
}

/// Validation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Nitrogen valid range (kg/ha)
    pub nitrogen_range: FeatureRange,
    /// Phosphorus valid range (kg/ha)
    pub phosphorus_range: FeatureRange,
    /// Potassium valid range (kg/ha)
    pub potassium_range: FeatureRange,
    /// Temperature valid range (°C)
    pub temperature_range: FeatureRange,
    /// Relative humidity valid range (%)
    pub humidity_range: FeatureRange,
    /// Soil pH valid range
    pub ph_range: FeatureRange,
    /// Rainfall valid range (mm)
    pub rainfall_range: FeatureRange,
}

impl ValidationConfig {
    /// Range configured for a feature
    pub fn range(&self, feature: Feature) -> FeatureRange {
        match feature {
            Feature::Nitrogen => self.nitrogen_range,
            Feature::Phosphorus => self.phosphorus_range,
            Feature::Potassium => self.potassium_range,
            Feature::Temperature => self.temperature_range,
            Feature::Humidity => self.humidity_range,
            Feature::PhValue => self.ph_range,
            Feature::Rainfall => self.rainfall_range,
        }
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            nitrogen_range: FeatureRange::new(0.0, 140.0),
            phosphorus_range: FeatureRange::new(5.0, 145.0),
            potassium_range: FeatureRange::new(5.0, 205.0),
            temperature_range: FeatureRange::new(9.0, 43.0),
            humidity_range: FeatureRange::new(15.0, 99.0),
            ph_range: FeatureRange::new(4.0, 9.0),
            rainfall_range: FeatureRange::new(21.0, 298.0),
        }
    }
}

/// Validator for crop feature records
pub struct Validator {
    config: ValidationConfig,
}

impl Validator {
    /// Create a new validator with given config
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Validate a single value against its feature's range
    pub fn validate_range(&self, field: Feature, value: f64) -> Result<(), ValidationError> {
        let range = self.config.range(field);
        if range.contains(value) {
            Ok(())
        } else {
            Err(ValidationError::OutOfRange {
                field,
                value,
                min: range.min,
                max: range.max,
            })
        }
    }

    /// Validate all seven fields of a record
    ///
    /// Every problem is collected; validation never stops at the first
    /// failing field.
    pub fn validate_record(&self, raw: &RawRecord) -> Result<FeatureRecord, Vec<ValidationError>> {
        let mut errors = Vec::new();

        for field in Feature::ALL {
            let Some(value) = raw.get(field) else {
                errors.push(ValidationError::MissingField(field));
                continue;
            };
            // At most one error per field; range takes precedence
            if let Err(e) = self.validate_range(field, value) {
                errors.push(e);
            } else if field.kind() == FeatureKind::Integer && value.fract() != 0.0 {
                errors.push(ValidationError::NotWholeNumber { field, value });
            }
        }

        if !errors.is_empty() {
            debug!("Record rejected with {} validation errors", errors.len());
            return Err(errors);
        }

        // All fields are present, in range, and whole where required
        let get = |f: Feature| raw.get(f).unwrap_or_default();
        Ok(FeatureRecord {
            nitrogen: get(Feature::Nitrogen) as i64,
            phosphorus: get(Feature::Phosphorus) as i64,
            potassium: get(Feature::Potassium) as i64,
            temperature: get(Feature::Temperature),
            humidity: get(Feature::Humidity),
            ph_value: get(Feature::PhValue),
            rainfall: get(Feature::Rainfall),
        })
    }

    /// Validate every row of a batch, reporting errors in row order
    pub fn validate_batch(&self, batch: &FeatureBatch) -> Vec<RowValidationError> {
        batch
            .rows()
            .flat_map(|(row, record)| {
                self.validate_record(&record.to_raw())
                    .err()
                    .unwrap_or_default()
                    .into_iter()
                    .map(move |error| RowValidationError { row, error })
            })
            .collect()
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(ValidationConfig::default())
    }
}
