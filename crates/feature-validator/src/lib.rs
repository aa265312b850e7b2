//! Crop Feature Validation
//!
//! Provides range checking, CSV batch coercion, and request payload
//! building for the seven agronomic features sent to the crop predictor.

mod batch;
mod error;
mod payload;
mod record;
mod validator;

pub use batch::{coerce_batch, read_table, HeaderMode, RawTable};
pub use error::{BatchError, RowValidationError, SchemaError, TypeCoercionError, ValidationError};
pub use payload::{build_array_payload, build_payload, PayloadFormat};
pub use record::{
    Feature, FeatureBatch, FeatureKind, FeatureRecord, FeatureValue, RawRecord, FEATURE_COUNT,
};
pub use validator::{FeatureRange, ValidationConfig, Validator};
