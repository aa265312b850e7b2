//! Crop Predictor Client
//!
//! HTTP client for the remote crop prediction service:
//! - Named or array JSON payloads
//! - One request per record, no retries
//! - Per-call status, transport, and decode failures

use feature_validator::{FeatureRecord, PayloadFormat};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Hosted prediction endpoint
pub const DEFAULT_ENDPOINT: &str = "https://crop-class.onrender.com/predict";

/// Label used when a successful response carries no `prediction` key
pub const MISSING_PREDICTION: &str = "No prediction found";

/// Remote call error types
#[derive(Error, Debug)]
pub enum RemoteCallError {
    #[error("Predictor returned HTTP {status}")]
    Status { status: u16, body: String },

    #[error("Transport failure: {0}")]
    Transport(String),

    #[error("Could not decode predictor response: {0}")]
    Decode(String),
}

/// Predictor client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictorConfig {
    /// Full URL of the predict endpoint
    pub endpoint: String,
    /// Request body layout
    pub payload_format: PayloadFormat,
    /// Per-request timeout; none by default
    pub timeout_secs: Option<u64>,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            payload_format: PayloadFormat::Named,
            timeout_secs: None,
        }
    }
}

/// Crop label returned by the predictor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prediction {
    pub label: String,
}

impl Prediction {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }

    /// First whitespace-delimited token of the label
    pub fn crop(&self) -> Option<&str> {
        self.label.split_whitespace().next()
    }
}

/// Something that can turn a feature record into a crop prediction
pub trait Predictor {
    fn predict(
        &self,
        record: &FeatureRecord,
    ) -> impl Future<Output = Result<Prediction, RemoteCallError>> + Send;
}

/// Predictor backed by the remote HTTP service
pub struct HttpPredictor {
    config: PredictorConfig,
    client: reqwest::Client,
}

impl HttpPredictor {
    /// Create a new HTTP predictor
    pub fn new(config: PredictorConfig) -> Result<Self, RemoteCallError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| RemoteCallError::Transport(e.to_string()))?;

        info!(
            "Predictor endpoint: {} ({:?} payload)",
            config.endpoint, config.payload_format
        );
        Ok(Self { config, client })
    }
}

impl Predictor for HttpPredictor {
    async fn predict(&self, record: &FeatureRecord) -> Result<Prediction, RemoteCallError> {
        let body = self.config.payload_format.build(record);
        debug!("POST {} {}", self.config.endpoint, body);

        let response = self
            .client
            .post(&self.config.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| RemoteCallError::Transport(e.to_string()))?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            warn!("Predictor returned {}", status);
            return Err(RemoteCallError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| RemoteCallError::Decode(e.to_string()))?;
        parse_prediction(&payload)
    }
}

fn parse_prediction(payload: &Value) -> Result<Prediction, RemoteCallError> {
    let object = payload
        .as_object()
        .ok_or_else(|| RemoteCallError::Decode(format!("expected a JSON object, got {}", payload)))?;

    let label = match object.get("prediction") {
        None | Some(Value::Null) => MISSING_PREDICTION.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    };
    Ok(Prediction { label })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::post, Json, Router};
    use serde_json::json;

    fn record() -> FeatureRecord {
        FeatureRecord {
            nitrogen: 90,
            phosphorus: 42,
            potassium: 43,
            temperature: 20.8,
            humidity: 82.0,
            ph_value: 6.5,
            rainfall: 202.9,
        }
    }

    async fn spawn_predictor(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/predict", addr)
    }

    fn predictor(endpoint: String, payload_format: PayloadFormat) -> HttpPredictor {
        HttpPredictor::new(PredictorConfig {
            endpoint,
            payload_format,
            timeout_secs: Some(5),
        })
        .unwrap()
    }

    #[test]
    fn test_crop_is_first_token() {
        assert_eq!(Prediction::new("kidney beans").crop(), Some("kidney"));
        assert_eq!(Prediction::new("  rice ").crop(), Some("rice"));
        assert_eq!(Prediction::new("").crop(), None);
    }

    #[test]
    fn test_parse_prediction_variants() {
        assert_eq!(
            parse_prediction(&json!({"prediction": "rice"})).unwrap().label,
            "rice"
        );
        assert_eq!(
            parse_prediction(&json!({})).unwrap().label,
            MISSING_PREDICTION
        );
        assert!(matches!(
            parse_prediction(&json!(["rice"])),
            Err(RemoteCallError::Decode(_))
        ));
    }

    #[tokio::test]
    async fn test_named_payload_prediction() {
        let app = Router::new().route(
            "/predict",
            post(|Json(body): Json<Value>| async move {
                let crop = if body["Nitrogen"] == json!(90) && body["pH_Value"] == json!(6.5) {
                    "rice"
                } else {
                    "unknown"
                };
                Json(json!({ "prediction": crop }))
            }),
        );
        let endpoint = spawn_predictor(app).await;

        let prediction = predictor(endpoint, PayloadFormat::Named)
            .predict(&record())
            .await
            .unwrap();
        assert_eq!(prediction.label, "rice");
    }

    #[tokio::test]
    async fn test_array_payload_prediction() {
        let app = Router::new().route(
            "/predict",
            post(|Json(body): Json<Value>| async move {
                let count = body["features"].as_array().map_or(0, Vec::len);
                Json(json!({ "prediction": format!("{} features", count) }))
            }),
        );
        let endpoint = spawn_predictor(app).await;

        let prediction = predictor(endpoint, PayloadFormat::Array)
            .predict(&record())
            .await
            .unwrap();
        assert_eq!(prediction.label, "7 features");
    }

    #[tokio::test]
    async fn test_missing_prediction_key() {
        let app = Router::new().route("/predict", post(|| async { Json(json!({ "ok": true })) }));
        let endpoint = spawn_predictor(app).await;

        let prediction = predictor(endpoint, PayloadFormat::Named)
            .predict(&record())
            .await
            .unwrap();
        assert_eq!(prediction.label, MISSING_PREDICTION);
    }

    #[tokio::test]
    async fn test_non_200_is_status_error() {
        let app = Router::new().route(
            "/predict",
            post(|| async { (StatusCode::SERVICE_UNAVAILABLE, "warming up") }),
        );
        let endpoint = spawn_predictor(app).await;

        let err = predictor(endpoint, PayloadFormat::Named)
            .predict(&record())
            .await
            .unwrap_err();
        match err {
            RemoteCallError::Status { status, body } => {
                assert_eq!(status, 503);
                assert_eq!(body, "warming up");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_invalid_json_is_decode_error() {
        let app = Router::new().route("/predict", post(|| async { "rice" }));
        let endpoint = spawn_predictor(app).await;

        let err = predictor(endpoint, PayloadFormat::Named)
            .predict(&record())
            .await
            .unwrap_err();
        assert!(matches!(err, RemoteCallError::Decode(_)));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_transport_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = predictor(format!("http://{}/predict", addr), PayloadFormat::Named)
            .predict(&record())
            .await
            .unwrap_err();
        assert!(matches!(err, RemoteCallError::Transport(_)));
    }
}
