//! End-to-end runs against an in-process predictor

use axum::{http::StatusCode, response::IntoResponse, routing::post, Json, Router};
use crop_advisor::settings::{CsvSettings, ImageSettings};
use crop_advisor::{Advisor, ConsoleReporter, RunOutcome, Settings};
use feature_validator::HeaderMode;
use predictor_client::PredictorConfig;
use serde_json::{json, Value};

/// Labels rows by nitrogen; rejects potassium above 100
async fn predict(Json(body): Json<Value>) -> impl IntoResponse {
    if body["Potassium"].as_i64().unwrap_or(0) > 100 {
        return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({}))).into_response();
    }
    let label = if body["Nitrogen"].as_i64().unwrap_or(0) >= 80 {
        "rice"
    } else {
        "kidney beans"
    };
    Json(json!({ "prediction": label })).into_response()
}

async fn settings(images: ImageSettings) -> Settings {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, Router::new().route("/predict", post(predict)))
            .await
            .unwrap();
    });

    Settings {
        predictor: PredictorConfig {
            endpoint: format!("http://{}/predict", addr),
            timeout_secs: Some(5),
            ..PredictorConfig::default()
        },
        images,
        csv: CsvSettings {
            header: HeaderMode::Auto,
        },
        ..Settings::default()
    }
}

#[tokio::test]
async fn test_batch_over_http() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("rice.jpg"), b"").unwrap();
    let settings = settings(ImageSettings {
        dir: dir.path().to_path_buf(),
        in_batch: true,
    })
    .await;

    let advisor = Advisor::from_settings(&settings).unwrap();
    let mut reporter = ConsoleReporter::new(Vec::new());
    let csv = "Nitrogen,Phosphorus,Potassium,Temperature,Humidity,pH_Value,Rainfall\n\
               90,42,43,20.8,82.0,6.5,202.9\n\
               20,60,150,20.0,21.0,5.7,105.9\n\
               13,60,25,17.1,20.5,5.6,128.2\n";

    let outcome = advisor.predict_batch(csv.as_bytes(), &mut reporter).await;

    match outcome {
        RunOutcome::Finished(summary) => {
            assert_eq!(summary.rows, 3);
            assert_eq!(summary.succeeded, 2);
            assert_eq!(summary.failed, 1);
        }
        RunOutcome::Rejected => panic!("batch should not be rejected"),
    }

    let text = String::from_utf8(reporter.into_inner()).unwrap();
    assert!(text.contains("For field 1\nOne should grow: rice\n"));
    assert!(text.contains(&format!("Image: {}", dir.path().join("rice.jpg").display())));
    assert!(text.contains("error: Failed to get prediction for row 2 (Predictor returned HTTP 500)"));
    assert!(text.contains("For field 3\nOne should grow: kidney beans\n"));
    assert!(text.contains("warning: No image found for kidney"));
    assert!(text.ends_with("3 rows: 2 predicted, 1 failed\n"));
}

#[tokio::test]
async fn test_single_prediction_over_http() {
    let dir = tempfile::tempdir().unwrap();
    let settings = settings(ImageSettings {
        dir: dir.path().to_path_buf(),
        in_batch: false,
    })
    .await;

    let advisor = Advisor::from_settings(&settings).unwrap();
    let mut reporter = ConsoleReporter::new(Vec::new());
    let raw = feature_validator::RawRecord::from_named([
        ("Nitrogen", 90.0),
        ("Phosphorus", 42.0),
        ("Potassium", 43.0),
        ("Temperature", 20.8),
        ("Humidity", 82.0),
        ("pH_Value", 6.5),
        ("Rainfall", 202.9),
    ])
    .unwrap();

    let outcome = advisor.predict_one(&raw, &mut reporter).await;

    assert!(matches!(outcome, RunOutcome::Finished(ref s) if s.succeeded == 1));
    assert_eq!(
        String::from_utf8(reporter.into_inner()).unwrap(),
        "The crop one should grow here is: rice\nwarning: No image found for rice\n"
    );
}
