//! Prediction Runner
//!
//! Validates input, then queries the predictor one record at a time.

use crate::images::find_crop_image;
use crate::reporter::Reporter;
use crate::settings::{ImageSettings, Settings};
use chrono::{DateTime, Utc};
use feature_validator::{
    coerce_batch, read_table, BatchError, FeatureRecord, HeaderMode, RawRecord, Validator,
};
use predictor_client::{HttpPredictor, Predictor, RemoteCallError};
use serde::Serialize;
use std::io::Read;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Counts from one run
#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub rows: usize,
    pub succeeded: usize,
    pub failed: usize,
}

/// How a run ended
#[derive(Debug, Clone)]
pub enum RunOutcome {
    /// Input was invalid; no remote call was made
    Rejected,
    /// Every record was sent; some calls may have failed
    Finished(BatchSummary),
}

/// Validates input and drives the predictor
pub struct Advisor<P: Predictor> {
    predictor: P,
    validator: Validator,
    images: ImageSettings,
    header: HeaderMode,
}

impl Advisor<HttpPredictor> {
    /// Build an advisor talking to the configured HTTP predictor
    pub fn from_settings(settings: &Settings) -> Result<Self, RemoteCallError> {
        let predictor = HttpPredictor::new(settings.predictor.clone())?;
        Ok(Self::new(
            predictor,
            settings.images.clone(),
            settings.csv.header,
        ))
    }
}

impl<P: Predictor> Advisor<P> {
    pub fn new(predictor: P, images: ImageSettings, header: HeaderMode) -> Self {
        Self {
            predictor,
            validator: Validator::default(),
            images,
            header,
        }
    }

    /// Validate one record and request a single prediction
    pub async fn predict_one<R: Reporter>(&self, raw: &RawRecord, reporter: &mut R) -> RunOutcome {
        let record = match self.validator.validate_record(raw) {
            Ok(record) => record,
            Err(errors) => {
                reporter.record_rejected(&errors);
                return RunOutcome::Rejected;
            }
        };

        let mut run = Run::start(1);
        if self.request(None, &record, true, reporter).await {
            run.succeeded += 1;
        } else {
            run.failed += 1;
        }
        RunOutcome::Finished(run.finish())
    }

    /// Read, coerce, and validate a CSV batch, then predict row by row
    ///
    /// Any schema, coercion, or validation error rejects the whole batch
    /// before the first request. A failed request only affects its row.
    pub async fn predict_batch<Rd: Read, R: Reporter>(
        &self,
        input: Rd,
        reporter: &mut R,
    ) -> RunOutcome {
        let table = match read_table(input, self.header) {
            Ok(table) => table,
            Err(e) => {
                reporter.batch_rejected(&BatchError::Schema(e));
                return RunOutcome::Rejected;
            }
        };
        reporter.preview(&table);

        let batch = match coerce_batch(&table) {
            Ok(batch) => batch,
            Err(e) => {
                warn!("Batch rejected: {}", e);
                reporter.batch_rejected(&e);
                return RunOutcome::Rejected;
            }
        };

        let errors = self.validator.validate_batch(&batch);
        if !errors.is_empty() {
            warn!("Batch rejected with {} validation errors", errors.len());
            reporter.rows_rejected(&errors);
            return RunOutcome::Rejected;
        }

        let mut run = Run::start(batch.len());
        info!("Run {}: predicting {} rows", run.id, batch.len());
        for (row, record) in batch.rows() {
            if self
                .request(Some(row), record, self.images.in_batch, reporter)
                .await
            {
                run.succeeded += 1;
            } else {
                run.failed += 1;
            }
        }

        let summary = run.finish();
        reporter.summary(&summary);
        RunOutcome::Finished(summary)
    }

    async fn request<R: Reporter>(
        &self,
        row: Option<usize>,
        record: &FeatureRecord,
        with_image: bool,
        reporter: &mut R,
    ) -> bool {
        match self.predictor.predict(record).await {
            Ok(prediction) => {
                metrics::counter!("crop_advisor_predictions_total").increment(1);
                debug!("Row {:?} predicted: {}", row, prediction.label);
                reporter.predicted(row, &prediction);
                if with_image {
                    reporter.image(&find_crop_image(&self.images.dir, &prediction));
                }
                true
            }
            Err(e) => {
                metrics::counter!("crop_advisor_prediction_failures_total").increment(1);
                warn!("Row {:?} prediction failed: {}", row, e);
                reporter.prediction_failed(row, &e);
                false
            }
        }
    }
}

struct Run {
    id: Uuid,
    started_at: DateTime<Utc>,
    rows: usize,
    succeeded: usize,
    failed: usize,
}

impl Run {
    fn start(rows: usize) -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            rows,
            succeeded: 0,
            failed: 0,
        }
    }

    fn finish(self) -> BatchSummary {
        let summary = BatchSummary {
            run_id: self.id,
            started_at: self.started_at,
            finished_at: Utc::now(),
            rows: self.rows,
            succeeded: self.succeeded,
            failed: self.failed,
        };
        match serde_json::to_string(&summary) {
            Ok(json) => info!("Run finished: {}", json),
            Err(e) => warn!("Failed to serialize run summary: {}", e),
        }
        summary
    }
}
