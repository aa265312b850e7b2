//! Result Reporting
//!
//! The runner never prints; it hands every outcome to a [`Reporter`].

use crate::images::ImageLookup;
use crate::runner::BatchSummary;
use feature_validator::{BatchError, Feature, RawTable, RowValidationError, ValidationError};
use predictor_client::{Prediction, RemoteCallError};
use std::io::Write;
use tracing::warn;

/// Presentation capability held by the caller of the runner
///
/// `row` is the 1-based batch row, or `None` for a single prediction.
pub trait Reporter {
    /// Show an uploaded table before it is processed
    fn preview(&mut self, table: &RawTable);

    /// A single record failed validation
    fn record_rejected(&mut self, errors: &[ValidationError]);

    /// A batch could not be read or coerced
    fn batch_rejected(&mut self, error: &BatchError);

    /// One or more batch rows failed validation
    fn rows_rejected(&mut self, errors: &[RowValidationError]);

    fn predicted(&mut self, row: Option<usize>, prediction: &Prediction);

    fn image(&mut self, lookup: &ImageLookup);

    fn prediction_failed(&mut self, row: Option<usize>, error: &RemoteCallError);

    fn summary(&mut self, summary: &BatchSummary);
}

/// Plain-text reporter for a terminal
pub struct ConsoleReporter<W: Write> {
    out: W,
}

impl ConsoleReporter<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, text: impl AsRef<str>) {
        if let Err(e) = writeln!(self.out, "{}", text.as_ref()) {
            warn!("Failed to write report: {}", e);
        }
    }
}

impl<W: Write> Reporter for ConsoleReporter<W> {
    fn preview(&mut self, table: &RawTable) {
        self.line("Uploaded CSV data:");
        let header = match &table.header {
            Some(header) => header.join(" | "),
            None => Feature::ALL.map(|f| f.name()).join(" | "),
        };
        self.line(format!("    | {}", header));
        for (i, row) in table.rows.iter().enumerate() {
            self.line(format!("{:>3} | {}", i + 1, row.join(" | ")));
        }
    }

    fn record_rejected(&mut self, errors: &[ValidationError]) {
        self.line("error: Invalid input:");
        for error in errors {
            self.line(format!("error: {}", error));
        }
    }

    fn batch_rejected(&mut self, error: &BatchError) {
        self.line(format!("error: {}", error));
    }

    fn rows_rejected(&mut self, errors: &[RowValidationError]) {
        self.line("error: Validation errors found in the CSV:");
        for error in errors {
            self.line(format!("error: {}.", error));
        }
    }

    fn predicted(&mut self, row: Option<usize>, prediction: &Prediction) {
        match row {
            Some(row) => {
                self.line(format!("For field {}", row));
                self.line(format!("One should grow: {}", prediction.label));
                self.line("---");
            }
            None => self.line(format!(
                "The crop one should grow here is: {}",
                prediction.label
            )),
        }
    }

    fn image(&mut self, lookup: &ImageLookup) {
        match lookup {
            ImageLookup::Found(path) => self.line(format!("Image: {}", path.display())),
            ImageLookup::Missing { crop } => {
                self.line(format!("warning: No image found for {}", crop))
            }
            ImageLookup::NoCrop => self.line("warning: Prediction has no crop name"),
        }
    }

    fn prediction_failed(&mut self, row: Option<usize>, error: &RemoteCallError) {
        match row {
            Some(row) => self.line(format!(
                "error: Failed to get prediction for row {} ({})",
                row, error
            )),
            None => self.line(format!("error: Failed to get prediction ({})", error)),
        }
    }

    fn summary(&mut self, summary: &BatchSummary) {
        self.line(format!(
            "{} rows: {} predicted, {} failed",
            summary.rows, summary.succeeded, summary.failed
        ));
    }
}
