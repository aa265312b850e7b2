//! Crop Advisor
//!
//! Collects soil and weather parameters, validates them, and asks the
//! remote crop predictor what to plant.

use std::str::FromStr;
use thiserror::Error;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

pub mod images;
pub mod reporter;
pub mod runner;
pub mod sample;
pub mod settings;

pub use images::{find_crop_image, ImageLookup};
pub use reporter::{ConsoleReporter, Reporter};
pub use runner::{Advisor, BatchSummary, RunOutcome};
pub use settings::Settings;

/// Logging setup errors
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Unknown log level: {0}")]
    InvalidLevel(String),
    #[error("Failed to set tracing subscriber: {0}")]
    Subscriber(String),
}

/// Initialize logging
///
/// Logs go to stderr so stdout carries only the report.
pub fn init_logging(log: &settings::LogSettings) -> Result<(), LoggingError> {
    let level =
        Level::from_str(&log.level).map_err(|_| LoggingError::InvalidLevel(log.level.clone()))?;

    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr);

    let result = if log.json {
        tracing::subscriber::set_global_default(builder.json().finish())
    } else {
        tracing::subscriber::set_global_default(builder.finish())
    };
    result.map_err(|e| LoggingError::Subscriber(e.to_string()))
}
