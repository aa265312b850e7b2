//! Crop Advisor - Main Entry Point

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use crop_advisor::sample::write_sample;
use crop_advisor::{init_logging, Advisor, ConsoleReporter, RunOutcome, Settings};
use feature_validator::{Feature, HeaderMode, PayloadFormat, RawRecord};
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;

/// Crop prediction from soil and weather parameters.
#[derive(Parser, Debug)]
#[command(name = "crop-advisor", version, about)]
struct Cli {
    /// Path to config file (default: ./crop-advisor.toml if present).
    #[arg(long = "config", global = true)]
    config: Option<PathBuf>,

    /// Predictor endpoint URL.
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// Request body layout.
    #[arg(long, global = true, value_enum)]
    payload: Option<PayloadArg>,

    /// Log level: error, warn, info, debug, trace.
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Predict the crop for one set of parameters.
    Predict {
        /// Nitrogen content of the soil (0-140).
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        nitrogen: i64,
        /// Phosphorus content of the soil (5-145).
        #[arg(long, default_value_t = 5, allow_negative_numbers = true)]
        phosphorus: i64,
        /// Potassium content of the soil (5-205).
        #[arg(long, default_value_t = 5, allow_negative_numbers = true)]
        potassium: i64,
        /// Temperature in °C (9-43).
        #[arg(long, default_value_t = 9.0, allow_negative_numbers = true)]
        temperature: f64,
        /// Relative humidity in % (15-99).
        #[arg(long, default_value_t = 15.0, allow_negative_numbers = true)]
        humidity: f64,
        /// Soil pH (4-9).
        #[arg(long = "ph", default_value_t = 4.0, allow_negative_numbers = true)]
        ph_value: f64,
        /// Rainfall in mm (21-298).
        #[arg(long, default_value_t = 21.0, allow_negative_numbers = true)]
        rainfall: f64,
    },

    /// Predict crops for every row of a 7-column CSV file.
    Batch {
        /// CSV file to upload.
        file: PathBuf,
        /// Whether the first row is a header.
        #[arg(long, value_enum)]
        header: Option<HeaderArg>,
        /// Look up crop images for each row.
        #[arg(long)]
        images: bool,
    },

    /// Write a sample CSV showing the batch format.
    Sample {
        #[arg(default_value = "sample.csv")]
        output: PathBuf,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum PayloadArg {
    Named,
    Array,
}

impl From<PayloadArg> for PayloadFormat {
    fn from(arg: PayloadArg) -> Self {
        match arg {
            PayloadArg::Named => PayloadFormat::Named,
            PayloadArg::Array => PayloadFormat::Array,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum HeaderArg {
    Auto,
    Present,
    Absent,
}

impl From<HeaderArg> for HeaderMode {
    fn from(arg: HeaderArg) -> Self {
        match arg {
            HeaderArg::Auto => HeaderMode::Auto,
            HeaderArg::Present => HeaderMode::Present,
            HeaderArg::Absent => HeaderMode::Absent,
        }
    }
}

fn exit_code(outcome: &RunOutcome) -> ExitCode {
    match outcome {
        RunOutcome::Rejected => ExitCode::from(2),
        RunOutcome::Finished(summary) if summary.failed > 0 => ExitCode::from(1),
        RunOutcome::Finished(_) => ExitCode::SUCCESS,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let mut settings =
        Settings::load(cli.config.as_deref()).context("failed to load configuration")?;
    if let Some(endpoint) = cli.endpoint {
        settings.predictor.endpoint = endpoint;
    }
    if let Some(payload) = cli.payload {
        settings.predictor.payload_format = payload.into();
    }
    if let Some(level) = cli.log_level {
        settings.log.level = level;
    }
    init_logging(&settings.log)?;

    info!("=== Crop Advisor v{} ===", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Predict {
            nitrogen,
            phosphorus,
            potassium,
            temperature,
            humidity,
            ph_value,
            rainfall,
        } => {
            let raw = RawRecord::new()
                .with(Feature::Nitrogen, nitrogen as f64)
                .with(Feature::Phosphorus, phosphorus as f64)
                .with(Feature::Potassium, potassium as f64)
                .with(Feature::Temperature, temperature)
                .with(Feature::Humidity, humidity)
                .with(Feature::PhValue, ph_value)
                .with(Feature::Rainfall, rainfall);

            let advisor = Advisor::from_settings(&settings)?;
            let outcome = advisor
                .predict_one(&raw, &mut ConsoleReporter::stdout())
                .await;
            Ok(exit_code(&outcome))
        }
        Commands::Batch {
            file,
            header,
            images,
        } => {
            if let Some(header) = header {
                settings.csv.header = header.into();
            }
            settings.images.in_batch |= images;

            let input = File::open(&file)
                .with_context(|| format!("failed to open {}", file.display()))?;
            let advisor = Advisor::from_settings(&settings)?;
            let outcome = advisor
                .predict_batch(BufReader::new(input), &mut ConsoleReporter::stdout())
                .await;
            Ok(exit_code(&outcome))
        }
        Commands::Sample { output } => {
            write_sample(&output)
                .with_context(|| format!("failed to write {}", output.display()))?;
            println!("Sample CSV written to {}", output.display());
            Ok(ExitCode::SUCCESS)
        }
    }
}
