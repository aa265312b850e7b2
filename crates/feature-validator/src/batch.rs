//! CSV Table Reading and Batch Coercion

use crate::error::{BatchError, SchemaError, TypeCoercionError};
use crate::record::{Feature, FeatureBatch, FeatureKind, FeatureRecord, FEATURE_COUNT};
use serde::{Deserialize, Serialize};
use std::io::Read;
use tracing::{debug, info};

/// Exclusive bounds of the f64 values that convert to i64 without saturating
const I64_LOWER: f64 = -9_223_372_036_854_775_808.0;
const I64_UPPER: f64 = 9_223_372_036_854_775_808.0;

/// How to treat the first CSV row
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeaderMode {
    /// Header when no cell of the first row is numeric
    #[default]
    Auto,
    /// First row is always a header
    Present,
    /// First row is always data
    Absent,
}

/// Uncoerced table of string cells
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub header: Option<Vec<String>>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Width of the table, taken from the header or the first row
    pub fn column_count(&self) -> usize {
        self.header
            .as_ref()
            .or_else(|| self.rows.first())
            .map_or(0, Vec::len)
    }
}

/// Read a CSV document into a raw table
///
/// Column names are ignored downstream; only the width matters.
pub fn read_table<R: Read>(reader: R, header_mode: HeaderMode) -> Result<RawTable, SchemaError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut records = Vec::new();
    for result in csv_reader.records() {
        let record = result?;
        // Skip blank lines
        if record.iter().all(str::is_empty) {
            continue;
        }
        records.push(record.iter().map(str::to_string).collect::<Vec<_>>());
    }

    let mut records = records.into_iter();
    let Some(first) = records.next() else {
        return Err(SchemaError::Empty);
    };

    let is_header = match header_mode {
        HeaderMode::Present => true,
        HeaderMode::Absent => false,
        HeaderMode::Auto => first.iter().all(|cell| cell.parse::<f64>().is_err()),
    };

    let (header, rows) = if is_header {
        (Some(first), records.collect())
    } else {
        (None, std::iter::once(first).chain(records).collect())
    };
    let table = RawTable { header, rows };

    let width = table.column_count();
    for (i, row) in table.rows.iter().enumerate() {
        if row.len() != width {
            return Err(SchemaError::RaggedRow {
                row: i + 1,
                expected: width,
                found: row.len(),
            });
        }
    }

    debug!(
        "Read CSV table: {} rows x {} columns (header: {})",
        table.rows.len(),
        width,
        table.header.is_some()
    );
    Ok(table)
}

/// Coerce a raw table into a feature batch
///
/// Columns are renamed positionally to the canonical feature order. The
/// first three are converted to integers and the rest to floats, one
/// column at a time; the first bad cell aborts the whole batch.
pub fn coerce_batch(table: &RawTable) -> Result<FeatureBatch, BatchError> {
    let found = table.column_count();
    if found != FEATURE_COUNT {
        return Err(SchemaError::ColumnCount {
            expected: FEATURE_COUNT,
            found,
        }
        .into());
    }
    if let Some((i, row)) = table
        .rows
        .iter()
        .enumerate()
        .find(|(_, row)| row.len() != FEATURE_COUNT)
    {
        return Err(SchemaError::RaggedRow {
            row: i + 1,
            expected: FEATURE_COUNT,
            found: row.len(),
        }
        .into());
    }

    let mut columns: Vec<Vec<f64>> = Vec::with_capacity(FEATURE_COUNT);
    for feature in Feature::ALL {
        let column = table
            .rows
            .iter()
            .enumerate()
            .map(|(i, row)| coerce_cell(feature, i + 1, &row[feature.index()]))
            .collect::<Result<Vec<_>, _>>()?;
        columns.push(column);
    }

    let records = (0..table.rows.len())
        .map(|i| {
            let value = |f: Feature| columns[f.index()][i];
            FeatureRecord {
                nitrogen: value(Feature::Nitrogen) as i64,
                phosphorus: value(Feature::Phosphorus) as i64,
                potassium: value(Feature::Potassium) as i64,
                temperature: value(Feature::Temperature),
                humidity: value(Feature::Humidity),
                ph_value: value(Feature::PhValue),
                rainfall: value(Feature::Rainfall),
            }
        })
        .collect();

    info!("Coerced {} rows into feature records", table.rows.len());
    Ok(FeatureBatch::new(records))
}

fn coerce_cell(column: Feature, row: usize, cell: &str) -> Result<f64, TypeCoercionError> {
    let fail = |cause: String| TypeCoercionError {
        column,
        row,
        value: cell.to_string(),
        cause,
    };

    let text = cell.trim();
    if text.is_empty() {
        return Err(fail("empty cell".to_string()));
    }

    match column.kind() {
        FeatureKind::Integer => match text.parse::<i64>() {
            Ok(v) => Ok(v as f64),
            // "12.0" is a whole number written as a decimal
            Err(int_err) => match text.parse::<f64>() {
                Ok(v) if v.is_finite() && v.fract() == 0.0 => {
                    if (I64_LOWER..I64_UPPER).contains(&v) {
                        Ok(v)
                    } else {
                        Err(fail(format!("{} does not fit in a 64-bit integer", v)))
                    }
                }
                Ok(v) => Err(fail(format!("{} is not an integer", v))),
                Err(_) => Err(fail(int_err.to_string())),
            },
        },
        FeatureKind::Float => text.parse::<f64>().map_err(|e| fail(e.to_string())),
    }
}
