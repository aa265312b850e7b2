//! Sample Upload File

use std::fs;
use std::io;
use std::path::Path;

/// Example batch upload: header plus one scenario per row
pub const SAMPLE_CSV: &str = "\
Nitrogen,Phosphorus,Potassium,Temperature,Humidity,pH_Value,Rainfall
90,42,43,20.87974371,82.00274423,6.502985292,202.9355362
85,58,41,21.77046169,80.31964408,7.038096361,226.6555374
60,55,44,23.00445915,82.3207629,7.840207144,263.9642476
74,35,40,26.49109635,80.15836264,6.980400905,242.8640342
78,42,42,20.13017482,81.60487287,7.628472891,262.7173405
";

/// Write the sample CSV to `path`
pub fn write_sample(path: &Path) -> io::Result<()> {
    fs::write(path, SAMPLE_CSV)
}

#[cfg(test)]
mod tests {
    use super::*;
    use feature_validator::{coerce_batch, read_table, HeaderMode, Validator};

    #[test]
    fn test_sample_is_a_valid_batch() {
        let table = read_table(SAMPLE_CSV.as_bytes(), HeaderMode::Auto).unwrap();
        assert!(table.header.is_some());

        let batch = coerce_batch(&table).unwrap();
        assert_eq!(batch.len(), 5);
        assert!(Validator::default().validate_batch(&batch).is_empty());
    }

    #[test]
    fn test_write_sample() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.csv");
        write_sample(&path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), SAMPLE_CSV);
    }
}
