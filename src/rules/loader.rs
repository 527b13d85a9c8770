//! CSV-based tax rule loader
//!
//! Rule tables are `Key,Value` files, one constant per row.

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use crate::error::{LoadResult, TaxError};

/// Default rule file location
pub const DEFAULT_RULES_PATH: &str = "data/tax_rules.csv";

/// Load `Key,Value` pairs from a rule file
pub fn load_rule_table(path: &Path) -> LoadResult<HashMap<String, f64>> {
    let file = File::open(path)?;
    load_rule_table_from_reader(file)
}

/// Load `Key,Value` pairs from any reader
pub fn load_rule_table_from_reader<R: std::io::Read>(reader: R) -> LoadResult<HashMap<String, f64>> {
    let mut reader = csv::Reader::from_reader(reader);
    let mut values = HashMap::new();

    for result in reader.records() {
        let record = result?;
        let key = record.get(0).unwrap_or_default().trim().to_string();
        let raw = record.get(1).unwrap_or_default().trim();
        let value: f64 = raw.parse().map_err(|_| TaxError::Parse {
            field: key.clone(),
            value: raw.to_string(),
        })?;
        values.insert(key, value);
    }

    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_rule_table() {
        let csv = "Key,Value\nequity_short_term_rate,0.2\nlong_term_exemption_limit,125000\n";
        let table = load_rule_table_from_reader(csv.as_bytes()).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table["equity_short_term_rate"], 0.2);
        assert_eq!(table["long_term_exemption_limit"], 125_000.0);
    }

    #[test]
    fn test_bad_value_reports_key() {
        let csv = "Key,Value\nequity_long_term_rate,twelve\n";
        let err = load_rule_table_from_reader(csv.as_bytes()).unwrap_err();

        match err {
            TaxError::Parse { field, value } => {
                assert_eq!(field, "equity_long_term_rate");
                assert_eq!(value, "twelve");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_load_default_rules_file() {
        let table = load_rule_table(Path::new(DEFAULT_RULES_PATH));
        assert!(table.is_ok(), "Failed to load rules: {:?}", table.err());
    }
}
