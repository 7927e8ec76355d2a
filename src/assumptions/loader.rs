//! CSV-based assumption loader
//!
//! An assumption file is a two-column CSV (`field,value`) naming any subset
//! of the assumption fields by key, plus an optional `implementationCost`
//! row. Fields not listed keep their current session value.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::AssumptionField;
use crate::error::{ModelError, Result};

/// Key of the implementation cost row
pub const IMPLEMENTATION_COST_KEY: &str = "implementationCost";

/// Raw CSV row
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    field: String,
    value: u64,
}

/// Values read from an assumption file, in file order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadedAssumptions {
    pub entries: Vec<(AssumptionField, u32)>,
    pub implementation_cost: Option<u64>,
}

/// Load an assumption file from disk
pub fn load_assumptions(path: &Path) -> Result<LoadedAssumptions> {
    let file = File::open(path)?;
    let loaded = load_assumptions_from_reader(file)?;
    log::debug!(
        "Loaded {} assumption entries from {}",
        loaded.entries.len(),
        path.display()
    );
    Ok(loaded)
}

/// Load assumptions from any reader (file, stdin, in-memory)
pub fn load_assumptions_from_reader<R: Read>(reader: R) -> Result<LoadedAssumptions> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .comment(Some(b'#'))
        .from_reader(reader);

    let mut loaded = LoadedAssumptions::default();

    for result in csv_reader.deserialize() {
        let row: CsvRow = result?;
        if row.field == IMPLEMENTATION_COST_KEY {
            loaded.implementation_cost = Some(row.value);
            continue;
        }

        let field = AssumptionField::from_key(&row.field)?;
        let value = u32::try_from(row.value).map_err(|_| ModelError::OutOfRange {
            field: field.key(),
            value: row.value,
            min: field.range().min,
            max: field.range().max,
        })?;
        loaded.entries.push((field, value));
    }

    Ok(loaded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_from_reader() {
        let data = "\
field,value
# team
numReps,100
currentWinRatePct, 30
implementationCost,250000
";
        let loaded = load_assumptions_from_reader(data.as_bytes()).unwrap();
        assert_eq!(
            loaded.entries,
            vec![
                (AssumptionField::NumReps, 100),
                (AssumptionField::CurrentWinRatePct, 30),
            ]
        );
        assert_eq!(loaded.implementation_cost, Some(250_000));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let data = "field,value\navgDealSize,20000\n";
        let err = load_assumptions_from_reader(data.as_bytes()).unwrap_err();
        assert!(matches!(err, ModelError::UnknownField(ref key) if key == "avgDealSize"));
    }

    #[test]
    fn test_non_numeric_value_is_csv_error() {
        let data = "field,value\nnumReps,fifty\n";
        let err = load_assumptions_from_reader(data.as_bytes()).unwrap_err();
        assert!(matches!(err, ModelError::Csv(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_assumptions(Path::new("does/not/exist.csv")).unwrap_err();
        assert!(matches!(err, ModelError::Io(_)));
    }
}
