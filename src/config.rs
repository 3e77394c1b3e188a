use std::path::PathBuf;
use thiserror::Error;

/// Which table columns hold which metric. Column 0 is always the date
/// column; every index here is a 0-based position into the CSV.
#[derive(Debug, Clone, Default)]
pub struct ColumnSelection {
    pub ldl: Option<usize>,
    pub hdl: Option<usize>,
    pub chol: Option<usize>,
    pub trig: Option<usize>,
    pub weight: Option<usize>,
    pub bpm: Option<usize>,
    pub blood_pressure: Option<BloodPressureColumns>,
}

/// Systolic/diastolic column pair parsed from a `SYS,DIA` selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BloodPressureColumns {
    pub systolic: usize,
    pub diastolic: usize,
}

#[derive(Debug, Error)]
pub enum SelectorError {
    #[error("cannot parse blood pressure columns {0:?}: expected two comma-separated indices, e.g. \"3,4\"")]
    BloodPressure(String),
}

impl BloodPressureColumns {
    /// Parses a `"SYS,DIA"` selector. Anything other than exactly two
    /// comma-separated indices is rejected before any chart renders.
    pub fn parse(selector: &str) -> Result<Self, SelectorError> {
        let items: Vec<&str> = selector.split(',').collect();
        if items.len() != 2 {
            return Err(SelectorError::BloodPressure(selector.to_string()));
        }
        let systolic = items[0]
            .trim()
            .parse::<usize>()
            .map_err(|_| SelectorError::BloodPressure(selector.to_string()))?;
        let diastolic = items[1]
            .trim()
            .parse::<usize>()
            .map_err(|_| SelectorError::BloodPressure(selector.to_string()))?;
        Ok(Self { systolic, diastolic })
    }
}

/// Explicit configuration for one plotting run, built from CLI arguments
/// and handed to the pipeline as a whole. No global state.
#[derive(Debug, Clone)]
pub struct ChartConfig {
    pub csv_file: PathBuf,
    pub columns: ColumnSelection,
    pub out_dir: PathBuf,
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_two_indices() {
        let bp = BloodPressureColumns::parse("3,4").unwrap();
        assert_eq!(bp.systolic, 3);
        assert_eq!(bp.diastolic, 4);
    }

    #[test]
    fn tolerates_spaces() {
        let bp = BloodPressureColumns::parse(" 3 , 4 ").unwrap();
        assert_eq!(bp, BloodPressureColumns { systolic: 3, diastolic: 4 });
    }

    #[test]
    fn rejects_single_index() {
        let err = BloodPressureColumns::parse("3").unwrap_err();
        assert!(err.to_string().contains("two comma-separated indices"));
    }

    #[test]
    fn rejects_non_numeric() {
        assert!(BloodPressureColumns::parse("a,b").is_err());
        assert!(BloodPressureColumns::parse("3,4,5").is_err());
    }
}
