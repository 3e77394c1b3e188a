use crate::model::{Series, UnitSystem};

/// A lipid series resolved into both unit conventions, plus which one
/// the raw data was detected as.
#[derive(Debug, Clone)]
pub struct LipidSeries {
    pub si: Series,
    pub conventional: Series,
    pub detected: UnitSystem,
}

/// Threshold for the first-sample unit heuristic. Plausible lipid values
/// stay below 20 in mmol/L and above it in mg/dL.
const CONVENTIONAL_THRESHOLD: f64 = 20.0;

/// Guesses the unit system of a lipid series from its first value and
/// derives the counterpart series with the given mmol/L -> mg/dL factor.
///
/// This is a single-sample heuristic, not a classifier: only the first
/// value is inspected, the threshold is exactly 20 (strict greater-than,
/// so 20 itself takes the SI branch), and mixed-unit columns produce
/// whatever the first value dictates. Returns `None` for an empty series;
/// the caller must skip rendering.
pub fn resolve_units(series: &Series, factor: f64) -> Option<LipidSeries> {
    let first = *series.values.first()?;

    if first > CONVENTIONAL_THRESHOLD {
        let si_values = series.values.iter().map(|v| v / factor).collect();
        Some(LipidSeries {
            si: Series::new(series.timestamps.clone(), si_values),
            conventional: series.clone(),
            detected: UnitSystem::Conventional,
        })
    } else {
        let conv_values = series.values.iter().map(|v| v * factor).collect();
        Some(LipidSeries {
            si: series.clone(),
            conventional: Series::new(series.timestamps.clone(), conv_values),
            detected: UnitSystem::Si,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CHOLESTEROL_FACTOR, TRIGLYCERIDES_FACTOR};
    use chrono::{Duration, TimeZone, Utc};

    fn series_from(values: &[f64]) -> Series {
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let timestamps = (0..values.len())
            .map(|i| t0 + Duration::days(i as i64))
            .collect();
        Series::new(timestamps, values.to_vec())
    }

    #[test]
    fn small_first_value_is_si() {
        let resolved = resolve_units(&series_from(&[5.0]), CHOLESTEROL_FACTOR).unwrap();
        assert_eq!(resolved.detected, UnitSystem::Si);
        assert!((resolved.conventional.values[0] - 193.3488).abs() < 1e-3);
        assert_eq!(resolved.si.values, vec![5.0]);
    }

    #[test]
    fn large_first_value_is_conventional() {
        let raw = series_from(&[180.0, 160.0, 150.0]);
        let resolved = resolve_units(&raw, TRIGLYCERIDES_FACTOR).unwrap();
        assert_eq!(resolved.detected, UnitSystem::Conventional);
        for (si, conv) in resolved.si.values.iter().zip(&raw.values) {
            assert!((si - conv / TRIGLYCERIDES_FACTOR).abs() < 1e-12);
        }
    }

    #[test]
    fn conversion_round_trips() {
        let raw = series_from(&[210.0, 195.5, 188.2]);
        let resolved = resolve_units(&raw, CHOLESTEROL_FACTOR).unwrap();
        for (si, original) in resolved.si.values.iter().zip(&raw.values) {
            assert!((si * CHOLESTEROL_FACTOR - original).abs() < 1e-9);
        }
    }

    #[test]
    fn boundary_value_takes_si_branch() {
        // Strict greater-than: exactly 20 counts as SI.
        let resolved = resolve_units(&series_from(&[20.0]), CHOLESTEROL_FACTOR).unwrap();
        assert_eq!(resolved.detected, UnitSystem::Si);
    }

    #[test]
    fn empty_series_yields_none() {
        assert!(resolve_units(&series_from(&[]), CHOLESTEROL_FACTOR).is_none());
    }
}
