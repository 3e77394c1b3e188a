// Core structs: Series, TrendResult, unit conversion types
use chrono::{DateTime, Utc};
use thiserror::Error;

/// An ordered sequence of (timestamp, value) samples extracted from one
/// table column. Index-aligned with any sibling series taken from the
/// same row set. Never mutated after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub timestamps: Vec<DateTime<Utc>>,
    pub values: Vec<f64>,
}

impl Series {
    pub fn new(timestamps: Vec<DateTime<Utc>>, values: Vec<f64>) -> Self {
        debug_assert_eq!(timestamps.len(), values.len());
        Self { timestamps, values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn points(&self) -> impl Iterator<Item = (DateTime<Utc>, f64)> + '_ {
        self.timestamps
            .iter()
            .copied()
            .zip(self.values.iter().copied())
    }
}

/// Which unit convention a lipid column is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitSystem {
    /// mmol/L
    Si,
    /// mg/dL
    Conventional,
}

/// mmol/L -> mg/dL factor for cholesterol fractions (LDL, HDL, total).
pub const CHOLESTEROL_FACTOR: f64 = 38.66976;
/// mmol/L -> mg/dL factor for triglycerides.
pub const TRIGLYCERIDES_FACTOR: f64 = 88.57396;

/// OLS fit evaluated at the first and last timestamps of a series.
/// Only the two endpoints exist; the line is never resampled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendLine {
    pub start: (DateTime<Utc>, f64),
    pub end: (DateTime<Utc>, f64),
}

/// Output of the trend analyzer for one series.
#[derive(Debug, Clone)]
pub struct TrendResult {
    /// Gaussian-smoothed values, same length as the input series.
    pub smoothed: Vec<f64>,
    /// `None` when the series has fewer than two points.
    pub trend: Option<TrendLine>,
}

#[derive(Debug, Error)]
pub enum TableError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot parse {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },
    #[error("column {column} out of range: row {row} has {width} columns")]
    ColumnOutOfRange {
        column: usize,
        row: usize,
        width: usize,
    },
    #[error("cannot parse timestamp {value:?} in row {row}, column {column}")]
    TimestampParse {
        value: String,
        row: usize,
        column: usize,
    },
    #[error("cannot parse number {value:?} in row {row}, column {column}")]
    ValueParse {
        value: String,
        row: usize,
        column: usize,
    },
}

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("division by zero at index {0}")]
    DivisionByZero(usize),
    #[error("series length mismatch: {left} vs {right}")]
    LengthMismatch { left: usize, right: usize },
}

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("chart backend error: {0}")]
    Backend(String),
}
