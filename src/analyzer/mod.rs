// Analyzer module: aggregates submodules for different aspects of analysis.

pub mod ratio;
pub mod trend;
pub mod units;

// Re-export the main analysis entry points for ease of use.
pub use ratio::ratio_series;
pub use trend::TrendAnalyzer;
pub use units::{LipidSeries, resolve_units};
