mod analyzer;
mod chart;
mod config;
mod model;
mod table;
mod utils;

use analyzer::{TrendAnalyzer, ratio_series, resolve_units};
use chart::{ChartSeries, SecondaryAxis, render_chart};
use chrono::{DateTime, Utc};
use clap::Parser;
use config::{BloodPressureColumns, ChartConfig, ColumnSelection};
use model::{CHOLESTEROL_FACTOR, ChartError, Series, TRIGLYCERIDES_FACTOR, TableError};
use std::path::PathBuf;
use table::Table;
use thiserror::Error;
use tracing::{error, info, warn};

/// The date column is always the first one.
const DATE_COLUMN: usize = 0;

#[derive(Parser, Debug)]
#[command(name = "health-plotter")]
#[command(author, version, about = "Health metrics trend plotter", long_about = None)]
struct Args {
    /// CSV file with data; column 0 must hold the date
    csv_file: PathBuf,

    /// Column in the csv file with LDL cholesterol
    #[arg(long)]
    ldl: Option<usize>,

    /// Column in the csv file with HDL cholesterol
    #[arg(long)]
    hdl: Option<usize>,

    /// Column in the csv file with total cholesterol
    #[arg(long)]
    chol: Option<usize>,

    /// Column in the csv file with triglycerides
    #[arg(long)]
    trig: Option<usize>,

    /// Column in the csv file with weight
    #[arg(long)]
    weight: Option<usize>,

    /// Column in the csv file with BPM (heart rate)
    #[arg(long)]
    bpm: Option<usize>,

    /// Columns in the csv file with systolic and diastolic blood pressures
    #[arg(long, value_name = "SYS,DIA")]
    bp: Option<String>,

    /// Print head of read file
    #[arg(long)]
    verbose: bool,

    /// Directory for rendered SVG charts
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,
}

#[derive(Debug, Error)]
enum AppError {
    #[error(transparent)]
    Table(#[from] TableError),
    #[error(transparent)]
    Chart(#[from] ChartError),
    #[error("cannot create output directory {path}: {source}")]
    OutDir {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let args = Args::parse();

    // The blood pressure selector is validated before anything renders.
    let blood_pressure = match args.bp.as_deref().map(BloodPressureColumns::parse).transpose() {
        Ok(bp) => bp,
        Err(e) => {
            error!("{e}");
            std::process::exit(1);
        }
    };

    let config = ChartConfig {
        csv_file: args.csv_file,
        columns: ColumnSelection {
            ldl: args.ldl,
            hdl: args.hdl,
            chol: args.chol,
            trig: args.trig,
            weight: args.weight,
            bpm: args.bpm,
            blood_pressure,
        },
        out_dir: args.out_dir,
        verbose: args.verbose,
    };

    if let Err(e) = run(&config) {
        error!("{e}");
        std::process::exit(1);
    }
}

/// Runs the whole pipeline for one configuration: load table, extract
/// the date axis, then render every requested chart in order.
fn run(config: &ChartConfig) -> Result<(), AppError> {
    let table = Table::from_path(&config.csv_file)?;
    if config.verbose {
        println!("{}", table.head(5));
    }
    info!(
        "Loaded {} rows from {}",
        table.rows.len(),
        config.csv_file.display()
    );

    std::fs::create_dir_all(&config.out_dir).map_err(|e| AppError::OutDir {
        path: config.out_dir.display().to_string(),
        source: e,
    })?;

    let dates = table.timestamps(DATE_COLUMN)?;
    let analyzer = TrendAnalyzer::new();
    let cols = &config.columns;

    // Every selected column is validated before the first chart is
    // written; a bad selector must not leave partial output behind.
    for col in selected_columns(cols) {
        table.check_column(col)?;
    }

    if let Some(col) = cols.ldl {
        lipid_chart(config, &table, &dates, &analyzer, col, "LDL", CHOLESTEROL_FACTOR, "ldl.svg")?;
    }
    if let Some(col) = cols.hdl {
        lipid_chart(config, &table, &dates, &analyzer, col, "HDL", CHOLESTEROL_FACTOR, "hdl.svg")?;
    }
    if let Some(col) = cols.chol {
        lipid_chart(config, &table, &dates, &analyzer, col, "CHOL", CHOLESTEROL_FACTOR, "chol.svg")?;
    }
    if let Some(col) = cols.trig {
        lipid_chart(config, &table, &dates, &analyzer, col, "TRIG", TRIGLYCERIDES_FACTOR, "trig.svg")?;
    }

    // Charts derived from the lipid panel
    if let (Some(trig), Some(hdl)) = (cols.trig, cols.hdl) {
        ratio_chart(config, &table, &dates, &analyzer, trig, hdl, "Trig/HDL", "trig_hdl_ratio.svg")?;
    }
    if let (Some(ldl), Some(hdl)) = (cols.ldl, cols.hdl) {
        ratio_chart(config, &table, &dates, &analyzer, ldl, hdl, "LDL/HDL", "ldl_hdl_ratio.svg")?;
    }

    if let Some(col) = cols.weight {
        let series = table.extract_series(&dates, col)?;
        single_chart(config, &analyzer, &series, "Weight", "kg", "weight.svg")?;
    }
    if let Some(col) = cols.bpm {
        let series = table.extract_series(&dates, col)?;
        single_chart(config, &analyzer, &series, "BPM", "1/min", "bpm.svg")?;
    }
    if let Some(bp) = cols.blood_pressure {
        blood_pressure_chart(config, &table, &dates, &analyzer, bp)?;
    }

    Ok(())
}

/// All value column indices named by the selection, in chart order.
fn selected_columns(cols: &ColumnSelection) -> Vec<usize> {
    let mut out: Vec<usize> = [cols.ldl, cols.hdl, cols.chol, cols.trig, cols.weight, cols.bpm]
        .into_iter()
        .flatten()
        .collect();
    if let Some(bp) = cols.blood_pressure {
        out.push(bp.systolic);
        out.push(bp.diastolic);
    }
    out
}

/// Renders a lipid chart with both unit axes. The primary axis carries
/// the SI series; the secondary axis is the same range rescaled by the
/// conversion factor.
#[allow(clippy::too_many_arguments)]
fn lipid_chart(
    config: &ChartConfig,
    table: &Table,
    dates: &[DateTime<Utc>],
    analyzer: &TrendAnalyzer,
    column: usize,
    name: &str,
    factor: f64,
    file: &str,
) -> Result<(), AppError> {
    let raw = table.extract_series(dates, column)?;
    let Some(resolved) = resolve_units(&raw, factor) else {
        info!("Skipping {name}: empty series");
        return Ok(());
    };
    info!("{name} detected as {:?}", resolved.detected);

    let Some(analysis) = analyzer.analyze(&resolved.si) else {
        return Ok(());
    };

    let path = config.out_dir.join(file);
    render_chart(
        &path,
        name,
        "mmol/L",
        &[ChartSeries {
            name,
            series: &resolved.si,
            analysis: &analysis,
        }],
        Some(SecondaryAxis {
            factor,
            label: "mg/dL",
        }),
    )?;
    info!("Wrote {}", path.display());
    Ok(())
}

/// Renders a derived ratio chart. A domain fault in the ratio (zero
/// denominator) kills only this chart; sibling charts still render.
#[allow(clippy::too_many_arguments)]
fn ratio_chart(
    config: &ChartConfig,
    table: &Table,
    dates: &[DateTime<Utc>],
    analyzer: &TrendAnalyzer,
    numerator_col: usize,
    denominator_col: usize,
    name: &str,
    file: &str,
) -> Result<(), AppError> {
    let numerator = table.extract_series(dates, numerator_col)?;
    let denominator = table.extract_series(dates, denominator_col)?;
    match ratio_series(&numerator, &denominator) {
        Ok(ratio) => single_chart(config, analyzer, &ratio, name, "ratio", file),
        Err(e) => {
            warn!("Skipping {name}: {e}");
            Ok(())
        }
    }
}

fn single_chart(
    config: &ChartConfig,
    analyzer: &TrendAnalyzer,
    series: &Series,
    name: &str,
    y_label: &str,
    file: &str,
) -> Result<(), AppError> {
    let Some(analysis) = analyzer.analyze(series) else {
        info!("Skipping {name}: empty series");
        return Ok(());
    };

    let path = config.out_dir.join(file);
    render_chart(
        &path,
        name,
        y_label,
        &[ChartSeries {
            name,
            series,
            analysis: &analysis,
        }],
        None,
    )?;
    info!("Wrote {}", path.display());
    Ok(())
}

/// Systolic and diastolic series share one chart and one mmHg axis.
fn blood_pressure_chart(
    config: &ChartConfig,
    table: &Table,
    dates: &[DateTime<Utc>],
    analyzer: &TrendAnalyzer,
    bp: BloodPressureColumns,
) -> Result<(), AppError> {
    let systolic = table.extract_series(dates, bp.systolic)?;
    let diastolic = table.extract_series(dates, bp.diastolic)?;

    let (Some(sys_analysis), Some(dia_analysis)) =
        (analyzer.analyze(&systolic), analyzer.analyze(&diastolic))
    else {
        info!("Skipping blood pressure: empty series");
        return Ok(());
    };

    let path = config.out_dir.join("blood_pressure.svg");
    render_chart(
        &path,
        "Blood pressure",
        "mmHg",
        &[
            ChartSeries {
                name: "BP SYS",
                series: &systolic,
                analysis: &sys_analysis,
            },
            ChartSeries {
                name: "BP DIA",
                series: &diastolic,
                analysis: &dia_analysis,
            },
        ],
        None,
    )?;
    info!("Wrote {}", path.display());
    Ok(())
}
