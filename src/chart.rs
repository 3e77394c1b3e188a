// Chart composition via plotters. Pure presentation: all analysis
// happens upstream, this module only paints what it is handed.
use crate::model::{ChartError, Series, TrendResult};
use chrono::{DateTime, Duration, Utc};
use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::types::{RangedCoordf64, RangedDateTime};
use plotters::prelude::*;
use std::ops::Range;
use std::path::Path;

/// One named (scatter, smoothed, trend) triple sharing the chart's
/// time axis.
pub struct ChartSeries<'a> {
    pub name: &'a str,
    pub series: &'a Series,
    pub analysis: &'a TrendResult,
}

/// Secondary y-axis showing the same data in the counterpart unit: its
/// range is the primary range scaled by the conversion factor.
pub struct SecondaryAxis<'a> {
    pub factor: f64,
    pub label: &'a str,
}

const SERIES_COLORS: [RGBColor; 4] = [
    RGBColor(30, 144, 255),
    RGBColor(200, 0, 100),
    RGBColor(34, 139, 34),
    RGBColor(255, 140, 0),
];

type TimeChart<'a, 'b> =
    ChartContext<'a, SVGBackend<'b>, Cartesian2d<RangedDateTime<DateTime<Utc>>, RangedCoordf64>>;

/// Renders one or more series triples to an SVG file, with an optional
/// synchronized secondary unit axis on the right.
pub fn render_chart(
    path: &Path,
    title: &str,
    y_label: &str,
    charts: &[ChartSeries],
    secondary: Option<SecondaryAxis>,
) -> Result<(), ChartError> {
    let x_range = time_range(charts);
    let y_range = value_range(charts);

    let root = SVGBackend::new(path, (1024, 768)).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| ChartError::Backend(e.to_string()))?;

    let mut builder = ChartBuilder::on(&root);
    builder
        .margin(20)
        .caption(title, ("sans-serif", 28))
        .set_label_area_size(LabelAreaPosition::Left, 60)
        .set_label_area_size(LabelAreaPosition::Bottom, 45);
    if secondary.is_some() {
        builder.set_label_area_size(LabelAreaPosition::Right, 60);
    }

    match &secondary {
        Some(sec) => {
            let sec_range = (y_range.start * sec.factor)..(y_range.end * sec.factor);
            let mut chart = builder
                .build_cartesian_2d(x_range.clone(), y_range.clone())
                .map_err(|e| ChartError::Backend(e.to_string()))?
                .set_secondary_coord(x_range, sec_range);
            chart
                .configure_mesh()
                .x_labels(8)
                .x_label_formatter(&|dt| dt.format("%Y-%m-%d").to_string())
                .y_desc(y_label)
                .draw()
                .map_err(|e| ChartError::Backend(e.to_string()))?;
            chart
                .configure_secondary_axes()
                .y_desc(sec.label)
                .draw()
                .map_err(|e| ChartError::Backend(e.to_string()))?;
            draw_triples(&mut chart, charts)?;
            chart
                .configure_series_labels()
                .background_style(WHITE.mix(0.8))
                .border_style(BLACK)
                .draw()
                .map_err(|e| ChartError::Backend(e.to_string()))?;
        }
        None => {
            let mut chart = builder
                .build_cartesian_2d(x_range, y_range)
                .map_err(|e| ChartError::Backend(e.to_string()))?;
            chart
                .configure_mesh()
                .x_labels(8)
                .x_label_formatter(&|dt| dt.format("%Y-%m-%d").to_string())
                .y_desc(y_label)
                .draw()
                .map_err(|e| ChartError::Backend(e.to_string()))?;
            draw_triples(&mut chart, charts)?;
            chart
                .configure_series_labels()
                .background_style(WHITE.mix(0.8))
                .border_style(BLACK)
                .draw()
                .map_err(|e| ChartError::Backend(e.to_string()))?;
        }
    }

    root.present()
        .map_err(|e| ChartError::Backend(e.to_string()))?;
    Ok(())
}

fn draw_triples(chart: &mut TimeChart, charts: &[ChartSeries]) -> Result<(), ChartError> {
    for (i, cs) in charts.iter().enumerate() {
        let color = SERIES_COLORS[i % SERIES_COLORS.len()];

        chart
            .draw_series(cs.series.points().map(|(t, v)| Cross::new((t, v), 4, color)))
            .map_err(|e| ChartError::Backend(e.to_string()))?
            .label(cs.name)
            .legend(move |(x, y)| Cross::new((x + 10, y), 4, color.stroke_width(1)));

        chart
            .draw_series(LineSeries::new(
                cs.series
                    .timestamps
                    .iter()
                    .copied()
                    .zip(cs.analysis.smoothed.iter().copied()),
                color.stroke_width(2),
            ))
            .map_err(|e| ChartError::Backend(e.to_string()))?
            .label(format!("Smooth {}", cs.name))
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
            });

        if let Some(line) = cs.analysis.trend {
            chart
                .draw_series(LineSeries::new(
                    [line.start, line.end],
                    color.mix(0.6).stroke_width(1),
                ))
                .map_err(|e| ChartError::Backend(e.to_string()))?
                .label(format!("Prediction {}", cs.name))
                .legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 20, y)], color.mix(0.6))
                });
        }
    }
    Ok(())
}

fn time_range(charts: &[ChartSeries]) -> Range<DateTime<Utc>> {
    let mut min = DateTime::<Utc>::MAX_UTC;
    let mut max = DateTime::<Utc>::MIN_UTC;
    for cs in charts {
        for t in &cs.series.timestamps {
            min = min.min(*t);
            max = max.max(*t);
        }
    }
    // A zero-width axis breaks plotters; widen single-instant charts.
    if min >= max {
        min = min - Duration::hours(12);
        max = max + Duration::hours(12);
    }
    min..max
}

fn value_range(charts: &[ChartSeries]) -> Range<f64> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for cs in charts {
        let endpoints = cs
            .analysis
            .trend
            .iter()
            .flat_map(|l| [l.start.1, l.end.1]);
        for v in cs
            .series
            .values
            .iter()
            .copied()
            .chain(cs.analysis.smoothed.iter().copied())
            .chain(endpoints)
        {
            min = min.min(v);
            max = max.max(v);
        }
    }
    if min >= max {
        min -= 0.5;
        max += 0.5;
    }
    let pad = (max - min) * 0.05;
    (min - pad)..(max + pad)
}
