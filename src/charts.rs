//! The six dispatch charts, rendered as SVG.
//!
//! [`ChartKind`] describes each chart independently of the drawing backend
//! so the terminal viewer can show the same series.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use plotters::prelude::*;
use thiserror::Error;
use tracing::info;

use crate::market::types::{DispatchResult, SnapshotResult};

const WIDTH: u32 = 1200;
const HEIGHT: u32 = 600;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("cannot create chart directory \"{path}\": {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to draw \"{path}\": {message}")]
    Draw { path: String, message: String },
    #[error("nothing to plot: the dispatch result has no snapshots")]
    Empty,
}

/// Line color of a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesColor {
    Green,
    Red,
    Blue,
}

impl SeriesColor {
    fn rgb(self) -> RGBColor {
        match self {
            Self::Green => GREEN,
            Self::Red => RED,
            Self::Blue => BLUE,
        }
    }
}

/// One labelled line.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: &'static str,
    pub color: SeriesColor,
    pub values: Vec<f64>,
}

/// How to draw one line: label, color and the per-snapshot value.
#[derive(Debug, Clone, Copy)]
pub struct SeriesSpec {
    pub label: &'static str,
    pub color: SeriesColor,
    pub value: fn(&SnapshotResult) -> f64,
}

impl SeriesSpec {
    /// Full-horizon series for `result`.
    pub fn series(self, result: &DispatchResult) -> Series {
        Series {
            label: self.label,
            color: self.color,
            values: result.snapshots.iter().map(self.value).collect(),
        }
    }
}

const LOAD: SeriesSpec = SeriesSpec {
    label: "Load Curve",
    color: SeriesColor::Blue,
    value: |s| s.load_mw,
};
const SUPPLY: SeriesSpec = SeriesSpec {
    label: "Total Generation",
    color: SeriesColor::Green,
    value: |s| s.total_generation_mw,
};
const PRICE: SeriesSpec = SeriesSpec {
    label: "Marginal Price",
    color: SeriesColor::Red,
    value: |s| s.marginal_price,
};

/// The charts produced for every run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    ResVsNonRes,
    DemandAndPrice,
    DemandAndSupply,
    SupplyAndPrice,
    LoadCurve,
    MarginalPrice,
}

const PRICE_LABEL: &str = "Marginal Price (EUR/MWh)";

impl ChartKind {
    /// All charts, in rendering order.
    pub const ALL: [ChartKind; 6] = [
        Self::ResVsNonRes,
        Self::DemandAndPrice,
        Self::DemandAndSupply,
        Self::SupplyAndPrice,
        Self::LoadCurve,
        Self::MarginalPrice,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Self::ResVsNonRes => "RES Generation vs Non-RES Generation",
            Self::DemandAndPrice => "Demand and Marginal Price",
            Self::DemandAndSupply => "Demand and Supply",
            Self::SupplyAndPrice => "Supply and Marginal Price",
            Self::LoadCurve => "Load Curve",
            Self::MarginalPrice => "Marginal Price at the Bus",
        }
    }

    pub fn file_name(self) -> &'static str {
        match self {
            Self::ResVsNonRes => "res_vs_non_res.svg",
            Self::DemandAndPrice => "demand_and_price.svg",
            Self::DemandAndSupply => "demand_and_supply.svg",
            Self::SupplyAndPrice => "supply_and_price.svg",
            Self::LoadCurve => "load_curve.svg",
            Self::MarginalPrice => "marginal_price.svg",
        }
    }

    /// Left axis label.
    pub fn y_label(self) -> &'static str {
        match self {
            Self::ResVsNonRes => "Generation (MW)",
            Self::DemandAndPrice | Self::LoadCurve => "Load (MW)",
            Self::DemandAndSupply => "Power (MW)",
            Self::SupplyAndPrice => "Total Generation (MW)",
            Self::MarginalPrice => PRICE_LABEL,
        }
    }

    /// Lines drawn against the left axis.
    pub fn primary_specs(self) -> Vec<SeriesSpec> {
        match self {
            Self::ResVsNonRes => vec![
                SeriesSpec {
                    label: "RES Generation (Solar, Wind)",
                    color: SeriesColor::Green,
                    value: |s| s.res_generation_mw,
                },
                SeriesSpec {
                    label: "Non-RES Generation (Coal, Gas, etc.)",
                    color: SeriesColor::Red,
                    value: |s| s.non_res_generation_mw,
                },
            ],
            Self::DemandAndPrice | Self::LoadCurve => vec![LOAD],
            Self::DemandAndSupply => vec![LOAD, SUPPLY],
            Self::SupplyAndPrice => vec![SUPPLY],
            Self::MarginalPrice => vec![PRICE],
        }
    }

    /// Line drawn against a right-hand price axis, if the chart has one.
    pub fn secondary_spec(self) -> Option<SeriesSpec> {
        match self {
            Self::DemandAndPrice | Self::SupplyAndPrice => Some(PRICE),
            _ => None,
        }
    }

    /// Series drawn against the left axis.
    pub fn primary(self, result: &DispatchResult) -> Vec<Series> {
        self.primary_specs()
            .into_iter()
            .map(|spec| spec.series(result))
            .collect()
    }

    /// Series drawn against a right-hand price axis, if the chart has one.
    pub fn secondary(self, result: &DispatchResult) -> Option<Series> {
        self.secondary_spec().map(|spec| spec.series(result))
    }

    /// The chart after this one, wrapping around.
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|k| *k == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

/// Axis range covering `values`, anchored at zero when all values are
/// positive, with 5% headroom.
pub fn value_bounds<'a>(values: impl IntoIterator<Item = &'a f64>) -> (f64, f64) {
    let (lo, hi) = values
        .into_iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    if !lo.is_finite() || !hi.is_finite() {
        return (0.0, 1.0);
    }
    let lo = lo.min(0.0);
    let span = (hi - lo).max(1.0);
    (lo - if lo < 0.0 { span * 0.05 } else { 0.0 }, hi + span * 0.05)
}

/// Renders every chart into `dir`, creating it if needed.
///
/// # Errors
///
/// Returns a [`ChartError`] if the directory cannot be created, the result
/// is empty, or a chart fails to draw.
pub fn render_all(result: &DispatchResult, dir: &Path) -> Result<Vec<PathBuf>, ChartError> {
    if result.is_empty() {
        return Err(ChartError::Empty);
    }
    fs::create_dir_all(dir).map_err(|source| ChartError::Io {
        path: dir.display().to_string(),
        source,
    })?;

    let mut written = Vec::with_capacity(ChartKind::ALL.len());
    for kind in ChartKind::ALL {
        let path = dir.join(kind.file_name());
        render(kind, result, &path)?;
        written.push(path);
    }
    info!(dir = %dir.display(), charts = written.len(), "rendered charts");
    Ok(written)
}

/// Renders one chart to `path`.
///
/// # Errors
///
/// Returns [`ChartError::Draw`] if the backend fails.
pub fn render(kind: ChartKind, result: &DispatchResult, path: &Path) -> Result<(), ChartError> {
    let drawn = match kind.secondary(result) {
        Some(price) => draw_dual(kind, &kind.primary(result), &price, path),
        None => draw_single(kind, &kind.primary(result), path),
    };
    drawn.map_err(|e| ChartError::Draw {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

fn x_range(series: &[Series]) -> std::ops::Range<f64> {
    let len = series.iter().map(|s| s.values.len()).max().unwrap_or(0);
    0.0..(len.saturating_sub(1).max(1)) as f64
}

fn points(values: &[f64]) -> impl Iterator<Item = (f64, f64)> + '_ {
    values.iter().enumerate().map(|(t, v)| (t as f64, *v))
}

fn draw_single(
    kind: ChartKind,
    series: &[Series],
    path: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let root = SVGBackend::new(path, (WIDTH, HEIGHT)).into_drawing_area();
    root.fill(&WHITE)?;

    let (lo, hi) = value_bounds(series.iter().flat_map(|s| s.values.iter()));
    let mut chart = ChartBuilder::on(&root)
        .caption(kind.title(), ("sans-serif", 24).into_font())
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(80)
        .build_cartesian_2d(x_range(series), lo..hi)?;

    chart
        .configure_mesh()
        .x_desc("Snapshots")
        .y_desc(kind.y_label())
        .draw()?;

    for s in series {
        let color = s.color.rgb();
        chart
            .draw_series(LineSeries::new(points(&s.values), color.stroke_width(2)))?
            .label(s.label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;
    root.present()?;
    Ok(())
}

fn draw_dual(
    kind: ChartKind,
    series: &[Series],
    price: &Series,
    path: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let root = SVGBackend::new(path, (WIDTH, HEIGHT)).into_drawing_area();
    root.fill(&WHITE)?;

    let x = x_range(series);
    let (lo, hi) = value_bounds(series.iter().flat_map(|s| s.values.iter()));
    let (p_lo, p_hi) = value_bounds(price.values.iter());
    let mut chart = ChartBuilder::on(&root)
        .caption(kind.title(), ("sans-serif", 24).into_font())
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(80)
        .right_y_label_area_size(80)
        .build_cartesian_2d(x.clone(), lo..hi)?
        .set_secondary_coord(x, p_lo..p_hi);

    chart
        .configure_mesh()
        .x_desc("Snapshots")
        .y_desc(kind.y_label())
        .draw()?;
    chart.configure_secondary_axes().y_desc(PRICE_LABEL).draw()?;

    for s in series {
        let color = s.color.rgb();
        chart
            .draw_series(LineSeries::new(points(&s.values), color.stroke_width(2)))?
            .label(s.label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
    }
    let color = price.color.rgb();
    chart
        .draw_secondary_series(LineSeries::new(points(&price.values), color.stroke_width(2)))?
        .label(price.label)
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;
    root.present()?;
    Ok(())
}
