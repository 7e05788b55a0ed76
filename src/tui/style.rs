//! Color constants and auto-scaling helpers for the TUI.

use ratatui::style::Color;

use crate::charts::SeriesColor;

/// Header bar foreground.
pub const HEADER_FG: Color = Color::White;
/// Header bar background.
pub const HEADER_BG: Color = Color::DarkGray;
/// Footer help text color.
pub const FOOTER_FG: Color = Color::DarkGray;
/// Shown while load is being shed.
pub const SHEDDING: Color = Color::Magenta;

/// Terminal color for a chart series.
pub fn series_color(color: SeriesColor) -> Color {
    match color {
        SeriesColor::Green => Color::Green,
        SeriesColor::Red => Color::Red,
        SeriesColor::Blue => Color::Cyan,
    }
}

/// Gauge color for the renewable share.
pub fn res_share_color(share: f64) -> Color {
    if share >= 0.5 {
        Color::Green
    } else if share >= 0.2 {
        Color::Yellow
    } else {
        Color::Red
    }
}

/// Computes Y-axis bounds from chart data points with 10% padding.
pub fn auto_bounds_y<'a>(series: impl IntoIterator<Item = &'a [(f64, f64)]>) -> [f64; 2] {
    let (min, max) = series
        .into_iter()
        .flatten()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &(_, y)| (lo.min(y), hi.max(y)));
    if !min.is_finite() || !max.is_finite() {
        return [-1.0, 1.0];
    }
    let range = (max - min).max(0.1);
    let pad = range * 0.1;
    [min - pad, max + pad]
}
