//! TUI layout and widget rendering.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::symbols;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Axis, Block, Borders, Chart, Dataset, Gauge, Paragraph};

use super::runtime::App;
use super::style;

/// Renders the full TUI frame.
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // header
            Constraint::Min(10),   // chart
            Constraint::Length(3), // RES share gauge
            Constraint::Length(5), // status panel
            Constraint::Length(1), // footer
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);
    render_chart(frame, app, chunks[1]);
    render_res_gauge(frame, app, chunks[2]);
    render_status(frame, app, chunks[3]);
    render_footer(frame, chunks[4]);
}

/// Header bar: bus, snapshot progress, speed, replay state.
fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let (state_icon, state_label) = if app.is_finished() {
        ("■", "DONE")
    } else if app.paused {
        ("‖", "PAUSED")
    } else {
        ("▶", "RUNNING")
    };

    let header = Line::from(vec![
        Span::styled(
            " EMD ",
            Style::default()
                .fg(style::HEADER_FG)
                .bg(style::HEADER_BG)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(
            app.result().bus.as_str(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(
            " │ t={}/{} │ {}ms │ {} {} ",
            app.snapshot,
            app.total_snapshots(),
            app.tick_interval_ms(),
            state_icon,
            state_label,
        )),
    ]);
    frame.render_widget(Paragraph::new(header), area);
}

/// Active chart over the rolling window. Charts with a price series get a
/// second panel so each keeps its own axis.
fn render_chart(frame: &mut Frame, app: &App, area: Rect) {
    let mut window = app.window();
    let price = app
        .chart
        .secondary_spec()
        .is_some()
        .then(|| window.pop())
        .flatten();

    let areas: Vec<Rect> = if price.is_some() {
        Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
            .split(area)
            .to_vec()
    } else {
        vec![area]
    };

    let title = format!(" {} ", app.chart.title());
    draw_series(frame, &window, &title, app.chart.y_label(), areas[0]);
    if let (Some(p), Some(&price_area)) = (price, areas.get(1)) {
        draw_series(
            frame,
            std::slice::from_ref(&p),
            " Marginal Price ",
            "EUR/MWh",
            price_area,
        );
    }
}

fn draw_series(
    frame: &mut Frame,
    series: &[(crate::charts::SeriesSpec, Vec<(f64, f64)>)],
    title: &str,
    y_title: &str,
    area: Rect,
) {
    let y_bounds = style::auto_bounds_y(series.iter().map(|(_, pts)| pts.as_slice()));
    let xs = series.iter().flat_map(|(_, pts)| pts.iter().map(|p| p.0));
    let x_lo = xs.clone().fold(f64::INFINITY, f64::min);
    let x_lo = if x_lo.is_finite() { x_lo } else { 0.0 };
    let x_hi = xs.fold(f64::NEG_INFINITY, f64::max).max(x_lo + 1.0);

    let datasets = series
        .iter()
        .map(|(s, pts)| {
            Dataset::default()
                .name(s.label)
                .marker(symbols::Marker::Braille)
                .style(Style::default().fg(style::series_color(s.color)))
                .data(pts)
        })
        .collect();

    let chart = Chart::new(datasets)
        .block(Block::default().title(title.to_string()).borders(Borders::ALL))
        .x_axis(
            Axis::default()
                .title("Snapshots")
                .bounds([x_lo, x_hi])
                .labels(vec![format!("{}", x_lo as u64), format!("{}", x_hi as u64)]),
        )
        .y_axis(
            Axis::default()
                .title(y_title.to_string())
                .bounds(y_bounds)
                .labels(vec![
                    format!("{:.0}", y_bounds[0]),
                    format!("{:.0}", y_bounds[1]),
                ]),
        );

    frame.render_widget(chart, area);
}

/// Renewable share gauge with a load-shedding indicator.
fn render_res_gauge(frame: &mut Frame, app: &App, area: Rect) {
    let share = app.res_share();
    let shedding = app.last_snapshot().is_some_and(|s| s.unserved_mw > 0.0);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(20), Constraint::Length(14)])
        .split(area);

    let gauge = Gauge::default()
        .block(Block::default().title(" RES share ").borders(Borders::ALL))
        .gauge_style(Style::default().fg(style::res_share_color(share)))
        .ratio(share)
        .label(format!("{:.0}%", share * 100.0));
    frame.render_widget(gauge, chunks[0]);

    let (text, color) = if shedding {
        ("SHEDDING", style::SHEDDING)
    } else {
        ("", style::FOOTER_FG)
    };
    let indicator = Paragraph::new(Line::from(Span::styled(
        text,
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )))
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(indicator, chunks[1]);
}

/// Status panel with the latest snapshot.
fn render_status(frame: &mut Frame, app: &App, area: Rect) {
    let lines = if let Some(s) = app.last_snapshot() {
        vec![
            Line::from(format!(
                "  load={:>9.1} MW  gen={:>9.1} MW  unserved={:>7.1} MW",
                s.load_mw, s.total_generation_mw, s.unserved_mw,
            )),
            Line::from(format!(
                "  RES={:>9.1} MW  non-RES={:>9.1} MW  curtailed={:>7.1} MW",
                s.res_generation_mw, s.non_res_generation_mw, s.res_curtailed_mw,
            )),
            Line::from(format!(
                "  price={:>7.2} EUR/MWh  set by {}",
                s.marginal_price,
                app.last_price_setter().unwrap_or("value of lost load"),
            )),
        ]
    } else {
        vec![Line::from("  Waiting for first snapshot...")]
    };

    let block = Block::default().title(" Status ").borders(Borders::ALL);
    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, area);
}

/// Footer with keybinding hints.
fn render_footer(frame: &mut Frame, area: Rect) {
    let footer = Paragraph::new(Line::from(Span::styled(
        " q:Quit  Space:Pause  +/-:Speed  Tab:Chart  r:Restart",
        Style::default().fg(style::FOOTER_FG),
    )));
    frame.render_widget(footer, area);
}
