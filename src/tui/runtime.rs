//! Replay state for the terminal viewer.

use std::collections::VecDeque;
use std::time::Instant;

use crate::charts::{ChartKind, SeriesSpec};
use crate::market::types::{DispatchResult, SnapshotResult};

/// Maximum number of snapshots kept in the rolling window.
const MAX_HISTORY: usize = 200;

/// Tick interval options in milliseconds (slowest → fastest).
const SPEED_LEVELS_MS: [u64; 6] = [500, 250, 100, 50, 20, 5];

/// Default speed index (100 ms).
const DEFAULT_SPEED_IDX: usize = 2;

/// Viewer state: replays a solved dispatch one snapshot per tick.
pub struct App {
    result: DispatchResult,
    /// Indices of the snapshots currently in the rolling window.
    pub history: VecDeque<usize>,
    /// Next snapshot to reveal.
    pub snapshot: usize,
    /// Whether the replay is paused.
    pub paused: bool,
    /// Current index into `SPEED_LEVELS_MS`.
    pub speed_idx: usize,
    /// Whether the user has requested quit.
    pub quit: bool,
    /// When the last tick was executed.
    pub last_tick: Instant,
    /// Chart shown in the main panel.
    pub chart: ChartKind,
}

impl App {
    pub fn new(result: DispatchResult) -> Self {
        Self {
            result,
            history: VecDeque::with_capacity(MAX_HISTORY),
            snapshot: 0,
            paused: false,
            speed_idx: DEFAULT_SPEED_IDX,
            quit: false,
            last_tick: Instant::now(),
            chart: ChartKind::DemandAndSupply,
        }
    }

    pub fn result(&self) -> &DispatchResult {
        &self.result
    }

    pub fn total_snapshots(&self) -> usize {
        self.result.len()
    }

    /// Reveals the next snapshot if not finished.
    pub fn tick(&mut self) {
        if self.is_finished() {
            return;
        }
        if self.history.len() >= MAX_HISTORY {
            self.history.pop_front();
        }
        self.history.push_back(self.snapshot);
        self.snapshot += 1;
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    /// Shorter tick interval.
    pub fn speed_up(&mut self) {
        if self.speed_idx + 1 < SPEED_LEVELS_MS.len() {
            self.speed_idx += 1;
        }
    }

    /// Longer tick interval.
    pub fn speed_down(&mut self) {
        if self.speed_idx > 0 {
            self.speed_idx -= 1;
        }
    }

    pub fn tick_interval_ms(&self) -> u64 {
        SPEED_LEVELS_MS[self.speed_idx]
    }

    pub fn next_chart(&mut self) {
        self.chart = self.chart.next();
    }

    /// Rewinds the replay to the first snapshot.
    pub fn restart(&mut self) {
        self.history.clear();
        self.snapshot = 0;
        self.paused = false;
    }

    pub fn is_finished(&self) -> bool {
        self.snapshot >= self.result.len()
    }

    /// Most recently revealed snapshot.
    pub fn last_snapshot(&self) -> Option<&SnapshotResult> {
        self.history.back().and_then(|&t| self.result.snapshots.get(t))
    }

    /// Technology that set the price at the latest snapshot.
    pub fn last_price_setter(&self) -> Option<&str> {
        self.history
            .back()
            .and_then(|&t| self.result.price_setter_technology(t))
    }

    /// Series of the active chart restricted to the rolling window, as
    /// `(snapshot, value)` points. The price series, if any, comes last.
    pub fn window(&self) -> Vec<(SeriesSpec, Vec<(f64, f64)>)> {
        let mut specs = self.chart.primary_specs();
        specs.extend(self.chart.secondary_spec());
        specs
            .into_iter()
            .map(|spec| {
                let points = self
                    .history
                    .iter()
                    .filter_map(|&t| {
                        self.result
                            .snapshots
                            .get(t)
                            .map(|s| (t as f64, (spec.value)(s)))
                    })
                    .collect();
                (spec, points)
            })
            .collect()
    }

    /// Renewable share of generation at the latest snapshot, in `[0, 1]`.
    pub fn res_share(&self) -> f64 {
        self.last_snapshot()
            .filter(|s| s.total_generation_mw > 0.0)
            .map_or(0.0, |s| (s.res_generation_mw / s.total_generation_mw).clamp(0.0, 1.0))
    }
}
