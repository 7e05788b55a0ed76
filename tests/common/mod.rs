//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use emd::config::ScenarioConfig;
use emd::io::input::SnapshotTable;
use emd::runner::{self, RunOutput};

/// Tolerance for MW balance checks.
pub const MW_TOL: f64 = 1e-6;

/// Path of a file relative to the crate root.
pub fn fixture(rel: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join(rel)
}

/// The bundled two-day demand sheet, read with the Germany column mapping.
pub fn sample_table(cfg: &ScenarioConfig) -> SnapshotTable {
    runner::snapshots(cfg, Some(&fixture("data/demand_sample.csv")))
        .unwrap_or_else(|e| panic!("{e}"))
}

/// Runs `cfg` over `table`, panicking on failure.
pub fn solve(cfg: &ScenarioConfig, table: &SnapshotTable) -> RunOutput {
    runner::run(cfg, table).unwrap_or_else(|e| panic!("{e}"))
}

/// Distinct marginal costs of the fleet.
pub fn fleet_costs(cfg: &ScenarioConfig) -> Vec<f64> {
    let mut costs: Vec<f64> = cfg.generators.iter().map(|g| g.marginal_cost).collect();
    costs.sort_by(f64::total_cmp);
    costs.dedup();
    costs
}
