//! Seeded synthetic snapshot profiles.
//!
//! Used when no demand sheet is supplied: builds a [`SnapshotTable`] with the
//! same column layout the fleet expects, from a daily load curve, a
//! daylight-shaped solar profile, and AR(1) wind profiles.

/// Daily load curve generator.
pub mod load;
/// Solar capacity factor generator.
pub mod solar;
/// Wind capacity factor generator.
pub mod wind;

use rand::{Rng, rngs::StdRng};
use tracing::info;

use crate::config::ScenarioConfig;
use crate::io::input::SnapshotTable;

pub use load::LoadProfile;
pub use solar::SolarProfile;
pub use wind::WindProfile;

/// Seed offset for the solar RNG to avoid correlation with the load noise.
const SOLAR_SEED_OFFSET: u64 = 17;
/// Seed offset for the first wind RNG; each further column adds one.
const WIND_SEED_OFFSET: u64 = 57;

/// A per-snapshot series generator.
pub trait Profile {
    /// Returns the value at `step` and advances any internal state.
    ///
    /// Steps must be requested in increasing order for stateful profiles.
    fn value(&mut self, step: usize) -> f64;

    /// Returns a human-readable profile name.
    fn kind(&self) -> &'static str;
}

/// Gaussian noise via the Box-Muller transform.
pub fn gaussian_noise(rng: &mut StdRng, std_dev: f64) -> f64 {
    if std_dev <= 0.0 {
        return 0.0;
    }

    let u1: f64 = rng.random::<f64>().clamp(1e-12, 1.0);
    let u2: f64 = rng.random::<f64>();
    let z0 = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
    z0 * std_dev
}

/// Generates `steps_per_day * days` synthetic snapshots for `cfg`.
pub fn synthesize(cfg: &ScenarioConfig) -> SnapshotTable {
    let s = &cfg.synthetic;
    let total = s.steps_per_day * s.days;

    let mut load = LoadProfile::new(&s.load, s.steps_per_day, s.seed);
    let mut solar = SolarProfile::new(&s.solar, s.steps_per_day, s.seed.wrapping_add(SOLAR_SEED_OFFSET));
    let mut winds: Vec<WindProfile> = s
        .wind
        .iter()
        .enumerate()
        .map(|(i, w)| WindProfile::new(w, s.seed.wrapping_add(WIND_SEED_OFFSET + i as u64)))
        .collect();

    let mut table = SnapshotTable {
        load_mw: run(&mut load, total),
        ..SnapshotTable::default()
    };
    table
        .availability
        .insert(s.solar.column.clone(), run(&mut solar, total));
    for (w, profile) in s.wind.iter().zip(winds.iter_mut()) {
        table.availability.insert(w.column.clone(), run(profile, total));
    }
    table.columns = std::iter::once(cfg.input.load_column.clone())
        .chain(table.availability.keys().cloned())
        .collect();

    info!(
        snapshots = total,
        seed = s.seed,
        columns = table.availability.len(),
        "generated synthetic snapshots"
    );
    table
}

fn run(profile: &mut impl Profile, total: usize) -> Vec<f64> {
    (0..total).map(|t| profile.value(t)).collect()
}
