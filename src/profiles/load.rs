use rand::{SeedableRng, rngs::StdRng};

use super::{Profile, gaussian_noise};
use crate::config::LoadProfileConfig;

/// A daily load curve: sinusoidal swing around a base level plus noise.
///
/// # Examples
///
/// ```
/// use emd::config::LoadProfileConfig;
/// use emd::profiles::{LoadProfile, Profile};
///
/// let cfg = LoadProfileConfig { noise_std: 0.0, ..LoadProfileConfig::default() };
/// let mut load = LoadProfile::new(&cfg, 24, 42);
/// assert!(load.value(12) > load.value(0));
/// ```
#[derive(Debug, Clone)]
pub struct LoadProfile {
    /// Mean load in MW.
    pub base_mw: f64,

    /// Amplitude of the daily swing in MW.
    pub amp_mw: f64,

    /// Phase offset of the sinusoid in radians.
    pub phase_rad: f64,

    /// Standard deviation of the Gaussian noise in MW.
    pub noise_std: f64,

    steps_per_day: usize,

    rng: StdRng,
}

impl LoadProfile {
    pub fn new(cfg: &LoadProfileConfig, steps_per_day: usize, seed: u64) -> Self {
        Self {
            base_mw: cfg.base_mw,
            amp_mw: cfg.amp_mw,
            phase_rad: cfg.phase_rad,
            noise_std: cfg.noise_std.max(0.0),
            steps_per_day: steps_per_day.max(1),
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Profile for LoadProfile {
    /// Load in MW at `step`, never negative.
    fn value(&mut self, step: usize) -> f64 {
        let day_pos = (step % self.steps_per_day) as f64 / self.steps_per_day as f64;
        let angle = 2.0 * std::f64::consts::PI * day_pos + self.phase_rad;
        let noise = gaussian_noise(&mut self.rng, self.noise_std);
        (self.base_mw + self.amp_mw * angle.sin() + noise).max(0.0)
    }

    fn kind(&self) -> &'static str {
        "load"
    }
}
