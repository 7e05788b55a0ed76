use rand::{SeedableRng, rngs::StdRng};

use super::{Profile, gaussian_noise};
use crate::config::WindProfileConfig;

/// Wind capacity factor following a mean-reverting AR(1) process.
///
/// ```text
/// cf(t) = alpha * cf(t-1) + (1 - alpha) * (mean + epsilon(t))
/// ```
/// clamped to \[0, 1\]. Starts at the mean.
#[derive(Debug, Clone)]
pub struct WindProfile {
    pub mean: f64,
    pub alpha: f64,
    pub noise_std: f64,
    state: f64,
    rng: StdRng,
}

impl WindProfile {
    pub fn new(cfg: &WindProfileConfig, seed: u64) -> Self {
        let mean = cfg.mean.clamp(0.0, 1.0);
        Self {
            mean,
            alpha: cfg.alpha.clamp(0.0, 1.0),
            noise_std: cfg.noise_std.max(0.0),
            state: mean,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Profile for WindProfile {
    fn value(&mut self, _step: usize) -> f64 {
        let epsilon = gaussian_noise(&mut self.rng, self.noise_std);
        self.state = self.alpha * self.state + (1.0 - self.alpha) * (self.mean + epsilon);
        self.state = self.state.clamp(0.0, 1.0);
        self.state
    }

    fn kind(&self) -> &'static str {
        "wind"
    }
}
