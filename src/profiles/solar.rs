//! Solar capacity factor with temporally correlated cloud cover (AR(1)).

use rand::{SeedableRng, rngs::StdRng};

use super::{Profile, gaussian_noise};
use crate::config::SolarProfileConfig;

/// Minimum cloud multiplier (heavy overcast).
const MULTIPLIER_MIN: f64 = 0.2;
/// Maximum cloud multiplier (enhanced irradiance from cloud edges).
const MULTIPLIER_MAX: f64 = 1.2;

/// Half-sine daylight shape scaled by an AR(1) cloud multiplier.
///
/// The multiplier evolves as:
/// ```text
/// m(t) = alpha * m(t-1) + (1 - alpha) * (1 + epsilon(t))
/// ```
/// and is clamped to \[0.2, 1.2\]. The resulting capacity factor is clamped
/// to \[0, 1\].
#[derive(Debug, Clone)]
pub struct SolarProfile {
    /// Capacity factor at solar noon under a clear sky.
    pub peak: f64,

    steps_per_day: usize,

    /// Step index within the day when sunrise occurs (inclusive).
    pub sunrise_idx: usize,

    /// Step index within the day when sunset occurs (exclusive).
    pub sunset_idx: usize,

    /// AR(1) correlation coefficient.
    pub alpha: f64,

    /// Standard deviation of the AR(1) innovation noise.
    pub cloud_noise_std: f64,

    multiplier: f64,

    rng: StdRng,
}

impl SolarProfile {
    pub fn new(cfg: &SolarProfileConfig, steps_per_day: usize, seed: u64) -> Self {
        Self {
            peak: cfg.peak.clamp(0.0, 1.0),
            steps_per_day: steps_per_day.max(1),
            sunrise_idx: cfg.sunrise_idx,
            sunset_idx: cfg.sunset_idx,
            alpha: cfg.alpha.clamp(0.0, 1.0),
            cloud_noise_std: cfg.cloud_noise_std.max(0.0),
            multiplier: 1.0,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Clear-sky shape in \[0, 1\] for `step`; zero outside daylight.
    pub fn daylight_frac(&self, step: usize) -> f64 {
        let t = step % self.steps_per_day;
        if t < self.sunrise_idx || t >= self.sunset_idx {
            return 0.0;
        }
        let span = (self.sunset_idx - self.sunrise_idx) as f64;
        let x = ((t - self.sunrise_idx) as f64 + 0.5) / span;
        (std::f64::consts::PI * x).sin()
    }

    fn advance_multiplier(&mut self) -> f64 {
        let epsilon = gaussian_noise(&mut self.rng, self.cloud_noise_std);
        self.multiplier = self.alpha * self.multiplier + (1.0 - self.alpha) * (1.0 + epsilon);
        self.multiplier = self.multiplier.clamp(MULTIPLIER_MIN, MULTIPLIER_MAX);
        self.multiplier
    }
}

impl Profile for SolarProfile {
    /// The multiplier advances every step, night included, so cloud fronts
    /// persist across the day boundary.
    fn value(&mut self, step: usize) -> f64 {
        let m = self.advance_multiplier();
        let frac = self.daylight_frac(step);
        if frac <= 0.0 {
            return 0.0;
        }
        (self.peak * frac * m).clamp(0.0, 1.0)
    }

    fn kind(&self) -> &'static str {
        "solar"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> SolarProfileConfig {
        SolarProfileConfig {
            sunrise_idx: 6,
            sunset_idx: 18,
            ..SolarProfileConfig::default()
        }
    }

    #[test]
    fn zero_at_night() {
        let mut pv = SolarProfile::new(&cfg(), 24, 42);
        for t in 0..48 {
            let v = pv.value(t);
            let hour = t % 24;
            if !(6..18).contains(&hour) {
                assert_eq!(v, 0.0, "hour {hour} should be dark");
            }
        }
    }

    #[test]
    fn positive_and_bounded_in_daylight() {
        let mut pv = SolarProfile::new(&cfg(), 24, 42);
        for t in 0..24 {
            let v = pv.value(t);
            if (6..18).contains(&t) {
                assert!(v > 0.0 && v <= 1.0, "t={t} v={v}");
            }
        }
    }

    #[test]
    fn daylight_shape_peaks_mid_day() {
        let pv = SolarProfile::new(&cfg(), 24, 42);
        assert!(pv.daylight_frac(12) > pv.daylight_frac(7));
        assert!(pv.daylight_frac(11) > pv.daylight_frac(17));
        assert_eq!(pv.daylight_frac(5), 0.0);
    }

    #[test]
    fn no_noise_gives_clear_sky_curve() {
        let c = SolarProfileConfig {
            cloud_noise_std: 0.0,
            ..cfg()
        };
        let mut pv = SolarProfile::new(&c, 24, 1);
        let v = pv.value(12);
        assert!((v - c.peak * pv.daylight_frac(12)).abs() < 1e-12);
    }
}
