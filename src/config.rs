//! TOML-based scenario configuration and preset definitions.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Top-level scenario configuration parsed from TOML.
///
/// All sections have defaults matching the Germany study. Load from TOML
/// with [`ScenarioConfig::from_toml_file`] or use
/// [`ScenarioConfig::germany`] for the built-in default.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Bus and market clearing parameters.
    #[serde(default)]
    pub market: MarketConfig,
    /// Demand sheet column mapping.
    #[serde(default)]
    pub input: InputConfig,
    /// Generator fleet attached to the bus.
    #[serde(default = "germany_fleet")]
    pub generators: Vec<GeneratorConfig>,
    /// Parameters for synthetic snapshots when no demand sheet is given.
    #[serde(default)]
    pub synthetic: SyntheticConfig,
}

/// Bus and market clearing parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MarketConfig {
    /// Name of the single bus (also the prefix of every component name).
    pub bus: String,
    /// Duration of one snapshot in hours.
    pub snapshot_hours: f64,
    /// Price of unserved load (EUR/MWh). `None` makes scarcity infeasible.
    pub value_of_lost_load: Option<f64>,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            bus: "Germany".to_string(),
            snapshot_hours: 1.0,
            value_of_lost_load: None,
        }
    }
}

/// Demand sheet column mapping.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InputConfig {
    /// Header of the load column (MW).
    pub load_column: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            load_column: "Load (MW)".to_string(),
        }
    }
}

/// One generator record: a technology with fixed capacity and cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Technology name, unique within the scenario.
    pub technology: String,
    /// Nominal capacity (MW).
    pub p_nom_mw: f64,
    /// Marginal cost (EUR/MWh).
    pub marginal_cost: f64,
    /// Counted as renewable (RES) in reports and charts.
    #[serde(default)]
    pub renewable: bool,
    /// Demand sheet column holding the per-snapshot availability factor.
    /// `None` means the unit is always fully available.
    #[serde(default)]
    pub availability_column: Option<String>,
}

impl GeneratorConfig {
    fn firm(technology: &str, p_nom_mw: f64, marginal_cost: f64) -> Self {
        Self {
            technology: technology.to_string(),
            p_nom_mw,
            marginal_cost,
            renewable: false,
            availability_column: None,
        }
    }

    fn weather(technology: &str, p_nom_mw: f64, marginal_cost: f64, column: &str) -> Self {
        Self {
            technology: technology.to_string(),
            p_nom_mw,
            marginal_cost,
            renewable: true,
            availability_column: Some(column.to_string()),
        }
    }
}

/// Column holding offshore wind capacity factors.
pub const OFFSHORE_COLUMN: &str = "offshore capacity factor";
/// Column holding onshore wind capacity factors.
pub const ONSHORE_COLUMN: &str = "onshore capacity factor";
/// Column holding solar capacity factors.
pub const SOLAR_COLUMN: &str = "solar capacity factor";

/// German fleet: installed capacity (MW) and marginal cost (EUR/MWh).
fn germany_fleet() -> Vec<GeneratorConfig> {
    vec![
        GeneratorConfig::firm("brown_Coal", 15190.0, 40.0),
        GeneratorConfig::firm("hard_coal", 16003.0, 50.0),
        GeneratorConfig::firm("gas", 36664.0, 60.0),
        GeneratorConfig::firm("oil", 4442.0, 80.0),
        GeneratorConfig::firm("other_non_res", 3171.0, 30.0),
        GeneratorConfig::firm("hydro", 6439.0, 0.0),
        GeneratorConfig::firm("biomass", 9057.0, 20.0),
        GeneratorConfig::weather("offshore_wind", 9215.0, 0.0, OFFSHORE_COLUMN),
        GeneratorConfig::weather("onshore_wind", 62670.0, 0.0, ONSHORE_COLUMN),
        GeneratorConfig::weather("solar", 96095.0, 0.0, SOLAR_COLUMN),
    ]
}

/// Parameters for synthetic snapshots.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SyntheticConfig {
    /// Snapshots per simulated day (must be > 0).
    pub steps_per_day: usize,
    /// Number of simulated days (must be > 0).
    pub days: usize,
    /// Master random seed.
    pub seed: u64,
    /// Load profile.
    pub load: LoadProfileConfig,
    /// Solar availability profile.
    pub solar: SolarProfileConfig,
    /// Wind availability profiles, one per column.
    pub wind: Vec<WindProfileConfig>,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            steps_per_day: 24,
            days: 7,
            seed: 42,
            load: LoadProfileConfig::default(),
            solar: SolarProfileConfig::default(),
            wind: vec![
                WindProfileConfig {
                    column: OFFSHORE_COLUMN.to_string(),
                    mean: 0.45,
                    alpha: 0.9,
                    noise_std: 0.35,
                },
                WindProfileConfig {
                    column: ONSHORE_COLUMN.to_string(),
                    mean: 0.25,
                    alpha: 0.85,
                    noise_std: 0.3,
                },
            ],
        }
    }
}

/// Sinusoidal daily load profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoadProfileConfig {
    /// Mean load (MW).
    pub base_mw: f64,
    /// Daily swing amplitude (MW).
    pub amp_mw: f64,
    /// Phase offset (radians).
    pub phase_rad: f64,
    /// Gaussian noise standard deviation (MW).
    pub noise_std: f64,
}

impl Default for LoadProfileConfig {
    fn default() -> Self {
        Self {
            base_mw: 58000.0,
            amp_mw: 12000.0,
            phase_rad: -1.9,
            noise_std: 1500.0,
        }
    }
}

/// Daylight-shaped solar profile with AR(1) cloud cover.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SolarProfileConfig {
    /// Target column in the generated table.
    pub column: String,
    /// Capacity factor at solar noon under clear sky.
    pub peak: f64,
    /// Sunrise step index within the day (inclusive).
    pub sunrise_idx: usize,
    /// Sunset step index within the day (exclusive).
    pub sunset_idx: usize,
    /// AR(1) correlation of the cloud multiplier.
    pub alpha: f64,
    /// AR(1) innovation noise standard deviation.
    pub cloud_noise_std: f64,
}

impl Default for SolarProfileConfig {
    fn default() -> Self {
        Self {
            column: SOLAR_COLUMN.to_string(),
            peak: 0.7,
            sunrise_idx: 6,
            sunset_idx: 20,
            alpha: 0.8,
            cloud_noise_std: 0.6,
        }
    }
}

/// AR(1) wind capacity factor profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WindProfileConfig {
    /// Target column in the generated table.
    pub column: String,
    /// Long-run mean capacity factor.
    pub mean: f64,
    /// AR(1) correlation coefficient (0.0-1.0).
    pub alpha: f64,
    /// Innovation noise standard deviation.
    pub noise_std: f64,
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Clone, Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"market.snapshot_hours"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self::germany()
    }
}

impl ScenarioConfig {
    /// The German single-bus study: ten technologies, hourly snapshots.
    pub fn germany() -> Self {
        Self {
            market: MarketConfig::default(),
            input: InputConfig::default(),
            generators: germany_fleet(),
            synthetic: SyntheticConfig::default(),
        }
    }

    /// Germany without lignite and hard coal; scarcity priced at 3000 EUR/MWh.
    pub fn coal_exit() -> Self {
        let mut cfg = Self::germany();
        for g in &mut cfg.generators {
            if g.technology == "brown_Coal" || g.technology == "hard_coal" {
                g.p_nom_mw = 0.0;
            }
        }
        cfg.market.value_of_lost_load = Some(3000.0);
        cfg
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["germany", "coal_exit"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "germany" => Ok(Self::germany()),
            "coal_exit" => Ok(Self::coal_exit()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("scenario", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Availability columns referenced by the generator fleet, in fleet order.
    pub fn availability_columns(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.generators
            .iter()
            .filter_map(|g| g.availability_column.as_deref())
            .filter(|c| seen.insert(*c))
            .collect()
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        let m = &self.market;
        if m.bus.trim().is_empty() {
            errors.push(ConfigError::new("market.bus", "must not be empty"));
        }
        if !(m.snapshot_hours.is_finite() && m.snapshot_hours > 0.0) {
            errors.push(ConfigError::new(
                "market.snapshot_hours",
                "must be a finite number > 0",
            ));
        }
        if let Some(voll) = m.value_of_lost_load {
            if !(voll.is_finite() && voll > 0.0) {
                errors.push(ConfigError::new(
                    "market.value_of_lost_load",
                    "must be a finite number > 0",
                ));
            }
        }

        if self.input.load_column.trim().is_empty() {
            errors.push(ConfigError::new("input.load_column", "must not be empty"));
        }

        if self.generators.is_empty() {
            errors.push(ConfigError::new("generators", "at least one generator is required"));
        }
        let mut names = HashSet::new();
        for (i, g) in self.generators.iter().enumerate() {
            let at = |field: &str| format!("generators[{i}].{field}");
            if g.technology.trim().is_empty() {
                errors.push(ConfigError::new(at("technology"), "must not be empty"));
            } else if !names.insert(g.technology.as_str()) {
                errors.push(ConfigError::new(
                    at("technology"),
                    format!("duplicate technology \"{}\"", g.technology),
                ));
            }
            if !(g.p_nom_mw.is_finite() && g.p_nom_mw >= 0.0) {
                errors.push(ConfigError::new(at("p_nom_mw"), "must be a finite number >= 0"));
            }
            if !g.marginal_cost.is_finite() {
                errors.push(ConfigError::new(at("marginal_cost"), "must be finite"));
            }
            if g
                .availability_column
                .as_deref()
                .is_some_and(|c| c.trim().is_empty())
            {
                errors.push(ConfigError::new(at("availability_column"), "must not be empty"));
            }
        }

        let s = &self.synthetic;
        if s.steps_per_day == 0 {
            errors.push(ConfigError::new("synthetic.steps_per_day", "must be > 0"));
        }
        if s.days == 0 {
            errors.push(ConfigError::new("synthetic.days", "must be > 0"));
        }
        if s.solar.sunrise_idx >= s.solar.sunset_idx {
            errors.push(ConfigError::new(
                "synthetic.solar.sunrise_idx",
                "must be < synthetic.solar.sunset_idx",
            ));
        }
        if s.steps_per_day > 0 && s.solar.sunset_idx > s.steps_per_day {
            errors.push(ConfigError::new(
                "synthetic.solar.sunset_idx",
                "must be <= synthetic.steps_per_day",
            ));
        }
        if !(0.0..=1.0).contains(&s.solar.alpha) {
            errors.push(ConfigError::new("synthetic.solar.alpha", "must be in [0.0, 1.0]"));
        }
        for (i, w) in s.wind.iter().enumerate() {
            if !(0.0..=1.0).contains(&w.alpha) {
                errors.push(ConfigError::new(
                    format!("synthetic.wind[{i}].alpha"),
                    "must be in [0.0, 1.0]",
                ));
            }
            if !(0.0..=1.0).contains(&w.mean) {
                errors.push(ConfigError::new(
                    format!("synthetic.wind[{i}].mean"),
                    "must be in [0.0, 1.0]",
                ));
            }
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn germany_preset_valid() {
        let cfg = ScenarioConfig::germany();
        let errors = cfg.validate();
        assert!(errors.is_empty(), "germany should be valid: {errors:?}");
    }

    #[test]
    fn germany_has_ten_generators_with_study_values() {
        let cfg = ScenarioConfig::germany();
        assert_eq!(cfg.generators.len(), 10);
        let gas = cfg.generators.iter().find(|g| g.technology == "gas");
        assert_eq!(gas.map(|g| (g.p_nom_mw, g.marginal_cost)), Some((36664.0, 60.0)));
        let renewables: Vec<&str> = cfg
            .generators
            .iter()
            .filter(|g| g.renewable)
            .map(|g| g.technology.as_str())
            .collect();
        assert_eq!(renewables, vec!["offshore_wind", "onshore_wind", "solar"]);
    }

    #[test]
    fn availability_columns_follow_fleet_order() {
        let cfg = ScenarioConfig::germany();
        assert_eq!(
            cfg.availability_columns(),
            vec![OFFSHORE_COLUMN, ONSHORE_COLUMN, SOLAR_COLUMN]
        );
    }

    #[test]
    fn from_preset_unknown() {
        let err = ScenarioConfig::from_preset("nonexistent");
        assert!(err.is_err());
        let e = err.unwrap_err();
        assert!(e.message.contains("unknown preset"));
    }

    #[test]
    fn all_presets_are_valid() {
        for name in ScenarioConfig::PRESETS {
            let cfg = ScenarioConfig::from_preset(name);
            assert!(cfg.is_ok(), "preset \"{name}\" should load");
            let errors = cfg.as_ref().map(|c| c.validate()).unwrap_or_default();
            assert!(errors.is_empty(), "preset \"{name}\" should be valid: {errors:?}");
        }
    }

    #[test]
    fn coal_exit_removes_coal_and_prices_scarcity() {
        let cfg = ScenarioConfig::coal_exit();
        let coal: f64 = cfg
            .generators
            .iter()
            .filter(|g| g.technology.contains("oal"))
            .map(|g| g.p_nom_mw)
            .sum();
        assert_eq!(coal, 0.0);
        assert_eq!(cfg.market.value_of_lost_load, Some(3000.0));
    }

    #[test]
    fn valid_toml_parses() {
        let toml = r#"
[market]
bus = "Austria"
snapshot_hours = 0.25
value_of_lost_load = 5000.0

[input]
load_column = "demand_mw"

[[generators]]
technology = "hydro"
p_nom_mw = 14000.0
marginal_cost = 0.0

[[generators]]
technology = "wind"
p_nom_mw = 3500.0
marginal_cost = 0.0
renewable = true
availability_column = "wind_cf"

[synthetic]
days = 2
seed = 7
"#;
        let cfg = ScenarioConfig::from_toml_str(toml);
        assert!(cfg.is_ok(), "valid TOML should parse: {:?}", cfg.err());
        let cfg = cfg.ok();
        assert_eq!(cfg.as_ref().map(|c| c.market.bus.as_str()), Some("Austria"));
        assert_eq!(cfg.as_ref().map(|c| c.generators.len()), Some(2));
        assert_eq!(cfg.as_ref().map(|c| c.availability_columns()), Some(vec!["wind_cf"]));
        assert_eq!(cfg.as_ref().map(|c| c.synthetic.steps_per_day), Some(24));
    }

    #[test]
    fn partial_toml_uses_germany_defaults() {
        let toml = r#"
[market]
value_of_lost_load = 1000.0
"#;
        let cfg = ScenarioConfig::from_toml_str(toml);
        assert!(cfg.is_ok());
        let cfg = cfg.ok();
        assert_eq!(cfg.as_ref().map(|c| c.market.bus.as_str()), Some("Germany"));
        assert_eq!(cfg.as_ref().map(|c| c.generators.len()), Some(10));
        assert_eq!(
            cfg.as_ref().map(|c| c.input.load_column.as_str()),
            Some("Load (MW)")
        );
    }

    #[test]
    fn invalid_toml_unknown_field() {
        let toml = r#"
[market]
bus = "Germany"
bogus_field = true
"#;
        assert!(ScenarioConfig::from_toml_str(toml).is_err());
    }

    #[test]
    fn validation_catches_duplicate_technology() {
        let mut cfg = ScenarioConfig::germany();
        cfg.generators[1].technology = "brown_Coal".to_string();
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "generators[1].technology"));
    }

    #[test]
    fn validation_catches_negative_capacity_and_nan_cost() {
        let mut cfg = ScenarioConfig::germany();
        cfg.generators[0].p_nom_mw = -1.0;
        cfg.generators[2].marginal_cost = f64::NAN;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "generators[0].p_nom_mw"));
        assert!(errors.iter().any(|e| e.field == "generators[2].marginal_cost"));
    }

    #[test]
    fn validation_catches_zero_snapshot_hours() {
        let mut cfg = ScenarioConfig::germany();
        cfg.market.snapshot_hours = 0.0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "market.snapshot_hours"));
    }

    #[test]
    fn validation_catches_bad_synthetic_daylight() {
        let mut cfg = ScenarioConfig::germany();
        cfg.synthetic.solar.sunrise_idx = 20;
        cfg.synthetic.solar.sunset_idx = 30;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "synthetic.solar.sunset_idx"));
    }

    #[test]
    fn validation_reports_every_problem() {
        let mut cfg = ScenarioConfig::germany();
        cfg.market.bus = " ".to_string();
        cfg.generators.clear();
        cfg.synthetic.days = 0;
        let errors = cfg.validate();
        assert_eq!(errors.len(), 3, "{errors:?}");
    }
}
