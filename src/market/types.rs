//! Solved-model types: generator metadata, per-snapshot results, and the
//! complete dispatch result.

use std::fmt;

use serde::Serialize;

/// Static description of a dispatched generator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneratorInfo {
    /// Component name, `"{bus} {technology}"`.
    pub name: String,
    pub technology: String,
    /// Nominal capacity (MW).
    pub p_nom_mw: f64,
    /// Marginal cost (EUR/MWh).
    pub marginal_cost: f64,
    pub renewable: bool,
}

/// Complete record of one cleared snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnapshotResult {
    /// Snapshot index (row order of the input).
    pub snapshot: usize,
    /// Demand (MW).
    pub load_mw: f64,
    /// Sum of all generator output (MW).
    pub total_generation_mw: f64,
    /// Output of renewable generators (MW).
    pub res_generation_mw: f64,
    /// Output of all other generators (MW).
    pub non_res_generation_mw: f64,
    /// Renewable capacity available but not dispatched (MW).
    pub res_curtailed_mw: f64,
    /// Bus marginal price (EUR/MWh).
    pub marginal_price: f64,
    /// Load not served (MW).
    pub unserved_mw: f64,
    /// Output per generator, in [`DispatchResult::generators`] order (MW).
    pub generator_p_mw: Vec<f64>,
    /// Index of the generator that set the price, if any.
    pub price_setter: Option<usize>,
}

impl fmt::Display for SnapshotResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "t={:>4} | load={:>9.1} MW  gen={:>9.1} MW (RES={:>9.1}  non-RES={:>9.1}) \
             | price={:>7.2} EUR/MWh",
            self.snapshot,
            self.load_mw,
            self.total_generation_mw,
            self.res_generation_mw,
            self.non_res_generation_mw,
            self.marginal_price,
        )?;
        if self.unserved_mw > 0.0 {
            write!(f, "  unserved={:.1} MW", self.unserved_mw)?;
        }
        Ok(())
    }
}

/// Output of [`crate::market::engine::optimize`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DispatchResult {
    /// Bus name.
    pub bus: String,
    /// Snapshot duration (hours).
    pub snapshot_hours: f64,
    /// Generators in network order.
    pub generators: Vec<GeneratorInfo>,
    /// One entry per snapshot, in order.
    pub snapshots: Vec<SnapshotResult>,
    /// Total system cost over the horizon (EUR).
    pub objective: f64,
}

impl DispatchResult {
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    fn series(&self, f: impl Fn(&SnapshotResult) -> f64) -> Vec<f64> {
        self.snapshots.iter().map(f).collect()
    }

    pub fn load_curve(&self) -> Vec<f64> {
        self.series(|s| s.load_mw)
    }

    pub fn total_generation(&self) -> Vec<f64> {
        self.series(|s| s.total_generation_mw)
    }

    pub fn res_generation(&self) -> Vec<f64> {
        self.series(|s| s.res_generation_mw)
    }

    pub fn non_res_generation(&self) -> Vec<f64> {
        self.series(|s| s.non_res_generation_mw)
    }

    pub fn marginal_price(&self) -> Vec<f64> {
        self.series(|s| s.marginal_price)
    }

    /// Output series of the generator named `name` (component name or
    /// technology).
    pub fn generator_series(&self, name: &str) -> Option<Vec<f64>> {
        let idx = self
            .generators
            .iter()
            .position(|g| g.name == name || g.technology == name)?;
        Some(self.series(|s| s.generator_p_mw.get(idx).copied().unwrap_or(0.0)))
    }

    /// Technology of the price-setting generator at `snapshot`.
    pub fn price_setter_technology(&self, snapshot: usize) -> Option<&str> {
        let idx = self.snapshots.get(snapshot)?.price_setter?;
        self.generators.get(idx).map(|g| g.technology.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result() -> DispatchResult {
        DispatchResult {
            bus: "DE".to_string(),
            snapshot_hours: 1.0,
            generators: vec![
                GeneratorInfo {
                    name: "DE solar".to_string(),
                    technology: "solar".to_string(),
                    p_nom_mw: 100.0,
                    marginal_cost: 0.0,
                    renewable: true,
                },
                GeneratorInfo {
                    name: "DE gas".to_string(),
                    technology: "gas".to_string(),
                    p_nom_mw: 100.0,
                    marginal_cost: 60.0,
                    renewable: false,
                },
            ],
            snapshots: (0..3)
                .map(|t| SnapshotResult {
                    snapshot: t,
                    load_mw: 100.0 + t as f64,
                    total_generation_mw: 100.0 + t as f64,
                    res_generation_mw: 50.0,
                    non_res_generation_mw: 50.0 + t as f64,
                    res_curtailed_mw: 0.0,
                    marginal_price: 60.0,
                    unserved_mw: 0.0,
                    generator_p_mw: vec![50.0, 50.0 + t as f64],
                    price_setter: Some(1),
                })
                .collect(),
            objective: 0.0,
        }
    }

    #[test]
    fn series_accessors_follow_snapshot_order() {
        let r = result();
        assert_eq!(r.load_curve(), vec![100.0, 101.0, 102.0]);
        assert_eq!(r.marginal_price(), vec![60.0; 3]);
        assert_eq!(r.generator_series("gas"), Some(vec![50.0, 51.0, 52.0]));
        assert_eq!(r.generator_series("DE solar"), Some(vec![50.0; 3]));
        assert_eq!(r.generator_series("coal"), None);
    }

    #[test]
    fn price_setter_technology_resolves_index() {
        let r = result();
        assert_eq!(r.price_setter_technology(0), Some("gas"));
        assert_eq!(r.price_setter_technology(9), None);
    }

    #[test]
    fn display_mentions_unserved_only_when_shedding() {
        let mut s = result().snapshots[0].clone();
        assert!(!format!("{s}").contains("unserved"));
        s.unserved_mw = 12.0;
        assert!(format!("{s}").contains("unserved=12.0 MW"));
    }
}
