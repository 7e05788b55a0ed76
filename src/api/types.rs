//! API response and query types.
//!
//! Field names match the CSV export columns where both exist.

use serde::{Deserialize, Serialize};

use crate::market::kpi::MarketReport;
use crate::market::types::{DispatchResult, GeneratorInfo, SnapshotResult};

/// Scenario metadata plus the aggregate report.
#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub bus: String,
    pub snapshot_hours: f64,
    pub generators: usize,
    pub report: MarketReport,
}

impl SummaryResponse {
    pub fn new(result: &DispatchResult, report: &MarketReport) -> Self {
        Self {
            bus: result.bus.clone(),
            snapshot_hours: result.snapshot_hours,
            generators: result.generators.len(),
            report: report.clone(),
        }
    }
}

/// One cleared snapshot.
#[derive(Debug, Serialize)]
pub struct SnapshotRecord {
    pub snapshot: usize,
    pub load_mw: f64,
    pub total_generation_mw: f64,
    pub res_generation_mw: f64,
    pub non_res_generation_mw: f64,
    pub marginal_price_eur_per_mwh: f64,
    pub unserved_mw: f64,
    /// Technology that set the price; absent when load was shed.
    pub price_setter: Option<String>,
}

impl SnapshotRecord {
    pub fn new(s: &SnapshotResult, generators: &[GeneratorInfo]) -> Self {
        Self {
            snapshot: s.snapshot,
            load_mw: s.load_mw,
            total_generation_mw: s.total_generation_mw,
            res_generation_mw: s.res_generation_mw,
            non_res_generation_mw: s.non_res_generation_mw,
            marginal_price_eur_per_mwh: s.marginal_price,
            unserved_mw: s.unserved_mw,
            price_setter: s
                .price_setter
                .and_then(|i| generators.get(i))
                .map(|g| g.technology.clone()),
        }
    }
}

/// A generator and its totals over the horizon.
#[derive(Debug, Serialize)]
pub struct GeneratorRecord {
    pub name: String,
    pub technology: String,
    pub p_nom_mw: f64,
    pub marginal_cost: f64,
    pub renewable: bool,
    pub energy_mwh: f64,
    pub capacity_factor_pct: f64,
    pub price_setting_snapshots: usize,
}

/// Optional range query parameters for the snapshots endpoint.
#[derive(Debug, Deserialize)]
pub struct SnapshotQuery {
    /// First snapshot (inclusive).
    pub from: Option<usize>,
    /// Last snapshot (inclusive).
    pub to: Option<usize>,
}

/// Error response body for 400-class errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_record_names_price_setter() {
        let generators = vec![GeneratorInfo {
            name: "DE gas".to_string(),
            technology: "gas".to_string(),
            p_nom_mw: 100.0,
            marginal_cost: 60.0,
            renewable: false,
        }];
        let mut s = SnapshotResult {
            snapshot: 3,
            load_mw: 80.0,
            total_generation_mw: 80.0,
            res_generation_mw: 0.0,
            non_res_generation_mw: 80.0,
            res_curtailed_mw: 0.0,
            marginal_price: 60.0,
            unserved_mw: 0.0,
            generator_p_mw: vec![80.0],
            price_setter: Some(0),
        };
        let record = SnapshotRecord::new(&s, &generators);
        assert_eq!(record.snapshot, 3);
        assert_eq!(record.marginal_price_eur_per_mwh, 60.0);
        assert_eq!(record.price_setter.as_deref(), Some("gas"));

        s.price_setter = None;
        assert!(SnapshotRecord::new(&s, &generators).price_setter.is_none());
    }
}
