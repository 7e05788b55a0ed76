//! Market clearing over all snapshots of a [`Network`].

use std::time::Instant;

use tracing::{debug, info};

use super::dispatch::{DispatchError, Offer, clear};
use super::network::Network;
use super::types::{DispatchResult, GeneratorInfo, SnapshotResult};

/// Solves the dispatch for every snapshot of `network`.
///
/// Snapshots are independent (no storage, no ramping), so each one is
/// cleared on its own and the objective is the sum of the per-snapshot
/// costs weighted by the snapshot duration.
///
/// # Errors
///
/// Returns the first infeasible snapshot when no value of lost load is set.
pub fn optimize(network: &Network) -> Result<DispatchResult, DispatchError> {
    let start = Instant::now();
    let generators = network.generators();
    let voll = network.value_of_lost_load();
    let hours = network.snapshot_hours();

    info!(
        bus = network.bus(),
        snapshots = network.snapshots(),
        generators = generators.len(),
        "optimizing dispatch"
    );

    let mut snapshots = Vec::with_capacity(network.snapshots());
    let mut objective = 0.0_f64;

    for t in 0..network.snapshots() {
        let offers: Vec<Offer> = generators
            .iter()
            .map(|g| Offer {
                available_mw: g.available_mw(t),
                marginal_cost: g.marginal_cost,
            })
            .collect();
        let load_mw = network.load_at(t);
        let cleared = clear(&offers, load_mw, voll, t)?;
        objective += cleared.cost_per_hour(&offers, voll) * hours;

        let mut res = 0.0_f64;
        let mut non_res = 0.0_f64;
        let mut curtailed = 0.0_f64;
        for ((g, offer), &p) in generators.iter().zip(&offers).zip(&cleared.p_mw) {
            if g.renewable {
                res += p;
                curtailed += (offer.available_mw - p).max(0.0);
            } else {
                non_res += p;
            }
        }

        if cleared.unserved_mw > 0.0 {
            debug!(snapshot = t, unserved_mw = cleared.unserved_mw, "load shed");
        }

        snapshots.push(SnapshotResult {
            snapshot: t,
            load_mw,
            total_generation_mw: res + non_res,
            res_generation_mw: res,
            non_res_generation_mw: non_res,
            res_curtailed_mw: curtailed,
            marginal_price: cleared.marginal_price,
            unserved_mw: cleared.unserved_mw,
            generator_p_mw: cleared.p_mw,
            price_setter: cleared.price_setter,
        });
    }

    info!(
        objective_eur = objective,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "optimization finished"
    );

    Ok(DispatchResult {
        bus: network.bus().to_string(),
        snapshot_hours: hours,
        generators: generators
            .iter()
            .map(|g| GeneratorInfo {
                name: g.name.clone(),
                technology: g.technology.clone(),
                p_nom_mw: g.p_nom_mw,
                marginal_cost: g.marginal_cost,
                renewable: g.renewable,
            })
            .collect(),
        snapshots,
        objective,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::network::{Availability, Generator, Load};

    fn network(load: Vec<f64>, solar_cf: Vec<f64>, voll: Option<f64>) -> Network {
        let mut n = Network::new("DE");
        n.set_snapshots(load.len());
        n.set_value_of_lost_load(voll);
        let add = |n: &mut Network, tech: &str, p_nom: f64, cost: f64, pu: Availability, res: bool| {
            n.add_generator(Generator {
                name: format!("DE {tech}"),
                technology: tech.to_string(),
                bus: "DE".to_string(),
                p_nom_mw: p_nom,
                marginal_cost: cost,
                p_max_pu: pu,
                renewable: res,
            })
        };
        assert!(add(&mut n, "solar", 100.0, 0.0, Availability::Series(solar_cf), true).is_ok());
        assert!(add(&mut n, "coal", 100.0, 40.0, Availability::Constant(1.0), false).is_ok());
        assert!(add(&mut n, "gas", 100.0, 60.0, Availability::Constant(1.0), false).is_ok());
        assert!(
            n.add_load(Load {
                name: "DE load".to_string(),
                bus: "DE".to_string(),
                p_set_mw: load,
            })
            .is_ok()
        );
        n
    }

    #[test]
    fn per_snapshot_balance_and_prices() {
        let n = network(vec![50.0, 150.0, 180.0], vec![1.0, 0.5, 0.0], None);
        let r = optimize(&n).unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(r.len(), 3);
        assert_eq!(r.marginal_price(), vec![0.0, 40.0, 60.0]);
        for s in &r.snapshots {
            assert!((s.total_generation_mw - s.load_mw).abs() < 1e-6);
            assert!((s.res_generation_mw + s.non_res_generation_mw - s.total_generation_mw).abs() < 1e-9);
        }
        assert_eq!(r.price_setter_technology(1), Some("coal"));
    }

    #[test]
    fn curtailment_counts_unused_renewables() {
        let n = network(vec![50.0], vec![1.0], None);
        let r = optimize(&n).unwrap_or_else(|e| panic!("{e}"));
        assert!((r.snapshots[0].res_curtailed_mw - 50.0).abs() < 1e-9);
    }

    #[test]
    fn objective_sums_cost_times_duration() {
        let mut n = network(vec![150.0, 150.0], vec![0.0, 0.0], None);
        n.set_snapshot_hours(0.5);
        let r = optimize(&n).unwrap_or_else(|e| panic!("{e}"));
        // each snapshot: 100 MW coal @40 + 50 MW gas @60 = 7000 EUR/h
        assert!((r.objective - 7000.0).abs() < 1e-6);
    }

    #[test]
    fn infeasible_snapshot_aborts() {
        let n = network(vec![100.0, 400.0], vec![0.0, 0.0], None);
        let err = optimize(&n);
        assert!(matches!(err, Err(DispatchError::Infeasible { snapshot: 1, .. })));
    }

    #[test]
    fn voll_allows_shedding() {
        let n = network(vec![400.0], vec![0.5], Some(1000.0));
        let r = optimize(&n).unwrap_or_else(|e| panic!("{e}"));
        assert!((r.snapshots[0].unserved_mw - 150.0).abs() < 1e-6);
        assert_eq!(r.snapshots[0].marginal_price, 1000.0);
    }

    #[test]
    fn voll_below_peaker_cost_sheds_rather_than_runs_gas() {
        let n = network(vec![150.0], vec![0.0], Some(50.0));
        let r = optimize(&n).unwrap_or_else(|e| panic!("{e}"));
        let s = &r.snapshots[0];
        assert_eq!(r.generator_series("gas"), Some(vec![0.0]));
        assert!((s.unserved_mw - 50.0).abs() < 1e-6);
        assert_eq!(s.marginal_price, 50.0);
        // 100 MW coal @40 + 50 MW shed @50
        assert!((r.objective - 6500.0).abs() < 1e-6);
    }
}
