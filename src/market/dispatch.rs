//! Merit-order economic dispatch for one snapshot.
//!
//! Solves `min Σ c_g p_g + VoLL · shed` subject to `Σ p_g + shed = load` and
//! `0 <= p_g <= available_g`. On a single bus without inter-temporal
//! constraints the optimum is the merit-order stack with shedding as an
//! unlimited tranche at VoLL, and the dual of the balance constraint is the
//! marginal cost of the tranche that serves the last MW.

use std::cmp::Ordering;

use serde::Serialize;
use thiserror::Error;

/// Dispatch below this many MW is treated as zero.
const MW_TOLERANCE: f64 = 1e-6;
/// Offers whose marginal costs differ by less than this share one tranche.
const COST_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Error, PartialEq)]
pub enum DispatchError {
    #[error(
        "snapshot {snapshot} is infeasible: load {load_mw:.1} MW exceeds available capacity \
         {available_mw:.1} MW (set market.value_of_lost_load to allow load shedding)"
    )]
    Infeasible {
        snapshot: usize,
        load_mw: f64,
        available_mw: f64,
    },
}

/// Capacity a generator offers at one snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Offer {
    /// Available capacity (MW), `p_nom * p_max_pu`.
    pub available_mw: f64,
    /// Marginal cost (EUR/MWh).
    pub marginal_cost: f64,
}

/// Cleared dispatch for one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnapshotDispatch {
    /// Output per offer, in offer order (MW).
    pub p_mw: Vec<f64>,
    /// Shadow price of the power balance (EUR/MWh).
    pub marginal_price: f64,
    /// Load not served (MW); non-zero only with a value of lost load.
    pub unserved_mw: f64,
    /// Offer index that set the price; `None` when load is shed or no
    /// capacity exists.
    pub price_setter: Option<usize>,
}

impl SnapshotDispatch {
    /// Dispatch cost of this snapshot per hour (EUR/h).
    pub fn cost_per_hour(&self, offers: &[Offer], value_of_lost_load: Option<f64>) -> f64 {
        let generation: f64 = offers
            .iter()
            .zip(&self.p_mw)
            .map(|(o, p)| o.marginal_cost * p)
            .sum();
        generation + self.unserved_mw * value_of_lost_load.unwrap_or(0.0)
    }
}

/// Clears one snapshot.
///
/// Offers with equal marginal cost form a tranche and share its dispatch
/// pro rata to their available capacity.
///
/// # Errors
///
/// Returns [`DispatchError::Infeasible`] when load exceeds total available
/// capacity and no value of lost load is set.
///
/// With a value of lost load, offers priced above it are never dispatched.
pub fn clear(
    offers: &[Offer],
    load_mw: f64,
    value_of_lost_load: Option<f64>,
    snapshot: usize,
) -> Result<SnapshotDispatch, DispatchError> {
    let mut order: Vec<usize> = (0..offers.len()).collect();
    order.sort_by(|&a, &b| {
        offers[a]
            .marginal_cost
            .partial_cmp(&offers[b].marginal_cost)
            .unwrap_or(Ordering::Equal)
    });

    let mut p_mw = vec![0.0; offers.len()];
    let mut remaining = load_mw.max(0.0);
    let mut marginal: Option<(f64, usize)> = None;
    let mut cheapest_available: Option<(f64, usize)> = None;

    for tranche in tranches(&order, offers) {
        let available: f64 = tranche.iter().map(|&i| offers[i].available_mw.max(0.0)).sum();
        if available <= 0.0 {
            continue;
        }
        let cost = offers[tranche[0]].marginal_cost;
        let lead = tranche
            .iter()
            .copied()
            .find(|&i| offers[i].available_mw > 0.0)
            .unwrap_or(tranche[0]);
        if cheapest_available.is_none() {
            cheapest_available = Some((cost, lead));
        }
        if remaining <= MW_TOLERANCE {
            break;
        }
        // Offers dearer than lost load stay off; the rest is shed.
        if value_of_lost_load.is_some_and(|voll| cost > voll) {
            break;
        }

        let take = remaining.min(available);
        let share = take / available;
        for &i in tranche {
            p_mw[i] = offers[i].available_mw.max(0.0) * share;
        }
        remaining -= take;
        marginal = Some((cost, lead));
    }

    if remaining > MW_TOLERANCE {
        return match value_of_lost_load {
            Some(voll) => Ok(SnapshotDispatch {
                p_mw,
                marginal_price: voll,
                unserved_mw: remaining,
                price_setter: None,
            }),
            None => Err(DispatchError::Infeasible {
                snapshot,
                load_mw,
                available_mw: load_mw - remaining,
            }),
        };
    }

    let (marginal_price, price_setter) = match marginal.or(cheapest_available) {
        Some((cost, idx)) => (cost, Some(idx)),
        None => (0.0, None),
    };

    Ok(SnapshotDispatch {
        p_mw,
        marginal_price,
        unserved_mw: 0.0,
        price_setter,
    })
}

/// Splits merit-ordered offer indices into equal-cost groups.
fn tranches<'a>(order: &'a [usize], offers: &'a [Offer]) -> impl Iterator<Item = &'a [usize]> {
    order.chunk_by(move |&a, &b| {
        (offers[a].marginal_cost - offers[b].marginal_cost).abs() <= COST_TOLERANCE
    })
}
