//! Post-hoc market indicators computed from a dispatch result.

use std::fmt;

use serde::Serialize;

use super::types::DispatchResult;

/// Energy and price-setting statistics for one technology.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TechnologyReport {
    pub technology: String,
    /// Energy produced over the horizon (MWh).
    pub energy_mwh: f64,
    /// Energy produced relative to nominal capacity over the horizon (%).
    pub capacity_factor_pct: f64,
    /// Number of snapshots in which this technology set the price.
    pub price_setting_snapshots: usize,
}

/// Aggregate market indicators for a complete run.
///
/// Computed post-hoc from [`DispatchResult`] so the report always agrees
/// with the per-snapshot data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketReport {
    pub snapshots: usize,
    /// Total system cost (EUR).
    pub total_cost_eur: f64,
    /// Load served (MWh).
    pub energy_served_mwh: f64,
    /// Renewable generation (MWh).
    pub res_energy_mwh: f64,
    /// Renewable share of generation (%).
    pub res_share_pct: f64,
    /// Renewable energy available but not dispatched (MWh).
    pub res_curtailed_mwh: f64,
    /// Load not served (MWh).
    pub unserved_mwh: f64,
    /// Highest load (MW).
    pub peak_load_mw: f64,
    /// Unweighted mean of the marginal price (EUR/MWh).
    pub mean_price: f64,
    /// Load-weighted mean of the marginal price (EUR/MWh).
    pub load_weighted_price: f64,
    pub min_price: f64,
    pub max_price: f64,
    /// Per-technology breakdown, in generator order.
    pub technologies: Vec<TechnologyReport>,
}

impl MarketReport {
    /// Computes all indicators from a dispatch result.
    pub fn from_result(result: &DispatchResult) -> Self {
        let h = result.snapshot_hours;
        let n = result.snapshots.len();

        let mut energy_mwh = vec![0.0_f64; result.generators.len()];
        let mut price_setting = vec![0_usize; result.generators.len()];

        let mut served = 0.0_f64;
        let mut res = 0.0_f64;
        let mut generation = 0.0_f64;
        let mut curtailed = 0.0_f64;
        let mut unserved = 0.0_f64;
        let mut peak_load = 0.0_f64;
        let mut price_sum = 0.0_f64;
        let mut weighted_price_sum = 0.0_f64;
        let mut load_sum = 0.0_f64;
        let mut min_price = f64::INFINITY;
        let mut max_price = f64::NEG_INFINITY;

        for s in &result.snapshots {
            served += (s.load_mw - s.unserved_mw) * h;
            res += s.res_generation_mw * h;
            generation += s.total_generation_mw * h;
            curtailed += s.res_curtailed_mw * h;
            unserved += s.unserved_mw * h;
            peak_load = peak_load.max(s.load_mw);

            price_sum += s.marginal_price;
            weighted_price_sum += s.marginal_price * s.load_mw;
            load_sum += s.load_mw;
            min_price = min_price.min(s.marginal_price);
            max_price = max_price.max(s.marginal_price);

            for (e, p) in energy_mwh.iter_mut().zip(&s.generator_p_mw) {
                *e += p * h;
            }
            if let Some(slot) = s.price_setter.and_then(|i| price_setting.get_mut(i)) {
                *slot += 1;
            }
        }

        let horizon_h = n as f64 * h;
        let technologies = result
            .generators
            .iter()
            .zip(energy_mwh)
            .zip(price_setting)
            .map(|((g, energy), setting)| TechnologyReport {
                technology: g.technology.clone(),
                energy_mwh: energy,
                capacity_factor_pct: if g.p_nom_mw > 0.0 && horizon_h > 0.0 {
                    100.0 * energy / (g.p_nom_mw * horizon_h)
                } else {
                    0.0
                },
                price_setting_snapshots: setting,
            })
            .collect();

        let (min_price, max_price) = if n == 0 {
            (0.0, 0.0)
        } else {
            (min_price, max_price)
        };

        Self {
            snapshots: n,
            total_cost_eur: result.objective,
            energy_served_mwh: served,
            res_energy_mwh: res,
            res_share_pct: if generation > 0.0 {
                100.0 * res / generation
            } else {
                0.0
            },
            res_curtailed_mwh: curtailed,
            unserved_mwh: unserved,
            peak_load_mw: peak_load,
            mean_price: if n > 0 { price_sum / n as f64 } else { 0.0 },
            load_weighted_price: if load_sum > 0.0 {
                weighted_price_sum / load_sum
            } else {
                0.0
            },
            min_price,
            max_price,
            technologies,
        }
    }
}

impl fmt::Display for MarketReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Market Report ---")?;
        writeln!(f, "Snapshots:             {}", self.snapshots)?;
        writeln!(f, "Total system cost:     {:.0} EUR", self.total_cost_eur)?;
        writeln!(f, "Energy served:         {:.1} MWh", self.energy_served_mwh)?;
        writeln!(f, "RES share:             {:.1}%", self.res_share_pct)?;
        writeln!(f, "RES curtailed:         {:.1} MWh", self.res_curtailed_mwh)?;
        writeln!(f, "Unserved energy:       {:.1} MWh", self.unserved_mwh)?;
        writeln!(f, "Peak load:             {:.1} MW", self.peak_load_mw)?;
        writeln!(f, "Mean marginal price:   {:.2} EUR/MWh", self.mean_price)?;
        writeln!(f, "Load-weighted price:   {:.2} EUR/MWh", self.load_weighted_price)?;
        write!(
            f,
            "Price range:           {:.2} .. {:.2} EUR/MWh",
            self.min_price, self.max_price
        )?;
        for t in &self.technologies {
            write!(
                f,
                "\n  {:<16} {:>12.1} MWh  CF={:>5.1}%  price-setting={}",
                t.technology, t.energy_mwh, t.capacity_factor_pct, t.price_setting_snapshots
            )?;
        }
        Ok(())
    }
}
