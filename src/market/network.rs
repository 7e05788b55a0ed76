//! Single-bus network model: bus, generators, and load.

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::ScenarioConfig;
use crate::io::input::SnapshotTable;

/// Errors raised while registering components.
#[derive(Debug, Error, PartialEq)]
pub enum NetworkError {
    #[error("component \"{0}\" already exists")]
    DuplicateName(String),
    #[error("component \"{component}\" references unknown bus \"{bus}\"")]
    UnknownBus { component: String, bus: String },
    #[error("component \"{component}\" has {got} values, expected one per snapshot ({expected})")]
    LengthMismatch {
        component: String,
        expected: usize,
        got: usize,
    },
    #[error("generator \"{component}\" reads availability from missing column \"{column}\"")]
    UnknownColumn { component: String, column: String },
    #[error("network has no snapshots")]
    NoSnapshots,
}

/// Per-unit availability of a generator (`p_max_pu`).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Availability {
    /// Same fraction in every snapshot.
    Constant(f64),
    /// One fraction per snapshot.
    Series(Vec<f64>),
}

impl Availability {
    /// Availability fraction at `snapshot`.
    pub fn at(&self, snapshot: usize) -> f64 {
        match self {
            Self::Constant(v) => *v,
            Self::Series(s) => s.get(snapshot).copied().unwrap_or(0.0),
        }
    }

    fn len(&self) -> Option<usize> {
        match self {
            Self::Constant(_) => None,
            Self::Series(s) => Some(s.len()),
        }
    }
}

/// A generator record attached to the bus.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Generator {
    /// Component name, `"{bus} {technology}"`.
    pub name: String,
    pub technology: String,
    pub bus: String,
    /// Nominal capacity (MW).
    pub p_nom_mw: f64,
    /// Marginal cost (EUR/MWh).
    pub marginal_cost: f64,
    pub p_max_pu: Availability,
    pub renewable: bool,
}

impl Generator {
    /// Available capacity (MW) at `snapshot`.
    pub fn available_mw(&self, snapshot: usize) -> f64 {
        (self.p_nom_mw * self.p_max_pu.at(snapshot)).max(0.0)
    }
}

/// A time-varying fixed load.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Load {
    pub name: String,
    pub bus: String,
    /// Demand per snapshot (MW).
    pub p_set_mw: Vec<f64>,
}

/// The single-bus market model handed to [`crate::market::engine::optimize`].
#[derive(Debug, Clone, Default)]
pub struct Network {
    buses: Vec<String>,
    snapshots: usize,
    snapshot_hours: f64,
    value_of_lost_load: Option<f64>,
    generators: Vec<Generator>,
    loads: Vec<Load>,
}

impl Network {
    /// Creates a network with one bus and no snapshots.
    pub fn new(bus: impl Into<String>) -> Self {
        Self {
            buses: vec![bus.into()],
            snapshot_hours: 1.0,
            ..Self::default()
        }
    }

    /// Sets the number of snapshots; series added later must match it.
    pub fn set_snapshots(&mut self, n: usize) {
        self.snapshots = n;
    }

    pub fn set_snapshot_hours(&mut self, hours: f64) {
        self.snapshot_hours = hours;
    }

    pub fn set_value_of_lost_load(&mut self, voll: Option<f64>) {
        self.value_of_lost_load = voll;
    }

    /// Registers a generator.
    ///
    /// # Errors
    ///
    /// Fails on a duplicate name, an unknown bus, or an availability series
    /// whose length differs from the snapshot count.
    pub fn add_generator(&mut self, generator: Generator) -> Result<(), NetworkError> {
        self.check_component(&generator.name, &generator.bus)?;
        if let Some(len) = generator.p_max_pu.len() {
            self.check_len(&generator.name, len)?;
        }
        debug!(
            name = %generator.name,
            p_nom_mw = generator.p_nom_mw,
            marginal_cost = generator.marginal_cost,
            "added generator"
        );
        self.generators.push(generator);
        Ok(())
    }

    /// Registers a load.
    ///
    /// # Errors
    ///
    /// Fails on a duplicate name, an unknown bus, or a series length mismatch.
    pub fn add_load(&mut self, load: Load) -> Result<(), NetworkError> {
        self.check_component(&load.name, &load.bus)?;
        self.check_len(&load.name, load.p_set_mw.len())?;
        debug!(name = %load.name, "added load");
        self.loads.push(load);
        Ok(())
    }

    fn check_component(&self, name: &str, bus: &str) -> Result<(), NetworkError> {
        let taken = self.generators.iter().any(|g| g.name == name)
            || self.loads.iter().any(|l| l.name == name);
        if taken {
            return Err(NetworkError::DuplicateName(name.to_string()));
        }
        if !self.buses.iter().any(|b| b == bus) {
            return Err(NetworkError::UnknownBus {
                component: name.to_string(),
                bus: bus.to_string(),
            });
        }
        Ok(())
    }

    fn check_len(&self, name: &str, got: usize) -> Result<(), NetworkError> {
        if got != self.snapshots {
            return Err(NetworkError::LengthMismatch {
                component: name.to_string(),
                expected: self.snapshots,
                got,
            });
        }
        Ok(())
    }

    /// Builds the full single-bus model for a scenario and its snapshots.
    ///
    /// Generators are named `"{bus} {technology}"`, the load `"{bus} load"`.
    ///
    /// # Errors
    ///
    /// Returns a [`NetworkError`] if the table is empty or lacks a column the
    /// fleet references.
    pub fn from_scenario(cfg: &ScenarioConfig, table: &SnapshotTable) -> Result<Self, NetworkError> {
        if table.is_empty() {
            return Err(NetworkError::NoSnapshots);
        }

        let bus = cfg.market.bus.clone();
        let mut network = Self::new(bus.clone());
        network.set_snapshots(table.len());
        network.set_snapshot_hours(cfg.market.snapshot_hours);
        network.set_value_of_lost_load(cfg.market.value_of_lost_load);

        for g in &cfg.generators {
            let name = format!("{bus} {}", g.technology);
            let p_max_pu = match &g.availability_column {
                Some(column) => {
                    let series = table.column(column).ok_or_else(|| NetworkError::UnknownColumn {
                        component: name.clone(),
                        column: column.clone(),
                    })?;
                    Availability::Series(series.to_vec())
                }
                None => Availability::Constant(1.0),
            };
            network.add_generator(Generator {
                name,
                technology: g.technology.clone(),
                bus: bus.clone(),
                p_nom_mw: g.p_nom_mw,
                marginal_cost: g.marginal_cost,
                p_max_pu,
                renewable: g.renewable,
            })?;
        }

        network.add_load(Load {
            name: format!("{bus} load"),
            bus: bus.clone(),
            p_set_mw: table.load_mw.clone(),
        })?;

        info!(
            bus = %bus,
            snapshots = network.snapshots,
            generators = network.generators.len(),
            "built network"
        );
        Ok(network)
    }

    /// Name of the (first) bus.
    pub fn bus(&self) -> &str {
        self.buses.first().map_or("", String::as_str)
    }

    pub fn snapshots(&self) -> usize {
        self.snapshots
    }

    pub fn snapshot_hours(&self) -> f64 {
        self.snapshot_hours
    }

    pub fn value_of_lost_load(&self) -> Option<f64> {
        self.value_of_lost_load
    }

    pub fn generators(&self) -> &[Generator] {
        &self.generators
    }

    pub fn loads(&self) -> &[Load] {
        &self.loads
    }

    /// Total demand at `snapshot` across all loads (MW).
    pub fn load_at(&self, snapshot: usize) -> f64 {
        self.loads
            .iter()
            .map(|l| l.p_set_mw.get(snapshot).copied().unwrap_or(0.0))
            .sum()
    }
}
