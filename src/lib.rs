//! Single-bus electricity market dispatch.
//!
//! A fleet of generators with linear marginal costs serves an inelastic
//! load at one bus. Each snapshot is cleared in merit order; the bus
//! marginal price is the cost of the last loaded offer.

pub mod charts;
pub mod config;
pub mod error;
pub mod io;
pub mod logging;
pub mod market;
pub mod profiles;
pub mod runner;

/// REST API over a solved dispatch.
#[cfg(feature = "api")]
pub mod api;
/// Terminal replay of a solved dispatch.
#[cfg(feature = "tui")]
pub mod tui;

pub use error::Error;
