/// Single-snapshot merit-order clearing.
pub mod dispatch;
/// Horizon-wide optimization over every snapshot.
pub mod engine;
/// Aggregate market report.
pub mod kpi;
/// Bus, generator, and load registration.
pub mod network;
/// Per-snapshot and whole-run dispatch results.
pub mod types;

pub use engine::optimize;
