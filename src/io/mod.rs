//! Demand sheet ingestion and result export.

pub mod export;
pub mod input;
