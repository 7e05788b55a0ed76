//! The full pipeline: scenario → snapshots → network → dispatch → report.

use std::path::Path;

use tracing::{info, warn};

use crate::config::ScenarioConfig;
use crate::error::Error;
use crate::io::input::{SnapshotTable, load_snapshot_table};
use crate::market::kpi::MarketReport;
use crate::market::network::Network;
use crate::market::optimize;
use crate::market::types::DispatchResult;
use crate::profiles::synthesize;

/// Solved dispatch plus its aggregate report.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub result: DispatchResult,
    pub report: MarketReport,
}

/// Resolves the scenario from a TOML file, or from a preset name, and
/// validates it.
///
/// # Errors
///
/// Returns [`Error::Config`] listing every violated constraint.
pub fn load_scenario(path: Option<&Path>, preset: &str) -> Result<ScenarioConfig, Error> {
    let cfg = match path {
        Some(path) => ScenarioConfig::from_toml_file(path)?,
        None => ScenarioConfig::from_preset(preset)?,
    };
    let errors = cfg.validate();
    if !errors.is_empty() {
        return Err(Error::Config(errors));
    }
    Ok(cfg)
}

/// Reads the demand sheet at `input`, or synthesizes snapshots when none is
/// given.
///
/// # Errors
///
/// Returns [`Error::Input`] if the sheet is unreadable or malformed.
pub fn snapshots(cfg: &ScenarioConfig, input: Option<&Path>) -> Result<SnapshotTable, Error> {
    match input {
        Some(path) => Ok(load_snapshot_table(
            path,
            &cfg.input.load_column,
            &cfg.availability_columns(),
        )?),
        None => {
            info!("no demand sheet given, synthesizing snapshots");
            Ok(synthesize(cfg))
        }
    }
}

/// Builds the network for `table`, optimizes it and computes the report.
///
/// # Errors
///
/// Returns [`Error::Network`] if the model cannot be assembled, or
/// [`Error::Dispatch`] if a snapshot cannot be balanced.
pub fn run(cfg: &ScenarioConfig, table: &SnapshotTable) -> Result<RunOutput, Error> {
    let network = Network::from_scenario(cfg, table)?;
    let result = optimize(&network)?;
    let report = MarketReport::from_result(&result);
    if report.unserved_mwh > 0.0 {
        warn!(unserved_mwh = report.unserved_mwh, "load was shed");
    }
    Ok(RunOutput { result, report })
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn default_preset_runs_end_to_end() {
        let cfg = load_scenario(None, "germany").unwrap_or_else(|e| panic!("{e}"));
        let table = snapshots(&cfg, None).unwrap_or_else(|e| panic!("{e}"));
        let out = run(&cfg, &table).unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(out.result.len(), 24 * 7);
        assert_eq!(out.report.snapshots, 24 * 7);
        assert_eq!(out.report.unserved_mwh, 0.0);
    }

    #[test]
    fn unknown_preset_is_a_config_error() {
        let err = load_scenario(None, "atlantis");
        assert!(matches!(err, Err(Error::Config(ref v)) if v.len() == 1));
    }

    #[test]
    fn invalid_toml_scenario_lists_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap_or_else(|e| panic!("{e}"));
        assert!(writeln!(file, "[market]\nbus = \"\"\nsnapshot_hours = 0.0").is_ok());
        let err = load_scenario(Some(file.path()), "germany");
        assert!(matches!(err, Err(Error::Config(ref v)) if v.len() == 2), "{err:?}");
    }

    #[test]
    fn missing_demand_sheet_is_an_input_error() {
        let cfg = ScenarioConfig::germany();
        let err = snapshots(&cfg, Some(Path::new("/nonexistent/demand.csv")));
        assert!(matches!(err, Err(Error::Input(_))));
    }
}
