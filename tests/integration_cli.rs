mod common;

use std::process::{Command, Output};

use common::fixture;

fn emd(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_emd"))
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("emd process should run: {e}"))
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// Parses `Label:   12.34 UNIT` from the report.
fn report_value(stdout: &str, label: &str) -> f64 {
    stdout
        .lines()
        .find_map(|l| l.strip_prefix(label))
        .and_then(|rest| rest.split_whitespace().next())
        .and_then(|v| v.trim_end_matches('%').parse().ok())
        .unwrap_or_else(|| panic!("missing \"{label}\" in:\n{stdout}"))
}

#[test]
fn sample_sheet_prints_snapshots_and_report() {
    let out = emd(&["--input", "data/demand_sample.csv"]);
    assert!(out.status.success(), "stderr={}", String::from_utf8_lossy(&out.stderr));

    let text = stdout(&out);
    assert_eq!(text.lines().filter(|l| l.starts_with("t=")).count(), 48);
    assert!(text.contains("--- Market Report ---"));
    assert_eq!(report_value(&text, "Snapshots:"), 48.0);
    let price = report_value(&text, "Mean marginal price:");
    assert!((0.0..=80.0).contains(&price), "{price}");

    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("Columns: Hour, Load (MW), offshore capacity factor"), "{stderr}");
    assert!(stderr.contains("Loaded 48 snapshots"), "{stderr}");
}

#[test]
fn quiet_suppresses_snapshot_table() {
    let out = emd(&["--input", "data/demand_sample.csv", "--quiet"]);
    assert!(out.status.success());
    let text = stdout(&out);
    assert!(!text.lines().any(|l| l.starts_with("t=")));
    assert!(text.contains("--- Market Report ---"));
}

#[test]
fn export_and_charts_are_written() {
    let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("{e}"));
    let csv = dir.path().join("dispatch.csv");
    let charts = dir.path().join("charts");

    let out = emd(&[
        "--scenario",
        "scenarios/germany.toml",
        "--input",
        "data/demand_sample.csv",
        "--quiet",
        "--export",
        csv.to_str().unwrap_or_default(),
        "--charts",
        charts.to_str().unwrap_or_default(),
    ]);
    assert!(out.status.success(), "stderr={}", String::from_utf8_lossy(&out.stderr));

    let content = std::fs::read_to_string(&csv).unwrap_or_default();
    assert_eq!(content.lines().count(), 49);
    assert!(content.starts_with("snapshot,load_mw,"));
    assert!(content.lines().next().unwrap_or("").ends_with("p_solar_mw"));

    for name in [
        "res_vs_non_res.svg",
        "demand_and_price.svg",
        "demand_and_supply.svg",
        "supply_and_price.svg",
        "load_curve.svg",
        "marginal_price.svg",
    ] {
        assert!(charts.join(name).is_file(), "missing {name}");
    }
}

#[test]
fn presets_produce_distinct_markets() {
    let germany = stdout(&emd(&["--preset", "germany", "--quiet"]));
    let coal_exit = stdout(&emd(&["--preset", "coal_exit", "--quiet"]));
    let a = report_value(&germany, "Mean marginal price:");
    let b = report_value(&coal_exit, "Mean marginal price:");
    assert!(b > a, "coal exit should raise prices: germany={a:.2} coal_exit={b:.2}");
}

#[test]
fn unknown_preset_fails() {
    let out = emd(&["--preset", "atlantis"]);
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("unknown preset"), "{stderr}");
}

#[test]
fn malformed_sheet_names_the_column() {
    let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("{e}"));
    let path = dir.path().join("bad.csv");
    let good = std::fs::read_to_string(fixture("data/demand_sample.csv")).unwrap_or_default();
    let bad = good.replace("solar capacity factor", "pv");
    assert!(std::fs::write(&path, bad).is_ok());

    let out = emd(&["--input", path.to_str().unwrap_or_default()]);
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("solar capacity factor"), "{stderr}");
}
