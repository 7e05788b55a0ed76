//! CSV export for dispatch results.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use tracing::info;

use crate::market::types::DispatchResult;

/// Fixed leading columns; one `p_<technology>_mw` column per generator follows.
pub const HEADER: &str = "snapshot,load_mw,total_generation_mw,res_generation_mw,\
                          non_res_generation_mw,marginal_price_eur_per_mwh,unserved_mw";

/// Exports a dispatch result to a CSV file at the given path.
///
/// # Errors
///
/// Returns a `csv::Error` if file creation or writing fails.
pub fn export_csv(result: &DispatchResult, path: &Path) -> Result<(), csv::Error> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(result, buf)?;
    info!(path = %path.display(), rows = result.len(), "exported dispatch");
    Ok(())
}

/// Writes a dispatch result as CSV to any writer.
///
/// One header row, then one row per snapshot. Output is deterministic for
/// identical inputs.
///
/// # Errors
///
/// Returns a `csv::Error` if writing fails.
pub fn write_csv(result: &DispatchResult, writer: impl Write) -> Result<(), csv::Error> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    let mut header: Vec<String> = HEADER.split(',').map(|h| h.trim().to_string()).collect();
    header.extend(result.generators.iter().map(|g| format!("p_{}_mw", g.technology)));
    wtr.write_record(&header)?;

    for s in &result.snapshots {
        let mut row = vec![
            s.snapshot.to_string(),
            format!("{:.3}", s.load_mw),
            format!("{:.3}", s.total_generation_mw),
            format!("{:.3}", s.res_generation_mw),
            format!("{:.3}", s.non_res_generation_mw),
            format!("{:.4}", s.marginal_price),
            format!("{:.3}", s.unserved_mw),
        ];
        row.extend(s.generator_p_mw.iter().map(|p| format!("{p:.3}")));
        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    Ok(())
}
