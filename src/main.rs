//! Dispatch entry point: CLI wiring, report printing and output files.

mod cli;

use std::process::ExitCode;

use clap::Parser;

use emd::charts::render_all;
use emd::error::Error;
use emd::io::export::export_csv;
use emd::logging;
use emd::runner::{self, RunOutput};

use crate::cli::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(logging::level_for(cli.verbose, cli.quiet));

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let scenario = runner::load_scenario(cli.scenario.as_deref(), &cli.preset)?;
    let table = runner::snapshots(&scenario, cli.input.as_deref())?;
    if !cli.quiet {
        eprintln!("Columns: {}", table.columns.join(", "));
        eprintln!("Loaded {} snapshots", table.len());
    }
    let output = runner::run(&scenario, &table)?;

    if !cli.quiet {
        for s in &output.result.snapshots {
            println!("{s}");
        }
        println!();
    }
    println!("{}", output.report);

    if let Some(path) = &cli.export {
        export_csv(&output.result, path).map_err(|source| Error::Export {
            path: path.display().to_string(),
            source,
        })?;
        eprintln!("Dispatch written to {}", path.display());
    }

    if let Some(dir) = &cli.charts {
        let written = render_all(&output.result, dir)?;
        eprintln!("{} charts written to {}", written.len(), dir.display());
    }

    present(cli, output)
}

#[cfg_attr(not(any(feature = "api", feature = "tui")), allow(unused_variables))]
fn present(cli: &Cli, output: RunOutput) -> anyhow::Result<()> {
    #[cfg(feature = "tui")]
    if cli.tui {
        use anyhow::Context as _;
        emd::tui::run(&output.result).context("terminal viewer failed")?;
    }

    #[cfg(feature = "api")]
    if cli.serve {
        use std::net::SocketAddr;
        use std::sync::Arc;

        use anyhow::Context as _;

        let state = Arc::new(emd::api::AppState {
            result: output.result,
            report: output.report,
        });
        let addr = SocketAddr::from(([0, 0, 0, 0], cli.port));
        let rt = tokio::runtime::Runtime::new().context("failed to create tokio runtime")?;
        tracing::info!(%addr, "starting API server");
        rt.block_on(emd::api::serve(state, addr))?;
    }

    Ok(())
}
