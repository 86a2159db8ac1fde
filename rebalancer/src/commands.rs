//! Subcommand workflows: load → inspect → reallocate → write.

use std::io::Write;
use std::path::Path;

use log::info;
use tiervault::{Reallocator, Snapshot};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::input;
use crate::plan;

/// Build the engine from config.
pub fn engine(config: &Config) -> Result<Reallocator> {
    Ok(Reallocator::new(config.engine)?)
}

fn load_and_inspect(config: &Config, snapshot_path: &Path) -> Result<Snapshot> {
    let snapshot = input::load_snapshot(snapshot_path)?;
    let strategies: usize = snapshot.tiers.iter().map(|t| t.strategies.len()).sum();
    info!(
        "loaded {} tiers / {} strategies from {}",
        snapshot.tiers.len(),
        strategies,
        snapshot_path.display()
    );
    input::inspect(&snapshot, config.inspect.allocation_sum_tolerance);
    Ok(snapshot)
}

/// Annotate a snapshot and write it as JSON.
pub fn run(config: &Config, snapshot_path: &Path, pretty: bool, out: &mut impl Write) -> Result<()> {
    let engine = engine(config)?;
    let snapshot = load_and_inspect(config, snapshot_path)?;

    let annotated = engine.reallocate(&snapshot);
    let json = if pretty || config.output.pretty {
        annotated.to_json_pretty()?
    } else {
        annotated.to_json()?
    };
    writeln!(out, "{json}")?;
    Ok(())
}

/// Write the per-tier plan, as a table or as JSON.
pub fn show_plan(
    config: &Config,
    snapshot_path: &Path,
    json: bool,
    out: &mut impl Write,
) -> Result<()> {
    let engine = engine(config)?;
    let snapshot = load_and_inspect(config, snapshot_path)?;

    let report = plan::build_report(&engine, &snapshot);
    if json {
        let text = if config.output.pretty {
            serde_json::to_string_pretty(&report)
        } else {
            serde_json::to_string(&report)
        }
        .map_err(Error::Report)?;
        writeln!(out, "{text}")?;
    } else {
        write!(out, "{}", report.render(config.output.settlement))?;
    }
    Ok(())
}
