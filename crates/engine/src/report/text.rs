//! Per-point text reports.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::EngineError;
use crate::sim::global::{GlobalSimulationContext, Metric, EXPLOITABILITY_BUCKETS};

/// Writes `<scenario>-<point>.txt` with the descriptor, summary
/// statistics, and one block per simulation record.
///
/// # Arguments
///
/// * `dir` - Output directory (already created by the reporter).
/// * `scenario` - Scenario name; prefixes the file name.
/// * `point` - Packed point index within the scenario.
/// * `descriptor` - Every bit descriptor's symbolic value.
/// * `global` - The point's collected simulations and statistics.
pub fn write_point(
    dir: &Path,
    scenario: &str,
    point: u128,
    descriptor: &[(String, String)],
    global: &GlobalSimulationContext,
) -> Result<(), EngineError> {
    let path = dir.join(format!("{scenario}-{point}.txt"));
    let mut out = BufWriter::new(File::create(path)?);

    writeln!(out, "scenario: {scenario}")?;
    writeln!(out, "point: {point}")?;
    writeln!(out)?;
    writeln!(out, "target:")?;
    for (name, value) in descriptor {
        writeln!(out, "  {name} = {value}")?;
    }

    writeln!(out)?;
    writeln!(
        out,
        "simulations: {} completed, {} aborted, {} recorded",
        global.completed(),
        global.aborted(),
        global.records().len()
    )?;
    for metric in Metric::ALL {
        let stats = global.stats(metric);
        writeln!(
            out,
            "  {}: min {} max {} avg {}",
            metric.name(),
            stats.min(),
            stats.max(),
            stats.avg()
        )?;
    }
    write!(out, "  exploitability buckets: zero {}", global.buckets()[0])?;
    for (index, bound) in EXPLOITABILITY_BUCKETS.iter().enumerate() {
        write!(out, ", <={bound} {}", global.buckets()[index + 1])?;
    }
    writeln!(out)?;

    for (index, record) in global.records().iter().enumerate() {
        writeln!(out)?;
        match &record.aborted {
            Some(fact) => writeln!(out, "simulation {index} (aborted: {fact})")?,
            None => writeln!(out, "simulation {index} (x{} equivalent)", record.members)?,
        }
        writeln!(
            out,
            "  fitness {} exploitability {} desirability {} likelihood {} homogeneity {}",
            record.fitness,
            record.exploitability,
            record.desirability,
            record.likelihood,
            record.homogeneity
        )?;
        if !record.techniques.is_empty() {
            let techniques: Vec<&str> =
                record.techniques.iter().map(|t| t.name()).collect();
            writeln!(out, "  techniques: {}", techniques.join(", "))?;
        }
        if let Some(first) = record.trace.first() {
            write!(out, "  trace: {}", first.source)?;
            for step in &record.trace {
                write!(out, " -{}-> {}", step.event, step.dest)?;
            }
            writeln!(out)?;
        }
        for assumption in &record.assumptions {
            writeln!(
                out,
                "  assume {} = {}{}{}",
                assumption.fact,
                assumption.value,
                if assumption.predicated {
                    " [predicated]"
                } else {
                    ""
                },
                if assumption.used { " [used]" } else { "" }
            )?;
        }
    }
    out.flush()?;
    Ok(())
}
