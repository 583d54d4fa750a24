//! Report writers.
//!
//! The permutator emits, per point: the target descriptor (every registry
//! field's symbolic value), summary statistics, and the simulation
//! records. Three sinks consume them:
//! 1. **Text:** One human-readable `<scenario>-<point>.txt` per point.
//! 2. **CSV:** One row per simulation in a cumulative `simulations.csv`
//!    whose column order is frozen at header emission.
//! 3. **Tables:** Per-metric `tab_metric_<metric>.csv` summaries and a
//!    per-scenario `tab_scenario.csv`.

/// The cumulative CSV writer.
pub mod csv;
/// Summary table writers.
pub mod tables;
/// Per-point text reports.
pub mod text;

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::EngineError;
use crate::machine::transition::StateMachine;
use crate::sim::global::GlobalSimulationContext;

/// Sink for permutation results.
pub trait Reporter {
    /// Consumes one simulated point.
    fn point(
        &mut self,
        scenario: &str,
        point: u128,
        descriptor: &[(String, String)],
        global: &GlobalSimulationContext,
    ) -> Result<(), EngineError>;

    /// Flushes whatever the sink buffered.
    fn finish(&mut self) -> Result<(), EngineError>;
}

/// Discards everything; used by tests and dry runs.
#[derive(Debug, Default)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn point(
        &mut self,
        _scenario: &str,
        _point: u128,
        _descriptor: &[(String, String)],
        _global: &GlobalSimulationContext,
    ) -> Result<(), EngineError> {
        Ok(())
    }

    fn finish(&mut self) -> Result<(), EngineError> {
        Ok(())
    }
}

/// The standard on-disk reporter: text files, cumulative CSV, and summary
/// tables under one output directory.
#[derive(Debug)]
pub struct FileReporter {
    dir: PathBuf,
    csv: csv::CsvWriter,
    tables: tables::TableWriter,
}

impl FileReporter {
    /// Creates the output directory and opens `simulations.csv` with its
    /// frozen header.
    pub fn create(
        dir: &Path,
        machine: &StateMachine,
        descriptor_names: &[&'static str],
    ) -> Result<Self, EngineError> {
        fs::create_dir_all(dir)?;
        let csv = csv::CsvWriter::create(&dir.join("simulations.csv"), machine, descriptor_names)?;
        Ok(Self {
            dir: dir.to_owned(),
            csv,
            tables: tables::TableWriter::default(),
        })
    }
}

impl Reporter for FileReporter {
    fn point(
        &mut self,
        scenario: &str,
        point: u128,
        descriptor: &[(String, String)],
        global: &GlobalSimulationContext,
    ) -> Result<(), EngineError> {
        text::write_point(&self.dir, scenario, point, descriptor, global)?;
        self.csv.append(scenario, descriptor, global)?;
        self.tables.record(scenario, point, global);
        Ok(())
    }

    fn finish(&mut self) -> Result<(), EngineError> {
        self.csv.flush()?;
        self.tables.write(&self.dir)
    }
}
