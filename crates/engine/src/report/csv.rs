//! The cumulative CSV writer.
//!
//! Column layout, frozen once at header emission: the fixed metric
//! columns, then one column per bit descriptor (registry order), then a
//! one-hot column per state (lex-sorted union of all source and
//! destination names), then a one-hot column per event (lex-sorted).
//! Every row of every point follows this exact order, so re-running the
//! same command produces byte-identical output.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::EngineError;
use crate::machine::transition::StateMachine;
use crate::sim::global::GlobalSimulationContext;

/// Fixed leading columns.
const FIXED_COLUMNS: [&str; 9] = [
    "simulation",
    "scenario",
    "fitness",
    "exploitability",
    "desirability",
    "likelihood",
    "homogeneity",
    "aborted",
    "aborted_predicate",
];

/// Writes `simulations.csv`.
#[derive(Debug)]
pub struct CsvWriter {
    out: BufWriter<File>,
    state_columns: Vec<&'static str>,
    event_columns: Vec<&'static str>,
    descriptor_count: usize,
    rows: u64,
}

/// Quotes a field when it holds a separator or quote.
fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_owned()
    }
}

impl CsvWriter {
    /// Opens the file and writes the frozen header.
    ///
    /// # Arguments
    ///
    /// * `path` - Destination of the cumulative CSV.
    /// * `machine` - Supplies the one-hot state and event column sets.
    /// * `descriptor_names` - Bit-descriptor column names, registry order.
    ///
    /// # Returns
    ///
    /// A writer whose column order is now fixed for every appended row.
    pub fn create(
        path: &Path,
        machine: &StateMachine,
        descriptor_names: &[&'static str],
    ) -> Result<Self, EngineError> {
        let mut out = BufWriter::new(File::create(path)?);
        let state_columns = machine.state_names();
        let event_columns = machine.event_names();

        let mut header: Vec<String> = FIXED_COLUMNS.iter().map(|&c| c.to_owned()).collect();
        header.extend(descriptor_names.iter().map(|&n| n.to_owned()));
        header.extend(state_columns.iter().map(|&n| format!("state_{n}")));
        header.extend(event_columns.iter().map(|&n| format!("event_{n}")));
        writeln!(out, "{}", header.join(","))?;

        Ok(Self {
            out,
            state_columns,
            event_columns,
            descriptor_count: descriptor_names.len(),
            rows: 0,
        })
    }

    /// Appends one row per simulation record of a point.
    pub fn append(
        &mut self,
        scenario: &str,
        descriptor: &[(String, String)],
        global: &GlobalSimulationContext,
    ) -> Result<(), EngineError> {
        debug_assert_eq!(descriptor.len(), self.descriptor_count);
        for record in global.records() {
            let mut row: Vec<String> = Vec::with_capacity(
                FIXED_COLUMNS.len()
                    + self.descriptor_count
                    + self.state_columns.len()
                    + self.event_columns.len(),
            );
            row.push(self.rows.to_string());
            row.push(escape(scenario));
            row.push(record.fitness.to_string());
            row.push(record.exploitability.to_string());
            row.push(record.desirability.to_string());
            row.push(record.likelihood.to_string());
            row.push(record.homogeneity.to_string());
            row.push(u8::from(record.aborted.is_some()).to_string());
            row.push(match &record.aborted {
                Some(fact) => escape(&fact.to_string()),
                None => String::new(),
            });
            for (_, value) in descriptor {
                row.push(escape(value));
            }

            let states: BTreeSet<&str> = record
                .trace
                .iter()
                .flat_map(|step| [step.source.name(), step.dest.name()])
                .collect();
            for column in &self.state_columns {
                row.push(u8::from(states.contains(column)).to_string());
            }
            let events: BTreeSet<&str> =
                record.trace.iter().map(|step| step.event.name()).collect();
            for column in &self.event_columns {
                row.push(u8::from(events.contains(column)).to_string());
            }

            writeln!(self.out, "{}", row.join(","))?;
            self.rows += 1;
        }
        Ok(())
    }

    /// Flushes buffered rows to disk.
    pub fn flush(&mut self) -> Result<(), EngineError> {
        self.out.flush()?;
        Ok(())
    }
}
