//! Summary table writers.
//!
//! `tab_metric_<metric>.csv` holds one row per point (min/max/avg of the
//! metric); `tab_scenario.csv` aggregates per scenario. Rows accumulate in
//! point order and are written once at the end of the run.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::EngineError;
use crate::sim::global::{GlobalSimulationContext, Metric};

/// One accumulated metric row.
#[derive(Debug)]
struct MetricRow {
    scenario: String,
    point: u128,
    min: f64,
    max: f64,
    avg: f64,
}

/// Per-scenario aggregate counts.
#[derive(Debug, Default, Clone, Copy)]
struct ScenarioRow {
    points: usize,
    simulations: usize,
    aborted: usize,
    classes: usize,
}

/// Accumulates summary rows during a run.
#[derive(Debug, Default)]
pub struct TableWriter {
    metric_rows: Vec<(Metric, MetricRow)>,
    scenarios: BTreeMap<String, ScenarioRow>,
}

impl TableWriter {
    /// Accumulates one point.
    pub fn record(&mut self, scenario: &str, point: u128, global: &GlobalSimulationContext) {
        for metric in Metric::ALL {
            let stats = global.stats(metric);
            self.metric_rows.push((
                metric,
                MetricRow {
                    scenario: scenario.to_owned(),
                    point,
                    min: stats.min(),
                    max: stats.max(),
                    avg: stats.avg(),
                },
            ));
        }
        let row = self.scenarios.entry(scenario.to_owned()).or_default();
        row.points += 1;
        row.simulations += global.records().len();
        row.aborted += global.aborted();
        row.classes += global.class_count();
    }

    /// Writes every table into `dir`.
    pub fn write(&self, dir: &Path) -> Result<(), EngineError> {
        for metric in Metric::ALL {
            let path = dir.join(format!("tab_metric_{}.csv", metric.name()));
            let mut out = BufWriter::new(File::create(path)?);
            writeln!(out, "scenario,point,min,max,avg")?;
            for (row_metric, row) in &self.metric_rows {
                if *row_metric == metric {
                    writeln!(
                        out,
                        "{},{},{},{},{}",
                        row.scenario, row.point, row.min, row.max, row.avg
                    )?;
                }
            }
            out.flush()?;
        }

        let mut out = BufWriter::new(File::create(dir.join("tab_scenario.csv"))?);
        writeln!(out, "scenario,points,simulations,aborted,classes")?;
        for (name, row) in &self.scenarios {
            writeln!(
                out,
                "{},{},{},{},{}",
                name, row.points, row.simulations, row.aborted, row.classes
            )?;
        }
        out.flush()?;
        Ok(())
    }
}
