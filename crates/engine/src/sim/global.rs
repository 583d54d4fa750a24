//! Per-point result collection and summary statistics.
//!
//! One [`GlobalSimulationContext`] exists per permutation point. Completed
//! branches are submitted to it; with equivalence tracking on it keeps one
//! representative per `(fitness, technique-set)` class plus a membership
//! count, otherwise every branch. Aborted branches are kept only under
//! impossible-tracking and never fold into the summary statistics.

use std::collections::BTreeSet;
use std::collections::HashMap;

use crate::machine::event::Event;
use crate::machine::fact::Fact;
use crate::machine::state::State;
use crate::machine::technique::Technique;
use crate::machine::transition::StateMachine;
use crate::sim::context::{Assumption, SimulationContext, Tracking};

/// One step of a completed trace, resolved for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceStep {
    /// Source state.
    pub source: State,
    /// Event taken.
    pub event: Event,
    /// Destination state.
    pub dest: State,
}

/// One collected simulation (a completed or aborted branch).
#[derive(Debug, Clone)]
pub struct SimulationRecord {
    /// Ordered transitions traversed.
    pub trace: Vec<TraceStep>,
    /// Ordered assumption table snapshot.
    pub assumptions: Vec<Assumption>,
    /// Techniques employed.
    pub techniques: BTreeSet<Technique>,
    /// Product of predicate probabilities.
    pub exploitability: f64,
    /// Subjective ease-of-attack factor.
    pub desirability: f64,
    /// Subjective plausibility factor.
    pub likelihood: f64,
    /// exploitability × desirability × likelihood.
    pub fitness: f64,
    /// population × exploitability.
    pub homogeneity: f64,
    /// The predicate that aborted the branch, when it did.
    pub aborted: Option<Fact>,
    /// Number of equivalent branches this record represents.
    pub members: usize,
}

/// Named metric of a simulation, for summary tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    /// exploitability × desirability × likelihood.
    Fitness,
    /// Product of predicate probabilities.
    Exploitability,
    /// Subjective ease-of-attack factor.
    Desirability,
    /// Subjective plausibility factor.
    Likelihood,
    /// Population reach × exploitability.
    Homogeneity,
}

impl Metric {
    /// All metrics, in report column order.
    pub const ALL: [Metric; 5] = [
        Metric::Fitness,
        Metric::Exploitability,
        Metric::Desirability,
        Metric::Likelihood,
        Metric::Homogeneity,
    ];

    /// Lowercase metric name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Fitness => "fitness",
            Self::Exploitability => "exploitability",
            Self::Desirability => "desirability",
            Self::Likelihood => "likelihood",
            Self::Homogeneity => "homogeneity",
        }
    }

    /// Reads this metric off a record.
    pub fn of(self, record: &SimulationRecord) -> f64 {
        match self {
            Self::Fitness => record.fitness,
            Self::Exploitability => record.exploitability,
            Self::Desirability => record.desirability,
            Self::Likelihood => record.likelihood,
            Self::Homogeneity => record.homogeneity,
        }
    }
}

/// Running min/max/avg accumulator for one metric.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricStats {
    min: f64,
    max: f64,
    sum: f64,
    count: usize,
}

impl MetricStats {
    fn record(&mut self, value: f64) {
        if self.count == 0 {
            self.min = value;
            self.max = value;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);
        }
        self.sum += value;
        self.count += 1;
    }

    /// Smallest recorded value (0 when empty).
    pub fn min(&self) -> f64 {
        if self.count == 0 { 0.0 } else { self.min }
    }

    /// Largest recorded value (0 when empty).
    pub fn max(&self) -> f64 {
        if self.count == 0 { 0.0 } else { self.max }
    }

    /// Mean of recorded values (0 when empty).
    pub fn avg(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / self.count as f64
        }
    }
}

/// Upper bounds of the exploitability buckets; the first bucket is the
/// exact-zero class.
pub const EXPLOITABILITY_BUCKETS: [f64; 5] = [1e-9, 1e-6, 1e-3, 0.5, 1.0];

/// Collects every simulation of one permutation point.
#[derive(Debug)]
pub struct GlobalSimulationContext {
    tracking: Tracking,
    records: Vec<SimulationRecord>,
    classes: HashMap<(u64, Vec<Technique>), usize>,
    stats: [MetricStats; 5],
    buckets: [usize; 6],
    completed: usize,
    aborted: usize,
}

impl GlobalSimulationContext {
    /// An empty collection with the given tracking flags.
    pub fn new(tracking: Tracking) -> Self {
        Self {
            tracking,
            records: Vec::new(),
            classes: HashMap::new(),
            stats: [MetricStats::default(); 5],
            buckets: [0; 6],
            completed: 0,
            aborted: 0,
        }
    }

    /// Submits a branch that reached the terminal state.
    pub fn submit(&mut self, machine: &StateMachine, ctx: &SimulationContext) {
        if self.tracking.minimal_only && !is_minimal(machine, ctx) {
            return;
        }
        let record = resolve(machine, ctx, None);
        self.completed += 1;
        for (slot, metric) in Metric::ALL.iter().enumerate() {
            self.stats[slot].record(metric.of(&record));
        }
        self.buckets[bucket_of(record.exploitability)] += 1;

        if self.tracking.equivalent_only {
            let key = (
                record.fitness.to_bits(),
                record.techniques.iter().copied().collect::<Vec<_>>(),
            );
            if let Some(&slot) = self.classes.get(&key) {
                self.records[slot].members += 1;
                return;
            }
            self.classes.insert(key, self.records.len());
        }
        self.records.push(record);
    }

    /// Submits an aborted branch (kept only under impossible-tracking).
    ///
    /// Aborted branches carry zero exploitability by definition.
    pub fn submit_aborted(
        &mut self,
        machine: &StateMachine,
        ctx: &SimulationContext,
        predicate: Fact,
    ) {
        self.aborted += 1;
        if !self.tracking.impossible {
            return;
        }
        let mut record = resolve(machine, ctx, Some(predicate));
        record.exploitability = 0.0;
        record.fitness = 0.0;
        record.homogeneity = 0.0;
        self.records.push(record);
    }

    /// Collected records, in submission order.
    pub fn records(&self) -> &[SimulationRecord] {
        &self.records
    }

    /// Number of branches that reached the terminal state.
    pub fn completed(&self) -> usize {
        self.completed
    }

    /// Number of branches aborted by a zero-probability guard.
    pub fn aborted(&self) -> usize {
        self.aborted
    }

    /// Number of distinct equivalence classes collected.
    pub fn class_count(&self) -> usize {
        self.records.iter().filter(|r| r.aborted.is_none()).count()
    }

    /// Summary statistics for one metric, over completed branches.
    pub fn stats(&self, metric: Metric) -> &MetricStats {
        let slot = Metric::ALL
            .iter()
            .position(|&m| m == metric)
            .unwrap_or_default();
        &self.stats[slot]
    }

    /// Branch counts per exploitability bucket (index 0 is exactly zero).
    pub fn buckets(&self) -> &[usize; 6] {
        &self.buckets
    }
}

/// The bucket index for an exploitability value.
fn bucket_of(exploitability: f64) -> usize {
    if exploitability == 0.0 {
        return 0;
    }
    for (index, &bound) in EXPLOITABILITY_BUCKETS.iter().enumerate() {
        if exploitability <= bound {
            return index + 1;
        }
    }
    EXPLOITABILITY_BUCKETS.len()
}

/// Resolves a context into a standalone record.
fn resolve(
    machine: &StateMachine,
    ctx: &SimulationContext,
    aborted: Option<Fact>,
) -> SimulationRecord {
    let trace = ctx
        .trace
        .iter()
        .map(|&id| {
            let t = machine.transition(id);
            TraceStep {
                source: t.source,
                event: t.event,
                dest: t.dest,
            }
        })
        .collect();
    SimulationRecord {
        trace,
        assumptions: ctx.assumptions().to_vec(),
        techniques: ctx.techniques.clone(),
        exploitability: ctx.exploitability,
        desirability: ctx.desirability,
        likelihood: ctx.likelihood,
        fitness: ctx.fitness(),
        homogeneity: ctx.homogeneity(),
        aborted,
        members: 1,
    }
}

/// Whether every preparation self-loop on the branch contributed an
/// assumption some later guard consulted.
fn is_minimal(machine: &StateMachine, ctx: &SimulationContext) -> bool {
    ctx.trace.iter().all(|&id| {
        let t = machine.transition(id);
        let preparing_loop = t.source == State::PreparingEnvironment
            && t.dest == State::PreparingEnvironment;
        !preparing_loop || ctx.transition_contributed(id)
    })
}
