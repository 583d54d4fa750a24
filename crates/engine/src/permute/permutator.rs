//! The cartesian-product driver.
//!
//! For each scenario the permutator sums the selected fields' bit widths,
//! walks every packed point index in `[0, 2^total)`, slices it into
//! per-field value indices, writes the fields onto a fresh target (in
//! registry order), recalibrates, simulates, and reports. Out-of-range
//! slices and incompatible targets skip the point; everything else is
//! deterministic in point-index order.

use tracing::{debug, info};

use crate::error::EngineError;
use crate::machine::transition::StateMachine;
use crate::permute::descriptor::{self, BitDescriptor};
use crate::permute::scenario::Scenario;
use crate::profiles::store::ProfileStore;
use crate::report::Reporter;
use crate::sim::context::{Modes, SimulationContext, Tracking};
use crate::sim::global::GlobalSimulationContext;
use crate::sim::simulator::Simulator;
use crate::target::Target;

/// Aggregate counts for one permutator run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Points simulated.
    pub points: usize,
    /// Points skipped (incompatible or out-of-range slice).
    pub skipped: usize,
    /// Simulation records emitted.
    pub simulations: usize,
    /// Equivalence classes across all points.
    pub classes: usize,
}

/// One selected field, resolved against the registry.
struct ResolvedField {
    descriptor_index: usize,
    values: Vec<String>,
    bits: u32,
}

/// The cartesian-product permutation driver.
#[derive(Debug)]
pub struct Permutator<'a> {
    store: &'a ProfileStore,
    machine: StateMachine,
    registry: Vec<BitDescriptor>,
    modes: Modes,
    tracking: Tracking,
}

impl<'a> Permutator<'a> {
    /// A permutator over the exploitation machine and the full registry.
    pub fn new(store: &'a ProfileStore, modes: Modes, tracking: Tracking) -> Self {
        Self {
            store,
            machine: StateMachine::exploitation(),
            registry: descriptor::registry(store),
            modes,
            tracking,
        }
    }

    /// The machine driving the simulations.
    pub fn machine(&self) -> &StateMachine {
        &self.machine
    }

    /// The descriptor registry, in registration order.
    pub fn registry(&self) -> &[BitDescriptor] {
        &self.registry
    }

    /// The default scenario over the registry.
    pub fn default_scenario(&self) -> Scenario {
        Scenario::default_product(&self.registry)
    }

    /// Runs one scenario, emitting every point through `reporter`.
    pub fn run(
        &self,
        scenario: &Scenario,
        reporter: &mut dyn Reporter,
    ) -> Result<RunSummary, EngineError> {
        let fields = self.resolve_fields(scenario)?;
        let total_bits: u32 = fields.iter().map(|f| f.bits).sum();
        if total_bits > 127 {
            return Err(EngineError::InvalidScenario(format!(
                "scenario {} spans {total_bits} index bits; the packed point \
                 index is limited to 127",
                scenario.name
            )));
        }
        info!(
            scenario = scenario.name.as_str(),
            fields = fields.len(),
            bits = total_bits,
            "permutation start"
        );

        let mut summary = RunSummary::default();
        for point in 0u128..(1u128 << total_bits) {
            match self.assign_point(&fields, point) {
                Ok(target) => {
                    let descriptor: Vec<(String, String)> = self
                        .registry
                        .iter()
                        .map(|d| (d.name.to_owned(), (d.get)(&target)))
                        .collect();
                    let global = self.simulate(target);
                    summary.points += 1;
                    summary.simulations += global.records().len();
                    summary.classes += global.class_count();
                    reporter.point(&scenario.name, point, &descriptor, &global)?;
                }
                Err(reason) => {
                    debug!(point, %reason, "point skipped");
                    summary.skipped += 1;
                }
            }
        }
        info!(
            scenario = scenario.name.as_str(),
            points = summary.points,
            skipped = summary.skipped,
            simulations = summary.simulations,
            "permutation done"
        );
        Ok(summary)
    }

    /// Resolves scenario fields against the registry, in registry order.
    fn resolve_fields(&self, scenario: &Scenario) -> Result<Vec<ResolvedField>, EngineError> {
        let mut fields = Vec::new();
        for descriptor_index in 0..self.registry.len() {
            let descriptor = &self.registry[descriptor_index];
            let Some(selected) = scenario.fields.iter().find(|f| f.name == descriptor.name)
            else {
                continue;
            };
            if selected.values.is_empty() {
                return Err(EngineError::InvalidScenario(format!(
                    "{}: empty value list",
                    descriptor.name
                )));
            }
            for value in &selected.values {
                if !descriptor.values.contains(value) {
                    return Err(EngineError::InvalidScenario(format!(
                        "{}: value {value} is not in the field's domain",
                        descriptor.name
                    )));
                }
            }
            let bits = BitDescriptor::bits_for(descriptor.kind, selected.values.len());
            fields.push(ResolvedField {
                descriptor_index,
                values: selected.values.clone(),
                bits,
            });
        }
        // Every scenario field must have resolved to a descriptor.
        for field in &scenario.fields {
            if !self.registry.iter().any(|d| d.name == field.name) {
                return Err(EngineError::InvalidScenario(format!(
                    "unknown field: {}",
                    field.name
                )));
            }
        }
        Ok(fields)
    }

    /// Slices `point` into per-field indices and writes the target.
    fn assign_point(
        &self,
        fields: &[ResolvedField],
        point: u128,
    ) -> Result<Target, EngineError> {
        let mut target = Target::from_defaults(self.store)?;
        let mut shifted = point;
        for field in fields {
            let slice = (shifted & ((1u128 << field.bits) - 1)) as usize;
            shifted >>= field.bits;
            let Some(value) = field.values.get(slice) else {
                // Dead slot of a non-power-of-two domain.
                return Err(EngineError::IncompatibleTarget(format!(
                    "index {slice} out of range for {}",
                    self.registry[field.descriptor_index].name
                )));
            };
            (self.registry[field.descriptor_index].set)(&mut target, self.store, value)?;
        }
        for field in fields {
            if let Some(verify) = self.registry[field.descriptor_index].verify {
                verify(&target)?;
            }
        }
        target.recalibrate()?;
        Ok(target)
    }

    /// Simulates one configured target.
    fn simulate(&self, target: Target) -> GlobalSimulationContext {
        let ctx = SimulationContext::new(target, self.modes, self.tracking);
        let mut global = GlobalSimulationContext::new(self.tracking);
        Simulator::new(&self.machine, self.store).run(&ctx, &mut global);
        global
    }
}
