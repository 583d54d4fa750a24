//! Shared test infrastructure.

use expsim_core::machine::transition::StateMachine;
use expsim_core::profiles::store::ProfileStore;
use expsim_core::sim::context::{Modes, SimulationContext, Tracking};
use expsim_core::sim::global::{GlobalSimulationContext, SimulationRecord};
use expsim_core::sim::simulator::Simulator;
use expsim_core::target::Target;

/// A recalibrated target assembled from store names.
pub fn target(store: &ProfileStore, hw: &str, os: &str, app: &str, flaw: &str) -> Target {
    let mut target = Target::from_defaults(store).expect("default target");
    target.set_hw(store, hw).expect("hardware profile");
    target.set_os(store, os).expect("os profile");
    target.set_app(store, app).expect("application profile");
    target.set_flaw(store, flaw).expect("flaw profile");
    target.recalibrate().expect("compatible target");
    target
}

/// Tracking flags that keep every branch (no equivalence dedup).
pub fn keep_all() -> Tracking {
    Tracking {
        equivalent_only: false,
        ..Tracking::default()
    }
}

/// Runs one full simulation of `target`.
pub fn simulate(
    store: &ProfileStore,
    target: Target,
    modes: Modes,
    tracking: Tracking,
) -> GlobalSimulationContext {
    let machine = StateMachine::exploitation();
    let ctx = SimulationContext::new(target, modes, tracking);
    let mut global = GlobalSimulationContext::new(tracking);
    Simulator::new(&machine, store).run(&ctx, &mut global);
    global
}

/// The non-aborted records of a run.
pub fn successful(global: &GlobalSimulationContext) -> Vec<&SimulationRecord> {
    global
        .records()
        .iter()
        .filter(|r| r.aborted.is_none())
        .collect()
}

/// The event-name sequence of a record's trace.
pub fn events(record: &SimulationRecord) -> Vec<&'static str> {
    record.trace.iter().map(|step| step.event.name()).collect()
}
