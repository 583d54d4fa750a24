//! The depth-first exploration walker.
//!
//! From the initial state, every outgoing transition not already on the
//! branch's trace is tried: the context is cloned, the transition's effect
//! runs against the clone, and on success the walker recurses into the
//! destination state. An abort unwinds exactly one branch; siblings and
//! the parent are untouched because they own their own clones. The walk is
//! single-threaded and fully deterministic: branches fork in transition
//! declaration order.

use crate::machine::state::State;
use crate::machine::transition::StateMachine;
use crate::profiles::store::ProfileStore;
use crate::sim::context::SimulationContext;
use crate::sim::global::GlobalSimulationContext;

/// Explores the exploitation machine for one configured context.
#[derive(Debug)]
pub struct Simulator<'a> {
    machine: &'a StateMachine,
    store: &'a ProfileStore,
}

impl<'a> Simulator<'a> {
    /// A simulator over `machine`, resolving derived flaws from `store`.
    pub fn new(machine: &'a StateMachine, store: &'a ProfileStore) -> Self {
        Self { machine, store }
    }

    /// Runs the full exploration, collecting results into `global`.
    pub fn run(&self, ctx: &SimulationContext, global: &mut GlobalSimulationContext) {
        self.enter(StateMachine::INITIAL, ctx, global);
    }

    fn enter(&self, state: State, ctx: &SimulationContext, global: &mut GlobalSimulationContext) {
        if state == StateMachine::TERMINAL {
            global.submit(self.machine, ctx);
            return;
        }
        for transition in self.machine.outgoing(state) {
            // A transition appears at most once per branch.
            if ctx.trace.contains(&transition.id) {
                continue;
            }
            let mut child = ctx.clone();
            child.begin_transition(transition.id, transition.event);
            match (transition.effect)(&mut child, self.store) {
                Ok(()) => self.enter(transition.dest, &child, global),
                Err(abort) => {
                    tracing::debug!(
                        event = transition.event.name(),
                        predicate = %abort.predicate,
                        "branch aborted"
                    );
                    global.submit_aborted(self.machine, &child, abort.predicate);
                }
            }
        }
    }
}
