//! The transition table and its lookup surface.

use std::collections::BTreeMap;

use crate::machine::effects::{self, Effect};
use crate::machine::event::Event;
use crate::machine::state::State;

/// Index of a transition in the machine's table.
///
/// A branch's trace is a list of these; a transition id appears at most
/// once per branch (the trace doubles as the cycle-prevention stack).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TransitionId(usize);

impl TransitionId {
    /// Position in the table.
    pub fn index(self) -> usize {
        self.0
    }
}

/// One guarded edge of the machine.
#[derive(Debug, Clone, Copy)]
pub struct Transition {
    /// Table index.
    pub id: TransitionId,
    /// Source state.
    pub source: State,
    /// Event label.
    pub event: Event,
    /// Destination state.
    pub dest: State,
    /// Effect run against the branch's cloned context.
    pub effect: Effect,
}

/// The exploitation machine: the static transition table plus per-state
/// fan-out order.
#[derive(Debug)]
pub struct StateMachine {
    transitions: Vec<Transition>,
    outgoing: BTreeMap<State, Vec<usize>>,
}

impl StateMachine {
    /// The initial state of every simulation.
    pub const INITIAL: State = State::TargetDefined;
    /// The terminal (success) state.
    pub const TERMINAL: State = State::ControlOfCodeExecution;

    /// Builds the exploitation machine from the built-in table.
    pub fn exploitation() -> Self {
        let mut transitions = Vec::new();
        let mut outgoing: BTreeMap<State, Vec<usize>> = BTreeMap::new();
        for (index, (source, event, dest, effect)) in effects::table().into_iter().enumerate() {
            transitions.push(Transition {
                id: TransitionId(index),
                source,
                event,
                dest,
                effect,
            });
            outgoing.entry(source).or_default().push(index);
        }
        Self {
            transitions,
            outgoing,
        }
    }

    /// The transition with the given id.
    pub fn transition(&self, id: TransitionId) -> &Transition {
        &self.transitions[id.0]
    }

    /// Outgoing transitions of `state`, in declaration (fan-out) order.
    pub fn outgoing(&self, state: State) -> impl Iterator<Item = &Transition> {
        self.outgoing
            .get(&state)
            .into_iter()
            .flatten()
            .map(|&index| &self.transitions[index])
    }

    /// Every transition, in table order.
    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    /// Lex-sorted union of all source and destination state names.
    pub fn state_names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self
            .transitions
            .iter()
            .flat_map(|t| [t.source.name(), t.dest.name()])
            .collect();
        names.sort_unstable();
        names.dedup();
        names
    }

    /// Lex-sorted union of all event names.
    pub fn event_names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> =
            self.transitions.iter().map(|t| t.event.name()).collect();
        names.sort_unstable();
        names.dedup();
        names
    }
}
