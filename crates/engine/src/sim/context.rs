//! Per-branch simulation context and assumption table.
//!
//! A [`SimulationContext`] is one branch of one simulation: a target
//! clone, the running metric products, the ordered assumption table, the
//! technique set, and the transitions traversed so far. Cloning a context
//! duplicates the table and technique set so sibling branches evolve
//! independently.
//!
//! The assumption table is memoised with first-write-wins semantics:
//! recording an already-present key returns the cached value without
//! multiplying it into exploitability again. This is what makes explicit
//! seed assumptions dominate later implicit ones.

use std::collections::{BTreeSet, HashMap};

use serde::Deserialize;

use crate::error::{SimAbort, SimResult};
use crate::machine::event::Event;
use crate::machine::fact::Fact;
use crate::machine::technique::Technique;
use crate::machine::transition::TransitionId;
use crate::target::Target;

/// Simulation mode flags; several may be set at once.
///
/// Modes flavour how helper predicates resolve unspecified (`None`) flaw
/// and capability fields: attack-favor resolves toward the attacker,
/// defense-favor toward the defender, and plain (normal) mode falls back
/// to a per-predicate plausible default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct Modes {
    /// Resolve unspecified fields in the attacker's favour.
    pub attack_favor: bool,
    /// Resolve unspecified fields in the defender's favour.
    pub defense_favor: bool,
    /// Suppress techniques that are not publicly documented.
    pub public_only: bool,
}

impl Modes {
    /// Resolves a tri-state field under these modes.
    ///
    /// `normally` is the plausible default used in normal mode, i.e. when
    /// neither favour flag decides.
    pub fn resolve(self, value: Option<bool>, normally: bool) -> bool {
        match value {
            Some(explicit) => explicit,
            None if self.attack_favor => true,
            None if self.defense_favor => false,
            None => normally,
        }
    }
}

/// Result-tracking flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Tracking {
    /// Record aborted branches (with their abort reason) instead of
    /// discarding them.
    pub impossible: bool,
    /// Let zero-probability predicates pass instead of aborting; the
    /// branch continues with zero exploitability.
    pub allow_impossible: bool,
    /// Keep one representative per `(fitness, techniques)` class.
    pub equivalent_only: bool,
    /// Discard branches with preparation steps that were never consulted.
    pub minimal_only: bool,
}

impl Default for Tracking {
    fn default() -> Self {
        Self {
            impossible: false,
            allow_impossible: false,
            equivalent_only: true,
            minimal_only: false,
        }
    }
}

/// Conversion of guard-body results into a probability.
///
/// Effect bodies yield either a boolean or a value already in
/// `[0.0, 1.0]`; booleans map to certainty.
pub trait IntoProbability {
    /// The probability in `[0.0, 1.0]`.
    fn into_probability(self) -> f64;
}

impl IntoProbability for bool {
    fn into_probability(self) -> f64 {
        if self { 1.0 } else { 0.0 }
    }
}

impl IntoProbability for f64 {
    fn into_probability(self) -> f64 {
        self.clamp(0.0, 1.0)
    }
}

/// One keyed fact recorded on a branch.
#[derive(Debug, Clone, PartialEq)]
pub struct Assumption {
    /// The fact assumed or predicated.
    pub fact: Fact,
    /// Probability value in `[0.0, 1.0]`.
    pub value: f64,
    /// Monotonic insertion id within the branch.
    pub seq: u64,
    /// Transition whose effect recorded the fact, if any.
    pub transition: Option<TransitionId>,
    /// Event whose effect recorded the fact, if any.
    pub event: Option<Event>,
    /// Whether a guard (rather than a plain effect) derived the fact.
    pub predicated: bool,
    /// Whether any later guard consulted the fact.
    pub used: bool,
}

/// Insertion-ordered, key-indexed assumption table.
#[derive(Debug, Clone, Default)]
struct AssumptionTable {
    entries: Vec<Assumption>,
    index: HashMap<Fact, usize>,
}

impl AssumptionTable {
    /// The cached value, marking the entry used; `None` when absent.
    fn consult(&mut self, fact: &Fact) -> Option<f64> {
        let &slot = self.index.get(fact)?;
        self.entries[slot].used = true;
        Some(self.entries[slot].value)
    }

    /// The cached value without touching the used bit.
    fn peek(&self, fact: &Fact) -> Option<f64> {
        self.index.get(fact).map(|&slot| self.entries[slot].value)
    }

    /// Records a fact if absent; returns the now-cached value and whether
    /// the record was fresh.
    fn record(
        &mut self,
        fact: Fact,
        value: f64,
        predicated: bool,
        origin: Option<(TransitionId, Event)>,
    ) -> (f64, bool) {
        if let Some(&slot) = self.index.get(&fact) {
            return (self.entries[slot].value, false);
        }
        let seq = self.entries.len() as u64;
        self.index.insert(fact.clone(), self.entries.len());
        self.entries.push(Assumption {
            fact,
            value,
            seq,
            transition: origin.map(|(t, _)| t),
            event: origin.map(|(_, e)| e),
            predicated,
            used: false,
        });
        (value, true)
    }
}

/// One branch of one simulation.
#[derive(Debug, Clone)]
pub struct SimulationContext {
    /// The target under analysis; mutated only by effects that swap in a
    /// second-order flaw.
    pub target: Target,
    /// Mode flags.
    pub modes: Modes,
    /// Tracking flags.
    pub tracking: Tracking,
    /// Product of all predicate probabilities on this branch.
    pub exploitability: f64,
    /// Subjective ease-of-attack factor.
    pub desirability: f64,
    /// Subjective plausibility factor for required assumptions.
    pub likelihood: f64,
    /// Techniques employed on this branch.
    pub techniques: BTreeSet<Technique>,
    /// Transitions traversed, in order; doubles as the cycle-prevention
    /// stack (a transition appears at most once per branch).
    pub trace: Vec<TransitionId>,
    assumptions: AssumptionTable,
    current: Option<(TransitionId, Event)>,
}

impl SimulationContext {
    /// Builds the root context for a target, seeding its explicit
    /// assumptions into the table first so they dominate.
    pub fn new(target: Target, modes: Modes, tracking: Tracking) -> Self {
        let mut assumptions = AssumptionTable::default();
        for (fact, truth) in &target.seeded {
            let _ = assumptions.record(fact.clone(), (*truth).into_probability(), false, None);
        }
        Self {
            target,
            modes,
            tracking,
            exploitability: 1.0,
            desirability: 1.0,
            likelihood: 1.0,
            techniques: BTreeSet::new(),
            trace: Vec::new(),
            assumptions,
            current: None,
        }
    }

    /// Marks the transition whose effect is about to run; newly recorded
    /// assumptions carry it as their origin.
    pub fn begin_transition(&mut self, id: TransitionId, event: Event) {
        self.trace.push(id);
        self.current = Some((id, event));
    }

    /// Evaluates a guard.
    ///
    /// Multiplies exploitability by the value, records the fact with
    /// `predicated` set, and aborts the branch on zero probability unless
    /// impossible values are allowed. Re-evaluating a cached key returns
    /// the cached value without re-multiplying.
    pub fn predicate<P: IntoProbability>(&mut self, fact: Fact, value: P) -> SimResult<f64> {
        let value = match self.assumptions.consult(&fact) {
            Some(cached) => cached,
            None => {
                let v = value.into_probability();
                let (v, _) = self
                    .assumptions
                    .record(fact.clone(), v, true, self.current);
                self.exploitability *= v;
                v
            }
        };
        if value == 0.0 && !self.tracking.allow_impossible {
            return Err(SimAbort::new(fact));
        }
        Ok(value)
    }

    /// Records a fact without the zero-aborts rule.
    ///
    /// The value still multiplies exploitability; a cached key returns the
    /// cached value without re-multiplying.
    pub fn assume<P: IntoProbability>(&mut self, fact: Fact, value: P) -> f64 {
        let v = value.into_probability();
        let (v, fresh) = self.assumptions.record(fact, v, false, self.current);
        if fresh {
            self.exploitability *= v;
        }
        v
    }

    /// Declares a modelling axiom: the fact holds with certainty.
    pub fn explicitly_assume(&mut self, fact: Fact) {
        let _ = self.assume(fact, true);
    }

    /// Tags the branch with a technique.
    pub fn technique(&mut self, technique: Technique) {
        let _ = self.techniques.insert(technique);
    }

    /// The cached value of a fact, marking it consulted (used).
    pub fn consult(&mut self, fact: &Fact) -> Option<f64> {
        self.assumptions.consult(fact)
    }

    /// Whether a fact is cached true, marking it consulted.
    pub fn consult_true(&mut self, fact: &Fact) -> bool {
        self.consult(fact).is_some_and(|v| v > 0.0)
    }

    /// The cached value of a fact without touching its used bit.
    pub fn peek(&self, fact: &Fact) -> Option<f64> {
        self.assumptions.peek(fact)
    }

    /// Multiplies the desirability factor.
    pub fn scale_desirability(&mut self, factor: f64) {
        self.desirability = (self.desirability * factor).clamp(0.0, 1.0);
    }

    /// Multiplies the likelihood factor.
    pub fn scale_likelihood(&mut self, factor: f64) {
        self.likelihood = (self.likelihood * factor).clamp(0.0, 1.0);
    }

    /// Snapshot of the assumption table, in insertion order.
    pub fn assumptions(&self) -> &[Assumption] {
        &self.assumptions.entries
    }

    /// Exploitability × desirability × likelihood.
    pub fn fitness(&self) -> f64 {
        self.exploitability * self.desirability * self.likelihood
    }

    /// Population reach × exploitability.
    pub fn homogeneity(&self) -> f64 {
        self.target.population() * self.exploitability
    }

    /// Whether any assumption recorded by `transition` was later consulted.
    pub fn transition_contributed(&self, transition: TransitionId) -> bool {
        self.assumptions
            .entries
            .iter()
            .any(|a| a.transition == Some(transition) && a.used)
    }
}
