//! Branch contexts, assumption accounting, and the depth-first simulator.
//!
//! One simulation explores every guard-satisfying path through the
//! exploitation machine for one configured target. It provides:
//! 1. **Context:** The per-branch [`context::SimulationContext`] with its
//!    ordered, memoised assumption table and metric products.
//! 2. **Global context:** The per-target-point
//!    [`global::GlobalSimulationContext`] collecting completed branches,
//!    deduplicated by `(fitness, technique-set)` equivalence class.
//! 3. **Simulator:** The recursive walker that forks the context per
//!    outgoing transition, with the transition stack doubling as cycle
//!    prevention.

/// Per-branch context and assumption table.
pub mod context;
/// Per-point result collection and summary statistics.
pub mod global;
/// The depth-first exploration walker.
pub mod simulator;

pub use context::{Assumption, Modes, SimulationContext, Tracking};
pub use global::{GlobalSimulationContext, SimulationRecord};
pub use simulator::Simulator;
