//! Probabilistic simulator for memory-safety exploitation strategies.
//!
//! This crate models the exploitation of a memory-safety flaw as a
//! non-deterministic finite state machine and explores it exhaustively. It
//! provides:
//! 1. **Profiles:** Immutable hardware, OS, application, flaw, and attacker
//!    capability records, held in a [`ProfileStore`] built once at startup.
//! 2. **Target:** A mutable (hardware, OS, application, flaw, capabilities)
//!    aggregate with staged recalibration that keeps derived fields coherent.
//! 3. **Machine:** The exploitation state machine: states, events, guarded
//!    effects, and the probability helpers that price each step.
//! 4. **Simulation:** A depth-first walker that forks a [`SimulationContext`]
//!    per outgoing transition and collects completed branches, deduplicated
//!    by `(fitness, technique-set)` equivalence class.
//! 5. **Permutation:** A cartesian-product driver over a typed bit-descriptor
//!    registry, emitting per-point metrics through the report writers.

/// Error types shared across the engine.
pub mod error;
/// Exploitation state machine: states, events, facts, transitions, effects.
pub mod machine;
/// Cartesian-product permutation over bit-descriptor fields.
pub mod permute;
/// Profile records and the built-in profile catalog.
pub mod profiles;
/// Report writers: per-point text, cumulative CSV, summary tables.
pub mod report;
/// Branch contexts, assumption tables, and the depth-first simulator.
pub mod sim;
/// The mutable target aggregate and its recalibration pipeline.
pub mod target;

/// Engine-wide error type; every fallible operation returns this.
pub use crate::error::EngineError;
/// Built-in profile catalog; construct once with `ProfileStore::builtin()`.
pub use crate::profiles::store::ProfileStore;
/// Top-level permutation driver; owns the output writers for one run.
pub use crate::permute::permutator::Permutator;
/// One branch of one simulation; forked per outgoing transition.
pub use crate::sim::context::SimulationContext;
/// The coherent (hw, os, app, flaw, capabilities) aggregate under analysis.
pub use crate::target::Target;
