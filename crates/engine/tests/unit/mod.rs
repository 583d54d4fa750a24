//! # Unit Components
//!
//! Per-module unit tests plus the cross-cutting suites: property-based
//! invariants and the end-to-end seed scenarios.

/// Assumption table and branch-context semantics.
pub mod context;
/// Probability helpers and machine shape.
pub mod machine;
/// Cartesian-product driver behaviour.
pub mod permutator;
/// Property-based universal invariants.
pub mod properties;
/// Store contents and cloning getters.
pub mod profiles;
/// Recalibration pipeline and compatibility rules.
pub mod recalibrate;
/// Output writer column discipline.
pub mod report;
/// Scenario grammar and profile-log parsing.
pub mod scenario;
/// End-to-end seed scenarios over the full machine.
pub mod simulator_paths;
