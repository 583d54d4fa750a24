//! Engine error definitions.
//!
//! Two error layers exist. [`EngineError`] is the crate-level error returned
//! by fallible operations (profile lookup, recalibration, permutation,
//! output). [`SimAbort`] is branch-local: it unwinds exactly one simulation
//! branch when a guard evaluates to zero probability, without touching
//! sibling branches or the parent.

use std::io;

use thiserror::Error;

use crate::machine::fact::Fact;

/// Crate-level error type.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A compatibility predicate rejected the (hw, os, app, flaw) tuple.
    ///
    /// Raised by bit-descriptor writers and by `Target::recalibrate`. The
    /// permutator swallows this: the point is skipped, not counted.
    #[error("incompatible target: {0}")]
    IncompatibleTarget(String),

    /// A profile name was not present in the store.
    #[error("unknown {kind} profile: {name}")]
    UnknownProfile {
        /// Profile dimension (`hardware`, `os`, `application`, `flaw`,
        /// `capabilities`).
        kind: &'static str,
        /// The name that failed to resolve.
        name: String,
    },

    /// A malformed line in a `PROFILE:` scenario log. Fatal to the driver.
    #[error("invalid profile line {line}: {reason}")]
    InvalidProfileLine {
        /// One-based line number in the input.
        line: usize,
        /// Human-readable description of the defect.
        reason: String,
    },

    /// A scenario referenced an unknown field or an out-of-domain value.
    #[error("invalid scenario: {0}")]
    InvalidScenario(String),

    /// Output I/O failure (CSV or text report). Fatal.
    #[error("report output failed: {0}")]
    Io(#[from] io::Error),
}

/// Branch-local abort: a guard evaluated to zero probability.
///
/// Carries the predicate that failed so aborted branches can name their
/// abort reason in reports. Never surfaced across branches.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("predicate not satisfied: {predicate}")]
pub struct SimAbort {
    /// The guard that evaluated to zero on this branch.
    pub predicate: Fact,
}

impl SimAbort {
    /// Creates an abort naming the failed guard.
    pub fn new(predicate: Fact) -> Self {
        Self { predicate }
    }
}

/// Result alias for branch effects.
pub type SimResult<T> = Result<T, SimAbort>;
