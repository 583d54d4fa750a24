//! Cartesian-product permutation over bit-descriptor fields.
//!
//! A scenario names a set of typed fields and the values each may take;
//! the permutator walks the packed cartesian product, configures a target
//! per point, simulates it, and hands results to the report writers. It
//! provides:
//! 1. **Descriptors:** The typed field registry driving both permutation
//!    and CSV serialization.
//! 2. **Scenarios:** The field/value model, the `FIELD=V1,V2` argument
//!    grammar, and the `PROFILE:` log parser.
//! 3. **Permutator:** The product driver itself.

/// The typed bit-descriptor registry.
pub mod descriptor;
/// The cartesian-product driver.
pub mod permutator;
/// Scenario model and parsers.
pub mod scenario;

pub use descriptor::{BitDescriptor, FieldKind};
pub use permutator::{Permutator, RunSummary};
pub use scenario::Scenario;
