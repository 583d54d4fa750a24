//! Assumption table and branch-context semantics.

use expsim_core::machine::fact::Fact;
use expsim_core::machine::technique::Technique;
use expsim_core::profiles::store::ProfileStore;
use expsim_core::profiles::types::Region;
use expsim_core::sim::context::{Modes, SimulationContext, Tracking};
use expsim_core::target::Target;

fn context() -> SimulationContext {
    let store = ProfileStore::builtin();
    let target = Target::from_defaults(&store).unwrap();
    SimulationContext::new(target, Modes::default(), Tracking::default())
}

#[test]
fn predicate_multiplies_exploitability() {
    let mut ctx = context();
    ctx.predicate(Fact::CanBypassStackProtection, 0.5).unwrap();
    ctx.predicate(Fact::CanBypassSehop, 0.25).unwrap();
    assert_eq!(ctx.exploitability, 0.125);
    assert_eq!(ctx.assumptions().len(), 2);
    assert!(ctx.assumptions().iter().all(|a| a.predicated));
}

#[test]
fn predicate_zero_aborts_the_branch() {
    let mut ctx = context();
    let err = ctx
        .predicate(Fact::CanCorruptSehFrame, false)
        .unwrap_err();
    assert_eq!(err.predicate, Fact::CanCorruptSehFrame);
}

#[test]
fn allow_impossible_keeps_walking_through_zero() {
    let store = ProfileStore::builtin();
    let target = Target::from_defaults(&store).unwrap();
    let tracking = Tracking {
        allow_impossible: true,
        ..Tracking::default()
    };
    let mut ctx = SimulationContext::new(target, Modes::default(), tracking);
    assert!(ctx.predicate(Fact::CanCorruptSehFrame, false).is_ok());
    assert_eq!(ctx.exploitability, 0.0);
}

#[test]
fn predicate_is_memoised_per_key() {
    let mut ctx = context();
    ctx.predicate(Fact::CanFindAddress(Region::Stack), 0.5).unwrap();
    // Re-evaluating the same key returns the cached value and does not
    // multiply it into exploitability again.
    let cached = ctx.predicate(Fact::CanFindAddress(Region::Stack), 0.125).unwrap();
    assert_eq!(cached, 0.5);
    assert_eq!(ctx.exploitability, 0.5);
}

#[test]
fn assume_records_without_aborting_on_zero() {
    let mut ctx = context();
    let value = ctx.assume(Fact::CanFindRopGadgets, false);
    assert_eq!(value, 0.0);
    assert_eq!(ctx.exploitability, 0.0);
    assert!(!ctx.assumptions()[0].predicated);
}

#[test]
fn explicit_seed_dominates_later_writes() {
    let store = ProfileStore::builtin();
    let mut target = Target::from_defaults(&store).unwrap();
    target.assume_false(Fact::CanControlStackPointer);
    let mut ctx = SimulationContext::new(target, Modes::default(), Tracking::default());
    // The later implicit assumption cannot override the seeded value, and
    // a guard consulting the key sees the explicit zero.
    ctx.explicitly_assume(Fact::CanControlStackPointer);
    assert!(!ctx.consult_true(&Fact::CanControlStackPointer));
    assert!(
        ctx.predicate(Fact::CanControlStackPointer, true)
            .is_err()
    );
}

#[test]
fn consult_sets_the_used_bit() {
    let mut ctx = context();
    ctx.explicitly_assume(Fact::MappedNullPage);
    assert!(!ctx.assumptions()[0].used);
    assert!(ctx.consult_true(&Fact::MappedNullPage));
    assert!(ctx.assumptions()[0].used);
    // Peeking must not mark anything.
    ctx.explicitly_assume(Fact::MassagedHeap);
    assert!(ctx.peek(&Fact::MassagedHeap).is_some());
    assert!(!ctx.assumptions()[1].used);
}

#[test]
fn assumptions_keep_insertion_order_and_sequence() {
    let mut ctx = context();
    ctx.explicitly_assume(Fact::SprayedData);
    ctx.explicitly_assume(Fact::SprayedCode);
    ctx.explicitly_assume(Fact::MassagedHeap);
    let seqs: Vec<u64> = ctx.assumptions().iter().map(|a| a.seq).collect();
    assert_eq!(seqs, vec![0, 1, 2]);
    assert_eq!(ctx.assumptions()[1].fact, Fact::SprayedCode);
}

#[test]
fn clones_evolve_independently() {
    let mut parent = context();
    parent.explicitly_assume(Fact::SprayedData);
    let mut child = parent.clone();
    child.predicate(Fact::CanBypassSehop, 0.5).unwrap();
    child.technique(Technique::DataSpray);
    assert_eq!(parent.assumptions().len(), 1);
    assert_eq!(parent.exploitability, 1.0);
    assert!(parent.techniques.is_empty());
    assert_eq!(child.assumptions().len(), 2);
}

#[test]
fn fitness_is_the_metric_product() {
    let mut ctx = context();
    ctx.predicate(Fact::CanBypassStackProtection, 0.5).unwrap();
    ctx.scale_desirability(0.9);
    ctx.scale_likelihood(0.8);
    assert_eq!(ctx.fitness(), 0.5 * 0.9 * 0.8);
    assert_eq!(
        ctx.homogeneity(),
        ctx.target.population() * ctx.exploitability
    );
}
