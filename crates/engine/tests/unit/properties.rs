//! Property-based universal invariants.

use proptest::prelude::*;
use proptest::sample::Index;

use expsim_core::permute::descriptor;
use expsim_core::profiles::store::ProfileStore;
use expsim_core::sim::context::{Modes, Tracking};
use expsim_core::target::Target;

use crate::common::{simulate, successful};

/// Assembles a target from sampled store indices; `None` when the tuple
/// is incompatible.
fn sampled_target(
    store: &ProfileStore,
    hw: Index,
    os: Index,
    app: Index,
    flaw: Index,
    local: Option<bool>,
) -> Option<Target> {
    let mut target = Target::from_defaults(store).ok()?;
    let pick = |names: Vec<String>, index: Index| names[index.index(names.len())].clone();
    target.set_hw(store, &pick(store.hardware_names(), hw)).ok()?;
    target.set_os(store, &pick(store.os_names(), os)).ok()?;
    target
        .set_app(store, &pick(store.application_names(), app))
        .ok()?;
    target
        .set_flaw(store, &pick(store.core_flaw_names(), flaw))
        .ok()?;
    target.flaw.local = local;
    if target.application.kernel {
        target.flaw.kernel = Some(true);
    }
    target.recalibrate().ok()?;
    Some(target)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    /// Recalibration converges in one pass: a second run is a no-op.
    #[test]
    fn recalibrate_twice_equals_recalibrate_once(
        hw: Index,
        os: Index,
        app: Index,
        flaw: Index,
        local: Option<bool>,
    ) {
        let store = ProfileStore::builtin();
        let Some(once) = sampled_target(&store, hw, os, app, flaw, local) else {
            return Ok(());
        };
        let mut twice = once.clone();
        twice.recalibrate().unwrap();
        prop_assert_eq!(once, twice);
    }

    /// Setting any field to its current value is an identity operation.
    #[test]
    fn rewriting_the_current_value_changes_nothing(field: Index) {
        let store = ProfileStore::builtin();
        let registry = descriptor::registry(&store);
        let descriptor = &registry[field.index(registry.len())];

        let mut original = Target::from_defaults(&store).unwrap();
        original.recalibrate().unwrap();

        let current = (descriptor.get)(&original);
        prop_assume!(descriptor.values.contains(&current));

        let mut rewritten = original.clone();
        (descriptor.set)(&mut rewritten, &store, &current).unwrap();
        rewritten.recalibrate().unwrap();
        prop_assert_eq!(original, rewritten);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(12))]

    /// Metric laws over the collected branches of a sampled target.
    #[test]
    fn completed_branches_obey_the_metric_laws(
        hw: Index,
        os: Index,
        app: Index,
        flaw: Index,
    ) {
        let store = ProfileStore::builtin();
        let Some(target) = sampled_target(&store, hw, os, app, flaw, None) else {
            return Ok(());
        };
        let population = target.population();
        let global = simulate(&store, target, Modes::default(), Tracking::default());
        for record in successful(&global) {
            prop_assert!((0.0..=1.0).contains(&record.exploitability));
            prop_assert!((0.0..=1.0).contains(&record.desirability));
            prop_assert!((0.0..=1.0).contains(&record.likelihood));
            prop_assert_eq!(
                record.fitness,
                record.exploitability * record.desirability * record.likelihood
            );
            prop_assert_eq!(record.homogeneity, population * record.exploitability);
            // A branch never takes the same transition twice.
            let mut seen = std::collections::BTreeSet::new();
            for step in &record.trace {
                prop_assert!(seen.insert((step.source, step.event, step.dest)));
            }
        }
    }
}
