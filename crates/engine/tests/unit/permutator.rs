//! Cartesian-product driver behaviour.

use expsim_core::error::EngineError;
use expsim_core::permute::{Permutator, Scenario};
use expsim_core::profiles::store::ProfileStore;
use expsim_core::report::{NullReporter, Reporter};
use expsim_core::sim::context::{Modes, Tracking};
use expsim_core::sim::global::GlobalSimulationContext;

/// Collects per-point class counts instead of writing files.
#[derive(Debug, Default)]
struct CountingReporter {
    points: Vec<(String, u128, usize)>,
}

impl Reporter for CountingReporter {
    fn point(
        &mut self,
        scenario: &str,
        point: u128,
        descriptor: &[(String, String)],
        global: &GlobalSimulationContext,
    ) -> Result<(), EngineError> {
        assert!(!descriptor.is_empty());
        self.points
            .push((scenario.to_owned(), point, global.records().len()));
        Ok(())
    }

    fn finish(&mut self) -> Result<(), EngineError> {
        Ok(())
    }
}

fn pinned_scenario(permutator: &Permutator<'_>, extra: &[&str]) -> Scenario {
    let mut args: Vec<String> = vec![
        "hw_base_profile=x64".into(),
        "os_base_profile=win7_rtm_x64".into(),
        "app_base_profile=ie8_x64".into(),
        "flaw_base_profile=relative_stack_corruption_forward_adjacent".into(),
    ];
    args.extend(extra.iter().map(|&s| s.to_owned()));
    Scenario::from_args("pinned", &args, permutator.registry()).unwrap()
}

#[test]
fn fully_pinned_scenario_is_a_single_point() {
    let store = ProfileStore::builtin();
    let permutator = Permutator::new(&store, Modes::default(), Tracking::default());
    let scenario = pinned_scenario(&permutator, &[]);
    let mut reporter = CountingReporter::default();
    let summary = permutator.run(&scenario, &mut reporter).unwrap();
    assert_eq!(summary.points, 1);
    assert_eq!(summary.skipped, 0);
    assert_eq!(reporter.points.len(), 1);
    assert!(summary.simulations > 0);
}

#[test]
fn boolean_fields_occupy_two_bits_with_one_dead_slot() {
    let store = ProfileStore::builtin();
    let permutator = Permutator::new(&store, Modes::default(), Tracking::default());
    let scenario = pinned_scenario(&permutator, &["flaw_local=unset,true,false"]);
    let mut reporter = CountingReporter::default();
    let summary = permutator.run(&scenario, &mut reporter).unwrap();
    // Four slots, three values; the dead slot is skipped like an
    // incompatible point.
    assert_eq!(summary.points + summary.skipped, 4);
    assert_eq!(summary.points, 3);
    assert_eq!(summary.skipped, 1);
}

#[test]
fn incompatible_points_are_skipped_not_errored() {
    let store = ProfileStore::builtin();
    let permutator = Permutator::new(&store, Modes::default(), Tracking::default());
    // A 64-bit OS pinned onto 32-bit hardware.
    let scenario = Scenario::from_args(
        "mismatch",
        &[
            "hw_base_profile=x86_nx".into(),
            "os_base_profile=win7_rtm_x64".into(),
        ],
        permutator.registry(),
    )
    .unwrap();
    let mut reporter = CountingReporter::default();
    let summary = permutator.run(&scenario, &mut reporter).unwrap();
    assert_eq!(summary.points, 0);
    assert_eq!(summary.skipped, 1);
}

#[test]
fn writers_can_reject_a_point() {
    let store = ProfileStore::builtin();
    let permutator = Permutator::new(&store, Modes::default(), Tracking::default());
    // Bottom-up randomization cannot be requested on XP.
    let scenario = Scenario::from_args(
        "xp_bottom_up",
        &[
            "hw_base_profile=x86_nx".into(),
            "os_base_profile=xp_sp2".into(),
            "app_base_profile=ie8".into(),
            "app_bottom_up_aslr=true".into(),
        ],
        permutator.registry(),
    )
    .unwrap();
    let mut reporter = NullReporter;
    let summary = permutator.run(&scenario, &mut reporter).unwrap();
    assert_eq!(summary.points, 0);
    assert_eq!(summary.skipped, 1);
}

#[test]
fn verifiers_reject_incoherent_corruption_geometry() {
    let store = ProfileStore::builtin();
    let permutator = Permutator::new(&store, Modes::default(), Tracking::default());
    // A position on a flaw that corrupts nothing.
    let scenario = Scenario::from_args(
        "geometry",
        &[
            "flaw_base_profile=null_deref".into(),
            "flaw_corruption_position=adjacent".into(),
        ],
        permutator.registry(),
    )
    .unwrap();
    let mut reporter = NullReporter;
    let summary = permutator.run(&scenario, &mut reporter).unwrap();
    assert_eq!(summary.points, 0);
    assert_eq!(summary.skipped, 1);
}

#[test]
fn unknown_fields_and_values_are_scenario_errors() {
    let store = ProfileStore::builtin();
    let permutator = Permutator::new(&store, Modes::default(), Tracking::default());
    assert!(matches!(
        Scenario::from_args(
            "bad",
            &["frobnication=yes".into()],
            permutator.registry()
        ),
        Err(EngineError::InvalidScenario(_))
    ));
    assert!(matches!(
        Scenario::from_args(
            "bad",
            &["hw_base_profile=ia64".into()],
            permutator.registry()
        ),
        Err(EngineError::InvalidScenario(_))
    ));
}

#[test]
fn points_arrive_in_packed_index_order() {
    let store = ProfileStore::builtin();
    let permutator = Permutator::new(&store, Modes::default(), Tracking::default());
    let scenario = pinned_scenario(&permutator, &["flaw_local=unset,true,false"]);
    let mut reporter = CountingReporter::default();
    permutator.run(&scenario, &mut reporter).unwrap();
    let indices: Vec<u128> = reporter.points.iter().map(|&(_, p, _)| p).collect();
    let mut sorted = indices.clone();
    sorted.sort_unstable();
    assert_eq!(indices, sorted);
}

#[test]
fn run_is_deterministic_across_invocations() {
    let store = ProfileStore::builtin();
    let permutator = Permutator::new(&store, Modes::default(), Tracking::default());
    let scenario = pinned_scenario(&permutator, &["flaw_local=unset,true"]);

    let mut first = CountingReporter::default();
    let mut second = CountingReporter::default();
    let a = permutator.run(&scenario, &mut first).unwrap();
    let b = permutator.run(&scenario, &mut second).unwrap();
    assert_eq!(a, b);
    assert_eq!(first.points, second.points);
}
