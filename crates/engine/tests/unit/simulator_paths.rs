//! End-to-end seed scenarios over the full machine.

use std::collections::BTreeSet;

use expsim_core::machine::technique::Technique;
use expsim_core::profiles::store::ProfileStore;
use expsim_core::sim::context::{Modes, Tracking};
use expsim_core::sim::global::SimulationRecord;

use crate::common::{events, keep_all, simulate, successful, target};

/// The preparation self-loop event names.
const PREP_LOOPS: [&str; 12] = [
    "load_non_aslr_image",
    "load_non_aslr_non_safeseh_image",
    "spray_data",
    "spray_code",
    "map_null_page",
    "massage_heap",
    "discover_stack_address",
    "discover_heap_address",
    "discover_peb_address",
    "discover_image_address",
    "discover_ntdll_address",
    "discover_vtguard_cookie",
];

#[test]
fn rop_on_win7_x64_ie8_prices_the_stack_cookie() {
    let store = ProfileStore::builtin();
    let t = target(
        &store,
        "x64",
        "win7_rtm_x64",
        "ie8_x64",
        "relative_stack_corruption_forward_adjacent",
    );
    let global = simulate(&store, t, Modes::default(), keep_all());

    let expected_events = vec![
        "prepare_environment",
        "finish_preparing_environment",
        "trigger_flaw",
        "corrupt_return_address",
        "return_from_function",
        "pivot_stack_pointer",
        "execute_self_contained_rop_payload",
    ];
    let hit = successful(&global)
        .into_iter()
        .find(|r| events(r) == expected_events)
        .expect("the straight ROP strategy must complete");

    assert_eq!(hit.exploitability, 2f64.powi(-48));
    assert_eq!(hit.exploitability, 3.552713678800501e-15);
    let techniques: BTreeSet<Technique> = [
        Technique::ReturnAddressOverwrite,
        Technique::PivotStackPointer,
        Technique::CodeExecutionViaSelfContainedRopPayload,
    ]
    .into_iter()
    .collect();
    assert_eq!(hit.techniques, techniques);
}

#[test]
fn kernel_null_deref_is_gated_on_null_page_prevention() {
    let store = ProfileStore::builtin();
    let mut t = target(&store, "x64", "win8_server_x64", "kernel_driver", "null_deref");
    t.flaw.local = Some(true);
    t.flaw.kernel = Some(true);
    t.recalibrate().unwrap();

    // Windows 8 Server forbids null-page mappings by default: every branch
    // dies before the flaw pays off.
    let gated = simulate(&store, t.clone(), Modes::default(), keep_all());
    assert_eq!(successful(&gated).len(), 0);
    assert!(gated.aborted() > 0);

    // Toggling the prevention off opens at least one path.
    t.os.kernel_null_deref_prevention = false;
    t.recalibrate().unwrap();
    let open = simulate(&store, t, Modes::default(), keep_all());
    let paths = successful(&open);
    assert!(!paths.is_empty());
    // Every successful path had to map the null page first.
    assert!(
        paths
            .iter()
            .all(|r| events(r).contains(&"map_null_page"))
    );
}

#[test]
fn absolute_write_recursion_happens_exactly_once() {
    let store = ProfileStore::builtin();
    let t = target(&store, "x86_nx", "xp_sp2", "office11", "absolute_write");
    let global = simulate(&store, t, Modes::default(), keep_all());
    let paths = successful(&global);

    let recursive: Vec<&&SimulationRecord> = paths
        .iter()
        .filter(|r| events(r).contains(&"write_anywhere"))
        .collect();
    assert!(!recursive.is_empty(), "the write-anywhere strategy must exist");
    for record in &recursive {
        let evs = events(record);
        assert_eq!(
            evs.iter().filter(|&&e| e == "trigger_flaw").count(),
            2,
            "one derived flaw, triggered once"
        );
        assert_eq!(evs.iter().filter(|&&e| e == "write_anywhere").count(), 1);
    }
    // No branch anywhere re-enters the write more than once.
    assert!(
        paths
            .iter()
            .all(|r| events(r).iter().filter(|&&e| e == "write_anywhere").count() <= 1)
    );
}

#[test]
fn win8_ie10_64_loses_spray_paths_but_keeps_rop() {
    let store = ProfileStore::builtin();
    let t = target(
        &store,
        "x64",
        "win8_client_x64",
        "ie10_x64",
        "relative_heap_corruption_forward_adjacent",
    );
    let global = simulate(&store, t, Modes::default(), keep_all());
    let paths = successful(&global);
    assert!(!paths.is_empty());

    // Recalibration forced both spray capabilities off, so no successful
    // branch contains a spray step.
    assert!(
        paths
            .iter()
            .all(|r| !events(r).contains(&"spray_data") && !events(r).contains(&"spray_code"))
    );
    // Return-oriented strategies survive.
    assert!(
        paths
            .iter()
            .any(|r| events(r).contains(&"execute_self_contained_rop_payload"))
    );
}

#[test]
fn equivalence_classes_dedupe_by_fitness_and_techniques() {
    let store = ProfileStore::builtin();
    let t = target(
        &store,
        "x64",
        "win7_rtm_x64",
        "ie8_x64",
        "relative_stack_corruption_forward_adjacent",
    );
    let all = simulate(&store, t.clone(), Modes::default(), keep_all());
    let distinct: BTreeSet<(u64, Vec<Technique>)> = successful(&all)
        .iter()
        .map(|r| {
            (
                r.fitness.to_bits(),
                r.techniques.iter().copied().collect::<Vec<_>>(),
            )
        })
        .collect();

    let deduped = simulate(&store, t, Modes::default(), Tracking::default());
    assert_eq!(successful(&deduped).len(), distinct.len());
    // Membership counts account for every completed branch.
    let members: usize = successful(&deduped).iter().map(|r| r.members).sum();
    assert_eq!(members, deduped.completed());
}

#[test]
fn minimal_tracking_discards_unconsulted_preparation() {
    let store = ProfileStore::builtin();
    let t = target(
        &store,
        "x64",
        "win7_rtm_x64",
        "ie8_x64",
        "relative_stack_corruption_forward_adjacent",
    );
    let tracking = Tracking {
        equivalent_only: false,
        minimal_only: true,
        ..Tracking::default()
    };
    let global = simulate(&store, t, Modes::default(), tracking);
    let paths = successful(&global);
    assert!(!paths.is_empty());

    // Heap grooming contributes nothing to a stack-corruption strategy.
    assert!(paths.iter().all(|r| !events(r).contains(&"massage_heap")));
    // Stronger: every surviving preparation step left a consulted fact.
    for record in &paths {
        for step in &record.trace {
            if !PREP_LOOPS.contains(&step.event.name()) {
                continue;
            }
            let contributed = record
                .assumptions
                .iter()
                .any(|a| a.event == Some(step.event) && a.used);
            assert!(
                contributed,
                "{} contributed no consulted assumption",
                step.event
            );
        }
    }
}

#[test]
fn aborted_branches_carry_zero_exploitability_and_a_reason() {
    let store = ProfileStore::builtin();
    let t = target(
        &store,
        "x64",
        "win7_rtm_x64",
        "ie8_x64",
        "relative_stack_corruption_forward_adjacent",
    );
    let tracking = Tracking {
        impossible: true,
        equivalent_only: false,
        ..Tracking::default()
    };
    let global = simulate(&store, t, Modes::default(), tracking);
    let aborted: Vec<&SimulationRecord> = global
        .records()
        .iter()
        .filter(|r| r.aborted.is_some())
        .collect();
    assert!(!aborted.is_empty());
    assert_eq!(aborted.len(), global.aborted());
    for record in aborted {
        assert_eq!(record.exploitability, 0.0);
        assert_eq!(record.fitness, 0.0);
        assert!(!record.trace.is_empty());
    }
}

#[test]
fn no_transition_repeats_within_a_branch() {
    let store = ProfileStore::builtin();
    let t = target(&store, "x86_nx", "xp_sp2", "office11", "absolute_write");
    let global = simulate(&store, t, Modes::default(), keep_all());
    for record in global.records() {
        let steps: Vec<(&str, &str, &str)> = record
            .trace
            .iter()
            .map(|s| (s.source.name(), s.event.name(), s.dest.name()))
            .collect();
        let unique: BTreeSet<&(&str, &str, &str)> = steps.iter().collect();
        assert_eq!(steps.len(), unique.len());
    }
}

#[test]
fn defense_favor_resolves_unspecified_fields_against_the_attacker() {
    let store = ProfileStore::builtin();
    let mut t = target(
        &store,
        "x64",
        "win7_rtm_x64",
        "ie8_x64",
        "relative_stack_corruption_forward_adjacent",
    );
    // Strip the explicit assertions so the mode decides.
    t.flaw.asserts.can_corrupt_return_address = None;
    t.flaw.asserts.can_corrupt_frame_pointer = None;
    t.flaw.asserts.can_corrupt_seh_frame = None;

    let attack = simulate(
        &store,
        t.clone(),
        Modes {
            attack_favor: true,
            ..Modes::default()
        },
        keep_all(),
    );
    let defense = simulate(
        &store,
        t,
        Modes {
            defense_favor: true,
            ..Modes::default()
        },
        keep_all(),
    );
    assert!(!successful(&attack).is_empty());
    assert!(successful(&attack).len() >= successful(&defense).len());
}
