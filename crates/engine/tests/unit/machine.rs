//! Probability helpers and machine shape.

use rstest::rstest;

use expsim_core::machine::helpers;
use expsim_core::machine::state::State;
use expsim_core::machine::transition::StateMachine;
use expsim_core::machine::fact::Fact;
use expsim_core::profiles::store::ProfileStore;
use expsim_core::profiles::types::{Policy, Position, Region};
use expsim_core::sim::context::{Modes, SimulationContext, Tracking};

use crate::common::target;

fn context_for(hw: &str, os: &str, app: &str, flaw: &str) -> SimulationContext {
    let store = ProfileStore::builtin();
    let t = target(&store, hw, os, app, flaw);
    SimulationContext::new(t, Modes::default(), Tracking::default())
}

#[rstest]
// Hardware NX off beats everything downstream.
#[case("x86", "win7_rtm", "ie8", false)]
// OS supports it, application opted in.
#[case("x86_nx", "win7_rtm", "ie8", true)]
// Application opted out (Office never enabled NX on its own).
#[case("x86_nx", "xp_sp2", "office11", false)]
// 64-bit processes run with NX regardless of preference.
#[case("x64", "win7_rtm_x64", "ie8_x64", true)]
fn user_nx_resolution(
    #[case] hw: &str,
    #[case] os: &str,
    #[case] app: &str,
    #[case] expected: bool,
) {
    let ctx = context_for(hw, os, app, "relative_stack_corruption_forward_adjacent");
    assert_eq!(helpers::user_nx_enabled(&ctx), expected);
}

#[test]
fn stack_protection_bypass_prices_the_cookie_guess() {
    let mut ctx = context_for(
        "x64",
        "win7_rtm_x64",
        "ie8_x64",
        "relative_stack_corruption_forward_adjacent",
    );
    assert_eq!(
        helpers::can_bypass_stack_protection(&mut ctx),
        2f64.powi(-48)
    );
}

#[test]
fn stack_protection_bypass_is_certain_without_the_cookie_in_the_way() {
    let store = ProfileStore::builtin();
    let flaw = "relative_stack_corruption_forward_adjacent";

    // Protection disabled.
    let mut t = target(&store, "x64", "win7_rtm_x64", "ie8_x64", flaw);
    t.flaw.stack_protection.enabled = Some(false);
    let mut ctx = SimulationContext::new(t, Modes::default(), Tracking::default());
    assert_eq!(helpers::can_bypass_stack_protection(&mut ctx), 1.0);

    // Non-adjacent corruption skips the cookie.
    let mut t = target(&store, "x64", "win7_rtm_x64", "ie8_x64", flaw);
    t.flaw.corruption.position = Some(Position::NonAdjacent);
    let mut ctx = SimulationContext::new(t, Modes::default(), Tracking::default());
    assert_eq!(helpers::can_bypass_stack_protection(&mut ctx), 1.0);

    // Discoverable cookie.
    let mut t = target(&store, "x64", "win7_rtm_x64", "ie8_x64", flaw);
    t.capabilities.can_discover_stack_protection_cookie = Some(true);
    let mut ctx = SimulationContext::new(t, Modes::default(), Tracking::default());
    assert_eq!(helpers::can_bypass_stack_protection(&mut ctx), 1.0);

    // Absolute writes never pass over the cookie.
    let t = target(&store, "x86_nx", "xp_sp2", "office11", "absolute_write");
    let mut ctx = SimulationContext::new(t, Modes::default(), Tracking::default());
    assert_eq!(helpers::can_bypass_stack_protection(&mut ctx), 1.0);
}

#[test]
fn aslr_inhibition_degrees() {
    let store = ProfileStore::builtin();
    let flaw = "relative_stack_corruption_forward_adjacent";

    // No randomization support at all.
    let t = target(&store, "x86_nx", "xp_sp2", "ie8", flaw);
    let mut ctx = SimulationContext::new(t, Modes::default(), Tracking::default());
    assert_eq!(helpers::aslr_inhibition_degree(&mut ctx, Region::Stack), 0.0);

    // First-generation stack randomization: 14 bits.
    let t = target(&store, "x86_nx", "win7_rtm", "ie8", flaw);
    let mut ctx = SimulationContext::new(t, Modes::default(), Tracking::default());
    assert_eq!(
        helpers::aslr_inhibition_degree(&mut ctx, Region::Stack),
        1.0 - 2f64.powi(-14)
    );

    // A local flaw nullifies randomization.
    let mut t = target(&store, "x86_nx", "win7_rtm", "ie8", flaw);
    t.flaw.local = Some(true);
    let mut ctx = SimulationContext::new(t, Modes::default(), Tracking::default());
    assert_eq!(helpers::aslr_inhibition_degree(&mut ctx, Region::Stack), 0.0);

    // So does an explicit discovery capability.
    let mut t = target(&store, "x86_nx", "win7_rtm", "ie8", flaw);
    t.capabilities.can_discover_stack_address = Some(true);
    let mut ctx = SimulationContext::new(t, Modes::default(), Tracking::default());
    assert_eq!(helpers::aslr_inhibition_degree(&mut ctx, Region::Stack), 0.0);

    // Low entropy is brute-forceable when the process restarts itself.
    let t = target(&store, "x86_nx", "win7_rtm", "svc_host", flaw);
    let mut ctx = SimulationContext::new(t, Modes::default(), Tracking::default());
    assert_eq!(helpers::aslr_inhibition_degree(&mut ctx, Region::Heap), 0.0);
}

#[test]
fn data_region_aliases_to_its_best_constituent() {
    let store = ProfileStore::builtin();
    let t = target(
        &store,
        "x86_nx",
        "win7_rtm",
        "ie8",
        "relative_heap_corruption_forward_adjacent",
    );
    let mut ctx = SimulationContext::new(t, Modes::default(), Tracking::default());
    // Heap (5 bits) is the easiest of heap/stack/peb to land in.
    let expected = [Region::Heap, Region::Stack, Region::Peb]
        .iter()
        .map(|&r| 1.0 - helpers::aslr_inhibition_degree(&mut ctx, r))
        .fold(0.0, f64::max);
    assert_eq!(helpers::can_find_address(&mut ctx, Region::Data), expected);

    // A data spray makes the question moot.
    ctx.explicitly_assume(Fact::SprayedData);
    assert_eq!(helpers::can_find_address(&mut ctx, Region::Data), 1.0);
}

#[test]
fn sehop_bypass_compounds_ntdll_and_stack_discovery() {
    let store = ProfileStore::builtin();
    let mut t = target(
        &store,
        "x86_nx",
        "win7_rtm",
        "svc_host",
        "relative_stack_corruption_forward_adjacent",
    );
    t.application.automatic_restart = false;
    let mut ctx = SimulationContext::new(t, Modes::default(), Tracking::default());
    let ntdll = helpers::can_find_address(&mut ctx, Region::Ntdll);
    let stack = helpers::can_find_address(&mut ctx, Region::Stack);
    assert_eq!(helpers::can_bypass_sehop(&mut ctx), ntdll * stack);

    // With SEHOP off the bypass is free.
    let mut t = target(
        &store,
        "x86_nx",
        "win7_rtm",
        "ie8",
        "relative_stack_corruption_forward_adjacent",
    );
    t.os.sehop = Policy::Off;
    let mut ctx = SimulationContext::new(t, Modes::default(), Tracking::default());
    assert_eq!(helpers::can_bypass_sehop(&mut ctx), 1.0);
}

#[test]
fn machine_has_the_full_state_set() {
    let machine = StateMachine::exploitation();
    let names = machine.state_names();
    assert_eq!(names.len(), State::ALL.len());
    let mut sorted = names.clone();
    sorted.sort_unstable();
    assert_eq!(names, sorted);
    assert!(names.contains(&"control_of_code_execution"));
    assert!(names.contains(&"bypassing_nx"));
}

#[test]
fn terminal_state_has_no_outgoing_transitions() {
    let machine = StateMachine::exploitation();
    assert_eq!(machine.outgoing(StateMachine::TERMINAL).count(), 0);
    assert_eq!(machine.outgoing(StateMachine::INITIAL).count(), 1);
}

#[test]
fn every_state_is_reachable_from_the_table() {
    let machine = StateMachine::exploitation();
    for state in State::ALL {
        let appears = machine
            .transitions()
            .iter()
            .any(|t| t.source == state || t.dest == state);
        assert!(appears, "state {state} missing from the transition table");
    }
}
