//! Recalibration pipeline and compatibility rules.

use expsim_core::error::EngineError;
use expsim_core::profiles::store::ProfileStore;
use expsim_core::profiles::types::Policy;
use expsim_core::target::Target;

use crate::common::target;

#[test]
fn recalibrate_is_idempotent() {
    let store = ProfileStore::builtin();
    let once = target(&store, "x64", "win7_rtm_x64", "ie8_x64", "absolute_write");
    let mut twice = once.clone();
    twice.recalibrate().unwrap();
    assert_eq!(once, twice);
}

#[test]
fn hardware_without_nx_forces_os_nx_off() {
    let store = ProfileStore::builtin();
    let t = target(
        &store,
        "x86",
        "win7_rtm",
        "ie8",
        "relative_stack_corruption_forward_adjacent",
    );
    assert_eq!(t.os.nx, Policy::Off);
    assert_eq!(t.os.nx_regions.stack, Policy::Off);
    assert_eq!(t.os.nx_regions.heap, Policy::Off);
    assert_eq!(t.os.nx_regions.data, Policy::Off);
}

#[test]
fn sixty_four_bit_application_gets_permanent_nx() {
    let store = ProfileStore::builtin();
    let t = target(
        &store,
        "x64",
        "win7_rtm_x64",
        "ie8_x64",
        "relative_stack_corruption_forward_adjacent",
    );
    assert_eq!(t.application.nx, Policy::On);
    assert_eq!(t.application.nx_permanent, Some(true));
}

#[test]
fn arm_win8_forces_user_mitigations_except_relocation_and_sehop() {
    let store = ProfileStore::builtin();
    let t = target(
        &store,
        "arm",
        "win8_arm",
        "ie10",
        "relative_heap_corruption_forward_adjacent",
    );
    assert_eq!(t.application.nx, Policy::On);
    assert_eq!(t.application.bottom_up_aslr, Some(true));
    assert_eq!(t.application.heap_aslr, Some(true));
    assert_eq!(t.application.stack_aslr, Some(true));
    assert_eq!(t.application.heap_termination, Some(true));
    assert_eq!(t.application.stack_protection.enabled, Some(true));
    // Explicitly exempted from the forced set.
    assert_eq!(t.application.sehop, None);
}

#[test]
fn stack_protection_inherits_down_the_chain() {
    let store = ProfileStore::builtin();
    let t = target(
        &store,
        "x64",
        "win7_rtm_x64",
        "ie8_x64",
        "relative_stack_corruption_forward_adjacent",
    );
    // Flaw had no per-function setting; application had none either; both
    // end up on the OS default.
    assert_eq!(t.application.stack_protection.enabled, Some(true));
    assert_eq!(t.flaw.stack_protection.enabled, Some(true));
    assert_eq!(
        t.flaw.stack_protection.version,
        t.os.stack_protection.version
    );
}

#[test]
fn entropy_defaults_by_platform() {
    let store = ProfileStore::builtin();
    let flaw = "relative_stack_corruption_forward_adjacent";

    let xp = target(&store, "x86_nx", "xp_sp2", "ie8", flaw);
    assert_eq!(xp.flaw.stack_protection.entropy_bits, Some(16));

    let win7_32 = target(&store, "x86_nx", "win7_rtm", "ie8", flaw);
    assert_eq!(win7_32.flaw.stack_protection.entropy_bits, Some(32));

    let win7_64 = target(&store, "x64", "win7_rtm_x64", "ie8_x64", flaw);
    assert_eq!(win7_64.flaw.stack_protection.entropy_bits, Some(48));

    let mut local = target(&store, "x64", "win7_rtm_x64", "ie8_x64", flaw);
    local.flaw.stack_protection.entropy_bits = None;
    local.flaw.local = Some(true);
    local.recalibrate().unwrap();
    assert_eq!(local.flaw.stack_protection.entropy_bits, Some(17));
}

#[test]
fn loading_non_aslr_images_implies_image_discovery() {
    let store = ProfileStore::builtin();
    let mut t = Target::from_defaults(&store).unwrap();
    t.capabilities.can_discover_image_address = Some(false);
    t.capabilities.can_load_non_aslr_image = Some(true);
    t.recalibrate().unwrap();
    assert_eq!(t.capabilities.can_discover_image_address, Some(true));
}

#[test]
fn win8_64_bottom_up_forces_sprays_off() {
    let store = ProfileStore::builtin();
    let t = target(
        &store,
        "x64",
        "win8_client_x64",
        "ie10_x64",
        "relative_heap_corruption_forward_adjacent",
    );
    assert_eq!(t.capabilities.can_spray_data_bottom_up, Some(false));
    assert_eq!(t.capabilities.can_spray_code_bottom_up, Some(false));

    // The same application on Windows 7 keeps its spray capabilities.
    let win7 = target(
        &store,
        "x64",
        "win7_rtm_x64",
        "ie10_x64",
        "relative_heap_corruption_forward_adjacent",
    );
    assert_eq!(win7.capabilities.can_spray_data_bottom_up, Some(true));
}

fn incompatible(store: &ProfileStore, hw: &str, os: &str, app: &str, flaw: &str) -> bool {
    let mut t = Target::from_defaults(store).unwrap();
    t.set_hw(store, hw).unwrap();
    t.set_os(store, os).unwrap();
    t.set_app(store, app).unwrap();
    t.set_flaw(store, flaw).unwrap();
    matches!(t.recalibrate(), Err(EngineError::IncompatibleTarget(_)))
}

#[test]
fn incompatible_tuples_are_rejected() {
    let store = ProfileStore::builtin();
    let flaw = "relative_stack_corruption_forward_adjacent";
    // 64-bit OS on 32-bit hardware.
    assert!(incompatible(&store, "x86_nx", "win7_rtm_x64", "ie8", flaw));
    // 64-bit application on a 32-bit OS.
    assert!(incompatible(&store, "x64", "win7_rtm", "ie8_x64", flaw));
    // Application newer than the OS family allows.
    assert!(incompatible(&store, "x86_nx", "xp_sp2", "ie10", flaw));
    // ARM hardware without an ARM build.
    assert!(incompatible(&store, "arm", "win8_arm", "office11", flaw));
    // Kernel flaw in a user-mode application.
    let mut t = Target::from_defaults(&store).unwrap();
    t.flaw.kernel = Some(true);
    assert!(t.recalibrate().is_err());
}

#[test]
fn kernel_flaw_in_kernel_component_is_compatible() {
    let store = ProfileStore::builtin();
    let mut t = Target::from_defaults(&store).unwrap();
    t.set_os(&store, "win8_server_x64").unwrap();
    t.set_app(&store, "kernel_driver").unwrap();
    t.set_flaw(&store, "null_deref").unwrap();
    t.flaw.kernel = Some(true);
    assert!(t.recalibrate().is_ok());
}
