//! The staged recalibration pipeline.
//!
//! Recalibration re-derives every dependent field of a target after a
//! mutation. It is organised as a fixed list of named stages, applied in
//! component order: hardware → OS → application → flaw → capabilities.
//! Each stage reads its inputs and writes its outputs, never its own
//! writes, so the pipeline converges in one pass and a second run over an
//! already-coherent target changes nothing.

use crate::profiles::os::NxMap;
use crate::profiles::types::{ArchFamily, OsFamily, Policy};
use crate::target::Target;

/// One named recalibration stage.
struct Stage {
    /// Stage name, used in trace logging.
    name: &'static str,
    /// The adjustment; reads inputs, writes outputs.
    apply: fn(&mut Target),
}

/// The pipeline, in application order.
const STAGES: &[Stage] = &[
    Stage {
        name: "hardware_nx_gate",
        apply: hardware_nx_gate,
    },
    Stage {
        name: "os_nx_regions",
        apply: os_nx_regions,
    },
    Stage {
        name: "app_nx_permanent_on_64bit",
        apply: app_nx_permanent_on_64bit,
    },
    Stage {
        name: "app_arm_win8_mitigations",
        apply: app_arm_win8_mitigations,
    },
    Stage {
        name: "app_inherit_os_defaults",
        apply: app_inherit_os_defaults,
    },
    Stage {
        name: "flaw_inherit_app_defaults",
        apply: flaw_inherit_app_defaults,
    },
    Stage {
        name: "flaw_stack_protection_entropy",
        apply: flaw_stack_protection_entropy,
    },
    Stage {
        name: "cap_non_aslr_image_discovery",
        apply: cap_non_aslr_image_discovery,
    },
    Stage {
        name: "cap_high_entropy_spray_gate",
        apply: cap_high_entropy_spray_gate,
    },
];

/// Runs every stage in order.
pub fn run(target: &mut Target) {
    for stage in STAGES {
        tracing::trace!(stage = stage.name, "recalibrate");
        (stage.apply)(target);
    }
}

/// Hardware without NX forces the OS user NX support off.
fn hardware_nx_gate(target: &mut Target) {
    if !target.hardware.nx.supported() {
        target.os.nx = Policy::Off;
    }
}

/// An OS with NX off or unsupported forces every per-region policy off.
fn os_nx_regions(target: &mut Target) {
    if !target.os.nx.supported() {
        target.os.nx_regions = NxMap::uniform(Policy::Off);
    }
}

/// 64-bit Windows applications always run with permanent NX.
fn app_nx_permanent_on_64bit(target: &mut Target) {
    if target.application.width.is_64() {
        target.application.nx = Policy::On;
        target.application.nx_permanent = Some(true);
    }
}

/// ARM Windows 8 forces every user mitigation on except force-relocation
/// and SEHOP.
fn app_arm_win8_mitigations(target: &mut Target) {
    if target.hardware.family != ArchFamily::Arm || !target.os.family.is_win8_era() {
        return;
    }
    let app = &mut target.application;
    app.nx = Policy::On;
    app.bottom_up_aslr = Some(true);
    app.heap_aslr = Some(true);
    app.stack_aslr = Some(true);
    app.heap_termination = Some(true);
    app.stack_protection.enabled = Some(true);
}

/// Application defaults inherit from the OS where unset.
fn app_inherit_os_defaults(target: &mut Target) {
    let app = &mut target.application;
    if app.stack_protection.enabled.is_none() {
        app.stack_protection.enabled = target.os.stack_protection.enabled;
    }
    if app.stack_protection.version.is_none() {
        app.stack_protection.version = target.os.stack_protection.version;
    }
    if app.heap_frontend.is_none() {
        app.heap_frontend = Some(target.os.heap_frontend);
    }
    if app.heap_frontend_version.is_none() {
        app.heap_frontend_version = Some(target.os.heap_frontend_version);
    }
}

/// Per-function flaw settings inherit from the application where unset.
fn flaw_inherit_app_defaults(target: &mut Target) {
    let flaw = &mut target.flaw;
    if flaw.stack_protection.enabled.is_none() {
        flaw.stack_protection.enabled = target.application.stack_protection.enabled;
    }
    if flaw.stack_protection.version.is_none() {
        flaw.stack_protection.version = target.application.stack_protection.version;
    }
    if flaw.vtable_guard.enabled.is_none() {
        flaw.vtable_guard.enabled = target.application.vtable_guard.enabled;
    }
    if flaw.vtable_guard.level.is_none() {
        flaw.vtable_guard.level = target.application.vtable_guard.level;
    }
}

/// Default stack-protection cookie entropy.
///
/// 16 bits on XP/2003, 32 bits for Vista-or-later 32-bit processes,
/// 48 bits for 64-bit processes, and 17 bits for local flaws (the
/// entropy-reduction model: a local attacker observes most cookie inputs).
fn flaw_stack_protection_entropy(target: &mut Target) {
    if target.flaw.stack_protection.entropy_bits.is_some() {
        return;
    }
    let bits = if target.flaw.local == Some(true) {
        17
    } else if target.application.width.is_64() {
        48
    } else if target.os.family.at_least(OsFamily::WindowsVista) {
        32
    } else {
        16
    };
    target.flaw.stack_protection.entropy_bits = Some(bits);
}

/// Loading a non-ASLR image implies the image address is discoverable.
fn cap_non_aslr_image_discovery(target: &mut Target) {
    if target.capabilities.can_load_non_aslr_image == Some(true) {
        target.capabilities.can_discover_image_address = Some(true);
    }
}

/// Windows 8-era 64-bit processes with bottom-up randomization defeat
/// address-space sprays; the spray capabilities are forced off.
fn cap_high_entropy_spray_gate(target: &mut Target) {
    let win8_64 = target.os.family.is_win8_era() && target.application.width.is_64();
    if win8_64 && target.application.bottom_up_aslr == Some(true) {
        target.capabilities.can_spray_data_bottom_up = Some(false);
        target.capabilities.can_spray_code_bottom_up = Some(false);
    }
}
