//! Probability helpers shared by transition effects.
//!
//! Each helper prices one question about the current branch: can an
//! address be found, can data be executed, can a mitigation be bypassed.
//! Helpers consult the branch's assumption table (marking consulted
//! entries used) before falling back to target fields, so environment
//! preparation steps influence every later guard.

use crate::machine::fact::Fact;
use crate::profiles::types::{
    AccessKind, ArchFamily, CorruptionRegion, Direction, Displacement, Position, Region,
};
use crate::sim::context::{IntoProbability, SimulationContext};

/// Whether the flaw is local to the attacked machine.
pub fn is_local_flaw(ctx: &SimulationContext) -> bool {
    ctx.modes.resolve(ctx.target.flaw.local, false)
}

/// Whether the flawed code runs in kernel mode.
pub fn is_kernel_flaw(ctx: &SimulationContext) -> bool {
    ctx.target
        .flaw
        .kernel
        .unwrap_or(ctx.target.application.kernel)
}

/// The application's NX preference as a tri-state opt-in.
fn app_nx_opt(ctx: &SimulationContext) -> Option<bool> {
    use crate::profiles::types::Policy;
    match ctx.target.application.nx {
        Policy::On => Some(true),
        Policy::Off => Some(false),
        _ => None,
    }
}

/// Effective user-mode NX: the AND of application, OS, and hardware NX
/// states, with explicit off short-circuiting.
pub fn user_nx_enabled(ctx: &SimulationContext) -> bool {
    if !ctx.target.hardware.nx.supported() {
        return false;
    }
    ctx.target.os.nx.resolve(app_nx_opt(ctx))
}

/// Whether NX blocks execution of data in `region`.
fn nx_blocks(ctx: &SimulationContext, region: Region) -> bool {
    user_nx_enabled(ctx)
        && ctx
            .target
            .os
            .nx_regions
            .for_region(region)
            .resolve(app_nx_opt(ctx))
}

/// Whether NX currently blocks execution of attacker data.
pub fn nx_blocks_data(ctx: &SimulationContext) -> bool {
    nx_blocks(ctx, Region::Data)
}

/// Whether `region` is randomized on this target.
fn aslr_enabled(ctx: &SimulationContext, region: Region) -> bool {
    let app = &ctx.target.application;
    let opt_in = match region {
        Region::Image => app.force_relocation,
        Region::Heap | Region::Data | Region::Code => app.heap_aslr,
        Region::Stack => app.stack_aslr,
        Region::Peb | Region::Ntdll => None,
    };
    ctx.target.os.aslr.for_region(region).policy.resolve(opt_in)
}

/// Whether the address of `region` is already known on this branch.
fn discovered(ctx: &mut SimulationContext, region: Region) -> bool {
    if ctx.consult_true(&Fact::DiscoveredAddress(region)) {
        return true;
    }
    ctx.modes
        .resolve(ctx.target.capabilities.discovery(region), false)
}

/// The degree to which randomization inhibits locating `region`.
///
/// `1 - 2^-entropy`, except zero when the flaw is local, the address is
/// discovered or discoverable, randomization is off, or the entropy is
/// small enough (≤ 8 bits) to brute-force against an automatically
/// restarting process.
pub fn aslr_inhibition_degree(ctx: &mut SimulationContext, region: Region) -> f64 {
    if is_local_flaw(ctx) || discovered(ctx, region) || !aslr_enabled(ctx, region) {
        return 0.0;
    }
    let entropy = ctx.target.os.aslr.for_region(region).entropy_bits;
    if entropy <= 8 && ctx.target.application.automatic_restart {
        return 0.0;
    }
    1.0 - 2f64.powi(-(entropy as i32))
}

/// Probability that the address of `region` can be found.
///
/// `Data` is satisfied by a data spray or by any of its alias regions;
/// `Code` only by a code spray.
pub fn can_find_address(ctx: &mut SimulationContext, region: Region) -> f64 {
    match region {
        Region::Data => {
            if ctx.consult_true(&Fact::SprayedData) {
                return 1.0;
            }
            Region::DATA_ALIASES
                .iter()
                .map(|&alias| 1.0 - aslr_inhibition_degree(ctx, alias))
                .fold(0.0, f64::max)
        }
        Region::Code => {
            if ctx.consult_true(&Fact::SprayedCode) {
                1.0
            } else {
                0.0
            }
        }
        other => 1.0 - aslr_inhibition_degree(ctx, other),
    }
}

/// Probability that data at `region` can be executed.
///
/// Consults NX-bypass assertions first; kernel flaws answer for SMEP
/// instead of user NX.
pub fn can_execute_at_address(ctx: &mut SimulationContext, region: Region) -> f64 {
    if ctx.consult_true(&Fact::CanExecuteAtAddress(region)) {
        return 1.0;
    }
    // A data-wide bypass covers every attacker-controlled data region.
    if region != Region::Data && ctx.consult_true(&Fact::CanExecuteAtAddress(Region::Data)) {
        return 1.0;
    }
    if is_kernel_flaw(ctx) {
        let smep = ctx.target.hardware.smep.supported()
            && ctx.target.os.kernel_smep.resolve(None);
        return (!smep).into_probability();
    }
    if nx_blocks(ctx, region) { 0.0 } else { 1.0 }
}

/// Probability of bypassing stack protection for the flawed function.
///
/// `1/2^entropy` when protection is enabled and the corruption must pass
/// over the cookie; certainty when protection is off, the corruption is
/// non-adjacent or absolute, or the cookie is discoverable.
pub fn can_bypass_stack_protection(ctx: &mut SimulationContext) -> f64 {
    let sp = ctx.target.flaw.stack_protection;
    if !ctx.modes.resolve(sp.enabled, false) {
        return 1.0;
    }
    let corruption = ctx.target.flaw.corruption;
    if corruption.displacement == Some(Displacement::Absolute) {
        return 1.0;
    }
    let non_adjacent = ctx
        .modes
        .resolve(corruption.position.map(|p| p == Position::NonAdjacent), false);
    if non_adjacent {
        return 1.0;
    }
    let cookie_known = ctx.modes.resolve(
        ctx.target.capabilities.can_discover_stack_protection_cookie,
        false,
    );
    if cookie_known {
        return 1.0;
    }
    2f64.powi(-(sp.entropy_bits.unwrap_or(32) as i32))
}

/// Probability of bypassing SafeSEH handler validation.
pub fn can_bypass_safeseh(ctx: &mut SimulationContext) -> f64 {
    if !ctx.target.os.safeseh_enforced {
        return 1.0;
    }
    ctx.consult_true(&Fact::LoadedNonSafeSehImage).into_probability()
}

/// Probability of bypassing SEH overwrite protection.
///
/// When the chain validation is active the attacker must know both the
/// `ntdll` base (for the terminating handler) and a stack address (for
/// the fake chain), so the two find-address probabilities compound.
pub fn can_bypass_sehop(ctx: &mut SimulationContext) -> f64 {
    let enabled = ctx.target.os.sehop.resolve(ctx.target.application.sehop);
    if !enabled {
        return 1.0;
    }
    can_find_address(ctx, Region::Ntdll) * can_find_address(ctx, Region::Stack)
}

/// Probability of bypassing vtable-guard instrumentation.
pub fn can_bypass_vtable_guard(ctx: &mut SimulationContext) -> f64 {
    let vg = ctx.target.flaw.vtable_guard;
    if !ctx.modes.resolve(vg.enabled, false) {
        return 1.0;
    }
    if ctx.consult_true(&Fact::DiscoveredVtguardCookie) {
        return 1.0;
    }
    ctx.modes
        .resolve(ctx.target.capabilities.can_discover_vtguard_cookie, false)
        .into_probability()
}

/// Whether SEH registration records live on the stack at all
/// (32-bit x86 user mode only).
pub fn seh_frames_exist(ctx: &SimulationContext) -> bool {
    !ctx.target.application.width.is_64()
        && !is_kernel_flaw(ctx)
        && ctx.target.hardware.family == ArchFamily::X86
}

/// Whether stack frames link through a saved frame pointer the flaw could
/// reach (x86 calling convention).
pub fn frame_pointer_frames(ctx: &SimulationContext) -> bool {
    ctx.target.hardware.family == ArchFamily::X86 && !ctx.target.application.width.is_64()
}

/// Whether the flaw can corrupt stack memory.
pub fn can_corrupt_stack_memory(ctx: &SimulationContext) -> bool {
    ctx.target.flaw.corrupts(CorruptionRegion::Stack)
}

/// Probability of locating the corrupted stack frame.
///
/// Relative corruptions land in the right frame by construction; absolute
/// ones need a stack address.
pub fn can_find_stack_frame_address(ctx: &mut SimulationContext) -> f64 {
    match ctx.target.flaw.corruption.displacement {
        Some(Displacement::Absolute) => can_find_address(ctx, Region::Stack),
        _ => 1.0,
    }
}

/// Resolves a flaw capability assertion, deriving the normal-mode default
/// from the corruption attributes.
fn asserted(ctx: &SimulationContext, value: Option<bool>, normally: bool) -> bool {
    ctx.modes.resolve(value, normally)
}

/// Whether the flaw can corrupt a return address.
pub fn can_corrupt_return_address(ctx: &SimulationContext) -> bool {
    let flaw = &ctx.target.flaw;
    let normally = flaw.corrupts(CorruptionRegion::Stack)
        && flaw.corruption.direction != Some(Direction::Reverse);
    asserted(ctx, flaw.asserts.can_corrupt_return_address, normally)
}

/// Whether the flaw can corrupt a saved frame pointer.
pub fn can_corrupt_frame_pointer(ctx: &SimulationContext) -> bool {
    let flaw = &ctx.target.flaw;
    let normally = flaw.corrupts(CorruptionRegion::Stack);
    asserted(ctx, flaw.asserts.can_corrupt_frame_pointer, normally)
}

/// Whether the flaw can corrupt an SEH registration record.
pub fn can_corrupt_seh_frame(ctx: &SimulationContext) -> bool {
    let flaw = &ctx.target.flaw;
    let normally = flaw.corrupts(CorruptionRegion::Stack);
    seh_frames_exist(ctx) && asserted(ctx, flaw.asserts.can_corrupt_seh_frame, normally)
}

/// Whether the flaw can corrupt a function pointer.
pub fn can_corrupt_function_pointer(ctx: &SimulationContext) -> bool {
    let flaw = &ctx.target.flaw;
    let normally = flaw.corrupts(CorruptionRegion::Heap)
        || flaw.corrupts(CorruptionRegion::DataSeg);
    asserted(ctx, flaw.asserts.can_corrupt_function_pointer, normally)
}

/// Whether the flaw yields control of a write's destination pointer.
pub fn can_corrupt_write_target_pointer(ctx: &SimulationContext) -> bool {
    let flaw = &ctx.target.flaw;
    let normally = flaw.access == AccessKind::Write
        && flaw.corruption.displacement == Some(Displacement::Absolute);
    asserted(ctx, flaw.asserts.can_corrupt_write_target_pointer, normally)
}

/// Whether the flaw can corrupt live object state.
pub fn can_corrupt_in_use_object_state(ctx: &SimulationContext) -> bool {
    let flaw = &ctx.target.flaw;
    let normally = flaw.corrupts(CorruptionRegion::Heap);
    asserted(ctx, flaw.asserts.can_corrupt_in_use_object_state, normally)
}

/// Whether the flaw can corrupt heap management data.
pub fn can_corrupt_heap_management_data(ctx: &SimulationContext) -> bool {
    let flaw = &ctx.target.flaw;
    let normally = flaw.corrupts(CorruptionRegion::Heap);
    asserted(ctx, flaw.asserts.can_corrupt_heap_management_data, normally)
}

/// Whether the flaw can corrupt a C++ object vtable pointer.
pub fn can_corrupt_cpp_object_vtable(ctx: &SimulationContext) -> bool {
    let flaw = &ctx.target.flaw;
    let normally = flaw.corrupts(CorruptionRegion::Heap);
    asserted(ctx, flaw.asserts.can_corrupt_cpp_object_vtable, normally)
}
