//! Transition effects.
//!
//! One effect function per transition, each built from the three
//! primitives: `predicate` (guard; multiplies exploitability and aborts
//! the branch on zero), `assume` (records a fact without the zero-aborts
//! rule), and `technique` (tags the branch). The [`table`] function at the
//! bottom declares every transition in fan-out order; sibling branches
//! fork in exactly this order.

use crate::error::{SimAbort, SimResult};
use crate::machine::event::Event;
use crate::machine::fact::Fact;
use crate::machine::helpers as h;
use crate::machine::state::State;
use crate::machine::technique::Technique;
use crate::profiles::store::ProfileStore;
use crate::profiles::types::{ArchFamily, HeapFrontend, OsFamily, Region, RootCause};
use crate::sim::context::SimulationContext;

/// Effect function type: runs against the branch's cloned context.
pub type Effect = fn(&mut SimulationContext, &ProfileStore) -> SimResult<()>;

/// Skips a preparation step whose facts are already established.
fn necessary(ctx: &SimulationContext, event: Event, facts: &[Fact]) -> SimResult<()> {
    if facts.iter().all(|f| ctx.peek(f).is_some_and(|v| v > 0.0)) {
        return Err(SimAbort::new(Fact::NecessaryTo(event)));
    }
    Ok(())
}

fn prepare_environment(_ctx: &mut SimulationContext, _store: &ProfileStore) -> SimResult<()> {
    Ok(())
}

/// Whether the process lets non-ASLR images load at their preferred base.
fn non_aslr_image_loadable(ctx: &SimulationContext) -> bool {
    let possible = ctx
        .modes
        .resolve(ctx.target.capabilities.can_load_non_aslr_image, false);
    let rebased = ctx
        .modes
        .resolve(ctx.target.application.force_relocation, false);
    possible && !rebased
}

fn load_non_aslr_image(ctx: &mut SimulationContext, _store: &ProfileStore) -> SimResult<()> {
    necessary(
        ctx,
        Event::LoadNonAslrImage,
        &[Fact::DiscoveredAddress(Region::Image)],
    )?;
    let possible = non_aslr_image_loadable(ctx);
    ctx.predicate(Fact::CanLoadNonAslrImage, possible)?;
    ctx.explicitly_assume(Fact::LoadedNonAslrImage);
    ctx.explicitly_assume(Fact::DiscoveredAddress(Region::Image));
    ctx.technique(Technique::NonAslrImageLoad);
    Ok(())
}

fn load_non_aslr_non_safeseh_image(
    ctx: &mut SimulationContext,
    _store: &ProfileStore,
) -> SimResult<()> {
    necessary(
        ctx,
        Event::LoadNonAslrNonSafeSehImage,
        &[Fact::LoadedNonSafeSehImage],
    )?;
    let possible = non_aslr_image_loadable(ctx);
    ctx.predicate(Fact::CanLoadNonAslrImage, possible)?;
    ctx.explicitly_assume(Fact::LoadedNonSafeSehImage);
    ctx.explicitly_assume(Fact::DiscoveredAddress(Region::Image));
    ctx.technique(Technique::NonAslrImageLoad);
    Ok(())
}

fn spray_data(ctx: &mut SimulationContext, _store: &ProfileStore) -> SimResult<()> {
    necessary(ctx, Event::SprayData, &[Fact::SprayedData])?;
    let possible = ctx
        .modes
        .resolve(ctx.target.capabilities.can_spray_data_bottom_up, true);
    ctx.predicate(Fact::CanSprayDataBottomUp, possible)?;
    ctx.explicitly_assume(Fact::SprayedData);
    ctx.scale_desirability(0.9);
    ctx.technique(Technique::DataSpray);
    Ok(())
}

fn spray_code(ctx: &mut SimulationContext, _store: &ProfileStore) -> SimResult<()> {
    necessary(ctx, Event::SprayCode, &[Fact::SprayedCode])?;
    let possible = ctx
        .modes
        .resolve(ctx.target.capabilities.can_spray_code_bottom_up, true);
    ctx.predicate(Fact::CanSprayCodeBottomUp, possible)?;
    ctx.explicitly_assume(Fact::SprayedCode);
    ctx.scale_desirability(0.9);
    ctx.technique(Technique::CodeSpray);
    Ok(())
}

fn map_null_page(ctx: &mut SimulationContext, _store: &ProfileStore) -> SimResult<()> {
    necessary(ctx, Event::MapNullPage, &[Fact::MappedNullPage])?;
    let local_kernel = h::is_local_flaw(ctx) && h::is_kernel_flaw(ctx);
    ctx.predicate(Fact::IsLocalKernelFlaw, local_kernel)?;
    let mappable = ctx
        .modes
        .resolve(ctx.target.capabilities.can_map_null_page, true)
        && !ctx.target.os.kernel_null_deref_prevention;
    ctx.predicate(Fact::CanMapNullPage, mappable)?;
    ctx.explicitly_assume(Fact::MappedNullPage);
    ctx.scale_desirability(0.9);
    ctx.technique(Technique::NullPageMapping);
    Ok(())
}

fn massage_heap(ctx: &mut SimulationContext, _store: &ProfileStore) -> SimResult<()> {
    necessary(ctx, Event::MassageHeap, &[Fact::MassagedHeap])?;
    let possible = ctx
        .modes
        .resolve(ctx.target.capabilities.can_massage_heap, true);
    ctx.predicate(Fact::CanMassageHeap, possible)?;
    ctx.explicitly_assume(Fact::MassagedHeap);
    ctx.scale_desirability(0.95);
    ctx.technique(Technique::HeapMassage);
    Ok(())
}

/// Shared body of the four address-discovery preparation steps.
fn discover_address(
    ctx: &mut SimulationContext,
    event: Event,
    region: Region,
) -> SimResult<()> {
    necessary(ctx, event, &[Fact::DiscoveredAddress(region)])?;
    let possible = ctx
        .modes
        .resolve(ctx.target.capabilities.discovery(region), false);
    ctx.predicate(Fact::CanDiscoverAddress(region), possible)?;
    ctx.explicitly_assume(Fact::DiscoveredAddress(region));
    Ok(())
}

fn discover_stack_address(ctx: &mut SimulationContext, _store: &ProfileStore) -> SimResult<()> {
    discover_address(ctx, Event::DiscoverStackAddress, Region::Stack)
}

fn discover_heap_address(ctx: &mut SimulationContext, _store: &ProfileStore) -> SimResult<()> {
    discover_address(ctx, Event::DiscoverHeapAddress, Region::Heap)
}

fn discover_peb_address(ctx: &mut SimulationContext, _store: &ProfileStore) -> SimResult<()> {
    discover_address(ctx, Event::DiscoverPebAddress, Region::Peb)
}

fn discover_image_address(ctx: &mut SimulationContext, _store: &ProfileStore) -> SimResult<()> {
    discover_address(ctx, Event::DiscoverImageAddress, Region::Image)
}

fn discover_ntdll_address(ctx: &mut SimulationContext, _store: &ProfileStore) -> SimResult<()> {
    discover_address(ctx, Event::DiscoverNtdllAddress, Region::Ntdll)
}

fn discover_vtguard_cookie(ctx: &mut SimulationContext, _store: &ProfileStore) -> SimResult<()> {
    necessary(
        ctx,
        Event::DiscoverVtguardCookie,
        &[Fact::DiscoveredVtguardCookie],
    )?;
    let possible = ctx
        .modes
        .resolve(ctx.target.capabilities.can_discover_vtguard_cookie, false);
    ctx.predicate(Fact::CanDiscoverVtguardCookie, possible)?;
    ctx.explicitly_assume(Fact::DiscoveredVtguardCookie);
    Ok(())
}

fn finish_preparing_environment(
    _ctx: &mut SimulationContext,
    _store: &ProfileStore,
) -> SimResult<()> {
    Ok(())
}

fn trigger_flaw(ctx: &mut SimulationContext, _store: &ProfileStore) -> SimResult<()> {
    // Null dereferences only pay off once controlled data backs the null
    // page; everything else triggers unconditionally.
    if ctx.target.flaw.root_cause == RootCause::NullDereference {
        let mapped = ctx.consult(&Fact::MappedNullPage).unwrap_or(0.0);
        ctx.predicate(Fact::CanTriggerFlaw, mapped)?;
    }
    Ok(())
}

/// Swaps in the first compatible second-order flaw from the `enables`
/// list, keeping the locality of the flaw it derives from.
fn trigger_enabled_flaw(ctx: &mut SimulationContext, store: &ProfileStore) -> SimResult<()> {
    let enables = ctx.target.flaw.enables.clone();
    ctx.predicate(Fact::FlawEnablesAnotherFlaw, !enables.is_empty())?;
    for name in &enables {
        let Ok(mut next) = store.flaw(name) else {
            continue;
        };
        next.local = ctx.target.flaw.local;
        next.kernel = ctx.target.flaw.kernel;
        ctx.target.flaw = next;
        if ctx.target.recalibrate().is_err() {
            break;
        }
        return Ok(());
    }
    Err(SimAbort::new(Fact::FlawEnablesAnotherFlaw))
}

fn corrupt_return_address(ctx: &mut SimulationContext, _store: &ProfileStore) -> SimResult<()> {
    let stack = h::can_corrupt_stack_memory(ctx);
    ctx.predicate(Fact::CanCorruptStackMemory, stack)?;
    let frame = h::can_find_stack_frame_address(ctx);
    ctx.predicate(Fact::CanFindStackFrameAddress, frame)?;
    let ret = h::can_corrupt_return_address(ctx);
    ctx.predicate(Fact::CanCorruptReturnAddress, ret)?;
    ctx.technique(Technique::ReturnAddressOverwrite);
    Ok(())
}

fn corrupt_frame_pointer(ctx: &mut SimulationContext, _store: &ProfileStore) -> SimResult<()> {
    ctx.predicate(Fact::UsesFramePointerFrames, h::frame_pointer_frames(ctx))?;
    let stack = h::can_corrupt_stack_memory(ctx);
    ctx.predicate(Fact::CanCorruptStackMemory, stack)?;
    let frame = h::can_find_stack_frame_address(ctx);
    ctx.predicate(Fact::CanFindStackFrameAddress, frame)?;
    let fp = h::can_corrupt_frame_pointer(ctx);
    ctx.predicate(Fact::CanCorruptFramePointer, fp)?;
    ctx.technique(Technique::FramePointerOverwrite);
    Ok(())
}

fn corrupt_seh_frame(ctx: &mut SimulationContext, _store: &ProfileStore) -> SimResult<()> {
    let stack = h::can_corrupt_stack_memory(ctx);
    ctx.predicate(Fact::CanCorruptStackMemory, stack)?;
    let seh = h::can_corrupt_seh_frame(ctx);
    ctx.predicate(Fact::CanCorruptSehFrame, seh)?;
    ctx.technique(Technique::SehOverwrite);
    Ok(())
}

fn corrupt_function_pointer(ctx: &mut SimulationContext, _store: &ProfileStore) -> SimResult<()> {
    let fp = h::can_corrupt_function_pointer(ctx);
    ctx.predicate(Fact::CanCorruptFunctionPointer, fp)?;
    ctx.technique(Technique::FunctionPointerOverwrite);
    Ok(())
}

fn corrupt_write_target_pointer(
    ctx: &mut SimulationContext,
    _store: &ProfileStore,
) -> SimResult<()> {
    let wt = h::can_corrupt_write_target_pointer(ctx);
    ctx.predicate(Fact::CanCorruptWriteTargetPointer, wt)?;
    ctx.technique(Technique::ArbitraryWrite);
    Ok(())
}

fn corrupt_in_use_object_state(
    ctx: &mut SimulationContext,
    _store: &ProfileStore,
) -> SimResult<()> {
    let obj = h::can_corrupt_in_use_object_state(ctx);
    ctx.predicate(Fact::CanCorruptInUseObjectState, obj)?;
    ctx.technique(Technique::UseAfterFreeReuse);
    Ok(())
}

fn corrupt_lfh_linkoffset(ctx: &mut SimulationContext, _store: &ProfileStore) -> SimResult<()> {
    ctx.predicate(Fact::TechniqueIsPublic, !ctx.modes.public_only)?;
    let app = &ctx.target.application;
    // The free-entry link offset disappeared with the v2 (Windows 8) LFH.
    let lfh_v1 = app.heap_frontend == Some(HeapFrontend::LowFragmentation)
        && app.heap_frontend_version.unwrap_or(1) < 2;
    let value = lfh_v1 && h::can_corrupt_heap_management_data(ctx);
    ctx.predicate(Fact::CanCorruptLfhLinkoffset, value)?;
    ctx.technique(Technique::LfhLinkoffsetAttack);
    Ok(())
}

fn corrupt_heap_entry_free_links(
    ctx: &mut SimulationContext,
    _store: &ProfileStore,
) -> SimResult<()> {
    let os = &ctx.target.os;
    let app = &ctx.target.application;
    let frontend_unsafe =
        !os.heap_safe_unlinking || app.heap_frontend == Some(HeapFrontend::Lookaside);
    let terminates = os.heap_termination.resolve(app.heap_termination);
    let value = frontend_unsafe && !terminates && h::can_corrupt_heap_management_data(ctx);
    ctx.predicate(Fact::CanCorruptHeapEntryFreeLinks, value)?;
    ctx.technique(Technique::HeapUnlinkWrite);
    Ok(())
}

fn corrupt_heap_handle(ctx: &mut SimulationContext, _store: &ProfileStore) -> SimResult<()> {
    ctx.predicate(Fact::TechniqueIsPublic, !ctx.modes.public_only)?;
    let value =
        !ctx.target.os.heap_handle_protection && h::can_corrupt_heap_management_data(ctx);
    ctx.predicate(Fact::CanCorruptHeapHandle, value)?;
    ctx.technique(Technique::HeapHandleCommitRoutine);
    Ok(())
}

fn corrupt_cpp_object_vtable(ctx: &mut SimulationContext, _store: &ProfileStore) -> SimResult<()> {
    let vt = h::can_corrupt_cpp_object_vtable(ctx);
    ctx.predicate(Fact::CanCorruptCppObjectVtable, vt)?;
    ctx.technique(Technique::VtableHijack);
    Ok(())
}

fn write_to_return_address(ctx: &mut SimulationContext, _store: &ProfileStore) -> SimResult<()> {
    let find = h::can_find_address(ctx, Region::Stack);
    ctx.predicate(Fact::CanFindAddress(Region::Stack), find)?;
    ctx.technique(Technique::ReturnAddressOverwrite);
    Ok(())
}

fn write_to_function_pointer(ctx: &mut SimulationContext, _store: &ProfileStore) -> SimResult<()> {
    let find = h::can_find_address(ctx, Region::Data);
    ctx.predicate(Fact::CanFindAddress(Region::Data), find)?;
    ctx.technique(Technique::FunctionPointerOverwrite);
    Ok(())
}

fn write_anywhere(ctx: &mut SimulationContext, _store: &ProfileStore) -> SimResult<()> {
    // Consulted against the table directly: the write is spent once per
    // branch, whatever key order the memoised guards would see.
    if ctx.peek(&Fact::TriggeredWriteAnywhere).is_some() {
        return Err(SimAbort::new(Fact::HaveNotTriggeredWriteAnywhere));
    }
    let find = h::can_find_address(ctx, Region::Data);
    ctx.predicate(Fact::CanFindAddress(Region::Data), find)?;
    ctx.explicitly_assume(Fact::TriggeredWriteAnywhere);
    ctx.scale_likelihood(0.9);
    Ok(())
}

fn return_from_function(ctx: &mut SimulationContext, _store: &ProfileStore) -> SimResult<()> {
    let bypass = h::can_bypass_stack_protection(ctx);
    ctx.predicate(Fact::CanBypassStackProtection, bypass)?;
    ctx.assume(Fact::CanControlStackPointer, true);
    Ok(())
}

fn pop_frame_pointer_and_return(
    ctx: &mut SimulationContext,
    _store: &ProfileStore,
) -> SimResult<()> {
    ctx.predicate(Fact::UsesFramePointerFrames, h::frame_pointer_frames(ctx))?;
    let bypass = h::can_bypass_stack_protection(ctx);
    ctx.predicate(Fact::CanBypassStackProtection, bypass)?;
    let find = h::can_find_address(ctx, Region::Stack);
    ctx.predicate(Fact::CanFindAddress(Region::Stack), find)?;
    ctx.assume(Fact::CanControlStackPointer, true);
    Ok(())
}

fn raise_exception_into_handler(
    ctx: &mut SimulationContext,
    _store: &ProfileStore,
) -> SimResult<()> {
    let safeseh = h::can_bypass_safeseh(ctx);
    ctx.predicate(Fact::CanBypassSafeSeh, safeseh)?;
    let sehop = h::can_bypass_sehop(ctx);
    ctx.predicate(Fact::CanBypassSehop, sehop)?;
    Ok(())
}

fn call_function_pointer(_ctx: &mut SimulationContext, _store: &ProfileStore) -> SimResult<()> {
    Ok(())
}

fn replace_object_contents(ctx: &mut SimulationContext, _store: &ProfileStore) -> SimResult<()> {
    let possible = ctx
        .modes
        .resolve(ctx.target.capabilities.can_massage_heap, true);
    ctx.predicate(Fact::CanMassageHeap, possible)?;
    Ok(())
}

fn redirect_lfh_allocation(_ctx: &mut SimulationContext, _store: &ProfileStore) -> SimResult<()> {
    Ok(())
}

fn unlink_free_entry(_ctx: &mut SimulationContext, _store: &ProfileStore) -> SimResult<()> {
    Ok(())
}

fn call_heap_commit_routine(
    _ctx: &mut SimulationContext,
    _store: &ProfileStore,
) -> SimResult<()> {
    Ok(())
}

fn call_virtual_function(ctx: &mut SimulationContext, _store: &ProfileStore) -> SimResult<()> {
    let find = h::can_find_address(ctx, Region::Data);
    ctx.predicate(Fact::CanFindAddress(Region::Data), find)?;
    let vtguard = h::can_bypass_vtable_guard(ctx);
    ctx.predicate(Fact::CanBypassVtableGuard, vtguard)?;
    Ok(())
}

fn transfer_to_attacker_controlled_code(
    ctx: &mut SimulationContext,
    _store: &ProfileStore,
) -> SimResult<()> {
    let find = h::can_find_address(ctx, Region::Code);
    ctx.predicate(Fact::CanFindAddress(Region::Code), find)?;
    let exec = h::can_execute_at_address(ctx, Region::Code);
    ctx.predicate(Fact::CanExecuteAtAddress(Region::Code), exec)?;
    ctx.technique(Technique::CodeExecutionViaSprayedCode);
    Ok(())
}

fn transfer_to_controlled_data(
    ctx: &mut SimulationContext,
    _store: &ProfileStore,
) -> SimResult<()> {
    let find = h::can_find_address(ctx, Region::Data);
    ctx.predicate(Fact::CanFindAddress(Region::Data), find)?;
    let exec = h::can_execute_at_address(ctx, Region::Data);
    ctx.predicate(Fact::CanExecuteAtAddress(Region::Data), exec)?;
    ctx.technique(Technique::CodeExecutionViaControlledData);
    Ok(())
}

fn pivot_stack_pointer(ctx: &mut SimulationContext, _store: &ProfileStore) -> SimResult<()> {
    if !ctx.consult_true(&Fact::CanControlStackPointer) {
        // No stack content control yet: a gadget must move the stack
        // pointer into controlled data at a known address.
        ctx.assume(Fact::CanFindStackPivotGadget, true);
        ctx.scale_likelihood(0.9);
        let find = h::can_find_address(ctx, Region::Data);
        ctx.predicate(Fact::CanFindAddress(Region::Data), find)?;
        ctx.explicitly_assume(Fact::CanControlStackPointer);
    }
    ctx.technique(Technique::PivotStackPointer);
    Ok(())
}

fn bypass_nx(ctx: &mut SimulationContext, _store: &ProfileStore) -> SimResult<()> {
    let needed = !h::is_kernel_flaw(ctx)
        && h::nx_blocks_data(ctx)
        && ctx.peek(&Fact::CanExecuteAtAddress(Region::Data)).is_none();
    ctx.predicate(Fact::NecessaryToBypassNx, needed)?;
    Ok(())
}

fn execute_self_contained_rop_payload(
    ctx: &mut SimulationContext,
    _store: &ProfileStore,
) -> SimResult<()> {
    ctx.assume(Fact::CanFindRopGadgets, true);
    ctx.scale_likelihood(0.9);
    ctx.technique(Technique::CodeExecutionViaSelfContainedRopPayload);
    Ok(())
}

fn return_to_controlled_code(ctx: &mut SimulationContext, _store: &ProfileStore) -> SimResult<()> {
    let exec = h::can_execute_at_address(ctx, Region::Stack);
    ctx.predicate(Fact::CanExecuteAtAddress(Region::Stack), exec)?;
    ctx.technique(Technique::CodeExecutionFromStack);
    Ok(())
}

fn disable_nx_via_ntsetinformationprocess(
    ctx: &mut SimulationContext,
    _store: &ProfileStore,
) -> SimResult<()> {
    let os = &ctx.target.os;
    let app = &ctx.target.application;
    // Pre-Vista 32-bit x86 only, and only while NX is not locked.
    let possible = !os.family.at_least(OsFamily::WindowsVista)
        && !app.width.is_64()
        && !app.nx_permanent.unwrap_or(false)
        && ctx.target.hardware.family == ArchFamily::X86;
    ctx.predicate(Fact::CanDisableNxViaNtSetInformationProcess, possible)?;
    let find = h::can_find_address(ctx, Region::Ntdll);
    ctx.predicate(Fact::CanFindAddress(Region::Ntdll), find)?;
    ctx.explicitly_assume(Fact::CanExecuteAtAddress(Region::Data));
    ctx.technique(Technique::NxBypassViaNtSetInformationProcess);
    Ok(())
}

fn stage_payload_to_crt_heap(ctx: &mut SimulationContext, _store: &ProfileStore) -> SimResult<()> {
    // The CRT created its heap executable before the Vista-era runtimes.
    let possible = !ctx.target.os.family.at_least(OsFamily::WindowsVista);
    ctx.predicate(Fact::CanStagePayloadToCrtHeap, possible)?;
    let find = h::can_find_address(ctx, Region::Heap);
    ctx.predicate(Fact::CanFindAddress(Region::Heap), find)?;
    ctx.explicitly_assume(Fact::CanExecuteAtAddress(Region::Data));
    ctx.technique(Technique::NxBypassViaExecutableCrtHeap);
    Ok(())
}

fn return_to_virtualprotect(ctx: &mut SimulationContext, _store: &ProfileStore) -> SimResult<()> {
    let controls_stack = ctx.consult_true(&Fact::CanControlStackPointer);
    ctx.predicate(Fact::CanReturnToVirtualProtect, controls_stack)?;
    let find = h::can_find_address(ctx, Region::Image);
    ctx.predicate(Fact::CanFindAddress(Region::Image), find)?;
    ctx.explicitly_assume(Fact::CanExecuteAtAddress(Region::Data));
    ctx.technique(Technique::NxBypassViaVirtualProtect);
    Ok(())
}

fn rop_to_virtualprotect(ctx: &mut SimulationContext, _store: &ProfileStore) -> SimResult<()> {
    ctx.assume(Fact::CanFindStackPivotGadget, true);
    ctx.assume(Fact::CanFindRopGadgets, true);
    ctx.scale_likelihood(0.9);
    let image = h::can_find_address(ctx, Region::Image);
    ctx.predicate(Fact::CanFindAddress(Region::Image), image)?;
    let data = h::can_find_address(ctx, Region::Data);
    ctx.predicate(Fact::CanFindAddress(Region::Data), data)?;
    ctx.explicitly_assume(Fact::CanExecuteAtAddress(Region::Data));
    ctx.technique(Technique::NxBypassViaRopVirtualProtect);
    Ok(())
}

/// The complete transition table, in fan-out order per source state.
pub fn table() -> Vec<(State, Event, State, Effect)> {
    use crate::machine::event::Event as E;
    use crate::machine::state::State as S;
    vec![
        (
            S::TargetDefined,
            E::PrepareEnvironment,
            S::PreparingEnvironment,
            prepare_environment,
        ),
        // Preparation self-loops; each guards on "necessary" and
        // "possible" before assuming its facts.
        (
            S::PreparingEnvironment,
            E::LoadNonAslrImage,
            S::PreparingEnvironment,
            load_non_aslr_image,
        ),
        (
            S::PreparingEnvironment,
            E::LoadNonAslrNonSafeSehImage,
            S::PreparingEnvironment,
            load_non_aslr_non_safeseh_image,
        ),
        (
            S::PreparingEnvironment,
            E::SprayData,
            S::PreparingEnvironment,
            spray_data,
        ),
        (
            S::PreparingEnvironment,
            E::SprayCode,
            S::PreparingEnvironment,
            spray_code,
        ),
        (
            S::PreparingEnvironment,
            E::MapNullPage,
            S::PreparingEnvironment,
            map_null_page,
        ),
        (
            S::PreparingEnvironment,
            E::MassageHeap,
            S::PreparingEnvironment,
            massage_heap,
        ),
        (
            S::PreparingEnvironment,
            E::DiscoverStackAddress,
            S::PreparingEnvironment,
            discover_stack_address,
        ),
        (
            S::PreparingEnvironment,
            E::DiscoverHeapAddress,
            S::PreparingEnvironment,
            discover_heap_address,
        ),
        (
            S::PreparingEnvironment,
            E::DiscoverPebAddress,
            S::PreparingEnvironment,
            discover_peb_address,
        ),
        (
            S::PreparingEnvironment,
            E::DiscoverImageAddress,
            S::PreparingEnvironment,
            discover_image_address,
        ),
        (
            S::PreparingEnvironment,
            E::DiscoverNtdllAddress,
            S::PreparingEnvironment,
            discover_ntdll_address,
        ),
        (
            S::PreparingEnvironment,
            E::DiscoverVtguardCookie,
            S::PreparingEnvironment,
            discover_vtguard_cookie,
        ),
        (
            S::PreparingEnvironment,
            E::FinishPreparingEnvironment,
            S::EnvironmentPrepared,
            finish_preparing_environment,
        ),
        (
            S::EnvironmentPrepared,
            E::TriggerFlaw,
            S::FlawTriggered,
            trigger_flaw,
        ),
        // Flaw fan-out: every control the flaw could grant.
        (
            S::FlawTriggered,
            E::CorruptReturnAddress,
            S::ControlOfReturnAddress,
            corrupt_return_address,
        ),
        (
            S::FlawTriggered,
            E::CorruptFramePointer,
            S::ControlOfFramePointer,
            corrupt_frame_pointer,
        ),
        (
            S::FlawTriggered,
            E::CorruptSehFrame,
            S::ControlOfSehFrame,
            corrupt_seh_frame,
        ),
        (
            S::FlawTriggered,
            E::CorruptFunctionPointer,
            S::ControlOfFunctionPointer,
            corrupt_function_pointer,
        ),
        (
            S::FlawTriggered,
            E::CorruptWriteTargetPointer,
            S::ControlOfWriteTargetPointer,
            corrupt_write_target_pointer,
        ),
        (
            S::FlawTriggered,
            E::CorruptInUseObjectState,
            S::ControlOfInUseObjectState,
            corrupt_in_use_object_state,
        ),
        (
            S::FlawTriggered,
            E::CorruptLfhLinkoffset,
            S::ControlOfLfhLinkoffset,
            corrupt_lfh_linkoffset,
        ),
        (
            S::FlawTriggered,
            E::CorruptHeapEntryFreeLinks,
            S::ControlOfHeapEntryFreeLinks,
            corrupt_heap_entry_free_links,
        ),
        (
            S::FlawTriggered,
            E::CorruptHeapHandle,
            S::ControlOfHeapHandle,
            corrupt_heap_handle,
        ),
        (
            S::FlawTriggered,
            E::CorruptCppObjectVtable,
            S::ControlOfCppObjectVtable,
            corrupt_cpp_object_vtable,
        ),
        (
            S::NextFlawTriggered,
            E::TriggerFlaw,
            S::FlawTriggered,
            trigger_enabled_flaw,
        ),
        // Spending the controlled write.
        (
            S::ControlOfWriteTargetPointer,
            E::WriteToReturnAddress,
            S::ControlOfReturnAddress,
            write_to_return_address,
        ),
        (
            S::ControlOfWriteTargetPointer,
            E::WriteToFunctionPointer,
            S::ControlOfFunctionPointer,
            write_to_function_pointer,
        ),
        (
            S::ControlOfWriteTargetPointer,
            E::WriteAnywhere,
            S::NextFlawTriggered,
            write_anywhere,
        ),
        // Converting control into an instruction-pointer hijack.
        (
            S::ControlOfReturnAddress,
            E::ReturnFromFunction,
            S::ControlOfInstructionPointer,
            return_from_function,
        ),
        (
            S::ControlOfFramePointer,
            E::PopFramePointerAndReturn,
            S::ControlOfStackPointer,
            pop_frame_pointer_and_return,
        ),
        (
            S::ControlOfSehFrame,
            E::RaiseExceptionIntoHandler,
            S::ControlOfInstructionPointer,
            raise_exception_into_handler,
        ),
        (
            S::ControlOfFunctionPointer,
            E::CallFunctionPointer,
            S::ControlOfInstructionPointer,
            call_function_pointer,
        ),
        (
            S::ControlOfInUseObjectState,
            E::ReplaceObjectContents,
            S::ControlOfCppObjectVtable,
            replace_object_contents,
        ),
        (
            S::ControlOfLfhLinkoffset,
            E::RedirectLfhAllocation,
            S::ControlOfWriteTargetPointer,
            redirect_lfh_allocation,
        ),
        (
            S::ControlOfHeapEntryFreeLinks,
            E::UnlinkFreeEntry,
            S::ControlOfWriteTargetPointer,
            unlink_free_entry,
        ),
        (
            S::ControlOfHeapHandle,
            E::CallHeapCommitRoutine,
            S::ControlOfFunctionPointer,
            call_heap_commit_routine,
        ),
        (
            S::ControlOfCppObjectVtable,
            E::CallVirtualFunction,
            S::ControlOfInstructionPointer,
            call_virtual_function,
        ),
        // Turning the hijack into code execution.
        (
            S::ControlOfInstructionPointer,
            E::TransferToAttackerControlledCode,
            S::ControlOfCodeExecution,
            transfer_to_attacker_controlled_code,
        ),
        (
            S::ControlOfInstructionPointer,
            E::TransferToControlledData,
            S::ControlOfCodeExecution,
            transfer_to_controlled_data,
        ),
        (
            S::ControlOfInstructionPointer,
            E::PivotStackPointer,
            S::ControlOfStackPointer,
            pivot_stack_pointer,
        ),
        (
            S::ControlOfInstructionPointer,
            E::BypassNx,
            S::BypassingNx,
            bypass_nx,
        ),
        (
            S::ControlOfStackPointer,
            E::ExecuteSelfContainedRopPayload,
            S::ControlOfCodeExecution,
            execute_self_contained_rop_payload,
        ),
        (
            S::ControlOfStackPointer,
            E::ReturnToControlledCode,
            S::ControlOfCodeExecution,
            return_to_controlled_code,
        ),
        // NX bypasses; each re-enters the hijack with data executable.
        (
            S::BypassingNx,
            E::DisableNxViaNtSetInformationProcess,
            S::ControlOfInstructionPointer,
            disable_nx_via_ntsetinformationprocess,
        ),
        (
            S::BypassingNx,
            E::StagePayloadToCrtHeap,
            S::ControlOfInstructionPointer,
            stage_payload_to_crt_heap,
        ),
        (
            S::BypassingNx,
            E::ReturnToVirtualProtect,
            S::ControlOfInstructionPointer,
            return_to_virtualprotect,
        ),
        (
            S::BypassingNx,
            E::RopToVirtualProtect,
            S::ControlOfInstructionPointer,
            rop_to_virtualprotect,
        ),
    ]
}
