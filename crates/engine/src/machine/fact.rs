//! Assumption keys.
//!
//! The assumption table of a branch is keyed by this closed enum rather
//! than by strings: every predicate identifier is a variant, argument-
//! carrying predicates embed their argument, and `AdHoc` is reserved for
//! user-seeded keys that have no built-in identifier.

use std::fmt;

use crate::machine::event::Event;
use crate::profiles::types::Region;

/// One fact an exploitation branch assumed, predicated, or derived.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Fact {
    // Facts established by environment preparation.
    /// The address of `region` is known on this branch.
    DiscoveredAddress(Region),
    /// Controlled data occupies predictable bottom-up address space.
    SprayedData,
    /// Controlled payload code occupies predictable address space.
    SprayedCode,
    /// The null page is mapped with controlled contents.
    MappedNullPage,
    /// Heap layout is groomed.
    MassagedHeap,
    /// A non-ASLR image is loaded.
    LoadedNonAslrImage,
    /// A non-ASLR, non-SafeSEH image is loaded.
    LoadedNonSafeSehImage,
    /// The vtable-guard cookie is known.
    DiscoveredVtguardCookie,
    /// The arbitrary write has been spent staging a second-order flaw.
    TriggeredWriteAnywhere,

    // Facts established while exercising control.
    /// The stack pointer addresses attacker data after the next return.
    CanControlStackPointer,
    /// A usable stack-pivot gadget exists.
    CanFindStackPivotGadget,
    /// A usable return-oriented gadget set exists.
    CanFindRopGadgets,
    /// Data at `region` can be executed (NX absent or bypassed).
    CanExecuteAtAddress(Region),

    // Guard predicates.
    /// The flaw can corrupt stack memory.
    CanCorruptStackMemory,
    /// The address of the corrupted stack frame can be determined.
    CanFindStackFrameAddress,
    /// The flaw can corrupt a return address.
    CanCorruptReturnAddress,
    /// The flaw can corrupt a saved frame pointer.
    CanCorruptFramePointer,
    /// The flaw can corrupt an SEH registration record.
    CanCorruptSehFrame,
    /// The flaw can corrupt a function pointer.
    CanCorruptFunctionPointer,
    /// The flaw yields control of a write's destination pointer.
    CanCorruptWriteTargetPointer,
    /// The flaw can corrupt live object state.
    CanCorruptInUseObjectState,
    /// The flaw can corrupt an LFH free-entry link offset.
    CanCorruptLfhLinkoffset,
    /// The flaw can corrupt free-list entry links.
    CanCorruptHeapEntryFreeLinks,
    /// The flaw can corrupt the heap handle structure.
    CanCorruptHeapHandle,
    /// The flaw can corrupt a C++ vtable pointer.
    CanCorruptCppObjectVtable,
    /// The address of `region` can be found (probability-valued).
    CanFindAddress(Region),
    /// Stack protection can be bypassed (probability-valued).
    CanBypassStackProtection,
    /// SafeSEH handler validation can be bypassed.
    CanBypassSafeSeh,
    /// SEH overwrite protection can be bypassed.
    CanBypassSehop,
    /// Vtable-guard instrumentation can be bypassed.
    CanBypassVtableGuard,
    /// The flaw can be triggered in the prepared environment.
    CanTriggerFlaw,
    /// The current flaw enables a second-order flaw.
    FlawEnablesAnotherFlaw,
    /// The arbitrary write has not yet been spent.
    HaveNotTriggeredWriteAnywhere,
    /// Stack frames link through a saved frame pointer.
    UsesFramePointerFrames,
    /// The preparation step has not already been satisfied.
    NecessaryTo(Event),
    /// NX actually blocks data execution on this target.
    NecessaryToBypassNx,
    /// The technique is publicly documented.
    TechniqueIsPublic,
    /// The attacker can load a non-ASLR image.
    CanLoadNonAslrImage,
    /// The attacker can spray data bottom-up.
    CanSprayDataBottomUp,
    /// The attacker can spray code bottom-up.
    CanSprayCodeBottomUp,
    /// The attacker can groom heap layout.
    CanMassageHeap,
    /// The attacker can map the null page.
    CanMapNullPage,
    /// The flaw is a local kernel flaw.
    IsLocalKernelFlaw,
    /// The attacker can discover the address of `region`.
    CanDiscoverAddress(Region),
    /// The attacker can discover the vtable-guard cookie.
    CanDiscoverVtguardCookie,
    /// `NtSetInformationProcess` can disable NX on this target.
    CanDisableNxViaNtSetInformationProcess,
    /// The CRT heap is executable on this target.
    CanStagePayloadToCrtHeap,
    /// A straight return can reach `VirtualProtect`.
    CanReturnToVirtualProtect,

    /// User-seeded key with no built-in identifier.
    AdHoc(String),
}

impl fmt::Display for Fact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DiscoveredAddress(r) => write!(f, "discovered_address({r})"),
            Self::SprayedData => f.write_str("sprayed_data"),
            Self::SprayedCode => f.write_str("sprayed_code"),
            Self::MappedNullPage => f.write_str("mapped_null_page"),
            Self::MassagedHeap => f.write_str("massaged_heap"),
            Self::LoadedNonAslrImage => f.write_str("loaded_non_aslr_image"),
            Self::LoadedNonSafeSehImage => f.write_str("loaded_non_safeseh_image"),
            Self::DiscoveredVtguardCookie => f.write_str("discovered_vtguard_cookie"),
            Self::TriggeredWriteAnywhere => f.write_str("triggered_write_anywhere"),
            Self::CanControlStackPointer => f.write_str("can_control_stack_pointer"),
            Self::CanFindStackPivotGadget => f.write_str("can_find_stack_pivot_gadget"),
            Self::CanFindRopGadgets => f.write_str("can_find_rop_gadgets"),
            Self::CanExecuteAtAddress(r) => write!(f, "can_execute_at_address({r})"),
            Self::CanCorruptStackMemory => f.write_str("can_corrupt_stack_memory"),
            Self::CanFindStackFrameAddress => f.write_str("can_find_stack_frame_address"),
            Self::CanCorruptReturnAddress => f.write_str("can_corrupt_return_address"),
            Self::CanCorruptFramePointer => f.write_str("can_corrupt_frame_pointer"),
            Self::CanCorruptSehFrame => f.write_str("can_corrupt_seh_frame"),
            Self::CanCorruptFunctionPointer => f.write_str("can_corrupt_function_pointer"),
            Self::CanCorruptWriteTargetPointer => {
                f.write_str("can_corrupt_write_target_pointer")
            }
            Self::CanCorruptInUseObjectState => f.write_str("can_corrupt_in_use_object_state"),
            Self::CanCorruptLfhLinkoffset => f.write_str("can_corrupt_lfh_linkoffset"),
            Self::CanCorruptHeapEntryFreeLinks => {
                f.write_str("can_corrupt_heap_entry_free_links")
            }
            Self::CanCorruptHeapHandle => f.write_str("can_corrupt_heap_handle"),
            Self::CanCorruptCppObjectVtable => f.write_str("can_corrupt_cpp_object_vtable"),
            Self::CanFindAddress(r) => write!(f, "can_find_address({r})"),
            Self::CanBypassStackProtection => f.write_str("can_bypass_stack_protection"),
            Self::CanBypassSafeSeh => f.write_str("can_bypass_safeseh"),
            Self::CanBypassSehop => f.write_str("can_bypass_sehop"),
            Self::CanBypassVtableGuard => f.write_str("can_bypass_vtable_guard"),
            Self::CanTriggerFlaw => f.write_str("can_trigger_flaw"),
            Self::FlawEnablesAnotherFlaw => f.write_str("flaw_enables_another_flaw"),
            Self::HaveNotTriggeredWriteAnywhere => {
                f.write_str("have_not_triggered_write_anywhere")
            }
            Self::UsesFramePointerFrames => f.write_str("uses_frame_pointer_frames"),
            Self::NecessaryTo(e) => write!(f, "necessary_to({e})"),
            Self::NecessaryToBypassNx => f.write_str("necessary_to_bypass_nx"),
            Self::TechniqueIsPublic => f.write_str("technique_is_public"),
            Self::CanLoadNonAslrImage => f.write_str("can_load_non_aslr_image"),
            Self::CanSprayDataBottomUp => f.write_str("can_spray_data_bottom_up"),
            Self::CanSprayCodeBottomUp => f.write_str("can_spray_code_bottom_up"),
            Self::CanMassageHeap => f.write_str("can_massage_heap"),
            Self::CanMapNullPage => f.write_str("can_map_null_page"),
            Self::IsLocalKernelFlaw => f.write_str("is_local_kernel_flaw"),
            Self::CanDiscoverAddress(r) => write!(f, "can_discover_address({r})"),
            Self::CanDiscoverVtguardCookie => f.write_str("can_discover_vtguard_cookie"),
            Self::CanDisableNxViaNtSetInformationProcess => {
                f.write_str("can_disable_nx_via_ntsetinformationprocess")
            }
            Self::CanStagePayloadToCrtHeap => f.write_str("can_stage_payload_to_crt_heap"),
            Self::CanReturnToVirtualProtect => f.write_str("can_return_to_virtualprotect"),
            Self::AdHoc(key) => f.write_str(key),
        }
    }
}
