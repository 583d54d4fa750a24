//! Event (attacker action) identifiers.

use std::fmt;

/// One attacker action; the label on a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Event {
    /// Begin environment preparation.
    PrepareEnvironment,
    /// Load a module not built for ASLR.
    LoadNonAslrImage,
    /// Load a module built for neither ASLR nor SafeSEH.
    LoadNonAslrNonSafeSehImage,
    /// Fill bottom-up address space with controlled data.
    SprayData,
    /// Fill bottom-up address space with payload code.
    SprayCode,
    /// Map the null page.
    MapNullPage,
    /// Groom heap layout.
    MassageHeap,
    /// Learn a stack address.
    DiscoverStackAddress,
    /// Learn a heap address.
    DiscoverHeapAddress,
    /// Learn the PEB address.
    DiscoverPebAddress,
    /// Learn the application image base.
    DiscoverImageAddress,
    /// Learn the `ntdll` base.
    DiscoverNtdllAddress,
    /// Learn the vtable-guard cookie.
    DiscoverVtguardCookie,
    /// Declare preparation finished.
    FinishPreparingEnvironment,
    /// Exercise the flaw.
    TriggerFlaw,
    /// Overwrite a return address.
    CorruptReturnAddress,
    /// Overwrite a saved frame pointer.
    CorruptFramePointer,
    /// Overwrite an SEH registration record.
    CorruptSehFrame,
    /// Overwrite a function pointer.
    CorruptFunctionPointer,
    /// Take control of a write's destination pointer.
    CorruptWriteTargetPointer,
    /// Corrupt the state of a live object.
    CorruptInUseObjectState,
    /// Corrupt an LFH free-entry link offset.
    CorruptLfhLinkoffset,
    /// Corrupt heap free-list entry links.
    CorruptHeapEntryFreeLinks,
    /// Corrupt the heap handle structure.
    CorruptHeapHandle,
    /// Corrupt a C++ object vtable pointer.
    CorruptCppObjectVtable,
    /// Use the controlled write against a return address.
    WriteToReturnAddress,
    /// Use the controlled write against a function pointer.
    WriteToFunctionPointer,
    /// Use the controlled write to stage a second-order flaw.
    WriteAnywhere,
    /// Let the corrupted function return.
    ReturnFromFunction,
    /// Restore the corrupted frame pointer and return through it.
    PopFramePointerAndReturn,
    /// Raise an exception dispatched through the corrupted handler.
    RaiseExceptionIntoHandler,
    /// Cause a call through the corrupted function pointer.
    CallFunctionPointer,
    /// Reallocate controlled data over the freed object.
    ReplaceObjectContents,
    /// Redirect the next LFH allocation onto chosen memory.
    RedirectLfhAllocation,
    /// Unlink the corrupted free entry (write primitive).
    UnlinkFreeEntry,
    /// Cause a call through the heap commit routine pointer.
    CallHeapCommitRoutine,
    /// Cause a virtual call through the corrupted vtable.
    CallVirtualFunction,
    /// Jump to sprayed payload code.
    TransferToAttackerControlledCode,
    /// Jump into attacker-controlled data.
    TransferToControlledData,
    /// Pivot the stack pointer into controlled data.
    PivotStackPointer,
    /// Begin a no-execute bypass.
    BypassNx,
    /// Run a self-contained return-oriented payload.
    ExecuteSelfContainedRopPayload,
    /// Return into payload at the stack pointer.
    ReturnToControlledCode,
    /// Disable NX through `NtSetInformationProcess`.
    DisableNxViaNtSetInformationProcess,
    /// Stage payload into an executable CRT heap.
    StagePayloadToCrtHeap,
    /// Return into `VirtualProtect` to make data executable.
    ReturnToVirtualProtect,
    /// Reach `VirtualProtect` through a return-oriented chain.
    RopToVirtualProtect,
}

impl Event {
    /// Snake-case name used in traces, reports, and CSV columns.
    pub fn name(self) -> &'static str {
        match self {
            Self::PrepareEnvironment => "prepare_environment",
            Self::LoadNonAslrImage => "load_non_aslr_image",
            Self::LoadNonAslrNonSafeSehImage => "load_non_aslr_non_safeseh_image",
            Self::SprayData => "spray_data",
            Self::SprayCode => "spray_code",
            Self::MapNullPage => "map_null_page",
            Self::MassageHeap => "massage_heap",
            Self::DiscoverStackAddress => "discover_stack_address",
            Self::DiscoverHeapAddress => "discover_heap_address",
            Self::DiscoverPebAddress => "discover_peb_address",
            Self::DiscoverImageAddress => "discover_image_address",
            Self::DiscoverNtdllAddress => "discover_ntdll_address",
            Self::DiscoverVtguardCookie => "discover_vtguard_cookie",
            Self::FinishPreparingEnvironment => "finish_preparing_environment",
            Self::TriggerFlaw => "trigger_flaw",
            Self::CorruptReturnAddress => "corrupt_return_address",
            Self::CorruptFramePointer => "corrupt_frame_pointer",
            Self::CorruptSehFrame => "corrupt_seh_frame",
            Self::CorruptFunctionPointer => "corrupt_function_pointer",
            Self::CorruptWriteTargetPointer => "corrupt_write_target_pointer",
            Self::CorruptInUseObjectState => "corrupt_in_use_object_state",
            Self::CorruptLfhLinkoffset => "corrupt_lfh_linkoffset",
            Self::CorruptHeapEntryFreeLinks => "corrupt_heap_entry_free_links",
            Self::CorruptHeapHandle => "corrupt_heap_handle",
            Self::CorruptCppObjectVtable => "corrupt_cpp_object_vtable",
            Self::WriteToReturnAddress => "write_to_return_address",
            Self::WriteToFunctionPointer => "write_to_function_pointer",
            Self::WriteAnywhere => "write_anywhere",
            Self::ReturnFromFunction => "return_from_function",
            Self::PopFramePointerAndReturn => "pop_frame_pointer_and_return",
            Self::RaiseExceptionIntoHandler => "raise_exception_into_handler",
            Self::CallFunctionPointer => "call_function_pointer",
            Self::ReplaceObjectContents => "replace_object_contents",
            Self::RedirectLfhAllocation => "redirect_lfh_allocation",
            Self::UnlinkFreeEntry => "unlink_free_entry",
            Self::CallHeapCommitRoutine => "call_heap_commit_routine",
            Self::CallVirtualFunction => "call_virtual_function",
            Self::TransferToAttackerControlledCode => "transfer_to_attacker_controlled_code",
            Self::TransferToControlledData => "transfer_to_controlled_data",
            Self::PivotStackPointer => "pivot_stack_pointer",
            Self::BypassNx => "bypass_nx",
            Self::ExecuteSelfContainedRopPayload => "execute_self_contained_rop_payload",
            Self::ReturnToControlledCode => "return_to_controlled_code",
            Self::DisableNxViaNtSetInformationProcess => {
                "disable_nx_via_ntsetinformationprocess"
            }
            Self::StagePayloadToCrtHeap => "stage_payload_to_crt_heap",
            Self::ReturnToVirtualProtect => "return_to_virtualprotect",
            Self::RopToVirtualProtect => "rop_to_virtualprotect",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
