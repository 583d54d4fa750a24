//! Technique tags.
//!
//! A completed simulation carries the set of techniques its branch
//! employed; the pair `(fitness, technique-set)` is the equivalence class
//! used to deduplicate strategies.

use std::fmt;

/// One named exploitation technique.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Technique {
    /// Overwrite of a stack return address.
    ReturnAddressOverwrite,
    /// Overwrite of a saved frame pointer.
    FramePointerOverwrite,
    /// Overwrite of an SEH registration record.
    SehOverwrite,
    /// Overwrite of a function pointer.
    FunctionPointerOverwrite,
    /// Arbitrary-address write primitive.
    ArbitraryWrite,
    /// Reuse of a freed or confused object.
    UseAfterFreeReuse,
    /// LFH free-entry link-offset redirection.
    LfhLinkoffsetAttack,
    /// Free-list unlink write primitive.
    HeapUnlinkWrite,
    /// Heap handle commit-routine hijack.
    HeapHandleCommitRoutine,
    /// Fake-vtable virtual-call hijack.
    VtableHijack,
    /// Stack-pointer pivot into controlled data.
    PivotStackPointer,
    /// Execution of sprayed payload code.
    CodeExecutionViaSprayedCode,
    /// Execution of attacker data reached by address.
    CodeExecutionViaControlledData,
    /// Execution of payload at the stack pointer.
    CodeExecutionFromStack,
    /// Fully return-oriented payload, no native shellcode stage.
    CodeExecutionViaSelfContainedRopPayload,
    /// NX disable through `NtSetInformationProcess`.
    NxBypassViaNtSetInformationProcess,
    /// Payload staged into an executable CRT heap.
    NxBypassViaExecutableCrtHeap,
    /// `VirtualProtect` reached by a straight return.
    NxBypassViaVirtualProtect,
    /// `VirtualProtect` reached by a return-oriented chain.
    NxBypassViaRopVirtualProtect,
    /// Null page mapped into the attacked address space.
    NullPageMapping,
    /// Heap layout grooming.
    HeapMassage,
    /// Bottom-up data spray.
    DataSpray,
    /// Bottom-up code spray.
    CodeSpray,
    /// Non-ASLR image loaded to defeat randomization.
    NonAslrImageLoad,
}

impl Technique {
    /// Stable name used in reports.
    pub fn name(self) -> &'static str {
        match self {
            Self::ReturnAddressOverwrite => "ReturnAddressOverwrite",
            Self::FramePointerOverwrite => "FramePointerOverwrite",
            Self::SehOverwrite => "SehOverwrite",
            Self::FunctionPointerOverwrite => "FunctionPointerOverwrite",
            Self::ArbitraryWrite => "ArbitraryWrite",
            Self::UseAfterFreeReuse => "UseAfterFreeReuse",
            Self::LfhLinkoffsetAttack => "LfhLinkoffsetAttack",
            Self::HeapUnlinkWrite => "HeapUnlinkWrite",
            Self::HeapHandleCommitRoutine => "HeapHandleCommitRoutine",
            Self::VtableHijack => "VtableHijack",
            Self::PivotStackPointer => "PivotStackPointer",
            Self::CodeExecutionViaSprayedCode => "CodeExecutionViaSprayedCode",
            Self::CodeExecutionViaControlledData => "CodeExecutionViaControlledData",
            Self::CodeExecutionFromStack => "CodeExecutionFromStack",
            Self::CodeExecutionViaSelfContainedRopPayload => {
                "CodeExecutionViaSelfContainedRopPayload"
            }
            Self::NxBypassViaNtSetInformationProcess => "NxBypassViaNtSetInformationProcess",
            Self::NxBypassViaExecutableCrtHeap => "NxBypassViaExecutableCrtHeap",
            Self::NxBypassViaVirtualProtect => "NxBypassViaVirtualProtect",
            Self::NxBypassViaRopVirtualProtect => "NxBypassViaRopVirtualProtect",
            Self::NullPageMapping => "NullPageMapping",
            Self::HeapMassage => "HeapMassage",
            Self::DataSpray => "DataSpray",
            Self::CodeSpray => "CodeSpray",
            Self::NonAslrImageLoad => "NonAslrImageLoad",
        }
    }
}

impl fmt::Display for Technique {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
