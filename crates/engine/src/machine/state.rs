//! State identifiers of the exploitation machine.

use std::fmt;

/// One milestone of the exploitation process.
///
/// `TargetDefined` is the initial state; `ControlOfCodeExecution` is the
/// single terminal (success) state. Every other state is intermediate and
/// reached only through the transition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum State {
    /// The target tuple is configured; nothing has happened yet.
    TargetDefined,
    /// Environment preparation steps (sprays, leaks, mappings) in progress.
    PreparingEnvironment,
    /// Preparation declared finished.
    EnvironmentPrepared,
    /// The flaw has been exercised.
    FlawTriggered,
    /// An arbitrary write has been used to set up a second-order flaw.
    NextFlawTriggered,
    /// A return address is attacker-controlled.
    ControlOfReturnAddress,
    /// A saved frame pointer is attacker-controlled.
    ControlOfFramePointer,
    /// An SEH registration record is attacker-controlled.
    ControlOfSehFrame,
    /// A function pointer is attacker-controlled.
    ControlOfFunctionPointer,
    /// The destination pointer of a write is attacker-controlled.
    ControlOfWriteTargetPointer,
    /// The state of a live object is attacker-controlled.
    ControlOfInUseObjectState,
    /// A low-fragmentation-heap free-entry link offset is controlled.
    ControlOfLfhLinkoffset,
    /// Heap free-list entry links are attacker-controlled.
    ControlOfHeapEntryFreeLinks,
    /// The heap handle structure is attacker-controlled.
    ControlOfHeapHandle,
    /// A C++ object vtable pointer is attacker-controlled.
    ControlOfCppObjectVtable,
    /// The instruction pointer is attacker-controlled.
    ControlOfInstructionPointer,
    /// The stack pointer addresses attacker-controlled data.
    ControlOfStackPointer,
    /// NX prevents direct payload execution; a bypass is in progress.
    BypassingNx,
    /// Arbitrary code execution achieved (terminal).
    ControlOfCodeExecution,
}

impl State {
    /// Every state, in declaration order.
    pub const ALL: [State; 19] = [
        State::TargetDefined,
        State::PreparingEnvironment,
        State::EnvironmentPrepared,
        State::FlawTriggered,
        State::NextFlawTriggered,
        State::ControlOfReturnAddress,
        State::ControlOfFramePointer,
        State::ControlOfSehFrame,
        State::ControlOfFunctionPointer,
        State::ControlOfWriteTargetPointer,
        State::ControlOfInUseObjectState,
        State::ControlOfLfhLinkoffset,
        State::ControlOfHeapEntryFreeLinks,
        State::ControlOfHeapHandle,
        State::ControlOfCppObjectVtable,
        State::ControlOfInstructionPointer,
        State::ControlOfStackPointer,
        State::BypassingNx,
        State::ControlOfCodeExecution,
    ];

    /// Snake-case name used in traces, reports, and CSV columns.
    pub fn name(self) -> &'static str {
        match self {
            Self::TargetDefined => "target_defined",
            Self::PreparingEnvironment => "preparing_environment",
            Self::EnvironmentPrepared => "environment_prepared",
            Self::FlawTriggered => "flaw_triggered",
            Self::NextFlawTriggered => "next_flaw_triggered",
            Self::ControlOfReturnAddress => "control_of_return_address",
            Self::ControlOfFramePointer => "control_of_frame_pointer",
            Self::ControlOfSehFrame => "control_of_seh_frame",
            Self::ControlOfFunctionPointer => "control_of_function_pointer",
            Self::ControlOfWriteTargetPointer => "control_of_write_target_pointer",
            Self::ControlOfInUseObjectState => "control_of_in_use_object_state",
            Self::ControlOfLfhLinkoffset => "control_of_lfh_linkoffset",
            Self::ControlOfHeapEntryFreeLinks => "control_of_heap_entry_free_links",
            Self::ControlOfHeapHandle => "control_of_heap_handle",
            Self::ControlOfCppObjectVtable => "control_of_cpp_object_vtable",
            Self::ControlOfInstructionPointer => "control_of_instruction_pointer",
            Self::ControlOfStackPointer => "control_of_stack_pointer",
            Self::BypassingNx => "bypassing_nx",
            Self::ControlOfCodeExecution => "control_of_code_execution",
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
