//! Flaw profile record and corruption attributes.
//!
//! A flaw profile classifies the defect (root cause, access kind), pins
//! down how the resulting corruption behaves (region, displacement,
//! direction, position, length control), and asserts the capability
//! predicates the defect gives an attacker. `None` attributes are resolved
//! by mode at simulation time: attack-favor reads them as `true`,
//! defense-favor as `false`, and normal mode derives a plausible default
//! from the corruption attributes.

use super::types::{
    AccessKind, CorruptionRegion, Direction, Displacement, Position, RootCause, StackProtection,
    VtableGuard,
};

/// How the memory corruption produced by a flaw behaves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Corruption {
    /// Region the corruption lands in.
    pub region: CorruptionRegion,
    /// Relative or absolute addressing.
    pub displacement: Option<Displacement>,
    /// Direction of a relative corruption.
    pub direction: Option<Direction>,
    /// Contiguity with the flawed object.
    pub position: Option<Position>,
    /// Whether the attacker controls the corruption length.
    pub length_controlled: Option<bool>,
}

impl Corruption {
    /// A flaw that corrupts nothing (pure control-transfer defects).
    pub const NONE: Corruption = Corruption {
        region: CorruptionRegion::None,
        displacement: None,
        direction: None,
        position: None,
        length_controlled: None,
    };
}

/// The capability predicates a flaw explicitly asserts.
///
/// `None` means "not asserted either way"; the helper predicates fall back
/// to mode resolution over the corruption attributes.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FlawAssertions {
    /// Can corrupt a return address on the stack.
    pub can_corrupt_return_address: Option<bool>,
    /// Can corrupt a saved frame pointer.
    pub can_corrupt_frame_pointer: Option<bool>,
    /// Can corrupt an SEH registration record.
    pub can_corrupt_seh_frame: Option<bool>,
    /// Can corrupt a function pointer.
    pub can_corrupt_function_pointer: Option<bool>,
    /// Can choose the target pointer of a write.
    pub can_corrupt_write_target_pointer: Option<bool>,
    /// Can corrupt the state of a live (in-use) object.
    pub can_corrupt_in_use_object_state: Option<bool>,
    /// Can corrupt heap management data (entry headers, free links).
    pub can_corrupt_heap_management_data: Option<bool>,
    /// Can corrupt a C++ object's vtable pointer.
    pub can_corrupt_cpp_object_vtable: Option<bool>,
}

/// One flaw variant.
#[derive(Debug, Clone, PartialEq)]
pub struct FlawProfile {
    /// Symbolic name, unique within the store.
    pub name: String,
    /// Root cause classification.
    pub root_cause: RootCause,
    /// The memory access the flaw grants.
    pub access: AccessKind,
    /// Corruption attributes.
    pub corruption: Corruption,
    /// Whether the attacker is local; `None` is resolved by mode.
    pub local: Option<bool>,
    /// Whether the flawed code runs in kernel mode.
    pub kernel: Option<bool>,
    /// Per-function stack-protection overrides; unset fields inherit from
    /// the application at recalibration.
    pub stack_protection: StackProtection,
    /// Per-class vtable-guard overrides.
    pub vtable_guard: VtableGuard,
    /// Explicitly asserted capabilities.
    pub asserts: FlawAssertions,
    /// Names of flaw variants reachable once this flaw is exercised
    /// (second-order flaws triggered through an arbitrary write).
    pub enables: Vec<String>,
}

impl FlawProfile {
    /// Whether the flaw corrupts memory in `region` (directly or via `Any`).
    pub fn corrupts(&self, region: CorruptionRegion) -> bool {
        self.corruption.region.includes(region)
    }
}
