//! Application profile record.

use super::types::{AddressWidth, HeapFrontend, OsFamily, Policy, StackProtection, VtableGuard};

/// One application (user process or kernel-mode component).
///
/// Tri-state `Option<bool>` fields are opt-ins the process may express;
/// `None` defers to the OS policy at recalibration time.
#[derive(Debug, Clone, PartialEq)]
pub struct AppProfile {
    /// Symbolic name, unique within the store.
    pub name: String,
    /// Whether the flawed code runs in kernel mode.
    pub kernel: bool,
    /// Process address width.
    pub width: AddressWidth,
    /// Earliest OS family the application runs on.
    pub min_os: Option<OsFamily>,
    /// Whether an ARM build of the application exists.
    pub arm: bool,
    /// Process NX policy.
    pub nx: Policy,
    /// Whether NX cannot be disabled at runtime; `None` is derived.
    pub nx_permanent: Option<bool>,
    /// SEH overwrite protection opt-in.
    pub sehop: Option<bool>,
    /// Forced relocation of non-ASLR images opt-in.
    pub force_relocation: Option<bool>,
    /// Bottom-up allocation randomization opt-in.
    pub bottom_up_aslr: Option<bool>,
    /// Heap randomization opt-in.
    pub heap_aslr: Option<bool>,
    /// Stack randomization opt-in.
    pub stack_aslr: Option<bool>,
    /// Heap frontend override; `None` inherits the OS default.
    pub heap_frontend: Option<HeapFrontend>,
    /// Heap frontend revision override.
    pub heap_frontend_version: Option<u8>,
    /// Terminate-on-heap-corruption opt-in.
    pub heap_termination: Option<bool>,
    /// Process default stack-protection settings; unset fields inherit
    /// from the OS.
    pub stack_protection: StackProtection,
    /// Process default vtable-guard settings.
    pub vtable_guard: VtableGuard,
    /// Whether the process restarts automatically after a crash
    /// (enables brute-force strategies).
    pub automatic_restart: bool,
    /// Loaded plugin module names (candidate non-ASLR images).
    pub plugins: Vec<String>,
    /// Relative install-base weight, in `[0.0, 1.0]`.
    pub population: f64,
}
