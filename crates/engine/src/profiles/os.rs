//! Operating-system profile record.
//!
//! An OS profile carries the platform side of every mitigation: per-region
//! NX and ASLR maps, kernel hardening bits, the heap allocator generation,
//! and the defaults that application and flaw profiles inherit when their
//! own settings are unset.

use super::types::{
    AddressWidth, ArchFamily, AslrSetting, HeapFrontend, OsFamily, Policy, Region, StackProtection,
};

/// Per-region no-execute policy map for user-mode data regions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NxMap {
    /// NX on thread stacks.
    pub stack: Policy,
    /// NX on heap pages.
    pub heap: Policy,
    /// NX on static data segments.
    pub data: Policy,
}

impl NxMap {
    /// A uniform map with every region at `policy`.
    pub const fn uniform(policy: Policy) -> Self {
        Self {
            stack: policy,
            heap: policy,
            data: policy,
        }
    }

    /// The policy for a data region; alias regions map to the heap entry.
    pub fn for_region(&self, region: Region) -> Policy {
        match region {
            Region::Stack => self.stack,
            Region::Heap | Region::Code => self.heap,
            _ => self.data,
        }
    }
}

/// Per-region ASLR policy/entropy map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AslrMap {
    /// Stack randomization.
    pub stack: AslrSetting,
    /// Heap randomization.
    pub heap: AslrSetting,
    /// PEB randomization.
    pub peb: AslrSetting,
    /// Executable-image randomization.
    pub image: AslrSetting,
    /// System-image (`ntdll`) randomization.
    pub ntdll: AslrSetting,
    /// Bottom-up allocation randomization (Windows 8 era).
    pub bottom_up: AslrSetting,
}

impl AslrMap {
    /// A map with no randomization anywhere (pre-Vista platforms).
    pub const UNSUPPORTED: AslrMap = AslrMap {
        stack: AslrSetting::UNSUPPORTED,
        heap: AslrSetting::UNSUPPORTED,
        peb: AslrSetting::UNSUPPORTED,
        image: AslrSetting::UNSUPPORTED,
        ntdll: AslrSetting::UNSUPPORTED,
        bottom_up: AslrSetting::UNSUPPORTED,
    };

    /// The setting for a concrete region. `Data` and `Code` are alias
    /// regions and resolve through the heap entry.
    pub fn for_region(&self, region: Region) -> AslrSetting {
        match region {
            Region::Stack => self.stack,
            Region::Heap | Region::Data | Region::Code => self.heap,
            Region::Peb => self.peb,
            Region::Image => self.image,
            Region::Ntdll => self.ntdll,
        }
    }
}

/// One operating-system release.
#[derive(Debug, Clone, PartialEq)]
pub struct OsProfile {
    /// Symbolic name, unique within the store.
    pub name: String,
    /// Release family.
    pub family: OsFamily,
    /// Service pack level.
    pub service_pack: u8,
    /// OS address width.
    pub width: AddressWidth,
    /// Architecture families this release can run on.
    pub families: Vec<ArchFamily>,
    /// Platform NX support; gates every per-region policy.
    pub nx: Policy,
    /// Per-region user NX policies.
    pub nx_regions: NxMap,
    /// Per-region ASLR policies and entropy.
    pub aslr: AslrMap,
    /// Kernel supervisor-mode execution prevention policy.
    pub kernel_smep: Policy,
    /// Whether the kernel forbids user mappings at the null page.
    pub kernel_null_deref_prevention: bool,
    /// Default heap frontend for processes without an override.
    pub heap_frontend: HeapFrontend,
    /// Heap frontend revision.
    pub heap_frontend_version: u8,
    /// Whether free-list unlinking is safe (pointer-validated).
    pub heap_safe_unlinking: bool,
    /// Whether the heap handle (`_HEAP`) commit routine is protected.
    pub heap_handle_protection: bool,
    /// Default terminate-on-heap-corruption policy.
    pub heap_termination: Policy,
    /// Whether SafeSEH handler validation is enforced for registered images.
    pub safeseh_enforced: bool,
    /// SEH overwrite protection (chain validation) policy.
    pub sehop: Policy,
    /// Default stack-protection settings processes inherit.
    pub stack_protection: StackProtection,
    /// Relative install-base weight, in `[0.0, 1.0]`.
    pub population: f64,
}

impl OsProfile {
    /// Whether the release supports any address randomization.
    pub fn aslr_supported(&self) -> bool {
        self.aslr.image.policy.supported()
            || self.aslr.stack.policy.supported()
            || self.aslr.heap.policy.supported()
    }
}
