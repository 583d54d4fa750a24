//! Enums shared across profile kinds.
//!
//! These are the typed vocabulary of the data model: address widths,
//! architecture families, mitigation policies, address regions, heap
//! frontends, and the corruption attribute enums carried by flaw profiles.

use std::fmt;

use serde::Deserialize;

/// Pointer width of a hardware platform, OS, or process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressWidth {
    /// 32-bit addressing.
    Bits32,
    /// 64-bit addressing.
    Bits64,
}

impl AddressWidth {
    /// Whether this is the 64-bit width.
    pub fn is_64(self) -> bool {
        matches!(self, Self::Bits64)
    }
}

/// Processor architecture family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArchFamily {
    /// 32-bit x86.
    X86,
    /// 64-bit x86.
    X64,
    /// 32-bit ARM.
    Arm,
}

/// Support/enablement policy for a hardware or software mitigation.
///
/// `Unsupported` and `Off` short-circuit every consumer to disabled;
/// `OptIn`/`OptOut` defer to the application's opt-in bit; `On` is
/// unconditional.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Policy {
    /// The platform cannot provide the mitigation at all.
    #[default]
    Unsupported,
    /// Supported but disabled.
    Off,
    /// Disabled unless the application opts in.
    OptIn,
    /// Enabled unless the application opts out.
    OptOut,
    /// Unconditionally enabled.
    On,
}

impl Policy {
    /// Whether the mitigation can be enabled at all.
    pub fn supported(self) -> bool {
        !matches!(self, Self::Unsupported | Self::Off)
    }

    /// Resolves the policy against an application opt-in tri-state.
    ///
    /// `opt_in` of `None` means the application expressed no preference:
    /// `OptIn` resolves to disabled and `OptOut` to enabled.
    pub fn resolve(self, opt_in: Option<bool>) -> bool {
        match self {
            Self::Unsupported | Self::Off => false,
            Self::On => true,
            Self::OptIn => opt_in == Some(true),
            Self::OptOut => opt_in != Some(false),
        }
    }
}

/// A virtual address region an attacker may need to locate.
///
/// `Data` is an alias region: it is satisfied when any of heap, stack, or
/// PEB has been located. `Code` is satisfied only by a code spray.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    /// Thread stack memory.
    Stack,
    /// Process heap memory.
    Heap,
    /// The process environment block.
    Peb,
    /// The application image (or a loaded non-ASLR module).
    Image,
    /// The system image `ntdll`.
    Ntdll,
    /// Any attacker-controlled data (alias of heap | stack | peb).
    Data,
    /// Attacker-controlled executable payload at a known address.
    Code,
}

impl Region {
    /// Regions whose discovery also satisfies `Data`.
    pub const DATA_ALIASES: [Region; 3] = [Region::Heap, Region::Stack, Region::Peb];

    /// Lowercase name used in assumption keys and reports.
    pub fn name(self) -> &'static str {
        match self {
            Self::Stack => "stack",
            Self::Heap => "heap",
            Self::Peb => "peb",
            Self::Image => "image",
            Self::Ntdll => "ntdll",
            Self::Data => "data",
            Self::Code => "code",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Windows release family, ordered by release generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OsFamily {
    /// Windows XP.
    WindowsXp,
    /// Windows Server 2003.
    WindowsServer2003,
    /// Windows Vista.
    WindowsVista,
    /// Windows 7.
    Windows7,
    /// Windows 8 client.
    Windows8,
    /// Windows Server 2012 (the Windows 8 server release).
    Windows8Server,
}

impl OsFamily {
    /// Release-generation rank; the two Windows 8 releases share one rank.
    fn generation(self) -> u8 {
        match self {
            Self::WindowsXp => 0,
            Self::WindowsServer2003 => 1,
            Self::WindowsVista => 2,
            Self::Windows7 => 3,
            Self::Windows8 | Self::Windows8Server => 4,
        }
    }

    /// Whether this family is the same generation as `other` or newer.
    pub fn at_least(self, other: OsFamily) -> bool {
        self.generation() >= other.generation()
    }

    /// Whether this is either Windows 8 release.
    pub fn is_win8_era(self) -> bool {
        self.generation() == 4
    }
}

/// Heap allocator frontend kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeapFrontend {
    /// Lookaside-list frontend (XP / Server 2003 era).
    Lookaside,
    /// Low-fragmentation heap frontend (Vista and later).
    LowFragmentation,
}

/// Root cause classification of a flaw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RootCause {
    /// Attacker-controlled format string.
    FormatString,
    /// Dereference of a null (or near-null) pointer.
    NullDereference,
    /// Object interpreted as an incompatible type.
    TypeConfusion,
    /// Use of uninitialized memory.
    UninitializedUse,
    /// The same allocation freed twice.
    DoubleFree,
    /// Free of an attacker-controlled pointer.
    ArbitraryFree,
    /// Plain out-of-bounds memory corruption.
    MemoryCorruption,
}

/// The memory access the flaw gives the attacker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessKind {
    /// Out-of-bounds or controlled read.
    Read,
    /// Out-of-bounds or controlled write.
    Write,
    /// Execution of unintended memory.
    Execute,
    /// Direct control transfer (e.g. indirect call through bad state).
    ControlTransfer,
}

/// The memory region the corruption lands in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorruptionRegion {
    /// Thread stack.
    Stack,
    /// Process heap.
    Heap,
    /// Static data segment.
    DataSeg,
    /// Attacker's choice of region.
    Any,
    /// No memory is corrupted (e.g. pure control-transfer flaws).
    None,
}

impl CorruptionRegion {
    /// Whether the corruption can land in `region`.
    pub fn includes(self, region: CorruptionRegion) -> bool {
        self == CorruptionRegion::Any || self == region
    }
}

/// Whether the corruption address is relative to the flawed object or
/// absolute (attacker-chosen).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Displacement {
    /// Offset from the flawed allocation.
    Relative,
    /// Arbitrary attacker-chosen address.
    Absolute,
}

/// Direction of a relative corruption.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Toward higher addresses.
    Forward,
    /// Toward lower addresses.
    Reverse,
}

/// Whether the corruption is contiguous with the flawed object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Position {
    /// Contiguous overflow; everything between object and target is hit.
    Adjacent,
    /// Discontiguous; intermediate state (cookies) is skipped.
    NonAdjacent,
}

/// Stack-protection (/GS-style) settings; `None` fields inherit.
///
/// Flaw profiles carry per-function overrides, applications carry process
/// defaults, operating systems carry platform defaults. Recalibration
/// resolves the chain flaw ← application ← OS.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct StackProtection {
    /// Whether the protection is compiled in; `None` inherits.
    pub enabled: Option<bool>,
    /// Cookie scheme revision; `None` inherits.
    pub version: Option<u8>,
    /// Effective cookie entropy in bits; `None` is derived at recalibration.
    pub entropy_bits: Option<u32>,
}

/// Virtual-table guard settings; `None` fields inherit.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct VtableGuard {
    /// Whether vtable guard instrumentation is present; `None` inherits.
    pub enabled: Option<bool>,
    /// Instrumentation level; `None` inherits.
    pub level: Option<u8>,
}

/// ASLR policy and entropy for one address region.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct AslrSetting {
    /// Randomization policy for the region.
    pub policy: Policy,
    /// Entropy in bits when randomized.
    pub entropy_bits: u32,
}

impl AslrSetting {
    /// A region with no randomization support.
    pub const UNSUPPORTED: AslrSetting = AslrSetting {
        policy: Policy::Unsupported,
        entropy_bits: 0,
    };

    /// Constructs a setting from policy and entropy bits.
    pub const fn new(policy: Policy, entropy_bits: u32) -> Self {
        Self {
            policy,
            entropy_bits,
        }
    }
}
