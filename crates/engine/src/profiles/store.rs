//! The name-keyed profile store and the built-in catalog.
//!
//! The store is constructed once at startup and read-only afterwards. It
//! holds five name→profile maps plus the *core flaw* subset (first-order
//! flaws only; second-order variants reachable through `enables` lists are
//! excluded from permutation defaults). Getters clone: callers mutate their
//! copy, never the stored record.

use std::collections::BTreeMap;

use crate::error::EngineError;
use crate::profiles::application::AppProfile;
use crate::profiles::capabilities::CapabilityProfile;
use crate::profiles::flaw::{Corruption, FlawAssertions, FlawProfile};
use crate::profiles::hardware::HardwareProfile;
use crate::profiles::os::{AslrMap, NxMap, OsProfile};
use crate::profiles::types::{
    AccessKind, AddressWidth, ArchFamily, AslrSetting, CorruptionRegion, Direction, Displacement,
    HeapFrontend, OsFamily, Policy, Position, RootCause, StackProtection, VtableGuard,
};

/// Immutable catalog of every built-in profile, keyed by symbolic name.
#[derive(Debug)]
pub struct ProfileStore {
    hardware: BTreeMap<String, HardwareProfile>,
    os: BTreeMap<String, OsProfile>,
    applications: BTreeMap<String, AppProfile>,
    flaws: BTreeMap<String, FlawProfile>,
    capabilities: BTreeMap<String, CapabilityProfile>,
    core_flaws: Vec<String>,
}

impl ProfileStore {
    /// Builds the store from the built-in catalog.
    pub fn builtin() -> Self {
        let hardware = catalog::hardware();
        let os = catalog::operating_systems();
        let applications = catalog::applications();
        let (flaws, core_flaws) = catalog::flaws();
        let capabilities = catalog::capabilities();
        Self {
            hardware: hardware.into_iter().map(|p| (p.name.clone(), p)).collect(),
            os: os.into_iter().map(|p| (p.name.clone(), p)).collect(),
            applications: applications
                .into_iter()
                .map(|p| (p.name.clone(), p))
                .collect(),
            flaws: flaws.into_iter().map(|p| (p.name.clone(), p)).collect(),
            capabilities: capabilities
                .into_iter()
                .map(|p| (p.name.clone(), p))
                .collect(),
            core_flaws,
        }
    }

    /// Clones the named hardware profile.
    pub fn hardware(&self, name: &str) -> Result<HardwareProfile, EngineError> {
        self.hardware
            .get(name)
            .cloned()
            .ok_or_else(|| EngineError::UnknownProfile {
                kind: "hardware",
                name: name.to_owned(),
            })
    }

    /// Clones the named operating-system profile.
    pub fn os(&self, name: &str) -> Result<OsProfile, EngineError> {
        self.os
            .get(name)
            .cloned()
            .ok_or_else(|| EngineError::UnknownProfile {
                kind: "os",
                name: name.to_owned(),
            })
    }

    /// Clones the named application profile.
    pub fn application(&self, name: &str) -> Result<AppProfile, EngineError> {
        self.applications
            .get(name)
            .cloned()
            .ok_or_else(|| EngineError::UnknownProfile {
                kind: "application",
                name: name.to_owned(),
            })
    }

    /// Clones the named flaw profile (core or derived).
    pub fn flaw(&self, name: &str) -> Result<FlawProfile, EngineError> {
        self.flaws
            .get(name)
            .cloned()
            .ok_or_else(|| EngineError::UnknownProfile {
                kind: "flaw",
                name: name.to_owned(),
            })
    }

    /// Clones the named capability profile.
    pub fn capability(&self, name: &str) -> Result<CapabilityProfile, EngineError> {
        self.capabilities
            .get(name)
            .cloned()
            .ok_or_else(|| EngineError::UnknownProfile {
                kind: "capabilities",
                name: name.to_owned(),
            })
    }

    /// Hardware profile names, lexicographically sorted.
    pub fn hardware_names(&self) -> Vec<String> {
        self.hardware.keys().cloned().collect()
    }

    /// OS profile names, lexicographically sorted.
    pub fn os_names(&self) -> Vec<String> {
        self.os.keys().cloned().collect()
    }

    /// Application profile names, lexicographically sorted.
    pub fn application_names(&self) -> Vec<String> {
        self.applications.keys().cloned().collect()
    }

    /// All flaw profile names (core and derived), lexicographically sorted.
    pub fn flaw_names(&self) -> Vec<String> {
        self.flaws.keys().cloned().collect()
    }

    /// First-order flaw names only, lexicographically sorted.
    pub fn core_flaw_names(&self) -> Vec<String> {
        let mut names = self.core_flaws.clone();
        names.sort();
        names
    }

    /// Capability profile names, lexicographically sorted.
    pub fn capability_names(&self) -> Vec<String> {
        self.capabilities.keys().cloned().collect()
    }
}

/// The built-in catalog. Population weights are relative install-base
/// shares; entropy figures follow the published per-release ASLR numbers.
mod catalog {
    use super::*;

    pub(super) fn hardware() -> Vec<HardwareProfile> {
        vec![
            HardwareProfile {
                name: "x86".into(),
                width: AddressWidth::Bits32,
                family: ArchFamily::X86,
                nx: Policy::Unsupported,
                smep: Policy::Unsupported,
                population: 0.15,
            },
            HardwareProfile {
                name: "x86_nx".into(),
                width: AddressWidth::Bits32,
                family: ArchFamily::X86,
                nx: Policy::On,
                smep: Policy::Unsupported,
                population: 0.35,
            },
            HardwareProfile {
                name: "x64".into(),
                width: AddressWidth::Bits64,
                family: ArchFamily::X64,
                nx: Policy::On,
                smep: Policy::Unsupported,
                population: 0.40,
            },
            HardwareProfile {
                name: "x64_smep".into(),
                width: AddressWidth::Bits64,
                family: ArchFamily::X64,
                nx: Policy::On,
                smep: Policy::On,
                population: 0.08,
            },
            HardwareProfile {
                name: "arm".into(),
                width: AddressWidth::Bits32,
                family: ArchFamily::Arm,
                nx: Policy::On,
                smep: Policy::Unsupported,
                population: 0.02,
            },
        ]
    }

    /// Pre-Vista releases: no ASLR, lookaside heap frontend, GS v1.
    fn legacy_os(
        name: &str,
        family: OsFamily,
        service_pack: u8,
        families: Vec<ArchFamily>,
        nx: Policy,
        population: f64,
    ) -> OsProfile {
        OsProfile {
            name: name.into(),
            family,
            service_pack,
            width: AddressWidth::Bits32,
            families,
            nx,
            nx_regions: NxMap::uniform(nx),
            aslr: AslrMap::UNSUPPORTED,
            kernel_smep: Policy::Unsupported,
            kernel_null_deref_prevention: false,
            heap_frontend: HeapFrontend::Lookaside,
            heap_frontend_version: 1,
            heap_safe_unlinking: false,
            heap_handle_protection: false,
            heap_termination: Policy::Unsupported,
            safeseh_enforced: true,
            sehop: Policy::Unsupported,
            stack_protection: StackProtection {
                enabled: Some(true),
                version: Some(1),
                entropy_bits: None,
            },
            population,
        }
    }

    /// Vista/Win7-era ASLR map (published first-generation entropy figures).
    const ASLR_GEN1: AslrMap = AslrMap {
        stack: AslrSetting::new(Policy::On, 14),
        heap: AslrSetting::new(Policy::On, 5),
        peb: AslrSetting::new(Policy::On, 4),
        image: AslrSetting::new(Policy::OptIn, 8),
        ntdll: AslrSetting::new(Policy::On, 8),
        bottom_up: AslrSetting::UNSUPPORTED,
    };

    /// Windows 8 32-bit ASLR map (bottom-up randomization added).
    const ASLR_WIN8_32: AslrMap = AslrMap {
        stack: AslrSetting::new(Policy::On, 14),
        heap: AslrSetting::new(Policy::On, 5),
        peb: AslrSetting::new(Policy::On, 4),
        image: AslrSetting::new(Policy::OptIn, 8),
        ntdll: AslrSetting::new(Policy::On, 8),
        bottom_up: AslrSetting::new(Policy::OptIn, 8),
    };

    /// Windows 8 64-bit ASLR map (high-entropy bottom-up).
    const ASLR_WIN8_64: AslrMap = AslrMap {
        stack: AslrSetting::new(Policy::On, 17),
        heap: AslrSetting::new(Policy::On, 8),
        peb: AslrSetting::new(Policy::On, 8),
        image: AslrSetting::new(Policy::OptIn, 17),
        ntdll: AslrSetting::new(Policy::On, 17),
        bottom_up: AslrSetting::new(Policy::OptIn, 24),
    };

    fn modern_os(
        name: &str,
        family: OsFamily,
        service_pack: u8,
        width: AddressWidth,
        families: Vec<ArchFamily>,
        aslr: AslrMap,
        population: f64,
    ) -> OsProfile {
        let win8 = family.is_win8_era();
        OsProfile {
            name: name.into(),
            family,
            service_pack,
            width,
            families,
            nx: Policy::OptIn,
            nx_regions: NxMap::uniform(Policy::OptIn),
            aslr,
            kernel_smep: if win8 { Policy::On } else { Policy::Unsupported },
            kernel_null_deref_prevention: win8,
            heap_frontend: HeapFrontend::LowFragmentation,
            heap_frontend_version: if win8 { 2 } else { 1 },
            heap_safe_unlinking: true,
            heap_handle_protection: true,
            heap_termination: if win8 { Policy::On } else { Policy::OptIn },
            safeseh_enforced: true,
            sehop: if win8 { Policy::OptOut } else { Policy::OptIn },
            stack_protection: StackProtection {
                enabled: Some(true),
                version: Some(if win8 { 3 } else { 2 }),
                entropy_bits: None,
            },
            population,
        }
    }

    pub(super) fn operating_systems() -> Vec<OsProfile> {
        use AddressWidth::{Bits32, Bits64};
        use ArchFamily::{Arm, X64, X86};
        vec![
            legacy_os(
                "xp_sp2",
                OsFamily::WindowsXp,
                2,
                vec![X86],
                Policy::OptIn,
                0.18,
            ),
            legacy_os(
                "srv2003_sp2",
                OsFamily::WindowsServer2003,
                2,
                vec![X86, X64],
                Policy::OptOut,
                0.04,
            ),
            modern_os(
                "vista_sp1",
                OsFamily::WindowsVista,
                1,
                Bits32,
                vec![X86, X64],
                ASLR_GEN1,
                0.08,
            ),
            modern_os(
                "win7_rtm",
                OsFamily::Windows7,
                0,
                Bits32,
                vec![X86, X64],
                ASLR_GEN1,
                0.24,
            ),
            modern_os(
                "win7_rtm_x64",
                OsFamily::Windows7,
                0,
                Bits64,
                vec![X64],
                ASLR_GEN1,
                0.19,
            ),
            modern_os(
                "win8_client",
                OsFamily::Windows8,
                0,
                Bits32,
                vec![X86],
                ASLR_WIN8_32,
                0.10,
            ),
            modern_os(
                "win8_client_x64",
                OsFamily::Windows8,
                0,
                Bits64,
                vec![X64],
                ASLR_WIN8_64,
                0.10,
            ),
            modern_os(
                "win8_server_x64",
                OsFamily::Windows8Server,
                0,
                Bits64,
                vec![X64],
                ASLR_WIN8_64,
                0.05,
            ),
            modern_os(
                "win8_arm",
                OsFamily::Windows8,
                0,
                Bits32,
                vec![Arm],
                ASLR_WIN8_32,
                0.02,
            ),
        ]
    }

    fn browser(
        name: &str,
        width: AddressWidth,
        min_os: OsFamily,
        modern: bool,
        arm: bool,
        population: f64,
    ) -> AppProfile {
        AppProfile {
            name: name.into(),
            kernel: false,
            width,
            min_os: Some(min_os),
            arm,
            nx: Policy::On,
            nx_permanent: None,
            sehop: None,
            force_relocation: if modern { Some(true) } else { None },
            bottom_up_aslr: if modern { Some(true) } else { None },
            heap_aslr: if modern { Some(true) } else { None },
            stack_aslr: if modern { Some(true) } else { None },
            heap_frontend: None,
            heap_frontend_version: None,
            heap_termination: Some(true),
            stack_protection: StackProtection::default(),
            vtable_guard: VtableGuard {
                enabled: Some(false),
                level: None,
            },
            automatic_restart: false,
            plugins: vec!["flash".into(), "jvm".into()],
            population,
        }
    }

    pub(super) fn applications() -> Vec<AppProfile> {
        use AddressWidth::{Bits32, Bits64};
        let mut apps = vec![
            browser("ie8", Bits32, OsFamily::WindowsXp, false, false, 0.28),
            browser("ie8_x64", Bits64, OsFamily::WindowsVista, false, false, 0.04),
            browser("ie10", Bits32, OsFamily::Windows7, true, true, 0.14),
            browser("ie10_x64", Bits64, OsFamily::Windows7, true, false, 0.05),
        ];
        apps.push(AppProfile {
            name: "office11".into(),
            kernel: false,
            width: Bits32,
            min_os: Some(OsFamily::WindowsXp),
            arm: false,
            nx: Policy::Off,
            nx_permanent: None,
            sehop: None,
            force_relocation: None,
            bottom_up_aslr: None,
            heap_aslr: None,
            stack_aslr: None,
            heap_frontend: None,
            heap_frontend_version: None,
            heap_termination: None,
            stack_protection: StackProtection::default(),
            vtable_guard: VtableGuard::default(),
            automatic_restart: false,
            plugins: Vec::new(),
            population: 0.22,
        });
        apps.push(AppProfile {
            name: "svc_host".into(),
            kernel: false,
            width: Bits32,
            min_os: None,
            arm: false,
            nx: Policy::On,
            nx_permanent: None,
            sehop: Some(true),
            force_relocation: None,
            bottom_up_aslr: None,
            heap_aslr: None,
            stack_aslr: None,
            heap_frontend: None,
            heap_frontend_version: None,
            heap_termination: Some(true),
            stack_protection: StackProtection::default(),
            vtable_guard: VtableGuard::default(),
            // Service control manager restarts crashed services.
            automatic_restart: true,
            plugins: Vec::new(),
            population: 0.12,
        });
        for (name, width, population) in [
            ("kernel_driver", Bits64, 0.08),
            ("kernel_driver_x86", Bits32, 0.07),
        ] {
            apps.push(AppProfile {
                name: name.into(),
                kernel: true,
                width,
                min_os: None,
                arm: false,
                nx: Policy::On,
                nx_permanent: Some(true),
                sehop: None,
                force_relocation: None,
                bottom_up_aslr: None,
                heap_aslr: None,
                stack_aslr: None,
                heap_frontend: None,
                heap_frontend_version: None,
                heap_termination: None,
                stack_protection: StackProtection::default(),
                vtable_guard: VtableGuard::default(),
                automatic_restart: false,
                plugins: Vec::new(),
                population,
            });
        }
        apps
    }

    fn corruption_flaw(
        name: &str,
        region: CorruptionRegion,
        displacement: Displacement,
        direction: Option<Direction>,
        position: Option<Position>,
        asserts: FlawAssertions,
        enables: Vec<String>,
    ) -> FlawProfile {
        FlawProfile {
            name: name.into(),
            root_cause: RootCause::MemoryCorruption,
            access: AccessKind::Write,
            corruption: Corruption {
                region,
                displacement: Some(displacement),
                direction,
                position,
                length_controlled: Some(true),
            },
            local: None,
            kernel: None,
            stack_protection: StackProtection::default(),
            vtable_guard: VtableGuard::default(),
            asserts,
            enables,
        }
    }

    pub(super) fn flaws() -> (Vec<FlawProfile>, Vec<String>) {
        let stack_asserts = FlawAssertions {
            can_corrupt_return_address: Some(true),
            can_corrupt_frame_pointer: Some(true),
            can_corrupt_seh_frame: Some(true),
            ..FlawAssertions::default()
        };
        let heap_asserts = FlawAssertions {
            can_corrupt_function_pointer: Some(true),
            can_corrupt_in_use_object_state: Some(true),
            can_corrupt_heap_management_data: Some(true),
            can_corrupt_cpp_object_vtable: Some(true),
            ..FlawAssertions::default()
        };
        let write_asserts = FlawAssertions {
            can_corrupt_write_target_pointer: Some(true),
            ..FlawAssertions::default()
        };
        let object_asserts = FlawAssertions {
            can_corrupt_in_use_object_state: Some(true),
            can_corrupt_cpp_object_vtable: Some(true),
            ..FlawAssertions::default()
        };
        let derived = "controlled_function_pointer_overwrite".to_owned();

        let mut flaws = vec![
            corruption_flaw(
                "relative_stack_corruption_forward_adjacent",
                CorruptionRegion::Stack,
                Displacement::Relative,
                Some(Direction::Forward),
                Some(Position::Adjacent),
                stack_asserts,
                Vec::new(),
            ),
            corruption_flaw(
                "relative_stack_corruption_forward_nonadjacent",
                CorruptionRegion::Stack,
                Displacement::Relative,
                Some(Direction::Forward),
                Some(Position::NonAdjacent),
                stack_asserts,
                Vec::new(),
            ),
            corruption_flaw(
                "relative_heap_corruption_forward_adjacent",
                CorruptionRegion::Heap,
                Displacement::Relative,
                Some(Direction::Forward),
                Some(Position::Adjacent),
                heap_asserts,
                Vec::new(),
            ),
            corruption_flaw(
                "absolute_write",
                CorruptionRegion::Any,
                Displacement::Absolute,
                None,
                None,
                write_asserts,
                vec![derived.clone()],
            ),
        ];
        flaws.push(FlawProfile {
            name: "format_string".into(),
            root_cause: RootCause::FormatString,
            access: AccessKind::Write,
            corruption: Corruption {
                region: CorruptionRegion::Any,
                displacement: Some(Displacement::Absolute),
                direction: None,
                position: None,
                length_controlled: Some(true),
            },
            local: None,
            kernel: None,
            stack_protection: StackProtection::default(),
            vtable_guard: VtableGuard::default(),
            asserts: write_asserts,
            enables: vec![derived.clone()],
        });
        flaws.push(FlawProfile {
            name: "null_deref".into(),
            root_cause: RootCause::NullDereference,
            access: AccessKind::ControlTransfer,
            corruption: Corruption::NONE,
            local: None,
            kernel: None,
            stack_protection: StackProtection::default(),
            vtable_guard: VtableGuard::default(),
            asserts: FlawAssertions {
                can_corrupt_function_pointer: Some(true),
                ..FlawAssertions::default()
            },
            enables: Vec::new(),
        });
        for (name, root_cause) in [
            ("type_confusion", RootCause::TypeConfusion),
            ("uninitialized_use", RootCause::UninitializedUse),
        ] {
            flaws.push(FlawProfile {
                name: name.into(),
                root_cause,
                access: AccessKind::ControlTransfer,
                corruption: Corruption::NONE,
                local: None,
                kernel: None,
                stack_protection: StackProtection::default(),
                vtable_guard: VtableGuard::default(),
                asserts: object_asserts,
                enables: Vec::new(),
            });
        }
        for (name, root_cause) in [
            ("double_free", RootCause::DoubleFree),
            ("arbitrary_free", RootCause::ArbitraryFree),
        ] {
            flaws.push(FlawProfile {
                name: name.into(),
                root_cause,
                access: AccessKind::Write,
                corruption: Corruption {
                    region: CorruptionRegion::Heap,
                    displacement: Some(Displacement::Relative),
                    direction: None,
                    position: Some(Position::Adjacent),
                    length_controlled: Some(false),
                },
                local: None,
                kernel: None,
                stack_protection: StackProtection::default(),
                vtable_guard: VtableGuard::default(),
                asserts: FlawAssertions {
                    can_corrupt_in_use_object_state: Some(true),
                    can_corrupt_heap_management_data: Some(true),
                    ..FlawAssertions::default()
                },
                enables: Vec::new(),
            });
        }
        let core: Vec<String> = flaws.iter().map(|f| f.name.clone()).collect();

        // Second-order variant: only reachable through an `enables` list.
        flaws.push(corruption_flaw(
            &derived,
            CorruptionRegion::DataSeg,
            Displacement::Absolute,
            None,
            Some(Position::Adjacent),
            FlawAssertions {
                can_corrupt_function_pointer: Some(true),
                ..FlawAssertions::default()
            },
            Vec::new(),
        ));
        (flaws, core)
    }

    pub(super) fn capabilities() -> Vec<CapabilityProfile> {
        vec![
            // Typical remote attacker: full content control, no leaks.
            CapabilityProfile {
                name: "baseline".into(),
                can_discover_stack_address: Some(false),
                can_discover_heap_address: Some(false),
                can_discover_peb_address: Some(false),
                can_discover_image_address: Some(false),
                can_discover_ntdll_address: Some(false),
                can_spray_data_bottom_up: Some(true),
                can_spray_code_bottom_up: Some(true),
                can_massage_heap: Some(true),
                can_load_non_aslr_image: Some(true),
                can_map_null_page: Some(true),
                can_discover_stack_protection_cookie: Some(false),
                can_discover_vtguard_cookie: Some(false),
            },
            CapabilityProfile {
                name: "everything".into(),
                can_discover_stack_address: Some(true),
                can_discover_heap_address: Some(true),
                can_discover_peb_address: Some(true),
                can_discover_image_address: Some(true),
                can_discover_ntdll_address: Some(true),
                can_spray_data_bottom_up: Some(true),
                can_spray_code_bottom_up: Some(true),
                can_massage_heap: Some(true),
                can_load_non_aslr_image: Some(true),
                can_map_null_page: Some(true),
                can_discover_stack_protection_cookie: Some(true),
                can_discover_vtguard_cookie: Some(true),
            },
            CapabilityProfile {
                name: "nothing".into(),
                can_discover_stack_address: Some(false),
                can_discover_heap_address: Some(false),
                can_discover_peb_address: Some(false),
                can_discover_image_address: Some(false),
                can_discover_ntdll_address: Some(false),
                can_spray_data_bottom_up: Some(false),
                can_spray_code_bottom_up: Some(false),
                can_massage_heap: Some(false),
                can_load_non_aslr_image: Some(false),
                can_map_null_page: Some(false),
                can_discover_stack_protection_cookie: Some(false),
                can_discover_vtguard_cookie: Some(false),
            },
        ]
    }
}
