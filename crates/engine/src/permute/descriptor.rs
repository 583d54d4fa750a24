//! The typed bit-descriptor registry.
//!
//! Each descriptor describes one configurable field of a target: its
//! symbolic value domain, the number of index bits it occupies in a packed
//! permutation point, a writer, a reader, and an optional post-assignment
//! verifier. The registry drives both permutation (value enumeration) and
//! serialization (CSV column set); its order is fixed and is the order in
//! which writers are applied.

use crate::error::EngineError;
use crate::profiles::store::ProfileStore;
use crate::profiles::types::{
    CorruptionRegion, Direction, Displacement, Policy, Position,
};
use crate::target::Target;

/// Field value domain kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// A closed set of symbolic values.
    Enum,
    /// A tri-state boolean over `{unset, true, false}`.
    Boolean,
}

/// Writer function: assigns one symbolic value to the target.
pub type SetFn = fn(&mut Target, &ProfileStore, &str) -> Result<(), EngineError>;
/// Reader function: the field's current symbolic value.
pub type GetFn = fn(&Target) -> String;
/// Verifier, run after the whole point is assigned.
pub type VerifyFn = fn(&Target) -> Result<(), EngineError>;

/// One typed, named field of the permutation space.
#[derive(Debug, Clone)]
pub struct BitDescriptor {
    /// Field name; also the CSV column name.
    pub name: &'static str,
    /// Value domain kind.
    pub kind: FieldKind,
    /// The full symbolic value domain.
    pub values: Vec<String>,
    /// Writer.
    pub set: SetFn,
    /// Reader.
    pub get: GetFn,
    /// Optional post-assignment verifier.
    pub verify: Option<VerifyFn>,
}

impl BitDescriptor {
    /// Index bits needed to address `count` values.
    ///
    /// Booleans always occupy 2 bits (the full `{unset, true, false}`
    /// domain plus one dead slot); enums take `⌈log₂ count⌉`, which is
    /// zero when a scenario pins a single value.
    pub fn bits_for(kind: FieldKind, count: usize) -> u32 {
        match kind {
            FieldKind::Boolean if count == 3 => 2,
            _ => {
                let mut bits = 0;
                while (1usize << bits) < count {
                    bits += 1;
                }
                bits
            }
        }
    }
}

/// The tri-state boolean domain.
fn bool3_values() -> Vec<String> {
    vec!["unset".into(), "true".into(), "false".into()]
}

/// Parses a tri-state symbolic value.
fn parse_bool3(field: &'static str, value: &str) -> Result<Option<bool>, EngineError> {
    match value {
        "unset" => Ok(None),
        "true" => Ok(Some(true)),
        "false" => Ok(Some(false)),
        other => Err(EngineError::InvalidScenario(format!(
            "{field}: not a boolean value: {other}"
        ))),
    }
}

/// Renders a tri-state field.
fn bool3(value: Option<bool>) -> String {
    match value {
        None => "unset".into(),
        Some(true) => "true".into(),
        Some(false) => "false".into(),
    }
}

/// Stamps out the writer/reader pair of a tri-state boolean field path.
macro_rules! bool3_descriptor {
    ($name:literal, $($path:ident).+) => {
        BitDescriptor {
            name: $name,
            kind: FieldKind::Boolean,
            values: bool3_values(),
            set: |target, _store, value| {
                if let Some(flag) = parse_bool3($name, value)? {
                    target.$($path).+ = Some(flag);
                }
                Ok(())
            },
            get: |target| bool3(target.$($path).+),
            verify: None,
        }
    };
}

/// Builds the full registry in its fixed registration order.
pub fn registry(store: &ProfileStore) -> Vec<BitDescriptor> {
    vec![
        BitDescriptor {
            name: "hw_base_profile",
            kind: FieldKind::Enum,
            values: store.hardware_names(),
            set: |target, store, value| target.set_hw(store, value),
            get: |target| target.hardware.name.clone(),
            verify: None,
        },
        BitDescriptor {
            name: "os_base_profile",
            kind: FieldKind::Enum,
            values: store.os_names(),
            set: |target, store, value| target.set_os(store, value),
            get: |target| target.os.name.clone(),
            verify: None,
        },
        BitDescriptor {
            name: "app_base_profile",
            kind: FieldKind::Enum,
            values: store.application_names(),
            set: |target, store, value| target.set_app(store, value),
            get: |target| target.application.name.clone(),
            verify: None,
        },
        BitDescriptor {
            name: "flaw_base_profile",
            kind: FieldKind::Enum,
            values: store.core_flaw_names(),
            set: |target, store, value| target.set_flaw(store, value),
            get: |target| target.flaw.name.clone(),
            verify: None,
        },
        BitDescriptor {
            name: "cap_base_profile",
            kind: FieldKind::Enum,
            values: store.capability_names(),
            set: |target, store, value| target.set_capabilities(store, value),
            get: |target| target.capabilities.name.clone(),
            verify: None,
        },
        bool3_descriptor!("flaw_local", flaw.local),
        bool3_descriptor!("flaw_kernel", flaw.kernel),
        BitDescriptor {
            name: "flaw_corruption_region",
            kind: FieldKind::Enum,
            values: ["stack", "heap", "dataseg", "any", "none"]
                .iter()
                .map(|&s| s.to_owned())
                .collect(),
            set: |target, _store, value| {
                target.flaw.corruption.region = match value {
                    "stack" => CorruptionRegion::Stack,
                    "heap" => CorruptionRegion::Heap,
                    "dataseg" => CorruptionRegion::DataSeg,
                    "any" => CorruptionRegion::Any,
                    "none" => CorruptionRegion::None,
                    other => {
                        return Err(EngineError::InvalidScenario(format!(
                            "flaw_corruption_region: unknown region: {other}"
                        )));
                    }
                };
                Ok(())
            },
            get: |target| {
                match target.flaw.corruption.region {
                    CorruptionRegion::Stack => "stack",
                    CorruptionRegion::Heap => "heap",
                    CorruptionRegion::DataSeg => "dataseg",
                    CorruptionRegion::Any => "any",
                    CorruptionRegion::None => "none",
                }
                .to_owned()
            },
            verify: None,
        },
        BitDescriptor {
            name: "flaw_corruption_displacement",
            kind: FieldKind::Enum,
            values: ["unset", "relative", "absolute"]
                .iter()
                .map(|&s| s.to_owned())
                .collect(),
            set: |target, _store, value| {
                target.flaw.corruption.displacement = match value {
                    "unset" => None,
                    "relative" => Some(Displacement::Relative),
                    "absolute" => Some(Displacement::Absolute),
                    other => {
                        return Err(EngineError::InvalidScenario(format!(
                            "flaw_corruption_displacement: unknown value: {other}"
                        )));
                    }
                };
                Ok(())
            },
            get: |target| {
                match target.flaw.corruption.displacement {
                    None => "unset",
                    Some(Displacement::Relative) => "relative",
                    Some(Displacement::Absolute) => "absolute",
                }
                .to_owned()
            },
            verify: None,
        },
        BitDescriptor {
            name: "flaw_corruption_direction",
            kind: FieldKind::Enum,
            values: ["unset", "forward", "reverse"]
                .iter()
                .map(|&s| s.to_owned())
                .collect(),
            set: |target, _store, value| {
                target.flaw.corruption.direction = match value {
                    "unset" => None,
                    "forward" => Some(Direction::Forward),
                    "reverse" => Some(Direction::Reverse),
                    other => {
                        return Err(EngineError::InvalidScenario(format!(
                            "flaw_corruption_direction: unknown value: {other}"
                        )));
                    }
                };
                Ok(())
            },
            get: |target| {
                match target.flaw.corruption.direction {
                    None => "unset",
                    Some(Direction::Forward) => "forward",
                    Some(Direction::Reverse) => "reverse",
                }
                .to_owned()
            },
            verify: None,
        },
        BitDescriptor {
            name: "flaw_corruption_position",
            kind: FieldKind::Enum,
            values: ["unset", "adjacent", "nonadjacent"]
                .iter()
                .map(|&s| s.to_owned())
                .collect(),
            set: |target, _store, value| {
                target.flaw.corruption.position = match value {
                    "unset" => None,
                    "adjacent" => Some(Position::Adjacent),
                    "nonadjacent" => Some(Position::NonAdjacent),
                    other => {
                        return Err(EngineError::InvalidScenario(format!(
                            "flaw_corruption_position: unknown value: {other}"
                        )));
                    }
                };
                Ok(())
            },
            get: |target| {
                match target.flaw.corruption.position {
                    None => "unset",
                    Some(Position::Adjacent) => "adjacent",
                    Some(Position::NonAdjacent) => "nonadjacent",
                }
                .to_owned()
            },
            // Corruption geometry is meaningless for flaws that corrupt
            // nothing; drop the point rather than simulate nonsense.
            verify: Some(|target| {
                if target.flaw.corruption.position.is_some()
                    && target.flaw.corruption.region == CorruptionRegion::None
                {
                    return Err(EngineError::IncompatibleTarget(
                        "corruption position set on a non-corrupting flaw".into(),
                    ));
                }
                Ok(())
            }),
        },
        bool3_descriptor!("flaw_length_controlled", flaw.corruption.length_controlled),
        bool3_descriptor!("flaw_function_stack_protection", flaw.stack_protection.enabled),
        BitDescriptor {
            name: "os_kernel_null_deref_prevention",
            kind: FieldKind::Boolean,
            values: bool3_values(),
            set: |target, _store, value| {
                if let Some(flag) = parse_bool3("os_kernel_null_deref_prevention", value)? {
                    target.os.kernel_null_deref_prevention = flag;
                }
                Ok(())
            },
            get: |target| bool3(Some(target.os.kernel_null_deref_prevention)),
            verify: None,
        },
        BitDescriptor {
            name: "os_kernel_smep",
            kind: FieldKind::Boolean,
            values: bool3_values(),
            set: |target, _store, value| {
                if let Some(flag) = parse_bool3("os_kernel_smep", value)? {
                    target.os.kernel_smep = if flag { Policy::On } else { Policy::Off };
                }
                Ok(())
            },
            get: |target| match target.os.kernel_smep {
                Policy::On => "true".into(),
                Policy::Off => "false".into(),
                _ => "unset".into(),
            },
            verify: None,
        },
        BitDescriptor {
            name: "app_nx_enabled",
            kind: FieldKind::Boolean,
            values: bool3_values(),
            set: |target, _store, value| {
                if let Some(flag) = parse_bool3("app_nx_enabled", value)? {
                    target.application.nx = if flag { Policy::On } else { Policy::Off };
                }
                Ok(())
            },
            get: |target| match target.application.nx {
                Policy::On => "true".into(),
                Policy::Off => "false".into(),
                _ => "unset".into(),
            },
            verify: None,
        },
        bool3_descriptor!("app_nx_permanent", application.nx_permanent),
        bool3_descriptor!("app_sehop", application.sehop),
        BitDescriptor {
            name: "app_force_relocation",
            kind: FieldKind::Boolean,
            values: bool3_values(),
            set: |target, _store, value| {
                let flag = parse_bool3("app_force_relocation", value)?;
                if flag == Some(true) && !target.os.aslr_supported() {
                    return Err(EngineError::IncompatibleTarget(
                        "force relocation requires an ASLR-capable OS".into(),
                    ));
                }
                if flag.is_some() {
                    target.application.force_relocation = flag;
                }
                Ok(())
            },
            get: |target| bool3(target.application.force_relocation),
            verify: None,
        },
        BitDescriptor {
            name: "app_bottom_up_aslr",
            kind: FieldKind::Boolean,
            values: bool3_values(),
            set: |target, _store, value| {
                let flag = parse_bool3("app_bottom_up_aslr", value)?;
                if flag == Some(true) && !target.os.aslr.bottom_up.policy.supported() {
                    return Err(EngineError::IncompatibleTarget(
                        "bottom-up randomization is not supported by this OS".into(),
                    ));
                }
                if flag.is_some() {
                    target.application.bottom_up_aslr = flag;
                }
                Ok(())
            },
            get: |target| bool3(target.application.bottom_up_aslr),
            verify: None,
        },
        bool3_descriptor!("app_stack_protection", application.stack_protection.enabled),
        bool3_descriptor!("app_vtable_guard", application.vtable_guard.enabled),
        bool3_descriptor!(
            "attacker_can_discover_stack_address",
            capabilities.can_discover_stack_address
        ),
        bool3_descriptor!(
            "attacker_can_discover_heap_address",
            capabilities.can_discover_heap_address
        ),
        bool3_descriptor!(
            "attacker_can_discover_peb_address",
            capabilities.can_discover_peb_address
        ),
        bool3_descriptor!(
            "attacker_can_discover_image_address",
            capabilities.can_discover_image_address
        ),
        bool3_descriptor!(
            "attacker_can_discover_ntdll_address",
            capabilities.can_discover_ntdll_address
        ),
        bool3_descriptor!(
            "attacker_can_spray_data_bottom_up",
            capabilities.can_spray_data_bottom_up
        ),
        bool3_descriptor!(
            "attacker_can_spray_code_bottom_up",
            capabilities.can_spray_code_bottom_up
        ),
        bool3_descriptor!("attacker_can_massage_heap", capabilities.can_massage_heap),
        bool3_descriptor!(
            "attacker_can_load_non_aslr_image",
            capabilities.can_load_non_aslr_image
        ),
        bool3_descriptor!("attacker_can_map_null_page", capabilities.can_map_null_page),
        bool3_descriptor!(
            "attacker_can_discover_stack_protection_cookie",
            capabilities.can_discover_stack_protection_cookie
        ),
        bool3_descriptor!(
            "attacker_can_discover_vtguard_cookie",
            capabilities.can_discover_vtguard_cookie
        ),
    ]
}

/// The six default permutation fields (§ default scenario).
pub const DEFAULT_FIELDS: [&str; 6] = [
    "hw_base_profile",
    "os_base_profile",
    "app_base_profile",
    "flaw_base_profile",
    "flaw_local",
    "flaw_kernel",
];
