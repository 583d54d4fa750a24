//! Profile records describing one dimension of the environment each.
//!
//! A profile is a named, immutable record. Five kinds exist:
//! 1. **Hardware:** Address width, architecture family, NX/SMEP support.
//! 2. **Operating system:** Per-region NX and ASLR policy maps, kernel
//!    mitigations, heap and stack-protection defaults.
//! 3. **Application:** Mitigation opt-ins, heap frontend, guard defaults.
//! 4. **Flaw:** Root cause, corruption attributes, capability assertions.
//! 5. **Capabilities:** Attacker discoverability and preparation abilities.
//!
//! All profiles live in the [`store::ProfileStore`], are cloned on
//! read-for-mutation, and are never mutated in place.

/// Application profile record.
pub mod application;
/// Attacker capability profile record.
pub mod capabilities;
/// Flaw profile record and corruption attributes.
pub mod flaw;
/// Hardware profile record.
pub mod hardware;
/// Operating-system profile record.
pub mod os;
/// The name-keyed profile store and built-in catalog.
pub mod store;
/// Enums shared across profile kinds.
pub mod types;

pub use application::AppProfile;
pub use capabilities::CapabilityProfile;
pub use flaw::FlawProfile;
pub use hardware::HardwareProfile;
pub use os::OsProfile;
pub use store::ProfileStore;
