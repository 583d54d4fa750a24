//! Pure compatibility predicates.
//!
//! Incompatible tuples are dropped by the permutator, not errored: these
//! predicates only decide, they never mutate. Width rules: a 64-bit OS
//! cannot run on 32-bit hardware, and a 64-bit application cannot run on a
//! 32-bit OS.

use crate::error::EngineError;
use crate::profiles::application::AppProfile;
use crate::profiles::flaw::FlawProfile;
use crate::profiles::hardware::HardwareProfile;
use crate::profiles::os::OsProfile;
use crate::profiles::types::ArchFamily;
use crate::target::Target;

/// Whether the OS release runs on the hardware.
pub fn os_on_hardware(os: &OsProfile, hw: &HardwareProfile) -> bool {
    if os.width.is_64() && !hw.width.is_64() {
        return false;
    }
    os.families.contains(&hw.family)
}

/// Whether the application runs on the (hardware, OS) pair.
pub fn app_on_platform(app: &AppProfile, os: &OsProfile, hw: &HardwareProfile) -> bool {
    if app.width.is_64() && !os.width.is_64() {
        return false;
    }
    if hw.family == ArchFamily::Arm && !app.arm {
        return false;
    }
    match app.min_os {
        Some(min) => os.family.at_least(min),
        None => true,
    }
}

/// Whether the flaw can exist in the application on this platform.
pub fn flaw_in_app(flaw: &FlawProfile, app: &AppProfile) -> bool {
    // Kernel flaws only exist in kernel-mode components and vice versa.
    flaw.kernel.unwrap_or(false) == app.kernel
}

/// Checks the whole tuple; `Err` carries the first predicate that failed.
pub fn check(target: &Target) -> Result<(), EngineError> {
    if !os_on_hardware(&target.os, &target.hardware) {
        return Err(EngineError::IncompatibleTarget(format!(
            "os {} cannot run on hardware {}",
            target.os.name, target.hardware.name
        )));
    }
    if !app_on_platform(&target.application, &target.os, &target.hardware) {
        return Err(EngineError::IncompatibleTarget(format!(
            "application {} cannot run on {}/{}",
            target.application.name, target.os.name, target.hardware.name
        )));
    }
    if !flaw_in_app(&target.flaw, &target.application) {
        return Err(EngineError::IncompatibleTarget(format!(
            "flaw {} cannot exist in application {}",
            target.flaw.name, target.application.name
        )));
    }
    Ok(())
}
