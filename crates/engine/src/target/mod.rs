//! The mutable target aggregate.
//!
//! A [`Target`] is one coherent (hardware, OS, application, flaw,
//! capabilities) tuple under analysis. Components are cloned out of the
//! [`ProfileStore`] on assignment; after any mutation,
//! [`Target::recalibrate`] must be called to re-derive dependent fields and
//! re-check compatibility.

/// Pure compatibility predicates over profile pairs and triples.
pub mod compat;
/// The staged recalibration pipeline.
pub mod recalibrate;

use crate::error::EngineError;
use crate::machine::fact::Fact;
use crate::profiles::application::AppProfile;
use crate::profiles::capabilities::CapabilityProfile;
use crate::profiles::flaw::FlawProfile;
use crate::profiles::hardware::HardwareProfile;
use crate::profiles::os::OsProfile;
use crate::profiles::store::ProfileStore;

/// Default component names used when a scenario leaves a field unset.
mod defaults {
    /// Default hardware profile.
    pub const HARDWARE: &str = "x64";
    /// Default operating-system profile.
    pub const OS: &str = "win7_rtm_x64";
    /// Default application profile.
    pub const APPLICATION: &str = "ie8_x64";
    /// Default flaw profile.
    pub const FLAW: &str = "relative_stack_corruption_forward_adjacent";
    /// Default capability profile.
    pub const CAPABILITIES: &str = "baseline";
}

/// One coherent (hw, os, app, flaw, capabilities) tuple.
#[derive(Debug, Clone, PartialEq)]
pub struct Target {
    /// Hardware component.
    pub hardware: HardwareProfile,
    /// Operating-system component.
    pub os: OsProfile,
    /// Application component.
    pub application: AppProfile,
    /// Flaw component.
    pub flaw: FlawProfile,
    /// Attacker capability component.
    pub capabilities: CapabilityProfile,
    /// Explicit initial assumptions, seeded into every simulation context
    /// built from this target. Explicit assumptions dominate implicit ones.
    pub seeded: Vec<(Fact, bool)>,
}

impl Target {
    /// Builds the default target from the store.
    pub fn from_defaults(store: &ProfileStore) -> Result<Self, EngineError> {
        Ok(Self {
            hardware: store.hardware(defaults::HARDWARE)?,
            os: store.os(defaults::OS)?,
            application: store.application(defaults::APPLICATION)?,
            flaw: store.flaw(defaults::FLAW)?,
            capabilities: store.capability(defaults::CAPABILITIES)?,
            seeded: Vec::new(),
        })
    }

    /// Clones the named hardware profile into this target.
    pub fn set_hw(&mut self, store: &ProfileStore, name: &str) -> Result<(), EngineError> {
        self.hardware = store.hardware(name)?;
        Ok(())
    }

    /// Clones the named OS profile into this target.
    pub fn set_os(&mut self, store: &ProfileStore, name: &str) -> Result<(), EngineError> {
        self.os = store.os(name)?;
        Ok(())
    }

    /// Clones the named application profile into this target.
    pub fn set_app(&mut self, store: &ProfileStore, name: &str) -> Result<(), EngineError> {
        self.application = store.application(name)?;
        Ok(())
    }

    /// Clones the named flaw profile into this target.
    pub fn set_flaw(&mut self, store: &ProfileStore, name: &str) -> Result<(), EngineError> {
        self.flaw = store.flaw(name)?;
        Ok(())
    }

    /// Clones the named capability profile into this target.
    pub fn set_capabilities(
        &mut self,
        store: &ProfileStore,
        name: &str,
    ) -> Result<(), EngineError> {
        self.capabilities = store.capability(name)?;
        Ok(())
    }

    /// Seeds an explicit true assumption.
    pub fn assume_true(&mut self, fact: Fact) {
        self.seeded.push((fact, true));
    }

    /// Seeds an explicit false assumption.
    pub fn assume_false(&mut self, fact: Fact) {
        self.seeded.push((fact, false));
    }

    /// Re-derives dependent fields and re-checks compatibility.
    ///
    /// Stages run in component order (hardware → OS → application → flaw →
    /// capabilities); each stage reads its inputs and writes its outputs
    /// exactly once, so a second call on an already-coherent target is a
    /// no-op. Fails with [`EngineError::IncompatibleTarget`] when the
    /// compatibility predicates reject the tuple.
    pub fn recalibrate(&mut self) -> Result<(), EngineError> {
        compat::check(self)?;
        recalibrate::run(self);
        Ok(())
    }

    /// Combined install-base weight of the tuple.
    pub fn population(&self) -> f64 {
        self.hardware.population * self.os.population * self.application.population
    }
}
