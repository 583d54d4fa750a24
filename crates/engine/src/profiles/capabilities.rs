//! Attacker capability profile record.

use crate::profiles::types::Region;

/// What the attacker can discover or arrange in the target environment.
///
/// Tri-state fields: `Some(true)` / `Some(false)` are explicit, `None` is
/// resolved by simulation mode.
#[derive(Debug, Clone, PartialEq)]
pub struct CapabilityProfile {
    /// Symbolic name, unique within the store.
    pub name: String,
    /// Can learn a stack address (e.g. through an information leak).
    pub can_discover_stack_address: Option<bool>,
    /// Can learn a heap address.
    pub can_discover_heap_address: Option<bool>,
    /// Can learn the PEB address.
    pub can_discover_peb_address: Option<bool>,
    /// Can learn the application image base.
    pub can_discover_image_address: Option<bool>,
    /// Can learn the `ntdll` image base.
    pub can_discover_ntdll_address: Option<bool>,
    /// Can fill bottom-up address space with controlled data.
    pub can_spray_data_bottom_up: Option<bool>,
    /// Can fill bottom-up address space with controlled payload code.
    pub can_spray_code_bottom_up: Option<bool>,
    /// Can groom heap layout (allocation/free sequencing).
    pub can_massage_heap: Option<bool>,
    /// Can cause the process to load a non-ASLR image.
    pub can_load_non_aslr_image: Option<bool>,
    /// Can map the null page in the attacked address space.
    pub can_map_null_page: Option<bool>,
    /// Can learn the stack-protection cookie value.
    pub can_discover_stack_protection_cookie: Option<bool>,
    /// Can learn the vtable-guard cookie value.
    pub can_discover_vtguard_cookie: Option<bool>,
}

impl CapabilityProfile {
    /// The discovery capability for an address region, if one exists.
    ///
    /// Alias regions (`Data`, `Code`) have no direct discovery capability;
    /// they resolve through their constituent regions.
    pub fn discovery(&self, region: Region) -> Option<bool> {
        match region {
            Region::Stack => self.can_discover_stack_address,
            Region::Heap => self.can_discover_heap_address,
            Region::Peb => self.can_discover_peb_address,
            Region::Image => self.can_discover_image_address,
            Region::Ntdll => self.can_discover_ntdll_address,
            Region::Data | Region::Code => None,
        }
    }
}
