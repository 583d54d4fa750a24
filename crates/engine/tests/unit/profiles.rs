//! Store contents and cloning getters.

use expsim_core::profiles::store::ProfileStore;
use expsim_core::profiles::types::{AddressWidth, ArchFamily, Policy};

#[test]
fn builtin_store_has_every_dimension() {
    let store = ProfileStore::builtin();
    assert!(!store.hardware_names().is_empty());
    assert!(!store.os_names().is_empty());
    assert!(!store.application_names().is_empty());
    assert!(!store.flaw_names().is_empty());
    assert!(!store.capability_names().is_empty());
}

#[test]
fn names_are_sorted_lexicographically() {
    let store = ProfileStore::builtin();
    for names in [
        store.hardware_names(),
        store.os_names(),
        store.application_names(),
        store.flaw_names(),
        store.core_flaw_names(),
        store.capability_names(),
    ] {
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
    }
}

#[test]
fn core_flaws_exclude_second_order_variants() {
    let store = ProfileStore::builtin();
    let core = store.core_flaw_names();
    assert!(!core.contains(&"controlled_function_pointer_overwrite".to_owned()));
    // The derived variant still resolves through the full flaw getter.
    assert!(store.flaw("controlled_function_pointer_overwrite").is_ok());
    assert!(
        store
            .flaw_names()
            .contains(&"controlled_function_pointer_overwrite".to_owned())
    );
}

#[test]
fn getters_clone_instead_of_sharing() {
    let store = ProfileStore::builtin();
    let mut first = store.hardware("x64").unwrap();
    first.nx = Policy::Off;
    let second = store.hardware("x64").unwrap();
    assert_eq!(second.nx, Policy::On);
}

#[test]
fn unknown_names_error() {
    let store = ProfileStore::builtin();
    assert!(store.hardware("ia64").is_err());
    assert!(store.os("win95").is_err());
    assert!(store.application("calc").is_err());
    assert!(store.flaw("off_by_one").is_err());
    assert!(store.capability("psychic").is_err());
}

#[test]
fn catalog_widths_are_coherent() {
    let store = ProfileStore::builtin();
    assert_eq!(store.hardware("x64").unwrap().width, AddressWidth::Bits64);
    assert_eq!(store.hardware("x86_nx").unwrap().width, AddressWidth::Bits32);
    assert_eq!(store.hardware("arm").unwrap().family, ArchFamily::Arm);
    assert_eq!(
        store.os("win7_rtm_x64").unwrap().width,
        AddressWidth::Bits64
    );
    assert_eq!(
        store.application("ie8_x64").unwrap().width,
        AddressWidth::Bits64
    );
}

#[test]
fn absolute_write_enables_a_second_order_flaw() {
    let store = ProfileStore::builtin();
    let flaw = store.flaw("absolute_write").unwrap();
    assert_eq!(
        flaw.enables,
        vec!["controlled_function_pointer_overwrite".to_owned()]
    );
}
