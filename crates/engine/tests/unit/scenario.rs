//! Scenario grammar and profile-log parsing.

use expsim_core::error::EngineError;
use expsim_core::permute::descriptor;
use expsim_core::permute::Scenario;
use expsim_core::profiles::store::ProfileStore;

fn registry() -> Vec<expsim_core::permute::BitDescriptor> {
    descriptor::registry(&ProfileStore::builtin())
}

#[test]
fn default_scenario_covers_the_six_default_fields() {
    let registry = registry();
    let scenario = Scenario::default_product(&registry);
    let names: Vec<&str> = scenario.fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "hw_base_profile",
            "os_base_profile",
            "app_base_profile",
            "flaw_base_profile",
            "flaw_local",
            "flaw_kernel",
        ]
    );
    // Field domains come straight from the registry.
    assert_eq!(
        scenario.fields[0].values,
        ProfileStore::builtin().hardware_names()
    );
    assert_eq!(
        scenario.fields[4].values,
        vec!["unset".to_owned(), "true".to_owned(), "false".to_owned()]
    );
}

#[test]
fn argument_grammar_parses_fields_and_value_lists() {
    let registry = registry();
    let scenario = Scenario::from_args(
        "run",
        &[
            "os_base_profile=win7_rtm,win7_rtm_x64".into(),
            "flaw_local=true".into(),
        ],
        &registry,
    )
    .unwrap();
    assert_eq!(scenario.fields.len(), 2);
    assert_eq!(
        scenario.fields[0].values,
        vec!["win7_rtm".to_owned(), "win7_rtm_x64".to_owned()]
    );
    assert_eq!(scenario.fields[1].values, vec!["true".to_owned()]);
}

#[test]
fn argument_grammar_rejects_malformed_input() {
    let registry = registry();
    assert!(Scenario::from_args("run", &["no_equals_sign".into()], &registry).is_err());
    assert!(Scenario::from_args("run", &["flaw_local=maybe".into()], &registry).is_err());
}

#[test]
fn profile_log_yields_one_scenario_per_block() {
    let registry = registry();
    let log = "\
PROFILE: START
PROFILE: os_base_profile=win7_rtm_x64
PROFILE: flaw_local=true
PROFILE: END

PROFILE: START
PROFILE: app_base_profile=office11
PROFILE: END
";
    let scenarios = Scenario::parse_profile_log(log, &registry).unwrap();
    assert_eq!(scenarios.len(), 2);
    assert_eq!(scenarios[0].name, "profile1");
    assert_eq!(scenarios[1].name, "profile2");
    assert_eq!(scenarios[0].fields.len(), 2);
    assert_eq!(scenarios[0].fields[1].values, vec!["true".to_owned()]);
    assert_eq!(scenarios[1].fields[0].values, vec!["office11".to_owned()]);
}

#[test]
fn profile_log_rejects_malformed_lines_with_positions() {
    let registry = registry();

    let missing_prefix = "PROFILE: START\noption=value\nPROFILE: END\n";
    assert!(matches!(
        Scenario::parse_profile_log(missing_prefix, &registry),
        Err(EngineError::InvalidProfileLine { line: 2, .. })
    ));

    let outside_block = "PROFILE: flaw_local=true\n";
    assert!(matches!(
        Scenario::parse_profile_log(outside_block, &registry),
        Err(EngineError::InvalidProfileLine { line: 1, .. })
    ));

    let stray_end = "PROFILE: END\n";
    assert!(matches!(
        Scenario::parse_profile_log(stray_end, &registry),
        Err(EngineError::InvalidProfileLine { line: 1, .. })
    ));

    let unterminated = "PROFILE: START\nPROFILE: flaw_local=true\n";
    assert!(matches!(
        Scenario::parse_profile_log(unterminated, &registry),
        Err(EngineError::InvalidProfileLine { line: 1, .. })
    ));

    let unknown_option = "PROFILE: START\nPROFILE: warp_drive=true\nPROFILE: END\n";
    assert!(matches!(
        Scenario::parse_profile_log(unknown_option, &registry),
        Err(EngineError::InvalidProfileLine { line: 2, .. })
    ));

    let bad_value = "PROFILE: START\nPROFILE: flaw_local=sideways\nPROFILE: END\n";
    assert!(matches!(
        Scenario::parse_profile_log(bad_value, &registry),
        Err(EngineError::InvalidProfileLine { line: 2, .. })
    ));
}

#[test]
fn scenarios_deserialize_from_json() {
    let json = r#"[
        {
            "name": "spot_check",
            "fields": [
                { "name": "os_base_profile", "values": ["win7_rtm_x64"] },
                { "name": "flaw_local", "values": ["unset", "true"] }
            ]
        }
    ]"#;
    let scenarios: Vec<Scenario> = serde_json::from_str(json).unwrap();
    assert_eq!(scenarios.len(), 1);
    assert_eq!(scenarios[0].name, "spot_check");
    assert_eq!(scenarios[0].fields[1].values.len(), 2);
}
