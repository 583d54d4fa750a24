//! Output writer column discipline.

use std::fs;

use pretty_assertions::assert_eq;

use expsim_core::machine::transition::StateMachine;
use expsim_core::permute::{Permutator, Scenario};
use expsim_core::profiles::store::ProfileStore;
use expsim_core::report::{FileReporter, Reporter};
use expsim_core::sim::context::{Modes, Tracking};

fn run_into(dir: &std::path::Path, extra: &[&str]) -> expsim_core::permute::RunSummary {
    let store = ProfileStore::builtin();
    let permutator = Permutator::new(&store, Modes::default(), Tracking::default());
    let mut args: Vec<String> = vec![
        "hw_base_profile=x64".into(),
        "os_base_profile=win7_rtm_x64".into(),
        "app_base_profile=ie8_x64".into(),
        "flaw_base_profile=relative_stack_corruption_forward_adjacent".into(),
    ];
    args.extend(extra.iter().map(|&s| s.to_owned()));
    let scenario = Scenario::from_args("report", &args, permutator.registry()).unwrap();
    let names: Vec<&'static str> = permutator.registry().iter().map(|d| d.name).collect();
    let mut reporter = FileReporter::create(dir, permutator.machine(), &names).unwrap();
    let summary = permutator.run(&scenario, &mut reporter).unwrap();
    reporter.finish().unwrap();
    summary
}

#[test]
fn csv_header_is_fixed_columns_then_descriptors_then_one_hots() {
    let dir = tempfile::tempdir().unwrap();
    run_into(dir.path(), &[]);

    let csv = fs::read_to_string(dir.path().join("simulations.csv")).unwrap();
    let header: Vec<&str> = csv.lines().next().unwrap().split(',').collect();

    let store = ProfileStore::builtin();
    let permutator = Permutator::new(&store, Modes::default(), Tracking::default());
    let machine = StateMachine::exploitation();

    let mut expected: Vec<String> = [
        "simulation",
        "scenario",
        "fitness",
        "exploitability",
        "desirability",
        "likelihood",
        "homogeneity",
        "aborted",
        "aborted_predicate",
    ]
    .iter()
    .map(|&s| s.to_owned())
    .collect();
    expected.extend(permutator.registry().iter().map(|d| d.name.to_owned()));
    expected.extend(machine.state_names().iter().map(|n| format!("state_{n}")));
    expected.extend(machine.event_names().iter().map(|n| format!("event_{n}")));

    assert_eq!(header, expected.iter().map(String::as_str).collect::<Vec<_>>());
}

#[test]
fn csv_emits_one_row_per_simulation_record() {
    let dir = tempfile::tempdir().unwrap();
    let summary = run_into(dir.path(), &["flaw_local=unset,true"]);

    let csv = fs::read_to_string(dir.path().join("simulations.csv")).unwrap();
    let rows = csv.lines().count() - 1;
    assert_eq!(rows, summary.simulations);
    // Simulation ids are the running row counter.
    let first_column: Vec<&str> = csv
        .lines()
        .skip(1)
        .map(|l| l.split(',').next().unwrap())
        .collect();
    let expected: Vec<String> = (0..rows as u64).map(|n| n.to_string()).collect();
    assert_eq!(
        first_column,
        expected.iter().map(String::as_str).collect::<Vec<_>>()
    );
}

#[test]
fn point_text_reports_are_written_per_point() {
    let dir = tempfile::tempdir().unwrap();
    run_into(dir.path(), &[]);
    let text = fs::read_to_string(dir.path().join("report-0.txt")).unwrap();
    assert!(text.contains("scenario: report"));
    assert!(text.contains("hw_base_profile = x64"));
    assert!(text.contains("fitness"));
    assert!(text.contains("trace: target_defined"));
}

#[test]
fn metric_and_scenario_tables_are_written() {
    let dir = tempfile::tempdir().unwrap();
    run_into(dir.path(), &[]);
    for metric in [
        "fitness",
        "exploitability",
        "desirability",
        "likelihood",
        "homogeneity",
    ] {
        let table =
            fs::read_to_string(dir.path().join(format!("tab_metric_{metric}.csv"))).unwrap();
        assert!(table.starts_with("scenario,point,min,max,avg"));
        assert_eq!(table.lines().count(), 2);
    }
    let scenarios = fs::read_to_string(dir.path().join("tab_scenario.csv")).unwrap();
    assert!(scenarios.starts_with("scenario,points,simulations,aborted,classes"));
    assert!(scenarios.lines().nth(1).unwrap().starts_with("report,1,"));
}

#[test]
fn reruns_are_byte_identical() {
    let first = tempfile::tempdir().unwrap();
    let second = tempfile::tempdir().unwrap();
    run_into(first.path(), &["flaw_local=unset,true"]);
    run_into(second.path(), &["flaw_local=unset,true"]);

    for file in ["simulations.csv", "tab_metric_fitness.csv", "tab_scenario.csv", "report-0.txt"]
    {
        let a = fs::read_to_string(first.path().join(file)).unwrap();
        let b = fs::read_to_string(second.path().join(file)).unwrap();
        assert_eq!(a, b, "{file} differs between identical runs");
    }
}
