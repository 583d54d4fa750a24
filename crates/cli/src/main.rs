//! Exploitation-strategy simulator CLI.
//!
//! This binary provides the standard drivers over the simulation engine:
//! 1. **Permutation run:** Walk a cartesian product of target fields and
//!    write per-point reports, a cumulative CSV, and summary tables.
//! 2. **Profile-log run:** Replay `PROFILE:` blocks, one scenario each.
//! 3. **Listing:** Print the profile names a scenario can reference.

use std::path::{Path, PathBuf};
use std::{fs, process};

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use expsim_core::error::EngineError;
use expsim_core::permute::{Permutator, RunSummary, Scenario};
use expsim_core::profiles::store::ProfileStore;
use expsim_core::report::{FileReporter, Reporter};
use expsim_core::sim::context::{Modes, Tracking};

#[derive(Parser, Debug)]
#[command(
    name = "expsim",
    version,
    about = "Probabilistic simulator for memory-safety exploitation strategies",
    long_about = "Walk every guard-satisfying path through the exploitation state \
machine for each configured target and report the strategy space.\n\nExamples:\n  \
expsim run\n  expsim run results os_base_profile=win7_rtm_x64 app_base_profile=ie8_x64\n  \
expsim run results --attack-favor flaw_base_profile=null_deref\n  \
expsim list flaw-core\n  expsim profile-log scenarios.log"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Resolve unspecified fields in the attacker's favour.
    #[arg(long, global = true)]
    attack_favor: bool,

    /// Resolve unspecified fields in the defender's favour.
    #[arg(long, global = true)]
    defense_favor: bool,

    /// Suppress techniques that are not publicly documented.
    #[arg(long, global = true)]
    public_only: bool,

    /// Record aborted branches with their abort reason.
    #[arg(long, global = true)]
    track_impossible: bool,

    /// Keep walking through zero-probability guards.
    #[arg(long, global = true)]
    allow_impossible: bool,

    /// Record every branch instead of one per equivalence class.
    #[arg(long, global = true)]
    all_simulations: bool,

    /// Discard branches with preparation steps no guard consulted.
    #[arg(long, global = true)]
    minimal_only: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a permutation; the first positional argument without `=` is the
    /// output directory (default `results`), the rest are `FIELD=V1,V2,…`.
    Run {
        /// Output directory and/or field specifications.
        #[arg(trailing_var_arg = true)]
        args: Vec<String>,

        /// JSON scenario file to run instead of the argument grammar.
        #[arg(long)]
        scenario_file: Option<PathBuf>,
    },

    /// List the profile names of one store dimension.
    List {
        /// Which dimension to list.
        #[arg(value_enum)]
        kind: ListKind,
    },

    /// Replay a `PROFILE:` log, one scenario per START/END block.
    ProfileLog {
        /// Path to the log file.
        file: PathBuf,

        /// Output directory.
        #[arg(default_value = "results")]
        output: PathBuf,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ListKind {
    /// Hardware profiles.
    Hw,
    /// Operating-system profiles.
    Os,
    /// Application profiles.
    App,
    /// Every flaw profile, derived variants included.
    Flaw,
    /// First-order flaw profiles only.
    FlawCore,
    /// Capability profiles.
    Cap,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let modes = Modes {
        attack_favor: cli.attack_favor,
        defense_favor: cli.defense_favor,
        public_only: cli.public_only,
    };
    let tracking = Tracking {
        impossible: cli.track_impossible,
        allow_impossible: cli.allow_impossible,
        equivalent_only: !cli.all_simulations,
        minimal_only: cli.minimal_only,
    };

    let store = ProfileStore::builtin();
    let outcome = match cli.command {
        Commands::Run {
            args,
            scenario_file,
        } => cmd_run(&store, modes, tracking, &args, scenario_file.as_deref()),
        Commands::List { kind } => cmd_list(&store, kind),
        Commands::ProfileLog { file, output } => {
            cmd_profile_log(&store, modes, tracking, &file, &output)
        }
    };

    match outcome {
        Ok(()) => {}
        Err(error) => {
            eprintln!("expsim: {error}");
            process::exit(1);
        }
    }
}

/// Splits run arguments into the output directory and field specs.
fn split_run_args(args: &[String]) -> (PathBuf, &[String]) {
    match args.first() {
        Some(first) if !first.contains('=') => (PathBuf::from(first), &args[1..]),
        _ => (PathBuf::from("results"), args),
    }
}

fn cmd_run(
    store: &ProfileStore,
    modes: Modes,
    tracking: Tracking,
    args: &[String],
    scenario_file: Option<&Path>,
) -> Result<(), EngineError> {
    let (output, field_args) = split_run_args(args);
    let permutator = Permutator::new(store, modes, tracking);

    let scenarios = if let Some(path) = scenario_file {
        let text = fs::read_to_string(path)?;
        serde_json::from_str::<Vec<Scenario>>(&text)
            .map_err(|e| EngineError::InvalidScenario(e.to_string()))?
    } else if field_args.is_empty() {
        vec![permutator.default_scenario()]
    } else {
        vec![Scenario::from_args("scenario", field_args, permutator.registry())?]
    };

    run_scenarios(&permutator, &scenarios, &output)
}

fn cmd_profile_log(
    store: &ProfileStore,
    modes: Modes,
    tracking: Tracking,
    file: &Path,
    output: &Path,
) -> Result<(), EngineError> {
    let permutator = Permutator::new(store, modes, tracking);
    let text = fs::read_to_string(file)?;
    let scenarios = Scenario::parse_profile_log(&text, permutator.registry())?;
    run_scenarios(&permutator, &scenarios, output)
}

fn run_scenarios(
    permutator: &Permutator<'_>,
    scenarios: &[Scenario],
    output: &Path,
) -> Result<(), EngineError> {
    let descriptor_names: Vec<&'static str> =
        permutator.registry().iter().map(|d| d.name).collect();
    let mut reporter = FileReporter::create(output, permutator.machine(), &descriptor_names)?;

    let mut total = RunSummary::default();
    for scenario in scenarios {
        let summary = permutator.run(scenario, &mut reporter)?;
        println!(
            "{}: {} points ({} skipped), {} simulations, {} classes",
            scenario.name, summary.points, summary.skipped, summary.simulations, summary.classes
        );
        total.points += summary.points;
        total.skipped += summary.skipped;
        total.simulations += summary.simulations;
        total.classes += summary.classes;
    }
    reporter.finish()?;

    if total.points == 0 {
        return Err(EngineError::InvalidScenario(
            "no valid permutations".into(),
        ));
    }
    println!(
        "total: {} points ({} skipped), {} simulations, {} classes -> {}",
        total.points,
        total.skipped,
        total.simulations,
        total.classes,
        output.display()
    );
    Ok(())
}

fn cmd_list(store: &ProfileStore, kind: ListKind) -> Result<(), EngineError> {
    let names = match kind {
        ListKind::Hw => store.hardware_names(),
        ListKind::Os => store.os_names(),
        ListKind::App => store.application_names(),
        ListKind::Flaw => store.flaw_names(),
        ListKind::FlawCore => store.core_flaw_names(),
        ListKind::Cap => store.capability_names(),
    };
    for name in names {
        println!("{name}");
    }
    Ok(())
}
