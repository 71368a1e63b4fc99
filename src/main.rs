//! Insurgency simulation runner
//!
//! Runs a scenario (built-in baseline or a TOML file) and prints a summary.
//! Optionally writes the full per-step trace as JSON, or runs a Monte Carlo
//! sweep over consecutive seeds.

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use insurgency_dynamics::conflict::{monte_carlo, seeds_from, simulate};
use insurgency_dynamics::core::{Result, ScenarioConfig};

/// Propaganda and attrition in a two-sided insurgency
#[derive(Parser, Debug)]
#[command(name = "insurgency-sim")]
#[command(about = "Simulate a government-insurgent struggle for a population's allegiance")]
struct Args {
    /// Scenario file (TOML); the built-in baseline is used when omitted
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// Override the number of steps
    #[arg(long)]
    steps: Option<u32>,

    /// Override the step size (months)
    #[arg(long)]
    dt: Option<f64>,

    /// Override the noise seed
    #[arg(long)]
    seed: Option<u64>,

    /// Write the full trace as JSON to this path
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,

    /// Run a Monte Carlo sweep of this many consecutive seeds
    #[arg(long)]
    runs: Option<usize>,

    /// Print the trace to stdout, one line per step
    #[arg(long, short = 'v')]
    verbose: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("insurgency_dynamics=info")),
        )
        .init();

    if let Err(e) = run(Args::parse()) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let mut config = match &args.scenario {
        Some(path) => {
            tracing::info!("Loading scenario from {}", path.display());
            ScenarioConfig::load_from_toml(path)?
        }
        None => ScenarioConfig::default(),
    };

    if let Some(steps) = args.steps {
        config.run.steps = steps;
    }
    if let Some(dt) = args.dt {
        config.run.dt = dt;
    }
    if let Some(seed) = args.seed {
        config.run.seed = seed;
    }

    if let Some(runs) = args.runs {
        let seeds = seeds_from(config.run.seed, runs);
        let sweep = monte_carlo(&config, &seeds)?;
        println!("{}", sweep.summary());
        if let Some(path) = &args.output {
            std::fs::write(path, sweep.to_json()?)?;
            println!("Sweep written to {}", path.display());
        }
        return Ok(());
    }

    let output = simulate(&config)?;

    if args.verbose {
        println!(
            "{:>5} {:>7} {:>10} {:>10} {:>10} {:>6} {:>6} {:>8} {:>13} {:>8} {:>8}",
            "step", "time", "GC", "INS", "NC", "PI", "PG", "TI", "phase", "DG", "DI"
        );
        for r in &output.trace {
            println!(
                "{:>5} {:>7.1} {:>10.0} {:>10.0} {:>10.0} {:>6.2} {:>6.2} {:>8.0} {:>13} {:>8.2} {:>8.2}",
                r.step,
                r.time,
                r.government,
                r.insurgent,
                r.neutral,
                r.insurgent_effort,
                r.government_effort,
                r.insurgent_troops,
                r.phase,
                r.government_attrition,
                r.insurgent_attrition,
            );
        }
        println!();
    }

    println!("{}", output.summary());

    if let Some(path) = &args.output {
        output.write_json(path)?;
        println!("Trace written to {}", path.display());
    }

    Ok(())
}
