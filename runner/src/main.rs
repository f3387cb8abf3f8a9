mod cli;
mod config;
mod render;
mod workload;

use anyhow::{Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{info, warn};

use scheduler::{cfs, FixedQuantum, QuantumSource, RunOutcome, TickReport, UniformQuantum};

use crate::cli::{Cli, OutputFormat};
use crate::config::RunnerConfig;
use crate::render::render;

fn print_report(report: &TickReport, format: OutputFormat) {
    match format {
        OutputFormat::Text => {
            let done = if report.finished { "  (finished)" } else { "" };
            println!(
                "tick {:>4}: ran {} for {:.2} ms. New vruntime: {:.2}, remaining: {:.2}{done}",
                report.tick, report.task, report.quantum, report.vruntime, report.remaining
            );
        }
        OutputFormat::Json => match serde_json::to_string(report) {
            Ok(line) => println!("{line}"),
            Err(err) => warn!(%err, tick = report.tick, "failed to encode tick report"),
        },
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = Cli::parse();

    let mut config =
        RunnerConfig::load(args.config.as_deref()).context("failed to load configuration")?;
    args.apply(&mut config);
    config.validate().context("invalid configuration")?;

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let quantum: Box<dyn QuantumSource> = match config.fixed_quantum {
        Some(quantum) => Box::new(FixedQuantum::new(quantum)?),
        None => Box::new(UniformQuantum::seeded(
            config.quantum_min,
            config.quantum_max,
            rng.gen(),
        )?),
    };

    let mut scheduler = cfs(quantum, config.scheduler.clone())?;
    for spec in workload::generate(&config, &mut rng) {
        scheduler.spawn(spec.nice, spec.work)?;
    }

    info!(tasks = config.tasks, seed = ?config.seed, "workload generated");

    let show_tree = args.show_tree && args.format == OutputFormat::Text;
    if show_tree {
        println!("\nInitial Task Tree:");
        print!("{}", render(scheduler.ready()));
        println!("\n--- Starting Scheduling Simulation ---\n");
    }

    let summary = scheduler.run_with(|report, tree| {
        print_report(report, args.format);
        if show_tree {
            println!("\nCurrent Task Tree:");
            print!("{}", render(tree));
            println!();
        }
    });

    match args.format {
        OutputFormat::Text => {
            let ended = match summary.outcome {
                RunOutcome::Completed => "all tasks completed",
                RunOutcome::TickLimitReached => "tick limit reached",
            };
            println!(
                "--- Simulation Ended: {ended} after {} ticks, {:.2} ms granted, {} tasks finished ---",
                summary.ticks,
                summary.total_granted,
                summary.finished.len()
            );
        }
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string(&summary).context("failed to encode run summary")?
            );
        }
    }

    Ok(())
}
