use clap::{Parser, ValueEnum};
use conveyor_sim::core::execution::{mean_efficiency, sweep_seeds};
use conveyor_sim::core::report::{indicator_states, render_prometheus, BatchReport};
use conveyor_sim::{
    run_sweep, ConcurrencyMode, DeliveryPolicy, EntryDistribution, Session, SessionConfig, SweepConfig,
};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Output {
    /// Human readable belt trace and totals
    Summary,
    /// Batch report as JSON
    Json,
    /// Prometheus text exposition of the final state
    Prometheus,
}

/// Drive a conveyor session from the command line
#[derive(Parser)]
struct Args {
    /// JSON file with a session configuration; flags below override it
    #[clap(long)]
    config: Option<PathBuf>,
    /// Number of steps to simulate
    #[clap(long, default_value_t = 100)]
    steps: usize,
    #[clap(long)]
    seed: Option<u64>,
    #[clap(long)]
    workers: Option<usize>,
    #[clap(long)]
    belt_length: Option<usize>,
    /// Use the two-draw entry rule instead of the uniform one
    #[clap(long)]
    chained: bool,
    /// Keep finished products until a delivery position frees up
    #[clap(long)]
    hold: bool,
    #[clap(long, value_enum, default_value_t = Output::Summary)]
    output: Output,
    /// Run this many seeded sessions instead of one and report the spread
    #[clap(long)]
    sweep: Option<u64>,
    /// Run sweep sessions on a rayon pool
    #[clap(long)]
    parallel: bool,
}

fn load_config(args: &Args) -> Result<SessionConfig, Box<dyn std::error::Error>> {
    let mut config: SessionConfig = match &args.config {
        Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
        None => SessionConfig::default(),
    };
    if let Some(seed) = args.seed {
        config = config.with_seed(Some(seed));
    }
    if let Some(workers) = args.workers {
        config = config.with_worker_count(workers);
    }
    if let Some(length) = args.belt_length {
        config = config.with_belt_length(length);
    }
    if args.chained {
        config = config.with_distribution(EntryDistribution::Chained);
    }
    if args.hold {
        config = config.with_delivery_policy(DeliveryPolicy::HoldUntilPlaced);
    }
    Ok(config)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .format_timestamp(None)
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;

    if let Some(count) = args.sweep {
        let base = config.seed.unwrap_or(0);
        let seeds = sweep_seeds(base, count)?;
        let mode = if args.parallel {
            ConcurrencyMode::Rayon
        } else {
            ConcurrencyMode::Sequential
        };
        let results = run_sweep(&config, &SweepConfig::new().with_concurrency(mode), &seeds, args.steps)?;

        for result in &results {
            println!(
                "seed {:>6}: C={:>4} A={:>4} B={:>4} dropped={:>3} efficiency={:.2}%",
                result.seed,
                result.snapshot.products_c,
                result.snapshot.unused_a,
                result.snapshot.unused_b,
                result.snapshot.dropped_products,
                result.snapshot.efficiency()
            );
        }
        println!("mean efficiency: {:.2}%", mean_efficiency(&results));
        return Ok(());
    }

    let mut session = Session::new(config)?;
    let initial = session.snapshot();
    let snapshots = session.step_batch(args.steps)?;
    let report = BatchReport::from_snapshots(&initial, &snapshots);

    match args.output {
        Output::Summary => {
            for snapshot in &report.last_steps {
                println!("step {:>5} [{}]", snapshot.step_index, snapshot.belt_line());
            }
            println!(
                "steps={} products={} unusedA={} unusedB={} dropped={} efficiency={:.2}%",
                report.steps_completed,
                report.products_c,
                report.unused_a,
                report.unused_b,
                report.dropped_products,
                report.efficiency
            );
            let lights: Vec<String> = indicator_states(&session.snapshot())
                .into_iter()
                .map(|light| format!("{}={}", light.name, if light.lit { "on" } else { "off" }))
                .collect();
            println!("indicators: {}", lights.join(" "));
        }
        Output::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        Output::Prometheus => print!("{}", render_prometheus(&session.snapshot())),
    }

    Ok(())
}
