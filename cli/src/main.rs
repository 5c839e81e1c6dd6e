use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use clinic_core::{Analytics, ClinicConfig, CsvStore, ReplicationDriver, SimError, StageSummary};
use tracing_subscriber::EnvFilter;

/// Simulate patient flow through the clinic and write the result tables.
#[derive(Parser, Debug)]
#[command(name = "clinic-sim", version, about)]
struct Args {
    /// Scenario file
    #[arg(short, long, default_value = "simulation.toml")]
    config: PathBuf,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), SimError> {
    let config = ClinicConfig::load(&args.config)?;
    let output = &config.output;
    let csv = CsvStore::create(&output.dir, &output.patients_file, &output.queues_file)?;
    let analytics = Analytics::new(config.simulation.warm_up)?;

    let mut stores = (csv, analytics);
    let summary = ReplicationDriver::new(&config).run(&mut stores)?;
    let (_, analytics) = stores;

    println!(
        "{} replications, {} patients, {} queue samples",
        summary.replications, summary.patients, summary.samples
    );
    print_report(&analytics.report());
    println!(
        "Tables are in {} and {}",
        output.dir.join(&output.patients_file).display(),
        output.dir.join(&output.queues_file).display()
    );
    Ok(())
}

fn print_report(report: &[StageSummary]) {
    println!(
        "{:>14} {:>8} {:>10} {:>10} {:>10}",
        "service", "served", "mean wait", "p95 wait", "mean q"
    );
    for s in report {
        println!(
            "{:>14} {:>8} {:>10.2} {:>10.2} {:>10.2}",
            s.stage, s.served, s.mean_wait, s.p95_wait, s.mean_queue_length
        );
    }
}
