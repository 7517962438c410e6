use clap::Parser;
use llbench_runner::{
    config::SweepConfig,
    database::ConnectionAdapters,
    executors::Executors,
    grid,
    sweep::Sweep,
    RunnerError,
};
use std::{path::PathBuf, process::exit};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Sweep the benchmark executable over a set of grids and write the measured throughputs
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// YAML sweep config, the built-in grids are used if omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override executor.exec
    #[arg(long)]
    exec: Option<PathBuf>,

    /// Override executor.runtime (seconds per run)
    #[arg(long)]
    runtime: Option<u64>,

    /// Print the configurations that would run without spawning anything
    #[arg(long)]
    dry_run: bool,

    /// Dataset file to write
    output: PathBuf,
}

fn run(cli: Cli) -> Result<(), RunnerError> {
    let mut config = match cli.config.as_deref() {
        Some(path) => SweepConfig::load(path)?,
        None => SweepConfig::default(),
    };

    if let Some(exec) = cli.exec {
        config.executor.exec = exec;
    }
    if let Some(runtime) = cli.runtime {
        config.executor.runtime = runtime;
    }

    config.preflight_checks(!cli.dry_run)?;

    if cli.dry_run {
        for configuration in grid::expand_all(&config.grids) {
            println!("{configuration}");
        }
        info!(
            "{} configurations, {} s total runtime",
            grid::total_len(&config.grids),
            grid::total_len(&config.grids) as u64 * config.executor.runtime
        );

        return Ok(());
    }

    let mut executor = Executors::load(&config.executor);
    let mut connection = ConnectionAdapters::load(&config.store, cli.output);

    Sweep::new(&config.grids).run(&mut executor, &mut connection)?;
    connection.close()?;

    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(error) = run(Cli::parse()) {
        error!("{error}");
        exit(1);
    }
}
