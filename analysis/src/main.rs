use clap::Parser;
use llbench_analysis::{render_all, PlotError, Scale};
use llbench_dataset::Dataset;
use std::{path::PathBuf, process::exit};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Render per-core throughput charts, one per benchmark, from a sweep dataset
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// y axis mode, applied to every chart
    #[arg(long, value_enum, default_value_t = Scale::Linear)]
    scale: Scale,

    /// Dataset written by llbench-runner
    dataset: PathBuf,

    /// Charts are written to <prefix>-<benchmark>.svg
    prefix: PathBuf,
}

fn run(cli: Cli) -> Result<(), PlotError> {
    let dataset = Dataset::load(&cli.dataset)?;
    info!("Loaded {} measurements", dataset.len());

    let written = render_all(&dataset, &cli.prefix, cli.scale)?;
    info!("Wrote {} charts", written.len());

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
