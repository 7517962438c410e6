use assert_cmd::prelude::*;
use llbench_dataset::{Configuration, Dataset, Measurement};
use predicates::prelude::*;
use std::{error::Error, fs, process::Command};
use tempfile::tempdir;

fn scenario() -> Dataset {
    [
        ("global_lock", 1, 10.0),
        ("global_lock", 2, 30.0),
        ("lock_free", 1, 20.0),
        ("lock_free", 2, 80.0),
    ]
    .into_iter()
    .map(|(policy, threads, throughput)| {
        Measurement::new(Configuration::new("readonly", policy, threads), throughput)
    })
    .collect()
}

#[test]
fn renders_every_benchmark() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let dataset = dir.path().join("results.yaml");
    scenario().store(&dataset)?;

    Command::cargo_bin("llbench-analysis")?
        .arg(&dataset)
        .arg(dir.path().join("plot"))
        .assert()
        .success();

    let readonly = fs::read_to_string(dir.path().join("plot-readonly.svg"))?;
    assert_eq!(readonly.matches("<polyline").count(), 2);

    // no queue measurements, the chart is written anyway
    let queue = fs::read_to_string(dir.path().join("plot-queue.svg"))?;
    assert!(queue.contains(">queue</text>"));
    assert!(!queue.contains("<polyline"));

    Ok(())
}

#[test]
fn log_scale_flag() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let dataset = dir.path().join("results.yaml");
    scenario().store(&dataset)?;

    Command::cargo_bin("llbench-analysis")?
        .args(["--scale", "log"])
        .arg(&dataset)
        .arg(dir.path().join("plot"))
        .assert()
        .success();

    assert!(fs::read_to_string(dir.path().join("plot-readonly.svg"))?.contains("log10 throughput"));

    Ok(())
}

#[test]
fn malformed_dataset_renders_nothing() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let dataset = dir.path().join("results.yaml");
    fs::write(
        &dataset,
        "RESULTS = [({'bench': 'readonly', 'policy': 'lock_free', 'threads': 1}, 10.0)]\n",
    )?;

    Command::cargo_bin("llbench-analysis")?
        .arg(&dataset)
        .arg(dir.path().join("plot"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load dataset"));

    assert!(!dir.path().join("plot-readonly.svg").exists());
    assert!(!dir.path().join("plot-queue.svg").exists());

    Ok(())
}
