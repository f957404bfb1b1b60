use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use log::info;
use std::fs;

use conference_core::{load_schedule, save_schedule, CliArgs, Config, SimulationReport, Simulator};

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let args = CliArgs::parse();
    let config = Config::from_args(&args).context("Failed to load configuration")?;
    let sim_config = config.simulation_config()?;

    info!("Starting conference championship simulation");

    let schedule = load_schedule(&args.schedule, config.games_per_team)
        .with_context(|| format!("Failed to load schedule from {}", args.schedule.display()))?;
    info!("Teams: {}", schedule.team_names().join(", "));

    if let Some(path) = &args.export_schedule {
        save_schedule(&schedule, path)
            .with_context(|| format!("Failed to write schedule to {}", path.display()))?;
        info!("Canonical schedule written to {}", path.display());
    }

    let simulator = Simulator::new(&schedule, sim_config.clone())?;
    let tally = simulator.run();
    let report = SimulationReport::new(&schedule, &sim_config, &tally);

    println!("{}", report);

    if let Some(path) = &args.json {
        let json = serde_json::to_string_pretty(&report)?;
        fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
        info!("Report written to {}", path.display());
    }

    Ok(())
}
