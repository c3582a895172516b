use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use log::info;

use kinetica::ScenarioLoader;

#[derive(Debug, Parser)]
#[command(author, version, about = "kinetica scenario runner")]
struct Cli {
    /// Path to the scenario YAML file
    #[arg(long, default_value = "scenarios/bouncing_balls.yaml")]
    scenario: PathBuf,

    /// Override tick count (uses scenario default when omitted)
    #[arg(long)]
    ticks: Option<u64>,

    /// Override the timestep in seconds
    #[arg(long)]
    dt: Option<f64>,

    /// Log a progress line every N ticks (0 disables)
    #[arg(long, default_value_t = 60)]
    report_every: u64,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let loader = ScenarioLoader::new(".");
    let scenario = loader.load(&cli.scenario)?;
    let ticks = scenario.ticks(cli.ticks);
    let dt = cli.dt.unwrap_or(scenario.dt_seconds);

    let mut engine = scenario.build_engine()?;
    info!(
        "running scenario '{}' for {} ticks at dt = {:.4}s",
        scenario.name, ticks, dt
    );

    for _ in 0..ticks {
        engine.update(dt)?;
        if cli.report_every > 0 && engine.tick() % cli.report_every == 0 {
            info!(
                "tick {:>6}: kinetic energy {:.3}",
                engine.tick(),
                engine.total_kinetic_energy()
            );
        }
    }

    println!(
        "Scenario '{}' completed for {} ticks. Particles: {}, kinetic energy: {:.3}",
        scenario.name,
        ticks,
        engine.world().entity_count(),
        engine.total_kinetic_energy()
    );
    Ok(())
}
