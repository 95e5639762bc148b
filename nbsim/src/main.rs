use nbsim::{bench_forces, save_state, LogObserver, Scenario, ScenarioConfig};

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use log::info;

use std::path::PathBuf;

#[derive(Parser, Debug)]
struct Args {
    /// Scenario file, looked up as given and then under `scenarios/`
    #[arg(short, long, default_value = "default.yaml")]
    file_name: PathBuf,

    /// Start from a saved state instead of the scenario's bodies
    #[arg(long)]
    state: Option<PathBuf>,

    /// Write the final state here
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Simulated time to run for, overrides the scenario
    #[arg(long)]
    duration: Option<f64>,

    /// Progress line every N steps
    #[arg(long, default_value_t = 12)]
    log_every: usize,

    /// Time the force models instead of running a scenario
    #[arg(long)]
    bench: bool,
}

// load here to keep main clean
fn load_scenario(args: &Args) -> Result<ScenarioConfig> {
    let config_path = if args.file_name.exists() {
        args.file_name.clone()
    } else {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("scenarios")
            .join(&args.file_name)
    };

    let mut cfg = ScenarioConfig::from_path(&config_path)
        .with_context(|| format!("failed to load scenario {}", config_path.display()))?;

    if let Some(state) = &args.state {
        cfg.state_file = Some(state.clone());
        cfg.bodies.clear();
        cfg.random = None;
    }
    if let Some(duration) = args.duration {
        cfg.parameters.t_end = Some(duration);
    }
    Ok(cfg)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    if args.bench {
        bench_forces(&[200, 400, 800, 1600, 3200]).context("benchmark failed")?;
        return Ok(());
    }

    let cfg = load_scenario(&args)?;
    let Scenario {
        mut simulation,
        duration,
    } = Scenario::build_scenario(cfg).context("failed to build scenario")?;

    let mut observer = LogObserver::new(args.log_every);
    let summary = simulation
        .run(duration, &mut observer)
        .context("simulation step failed")?;

    info!(
        "done: {:?} after {} steps, {} merges, t = {:.3}",
        summary.stop, summary.steps, summary.merges, summary.time
    );
    if let Some(com) = simulation.center_of_mass() {
        info!(
            "center of mass = ({:.3}, {:.3}, {:.3}), total mass = {:.4}",
            com.position.x, com.position.y, com.position.z, com.total_mass
        );
    }
    for p in simulation.particles() {
        info!("{p}");
    }

    if let Some(path) = &args.output {
        save_state(path, simulation.particles())
            .with_context(|| format!("failed to save state to {}", path.display()))?;
    }

    Ok(())
}
