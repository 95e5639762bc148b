//! Build ready-to-run simulations from configuration
//!
//! Takes a `ScenarioConfig` (YAML-facing) and produces a `Scenario`: a
//! `Simulation` with its bodies at t = 0 plus the duration to run it for.
//! Bodies come from one of:
//! - a saved state file
//! - fixed bodies listed in the scenario, then an optional random fill
//!
//! Units are UA, years and solar masses, so `G = 4π²`.

use std::f64::consts::PI;

use log::{info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::configuration::config::{BodyConfig, EngineConfig, RandomConfig, ScenarioConfig};
use crate::error::{Result, SimError};
use crate::persistence::state_file::load_state;
use crate::simulation::driver::Simulation;
use crate::simulation::engine::Engine;
use crate::simulation::params::Parameters;
use crate::simulation::states::Particle;
use crate::simulation::vector::NVec3;

/// Cluster radius (UA) used for the collapse time when nothing else gives one
pub const DEFAULT_RADIUS: f64 = 250.0;

/// A fully-initialized simulation and how long to run it
pub struct Scenario {
    pub simulation: Simulation,
    pub duration: f64,
}

impl Scenario {
    pub fn build_scenario(cfg: ScenarioConfig) -> Result<Self> {
        let particles = match &cfg.state_file {
            Some(path) => load_state(path)?,
            None => initial_particles(&cfg.bodies, cfg.random.as_ref())?,
        };

        let p_cfg = &cfg.parameters;
        let parameters = Parameters::new(p_cfg.g, p_cfg.dt, p_cfg.eps)?;

        let duration = match p_cfg.t_end {
            Some(t_end) => t_end,
            None => {
                let radius = cfg.random.as_ref().map_or(DEFAULT_RADIUS, |r| r.radius);
                let total_mass: f64 = particles.iter().map(Particle::mass).sum();
                if total_mass > 0.0 {
                    collapse_time(radius, total_mass)
                } else {
                    0.0
                }
            }
        };

        let simulation = Simulation::new(particles, parameters, cfg.engine.into())?;
        info!("scenario ready: {} bodies, duration {:.3}", simulation.len(), duration);

        Ok(Self {
            simulation,
            duration,
        })
    }
}

impl From<EngineConfig> for Engine {
    fn from(e_cfg: EngineConfig) -> Self {
        Self {
            integrator: e_cfg.integrator,
            barnes_hut: e_cfg.barnes_hut,
            theta: e_cfg.theta,
            parallel: e_cfg.parallel,
            merge_policy: e_cfg.merge_policy,
        }
    }
}

// Fixed bodies first, then the random fill continues their p_<n> numbering
fn initial_particles(bodies: &[BodyConfig], random: Option<&RandomConfig>) -> Result<Vec<Particle>> {
    let mut particles = bodies
        .iter()
        .enumerate()
        .map(|(k, bc)| {
            let label = bc.label.clone().unwrap_or_else(|| label_for(k));
            Particle::new(label, NVec3::from(bc.x), NVec3::from(bc.v), bc.m)
        })
        .collect::<Result<Vec<_>>>()?;

    if let Some(r_cfg) = random {
        if r_cfg.count < particles.len() {
            warn!(
                "random count {} is below the {} fixed bodies, nothing to fill",
                r_cfg.count,
                particles.len()
            );
        }
        let mut rng = StdRng::seed_from_u64(r_cfg.seed);
        let fill = random_particles(
            &mut rng,
            r_cfg.count.saturating_sub(particles.len()),
            particles.len(),
            r_cfg.radius,
            r_cfg.speed,
            r_cfg.max_mass,
        )?;
        particles.extend(fill);
    }
    Ok(particles)
}

fn label_for(index: usize) -> String {
    format!("p_{}", index + 1)
}

/// `count` bodies labelled from `p_<first + 1>` on. Positions are uniform in
/// `[-radius, radius]^3`, velocities in `[-speed, speed]^3`, masses in
/// `[max_mass / 4, max_mass]`.
pub fn random_particles<R: Rng>(
    rng: &mut R,
    count: usize,
    first: usize,
    radius: f64,
    speed: f64,
    max_mass: f64,
) -> Result<Vec<Particle>> {
    for (name, value) in [("radius", radius), ("speed", speed)] {
        if !(value >= 0.0 && value.is_finite()) {
            return Err(SimError::InvalidParameter(format!(
                "random {name} must be finite and non-negative, got {value}"
            )));
        }
    }
    if !(max_mass > 0.0 && max_mass.is_finite()) {
        return Err(SimError::InvalidParameter(format!(
            "random max_mass must be positive, got {max_mass}"
        )));
    }

    (0..count)
        .map(|k| {
            let r = uniform_in_cube(rng, radius);
            let v = uniform_in_cube(rng, speed);
            let m = rng.gen_range(max_mass / 4.0..=max_mass);
            Particle::new(label_for(first + k), r, v, m)
        })
        .collect()
}

fn uniform_in_cube<R: Rng>(rng: &mut R, half: f64) -> NVec3 {
    NVec3::new(
        rng.gen_range(-half..=half),
        rng.gen_range(-half..=half),
        rng.gen_range(-half..=half),
    )
}

/// Two bodies on opposite sides of the origin, moving in opposite directions:
/// `p_1` with mass `5 * mass` at `(0, -radius/2, 0)`, `p_2` with `mass` at
/// `(0, radius/2, 0)`
pub fn fixed_pair(radius: f64, mass: f64) -> Result<Vec<Particle>> {
    Ok(vec![
        Particle::new(
            label_for(0),
            NVec3::new(0.0, -radius / 2.0, 0.0),
            NVec3::new(0.5, 0.0, 0.0),
            5.0 * mass,
        )?,
        Particle::new(
            label_for(1),
            NVec3::new(0.0, radius / 2.0, 0.0),
            NVec3::new(-1.2, 0.0, 0.0),
            mass,
        )?,
    ])
}

/// Free-fall collapse time of a uniform sphere of radius `radius` and mass
/// `total_mass`, with `G = 4π²`
pub fn collapse_time(radius: f64, total_mass: f64) -> f64 {
    (3.0 / 32.0 * PI * (4.0 / 3.0 * PI * PI * radius.powi(3)) / total_mass).sqrt()
}
