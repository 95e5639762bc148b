//! Configuration types for loading simulation scenarios from YAML.
//!
//! This module defines a thin, `serde`-deserializable representation of a
//! simulation scenario. A scenario consists of:
//!
//! - [`EngineConfig`]     – integrator, force method, parallelism, merge policy
//! - [`ParametersConfig`] – physical constants, step size and run length
//! - [`BodyConfig`]       – initial state for each fixed body
//! - [`RandomConfig`]     – optional random cluster filling up to `count` bodies
//! - [`ScenarioConfig`]   – top-level wrapper used to load a scenario from YAML
//!
//! # YAML format
//!
//! ```yaml
//! engine:
//!   integrator: "euler"        # or "verlet"
//!   barnes_hut: false
//!   theta: 0.5
//!   parallel: false
//!   merge_policy: "first_pair" # or "exhaustive"
//!
//! parameters:
//!   G: 39.478                  # 4 pi^2: UA, years, solar masses
//!   dt: 0.083333               # one month
//!   eps: 5.0                   # merge distance threshold (UA)
//!   t_end: 20.0                # optional, defaults to the collapse time
//!
//! bodies:
//!   - label: "sun"
//!     x: [0.0, 0.0, 0.0]
//!     v: [0.0, 0.0, 0.0]
//!     m: 1.0
//!
//! random:
//!   count: 5                   # total bodies, including the fixed ones
//!   seed: 42
//! ```
//!
//! `state_file: "path.txt"` may replace `bodies`/`random` to start from a
//! saved state. The engine maps this configuration into a runtime
//! [`Scenario`](crate::simulation::scenario::Scenario).

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Result, SimError};
use crate::simulation::collision::MergePolicy;

/// Which integrator the engine uses
/// `integrator: "euler"` or `integrator: "verlet"`
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IntegratorConfig {
    #[default]
    #[serde(rename = "euler")] // Semi-implicit (symplectic) Euler, one force evaluation per step
    Euler,

    #[serde(rename = "verlet")] // Kick-drift-kick velocity Verlet, two force evaluations per step
    Verlet,
}

/// High-level engine configuration. Every field is optional.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    pub integrator: IntegratorConfig, // time integrator
    pub barnes_hut: bool,             // `true` - octree approximation, `false` - direct n^2 summation
    pub theta: f64,                   // opening angle for barnes-hut
    pub parallel: bool,               // evaluate per-body forces on the rayon pool
    pub merge_policy: MergePolicy,    // one merge per step, or all pairs in range
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            integrator: IntegratorConfig::Euler,
            barnes_hut: false,
            theta: 0.5,
            parallel: false,
            merge_policy: MergePolicy::FirstPair,
        }
    }
}

/// Global numerical and physical parameters for a scenario
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ParametersConfig {
    #[serde(rename = "G")]
    pub g: f64,             // gravitational constant
    pub dt: f64,            // time step size
    pub eps: f64,           // merge distance threshold
    pub t_end: Option<f64>, // run length; collapse time of the cluster when absent
}

/// Configuration for a single body's initial state
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct BodyConfig {
    pub label: Option<String>, // defaults to p_<n>, n counting from 1
    pub x: [f64; 3],           // initial position
    pub v: [f64; 3],           // initial velocity
    pub m: f64,                // mass
}

/// Random cluster: uniform positions in [-radius, radius]^3, velocities in
/// [-speed, speed]^3, masses in [max_mass / 4, max_mass]
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct RandomConfig {
    pub count: usize,
    #[serde(default)]
    pub seed: u64,
    #[serde(default = "default_radius")]
    pub radius: f64,
    #[serde(default = "default_speed")]
    pub speed: f64,
    #[serde(default = "default_max_mass")]
    pub max_mass: f64,
}

fn default_radius() -> f64 {
    250.0
}

fn default_speed() -> f64 {
    1.5
}

fn default_max_mass() -> f64 {
    1.4
}

/// Top-level scenario configuration loaded from YAML.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ScenarioConfig {
    #[serde(default)]
    pub engine: EngineConfig,
    pub parameters: ParametersConfig,
    #[serde(default)]
    pub bodies: Vec<BodyConfig>,
    pub random: Option<RandomConfig>,
    pub state_file: Option<PathBuf>,
}

impl ScenarioConfig {
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let cfg: ScenarioConfig = serde_yaml::from_reader(reader)?;
        cfg.check_sources()?;
        Ok(cfg)
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let cfg: ScenarioConfig = serde_yaml::from_str(yaml)?;
        cfg.check_sources()?;
        Ok(cfg)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let mut cfg = Self::from_reader(BufReader::new(file))?;

        // state files are relative to the scenario that names them
        if let (Some(state), Some(dir)) = (cfg.state_file.as_mut(), path.parent()) {
            if state.is_relative() {
                *state = dir.join(&*state);
            }
        }
        Ok(cfg)
    }

    // A saved state replaces every other body source
    fn check_sources(&self) -> Result<()> {
        if self.state_file.is_some() && (!self.bodies.is_empty() || self.random.is_some()) {
            return Err(SimError::InvalidParameter(
                "state_file cannot be combined with bodies or random".to_string(),
            ));
        }
        Ok(())
    }
}
