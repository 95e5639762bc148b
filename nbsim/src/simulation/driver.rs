//! Simulation driver
//!
//! `Simulation` owns the particles, the parameters and the engine settings of
//! one independent run. A step is: integrate (forces from one snapshot, then
//! commit), resolve collisions, advance `t`, notify the observer. `G`, `dt` and
//! the pause flag can be changed between steps; `&mut self` rules out changes
//! in the middle of one.

use log::{debug, info, warn};

use crate::error::{Result, SimError};
use crate::simulation::center_of_mass::{center_of_mass, total_momentum, CenterOfMass};
use crate::simulation::collision::{resolve_collisions, MergeEvent};
use crate::simulation::engine::Engine;
use crate::simulation::forces::ForceModel;
use crate::simulation::integrator::integrate;
use crate::simulation::observer::StepObserver;
use crate::simulation::params::{check_gravitational_constant, check_time_step, Parameters};
use crate::simulation::states::{Particle, ParticleState};
use crate::simulation::store::ParticleStore;
use crate::simulation::vector::NVec3;

#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    /// The pause flag was set; nothing changed and nobody was notified
    Paused,
    Advanced { merges: Vec<MergeEvent> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    DurationReached,
    TooFewBodies, // fewer than two bodies left, nothing to attract
    Paused,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub steps: usize,
    pub merges: usize,
    pub time: f64,
    pub stop: StopReason,
}

pub struct Simulation {
    particles: ParticleStore,
    params: Parameters,
    engine: Engine,
    forces: Box<dyn ForceModel>,
    t: f64,
    paused: bool,
}

impl Simulation {
    pub fn new(particles: Vec<Particle>, params: Parameters, engine: Engine) -> Result<Self> {
        params.validate()?;
        engine.validate()?;
        let particles = ParticleStore::from_particles(particles)?;
        let forces = engine.force_model();

        info!(
            "simulation: {} bodies, G = {}, dt = {}, eps = {}, {:?} integrator, {}",
            particles.len(),
            params.g,
            params.dt,
            params.eps,
            engine.integrator,
            if engine.barnes_hut { "barnes-hut forces" } else { "direct forces" },
        );

        Ok(Self {
            particles,
            params,
            engine,
            forces,
            t: 0.0,
            paused: false,
        })
    }

    /// Elapsed simulated time
    pub fn time(&self) -> f64 {
        self.t
    }

    /// Live particle count
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn parameters(&self) -> &Parameters {
        &self.params
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn store(&self) -> &ParticleStore {
        &self.particles
    }

    pub fn particles(&self) -> impl Iterator<Item = &Particle> + '_ {
        self.particles.iter()
    }

    pub fn particle(&self, label: &str) -> Option<&Particle> {
        self.particles.by_label(label)
    }

    /// (label, position, velocity, mass) for every live particle, in store order
    pub fn snapshot(&self) -> Vec<ParticleState> {
        self.particles.iter().map(Particle::state).collect()
    }

    pub fn center_of_mass(&self) -> Option<CenterOfMass> {
        center_of_mass(self.particles.iter())
    }

    pub fn total_momentum(&self) -> NVec3 {
        total_momentum(self.particles.iter())
    }

    // ------------------------------------------------------------------
    // Controls, applied between steps
    // ------------------------------------------------------------------

    pub fn set_gravitational_constant(&mut self, g: f64) -> Result<()> {
        check_gravitational_constant(g)?;
        self.params.g = g;
        Ok(())
    }

    pub fn set_time_step(&mut self, dt: f64) -> Result<()> {
        check_time_step(dt)?;
        self.params.dt = dt;
        Ok(())
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    // ------------------------------------------------------------------
    // Stepping
    // ------------------------------------------------------------------

    /// One full step. On error nothing has been mutated and `t` is unchanged.
    pub fn step<O>(&mut self, observer: &mut O) -> Result<StepOutcome>
    where
        O: StepObserver + ?Sized,
    {
        if self.paused {
            return Ok(StepOutcome::Paused);
        }

        integrate(
            self.engine.integrator,
            &mut self.particles,
            &*self.forces,
            &self.params,
        )?;
        let merges = resolve_collisions(&mut self.particles, self.params.eps, self.engine.merge_policy);
        self.t += self.params.dt;

        for event in &merges {
            observer.on_merge(event);
        }
        let snapshot = self.snapshot();
        observer.on_step(self.t, &snapshot);

        debug!("t = {:.4}, {} bodies", self.t, self.particles.len());
        Ok(StepOutcome::Advanced { merges })
    }

    /// Step until `duration` more time has elapsed, fewer than two bodies are
    /// left, or the simulation is found paused at the start of a step
    pub fn run<O>(&mut self, duration: f64, observer: &mut O) -> Result<RunSummary>
    where
        O: StepObserver + ?Sized,
    {
        if !(duration >= 0.0 && duration.is_finite()) {
            return Err(SimError::InvalidParameter(format!(
                "run duration must be finite and non-negative, got {duration}"
            )));
        }

        let end = self.t + duration;
        let mut steps = 0;
        let mut merges = 0;
        info!("run: t = {:.3} -> {:.3}, {} bodies", self.t, end, self.len());

        let stop = loop {
            if self.particles.len() < 2 {
                break StopReason::TooFewBodies;
            }
            if self.t >= end {
                break StopReason::DurationReached;
            }
            match self.step(observer)? {
                StepOutcome::Paused => {
                    warn!("run stopped at t = {:.3}: simulation is paused", self.t);
                    break StopReason::Paused;
                }
                StepOutcome::Advanced { merges: m } => {
                    steps += 1;
                    merges += m.len();
                }
            }
        };

        info!(
            "run finished ({:?}): {} steps, {} merges, {} bodies, t = {:.3}",
            stop,
            steps,
            merges,
            self.len(),
            self.t
        );
        Ok(RunSummary {
            steps,
            merges,
            time: self.t,
            stop,
        })
    }
}
