pub mod simulation;
pub mod configuration;
pub mod persistence;
pub mod benchmark;
pub mod error;

pub use error::{Result, SimError};

pub use simulation::vector::{NVec3, VectorExt};
pub use simulation::states::{Particle, ParticleState};
pub use simulation::store::{ParticleId, ParticleStore};
pub use simulation::params::Parameters;
pub use simulation::engine::Engine;
pub use simulation::forces::{pair_force, BarnesHutGravity, DirectGravity, ForceModel, PointMass};
pub use simulation::collision::{MergeEvent, MergePolicy};
pub use simulation::center_of_mass::{center_of_mass, CenterOfMass};
pub use simulation::observer::{LogObserver, NoOpObserver, StepObserver};
pub use simulation::driver::{RunSummary, Simulation, StepOutcome, StopReason};
pub use simulation::scenario::{collapse_time, fixed_pair, random_particles, Scenario};

pub use configuration::config::{BodyConfig, EngineConfig, IntegratorConfig, ParametersConfig, RandomConfig, ScenarioConfig};

pub use persistence::state_file::{load_state, read_state, save_state, write_state};

pub use benchmark::benchmark::{bench_forces, ForceTiming};
