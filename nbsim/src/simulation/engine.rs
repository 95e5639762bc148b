//! High-level runtime engine settings
//!
//! Selects the integrator, the force method (direct or Barnes–Hut), whether
//! the force phase runs on the rayon pool, and the merge policy used when
//! building and running a `Simulation`

use crate::configuration::config::IntegratorConfig;
use crate::error::{Result, SimError};
use crate::simulation::collision::MergePolicy;
use crate::simulation::forces::{BarnesHutGravity, DirectGravity, ForceModel};

#[derive(Debug, Clone, PartialEq)]
pub struct Engine {
    pub integrator: IntegratorConfig, // euler or verlet
    pub barnes_hut: bool,             // false = direct, true = barnes-hut
    pub theta: f64,                   // opening angle, only read when barnes_hut
    pub parallel: bool,               // force phase on the rayon pool
    pub merge_policy: MergePolicy,    // one merge per step, or all of them
}

impl Default for Engine {
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

impl Engine {
    pub fn validate(&self) -> Result<()> {
        if self.barnes_hut && !(self.theta > 0.0 && self.theta.is_finite()) {
            return Err(SimError::InvalidParameter(format!(
                "barnes-hut theta must be positive, got {}",
                self.theta
            )));
        }
        Ok(())
    }

    /// Force model selected by these settings
    pub fn force_model(&self) -> Box<dyn ForceModel> {
        if self.barnes_hut {
            Box::new(BarnesHutGravity {
                theta: self.theta,
                parallel: self.parallel,
            })
        } else {
            Box::new(DirectGravity {
                parallel: self.parallel,
            })
        }
    }
}
