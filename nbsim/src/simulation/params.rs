//! Numerical and physical parameters for one simulation instance
//!
//! `Parameters` holds the values the physics core reads every step:
//! - gravitational constant `g`
//! - time step `dt`
//! - collision distance threshold `eps`
//!
//! Each `Simulation` owns its own copy, so independent instances never share
//! constants.

use std::f64::consts::PI;

use crate::error::{Result, SimError};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Parameters {
    pub g: f64,   // gravitational constant
    pub dt: f64,  // time step
    pub eps: f64, // merge distance threshold
}

impl Parameters {
    pub fn new(g: f64, dt: f64, eps: f64) -> Result<Self> {
        let params = Self { g, dt, eps };
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<()> {
        check_gravitational_constant(self.g)?;
        check_time_step(self.dt)?;
        if !(self.eps >= 0.0 && self.eps.is_finite()) {
            return Err(SimError::InvalidParameter(format!(
                "collision threshold must be finite and non-negative, got {}",
                self.eps
            )));
        }
        Ok(())
    }
}

impl Default for Parameters {
    /// UA / year / solar-mass units: G = 4π², one-month step, 5 UA merge radius
    fn default() -> Self {
        Self {
            g: 4.0 * PI * PI,
            dt: 1.0 / 12.0,
            eps: 5.0,
        }
    }
}

pub(crate) fn check_gravitational_constant(g: f64) -> Result<()> {
    if !g.is_finite() {
        return Err(SimError::InvalidParameter(format!(
            "gravitational constant must be finite, got {g}"
        )));
    }
    Ok(())
}

pub(crate) fn check_time_step(dt: f64) -> Result<()> {
    if !(dt > 0.0 && dt.is_finite()) {
        return Err(SimError::InvalidParameter(format!(
            "time step must be positive and finite, got {dt}"
        )));
    }
    Ok(())
}
