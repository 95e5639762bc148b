//! Core state types for the N-body simulation.
//!
//! - `Particle`      a body's kinematic and mass state
//! - `ParticleState` the read-only row handed to observers after each step
//!
//! Momentum is the integrated quantity; velocity is always derived from it, so
//! `p == v * m` holds after every completed step.

use std::fmt;

use crate::error::{Result, SimError};
use crate::simulation::vector::NVec3;

#[derive(Debug, Clone)]
pub struct Particle {
    label: String,  // unique name, also the equality key
    r: NVec3,       // position
    v: NVec3,       // velocity (derived from p)
    p: NVec3,       // momentum
    m: f64,         // mass, always > 0
    r_next: NVec3,  // write-ahead position, only meaningful mid-step
}

impl Particle {
    /// Build a particle from its label, position, velocity and mass.
    ///
    /// Rejects a non-positive or non-finite mass, a label that could not be
    /// written to a state file, and non-finite position/velocity components.
    pub fn new(label: impl Into<String>, r: NVec3, v: NVec3, m: f64) -> Result<Self> {
        let label = label.into();
        if label.trim().is_empty() || label.trim() != label || label.contains([',', '\n', '\r']) {
            return Err(SimError::InvalidLabel(label));
        }
        if !(m > 0.0 && m.is_finite()) {
            return Err(SimError::InvalidMass { label, mass: m });
        }
        if !r.iter().chain(v.iter()).all(|c| c.is_finite()) {
            return Err(SimError::InvalidParameter(format!(
                "particle `{label}` has a non-finite position or velocity"
            )));
        }

        Ok(Self {
            label,
            r,
            v,
            p: v * m,
            m,
            r_next: r,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn position(&self) -> NVec3 {
        self.r
    }

    pub fn velocity(&self) -> NVec3 {
        self.v
    }

    pub fn momentum(&self) -> NVec3 {
        self.p
    }

    pub fn mass(&self) -> f64 {
        self.m
    }

    /// Euclidean distance between the two positions
    pub fn distance(&self, other: &Particle) -> f64 {
        (self.r - other.r).norm()
    }

    pub fn state(&self) -> ParticleState {
        ParticleState {
            label: self.label.clone(),
            position: self.r,
            velocity: self.v,
            mass: self.m,
        }
    }

    // p += dp, then v = p / m
    pub(crate) fn apply_impulse(&mut self, dp: NVec3) {
        self.p += dp;
        self.v = self.p / self.m;
    }

    pub(crate) fn stage_position(&mut self, r_next: NVec3) {
        self.r_next = r_next;
    }

    pub(crate) fn commit_position(&mut self) {
        self.r = self.r_next;
    }

    /// Take over the combined mass and momentum of an inelastic merger.
    /// Position is left where it is.
    pub(crate) fn absorb(&mut self, mass: f64, momentum: NVec3) {
        self.m = mass;
        self.p = momentum;
        self.v = momentum / mass;
    }
}

impl PartialEq for Particle {
    fn eq(&self, other: &Self) -> bool {
        self.label == other.label
    }
}

impl Eq for Particle {}

impl fmt::Display for Particle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: pos = ({:.2}, {:.2}, {:.2}), vel = ({:.2}, {:.2}, {:.2})",
            self.label, self.r.x, self.r.y, self.r.z, self.v.x, self.v.y, self.v.z
        )
    }
}

/// One row of the snapshot passed to observers
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleState {
    pub label: String,
    pub position: NVec3,
    pub velocity: NVec3,
    pub mass: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn momentum_starts_consistent_with_velocity() {
        let p = Particle::new("a", NVec3::zeros(), NVec3::new(1.0, -2.0, 0.5), 4.0).unwrap();
        assert_eq!(p.momentum(), NVec3::new(4.0, -8.0, 2.0));
    }

    #[test]
    fn rejects_non_positive_mass() {
        for m in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let err = Particle::new("a", NVec3::zeros(), NVec3::zeros(), m).unwrap_err();
            assert!(matches!(err, SimError::InvalidMass { .. }), "mass {m}: {err}");
        }
    }

    #[test]
    fn rejects_unwritable_labels() {
        for label in ["", "  ", "a,b", "a\nb", " a", "b\t"] {
            let err = Particle::new(label, NVec3::zeros(), NVec3::zeros(), 1.0).unwrap_err();
            assert!(matches!(err, SimError::InvalidLabel(_)));
        }
    }

    #[test]
    fn impulse_updates_velocity_from_momentum() {
        let mut p = Particle::new("a", NVec3::zeros(), NVec3::zeros(), 2.0).unwrap();
        p.apply_impulse(NVec3::new(4.0, 0.0, 0.0));
        assert_relative_eq!(p.velocity(), NVec3::new(2.0, 0.0, 0.0));
        assert_relative_eq!(p.momentum(), p.velocity() * p.mass());
    }

    #[test]
    fn staged_position_is_invisible_until_commit() {
        let mut p = Particle::new("a", NVec3::zeros(), NVec3::zeros(), 1.0).unwrap();
        p.stage_position(NVec3::new(1.0, 1.0, 1.0));
        assert_eq!(p.position(), NVec3::zeros());
        p.commit_position();
        assert_eq!(p.position(), NVec3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn equality_is_by_label() {
        let a = Particle::new("x", NVec3::zeros(), NVec3::zeros(), 1.0).unwrap();
        let b = Particle::new("x", NVec3::new(5.0, 0.0, 0.0), NVec3::zeros(), 3.0).unwrap();
        let c = Particle::new("y", NVec3::zeros(), NVec3::zeros(), 1.0).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
