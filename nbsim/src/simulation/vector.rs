//! 3D vector type used throughout the engine
//!
//! `NVec3` is nalgebra's `Vector3<f64>`, a plain `Copy` value: every arithmetic
//! operation (add, subtract, scale, compare) returns a new vector. `VectorExt`
//! adds the two operations the gravity law needs on top of nalgebra's
//! `norm_squared`/`norm`

use nalgebra::Vector3;

use crate::error::{Result, SimError};

pub type NVec3 = Vector3<f64>;

pub trait VectorExt {
    /// |v|^3, computed as |v|^2 * |v| so the force law can scale the raw
    /// separation vector instead of normalizing it first
    fn norm_cubed(&self) -> f64;

    /// Direction of `self`, or [`SimError::ZeroVector`] when the norm is exactly zero
    fn unit_vector(&self) -> Result<NVec3>;
}

impl VectorExt for NVec3 {
    fn norm_cubed(&self) -> f64 {
        let d2 = self.norm_squared();
        d2 * d2.sqrt()
    }

    fn unit_vector(&self) -> Result<NVec3> {
        let norm = self.norm();
        if norm == 0.0 {
            return Err(SimError::ZeroVector);
        }
        Ok(*self / norm)
    }
}
