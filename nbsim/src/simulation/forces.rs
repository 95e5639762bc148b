//! Gravitational force models for the n-body engine
//!
//! Defines the pairwise Newtonian force law, the `ForceModel` trait the
//! integrators call once per step, and two implementations: exact direct
//! summation and a Barnes–Hut approximation. Both read only a snapshot of
//! positions and masses, never the live particles.

use rayon::prelude::*;

use crate::error::{Result, SimError};
use crate::simulation::barnes_hut::Octree;
use crate::simulation::vector::{NVec3, VectorExt};

/// What a force model may see of a particle
#[derive(Debug, Clone, Copy)]
pub struct PointMass<'a> {
    pub label: &'a str,
    pub position: NVec3,
    pub mass: f64,
}

/// Force on `i` exerted by `j`:
///
/// `f_ij = G * m_i * m_j / |dr|^3 * dr`, with `dr = r_j - r_i`
///
/// Coincident positions are an error rather than an infinite force.
pub fn pair_force(g: f64, i: &PointMass<'_>, j: &PointMass<'_>) -> Result<NVec3> {
    // dr points from i to j, so i is pulled along +dr
    let dr = j.position - i.position;

    // |dr|^3 replaces normalize-then-divide-by-|dr|^2
    let d3 = dr.norm_cubed();
    if d3 == 0.0 {
        return Err(SimError::CoincidentParticles {
            first: i.label.to_string(),
            second: j.label.to_string(),
        });
    }

    let f = dr * (g * i.mass * j.mass / d3);
    if !f.iter().all(|c| c.is_finite()) {
        return Err(SimError::NonFiniteForce {
            first: i.label.to_string(),
            second: j.label.to_string(),
        });
    }
    Ok(f)
}

/// Net force on body `i`: exact sum of `pair_force` over every other body
pub fn net_force(g: f64, i: usize, bodies: &[PointMass<'_>]) -> Result<NVec3> {
    let mut f = NVec3::zeros();
    for (j, other) in bodies.iter().enumerate() {
        if j != i {
            f += pair_force(g, &bodies[i], other)?;
        }
    }
    Ok(f)
}

/// Source of the per-body net forces for one step
pub trait ForceModel: Send + Sync {
    /// Element `i` is the net force on `bodies[i]`. Any error aborts the whole
    /// evaluation; no partial result is returned.
    fn net_forces(&self, g: f64, bodies: &[PointMass<'_>]) -> Result<Vec<NVec3>>;
}

/// Exact O(n^2) pairwise summation, the reference model
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectGravity {
    pub parallel: bool,
}

impl ForceModel for DirectGravity {
    fn net_forces(&self, g: f64, bodies: &[PointMass<'_>]) -> Result<Vec<NVec3>> {
        per_body(bodies.len(), self.parallel, |i| net_force(g, i, bodies))
    }
}

/// Barnes–Hut octree approximation, O(n log n)
#[derive(Debug, Clone, Copy)]
pub struct BarnesHutGravity {
    pub theta: f64,
    pub parallel: bool,
}

impl ForceModel for BarnesHutGravity {
    fn net_forces(&self, g: f64, bodies: &[PointMass<'_>]) -> Result<Vec<NVec3>> {
        let tree = Octree::build(bodies);
        per_body(bodies.len(), self.parallel, |i| {
            tree.force_on(i, bodies, g, self.theta)
        })
    }
}

// Evaluate `f` for every body index, on the rayon pool when asked. Each call
// only reads the shared snapshot, and the collect is the barrier before any
// caller may write.
fn per_body<F>(n: usize, parallel: bool, f: F) -> Result<Vec<NVec3>>
where
    F: Fn(usize) -> Result<NVec3> + Sync + Send,
{
    if parallel {
        (0..n).into_par_iter().map(f).collect()
    } else {
        (0..n).map(f).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn body(label: &str, x: f64, m: f64) -> PointMass<'_> {
        PointMass { label, position: NVec3::new(x, 0.0, 0.0), mass: m }
    }

    #[test]
    fn pair_force_matches_closed_form() {
        let a = body("a", 0.0, 2.0);
        let b = body("b", 2.0, 3.0);
        let f = pair_force(1.5, &a, &b).unwrap();
        // G m1 m2 / d^2 = 1.5 * 6 / 4
        assert_relative_eq!(f, NVec3::new(2.25, 0.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn coincident_bodies_are_an_error() {
        let a = body("a", 1.0, 1.0);
        let b = body("b", 1.0, 1.0);
        let err = pair_force(1.0, &a, &b).unwrap_err();
        assert!(matches!(err, SimError::CoincidentParticles { .. }));
    }

    #[test]
    fn parallel_matches_serial() {
        let labels: Vec<String> = (0..40).map(|i| format!("b{i}")).collect();
        let bodies: Vec<PointMass<'_>> = labels
            .iter()
            .enumerate()
            .map(|(i, label)| {
                let t = i as f64;
                PointMass {
                    label: label.as_str(),
                    position: NVec3::new((t * 0.37).sin(), (t * 0.13).cos(), (t * 0.07).sin()) * 10.0,
                    mass: 1.0 + (t * 0.5).cos().abs(),
                }
            })
            .collect();

        let serial = DirectGravity { parallel: false }.net_forces(1.0, &bodies).unwrap();
        let parallel = DirectGravity { parallel: true }.net_forces(1.0, &bodies).unwrap();
        assert_eq!(serial, parallel);
    }
}
