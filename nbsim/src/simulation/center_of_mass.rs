//! Pure queries over a set of particles: center of mass, and the conserved
//! (or watched) quantities used by logging and tests

use crate::error::{Result, SimError};
use crate::simulation::states::Particle;
use crate::simulation::vector::NVec3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CenterOfMass {
    pub position: NVec3, // sum(m_i r_i) / sum(m_i)
    pub total_mass: f64,
}

/// Mass-weighted centroid and total mass; `None` for an empty set
pub fn center_of_mass<'a, I>(particles: I) -> Option<CenterOfMass>
where
    I: IntoIterator<Item = &'a Particle>,
{
    let mut weighted = NVec3::zeros();
    let mut total_mass = 0.0;
    for p in particles {
        weighted += p.position() * p.mass();
        total_mass += p.mass();
    }

    if total_mass > 0.0 {
        Some(CenterOfMass {
            position: weighted / total_mass,
            total_mass,
        })
    } else {
        None
    }
}

pub fn total_momentum<'a, I>(particles: I) -> NVec3
where
    I: IntoIterator<Item = &'a Particle>,
{
    particles.into_iter().map(|p| p.momentum()).sum()
}

pub fn kinetic_energy<'a, I>(particles: I) -> f64
where
    I: IntoIterator<Item = &'a Particle>,
{
    particles
        .into_iter()
        .map(|p| 0.5 * p.momentum().norm_squared() / p.mass())
        .sum()
}

/// -sum over unordered pairs of G m_i m_j / r_ij. Fails on coincident bodies
/// like the force law does.
pub fn potential_energy<'a, I>(g: f64, particles: I) -> Result<f64>
where
    I: IntoIterator<Item = &'a Particle>,
{
    let bodies: Vec<&Particle> = particles.into_iter().collect();

    let mut u = 0.0;
    for (k, a) in bodies.iter().enumerate() {
        for b in &bodies[k + 1..] {
            let r = a.distance(b);
            if r == 0.0 {
                return Err(SimError::CoincidentParticles {
                    first: a.label().to_string(),
                    second: b.label().to_string(),
                });
            }
            u -= g * a.mass() * b.mass() / r;
        }
    }
    Ok(u)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn particle(label: &str, r: [f64; 3], v: [f64; 3], m: f64) -> Particle {
        Particle::new(label, NVec3::from(r), NVec3::from(v), m).unwrap()
    }

    #[test]
    fn weighted_centroid() {
        let ps = [
            particle("a", [0.0, 0.0, 0.0], [0.0; 3], 3.0),
            particle("b", [4.0, 0.0, 0.0], [0.0; 3], 1.0),
        ];
        let com = center_of_mass(&ps).unwrap();
        assert_relative_eq!(com.position, NVec3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(com.total_mass, 4.0);
    }

    #[test]
    fn empty_set_has_no_center() {
        let ps: [Particle; 0] = [];
        assert!(center_of_mass(&ps).is_none());
        assert_eq!(total_momentum(&ps), NVec3::zeros());
    }

    #[test]
    fn energies() {
        let ps = [
            particle("a", [0.0, 0.0, 0.0], [1.0, 0.0, 0.0], 2.0),
            particle("b", [2.0, 0.0, 0.0], [0.0, 0.0, 0.0], 3.0),
        ];
        assert_relative_eq!(kinetic_energy(&ps), 1.0);
        assert_relative_eq!(potential_energy(1.0, &ps).unwrap(), -3.0, epsilon = 1e-12);
    }

    #[test]
    fn potential_energy_of_coincident_pair_is_an_error() {
        let ps = [
            particle("a", [1.0, 2.0, 3.0], [0.0; 3], 1.0),
            particle("b", [4.0, 0.0, 0.0], [0.0; 3], 1.0),
            particle("c", [1.0, 2.0, 3.0], [0.0; 3], 1.0),
        ];
        let err = potential_energy(1.0, &ps).unwrap_err();
        assert!(matches!(err, SimError::CoincidentParticles { .. }));
    }

    #[test]
    fn potential_energy_closed_form_for_three_bodies() {
        let ps = [
            particle("a", [0.0, 0.0, 0.0], [0.0; 3], 2.0),
            particle("b", [3.0, 0.0, 0.0], [0.0; 3], 1.0),
            particle("c", [0.0, 4.0, 0.0], [0.0; 3], 5.0),
        ];
        // pairs: ab r=3, ac r=4, bc r=5
        let expected = -(2.0 * 1.0 / 3.0 + 2.0 * 5.0 / 4.0 + 1.0 * 5.0 / 5.0) * 0.5;
        assert_relative_eq!(potential_energy(0.5, &ps).unwrap(), expected, max_relative = 1e-15);
    }
}
