use std::time::Instant;

use log::info;

use crate::error::Result;
use crate::simulation::forces::{BarnesHutGravity, DirectGravity, ForceModel, PointMass};
use crate::simulation::params::Parameters;
use crate::simulation::states::Particle;
use crate::simulation::store::ParticleStore;
use crate::simulation::vector::NVec3;

/// Wall-clock seconds for one net-force evaluation of `n` bodies
#[derive(Debug, Clone, Copy)]
pub struct ForceTiming {
    pub n: usize,
    pub direct: f64,
    pub direct_parallel: f64,
    pub barnes_hut: f64,
}

pub fn bench_forces(sizes: &[usize]) -> Result<Vec<ForceTiming>> {
    let g = Parameters::default().g;
    let models: [Box<dyn ForceModel>; 3] = [
        Box::new(DirectGravity { parallel: false }),
        Box::new(DirectGravity { parallel: true }),
        Box::new(BarnesHutGravity {
            theta: 0.7,
            parallel: true,
        }),
    ];

    let mut timings = Vec::with_capacity(sizes.len());
    for &n in sizes {
        let store = make_cloud(n)?;
        let bodies = store.point_masses();

        let mut secs = [0.0; 3];
        for (model, s) in models.iter().zip(secs.iter_mut()) {
            *s = time_forces(model.as_ref(), g, &bodies)?;
        }

        let timing = ForceTiming {
            n,
            direct: secs[0],
            direct_parallel: secs[1],
            barnes_hut: secs[2],
        };
        info!(
            "N = {:5}, direct = {:8.6} s, direct (par) = {:8.6} s, BH = {:8.6} s",
            n, timing.direct, timing.direct_parallel, timing.barnes_hut
        );
        timings.push(timing);
    }
    Ok(timings)
}

// warm-up call, then one timed call
fn time_forces(model: &dyn ForceModel, g: f64, bodies: &[PointMass<'_>]) -> Result<f64> {
    model.net_forces(g, bodies)?;
    let t0 = Instant::now();
    model.net_forces(g, bodies)?;
    Ok(t0.elapsed().as_secs_f64())
}

/// Deterministic cloud of `n` unit masses, no rng needed
fn make_cloud(n: usize) -> Result<ParticleStore> {
    let particles = (0..n)
        .map(|i| {
            let i_f = i as f64;
            let r = NVec3::new(
                (i_f * 0.37).sin() * 250.0,
                (i_f * 0.13).cos() * 250.0,
                (i_f * 0.07).sin() * 250.0,
            );
            Particle::new(format!("b_{i}"), r, NVec3::zeros(), 1.0)
        })
        .collect::<Result<Vec<_>>>()?;
    ParticleStore::from_particles(particles)
}
