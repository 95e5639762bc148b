//! Fixed-step time integrators for the N-body system
//!
//! Both integrators are double-buffered: every force is evaluated from one
//! snapshot of positions and masses before any particle is written, and new
//! positions go to each particle's write-ahead buffer and are committed only
//! after all particles have been advanced. The result therefore does not
//! depend on particle order, and a force error leaves the store untouched.

use crate::configuration::config::IntegratorConfig;
use crate::error::Result;
use crate::simulation::forces::ForceModel;
use crate::simulation::params::Parameters;
use crate::simulation::store::{ParticleId, ParticleStore};
use crate::simulation::vector::NVec3;

/// Advance the store by one step with the integrator chosen in the engine settings
pub fn integrate(
    kind: IntegratorConfig,
    store: &mut ParticleStore,
    forces: &dyn ForceModel,
    params: &Parameters,
) -> Result<()> {
    match kind {
        IntegratorConfig::Euler => semi_implicit_euler(store, forces, params),
        IntegratorConfig::Verlet => velocity_verlet(store, forces, params),
    }
}

/// Advance the system by one step using semi-implicit (symplectic) Euler.
///
/// 1. f_i from the pre-step snapshot
/// 2. p_i += f_i * dt, v_i = p_i / m_i
/// 3. r_i' = r_i + v_i * dt into the write-ahead buffer
/// 4. commit r_i = r_i' for every particle
pub fn semi_implicit_euler(
    store: &mut ParticleStore,
    forces: &dyn ForceModel,
    params: &Parameters,
) -> Result<()> {
    if store.is_empty() {
        return Ok(());
    }
    let dt = params.dt;

    // Forces for the whole step, from one consistent snapshot. An error here
    // returns before anything below has touched the store.
    let ids: Vec<ParticleId> = store.ids().collect();
    let net = {
        let bodies = store.point_masses();
        forces.net_forces(params.g, &bodies)?
    };

    // Kick and stage. Neighbours' committed positions are still the old ones.
    for (id, f) in ids.iter().zip(net) {
        if let Some(p) = store.get_mut(*id) {
            p.apply_impulse(f * dt);
            let r_next = p.position() + p.velocity() * dt;
            p.stage_position(r_next);
        }
    }

    // Commit all staged positions together
    for p in store.iter_mut() {
        p.commit_position();
    }
    Ok(())
}

/// Advance the system by one step using kick-drift-kick velocity Verlet.
///
/// Uses two force evaluations per step. Both, and every new momentum and
/// position, are computed into local buffers first, so the step is written
/// all at once or not at all.
pub fn velocity_verlet(
    store: &mut ParticleStore,
    forces: &dyn ForceModel,
    params: &Parameters,
) -> Result<()> {
    if store.is_empty() {
        return Ok(());
    }
    let dt = params.dt;
    let half_dt = 0.5 * dt;

    let ids: Vec<ParticleId> = store.ids().collect();

    // a_n from x_n
    let (f_old, r_new) = {
        let bodies = store.point_masses();
        let f_old = forces.net_forces(params.g, &bodies)?;

        // Drift with the half-kicked velocity: x_n+1 = x_n + dt * (p_n + dt/2 f_n) / m
        let r_new: Vec<NVec3> = store
            .iter()
            .zip(&f_old)
            .map(|(p, f)| p.position() + (p.momentum() + f * half_dt) / p.mass() * dt)
            .collect();
        (f_old, r_new)
    };

    // a_n+1 from x_n+1, evaluated on a staged snapshot
    let f_new = {
        let mut bodies = store.point_masses();
        for (b, r) in bodies.iter_mut().zip(&r_new) {
            b.position = *r;
        }
        forces.net_forces(params.g, &bodies)?
    };

    for (k, id) in ids.iter().enumerate() {
        if let Some(p) = store.get_mut(*id) {
            p.apply_impulse((f_old[k] + f_new[k]) * half_dt);
            p.stage_position(r_new[k]);
        }
    }
    for p in store.iter_mut() {
        p.commit_position();
    }
    Ok(())
}
