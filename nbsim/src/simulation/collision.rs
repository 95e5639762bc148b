//! Collision detection and perfectly inelastic merging
//!
//! Two particles closer than `eps` merge: the pair's mass and momentum are
//! summed into whichever of the two carries more momentum, and the other one
//! is removed from the store. Mass and momentum are conserved; kinetic energy
//! is not.
//!
//! By default at most one merge is resolved per step (the first close pair in
//! scan order). Other close pairs are picked up on later steps. The
//! `Exhaustive` policy instead keeps merging until no pair is within `eps`.

use std::cmp::Ordering;

use log::info;
use serde::Deserialize;

use crate::simulation::states::Particle;
use crate::simulation::store::{ParticleId, ParticleStore};
use crate::simulation::vector::NVec3;

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergePolicy {
    #[default]
    #[serde(rename = "first_pair")] // one merge per step, first close pair found
    FirstPair,

    #[serde(rename = "exhaustive")] // merge until no pair is closer than eps
    Exhaustive,
}

/// Record of one merge, handed to observers
#[derive(Debug, Clone, PartialEq)]
pub struct MergeEvent {
    pub survivor: String,
    pub absorbed: String,
    pub mass: f64,       // combined mass
    pub momentum: NVec3, // combined momentum
}

/// Merge tie-break: compares momentum magnitudes. Only used to pick the
/// survivor of a merge, not an ordering of particles in general.
pub fn by_momentum(a: &Particle, b: &Particle) -> Ordering {
    a.momentum().norm().total_cmp(&b.momentum().norm())
}

/// First unordered pair, in store order (0,1), (0,2) .. (1,2) .., whose
/// separation is strictly less than `eps`
pub fn find_first_collision(store: &ParticleStore, eps: f64) -> Option<(ParticleId, ParticleId)> {
    let live: Vec<(ParticleId, &Particle)> = store.ids().zip(store.iter()).collect();
    for (k, (id_a, a)) in live.iter().enumerate() {
        for (id_b, b) in &live[k + 1..] {
            if a.distance(b) < eps {
                return Some((*id_a, *id_b));
            }
        }
    }
    None
}

/// Merge `a` and `b`. The one with the larger momentum magnitude survives
/// (`a` on an exact tie) and keeps its label and position.
pub fn merge_pair(store: &mut ParticleStore, a: ParticleId, b: ParticleId) -> Option<MergeEvent> {
    let (pa, pb) = (store.get(a)?, store.get(b)?);
    if a == b {
        return None;
    }

    let mass = pa.mass() + pb.mass();
    let momentum = pa.momentum() + pb.momentum();
    let (survivor, absorbed) = match by_momentum(pa, pb) {
        Ordering::Less => (b, a),
        _ => (a, b),
    };

    let removed = store.remove(absorbed)?;
    let kept = store.get_mut(survivor)?;
    kept.absorb(mass, momentum);

    Some(MergeEvent {
        survivor: kept.label().to_string(),
        absorbed: removed.label().to_string(),
        mass,
        momentum,
    })
}

/// Run the collision check for one step under `policy`
pub fn resolve_collisions(store: &mut ParticleStore, eps: f64, policy: MergePolicy) -> Vec<MergeEvent> {
    let mut events = Vec::new();
    while let Some((a, b)) = find_first_collision(store, eps) {
        let Some(event) = merge_pair(store, a, b) else {
            break;
        };
        info!(
            "merge: {} absorbed {} (mass {:.4}, {} bodies left)",
            event.survivor,
            event.absorbed,
            event.mass,
            store.len()
        );
        events.push(event);

        if policy == MergePolicy::FirstPair {
            break;
        }
    }
    events
}
