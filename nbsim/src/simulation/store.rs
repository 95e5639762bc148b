//! Stable-identity particle storage
//!
//! Particles live in slots addressed by a generation-checked `ParticleId`.
//! Removing a particle bumps its slot's generation, so an id taken before the
//! removal can never resolve to whatever is stored in the recycled slot later.
//! A separate ordered list of live slots keeps iteration deterministic: it is
//! compacted on removal, so the survivors keep their relative order.

use std::collections::HashMap;

use crate::error::{Result, SimError};
use crate::simulation::forces::PointMass;
use crate::simulation::states::Particle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParticleId {
    index: u32,
    generation: u32,
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    particle: Option<Particle>,
}

#[derive(Debug, Clone, Default)]
pub struct ParticleStore {
    slots: Vec<Slot>,
    free: Vec<u32>,                      // recyclable slot indices
    order: Vec<u32>,                     // live slots, insertion order
    labels: HashMap<String, ParticleId>, // label -> id, enforces uniqueness
}

impl ParticleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from an ordered list, failing on the first duplicate label
    pub fn from_particles<I>(particles: I) -> Result<Self>
    where
        I: IntoIterator<Item = Particle>,
    {
        let mut store = Self::new();
        for p in particles {
            store.insert(p)?;
        }
        Ok(store)
    }

    pub fn insert(&mut self, particle: Particle) -> Result<ParticleId> {
        if self.labels.contains_key(particle.label()) {
            return Err(SimError::DuplicateLabel(particle.label().to_string()));
        }

        let label = particle.label().to_string();
        let id = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.particle = Some(particle);
                ParticleId { index, generation: slot.generation }
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot { generation: 0, particle: Some(particle) });
                ParticleId { index, generation: 0 }
            }
        };

        self.order.push(id.index);
        self.labels.insert(label, id);
        Ok(id)
    }

    pub fn remove(&mut self, id: ParticleId) -> Option<Particle> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        let particle = slot.particle.take()?;
        slot.generation = slot.generation.wrapping_add(1);

        self.free.push(id.index);
        self.order.retain(|&i| i != id.index);
        self.labels.remove(particle.label());
        Some(particle)
    }

    pub fn get(&self, id: ParticleId) -> Option<&Particle> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.particle.as_ref())
    }

    pub(crate) fn get_mut(&mut self, id: ParticleId) -> Option<&mut Particle> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.particle.as_mut())
    }

    pub fn id_of(&self, label: &str) -> Option<ParticleId> {
        self.labels.get(label).copied()
    }

    pub fn by_label(&self, label: &str) -> Option<&Particle> {
        self.id_of(label).and_then(|id| self.get(id))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Live ids in iteration order
    pub fn ids(&self) -> impl Iterator<Item = ParticleId> + '_ {
        self.order.iter().map(move |&index| ParticleId {
            index,
            generation: self.slots[index as usize].generation,
        })
    }

    /// Live particles in iteration order
    pub fn iter(&self) -> impl Iterator<Item = &Particle> + '_ {
        self.order
            .iter()
            .filter_map(move |&index| self.slots[index as usize].particle.as_ref())
    }

    // Slot order, not iteration order. Only for per-particle updates that do
    // not depend on position in the list.
    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Particle> + '_ {
        self.slots.iter_mut().filter_map(|slot| slot.particle.as_mut())
    }

    /// Read-only (label, position, mass) snapshot in iteration order, the only
    /// input the force models see
    pub fn point_masses(&self) -> Vec<PointMass<'_>> {
        self.iter()
            .map(|p| PointMass {
                label: p.label(),
                position: p.position(),
                mass: p.mass(),
            })
            .collect()
    }
}
