//! # Barnes–Hut Octree (3D)
//!
//! Optional approximation of the net gravitational force. Space is split
//! recursively into octants; a cell far enough from a body is replaced by one
//! pseudo-body at its center of mass.
//!
//! - Each cell stores the total mass and mass-weighted position sum of its
//!   subtree, accumulated while bodies are inserted.
//! - Leaves hold their bodies directly. A leaf holds one body, except at
//!   `MAX_DEPTH`, where bodies that cannot be separated (coincident or nearly
//!   so) share a bucket instead of subdividing forever.
//! - Body/body interactions at the leaves go through `pair_force`, so the
//!   zero-separation guard applies exactly as in direct summation.
//!
//! The tree is built from the same read-only snapshot direct summation uses
//! and is thrown away after one force evaluation.

use crate::error::Result;
use crate::simulation::forces::{pair_force, PointMass};
use crate::simulation::vector::NVec3;

const MAX_DEPTH: usize = 48;

#[derive(Debug, Clone)]
struct Cell {
    center: NVec3,
    half: f64,                     // half the edge length of this cube
    mass: f64,                     // total mass of the subtree
    weighted: NVec3,               // sum of m * r over the subtree
    children: [Option<usize>; 8],  // indices into Octree::cells
    members: Vec<usize>,           // bodies held directly, leaves only
    split: bool,
}

impl Cell {
    fn new(center: NVec3, half: f64) -> Self {
        Self {
            center,
            half,
            mass: 0.0,
            weighted: NVec3::zeros(),
            children: [None; 8],
            members: Vec::new(),
            split: false,
        }
    }

    // bit 0: +x, bit 1: +y, bit 2: +z
    fn octant(&self, p: &NVec3) -> usize {
        let mut idx = 0;
        if p.x >= self.center.x { idx |= 1; }
        if p.y >= self.center.y { idx |= 2; }
        if p.z >= self.center.z { idx |= 4; }
        idx
    }

    fn child_bounds(&self, octant: usize) -> (NVec3, f64) {
        let q = 0.5 * self.half;
        let sign = |bit: usize| if octant & bit == 0 { -q } else { q };
        (self.center + NVec3::new(sign(1), sign(2), sign(4)), q)
    }

    fn contains(&self, p: &NVec3) -> bool {
        (*p - self.center).iter().all(|d| d.abs() <= self.half)
    }

    fn center_of_mass(&self) -> NVec3 {
        self.weighted / self.mass
    }
}

#[derive(Debug, Clone, Default)]
pub struct Octree {
    cells: Vec<Cell>, // cells[0] is the root when non-empty
}

impl Octree {
    pub fn build(bodies: &[PointMass<'_>]) -> Self {
        let mut tree = Octree {
            cells: Vec::with_capacity(2 * bodies.len() + 1),
        };
        if bodies.is_empty() {
            return tree;
        }

        let (center, half) = bounding_cube(bodies);
        tree.cells.push(Cell::new(center, half));
        for i in 0..bodies.len() {
            tree.insert(0, i, bodies, 0);
        }
        tree
    }

    #[cfg(test)]
    fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Approximate net force on `bodies[i]` with opening angle `theta`
    pub fn force_on(&self, i: usize, bodies: &[PointMass<'_>], g: f64, theta: f64) -> Result<NVec3> {
        let mut f = NVec3::zeros();
        if !self.cells.is_empty() {
            self.walk(0, i, bodies, g, theta, &mut f)?;
        }
        Ok(f)
    }

    fn insert(&mut self, cell: usize, i: usize, bodies: &[PointMass<'_>], depth: usize) {
        let b = &bodies[i];
        let c = &mut self.cells[cell];
        c.mass += b.mass;
        c.weighted += b.position * b.mass;

        if !c.split {
            if c.members.is_empty() || depth >= MAX_DEPTH {
                c.members.push(i);
                return;
            }
            // occupied leaf: turn it into an internal cell and push its body down
            c.split = true;
            let existing = std::mem::take(&mut c.members);
            for e in existing {
                self.descend(cell, e, bodies, depth);
            }
        }

        self.descend(cell, i, bodies, depth);
    }

    fn descend(&mut self, cell: usize, i: usize, bodies: &[PointMass<'_>], depth: usize) {
        let octant = self.cells[cell].octant(&bodies[i].position);
        let child = match self.cells[cell].children[octant] {
            Some(child) => child,
            None => {
                let (center, half) = self.cells[cell].child_bounds(octant);
                self.cells.push(Cell::new(center, half));
                let child = self.cells.len() - 1;
                self.cells[cell].children[octant] = Some(child);
                child
            }
        };
        self.insert(child, i, bodies, depth + 1);
    }

    fn walk(
        &self,
        cell: usize,
        i: usize,
        bodies: &[PointMass<'_>],
        g: f64,
        theta: f64,
        f: &mut NVec3,
    ) -> Result<()> {
        let c = &self.cells[cell];
        if c.mass == 0.0 {
            return Ok(());
        }
        let target = &bodies[i];

        if !c.split {
            for &j in &c.members {
                if j != i {
                    *f += pair_force(g, target, &bodies[j])?;
                }
            }
            return Ok(());
        }

        // a cell containing the body is always opened, so it never feels itself
        if !c.contains(&target.position) {
            let com = c.center_of_mass();
            let d = (com - target.position).norm();
            if d > 0.0 && 2.0 * c.half / d < theta {
                let pseudo = PointMass {
                    label: "<cell>",
                    position: com,
                    mass: c.mass,
                };
                *f += pair_force(g, target, &pseudo)?;
                return Ok(());
            }
        }

        for &child in c.children.iter().flatten() {
            self.walk(child, i, bodies, g, theta, f)?;
        }
        Ok(())
    }
}

// Smallest axis-aligned cube around every body
fn bounding_cube(bodies: &[PointMass<'_>]) -> (NVec3, f64) {
    let mut min = bodies[0].position;
    let mut max = bodies[0].position;
    for b in bodies {
        for k in 0..3 {
            min[k] = min[k].min(b.position[k]);
            max[k] = max[k].max(b.position[k]);
        }
    }

    let extent = max - min;
    let half = 0.5 * extent.x.max(extent.y).max(extent.z);
    ((min + max) * 0.5, half.max(f64::MIN_POSITIVE))
}
