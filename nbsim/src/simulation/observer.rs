//! Step observer trait for monitoring simulation progress.
//!
//! The observer is the only channel from the physics core to whatever renders
//! or records it. It receives read-only data; the driver does not start the
//! next step until the callback has returned.

use log::{debug, info};

use crate::simulation::collision::MergeEvent;
use crate::simulation::states::ParticleState;

/// Trait for observing completed simulation steps.
pub trait StepObserver {
    /// Called once per completed step with the elapsed time and the live
    /// particles in store order.
    fn on_step(&mut self, t: f64, snapshot: &[ParticleState]);

    /// Called for each merge of the step, before `on_step`.
    fn on_merge(&mut self, _event: &MergeEvent) {}
}

/// A no-op observer. Use when nothing needs to watch the run.
pub struct NoOpObserver;

impl StepObserver for NoOpObserver {
    fn on_step(&mut self, _t: f64, _snapshot: &[ParticleState]) {}
}

impl<F> StepObserver for F
where
    F: FnMut(f64, &[ParticleState]),
{
    fn on_step(&mut self, t: f64, snapshot: &[ParticleState]) {
        (self)(t, snapshot)
    }
}

/// Headless console observer: a progress line at `info` every `every` steps,
/// each particle at `debug`
pub struct LogObserver {
    every: usize,
    steps: usize,
}

impl LogObserver {
    pub fn new(every: usize) -> Self {
        Self {
            every: every.max(1),
            steps: 0,
        }
    }
}

impl StepObserver for LogObserver {
    fn on_step(&mut self, t: f64, snapshot: &[ParticleState]) {
        self.steps += 1;
        if self.steps % self.every != 0 {
            return;
        }

        info!("step {} - {} bodies - t = {:.2}", self.steps, snapshot.len(), t);
        for s in snapshot {
            debug!(
                "{}: pos = ({:.2}, {:.2}, {:.2}), vel = ({:.2}, {:.2}, {:.2}), m = {:.4}",
                s.label,
                s.position.x,
                s.position.y,
                s.position.z,
                s.velocity.x,
                s.velocity.y,
                s.velocity.z,
                s.mass
            );
        }
    }
}
