use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{debug, trace};

use crate::config::WorldConfig;
use crate::error::{Error, Result};
use crate::groups::membership::GroupLink;
use crate::groups::Group;
use crate::interaction::{Interactor, Optimizer};
use crate::objects::{Being, Handle};
use crate::world::commands::CommandQueue;
use crate::world::registration::{InteractionRegistration, Registration};

/// Where the world is within a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FramePhase {
    Idle,
    /// Dispatching registrations and integrating motion.
    Running,
    /// Applying queued membership changes.
    Draining,
}

/// The dispatch engine: registered interactions, the groups they cover, and
/// the per-frame loop that runs them.
///
/// A frame runs every registration in registration order, then updates and
/// integrates every being in any tracked group once, then applies the
/// membership changes queued through [`commands`](World::commands).
pub struct World {
    config: WorldConfig,
    registrations: Vec<Box<dyn Registration>>,
    tracked: Vec<Arc<dyn GroupLink>>,
    commands: CommandQueue,
    phase: FramePhase,
    frame_count: u64,
    last_frame: Option<Instant>,
}

impl World {
    /// Creates a new, empty world with default settings.
    pub fn new() -> Self {
        World {
            config: WorldConfig::default(),
            registrations: Vec::new(),
            tracked: Vec::new(),
            commands: CommandQueue::new(),
            phase: FramePhase::Idle,
            frame_count: 0,
            last_frame: None,
        }
    }

    pub fn with_config(config: WorldConfig) -> Result<Self> {
        config.validate()?;
        Ok(World {
            config,
            ..World::new()
        })
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn phase(&self) -> FramePhase {
        self.phase
    }

    /// Frames run so far, including ones that failed.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// A handle on the pending-change queue, for interactors and other
    /// threads to request membership changes mid-frame.
    pub fn commands(&self) -> CommandQueue {
        self.commands.clone()
    }

    /// Includes `group` in the motion step even if it takes part in no
    /// registration. Adding a group twice has no effect.
    pub fn add_group<T: Being>(&mut self, group: &Group<T>) {
        self.track(group.link());
    }

    /// Registers an interaction checked over every pair of `group_a` x
    /// `group_b` each frame.
    ///
    /// With `apply_immediately`, `handle` runs as soon as a pair is detected.
    /// Otherwise matching pairs are collected and handled after the whole
    /// pass over both groups.
    pub fn register_interaction<A, B, I>(
        &mut self,
        group_a: &Group<A>,
        group_b: &Group<B>,
        interactor: I,
        apply_immediately: bool,
    ) where
        A: Being,
        B: Being,
        I: Interactor<A, B> + 'static,
    {
        self.register(group_a, group_b, Box::new(interactor), None, apply_immediately);
    }

    /// Like [`register_interaction`](World::register_interaction), but
    /// candidates for each member of `group_a` are found by `optimizer`.
    pub fn register_optimized_interaction<A, B, I, O>(
        &mut self,
        group_a: &Group<A>,
        group_b: &Group<B>,
        interactor: I,
        optimizer: O,
        apply_immediately: bool,
    ) where
        A: Being,
        B: Being,
        I: Interactor<A, B> + 'static,
        O: Optimizer<A, B> + 'static,
    {
        self.register(
            group_a,
            group_b,
            Box::new(interactor),
            Some(Box::new(optimizer)),
            apply_immediately,
        );
    }

    fn register<A: Being, B: Being>(
        &mut self,
        group_a: &Group<A>,
        group_b: &Group<B>,
        interactor: Box<dyn Interactor<A, B>>,
        optimizer: Option<Box<dyn Optimizer<A, B>>>,
        apply_immediately: bool,
    ) {
        debug!(
            "registering interaction #{} between groups {:?} and {:?} (optimized: {}, immediate: {})",
            self.registrations.len(),
            group_a.id(),
            group_b.id(),
            optimizer.is_some(),
            apply_immediately
        );
        self.track(group_a.link());
        self.track(group_b.link());
        self.registrations.push(Box::new(InteractionRegistration {
            group_a: group_a.clone(),
            group_b: group_b.clone(),
            interactor,
            optimizer,
            apply_immediately,
        }));
    }

    fn track(&mut self, link: Arc<dyn GroupLink>) {
        if !self.tracked.iter().any(|g| g.id() == link.id()) {
            self.tracked.push(link);
        }
    }

    /// Queues `handle` to join `group` at the end of the current (or next) frame.
    pub fn add_being<T: Being>(&self, handle: &Handle<T>, group: &Group<T>) -> Result<()> {
        self.commands.add(handle, group)
    }

    /// Queues `handle` to leave `group` at the end of the current (or next) frame.
    pub fn remove_being<T: Being>(&self, handle: &Handle<T>, group: &Group<T>) -> Result<()> {
        self.commands.remove(handle, group)
    }

    /// Queues `handle` to leave all of its groups.
    pub fn delete_being<T: Being>(&self, handle: &Handle<T>) -> Result<()> {
        self.commands.delete(handle)
    }

    /// Runs one frame, integrating motion over `dt` seconds.
    ///
    /// The first error from an interactor, optimizer or `update` stops the
    /// frame where it is. Effects already applied stay applied, the queued
    /// membership changes are still drained, and then the error is returned.
    pub fn step(&mut self, dt: f64) -> Result<()> {
        if !dt.is_finite() || dt < 0.0 {
            return Err(Error::InvalidArgument(format!(
                "frame delta must be a non-negative number, got {dt}"
            )));
        }

        trace!("frame {} starting, dt={}", self.frame_count, dt);
        self.phase = FramePhase::Running;
        let outcome = self.run_frame(dt);

        self.phase = FramePhase::Draining;
        let drained = self.commands.drain();

        self.phase = FramePhase::Idle;
        self.frame_count += 1;

        if let Err(err) = &outcome {
            debug!("frame {} aborted: {}", self.frame_count - 1, err);
        }
        outcome?;
        drained.map(|_| ())
    }

    fn run_frame(&mut self, dt: f64) -> Result<()> {
        for registration in self.registrations.iter_mut() {
            registration.run()?;
        }

        let mut seen = HashSet::new();
        for group in &self.tracked {
            group.step_members(dt, &mut seen)?;
        }
        Ok(())
    }

    /// Runs one frame with the configured timing and returns the delta used.
    ///
    /// `fixed_timestep` wins if set. Otherwise the delta is the wall-clock
    /// time since the previous call, capped at `max_timestep`; the very
    /// first call integrates zero seconds.
    pub fn advance_one_frame(&mut self) -> Result<f64> {
        let now = Instant::now();
        let dt = match self.config.fixed_timestep {
            Some(fixed) => fixed,
            None => self
                .last_frame
                .map(|last| now.duration_since(last).as_secs_f64())
                .unwrap_or(0.0)
                .min(self.config.max_timestep),
        };
        self.last_frame = Some(now);
        self.step(dt)?;
        Ok(dt)
    }

    /// Runs frames on the calling thread until `stop` is set, returning how
    /// many ran. With `update_interval` set, frames start at most that often.
    pub fn run_until(&mut self, stop: &AtomicBool) -> Result<u64> {
        let interval = self.config.update_interval.map(Duration::from_secs_f64);
        let mut frames = 0;
        debug!("update loop starting (interval: {:?})", interval);
        while !stop.load(Ordering::Acquire) {
            let started = Instant::now();
            self.advance_one_frame()?;
            frames += 1;
            if let Some(interval) = interval {
                let elapsed = started.elapsed();
                if elapsed < interval {
                    std::thread::sleep(interval - elapsed);
                }
            }
        }
        debug!("update loop stopped after {} frame(s)", frames);
        Ok(frames)
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}
