use std::time::Instant;

use anyhow::Result;

use crate::{
    catalog::{EventKind, Transition},
    rng::{RngManager, SystemRng},
    systems::{HazardSettings, HazardSystem, LifeSupportSystem, OutcomeSystem, ProductionSystem},
    world::World,
};

const WORLD_STREAM: &str = "world";
const EVENT_STREAM: &str = "events";

pub struct EngineSettings {
    pub scenario_name: String,
    pub seed: u64,
}

pub struct EngineBuilder {
    settings: EngineSettings,
    systems: Vec<Box<dyn System>>,
}

impl EngineBuilder {
    pub fn new(settings: EngineSettings) -> Self {
        Self {
            settings,
            systems: Vec::new(),
        }
    }

    pub fn with_system(mut self, system: impl System + 'static) -> Self {
        self.systems.push(Box::new(system));
        self
    }

    pub fn push_system(&mut self, system: impl System + 'static) {
        self.systems.push(Box::new(system));
    }

    /// The standard tick pipeline, in the order the colony experiences it.
    pub fn with_default_systems(self, hazards: HazardSettings) -> Self {
        self.with_system(OutcomeSystem::new())
            .with_system(ProductionSystem::new())
            .with_system(HazardSystem::new(hazards))
            .with_system(LifeSupportSystem::new())
    }

    pub fn build(self) -> Engine {
        Engine {
            rng: RngManager::new(self.settings.seed),
            systems: self.systems,
            settings: self.settings,
        }
    }
}

/// Drives a [`World`]: turns frame time into ticks, runs the systems and
/// supplies randomness to world commands that need it.
pub struct Engine {
    rng: RngManager,
    systems: Vec<Box<dyn System>>,
    settings: EngineSettings,
}

impl Engine {
    pub fn scenario_name(&self) -> &str {
        &self.settings.scenario_name
    }

    /// Starts a new game on `world`.
    pub fn initialize(&mut self, world: &mut World) {
        let mut rng = self.rng.stream(WORLD_STREAM);
        world.initialize(&mut rng);
    }

    /// Feeds one frame's elapsed time into the world. Nothing moves while an
    /// event is waiting; otherwise at most one tick fires per call.
    pub fn update(&mut self, world: &mut World, elapsed_ms: f64) -> Result<Option<TickSummary>> {
        if world.is_waiting() {
            return Ok(None);
        }
        if !world.clock_mut().accumulate(elapsed_ms) {
            return Ok(None);
        }
        self.tick(world).map(Some)
    }

    /// Runs the system pipeline for the world's current tick. A Win or Lose
    /// raised part way through ends the tick early. Only reachable through
    /// [`Engine::update`], which holds the pipeline while an event waits.
    fn tick(&mut self, world: &mut World) -> Result<TickSummary> {
        let ctx = SystemContext {
            tick: world.tick(),
            scenario_name: &self.settings.scenario_name,
        };
        let mut reports = Vec::with_capacity(self.systems.len());
        for system in &mut self.systems {
            let start = Instant::now();
            let mut rng_stream = self.rng.stream(system.name());
            system.run(&ctx, world, &mut rng_stream)?;
            reports.push(SystemRunReport {
                name: system.name().to_string(),
                duration_ms: start.elapsed().as_secs_f64() * 1_000.0,
            });
            if world.active_event().map(|a| a.kind.is_terminal()).unwrap_or(false) {
                tracing::info!(tick = ctx.tick, system = system.name(), "game over, tick cut short");
                break;
            }
        }
        let event = world.active_event().map(|active| active.kind);
        tracing::debug!(tick = ctx.tick, status = %world.status_line(), ?event, "tick complete");
        Ok(TickSummary {
            tick: ctx.tick,
            system_reports: reports,
            event,
        })
    }

    /// Resolves the waiting event; see [`World::handle_step_event`].
    pub fn handle_step_event(&mut self, world: &mut World, transition: Transition) -> bool {
        let mut rng = self.rng.stream(EVENT_STREAM);
        world.handle_step_event(transition, &mut rng)
    }

    /// Plays `frames` frames of `frame_ms` each, letting `on_frame` act as the
    /// player (build, resolve events) before every update.
    pub fn run_with_hook<F>(
        &mut self,
        world: &mut World,
        frames: u64,
        frame_ms: f64,
        mut on_frame: F,
    ) -> Result<Vec<TickSummary>>
    where
        F: FnMut(&mut Engine, &mut World),
    {
        let mut summaries = Vec::new();
        for _ in 0..frames {
            on_frame(self, world);
            if let Some(summary) = self.update(world, frame_ms)? {
                summaries.push(summary);
            }
        }
        Ok(summaries)
    }
}

#[derive(Clone, Debug)]
pub struct SystemRunReport {
    pub name: String,
    pub duration_ms: f64,
}

#[derive(Clone, Debug)]
pub struct TickSummary {
    pub tick: u64,
    pub system_reports: Vec<SystemRunReport>,
    /// Event waiting for the player once the tick finished.
    pub event: Option<EventKind>,
}

pub struct SystemContext<'a> {
    pub tick: u64,
    pub scenario_name: &'a str,
}

impl SystemContext<'_> {
    /// True on every positive multiple of `period`.
    pub fn every(&self, period: u64) -> bool {
        period > 0 && self.tick > 0 && self.tick % period == 0
    }
}

pub trait System {
    fn name(&self) -> &str;
    fn run(
        &mut self,
        ctx: &SystemContext,
        world: &mut World,
        rng: &mut SystemRng<'_>,
    ) -> Result<()>;
}
