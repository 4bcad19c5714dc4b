use anyhow::Result;
use rand::Rng;
use serde::Deserialize;

use crate::{
    catalog::EventKind,
    engine::{System, SystemContext},
    rng::SystemRng,
    world::World,
};

fn default_magnetic_every() -> u64 {
    5
}

fn default_collapse_every() -> u64 {
    10
}

fn default_collapse_chance_percent() -> u32 {
    50
}

fn default_random_event_every() -> u64 {
    7
}

fn default_random_event_chance_percent() -> u32 {
    30
}

/// How often the asteroid turns on the colony. A period of zero disables
/// that hazard.
#[derive(Debug, Clone, Deserialize)]
pub struct HazardSettings {
    #[serde(default = "default_magnetic_every")]
    pub magnetic_every: u64,
    #[serde(default = "default_collapse_every")]
    pub collapse_every: u64,
    #[serde(default = "default_collapse_chance_percent")]
    pub collapse_chance_percent: u32,
    #[serde(default = "default_random_event_every")]
    pub random_event_every: u64,
    #[serde(default = "default_random_event_chance_percent")]
    pub random_event_chance_percent: u32,
}

impl Default for HazardSettings {
    fn default() -> Self {
        Self {
            magnetic_every: default_magnetic_every(),
            collapse_every: default_collapse_every(),
            collapse_chance_percent: default_collapse_chance_percent(),
            random_event_every: default_random_event_every(),
            random_event_chance_percent: default_random_event_chance_percent(),
        }
    }
}

impl HazardSettings {
    /// No hazards at all; useful for scripted runs and tests.
    pub fn calm() -> Self {
        Self {
            magnetic_every: 0,
            collapse_every: 0,
            collapse_chance_percent: 0,
            random_event_every: 0,
            random_event_chance_percent: 0,
        }
    }
}

pub struct HazardSystem {
    settings: HazardSettings,
}

impl HazardSystem {
    pub fn new(settings: HazardSettings) -> Self {
        Self { settings }
    }
}

impl Default for HazardSystem {
    fn default() -> Self {
        Self::new(HazardSettings::default())
    }
}

fn chance(rng: &mut SystemRng<'_>, percent: u32) -> bool {
    rng.gen_range(0..100) < percent
}

impl System for HazardSystem {
    fn name(&self) -> &str {
        "hazards"
    }

    fn run(
        &mut self,
        ctx: &SystemContext,
        world: &mut World,
        rng: &mut SystemRng<'_>,
    ) -> Result<()> {
        if ctx.every(self.settings.magnetic_every) {
            world.emit_event(EventKind::Magnetic);
        }

        if ctx.every(self.settings.collapse_every)
            && chance(rng, self.settings.collapse_chance_percent)
        {
            let (x, y) = world.collapse_random_tile(rng);
            tracing::debug!(tick = ctx.tick, x, y, "ground gave way");
        }

        if ctx.every(self.settings.random_event_every)
            && !world.is_waiting()
            && chance(rng, self.settings.random_event_chance_percent)
        {
            let pool: Vec<EventKind> = EventKind::HAZARDS
                .into_iter()
                .filter(|kind| *kind != EventKind::Magnetic)
                .collect();
            let kind = pool[rng.gen_range(0..pool.len())];
            world.emit_event(kind);
        }
        Ok(())
    }
}
