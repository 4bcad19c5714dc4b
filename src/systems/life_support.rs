use anyhow::Result;

use crate::{
    catalog::{ResourceKind, DAY_TICKS},
    engine::{System, SystemContext},
    rng::{roll, SystemRng},
    world::World,
};

/// Ticks between oxygen draws.
const BREATH_TICKS: u64 = DAY_TICKS / 10;

/// Counts down to evacuation and feeds and ventilates the colonists. When
/// supplies fall short a random share of the shortfall dies.
pub struct LifeSupportSystem;

impl LifeSupportSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LifeSupportSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for LifeSupportSystem {
    fn name(&self) -> &str {
        "life_support"
    }

    fn run(
        &mut self,
        ctx: &SystemContext,
        world: &mut World,
        rng: &mut SystemRng<'_>,
    ) -> Result<()> {
        let mut people = world.resource(ResourceKind::People);
        let mut food = world.resource(ResourceKind::Food);
        let mut oxygen = world.resource(ResourceKind::Oxygen);

        if ctx.every(DAY_TICKS) {
            world.update_resource(ResourceKind::DaysUntilEvacuation, -1);
            let eta = world.resource(ResourceKind::DaysUntilEvacuation);
            world.add_log(format!("{eta} days until evacuation"));

            let stored = food;
            food -= people;
            if stored < people {
                let starved = roll(rng, people - stored);
                people -= starved;
                world.add_log(format!("{starved} people starved"));
                tracing::info!(tick = ctx.tick, starved, "food ran out");
            }
        }

        if ctx.every(BREATH_TICKS) {
            let stored = oxygen;
            oxygen -= people;
            if stored < people {
                let suffocated = roll(rng, people - stored);
                people -= suffocated;
                world.add_log(format!("{suffocated} people suffocated"));
                tracing::info!(tick = ctx.tick, suffocated, "oxygen ran out");
            }
        }

        world.set_resource(ResourceKind::People, people);
        world.set_resource(ResourceKind::Food, food);
        world.set_resource(ResourceKind::Oxygen, oxygen);
        Ok(())
    }
}
