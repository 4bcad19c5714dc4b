use anyhow::Result;

use crate::{
    catalog::{EventKind, ResourceKind},
    engine::{System, SystemContext},
    rng::SystemRng,
    world::World,
};

/// Ends the game: evacuation day is a win, an empty colony a loss.
pub struct OutcomeSystem;

impl OutcomeSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for OutcomeSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for OutcomeSystem {
    fn name(&self) -> &str {
        "outcome"
    }

    fn run(
        &mut self,
        ctx: &SystemContext,
        world: &mut World,
        _rng: &mut SystemRng<'_>,
    ) -> Result<()> {
        if world.resource(ResourceKind::DaysUntilEvacuation) <= 0 {
            tracing::info!(tick = ctx.tick, "evacuation fleet arrived");
            world.add_log("The evacuation fleet has arrived");
            world.emit_event(EventKind::Win);
        } else if world.resource(ResourceKind::People) <= 0 {
            tracing::info!(tick = ctx.tick, "colony lost");
            world.add_log("Nobody is left alive");
            world.emit_event(EventKind::Lose);
        }
        Ok(())
    }
}
