use anyhow::Result;

use crate::{
    catalog::BuildingKind,
    engine::{System, SystemContext},
    rng::SystemRng,
    world::World,
};

/// Applies each installed building's production table.
pub struct ProductionSystem;

impl ProductionSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ProductionSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for ProductionSystem {
    fn name(&self) -> &str {
        "production"
    }

    fn run(
        &mut self,
        ctx: &SystemContext,
        world: &mut World,
        _rng: &mut SystemRng<'_>,
    ) -> Result<()> {
        let installed: Vec<(BuildingKind, u32)> = world.installed().iter().collect();
        for (kind, count) in installed {
            for production in kind.info().production {
                if ctx.every(production.period) {
                    world.update_resource(production.resource, production.amount * i64::from(count));
                }
            }
        }
        Ok(())
    }
}
