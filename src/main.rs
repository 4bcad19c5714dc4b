use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use asteroid::{catalog::BuildingKind, Engine, ScenarioLoader, World};

#[derive(Debug, Parser)]
#[command(author, version, about = "Headless asteroid colony runner")]
struct Cli {
    /// Path to the scenario YAML file
    #[arg(long, default_value = "scenarios/default.yaml")]
    scenario: PathBuf,

    /// Override tick count (uses scenario default when omitted)
    #[arg(long)]
    ticks: Option<u64>,

    /// Override the scenario seed
    #[arg(long)]
    seed: Option<u64>,

    /// Buildings to place, in order, whenever they become affordable
    #[arg(long, value_delimiter = ',', value_parser = parse_building)]
    build: Vec<BuildingKind>,

    /// Print the final world snapshot as JSON
    #[arg(long)]
    json: bool,
}

fn parse_building(value: &str) -> Result<BuildingKind, String> {
    serde_yaml::from_str(value.trim()).map_err(|_| format!("unknown building '{value}'"))
}

/// Stands in for the player: takes the first choice it can afford and works
/// through the build order one building at a time.
struct Autopilot {
    build_order: Vec<BuildingKind>,
    next_build: usize,
}

impl Autopilot {
    fn act(&mut self, engine: &mut Engine, world: &mut World) {
        if world.is_waiting() {
            let choice = world.event_choices().into_iter().find(|choice| choice.enabled);
            if let Some(choice) = choice {
                engine.handle_step_event(world, choice.transition);
            }
            return;
        }
        let Some(kind) = self.build_order.get(self.next_build).copied() else {
            return;
        };
        if !world.can_afford(kind) {
            return;
        }
        let info = kind.info();
        let cell = world
            .grid()
            .cells()
            .find(|(_, _, tile)| tile.building().is_none() && info.can_place_on(*tile));
        if let Some((x, y, _)) = cell {
            if world.try_to_build(kind, x, y) {
                self.next_build += 1;
            }
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("asteroid=info")),
        )
        .init();

    let cli = Cli::parse();
    let loader = ScenarioLoader::new(".");
    let mut scenario = loader.load(&cli.scenario)?;
    if let Some(seed) = cli.seed {
        scenario.seed = seed;
    }
    let ticks = scenario.ticks(cli.ticks);
    if ticks == 0 {
        bail!("nothing to simulate: tick count is zero");
    }

    let mut world = scenario.build_world();
    let mut engine = scenario.engine_builder().build();
    engine.initialize(&mut world);
    tracing::info!(scenario = %scenario.name, seed = scenario.seed, ticks, "simulation starting");

    let mut pilot = Autopilot {
        build_order: cli.build,
        next_build: 0,
    };
    let frame_ms = world.rules().tick_ms;
    while world.tick() < ticks {
        if world.active_event().map(|a| a.kind.is_terminal()).unwrap_or(false) {
            break;
        }
        pilot.act(&mut engine, &mut world);
        if world.is_waiting() && world.event_choices().iter().all(|choice| !choice.enabled) {
            bail!("event at tick {} has no choice the colony can take", world.tick());
        }
        engine
            .update(&mut world, frame_ms)
            .with_context(|| format!("tick {} failed", world.tick() + 1))?;
    }

    if cli.json {
        let snapshot = serde_json::to_string_pretty(&world.snapshot())?;
        println!("{snapshot}");
    } else {
        println!("{}", world.status_line());
        if let Some(text) = world.event_text() {
            println!("\n{text}\n");
        }
        for line in world.log_lines() {
            println!("  {line}");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use asteroid::{
        catalog::{ResourceKind, Transition},
        systems::HazardSettings,
        world::WorldRules,
        EngineBuilder, EngineSettings,
    };

    use super::*;

    #[test]
    fn autopilot_waits_quietly_until_it_can_pay() {
        let mut engine = EngineBuilder::new(EngineSettings {
            scenario_name: "autopilot".into(),
            seed: 12,
        })
        .with_default_systems(HazardSettings::calm())
        .build();
        let mut world = World::new(WorldRules::default());
        engine.initialize(&mut world);
        assert!(engine.handle_step_event(&mut world, Transition::Resume));
        world.set_resource(ResourceKind::Minerals, 0);

        let mut pilot = Autopilot {
            build_order: vec![BuildingKind::OxygenTank],
            next_build: 0,
        };
        for _ in 0..10 {
            pilot.act(&mut engine, &mut world);
        }
        assert_eq!(pilot.next_build, 0);
        assert_eq!(world.log().len(), 0);

        world.set_resource(ResourceKind::Minerals, 20);
        pilot.act(&mut engine, &mut world);
        assert_eq!(pilot.next_build, 1);
        assert_eq!(world.installed().count(BuildingKind::OxygenTank), 2);
        assert_eq!(world.log().latest(), Some("Built Oxygen Tank"));
    }
}
