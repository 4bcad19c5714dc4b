use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{ensure, Context, Result};
use serde::Deserialize;

use crate::{
    catalog::{BuildingKind, ResourceKind},
    engine::{EngineBuilder, EngineSettings},
    log::DEFAULT_LOG_CAPACITY,
    systems::HazardSettings,
    world::{World, WorldRules},
};

fn default_tick_ms() -> f64 {
    1000.0
}

fn default_tank_capacity() -> i64 {
    1000
}

fn default_log_capacity() -> usize {
    DEFAULT_LOG_CAPACITY
}

fn default_seeded_buildings() -> Vec<BuildingKind> {
    vec![BuildingKind::Biodome, BuildingKind::OxygenTank]
}

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub description: Option<String>,
    pub seed: u64,
    #[serde(default = "default_tick_ms")]
    pub tick_ms: f64,
    #[serde(default = "default_tank_capacity")]
    pub tank_capacity: i64,
    #[serde(default = "default_log_capacity")]
    pub log_capacity: usize,
    /// Overrides for the starting stock; unlisted kinds keep their defaults.
    #[serde(default)]
    pub starting: BTreeMap<ResourceKind, i64>,
    #[serde(default = "default_seeded_buildings")]
    pub seeded_buildings: Vec<BuildingKind>,
    #[serde(default)]
    pub hazards: HazardSettings,
    #[serde(default)]
    pub ticks: Option<u64>,
}

pub struct ScenarioLoader {
    base_dir: PathBuf,
}

impl ScenarioLoader {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    pub fn load(&self, file: impl AsRef<Path>) -> Result<Scenario> {
        let path = self.base_dir.join(file);
        let data = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read scenario file {}", path.display()))?;
        let scenario: Scenario = serde_yaml::from_str(&data)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        scenario
            .validate()
            .with_context(|| format!("Invalid scenario {}", path.display()))?;
        Ok(scenario)
    }
}

impl Scenario {
    pub fn validate(&self) -> Result<()> {
        ensure!(self.tick_ms > 0.0, "tick_ms must be positive");
        ensure!(self.tank_capacity >= 0, "tank_capacity cannot be negative");
        ensure!(
            !self.starting.contains_key(&ResourceKind::TileCount),
            "tile_count is not a stock and cannot be given a starting amount"
        );
        ensure!(
            self.hazards.collapse_chance_percent <= 100
                && self.hazards.random_event_chance_percent <= 100,
            "hazard chances are percentages"
        );
        Ok(())
    }

    pub fn rules(&self) -> WorldRules {
        let mut rules = WorldRules {
            tick_ms: self.tick_ms,
            tank_capacity: self.tank_capacity,
            log_capacity: self.log_capacity,
            seeded_buildings: self.seeded_buildings.clone(),
            ..WorldRules::default()
        };
        rules.starting.extend(self.starting.iter().map(|(k, v)| (*k, *v)));
        rules
    }

    /// An uninitialized world; hand it to [`crate::Engine::initialize`].
    pub fn build_world(&self) -> World {
        World::new(self.rules())
    }

    pub fn engine_builder(&self) -> EngineBuilder {
        EngineBuilder::new(EngineSettings {
            scenario_name: self.name.clone(),
            seed: self.seed,
        })
        .with_default_systems(self.hazards.clone())
    }

    pub fn ticks(&self, override_ticks: Option<u64>) -> u64 {
        override_ticks.or(self.ticks).unwrap_or(240)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write_scenario(dir: &Path, body: &str) -> PathBuf {
        let path = dir.join("scenario.yaml");
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(body.as_bytes()).unwrap();
        path
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        write_scenario(
            dir.path(),
            "name: sparse\nseed: 3\nstarting:\n  minerals: 500\nhazards:\n  magnetic_every: 0\n",
        );
        let scenario = ScenarioLoader::new(dir.path()).load("scenario.yaml").unwrap();
        assert_eq!(scenario.tick_ms, 1000.0);
        assert_eq!(scenario.hazards.magnetic_every, 0);
        assert_eq!(scenario.hazards.collapse_every, 10);

        let rules = scenario.rules();
        assert_eq!(rules.starting[&ResourceKind::Minerals], 500);
        assert_eq!(rules.starting[&ResourceKind::People], 50);
        assert_eq!(rules.seeded_buildings.len(), 2);
    }

    #[test]
    fn tile_count_cannot_be_stocked() {
        let dir = tempfile::tempdir().unwrap();
        write_scenario(dir.path(), "name: bad\nseed: 1\nstarting:\n  tile_count: 4\n");
        let err = ScenarioLoader::new(dir.path())
            .load("scenario.yaml")
            .unwrap_err();
        assert!(format!("{err:#}").contains("tile_count"));
    }
}
