use std::collections::BTreeMap;

use rand::Rng;
use serde::Serialize;
use thiserror::Error;

use crate::{
    catalog::{
        BuildingInfo, BuildingKind, EventKind, ResourceKind, TileState, Transition, GRID_SIZE,
    },
    clock::WorldClock,
    events::{
        step_affordable, ActiveEvent, ChoiceError, ChoiceView, ColonyReport, EventRuntime,
        Resolution,
    },
    grid::{Grid, InstalledBuildings},
    log::{GameLog, DEFAULT_LOG_CAPACITY},
    resources::ResourceLedger,
};

fn default_starting_resources() -> BTreeMap<ResourceKind, i64> {
    BTreeMap::from([
        (ResourceKind::People, 50),
        (ResourceKind::Food, 50),
        (ResourceKind::Oxygen, 100),
        (ResourceKind::Minerals, 30),
        (ResourceKind::Gas, 0),
        (ResourceKind::Science, 0),
        (ResourceKind::DaysUntilEvacuation, 10),
    ])
}

/// Tunables fixed for the lifetime of a world.
#[derive(Debug, Clone)]
pub struct WorldRules {
    pub tick_ms: f64,
    pub tank_capacity: i64,
    pub log_capacity: usize,
    pub starting: BTreeMap<ResourceKind, i64>,
    /// Placed for free on distinct random cells at every reset.
    pub seeded_buildings: Vec<BuildingKind>,
}

impl Default for WorldRules {
    fn default() -> Self {
        Self {
            tick_ms: 1000.0,
            tank_capacity: 1000,
            log_capacity: DEFAULT_LOG_CAPACITY,
            starting: default_starting_resources(),
            seeded_buildings: vec![BuildingKind::Biodome, BuildingKind::OxygenTank],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("({x}, {y}) is outside the grid")]
    OutOfBounds { x: usize, y: usize },
    #[error("({x}, {y}) has collapsed")]
    Collapsed { x: usize, y: usize },
    #[error("{} cannot be placed on {}", .kind.info().name, .tile.name())]
    WrongTile { kind: BuildingKind, tile: TileState },
    #[error("insufficient {}", .0.display_name())]
    Insufficient(ResourceKind),
}

/// The colony: grid, stocks, buildings, pending event, clock and log.
pub struct World {
    rules: WorldRules,
    clock: WorldClock,
    grid: Grid,
    installed: InstalledBuildings,
    ledger: ResourceLedger,
    events: EventRuntime,
    log: GameLog,
}

impl World {
    /// An empty world. Call [`World::initialize`] before playing.
    pub fn new(rules: WorldRules) -> Self {
        Self {
            clock: WorldClock::new(rules.tick_ms),
            log: GameLog::with_capacity(rules.log_capacity),
            grid: Grid::new(),
            installed: InstalledBuildings::default(),
            ledger: ResourceLedger::new(),
            events: EventRuntime::default(),
            rules,
        }
    }

    /// Starts a new game: clock, stocks, grid and log are reset and the
    /// introduction event is emitted.
    pub fn initialize<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.clock.reset();
        self.log.clear();
        self.events.clear();
        self.ledger.reset(&self.rules.starting);
        self.installed.clear();
        self.grid.generate(rng);

        let mut free_cells: Vec<(usize, usize)> = self.grid.cells().map(|(x, y, _)| (x, y)).collect();
        for kind in self.rules.seeded_buildings.clone() {
            if free_cells.is_empty() {
                break;
            }
            let (x, y) = free_cells.swap_remove(rng.gen_range(0..free_cells.len()));
            self.install(kind, x, y);
        }
        self.refresh_capacity();

        tracing::info!(
            buildings = self.installed.total(),
            intact_tiles = self.grid.intact_count(),
            "world initialized"
        );
        self.emit_event(EventKind::Start);
    }

    // --- queries ---

    pub fn rules(&self) -> &WorldRules {
        &self.rules
    }

    pub fn tick(&self) -> u64 {
        self.clock.tick()
    }

    pub fn clock(&self) -> &WorldClock {
        &self.clock
    }

    pub(crate) fn clock_mut(&mut self) -> &mut WorldClock {
        &mut self.clock
    }

    pub fn status_line(&self) -> String {
        format!(
            "{:02}:00, Day {}, {} days until evacuation",
            self.clock.hour(),
            self.clock.day(),
            self.resource(ResourceKind::DaysUntilEvacuation)
        )
    }

    pub fn resource(&self, kind: ResourceKind) -> i64 {
        match kind {
            ResourceKind::TileCount => self.grid.intact_count() as i64,
            _ => self.ledger.get(kind),
        }
    }

    pub fn resource_name(&self, kind: ResourceKind) -> &'static str {
        kind.display_name()
    }

    pub fn lifetime_total(&self, kind: ResourceKind) -> i64 {
        self.ledger.lifetime_total(kind)
    }

    pub fn oxygen_capacity(&self) -> i64 {
        self.rules.tank_capacity * i64::from(self.installed.count(BuildingKind::OxygenTank))
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn installed(&self) -> &InstalledBuildings {
        &self.installed
    }

    /// True when the stocks cover `kind`'s cost. Ignores placement rules.
    pub fn can_afford(&self, kind: BuildingKind) -> bool {
        self.ledger.can_afford(kind.info().cost)
    }

    pub fn building_catalog(&self) -> impl Iterator<Item = &'static BuildingInfo> {
        BuildingKind::catalog()
    }

    /// True while an event holds the world still.
    pub fn is_waiting(&self) -> bool {
        self.events.is_active()
    }

    pub fn active_event(&self) -> Option<ActiveEvent> {
        self.events.active()
    }

    pub fn log_lines(&self) -> impl Iterator<Item = &str> {
        self.log.lines()
    }

    pub fn log(&self) -> &GameLog {
        &self.log
    }

    pub fn report(&self) -> ColonyReport {
        ColonyReport {
            days: self.clock.days_elapsed(),
            people: self.resource(ResourceKind::People),
            minerals: self.lifetime_total(ResourceKind::Minerals),
            gas: self.lifetime_total(ResourceKind::Gas),
            science: self.lifetime_total(ResourceKind::Science),
        }
    }

    /// Narrative text of the current step followed by its numbered choices.
    pub fn event_text(&self) -> Option<String> {
        let active = self.events.active()?;
        let step = active.current_step()?;
        let mut text = if active.kind.is_terminal() {
            self.report().fill(step.text)
        } else {
            step.text.to_string()
        };
        for choice in self.event_choices() {
            text.push('\n');
            text.push_str(&choice.render());
        }
        Some(text)
    }

    pub fn event_choices(&self) -> Vec<ChoiceView> {
        let Some(step) = self.events.active().and_then(|a| a.current_step()) else {
            return Vec::new();
        };
        step.choices
            .iter()
            .enumerate()
            .map(|(index, choice)| ChoiceView {
                number: index + 1,
                label: choice.label,
                transition: choice.next,
                enabled: self.check_step_event(choice.next),
            })
            .collect()
    }

    /// Whether choosing `transition` could be paid for right now. Pure.
    pub fn check_step_event(&self, transition: Transition) -> bool {
        match transition {
            Transition::Resume | Transition::Restart => true,
            Transition::Goto(id) => self
                .events
                .active()
                .and_then(|active| active.definition().step(id))
                .map(|step| step_affordable(step, |kind| self.resource(kind)))
                .unwrap_or(false),
        }
    }

    // --- commands ---

    /// Places `kind` at `(x, y)`. Failures leave the world untouched and
    /// are reported in the log when the player can act on them.
    pub fn try_to_build(&mut self, kind: BuildingKind, x: usize, y: usize) -> bool {
        match self.place(kind, x, y) {
            Ok(()) => true,
            Err(err) => {
                tracing::debug!(?kind, x, y, %err, "build rejected");
                match err {
                    BuildError::WrongTile { .. } => {
                        self.log
                            .push(format!("Can't build {} on this tile", kind.info().name));
                    }
                    BuildError::Insufficient(resource) => {
                        self.log
                            .push(format!("Insufficient {}", resource.display_name()));
                    }
                    BuildError::OutOfBounds { .. } | BuildError::Collapsed { .. } => {}
                }
                false
            }
        }
    }

    pub fn place(&mut self, kind: BuildingKind, x: usize, y: usize) -> Result<(), BuildError> {
        let tile = self.grid.get(x, y).ok_or(BuildError::OutOfBounds { x, y })?;
        if tile.is_collapsed() {
            return Err(BuildError::Collapsed { x, y });
        }
        let info = kind.info();
        if !info.can_place_on(tile) {
            return Err(BuildError::WrongTile { kind, tile });
        }
        self.ledger.pay(info.cost).map_err(BuildError::Insufficient)?;
        self.install(kind, x, y);
        self.log.push(format!("Built {}", info.name));
        tracing::info!(?kind, x, y, "building placed");
        Ok(())
    }

    /// Resolves the current event with `transition`. Returns false and
    /// changes nothing when the choice cannot be taken.
    pub fn handle_step_event<R: Rng + ?Sized>(
        &mut self,
        transition: Transition,
        rng: &mut R,
    ) -> bool {
        match self.resolve_choice(transition, rng) {
            Ok(_) => true,
            Err(err) => {
                tracing::debug!(?transition, %err, "choice rejected");
                false
            }
        }
    }

    pub fn resolve_choice<R: Rng + ?Sized>(
        &mut self,
        transition: Transition,
        rng: &mut R,
    ) -> Result<Resolution, ChoiceError> {
        let active = self.events.active().ok_or(ChoiceError::NoActiveEvent)?;
        if !active.offers(transition) {
            return Err(ChoiceError::NotOffered(transition));
        }
        match transition {
            Transition::Restart => {
                tracing::info!(event = ?active.kind, "starting a new game");
                self.initialize(rng);
                Ok(Resolution::Restarted)
            }
            Transition::Resume => {
                self.events.clear();
                tracing::debug!(event = ?active.kind, "event resolved");
                Ok(Resolution::Resumed)
            }
            Transition::Goto(id) => {
                if !self.check_step_event(transition) {
                    return Err(ChoiceError::Unaffordable(id));
                }
                let step = active
                    .definition()
                    .step(id)
                    .ok_or(ChoiceError::NotOffered(transition))?;
                for (kind, delta) in step.effects {
                    self.apply_effect(*kind, *delta, rng);
                }
                self.events.advance(id);
                Ok(Resolution::Advanced(id))
            }
        }
    }

    /// Starts `kind`, pre-empting whatever event was active.
    pub fn emit_event(&mut self, kind: EventKind) {
        if let Some(previous) = self.events.emit(kind) {
            tracing::warn!(
                previous = ?previous.kind,
                step = previous.step.0,
                next = ?kind,
                "active event pre-empted"
            );
        }
        tracing::info!(event = ?kind, tick = self.tick(), "event emitted");
    }

    // --- mutation helpers used by systems and events ---

    pub fn set_resource(&mut self, kind: ResourceKind, amount: i64) {
        if kind == ResourceKind::TileCount {
            return;
        }
        self.ledger.set(kind, amount);
    }

    pub fn update_resource(&mut self, kind: ResourceKind, delta: i64) {
        if kind == ResourceKind::TileCount {
            return;
        }
        self.ledger.update(kind, delta);
    }

    /// Like [`World::update_resource`], but a negative tile count destroys
    /// that many random tiles.
    pub fn apply_effect<R: Rng + ?Sized>(&mut self, kind: ResourceKind, delta: i64, rng: &mut R) {
        match kind {
            ResourceKind::TileCount => {
                if delta < 0 {
                    self.collapse_random_tiles(delta.unsigned_abs() as usize, rng);
                }
            }
            _ => self.update_resource(kind, delta),
        }
    }

    pub fn add_log(&mut self, line: impl Into<String>) {
        self.log.push(line);
    }

    /// Takes the building at `(x, y)` off the installed list. The tile
    /// itself is left for the caller to change.
    pub fn remove_building(&mut self, x: usize, y: usize) -> Option<BuildingKind> {
        let kind = self.grid.get(x, y)?.building()?;
        self.installed.remove(kind);
        if kind == BuildingKind::OxygenTank {
            self.refresh_capacity();
        }
        Some(kind)
    }

    /// Collapses `(x, y)`, destroying any building on it. A cell that has
    /// already collapsed is left alone and nothing is logged.
    pub fn collapse_tile(&mut self, x: usize, y: usize) -> Option<BuildingKind> {
        if self.grid.get(x, y).map_or(true, |tile| tile.is_collapsed()) {
            return None;
        }
        let destroyed = self.remove_building(x, y);
        self.grid.set(x, y, TileState::Collapsed);
        match destroyed {
            Some(kind) => self
                .log
                .push(format!("{} was lost when the ground collapsed", kind.info().name)),
            None => self.log.push("A tile collapsed"),
        }
        tracing::info!(x, y, ?destroyed, "tile collapsed");
        destroyed
    }

    pub fn collapse_random_tile<R: Rng + ?Sized>(&mut self, rng: &mut R) -> (usize, usize) {
        let (x, y) = self.grid.random_cell(rng);
        self.collapse_tile(x, y);
        (x, y)
    }

    pub fn collapse_random_tiles<R: Rng + ?Sized>(&mut self, count: usize, rng: &mut R) {
        for _ in 0..count {
            self.collapse_random_tile(rng);
        }
    }

    fn install(&mut self, kind: BuildingKind, x: usize, y: usize) {
        self.remove_building(x, y);
        self.grid.set(x, y, TileState::Building(kind));
        self.installed.add(kind);
        if kind == BuildingKind::OxygenTank {
            self.refresh_capacity();
        }
    }

    fn refresh_capacity(&mut self) {
        self.ledger
            .set_capacity(ResourceKind::Oxygen, self.oxygen_capacity());
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            tick: self.tick(),
            status: self.status_line(),
            resources: ResourceKind::STOCKS
                .iter()
                .map(|kind| (*kind, self.resource(*kind)))
                .collect(),
            lifetime: ResourceKind::STOCKS
                .iter()
                .map(|kind| (*kind, self.lifetime_total(*kind)))
                .collect(),
            oxygen_capacity: self.oxygen_capacity(),
            grid: self.grid.rows().map(|row| row.to_vec()).collect(),
            installed: self.installed.iter().collect(),
            event: self.events.active().map(|active| EventSnapshot {
                kind: active.kind,
                step: active.step.0,
                text: self.event_text().unwrap_or_default(),
                choices: self.event_choices(),
            }),
            log: self.log.lines().map(str::to_string).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EventSnapshot {
    pub kind: EventKind,
    pub step: usize,
    pub text: String,
    pub choices: Vec<ChoiceView>,
}

/// Read-only view of the world for presentation layers.
#[derive(Debug, Clone, Serialize)]
pub struct WorldSnapshot {
    pub tick: u64,
    pub status: String,
    pub resources: BTreeMap<ResourceKind, i64>,
    pub lifetime: BTreeMap<ResourceKind, i64>,
    pub oxygen_capacity: i64,
    pub grid: Vec<Vec<TileState>>,
    pub installed: BTreeMap<BuildingKind, u32>,
    pub event: Option<EventSnapshot>,
    pub log: Vec<String>,
}

impl WorldSnapshot {
    pub fn grid_size(&self) -> usize {
        GRID_SIZE
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;
    use crate::catalog::StepId;

    fn fresh_world(seed: u64) -> (World, ChaCha8Rng) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut world = World::new(WorldRules::default());
        world.initialize(&mut rng);
        (world, rng)
    }

    fn find_tile(world: &World, wanted: TileState) -> Option<(usize, usize)> {
        world
            .grid()
            .cells()
            .find(|(_, _, tile)| *tile == wanted)
            .map(|(x, y, _)| (x, y))
    }

    #[test]
    fn initialize_seeds_two_buildings_and_starts_the_intro() {
        let (world, _) = fresh_world(11);
        assert_eq!(world.tick(), 0);
        assert_eq!(world.installed().count(BuildingKind::Biodome), 1);
        assert_eq!(world.installed().count(BuildingKind::OxygenTank), 1);
        assert_eq!(world.resource(ResourceKind::Oxygen), 100);
        assert_eq!(world.resource(ResourceKind::People), 50);
        assert_eq!(
            world.active_event().map(|a| a.kind),
            Some(EventKind::Start)
        );
        assert_eq!(world.status_line(), "00:00, Day 1, 10 days until evacuation");
    }

    #[test]
    fn removing_the_last_tank_drops_oxygen_to_zero() {
        let (mut world, _) = fresh_world(5);
        world.update_resource(ResourceKind::Oxygen, 5000);
        assert_eq!(world.resource(ResourceKind::Oxygen), 1000);
        let (x, y) = find_tile(&world, TileState::Building(BuildingKind::OxygenTank)).unwrap();
        world.collapse_tile(x, y);
        assert_eq!(world.oxygen_capacity(), 0);
        assert_eq!(world.resource(ResourceKind::Oxygen), 0);
        assert!(world.resource(ResourceKind::Oxygen) <= world.oxygen_capacity());
    }

    #[test]
    fn collapsed_tiles_reject_buildings() {
        let (mut world, _) = fresh_world(9);
        world.update_resource(ResourceKind::Minerals, 1000);
        world.collapse_tile(0, 0);
        assert_eq!(
            world.place(BuildingKind::Biodome, 0, 0),
            Err(BuildError::Collapsed { x: 0, y: 0 })
        );
        assert!(!world.try_to_build(BuildingKind::Biodome, GRID_SIZE, 0));
        assert_eq!(world.resource(ResourceKind::Minerals), 1030);
    }

    #[test]
    fn harvest_station_needs_a_mineral_tile() {
        let (mut world, _) = fresh_world(21);
        world.update_resource(ResourceKind::Minerals, 1000);
        let (gx, gy) = find_tile(&world, TileState::Ground).expect("ground tile");
        assert!(!world.try_to_build(BuildingKind::HarvestStation, gx, gy));
        assert_eq!(world.log().latest(), Some("Can't build Harvest Station on this tile"));
        assert_eq!(world.resource(ResourceKind::Minerals), 1030);

        let (mx, my) = find_tile(&world, TileState::Minerals).expect("mineral tile");
        assert!(world.try_to_build(BuildingKind::HarvestStation, mx, my));
        assert_eq!(
            world.grid().get(mx, my),
            Some(TileState::Building(BuildingKind::HarvestStation))
        );
        assert_eq!(world.resource(ResourceKind::Minerals), 1010);
    }

    #[test]
    fn insufficient_resources_deduct_nothing() {
        let (mut world, _) = fresh_world(2);
        world.update_resource(ResourceKind::Gas, 5);
        let (x, y) = find_tile(&world, TileState::Ground)
            .or_else(|| find_tile(&world, TileState::Gas))
            .unwrap();
        assert!(!world.try_to_build(BuildingKind::ScienceLab, x, y));
        assert_eq!(world.log().latest(), Some("Insufficient Gas"));
        assert_eq!(world.resource(ResourceKind::Minerals), 30);
        assert_eq!(world.resource(ResourceKind::Gas), 5);
    }

    #[test]
    fn overbuilding_replaces_and_pays_again() {
        let (mut world, _) = fresh_world(4);
        world.update_resource(ResourceKind::Minerals, 70);
        let (x, y) = find_tile(&world, TileState::Building(BuildingKind::OxygenTank)).unwrap();
        assert!(world.try_to_build(BuildingKind::Biodome, x, y));
        assert_eq!(world.installed().count(BuildingKind::OxygenTank), 0);
        assert_eq!(world.resource(ResourceKind::Oxygen), 0);
        assert!(world.try_to_build(BuildingKind::Biodome, x, y));
        assert_eq!(world.installed().count(BuildingKind::Biodome), 2);
        assert_eq!(world.resource(ResourceKind::Minerals), 40);
    }

    #[test]
    fn unaffordable_choice_changes_nothing() {
        let (mut world, mut rng) = fresh_world(8);
        world.emit_event(EventKind::Magnetic);
        world.set_resource(ResourceKind::Minerals, 10);
        let shield = Transition::Goto(StepId(1));
        assert!(!world.check_step_event(shield));
        assert!(!world.event_choices()[0].enabled);
        assert!(world.event_text().unwrap().contains("(unavailable)"));
        assert!(!world.handle_step_event(shield, &mut rng));
        assert_eq!(world.resource(ResourceKind::Minerals), 10);
        assert_eq!(world.active_event().map(|a| a.step), Some(StepId::ENTRY));

        assert!(world.handle_step_event(Transition::Goto(StepId(2)), &mut rng));
        assert_eq!(world.active_event().map(|a| a.step), Some(StepId(2)));
        assert!(world.handle_step_event(Transition::Resume, &mut rng));
        assert!(!world.is_waiting());
    }

    #[test]
    fn choices_must_be_offered_by_the_current_step() {
        let (mut world, mut rng) = fresh_world(8);
        assert!(!world.handle_step_event(Transition::Restart, &mut rng));
        assert!(world.handle_step_event(Transition::Resume, &mut rng));
        assert_eq!(
            world.resolve_choice(Transition::Resume, &mut rng),
            Err(ChoiceError::NoActiveEvent)
        );
    }

    #[test]
    fn tile_count_effects_destroy_tiles() {
        let (mut world, mut rng) = fresh_world(13);
        let before = world.resource(ResourceKind::TileCount);
        world.emit_event(EventKind::StarStorm);
        assert!(world.handle_step_event(Transition::Goto(StepId(2)), &mut rng));
        let after = world.resource(ResourceKind::TileCount);
        assert!(after < before && after >= before - 2);
        assert_eq!(world.resource(ResourceKind::People), 48);
    }

    #[test]
    fn collapsing_a_collapsed_tile_is_silent() {
        let (mut world, _) = fresh_world(6);
        let (x, y) = find_tile(&world, TileState::Building(BuildingKind::Biodome)).unwrap();
        let tiles = world.resource(ResourceKind::TileCount);

        assert_eq!(world.collapse_tile(x, y), Some(BuildingKind::Biodome));
        assert_eq!(world.log().len(), 1);
        assert_eq!(world.log().latest(), Some("Biodome was lost when the ground collapsed"));

        assert_eq!(world.collapse_tile(x, y), None);
        assert_eq!(world.collapse_tile(GRID_SIZE, 0), None);
        assert_eq!(world.log().len(), 1);
        assert_eq!(world.resource(ResourceKind::TileCount), tiles - 1);
        assert_eq!(world.installed().count(BuildingKind::Biodome), 0);
    }

    #[test]
    fn affordability_follows_the_stocks() {
        let (mut world, _) = fresh_world(10);
        assert!(world.can_afford(BuildingKind::Biodome));
        assert!(!world.can_afford(BuildingKind::ScienceLab));
        world.update_resource(ResourceKind::Gas, 10);
        assert!(world.can_afford(BuildingKind::ScienceLab));
        world.set_resource(ResourceKind::Minerals, 19);
        assert!(!world.can_afford(BuildingKind::OxygenTank));
        assert_eq!(world.log().len(), 0);
    }

    #[test]
    fn terminal_text_reports_colony_totals() {
        let (mut world, _) = fresh_world(3);
        world.update_resource(ResourceKind::Minerals, 120);
        world.emit_event(EventKind::Win);
        let text = world.event_text().unwrap();
        assert!(text.contains("Minerals mined: 120"));
        assert!(text.contains("50 colonists"));
        assert!(text.ends_with("1. Play again"));
    }
}
