pub mod catalog;
pub mod clock;
pub mod engine;
pub mod events;
pub mod grid;
pub mod log;
pub mod resources;
pub mod rng;
pub mod scenario;
pub mod systems;
pub mod world;

pub use engine::{Engine, EngineBuilder, EngineSettings, TickSummary};
pub use scenario::{Scenario, ScenarioLoader};
pub use world::{World, WorldSnapshot};
