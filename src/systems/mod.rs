mod hazards;
mod life_support;
mod outcome;
mod production;

pub use hazards::{HazardSettings, HazardSystem};
pub use life_support::LifeSupportSystem;
pub use outcome::OutcomeSystem;
pub use production::ProductionSystem;
