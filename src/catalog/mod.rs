//! Fixed game data: resource kinds, tile kinds, buildings and events.

mod buildings;
mod events;

use serde::{Deserialize, Serialize};

pub use buildings::{BuildingInfo, BuildingKind, Production};
pub use events::{Choice, EventDefinition, EventKind, Step, StepId, Transition};

/// Ticks in one in-game day. One tick is one hour.
pub const DAY_TICKS: u64 = 24;

/// Side length of the square colony grid.
pub const GRID_SIZE: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    People,
    Food,
    Oxygen,
    Minerals,
    Gas,
    Science,
    DaysUntilEvacuation,
    /// Pseudo-resource: number of intact tiles. Negative deltas destroy tiles.
    TileCount,
}

impl ResourceKind {
    /// Every stock held by the ledger, in display order.
    pub const STOCKS: [ResourceKind; 7] = [
        ResourceKind::People,
        ResourceKind::Food,
        ResourceKind::Oxygen,
        ResourceKind::Minerals,
        ResourceKind::Gas,
        ResourceKind::Science,
        ResourceKind::DaysUntilEvacuation,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            ResourceKind::People => "People",
            ResourceKind::Food => "Food",
            ResourceKind::Oxygen => "Oxygen",
            ResourceKind::Minerals => "Minerals",
            ResourceKind::Gas => "Gas",
            ResourceKind::Science => "Science",
            ResourceKind::DaysUntilEvacuation => "Days until evacuation",
            ResourceKind::TileCount => "Tiles",
        }
    }
}

/// Contents of one grid cell. A built cell forgets the terrain beneath it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TileState {
    Collapsed,
    Ground,
    Minerals,
    Gas,
    Building(BuildingKind),
}

impl TileState {
    /// Terrain kinds picked from during generation.
    pub const TERRAIN: [TileState; 3] = [TileState::Ground, TileState::Minerals, TileState::Gas];

    pub fn is_collapsed(self) -> bool {
        matches!(self, TileState::Collapsed)
    }

    pub fn building(self) -> Option<BuildingKind> {
        match self {
            TileState::Building(kind) => Some(kind),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            TileState::Collapsed => "Collapsed",
            TileState::Ground => "Ground",
            TileState::Minerals => "Mineral deposit",
            TileState::Gas => "Gas geyser",
            TileState::Building(kind) => kind.info().name,
        }
    }

    /// Source rect of this tile in the isometric sprite sheet.
    pub fn atlas_rect(self) -> AtlasRect {
        let column = match self {
            TileState::Collapsed => 0,
            TileState::Ground => 1,
            TileState::Minerals => 2,
            TileState::Gas => 3,
            TileState::Building(kind) => 4 + kind as u32,
        };
        AtlasRect {
            x: column * AtlasRect::TILE,
            y: 0,
            width: AtlasRect::TILE,
            height: AtlasRect::TILE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AtlasRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl AtlasRect {
    pub const TILE: u32 = 64;
}
