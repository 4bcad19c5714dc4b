use serde::{Deserialize, Serialize};

use super::{ResourceKind, TileState, DAY_TICKS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildingKind {
    Biodome,
    OxygenTank,
    HarvestStation,
    Refinery,
    ScienceLab,
}

/// `amount` of `resource` added every `period` ticks per installed building.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Production {
    pub resource: ResourceKind,
    pub amount: i64,
    pub period: u64,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct BuildingInfo {
    pub kind: BuildingKind,
    pub name: &'static str,
    pub description: &'static str,
    pub cost: &'static [(ResourceKind, i64)],
    pub production: &'static [Production],
    /// Empty means any tile that has not collapsed.
    pub allowed_tiles: &'static [TileState],
}

impl BuildingInfo {
    pub fn can_place_on(&self, tile: TileState) -> bool {
        if tile.is_collapsed() {
            return false;
        }
        self.allowed_tiles.is_empty() || self.allowed_tiles.contains(&tile)
    }
}

const BIODOME: BuildingInfo = BuildingInfo {
    kind: BuildingKind::Biodome,
    name: "Biodome",
    description: "Can be placed on any tile. Grows 25 food per day and releases 50 oxygen every two hours.",
    cost: &[(ResourceKind::Minerals, 30)],
    production: &[
        Production {
            resource: ResourceKind::Food,
            amount: 25,
            period: DAY_TICKS,
        },
        Production {
            resource: ResourceKind::Oxygen,
            amount: 50,
            period: DAY_TICKS / 12,
        },
    ],
    allowed_tiles: &[],
};

const OXYGEN_TANK: BuildingInfo = BuildingInfo {
    kind: BuildingKind::OxygenTank,
    name: "Oxygen Tank",
    description: "Can be placed on any tile. Stores 1000 oxygen inside.",
    cost: &[(ResourceKind::Minerals, 20)],
    production: &[],
    allowed_tiles: &[],
};

const HARVEST_STATION: BuildingInfo = BuildingInfo {
    kind: BuildingKind::HarvestStation,
    name: "Harvest Station",
    description: "Can be placed only on a mineral tile. Mines 100 minerals per day.",
    cost: &[(ResourceKind::Minerals, 20)],
    production: &[Production {
        resource: ResourceKind::Minerals,
        amount: 100,
        period: DAY_TICKS,
    }],
    allowed_tiles: &[TileState::Minerals],
};

const REFINERY: BuildingInfo = BuildingInfo {
    kind: BuildingKind::Refinery,
    name: "Refinery",
    description: "Can be placed only on a geyser tile. Refines 50 gas per day.",
    cost: &[(ResourceKind::Minerals, 40)],
    production: &[Production {
        resource: ResourceKind::Gas,
        amount: 50,
        period: DAY_TICKS,
    }],
    allowed_tiles: &[TileState::Gas],
};

const SCIENCE_LAB: BuildingInfo = BuildingInfo {
    kind: BuildingKind::ScienceLab,
    name: "Science Laboratory",
    description: "Can be placed on any tile. Produces 50 scientific data per day.",
    cost: &[(ResourceKind::Minerals, 30), (ResourceKind::Gas, 10)],
    production: &[Production {
        resource: ResourceKind::Science,
        amount: 50,
        period: DAY_TICKS,
    }],
    allowed_tiles: &[],
};

impl BuildingKind {
    pub const ALL: [BuildingKind; 5] = [
        BuildingKind::Biodome,
        BuildingKind::OxygenTank,
        BuildingKind::HarvestStation,
        BuildingKind::Refinery,
        BuildingKind::ScienceLab,
    ];

    pub fn info(self) -> &'static BuildingInfo {
        match self {
            BuildingKind::Biodome => &BIODOME,
            BuildingKind::OxygenTank => &OXYGEN_TANK,
            BuildingKind::HarvestStation => &HARVEST_STATION,
            BuildingKind::Refinery => &REFINERY,
            BuildingKind::ScienceLab => &SCIENCE_LAB,
        }
    }

    pub fn catalog() -> impl Iterator<Item = &'static BuildingInfo> {
        Self::ALL.iter().map(|kind| kind.info())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_entries_match_their_kind() {
        for kind in BuildingKind::ALL {
            assert_eq!(kind.info().kind, kind);
            assert!(kind.info().cost.iter().all(|(_, amount)| *amount > 0));
            assert!(kind.info().production.iter().all(|p| p.period > 0));
        }
    }

    #[test]
    fn restricted_buildings_reject_other_terrain() {
        let station = BuildingKind::HarvestStation.info();
        assert!(station.can_place_on(TileState::Minerals));
        assert!(!station.can_place_on(TileState::Ground));
        assert!(!station.can_place_on(TileState::Gas));
        assert!(!BuildingKind::Biodome.info().can_place_on(TileState::Collapsed));
        assert!(BuildingKind::Biodome
            .info()
            .can_place_on(TileState::Building(BuildingKind::Refinery)));
    }
}
