use std::collections::BTreeMap;

use rand::Rng;

use crate::catalog::{BuildingKind, TileState, GRID_SIZE};

/// Fixed square map of tile states, indexed as `(x, y)`.
#[derive(Debug, Clone)]
pub struct Grid {
    cells: [[TileState; GRID_SIZE]; GRID_SIZE],
}

impl Default for Grid {
    fn default() -> Self {
        Self {
            cells: [[TileState::Ground; GRID_SIZE]; GRID_SIZE],
        }
    }
}

impl Grid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fills every cell with random terrain. Buildings are overwritten, so
    /// this is only meant for world initialization.
    pub fn generate<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for row in self.cells.iter_mut() {
            for cell in row.iter_mut() {
                *cell = TileState::TERRAIN[rng.gen_range(0..TileState::TERRAIN.len())];
            }
        }
    }

    pub fn size(&self) -> usize {
        GRID_SIZE
    }

    pub fn in_bounds(&self, x: usize, y: usize) -> bool {
        x < GRID_SIZE && y < GRID_SIZE
    }

    pub fn get(&self, x: usize, y: usize) -> Option<TileState> {
        self.cells.get(y).and_then(|row| row.get(x)).copied()
    }

    /// Returns the previous state, or `None` when out of bounds.
    pub fn set(&mut self, x: usize, y: usize, tile: TileState) -> Option<TileState> {
        let cell = self.cells.get_mut(y)?.get_mut(x)?;
        Some(std::mem::replace(cell, tile))
    }

    pub fn random_cell<R: Rng + ?Sized>(&self, rng: &mut R) -> (usize, usize) {
        (rng.gen_range(0..GRID_SIZE), rng.gen_range(0..GRID_SIZE))
    }

    /// Number of cells that have not collapsed.
    pub fn intact_count(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|tile| !tile.is_collapsed())
            .count()
    }

    pub fn rows(&self) -> impl Iterator<Item = &[TileState; GRID_SIZE]> {
        self.cells.iter()
    }

    /// Every cell with its coordinates, row by row.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, TileState)> + '_ {
        self.cells.iter().enumerate().flat_map(|(y, row)| {
            row.iter().enumerate().map(move |(x, tile)| (x, y, *tile))
        })
    }
}

/// Count of each building kind currently standing on the grid.
#[derive(Debug, Clone, Default)]
pub struct InstalledBuildings {
    counts: BTreeMap<BuildingKind, u32>,
}

impl InstalledBuildings {
    pub fn add(&mut self, kind: BuildingKind) {
        *self.counts.entry(kind).or_insert(0) += 1;
    }

    pub fn remove(&mut self, kind: BuildingKind) {
        if let Some(count) = self.counts.get_mut(&kind) {
            *count -= 1;
            if *count == 0 {
                self.counts.remove(&kind);
            }
        }
    }

    pub fn count(&self, kind: BuildingKind) -> u32 {
        self.counts.get(&kind).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u32 {
        self.counts.values().sum()
    }

    pub fn clear(&mut self) {
        self.counts.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (BuildingKind, u32)> + '_ {
        self.counts.iter().map(|(kind, count)| (*kind, *count))
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    #[test]
    fn generation_only_produces_terrain() {
        let mut grid = Grid::new();
        grid.generate(&mut ChaCha8Rng::seed_from_u64(3));
        assert!(grid
            .cells()
            .all(|(_, _, tile)| TileState::TERRAIN.contains(&tile)));
        assert_eq!(grid.intact_count(), GRID_SIZE * GRID_SIZE);
    }

    #[test]
    fn out_of_bounds_access_is_rejected() {
        let mut grid = Grid::new();
        assert_eq!(grid.get(GRID_SIZE, 0), None);
        assert_eq!(grid.set(0, GRID_SIZE, TileState::Collapsed), None);
        assert_eq!(grid.set(1, 2, TileState::Collapsed), Some(TileState::Ground));
        assert_eq!(grid.get(1, 2), Some(TileState::Collapsed));
        assert_eq!(grid.intact_count(), GRID_SIZE * GRID_SIZE - 1);
    }

    #[test]
    fn installed_counts_track_a_multiset() {
        let mut installed = InstalledBuildings::default();
        installed.add(BuildingKind::OxygenTank);
        installed.add(BuildingKind::OxygenTank);
        installed.add(BuildingKind::Biodome);
        installed.remove(BuildingKind::OxygenTank);
        installed.remove(BuildingKind::Refinery);
        assert_eq!(installed.count(BuildingKind::OxygenTank), 1);
        assert_eq!(installed.count(BuildingKind::Refinery), 0);
        assert_eq!(installed.total(), 2);
    }
}
