//! Hex grid with terrain and an occupancy index

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::types::EntityId;
use crate::grid::hex::HexCoord;
use crate::grid::terrain::Terrain;

/// A single cell on the grid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cell {
    pub coord: HexCoord,
    pub terrain: Terrain,
}

impl Cell {
    pub fn new(coord: HexCoord, terrain: Terrain) -> Self {
        Self { coord, terrain }
    }
}

/// Read-only view of a cell, as consumed by pathfinding and AI queries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellInfo {
    pub walkable: bool,
    pub movement_cost: u32,
    pub occupied: bool,
}

/// The full grid
///
/// Cells are owned here; the occupancy index is a weak relation
/// (coordinate to entity handle, lookup only) maintained by whoever moves
/// an entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HexGrid {
    cells: AHashMap<HexCoord, Cell>,
    occupants: AHashMap<HexCoord, EntityId>,
    pub width: u32,
    pub height: u32,
}

impl HexGrid {
    /// Create a rectangular grid of open floor
    pub fn new(width: u32, height: u32) -> Self {
        let mut cells = AHashMap::new();

        for q in 0..width as i32 {
            for r in 0..height as i32 {
                let coord = HexCoord::new(q, r);
                cells.insert(coord, Cell::new(coord, Terrain::Floor));
            }
        }

        Self {
            cells,
            occupants: AHashMap::new(),
            width,
            height,
        }
    }

    /// Read view of a cell; None outside the grid
    pub fn get_cell(&self, coord: HexCoord) -> Option<CellInfo> {
        self.cells.get(&coord).map(|cell| CellInfo {
            walkable: cell.terrain.is_walkable(),
            movement_cost: cell.terrain.movement_cost(),
            occupied: self.occupants.contains_key(&coord),
        })
    }

    /// Set terrain at a coordinate (no-op outside the grid)
    pub fn set_terrain(&mut self, coord: HexCoord, terrain: Terrain) {
        if let Some(cell) = self.cells.get_mut(&coord) {
            cell.terrain = terrain;
        }
    }

    /// Check if coordinate is within grid bounds
    pub fn in_bounds(&self, coord: HexCoord) -> bool {
        self.cells.contains_key(&coord)
    }

    /// Record an entity as standing on a cell
    ///
    /// Returns false (and changes nothing) if the cell is missing,
    /// unwalkable, or already held by a different entity.
    pub fn occupy(&mut self, coord: HexCoord, entity: EntityId) -> bool {
        let walkable = self
            .cells
            .get(&coord)
            .map(|cell| cell.terrain.is_walkable())
            .unwrap_or(false);
        if !walkable {
            return false;
        }
        match self.occupants.get(&coord) {
            Some(current) if *current != entity => false,
            _ => {
                self.occupants.insert(coord, entity);
                true
            }
        }
    }

    /// Clear the occupant of a cell, returning who stood there
    pub fn vacate(&mut self, coord: HexCoord) -> Option<EntityId> {
        self.occupants.remove(&coord)
    }

    /// Who stands on a cell, if anyone
    pub fn occupant_at(&self, coord: HexCoord) -> Option<EntityId> {
        self.occupants.get(&coord).copied()
    }
}
