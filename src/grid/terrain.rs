//! Terrain types and their movement effects

use serde::{Deserialize, Serialize};

/// Movement cost at or above this value marks a cell impassable
pub const IMPASSABLE_COST: u32 = 999;

/// Primary terrain type for a grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Terrain {
    #[default]
    Floor, // No movement penalty
    Flagstone, // Paved, no penalty
    Rubble,    // Slight penalty
    Mire,      // Heavy penalty
    Wall,      // Impassable
    Chasm,     // Impassable
}

impl Terrain {
    /// Movement cost to enter a cell of this terrain (1 = normal)
    pub fn movement_cost(&self) -> u32 {
        match self {
            Terrain::Floor => 1,
            Terrain::Flagstone => 1,
            Terrain::Rubble => 2,
            Terrain::Mire => 4,
            Terrain::Wall => IMPASSABLE_COST,
            Terrain::Chasm => IMPASSABLE_COST,
        }
    }

    /// Can entities stand on and move through this terrain?
    pub fn is_walkable(&self) -> bool {
        self.movement_cost() < IMPASSABLE_COST
    }
}
