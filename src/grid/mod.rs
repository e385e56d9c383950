//! Hex grid: coordinates, terrain, map queries, pathfinding, movement

pub mod hex;
pub mod map;
pub mod movement;
pub mod pathfinding;
pub mod terrain;

pub use hex::HexCoord;
pub use map::{Cell, CellInfo, HexGrid};
pub use movement::PathProgress;
pub use pathfinding::{find_path, path_cost, Path};
pub use terrain::{Terrain, IMPASSABLE_COST};
