//! Factions, standings, threat scoring, and the distress alert engine

pub mod constants;
pub mod distress;
pub mod standing;
pub mod threat;

pub use constants::*;
pub use distress::{
    world_units_to_hexes, AttackReport, BroadcastResult, DecayMode, DistressAlertRegistry,
    DistressCall,
};
pub use standing::{Faction, FactionRelationshipMatrix, FactionStanding};
pub use threat::{protection_priority, threat_level, CombatStats};
