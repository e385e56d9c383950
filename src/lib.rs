//! Cinder Keep - turn-based hex tactics simulation core

pub mod core;
pub mod faction;
pub mod grid;
pub mod turn;
