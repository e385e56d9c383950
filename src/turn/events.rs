//! Turn-cycle events
//!
//! Mutating scheduler operations return the events they produced, in
//! emission order; the scheduler also keeps an append-only history. There
//! is no hidden broadcast: presentation layers consume the returned log.

use serde::{Deserialize, Serialize};

use crate::core::types::{EntityId, Turn};

/// Simulation phase
///
/// Exactly one value is active at a time; transitions are the only way to
/// change it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SimulationState {
    #[default]
    PlayerTurn,
    NpcTurn,
    Processing,
    Paused,
}

/// What a turn event records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnEventKind {
    PhaseChanged,
    EntityTurnStarted,
    EntityActed,
    EntityTurnEnded,
}

/// Notification emitted on every phase transition and entity turn callback
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnEvent {
    pub turn_number: Turn,
    pub state: SimulationState,
    pub acting_entity: Option<EntityId>,
    pub kind: TurnEventKind,
}

/// Events produced by a single scheduler operation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TurnEventLog {
    pub events: Vec<TurnEvent>,
}

impl TurnEventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: TurnEvent) {
        self.events.push(event);
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TurnEvent> {
        self.events.iter()
    }
}
