//! Turn scheduler
//!
//! Drives the PlayerTurn -> NpcTurn -> Processing -> PlayerTurn cycle.
//! NPCs are processed one at a time, in registration order; `advance`
//! resolves one NPC per call so an external driver may pace the phase
//! however it likes. Pacing is presentational only.

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, SimError};
use crate::core::types::{EntityId, Turn};
use crate::turn::entity::EntityRegistry;
use crate::turn::events::{SimulationState, TurnEvent, TurnEventKind, TurnEventLog};

/// Sequences whose turn it is and reports phase changes
///
/// Holds entity handles only; the `EntityRegistry` owns the entities.
/// Registration changes made mid-phase take effect at the next phase
/// boundary (the NPC phase iterates a snapshot taken on entry).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnScheduler {
    state: SimulationState,
    /// Phase to restore on unpause; pausing never discards iteration state
    resume_state: SimulationState,
    turn_number: Turn,
    player: Option<EntityId>,
    npcs: Vec<EntityId>,
    turn_order: Vec<EntityId>,
    npc_cursor: usize,
    history: Vec<TurnEvent>,
}

impl Default for TurnScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl TurnScheduler {
    pub fn new() -> Self {
        Self {
            state: SimulationState::PlayerTurn,
            resume_state: SimulationState::PlayerTurn,
            turn_number: 1,
            player: None,
            npcs: Vec::new(),
            turn_order: Vec::new(),
            npc_cursor: 0,
            history: Vec::new(),
        }
    }

    pub fn state(&self) -> SimulationState {
        self.state
    }

    pub fn turn_number(&self) -> Turn {
        self.turn_number
    }

    pub fn is_paused(&self) -> bool {
        self.state == SimulationState::Paused
    }

    pub fn player(&self) -> Option<EntityId> {
        self.player
    }

    pub fn registered_npcs(&self) -> &[EntityId] {
        &self.npcs
    }

    /// Every event emitted since construction, in order
    pub fn history(&self) -> &[TurnEvent] {
        &self.history
    }

    /// Claim the single player slot
    ///
    /// The slot is explicit: there is no name or flag scan. Re-registering
    /// the same entity is a no-op; a second distinct player is rejected.
    pub fn register_player(&mut self, id: EntityId) -> Result<()> {
        match self.player {
            Some(current) if current == id => Ok(()),
            Some(current) => {
                tracing::warn!(?current, rejected = ?id, "player slot already taken");
                Err(SimError::PlayerSlotTaken(current))
            }
            None => {
                self.player = Some(id);
                Ok(())
            }
        }
    }

    /// Register an NPC; idempotent
    pub fn register_npc(&mut self, id: EntityId) {
        if !self.npcs.contains(&id) {
            self.npcs.push(id);
        }
    }

    /// Remove an entity from scheduling; idempotent
    ///
    /// Must be called before the entity is destroyed. A handle already
    /// snapshotted into the current NPC phase is skipped once it stops
    /// resolving.
    pub fn unregister_entity(&mut self, id: EntityId) {
        self.npcs.retain(|&npc| npc != id);
        if self.player == Some(id) {
            self.player = None;
        }
    }

    /// End the player's turn and enter the NPC phase
    ///
    /// Rejected as a no-op (empty log) outside PlayerTurn.
    pub fn end_player_turn(&mut self, registry: &mut EntityRegistry) -> TurnEventLog {
        let mut log = TurnEventLog::new();

        if self.state != SimulationState::PlayerTurn {
            tracing::warn!(state = ?self.state, "end_player_turn outside PlayerTurn rejected");
            return log;
        }

        if let Some(player_id) = self.player {
            if let Some(player) = registry.get_mut(player_id) {
                player.on_turn_end();
                self.emit(&mut log, TurnEventKind::EntityTurnEnded, Some(player_id));
            }
        }

        self.npc_cursor = 0;
        self.turn_order = self.npcs.clone();
        self.state = SimulationState::NpcTurn;
        self.emit(&mut log, TurnEventKind::PhaseChanged, None);

        log
    }

    /// Advance the cycle by one step
    ///
    /// In NpcTurn, resolves the next eligible NPC (or moves to Processing
    /// once the snapshot is exhausted). In Processing, runs the
    /// environment hook, bumps the turn counter, and returns to
    /// PlayerTurn. No-op while paused or during the player's turn.
    pub fn advance(&mut self, registry: &mut EntityRegistry) -> TurnEventLog {
        let mut log = TurnEventLog::new();

        match self.state {
            SimulationState::Paused => {
                tracing::warn!("advance while paused rejected");
            }
            SimulationState::PlayerTurn => {
                tracing::warn!("advance during PlayerTurn rejected; call end_player_turn");
            }
            SimulationState::NpcTurn => {
                self.advance_npc_phase(registry, &mut log);
            }
            SimulationState::Processing => {
                // Environment-wide effects hook: currently a pass-through
                self.turn_number += 1;
                self.state = SimulationState::PlayerTurn;
                self.emit(&mut log, TurnEventKind::PhaseChanged, None);

                if let Some(player_id) = self.player {
                    if let Some(player) = registry.get_mut(player_id) {
                        player.on_turn_start();
                        self.emit(&mut log, TurnEventKind::EntityTurnStarted, Some(player_id));
                    }
                }
            }
        }

        log
    }

    /// Run NPC and processing phases to completion
    pub fn advance_to_player_turn(&mut self, registry: &mut EntityRegistry) -> TurnEventLog {
        let mut log = TurnEventLog::new();
        while matches!(
            self.state,
            SimulationState::NpcTurn | SimulationState::Processing
        ) {
            let step = self.advance(registry);
            log.events.extend(step.events);
        }
        log
    }

    /// Pause or resume
    ///
    /// Pausing is legal from any running phase and preserves in-flight NPC
    /// iteration; resuming restores the interrupted phase with the cursor
    /// intact, so no phase is skipped.
    pub fn set_paused(&mut self, paused: bool) -> TurnEventLog {
        let mut log = TurnEventLog::new();

        if paused && self.state != SimulationState::Paused {
            self.resume_state = self.state;
            self.state = SimulationState::Paused;
            self.emit(&mut log, TurnEventKind::PhaseChanged, None);
        } else if !paused && self.state == SimulationState::Paused {
            self.state = self.resume_state;
            self.emit(&mut log, TurnEventKind::PhaseChanged, None);
        }

        log
    }

    fn advance_npc_phase(&mut self, registry: &mut EntityRegistry, log: &mut TurnEventLog) {
        while self.npc_cursor < self.turn_order.len() {
            let id = self.turn_order[self.npc_cursor];
            self.npc_cursor += 1;

            if self.player == Some(id) {
                continue;
            }
            let Some(entity) = registry.get_mut(id) else {
                tracing::debug!(?id, "skipping handle that no longer resolves");
                continue;
            };
            if !entity.is_active() {
                continue;
            }

            entity.on_turn_start();
            self.emit(log, TurnEventKind::EntityTurnStarted, Some(id));

            entity.take_turn();
            self.emit(log, TurnEventKind::EntityActed, Some(id));

            entity.on_turn_end();
            self.emit(log, TurnEventKind::EntityTurnEnded, Some(id));

            return;
        }

        self.state = SimulationState::Processing;
        self.emit(log, TurnEventKind::PhaseChanged, None);
    }

    fn emit(&mut self, log: &mut TurnEventLog, kind: TurnEventKind, acting: Option<EntityId>) {
        let event = TurnEvent {
            turn_number: self.turn_number,
            state: self.state,
            acting_entity: acting,
            kind,
        };
        self.history.push(event.clone());
        log.push(event);
    }
}
