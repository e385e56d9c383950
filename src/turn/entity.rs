//! Turn-taking entities and their registry
//!
//! The scheduler never owns entities: it holds handles, and the registry
//! here is owned by the application layer. An entity destroyed externally
//! must be unregistered first; a handle that no longer resolves is skipped,
//! never dereferenced.

use ahash::AHashMap;

use crate::core::types::EntityId;

/// Capability set every turn-taking entity provides
pub trait TurnEntity {
    fn name(&self) -> &str;

    /// Inactive entities are skipped by the scheduler
    fn is_active(&self) -> bool;

    fn action_points(&self) -> u32;

    fn max_action_points(&self) -> u32;

    fn on_turn_start(&mut self);

    fn take_turn(&mut self);

    fn on_turn_end(&mut self);

    /// Spend from the per-turn pool
    ///
    /// Returns false (and deducts nothing) when the pool is short.
    fn consume_action_points(&mut self, amount: u32) -> bool;
}

/// The player-controlled entity
///
/// `take_turn` is a no-op: player actions arrive from input between
/// `on_turn_start` and `end_player_turn`.
#[derive(Debug, Clone)]
pub struct Player {
    pub name: String,
    pub active: bool,
    pub action_points: u32,
    pub max_action_points: u32,
}

impl Player {
    pub fn new(name: impl Into<String>, max_action_points: u32) -> Self {
        Self {
            name: name.into(),
            active: true,
            action_points: max_action_points,
            max_action_points,
        }
    }
}

impl TurnEntity for Player {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn action_points(&self) -> u32 {
        self.action_points
    }

    fn max_action_points(&self) -> u32 {
        self.max_action_points
    }

    fn on_turn_start(&mut self) {
        self.action_points = self.max_action_points;
    }

    fn take_turn(&mut self) {}

    fn on_turn_end(&mut self) {}

    fn consume_action_points(&mut self, amount: u32) -> bool {
        if amount > self.action_points {
            return false;
        }
        self.action_points -= amount;
        true
    }
}

/// A scheduler-driven NPC
#[derive(Debug, Clone)]
pub struct Npc {
    pub name: String,
    pub active: bool,
    pub action_points: u32,
    pub max_action_points: u32,
}

impl Npc {
    pub fn new(name: impl Into<String>, max_action_points: u32) -> Self {
        Self {
            name: name.into(),
            active: true,
            action_points: max_action_points,
            max_action_points,
        }
    }
}

impl TurnEntity for Npc {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn action_points(&self) -> u32 {
        self.action_points
    }

    fn max_action_points(&self) -> u32 {
        self.max_action_points
    }

    fn on_turn_start(&mut self) {
        self.action_points = self.max_action_points;
    }

    fn take_turn(&mut self) {
        tracing::debug!(name = %self.name, ap = self.action_points, "npc acting");
        self.consume_action_points(1);
    }

    fn on_turn_end(&mut self) {}

    fn consume_action_points(&mut self, amount: u32) -> bool {
        if amount > self.action_points {
            return false;
        }
        self.action_points -= amount;
        true
    }
}

/// Owning store of live entities, keyed by handle
#[derive(Default)]
pub struct EntityRegistry {
    entities: AHashMap<EntityId, Box<dyn TurnEntity>>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: EntityId, entity: Box<dyn TurnEntity>) {
        self.entities.insert(id, entity);
    }

    pub fn remove(&mut self, id: EntityId) -> Option<Box<dyn TurnEntity>> {
        self.entities.remove(&id)
    }

    pub fn get(&self, id: EntityId) -> Option<&dyn TurnEntity> {
        self.entities.get(&id).map(|e| e.as_ref())
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Box<dyn TurnEntity>> {
        self.entities.get_mut(&id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}
