//! Distress alert registry
//!
//! Combat events become "distress calls" that nearby NPCs hear and weigh
//! when deciding whom to rescue. Calls decay by turn count (or wall-clock
//! seconds in the legacy mode), merge per (victim, attacker) pair, and are
//! ranked by derived sound level or protection urgency.

use serde::{Deserialize, Serialize};

use crate::core::types::{EntityId, Turn};
use crate::faction::constants::{
    DEFAULT_ALERT_ROUNDS, SOUND_BASE, SOUND_DAMAGE_CAP, SOUND_DAMAGE_FACTOR, SOUND_MAX,
    SOUND_WOUND_SPAN,
};
use crate::faction::standing::{Faction, FactionRelationshipMatrix};
use crate::faction::threat::{threat_level, CombatStats};
use crate::grid::hex::HexCoord;

/// How calls expire
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DecayMode {
    /// Expire once `current_turn - created_turn > rounds`
    Rounds(u64),
    /// Legacy: expire once `clock - created_at > seconds`
    Seconds(f64),
}

impl Default for DecayMode {
    fn default() -> Self {
        DecayMode::Rounds(DEFAULT_ALERT_ROUNDS)
    }
}

/// A recorded cry for help
///
/// At most one live call exists per (victim, attacker) pair; repeat
/// attacks merge into it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistressCall {
    pub victim: EntityId,
    pub attacker: EntityId,
    pub victim_faction: Faction,
    pub position: HexCoord,
    pub created_turn: Turn,
    /// Refreshed on every merge; used for legacy decay and recency ties
    pub created_at_seconds: f64,
    pub total_damage: f32,
    pub threat_level: f32,
    pub health_fraction: f32,
}

impl DistressCall {
    /// Derived urgency in [0, 100]
    ///
    /// Near-full health cries mildly (~20); near-death screams (~92-100);
    /// recent damage adds a capped transient boost. Pure function of the
    /// current fields, recomputed on every read.
    pub fn sound_level(&self) -> f32 {
        let wound = (1.0 - self.health_fraction.clamp(0.0, 1.0)) * SOUND_WOUND_SPAN;
        let burst = (self.total_damage * SOUND_DAMAGE_FACTOR).min(SOUND_DAMAGE_CAP);
        (SOUND_BASE + wound + burst).clamp(0.0, SOUND_MAX)
    }
}

/// Snapshot of one attack, provided by whoever resolves combat
#[derive(Debug, Clone, Copy)]
pub struct AttackReport {
    pub victim: EntityId,
    pub attacker: EntityId,
    pub victim_faction: Faction,
    pub position: HexCoord,
    pub damage: f32,
    /// Victim health in [0, 1] after the hit
    pub victim_health_fraction: f32,
    pub victim_stats: CombatStats,
}

/// Outcome of a broadcast; the call snapshot doubles as the presentation
/// event
#[derive(Debug, Clone)]
pub struct BroadcastResult {
    pub call: DistressCall,
    pub merged: bool,
}

/// Convert a legacy world-unit range to hex cells
///
/// Hex cells are the canonical range unit everywhere in the core; this is
/// the one conversion point for older content measured in world units.
pub fn world_units_to_hexes(world_range: f32, hex_size_world_units: f32) -> u32 {
    if hex_size_world_units <= 0.0 {
        return 0;
    }
    (world_range / hex_size_world_units).ceil().max(0.0) as u32
}

/// Time-decayed store of distress calls
///
/// Step-driven: the owner advances `set_turn` / `set_clock_seconds`; the
/// registry never reads real time itself.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DistressAlertRegistry {
    calls: Vec<DistressCall>,
    current_turn: Turn,
    clock_seconds: f64,
    decay: DecayMode,
}

impl DistressAlertRegistry {
    pub fn new(decay: DecayMode) -> Self {
        Self {
            calls: Vec::new(),
            current_turn: 0,
            clock_seconds: 0.0,
            decay,
        }
    }

    pub fn current_turn(&self) -> Turn {
        self.current_turn
    }

    /// Advance the turn clock; regressions are rejected
    pub fn set_turn(&mut self, turn: Turn) {
        if turn < self.current_turn {
            tracing::warn!(
                current = self.current_turn,
                requested = turn,
                "turn clock cannot move backwards"
            );
            return;
        }
        self.current_turn = turn;
    }

    /// Advance the wall clock (legacy decay mode); regressions are rejected
    pub fn set_clock_seconds(&mut self, seconds: f64) {
        if seconds < self.clock_seconds {
            tracing::warn!(
                current = self.clock_seconds,
                requested = seconds,
                "wall clock cannot move backwards"
            );
            return;
        }
        self.clock_seconds = seconds;
    }

    /// Record an attack, merging into the live (victim, attacker) call if
    /// one exists
    ///
    /// A merge accumulates damage and refreshes health fraction and
    /// timestamp in place; the creation turn keeps measuring from first
    /// contact. Returns None (reported) on a malformed report.
    pub fn broadcast(&mut self, report: AttackReport) -> Option<BroadcastResult> {
        if !report.damage.is_finite() || report.damage < 0.0 {
            tracing::warn!(damage = report.damage, "broadcast with malformed damage rejected");
            return None;
        }
        if !report.victim_health_fraction.is_finite() {
            tracing::warn!("broadcast with malformed health fraction rejected");
            return None;
        }

        let health = report.victim_health_fraction.clamp(0.0, 1.0);
        let threat = threat_level(&report.victim_stats);

        let existing = self
            .calls
            .iter_mut()
            .find(|call| call.victim == report.victim && call.attacker == report.attacker);

        if let Some(call) = existing {
            let expired = Self::expired(self.decay, self.current_turn, self.clock_seconds, call);
            if !expired {
                call.total_damage += report.damage;
                call.health_fraction = health;
                call.created_at_seconds = self.clock_seconds;
                call.position = report.position;
                call.threat_level = threat;
                return Some(BroadcastResult {
                    call: call.clone(),
                    merged: true,
                });
            }
            // Expired but not yet swept: start over
            let victim = report.victim;
            let attacker = report.attacker;
            self.calls
                .retain(|c| !(c.victim == victim && c.attacker == attacker));
        }

        let call = DistressCall {
            victim: report.victim,
            attacker: report.attacker,
            victim_faction: report.victim_faction,
            position: report.position,
            created_turn: self.current_turn,
            created_at_seconds: self.clock_seconds,
            total_damage: report.damage,
            threat_level: threat,
            health_fraction: health,
        };
        self.calls.push(call.clone());
        Some(BroadcastResult {
            call,
            merged: false,
        })
    }

    fn expired(decay: DecayMode, current_turn: Turn, clock: f64, call: &DistressCall) -> bool {
        match decay {
            DecayMode::Rounds(rounds) => {
                current_turn.saturating_sub(call.created_turn) > rounds
            }
            DecayMode::Seconds(seconds) => clock - call.created_at_seconds > seconds,
        }
    }

    fn is_live(&self, call: &DistressCall) -> bool {
        !Self::expired(self.decay, self.current_turn, self.clock_seconds, call)
    }

    /// Non-expired calls, in creation order
    pub fn active_calls(&self) -> impl Iterator<Item = &DistressCall> {
        self.calls.iter().filter(|call| self.is_live(call))
    }

    pub fn active_count(&self) -> usize {
        self.active_calls().count()
    }

    /// Drop expired calls and calls whose parties no longer resolve
    ///
    /// Queries already ignore expired calls; the sweep reclaims storage
    /// and enforces the validity contract. Run at least once per turn.
    pub fn sweep(&mut self, is_valid: impl Fn(EntityId) -> bool) {
        let decay = self.decay;
        let current_turn = self.current_turn;
        let clock = self.clock_seconds;
        self.calls.retain(|call| {
            !Self::expired(decay, current_turn, clock, call)
                && is_valid(call.victim)
                && is_valid(call.attacker)
        });
    }

    /// Calls an ally of `faction` is raising within range
    ///
    /// Same faction short-circuits the matrix. Unsorted.
    pub fn relevant_calls(
        &self,
        matrix: &FactionRelationshipMatrix,
        faction: Faction,
        position: HexCoord,
        range: u32,
    ) -> Vec<&DistressCall> {
        self.active_calls()
            .filter(|call| {
                call.victim_faction == faction || matrix.is_friendly(faction, call.victim_faction)
            })
            .filter(|call| position.distance(&call.position) <= range)
            .collect()
    }

    /// Every call within range, friend or foe
    ///
    /// Hearing is faction-blind: the listener cannot yet tell whose
    /// scream it is. `exclude` drops the listener's own calls.
    pub fn all_calls_in_range(
        &self,
        position: HexCoord,
        range: u32,
        exclude: Option<EntityId>,
    ) -> Vec<&DistressCall> {
        self.active_calls()
            .filter(|call| Some(call.victim) != exclude)
            .filter(|call| position.distance(&call.position) <= range)
            .collect()
    }

    /// The call a listener turns toward
    ///
    /// Higher sound level wins; ties go to the closer call, then the more
    /// recent one.
    pub fn loudest_call(
        &self,
        position: HexCoord,
        hearing_range: u32,
        exclude: Option<EntityId>,
    ) -> Option<&DistressCall> {
        self.all_calls_in_range(position, hearing_range, exclude)
            .into_iter()
            .reduce(|best, call| {
                let ordering = call
                    .sound_level()
                    .partial_cmp(&best.sound_level())
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then_with(|| {
                        position
                            .distance(&best.position)
                            .cmp(&position.distance(&call.position))
                    })
                    .then_with(|| {
                        call.created_at_seconds
                            .partial_cmp(&best.created_at_seconds)
                            .unwrap_or(std::cmp::Ordering::Equal)
                    });
                if ordering == std::cmp::Ordering::Greater {
                    call
                } else {
                    best
                }
            })
    }

    /// The ally most worth rescuing
    ///
    /// Protect the weak first: lower victim threat wins; ties go to the
    /// lower health fraction, then the more recent call.
    pub fn highest_priority_call(
        &self,
        matrix: &FactionRelationshipMatrix,
        faction: Faction,
        position: HexCoord,
        vision_range: u32,
        exclude: Option<EntityId>,
    ) -> Option<&DistressCall> {
        self.relevant_calls(matrix, faction, position, vision_range)
            .into_iter()
            .filter(|call| Some(call.victim) != exclude)
            .reduce(|best, call| {
                let ordering = best
                    .threat_level
                    .partial_cmp(&call.threat_level)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then_with(|| {
                        best.health_fraction
                            .partial_cmp(&call.health_fraction)
                            .unwrap_or(std::cmp::Ordering::Equal)
                    })
                    .then_with(|| {
                        call.created_at_seconds
                            .partial_cmp(&best.created_at_seconds)
                            .unwrap_or(std::cmp::Ordering::Equal)
                    });
                if ordering == std::cmp::Ordering::Greater {
                    call
                } else {
                    best
                }
            })
    }

    /// Is anyone currently attacking this entity?
    pub fn is_under_attack(&self, victim: EntityId) -> bool {
        self.active_calls().any(|call| call.victim == victim)
    }

    /// The most recent attacker of this entity, if any
    pub fn get_attacker(&self, victim: EntityId) -> Option<EntityId> {
        self.active_calls()
            .filter(|call| call.victim == victim)
            .reduce(|best, call| {
                if call.created_at_seconds > best.created_at_seconds {
                    call
                } else {
                    best
                }
            })
            .map(|call| call.attacker)
    }

    /// Drop every call (end of combat)
    pub fn clear_all(&mut self) {
        self.calls.clear();
    }

    /// Drop every call raised against one attacker (attacker death)
    pub fn clear_for_attacker(&mut self, attacker: EntityId) {
        self.calls.retain(|call| call.attacker != attacker);
    }
}
