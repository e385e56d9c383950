//! Threat scoring and protection priority
//!
//! Pure combat math over stat snapshots; no entity state lives here.

use serde::{Deserialize, Serialize};

use crate::faction::constants::{
    PROTECTED_ARCHETYPE_BONUS, PROTECTION_URGENCY_SPAN, THREAT_CRIT_WEIGHT, THREAT_DAMAGE_WEIGHT,
    THREAT_HEALTH_WEIGHT, THREAT_MAX,
};

/// Combat stat snapshot used for threat assessment
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CombatStats {
    pub base_damage: f32,
    pub max_health: f32,
    /// Chance per swing of landing a critical hit, in [0, 1]
    pub crit_chance: f32,
    /// Damage multiplier on a critical hit
    pub crit_multiplier: f32,
    /// Archetypes flagged for protection (healers, couriers, civilians)
    pub protected_archetype: bool,
}

impl CombatStats {
    /// Expected critical-hit damage contributed per swing
    pub fn expected_swing_damage(&self) -> f32 {
        self.base_damage * self.crit_chance * self.crit_multiplier
    }
}

/// Combat-strength score in roughly [0, 100]; lower is weaker
pub fn threat_level(stats: &CombatStats) -> f32 {
    let raw = stats.base_damage * THREAT_DAMAGE_WEIGHT
        + stats.max_health * THREAT_HEALTH_WEIGHT
        + stats.expected_swing_damage() * THREAT_CRIT_WEIGHT;
    raw.clamp(0.0, THREAT_MAX)
}

/// How urgently this entity deserves protection
///
/// Weak entities score high (inverted threat), missing health adds
/// urgency, and protected archetypes get a flat bonus on top.
pub fn protection_priority(stats: &CombatStats, health_fraction: f32) -> f32 {
    let weakness = THREAT_MAX - threat_level(stats);
    let urgency = (1.0 - health_fraction.clamp(0.0, 1.0)) * PROTECTION_URGENCY_SPAN;
    let bonus = if stats.protected_archetype {
        PROTECTED_ARCHETYPE_BONUS
    } else {
        0.0
    };
    weakness + urgency + bonus
}
