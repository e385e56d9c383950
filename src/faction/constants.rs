//! Faction and alert engine constants - all tunable values in one place

// Sound level (0-100): base call volume plus wound and fresh-damage terms
pub const SOUND_BASE: f32 = 20.0;
pub const SOUND_WOUND_SPAN: f32 = 80.0;
pub const SOUND_DAMAGE_FACTOR: f32 = 0.5;
pub const SOUND_DAMAGE_CAP: f32 = 20.0;
pub const SOUND_MAX: f32 = 100.0;

// Threat level weights; weighted sum lands roughly in 0-100 for ordinary
// combatants (damage ~10, health ~100, crit ~10% at x2)
pub const THREAT_DAMAGE_WEIGHT: f32 = 1.5;
pub const THREAT_HEALTH_WEIGHT: f32 = 0.25;
pub const THREAT_CRIT_WEIGHT: f32 = 1.0;
pub const THREAT_MAX: f32 = 100.0;

// Protection priority: weak-first base plus urgency from missing health
pub const PROTECTION_URGENCY_SPAN: f32 = 50.0;
pub const PROTECTED_ARCHETYPE_BONUS: f32 = 25.0;

// Alert decay defaults (turn-based, and the legacy wall-clock window)
pub const DEFAULT_ALERT_ROUNDS: u64 = 3;
pub const DEFAULT_ALERT_SECONDS: f64 = 30.0;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sound_terms_fill_the_scale() {
        // A silent-health call plus full wound and damage terms reaches the cap
        assert_eq!(SOUND_BASE + SOUND_WOUND_SPAN, SOUND_MAX);
        assert!(SOUND_DAMAGE_CAP < SOUND_BASE + SOUND_WOUND_SPAN);
    }

    #[test]
    fn test_alert_windows_positive() {
        assert!(DEFAULT_ALERT_ROUNDS > 0);
        assert!(DEFAULT_ALERT_SECONDS > 0.0);
    }

    #[test]
    fn test_protection_bonus_below_urgency_span() {
        assert!(PROTECTED_ARCHETYPE_BONUS < PROTECTION_URGENCY_SPAN);
    }
}
