//! Simulation configuration with documented tunables
//!
//! Pacing and perception values are collected here so a scenario can adjust
//! them without touching code. Combat-math weights live with the math in
//! `crate::faction::constants`.

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, SimError};

/// Configuration for the simulation core
///
/// These values affect pacing and perception, not correctness: the turn
/// cycle and the alert engine behave identically at any legal setting.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    // === ALERT DECAY ===
    /// How many full turns a distress call stays audible
    ///
    /// A call created on turn T expires once `current - T > alert_duration_rounds`.
    /// At the default (3), a call broadcast on turn 1 is live through turn 4.
    pub alert_duration_rounds: u64,

    /// Wall-clock lifetime of a distress call, in seconds
    ///
    /// Only consulted when the registry runs in the legacy time-based decay
    /// mode kept for older scenario content.
    pub alert_duration_seconds: f64,

    // === TURN PACING ===
    /// Delay between NPC turns, in milliseconds
    ///
    /// Purely presentational: an external driver may sleep this long between
    /// `advance` calls so observers can follow the action. Zero means NPCs
    /// resolve back-to-back.
    pub npc_turn_delay_ms: u64,

    // === PERCEPTION (hex cells) ===
    /// Default range at which an NPC hears distress calls
    pub hearing_range: u32,

    /// Default range at which an NPC can see and assess a victim
    pub vision_range: u32,

    /// Width of one hex cell in world units
    ///
    /// Used only to convert legacy world-unit ranges into hex cells; every
    /// range inside the core is measured in hex cells.
    pub hex_size_world_units: f32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            alert_duration_rounds: 3,
            alert_duration_seconds: 30.0,
            npc_turn_delay_ms: 0,
            hearing_range: 8,
            vision_range: 6,
            hex_size_world_units: 2.0,
        }
    }
}

impl SimulationConfig {
    /// Parse a configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: SimulationConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a TOML file
    pub fn load(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Reject settings that would make alerts undetectable or never expire
    pub fn validate(&self) -> Result<()> {
        if self.alert_duration_seconds <= 0.0 {
            return Err(SimError::InvalidConfig(
                "alert_duration_seconds must be positive".into(),
            ));
        }
        if self.hex_size_world_units <= 0.0 {
            return Err(SimError::InvalidConfig(
                "hex_size_world_units must be positive".into(),
            ));
        }
        if self.hearing_range == 0 {
            return Err(SimError::InvalidConfig("hearing_range must be at least 1".into()));
        }
        Ok(())
    }
}
