//! Faction identifiers and the relationship matrix

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::error::Result;

/// Closed set of factions
///
/// Stable identifiers: factions are never created or destroyed at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Faction {
    Player,
    Militia,
    Marauders,
    Wildlife,
    Revenants,
}

impl Faction {
    /// All factions
    pub fn all() -> [Faction; 5] {
        [
            Faction::Player,
            Faction::Militia,
            Faction::Marauders,
            Faction::Wildlife,
            Faction::Revenants,
        ]
    }
}

/// Directed attitude of one faction toward another
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub enum FactionStanding {
    Hostile,
    Unfriendly,
    #[default]
    Neutral,
    Friendly,
    Allied,
}

/// Sparse directed standing table
///
/// Entries absent from the table resolve to the configured default.
/// Relationships are intentionally asymmetric: setting one direction never
/// touches the reverse.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FactionRelationshipMatrix {
    relations: AHashMap<Faction, AHashMap<Faction, FactionStanding>>,
    default_standing: FactionStanding,
}

impl Default for FactionRelationshipMatrix {
    fn default() -> Self {
        Self::new(FactionStanding::Neutral)
    }
}

/// On-disk form of the standing table
#[derive(Debug, Deserialize)]
struct MatrixFile {
    #[serde(default)]
    default: Option<FactionStanding>,
    #[serde(default)]
    standings: AHashMap<Faction, AHashMap<Faction, FactionStanding>>,
}

impl FactionRelationshipMatrix {
    pub fn new(default_standing: FactionStanding) -> Self {
        Self {
            relations: AHashMap::new(),
            default_standing,
        }
    }

    /// The stock campaign table
    ///
    /// Militia and Player defend each other; Marauders prey on both;
    /// Revenants hate everything that breathes, and the feeling is mutual.
    pub fn standard() -> Self {
        let mut matrix = Self::new(FactionStanding::Neutral);
        matrix.set_standing(Faction::Player, Faction::Militia, FactionStanding::Friendly);
        matrix.set_standing(Faction::Militia, Faction::Player, FactionStanding::Friendly);
        matrix.set_standing(Faction::Player, Faction::Marauders, FactionStanding::Hostile);
        matrix.set_standing(Faction::Marauders, Faction::Player, FactionStanding::Hostile);
        matrix.set_standing(Faction::Militia, Faction::Marauders, FactionStanding::Hostile);
        matrix.set_standing(Faction::Marauders, Faction::Militia, FactionStanding::Hostile);
        matrix.set_standing(Faction::Marauders, Faction::Wildlife, FactionStanding::Unfriendly);
        for faction in Faction::all() {
            if faction != Faction::Revenants {
                matrix.set_standing(Faction::Revenants, faction, FactionStanding::Hostile);
                matrix.set_standing(faction, Faction::Revenants, FactionStanding::Hostile);
            }
        }
        matrix
    }

    /// Parse a standing table from TOML text
    ///
    /// ```toml
    /// default = "Neutral"
    ///
    /// [standings.Militia]
    /// Player = "Friendly"
    /// Marauders = "Hostile"
    /// ```
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: MatrixFile = toml::from_str(content)?;
        let mut matrix = Self::new(file.default.unwrap_or_default());
        for (source, targets) in file.standings {
            for (target, standing) in targets {
                matrix.set_standing(source, target, standing);
            }
        }
        Ok(matrix)
    }

    /// How `source` views `target`
    ///
    /// The self-relationship is always Allied, regardless of table
    /// contents; unknown pairs fall back to the default.
    pub fn get_standing(&self, source: Faction, target: Faction) -> FactionStanding {
        if source == target {
            return FactionStanding::Allied;
        }
        self.relations
            .get(&source)
            .and_then(|targets| targets.get(&target))
            .copied()
            .unwrap_or(self.default_standing)
    }

    /// Overwrite a single directed entry
    pub fn set_standing(&mut self, source: Faction, target: Faction, standing: FactionStanding) {
        self.relations
            .entry(source)
            .or_default()
            .insert(target, standing);
    }

    pub fn is_friendly(&self, source: Faction, target: Faction) -> bool {
        self.get_standing(source, target) >= FactionStanding::Friendly
    }

    pub fn is_enemy(&self, source: Faction, target: Faction) -> bool {
        self.get_standing(source, target) == FactionStanding::Hostile
    }

    pub fn is_neutral(&self, source: Faction, target: Faction) -> bool {
        self.get_standing(source, target) == FactionStanding::Neutral
    }
}
