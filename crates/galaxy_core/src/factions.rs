//! Faction definitions and identifiers.

use serde::{Deserialize, Serialize};

/// Who controls a planet or a fleet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Faction {
    /// The human player.
    Player,
    /// The computer opponent. Accrues resources but never spends them.
    Ai,
    /// Unclaimed. Owns no resources and cannot build.
    Neutral,
}

impl Faction {
    /// Factions that hold a resource pool.
    pub const WITH_RESOURCES: [Self; 2] = [Self::Player, Self::Ai];

    /// Get the display name for this faction.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Player => "Player",
            Self::Ai => "AI",
            Self::Neutral => "Neutral",
        }
    }

    /// Whether this faction accrues income and can own fleets.
    #[must_use]
    pub const fn has_resources(&self) -> bool {
        !matches!(self, Self::Neutral)
    }
}

impl std::fmt::Display for Faction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}
