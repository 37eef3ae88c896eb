//! Economy and resource management.
//!
//! Each resource-holding faction has one integer pool. Owned planets pay
//! their fixed rate into it once per in-game day; purchases draw from it
//! when a build starts.

use serde::{Deserialize, Serialize};

use crate::factions::Faction;
use crate::planet::Planet;

/// Resource pools of the player and the AI.
///
/// Neutral holds no pool; operations on it are no-ops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ResourcePools {
    /// Player stockpile.
    pub player: i64,
    /// AI stockpile.
    pub ai: i64,
}

impl ResourcePools {
    /// Create pools with the same starting amount for both factions.
    #[must_use]
    pub const fn new(starting: i64) -> Self {
        Self {
            player: starting,
            ai: starting,
        }
    }

    /// Current stockpile of a faction (always 0 for neutral).
    #[must_use]
    pub const fn get(&self, faction: Faction) -> i64 {
        match faction {
            Faction::Player => self.player,
            Faction::Ai => self.ai,
            Faction::Neutral => 0,
        }
    }

    fn slot_mut(&mut self, faction: Faction) -> Option<&mut i64> {
        match faction {
            Faction::Player => Some(&mut self.player),
            Faction::Ai => Some(&mut self.ai),
            Faction::Neutral => None,
        }
    }

    /// Add income to a faction's pool.
    pub fn deposit(&mut self, faction: Faction, amount: i64) {
        if let Some(pool) = self.slot_mut(faction) {
            *pool += amount;
        }
    }

    /// Check if a faction can afford a cost.
    #[must_use]
    pub const fn can_afford(&self, faction: Faction, cost: i64) -> bool {
        faction.has_resources() && self.get(faction) >= cost
    }

    /// Spend resources if available.
    ///
    /// Returns true if the transaction succeeded.
    pub fn spend(&mut self, faction: Faction, cost: i64) -> bool {
        match self.slot_mut(faction) {
            Some(pool) if *pool >= cost => {
                *pool -= cost;
                true
            }
            _ => false,
        }
    }
}

/// Income paid out at one day boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DailyIncome {
    /// Paid to the player.
    pub player: i64,
    /// Paid to the AI.
    pub ai: i64,
}

/// Sum of resource rates over the planets a faction owns right now.
pub fn daily_income<'a>(planets: impl IntoIterator<Item = &'a Planet>, faction: Faction) -> i64 {
    if !faction.has_resources() {
        return 0;
    }
    planets
        .into_iter()
        .filter(|planet| planet.owner == faction)
        .map(|planet| i64::from(planet.resource_rate))
        .sum()
}

/// Pay one day of income to every faction, based on current ownership.
///
/// Called exactly once per completed day.
pub fn advance_day<'a>(
    planets: impl IntoIterator<Item = &'a Planet>,
    pools: &mut ResourcePools,
) -> DailyIncome {
    let mut income = DailyIncome::default();

    for planet in planets {
        let rate = i64::from(planet.resource_rate);
        match planet.owner {
            Faction::Player => income.player += rate,
            Faction::Ai => income.ai += rate,
            Faction::Neutral => {}
        }
    }

    pools.deposit(Faction::Player, income.player);
    pools.deposit(Faction::Ai, income.ai);
    income
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec2Fixed;

    fn planet(name: &str, owner: Faction, rate: u32) -> Planet {
        Planet::new(name, Vec2Fixed::ZERO, owner, rate)
    }

    #[test]
    fn test_spend_and_afford() {
        let mut pools = ResourcePools::new(600);
        assert!(pools.can_afford(Faction::Player, 500));
        assert!(pools.spend(Faction::Player, 500));
        assert_eq!(pools.player, 100);
        assert!(!pools.spend(Faction::Player, 500));
        assert_eq!(pools.player, 100);
        assert_eq!(pools.ai, 600);
    }

    #[test]
    fn test_neutral_never_pays_or_earns() {
        let mut pools = ResourcePools::new(1000);
        assert!(!pools.can_afford(Faction::Neutral, 0));
        assert!(!pools.spend(Faction::Neutral, 0));
        pools.deposit(Faction::Neutral, 50);
        assert_eq!(pools, ResourcePools::new(1000));
    }

    #[test]
    fn test_advance_day_pays_owners() {
        let planets = vec![
            planet("Home", Faction::Player, 50),
            planet("Colony", Faction::Player, 15),
            planet("Enemy", Faction::Ai, 40),
            planet("Wild", Faction::Neutral, 99),
        ];
        let mut pools = ResourcePools::new(0);

        let income = advance_day(&planets, &mut pools);

        assert_eq!(income, DailyIncome { player: 65, ai: 40 });
        assert_eq!(pools.player, 65);
        assert_eq!(pools.ai, 40);
        assert_eq!(daily_income(&planets, Faction::Player), 65);
        assert_eq!(daily_income(&planets, Faction::Neutral), 0);
    }
}
