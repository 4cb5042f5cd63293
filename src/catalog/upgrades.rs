//! Permanent upgrades bought with spendable XP.

use serde::{Deserialize, Serialize};

use crate::progression;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpgradeId {
    Speed,
    ScoreMultiplier,
    PowerUpDuration,
    XpBonus,
    FoodMagnet,
    PowerUpSpawn,
}

impl UpgradeId {
    pub const ALL: [UpgradeId; 6] = [
        UpgradeId::Speed,
        UpgradeId::ScoreMultiplier,
        UpgradeId::PowerUpDuration,
        UpgradeId::XpBonus,
        UpgradeId::FoodMagnet,
        UpgradeId::PowerUpSpawn,
    ];

    /// Stable identifier used in save data.
    pub fn key(self) -> &'static str {
        match self {
            UpgradeId::Speed => "speed",
            UpgradeId::ScoreMultiplier => "scoreMultiplier",
            UpgradeId::PowerUpDuration => "powerUpDuration",
            UpgradeId::XpBonus => "xpBonus",
            UpgradeId::FoodMagnet => "foodMagnet",
            UpgradeId::PowerUpSpawn => "powerUpSpawn",
        }
    }

    pub fn from_key(key: &str) -> Option<UpgradeId> {
        UpgradeId::ALL.iter().copied().find(|id| id.key() == key)
    }
}

/// One upgrade track: static pricing plus the player's current level.
#[derive(Debug, Clone, Serialize)]
pub struct Upgrade {
    pub id: UpgradeId,
    pub name: &'static str,
    pub description: &'static str,
    /// XP price of level 1; later levels scale by 1.5x per level
    pub base_cost: u64,
    pub max_level: u32,
    pub level: u32,
}

impl Upgrade {
    /// XP price of the next rank.
    pub fn next_cost(&self) -> u64 {
        progression::upgrade_cost(self.base_cost, self.level)
    }

    pub fn maxed(&self) -> bool {
        self.level >= self.max_level
    }

    /// Numeric bonus at the current level. Meaning depends on the
    /// track: percent for Speed and PowerUpSpawn, a multiplier for
    /// ScoreMultiplier, PowerUpDuration and XpBonus, grid cells for
    /// FoodMagnet.
    pub fn effect(&self) -> f64 {
        effect_at(self.id, self.level)
    }
}

/// Bonus granted by an upgrade track at a given level.
pub fn effect_at(id: UpgradeId, level: u32) -> f64 {
    let level = level as f64;
    match id {
        UpgradeId::Speed => level * 10.0,
        UpgradeId::ScoreMultiplier => 1.0 + level * 0.25,
        UpgradeId::PowerUpDuration => 1.0 + level * 0.3,
        UpgradeId::XpBonus => 1.0 + level * 0.2,
        UpgradeId::FoodMagnet => level * 2.0,
        UpgradeId::PowerUpSpawn => level * 15.0,
    }
}

pub fn create_upgrades() -> Vec<Upgrade> {
    vec![
        Upgrade {
            id: UpgradeId::Speed,
            name: "Snake Speed",
            description: "Increase movement speed",
            base_cost: 50,
            max_level: 10,
            level: 0,
        },
        Upgrade {
            id: UpgradeId::ScoreMultiplier,
            name: "Score Multiplier",
            description: "Increase points earned",
            base_cost: 75,
            max_level: 8,
            level: 0,
        },
        Upgrade {
            id: UpgradeId::PowerUpDuration,
            name: "Power-up Duration",
            description: "Extend power-up effects",
            base_cost: 60,
            max_level: 5,
            level: 0,
        },
        Upgrade {
            id: UpgradeId::XpBonus,
            name: "XP Gain",
            description: "Earn more experience",
            base_cost: 40,
            max_level: 12,
            level: 0,
        },
        Upgrade {
            id: UpgradeId::FoodMagnet,
            name: "Food Magnetism",
            description: "Attract food from distance",
            base_cost: 100,
            max_level: 3,
            level: 0,
        },
        Upgrade {
            id: UpgradeId::PowerUpSpawn,
            name: "Power-up Spawn Rate",
            description: "Increase power-up frequency",
            base_cost: 80,
            max_level: 6,
            level: 0,
        },
    ]
}
