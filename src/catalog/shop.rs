//! Coin shop: one-shot consumables, mostly boosts for the next run.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShopItemId {
    ExtraLife,
    ScoreBoost,
    InstantXp,
    ComboStarter,
    InstantXpLarge,
    LuckyGame,
}

impl ShopItemId {
    pub const ALL: [ShopItemId; 6] = [
        ShopItemId::ExtraLife,
        ShopItemId::ScoreBoost,
        ShopItemId::InstantXp,
        ShopItemId::ComboStarter,
        ShopItemId::InstantXpLarge,
        ShopItemId::LuckyGame,
    ];

    pub fn key(self) -> &'static str {
        match self {
            ShopItemId::ExtraLife => "extra_life",
            ShopItemId::ScoreBoost => "score_boost",
            ShopItemId::InstantXp => "instant_xp",
            ShopItemId::ComboStarter => "combo_starter",
            ShopItemId::InstantXpLarge => "instant_xp_large",
            ShopItemId::LuckyGame => "lucky_game",
        }
    }
}

/// What a purchased item actually does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShopEffect {
    /// Next run starts with a shield effect on the snake
    StartWithShield,
    /// Score is doubled for the whole next run
    DoubleScoreRun,
    /// XP credited immediately at purchase
    InstantXp(u64),
    /// Next run starts with a combo chain already going
    StartCombo(u32),
    /// Power-up spawn chance is doubled for the next run
    LuckyRun,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ShopItem {
    pub id: ShopItemId,
    pub name: &'static str,
    pub description: &'static str,
    pub price: u64,
}

impl ShopItem {
    pub fn effect(&self) -> ShopEffect {
        match self.id {
            ShopItemId::ExtraLife => ShopEffect::StartWithShield,
            ShopItemId::ScoreBoost => ShopEffect::DoubleScoreRun,
            ShopItemId::InstantXp => ShopEffect::InstantXp(100),
            ShopItemId::ComboStarter => ShopEffect::StartCombo(3),
            ShopItemId::InstantXpLarge => ShopEffect::InstantXp(250),
            ShopItemId::LuckyGame => ShopEffect::LuckyRun,
        }
    }
}

pub const SHOP_ITEMS: [ShopItem; 6] = [
    ShopItem {
        id: ShopItemId::ExtraLife,
        name: "Extra Life",
        description: "Start next game with a shield power-up",
        price: 50,
    },
    ShopItem {
        id: ShopItemId::ScoreBoost,
        name: "2x Score Boost",
        description: "Double score for the next game",
        price: 75,
    },
    ShopItem {
        id: ShopItemId::InstantXp,
        name: "100 Instant XP",
        description: "Gain 100 XP immediately",
        price: 30,
    },
    ShopItem {
        id: ShopItemId::ComboStarter,
        name: "Combo Starter",
        description: "Begin next game with 3x combo",
        price: 60,
    },
    ShopItem {
        id: ShopItemId::InstantXpLarge,
        name: "250 Instant XP",
        description: "Gain 250 XP immediately",
        price: 70,
    },
    ShopItem {
        id: ShopItemId::LuckyGame,
        name: "Lucky Game",
        description: "Increased power-up spawn rate for next game",
        price: 45,
    },
];

/// Catalog lookup by id. SHOP_ITEMS is ordered like ShopItemId::ALL.
pub fn item(id: ShopItemId) -> &'static ShopItem {
    &SHOP_ITEMS[id as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_covers_all_ids() {
        assert_eq!(SHOP_ITEMS.len(), ShopItemId::ALL.len());
        for id in ShopItemId::ALL {
            assert_eq!(item(id).id, id);
        }
    }

    #[test]
    fn test_prices_and_effects() {
        assert_eq!(item(ShopItemId::ExtraLife).price, 50);
        assert_eq!(item(ShopItemId::InstantXp).effect(), ShopEffect::InstantXp(100));
        assert_eq!(
            item(ShopItemId::InstantXpLarge).effect(),
            ShopEffect::InstantXp(250)
        );
        assert_eq!(
            item(ShopItemId::ComboStarter).effect(),
            ShopEffect::StartCombo(3)
        );
    }
}
