//! Game content: upgrades, achievements, challenges, shop items and
//! cosmetics.
//!
//! Catalog entries pair static identity (id, name, price, rule) with
//! the little mutable state layered on top (levels, unlock flags).
//! Only that mutable layer is persisted; behavior always comes from
//! code keyed by id.

pub mod achievements;
pub mod challenges;
pub mod cosmetics;
pub mod shop;
pub mod upgrades;

pub use achievements::{Achievement, AchievementRule, Tier, create_achievements};
pub use challenges::{Challenge, ChallengeKind, create_challenges};
pub use cosmetics::{GameTheme, SnakeSkin, create_skins, create_themes};
pub use shop::{SHOP_ITEMS, ShopEffect, ShopItem, ShopItemId};
pub use upgrades::{Upgrade, UpgradeId, create_upgrades};
