//! Profile persistence: flat named JSON blobs in a key-value store
//!
//! Each slice of player progress (stats, upgrade levels, achievement
//! unlocks, challenge completions, cosmetics) is serialized on its own
//! key and recovered independently. Loading merges only the mutable
//! fields onto freshly built factory catalogs: names, prices and rules
//! always come from code. A blob that fails to parse is logged and
//! replaced by that slice's defaults; the other slices still load.
//!
//! The store itself is the embedding collaborator's concern (browser
//! LocalStorage, a file, a test map); the trait only needs get/set.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::UpgradeId;
use crate::sim::GameState;
use crate::stats::PlayerStats;

pub const STATS_KEY: &str = "snake_rpg_stats";
pub const UPGRADES_KEY: &str = "snake_rpg_upgrades";
pub const ACHIEVEMENTS_KEY: &str = "snake_rpg_achievements";
pub const CHALLENGES_KEY: &str = "snake_rpg_challenges";
pub const COSMETICS_KEY: &str = "snake_rpg_cosmetics";

/// Flat string-to-string storage, one JSON blob per key.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
}

/// In-memory store for tests and the headless driver.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }
}

/// Persisted achievement slice: only the unlock transition.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
struct AchievementRecord {
    unlocked: bool,
    unlocked_at_ms: Option<u64>,
}

/// Persisted challenge slice. The expiry stamp identifies the window
/// the completion belongs to; a completion from an earlier window is
/// not carried onto a fresh challenge.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
struct ChallengeRecord {
    completed: bool,
    completed_at_ms: Option<u64>,
    expires_at_ms: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct CosmeticsRecord {
    unlocked_skins: Vec<String>,
    unlocked_themes: Vec<String>,
    current_skin: String,
    current_theme: String,
}

/// Write every profile slice to the store.
pub fn save_profile(store: &mut dyn KeyValueStore, state: &GameState) {
    save_slice(store, STATS_KEY, &state.stats);

    let upgrades: BTreeMap<&str, u32> = state
        .upgrades
        .iter()
        .map(|u| (u.id.key(), u.level))
        .collect();
    save_slice(store, UPGRADES_KEY, &upgrades);

    let achievements: BTreeMap<&str, AchievementRecord> = state
        .achievements
        .iter()
        .map(|a| {
            (
                a.id,
                AchievementRecord {
                    unlocked: a.unlocked,
                    unlocked_at_ms: a.unlocked_at_ms,
                },
            )
        })
        .collect();
    save_slice(store, ACHIEVEMENTS_KEY, &achievements);

    let challenges: BTreeMap<&str, ChallengeRecord> = state
        .challenges
        .iter()
        .map(|c| {
            (
                c.id,
                ChallengeRecord {
                    completed: c.completed,
                    completed_at_ms: c.completed_at_ms,
                    expires_at_ms: c.expires_at_ms,
                },
            )
        })
        .collect();
    save_slice(store, CHALLENGES_KEY, &challenges);

    let cosmetics = CosmeticsRecord {
        unlocked_skins: state
            .skins
            .iter()
            .filter(|s| s.unlocked)
            .map(|s| s.id.to_string())
            .collect(),
        unlocked_themes: state
            .themes
            .iter()
            .filter(|t| t.unlocked)
            .map(|t| t.id.to_string())
            .collect(),
        current_skin: state.current_skin.clone(),
        current_theme: state.current_theme.clone(),
    };
    save_slice(store, COSMETICS_KEY, &cosmetics);
    log::debug!("profile saved");
}

/// Merge every stored slice onto `state`'s factory-fresh catalogs.
///
/// Unknown ids are dropped, missing fields take defaults, and a slice
/// that fails to parse leaves that part of the state at its defaults.
pub fn load_profile(store: &dyn KeyValueStore, state: &mut GameState) {
    if let Some(stats) = load_slice::<PlayerStats>(store, STATS_KEY) {
        state.stats = stats;
    }

    if let Some(levels) = load_slice::<BTreeMap<String, u32>>(store, UPGRADES_KEY) {
        for (key, level) in levels {
            let Some(id) = UpgradeId::from_key(&key) else {
                log::warn!("dropping unknown upgrade id '{}'", key);
                continue;
            };
            if let Some(upgrade) = state.upgrades.iter_mut().find(|u| u.id == id) {
                upgrade.level = level.min(upgrade.max_level);
            }
        }
    }

    if let Some(records) = load_slice::<BTreeMap<String, AchievementRecord>>(store, ACHIEVEMENTS_KEY)
    {
        for achievement in &mut state.achievements {
            if let Some(record) = records.get(achievement.id) {
                achievement.unlocked = record.unlocked;
                achievement.unlocked_at_ms = record.unlocked_at_ms;
            }
        }
    }

    if let Some(records) = load_slice::<BTreeMap<String, ChallengeRecord>>(store, CHALLENGES_KEY) {
        for challenge in &mut state.challenges {
            if let Some(record) = records.get(challenge.id) {
                // Only completions from the same expiry window count
                if record.expires_at_ms == challenge.expires_at_ms {
                    challenge.completed = record.completed;
                    challenge.completed_at_ms = record.completed_at_ms;
                }
            }
        }
    }

    if let Some(cosmetics) = load_slice::<CosmeticsRecord>(store, COSMETICS_KEY) {
        for skin in &mut state.skins {
            if cosmetics.unlocked_skins.iter().any(|id| id == skin.id) {
                skin.unlocked = true;
            }
        }
        for theme in &mut state.themes {
            if cosmetics.unlocked_themes.iter().any(|id| id == theme.id) {
                theme.unlocked = true;
            }
        }
        // Never equip something the catalog no longer has unlocked
        if state
            .skins
            .iter()
            .any(|s| s.unlocked && s.id == cosmetics.current_skin)
        {
            state.current_skin = cosmetics.current_skin;
        }
        if state
            .themes
            .iter()
            .any(|t| t.unlocked && t.id == cosmetics.current_theme)
        {
            state.current_theme = cosmetics.current_theme;
        }
    }
}

fn save_slice<T: Serialize>(store: &mut dyn KeyValueStore, key: &str, value: &T) {
    match serde_json::to_string(value) {
        Ok(json) => store.set(key, &json),
        Err(e) => log::warn!("failed to serialize {}: {}", key, e),
    }
}

fn load_slice<T: for<'de> Deserialize<'de>>(store: &dyn KeyValueStore, key: &str) -> Option<T> {
    let json = store.get(key)?;
    match serde_json::from_str(&json) {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("discarding corrupt blob at {}: {}", key, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::UpgradeId;

    #[test]
    fn test_profile_round_trip() {
        let mut state = GameState::new(1, 1000);
        state.stats.award_xp(900);
        state.stats.earn_coins(123);
        state.stats.games_played = 7;
        for u in &mut state.upgrades {
            if u.id == UpgradeId::Speed {
                u.level = 4;
            }
        }
        state.achievements[0].unlocked = true;
        state.achievements[0].unlocked_at_ms = Some(5000);
        state.challenges[0].completed = true;
        state.challenges[0].completed_at_ms = Some(6000);
        state.skins[1].unlocked = true;
        state.current_skin = state.skins[1].id.to_string();

        let mut store = MemoryStore::new();
        save_profile(&mut store, &state);

        // Fresh state constructed in the same challenge window
        let mut loaded = GameState::new(2, 1000);
        load_profile(&store, &mut loaded);
        assert_eq!(loaded.stats, state.stats);
        assert_eq!(loaded.upgrade_level(UpgradeId::Speed), 4);
        assert!(loaded.achievements[0].unlocked);
        assert_eq!(loaded.achievements[0].unlocked_at_ms, Some(5000));
        assert!(loaded.challenges[0].completed);
        assert!(loaded.skins[1].unlocked);
        assert_eq!(loaded.current_skin, loaded.skins[1].id);
        // Static content still comes from the factory
        assert_eq!(loaded.skins[1].price, state.skins[1].price);
    }

    #[test]
    fn test_corrupt_slice_falls_back_alone() {
        let mut state = GameState::new(1, 1000);
        state.stats.earn_coins(50);
        for u in &mut state.upgrades {
            u.level = 1;
        }
        let mut store = MemoryStore::new();
        save_profile(&mut store, &state);
        store.set(STATS_KEY, "{not json");

        let mut loaded = GameState::new(2, 1000);
        load_profile(&store, &mut loaded);
        // Stats slice defaulted, upgrades still restored
        assert_eq!(loaded.stats, PlayerStats::default());
        assert!(loaded.upgrades.iter().all(|u| u.level == 1));
    }

    #[test]
    fn test_unknown_and_out_of_range_ids_dropped() {
        let mut store = MemoryStore::new();
        store.set(
            UPGRADES_KEY,
            r#"{"speed":3,"retiredTrack":9,"foodMagnet":99}"#,
        );
        let mut state = GameState::new(1, 1000);
        load_profile(&store, &mut state);
        assert_eq!(state.upgrade_level(UpgradeId::Speed), 3);
        // Clamped to the catalog's max level
        assert_eq!(state.upgrade_level(UpgradeId::FoodMagnet), 3);
    }

    #[test]
    fn test_stale_challenge_window_not_restored() {
        let mut state = GameState::new(1, 1000);
        state.challenges[0].completed = true;
        state.challenges[0].completed_at_ms = Some(2000);
        let mut store = MemoryStore::new();
        save_profile(&mut store, &state);

        // A day later the daily challenge has a new expiry window
        let next_day = 1000 + crate::catalog::challenges::DAY_MS;
        let mut loaded = GameState::new(2, next_day);
        load_profile(&store, &mut loaded);
        assert!(!loaded.challenges[0].completed);
    }

    #[test]
    fn test_equipped_cosmetic_must_be_unlocked() {
        let mut store = MemoryStore::new();
        store.set(
            COSMETICS_KEY,
            r#"{"unlocked_skins":[],"unlocked_themes":[],"current_skin":"golden","current_theme":"classic"}"#,
        );
        let mut state = GameState::new(1, 1000);
        load_profile(&store, &mut state);
        // "golden" was never unlocked in this save: keep the default
        assert_eq!(state.current_skin, "default");
        assert_eq!(state.current_theme, "classic");
    }

    #[test]
    fn test_empty_store_leaves_defaults() {
        let store = MemoryStore::new();
        let mut state = GameState::new(1, 1000);
        load_profile(&store, &mut state);
        assert_eq!(state.stats, PlayerStats::default());
        assert!(state.upgrades.iter().all(|u| u.level == 0));
    }
}
