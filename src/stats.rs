//! Persistent player statistics and the XP/coin wallets.
//!
//! Levels are a pure function of lifetime XP (`total_xp`); spending XP
//! on upgrades only drains the spendable `xp` pool and never lowers the
//! level. Coins behave the same way via `total_coins_earned`.

use serde::{Deserialize, Serialize};

use crate::progression;

/// Lifetime player record, persisted across runs.
///
/// Missing fields in an old save deserialize to their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerStats {
    pub level: u32,
    /// Spendable XP (drained by upgrade purchases)
    pub xp: u64,
    /// Cached remainder to the next level, derived from `total_xp`
    pub xp_to_next_level: u64,
    /// Lifetime XP; never decreases
    pub total_xp: u64,
    pub games_played: u32,
    pub high_score: u32,
    /// Spendable coins (drained by shop and cosmetic purchases)
    pub coins: u64,
    /// Lifetime coins; never decreases
    pub total_coins_earned: u64,
    pub total_food_eaten: u64,
    pub total_play_time_ms: u64,
    pub longest_snake: u32,
    pub total_deaths: u32,
    pub average_score: f64,
    pub daily_streak: u32,
    /// Day index (UTC days since epoch) of the last finished run
    pub last_play_day: u64,
}

impl Default for PlayerStats {
    fn default() -> Self {
        Self {
            level: 1,
            xp: 0,
            xp_to_next_level: progression::xp_cost_for_level(1),
            total_xp: 0,
            games_played: 0,
            high_score: 0,
            coins: 0,
            total_coins_earned: 0,
            total_food_eaten: 0,
            total_play_time_ms: 0,
            longest_snake: 0,
            total_deaths: 0,
            average_score: 0.0,
            daily_streak: 0,
            last_play_day: 0,
        }
    }
}

impl PlayerStats {
    /// Credits XP to both pools and recomputes the level.
    /// Returns the number of levels gained (usually 0 or 1).
    pub fn award_xp(&mut self, amount: u64) -> u32 {
        self.xp = self.xp.saturating_add(amount);
        self.total_xp = self.total_xp.saturating_add(amount);
        let new_level = progression::level_for_total_xp(self.total_xp);
        let gained = new_level.saturating_sub(self.level);
        self.level = new_level;
        self.xp_to_next_level = progression::xp_to_next_level(self.total_xp);
        gained
    }

    /// Debits spendable XP. Returns false (and changes nothing) if the
    /// pool is short. The level is untouched either way.
    pub fn try_spend_xp(&mut self, cost: u64) -> bool {
        if self.xp < cost {
            return false;
        }
        self.xp -= cost;
        true
    }

    /// Credits coins to both the wallet and the lifetime counter.
    pub fn earn_coins(&mut self, amount: u64) {
        self.coins = self.coins.saturating_add(amount);
        self.total_coins_earned = self.total_coins_earned.saturating_add(amount);
    }

    /// Debits the coin wallet. Returns false (and changes nothing) if
    /// the wallet is short.
    pub fn try_spend_coins(&mut self, cost: u64) -> bool {
        if self.coins < cost {
            return false;
        }
        self.coins -= cost;
        true
    }

    /// Folds one finished run into the lifetime record. `day` is the
    /// UTC day index of the death, used for the daily streak.
    pub fn record_run_end(&mut self, score: u32, run_ms: u64, day: u64) {
        self.games_played += 1;
        self.total_deaths += 1;
        self.high_score = self.high_score.max(score);
        self.total_play_time_ms = self.total_play_time_ms.saturating_add(run_ms);
        let games = self.games_played as f64;
        self.average_score = (self.average_score * (games - 1.0) + score as f64) / games;

        if self.daily_streak == 0 {
            self.daily_streak = 1;
        } else if day == self.last_play_day + 1 {
            self.daily_streak += 1;
        } else if day != self.last_play_day {
            self.daily_streak = 1;
        }
        self.last_play_day = day;
    }
}
