//! Achievements: lifetime goals with one-time coin rewards.

use serde::Serialize;

use crate::sim::GameState;
use crate::stats::PlayerStats;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Tier {
    Bronze,
    Silver,
    Gold,
}

/// Unlock condition, checked against lifetime stats and the live game
/// state after every applied event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum AchievementRule {
    GamesPlayed(u32),
    FoodEaten(u64),
    LongestSnake(u32),
    HighScore(u32),
    MaxCombo(u32),
    Level(u32),
    CoinsEarned(u64),
    /// Live score reached within a window after the run started
    ScoreSprint { score: u32, within_ms: u64 },
}

impl AchievementRule {
    pub fn satisfied(&self, stats: &PlayerStats, state: &GameState) -> bool {
        match *self {
            AchievementRule::GamesPlayed(n) => stats.games_played >= n,
            AchievementRule::FoodEaten(n) => stats.total_food_eaten >= n,
            AchievementRule::LongestSnake(n) => stats.longest_snake >= n,
            AchievementRule::HighScore(n) => stats.high_score >= n,
            AchievementRule::MaxCombo(n) => state.combo.max_combo >= n,
            AchievementRule::Level(n) => stats.level >= n,
            AchievementRule::CoinsEarned(n) => stats.total_coins_earned >= n,
            AchievementRule::ScoreSprint { score, within_ms } => {
                state.score >= score
                    && state.clock_ms.saturating_sub(state.run_started_ms) < within_ms
            }
        }
    }

    /// `(current, target)` pair for progress bars, with current clamped
    /// to the target.
    pub fn progress(&self, stats: &PlayerStats, state: &GameState) -> (u64, u64) {
        match *self {
            AchievementRule::GamesPlayed(n) => (stats.games_played.min(n) as u64, n as u64),
            AchievementRule::FoodEaten(n) => (stats.total_food_eaten.min(n), n),
            AchievementRule::LongestSnake(n) => (stats.longest_snake.min(n) as u64, n as u64),
            AchievementRule::HighScore(n) => (stats.high_score.min(n) as u64, n as u64),
            AchievementRule::MaxCombo(n) => (state.combo.max_combo.min(n) as u64, n as u64),
            AchievementRule::Level(n) => (stats.level.min(n) as u64, n as u64),
            AchievementRule::CoinsEarned(n) => (stats.total_coins_earned.min(n), n),
            AchievementRule::ScoreSprint { score, .. } => {
                (stats.high_score.min(score) as u64, score as u64)
            }
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Achievement {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub tier: Tier,
    pub rule: AchievementRule,
    /// Coins granted once on unlock
    pub reward_coins: u64,
    pub unlocked: bool,
    pub unlocked_at_ms: Option<u64>,
}

pub fn create_achievements() -> Vec<Achievement> {
    let entry = |id, name, description, tier, rule, reward_coins| Achievement {
        id,
        name,
        description,
        tier,
        rule,
        reward_coins,
        unlocked: false,
        unlocked_at_ms: None,
    };
    vec![
        entry(
            "firstGame",
            "Getting Started",
            "Play your first game",
            Tier::Bronze,
            AchievementRule::GamesPlayed(1),
            10,
        ),
        entry(
            "speedster",
            "Speed Demon",
            "Reach a score of 500 in under 2 minutes",
            Tier::Silver,
            AchievementRule::ScoreSprint {
                score: 500,
                within_ms: 120_000,
            },
            50,
        ),
        entry(
            "collector",
            "Food Collector",
            "Eat 100 food items",
            Tier::Bronze,
            AchievementRule::FoodEaten(100),
            25,
        ),
        entry(
            "survivor",
            "Survivor",
            "Reach length 20 in a single game",
            Tier::Silver,
            AchievementRule::LongestSnake(20),
            75,
        ),
        entry(
            "scoremaster",
            "Score Master",
            "Achieve a score of 1000",
            Tier::Gold,
            AchievementRule::HighScore(1000),
            100,
        ),
        entry(
            "comboking",
            "Combo King",
            "Achieve a 10x combo",
            Tier::Silver,
            AchievementRule::MaxCombo(10),
            60,
        ),
        entry(
            "dedicated",
            "Dedicated Player",
            "Play for 10 games",
            Tier::Bronze,
            AchievementRule::GamesPlayed(10),
            30,
        ),
        entry(
            "wealthy",
            "Coin Collector",
            "Earn 500 total coins",
            Tier::Silver,
            AchievementRule::CoinsEarned(500),
            100,
        ),
        entry(
            "levelUp",
            "Level Up",
            "Reach level 5",
            Tier::Bronze,
            AchievementRule::Level(5),
            40,
        ),
        entry(
            "legend",
            "Snake Legend",
            "Reach level 20",
            Tier::Gold,
            AchievementRule::Level(20),
            200,
        ),
    ]
}

/// Indices of achievements whose rule now holds but are still locked.
pub fn newly_unlocked(state: &GameState) -> Vec<usize> {
    state
        .achievements
        .iter()
        .enumerate()
        .filter(|(_, a)| !a.unlocked && a.rule.satisfied(&state.stats, state))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::GameState;

    #[test]
    fn test_catalog_shape() {
        let achievements = create_achievements();
        assert_eq!(achievements.len(), 10);
        assert!(achievements.iter().all(|a| !a.unlocked));
        let mut ids: Vec<&str> = achievements.iter().map(|a| a.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 10);
    }

    #[test]
    fn test_lifetime_rules() {
        let mut state = GameState::new(1, 0);
        state.stats.games_played = 9;
        state.stats.total_food_eaten = 100;
        assert!(!AchievementRule::GamesPlayed(10).satisfied(&state.stats, &state));
        assert!(AchievementRule::FoodEaten(100).satisfied(&state.stats, &state));
        assert_eq!(
            AchievementRule::GamesPlayed(10).progress(&state.stats, &state),
            (9, 10)
        );
    }

    #[test]
    fn test_score_sprint_window() {
        let rule = AchievementRule::ScoreSprint {
            score: 500,
            within_ms: 120_000,
        };
        let mut state = GameState::new(1, 0);
        state.run_started_ms = 10_000;
        state.score = 500;
        state.clock_ms = 129_999;
        assert!(rule.satisfied(&state.stats, &state));
        state.clock_ms = 130_000;
        assert!(!rule.satisfied(&state.stats, &state));
        state.clock_ms = 129_999;
        state.score = 499;
        assert!(!rule.satisfied(&state.stats, &state));
    }

    #[test]
    fn test_newly_unlocked_skips_already_unlocked() {
        let mut state = GameState::new(1, 0);
        state.stats.games_played = 1;
        let hits = newly_unlocked(&state);
        assert_eq!(hits.len(), 1);
        assert_eq!(state.achievements[hits[0]].id, "firstGame");
        state.achievements[hits[0]].unlocked = true;
        assert!(newly_unlocked(&state).is_empty());
    }
}
