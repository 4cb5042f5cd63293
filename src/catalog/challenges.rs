//! Timed challenges: daily and weekly goals with coin and XP rewards.
//!
//! Expiry is plain UTC arithmetic on the millisecond clock. Daily
//! challenges run until the next UTC midnight, weekly ones until the
//! start of the next Sunday-based week.

use serde::Serialize;

use crate::catalog::achievements::AchievementRule;
use crate::sim::GameState;

pub const DAY_MS: u64 = 86_400_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ChallengeKind {
    Daily,
    Weekly,
}

#[derive(Debug, Clone, Serialize)]
pub struct Challenge {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub kind: ChallengeKind,
    pub rule: AchievementRule,
    pub reward_coins: u64,
    pub reward_xp: u64,
    pub expires_at_ms: u64,
    pub completed: bool,
    pub completed_at_ms: Option<u64>,
}

impl Challenge {
    pub fn expired(&self, now_ms: u64) -> bool {
        now_ms >= self.expires_at_ms
    }
}

/// Next UTC midnight strictly after `now_ms`.
pub fn next_utc_midnight_ms(now_ms: u64) -> u64 {
    (now_ms / DAY_MS + 1) * DAY_MS
}

/// Start of the next Sunday (UTC) strictly after `now_ms`.
pub fn next_week_start_ms(now_ms: u64) -> u64 {
    let day = now_ms / DAY_MS;
    // The Unix epoch fell on a Thursday, so Sunday-based weekday is
    // (day + 4) % 7.
    let weekday = (day + 4) % 7;
    (day + (7 - weekday)) * DAY_MS
}

pub fn create_challenges(now_ms: u64) -> Vec<Challenge> {
    let daily = next_utc_midnight_ms(now_ms);
    let weekly = next_week_start_ms(now_ms);
    vec![
        Challenge {
            id: "dailyScore",
            name: "Daily High Score",
            description: "Achieve a score of 300 today",
            kind: ChallengeKind::Daily,
            rule: AchievementRule::HighScore(300),
            reward_coins: 20,
            reward_xp: 50,
            expires_at_ms: daily,
            completed: false,
            completed_at_ms: None,
        },
        Challenge {
            id: "weeklyGames",
            name: "Weekly Games",
            description: "Play 15 games this week",
            kind: ChallengeKind::Weekly,
            rule: AchievementRule::GamesPlayed(15),
            reward_coins: 75,
            reward_xp: 150,
            expires_at_ms: weekly,
            completed: false,
            completed_at_ms: None,
        },
        Challenge {
            id: "dailyCombo",
            name: "Combo Master",
            description: "Achieve a 5x combo today",
            kind: ChallengeKind::Daily,
            rule: AchievementRule::MaxCombo(5),
            reward_coins: 15,
            reward_xp: 30,
            expires_at_ms: daily,
            completed: false,
            completed_at_ms: None,
        },
    ]
}

/// Indices of challenges whose rule now holds, that are neither
/// completed nor past their expiry.
pub fn newly_completed(state: &GameState) -> Vec<usize> {
    state
        .challenges
        .iter()
        .enumerate()
        .filter(|(_, c)| {
            !c.completed && !c.expired(state.clock_ms) && c.rule.satisfied(&state.stats, state)
        })
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::GameState;

    #[test]
    fn test_next_utc_midnight() {
        assert_eq!(next_utc_midnight_ms(0), DAY_MS);
        assert_eq!(next_utc_midnight_ms(1), DAY_MS);
        assert_eq!(next_utc_midnight_ms(DAY_MS - 1), DAY_MS);
        assert_eq!(next_utc_midnight_ms(DAY_MS), 2 * DAY_MS);
    }

    #[test]
    fn test_next_week_start() {
        // Day 0 (1970-01-01) was a Thursday; the following Sunday is
        // day 3.
        assert_eq!(next_week_start_ms(0), 3 * DAY_MS);
        // On a Sunday the next week starts a full 7 days later.
        assert_eq!(next_week_start_ms(3 * DAY_MS), 10 * DAY_MS);
        assert_eq!(next_week_start_ms(3 * DAY_MS + 5), 10 * DAY_MS);
    }

    #[test]
    fn test_expired_challenge_never_completes() {
        let mut state = GameState::new(1, 0);
        state.stats.high_score = 300;
        state.clock_ms = DAY_MS; // past the daily expiry
        let hits = newly_completed(&state);
        assert!(
            hits.iter()
                .all(|&i| state.challenges[i].id != "dailyScore")
        );

        state.clock_ms = DAY_MS - 1;
        let hits = newly_completed(&state);
        assert!(
            hits.iter()
                .any(|&i| state.challenges[i].id == "dailyScore")
        );
    }

    #[test]
    fn test_completed_challenge_not_reported_again() {
        let mut state = GameState::new(1, 0);
        state.stats.high_score = 300;
        state.clock_ms = 100;
        let hits = newly_completed(&state);
        assert_eq!(hits.len(), 1);
        state.challenges[hits[0]].completed = true;
        assert!(newly_completed(&state).is_empty());
    }
}
