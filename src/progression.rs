//! Pure progression math: XP level curve, combo multipliers, upgrade
//! costs and session coin payouts.
//!
//! Everything here is a total function of its inputs so the tick loop
//! and the UI can call it freely without touching game state.

/// Combo multiplier ladder, indexed by combo count (capped at the top).
pub const COMBO_MULTIPLIERS: [f64; 8] = [1.0, 1.2, 1.5, 2.0, 2.5, 3.0, 4.0, 5.0];

/// XP needed to clear `level` and reach `level + 1`.
///
/// Level 1 costs 100 XP, each level after costs 1.5x the previous,
/// floored to whole XP.
pub fn xp_cost_for_level(level: u32) -> u64 {
    let exp = level.max(1) - 1;
    (100.0 * 1.5f64.powi(exp as i32)).floor() as u64
}

/// Level implied by lifetime XP. Starts at 1; landing exactly on a
/// boundary counts as the next level.
pub fn level_for_total_xp(total_xp: u64) -> u32 {
    let mut level = 1u32;
    let mut spent = 0u64;
    loop {
        let cost = xp_cost_for_level(level);
        match spent.checked_add(cost) {
            Some(next) if next <= total_xp => {
                spent = next;
                level += 1;
            }
            _ => return level,
        }
    }
}

/// XP accumulated past the current level's boundary.
pub fn xp_into_level(total_xp: u64) -> u64 {
    let mut level = 1u32;
    let mut spent = 0u64;
    loop {
        let cost = xp_cost_for_level(level);
        match spent.checked_add(cost) {
            Some(next) if next <= total_xp => {
                spent = next;
                level += 1;
            }
            _ => return total_xp - spent,
        }
    }
}

/// XP still missing to reach the next level.
pub fn xp_to_next_level(total_xp: u64) -> u64 {
    let level = level_for_total_xp(total_xp);
    xp_cost_for_level(level) - xp_into_level(total_xp)
}

/// Coin cost of buying the next rank of an upgrade currently at `level`.
pub fn upgrade_cost(base_cost: u64, level: u32) -> u64 {
    (base_cost as f64 * 1.5f64.powi(level.min(64) as i32)).floor() as u64
}

/// Multiplier for a combo chain of `count` pickups.
pub fn combo_multiplier(count: u32) -> f64 {
    COMBO_MULTIPLIERS[(count as usize).min(COMBO_MULTIPLIERS.len() - 1)]
}

/// Coins paid out when a run ends.
pub fn session_coins(score: u32, max_combo: u32) -> u64 {
    (score / 10) as u64 + 2 * max_combo as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_xp_cost_curve() {
        assert_eq!(xp_cost_for_level(1), 100);
        assert_eq!(xp_cost_for_level(2), 150);
        assert_eq!(xp_cost_for_level(3), 225);
        assert_eq!(xp_cost_for_level(4), 337);
        assert_eq!(xp_cost_for_level(5), 506);
    }

    #[test]
    fn test_level_boundaries() {
        assert_eq!(level_for_total_xp(0), 1);
        assert_eq!(level_for_total_xp(99), 1);
        // Exactly clearing the boundary lands on the next level
        assert_eq!(level_for_total_xp(100), 2);
        assert_eq!(level_for_total_xp(249), 2);
        assert_eq!(level_for_total_xp(250), 3);
        assert_eq!(level_for_total_xp(474), 3);
        assert_eq!(level_for_total_xp(475), 4);
    }

    #[test]
    fn test_xp_to_next_at_boundary() {
        // Fresh level 2: full 150 XP ahead
        assert_eq!(xp_to_next_level(100), 150);
        assert_eq!(xp_into_level(100), 0);
        // One short of level 2
        assert_eq!(xp_to_next_level(99), 1);
        assert_eq!(xp_into_level(99), 99);
    }

    #[test]
    fn test_combo_ladder() {
        assert_eq!(combo_multiplier(0), 1.0);
        assert_eq!(combo_multiplier(1), 1.2);
        assert_eq!(combo_multiplier(2), 1.5);
        assert_eq!(combo_multiplier(3), 2.0);
        assert_eq!(combo_multiplier(7), 5.0);
        // Capped past the end of the ladder
        assert_eq!(combo_multiplier(8), 5.0);
        assert_eq!(combo_multiplier(1000), 5.0);
    }

    #[test]
    fn test_upgrade_cost_floor() {
        assert_eq!(upgrade_cost(50, 0), 50);
        assert_eq!(upgrade_cost(50, 1), 75);
        assert_eq!(upgrade_cost(50, 2), 112); // 112.5 floors down
        assert_eq!(upgrade_cost(75, 2), 168); // 168.75 floors down
        assert_eq!(upgrade_cost(100, 3), 337);
    }

    #[test]
    fn test_session_coins() {
        assert_eq!(session_coins(0, 0), 0);
        assert_eq!(session_coins(457, 7), 45 + 14);
        assert_eq!(session_coins(9, 1), 2);
    }

    proptest! {
        #[test]
        fn prop_level_monotonic(a in 0u64..5_000_000, b in 0u64..5_000_000) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(level_for_total_xp(lo) <= level_for_total_xp(hi));
        }

        #[test]
        fn prop_level_split_is_complementary(total in 0u64..5_000_000) {
            let level = level_for_total_xp(total);
            let into = xp_into_level(total);
            let to_next = xp_to_next_level(total);
            prop_assert!(into < xp_cost_for_level(level));
            prop_assert_eq!(into + to_next, xp_cost_for_level(level));
        }

        #[test]
        fn prop_upgrade_cost_monotonic(base in 1u64..500, level in 0u32..30) {
            prop_assert!(upgrade_cost(base, level) <= upgrade_cost(base, level + 1));
        }
    }
}
