//! Event surface of the simulation
//!
//! The presentation layer never touches `GameState` directly: it sends
//! `Event`s into a `Simulation` and re-renders from the snapshot each
//! application returns. Every event produces a whole new snapshot
//! (clone, mutate, swap), so a caller can hold the previous one for
//! diffing or rollback.
//!
//! Purchases are guarded single-step transitions. A failed guard
//! (insufficient currency, maxed upgrade, locked cosmetic) leaves the
//! state byte-for-byte unchanged; there is no error channel because
//! the UI simply re-renders the unchanged snapshot.

use super::state::{GamePhase, GameState, PowerUpKind, SnakeId};
use super::tick;
use crate::catalog::{ShopEffect, ShopItemId, UpgradeId, achievements, challenges, shop};
use crate::sim::grid::Direction;

/// Everything the outside world can ask the simulation to do.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// One fixed simulation step
    Tick,
    /// The faster cosmetic step: popup pruning and combo expiry
    AnimTick,
    /// Buffer a direction intent for the next tick (latest wins)
    SetDirection { snake: SnakeId, direction: Direction },
    /// Begin a run (from Idle or, after a reset, from Over)
    Start,
    /// Suspend a running game back to Idle without losing the board
    Pause,
    /// Fresh board, back to Idle
    Reset,
    /// Switch between one and two snakes (rejected mid-run)
    ToggleDualMode,
    BuyUpgrade(UpgradeId),
    /// `cost` is the price the UI displayed; it must match the catalog
    PurchaseShopItem { id: ShopItemId, cost: u64 },
    PurchaseSkin { id: String },
    EquipSkin { id: String },
    PurchaseTheme { id: String },
    EquipTheme { id: String },
    ToggleShop,
    ToggleCustomization,
    ToggleAchievements,
    ToggleStats,
}

/// Externally-owned simulation: the single writer of game state.
#[derive(Debug, Clone)]
pub struct Simulation {
    state: GameState,
}

impl Simulation {
    pub fn new(seed: u64, now_ms: u64) -> Self {
        Self {
            state: GameState::new(seed, now_ms),
        }
    }

    /// Wrap an already-built state, e.g. one merged from a saved
    /// profile.
    pub fn from_state(state: GameState) -> Self {
        Self { state }
    }

    /// Read-only view of the latest snapshot.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[cfg(test)]
    pub(crate) fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    /// Apply one event at `now_ms` and return the new snapshot.
    ///
    /// Achievements and challenges are evaluated after every event, so
    /// an unlock lands in the same snapshot as the change that earned
    /// it.
    pub fn apply(&mut self, event: Event, now_ms: u64) -> &GameState {
        let mut next = self.state.clone();
        next.clock_ms = now_ms;
        dispatch(&mut next, event, now_ms);
        settle_unlocks(&mut next);
        self.state = next;
        &self.state
    }
}

fn dispatch(state: &mut GameState, event: Event, now_ms: u64) {
    match event {
        Event::Tick => tick::tick(state, now_ms),
        Event::AnimTick => {
            state.prune_popups();
            state.combo.expire_if_stale(now_ms);
        }
        Event::SetDirection { snake, direction } => {
            if snake.index() < state.snakes.len() {
                state.pending_dirs[snake.index()] = Some(direction);
            }
        }
        Event::Start => match state.phase {
            GamePhase::Running => {}
            GamePhase::Idle => begin_run(state, now_ms),
            GamePhase::Over => {
                state.reset_run_entities();
                begin_run(state, now_ms);
            }
        },
        Event::Pause => {
            if state.phase == GamePhase::Running {
                state.phase = GamePhase::Idle;
            }
        }
        Event::Reset => {
            state.reset_run_entities();
            state.phase = GamePhase::Idle;
        }
        Event::ToggleDualMode => {
            if state.phase != GamePhase::Running {
                state.dual_mode = !state.dual_mode;
                state.reset_run_entities();
                state.phase = GamePhase::Idle;
            }
        }
        Event::BuyUpgrade(id) => buy_upgrade(state, id),
        Event::PurchaseShopItem { id, cost } => purchase_shop_item(state, id, cost),
        Event::PurchaseSkin { id } => purchase_skin(state, &id),
        Event::EquipSkin { id } => {
            if state.skins.iter().any(|s| s.id == id && s.unlocked) {
                state.current_skin = id;
            }
        }
        Event::PurchaseTheme { id } => purchase_theme(state, &id),
        Event::EquipTheme { id } => {
            if state.themes.iter().any(|t| t.id == id && t.unlocked) {
                state.current_theme = id;
            }
        }
        Event::ToggleShop => state.show_shop = !state.show_shop,
        Event::ToggleCustomization => state.show_customization = !state.show_customization,
        Event::ToggleAchievements => state.show_achievements = !state.show_achievements,
        Event::ToggleStats => state.show_stats = !state.show_stats,
    }
}

/// Flip into Running. A fresh board (no ticks yet) also consumes the
/// pending shop boosts and stamps the run start.
fn begin_run(state: &mut GameState, now_ms: u64) {
    state.phase = GamePhase::Running;
    if state.ticks > 0 {
        return; // resuming a paused run
    }
    state.run_started_ms = now_ms;

    let boosts = std::mem::take(&mut state.pending_boosts);
    if boosts.shield {
        let duration = state.power_up_duration_ticks();
        state.snakes[0].grant_effect(PowerUpKind::Shield, duration);
    }
    if boosts.double_score {
        state.score_boost_run = true;
    }
    if let Some(count) = boosts.combo_start {
        state.combo.seed_chain(count, now_ms);
    }
    if boosts.lucky {
        state.lucky_run = true;
    }
}

fn buy_upgrade(state: &mut GameState, id: UpgradeId) {
    let Some(idx) = state.upgrades.iter().position(|u| u.id == id) else {
        return;
    };
    if state.upgrades[idx].maxed() {
        return;
    }
    let cost = state.upgrades[idx].next_cost();
    if !state.stats.try_spend_xp(cost) {
        return;
    }
    state.upgrades[idx].level += 1;
    log::info!(
        "bought upgrade {:?} level {} for {} xp",
        id,
        state.upgrades[idx].level,
        cost
    );
}

fn purchase_shop_item(state: &mut GameState, id: ShopItemId, cost: u64) {
    let item = shop::item(id);
    // A stale UI price is a silent no-op, never a discount
    if cost != item.price {
        return;
    }
    if !state.stats.try_spend_coins(cost) {
        return;
    }
    match item.effect() {
        ShopEffect::StartWithShield => state.pending_boosts.shield = true,
        ShopEffect::DoubleScoreRun => state.pending_boosts.double_score = true,
        ShopEffect::InstantXp(amount) => {
            if state.stats.award_xp(amount) > 0 {
                log::info!("level up: now level {}", state.stats.level);
            }
        }
        ShopEffect::StartCombo(count) => state.pending_boosts.combo_start = Some(count),
        ShopEffect::LuckyRun => state.pending_boosts.lucky = true,
    }
    log::info!("bought shop item {:?} for {} coins", id, cost);
}

fn purchase_skin(state: &mut GameState, id: &str) {
    let Some(idx) = state.skins.iter().position(|s| s.id == id) else {
        return;
    };
    if state.skins[idx].unlocked {
        return;
    }
    if !state.stats.try_spend_coins(state.skins[idx].price) {
        return;
    }
    state.skins[idx].unlocked = true;
    log::info!("unlocked skin {}", id);
}

fn purchase_theme(state: &mut GameState, id: &str) {
    let Some(idx) = state.themes.iter().position(|t| t.id == id) else {
        return;
    };
    if state.themes[idx].unlocked {
        return;
    }
    if !state.stats.try_spend_coins(state.themes[idx].price) {
        return;
    }
    state.themes[idx].unlocked = true;
    log::info!("unlocked theme {}", id);
}

/// Flip every newly-satisfied achievement and challenge and credit its
/// reward, looping because a reward can satisfy the next rule (coin
/// rewards count toward coin achievements). Each flag flips at most
/// once, so the loop terminates.
fn settle_unlocks(state: &mut GameState) {
    loop {
        let unlocked = achievements::newly_unlocked(state);
        let completed = challenges::newly_completed(state);
        if unlocked.is_empty() && completed.is_empty() {
            break;
        }
        for i in unlocked {
            let (id, name, coins) = {
                let a = &mut state.achievements[i];
                a.unlocked = true;
                a.unlocked_at_ms = Some(state.clock_ms);
                (a.id, a.name, a.reward_coins)
            };
            state.stats.earn_coins(coins);
            state.push_coin_popup(coins);
            state.push_toast(id, name);
            log::info!("achievement unlocked: {} (+{} coins)", id, coins);
        }
        for i in completed {
            let (id, coins, xp) = {
                let c = &mut state.challenges[i];
                c.completed = true;
                c.completed_at_ms = Some(state.clock_ms);
                (c.id, c.reward_coins, c.reward_xp)
            };
            state.stats.earn_coins(coins);
            if state.stats.award_xp(xp) > 0 {
                log::info!("level up: now level {}", state.stats.level);
            }
            state.push_coin_popup(coins);
            log::info!("challenge complete: {} (+{} coins, +{} xp)", id, coins, xp);
        }
    }
}
