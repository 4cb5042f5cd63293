//! Fixed timestep simulation tick
//!
//! One call advances a running game by exactly one movement step:
//! buffered input, movement, collisions, pickups, spawns, effect and
//! combo bookkeeping, and the death transition. Everything is driven by
//! the state's own seeded RNG, so a tick is deterministic.

use glam::IVec2;
use rand::Rng;

use super::grid::{self, Position};
use super::state::{GamePhase, GameState, GroundPowerUp, PowerUpKind};
use crate::catalog::UpgradeId;
use crate::catalog::challenges::DAY_MS;
use crate::consts::*;
use crate::progression;

/// How one snake's head move resolved this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MoveOutcome {
    /// Head advanced to this cell
    Moved(Position),
    /// Wall hit absorbed by a shield; the snake holds position
    Blocked,
    /// Unneutralized collision
    Dead,
}

/// Advance a running game by one movement tick.
///
/// No-op unless the phase is `Running`. `now_ms` stamps the snapshot
/// clock and feeds the combo window.
pub fn tick(state: &mut GameState, now_ms: u64) {
    if state.phase != GamePhase::Running {
        return;
    }
    state.clock_ms = now_ms;
    state.ticks += 1;

    // Consume the buffered intent per snake, rejecting 180 reversals
    for (i, snake) in state.snakes.iter_mut().enumerate() {
        if let Some(dir) = state.pending_dirs[i].take() {
            if !dir.is_opposite(snake.direction) {
                snake.direction = dir;
            }
        }
    }

    // Classify every head move against tick-start bodies so dual mode
    // sees both snakes advance simultaneously
    let start_bodies: Vec<Vec<Position>> =
        state.snakes.iter().map(|s| s.segments.clone()).collect();
    let mut outcomes = Vec::with_capacity(state.snakes.len());
    for (i, snake) in state.snakes.iter().enumerate() {
        let new_head = snake.head() + snake.direction.delta();
        let outcome = if grid::wall_collision(new_head) {
            if snake.has_effect(PowerUpKind::Shield) {
                MoveOutcome::Blocked
            } else {
                MoveOutcome::Dead
            }
        } else if grid::hits_any(new_head, &start_bodies[i])
            && !snake.has_effect(PowerUpKind::Invincibility)
        {
            MoveOutcome::Dead
        } else if start_bodies
            .iter()
            .enumerate()
            .any(|(j, body)| j != i && grid::hits_any(new_head, body))
        {
            // Cross-snake hits are lethal regardless of effects
            MoveOutcome::Dead
        } else {
            MoveOutcome::Moved(new_head)
        };
        outcomes.push(outcome);
    }

    if outcomes.contains(&MoveOutcome::Dead) {
        finish_run(state, now_ms);
        return;
    }

    // Movement and food pickup, resolved per snake against the
    // tick-start food set. Two heads claiming the same cell both score
    // and both spawn a replacement; the reference does the same and the
    // duplication is kept deliberately (see DESIGN.md).
    let start_food = state.food.clone();
    for i in 0..state.snakes.len() {
        let MoveOutcome::Moved(new_head) = outcomes[i] else {
            continue;
        };
        state.snakes[i].segments.insert(0, new_head);
        if grid::hits_any(new_head, &start_food) {
            if let Some(slot) = state.food.iter().position(|f| *f == new_head) {
                state.food.remove(slot);
            }
            eat_food(state, i, new_head);
            state.spawn_food();
        } else {
            state.snakes[i].segments.pop();
        }
    }

    attract_food(state);
    pick_up_power_ups(state);

    // Ground power-ups age out; maybe a new one appears
    for p in &mut state.power_ups {
        p.ttl_ticks = p.ttl_ticks.saturating_sub(1);
    }
    state.power_ups.retain(|p| p.ttl_ticks > 0);
    roll_power_up_spawn(state);

    for snake in &mut state.snakes {
        snake.age_effects();
    }

    state.combo.expire_if_stale(now_ms);
}

/// Tick interval implied by the current state: the speed upgrade
/// shortens the base interval, SpeedBoost halves it, SlowMotion doubles
/// it (one of each cancels out), floored at `MIN_TICK_MS`.
pub fn effective_tick_ms(state: &GameState) -> u64 {
    let speed_pct = state.upgrade_effect(UpgradeId::Speed);
    let mut interval = BASE_TICK_MS as f64 * 100.0 / (100.0 + speed_pct);
    if state
        .snakes
        .iter()
        .any(|s| s.has_effect(PowerUpKind::SpeedBoost))
    {
        interval *= 0.5;
    }
    if state
        .snakes
        .iter()
        .any(|s| s.has_effect(PowerUpKind::SlowMotion))
    {
        interval *= 2.0;
    }
    (interval.round() as u64).max(MIN_TICK_MS)
}

/// Score, XP, combo and stats bookkeeping for one eaten food.
fn eat_food(state: &mut GameState, snake_idx: usize, pos: Position) {
    // The multiplier paid is the one the chain had before this pickup
    let combo_mult = state.combo.register_pickup(state.clock_ms);
    let score_mult = state.upgrade_effect(UpgradeId::ScoreMultiplier);
    let xp_mult = state.upgrade_effect(UpgradeId::XpBonus);

    let mut points = FOOD_SCORE as f64 * score_mult * combo_mult;
    if state.snakes[snake_idx].has_effect(PowerUpKind::DoubleScore) {
        points *= 2.0;
    }
    if state.score_boost_run {
        points *= 2.0;
    }
    state.score += points.floor() as u32;

    let xp = (XP_PER_FOOD as f64 * combo_mult * xp_mult).floor() as u64;
    if state.stats.award_xp(xp) > 0 {
        log::info!("level up: now level {}", state.stats.level);
    }
    state.stats.total_food_eaten += 1;
    let len = state.snakes[snake_idx].len() as u32;
    state.stats.longest_snake = state.stats.longest_snake.max(len);
    state.push_xp_popup(pos, xp, combo_mult > 1.0);
}

/// Resolve head-on-power-up pickups for every snake.
fn pick_up_power_ups(state: &mut GameState) {
    for i in 0..state.snakes.len() {
        let head = state.snakes[i].head();
        let Some(slot) = state.power_ups.iter().position(|p| p.pos == head) else {
            continue;
        };
        let power_up = state.power_ups.remove(slot);
        let duration = state.power_up_duration_ticks();
        state.snakes[i].refresh_effect(power_up.kind, duration);
        let xp = (XP_PER_POWER_UP as f64 * state.upgrade_effect(UpgradeId::XpBonus)).floor() as u64;
        if state.stats.award_xp(xp) > 0 {
            log::info!("level up: now level {}", state.stats.level);
        }
        state.push_xp_popup(head, xp, false);
        log::debug!("picked up {:?} at ({}, {})", power_up.kind, head.x, head.y);
    }
}

/// Drift in-range food one cell toward the nearest snake head.
///
/// Reach is the magnet upgrade's range, extended while a FoodMagnet
/// effect rides that snake. Food never steps onto an occupied cell.
fn attract_food(state: &mut GameState) {
    let base_range = state.upgrade_effect(UpgradeId::FoodMagnet) as i32;
    let heads: Vec<(Position, i32)> = state
        .snakes
        .iter()
        .map(|s| {
            let mut range = base_range;
            if s.has_effect(PowerUpKind::FoodMagnet) {
                range += MAGNET_EFFECT_BONUS_CELLS;
            }
            (s.head(), range)
        })
        .collect();
    if heads.iter().all(|(_, range)| *range <= 0) {
        return;
    }

    let mut occupied = grid::occupied_cells(
        state
            .snakes
            .iter()
            .map(|s| s.segments.as_slice())
            .chain([state.food.as_slice()]),
    );
    occupied.extend(state.power_ups.iter().map(|p| p.pos));

    for i in 0..state.food.len() {
        let pos = state.food[i];
        let target = heads
            .iter()
            .filter(|(head, range)| {
                let dist = grid::chebyshev(pos, *head);
                dist > 0 && dist <= *range
            })
            .min_by_key(|(head, _)| grid::chebyshev(pos, *head))
            .map(|(head, _)| *head);
        let Some(head) = target else { continue };

        // One axis-major step toward the head
        let d = head - pos;
        let step = if d.x.abs() >= d.y.abs() {
            IVec2::new(d.x.signum(), 0)
        } else {
            IVec2::new(0, d.y.signum())
        };
        let next = pos + step;
        if !occupied.contains(&next) {
            occupied.remove(&pos);
            occupied.insert(next);
            state.food[i] = next;
        }
    }
}

/// Independent per-tick chance to drop a new power-up on a free cell.
fn roll_power_up_spawn(state: &mut GameState) {
    let mut chance =
        POWER_UP_SPAWN_CHANCE * (1.0 + state.upgrade_effect(UpgradeId::PowerUpSpawn) / 100.0);
    if state.lucky_run {
        chance *= 2.0;
    }
    let chance = chance.min(POWER_UP_SPAWN_CHANCE_MAX);
    if !state.rng.random_bool(chance) {
        return;
    }

    let mut occupied = grid::occupied_cells(
        state
            .snakes
            .iter()
            .map(|s| s.segments.as_slice())
            .chain([state.food.as_slice()]),
    );
    occupied.extend(state.power_ups.iter().map(|p| p.pos));
    let Some(pos) = grid::random_free_cell(&mut state.rng, &occupied) else {
        return;
    };
    let kind = PowerUpKind::ALL[state.rng.random_range(0..PowerUpKind::ALL.len())];
    let id = state.next_entity_id();
    state.power_ups.push(GroundPowerUp {
        id,
        pos,
        kind,
        ttl_ticks: POWER_UP_GROUND_TTL_TICKS,
    });
    log::debug!("spawned {:?} at ({}, {})", kind, pos.x, pos.y);
}

/// Terminal transition: fold the run into lifetime stats and pay out
/// the session coin award. Achievement evaluation happens in the event
/// layer right after, against this snapshot.
fn finish_run(state: &mut GameState, now_ms: u64) {
    state.phase = GamePhase::Over;
    let run_ms = now_ms.saturating_sub(state.run_started_ms);
    state.stats.record_run_end(state.score, run_ms, now_ms / DAY_MS);
    let coins = progression::session_coins(state.score, state.combo.max_combo);
    if coins > 0 {
        state.stats.earn_coins(coins);
        state.push_coin_popup(coins);
    }
    log::info!(
        "run over: score {}, max combo {}x, {} coins earned",
        state.score,
        state.combo.max_combo,
        coins
    );
}
