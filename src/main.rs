//! Headless demo driver
//!
//! Runs a few scripted sessions against a virtual clock: a greedy bot
//! steers toward the nearest food while the loop ticks, the profile is
//! saved between runs, and the summary lands in the log. This is the
//! native smoke path; a real frontend embeds `GameLoop` the same way
//! and renders the snapshots.

use std::time::{SystemTime, UNIX_EPOCH};

use snake_rpg::persistence::{self, MemoryStore};
use snake_rpg::sim::{Direction, Event, GamePhase, GameState, Simulation, SnakeId};
use snake_rpg::{GameLoop, consts};

const DEMO_RUNS: u32 = 3;
const STEP_MS: u64 = 50;
const MAX_RUN_MS: u64 = 120_000;

fn main() {
    env_logger::init();

    let now_ms = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);
    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(now_ms);
    log::info!("snake-rpg headless demo, seed {}", seed);

    let mut store = MemoryStore::new();
    let mut state = GameState::new(seed, now_ms);
    persistence::load_profile(&store, &mut state);
    let mut game = GameLoop::with_simulation(Simulation::from_state(state), now_ms);

    let mut clock = now_ms;
    for run in 1..=DEMO_RUNS {
        game.push(Event::Start, clock);
        let deadline = clock + MAX_RUN_MS;
        while clock < deadline {
            clock += STEP_MS;
            if let Some(direction) = steer(game.state()) {
                game.push(
                    Event::SetDirection {
                        snake: SnakeId::One,
                        direction,
                    },
                    clock,
                );
            }
            if game.advance(clock).phase == GamePhase::Over {
                break;
            }
        }
        let state = game.state();
        log::info!(
            "run {}: score {}, length {}, level {}, {} coins",
            run,
            state.score,
            state.snakes[0].len(),
            state.stats.level,
            state.stats.coins
        );
        persistence::save_profile(&mut store, state);
        clock += consts::BASE_TICK_MS;
    }

    let stats = &game.state().stats;
    log::info!(
        "demo done: high score {}, {} games, {} food eaten, {} lifetime coins, {} achievements unlocked",
        stats.high_score,
        stats.games_played,
        stats.total_food_eaten,
        stats.total_coins_earned,
        game.state().achievements.iter().filter(|a| a.unlocked).count()
    );
}

/// One-move-lookahead chase of the nearest food: prefer the axis with
/// the larger gap, skip reversals, and veto any step that dies.
fn steer(state: &GameState) -> Option<Direction> {
    if state.phase != GamePhase::Running {
        return None;
    }
    let snake = state.snakes.first()?;
    let head = snake.head();
    let food = state
        .food
        .iter()
        .min_by_key(|f| snake_rpg::sim::chebyshev(head, **f))?;

    let d = *food - head;
    let mut candidates = Vec::new();
    let x_dir = if d.x > 0 {
        Direction::Right
    } else {
        Direction::Left
    };
    let y_dir = if d.y > 0 { Direction::Down } else { Direction::Up };
    if d.x.abs() >= d.y.abs() {
        candidates.extend([x_dir, y_dir]);
    } else {
        candidates.extend([y_dir, x_dir]);
    }
    candidates.extend([
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ]);

    candidates.into_iter().find(|dir| {
        !dir.is_opposite(snake.direction)
            && !snake_rpg::sim::wall_collision(head + dir.delta())
            && !snake_rpg::sim::hits_any(head + dir.delta(), &snake.segments)
    })
}
