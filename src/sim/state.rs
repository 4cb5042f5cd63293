//! Game state and core simulation types
//!
//! Everything the simulation needs lives here: run entities, the
//! progression wallets and catalogs, and the seeded RNG. State is
//! replaced wholesale per applied event, so the whole aggregate is
//! cheap to clone and serializable.

use glam::IVec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::grid::{self, Direction, Position};
use crate::catalog::{
    Achievement, Challenge, GameTheme, SnakeSkin, Upgrade, UpgradeId, create_achievements,
    create_challenges, create_skins, create_themes, create_upgrades, upgrades,
};
use crate::consts::*;
use crate::progression;
use crate::stats::PlayerStats;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GamePhase {
    /// No run in progress (fresh board, menus, or paused)
    Idle,
    /// Active gameplay
    Running,
    /// Run ended in a death
    Over,
}

/// Which snake an input addresses (dual mode adds the second)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SnakeId {
    One,
    Two,
}

impl SnakeId {
    pub fn index(self) -> usize {
        match self {
            SnakeId::One => 0,
            SnakeId::Two => 1,
        }
    }
}

/// Power-up variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    SpeedBoost,
    Invincibility,
    FoodMagnet,
    DoubleScore,
    SlowMotion,
    Shield,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 6] = [
        PowerUpKind::SpeedBoost,
        PowerUpKind::Invincibility,
        PowerUpKind::FoodMagnet,
        PowerUpKind::DoubleScore,
        PowerUpKind::SlowMotion,
        PowerUpKind::Shield,
    ];

    pub fn label(self) -> &'static str {
        match self {
            PowerUpKind::SpeedBoost => "Speed Boost",
            PowerUpKind::Invincibility => "Invincibility",
            PowerUpKind::FoodMagnet => "Food Magnet",
            PowerUpKind::DoubleScore => "Double Score",
            PowerUpKind::SlowMotion => "Slow Motion",
            PowerUpKind::Shield => "Shield",
        }
    }
}

/// A power-up waiting on the board
#[derive(Debug, Clone, Copy, Serialize)]
pub struct GroundPowerUp {
    pub id: u32,
    pub pos: Position,
    pub kind: PowerUpKind,
    /// Ticks left before it despawns uncollected
    pub ttl_ticks: u32,
}

/// A collected power-up effect riding on a snake
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ActivePowerUp {
    pub kind: PowerUpKind,
    pub remaining_ticks: u32,
}

/// A snake: segments head-first, plus its heading and active effects
#[derive(Debug, Clone, Serialize)]
pub struct Snake {
    pub segments: Vec<Position>,
    pub direction: Direction,
    pub effects: Vec<ActivePowerUp>,
}

impl Snake {
    pub fn spawn(head: Position, direction: Direction) -> Self {
        Self {
            segments: vec![head],
            direction,
            effects: Vec::new(),
        }
    }

    /// Head cell. Segments are never empty.
    pub fn head(&self) -> Position {
        self.segments[0]
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn has_effect(&self, kind: PowerUpKind) -> bool {
        self.effects.iter().any(|e| e.kind == kind)
    }

    pub fn grant_effect(&mut self, kind: PowerUpKind, ticks: u32) {
        self.effects.push(ActivePowerUp {
            kind,
            remaining_ticks: ticks,
        });
    }

    /// Restart an already-running effect or attach a fresh one.
    pub fn refresh_effect(&mut self, kind: PowerUpKind, ticks: u32) {
        if let Some(effect) = self.effects.iter_mut().find(|e| e.kind == kind) {
            effect.remaining_ticks = ticks;
        } else {
            self.grant_effect(kind, ticks);
        }
    }

    /// Count down every active effect one tick and drop expired ones.
    pub fn age_effects(&mut self) {
        for effect in &mut self.effects {
            effect.remaining_ticks = effect.remaining_ticks.saturating_sub(1);
        }
        self.effects.retain(|e| e.remaining_ticks > 0);
    }
}

/// Combo chain state for the current run
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ComboState {
    pub count: u32,
    /// Multiplier the *next* pickup will pay
    pub multiplier: f64,
    pub last_collect_ms: u64,
    /// Session peak; survives resets of the chain
    pub max_combo: u32,
}

impl Default for ComboState {
    fn default() -> Self {
        Self {
            count: 0,
            multiplier: 1.0,
            last_collect_ms: 0,
            max_combo: 0,
        }
    }
}

impl ComboState {
    /// Registers one pickup and returns the multiplier it pays (the
    /// one derived from the chain length before this pickup).
    pub fn register_pickup(&mut self, now_ms: u64) -> f64 {
        let applied = progression::combo_multiplier(self.count);
        self.count += 1;
        self.multiplier = progression::combo_multiplier(self.count);
        self.max_combo = self.max_combo.max(self.count);
        self.last_collect_ms = now_ms;
        applied
    }

    /// Resets the chain once the collect window has lapsed.
    pub fn expire_if_stale(&mut self, now_ms: u64) -> bool {
        if self.count > 0 && now_ms.saturating_sub(self.last_collect_ms) > COMBO_TIMEOUT_MS {
            self.reset_chain();
            true
        } else {
            false
        }
    }

    /// Drops the chain but keeps the session peak.
    pub fn reset_chain(&mut self) {
        self.count = 0;
        self.multiplier = 1.0;
    }

    /// Seeds a chain already in progress (combo starter purchases).
    pub fn seed_chain(&mut self, count: u32, now_ms: u64) {
        self.count = count;
        self.multiplier = progression::combo_multiplier(count);
        self.max_combo = self.max_combo.max(count);
        self.last_collect_ms = now_ms;
    }
}

/// Floating XP popup (cosmetic, TTL-pruned)
#[derive(Debug, Clone, Copy, Serialize)]
pub struct XpPopup {
    pub id: u32,
    pub pos: Position,
    pub amount: u64,
    /// True when a combo multiplier above 1x was applied
    pub combo: bool,
    pub spawned_ms: u64,
}

/// Coin award popup (cosmetic, TTL-pruned)
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CoinPopup {
    pub id: u32,
    pub amount: u64,
    pub spawned_ms: u64,
}

/// Achievement unlock toast (cosmetic, TTL-pruned)
#[derive(Debug, Clone, Copy, Serialize)]
pub struct AchievementToast {
    pub id: u32,
    pub achievement_id: &'static str,
    pub name: &'static str,
    pub spawned_ms: u64,
}

/// Shop boosts bought for the next run, consumed when it starts
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct PendingBoosts {
    pub shield: bool,
    pub double_score: bool,
    pub combo_start: Option<u32>,
    pub lucky: bool,
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// RNG carried in-state so snapshots replay identically
    pub rng: Pcg32,
    /// Wall-clock timestamp of the last applied event
    pub clock_ms: u64,
    pub phase: GamePhase,
    pub dual_mode: bool,
    /// One snake normally, two in dual mode
    pub snakes: Vec<Snake>,
    pub food: Vec<Position>,
    pub power_ups: Vec<GroundPowerUp>,
    /// Score of the current run
    pub score: u32,
    pub combo: ComboState,
    pub run_started_ms: u64,
    /// Movement ticks elapsed in the current run
    pub ticks: u64,
    /// Latest buffered direction intent per snake, consumed next tick
    pub pending_dirs: [Option<Direction>; 2],
    pub pending_boosts: PendingBoosts,
    /// Run-scoped flags from consumed boosts
    pub score_boost_run: bool,
    pub lucky_run: bool,
    pub stats: PlayerStats,
    pub upgrades: Vec<Upgrade>,
    pub achievements: Vec<Achievement>,
    pub challenges: Vec<Challenge>,
    pub skins: Vec<SnakeSkin>,
    pub themes: Vec<GameTheme>,
    pub current_skin: String,
    pub current_theme: String,
    pub xp_popups: Vec<XpPopup>,
    pub coin_popups: Vec<CoinPopup>,
    pub toasts: Vec<AchievementToast>,
    pub show_shop: bool,
    pub show_customization: bool,
    pub show_achievements: bool,
    pub show_stats: bool,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a new game state with the given seed. `now_ms` anchors
    /// the clock and the challenge expiry windows.
    pub fn new(seed: u64, now_ms: u64) -> Self {
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            clock_ms: now_ms,
            phase: GamePhase::Idle,
            dual_mode: false,
            snakes: Vec::new(),
            food: Vec::new(),
            power_ups: Vec::new(),
            score: 0,
            combo: ComboState::default(),
            run_started_ms: 0,
            ticks: 0,
            pending_dirs: [None, None],
            pending_boosts: PendingBoosts::default(),
            score_boost_run: false,
            lucky_run: false,
            stats: PlayerStats::default(),
            upgrades: create_upgrades(),
            achievements: create_achievements(),
            challenges: create_challenges(now_ms),
            skins: create_skins(),
            themes: create_themes(),
            current_skin: "default".to_string(),
            current_theme: "classic".to_string(),
            xp_popups: Vec::new(),
            coin_popups: Vec::new(),
            toasts: Vec::new(),
            show_shop: false,
            show_customization: false,
            show_achievements: false,
            show_stats: false,
            next_id: 1,
        };
        state.reset_run_entities();
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Lay out a fresh board for the current mode: snakes at their
    /// start cells, one food, nothing else.
    pub fn reset_run_entities(&mut self) {
        self.snakes.clear();
        self.snakes
            .push(Snake::spawn(IVec2::new(10, 10), Direction::Right));
        if self.dual_mode {
            self.snakes[0] = Snake::spawn(IVec2::new(5, 5), Direction::Right);
            self.snakes
                .push(Snake::spawn(IVec2::new(14, 14), Direction::Left));
        }
        self.power_ups.clear();
        self.food.clear();
        self.spawn_food();
        self.score = 0;
        self.ticks = 0;
        self.combo = ComboState::default();
        self.pending_dirs = [None, None];
        self.score_boost_run = false;
        self.lucky_run = false;
        self.xp_popups.clear();
        self.coin_popups.clear();
    }

    /// Spawn one food on a free cell. No-op on a full board.
    pub fn spawn_food(&mut self) {
        let mut occupied = grid::occupied_cells(
            self.snakes
                .iter()
                .map(|s| s.segments.as_slice())
                .chain([self.food.as_slice()]),
        );
        occupied.extend(self.power_ups.iter().map(|p| p.pos));
        if let Some(pos) = grid::random_free_cell(&mut self.rng, &occupied) {
            self.food.push(pos);
        }
    }

    /// Current level of an upgrade track.
    pub fn upgrade_level(&self, id: UpgradeId) -> u32 {
        self.upgrades
            .iter()
            .find(|u| u.id == id)
            .map(|u| u.level)
            .unwrap_or(0)
    }

    /// Numeric bonus of an upgrade track at its current level.
    pub fn upgrade_effect(&self, id: UpgradeId) -> f64 {
        upgrades::effect_at(id, self.upgrade_level(id))
    }

    /// Power-up effect duration after the duration upgrade.
    pub fn power_up_duration_ticks(&self) -> u32 {
        let bonus = self.upgrade_effect(UpgradeId::PowerUpDuration);
        (POWER_UP_BASE_DURATION_TICKS as f64 * bonus).floor() as u32
    }

    pub fn push_xp_popup(&mut self, pos: Position, amount: u64, combo: bool) {
        if self.xp_popups.len() >= MAX_POPUPS {
            return;
        }
        let id = self.next_entity_id();
        self.xp_popups.push(XpPopup {
            id,
            pos,
            amount,
            combo,
            spawned_ms: self.clock_ms,
        });
    }

    pub fn push_coin_popup(&mut self, amount: u64) {
        if self.coin_popups.len() >= MAX_POPUPS {
            return;
        }
        let id = self.next_entity_id();
        self.coin_popups.push(CoinPopup {
            id,
            amount,
            spawned_ms: self.clock_ms,
        });
    }

    pub fn push_toast(&mut self, achievement_id: &'static str, name: &'static str) {
        if self.toasts.len() >= MAX_POPUPS {
            return;
        }
        let id = self.next_entity_id();
        self.toasts.push(AchievementToast {
            id,
            achievement_id,
            name,
            spawned_ms: self.clock_ms,
        });
    }

    /// Drop popups and toasts past their TTL.
    pub fn prune_popups(&mut self) {
        let cutoff = self.clock_ms.saturating_sub(POPUP_TTL_MS);
        self.xp_popups.retain(|p| p.spawned_ms > cutoff);
        self.coin_popups.retain(|p| p.spawned_ms > cutoff);
        self.toasts.retain(|t| t.spawned_ms > cutoff);
    }
}
