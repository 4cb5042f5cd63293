//! Snake RPG - A grid snake game core with RPG-style progression
//!
//! Core modules:
//! - `sim`: Deterministic simulation (grid movement, collisions, game state, events)
//! - `progression`: Pure XP/level/combo/cost math
//! - `stats`: Persistent player statistics
//! - `catalog`: Upgrades, achievements, challenges, shop items, cosmetics
//! - `persistence`: Save/load against a flat key-value store
//! - `runtime`: Timer scheduling that drives the simulation from wall-clock time

pub mod catalog;
pub mod persistence;
pub mod progression;
pub mod runtime;
pub mod sim;
pub mod stats;

pub use runtime::GameLoop;
pub use sim::{Direction, Event, GamePhase, GameState, Position, Simulation};
pub use stats::PlayerStats;

/// Game configuration constants
pub mod consts {
    /// Board is a square GRID_SIZE x GRID_SIZE grid of cells
    pub const GRID_SIZE: i32 = 20;

    /// Base interval between movement ticks at speed level 0
    pub const BASE_TICK_MS: u64 = 200;
    /// Hard floor for the tick interval regardless of upgrades and effects
    pub const MIN_TICK_MS: u64 = 40;
    /// Fixed cadence for the animation tick (popup expiry sweeps)
    pub const ANIM_TICK_MS: u64 = 100;

    /// Score for one food at multiplier 1.0
    pub const FOOD_SCORE: u32 = 10;
    /// XP for one food before bonuses
    pub const XP_PER_FOOD: u64 = 10;
    /// XP for one power-up pickup before bonuses
    pub const XP_PER_POWER_UP: u64 = 25;

    /// Combo chain resets when no pickup lands within this window
    pub const COMBO_TIMEOUT_MS: u64 = 3000;

    /// Chance per tick to spawn a power-up at spawn upgrade level 0
    pub const POWER_UP_SPAWN_CHANCE: f64 = 0.15;
    /// Spawn chance is clamped here no matter how it is boosted
    pub const POWER_UP_SPAWN_CHANCE_MAX: f64 = 0.75;
    /// Ticks a power-up effect lasts at duration upgrade level 0
    pub const POWER_UP_BASE_DURATION_TICKS: u32 = 25;
    /// Ticks an uncollected power-up stays on the ground
    pub const POWER_UP_GROUND_TTL_TICKS: u32 = 50;

    /// Extra magnet reach while a FoodMagnet effect is active
    pub const MAGNET_EFFECT_BONUS_CELLS: i32 = 5;

    /// Floating popup lifetime
    pub const POPUP_TTL_MS: u64 = 2000;
    /// Cap on simultaneously tracked popups of one kind
    pub const MAX_POPUPS: usize = 64;
}
