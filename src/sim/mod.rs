//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - State replaced wholesale per event, never shared mutably
//! - No rendering or platform dependencies

pub mod event;
pub mod grid;
pub mod state;
pub mod tick;

pub use event::{Event, Simulation};
pub use grid::{Direction, Position, chebyshev, hits_any, random_free_cell, wall_collision};
pub use state::{
    ActivePowerUp, ComboState, GamePhase, GameState, GroundPowerUp, PendingBoosts, PowerUpKind,
    Snake, SnakeId,
};
pub use tick::{effective_tick_ms, tick};
