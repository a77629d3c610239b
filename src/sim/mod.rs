//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Unit timestep only
//! - Seeded RNG only, owned by the game state
//! - Stable iteration order (bricks by cell index)
//! - No rendering or platform dependencies

pub mod geometry;
pub mod observation;
pub mod rng;
pub mod state;
pub mod tick;

pub use geometry::Rect;
pub use observation::{BallObservation, Observation};
pub use rng::{DEFAULT_SEED, RandomEventGenerator};
pub use state::{Ball, Brick, BrickGrid, Bullet, Cell, GameState, Paddle, Termination};
pub use tick::{Command, tick};
