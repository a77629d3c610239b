//! Breakout Sim - a deterministic Breakout engine for reinforcement learning
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, collisions, rewards, termination)
//! - `codec`: Mixed-radix encoding of discrete observations
//! - `env`: Step/reset environment, observation views and frame-skip
//! - `config`: Data-driven game geometry and rewards

pub mod codec;
pub mod config;
pub mod env;
pub mod error;
pub mod sim;

pub use codec::{decode, encode};
pub use config::BreakoutConfig;
pub use env::{
    Breakout, ComparePolicy, EncodedObservation, Environment, FrameSkip, Info, Observation,
    ObservationKind, ObservedBreakout, Step,
};
pub use error::{BreakoutError, Result};
pub use sim::{Command, GameState};

/// Game constants not exposed through the configuration
pub mod consts {
    /// Window height in pixels
    pub const WIN_HEIGHT: u32 = 480;

    /// Top edge of the first brick row
    pub const BRICK_TOP_OFFSET: f32 = 70.0;
    /// Vertical gap between brick rows
    pub const BRICK_ROW_GAP: f32 = 8.0;

    /// Initial ball velocity (pixels per tick, y grows downward)
    pub const BALL_START_SPEED_X: f32 = 2.0;
    pub const BALL_START_SPEED_Y: f32 = 5.0;
    /// Ball spawns this far above the bottom edge (plus its radius)
    pub const BALL_SPAWN_MARGIN: f32 = 100.0;

    /// Paddle top edge distance from the bottom
    pub const PADDLE_BOTTOM_MARGIN: f32 = 20.0;

    /// Bullet vertical speed when fired (negative = up)
    pub const BULLET_SPEED: f32 = -10.0;
    /// Bullet resets once it climbs above this y
    pub const BULLET_CEILING: f32 = 5.0;
    /// Bullet hit box
    pub const BULLET_WIDTH: f32 = 2.0;
    pub const BULLET_HEIGHT: f32 = 6.0;

    /// Horizontal speed below which the ball counts as moving straight up/down
    pub const SPEED_EPSILON: f32 = 1e-6;
    /// Boundary between slow and quick horizontal speed classes
    pub const QUICK_SPEED: f32 = 2.5;
}
