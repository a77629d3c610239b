//! Game configuration
//!
//! Geometry, rewards, discretisation and feature toggles. Loaded from JSON by
//! external tooling; missing fields fall back to the defaults below.

use serde::{Deserialize, Serialize};

use crate::consts::WIN_HEIGHT;
use crate::error::{BreakoutError, Result};

/// Number of horizontal ball speed classes
pub const N_BALL_X_SPEED: usize = 5;
/// Number of vertical ball speed classes
pub const N_BALL_Y_SPEED: usize = 2;
/// Number of combined ball direction codes
pub const N_BALL_DIR: usize = 10;

/// Immutable parameter set for one family of episodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BreakoutConfig {
    // === Grid ===
    pub brick_rows: u32,
    /// Must be at least 3
    pub brick_cols: u32,
    pub brick_width: u32,
    pub brick_height: u32,
    /// Horizontal gap between bricks (and to the side walls)
    pub brick_xdistance: u32,

    // === Paddle & ball ===
    pub paddle_width: u32,
    pub paddle_height: u32,
    /// Pixels moved per LEFT/RIGHT command
    pub paddle_speed: u32,
    pub ball_radius: u32,

    // === Rewards ===
    pub brick_reward: f64,
    /// Applied every tick (time penalty)
    pub step_reward: f64,
    pub game_over_reward: f64,

    // === Discretisation ===
    /// Pixels per horizontal observation bin
    pub resolution_x: u32,
    /// Pixels per vertical observation bin
    pub resolution_y: u32,

    /// Maximum steps per episode (None = 300 * rows * cols)
    pub horizon: Option<u64>,

    // === Toggles ===
    pub fire_enabled: bool,
    pub ball_enabled: bool,
    /// Select the edge-accelerating bounce model instead of the fixed-speed one
    pub complex_bump: bool,
    /// Disable every random perturbation
    pub deterministic: bool,
}

impl Default for BreakoutConfig {
    fn default() -> Self {
        Self {
            brick_rows: 3,
            brick_cols: 3,
            brick_width: 60,
            brick_height: 12,
            brick_xdistance: 20,

            paddle_width: 80,
            paddle_height: 10,
            paddle_speed: 10,
            ball_radius: 10,

            brick_reward: 5.0,
            step_reward: -0.01,
            game_over_reward: -10.0,

            resolution_x: 20,
            resolution_y: 10,

            horizon: None,

            fire_enabled: false,
            ball_enabled: true,
            complex_bump: false,
            deterministic: true,
        }
    }
}

impl BreakoutConfig {
    /// Check the invariants every simulation relies on
    pub fn validate(&self) -> Result<()> {
        if self.brick_cols < 3 {
            return Err(BreakoutError::InvalidConfig(format!(
                "the number of columns must be at least three (got {})",
                self.brick_cols
            )));
        }
        if self.brick_rows < 1 {
            return Err(BreakoutError::InvalidConfig(
                "the number of rows must be at least one".to_string(),
            ));
        }
        if !self.ball_enabled && !self.fire_enabled {
            return Err(BreakoutError::InvalidConfig(
                "at least one of ball_enabled and fire_enabled must be true".to_string(),
            ));
        }
        if self.resolution_x == 0 || self.resolution_y == 0 {
            return Err(BreakoutError::InvalidConfig(
                "resolution divisors must be positive".to_string(),
            ));
        }
        if self.checked_win_width().is_none() {
            return Err(BreakoutError::InvalidConfig(format!(
                "window width overflows ({} columns of {}px with {}px gaps)",
                self.brick_cols, self.brick_width, self.brick_xdistance
            )));
        }
        if self.horizon.is_none() && self.default_horizon().is_none() {
            return Err(BreakoutError::InvalidConfig(format!(
                "default horizon overflows for {}x{} bricks",
                self.brick_rows, self.brick_cols
            )));
        }
        Ok(())
    }

    /// Consume and return the config if it is valid
    pub fn validated(self) -> Result<Self> {
        self.validate()?;
        Ok(self)
    }

    /// Parse a (possibly partial) JSON document and validate it
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| BreakoutError::InvalidConfig(format!("malformed JSON: {e}")))?;
        config.validate()?;
        log::info!(
            "Loaded configuration: {}x{} bricks, ball={}, fire={}",
            config.brick_rows,
            config.brick_cols,
            config.ball_enabled,
            config.fire_enabled
        );
        Ok(config)
    }

    pub fn to_json(&self) -> String {
        // Plain struct of scalars; serialisation cannot fail
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    fn checked_win_width(&self) -> Option<u32> {
        self.brick_width
            .checked_add(self.brick_xdistance)?
            .checked_mul(self.brick_cols)?
            .checked_add(self.brick_xdistance)
    }

    fn default_horizon(&self) -> Option<u64> {
        300u64
            .checked_mul(u64::from(self.brick_rows))?
            .checked_mul(u64::from(self.brick_cols))
    }

    /// Saturates for configs that fail validation
    #[inline]
    pub fn win_width(&self) -> u32 {
        self.checked_win_width().unwrap_or(u32::MAX)
    }

    #[inline]
    pub fn win_height(&self) -> u32 {
        WIN_HEIGHT
    }

    /// Effective horizon
    pub fn horizon(&self) -> u64 {
        self.horizon
            .or_else(|| self.default_horizon())
            .unwrap_or(u64::MAX)
    }

    /// Action space size (NOP, LEFT, RIGHT and optionally FIRE)
    pub fn n_actions(&self) -> usize {
        if self.fire_enabled { 4 } else { 3 }
    }

    pub fn n_paddle_x(&self) -> usize {
        (self.win_width() / self.resolution_x) as usize + 1
    }

    pub fn n_ball_x(&self) -> usize {
        (self.win_width() / self.resolution_x) as usize + 1
    }

    pub fn n_ball_y(&self) -> usize {
        (self.win_height() / self.resolution_y) as usize + 1
    }

    pub fn n_ball_x_speed(&self) -> usize {
        N_BALL_X_SPEED
    }

    pub fn n_ball_y_speed(&self) -> usize {
        N_BALL_Y_SPEED
    }

    /// Ball going up (0-4) or down (5-9), then left/still/right sub-codes
    pub fn n_ball_dir(&self) -> usize {
        N_BALL_DIR
    }
}
