//! Canonical discretised observation of a game state

use serde::{Deserialize, Serialize};

use super::state::GameState;

/// Ball part of an observation (absent when the ball is disabled)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BallObservation {
    pub ball_x: usize,
    pub ball_y: usize,
    /// 0 quick-left, 1 left, 2 still, 3 right, 4 quick-right
    pub ball_x_speed: usize,
    /// 0 up, 1 down
    pub ball_y_speed: usize,
}

/// Dictionary-shaped observation
///
/// Serialises to the keys `paddle_x`, `ball_x`, `ball_y`, `ball_x_speed`,
/// `ball_y_speed` and `bricks_matrix` (rows x cols).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Observation {
    pub paddle_x: usize,
    #[serde(flatten)]
    pub ball: Option<BallObservation>,
    pub bricks_matrix: Vec<Vec<u8>>,
}

/// Bin index of a continuous coordinate, clamped to `bins - 1`
fn discretize(value: f32, resolution: u32, bins: usize) -> usize {
    let bin = value.max(0.0) as usize / resolution as usize;
    bin.min(bins.saturating_sub(1))
}

impl GameState {
    /// Discretised view of the current state
    pub fn observe(&self) -> Observation {
        let config = self.config();
        let ball = config.ball_enabled.then(|| BallObservation {
            ball_x: discretize(self.ball.pos.x, config.resolution_x, config.n_ball_x()),
            ball_y: discretize(self.ball.pos.y, config.resolution_y, config.n_ball_y()),
            ball_x_speed: self.ball.speed_x_class(),
            ball_y_speed: self.ball.speed_y_class(),
        });
        Observation {
            paddle_x: discretize(self.paddle.x, config.resolution_x, config.n_paddle_x()),
            ball,
            bricks_matrix: self.brick_grid.rows_by_cols(),
        }
    }
}
