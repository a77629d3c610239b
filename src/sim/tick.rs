//! Fixed timestep simulation tick
//!
//! Moves every entity once, then resolves collisions in a fixed order:
//! walls, paddle, ball vs bricks, firing, bullet vs bricks. Rewards are
//! accumulated along the way.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::rng::RandomEventGenerator;
use super::state::{Ball, GameState, Paddle};
use crate::config::BreakoutConfig;
use crate::consts::SPEED_EPSILON;
use crate::error::BreakoutError;

/// Player command for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Command {
    #[default]
    Nop = 0,
    Left = 1,
    Right = 2,
    Fire = 3,
}

impl Command {
    pub const ALL: [Command; 4] = [Command::Nop, Command::Left, Command::Right, Command::Fire];

    pub fn index(self) -> usize {
        self as usize
    }
}

impl TryFrom<usize> for Command {
    type Error = BreakoutError;

    fn try_from(action: usize) -> Result<Self, Self::Error> {
        Command::ALL
            .get(action)
            .copied()
            .ok_or(BreakoutError::InvalidAction {
                action,
                n_actions: Command::ALL.len(),
            })
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Command::Nop => "_",
            Command::Left => "<",
            Command::Right => ">",
            Command::Fire => "^",
        };
        f.write_str(symbol)
    }
}

/// Half-width of the paddle's center zone
const CENTER_ZONE: f32 = 20.0;
/// Edge zone half-width for the complex bounce model
const COMPLEX_EDGE_ZONE: f32 = 10.0;
/// Edge zone half-width for the simple bounce model
const SIMPLE_EDGE_ZONE: f32 = 20.0;
/// Horizontal speed magnitude after a simple center hit
const SIMPLE_CENTER_SPEED: f32 = 2.0;
/// Horizontal speed magnitude after a simple edge hit
const SIMPLE_EDGE_SPEED: f32 = 5.0;

/// Advance the game state by one tick and return the reward for it
pub fn tick(state: &mut GameState, command: Command) -> f64 {
    let &BreakoutConfig {
        ball_enabled,
        fire_enabled,
        complex_bump: complex,
        brick_reward,
        step_reward,
        game_over_reward,
        ..
    } = state.config();
    let width = state.config().win_width() as f32;
    let mut reward = 0.0;

    state.steps += 1;
    state.paddle.update(command);
    if ball_enabled {
        state.ball.update();
    }
    state.bullet.update();
    state.last_command = command;

    if ball_enabled {
        bounce_off_walls(state, width);

        if state.ball.rect().intersects(&state.paddle.rect()) {
            if complex {
                complex_bump(&mut state.ball, &state.paddle);
            } else {
                simple_bump(&mut state.ball, &state.paddle, &mut state.rng);
            }
            state.ball.vel.y = -state.ball.vel.y.abs();
        }

        // At most one brick per tick for the ball
        if let Some(cell) = state.brick_grid.first_hit(&state.ball.rect()) {
            state.brick_grid.remove(cell);
            state.score += brick_reward;
            reward += brick_reward;
            state.ball.vel.y = -state.ball.vel.y;
            state.rng.after_brick_hit(&mut state.ball.vel);
            log::debug!("Ball destroyed brick {:?} at tick {}", cell, state.steps);
        }
    }

    if fire_enabled && command == Command::Fire && !state.bullet.in_movement() {
        let (x, y) = (state.paddle.center_x(), state.paddle.y);
        state.bullet.fire(x, y);
    }

    if state.bullet.in_movement() {
        if let Some(cell) = state.brick_grid.first_hit(&state.bullet.rect()) {
            state.brick_grid.remove(cell);
            state.score += brick_reward;
            reward += brick_reward;
            state.bullet.reset();
            log::debug!("Bullet destroyed brick {:?} at tick {}", cell, state.steps);
        }
    }

    reward += step_reward;

    // Both penalties may land on the same tick
    if state.ball_fallen() {
        reward += game_over_reward;
    }
    if state.horizon_exceeded() {
        reward += game_over_reward;
    }

    if let Some(reason) = state.termination() {
        log::debug!(
            "Episode over after {} ticks ({:?}), score {}",
            state.steps,
            reason,
            state.score
        );
    }
    log::trace!("tick {} cmd={} reward={}", state.steps, command, reward);

    reward
}

/// Reflect off the ceiling and side walls
fn bounce_off_walls(state: &mut GameState, width: f32) {
    let tick = state.steps;
    let ball = &mut state.ball;
    let radius = ball.radius;

    if ball.pos.y < radius {
        ball.pos.y = radius;
        ball.vel.y = -ball.vel.y;
        // A perfectly vertical ball would loop forever
        if ball.vel.x.abs() < SPEED_EPSILON {
            ball.vel.x = state.rng.bounce_sign(tick);
        }
    }
    if ball.pos.x < radius {
        ball.pos.x = radius;
        ball.vel.x = -ball.vel.x;
    }
    if ball.pos.x > width - radius {
        ball.pos.x = width - radius;
        ball.vel.x = -ball.vel.x;
    }
}

/// Edge-accelerating bounce: the center damps speed, the edges add to it
///
/// Zones are checked center, left edge, right edge; later zones override.
fn complex_bump(ball: &mut Ball, paddle: &Paddle) {
    let vx = &mut ball.vel.x;

    if (ball.pos.x - paddle.center_x()).abs() < CENTER_ZONE {
        if *vx < -5.0 {
            *vx += 2.0;
        } else if *vx > 5.0 {
            *vx -= 2.0;
        } else if *vx <= -0.5 {
            *vx += 0.5;
        } else if *vx >= 0.5 {
            *vx -= 0.5;
        }
    }
    if (ball.pos.x - paddle.x).abs() < COMPLEX_EDGE_ZONE {
        *vx = -vx.abs() - 1.0;
    }
    if (ball.pos.x - (paddle.x + paddle.width)).abs() < COMPLEX_EDGE_ZONE {
        *vx = vx.abs() + 1.0;
    }
}

/// Fixed-speed bounce: slow in the center, fast at the edges
///
/// Zones are checked center, left edge, right edge; later zones override.
fn simple_bump(ball: &mut Ball, paddle: &Paddle, rng: &mut RandomEventGenerator) {
    if (ball.pos.x - paddle.center_x()).abs() < CENTER_ZONE && ball.vel.x != 0.0 {
        ball.vel.x = SIMPLE_CENTER_SPEED * ball.vel.x.signum();
    }
    if (ball.pos.x - paddle.x).abs() < SIMPLE_EDGE_ZONE {
        ball.vel.x = -SIMPLE_EDGE_SPEED;
        rng.after_paddle_hit(&mut ball.vel);
    }
    if (ball.pos.x - (paddle.x + paddle.width)).abs() < SIMPLE_EDGE_ZONE {
        ball.vel.x = SIMPLE_EDGE_SPEED;
        rng.after_paddle_hit(&mut ball.vel);
    }
}
