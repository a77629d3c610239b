//! Game state and core simulation types
//!
//! Entities know nothing about each other; the tick resolves their
//! interactions.

use std::collections::BTreeMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::Rect;
use super::rng::{DEFAULT_SEED, RandomEventGenerator};
use super::tick::{Command, tick};
use crate::config::BreakoutConfig;
use crate::consts::*;
use crate::error::Result;

/// Grid cell index: (column i, row j)
pub type Cell = (usize, usize);

/// The ball
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Zero when the ball is disabled
    pub radius: f32,
}

impl Ball {
    pub fn new(config: &BreakoutConfig) -> Self {
        let x = (config.win_width() / 2) as f32;
        if !config.ball_enabled {
            // Parked mid-screen, never moves or collides
            return Self {
                pos: Vec2::new(x, config.win_height() as f32 / 2.0),
                vel: Vec2::ZERO,
                radius: 0.0,
            };
        }
        let radius = config.ball_radius as f32;
        Self {
            pos: Vec2::new(x, config.win_height() as f32 - BALL_SPAWN_MARGIN - radius),
            vel: Vec2::new(BALL_START_SPEED_X, BALL_START_SPEED_Y),
            radius,
        }
    }

    /// Euler step with unit time
    pub fn update(&mut self) {
        self.pos += self.vel;
    }

    pub fn rect(&self) -> Rect {
        Rect::around_circle(self.pos, self.radius)
    }

    /// 0 quick-left, 1 left, 2 still, 3 right, 4 quick-right
    pub fn speed_x_class(&self) -> usize {
        let vx = self.vel.x;
        if vx < -QUICK_SPEED {
            0
        } else if vx < 0.0 {
            1
        } else if vx == 0.0 {
            2
        } else if vx <= QUICK_SPEED {
            3
        } else {
            4
        }
    }

    /// 0 up (or still), 1 down
    pub fn speed_y_class(&self) -> usize {
        usize::from(self.vel.y > 0.0)
    }

    /// Combined direction code in [0, 10)
    ///
    /// +5 when moving down, then +1 quick-left, +2 left, +3 quick-right,
    /// +4 right, +0 straight.
    pub fn direction_code(&self) -> usize {
        let vx = self.vel.x;
        let mut code = 0;
        if self.vel.y > 0.0 {
            code += 5;
        }
        if vx < -QUICK_SPEED {
            code += 1;
        } else if vx < 0.0 {
            code += 2;
        } else if vx > QUICK_SPEED {
            code += 3;
        } else if vx > 0.0 {
            code += 4;
        }
        code
    }
}

/// The player's paddle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paddle {
    /// Left edge
    pub x: f32,
    /// Top edge (fixed)
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub speed: f32,
    /// Rightmost legal left edge
    pub max_x: f32,
}

impl Paddle {
    /// Centered horizontally, near the bottom edge
    ///
    /// The paddle's center lands on the window's center, which is always the
    /// center of a brick column for an odd column count, so a bullet fired
    /// from spawn goes straight up into a column instead of a gap.
    pub fn new(config: &BreakoutConfig) -> Self {
        let max_x = config.win_width().saturating_sub(config.paddle_width) as f32;
        let x = (config.win_width() / 2).saturating_sub(config.paddle_width / 2) as f32;
        Self {
            x: x.min(max_x),
            y: config.win_height() as f32 - PADDLE_BOTTOM_MARGIN,
            width: config.paddle_width as f32,
            height: config.paddle_height as f32,
            speed: config.paddle_speed as f32,
            max_x,
        }
    }

    pub fn update(&mut self, command: Command) {
        match command {
            Command::Left => self.x -= self.speed,
            Command::Right => self.x += self.speed,
            Command::Nop | Command::Fire => {}
        }
        self.x = self.x.clamp(0.0, self.max_x);
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

/// The paddle's projectile
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Bullet {
    /// Horizontal center and top edge
    pub pos: Vec2,
    /// Negative while flying
    pub speed_y: f32,
}

impl Bullet {
    #[inline]
    pub fn in_movement(&self) -> bool {
        self.speed_y < 0.0
    }

    pub fn fire(&mut self, x: f32, y: f32) {
        self.pos = Vec2::new(x, y);
        self.speed_y = BULLET_SPEED;
    }

    pub fn update(&mut self) {
        self.pos.y += self.speed_y;
        if self.pos.y < BULLET_CEILING {
            self.reset();
        }
    }

    /// Back to rest at the origin
    pub fn reset(&mut self) {
        self.pos = Vec2::ZERO;
        self.speed_y = 0.0;
    }

    pub fn rect(&self) -> Rect {
        Rect::new(
            self.pos.x - BULLET_WIDTH / 2.0,
            self.pos.y,
            BULLET_WIDTH,
            BULLET_HEIGHT,
        )
    }
}

/// One brick at a fixed grid cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Brick {
    /// Column
    pub i: usize,
    /// Row
    pub j: usize,
    pub rect: Rect,
}

impl Brick {
    pub fn new(i: usize, j: usize, config: &BreakoutConfig) -> Self {
        let width = config.brick_width as f32;
        let height = config.brick_height as f32;
        let gap = config.brick_xdistance as f32;
        let x = (width + gap) * i as f32 + gap;
        let y = BRICK_TOP_OFFSET + (height + BRICK_ROW_GAP) * j as f32;
        Self {
            i,
            j,
            rect: Rect::new(x, y, width, height),
        }
    }
}

/// Live bricks plus a dense 0/1 mirror of shape (cols, rows)
///
/// A cell is present in `bricks` iff its matrix entry is 1. Bricks are only
/// ever removed within an episode.
#[derive(Debug, Clone, PartialEq)]
pub struct BrickGrid {
    bricks: BTreeMap<Cell, Brick>,
    grid: Vec<Vec<u8>>,
}

impl BrickGrid {
    pub fn new(config: &BreakoutConfig) -> Self {
        let cols = config.brick_cols as usize;
        let rows = config.brick_rows as usize;
        let mut bricks = BTreeMap::new();
        for i in 0..cols {
            for j in 0..rows {
                bricks.insert((i, j), Brick::new(i, j, config));
            }
        }
        Self {
            bricks,
            grid: vec![vec![1; rows]; cols],
        }
    }

    /// Remove the brick at `cell`, keeping the matrix in sync
    pub fn remove(&mut self, cell: Cell) -> Option<Brick> {
        let brick = self.bricks.remove(&cell)?;
        self.grid[cell.0][cell.1] = 0;
        debug_assert!(self.is_consistent());
        Some(brick)
    }

    /// First live brick (in cell order) overlapping `rect`
    pub fn first_hit(&self, rect: &Rect) -> Option<Cell> {
        self.bricks
            .values()
            .find(|brick| brick.rect.intersects(rect))
            .map(|brick| (brick.i, brick.j))
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.bricks.contains_key(&cell)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Brick> {
        self.bricks.values()
    }

    pub fn len(&self) -> usize {
        self.bricks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bricks.is_empty()
    }

    /// Dense matrix indexed `[col][row]`
    pub fn matrix(&self) -> &[Vec<u8>] {
        &self.grid
    }

    /// Dense matrix indexed `[row][col]`
    pub fn rows_by_cols(&self) -> Vec<Vec<u8>> {
        let rows = self.grid.first().map_or(0, Vec::len);
        (0..rows)
            .map(|j| self.grid.iter().map(|col| col[j]).collect())
            .collect()
    }

    /// Mapping and matrix agree on every cell
    pub fn is_consistent(&self) -> bool {
        self.grid.iter().enumerate().all(|(i, col)| {
            col.iter()
                .enumerate()
                .all(|(j, &live)| (live == 1) == self.bricks.contains_key(&(i, j)))
        })
    }
}

/// Why an episode ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Termination {
    /// Ball fell past the bottom edge
    BallLost,
    /// Every brick destroyed
    Cleared,
    /// Step counter exceeded the horizon
    HorizonReached,
}

/// Complete state of one episode
#[derive(Debug, Clone)]
pub struct GameState {
    config: BreakoutConfig,
    pub ball: Ball,
    pub paddle: Paddle,
    pub brick_grid: BrickGrid,
    pub bullet: Bullet,
    /// Cumulative score
    pub score: f64,
    /// Ticks played this episode
    pub steps: u64,
    pub last_command: Command,
    /// Carried across resets
    pub(crate) rng: RandomEventGenerator,
}

impl GameState {
    /// Create a new game state with the default seed
    pub fn new(config: BreakoutConfig) -> Result<Self> {
        Self::with_seed(config, DEFAULT_SEED)
    }

    pub fn with_seed(config: BreakoutConfig, seed: u64) -> Result<Self> {
        let config = config.validated()?;
        let rng = RandomEventGenerator::new(seed, config.deterministic);
        Ok(Self::with_rng(config, rng))
    }

    fn with_rng(config: BreakoutConfig, rng: RandomEventGenerator) -> Self {
        Self {
            ball: Ball::new(&config),
            paddle: Paddle::new(&config),
            brick_grid: BrickGrid::new(&config),
            bullet: Bullet::default(),
            score: 0.0,
            steps: 0,
            last_command: Command::Nop,
            rng,
            config,
        }
    }

    pub fn config(&self) -> &BreakoutConfig {
        &self.config
    }

    pub fn rng(&self) -> &RandomEventGenerator {
        &self.rng
    }

    /// Fresh entities for a new episode; configuration and generator carry over
    pub fn reset(&mut self) {
        let rng = self.rng.clone();
        *self = Self::with_rng(self.config.clone(), rng);
    }

    /// Like [`reset`](Self::reset), reseeding the generator first
    pub fn reset_with_seed(&mut self, seed: u64) {
        self.rng.set_seed(seed);
        self.reset();
    }

    /// Apply the initial-speed perturbation to the current ball
    pub fn perturb_initial_speed(&mut self) {
        self.rng.perturb_initial_speed(&mut self.ball.vel);
    }

    /// Advance one tick; returns the reward earned during it
    pub fn step(&mut self, command: Command) -> f64 {
        tick(self, command)
    }

    /// Ball has fallen past the bottom edge
    pub fn ball_fallen(&self) -> bool {
        self.config.ball_enabled
            && self.ball.pos.y > self.config.win_height() as f32 - self.ball.radius
    }

    pub fn horizon_exceeded(&self) -> bool {
        self.steps > self.config.horizon()
    }

    /// First matching end condition, if any
    pub fn termination(&self) -> Option<Termination> {
        if self.ball_fallen() {
            Some(Termination::BallLost)
        } else if self.brick_grid.is_empty() {
            Some(Termination::Cleared)
        } else if self.horizon_exceeded() {
            Some(Termination::HorizonReached)
        } else {
            None
        }
    }

    pub fn is_finished(&self) -> bool {
        self.termination().is_some()
    }
}
