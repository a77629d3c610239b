//! Seeded perturbation of the ball speed
//!
//! Owned by the game state and carried across resets so one seed yields a
//! reproducible sequence over a whole family of episodes. Every hook is a
//! no-op when the configuration is deterministic.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Seed used when the caller never provides one
pub const DEFAULT_SEED: u64 = 0;

/// Slowest horizontal speed magnitude after a paddle perturbation
pub const MIN_PERTURBED_SPEED: f32 = 0.5;
/// Fastest horizontal speed magnitude after a paddle perturbation
pub const MAX_PERTURBED_SPEED: f32 = 6.0;

#[derive(Debug, Clone)]
pub struct RandomEventGenerator {
    seed: u64,
    deterministic: bool,
    rng: Pcg32,
}

impl RandomEventGenerator {
    pub fn new(seed: u64, deterministic: bool) -> Self {
        Self {
            seed,
            deterministic,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Replace the generator with a fresh one at `seed`
    pub fn set_seed(&mut self, seed: u64) {
        self.seed = seed;
        self.rng = Pcg32::seed_from_u64(seed);
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Scale the horizontal speed by a factor in [0.75, 1.5] (episode start)
    pub fn perturb_initial_speed(&mut self, vel: &mut Vec2) {
        if self.deterministic {
            return;
        }
        let factor: f32 = self.rng.random_range(0.75..=1.5);
        vel.x *= factor;
    }

    /// Flip the horizontal direction with probability 0.5
    pub fn after_brick_hit(&mut self, vel: &mut Vec2) {
        if self.deterministic {
            return;
        }
        if self.rng.random_bool(0.5) {
            vel.x = -vel.x;
        }
    }

    /// Slow down (10%) or speed up (10%) the ball, then clamp the magnitude
    pub fn after_paddle_hit(&mut self, vel: &mut Vec2) {
        if self.deterministic {
            return;
        }
        let roll: f64 = self.rng.random();
        if roll < 0.1 {
            vel.x *= 0.75;
        } else if roll > 0.9 {
            vel.x *= 1.5;
        }
        vel.x = vel.x.abs().clamp(MIN_PERTURBED_SPEED, MAX_PERTURBED_SPEED) * vel.x.signum();
    }

    /// ±1 used to kick a ball out of a vertical loop after a ceiling bounce
    ///
    /// Deterministic runs derive the sign from the tick counter so replays
    /// stay identical across resets.
    pub fn bounce_sign(&mut self, tick: u64) -> f32 {
        let heads = if self.deterministic {
            let hash = (tick as u32).wrapping_mul(2654435761);
            (hash >> 16) & 1 == 0
        } else {
            self.rng.random_bool(0.5)
        };
        if heads { 1.0 } else { -1.0 }
    }
}

impl Default for RandomEventGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_SEED, true)
    }
}
