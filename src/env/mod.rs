//! Environment surface consumed by agents
//!
//! `Breakout` wraps a `GameState` behind reset/step. Observation views and
//! frame-skip are layered on top through the `Environment` trait.

pub mod skipper;
pub mod views;

pub use skipper::{ComparePolicy, FrameSkip};
pub use views::{EncodedObservation, ObservationKind, ObservedBreakout};

use crate::config::BreakoutConfig;
use crate::error::{BreakoutError, Result};
use crate::sim::{Command, DEFAULT_SEED, GameState};

pub use crate::sim::Observation;

/// Extra per-step information (always empty for the base game)
pub type Info = serde_json::Map<String, serde_json::Value>;

/// Result of one environment step
#[derive(Debug, Clone, PartialEq)]
pub struct Step<Obs> {
    pub observation: Obs,
    pub reward: f64,
    pub done: bool,
    pub info: Info,
}

/// Reset/step contract shared by the game and its wrappers
pub trait Environment {
    type Obs: Clone;

    /// Start a new episode, reseeding the generator when `seed` is given
    fn reset(&mut self, seed: Option<u64>) -> Self::Obs;

    /// Apply a command and advance one step
    fn step(&mut self, command: Command) -> Step<Self::Obs>;
}

/// The Breakout game as an environment
#[derive(Debug, Clone)]
pub struct Breakout {
    state: GameState,
}

impl Breakout {
    pub fn new(config: BreakoutConfig) -> Result<Self> {
        Self::with_seed(config, DEFAULT_SEED)
    }

    pub fn with_seed(config: BreakoutConfig, seed: u64) -> Result<Self> {
        let mut state = GameState::with_seed(config, seed)?;
        state.perturb_initial_speed();
        Ok(Self { state })
    }

    pub fn config(&self) -> &BreakoutConfig {
        self.state.config()
    }

    /// Read-only snapshot for rendering collaborators
    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn n_actions(&self) -> usize {
        self.config().n_actions()
    }

    pub fn observe(&self) -> Observation {
        self.state.observe()
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    /// Step with a raw action index, rejecting indices outside the action space
    pub fn step_action(&mut self, action: usize) -> Result<Step<Observation>> {
        let n_actions = self.n_actions();
        if action >= n_actions {
            return Err(BreakoutError::InvalidAction { action, n_actions });
        }
        let command = Command::try_from(action)?;
        Ok(self.step(command))
    }
}

impl Environment for Breakout {
    type Obs = Observation;

    fn reset(&mut self, seed: Option<u64>) -> Observation {
        match seed {
            Some(seed) => {
                log::info!("Resetting episode with seed {}", seed);
                self.state.reset_with_seed(seed);
            }
            None => {
                log::info!("Resetting episode");
                self.state.reset();
            }
        }
        self.state.perturb_initial_speed();
        self.state.observe()
    }

    fn step(&mut self, command: Command) -> Step<Observation> {
        let reward = self.state.step(command);
        Step {
            observation: self.state.observe(),
            reward,
            done: self.state.is_finished(),
            info: Info::new(),
        }
    }
}
