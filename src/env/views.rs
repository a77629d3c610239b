//! Observation views
//!
//! Every view is a pure function of the canonical `Observation`; the game
//! logic never changes between them.

use serde::{Deserialize, Serialize};

use super::{Breakout, Environment, Step};
use crate::codec::encode;
use crate::config::BreakoutConfig;
use crate::sim::{Command, Observation};

/// Shape of the observation handed to the agent
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObservationKind {
    /// Full dictionary including the brick matrix
    #[default]
    Dict,
    /// Vector of bounded integers
    MultiDiscrete,
    /// Single mixed-radix index
    Discrete,
}

/// An observation in one of the supported shapes
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EncodedObservation {
    Dict(Observation),
    MultiDiscrete(Vec<usize>),
    Discrete(usize),
}

/// `[paddle_x, ball_x, ball_y, ball_x_speed, ball_y_speed]`, or just
/// `[paddle_x]` when the ball is disabled
pub fn multi_discrete(obs: &Observation) -> Vec<usize> {
    let mut values = vec![obs.paddle_x];
    if let Some(ball) = &obs.ball {
        values.extend([ball.ball_x, ball.ball_y, ball.ball_x_speed, ball.ball_y_speed]);
    }
    values
}

/// Bounds matching [`multi_discrete`]
pub fn multi_discrete_dims(config: &BreakoutConfig) -> Vec<usize> {
    let mut dims = vec![config.n_paddle_x()];
    if config.ball_enabled {
        dims.extend([
            config.n_ball_x(),
            config.n_ball_y(),
            config.n_ball_x_speed(),
            config.n_ball_y_speed(),
        ]);
    }
    dims
}

/// Number of distinct single-index observations
pub fn discrete_size(config: &BreakoutConfig) -> usize {
    multi_discrete_dims(config).iter().product()
}

impl ObservationKind {
    /// Frame-skip comparison suited to this shape
    pub fn default_compare(self) -> super::ComparePolicy {
        match self {
            ObservationKind::Dict => super::ComparePolicy::NeverEqual,
            ObservationKind::MultiDiscrete | ObservationKind::Discrete => {
                super::ComparePolicy::ExactEqual
            }
        }
    }

    pub fn apply(self, obs: Observation, config: &BreakoutConfig) -> EncodedObservation {
        match self {
            ObservationKind::Dict => EncodedObservation::Dict(obs),
            ObservationKind::MultiDiscrete => EncodedObservation::MultiDiscrete(multi_discrete(&obs)),
            ObservationKind::Discrete => EncodedObservation::Discrete(encode(
                &multi_discrete(&obs),
                &multi_discrete_dims(config),
            )),
        }
    }
}

/// A `Breakout` whose observations go through one view
#[derive(Debug, Clone)]
pub struct ObservedBreakout {
    env: Breakout,
    kind: ObservationKind,
}

impl ObservedBreakout {
    pub fn new(env: Breakout, kind: ObservationKind) -> Self {
        Self { env, kind }
    }

    pub fn inner(&self) -> &Breakout {
        &self.env
    }
}

impl Environment for ObservedBreakout {
    type Obs = EncodedObservation;

    fn reset(&mut self, seed: Option<u64>) -> EncodedObservation {
        let obs = self.env.reset(seed);
        self.kind.apply(obs, self.env.config())
    }

    fn step(&mut self, command: Command) -> Step<EncodedObservation> {
        let step = self.env.step(command);
        Step {
            observation: self.kind.apply(step.observation, self.env.config()),
            reward: step.reward,
            done: step.done,
            info: step.info,
        }
    }
}
