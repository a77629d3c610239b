//! Frame-skip wrapper
//!
//! Repeats the last command while the observation stays the same, folding
//! the intermediate rewards into a single step.

use serde::{Deserialize, Serialize};

use super::{Environment, Step};
use crate::sim::Command;

/// How two consecutive observations are compared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComparePolicy {
    /// Skip while observations are identical
    ExactEqual,
    /// Never skip
    NeverEqual,
}

impl ComparePolicy {
    pub fn equal<T: PartialEq>(self, a: &T, b: &T) -> bool {
        match self {
            ComparePolicy::ExactEqual => a == b,
            ComparePolicy::NeverEqual => false,
        }
    }
}

/// Repeat the same command until a different observation is obtained
#[derive(Debug, Clone)]
pub struct FrameSkip<E: Environment> {
    env: E,
    compare: ComparePolicy,
    previous: Option<E::Obs>,
}

impl<E> FrameSkip<E>
where
    E: Environment,
    E::Obs: PartialEq,
{
    pub fn new(env: E, compare: ComparePolicy) -> Self {
        Self {
            env,
            compare,
            previous: None,
        }
    }

    pub fn inner(&self) -> &E {
        &self.env
    }

    fn unchanged(&self, obs: &E::Obs) -> bool {
        self.previous
            .as_ref()
            .is_some_and(|previous| self.compare.equal(obs, previous))
    }
}

impl<E> Environment for FrameSkip<E>
where
    E: Environment,
    E::Obs: PartialEq,
{
    type Obs = E::Obs;

    fn reset(&mut self, seed: Option<u64>) -> E::Obs {
        let obs = self.env.reset(seed);
        self.previous = Some(obs.clone());
        obs
    }

    fn step(&mut self, command: Command) -> Step<E::Obs> {
        let mut step = self.env.step(command);
        let mut repeats = 0u64;
        while self.unchanged(&step.observation) && !step.done {
            let next = self.env.step(command);
            step.observation = next.observation;
            step.reward += next.reward;
            step.done = step.done || next.done;
            step.info.extend(next.info);
            repeats += 1;
        }
        if repeats > 0 {
            log::trace!("Skipped {} frames repeating {}", repeats, command);
        }
        self.previous = Some(step.observation.clone());
        step
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BreakoutConfig;
    use crate::env::{Breakout, EncodedObservation, ObservationKind, ObservedBreakout};

    fn discrete_env() -> ObservedBreakout {
        let env = Breakout::new(BreakoutConfig::default()).expect("valid config");
        ObservedBreakout::new(env, ObservationKind::MultiDiscrete)
    }

    #[test]
    fn test_compare_policies() {
        assert!(ComparePolicy::ExactEqual.equal(&1, &1));
        assert!(!ComparePolicy::ExactEqual.equal(&1, &2));
        assert!(!ComparePolicy::NeverEqual.equal(&1, &1));
    }

    #[test]
    fn test_never_equal_matches_raw_steps() {
        let mut raw = discrete_env();
        let mut skipper = FrameSkip::new(discrete_env(), ComparePolicy::NeverEqual);
        raw.reset(None);
        skipper.reset(None);
        for _ in 0..20 {
            let a = raw.step(Command::Nop);
            let b = skipper.step(Command::Nop);
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_exact_equal_skips_until_change() {
        let mut skipper = FrameSkip::new(discrete_env(), ComparePolicy::ExactEqual);
        let initial = skipper.reset(None);
        let step = skipper.step(Command::Nop);
        assert_ne!(step.observation, initial);

        // Ball y moves 5 px per tick across 10 px bins: some steps fold two ticks
        let ticks = skipper.inner().inner().state().steps;
        assert!(ticks >= 1);
        let expected = -0.01 * ticks as f64;
        assert!((step.reward - expected).abs() < 1e-9);
    }

    #[test]
    fn test_consecutive_observations_always_differ() {
        let mut skipper = FrameSkip::new(discrete_env(), ComparePolicy::ExactEqual);
        let mut previous: EncodedObservation = skipper.reset(Some(1));
        for _ in 0..200 {
            let step = skipper.step(Command::Right);
            if step.done {
                break;
            }
            assert_ne!(step.observation, previous);
            previous = step.observation;
        }
    }
}
