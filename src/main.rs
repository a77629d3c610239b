//! Headless runner: plays one episode and logs the outcome
//!
//! An optional first argument names a JSON configuration file.

use std::process::ExitCode;

use breakout_sim::{
    Breakout, BreakoutConfig, Command, Environment, FrameSkip, ObservationKind, ObservedBreakout,
};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

const EPISODE_SEED: u64 = 42;

fn load_config() -> Result<BreakoutConfig, String> {
    match std::env::args().nth(1) {
        Some(path) => {
            let json = std::fs::read_to_string(&path)
                .map_err(|e| format!("cannot read {path}: {e}"))?;
            BreakoutConfig::from_json(&json).map_err(|e| e.to_string())
        }
        None => Ok(BreakoutConfig::default()),
    }
}

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Breakout Sim (headless) starting...");

    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            log::error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let env = match Breakout::with_seed(config, EPISODE_SEED) {
        Ok(env) => env,
        Err(e) => {
            log::error!("{e}");
            return ExitCode::FAILURE;
        }
    };
    let n_actions = env.n_actions();
    let kind = ObservationKind::Discrete;
    let mut env = FrameSkip::new(ObservedBreakout::new(env, kind), kind.default_compare());

    // Uniform random agent
    let mut agent = Pcg32::seed_from_u64(EPISODE_SEED);
    env.reset(Some(EPISODE_SEED));
    let mut total_reward = 0.0;
    let mut decisions = 0u64;
    loop {
        let command = Command::ALL[agent.random_range(0..n_actions)];
        let step = env.step(command);
        total_reward += step.reward;
        decisions += 1;
        if step.done {
            break;
        }
    }

    let state = env.inner().inner().state();
    log::info!(
        "Episode finished: {:?} after {} ticks ({} decisions), score {}, return {:.2}",
        state.termination(),
        state.steps,
        decisions,
        state.score,
        total_reward
    );
    ExitCode::SUCCESS
}
