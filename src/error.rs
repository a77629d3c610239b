//! Error types for configuration and action handling

use thiserror::Error;

/// Errors surfaced by the Breakout engine
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BreakoutError {
    /// Configuration rejected before any simulation runs
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Action index outside the action space
    #[error("Invalid action {action} (action space has {n_actions} actions)")]
    InvalidAction { action: usize, n_actions: usize },
}

pub type Result<T> = std::result::Result<T, BreakoutError>;
