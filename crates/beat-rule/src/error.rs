use beat_model::ChartError;
use thiserror::Error;

/// Errors raised while setting up a player. Play itself never fails.
#[derive(Debug, Error)]
pub enum PlayerError {
    #[error("invalid chart: {0}")]
    InvalidChart(#[from] ChartError),

    #[error("invalid player options: {0}")]
    InvalidOptions(String),
}
