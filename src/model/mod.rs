pub mod bootstrap;
pub mod calibration;
pub mod error;
pub mod matchup;
pub mod rounds;
pub mod stats;

use thiserror::Error;

pub use bootstrap::{bootstrap, BootstrapOptions, BootstrapSummary};
pub use calibration::{fit_weights, FitMetrics, FitOptions, FitResult, LabelledMatchup};
pub use error::{ConfigError, Corner, InvalidRecordError};
pub use matchup::{Contribution, MatchupModel, ModelConfig, Prediction};
pub use rounds::{round_probabilities, RoundProbability};
pub use stats::{PerStat, RawStats, Stat, StatKind, StatRecord, ValidationError};

/// Any failure raised by the model layer.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    InvalidRecord(#[from] InvalidRecordError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
