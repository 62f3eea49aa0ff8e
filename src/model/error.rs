use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::stats::{Stat, ValidationError};

/// Argument position of a record in a matchup query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Corner {
    First,
    Second,
}

impl fmt::Display for Corner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Corner::First => f.write_str("first"),
            Corner::Second => f.write_str("second"),
        }
    }
}

/// A record handed to the model failed re-validation. This is a caller bug,
/// not a data problem, and should not be retried.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{corner} record is not a valid stat record: {source}")]
pub struct InvalidRecordError {
    pub corner: Corner,
    #[source]
    pub source: ValidationError,
}

/// Rejected model or sampling configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("weight for {stat} must be finite, got {value}")]
    NonFiniteWeight { stat: Stat, value: f64 },

    #[error("normalization constant for {stat} must be positive and finite, got {value}")]
    InvalidNormConstant { stat: Stat, value: f64 },

    #[error("bias must be finite, got {0}")]
    NonFiniteBias(f64),

    #[error("bootstrap needs at least one iteration")]
    NoIterations,

    #[error("bootstrap noise must be finite and >= 0, got {0}")]
    InvalidNoise(f64),

    #[error("round count must be between 1 and {max}, got {got}")]
    InvalidRounds { got: u32, max: u32 },
}
