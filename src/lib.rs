pub mod config;
pub mod model;
pub mod report;
pub mod sources;

pub use model::{
    InvalidRecordError, MatchupModel, ModelConfig, ModelError, Prediction, StatRecord,
    ValidationError,
};
pub use report::MatchupReport;
