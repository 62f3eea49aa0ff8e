//! Weight classes and their fallback stat lines.
//!
//! When a source has no number for a statistic (or no profile at all) the
//! gap is filled with a typical value for the fighter's weight class rather
//! than zero, since zero is a meaningful value for most statistics. The
//! tables below are rounded roster-wide estimates: lighter classes throw and
//! grapple more, heavier classes land fewer strikes but knock opponents down
//! more often and finish fights sooner.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::stats::STAT_COUNT;
use crate::model::{PerStat, StatRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Division {
    Flyweight,
    Bantamweight,
    Featherweight,
    Lightweight,
    Welterweight,
    Middleweight,
    LightHeavyweight,
    Heavyweight,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown division '{0}'")]
pub struct UnknownDivision(pub String);

impl Division {
    pub const ALL: [Division; 8] = [
        Division::Flyweight,
        Division::Bantamweight,
        Division::Featherweight,
        Division::Lightweight,
        Division::Welterweight,
        Division::Middleweight,
        Division::LightHeavyweight,
        Division::Heavyweight,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Division::Flyweight => "flyweight",
            Division::Bantamweight => "bantamweight",
            Division::Featherweight => "featherweight",
            Division::Lightweight => "lightweight",
            Division::Welterweight => "welterweight",
            Division::Middleweight => "middleweight",
            Division::LightHeavyweight => "light_heavyweight",
            Division::Heavyweight => "heavyweight",
        }
    }

    /// Typical stat line for the class.
    pub fn default_record(self) -> StatRecord {
        // Canonical stat order
        let line: [f64; STAT_COUNT] = match self {
            Division::Flyweight => [3.6, 3.3, 0.45, 0.57, 1.7, 0.36, 0.62, 0.6, 0.15, 11.5],
            Division::Bantamweight => [4.0, 3.5, 0.45, 0.56, 1.5, 0.36, 0.63, 0.5, 0.20, 11.0],
            Division::Featherweight => [3.9, 3.6, 0.44, 0.56, 1.4, 0.35, 0.63, 0.5, 0.25, 10.5],
            Division::Lightweight => [3.7, 3.3, 0.45, 0.56, 1.6, 0.36, 0.64, 0.5, 0.30, 10.3],
            Division::Welterweight => [3.6, 3.2, 0.46, 0.56, 1.5, 0.37, 0.65, 0.5, 0.35, 10.0],
            Division::Middleweight => [3.5, 3.3, 0.47, 0.55, 1.3, 0.37, 0.65, 0.5, 0.45, 9.2],
            Division::LightHeavyweight => [3.3, 3.2, 0.48, 0.54, 1.1, 0.35, 0.64, 0.4, 0.50, 8.6],
            Division::Heavyweight => [3.2, 3.1, 0.50, 0.52, 1.0, 0.34, 0.63, 0.3, 0.60, 7.5],
        };
        StatRecord::from_values_unchecked(PerStat::from_fn(|stat| line[stat.index()]))
    }
}

impl fmt::Display for Division {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Division {
    type Err = UnknownDivision;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphabetic())
            .collect();
        match key.as_str() {
            "flyweight" => Ok(Division::Flyweight),
            "bantamweight" => Ok(Division::Bantamweight),
            "featherweight" => Ok(Division::Featherweight),
            "lightweight" => Ok(Division::Lightweight),
            "welterweight" => Ok(Division::Welterweight),
            "middleweight" => Ok(Division::Middleweight),
            "lightheavyweight" => Ok(Division::LightHeavyweight),
            "heavyweight" => Ok(Division::Heavyweight),
            _ => Err(UnknownDivision(s.to_string())),
        }
    }
}
