use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::division::Division;
use crate::model::RawStats;

/// Fighter statistics as delivered by a source, before validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FighterProfile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub division: Option<Division>,
    /// Profile page the numbers came from, if any.
    #[serde(default)]
    pub url: Option<String>,
    /// Headshot location, passed through for display only.
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(flatten)]
    pub stats: RawStats,
}

/// Trait that every fighter-statistics source must implement.
#[async_trait]
pub trait StatsProvider: Send + Sync {
    /// Look a fighter up by name. `Ok(None)` means the source does not know
    /// them; errors are reserved for a source that could not be read.
    async fn fetch_profile(&self, fighter: &str) -> Result<Option<FighterProfile>>;

    /// Human-readable name for logging.
    fn name(&self) -> &str;
}

/// Lookup key for a fighter name: lowercase words joined by `_`, with
/// punctuation dropped ("Dricus Du Plessis" -> "dricus_du_plessis").
pub fn fighter_key(name: &str) -> String {
    name.split_whitespace()
        .map(|word| {
            word.chars()
                .filter(|c| c.is_alphanumeric() || *c == '-')
                .flat_map(char::to_lowercase)
                .collect::<String>()
        })
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}
