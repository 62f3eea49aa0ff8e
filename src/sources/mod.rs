pub mod division;
pub mod files;
pub mod provider;
pub mod roster;

pub use division::{Division, UnknownDivision};
pub use files::JsonFileProvider;
pub use provider::{fighter_key, FighterProfile, StatsProvider};
pub use roster::RosterProvider;

use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::model::{Stat, StatRecord, ValidationError};

/// Where a resolved record's numbers came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecordOrigin {
    /// Every statistic came from the provider.
    Provider { provider: String },
    /// The provider's profile was incomplete; `filled` came from the
    /// division default.
    Backfilled {
        provider: String,
        division: Division,
        filled: Vec<Stat>,
    },
    /// No provider knew the fighter; the whole record is a division estimate.
    DivisionDefault { division: Division },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedFighter {
    pub name: String,
    pub record: StatRecord,
    pub origin: RecordOrigin,
    pub image_url: Option<String>,
}

/// Turns a fighter name into a validated [`StatRecord`] by asking each
/// provider in order, backfilling gaps from a division default when allowed.
#[derive(Clone)]
pub struct StatResolver {
    providers: Vec<Arc<dyn StatsProvider>>,
    /// Division used for fallbacks when a profile does not name its own.
    /// `None` disables all backfilling: incomplete data is rejected.
    fallback: Option<Division>,
}

impl StatResolver {
    pub fn new(providers: Vec<Arc<dyn StatsProvider>>, fallback: Option<Division>) -> Self {
        let names: Vec<&str> = providers.iter().map(|p| p.name()).collect();
        debug!("Stat resolver over {:?} (fallback: {:?})", names, fallback);
        StatResolver {
            providers,
            fallback,
        }
    }

    pub async fn resolve(&self, fighter: &str) -> Result<ResolvedFighter> {
        for provider in &self.providers {
            match provider.fetch_profile(fighter).await {
                Ok(Some(profile)) => {
                    return self
                        .build_record(provider.name(), profile)
                        .with_context(|| format!("Invalid stats for '{}'", fighter));
                }
                Ok(None) => debug!("[{}] no profile for '{}'", provider.name(), fighter),
                Err(e) => warn!("[{}] lookup failed for '{}': {:#}", provider.name(), fighter, e),
            }
        }

        match self.fallback {
            Some(division) => {
                warn!(
                    "No source knows '{}'; using the {} division estimate",
                    fighter, division
                );
                Ok(ResolvedFighter {
                    name: fighter.trim().to_string(),
                    record: division.default_record(),
                    origin: RecordOrigin::DivisionDefault { division },
                    image_url: None,
                })
            }
            None => anyhow::bail!("No stats found for '{}'", fighter),
        }
    }

    fn build_record(&self, provider: &str, profile: FighterProfile) -> Result<ResolvedFighter> {
        let filled = profile.stats.missing();
        if filled.is_empty() {
            let record = StatRecord::from_raw(&profile.stats)?;
            info!("[{}] resolved '{}'", provider, profile.name);
            return Ok(ResolvedFighter {
                name: profile.name,
                record,
                origin: RecordOrigin::Provider {
                    provider: provider.to_string(),
                },
                image_url: profile.image_url,
            });
        }

        let division = match self.fallback {
            Some(fallback) => profile.division.unwrap_or(fallback),
            // Strict mode: report the first gap
            None => return Err(ValidationError::Missing { stat: filled[0] }.into()),
        };

        let record =
            StatRecord::from_raw_with_defaults(&profile.stats, &division.default_record())?;
        let names: Vec<&str> = filled.iter().map(|s| s.name()).collect();
        warn!(
            "[{}] '{}' is missing {:?}; filled from {} averages",
            provider, profile.name, names, division
        );
        Ok(ResolvedFighter {
            name: profile.name,
            record,
            origin: RecordOrigin::Backfilled {
                provider: provider.to_string(),
                division,
                filled,
            },
            image_url: profile.image_url,
        })
    }
}
