use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::debug;

use super::provider::{fighter_key, FighterProfile, StatsProvider};

/// Reads scraper dumps from a directory: one `<fighter_key>_stats.json` file
/// per fighter, as written by the profile scraper.
#[derive(Debug, Clone)]
pub struct JsonFileProvider {
    dir: PathBuf,
}

impl JsonFileProvider {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        JsonFileProvider { dir: dir.into() }
    }

    pub fn path_for(&self, fighter: &str) -> PathBuf {
        self.dir.join(format!("{}_stats.json", fighter_key(fighter)))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl StatsProvider for JsonFileProvider {
    fn name(&self) -> &str {
        "stats-files"
    }

    async fn fetch_profile(&self, fighter: &str) -> Result<Option<FighterProfile>> {
        let path = self.path_for(fighter);
        let exists = tokio::fs::try_exists(&path)
            .await
            .with_context(|| format!("Failed to check {}", path.display()))?;
        if !exists {
            debug!("No stats file at {}", path.display());
            return Ok(None);
        }

        let text = tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let mut profile: FighterProfile = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        // The scraper writes "N/A" when the page had no name heading
        if profile.name.trim().is_empty() || profile.name == "N/A" {
            profile.name = fighter.trim().to_string();
        }
        Ok(Some(profile))
    }
}
