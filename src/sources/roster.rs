use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::{debug, info};

use super::division::Division;
use super::provider::{fighter_key, FighterProfile, StatsProvider};
use crate::model::RawStats;

/// Mapping-backed provider: a built-in table of well-known fighters plus any
/// manual overrides loaded on top.
#[derive(Debug, Clone, Default)]
pub struct RosterProvider {
    profiles: HashMap<String, FighterProfile>,
}

impl RosterProvider {
    /// Empty roster.
    pub fn new() -> Self {
        Self::default()
    }

    /// Roster seeded with the built-in fighter table.
    pub fn with_builtin() -> Self {
        let mut roster = Self::new();
        for profile in builtin_profiles() {
            roster.insert(profile);
        }
        roster
    }

    /// Add or replace a fighter. Later inserts win.
    pub fn insert(&mut self, profile: FighterProfile) {
        self.profiles.insert(fighter_key(&profile.name), profile);
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Merge a JSON array of profiles over the current table.
    pub async fn load_overrides(&mut self, path: &Path) -> Result<usize> {
        let text = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read roster overrides {}", path.display()))?;
        let profiles: Vec<FighterProfile> = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse roster overrides {}", path.display()))?;
        let n = profiles.len();
        for profile in profiles {
            if profile.name.trim().is_empty() {
                anyhow::bail!("Roster override without a name in {}", path.display());
            }
            self.insert(profile);
        }
        info!("Loaded {} roster override(s) from {}", n, path.display());
        Ok(n)
    }
}

#[async_trait]
impl StatsProvider for RosterProvider {
    fn name(&self) -> &str {
        "roster"
    }

    async fn fetch_profile(&self, fighter: &str) -> Result<Option<FighterProfile>> {
        let key = fighter_key(fighter);
        debug!("Roster lookup for '{}' (key {})", fighter, key);
        Ok(self.profiles.get(&key).cloned())
    }
}

fn profile(name: &str, division: Division, stats: [f64; 10]) -> FighterProfile {
    let [
        slpm,
        sapm,
        strike_acc,
        strike_def,
        td_avg15,
        td_acc,
        td_def,
        sub_avg15,
        kd_avg,
        aft_minutes,
    ] = stats;
    FighterProfile {
        name: name.to_string(),
        division: Some(division),
        url: None,
        image_url: None,
        stats: RawStats {
            slpm: Some(slpm),
            sapm: Some(sapm),
            strike_acc: Some(strike_acc),
            strike_def: Some(strike_def),
            td_avg15: Some(td_avg15),
            td_acc: Some(td_acc),
            td_def: Some(td_def),
            sub_avg15: Some(sub_avg15),
            kd_avg: Some(kd_avg),
            aft_minutes: Some(aft_minutes),
        },
    }
}

/// UFC profile numbers, in canonical stat order.
fn builtin_profiles() -> Vec<FighterProfile> {
    vec![
        profile(
            "Khamzat Chimaev",
            Division::Middleweight,
            [5.36, 3.25, 0.59, 0.42, 4.31, 0.47, 1.00, 2.77, 0.62, 6.05],
        ),
        profile(
            "Dricus du Plessis",
            Division::Middleweight,
            [6.12, 4.90, 0.49, 0.54, 2.55, 0.50, 0.50, 0.73, 0.48, 13.75],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::StatRecord;

    #[tokio::test]
    async fn finds_builtin_fighters_by_loose_name() {
        let roster = RosterProvider::with_builtin();
        let p = roster
            .fetch_profile("dricus DU plessis")
            .await
            .unwrap()
            .expect("builtin fighter");
        assert_eq!(p.division, Some(Division::Middleweight));
        assert_eq!(p.stats.aft_minutes, Some(13.75));
        assert!(roster.fetch_profile("Nobody Atall").await.unwrap().is_none());
    }

    #[test]
    fn builtin_profiles_are_complete_and_valid() {
        for p in builtin_profiles() {
            assert!(p.stats.missing().is_empty());
            StatRecord::from_raw(&p.stats).unwrap();
        }
    }

    #[tokio::test]
    async fn overrides_replace_builtin_entries() {
        let path = std::env::temp_dir().join(format!(
            "fight_odds_roster_{}.json",
            std::process::id()
        ));
        let json = serde_json::json!([
            { "name": "Khamzat Chimaev", "division": "middleweight", "slpm": 6.0 },
            { "name": "Alex Pereira", "division": "light_heavyweight", "slpm": 5.1, "kd_avg": 1.4 }
        ]);
        tokio::fs::write(&path, json.to_string()).await.unwrap();

        let mut roster = RosterProvider::with_builtin();
        assert_eq!(roster.load_overrides(&path).await.unwrap(), 2);
        assert_eq!(roster.len(), 3);

        let chimaev = roster.fetch_profile("Khamzat Chimaev").await.unwrap().unwrap();
        assert_eq!(chimaev.stats.slpm, Some(6.0));
        assert_eq!(chimaev.stats.sapm, None);

        let pereira = roster.fetch_profile("alex pereira").await.unwrap().unwrap();
        assert_eq!(pereira.division, Some(Division::LightHeavyweight));

        tokio::fs::remove_file(&path).await.unwrap();
    }

    #[tokio::test]
    async fn missing_override_file_is_an_error() {
        let mut roster = RosterProvider::new();
        let err = roster
            .load_overrides(Path::new("/definitely/not/here.json"))
            .await
            .unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to read roster overrides"));
        assert!(roster.is_empty());
    }
}
