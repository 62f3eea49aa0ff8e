use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};

use crate::model::rounds::MAX_ROUNDS;
use crate::model::{BootstrapOptions, ModelConfig};
use crate::sources::{fighter_key, Division};

/// Which fighter-statistics source to consult.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SourceKind {
    /// Built-in fighter table plus optional overrides file
    Roster,
    /// Scraper JSON dumps (`<name>_stats.json`) in --stats-dir
    Files,
    /// Scraper dumps first, then the roster
    Both,
}

/// MMA matchup win-probability estimator
#[derive(Parser, Debug, Clone)]
#[command(name = "fight-odds", version, about)]
pub struct Config {
    /// First fighter; reported probabilities are for this fighter first
    #[arg(long, env = "FIRST_FIGHTER")]
    pub first: String,

    /// Second fighter
    #[arg(long, env = "SECOND_FIGHTER")]
    pub second: String,

    /// Where fighter statistics come from
    #[arg(long, env = "STATS_SOURCE", value_enum, default_value = "roster")]
    pub source: SourceKind,

    /// Directory holding scraper output files
    #[arg(long, env = "STATS_DIR", default_value = "stats")]
    pub stats_dir: PathBuf,

    /// JSON array of fighter profiles merged over the built-in roster
    #[arg(long, env = "ROSTER_OVERRIDES")]
    pub roster_overrides: Option<PathBuf>,

    /// Division whose averages fill missing statistics
    #[arg(long, env = "FALLBACK_DIVISION", default_value = "middleweight")]
    pub division: Division,

    /// Reject incomplete or unknown fighters instead of using division averages
    #[arg(long, env = "NO_FALLBACK", default_value = "false")]
    pub no_fallback: bool,

    /// JSON file with weights, norm_constants and bias overriding the defaults
    #[arg(long, env = "MODEL_CONFIG")]
    pub model_config: Option<PathBuf>,

    /// Logit offset in favour of the first fighter (overrides the config file)
    #[arg(long, env = "MODEL_BIAS", allow_hyphen_values = true)]
    pub bias: Option<f64>,

    /// Bootstrap iterations for the confidence band (0 disables it)
    #[arg(long, env = "BOOTSTRAP_ITERS", default_value = "1000")]
    pub bootstrap_iters: usize,

    /// Relative noise applied to each statistic per bootstrap iteration
    #[arg(long, env = "BOOTSTRAP_NOISE", default_value = "0.03")]
    pub noise: f64,

    /// Bootstrap RNG seed
    #[arg(long, env = "BOOTSTRAP_SEED", default_value = "42")]
    pub seed: u64,

    /// Also print a round-by-round curve for this many rounds (1-5)
    #[arg(long, env = "ROUNDS")]
    pub rounds: Option<u32>,

    /// Print the report as JSON instead of text
    #[arg(long, env = "JSON_OUTPUT", default_value = "false")]
    pub json: bool,
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        if fighter_key(&self.first).is_empty() || fighter_key(&self.second).is_empty() {
            anyhow::bail!("both fighter names must be non-empty");
        }
        if fighter_key(&self.first) == fighter_key(&self.second) {
            anyhow::bail!("a fighter cannot be matched against themselves");
        }
        if let Some(opts) = self.bootstrap_options() {
            opts.validate()?;
        }
        if let Some(rounds) = self.rounds {
            if !(1..=MAX_ROUNDS).contains(&rounds) {
                anyhow::bail!("rounds must be between 1 and {}", MAX_ROUNDS);
            }
        }
        if let Some(bias) = self.bias {
            if !bias.is_finite() {
                anyhow::bail!("bias must be a finite number");
            }
        }
        Ok(())
    }

    pub fn bootstrap_options(&self) -> Option<BootstrapOptions> {
        (self.bootstrap_iters > 0).then_some(BootstrapOptions {
            iterations: self.bootstrap_iters,
            noise: self.noise,
            seed: self.seed,
        })
    }

    pub fn fallback_division(&self) -> Option<Division> {
        (!self.no_fallback).then_some(self.division)
    }

    /// Default coefficients, or the `--model-config` file, with `--bias`
    /// applied on top.
    pub async fn load_model_config(&self) -> anyhow::Result<ModelConfig> {
        let mut config = match &self.model_config {
            Some(path) => {
                let text = tokio::fs::read_to_string(path)
                    .await
                    .with_context(|| format!("Failed to read model config {}", path.display()))?;
                serde_json::from_str::<ModelConfig>(&text)
                    .with_context(|| format!("Failed to parse model config {}", path.display()))?
            }
            None => ModelConfig::default(),
        };
        if let Some(bias) = self.bias {
            config.bias = bias;
        }
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Config {
        let mut argv = vec!["fight-odds"];
        argv.extend_from_slice(args);
        Config::try_parse_from(argv).unwrap()
    }

    #[test]
    fn defaults_are_valid() {
        let c = parse(&["--first", "Khamzat Chimaev", "--second", "Dricus du Plessis"]);
        c.validate().unwrap();
        assert_eq!(c.source, SourceKind::Roster);
        assert_eq!(c.fallback_division(), Some(Division::Middleweight));
        assert_eq!(c.bootstrap_options(), Some(BootstrapOptions::default()));
        assert_eq!(c.rounds, None);
    }

    #[test]
    fn parses_division_source_and_strict_mode() {
        let c = parse(&[
            "--first", "A", "--second", "B",
            "--source", "both",
            "--division", "light-heavyweight",
            "--no-fallback",
            "--bootstrap-iters", "0",
            "--bias", "-0.1",
        ]);
        c.validate().unwrap();
        assert_eq!(c.source, SourceKind::Both);
        assert_eq!(c.division, Division::LightHeavyweight);
        assert_eq!(c.fallback_division(), None);
        assert_eq!(c.bootstrap_options(), None);
        assert_eq!(c.bias, Some(-0.1));
    }

    #[test]
    fn rejects_bad_values() {
        let unknown_division = Config::try_parse_from([
            "fight-odds",
            "--first",
            "A",
            "--second",
            "B",
            "--division",
            "strawweight",
        ]);
        assert!(unknown_division.is_err());

        let same = parse(&["--first", "Jon Jones", "--second", "jon  JONES"]);
        assert!(same.validate().is_err());

        let rounds = parse(&["--first", "A", "--second", "B", "--rounds", "7"]);
        assert!(rounds.validate().is_err());

        let noise = parse(&["--first", "A", "--second", "B", "--noise=-1"]);
        assert!(noise.validate().is_err());
    }

    #[tokio::test]
    async fn bias_overrides_model_file() {
        let path =
            std::env::temp_dir().join(format!("fight_odds_model_{}.json", std::process::id()));
        let mut file_config = ModelConfig::default();
        file_config.weights.kd_avg = 0.4;
        file_config.bias = 0.3;
        tokio::fs::write(&path, serde_json::to_string(&file_config).unwrap())
            .await
            .unwrap();

        let path_arg = path.to_string_lossy().to_string();
        let c = parse(&[
            "--first",
            "A",
            "--second",
            "B",
            "--model-config",
            &path_arg,
            "--bias",
            "0.05",
        ]);
        let loaded = c.load_model_config().await.unwrap();
        assert_eq!(loaded.weights.kd_avg, 0.4);
        assert_eq!(loaded.bias, 0.05);

        tokio::fs::remove_file(&path).await.unwrap();
    }

    #[tokio::test]
    async fn invalid_model_file_is_rejected() {
        let path =
            std::env::temp_dir().join(format!("fight_odds_badmodel_{}.json", std::process::id()));
        let mut file_config = ModelConfig::default();
        file_config.norm_constants.slpm = -2.0;
        tokio::fs::write(&path, serde_json::to_string(&file_config).unwrap())
            .await
            .unwrap();

        let path_arg = path.to_string_lossy().to_string();
        let c = parse(&["--first", "A", "--second", "B", "--model-config", &path_arg]);
        assert!(c.load_model_config().await.is_err());

        tokio::fs::remove_file(&path).await.unwrap();
    }
}
