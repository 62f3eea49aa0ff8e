use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::model::{
    bootstrap, round_probabilities, BootstrapOptions, BootstrapSummary, Contribution,
    MatchupModel, ModelError, Prediction, RoundProbability,
};
use crate::sources::ResolvedFighter;

/// Everything the CLI prints for one matchup.
#[derive(Debug, Clone, Serialize)]
pub struct MatchupReport {
    pub generated_at: DateTime<Utc>,
    pub first: ResolvedFighter,
    pub second: ResolvedFighter,
    pub prediction: Prediction,
    pub contributions: Vec<Contribution>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bootstrap: Option<BootstrapSummary>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rounds: Vec<RoundProbability>,
}

impl MatchupReport {
    pub fn build(
        model: &MatchupModel,
        first: ResolvedFighter,
        second: ResolvedFighter,
        bootstrap_options: Option<BootstrapOptions>,
        rounds: Option<u32>,
    ) -> Result<Self, ModelError> {
        let prediction = model.predict(&first.record, &second.record)?;
        let contributions = model.contributions(&first.record, &second.record)?;
        let bootstrap = bootstrap_options
            .map(|opts| bootstrap(model, &first.record, &second.record, opts))
            .transpose()?;
        let rounds = match rounds {
            Some(n) => round_probabilities(model, &first.record, &second.record, n)?,
            None => Vec::new(),
        };

        info!(
            "{} vs {}: {:.1}% / {:.1}%",
            first.name,
            second.name,
            prediction.p_a * 100.0,
            prediction.p_b * 100.0
        );

        Ok(MatchupReport {
            generated_at: Utc::now(),
            first,
            second,
            prediction,
            contributions,
            bootstrap,
            rounds,
        })
    }

    /// Human-readable summary.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let a = &self.first.name;
        let b = &self.second.name;

        let _ = write!(
            out,
            "P({} beats {}) = {:.1}%",
            a,
            b,
            self.prediction.p_a * 100.0
        );
        if let Some(band) = &self.bootstrap {
            let _ = write!(
                out,
                "  |  CI~90%: [{:.1}%, {:.1}%]",
                band.low * 100.0,
                band.high * 100.0
            );
        }
        out.push('\n');
        let _ = writeln!(
            out,
            "P({} beats {}) = {:.1}%",
            b,
            a,
            self.prediction.p_b * 100.0
        );

        let _ = writeln!(out, "Contributions (logit {:+.3}):", self.prediction.logit);
        for c in &self.contributions {
            let _ = writeln!(out, "  {:25} -> {:+.3}", c.stat.name(), c.contribution);
        }

        if !self.rounds.is_empty() {
            let _ = writeln!(out, "By round:");
            for r in &self.rounds {
                let _ = writeln!(
                    out,
                    "  R{}: {} {:.1}% | {} {:.1}%",
                    r.round,
                    a,
                    r.p_a * 100.0,
                    b,
                    r.p_b * 100.0
                );
            }
        }
        out
    }
}
