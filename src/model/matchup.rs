//! Head-to-head win probability from two stat records.
//!
//! The model is a logistic regression on per-statistic differences:
//!
//! ```text
//! z   = bias + Σ weight_i · (a_i − b_i) / norm_i
//! p_a = σ(z),  p_b = σ(−z)
//! ```
//!
//! Differencing makes the model antisymmetric in its arguments: swapping the
//! fighters negates every term, so `predict(b, a)` is `predict(a, b)` with the
//! outputs exchanged. Normalization puts statistics measured on very different
//! scales (strikes per minute vs. accuracy fractions) on a comparable footing
//! before weighting.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::{ConfigError, Corner, InvalidRecordError};
use super::stats::{PerStat, Stat, StatRecord};

/// Largest magnitude a single term or the total logit may take.
///
/// σ(30) ≈ 1 − 9.4e-14, so probabilities stay strictly inside (0, 1) and an
/// extreme but valid record cannot push the sum to ±inf.
pub const MAX_LOGIT: f64 = 30.0;

/// Typical spread of each statistic across the UFC roster.
///
/// Rates are per minute (strikes) or per 15 minutes (takedowns, submissions,
/// knockdowns); fractions are already bounded so their divisor is small.
pub const DEFAULT_NORM_CONSTANTS: PerStat<f64> = PerStat {
    slpm: 2.0,
    sapm: 2.0,
    strike_acc: 0.10,
    strike_def: 0.10,
    td_avg15: 1.5,
    td_acc: 0.20,
    td_def: 0.20,
    sub_avg15: 1.0,
    kd_avg: 0.5,
    aft_minutes: 5.0,
};

/// Signed weight per normalized difference. Positive favours the fighter
/// with the larger value; `sapm` is negative because absorbing more strikes
/// is a disadvantage.
///
/// Grappling control (takedown volume and defense) and striking differential
/// carry the most weight, followed by accuracy/defense, finishing threat and
/// pacing, following the ordering of the earlier hand-tuned weight set.
pub const DEFAULT_WEIGHTS: PerStat<f64> = PerStat {
    slpm: 0.30,
    sapm: -0.30,
    strike_acc: 0.15,
    strike_def: 0.15,
    td_avg15: 0.25,
    td_acc: 0.15,
    td_def: 0.20,
    sub_avg15: 0.10,
    kd_avg: 0.15,
    aft_minutes: 0.05,
};

/// Coefficients of a [`MatchupModel`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    pub weights: PerStat<f64>,
    pub norm_constants: PerStat<f64>,
    /// Offset in favour of the first corner. Zero keeps the model symmetric.
    #[serde(default)]
    pub bias: f64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        ModelConfig {
            weights: DEFAULT_WEIGHTS,
            norm_constants: DEFAULT_NORM_CONSTANTS,
            bias: 0.0,
        }
    }
}

impl ModelConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for stat in Stat::ALL {
            let w = self.weights.get(stat);
            if !w.is_finite() {
                return Err(ConfigError::NonFiniteWeight { stat, value: w });
            }
            let n = self.norm_constants.get(stat);
            if !n.is_finite() || n <= 0.0 {
                return Err(ConfigError::InvalidNormConstant { stat, value: n });
            }
        }
        if !self.bias.is_finite() {
            return Err(ConfigError::NonFiniteBias(self.bias));
        }
        Ok(())
    }
}

/// Complementary win probabilities; `p_a` belongs to the first argument.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub p_a: f64,
    pub p_b: f64,
    /// Clamped weighted score the probabilities were derived from.
    pub logit: f64,
}

/// How much one statistic moved the logit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Contribution {
    pub stat: Stat,
    /// `a − b` in the statistic's own units.
    pub diff: f64,
    pub normalized: f64,
    pub weight: f64,
    pub contribution: f64,
}

/// Stateless logistic matchup model. Cheap to clone and safe to share.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchupModel {
    config: ModelConfig,
}

impl Default for MatchupModel {
    fn default() -> Self {
        MatchupModel {
            config: ModelConfig::default(),
        }
    }
}

impl MatchupModel {
    pub fn new(config: ModelConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(MatchupModel { config })
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// A copy of this model with every weight scaled by its multiplier.
    pub fn with_weight_multipliers(&self, multipliers: &PerStat<f64>) -> Result<Self, ConfigError> {
        let weights = self
            .config
            .weights
            .map(|stat, w| w * multipliers.get(stat));
        Self::new(ModelConfig {
            weights,
            ..self.config
        })
    }

    /// Estimate P(first wins) and P(second wins).
    pub fn predict(
        &self,
        a: &StatRecord,
        b: &StatRecord,
    ) -> Result<Prediction, InvalidRecordError> {
        let z = self.logit(a, b)?;
        let prediction = Prediction {
            p_a: sigmoid(z),
            p_b: sigmoid(-z),
            logit: z,
        };
        debug!(
            "matchup logit={:.4} p_a={:.4} p_b={:.4}",
            z, prediction.p_a, prediction.p_b
        );
        Ok(prediction)
    }

    /// Weighted score in [−MAX_LOGIT, MAX_LOGIT]; positive favours `a`.
    pub fn logit(&self, a: &StatRecord, b: &StatRecord) -> Result<f64, InvalidRecordError> {
        ensure_valid(a, b)?;
        let sum: f64 = Stat::ALL
            .iter()
            .map(|stat| self.term(*stat, a, b).contribution)
            .sum();
        Ok((sum + self.config.bias).clamp(-MAX_LOGIT, MAX_LOGIT))
    }

    /// Per-statistic breakdown of the logit, largest absolute effect first.
    pub fn contributions(
        &self,
        a: &StatRecord,
        b: &StatRecord,
    ) -> Result<Vec<Contribution>, InvalidRecordError> {
        ensure_valid(a, b)?;
        let mut terms: Vec<Contribution> =
            Stat::ALL.iter().map(|stat| self.term(*stat, a, b)).collect();
        terms.sort_by(|x, y| y.contribution.abs().total_cmp(&x.contribution.abs()));
        Ok(terms)
    }

    fn term(&self, stat: Stat, a: &StatRecord, b: &StatRecord) -> Contribution {
        let diff = a.get(stat) - b.get(stat);
        let normalized = diff / self.config.norm_constants.get(stat);
        let weight = self.config.weights.get(stat);
        let raw = weight * normalized;
        // 0 · inf when a zero weight meets an overflowing difference
        let contribution = if raw.is_nan() {
            0.0
        } else {
            raw.clamp(-MAX_LOGIT, MAX_LOGIT)
        };
        Contribution {
            stat,
            diff,
            normalized,
            weight,
            contribution,
        }
    }
}

fn ensure_valid(a: &StatRecord, b: &StatRecord) -> Result<(), InvalidRecordError> {
    a.check().map_err(|source| InvalidRecordError {
        corner: Corner::First,
        source,
    })?;
    b.check().map_err(|source| InvalidRecordError {
        corner: Corner::Second,
        source,
    })
}

/// Numerically stable logistic function.
pub fn sigmoid(x: f64) -> f64 {
    if x >= 0.0 {
        let z = (-x).exp();
        1.0 / (1.0 + z)
    } else {
        let z = x.exp();
        z / (1.0 + z)
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
