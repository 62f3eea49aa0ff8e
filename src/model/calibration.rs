//! Weight calibration from labelled historical matchups.
//!
//! Fits the ten per-statistic weights by L2-regularized logistic regression
//! (full-batch gradient descent on log-loss). Normalization constants and the
//! bias are taken from the base configuration and held fixed, so a fitted
//! model with zero bias keeps the swap symmetry of the default one.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::matchup::{sigmoid, MatchupModel, ModelConfig};
use super::stats::{PerStat, Stat, StatRecord, STAT_COUNT};

const EPS: f64 = 1e-6;
const MIN_SAMPLES: usize = 8;

/// One past fight: `a_won` is true when the first record's fighter won.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabelledMatchup {
    pub a: StatRecord,
    pub b: StatRecord,
    pub a_won: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitOptions {
    pub epochs: usize,
    pub learning_rate: f64,
    pub l2: f64,
}

impl Default for FitOptions {
    fn default() -> Self {
        FitOptions {
            epochs: 2000,
            learning_rate: 0.2,
            l2: 1e-3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitMetrics {
    pub logloss_before: f64,
    pub logloss_after: f64,
    pub brier_before: f64,
    pub brier_after: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitResult {
    pub config: ModelConfig,
    pub metrics: FitMetrics,
}

fn clamp_prob(p: f64) -> f64 {
    p.clamp(EPS, 1.0 - EPS)
}

fn logloss(p: f64, y: f64) -> f64 {
    let p = clamp_prob(p);
    -(y * p.ln() + (1.0 - y) * (1.0 - p).ln())
}

fn label(sample: &LabelledMatchup) -> f64 {
    if sample.a_won {
        1.0
    } else {
        0.0
    }
}

/// Normalized difference vector for one matchup.
fn features(sample: &LabelledMatchup, norm: &PerStat<f64>) -> [f64; STAT_COUNT] {
    let mut x = [0.0; STAT_COUNT];
    for stat in Stat::ALL {
        x[stat.index()] = (sample.a.get(stat) - sample.b.get(stat)) / norm.get(stat);
    }
    x
}

/// Returns `None` when the data cannot support a fit: too few samples, a
/// single outcome class, non-finite features, or a diverging optimisation.
pub fn fit_weights(
    samples: &[LabelledMatchup],
    base: &ModelConfig,
    options: FitOptions,
) -> Option<FitResult> {
    if samples.len() < MIN_SAMPLES {
        debug!("calibration skipped: {} samples", samples.len());
        return None;
    }
    let wins = samples.iter().filter(|s| s.a_won).count();
    if wins == 0 || wins == samples.len() {
        debug!("calibration skipped: single outcome class");
        return None;
    }
    let base_model = MatchupModel::new(*base).ok()?;

    let xs: Vec<[f64; STAT_COUNT]> = samples
        .iter()
        .map(|s| features(s, &base.norm_constants))
        .collect();
    if xs.iter().flatten().any(|v| !v.is_finite()) {
        return None;
    }
    let ys: Vec<f64> = samples.iter().map(label).collect();

    let n = samples.len() as f64;
    let mut w = [0.0f64; STAT_COUNT];

    for i in 0..options.epochs.max(1) {
        let lr = options.learning_rate / (1.0 + 0.01 * i as f64);
        let mut grad = [0.0f64; STAT_COUNT];
        for (x, y) in xs.iter().zip(&ys) {
            let z = base.bias + x.iter().zip(&w).map(|(xi, wi)| xi * wi).sum::<f64>();
            let err = sigmoid(z) - y;
            for (g, xi) in grad.iter_mut().zip(x) {
                *g += err * xi;
            }
        }
        for (wi, g) in w.iter_mut().zip(&grad) {
            *wi -= lr * (g / n + options.l2 * *wi);
        }
        if w.iter().any(|v| !v.is_finite()) {
            return None;
        }
    }

    let config = ModelConfig {
        weights: PerStat::from_fn(|stat| w[stat.index()]),
        ..*base
    };
    let fitted = MatchupModel::new(config).ok()?;

    let mut ll_before = 0.0;
    let mut ll_after = 0.0;
    let mut br_before = 0.0;
    let mut br_after = 0.0;
    for (sample, y) in samples.iter().zip(&ys) {
        let before = base_model.predict(&sample.a, &sample.b).ok()?.p_a;
        let after = fitted.predict(&sample.a, &sample.b).ok()?.p_a;
        ll_before += logloss(before, *y);
        ll_after += logloss(after, *y);
        br_before += (before - y).powi(2);
        br_after += (after - y).powi(2);
    }
    let metrics = FitMetrics {
        logloss_before: ll_before / n,
        logloss_after: ll_after / n,
        brier_before: br_before / n,
        brier_after: br_after / n,
    };
    info!(
        "calibrated on {} fights: logloss {:.4} -> {:.4}, brier {:.4} -> {:.4}",
        samples.len(),
        metrics.logloss_before,
        metrics.logloss_after,
        metrics.brier_before,
        metrics.brier_after
    );
    Some(FitResult { config, metrics })
}
