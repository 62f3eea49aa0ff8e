//! Perturbation bootstrap for a rough uncertainty band.
//!
//! Profile statistics are themselves noisy estimates, so the point prediction
//! is complemented by re-running the model on jittered copies of both records.
//! Each statistic is scaled by `1 + N(0, noise)` and then projected back into
//! its domain before the record is rebuilt.

use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, StandardNormal};
use serde::{Deserialize, Serialize};

use super::error::ConfigError;
use super::matchup::MatchupModel;
use super::stats::{PerStat, Stat, StatKind, StatRecord};
use super::ModelError;

/// Upper bound for a jittered average fight time (five 5-minute rounds),
/// raised to the fighter's own average when that is longer.
pub const MAX_DURATION: f64 = 25.0;
/// Lower bound for a jittered average fight time.
pub const MIN_DURATION: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BootstrapOptions {
    pub iterations: usize,
    /// Relative standard deviation, e.g. 0.03 for 3%.
    pub noise: f64,
    pub seed: u64,
}

impl Default for BootstrapOptions {
    fn default() -> Self {
        BootstrapOptions {
            iterations: 1000,
            noise: 0.03,
            seed: 42,
        }
    }
}

impl BootstrapOptions {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.iterations == 0 {
            return Err(ConfigError::NoIterations);
        }
        if !self.noise.is_finite() || self.noise < 0.0 {
            return Err(ConfigError::InvalidNoise(self.noise));
        }
        Ok(())
    }
}

/// Mean probability for the first fighter with an approximate 90% band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BootstrapSummary {
    pub mean: f64,
    pub low: f64,
    pub high: f64,
    pub iterations: usize,
}

pub fn bootstrap(
    model: &MatchupModel,
    a: &StatRecord,
    b: &StatRecord,
    options: BootstrapOptions,
) -> Result<BootstrapSummary, ModelError> {
    options.validate()?;
    // Surface a bad record once rather than per iteration
    model.predict(a, b)?;

    let mut rng = StdRng::seed_from_u64(options.seed);
    let mut samples = Vec::with_capacity(options.iterations);
    for _ in 0..options.iterations {
        let aa = jitter(a, options.noise, &mut rng)?;
        let bb = jitter(b, options.noise, &mut rng)?;
        samples.push(model.predict(&aa, &bb)?.p_a);
    }

    samples.sort_by(|x, y| x.total_cmp(y));
    let n = samples.len();
    let mean = samples.iter().sum::<f64>() / n as f64;
    let low = samples[(n as f64 * 0.05) as usize];
    let high = samples[((n as f64 * 0.95) as usize).saturating_sub(1)];

    Ok(BootstrapSummary {
        mean,
        low,
        high,
        iterations: n,
    })
}

fn jitter(record: &StatRecord, noise: f64, rng: &mut StdRng) -> Result<StatRecord, ModelError> {
    let mut values = PerStat::splat(0.0);
    for stat in Stat::ALL {
        let eps: f64 = StandardNormal.sample(rng);
        let value = record.get(stat);
        *values.get_mut(stat) = project(stat, value * (1.0 + eps * noise), value);
    }
    Ok(StatRecord::from_values(values)?)
}

/// Pull a jittered value back into its statistic's domain. Overflow of a huge
/// rate saturates at `f64::MAX`; the duration cap never drops below the
/// fighter's own value.
fn project(stat: Stat, jittered: f64, original: f64) -> f64 {
    match stat.kind() {
        StatKind::Rate => jittered.clamp(0.0, f64::MAX),
        StatKind::Fraction => jittered.clamp(0.0, 1.0),
        StatKind::Duration => jittered.clamp(MIN_DURATION, MAX_DURATION.max(original)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::stats::tests::{chimaev, du_plessis};

    #[test]
    fn band_contains_mean_and_point_estimate() {
        let model = MatchupModel::default();
        let point = model.predict(&chimaev(), &du_plessis()).unwrap().p_a;
        let s = bootstrap(
            &model,
            &chimaev(),
            &du_plessis(),
            BootstrapOptions {
                iterations: 400,
                ..BootstrapOptions::default()
            },
        )
        .unwrap();
        assert_eq!(s.iterations, 400);
        assert!(s.low <= s.mean && s.mean <= s.high);
        assert!(s.low < point && point < s.high, "{:?} vs {}", s, point);
        assert!(s.high - s.low < 0.2);
    }

    #[test]
    fn same_seed_same_result() {
        let model = MatchupModel::default();
        let opts = BootstrapOptions {
            iterations: 200,
            noise: 0.05,
            seed: 7,
        };
        let x = bootstrap(&model, &chimaev(), &du_plessis(), opts).unwrap();
        let y = bootstrap(&model, &chimaev(), &du_plessis(), opts).unwrap();
        assert_eq!(x, y);
    }

    #[test]
    fn zero_noise_collapses_to_point_estimate() {
        let model = MatchupModel::default();
        let point = model.predict(&chimaev(), &du_plessis()).unwrap().p_a;
        let s = bootstrap(
            &model,
            &chimaev(),
            &du_plessis(),
            BootstrapOptions {
                iterations: 10,
                noise: 0.0,
                seed: 1,
            },
        )
        .unwrap();
        assert_eq!(s.low, point);
        assert_eq!(s.high, point);
    }

    #[test]
    fn heavy_noise_keeps_records_valid() {
        let model = MatchupModel::default();
        let s = bootstrap(
            &model,
            &chimaev(),
            &du_plessis(),
            BootstrapOptions {
                iterations: 500,
                noise: 2.0,
                seed: 3,
            },
        )
        .unwrap();
        assert!(s.low > 0.0 && s.high < 1.0);
    }

    #[test]
    fn rejects_empty_or_negative_options() {
        let model = MatchupModel::default();
        let err = bootstrap(
            &model,
            &chimaev(),
            &du_plessis(),
            BootstrapOptions {
                iterations: 0,
                ..BootstrapOptions::default()
            },
        )
        .unwrap_err();
        assert!(matches!(err, ModelError::Config(ConfigError::NoIterations)));

        let err = bootstrap(
            &model,
            &chimaev(),
            &du_plessis(),
            BootstrapOptions {
                noise: -0.1,
                ..BootstrapOptions::default()
            },
        )
        .unwrap_err();
        assert!(matches!(err, ModelError::Config(ConfigError::InvalidNoise(_))));
    }

    #[test]
    fn projection_respects_domains() {
        assert_eq!(project(Stat::Slpm, -1.0, 2.0), 0.0);
        assert_eq!(project(Stat::Slpm, f64::INFINITY, f64::MAX), f64::MAX);
        assert_eq!(project(Stat::TdDef, 1.2, 0.9), 1.0);
        assert_eq!(project(Stat::AftMinutes, 0.0, 5.0), MIN_DURATION);
        assert_eq!(project(Stat::AftMinutes, 40.0, 10.0), MAX_DURATION);
        assert_eq!(project(Stat::AftMinutes, 40.0, 30.0), 30.0);
    }

    #[test]
    fn huge_rates_do_not_overflow_resamples() {
        let model = MatchupModel::default();
        let giant =
            StatRecord::new(f64::MAX, 0.0, 0.5, 0.5, 0.0, 0.5, 0.5, 0.0, 0.0, 10.0).unwrap();
        let regular = StatRecord::new(1.0, 0.0, 0.5, 0.5, 0.0, 0.5, 0.5, 0.0, 0.0, 10.0).unwrap();
        let point = model.predict(&giant, &regular).unwrap().p_a;
        let s = bootstrap(&model, &giant, &regular, BootstrapOptions::default()).unwrap();
        assert!(point > 0.999);
        assert!(s.low > 0.999 && s.high < 1.0, "{:?}", s);
    }

    #[test]
    fn long_fights_are_not_capped_without_noise() {
        let model = MatchupModel::default();
        let marathon = StatRecord::new(4.0, 3.0, 0.5, 0.5, 1.0, 0.4, 0.6, 0.5, 0.3, 30.0).unwrap();
        let sprinter = StatRecord::new(4.0, 3.0, 0.5, 0.5, 1.0, 0.4, 0.6, 0.5, 0.3, 10.0).unwrap();
        let point = model.predict(&marathon, &sprinter).unwrap().p_a;
        let s = bootstrap(
            &model,
            &marathon,
            &sprinter,
            BootstrapOptions {
                iterations: 20,
                noise: 0.0,
                seed: 9,
            },
        )
        .unwrap();
        assert_eq!(s.low, point);
        assert_eq!(s.high, point);
    }
}
