//! Per-fighter statistic records.
//!
//! A [`StatRecord`] is the only way statistics reach the matchup model. It is
//! built through a validating constructor and is immutable afterwards, so a
//! record in hand always satisfies its domain rules:
//!
//! - fractions (`strike_acc`, `strike_def`, `td_acc`, `td_def`) lie in [0, 1]
//! - rates (`slpm`, `sapm`, `td_avg15`, `sub_avg15`, `kd_avg`) are >= 0
//! - `aft_minutes` is > 0
//!
//! Values are never clamped. Out-of-domain data is reported back to the
//! caller as a [`ValidationError`] naming the statistic and the bound.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of statistics in a record.
pub const STAT_COUNT: usize = 10;

/// One of the ten fighter statistics, in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stat {
    Slpm,
    Sapm,
    StrikeAcc,
    StrikeDef,
    TdAvg15,
    TdAcc,
    TdDef,
    SubAvg15,
    KdAvg,
    AftMinutes,
}

/// Domain class of a statistic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatKind {
    /// Fraction in [0, 1].
    Fraction,
    /// Non-negative rate.
    Rate,
    /// Strictly positive duration in minutes.
    Duration,
}

impl Stat {
    pub const ALL: [Stat; STAT_COUNT] = [
        Stat::Slpm,
        Stat::Sapm,
        Stat::StrikeAcc,
        Stat::StrikeDef,
        Stat::TdAvg15,
        Stat::TdAcc,
        Stat::TdDef,
        Stat::SubAvg15,
        Stat::KdAvg,
        Stat::AftMinutes,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Stat::Slpm => "slpm",
            Stat::Sapm => "sapm",
            Stat::StrikeAcc => "strike_acc",
            Stat::StrikeDef => "strike_def",
            Stat::TdAvg15 => "td_avg15",
            Stat::TdAcc => "td_acc",
            Stat::TdDef => "td_def",
            Stat::SubAvg15 => "sub_avg15",
            Stat::KdAvg => "kd_avg",
            Stat::AftMinutes => "aft_minutes",
        }
    }

    pub fn kind(self) -> StatKind {
        match self {
            Stat::StrikeAcc | Stat::StrikeDef | Stat::TdAcc | Stat::TdDef => StatKind::Fraction,
            Stat::AftMinutes => StatKind::Duration,
            _ => StatKind::Rate,
        }
    }

    /// Position of the statistic in [`Stat::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// Check a single value against this statistic's domain.
    pub fn check(self, value: f64) -> Result<f64, ValidationError> {
        if !value.is_finite() {
            return Err(ValidationError::NotFinite { stat: self, value });
        }
        match self.kind() {
            StatKind::Fraction if !(0.0..=1.0).contains(&value) => {
                Err(ValidationError::FractionOutOfRange { stat: self, value })
            }
            StatKind::Rate if value < 0.0 => {
                Err(ValidationError::NegativeRate { stat: self, value })
            }
            StatKind::Duration if value <= 0.0 => {
                Err(ValidationError::NonPositiveDuration { stat: self, value })
            }
            _ => Ok(value),
        }
    }
}

impl fmt::Display for Stat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A statistic outside its declared domain, or absent.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{stat} is missing")]
    Missing { stat: Stat },

    #[error("{stat} = {value} is not a finite number")]
    NotFinite { stat: Stat, value: f64 },

    #[error("{stat} = {value} is outside [0, 1]")]
    FractionOutOfRange { stat: Stat, value: f64 },

    #[error("{stat} = {value} is negative (rates must be >= 0)")]
    NegativeRate { stat: Stat, value: f64 },

    #[error("{stat} = {value} must be > 0 minutes")]
    NonPositiveDuration { stat: Stat, value: f64 },
}

impl ValidationError {
    /// The offending statistic.
    pub fn stat(&self) -> Stat {
        match self {
            ValidationError::Missing { stat }
            | ValidationError::NotFinite { stat, .. }
            | ValidationError::FractionOutOfRange { stat, .. }
            | ValidationError::NegativeRate { stat, .. }
            | ValidationError::NonPositiveDuration { stat, .. } => *stat,
        }
    }
}

/// One value per statistic, addressable by [`Stat`].
///
/// Used for record values as well as per-feature weights and normalization
/// constants, so JSON for all of them shares the same field names.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerStat<T> {
    pub slpm: T,
    pub sapm: T,
    pub strike_acc: T,
    pub strike_def: T,
    pub td_avg15: T,
    pub td_acc: T,
    pub td_def: T,
    pub sub_avg15: T,
    pub kd_avg: T,
    pub aft_minutes: T,
}

impl<T: Copy> PerStat<T> {
    pub fn from_fn(mut f: impl FnMut(Stat) -> T) -> Self {
        PerStat {
            slpm: f(Stat::Slpm),
            sapm: f(Stat::Sapm),
            strike_acc: f(Stat::StrikeAcc),
            strike_def: f(Stat::StrikeDef),
            td_avg15: f(Stat::TdAvg15),
            td_acc: f(Stat::TdAcc),
            td_def: f(Stat::TdDef),
            sub_avg15: f(Stat::SubAvg15),
            kd_avg: f(Stat::KdAvg),
            aft_minutes: f(Stat::AftMinutes),
        }
    }

    pub fn splat(value: T) -> Self {
        Self::from_fn(|_| value)
    }

    pub fn get(&self, stat: Stat) -> T {
        match stat {
            Stat::Slpm => self.slpm,
            Stat::Sapm => self.sapm,
            Stat::StrikeAcc => self.strike_acc,
            Stat::StrikeDef => self.strike_def,
            Stat::TdAvg15 => self.td_avg15,
            Stat::TdAcc => self.td_acc,
            Stat::TdDef => self.td_def,
            Stat::SubAvg15 => self.sub_avg15,
            Stat::KdAvg => self.kd_avg,
            Stat::AftMinutes => self.aft_minutes,
        }
    }

    pub fn get_mut(&mut self, stat: Stat) -> &mut T {
        match stat {
            Stat::Slpm => &mut self.slpm,
            Stat::Sapm => &mut self.sapm,
            Stat::StrikeAcc => &mut self.strike_acc,
            Stat::StrikeDef => &mut self.strike_def,
            Stat::TdAvg15 => &mut self.td_avg15,
            Stat::TdAcc => &mut self.td_acc,
            Stat::TdDef => &mut self.td_def,
            Stat::SubAvg15 => &mut self.sub_avg15,
            Stat::KdAvg => &mut self.kd_avg,
            Stat::AftMinutes => &mut self.aft_minutes,
        }
    }

    pub fn map<U: Copy>(&self, mut f: impl FnMut(Stat, T) -> U) -> PerStat<U> {
        PerStat::from_fn(|stat| f(stat, self.get(stat)))
    }
}

/// Statistics as produced by a collaborator, any of which may be absent.
///
/// Scraper output carries `null` for anything it could not find; unknown keys
/// (`name`, `url`, `image_url`, ...) are ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RawStats {
    #[serde(default)]
    pub slpm: Option<f64>,
    #[serde(default)]
    pub sapm: Option<f64>,
    #[serde(default)]
    pub strike_acc: Option<f64>,
    #[serde(default)]
    pub strike_def: Option<f64>,
    #[serde(default)]
    pub td_avg15: Option<f64>,
    #[serde(default)]
    pub td_acc: Option<f64>,
    #[serde(default)]
    pub td_def: Option<f64>,
    #[serde(default)]
    pub sub_avg15: Option<f64>,
    #[serde(default)]
    pub kd_avg: Option<f64>,
    #[serde(default)]
    pub aft_minutes: Option<f64>,
}

impl RawStats {
    pub fn get(&self, stat: Stat) -> Option<f64> {
        match stat {
            Stat::Slpm => self.slpm,
            Stat::Sapm => self.sapm,
            Stat::StrikeAcc => self.strike_acc,
            Stat::StrikeDef => self.strike_def,
            Stat::TdAvg15 => self.td_avg15,
            Stat::TdAcc => self.td_acc,
            Stat::TdDef => self.td_def,
            Stat::SubAvg15 => self.sub_avg15,
            Stat::KdAvg => self.kd_avg,
            Stat::AftMinutes => self.aft_minutes,
        }
    }

    pub fn set(&mut self, stat: Stat, value: Option<f64>) {
        let slot = match stat {
            Stat::Slpm => &mut self.slpm,
            Stat::Sapm => &mut self.sapm,
            Stat::StrikeAcc => &mut self.strike_acc,
            Stat::StrikeDef => &mut self.strike_def,
            Stat::TdAvg15 => &mut self.td_avg15,
            Stat::TdAcc => &mut self.td_acc,
            Stat::TdDef => &mut self.td_def,
            Stat::SubAvg15 => &mut self.sub_avg15,
            Stat::KdAvg => &mut self.kd_avg,
            Stat::AftMinutes => &mut self.aft_minutes,
        };
        *slot = value;
    }

    /// Statistics with no value.
    pub fn missing(&self) -> Vec<Stat> {
        Stat::ALL
            .into_iter()
            .filter(|s| self.get(*s).is_none())
            .collect()
    }
}

/// A validated snapshot of one fighter's ten statistics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawStats", into = "RawStats")]
pub struct StatRecord {
    values: PerStat<f64>,
}

impl StatRecord {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        slpm: f64,
        sapm: f64,
        strike_acc: f64,
        strike_def: f64,
        td_avg15: f64,
        td_acc: f64,
        td_def: f64,
        sub_avg15: f64,
        kd_avg: f64,
        aft_minutes: f64,
    ) -> Result<Self, ValidationError> {
        Self::from_values(PerStat {
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
        })
    }

    /// Validate every value; the first violation in canonical order wins.
    pub fn from_values(values: PerStat<f64>) -> Result<Self, ValidationError> {
        for stat in Stat::ALL {
            stat.check(values.get(stat))?;
        }
        Ok(StatRecord { values })
    }

    /// For compile-time tables; the values must already satisfy the domain
    /// rules (covered by the tables' own tests).
    pub(crate) const fn from_values_unchecked(values: PerStat<f64>) -> Self {
        StatRecord { values }
    }

    /// Strict conversion: any missing statistic is an error.
    pub fn from_raw(raw: &RawStats) -> Result<Self, ValidationError> {
        let mut values = PerStat::splat(0.0);
        for stat in Stat::ALL {
            *values.get_mut(stat) = raw.get(stat).ok_or(ValidationError::Missing { stat })?;
        }
        Self::from_values(values)
    }

    /// Missing statistics are taken from `defaults`. Present values are still
    /// validated as given.
    pub fn from_raw_with_defaults(
        raw: &RawStats,
        defaults: &StatRecord,
    ) -> Result<Self, ValidationError> {
        let values = PerStat::from_fn(|stat| raw.get(stat).unwrap_or_else(|| defaults.get(stat)));
        Self::from_values(values)
    }

    /// Re-run validation on an existing record.
    pub fn check(&self) -> Result<(), ValidationError> {
        for stat in Stat::ALL {
            stat.check(self.values.get(stat))?;
        }
        Ok(())
    }

    pub fn get(&self, stat: Stat) -> f64 {
        self.values.get(stat)
    }

    pub fn values(&self) -> &PerStat<f64> {
        &self.values
    }

    pub fn to_raw(&self) -> RawStats {
        let mut raw = RawStats::default();
        for stat in Stat::ALL {
            raw.set(stat, Some(self.get(stat)));
        }
        raw
    }

    pub fn slpm(&self) -> f64 {
        self.values.slpm
    }
    pub fn sapm(&self) -> f64 {
        self.values.sapm
    }
    pub fn strike_acc(&self) -> f64 {
        self.values.strike_acc
    }
    pub fn strike_def(&self) -> f64 {
        self.values.strike_def
    }
    pub fn td_avg15(&self) -> f64 {
        self.values.td_avg15
    }
    pub fn td_acc(&self) -> f64 {
        self.values.td_acc
    }
    pub fn td_def(&self) -> f64 {
        self.values.td_def
    }
    pub fn sub_avg15(&self) -> f64 {
        self.values.sub_avg15
    }
    pub fn kd_avg(&self) -> f64 {
        self.values.kd_avg
    }
    pub fn aft_minutes(&self) -> f64 {
        self.values.aft_minutes
    }
}

impl TryFrom<RawStats> for StatRecord {
    type Error = ValidationError;

    fn try_from(raw: RawStats) -> Result<Self, Self::Error> {
        StatRecord::from_raw(&raw)
    }
}

impl From<StatRecord> for RawStats {
    fn from(record: StatRecord) -> Self {
        record.to_raw()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Khamzat Chimaev's UFC profile numbers.
    pub(crate) fn chimaev() -> StatRecord {
        StatRecord::new(5.36, 3.25, 0.59, 0.42, 4.31, 0.47, 1.00, 2.77, 0.62, 6.05).unwrap()
    }

    /// Dricus du Plessis' UFC profile numbers (13:45 average fight time).
    pub(crate) fn du_plessis() -> StatRecord {
        StatRecord::new(6.12, 4.90, 0.49, 0.54, 2.55, 0.50, 0.50, 0.73, 0.48, 13.75).unwrap()
    }

    #[test]
    fn accepts_profile_numbers() {
        let r = chimaev();
        assert_eq!(r.slpm(), 5.36);
        assert_eq!(r.td_def(), 1.00);
        assert_eq!(r.get(Stat::AftMinutes), 6.05);
    }

    #[test]
    fn rejects_fraction_above_one() {
        let err = StatRecord::new(4.0, 3.0, 1.5, 0.5, 1.0, 0.4, 0.6, 0.5, 0.3, 10.0).unwrap_err();
        assert_eq!(
            err,
            ValidationError::FractionOutOfRange {
                stat: Stat::StrikeAcc,
                value: 1.5
            }
        );
        assert_eq!(err.stat(), Stat::StrikeAcc);
    }

    #[test]
    fn rejects_zero_fight_time() {
        let err = StatRecord::new(4.0, 3.0, 0.5, 0.5, 1.0, 0.4, 0.6, 0.5, 0.3, 0.0).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::NonPositiveDuration {
                stat: Stat::AftMinutes,
                ..
            }
        ));
    }

    #[test]
    fn rejects_negative_rate() {
        let err = StatRecord::new(4.0, -0.1, 0.5, 0.5, 1.0, 0.4, 0.6, 0.5, 0.3, 9.0).unwrap_err();
        assert!(matches!(err, ValidationError::NegativeRate { stat: Stat::Sapm, .. }));
    }

    #[test]
    fn rejects_nan_and_infinity() {
        let err =
            StatRecord::new(f64::NAN, 3.0, 0.5, 0.5, 1.0, 0.4, 0.6, 0.5, 0.3, 9.0).unwrap_err();
        assert!(matches!(err, ValidationError::NotFinite { stat: Stat::Slpm, .. }));
        let err = StatRecord::new(4.0, 3.0, 0.5, 0.5, 1.0, 0.4, 0.6, 0.5, f64::INFINITY, 9.0)
            .unwrap_err();
        assert_eq!(err.stat(), Stat::KdAvg);
    }

    #[test]
    fn zero_is_a_real_value_not_missing() {
        let r = StatRecord::new(0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.5).unwrap();
        assert_eq!(r.kd_avg(), 0.0);
    }

    #[test]
    fn strict_raw_conversion_reports_missing_field() {
        let mut raw = chimaev().to_raw();
        raw.kd_avg = None;
        assert_eq!(
            StatRecord::from_raw(&raw),
            Err(ValidationError::Missing { stat: Stat::KdAvg })
        );
        assert_eq!(raw.missing(), vec![Stat::KdAvg]);
    }

    #[test]
    fn defaults_fill_only_missing_fields() {
        let mut raw = chimaev().to_raw();
        raw.kd_avg = None;
        raw.td_def = None;
        let r = StatRecord::from_raw_with_defaults(&raw, &du_plessis()).unwrap();
        assert_eq!(r.kd_avg(), 0.48);
        assert_eq!(r.td_def(), 0.50);
        assert_eq!(r.slpm(), 5.36);
    }

    #[test]
    fn defaults_do_not_hide_bad_present_values() {
        let mut raw = chimaev().to_raw();
        raw.strike_def = Some(42.0);
        let err = StatRecord::from_raw_with_defaults(&raw, &du_plessis()).unwrap_err();
        assert_eq!(err.stat(), Stat::StrikeDef);
    }

    #[test]
    fn json_goes_through_validation() {
        let ok = serde_json::json!({
            "name": "Khamzat Chimaev",
            "slpm": 5.36, "sapm": 3.25, "strike_acc": 0.59, "strike_def": 0.42,
            "td_avg15": 4.31, "td_acc": 0.47, "td_def": 1.0, "sub_avg15": 2.77,
            "kd_avg": 0.62, "aft_minutes": 6.05
        });
        let r: StatRecord = serde_json::from_value(ok).unwrap();
        assert_eq!(r, chimaev());

        let bad = serde_json::json!({
            "slpm": 5.36, "sapm": 3.25, "strike_acc": 59.0, "strike_def": 0.42,
            "td_avg15": 4.31, "td_acc": 0.47, "td_def": 1.0, "sub_avg15": 2.77,
            "kd_avg": 0.62, "aft_minutes": 6.05
        });
        assert!(serde_json::from_value::<StatRecord>(bad).is_err());

        let missing = serde_json::json!({ "slpm": 5.36, "aft_minutes": null });
        assert!(serde_json::from_value::<StatRecord>(missing).is_err());
    }

    #[test]
    fn stat_order_matches_index() {
        for (i, stat) in Stat::ALL.into_iter().enumerate() {
            assert_eq!(stat.index(), i);
        }
        assert_eq!(Stat::TdAvg15.to_string(), "td_avg15");
        assert_eq!(serde_json::to_string(&Stat::SubAvg15).unwrap(), "\"sub_avg15\"");
    }
}
