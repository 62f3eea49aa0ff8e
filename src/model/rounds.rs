//! Round-by-round win probability.
//!
//! Early rounds lean on grappling: fighters are fresh and takedown/submission
//! threat is at its highest. From round three onwards pacing, volume and
//! striking defense matter more. A fatigue factor shrinks those adjustments
//! for fighters whose fights usually end early.

use serde::{Deserialize, Serialize};

use super::error::ConfigError;
use super::matchup::MatchupModel;
use super::stats::{PerStat, Stat, StatRecord};
use super::ModelError;

/// Championship fights are scheduled for five rounds.
pub const MAX_ROUNDS: u32 = 5;

const FATIGUE_FLOOR: f64 = 0.5;
const FATIGUE_PER_ROUND: f64 = 0.15;
/// Scheduled minutes of a three-round fight.
const ENDURANCE_MINUTES: f64 = 15.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoundProbability {
    pub round: u32,
    pub p_a: f64,
    pub p_b: f64,
}

/// Remaining output fraction for `fighter` in `round`, never below 0.5.
pub fn fatigue_factor(fighter: &StatRecord, round: u32) -> f64 {
    let endurance = fighter.aft_minutes() / ENDURANCE_MINUTES;
    let decay = 1.0 - f64::from(round.saturating_sub(1)) * FATIGUE_PER_ROUND / endurance;
    decay.max(FATIGUE_FLOOR)
}

/// Weight multipliers for one round. `fatigue` is shared by both corners.
pub fn round_multipliers(round: u32, fatigue: f64) -> PerStat<f64> {
    let mut m = PerStat::splat(1.0);
    if round <= 2 {
        for stat in [Stat::TdAvg15, Stat::TdAcc, Stat::SubAvg15] {
            *m.get_mut(stat) = 1.3 * fatigue;
        }
    } else {
        m.aft_minutes = 1.5 * fatigue;
        m.slpm = 1.3 * fatigue;
        m.strike_def = 1.2 * fatigue;
    }
    m
}

pub fn round_probabilities(
    model: &MatchupModel,
    a: &StatRecord,
    b: &StatRecord,
    total_rounds: u32,
) -> Result<Vec<RoundProbability>, ModelError> {
    if !(1..=MAX_ROUNDS).contains(&total_rounds) {
        return Err(ConfigError::InvalidRounds {
            got: total_rounds,
            max: MAX_ROUNDS,
        }
        .into());
    }

    let mut out = Vec::with_capacity(total_rounds as usize);
    for round in 1..=total_rounds {
        // Averaging keeps the curve symmetric under swapping a and b
        let fatigue = 0.5 * (fatigue_factor(a, round) + fatigue_factor(b, round));
        let adjusted = model.with_weight_multipliers(&round_multipliers(round, fatigue))?;
        let p = adjusted.predict(a, b)?;
        out.push(RoundProbability {
            round,
            p_a: p.p_a,
            p_b: p.p_b,
        });
    }
    Ok(out)
}
