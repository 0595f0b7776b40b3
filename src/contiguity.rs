//! # Contiguity Bonus
//!
//! Rewards days covered by few distinct people. For each calendar day of a solution,
//! `diff = roster size - distinct people working that day` indexes a bonus table; the
//! bonuses are summed over all days.
//!
//! The reference table `[0, 1, 5, 20, 50]` assumes a five-person roster. A roster larger
//! than the table domain is a configuration error, reported by [`ContiguityBonus::validate_roster`]
//! and, should it slip through, by the per-day lookup.
//!
//! The total is also guarded by a saturation trip-wire: when it equals the largest table
//! entry times the configured day count, evaluation fails instead of returning the score.

use std::collections::HashSet;

use tracing::warn;

use crate::{
    error::{Result, RotaError},
    evolution::Score,
    solution::Solution,
};

/// Bonus for diff = 0, 1, 2, 3, 4.
pub const DEFAULT_BONUS_TABLE: [Score; 5] = [0, 1, 5, 20, 50];

/// Number of fully saturated days that trips the sanity check by default.
pub const DEFAULT_SATURATION_DAYS: usize = 5;

/// Configuration of the per-day contiguity reward.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "ContiguityBonusConfig"))]
pub struct ContiguityBonus {
    table: Vec<Score>,
    saturation_days: Option<usize>,
}

/// Unvalidated wire form of [`ContiguityBonus`].
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct ContiguityBonusConfig {
    table: Vec<Score>,
    saturation_days: Option<usize>,
}

#[cfg(feature = "serde")]
impl TryFrom<ContiguityBonusConfig> for ContiguityBonus {
    type Error = RotaError;

    fn try_from(config: ContiguityBonusConfig) -> Result<Self> {
        Ok(Self::with_table(config.table)?.with_saturation_days(config.saturation_days))
    }
}

impl ContiguityBonus {
    /// Builds a bonus from a table indexed by diff.
    ///
    /// # Errors
    ///
    /// Returns `Configuration` if the table is empty or decreases as the diff grows.
    pub fn with_table(table: Vec<Score>) -> Result<Self> {
        if table.is_empty() {
            return Err(RotaError::Configuration(
                "Contiguity bonus table cannot be empty".to_string(),
            ));
        }
        if table.windows(2).any(|pair| pair[0] > pair[1]) {
            return Err(RotaError::Configuration(format!(
                "Contiguity bonus table must not decrease as the diff grows: {:?}",
                table
            )));
        }
        Ok(Self {
            table,
            saturation_days: Some(DEFAULT_SATURATION_DAYS),
        })
    }

    /// Sets the day count of the saturation trip-wire. `None` disables it.
    pub fn with_saturation_days(mut self, days: Option<usize>) -> Self {
        self.saturation_days = days;
        self
    }

    pub fn table(&self) -> &[Score] {
        &self.table
    }

    pub fn saturation_days(&self) -> Option<usize> {
        self.saturation_days
    }

    /// Largest diff the table has an entry for.
    pub fn max_diff(&self) -> usize {
        self.table.len().saturating_sub(1)
    }

    /// Checks that every diff a roster of `roster_len` people can produce has an entry.
    pub fn validate_roster(&self, roster_len: usize) -> Result<()> {
        if roster_len > self.table.len() {
            return Err(RotaError::Configuration(format!(
                "Contiguity bonus table covers diffs 0..={} but a roster of {} can reach {}",
                self.max_diff(),
                roster_len,
                roster_len.saturating_sub(1)
            )));
        }
        Ok(())
    }

    /// Bonus for a single day.
    pub fn bonus_for_diff(&self, diff: usize) -> Result<Score> {
        self.table
            .get(diff)
            .copied()
            .ok_or(RotaError::ContiguityOutOfDomain {
                diff,
                max: self.max_diff(),
            })
    }

    /// Total bonus of `solution` over all of its days.
    pub fn score(&self, solution: &Solution<'_>) -> Result<Score> {
        let roster_len = solution.roster().len();
        let mut total = 0;
        for group in solution.day_groups() {
            let distinct: HashSet<_> = group
                .hours
                .iter()
                .filter_map(|hour| solution.person_id_for_hour(hour))
                .collect();
            total += self.bonus_for_diff(day_diff(roster_len, distinct.len())?)?;
        }

        if let Some(days) = self.saturation_days {
            if self.saturation_ceiling(days) == Some(total) {
                warn!(total, days, "contiguity bonus saturated");
                return Err(RotaError::BonusSaturated { score: total, days });
            }
        }

        Ok(total)
    }

    /// Total bonus of `days` fully saturated days. `None` when it is zero or not representable,
    /// in which case the trip-wire cannot fire.
    fn saturation_ceiling(&self, days: usize) -> Option<Score> {
        let top = self.table.last().copied()?;
        let days = Score::try_from(days).ok()?;
        top.checked_mul(days).filter(|&ceiling| ceiling > 0)
    }
}

fn day_diff(roster_len: usize, distinct: usize) -> Result<usize> {
    roster_len.checked_sub(distinct).ok_or_else(|| {
        RotaError::Other(format!(
            "{} distinct people on one day but the roster has {}",
            distinct, roster_len
        ))
    })
}

impl Default for ContiguityBonus {
    fn default() -> Self {
        Self {
            table: DEFAULT_BONUS_TABLE.to_vec(),
            saturation_days: Some(DEFAULT_SATURATION_DAYS),
        }
    }
}
