//! Progress domain model.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::FULL_PROGRESS_PERCENTAGE;

/// Completion state derived from a set of milestones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    pub completed_count: usize,
    pub total_count: usize,
    /// Rounded to the nearest integer, halves rounded up.
    pub percentage: u8,
    /// True only when there is at least one milestone and all are completed.
    pub all_complete: bool,
}

impl Progress {
    /// Builds progress from raw counts.
    ///
    /// `completed_count` is clamped to `total_count`.
    pub fn from_counts(completed_count: usize, total_count: usize) -> Self {
        let completed_count = completed_count.min(total_count);
        let percentage = if total_count == 0 {
            0
        } else {
            // floor(100 * c / t + 1/2) computed exactly in integers
            let c = completed_count as u128;
            let t = total_count as u128;
            let rounded = (200 * c + t) / (2 * t);
            rounded.min(u128::from(FULL_PROGRESS_PERCENTAGE)) as u8
        };
        Self {
            completed_count,
            total_count,
            percentage,
            all_complete: total_count > 0 && completed_count == total_count,
        }
    }

    /// Exact completed/total ratio, zero for an empty set.
    pub fn ratio(&self) -> Decimal {
        if self.total_count == 0 {
            return Decimal::ZERO;
        }
        Decimal::from(self.completed_count as u64) / Decimal::from(self.total_count as u64)
    }

    /// Unrounded percentage, used where display rounding must not accumulate.
    pub fn exact_percentage(&self) -> Decimal {
        self.ratio() * Decimal::ONE_HUNDRED
    }

    pub fn remaining_count(&self) -> usize {
        self.total_count - self.completed_count
    }
}
