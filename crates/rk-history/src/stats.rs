//! Aggregate statistics over roll records.
//!
//! Everything here is pure: feed it records in any order and it groups them
//! by dice label. An empty slice produces zeros and empty collections.

use std::collections::BTreeMap;

use rk_engine::Die;
use serde::{Deserialize, Serialize};

use crate::record::RollRecord;

/// Summary of one dice type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiceTypeStatistic {
    /// Dice label.
    pub dice_type: String,
    /// Rolls of this type.
    pub count: usize,
    /// Mean raw result.
    pub average: f64,
    /// Lowest raw result.
    pub min: i64,
    /// Highest raw result.
    pub max: i64,
    /// Share of all rolls, 0-100.
    pub percentage: f64,
}

/// How often a raw result came up for one dice type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultFrequency {
    /// Raw result.
    pub result: i64,
    /// Occurrences.
    pub frequency: usize,
    /// Share of this dice type's rolls, 0-100.
    pub percentage: f64,
}

/// The result histogram for one dice type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollDistributionData {
    /// Dice label.
    pub dice_type: String,
    /// Frequencies ordered by result.
    pub results: Vec<ResultFrequency>,
}

/// Runs of high and low rolls, oldest to newest.
///
/// A roll "wins" when its raw result is above half the die's sides. Rolls
/// whose label is not a single die (e.g. `2d6`) are skipped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakData {
    /// Length of the win run ending at the latest roll.
    pub current_win_streak: usize,
    /// Length of the loss run ending at the latest roll.
    pub current_loss_streak: usize,
    /// Longest win run seen.
    pub longest_win_streak: usize,
    /// Longest loss run seen.
    pub longest_loss_streak: usize,
}

impl StreakData {
    fn push(&mut self, win: bool) {
        if win {
            self.current_win_streak += 1;
            self.current_loss_streak = 0;
            self.longest_win_streak = self.longest_win_streak.max(self.current_win_streak);
        } else {
            self.current_loss_streak += 1;
            self.current_win_streak = 0;
            self.longest_loss_streak = self.longest_loss_streak.max(self.current_loss_streak);
        }
    }
}

/// Statistics over a set of roll records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RollStatistics {
    /// Number of rolls.
    pub total_rolls: usize,
    /// Per-type summaries, most-rolled first.
    pub dice_type_stats: Vec<DiceTypeStatistic>,
    /// Per-type histograms, in label order.
    pub distribution_data: Vec<RollDistributionData>,
    /// Mean raw result per type.
    pub averages_by_type: BTreeMap<String, f64>,
    /// High/low streaks.
    pub streaks: StreakData,
}

impl RollStatistics {
    /// Aggregate a set of records.
    pub fn from_records(records: &[RollRecord]) -> Self {
        if records.is_empty() {
            return Self::default();
        }
        let total_rolls = records.len();

        let mut by_type: BTreeMap<&str, Vec<i64>> = BTreeMap::new();
        for record in records {
            by_type
                .entry(record.dice_type.as_str())
                .or_default()
                .push(record.result);
        }

        let mut dice_type_stats = Vec::with_capacity(by_type.len());
        let mut distribution_data = Vec::with_capacity(by_type.len());
        let mut averages_by_type = BTreeMap::new();

        for (dice_type, results) in &by_type {
            let count = results.len();
            let sum: i64 = results.iter().sum();
            let average = sum as f64 / count as f64;
            dice_type_stats.push(DiceTypeStatistic {
                dice_type: (*dice_type).to_string(),
                count,
                average,
                min: results.iter().copied().min().unwrap_or(0),
                max: results.iter().copied().max().unwrap_or(0),
                percentage: percent(count, total_rolls),
            });
            averages_by_type.insert((*dice_type).to_string(), average);

            let mut freq: BTreeMap<i64, usize> = BTreeMap::new();
            for &r in results {
                *freq.entry(r).or_default() += 1;
            }
            distribution_data.push(RollDistributionData {
                dice_type: (*dice_type).to_string(),
                results: freq
                    .into_iter()
                    .map(|(result, frequency)| ResultFrequency {
                        result,
                        frequency,
                        percentage: percent(frequency, count),
                    })
                    .collect(),
            });
        }

        // Stable sort keeps label order among equal counts.
        dice_type_stats.sort_by(|a, b| b.count.cmp(&a.count));

        Self {
            total_rolls,
            dice_type_stats,
            distribution_data,
            averages_by_type,
            streaks: streaks(records),
        }
    }

    /// The summary for one dice type, if it was rolled.
    pub fn for_type(&self, dice_type: &str) -> Option<&DiceTypeStatistic> {
        self.dice_type_stats
            .iter()
            .find(|s| s.dice_type == dice_type)
    }

    /// The histogram for one dice type, if it was rolled.
    pub fn distribution_for(&self, dice_type: &str) -> Option<&RollDistributionData> {
        self.distribution_data
            .iter()
            .find(|d| d.dice_type == dice_type)
    }
}

fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 * 100.0 / whole as f64
    }
}

fn streaks(records: &[RollRecord]) -> StreakData {
    let mut ordered: Vec<&RollRecord> = records.iter().collect();
    ordered.sort_by_key(|r| (r.timestamp, r.id));

    let mut data = StreakData::default();
    for record in ordered {
        let Some(die) = Die::from_str_tag(&record.dice_type) else {
            continue;
        };
        data.push(record.result * 2 > i64::from(die.sides()));
    }
    data
}
