//! Training volume aggregation.
//!
//! Volume (`weight × reps`) is bucketed by ISO week and by muscle group. An
//! exercise's volume is split evenly across the muscles it maps to; unmapped
//! exercises land in [`UNCATEGORIZED`].

use crate::catalog::{MuscleMap, UNCATEGORIZED};
use crate::config::TaxonomyConfig;
use crate::{SetRecord, Workout};
use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Volume for one ISO week
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeeklyVolume {
    /// `YYYY-Www`, sorts chronologically
    pub week_key: String,
    /// Monday of the week, e.g. `Jan 6`
    pub label: String,
    pub total: f64,
    pub by_muscle: BTreeMap<String, f64>,
}

/// Push/pull and upper/lower split of training volume
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingBalance {
    pub push_pct: u32,
    pub pull_pct: u32,
    pub upper_pct: u32,
    pub lower_pct: u32,
    pub push_volume: f64,
    pub pull_volume: f64,
    pub upper_volume: f64,
    pub lower_volume: f64,
}

impl TrainingBalance {
    /// `None` when neither push nor pull volume exists
    pub fn push_pull_status(&self) -> Option<BalanceStatus> {
        (self.push_volume + self.pull_volume > 0.0).then(|| get_balance_status(self.push_pct))
    }

    /// `None` when neither upper nor lower volume exists
    pub fn upper_lower_status(&self) -> Option<BalanceStatus> {
        (self.upper_volume + self.lower_volume > 0.0).then(|| get_balance_status(self.upper_pct))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BalanceStatus {
    Balanced,
    Slight,
    Imbalanced,
}

impl std::fmt::Display for BalanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Balanced => write!(f, "balanced"),
            Self::Slight => write!(f, "slight imbalance"),
            Self::Imbalanced => write!(f, "imbalanced"),
        }
    }
}

/// Total volume of a set list, with invalid fields counted as 0
pub fn calculate_exercise_volume(sets: &[SetRecord]) -> f64 {
    sets.iter().map(SetRecord::volume).sum()
}

/// ISO-8601 week key, e.g. `2025-W01`
pub fn week_key(date: NaiveDate) -> String {
    let week = date.iso_week();
    format!("{}-W{:02}", week.year(), week.week())
}

fn week_label(date: NaiveDate) -> String {
    let offset = u64::from(date.weekday().num_days_from_monday());
    let monday = date.checked_sub_days(Days::new(offset)).unwrap_or(date);
    monday.format("%b %-d").to_string()
}

fn add_split_volume(
    totals: &mut BTreeMap<String, f64>,
    exercise: &str,
    volume: f64,
    muscle_map: &MuscleMap,
) {
    let muscles = muscle_map.muscles_for(exercise);
    if muscles.is_empty() {
        *totals.entry(UNCATEGORIZED.to_string()).or_default() += volume;
        return;
    }

    let share = volume / muscles.len() as f64;
    for muscle in muscles {
        *totals.entry(muscle.clone()).or_default() += share;
    }
}

/// Weekly volume by muscle group for the most recent `weeks_to_include` weeks
///
/// Weeks come back oldest first. Weeks without workouts are not filled in.
pub fn aggregate_volume_by_week(
    workouts: &[Workout],
    muscle_map: &MuscleMap,
    weeks_to_include: usize,
) -> Vec<WeeklyVolume> {
    let mut weeks: BTreeMap<String, WeeklyVolume> = BTreeMap::new();

    for workout in workouts {
        let key = week_key(workout.date);
        let week = weeks.entry(key.clone()).or_insert_with(|| WeeklyVolume {
            week_key: key,
            label: week_label(workout.date),
            total: 0.0,
            by_muscle: BTreeMap::new(),
        });

        for exercise in &workout.exercises {
            let volume = calculate_exercise_volume(&exercise.sets);
            week.total += volume;
            add_split_volume(&mut week.by_muscle, &exercise.name, volume, muscle_map);
        }
    }

    let skip = weeks.len().saturating_sub(weeks_to_include);
    tracing::debug!(
        "Aggregated {} workouts into {} weeks, keeping {}",
        workouts.len(),
        weeks.len(),
        weeks.len() - skip
    );

    weeks.into_values().skip(skip).collect()
}

/// Total volume per muscle group across all workouts
pub fn calculate_volume_by_muscle_group(
    workouts: &[Workout],
    muscle_map: &MuscleMap,
) -> BTreeMap<String, f64> {
    let mut totals = BTreeMap::new();
    for exercise in workouts.iter().flat_map(|w| &w.exercises) {
        let volume = calculate_exercise_volume(&exercise.sets);
        add_split_volume(&mut totals, &exercise.name, volume, muscle_map);
    }
    totals
}

/// Rounded percentage split that always sums to 100, or 0/0 with no volume
fn split_percent(side: f64, complement: f64) -> (u32, u32) {
    let total = side + complement;
    if total <= 0.0 {
        return (0, 0);
    }
    let pct = ((side / total) * 100.0).round().clamp(0.0, 100.0) as u32;
    (pct, 100 - pct)
}

/// Push/pull and upper/lower balance from per-muscle volume
pub fn calculate_training_balance(
    volume_by_muscle: &BTreeMap<String, f64>,
    taxonomy: &TaxonomyConfig,
) -> TrainingBalance {
    let mut balance = TrainingBalance::default();

    for (muscle, volume) in volume_by_muscle {
        if taxonomy.is_push(muscle) {
            balance.push_volume += volume;
        }
        if taxonomy.is_pull(muscle) {
            balance.pull_volume += volume;
        }
        if taxonomy.is_upper(muscle) {
            balance.upper_volume += volume;
        }
        if taxonomy.is_lower(muscle) {
            balance.lower_volume += volume;
        }
    }

    (balance.push_pct, balance.pull_pct) = split_percent(balance.push_volume, balance.pull_volume);
    (balance.upper_pct, balance.lower_pct) =
        split_percent(balance.upper_volume, balance.lower_volume);

    balance
}

/// Classify one side of a ratio: 40-60 balanced, 30-70 slight, else imbalanced
pub fn get_balance_status(pct: u32) -> BalanceStatus {
    match pct {
        40..=60 => BalanceStatus::Balanced,
        30..=70 => BalanceStatus::Slight,
        _ => BalanceStatus::Imbalanced,
    }
}
