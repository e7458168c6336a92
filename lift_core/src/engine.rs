//! Report assembly for callers.
//!
//! Combines the analytics components into the two views a front end needs:
//! - A per-exercise report: records, badges per session, e1RM trend, suggestion
//! - A training report: weekly volume, per-muscle volume, and balance

use crate::progression::get_progression_suggestion;
use crate::records::{
    calculate_prs_from_history, e1rm_trend, get_entry_pr_info, E1rmPoint, EntryPrInfo,
};
use crate::summary::summarize_sets;
use crate::volume::{
    aggregate_volume_by_week, calculate_training_balance, calculate_volume_by_muscle_group,
};
use crate::{
    BalanceStatus, Config, MuscleMap, PrSet, ProgressionSuggestion, SessionEntry, SessionSummary,
    TrainingBalance, WeeklyVolume, Workout,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One session of an exercise with its record badges
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionReport {
    pub date: NaiveDate,
    pub summary: SessionSummary,
    pub prs: EntryPrInfo,
}

/// Everything known about one exercise
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExerciseReport {
    pub exercise_name: String,
    pub records: PrSet,
    /// Newest first, mirroring the history
    pub sessions: Vec<SessionReport>,
    /// Oldest first
    pub trend: Vec<E1rmPoint>,
    pub suggestion: ProgressionSuggestion,
}

/// Volume and balance across all workouts
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrainingReport {
    pub weekly: Vec<WeeklyVolume>,
    pub by_muscle: BTreeMap<String, f64>,
    pub balance: TrainingBalance,
    pub push_pull_status: Option<BalanceStatus>,
    pub upper_lower_status: Option<BalanceStatus>,
}

/// Build the report for one exercise from its newest-first history
pub fn analyze_exercise(
    exercise_name: &str,
    history: &[SessionEntry],
    target_reps: Option<&str>,
    current_weight: Option<f64>,
    config: &Config,
) -> ExerciseReport {
    let records = calculate_prs_from_history(history, config);

    let sessions = history
        .iter()
        .map(|entry| SessionReport {
            date: entry.date,
            summary: summarize_sets(&entry.sets),
            prs: get_entry_pr_info(entry, &records),
        })
        .collect();

    let suggestion = get_progression_suggestion(history, target_reps, current_weight, config);

    tracing::info!(
        "Analyzed {}: {} sessions, status {}",
        exercise_name,
        history.len(),
        suggestion.status
    );

    ExerciseReport {
        exercise_name: exercise_name.to_string(),
        records,
        sessions,
        trend: e1rm_trend(history),
        suggestion,
    }
}

/// Build the volume and balance report
pub fn analyze_training(
    workouts: &[Workout],
    muscle_map: &MuscleMap,
    weeks_to_include: usize,
    config: &Config,
) -> TrainingReport {
    let by_muscle = calculate_volume_by_muscle_group(workouts, muscle_map);
    let balance = calculate_training_balance(&by_muscle, &config.taxonomy);

    TrainingReport {
        weekly: aggregate_volume_by_week(workouts, muscle_map, weeks_to_include),
        push_pull_status: balance.push_pull_status(),
        upper_lower_status: balance.upper_lower_status(),
        by_muscle,
        balance,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PrKind, ProgressionStatus, SetRecord, WorkoutExercise};

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_analyze_exercise() {
        crate::logging::init_test();

        let history = vec![
            SessionEntry::new(
                ymd(2025, 1, 10),
                vec![
                    SetRecord::new(105.0, 5).with_rpe(8.0),
                    SetRecord::new(105.0, 5).with_rpe(8.0),
                ],
            ),
            SessionEntry::new(
                ymd(2025, 1, 3),
                vec![SetRecord::new(100.0, 5).with_rpe(7.0)],
            ),
        ];

        let report = analyze_exercise("Squat", &history, Some("3-5"), None, &Config::default());

        assert_eq!(report.exercise_name, "Squat");
        assert_eq!(report.sessions.len(), 2);
        assert!(report.sessions[0].prs.pr_types.contains(&PrKind::E1rm));
        assert!(!report.sessions[1].prs.has_pr);
        assert_eq!(report.sessions[0].summary.total_volume, 1050.0);
        assert_eq!(report.trend.first().unwrap().date, ymd(2025, 1, 3));
        assert_eq!(report.suggestion.status, ProgressionStatus::Maintain);
    }

    #[test]
    fn test_analyze_training() {
        let workouts = vec![
            Workout {
                date: ymd(2025, 1, 8),
                exercises: vec![WorkoutExercise::new(
                    "Barbell Row",
                    vec![SetRecord::new(60.0, 10)],
                )],
            },
            Workout {
                date: ymd(2025, 1, 6),
                exercises: vec![WorkoutExercise::new(
                    "Dumbbell Fly",
                    vec![SetRecord::new(30.0, 10)],
                )],
            },
        ];

        let muscle_map = crate::get_default_muscle_map();
        let report = analyze_training(&workouts, muscle_map, 8, &Config::default());

        assert_eq!(report.weekly.len(), 1);
        assert_eq!(report.weekly[0].total, 900.0);
        // Row splits 600 across Back and Biceps; Fly puts 300 on Chest
        assert_eq!(report.balance.push_volume, 300.0);
        assert_eq!(report.balance.pull_volume, 600.0);
        assert_eq!(report.balance.push_pct, 33);
        assert_eq!(report.push_pull_status, Some(BalanceStatus::Slight));
        assert_eq!(report.upper_lower_status, Some(BalanceStatus::Imbalanced));
    }
}
