#![forbid(unsafe_code)]

//! Core domain model and analytics for Lift, a strength-training log analyzer.
//!
//! This crate provides:
//! - Domain types (sets, session entries, workouts)
//! - Set summaries
//! - Personal record detection
//! - RPE-driven progression suggestions with stall detection
//! - Weekly and per-muscle volume with training balance
//! - Configuration, default muscle catalog, and journal loading
//!
//! The analytics functions are pure: they take caller-owned history and
//! configuration by reference and return fresh values.

pub mod types;
pub mod error;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod summary;
pub mod records;
pub mod progression;
pub mod volume;
pub mod journal;
pub mod engine;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use catalog::{get_default_muscle_map, MuscleMap};
pub use config::Config;
pub use summary::{summarize_sets, SessionSummary};
pub use records::{
    calculate_prs_from_history, check_set_for_prs, detect_new_prs, e1rm_trend, estimate_e1rm,
    get_entry_pr_info, PrEvent, PrKind, PrRecord, PrSet,
};
pub use progression::{
    categorize_exercises, get_progression_suggestion, ExerciseCategories, ExerciseSuggestion,
    ProgressionStatus, ProgressionSuggestion,
};
pub use volume::{
    aggregate_volume_by_week, calculate_exercise_volume, calculate_training_balance,
    calculate_volume_by_muscle_group, get_balance_status, BalanceStatus, TrainingBalance,
    WeeklyVolume,
};
pub use journal::Journal;
pub use engine::{analyze_exercise, analyze_training, ExerciseReport, TrainingReport};
