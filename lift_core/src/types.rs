//! Core domain types for the Lift analytics engine.
//!
//! This module defines the inputs the engine consumes:
//! - Individual sets (weight, reps, RPE)
//! - Per-exercise session entries and histories
//! - Whole workouts, used for PR detection and volume aggregation
//!
//! Derived results live next to the component that computes them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ============================================================================
// Set Types
// ============================================================================

/// A single performed set.
///
/// Fields are optional because upstream logs are messy. Accessors coerce
/// missing or invalid values instead of failing.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SetRecord {
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub reps: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpe: Option<f64>,
}

impl SetRecord {
    pub fn new(weight: f64, reps: i64) -> Self {
        Self {
            weight: Some(weight),
            reps: Some(reps),
            rpe: None,
        }
    }

    pub fn with_rpe(mut self, rpe: f64) -> Self {
        self.rpe = Some(rpe);
        self
    }

    /// Weight with missing, negative, or non-finite values coerced to 0
    pub fn effective_weight(&self) -> f64 {
        match self.weight {
            Some(w) if w.is_finite() && w > 0.0 => w,
            _ => 0.0,
        }
    }

    /// Reps with missing or non-positive values coerced to 0
    pub fn effective_reps(&self) -> u32 {
        match self.reps {
            Some(r) if r > 0 => u32::try_from(r).unwrap_or(u32::MAX),
            _ => 0,
        }
    }

    /// RPE if it falls inside the 1-10 scale (fractional values allowed)
    pub fn valid_rpe(&self) -> Option<f64> {
        self.rpe
            .filter(|r| r.is_finite() && *r > 0.0 && *r <= 10.0)
    }

    /// Set volume (`weight × reps`)
    pub fn volume(&self) -> f64 {
        self.effective_weight() * f64::from(self.effective_reps())
    }

    /// True when the set carries both a positive weight and positive reps
    pub fn is_loaded(&self) -> bool {
        self.effective_weight() > 0.0 && self.effective_reps() > 0
    }
}

// ============================================================================
// Session and History Types
// ============================================================================

/// One exercise performed on one date
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionEntry {
    pub date: NaiveDate,
    pub sets: Vec<SetRecord>,
}

impl SessionEntry {
    pub fn new(date: NaiveDate, sets: Vec<SetRecord>) -> Self {
        Self { date, sets }
    }
}

/// All sessions of a single exercise.
///
/// Callers must order it newest-first: index 0 is the most recent session.
/// Progression logic reads "last session" and "recent sessions" from the front.
pub type ExerciseHistory = Vec<SessionEntry>;

// ============================================================================
// Workout Types
// ============================================================================

/// An exercise within a workout, identified by name
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorkoutExercise {
    pub name: String,
    pub sets: Vec<SetRecord>,
}

impl WorkoutExercise {
    pub fn new(name: impl Into<String>, sets: Vec<SetRecord>) -> Self {
        Self {
            name: name.into(),
            sets,
        }
    }
}

/// Every exercise performed on one date
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Workout {
    pub date: NaiveDate,
    pub exercises: Vec<WorkoutExercise>,
}
