//! Default muscle taxonomy and exercise catalog.
//!
//! This module provides the built-in muscle groups, their push/pull and
//! upper/lower partitions, and a mapping from common exercises to the
//! muscles they train.

use crate::Config;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Bucket for exercises without a muscle mapping
pub const UNCATEGORIZED: &str = "Uncategorized";

pub const MUSCLE_GROUPS: &[&str] = &[
    "Chest",
    "Back",
    "Shoulders",
    "Biceps",
    "Triceps",
    "Forearms",
    "Quads",
    "Hamstrings",
    "Glutes",
    "Calves",
    "Core",
];

pub const PUSH_MUSCLES: &[&str] = &["Chest", "Shoulders", "Triceps"];
pub const PULL_MUSCLES: &[&str] = &["Back", "Biceps", "Forearms"];
pub const UPPER_MUSCLES: &[&str] = &["Chest", "Back", "Shoulders", "Biceps", "Triceps", "Forearms"];
pub const LOWER_MUSCLES: &[&str] = &["Quads", "Hamstrings", "Glutes", "Calves"];

const DEFAULT_EXERCISES: &[(&str, &[&str])] = &[
    // Push
    ("Bench Press", &["Chest", "Triceps", "Shoulders"]),
    ("Incline Bench Press", &["Chest", "Shoulders", "Triceps"]),
    ("Dumbbell Bench Press", &["Chest", "Triceps", "Shoulders"]),
    ("Dumbbell Fly", &["Chest"]),
    ("Push-up", &["Chest", "Triceps"]),
    ("Dip", &["Chest", "Triceps"]),
    ("Overhead Press", &["Shoulders", "Triceps"]),
    ("Dumbbell Shoulder Press", &["Shoulders", "Triceps"]),
    ("Lateral Raise", &["Shoulders"]),
    ("Triceps Pushdown", &["Triceps"]),
    ("Skull Crusher", &["Triceps"]),
    // Pull
    ("Deadlift", &["Back", "Hamstrings", "Glutes"]),
    ("Barbell Row", &["Back", "Biceps"]),
    ("Dumbbell Row", &["Back", "Biceps"]),
    ("Pull-up", &["Back", "Biceps"]),
    ("Chin-up", &["Back", "Biceps"]),
    ("Lat Pulldown", &["Back", "Biceps"]),
    ("Seated Cable Row", &["Back", "Biceps"]),
    ("Face Pull", &["Shoulders", "Back"]),
    ("Barbell Curl", &["Biceps"]),
    ("Dumbbell Curl", &["Biceps"]),
    ("Hammer Curl", &["Biceps", "Forearms"]),
    // Legs
    ("Squat", &["Quads", "Glutes"]),
    ("Front Squat", &["Quads", "Glutes"]),
    ("Leg Press", &["Quads", "Glutes"]),
    ("Lunge", &["Quads", "Glutes"]),
    ("Bulgarian Split Squat", &["Quads", "Glutes"]),
    ("Leg Extension", &["Quads"]),
    ("Romanian Deadlift", &["Hamstrings", "Glutes"]),
    ("Leg Curl", &["Hamstrings"]),
    ("Hip Thrust", &["Glutes", "Hamstrings"]),
    ("Calf Raise", &["Calves"]),
    // Core
    ("Plank", &["Core"]),
    ("Hanging Leg Raise", &["Core"]),
    ("Cable Crunch", &["Core"]),
];

/// Cached default exercise map - built once and reused
static DEFAULT_MUSCLE_MAP: Lazy<MuscleMap> = Lazy::new(build_default_muscle_map);

/// Exercise name → trained muscle groups.
///
/// Lookups ignore case; the original spelling is kept for display.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MuscleMap {
    exercises: HashMap<String, Vec<String>>,
}

impl MuscleMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map an exercise to its muscles, replacing any previous mapping
    pub fn insert(&mut self, exercise: impl AsRef<str>, muscles: Vec<String>) {
        self.exercises
            .insert(exercise.as_ref().to_lowercase(), muscles);
    }

    /// Muscles for an exercise; empty when unmapped
    pub fn muscles_for(&self, exercise: &str) -> &[String] {
        self.exercises
            .get(&exercise.to_lowercase())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.exercises.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exercises.is_empty()
    }

    /// Built-in catalog with the configured overrides applied on top
    pub fn from_config(config: &Config) -> Self {
        let mut map = get_default_muscle_map().clone();
        for (exercise, muscles) in &config.taxonomy.exercises {
            map.insert(exercise, muscles.clone());
        }
        map
    }

    /// Validate the map against a set of known muscle groups
    ///
    /// Returns a list of problems (empty if valid).
    pub fn validate(&self, known_muscles: &[String]) -> Vec<String> {
        let mut errors = Vec::new();

        let mut names: Vec<_> = self.exercises.keys().collect();
        names.sort();

        for name in names {
            for muscle in &self.exercises[name] {
                if !known_muscles.iter().any(|m| m.eq_ignore_ascii_case(muscle)) {
                    errors.push(format!(
                        "Exercise '{}' references unknown muscle group '{}'",
                        name, muscle
                    ));
                }
            }
        }

        errors
    }
}

/// Get a reference to the cached default exercise map
pub fn get_default_muscle_map() -> &'static MuscleMap {
    &DEFAULT_MUSCLE_MAP
}

fn build_default_muscle_map() -> MuscleMap {
    let mut map = MuscleMap::new();
    for (exercise, muscles) in DEFAULT_EXERCISES {
        map.insert(exercise, muscles.iter().map(|m| m.to_string()).collect());
    }
    map
}

pub(crate) fn to_owned_list(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}
