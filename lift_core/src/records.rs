//! Personal record detection.
//!
//! Records are derived on demand from an exercise history:
//! - Best estimated one-rep max (Epley)
//! - Heaviest weight for each tracked rep count
//! - Largest single-set volume
//!
//! "Best so far" comparisons are strict, so on a tie the set met first in
//! iteration order keeps the record. Results therefore depend on history
//! ordering.

use crate::summary::{approx_eq, max_value, round_to_tenth};
use crate::{Config, ExerciseHistory, SessionEntry, SetRecord, WorkoutExercise};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// A single best achievement
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PrRecord {
    pub value: f64,
    pub date: NaiveDate,
    pub weight: f64,
    pub reps: u32,
}

/// Every record for one exercise
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PrSet {
    pub e1rm: Option<PrRecord>,
    /// Tracked rep count → heaviest weight lifted for exactly that many reps
    pub rep_maxes: BTreeMap<u32, PrRecord>,
    pub volume_pr: Option<PrRecord>,
    pub has_data: bool,
}

/// Record category
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PrKind {
    /// First logged performance of an exercise
    First,
    E1rm,
    RepMax { reps: u32 },
    Volume,
}

impl fmt::Display for PrKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrKind::First => write!(f, "first"),
            PrKind::E1rm => write!(f, "e1rm"),
            PrKind::RepMax { reps } => write!(f, "{}rm", reps),
            PrKind::Volume => write!(f, "volume"),
        }
    }
}

/// A record set by a candidate workout
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PrEvent {
    pub exercise_name: String,
    pub pr_type: PrKind,
    pub value: f64,
    pub previous_value: Option<f64>,
    pub weight: f64,
    pub reps: u32,
}

/// Classification of one set against existing records
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetPrCheck {
    pub is_e1rm_pr: bool,
    pub is_rep_max_pr: bool,
    pub is_volume_pr: bool,
    /// Rep count of the rep-max record this set beats
    pub rep_max_type: Option<u32>,
}

impl SetPrCheck {
    pub fn any(&self) -> bool {
        self.is_e1rm_pr || self.is_rep_max_pr || self.is_volume_pr
    }
}

/// Record badges for a single history entry
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EntryPrInfo {
    pub has_pr: bool,
    pub pr_types: Vec<PrKind>,
}

/// Best e1RM of one session, for strength-over-time charts
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct E1rmPoint {
    pub date: NaiveDate,
    pub e1rm: f64,
    pub weight: f64,
    pub reps: u32,
}

/// Estimated one-rep max using the Epley formula
///
/// A single is its own max. Otherwise `weight × (1 + reps/30)` rounded to one
/// decimal. Non-positive input yields 0.
pub fn estimate_e1rm(weight: f64, reps: u32) -> f64 {
    if weight <= 0.0 || reps == 0 {
        return 0.0;
    }
    if reps == 1 {
        return weight;
    }
    round_to_tenth(weight * (1.0 + f64::from(reps) / 30.0))
}

fn record(value: f64, date: NaiveDate, weight: f64, reps: u32) -> PrRecord {
    PrRecord {
        value,
        date,
        weight,
        reps,
    }
}

fn beats(candidate: f64, best: Option<&PrRecord>) -> bool {
    best.map_or(true, |b| candidate > b.value)
}

/// Compute every record from the full history of one exercise
///
/// An empty history reports `has_data = false`. A history whose sets are all
/// empty still reports `has_data = true` with no records.
pub fn calculate_prs_from_history(history: &[SessionEntry], config: &Config) -> PrSet {
    if history.is_empty() {
        return PrSet::default();
    }

    let mut prs = PrSet {
        has_data: true,
        ..PrSet::default()
    };

    for entry in history {
        for set in &entry.sets {
            if !set.is_loaded() {
                continue;
            }
            let weight = set.effective_weight();
            let reps = set.effective_reps();

            let e1rm = estimate_e1rm(weight, reps);
            if beats(e1rm, prs.e1rm.as_ref()) {
                prs.e1rm = Some(record(e1rm, entry.date, weight, reps));
            }

            if config.records.tracks(reps) && beats(weight, prs.rep_maxes.get(&reps)) {
                prs.rep_maxes
                    .insert(reps, record(weight, entry.date, weight, reps));
            }

            let volume = weight * f64::from(reps);
            if beats(volume, prs.volume_pr.as_ref()) {
                prs.volume_pr = Some(record(volume, entry.date, weight, reps));
            }
        }
    }

    tracing::debug!(
        "Computed PRs from {} sessions: e1rm={:?}, {} rep maxes",
        history.len(),
        prs.e1rm.as_ref().map(|r| r.value),
        prs.rep_maxes.len()
    );

    prs
}

/// Classify a candidate set against previously computed records
///
/// Without prior data every loaded set is a first-time record in each
/// category it qualifies for.
pub fn check_set_for_prs(set: &SetRecord, existing: &PrSet, config: &Config) -> SetPrCheck {
    if !set.is_loaded() {
        return SetPrCheck::default();
    }

    let weight = set.effective_weight();
    let reps = set.effective_reps();
    let tracked = config.records.tracks(reps);

    if !existing.has_data {
        return SetPrCheck {
            is_e1rm_pr: true,
            is_rep_max_pr: tracked,
            is_volume_pr: true,
            rep_max_type: tracked.then_some(reps),
        };
    }

    let is_rep_max_pr = tracked && beats(weight, existing.rep_maxes.get(&reps));

    SetPrCheck {
        is_e1rm_pr: beats(estimate_e1rm(weight, reps), existing.e1rm.as_ref()),
        is_rep_max_pr,
        is_volume_pr: beats(set.volume(), existing.volume_pr.as_ref()),
        rep_max_type: is_rep_max_pr.then_some(reps),
    }
}

/// Best candidate found so far in one category
struct Best<'a> {
    value: f64,
    set: &'a SetRecord,
}

fn keep_best<'a>(slot: &mut Option<Best<'a>>, value: f64, set: &'a SetRecord) {
    if slot.as_ref().map_or(true, |b| value > b.value) {
        *slot = Some(Best { value, set });
    }
}

fn event(name: &str, pr_type: PrKind, best: &Best<'_>, previous_value: Option<f64>) -> PrEvent {
    PrEvent {
        exercise_name: name.to_string(),
        pr_type,
        value: best.value,
        previous_value,
        weight: best.set.effective_weight(),
        reps: best.set.effective_reps(),
    }
}

/// Find the records a candidate workout sets
///
/// `histories` holds prior history keyed by exercise name. An exercise with no
/// prior history yields one `First` event for its best-e1RM set. Otherwise each
/// category (e1RM, every rep-max bucket, volume) yields at most one event: the
/// single best set that beats the existing record.
pub fn detect_new_prs(
    candidates: &[WorkoutExercise],
    histories: &HashMap<String, ExerciseHistory>,
    config: &Config,
) -> Vec<PrEvent> {
    let mut events = Vec::new();

    for exercise in candidates {
        let history = histories
            .get(&exercise.name)
            .map(Vec::as_slice)
            .unwrap_or(&[]);

        if history.is_empty() {
            let mut best = None;
            for set in exercise.sets.iter().filter(|s| s.is_loaded()) {
                keep_best(
                    &mut best,
                    estimate_e1rm(set.effective_weight(), set.effective_reps()),
                    set,
                );
            }
            if let Some(best) = best {
                tracing::debug!("First logged performance of {}", exercise.name);
                events.push(event(&exercise.name, PrKind::First, &best, None));
            }
            continue;
        }

        let existing = calculate_prs_from_history(history, config);

        let mut best_e1rm = None;
        let mut best_rep_maxes: BTreeMap<u32, Best<'_>> = BTreeMap::new();
        let mut best_volume = None;

        for set in &exercise.sets {
            let check = check_set_for_prs(set, &existing, config);
            if !check.any() {
                continue;
            }

            if check.is_e1rm_pr {
                keep_best(
                    &mut best_e1rm,
                    estimate_e1rm(set.effective_weight(), set.effective_reps()),
                    set,
                );
            }

            if let Some(reps) = check.rep_max_type {
                let weight = set.effective_weight();
                let replace = best_rep_maxes
                    .get(&reps)
                    .map_or(true, |b| weight > b.value);
                if replace {
                    best_rep_maxes.insert(reps, Best { value: weight, set });
                }
            }

            if check.is_volume_pr {
                keep_best(&mut best_volume, set.volume(), set);
            }
        }

        if let Some(best) = best_e1rm {
            let previous = existing.e1rm.as_ref().map(|r| r.value);
            events.push(event(&exercise.name, PrKind::E1rm, &best, previous));
        }

        for (reps, best) in &best_rep_maxes {
            let previous = existing.rep_maxes.get(reps).map(|r| r.value);
            events.push(event(
                &exercise.name,
                PrKind::RepMax { reps: *reps },
                best,
                previous,
            ));
        }

        if let Some(best) = best_volume {
            let previous = existing.volume_pr.as_ref().map(|r| r.value);
            events.push(event(&exercise.name, PrKind::Volume, &best, previous));
        }
    }

    tracing::debug!(
        "Detected {} PR events across {} exercises",
        events.len(),
        candidates.len()
    );

    events
}

/// Attribute record badges to one history entry
///
/// An entry owns a record when it shares the record's date and its own sets
/// reproduce the record value. Two sessions on the same date cannot be told
/// apart, so both may claim the badge.
pub fn get_entry_pr_info(entry: &SessionEntry, all_prs: &PrSet) -> EntryPrInfo {
    let mut pr_types = Vec::new();
    let loaded: Vec<&SetRecord> = entry.sets.iter().filter(|s| s.is_loaded()).collect();

    if let Some(pr) = all_prs.e1rm.as_ref().filter(|pr| pr.date == entry.date) {
        let best = max_value(
            loaded
                .iter()
                .map(|s| estimate_e1rm(s.effective_weight(), s.effective_reps())),
        );
        if best.is_some_and(|v| approx_eq(v, pr.value)) {
            pr_types.push(PrKind::E1rm);
        }
    }

    for (reps, pr) in &all_prs.rep_maxes {
        if pr.date != entry.date {
            continue;
        }
        let best = max_value(
            loaded
                .iter()
                .filter(|s| s.effective_reps() == *reps)
                .map(|s| s.effective_weight()),
        );
        if best.is_some_and(|v| approx_eq(v, pr.value)) {
            pr_types.push(PrKind::RepMax { reps: *reps });
        }
    }

    if let Some(pr) = all_prs.volume_pr.as_ref().filter(|pr| pr.date == entry.date) {
        let best = max_value(loaded.iter().map(|s| s.volume()));
        if best.is_some_and(|v| approx_eq(v, pr.value)) {
            pr_types.push(PrKind::Volume);
        }
    }

    EntryPrInfo {
        has_pr: !pr_types.is_empty(),
        pr_types,
    }
}

/// Best e1RM per session, oldest first
///
/// Sessions without a loaded set are skipped. Sessions on the same date keep
/// their relative history order.
pub fn e1rm_trend(history: &[SessionEntry]) -> Vec<E1rmPoint> {
    let mut points: Vec<E1rmPoint> = history
        .iter()
        .filter_map(|entry| {
            let mut best: Option<E1rmPoint> = None;
            for set in entry.sets.iter().filter(|s| s.is_loaded()) {
                let weight = set.effective_weight();
                let reps = set.effective_reps();
                let e1rm = estimate_e1rm(weight, reps);
                if best.as_ref().map_or(true, |b| e1rm > b.e1rm) {
                    best = Some(E1rmPoint {
                        date: entry.date,
                        e1rm,
                        weight,
                        reps,
                    });
                }
            }
            best
        })
        .collect();

    points.sort_by_key(|p| p.date);
    points
}
