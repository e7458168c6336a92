//! Autoregulated progression suggestions.
//!
//! This module turns recent RPE into a concrete next step:
//! - Too easy (RPE ≤ 6.5): add reps, or add a large weight jump at the top of the range
//! - Good zone (≤ 7.5): add a rep, or a small weight jump at the top of the range
//! - Hard (≤ 8.5): hold weight and reps
//! - Grinding (> 8.5): deload
//!
//! Four sessions at one weight averaging RPE ≥ 8.5 override everything as a stall.
//! Thresholds and steps come from [`ProgressionConfig`].
//!
//! History must be newest-first.

use crate::config::ProgressionConfig;
use crate::summary::{approx_eq, summarize_sets, top_set};
use crate::{Config, SessionEntry};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Overall readiness of an exercise
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressionStatus {
    Ready,
    Maintain,
    Attention,
    NoData,
}

impl fmt::Display for ProgressionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ready => write!(f, "ready"),
            Self::Maintain => write!(f, "maintain"),
            Self::Attention => write!(f, "attention"),
            Self::NoData => write!(f, "no_data"),
        }
    }
}

/// The concrete adjustment behind a suggestion
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    IncreaseWeight,
    IncreaseReps,
    Maintain,
    DecreaseWeight,
}

impl RecommendationKind {
    pub fn status(self) -> ProgressionStatus {
        match self {
            Self::IncreaseWeight | Self::IncreaseReps => ProgressionStatus::Ready,
            Self::Maintain => ProgressionStatus::Maintain,
            Self::DecreaseWeight => ProgressionStatus::Attention,
        }
    }
}

/// Target rep band parsed from strings like `"8-12"` or `"5"`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepRange {
    pub min: u32,
    pub max: u32,
}

/// The session a suggestion was based on
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LastSession {
    pub date: NaiveDate,
    pub weight: f64,
    pub reps: u32,
    pub average_rpe: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProgressionSuggestion {
    pub status: ProgressionStatus,
    pub recommendation: Option<RecommendationKind>,
    pub message: String,
    pub short_message: String,
    pub suggested_weight: Option<f64>,
    pub suggested_reps: Option<u32>,
    pub weight_change: f64,
    pub rep_change: i64,
    pub sessions_analyzed: usize,
    pub last_session: Option<LastSession>,
}

impl ProgressionSuggestion {
    fn no_data(message: &str, short_message: &str, last_session: Option<LastSession>) -> Self {
        Self {
            status: ProgressionStatus::NoData,
            recommendation: None,
            message: message.to_string(),
            short_message: short_message.to_string(),
            suggested_weight: None,
            suggested_reps: None,
            weight_change: 0.0,
            rep_change: 0,
            sessions_analyzed: 0,
            last_session,
        }
    }
}

/// A suggestion tagged with its exercise, for batch views
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExerciseSuggestion {
    pub exercise_name: String,
    pub suggestion: ProgressionSuggestion,
}

/// Exercises grouped by status, input order preserved within each group
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ExerciseCategories {
    pub ready: Vec<ExerciseSuggestion>,
    pub maintain: Vec<ExerciseSuggestion>,
    pub attention: Vec<ExerciseSuggestion>,
    pub no_data: Vec<ExerciseSuggestion>,
}

/// Parse a target rep range
///
/// `"8-12"` gives 8..12, a single `"n"` gives n-1..n+1, anything else falls
/// back to the configured default band.
pub fn parse_rep_range(target: Option<&str>, config: &ProgressionConfig) -> RepRange {
    let fallback = RepRange {
        min: config.default_rep_min,
        max: config.default_rep_max,
    };

    let Some(raw) = target.map(str::trim).filter(|s| !s.is_empty()) else {
        return fallback;
    };

    let parsed = match raw.split_once('-') {
        Some((lo, hi)) => match (lo.trim().parse::<u32>(), hi.trim().parse::<u32>()) {
            (Ok(lo), Ok(hi)) if lo > 0 && hi > 0 => Some(RepRange {
                min: lo.min(hi),
                max: lo.max(hi),
            }),
            _ => None,
        },
        None => match raw.parse::<u32>() {
            Ok(n) if n > 0 => n.checked_add(1).map(|max| RepRange { min: n - 1, max }),
            _ => None,
        },
    };

    parsed.unwrap_or_else(|| {
        tracing::warn!("Unparsable rep range {:?}, using {}-{}", raw, fallback.min, fallback.max);
        fallback
    })
}

/// True when the most recent `stall_window` sessions share one max weight and
/// their mean RPE reaches `stall_rpe`
pub fn is_stalled(history: &[SessionEntry], config: &ProgressionConfig) -> bool {
    let window = config.stall_window;
    if window == 0 || history.len() < window {
        return false;
    }

    let summaries: Vec<_> = history[..window]
        .iter()
        .map(|entry| summarize_sets(&entry.sets))
        .collect();

    let first_weight = summaries[0].max_weight;
    if !summaries
        .iter()
        .all(|s| approx_eq(s.max_weight, first_weight))
    {
        return false;
    }

    let rpes: Vec<f64> = summaries.iter().filter_map(|s| s.average_rpe).collect();
    if rpes.is_empty() {
        return false;
    }

    let mean = rpes.iter().sum::<f64>() / rpes.len() as f64;
    mean >= config.stall_rpe
}

struct Adjustment {
    kind: RecommendationKind,
    weight_change: f64,
    rep_change: i64,
}

fn classify(rpe: f64, reps: u32, range: RepRange, config: &ProgressionConfig) -> Adjustment {
    let at_top = reps >= range.max;
    let reset_reps = i64::from(range.min) - i64::from(reps);

    if rpe <= config.easy_rpe {
        if at_top {
            Adjustment {
                kind: RecommendationKind::IncreaseWeight,
                weight_change: config.large_weight_step,
                rep_change: reset_reps,
            }
        } else {
            Adjustment {
                kind: RecommendationKind::IncreaseReps,
                weight_change: 0.0,
                rep_change: i64::from(config.easy_rep_step),
            }
        }
    } else if rpe <= config.good_rpe {
        if at_top {
            Adjustment {
                kind: RecommendationKind::IncreaseWeight,
                weight_change: config.small_weight_step,
                rep_change: reset_reps,
            }
        } else {
            Adjustment {
                kind: RecommendationKind::IncreaseReps,
                weight_change: 0.0,
                rep_change: i64::from(config.good_rep_step),
            }
        }
    } else if rpe <= config.hard_rpe {
        Adjustment {
            kind: RecommendationKind::Maintain,
            weight_change: 0.0,
            rep_change: 0,
        }
    } else {
        Adjustment {
            kind: RecommendationKind::DecreaseWeight,
            weight_change: -config.deload_step,
            rep_change: 0,
        }
    }
}

fn format_weight(weight: f64) -> String {
    if weight.fract() == 0.0 {
        format!("{:.0}", weight)
    } else {
        format!("{}", weight)
    }
}

fn describe(adj: &Adjustment, rpe: f64, weight: f64, reps: u32) -> (String, String) {
    let target = format!("{} x {}", format_weight(weight), reps);
    match adj.kind {
        RecommendationKind::IncreaseWeight => (
            format!("RPE {:.1} at the top of the range. Go up to {}", rpe, target),
            format!("+{}", format_weight(adj.weight_change)),
        ),
        RecommendationKind::IncreaseReps => (
            format!("RPE {:.1} leaves room. Aim for {}", rpe, target),
            format!("+{} reps", adj.rep_change),
        ),
        RecommendationKind::Maintain => (
            format!("RPE {:.1} is on target. Repeat {}", rpe, target),
            "Hold".to_string(),
        ),
        RecommendationKind::DecreaseWeight => (
            format!("RPE {:.1} is too high. Back off to {}", rpe, target),
            format!("-{}", format_weight(-adj.weight_change)),
        ),
    }
}

/// Suggest the next session for one exercise
///
/// `history` must be newest-first. `target_reps` is a range string such as
/// `"8-12"`. `current_weight` stands in when the last session carried no load.
pub fn get_progression_suggestion(
    history: &[SessionEntry],
    target_reps: Option<&str>,
    current_weight: Option<f64>,
    config: &Config,
) -> ProgressionSuggestion {
    let cfg = &config.progression;

    let snapshot = |entry: &SessionEntry| {
        let summary = summarize_sets(&entry.sets);
        let (weight, reps) = top_set(&entry.sets)
            .map_or((0.0, 0), |s| (s.effective_weight(), s.effective_reps()));
        let weight = if weight > 0.0 {
            weight
        } else {
            current_weight.filter(|w| w.is_finite() && *w > 0.0).unwrap_or(0.0)
        };
        LastSession {
            date: entry.date,
            weight,
            reps,
            average_rpe: summary.average_rpe,
        }
    };

    if history.len() < 2 {
        return ProgressionSuggestion::no_data(
            "Log at least 2 sessions to get suggestions",
            "Not enough data",
            history.first().map(snapshot),
        );
    }

    let window = &history[..cfg.rpe_window.min(history.len())];
    let with_rpe: Vec<LastSession> = window
        .iter()
        .map(snapshot)
        .filter(|s| s.average_rpe.is_some())
        .collect();

    let Some(last) = with_rpe.first().cloned() else {
        return ProgressionSuggestion::no_data(
            "Record RPE to get suggestions",
            "No RPE data",
            Some(snapshot(&history[0])),
        );
    };
    let rpe = last.average_rpe.unwrap_or_default();

    let range = parse_rep_range(target_reps, cfg);
    let adj = classify(rpe, last.reps, range, cfg);

    let suggested_weight = (last.weight + adj.weight_change).max(0.0);
    let suggested_reps = u32::try_from((i64::from(last.reps) + adj.rep_change).max(0))
        .unwrap_or(u32::MAX);

    let (mut message, mut short_message) = describe(&adj, rpe, suggested_weight, suggested_reps);
    let mut status = adj.kind.status();

    if is_stalled(history, cfg) {
        tracing::debug!(
            "Stall detected: {} sessions at {}",
            cfg.stall_window,
            last.weight
        );
        status = ProgressionStatus::Attention;
        message = format!(
            "Stalled at {} for {} sessions. Consider a deload or a variation",
            format_weight(last.weight),
            cfg.stall_window
        );
        short_message = "Stalled".to_string();
    }

    tracing::debug!(
        "Suggestion on {}: {:?} (RPE {}, {} x {})",
        last.date,
        adj.kind,
        rpe,
        last.weight,
        last.reps
    );

    ProgressionSuggestion {
        status,
        recommendation: Some(adj.kind),
        message,
        short_message,
        suggested_weight: Some(suggested_weight),
        suggested_reps: Some(suggested_reps),
        weight_change: adj.weight_change,
        rep_change: adj.rep_change,
        sessions_analyzed: with_rpe.len(),
        last_session: Some(last),
    }
}

/// Group exercises by suggestion status
pub fn categorize_exercises<I>(suggestions: I) -> ExerciseCategories
where
    I: IntoIterator<Item = ExerciseSuggestion>,
{
    let mut categories = ExerciseCategories::default();
    for item in suggestions {
        let bucket = match item.suggestion.status {
            ProgressionStatus::Ready => &mut categories.ready,
            ProgressionStatus::Maintain => &mut categories.maintain,
            ProgressionStatus::Attention => &mut categories.attention,
            ProgressionStatus::NoData => &mut categories.no_data,
        };
        bucket.push(item);
    }
    categories
}
