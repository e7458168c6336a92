//! Per-session set aggregation.
//!
//! Every other component reads sessions through [`summarize_sets`].

use crate::SetRecord;
use serde::{Deserialize, Serialize};

/// Aggregates for one session's sets
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub total_sets: usize,
    pub total_reps: u32,
    pub max_weight: f64,
    pub total_volume: f64,
    /// Mean over sets carrying a valid RPE, one decimal
    pub average_rpe: Option<f64>,
    pub max_rpe: Option<f64>,
}

/// Round to one decimal place
pub(crate) fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Float comparison for values that went through [`round_to_tenth`]
pub(crate) fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

/// Largest value of an iterator of floats
pub(crate) fn max_value(values: impl Iterator<Item = f64>) -> Option<f64> {
    values.fold(None, |acc, v| Some(acc.map_or(v, |m: f64| m.max(v))))
}

/// Reduce a session's sets to a [`SessionSummary`]
///
/// Empty input yields a zeroed summary with no RPE data.
pub fn summarize_sets(sets: &[SetRecord]) -> SessionSummary {
    let mut summary = SessionSummary {
        total_sets: sets.len(),
        ..SessionSummary::default()
    };

    let mut rpe_sum = 0.0;
    let mut rpe_count = 0u32;
    let mut max_rpe: Option<f64> = None;

    for set in sets {
        let weight = set.effective_weight();
        let reps = set.effective_reps();

        summary.total_reps = summary.total_reps.saturating_add(reps);
        summary.max_weight = summary.max_weight.max(weight);
        summary.total_volume += weight * f64::from(reps);

        if let Some(rpe) = set.valid_rpe() {
            rpe_sum += rpe;
            rpe_count += 1;
            max_rpe = Some(max_rpe.map_or(rpe, |m: f64| m.max(rpe)));
        }
    }

    if rpe_count > 0 {
        summary.average_rpe = Some(round_to_tenth(rpe_sum / f64::from(rpe_count)));
        summary.max_rpe = max_rpe;
    }

    summary
}

/// The last working set: the final set with reps performed at the session's
/// max weight.
pub fn top_set(sets: &[SetRecord]) -> Option<&SetRecord> {
    let max_weight = max_value(
        sets.iter()
            .filter(|s| s.effective_reps() > 0)
            .map(SetRecord::effective_weight),
    )?;

    sets.iter()
        .rev()
        .find(|s| s.effective_reps() > 0 && approx_eq(s.effective_weight(), max_weight))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_sets() {
        let summary = summarize_sets(&[]);
        assert_eq!(summary, SessionSummary::default());
        assert!(summary.average_rpe.is_none());
        assert!(summary.max_rpe.is_none());
    }

    #[test]
    fn test_basic_aggregates() {
        let sets = vec![
            SetRecord::new(100.0, 5).with_rpe(7.0),
            SetRecord::new(100.0, 5).with_rpe(8.0),
            SetRecord::new(90.0, 8),
        ];
        let summary = summarize_sets(&sets);

        assert_eq!(summary.total_sets, 3);
        assert_eq!(summary.total_reps, 18);
        assert_eq!(summary.max_weight, 100.0);
        assert_eq!(summary.total_volume, 1720.0);
        assert_eq!(summary.average_rpe, Some(7.5));
        assert_eq!(summary.max_rpe, Some(8.0));
    }

    #[test]
    fn test_average_rpe_rounds_to_one_decimal() {
        let sets = vec![
            SetRecord::new(60.0, 10).with_rpe(7.0),
            SetRecord::new(60.0, 10).with_rpe(7.0),
            SetRecord::new(60.0, 10).with_rpe(8.0),
        ];
        assert_eq!(summarize_sets(&sets).average_rpe, Some(7.3));
    }

    #[test]
    fn test_invalid_fields_count_as_zero() {
        let sets = vec![
            SetRecord {
                weight: None,
                reps: Some(10),
                rpe: Some(15.0),
            },
            SetRecord {
                weight: Some(50.0),
                reps: None,
                rpe: None,
            },
        ];
        let summary = summarize_sets(&sets);

        assert_eq!(summary.total_sets, 2);
        assert_eq!(summary.total_reps, 10);
        assert_eq!(summary.max_weight, 50.0);
        assert_eq!(summary.total_volume, 0.0);
        assert!(summary.average_rpe.is_none());
    }

    #[test]
    fn test_top_set_is_last_heaviest() {
        let sets = vec![
            SetRecord::new(80.0, 8),
            SetRecord::new(100.0, 6),
            SetRecord::new(100.0, 4),
            SetRecord::new(70.0, 12),
        ];
        let top = top_set(&sets).unwrap();
        assert_eq!(top.effective_weight(), 100.0);
        assert_eq!(top.effective_reps(), 4);
    }

    #[test]
    fn test_top_set_bodyweight() {
        let sets = vec![SetRecord::new(0.0, 12), SetRecord::new(0.0, 10)];
        assert_eq!(top_set(&sets).unwrap().effective_reps(), 10);
        assert!(top_set(&[]).is_none());
    }
}
