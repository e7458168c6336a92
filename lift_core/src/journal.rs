//! Training journal loading.
//!
//! Reads a flat set-per-row log into the shapes the engine consumes:
//! workouts grouped by date, and newest-first per-exercise histories.
//!
//! Two formats are accepted, picked by extension:
//! - CSV with the header `date,exercise,weight,reps,rpe`
//! - JSON Lines (`.jsonl` / `.json`) with the same field names
//!
//! Numeric fields are lenient: blanks and junk degrade to missing values.
//! Rows without a usable date or exercise name are skipped with a warning.

use crate::{Error, ExerciseHistory, Result, SessionEntry, SetRecord, Workout, WorkoutExercise};
use chrono::{DateTime, NaiveDate};
use csv::ReaderBuilder;
use fs2::FileExt;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

/// A numeric field as written in the journal
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawNumber {
    Number(f64),
    Text(String),
}

impl RawNumber {
    fn value(&self) -> Option<f64> {
        let value = match self {
            RawNumber::Number(n) => Some(*n),
            RawNumber::Text(s) => s.trim().parse::<f64>().ok(),
        };
        value.filter(|n| n.is_finite())
    }
}

/// Row format shared by CSV and JSONL journals
#[derive(Debug, Deserialize)]
struct JournalRow {
    date: String,
    exercise: String,
    #[serde(default)]
    weight: Option<RawNumber>,
    #[serde(default)]
    reps: Option<RawNumber>,
    #[serde(default)]
    rpe: Option<RawNumber>,
}

/// One logged set
#[derive(Clone, Debug, PartialEq)]
pub struct JournalEntry {
    pub date: NaiveDate,
    pub exercise: String,
    pub set: SetRecord,
}

impl TryFrom<JournalRow> for JournalEntry {
    type Error = Error;

    fn try_from(row: JournalRow) -> Result<Self> {
        let exercise = row.exercise.trim();
        if exercise.is_empty() {
            return Err(Error::Journal("Missing exercise name".into()));
        }

        let date = parse_date(&row.date)?;
        let number = |field: &Option<RawNumber>| field.as_ref().and_then(RawNumber::value);

        Ok(JournalEntry {
            date,
            exercise: exercise.to_string(),
            set: SetRecord {
                weight: number(&row.weight),
                reps: number(&row.reps).map(|r| r.trunc() as i64),
                rpe: number(&row.rpe),
            },
        })
    }
}

/// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp
fn parse_date(raw: &str) -> Result<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(raw).map(|dt| dt.date_naive()))
        .map_err(|e| Error::Journal(format!("Invalid date {:?}: {}", raw, e)))
}

/// An in-memory training journal, in log order
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Journal {
    entries: Vec<JournalEntry>,
}

impl Journal {
    pub fn new(entries: Vec<JournalEntry>) -> Self {
        Self { entries }
    }

    /// Load a journal file, choosing the format by extension
    ///
    /// A missing file is an empty journal.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!("No journal found at {:?}", path);
            return Ok(Self::default());
        }

        let file = File::open(path)?;
        // Acquire shared lock for reading
        file.lock_shared()?;

        let is_jsonl = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("jsonl") || e.eq_ignore_ascii_case("json"));

        let result = if is_jsonl {
            Self::from_jsonl(BufReader::new(&file))
        } else {
            Self::from_csv(&file)
        };

        file.unlock()?;

        let journal = result?;
        tracing::info!("Loaded {} sets from {:?}", journal.len(), path);
        Ok(journal)
    }

    /// Parse CSV rows with a header line naming at least `date` and `exercise`
    pub fn from_csv<R: Read>(reader: R) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);

        let headers = reader.headers()?;
        if headers.is_empty() {
            return Ok(Self::default());
        }
        for required in ["date", "exercise"] {
            if !headers.iter().any(|h| h.eq_ignore_ascii_case(required)) {
                return Err(Error::Journal(format!("CSV header is missing `{}`", required)));
            }
        }

        let mut entries = Vec::new();
        for (index, result) in reader.deserialize::<JournalRow>().enumerate() {
            let line = index + 2;
            match result {
                Ok(row) => match JournalEntry::try_from(row) {
                    Ok(entry) => entries.push(entry),
                    Err(e) => tracing::warn!("Skipping journal line {}: {}", line, e),
                },
                Err(e) => tracing::warn!("Failed to deserialize journal line {}: {}", line, e),
            }
        }

        Ok(Self::new(entries))
    }

    /// Parse JSON Lines, one set per line
    pub fn from_jsonl<R: BufRead>(reader: R) -> Result<Self> {
        let mut entries = Vec::new();

        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            match serde_json::from_str::<JournalRow>(&line) {
                Ok(row) => match JournalEntry::try_from(row) {
                    Ok(entry) => entries.push(entry),
                    Err(e) => tracing::warn!("Skipping journal line {}: {}", index + 1, e),
                },
                Err(e) => {
                    tracing::warn!("Failed to parse journal line {}: {}", index + 1, e);
                }
            }
        }

        Ok(Self::new(entries))
    }

    pub fn entries(&self) -> &[JournalEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Distinct exercise names in first-seen order, ignoring case
    pub fn exercise_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for entry in &self.entries {
            if !names.iter().any(|n| n.eq_ignore_ascii_case(&entry.exercise)) {
                names.push(entry.exercise.clone());
            }
        }
        names
    }

    /// Workouts grouped by date, newest first
    ///
    /// Exercises keep first-seen order within a day; sets keep log order.
    pub fn workouts(&self) -> Vec<Workout> {
        let mut by_date: BTreeMap<NaiveDate, Vec<WorkoutExercise>> = BTreeMap::new();

        for entry in &self.entries {
            let exercises = by_date.entry(entry.date).or_default();
            match exercises
                .iter_mut()
                .find(|e| e.name.eq_ignore_ascii_case(&entry.exercise))
            {
                Some(exercise) => exercise.sets.push(entry.set.clone()),
                None => exercises.push(WorkoutExercise::new(
                    entry.exercise.clone(),
                    vec![entry.set.clone()],
                )),
            }
        }

        by_date
            .into_iter()
            .rev()
            .map(|(date, exercises)| Workout { date, exercises })
            .collect()
    }

    /// History of one exercise, newest first, one entry per date
    pub fn history_for(&self, exercise: &str) -> ExerciseHistory {
        let mut by_date: BTreeMap<NaiveDate, Vec<SetRecord>> = BTreeMap::new();
        for entry in self
            .entries
            .iter()
            .filter(|e| e.exercise.eq_ignore_ascii_case(exercise))
        {
            by_date.entry(entry.date).or_default().push(entry.set.clone());
        }

        by_date
            .into_iter()
            .rev()
            .map(|(date, sets)| SessionEntry::new(date, sets))
            .collect()
    }

    /// Every exercise's history keyed by its first-seen spelling
    pub fn histories(&self) -> HashMap<String, ExerciseHistory> {
        self.exercise_names()
            .into_iter()
            .map(|name| {
                let history = self.history_for(&name);
                (name, history)
            })
            .collect()
    }

    /// Journal restricted to sets logged before `date`
    pub fn before(&self, date: NaiveDate) -> Journal {
        Journal::new(
            self.entries
                .iter()
                .filter(|e| e.date < date)
                .cloned()
                .collect(),
        )
    }

    /// Split off the most recent workout from everything logged before it
    ///
    /// Prior histories are keyed by the names used in the latest workout, so
    /// they line up with PR detection lookups.
    pub fn split_latest(&self) -> Option<(Workout, HashMap<String, ExerciseHistory>)> {
        let latest = self.workouts().into_iter().next()?;
        let prior = self.before(latest.date);

        let histories = latest
            .exercises
            .iter()
            .map(|e| (e.name.clone(), prior.history_for(&e.name)))
            .filter(|(_, history)| !history.is_empty())
            .collect();

        Some((latest, histories))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const CSV: &str = "\
date,exercise,weight,reps,rpe
2025-01-03,Squat,100,5,7
2025-01-03,Squat,100,5,8
2025-01-03,Bench Press,80,8,
2025-01-10,squat,105,5,8.5
2025-01-10,Bench Press,,10,
not-a-date,Squat,100,5,7
2025-01-12,,100,5,7
";

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_csv_skips_bad_rows() {
        let journal = Journal::from_csv(CSV.as_bytes()).unwrap();
        assert_eq!(journal.len(), 5);

        let blank_weight = &journal.entries()[4];
        assert!(blank_weight.set.weight.is_none());
        assert_eq!(blank_weight.set.effective_reps(), 10);
        assert!(journal.entries()[2].set.rpe.is_none());
    }

    #[test]
    fn test_csv_header_checked() {
        let err = Journal::from_csv("day,lift,weight\n2025-01-03,Squat,100\n".as_bytes())
            .unwrap_err();
        assert!(matches!(err, Error::Journal(_)));

        let err = Journal::from_csv(&b"date,exercise,\xff\xfe\n"[..]).unwrap_err();
        assert!(matches!(err, Error::Csv(_)));

        assert!(Journal::from_csv("".as_bytes()).unwrap().is_empty());
    }

    #[test]
    fn test_history_newest_first_case_insensitive() {
        let journal = Journal::from_csv(CSV.as_bytes()).unwrap();
        let history = journal.history_for("Squat");

        assert_eq!(history.len(), 2);
        assert_eq!(history[0].date, ymd(2025, 1, 10));
        assert_eq!(history[1].date, ymd(2025, 1, 3));
        assert_eq!(history[1].sets.len(), 2);
        assert_eq!(history[1].sets[1].rpe, Some(8.0));
    }

    #[test]
    fn test_workouts_grouped_by_date() {
        let journal = Journal::from_csv(CSV.as_bytes()).unwrap();
        let workouts = journal.workouts();

        assert_eq!(workouts.len(), 2);
        assert_eq!(workouts[0].date, ymd(2025, 1, 10));
        assert_eq!(workouts[1].exercises.len(), 2);
        assert_eq!(workouts[1].exercises[0].name, "Squat");
        assert_eq!(workouts[1].exercises[0].sets.len(), 2);
    }

    #[test]
    fn test_exercise_names_dedup() {
        let journal = Journal::from_csv(CSV.as_bytes()).unwrap();
        assert_eq!(journal.exercise_names(), vec!["Squat", "Bench Press"]);
        assert_eq!(journal.histories().len(), 2);
    }

    #[test]
    fn test_split_latest() {
        let journal = Journal::from_csv(CSV.as_bytes()).unwrap();
        let (latest, prior) = journal.split_latest().unwrap();

        assert_eq!(latest.date, ymd(2025, 1, 10));
        assert_eq!(prior["squat"].len(), 1);
        assert_eq!(prior["squat"][0].date, ymd(2025, 1, 3));
        assert!(prior.contains_key("Bench Press"));
    }

    #[test]
    fn test_split_latest_empty() {
        assert!(Journal::default().split_latest().is_none());
    }

    #[test]
    fn test_jsonl_lenient_numbers() {
        let data = r#"{"date":"2025-01-03","exercise":"Deadlift","weight":180,"reps":"5","rpe":8}

{"date":"2025-01-03T18:30:00Z","exercise":"Deadlift","weight":null,"reps":3}
{broken json}
{"date":"2025-01-04","exercise":"Deadlift","weight":"heavy","reps":1}
"#;
        let journal = Journal::from_jsonl(Cursor::new(data)).unwrap();
        assert_eq!(journal.len(), 3);

        let first = &journal.entries()[0].set;
        assert_eq!(first.effective_weight(), 180.0);
        assert_eq!(first.effective_reps(), 5);
        assert_eq!(first.rpe, Some(8.0));

        assert_eq!(journal.entries()[1].date, ymd(2025, 1, 3));
        assert!(journal.entries()[2].set.weight.is_none());
    }

    #[test]
    fn test_load_picks_format_by_extension() {
        let temp_dir = tempfile::tempdir().unwrap();

        let csv_path = temp_dir.path().join("journal.csv");
        std::fs::write(&csv_path, CSV).unwrap();
        assert_eq!(Journal::load(&csv_path).unwrap().len(), 5);

        let jsonl_path = temp_dir.path().join("journal.jsonl");
        std::fs::write(
            &jsonl_path,
            "{\"date\":\"2025-01-03\",\"exercise\":\"Squat\",\"weight\":100,\"reps\":5}\n",
        )
        .unwrap();
        assert_eq!(Journal::load(&jsonl_path).unwrap().len(), 1);
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let temp_dir = tempfile::tempdir().unwrap();
        let journal = Journal::load(&temp_dir.path().join("missing.csv")).unwrap();
        assert!(journal.is_empty());
    }
}
