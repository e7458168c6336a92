use clap::{Parser, Subcommand};
use lift_core::engine::ExerciseReport;
use lift_core::*;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "lift")]
#[command(about = "Strength training analytics: PRs, progression and volume", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Training journal (CSV or JSONL); overrides the configured path
    #[arg(long, global = true)]
    journal: Option<PathBuf>,

    /// Config file; defaults to $XDG_CONFIG_HOME/lift/config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show personal records and session history for an exercise
    Prs {
        /// Exercise name (case-insensitive)
        exercise: String,
    },

    /// Suggest the next session for one exercise, or every exercise
    Suggest {
        /// Exercise name; omit to categorize all exercises
        exercise: Option<String>,

        /// Target rep range, e.g. 8-12 or 5
        #[arg(long)]
        reps: Option<String>,

        /// Working weight to use when the last session had no load
        #[arg(long)]
        weight: Option<f64>,
    },

    /// List records set by the most recent workout
    Check,

    /// Weekly volume by muscle group
    Volume {
        /// Number of most recent weeks to show
        #[arg(long, default_value_t = 8)]
        weeks: usize,
    },

    /// Push/pull and upper/lower training balance
    Balance,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        lift_core::logging::init_with_level("debug");
    } else {
        lift_core::logging::init();
    }

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let journal_path = cli
        .journal
        .clone()
        .unwrap_or_else(|| config.data.journal_path.clone());
    let journal = Journal::load(&journal_path)?;
    tracing::debug!("Using journal {:?} ({} sets)", journal_path, journal.len());

    match cli.command {
        Commands::Prs { ref exercise } => cmd_prs(&journal, exercise, &config, cli.json),
        Commands::Suggest {
            ref exercise,
            ref reps,
            weight,
        } => match exercise {
            Some(name) => {
                cmd_suggest_one(&journal, name, reps.as_deref(), weight, &config, cli.json)
            }
            None => cmd_suggest_all(&journal, reps.as_deref(), &config, cli.json),
        },
        Commands::Check => cmd_check(&journal, &config, cli.json),
        Commands::Volume { weeks } => cmd_volume(&journal, weeks, &config, cli.json),
        Commands::Balance => cmd_balance(&journal, &config, cli.json),
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Whole numbers without decimals, everything else with one
fn num(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.1}", value)
    }
}

/// Canonical spelling from the journal, falling back to the user's input
fn resolve_name(journal: &Journal, exercise: &str) -> String {
    journal
        .exercise_names()
        .into_iter()
        .find(|n| n.eq_ignore_ascii_case(exercise))
        .unwrap_or_else(|| exercise.to_string())
}

fn cmd_prs(journal: &Journal, exercise: &str, config: &Config, json: bool) -> Result<()> {
    let name = resolve_name(journal, exercise);
    let history = journal.history_for(&name);
    let report = engine::analyze_exercise(&name, &history, None, None, config);

    if json {
        return print_json(&report);
    }

    if !report.records.has_data {
        println!("No history for {}", name);
        return Ok(());
    }

    display_records(&report);
    Ok(())
}

fn display_records(report: &ExerciseReport) {
    let records = &report.records;

    println!("\n{} ({} sessions)", report.exercise_name, report.sessions.len());
    println!("─────────────────────────────────────────");

    let describe = |label: &str, pr: &Option<PrRecord>| match pr {
        Some(pr) => println!(
            "  {:<10} {:>7}  ({} x {} on {})",
            label,
            num(pr.value),
            num(pr.weight),
            pr.reps,
            pr.date
        ),
        None => println!("  {:<10} {:>7}", label, "-"),
    };
    describe("e1RM", &records.e1rm);
    describe("Volume", &records.volume_pr);

    if !records.rep_maxes.is_empty() {
        println!("  Rep maxes:");
        for (reps, pr) in &records.rep_maxes {
            println!("    {:>2}RM  {:>7}  on {}", reps, num(pr.value), pr.date);
        }
    }

    println!("\n  Sessions:");
    for session in &report.sessions {
        let rpe = session
            .summary
            .average_rpe
            .map(|r| format!("RPE {:.1}", r))
            .unwrap_or_default();
        let badges = if session.prs.has_pr {
            let kinds: Vec<String> = session.prs.pr_types.iter().map(|k| k.to_string()).collect();
            format!("★ {}", kinds.join(", "))
        } else {
            String::new()
        };
        println!(
            "    {}  {:>2} sets  {:>8} vol  {:<8} {}",
            session.date,
            session.summary.total_sets,
            num(session.summary.total_volume),
            rpe,
            badges
        );
    }
    println!();
}

fn cmd_suggest_one(
    journal: &Journal,
    exercise: &str,
    reps: Option<&str>,
    weight: Option<f64>,
    config: &Config,
    json: bool,
) -> Result<()> {
    let name = resolve_name(journal, exercise);
    let history = journal.history_for(&name);
    let suggestion = get_progression_suggestion(&history, reps, weight, config);

    if json {
        return print_json(&ExerciseSuggestion {
            exercise_name: name,
            suggestion,
        });
    }

    println!("\n{}: {}", name, suggestion.status);
    println!("  {}", suggestion.message);
    if let (Some(w), Some(r)) = (suggestion.suggested_weight, suggestion.suggested_reps) {
        println!("  → Next: {} x {}", num(w), r);
    }
    println!();
    Ok(())
}

fn cmd_suggest_all(
    journal: &Journal,
    reps: Option<&str>,
    config: &Config,
    json: bool,
) -> Result<()> {
    let suggestions = journal.exercise_names().into_iter().map(|name| {
        let history = journal.history_for(&name);
        ExerciseSuggestion {
            suggestion: get_progression_suggestion(&history, reps, None, config),
            exercise_name: name,
        }
    });
    let categories = categorize_exercises(suggestions);

    if json {
        return print_json(&categories);
    }

    let groups = [
        ("Ready to progress", &categories.ready),
        ("Maintain", &categories.maintain),
        ("Needs attention", &categories.attention),
        ("No data", &categories.no_data),
    ];

    for (title, items) in groups {
        if items.is_empty() {
            continue;
        }
        println!("\n{} ({})", title, items.len());
        for item in items {
            println!(
                "  {:<24} {}",
                item.exercise_name, item.suggestion.short_message
            );
        }
    }
    println!();
    Ok(())
}

fn cmd_check(journal: &Journal, config: &Config, json: bool) -> Result<()> {
    let Some((latest, prior)) = journal.split_latest() else {
        if json {
            return print_json(&Vec::<PrEvent>::new());
        }
        println!("Journal is empty - nothing to check.");
        return Ok(());
    };

    let events = detect_new_prs(&latest.exercises, &prior, config);

    if json {
        return print_json(&events);
    }

    if events.is_empty() {
        println!("No new records on {}.", latest.date);
        return Ok(());
    }

    println!("\n✓ {} new record(s) on {}", events.len(), latest.date);
    for event in &events {
        let lift = format!("{} x {}", num(event.weight), event.reps);
        match (event.pr_type, event.previous_value) {
            (PrKind::First, _) => println!(
                "  {}: first session, best e1RM {} ({})",
                event.exercise_name,
                num(event.value),
                lift
            ),
            (kind, Some(previous)) => println!(
                "  {}: {} {} (was {}) with {}",
                event.exercise_name,
                kind,
                num(event.value),
                num(previous),
                lift
            ),
            (kind, None) => println!(
                "  {}: {} {} with {}",
                event.exercise_name,
                kind,
                num(event.value),
                lift
            ),
        }
    }
    println!();
    Ok(())
}

fn cmd_volume(journal: &Journal, weeks: usize, config: &Config, json: bool) -> Result<()> {
    let muscle_map = MuscleMap::from_config(config);
    let weekly = aggregate_volume_by_week(&journal.workouts(), &muscle_map, weeks);

    if json {
        return print_json(&weekly);
    }

    if weekly.is_empty() {
        println!("No workouts logged.");
        return Ok(());
    }

    for week in &weekly {
        println!("\n{} (week of {}): {}", week.week_key, week.label, num(week.total));

        let mut muscles: Vec<_> = week.by_muscle.iter().collect();
        muscles.sort_by(|a, b| b.1.total_cmp(a.1));
        for (muscle, volume) in muscles {
            println!("  {:<14} {:>9}", muscle, num(*volume));
        }
    }
    println!();
    Ok(())
}

fn cmd_balance(journal: &Journal, config: &Config, json: bool) -> Result<()> {
    let muscle_map = MuscleMap::from_config(config);
    let report = engine::analyze_training(&journal.workouts(), &muscle_map, 0, config);

    if json {
        return print_json(&report.balance);
    }

    let balance = &report.balance;
    let status = |s: Option<BalanceStatus>| s.map_or("no data".to_string(), |s| s.to_string());

    println!("\nTraining balance");
    println!("─────────────────────────────────────────");
    println!(
        "  Push/Pull   {:>3}% / {:<3}%  {}",
        balance.push_pct,
        balance.pull_pct,
        status(report.push_pull_status)
    );
    println!(
        "  Upper/Lower {:>3}% / {:<3}%  {}",
        balance.upper_pct,
        balance.lower_pct,
        status(report.upper_lower_status)
    );
    println!();
    Ok(())
}
