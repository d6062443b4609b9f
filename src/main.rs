//! hypertrack - Personal hypertrophy training tracker

use std::collections::BTreeMap;

use anyhow::{Context, Result, anyhow};
use chrono::Local;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use hypertrack::ai::{self, DEFAULT_MODEL};
use hypertrack::analytics::one_rep_max_history;
use hypertrack::config::DEFAULT_DB_PATH;
use hypertrack::exercises::{PriorityTier, find_exercise_by_name, same_exercise};
use hypertrack::models::{PriorityMuscles, ProfilePatch, RawExercise, RawSet, RawTrainingLog};
use hypertrack::{Config, EngineError, Store};

#[derive(Parser)]
#[command(name = "hypertrack")]
#[command(author, version, about = "Personal hypertrophy training tracker")]
struct Cli {
    /// SQLite database file
    #[arg(long, global = true, env = "HYPERTRACK_DB", default_value = DEFAULT_DB_PATH)]
    db: String,

    /// User id the data is stored under
    #[arg(long, global = true, env = "HYPERTRACK_USER")]
    user: Option<String>,

    /// Gemini model for AI coaching
    #[arg(long, global = true, env = "GEMINI_MODEL", default_value = DEFAULT_MODEL)]
    model: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Weekly volume, fatigue and advice for the latest session
    Dashboard,

    /// Log a training session
    Log {
        /// Exercise name (e.g., "bench press", "squat")
        exercise: Option<String>,

        /// Muscle group; inferred for known exercises
        #[arg(short, long)]
        muscle: Option<String>,

        /// Set as LOADxREPS or LOADxREPS@RIR, repeat per set
        #[arg(short, long = "set")]
        sets: Vec<String>,

        /// Performance score (0-4)
        #[arg(short, long)]
        performance: Option<i64>,

        /// Pain score (0-3)
        #[arg(long)]
        pain: Option<i64>,

        /// Optional notes
        #[arg(short, long)]
        notes: Option<String>,

        /// Session date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,

        /// Read a whole session from a JSON file instead
        #[arg(short, long, conflicts_with_all = ["exercise", "sets"])]
        file: Option<String>,
    },

    /// Import sessions exported by an older version (JSON array or single session)
    Import { file: String },

    /// List training history
    List {
        /// Number of sessions to show
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },

    /// Effective sets per muscle group and week
    Volume {
        /// Number of weeks to show
        #[arg(short, long, default_value = "8")]
        weeks: usize,
    },

    /// Progression advice for the latest session
    Recommend,

    /// Estimated 1RM trend for one exercise
    Trend {
        exercise: String,

        /// Number of recent sessions to list
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },

    /// Show or change profile settings
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },

    /// AI review of the latest session
    Insight,

    /// AI alternatives for a muscle group or exercise
    Suggest { target: String },
}

#[derive(Subcommand)]
enum ProfileAction {
    Show,

    Set {
        #[arg(long)]
        objectives: Option<String>,

        #[arg(long)]
        time_constraints: Option<String>,

        /// Muscles in the max priority tier (comma separated)
        #[arg(long, value_delimiter = ',')]
        max: Option<Vec<String>>,

        #[arg(long, value_delimiter = ',')]
        primary: Option<Vec<String>>,

        #[arg(long, value_delimiter = ',')]
        secondary: Option<Vec<String>>,

        #[arg(long, value_delimiter = ',')]
        tertiary: Option<Vec<String>>,

        #[arg(long, value_delimiter = ',')]
        maintenance: Option<Vec<String>>,

        /// Initial VME as MUSCLE=SETS, repeatable
        #[arg(long)]
        vme: Vec<String>,
    },
}

/// Errors from the library reach the user as their friendly message
fn report(e: EngineError) -> anyhow::Error {
    anyhow!(e.user_message())
}

fn parse_vme(entries: &[String]) -> Result<Option<BTreeMap<String, u32>>> {
    if entries.is_empty() {
        return Ok(None);
    }
    entries
        .iter()
        .map(|entry| {
            let (muscle, sets) = entry
                .split_once('=')
                .with_context(|| format!("invalid VME {:?}, expected MUSCLE=SETS", entry))?;
            let sets = sets
                .trim()
                .parse()
                .with_context(|| format!("invalid set count in {:?}", entry))?;
            Ok((muscle.trim().to_string(), sets))
        })
        .collect::<Result<BTreeMap<_, _>>>()
        .map(Some)
}

fn print_dashboard(store: &Store) {
    let snapshot = store.snapshot();
    let analytics = snapshot.analytics();

    if let Some(identity) = store.identity()
        && identity.degraded
    {
        println!("Temporary user {} - set HYPERTRACK_USER to keep your data", identity.user_id);
    }

    println!("Dashboard");
    println!("{:-<60}", "");

    let Some(latest) = analytics.latest_log() else {
        println!("No sessions logged yet. Start with: hypertrack log \"bench press\" -s 60x8@2");
        return;
    };
    println!("Sessions: {} | Last: {}", snapshot.logs.len(), latest.date);

    let report = analytics.weekly_volume();
    if let Some(week) = report.latest() {
        println!("\nWeek {} - {} effective sets", week.week, week.total());
        match &snapshot.profile {
            Some(profile) => {
                for cmp in report.compare_to_baseline(profile) {
                    println!("  {:12} {:>3} sets  {}", cmp.group.to_string(), cmp.sets, cmp.status.label());
                }
            }
            None => {
                for (group, sets) in &week.sets {
                    println!("  {:12} {:>3} sets", group.to_string(), sets);
                }
            }
        }
    }

    println!("\nFatigue: {}", analytics.fatigue().message());

    let recs = analytics.latest_recommendations();
    if !recs.is_empty() {
        println!("\nNext session:");
        for rec in recs.values() {
            println!("  {:12} {}", rec.group.to_string(), rec.progression.short());
        }
    }

    let trends: Vec<_> = analytics
        .exercise_names()
        .into_iter()
        .filter_map(|name| analytics.one_rep_max_trend(name).map(|t| (name, t)))
        .collect();
    if !trends.is_empty() {
        println!("\n1RM trends:");
        for (name, trend) in trends {
            println!("  {:20} {}", name, trend.format());
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config {
        db_path: cli.db,
        user_id: cli.user,
        gemini_api_key: std::env::var("GEMINI_API_KEY").ok(),
        gemini_model: cli.model,
    };
    let store = config.open_store();

    match cli.command.unwrap_or(Commands::Dashboard) {
        Commands::Dashboard => print_dashboard(&store),

        Commands::Log {
            exercise,
            muscle,
            sets,
            performance,
            pain,
            notes,
            date,
            file,
        } => {
            let raw = match file {
                Some(path) => {
                    let text = std::fs::read_to_string(&path).with_context(|| format!("reading {}", path))?;
                    serde_json::from_str::<RawTrainingLog>(&text).with_context(|| format!("parsing {}", path))?
                }
                None => {
                    let sets = sets
                        .iter()
                        .map(|s| s.parse::<RawSet>())
                        .collect::<Result<Vec<_>, _>>()
                        .map_err(|e| report(e.into()))?;
                    let muscle_group = muscle.or_else(|| {
                        exercise
                            .as_deref()
                            .and_then(find_exercise_by_name)
                            .map(|e| e.muscle_group.to_string())
                    });
                    RawTrainingLog {
                        date: Some(date.unwrap_or_else(|| Local::now().date_naive().to_string())),
                        exercises: vec![RawExercise {
                            name: exercise,
                            muscle_group,
                            sets,
                            performance_score: performance,
                            pain_score: pain,
                            notes,
                        }],
                    }
                }
            };

            let log = store.add_log(&raw).map_err(report)?;
            println!(
                "Logged: {} - {} exercise(s) (id: {})",
                log.date,
                log.exercises.len(),
                log.id.as_deref().unwrap_or("-")
            );
            for ex in &log.exercises {
                let best = ex.best_estimated_1rm().unwrap_or(0.0);
                println!(
                    "  {} ({}): {} sets, {} effective, best e1RM {:.2} kg",
                    ex.name,
                    ex.muscle_group,
                    ex.sets.len(),
                    ex.effective_sets(),
                    best
                );
            }

            let snapshot = store.snapshot();
            if let Some(rec) = snapshot.analytics().recommendation_after(&log) {
                println!("\n{}", rec.progression.advice(rec.group));
            }
        }

        Commands::Import { file } => {
            let text = std::fs::read_to_string(&file).with_context(|| format!("reading {}", file))?;
            let value: serde_json::Value = serde_json::from_str(&text).with_context(|| format!("parsing {}", file))?;
            let raws: Vec<RawTrainingLog> = if value.is_array() {
                serde_json::from_value::<Vec<RawTrainingLog>>(value)
            } else {
                serde_json::from_value::<RawTrainingLog>(value).map(|raw| vec![raw])
            }
            .with_context(|| format!("parsing {}", file))?;

            let imported = store.import_logs(&raws).map_err(report)?;
            println!("Imported {} of {} session(s).", imported, raws.len());
        }

        Commands::List { limit } => {
            let snapshot = store.snapshot();
            println!("Recent sessions:");
            println!("{:-<60}", "");
            for log in snapshot.logs.iter().rev().take(limit) {
                for ex in &log.exercises {
                    let sets: Vec<String> = ex
                        .sets
                        .iter()
                        .map(|s| match s.rir {
                            Some(rir) => format!("{}x{}@{}", s.load(), s.reps(), rir),
                            None => format!("{}x{}", s.load(), s.reps()),
                        })
                        .collect();
                    println!(
                        "{} | {:20} | {:10} | {}",
                        log.date,
                        ex.name,
                        ex.muscle_group.to_string(),
                        sets.join(" ")
                    );
                }
            }
        }

        Commands::Volume { weeks } => {
            let snapshot = store.snapshot();
            let report = snapshot.analytics().weekly_volume();

            println!("Effective sets per week");
            println!("{:-<60}", "");
            let start = report.weeks().len().saturating_sub(weeks);
            for week in &report.weeks()[start..] {
                let groups: Vec<String> = week
                    .sets
                    .iter()
                    .map(|(group, sets)| format!("{} {}", group, sets))
                    .collect();
                println!("{} | {:>3} | {}", week.week, week.total(), groups.join(", "));
            }
        }

        Commands::Recommend => {
            let snapshot = store.snapshot();
            let analytics = snapshot.analytics();
            if snapshot.profile.is_none() {
                println!("No profile yet. Set priority muscles with: hypertrack profile set --max Chest");
            }
            let recs = analytics.latest_recommendations();
            if recs.is_empty() {
                println!("No recommendations for the latest session.");
            }
            for rec in recs.values() {
                let tier = rec.tier.map_or("-", |t| t.name());
                println!("{} [{}]: {}", rec.group, tier, rec.progression.advice(rec.group));
            }
            println!("\nFatigue: {}", analytics.fatigue().message());
        }

        Commands::Trend { exercise, limit } => {
            let snapshot = store.snapshot();
            let analytics = snapshot.analytics();

            println!("Exercise: {}", exercise);
            println!("{:-<60}", "");
            let points: Vec<_> = one_rep_max_history(&snapshot.logs, limit)
                .into_iter()
                .filter(|p| same_exercise(&p.exercise, &exercise))
                .collect();
            for p in &points {
                println!("{} | {:>7.2} kg", p.date, p.estimated_1rm);
            }

            match analytics.one_rep_max_trend(&exercise) {
                Some(trend) => println!("{}", trend.format()),
                None => println!("Need at least 3 sessions for a trend."),
            }
        }

        Commands::Profile { action: ProfileAction::Show } => {
            let snapshot = store.snapshot();
            let Some(profile) = snapshot.profile else {
                println!("No profile yet.");
                return Ok(());
            };
            println!("Objectives: {}", profile.objectives);
            println!("Time constraints: {}", profile.time_constraints);
            for &tier in PriorityTier::all() {
                let muscles = profile.priority_muscles.tier(tier);
                if !muscles.is_empty() {
                    println!("{:12} {}", tier.name(), muscles.join(", "));
                }
            }
            for (muscle, sets) in &profile.initial_vme {
                println!("VME {:12} {} sets", muscle, sets);
            }
        }

        Commands::Profile {
            action:
                ProfileAction::Set {
                    objectives,
                    time_constraints,
                    max,
                    primary,
                    secondary,
                    tertiary,
                    maintenance,
                    vme,
                },
        } => {
            let tiers = [
                (PriorityTier::Max, max),
                (PriorityTier::Primary, primary),
                (PriorityTier::Secondary, secondary),
                (PriorityTier::Tertiary, tertiary),
                (PriorityTier::Maintenance, maintenance),
            ];
            let mut priorities = PriorityMuscles::default();
            let mut tiers_given = false;
            for (tier, muscles) in tiers {
                if let Some(muscles) = muscles {
                    // An empty list clears the tier
                    priorities.set_tier(tier, muscles);
                    tiers_given = true;
                }
            }

            let patch = ProfilePatch {
                objectives,
                priority_muscles: tiers_given.then_some(priorities),
                initial_vme: parse_vme(&vme)?,
                time_constraints,
            };
            store.save_profile(patch).map_err(report)?;
            println!("Profile saved.");
        }

        Commands::Insight => {
            let snapshot = store.snapshot();
            let Some(latest) = snapshot.logs.last() else {
                println!("No sessions logged yet.");
                return Ok(());
            };
            let generator = config.text_generator().map_err(report)?;
            let text = ai::session_insight(generator.as_ref(), latest)
                .await
                .map_err(report)?;
            println!("{}", text);
        }

        Commands::Suggest { target } => {
            let generator = config.text_generator().map_err(report)?;
            let text = ai::exercise_alternatives(generator.as_ref(), &target)
                .await
                .map_err(report)?;
            println!("{}", text);
        }
    }

    Ok(())
}
