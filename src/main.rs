use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use colored::*;
use std::path::PathBuf;
use tabled::{settings::Style, Table, Tabled};

use coachrs::batch::{BatchParseConfig, BatchParser};
use coachrs::config::AppConfig;
use coachrs::export::{export_plan_to_file, ExportFormat};
use coachrs::hydration::tracker::{HydrationTracker, ADHERENCE_WINDOW_DAYS, EMPTY_HISTORY_TIP};
use coachrs::hydration::{HydrationModel, WorkoutIntensity};
use coachrs::logging::{init_logging, LogLevel};
use coachrs::models::{WorkoutDay, WorkoutPlan};
use coachrs::storage::{PlanStore, StorageError, StoredPlan};

/// CoachRS - Workout Plan and Hydration CLI
///
/// A Rust-based tool for turning AI-generated workout plan text into
/// structured weekly schedules, with hydration coaching driven by a small
/// decision model.
#[derive(Parser)]
#[command(name = "coachrs")]
#[command(author = "CoachRS Contributors")]
#[command(version = "0.1.0")]
#[command(about = "Workout plan parsing and hydration coaching CLI", long_about = None)]
struct Cli {
    /// Sets a custom config file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase verbosity of output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse workout plan text into structured weekly schedules
    Parse {
        /// Plan files, or a single directory of .md/.txt files
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Training days per week for the rest-day complement
        #[arg(short, long)]
        days_per_week: Option<u8>,

        /// Save parsed plans to the plan database
        #[arg(short, long)]
        save: bool,

        /// Write the parsed plan to a file instead of printing it
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format (json, csv)
        #[arg(short = 'f', long, default_value = "json")]
        format: String,

        /// Number of worker threads (defaults to CPU count)
        #[arg(short = 'j', long)]
        threads: Option<usize>,
    },

    /// List stored plans
    Plans {
        /// Number of recent plans to show
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },

    /// Show a stored plan in detail (latest when no id is given)
    Show {
        /// Plan id
        id: Option<String>,
    },

    /// Export a stored plan to a file
    Export {
        /// Plan id (latest when omitted)
        id: Option<String>,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// Export format (json, csv)
        #[arg(short = 'f', long, default_value = "json")]
        format: String,
    },

    /// Delete a stored plan
    Delete {
        /// Plan id
        id: String,
    },

    /// Track water intake and get reminder guidance
    Hydration {
        #[command(subcommand)]
        command: HydrationCommands,
    },

    /// Configure application settings
    Config {
        /// List all configuration options
        #[arg(short, long)]
        list: bool,

        /// Print the config file path
        #[arg(short, long)]
        path: bool,

        /// Write current settings to the config file
        #[arg(short, long)]
        init: bool,
    },
}

#[derive(Subcommand)]
enum HydrationCommands {
    /// Log a drink
    Log {
        /// Amount in milliliters (defaults to one cup)
        ml: Option<u32>,
    },

    /// Show today's hydration status
    Status,

    /// Show the model's reminder interval and tip
    Tip {
        /// Workout intensity override (light, moderate, intense)
        #[arg(short, long)]
        intensity: Option<String>,
    },

    /// Show or change the daily goal
    Goal {
        /// New goal in milliliters
        ml: Option<u32>,

        /// Derive the goal from body weight in kg
        #[arg(long)]
        from_weight: Option<u32>,

        /// Ambient temperature in Celsius for the weight-based goal
        #[arg(long, default_value = "20")]
        temperature: i32,
    },

    /// Set the default workout intensity used for tips
    Intensity {
        /// Intensity level (light, moderate, intense)
        level: String,
    },

    /// Reset today's intake
    Reset,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = load_config(&cli.config)?;

    let mut log_config = config.logging.clone();
    if cli.verbose > 0 {
        log_config.level = LogLevel::from_verbosity(cli.verbose);
    }
    init_logging(&log_config)?;

    match cli.command {
        Commands::Parse {
            files,
            days_per_week,
            save,
            output,
            format,
            threads,
        } => cmd_parse(&config, files, days_per_week, save, output, &format, threads)?,

        Commands::Plans { limit } => cmd_plans(&config, limit)?,

        Commands::Show { id } => cmd_show(&config, id)?,

        Commands::Export { id, output, format } => cmd_export(&config, id, output, &format)?,

        Commands::Delete { id } => cmd_delete(&config, &id)?,

        Commands::Hydration { command } => {
            let model = HydrationModel::from_builtin();
            match command {
                HydrationCommands::Log { ml } => cmd_hydration_log(&config, ml)?,
                HydrationCommands::Status => cmd_hydration_status(&config, &model)?,
                HydrationCommands::Tip { intensity } => {
                    cmd_hydration_tip(&config, &model, intensity)?
                }
                HydrationCommands::Goal {
                    ml,
                    from_weight,
                    temperature,
                } => cmd_hydration_goal(&mut config, &cli.config, ml, from_weight, temperature)?,
                HydrationCommands::Intensity { level } => {
                    cmd_hydration_intensity(&mut config, &cli.config, &level)?
                }
                HydrationCommands::Reset => cmd_hydration_reset(&config)?,
            }
        }

        Commands::Config { list, path, init } => {
            cmd_config(&mut config, &cli.config, list, path, init)?
        }
    }

    Ok(())
}

fn cmd_parse(
    config: &AppConfig,
    files: Vec<PathBuf>,
    days_per_week: Option<u8>,
    save: bool,
    output: Option<PathBuf>,
    format: &str,
    threads: Option<usize>,
) -> Result<()> {
    let format = ExportFormat::from_str(format)?;
    let days = days_per_week.or(config.settings.default_days_per_week);

    println!("{}", "Parsing workout plans...".green().bold());

    let batch_config = BatchParseConfig {
        num_threads: threads,
        show_progress: files.len() > 1,
        continue_on_error: true,
    };
    let parser = BatchParser::with_config(batch_config, days);

    let (plans, summary) = if files.len() == 1 && files[0].is_dir() {
        parser.parse_directory(&files[0])?
    } else {
        parser.parse_files(&files)?
    };

    for result in &summary.results {
        match (&result.plan, &result.error) {
            (Some(plan), _) => println!(
                "  {} {} ({} days, {} exercises)",
                "✓".green(),
                plan.plan_name,
                plan.weekly_schedule.len(),
                plan.total_exercises()
            ),
            (None, Some(error)) => {
                eprintln!("  {} {}: {}", "✗".red(), result.file_path.display(), error)
            }
            (None, None) => {}
        }
    }
    if !summary.is_fully_successful() {
        eprintln!(
            "{}",
            format!("{} file(s) could not be read", summary.failed_files).yellow()
        );
    }

    if save {
        let mut store = open_store(config)?;
        for plan in &plans {
            match store.store_plan(plan) {
                Ok(id) => println!("  {} Saved '{}' as {}", "✓".green(), plan.plan_name, id),
                Err(StorageError::Duplicate(reason)) => {
                    println!("  {} Skipped '{}': {}", "-".yellow(), plan.plan_name, reason)
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    if let Some(output) = output {
        if plans.len() != 1 {
            anyhow::bail!(
                "--output expects exactly one parsed plan, got {}. Use --save for batches.",
                plans.len()
            );
        }
        export_plan_to_file(&plans[0], format, &output)?;
        println!("{}", format!("✓ Wrote {}", output.display()).green());
    } else if !save {
        for plan in &plans {
            print_plan_overview(plan);
        }
    }

    Ok(())
}

fn cmd_plans(config: &AppConfig, limit: usize) -> Result<()> {
    let store = open_store(config)?;
    let plans = store.list_plans(Some(limit))?;

    if plans.is_empty() {
        println!("No plans stored yet. Parse one with `coachrs parse --save <file>`.");
        return Ok(());
    }

    let rows: Vec<PlanListRow> = plans
        .iter()
        .map(|p| PlanListRow {
            id: p.id.clone(),
            name: p.plan_name.clone(),
            structure: p.structure.clone(),
            days: p.day_count,
            created: p.created_at.format("%Y-%m-%d %H:%M").to_string(),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{}", table);

    Ok(())
}

fn cmd_show(config: &AppConfig, id: Option<String>) -> Result<()> {
    let store = open_store(config)?;
    let stored = resolve_plan(&store, id)?;
    print_plan_details(&stored);

    Ok(())
}

fn cmd_export(
    config: &AppConfig,
    id: Option<String>,
    output: PathBuf,
    format: &str,
) -> Result<()> {
    let format = ExportFormat::from_str(format)?;
    let store = open_store(config)?;
    let stored = resolve_plan(&store, id)?;

    export_plan_to_file(&stored.plan, format, &output)?;
    println!(
        "{}",
        format!("✓ Exported '{}' to {}", stored.plan.plan_name, output.display()).green()
    );

    Ok(())
}

fn cmd_delete(config: &AppConfig, id: &str) -> Result<()> {
    let mut store = open_store(config)?;
    store.delete_plan(id)?;
    println!("{}", format!("✓ Deleted plan {}", id).green());

    Ok(())
}

fn cmd_hydration_log(config: &AppConfig, ml: Option<u32>) -> Result<()> {
    let mut store = open_store(config)?;
    let now = Utc::now();
    let today = now.date_naive();
    let amount = ml.unwrap_or(config.hydration.cup_size_ml);

    let mut tracker = store.load_tracker(config.hydration.daily_goal_ml, today)?;
    tracker.log_intake(amount, now);
    store.save_tracker(&tracker, today)?;

    println!("{}", format!("✓ Logged {} ml", amount).green().bold());
    println!(
        "  Today: {} / {} ml ({}%)",
        tracker.intake_ml,
        tracker.daily_goal_ml,
        tracker.progress_percent().round_dp(0)
    );
    if tracker.intake_ml >= tracker.daily_goal_ml {
        println!("  {}", "Daily goal reached!".green());
    }

    Ok(())
}

fn cmd_hydration_status(config: &AppConfig, model: &HydrationModel) -> Result<()> {
    let store = open_store(config)?;
    let now = Utc::now();
    let today = now.date_naive();
    let tracker = store.load_tracker(config.hydration.daily_goal_ml, today)?;

    println!("{}", "Hydration status".blue().bold());
    println!(
        "  Today: {} / {} ml ({}%)",
        tracker.intake_ml,
        tracker.daily_goal_ml,
        tracker.progress_percent().round_dp(0)
    );
    println!(
        "  Cups: {} down, {} to go ({} ml each)",
        tracker.cups_consumed(config.hydration.cup_size_ml),
        tracker.cups_remaining(config.hydration.cup_size_ml),
        config.hydration.cup_size_ml
    );

    if tracker.history().is_empty() {
        println!("  {}", EMPTY_HISTORY_TIP.yellow());
        return Ok(());
    }

    let adherence = tracker.average_adherence(ADHERENCE_WINDOW_DAYS);
    println!("  7-day adherence: {}%", adherence.round_dp(0));

    let decision = tracker.decision(model, &config.hydration.workout_intensity);
    let interval = config
        .hydration
        .reminder_interval_minutes
        .unwrap_or(decision.interval_minutes);
    println!("  Reminder interval: every {} minutes", interval);

    if let Some(last) = tracker.last_drink {
        println!("  Last drink: {}", last.format("%H:%M"));
    }
    if config.hydration.reminders_enabled && tracker.reminder_due(interval, now) {
        println!("  {}", "Time to drink some water!".yellow().bold());
    }

    Ok(())
}

fn cmd_hydration_tip(
    config: &AppConfig,
    model: &HydrationModel,
    intensity: Option<String>,
) -> Result<()> {
    let store = open_store(config)?;
    let today = Utc::now().date_naive();
    let tracker = store.load_tracker(config.hydration.daily_goal_ml, today)?;

    if tracker.history().is_empty() {
        println!("{}", EMPTY_HISTORY_TIP.yellow());
        return Ok(());
    }

    let requested = intensity.unwrap_or_else(|| config.hydration.workout_intensity.clone());
    let canonical = WorkoutIntensity::parse(&requested)
        .unwrap_or(WorkoutIntensity::Moderate)
        .as_str();
    let decision = tracker.decision(model, canonical);

    println!("{}", "Hydration tip".blue().bold());
    println!(
        "  Drink roughly every {} minutes around {} workouts.",
        decision.interval_minutes, canonical
    );
    println!("  {}", decision.tip_text);

    Ok(())
}

fn cmd_hydration_goal(
    config: &mut AppConfig,
    config_path: &Option<PathBuf>,
    ml: Option<u32>,
    from_weight: Option<u32>,
    temperature: i32,
) -> Result<()> {
    let new_goal = match (ml, from_weight) {
        (Some(ml), _) => Some(ml),
        (None, Some(weight)) => {
            let suggested = HydrationTracker::recommended_goal_ml(weight, temperature);
            println!(
                "  Suggested goal for {} kg at {} C: {} ml",
                weight, temperature, suggested
            );
            Some(suggested)
        }
        (None, None) => None,
    };

    match new_goal {
        Some(goal) => {
            let mut store = open_store(config)?;
            let now = Utc::now();
            let today = now.date_naive();

            let mut tracker = store.load_tracker(config.hydration.daily_goal_ml, today)?;
            tracker.set_goal(goal, now);
            store.save_tracker(&tracker, today)?;

            config.hydration.daily_goal_ml = goal;
            save_config(config, config_path)?;

            println!("{}", format!("✓ Daily goal set to {} ml", goal).green().bold());
        }
        None => {
            println!("  Daily goal: {} ml", config.hydration.daily_goal_ml);
        }
    }

    Ok(())
}

fn cmd_hydration_intensity(
    config: &mut AppConfig,
    config_path: &Option<PathBuf>,
    level: &str,
) -> Result<()> {
    let intensity = WorkoutIntensity::parse(level).with_context(|| {
        format!(
            "Unknown intensity '{}'. Use light, moderate or intense.",
            level
        )
    })?;

    config.hydration.workout_intensity = intensity.as_str().to_string();
    save_config(config, config_path)?;

    println!(
        "{}",
        format!("✓ Default workout intensity set to {}", intensity.as_str())
            .green()
            .bold()
    );

    Ok(())
}

fn cmd_hydration_reset(config: &AppConfig) -> Result<()> {
    let mut store = open_store(config)?;
    let now = Utc::now();
    let today = now.date_naive();

    let mut tracker = store.load_tracker(config.hydration.daily_goal_ml, today)?;
    tracker.reset_day(now);
    store.save_tracker(&tracker, today)?;

    println!("{}", "✓ Today's intake reset".green().bold());

    Ok(())
}

fn cmd_config(
    config: &mut AppConfig,
    config_path: &Option<PathBuf>,
    list: bool,
    path: bool,
    init: bool,
) -> Result<()> {
    if path {
        println!("{}", effective_config_path(config_path).display());
        return Ok(());
    }

    if init {
        save_config(config, config_path)?;
        println!(
            "{}",
            format!(
                "✓ Config written to {}",
                effective_config_path(config_path).display()
            )
            .green()
        );
        return Ok(());
    }

    if list || (!path && !init) {
        let rendered =
            toml::to_string_pretty(config).context("Failed to render configuration")?;
        println!("{}", rendered);
    }

    Ok(())
}

/// One row of the `plans` table
#[derive(Tabled)]
struct PlanListRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Structure")]
    structure: String,
    #[tabled(rename = "Days")]
    days: usize,
    #[tabled(rename = "Created")]
    created: String,
}

/// One row of the schedule overview table
#[derive(Tabled)]
struct DayRow {
    #[tabled(rename = "Day")]
    day: u8,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Focus")]
    focus: String,
    #[tabled(rename = "Minutes")]
    minutes: u32,
    #[tabled(rename = "Exercises")]
    exercises: usize,
}

impl From<&WorkoutDay> for DayRow {
    fn from(day: &WorkoutDay) -> Self {
        Self {
            day: day.day_number,
            name: day.day_name.clone(),
            focus: day.focus.clone(),
            minutes: day.duration,
            exercises: day.exercises.len(),
        }
    }
}

fn print_plan_overview(plan: &WorkoutPlan) {
    println!();
    println!("{}", plan.plan_name.bold());
    if !plan.structure.is_empty() {
        println!("  {}", plan.structure);
    }

    let rows: Vec<DayRow> = plan.weekly_schedule.iter().map(DayRow::from).collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{}", table);

    if !plan.rest_days.is_empty() {
        let days: Vec<String> = plan.rest_days.iter().map(|d| d.to_string()).collect();
        println!("  Rest days: {}", days.join(", "));
    }
}

fn print_plan_details(stored: &StoredPlan) {
    let plan = &stored.plan;

    println!("{}", plan.plan_name.bold());
    println!("  Id: {}", stored.id);
    println!("  Created: {}", stored.created_at.format("%Y-%m-%d %H:%M"));
    if !plan.structure.is_empty() {
        println!("  Structure: {}", plan.structure);
    }
    if !plan.summary.is_empty() {
        println!("  {}", plan.summary);
    }

    for day in &plan.weekly_schedule {
        println!();
        println!(
            "{}",
            format!(
                "Day {}: {} ({} minutes)",
                day.day_number, day.focus, day.duration
            )
            .cyan()
            .bold()
        );
        if !day.warmup.is_empty() {
            println!("  Warmup: {}", day.warmup);
        }
        for (index, exercise) in day.exercises.iter().enumerate() {
            let mut details = Vec::new();
            if !exercise.sets.is_empty() {
                details.push(format!("{} sets", exercise.sets));
            }
            if !exercise.reps.is_empty() {
                details.push(format!("{} reps", exercise.reps));
            }
            if !exercise.rest.is_empty() {
                details.push(format!("rest {}", exercise.rest));
            }
            let suffix = if details.is_empty() {
                String::new()
            } else {
                format!(" ({})", details.join(", "))
            };
            println!("  {}. {}{}", index + 1, exercise.name, suffix);
            if !exercise.notes.is_empty() {
                println!("     {}", exercise.notes.dimmed());
            }
        }
        if !day.cooldown.is_empty() {
            println!("  Cooldown: {}", day.cooldown);
        }
    }

    if !plan.rest_days.is_empty() {
        let days: Vec<String> = plan.rest_days.iter().map(|d| d.to_string()).collect();
        println!();
        println!("  Rest days: {}", days.join(", "));
    }
    if !plan.tips.is_empty() {
        println!();
        println!("{}", "Tips".bold());
        for tip in &plan.tips {
            println!("  - {}", tip);
        }
    }
}

fn resolve_plan(store: &PlanStore, id: Option<String>) -> Result<StoredPlan> {
    match id {
        Some(id) => store
            .get_plan(&id)?
            .with_context(|| format!("No stored plan with id {}", id)),
        None => store
            .latest_plan()?
            .context("No plans stored yet. Parse one with `coachrs parse --save <file>`."),
    }
}

fn load_config(custom: &Option<PathBuf>) -> Result<AppConfig> {
    match custom {
        Some(path) => AppConfig::load_from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => Ok(AppConfig::load_or_default()),
    }
}

fn save_config(config: &mut AppConfig, custom: &Option<PathBuf>) -> Result<()> {
    config.save_to_file(effective_config_path(custom))
}

fn effective_config_path(custom: &Option<PathBuf>) -> PathBuf {
    custom
        .clone()
        .unwrap_or_else(AppConfig::default_config_path)
}

fn open_store(config: &AppConfig) -> Result<PlanStore> {
    let db_path = config.database_path();
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent).with_context(|| {
            format!("Failed to create data directory: {}", parent.display())
        })?;
    }

    PlanStore::open(&db_path)
        .with_context(|| format!("Failed to open plan database: {}", db_path.display()))
}
