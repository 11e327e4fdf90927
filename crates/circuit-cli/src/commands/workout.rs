use clap::Subcommand;
use circuit_core::{format_time, linearize, workout_summary, Step, StepKind};

use super::play;
use crate::context::{CliResult, Context};

#[derive(Subcommand)]
pub enum WorkoutAction {
    /// List the weeks and days of the active program
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the summary and step list of a scheduled workout
    Preview {
        /// Week key (e.g. "week1")
        week: String,
        /// Day key (e.g. "day1")
        day: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Play a scheduled workout in real time
    Play {
        /// Week key
        week: String,
        /// Day key
        day: String,
        /// Print events as JSON lines instead of status text
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: WorkoutAction) -> CliResult {
    let ctx = Context::load()?;

    match action {
        WorkoutAction::List { json } => list(&ctx, json),
        WorkoutAction::Preview { week, day, json } => preview(&ctx, &week, &day, json),
        WorkoutAction::Play { week, day, json } => play::run(ctx, &week, &day, json),
    }
}

fn list(ctx: &Context, json: bool) -> CliResult {
    let program_id = ctx.program_id()?;

    if json {
        let mut weeks = serde_json::Map::new();
        for week in ctx.catalog.week_keys(&program_id) {
            let mut days = serde_json::Map::new();
            for day in ctx.catalog.days_for_week(&program_id, &week) {
                let template = ctx.catalog.workout_template(&program_id, &week, &day);
                days.insert(day, serde_json::to_value(template)?);
            }
            weeks.insert(week, serde_json::Value::Object(days));
        }
        println!("{}", serde_json::to_string_pretty(&weeks)?);
        return Ok(());
    }

    println!("program: {program_id}");
    for week in ctx.catalog.week_keys(&program_id) {
        println!("{week}");
        for day in ctx.catalog.days_for_week(&program_id, &week) {
            match ctx.catalog.workout_template(&program_id, &week, &day) {
                Some(template) => {
                    let summary = workout_summary(&template);
                    println!(
                        "  {day:<8} {:<24} {}",
                        template.name, summary.estimated_duration_formatted
                    );
                }
                None => println!("  {day:<8} (missing workout)"),
            }
        }
    }
    Ok(())
}

fn preview(ctx: &Context, week: &str, day: &str, json: bool) -> CliResult {
    let program_id = ctx.program_id()?;
    let template = ctx
        .catalog
        .workout_template(&program_id, week, day)
        .ok_or_else(|| format!("no workout scheduled for {week}/{day} in {program_id}"))?;
    let summary = workout_summary(&template);
    let steps = linearize(&template, &ctx.catalog);

    if json {
        let out = serde_json::json!({
            "template": template,
            "summary": summary,
            "steps": steps,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("{}", template.name);
    println!(
        "{} exercises, {} rounds, about {}",
        summary.exercise_count, summary.total_rounds, summary.estimated_duration_formatted
    );
    println!();
    for step in &steps {
        println!("{}", describe(step));
    }
    Ok(())
}

fn describe(step: &Step) -> String {
    let duration = match step.duration_secs() {
        0 => "     ".to_string(),
        secs => format_time(f64::from(secs)),
    };
    let detail = match &step.kind {
        StepKind::BlockStart(s) => format!(
            "== {} ({} rounds x {} drills)",
            s.block_name, s.rounds, s.drill_count
        ),
        StepKind::Work(s) => format!(
            "{} [round {}/{}]",
            s.exercise_name, s.round, s.total_rounds
        ),
        _ => step.label(),
    };
    format!("{:>3}  {duration}  {detail}", step.id)
}
