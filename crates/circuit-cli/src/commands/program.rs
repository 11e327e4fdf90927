use clap::Subcommand;

use crate::context::{CliResult, Context};

#[derive(Subcommand)]
pub enum ProgramAction {
    /// List available programs
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Make a program the active one
    Select {
        /// Program ID
        id: String,
    },
    /// Show the active program's schedule
    Show,
}

pub fn run(action: ProgramAction) -> CliResult {
    let ctx = Context::load()?;

    match action {
        ProgramAction::List { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(ctx.catalog.programs())?);
                return Ok(());
            }
            let active = ctx.program_id().ok();
            for program in ctx.catalog.programs() {
                let marker = if active.as_deref() == Some(program.id.as_str()) {
                    "*"
                } else {
                    " "
                };
                println!("{marker} {:<16} {}", program.id, program.name);
            }
        }
        ProgramAction::Select { id } => {
            ctx.preferences().select_program(&ctx.catalog, &id)?;
            println!("selected program: {id}");
        }
        ProgramAction::Show => {
            let id = ctx.program_id()?;
            let program = ctx
                .catalog
                .program(&id)
                .ok_or_else(|| format!("unknown program: {id}"))?;
            println!("{} ({})", program.name, program.id);
            if !program.description.is_empty() {
                println!("{}", program.description);
            }
            for (week, days) in &program.schedule {
                println!();
                println!("{week}");
                for (day, workout_id) in days {
                    let name = ctx
                        .catalog
                        .workout(workout_id)
                        .map(|w| w.name.as_str())
                        .unwrap_or("(missing)");
                    println!("  {day:<8} {name}");
                }
            }
        }
    }
    Ok(())
}
