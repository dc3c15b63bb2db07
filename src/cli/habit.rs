//! Habit commands

use anyhow::{anyhow, Result};
use clap::Subcommand;

use ascend::ledger::{Ledger, ToggleOutcome};
use ascend::{Category, Difficulty, HabitKind, NewHabit};

#[derive(Subcommand)]
pub enum HabitCommand {
    /// Create a habit
    Add {
        /// Habit name
        name: String,

        /// good or bad
        #[arg(short, long, default_value = "good")]
        kind: String,

        /// easy, medium or hard
        #[arg(short, long, default_value = "medium")]
        difficulty: String,

        /// Category the habit levels up (physical, mental, finance, ...)
        #[arg(short = 'C', long)]
        category: String,
    },

    /// List your habits
    List,

    /// Mark a habit done for today
    Complete {
        /// Habit id
        id: String,
    },

    /// Undo a completion
    Uncomplete {
        /// Habit id
        id: String,
    },

    /// Record a relapse on a bad habit
    Relapse {
        /// Habit id
        id: String,
    },

    /// Delete a habit
    Remove {
        /// Habit id
        id: String,
    },
}

pub async fn habit_command(ledger: &Ledger, user_id: &str, command: HabitCommand) -> Result<()> {
    match command {
        HabitCommand::Add {
            name,
            kind,
            difficulty,
            category,
        } => {
            let spec = NewHabit {
                name,
                kind: HabitKind::from_str(&kind).ok_or_else(|| anyhow!("Unknown habit kind: {}", kind))?,
                difficulty: Difficulty::from_str(&difficulty)
                    .ok_or_else(|| anyhow!("Unknown difficulty: {}", difficulty))?,
                category: Category::from_str(&category)
                    .ok_or_else(|| anyhow!("Unknown category: {}", category))?,
            };
            let habit = ledger.create_habit(user_id, spec).await?;
            println!(
                "Created habit {} '{}' ({}, {}, +{} xp / {} coins)",
                habit.id,
                habit.name,
                habit.category.label(),
                habit.difficulty.as_str(),
                habit.xp_reward,
                habit.coin_reward
            );
        }
        HabitCommand::List => list_habits(ledger, user_id).await?,
        HabitCommand::Complete { id } => {
            report_toggle(ledger.complete_habit(user_id, &id).await?, "already completed");
        }
        HabitCommand::Uncomplete { id } => {
            report_toggle(ledger.uncomplete_habit(user_id, &id).await?, "not completed");
        }
        HabitCommand::Relapse { id } => {
            for event in ledger.record_relapse(user_id, &id).await? {
                println!("{}", event);
            }
        }
        HabitCommand::Remove { id } => {
            ledger.delete_habit(user_id, &id).await?;
            println!("Removed habit {}", id);
        }
    }
    Ok(())
}

async fn list_habits(ledger: &Ledger, user_id: &str) -> Result<()> {
    let habits = ledger.habits(user_id).await?;
    if habits.is_empty() {
        println!("No habits yet. Add one with: ascend habit add <name> --category <category>");
        return Ok(());
    }

    println!("Habits ({}):\n", habits.len());
    for habit in habits {
        let mark = match (habit.kind, habit.completed) {
            (HabitKind::Bad, _) => "!",
            (HabitKind::Good, true) => "x",
            (HabitKind::Good, false) => " ",
        };
        println!(
            "  [{}] {} {} ({}, {})",
            mark,
            habit.id,
            habit.name,
            habit.category.label(),
            habit.difficulty.as_str()
        );
        if habit.streak > 0 {
            println!("      Streak: {} days", habit.streak);
        }
        if habit.relapses > 0 {
            println!("      Relapses: {}", habit.relapses);
        }
    }
    Ok(())
}

fn report_toggle(outcome: ToggleOutcome, unchanged: &str) {
    match outcome {
        ToggleOutcome::Applied {
            events,
            progress,
            coins,
        } => {
            for event in events {
                println!("{}", event);
            }
            println!(
                "Level {} ({}), {}/{} xp, {} coins",
                progress.level,
                progress.title(),
                progress.current_exp,
                progress.needed_exp,
                coins
            );
        }
        ToggleOutcome::Unchanged => println!("Nothing to do: habit {}.", unchanged),
    }
}

/// Start a new day: clear completions and break stale streaks
pub async fn day_command(ledger: &Ledger, user_id: &str) -> Result<()> {
    let rollover = ledger.start_day(user_id).await?;
    if rollover.cleared.is_empty() && rollover.events.is_empty() {
        println!("Nothing to roll over.");
        return Ok(());
    }
    println!("Cleared {} completed habit(s).", rollover.cleared.len());
    for event in rollover.events {
        println!("  {}", event);
    }
    Ok(())
}
