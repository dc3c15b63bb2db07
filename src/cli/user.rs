//! User commands: sign-up, status and the weekly reset

use anyhow::Result;

use ascend::ledger::{Ledger, ResetOutcome, ResetState};
use ascend::Category;

pub async fn signup_command(ledger: &Ledger, id: &str, name: Option<&str>) -> Result<()> {
    let user = ledger.sign_up(id, name.unwrap_or(id)).await?;
    println!(
        "Welcome, {}! Life {}/{}, all {} categories at level 1.",
        user.username,
        user.current_life,
        user.max_life,
        user.categories.len()
    );
    Ok(())
}

/// Show coins, life and per-category progress
pub async fn status_command(ledger: &Ledger, user_id: &str) -> Result<()> {
    let user = ledger.user(user_id).await?;

    println!("{} ({})", user.username, user.id);
    println!("  Coins: {}", user.coins);
    println!("  Life:  {}/{}", user.current_life, user.max_life);
    match user.last_reset {
        Some(at) => println!("  Last reset: {}", at.format("%Y-%m-%d")),
        None => println!("  Last reset: never"),
    }
    println!();

    for category in Category::ALL {
        let Some(progress) = user.categories.get(&category) else {
            continue;
        };
        if progress.needed_exp == 0 {
            println!(
                "  {:<16} L{:<2} {:<10} {} xp (max)",
                category.label(),
                progress.level,
                progress.title(),
                progress.current_exp
            );
        } else {
            println!(
                "  {:<16} L{:<2} {:<10} {}/{} xp ({:.0}%)",
                category.label(),
                progress.level,
                progress.title(),
                progress.current_exp,
                progress.needed_exp,
                progress.fraction() * 100.0
            );
        }
    }

    if !user.friend_requests.is_empty() {
        println!();
        println!("  Pending friend requests: {}", user.friend_requests.join(", "));
    }

    Ok(())
}

pub async fn reset_command(ledger: &Ledger, user_id: &str, force: bool) -> Result<()> {
    match ledger.weekly_reset(user_id, force).await? {
        ResetOutcome::Reset { events } => {
            println!("Weekly reset done.");
            for event in events {
                println!("  {}", event);
            }
        }
        ResetOutcome::NotDue(ResetState::ResetThisWeek) => {
            println!("Already reset this week.");
        }
        ResetOutcome::NotDue(ResetState::Pending) => {
            println!(
                "Reset is due on {}. Use --force to reset now.",
                ledger.settings().reset_weekday()
            );
        }
    }
    Ok(())
}
