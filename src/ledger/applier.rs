//! Habit completion toggles
//!
//! One toggle moves category experience, coins, the completed-habit list,
//! the habit's completed flag and its streak together, or nothing at all.

use chrono::NaiveDate;

use super::events::{LedgerEvent, LevelChange};
use super::streaks;
use super::LedgerError;
use crate::domain::{push_unique, CategoryProgress, Habit, User};
use crate::store::{run_transaction, DocumentStore};

/// Which way a habit is being toggled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Complete,
    Uncomplete,
}

impl Direction {
    /// Completed flag the habit ends up with
    fn target_state(&self) -> bool {
        matches!(self, Direction::Complete)
    }
}

/// Result of a toggle
#[derive(Debug, Clone, PartialEq)]
pub enum ToggleOutcome {
    /// Rewards moved; carries the committed category progress and balance
    Applied {
        events: Vec<LedgerEvent>,
        progress: CategoryProgress,
        coins: u64,
    },
    /// The habit was already in the requested state; nothing was written
    Unchanged,
}

impl ToggleOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, ToggleOutcome::Applied { .. })
    }
}

/// Complete or uncomplete `habit_id` for `user_id` in a single transaction.
///
/// The habit's completed flag is read inside the transaction, so racing
/// toggles in the same direction apply the reward exactly once.
pub fn toggle_habit(
    store: &dyn DocumentStore,
    max_attempts: u32,
    user_id: &str,
    habit_id: &str,
    direction: Direction,
    today: NaiveDate,
) -> Result<ToggleOutcome, LedgerError> {
    run_transaction(store, max_attempts, |tx| {
        let mut user: User = tx
            .get(user_id)?
            .ok_or_else(|| LedgerError::user_not_found(user_id))?;
        let mut habit: Habit = tx
            .get(habit_id)?
            .ok_or_else(|| LedgerError::habit_not_found(habit_id))?;

        if habit.owner != user.id {
            return Err(LedgerError::habit_not_found(habit_id));
        }
        if habit.completed == direction.target_state() {
            return Ok(ToggleOutcome::Unchanged);
        }

        let mut events = Vec::new();
        let after = move_rewards(&mut user, &mut habit, direction, &mut events)?;

        match direction {
            Direction::Complete => {
                let count = streaks::extend(&mut habit, today);
                events.push(LedgerEvent::StreakExtended {
                    habit_id: habit.id.clone(),
                    count,
                });
            }
            Direction::Uncomplete => streaks::retract(&mut habit),
        }

        tx.put(&user)?;
        tx.put(&habit)?;

        Ok(ToggleOutcome::Applied {
            events,
            progress: after,
            coins: user.coins,
        })
    })
}

/// Move the habit's experience and coins in `direction` and flip its
/// completed flag. Streaks are left to the caller.
pub(super) fn move_rewards(
    user: &mut User,
    habit: &mut Habit,
    direction: Direction,
    events: &mut Vec<LedgerEvent>,
) -> Result<CategoryProgress, LedgerError> {
    let before = *user
        .categories
        .get(&habit.category)
        .ok_or_else(|| LedgerError::NotFound {
            entity: "category",
            id: format!("{}/{}", user.id, habit.category),
        })?;
    let coins_before = user.coins;

    let after = match direction {
        Direction::Complete => {
            user.coins = user.coins.saturating_add(habit.coin_reward);
            push_unique(&mut user.completed_habits, &habit.id);
            events.push(LedgerEvent::XpAwarded {
                category: habit.category,
                amount: habit.xp_reward,
            });
            before.gain(habit.xp_reward)
        }
        Direction::Uncomplete => {
            user.coins = user.coins.saturating_sub(habit.coin_reward);
            user.completed_habits.retain(|h| h != &habit.id);
            events.push(LedgerEvent::XpRevoked {
                category: habit.category,
                amount: habit.xp_reward,
            });
            before.lose(habit.xp_reward)
        }
    };

    if let Some(change) = LevelChange::between(habit.category, &before, &after) {
        events.push(change);
    }
    if user.coins != coins_before {
        events.push(LedgerEvent::CoinsChanged {
            before: coins_before,
            after: user.coins,
        });
    }

    habit.completed = direction.target_state();
    user.categories.insert(habit.category, after);
    Ok(after)
}
