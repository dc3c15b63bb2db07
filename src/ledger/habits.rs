//! Habit lifecycle: sign-up, creation, deletion, relapses

use chrono::{DateTime, Utc};

use super::applier::{move_rewards, Direction};
use super::events::LedgerEvent;
use super::streaks::break_streak;
use super::LedgerError;
use crate::domain::{Habit, HabitKind, NewHabit, User};
use crate::store::{fetch_doc, run_transaction, DocumentStore};

/// Create a user with full life and every category at level 1
pub fn sign_up(
    store: &dyn DocumentStore,
    max_attempts: u32,
    user_id: &str,
    username: &str,
    starting_life: u32,
    now: DateTime<Utc>,
) -> Result<User, LedgerError> {
    if user_id.trim().is_empty() {
        return Err(LedgerError::Invalid("user id must not be empty".into()));
    }

    run_transaction(store, max_attempts, |tx| {
        if tx.get::<User>(user_id)?.is_some() {
            return Err(LedgerError::AlreadyExists {
                entity: "user",
                id: user_id.to_string(),
            });
        }
        let user = User::new(user_id.to_string(), username.to_string(), starting_life, now);
        tx.put(&user)?;
        Ok(user)
    })
}

/// Read a user outside of a transaction
pub fn load_user(store: &dyn DocumentStore, user_id: &str) -> Result<User, LedgerError> {
    fetch_doc(store, user_id)?.ok_or_else(|| LedgerError::user_not_found(user_id))
}

/// All habits owned by `user_id`, good habits first
pub fn list_habits(store: &dyn DocumentStore, user_id: &str) -> Result<Vec<Habit>, LedgerError> {
    let user = load_user(store, user_id)?;
    let mut habits = Vec::new();
    for id in user.habit_ids() {
        match fetch_doc::<Habit>(store, id)? {
            Some(habit) => habits.push(habit),
            None => tracing::warn!(user_id, habit_id = %id, "User references a missing habit"),
        }
    }
    Ok(habits)
}

/// Create a habit and attach it to its owner
pub fn create_habit(
    store: &dyn DocumentStore,
    max_attempts: u32,
    user_id: &str,
    spec: NewHabit,
    now: DateTime<Utc>,
) -> Result<Habit, LedgerError> {
    if spec.name.trim().is_empty() {
        return Err(LedgerError::Invalid("habit name must not be empty".into()));
    }
    // Id is picked once so a retried body writes the same document
    let habit_id = uuid::Uuid::new_v4().to_string();

    run_transaction(store, max_attempts, |tx| {
        let mut user: User = tx
            .get(user_id)?
            .ok_or_else(|| LedgerError::user_not_found(user_id))?;

        let habit = Habit::new(habit_id.clone(), user.id.clone(), spec.clone(), now);
        user.habit_list_mut(habit.kind).push(habit.id.clone());

        tx.put(&habit)?;
        tx.put(&user)?;
        Ok(habit)
    })
}

/// Delete a habit and every reference to it. Rewards already earned stay.
pub fn delete_habit(
    store: &dyn DocumentStore,
    max_attempts: u32,
    user_id: &str,
    habit_id: &str,
) -> Result<(), LedgerError> {
    run_transaction(store, max_attempts, |tx| {
        let mut user: User = tx
            .get(user_id)?
            .ok_or_else(|| LedgerError::user_not_found(user_id))?;
        let habit: Habit = tx
            .get(habit_id)?
            .ok_or_else(|| LedgerError::habit_not_found(habit_id))?;
        if habit.owner != user.id {
            return Err(LedgerError::habit_not_found(habit_id));
        }

        user.forget_habit(habit_id);
        tx.delete::<Habit>(habit_id);
        tx.put(&user)?;
        Ok(())
    })
}

/// Record giving in to a bad habit: costs life and breaks its streak.
///
/// If the habit was marked resisted today, that completion and its rewards
/// are revoked in the same transaction.
pub fn record_relapse(
    store: &dyn DocumentStore,
    max_attempts: u32,
    user_id: &str,
    habit_id: &str,
) -> Result<Vec<LedgerEvent>, LedgerError> {
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
        if habit.kind != HabitKind::Bad {
            return Err(LedgerError::Invalid(format!(
                "{} is a good habit; only bad habits relapse",
                habit.name
            )));
        }

        let loss = habit.difficulty.life_loss().min(user.current_life);
        user.current_life -= loss;
        habit.relapses += 1;

        let mut events = vec![LedgerEvent::LifeLost {
            amount: loss,
            remaining: user.current_life,
        }];
        // A habit resisted earlier today was not resisted after all
        if habit.completed {
            move_rewards(&mut user, &mut habit, Direction::Uncomplete, &mut events)?;
        }
        if break_streak(&mut habit) {
            events.push(LedgerEvent::StreakBroken {
                habit_id: habit.id.clone(),
            });
        }

        tx.put(&user)?;
        tx.put(&habit)?;
        Ok(events)
    })
}
