//! Habit streaks and the daily rollover

use chrono::{Days, NaiveDate};

use super::events::LedgerEvent;
use super::LedgerError;
use crate::domain::{Habit, User};
use crate::store::{run_transaction, DocumentStore};

/// Count `today` as a completion day. Returns the new streak.
///
/// Completing the day after the last completion extends the streak;
/// any longer gap restarts it.
pub fn extend(habit: &mut Habit, today: NaiveDate) -> u32 {
    habit.streak = match habit.last_completed {
        Some(last) if last == today => habit.streak.max(1),
        Some(last) if last.checked_add_days(Days::new(1)) == Some(today) => habit.streak + 1,
        _ => 1,
    };
    habit.last_completed = Some(today);
    habit.streak
}

/// Undo the most recent completion day
pub fn retract(habit: &mut Habit) {
    let Some(last) = habit.last_completed else {
        return;
    };
    habit.streak = habit.streak.saturating_sub(1);
    habit.last_completed = if habit.streak > 0 {
        last.checked_sub_days(Days::new(1))
    } else {
        None
    };
}

/// Break the streak after a relapse or a missed day
pub fn break_streak(habit: &mut Habit) -> bool {
    let had_streak = habit.streak > 0;
    habit.streak = 0;
    had_streak
}

/// What a daily rollover changed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DayRollover {
    /// Habits whose completed flag was cleared for the new day
    pub cleared: Vec<String>,
    pub events: Vec<LedgerEvent>,
}

/// Start a new day for `user_id`.
///
/// Habits completed before `today` become uncompleted again (rewards are
/// kept) and streaks not extended yesterday are broken.
pub fn start_day(
    store: &dyn DocumentStore,
    max_attempts: u32,
    user_id: &str,
    today: NaiveDate,
) -> Result<DayRollover, LedgerError> {
    let yesterday = today.checked_sub_days(Days::new(1));

    run_transaction(store, max_attempts, |tx| {
        let mut user: User = tx
            .get(user_id)?
            .ok_or_else(|| LedgerError::user_not_found(user_id))?;

        let mut rollover = DayRollover::default();
        let ids: Vec<String> = user.habit_ids().cloned().collect();

        for id in ids {
            let Some(mut habit) = tx.get::<Habit>(&id)? else {
                tracing::debug!(user_id, habit_id = %id, "Skipping missing habit during rollover");
                continue;
            };
            let mut changed = false;

            if habit.completed && habit.last_completed.is_none_or(|d| d < today) {
                habit.completed = false;
                user.completed_habits.retain(|h| h != &habit.id);
                rollover.cleared.push(habit.id.clone());
                changed = true;
            }

            let stale = match (habit.last_completed, yesterday) {
                (Some(last), Some(yesterday)) => last < yesterday,
                (None, _) => true,
                _ => false,
            };
            if stale && break_streak(&mut habit) {
                rollover.events.push(LedgerEvent::StreakBroken {
                    habit_id: habit.id.clone(),
                });
                changed = true;
            }

            if changed {
                tx.put(&habit)?;
            }
        }

        if !rollover.cleared.is_empty() {
            tx.put(&user)?;
        }
        Ok(rollover)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Category, Difficulty, HabitKind, NewHabit};
    use chrono::Utc;

    fn habit() -> Habit {
        Habit::new(
            "h1".into(),
            "u1".into(),
            NewHabit {
                name: "Read".into(),
                kind: HabitKind::Good,
                difficulty: Difficulty::Easy,
                category: Category::Learning,
            },
            Utc::now(),
        )
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn test_consecutive_days_extend() {
        let mut h = habit();
        assert_eq!(extend(&mut h, day(1)), 1);
        assert_eq!(extend(&mut h, day(2)), 2);
        assert_eq!(extend(&mut h, day(3)), 3);
        assert_eq!(extend(&mut h, day(5)), 1);
    }

    #[test]
    fn test_retract_restores_previous_day() {
        let mut h = habit();
        extend(&mut h, day(1));
        extend(&mut h, day(2));
        retract(&mut h);
        assert_eq!(h.streak, 1);
        assert_eq!(h.last_completed, Some(day(1)));

        retract(&mut h);
        assert_eq!(h.streak, 0);
        assert_eq!(h.last_completed, None);

        // Extending again behaves as if the retracted days never happened
        assert_eq!(extend(&mut h, day(2)), 1);
    }

    #[test]
    fn test_break_streak_reports_loss() {
        let mut h = habit();
        assert!(!break_streak(&mut h));
        extend(&mut h, day(1));
        assert!(break_streak(&mut h));
        assert_eq!(h.streak, 0);
    }
}
