//! Weekly reset of category progress and life
//!
//! Once per calendar week, on the reset weekday, every category drops back
//! to level 1 and life refills. The check of `last_reset` and the reset
//! itself commit together, so two near-simultaneous triggers reset once.

use chrono::{DateTime, Datelike, Days, NaiveDate, Utc, Weekday};

use super::events::LedgerEvent;
use super::LedgerError;
use crate::domain::{default_categories, User};
use crate::store::{run_transaction, DocumentStore};

/// Whether the current week's reset has happened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetState {
    Pending,
    ResetThisWeek,
}

/// Result of a reset attempt
#[derive(Debug, Clone, PartialEq)]
pub enum ResetOutcome {
    Reset { events: Vec<LedgerEvent> },
    NotDue(ResetState),
}

/// First day of the week containing `date`, weeks starting on `reset_day`
pub fn week_start(date: NaiveDate, reset_day: Weekday) -> NaiveDate {
    let offset = (7 + date.weekday().num_days_from_monday() - reset_day.num_days_from_monday()) % 7;
    date.checked_sub_days(Days::new(u64::from(offset)))
        .unwrap_or(date)
}

/// Reset state for the week containing `now`
pub fn reset_state(last_reset: Option<DateTime<Utc>>, now: DateTime<Utc>, reset_day: Weekday) -> ResetState {
    let Some(last) = last_reset else {
        return ResetState::Pending;
    };
    let this_week = week_start(now.date_naive(), reset_day);
    if week_start(last.date_naive(), reset_day) >= this_week {
        ResetState::ResetThisWeek
    } else {
        ResetState::Pending
    }
}

/// Whether a reset should fire now. `force` skips the weekday check only.
pub fn is_due(last_reset: Option<DateTime<Utc>>, now: DateTime<Utc>, reset_day: Weekday, force: bool) -> bool {
    if !force && now.weekday() != reset_day {
        return false;
    }
    reset_state(last_reset, now, reset_day) == ResetState::Pending
}

/// Reset `user_id`'s week if due
pub fn apply_weekly_reset(
    store: &dyn DocumentStore,
    max_attempts: u32,
    user_id: &str,
    now: DateTime<Utc>,
    reset_day: Weekday,
    force: bool,
) -> Result<ResetOutcome, LedgerError> {
    run_transaction(store, max_attempts, |tx| {
        let mut user: User = tx
            .get(user_id)?
            .ok_or_else(|| LedgerError::user_not_found(user_id))?;

        if !is_due(user.last_reset, now, reset_day, force) {
            return Ok(ResetOutcome::NotDue(reset_state(user.last_reset, now, reset_day)));
        }

        let mut events = vec![LedgerEvent::WeeklyReset];
        if user.current_life < user.max_life {
            events.push(LedgerEvent::LifeRestored {
                amount: user.max_life - user.current_life,
                current: user.max_life,
            });
        }

        user.categories = default_categories();
        user.current_life = user.max_life;
        user.moments_bought.clear();
        user.last_reset = Some(now);
        tx.put(&user)?;

        Ok(ResetOutcome::Reset { events })
    })
}
