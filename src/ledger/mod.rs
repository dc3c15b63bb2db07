//! Leveling and reward ledger
//!
//! Turns habit activity into per-category experience, coins and life, and
//! runs the weekly reset. Every mutation is one optimistic transaction
//! against a [`DocumentStore`].
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   async    ┌──────────────┐  blocking pool  ┌───────────────┐
//! │  CLI / app   │ ─────────▶ │    Ledger    │ ──────────────▶ │ DocumentStore │
//! └──────────────┘            └──────────────┘  run_transaction└───────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! let ledger = Ledger::new(Arc::new(SqliteStore::open(&config.database_path())?), config.ledger.clone());
//! let outcome = ledger.complete_habit("ada", &habit_id).await?;
//! ```

mod applier;
mod error;
mod events;
mod friends;
mod habits;
mod levels;
mod progress;
mod shop;
mod streaks;
mod weekly_reset;

pub use applier::{toggle_habit, Direction, ToggleOutcome};
pub use error::LedgerError;
pub use events::{LedgerEvent, LevelChange};
pub use friends::{
    accept_friend_request, decline_friend_request, list_friends, remove_friend, send_friend_request,
    RequestOutcome,
};
pub use habits::{create_habit, delete_habit, list_habits, load_user, record_relapse, sign_up};
pub use levels::{Level, LEVELS, MAX_LEVEL, MIN_LEVEL};
pub use shop::{find_moment, purchase_moment, weekly_offer, CATALOG, OFFER_SIZE};
pub use streaks::{start_day, DayRollover};
pub use weekly_reset::{apply_weekly_reset, is_due, reset_state, week_start, ResetOutcome, ResetState};

use std::sync::Arc;

use chrono::Utc;

use crate::config::LedgerSettings;
use crate::domain::{Habit, Moment, NewHabit, User};
use crate::store::DocumentStore;

/// Async entry point to the ledger
///
/// Cheap to clone; clones share the store handle.
#[derive(Clone)]
pub struct Ledger {
    store: Arc<dyn DocumentStore>,
    settings: LedgerSettings,
}

impl Ledger {
    pub fn new(store: Arc<dyn DocumentStore>, settings: LedgerSettings) -> Self {
        Self { store, settings }
    }

    pub fn settings(&self) -> &LedgerSettings {
        &self.settings
    }

    /// Run a store operation on the blocking pool and log any failure
    async fn run<T, F>(&self, operation: &'static str, user_id: &str, f: F) -> Result<T, LedgerError>
    where
        T: Send + 'static,
        F: FnOnce(&dyn DocumentStore, u32) -> Result<T, LedgerError> + Send + 'static,
    {
        let store = Arc::clone(&self.store);
        let attempts = self.settings.max_transaction_attempts;

        let result = match tokio::task::spawn_blocking(move || f(store.as_ref(), attempts)).await {
            Ok(result) => result,
            Err(e) => Err(e.into()),
        };

        if let Err(e) = &result {
            tracing::warn!(operation, user_id, error = %e, "Ledger operation failed");
        }
        result
    }

    pub async fn sign_up(&self, user_id: &str, username: &str) -> Result<User, LedgerError> {
        let (id, name) = (user_id.to_string(), username.to_string());
        let life = self.settings.starting_life;
        let now = Utc::now();
        let user = self
            .run("sign_up", user_id, move |store, attempts| {
                sign_up(store, attempts, &id, &name, life, now)
            })
            .await?;
        tracing::info!(user_id, "User signed up");
        Ok(user)
    }

    pub async fn user(&self, user_id: &str) -> Result<User, LedgerError> {
        let id = user_id.to_string();
        self.run("load_user", user_id, move |store, _| load_user(store, &id))
            .await
    }

    pub async fn habits(&self, user_id: &str) -> Result<Vec<Habit>, LedgerError> {
        let id = user_id.to_string();
        self.run("list_habits", user_id, move |store, _| list_habits(store, &id))
            .await
    }

    pub async fn create_habit(&self, user_id: &str, spec: NewHabit) -> Result<Habit, LedgerError> {
        let id = user_id.to_string();
        let now = Utc::now();
        let habit = self
            .run("create_habit", user_id, move |store, attempts| {
                create_habit(store, attempts, &id, spec, now)
            })
            .await?;
        tracing::info!(user_id, habit_id = %habit.id, category = %habit.category, "Habit created");
        Ok(habit)
    }

    pub async fn delete_habit(&self, user_id: &str, habit_id: &str) -> Result<(), LedgerError> {
        let (id, habit) = (user_id.to_string(), habit_id.to_string());
        self.run("delete_habit", user_id, move |store, attempts| {
            delete_habit(store, attempts, &id, &habit)
        })
        .await?;
        tracing::info!(user_id, habit_id, "Habit deleted");
        Ok(())
    }

    pub async fn complete_habit(&self, user_id: &str, habit_id: &str) -> Result<ToggleOutcome, LedgerError> {
        self.toggle(user_id, habit_id, Direction::Complete).await
    }

    pub async fn uncomplete_habit(&self, user_id: &str, habit_id: &str) -> Result<ToggleOutcome, LedgerError> {
        self.toggle(user_id, habit_id, Direction::Uncomplete).await
    }

    async fn toggle(&self, user_id: &str, habit_id: &str, direction: Direction) -> Result<ToggleOutcome, LedgerError> {
        let (id, habit) = (user_id.to_string(), habit_id.to_string());
        let today = Utc::now().date_naive();
        let outcome = self
            .run("toggle_habit", user_id, move |store, attempts| {
                toggle_habit(store, attempts, &id, &habit, direction, today)
            })
            .await?;

        match &outcome {
            ToggleOutcome::Applied { events, coins, .. } => {
                tracing::info!(user_id, habit_id, ?direction, coins, "Habit toggled");
                for event in events {
                    tracing::debug!(user_id, %event, "Ledger event");
                }
            }
            ToggleOutcome::Unchanged => {
                tracing::debug!(user_id, habit_id, ?direction, "Habit already in requested state");
            }
        }
        Ok(outcome)
    }

    pub async fn record_relapse(&self, user_id: &str, habit_id: &str) -> Result<Vec<LedgerEvent>, LedgerError> {
        let (id, habit) = (user_id.to_string(), habit_id.to_string());
        self.run("record_relapse", user_id, move |store, attempts| {
            record_relapse(store, attempts, &id, &habit)
        })
        .await
    }

    pub async fn start_day(&self, user_id: &str) -> Result<DayRollover, LedgerError> {
        let id = user_id.to_string();
        let today = Utc::now().date_naive();
        self.run("start_day", user_id, move |store, attempts| {
            start_day(store, attempts, &id, today)
        })
        .await
    }

    /// Run the weekly reset if it is due. `force` ignores the weekday.
    pub async fn weekly_reset(&self, user_id: &str, force: bool) -> Result<ResetOutcome, LedgerError> {
        let id = user_id.to_string();
        let now = Utc::now();
        let reset_day = self.settings.reset_weekday();
        let outcome = self
            .run("weekly_reset", user_id, move |store, attempts| {
                apply_weekly_reset(store, attempts, &id, now, reset_day, force)
            })
            .await?;
        if let ResetOutcome::Reset { .. } = outcome {
            tracing::info!(user_id, "Weekly reset applied");
        }
        Ok(outcome)
    }

    /// This week's shop offer
    pub fn weekly_offer(&self) -> Vec<&'static Moment> {
        weekly_offer(Utc::now(), self.settings.reset_weekday())
    }

    pub async fn purchase_moment(&self, user_id: &str, moment_id: &str) -> Result<Vec<LedgerEvent>, LedgerError> {
        let (id, moment) = (user_id.to_string(), moment_id.to_string());
        let now = Utc::now();
        let reset_day = self.settings.reset_weekday();
        let events = self
            .run("purchase_moment", user_id, move |store, attempts| {
                purchase_moment(store, attempts, &id, &moment, now, reset_day)
            })
            .await?;
        tracing::info!(user_id, moment_id, "Moment purchased");
        Ok(events)
    }

    pub async fn send_friend_request(&self, from: &str, to: &str) -> Result<RequestOutcome, LedgerError> {
        let (a, b) = (from.to_string(), to.to_string());
        self.run("send_friend_request", from, move |store, attempts| {
            send_friend_request(store, attempts, &a, &b)
        })
        .await
    }

    pub async fn accept_friend_request(&self, user_id: &str, requester: &str) -> Result<(), LedgerError> {
        let (a, b) = (user_id.to_string(), requester.to_string());
        self.run("accept_friend_request", user_id, move |store, attempts| {
            accept_friend_request(store, attempts, &a, &b)
        })
        .await
    }

    pub async fn decline_friend_request(&self, user_id: &str, requester: &str) -> Result<(), LedgerError> {
        let (a, b) = (user_id.to_string(), requester.to_string());
        self.run("decline_friend_request", user_id, move |store, attempts| {
            decline_friend_request(store, attempts, &a, &b)
        })
        .await
    }

    pub async fn remove_friend(&self, user_id: &str, friend_id: &str) -> Result<bool, LedgerError> {
        let (a, b) = (user_id.to_string(), friend_id.to_string());
        self.run("remove_friend", user_id, move |store, attempts| {
            remove_friend(store, attempts, &a, &b)
        })
        .await
    }

    pub async fn friends(&self, user_id: &str) -> Result<Vec<User>, LedgerError> {
        let id = user_id.to_string();
        self.run("list_friends", user_id, move |store, _| list_friends(store, &id))
            .await
    }
}
