//! Core domain types for Ascend

mod category;
mod habit;
mod moment;
mod user;

pub use category::{Category, CategoryProgress};
pub use habit::{Difficulty, Habit, HabitKind, NewHabit};
pub use moment::Moment;
pub use user::{default_categories, User};
pub(crate) use user::push_unique;
