//! Habit records and their difficulty table

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::Category;

/// How hard a habit is. Fixes its experience, coin and life-loss values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn xp(&self) -> u32 {
        match self {
            Difficulty::Easy => 50,
            Difficulty::Medium => 100,
            Difficulty::Hard => 200,
        }
    }

    pub fn coins(&self) -> u64 {
        match self {
            Difficulty::Easy => 10,
            Difficulty::Medium => 20,
            Difficulty::Hard => 40,
        }
    }

    /// Life lost when a bad habit of this difficulty relapses
    pub fn life_loss(&self) -> u32 {
        match self {
            Difficulty::Easy => 5,
            Difficulty::Medium => 10,
            Difficulty::Hard => 20,
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "e" | "easy" => Some(Difficulty::Easy),
            "m" | "medium" => Some(Difficulty::Medium),
            "h" | "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

/// Whether the habit is one to build or one to break
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HabitKind {
    Good,
    Bad,
}

impl HabitKind {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "g" | "good" => Some(HabitKind::Good),
            "b" | "bad" => Some(HabitKind::Bad),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HabitKind::Good => "good",
            HabitKind::Bad => "bad",
        }
    }
}

/// A user-defined habit document
///
/// For a bad habit, "completed" means it was resisted today.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    pub id: String,
    /// Id of the user who owns the habit
    pub owner: String,
    pub name: String,
    pub kind: HabitKind,
    pub difficulty: Difficulty,
    pub category: Category,
    pub xp_reward: u32,
    pub coin_reward: u64,
    #[serde(default)]
    pub completed: bool,

    /// Consecutive days completed, ending at `last_completed`
    #[serde(default)]
    pub streak: u32,
    #[serde(default)]
    pub last_completed: Option<NaiveDate>,

    /// Times a bad habit was given in to
    #[serde(default)]
    pub relapses: u32,

    pub created_at: DateTime<Utc>,
}

/// Input for creating a habit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewHabit {
    pub name: String,
    pub kind: HabitKind,
    pub difficulty: Difficulty,
    pub category: Category,
}

impl Habit {
    /// Build a fresh, uncompleted habit with rewards taken from its difficulty
    pub fn new(id: String, owner: String, spec: NewHabit, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            owner,
            name: spec.name,
            kind: spec.kind,
            difficulty: spec.difficulty,
            category: spec.category,
            xp_reward: spec.difficulty.xp(),
            coin_reward: spec.difficulty.coins(),
            completed: false,
            streak: 0,
            last_completed: None,
            relapses: 0,
            created_at,
        }
    }
}
