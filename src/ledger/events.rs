//! Events reported by ledger operations

use crate::domain::{Category, CategoryProgress};

/// A category level change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelChange {
    pub category: Category,
    pub old_level: u32,
    pub new_level: u32,
    pub new_title: &'static str,
}

impl LevelChange {
    /// `LevelUp`/`LevelDown` event for a progress change, if the level moved
    pub fn between(category: Category, before: &CategoryProgress, after: &CategoryProgress) -> Option<LedgerEvent> {
        let change = LevelChange {
            category,
            old_level: before.level,
            new_level: after.level,
            new_title: after.title(),
        };
        match after.level.cmp(&before.level) {
            std::cmp::Ordering::Greater => Some(LedgerEvent::LevelUp(change)),
            std::cmp::Ordering::Less => Some(LedgerEvent::LevelDown(change)),
            std::cmp::Ordering::Equal => None,
        }
    }
}

/// Things that happened during a committed ledger operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerEvent {
    XpAwarded { category: Category, amount: u32 },
    XpRevoked { category: Category, amount: u32 },
    LevelUp(LevelChange),
    LevelDown(LevelChange),
    CoinsChanged { before: u64, after: u64 },
    StreakExtended { habit_id: String, count: u32 },
    StreakBroken { habit_id: String },
    LifeLost { amount: u32, remaining: u32 },
    LifeRestored { amount: u32, current: u32 },
    WeeklyReset,
}

impl std::fmt::Display for LedgerEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LedgerEvent::XpAwarded { category, amount } => write!(f, "+{} xp in {}", amount, category.label()),
            LedgerEvent::XpRevoked { category, amount } => write!(f, "-{} xp in {}", amount, category.label()),
            LedgerEvent::LevelUp(c) => write!(
                f,
                "{} leveled up: {} -> {} ({})",
                c.category.label(),
                c.old_level,
                c.new_level,
                c.new_title
            ),
            LedgerEvent::LevelDown(c) => write!(
                f,
                "{} dropped a level: {} -> {}",
                c.category.label(),
                c.old_level,
                c.new_level
            ),
            LedgerEvent::CoinsChanged { before, after } => write!(f, "coins {} -> {}", before, after),
            LedgerEvent::StreakExtended { count, .. } => write!(f, "streak {} day(s)", count),
            LedgerEvent::StreakBroken { .. } => write!(f, "streak broken"),
            LedgerEvent::LifeLost { amount, remaining } => write!(f, "-{} life ({} left)", amount, remaining),
            LedgerEvent::LifeRestored { amount, current } => write!(f, "+{} life ({} now)", amount, current),
            LedgerEvent::WeeklyReset => write!(f, "weekly reset: categories back to level 1, life restored"),
        }
    }
}
