//! The user document

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Category, CategoryProgress, HabitKind};

/// A user's reward state, owned by the document store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    pub coins: u64,
    pub current_life: u32,
    pub max_life: u32,

    #[serde(default)]
    pub categories: BTreeMap<Category, CategoryProgress>,

    /// Ids of owned good habits
    #[serde(default, rename = "ghabits")]
    pub good_habits: Vec<String>,
    /// Ids of owned bad habits
    #[serde(default, rename = "bhabits")]
    pub bad_habits: Vec<String>,
    /// Ids of habits currently marked completed
    #[serde(default)]
    pub completed_habits: Vec<String>,

    #[serde(default)]
    pub friends: Vec<String>,
    /// Incoming friend requests (requester ids)
    #[serde(default)]
    pub friend_requests: Vec<String>,

    /// Moment ids bought since the last weekly reset
    #[serde(default)]
    pub moments_bought: Vec<String>,

    #[serde(default)]
    pub last_reset: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// A new user with full life and every category at its defaults
    pub fn new(id: String, username: String, life: u32, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            username,
            coins: 0,
            current_life: life,
            max_life: life,
            categories: default_categories(),
            good_habits: Vec::new(),
            bad_habits: Vec::new(),
            completed_habits: Vec::new(),
            friends: Vec::new(),
            friend_requests: Vec::new(),
            moments_bought: Vec::new(),
            last_reset: None,
            created_at,
        }
    }

    pub fn owns_habit(&self, habit_id: &str) -> bool {
        self.good_habits.iter().any(|h| h == habit_id)
            || self.bad_habits.iter().any(|h| h == habit_id)
    }

    pub fn habit_ids(&self) -> impl Iterator<Item = &String> {
        self.good_habits.iter().chain(self.bad_habits.iter())
    }

    pub fn habit_list_mut(&mut self, kind: HabitKind) -> &mut Vec<String> {
        match kind {
            HabitKind::Good => &mut self.good_habits,
            HabitKind::Bad => &mut self.bad_habits,
        }
    }

    /// Drop a habit id from every list that references it
    pub fn forget_habit(&mut self, habit_id: &str) {
        self.good_habits.retain(|h| h != habit_id);
        self.bad_habits.retain(|h| h != habit_id);
        self.completed_habits.retain(|h| h != habit_id);
    }

    pub fn is_friend(&self, other: &str) -> bool {
        self.friends.iter().any(|f| f == other)
    }

    pub fn has_request_from(&self, requester: &str) -> bool {
        self.friend_requests.iter().any(|r| r == requester)
    }
}

/// Every category at level 1 with no experience
pub fn default_categories() -> BTreeMap<Category, CategoryProgress> {
    Category::ALL
        .iter()
        .map(|c| (*c, CategoryProgress::default()))
        .collect()
}

/// Add an id to a list unless it is already present
pub(crate) fn push_unique(list: &mut Vec<String>, id: &str) {
    if !list.iter().any(|x| x == id) {
        list.push(id.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_defaults() {
        let user = User::new("u1".into(), "ada".into(), 100, Utc::now());
        assert_eq!(user.coins, 0);
        assert_eq!(user.current_life, 100);
        assert_eq!(user.categories.len(), 8);
        assert!(user.last_reset.is_none());
        assert!(
            user.categories
                .values()
                .all(|p| *p == CategoryProgress::default())
        );
    }

    #[test]
    fn test_habit_lists_use_document_names() {
        let mut user = User::new("u1".into(), "ada".into(), 100, Utc::now());
        user.habit_list_mut(HabitKind::Good).push("g1".into());
        user.habit_list_mut(HabitKind::Bad).push("b1".into());
        let value = serde_json::to_value(&user).unwrap();
        assert_eq!(value["ghabits"][0], "g1");
        assert_eq!(value["bhabits"][0], "b1");
        assert!(value["lastReset"].is_null());
        assert_eq!(value["currentLife"], 100);
    }

    #[test]
    fn test_forget_habit() {
        let mut user = User::new("u1".into(), "ada".into(), 100, Utc::now());
        user.good_habits.push("g1".into());
        user.completed_habits.push("g1".into());
        user.forget_habit("g1");
        assert!(!user.owns_habit("g1"));
        assert!(user.completed_habits.is_empty());
    }
}
