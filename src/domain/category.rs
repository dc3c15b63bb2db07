//! Life categories and per-category progress

use serde::{Deserialize, Serialize};

/// One of the eight fixed life domains a habit contributes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Physical,
    Mental,
    Finance,
    Career,
    Social,
    Learning,
    Creativity,
    Spirituality,
}

impl Category {
    /// Every category, in display order
    pub const ALL: [Category; 8] = [
        Category::Physical,
        Category::Mental,
        Category::Finance,
        Category::Career,
        Category::Social,
        Category::Learning,
        Category::Creativity,
        Category::Spirituality,
    ];

    /// Parse a category from a string (supports short aliases)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "physical" | "health" | "body" => Some(Category::Physical),
            "mental" | "mind" => Some(Category::Mental),
            "finance" | "finances" | "money" => Some(Category::Finance),
            "career" | "work" => Some(Category::Career),
            "social" | "relationships" => Some(Category::Social),
            "learning" | "study" => Some(Category::Learning),
            "creativity" | "creative" | "art" => Some(Category::Creativity),
            "spirituality" | "spirit" => Some(Category::Spirituality),
            _ => None,
        }
    }

    /// Canonical identifier, also the document key
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Physical => "physical",
            Category::Mental => "mental",
            Category::Finance => "finance",
            Category::Career => "career",
            Category::Social => "social",
            Category::Learning => "learning",
            Category::Creativity => "creativity",
            Category::Spirituality => "spirituality",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Physical => "Physical Health",
            Category::Mental => "Mental Health",
            Category::Finance => "Finances",
            Category::Career => "Career",
            Category::Social => "Relationships",
            Category::Learning => "Learning",
            Category::Creativity => "Creativity",
            Category::Spirituality => "Spirituality",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Level and experience of a single category
///
/// `needed_exp` is stored alongside the level so documents are
/// self-describing, but it is always recomputed from the level table
/// when progress changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryProgress {
    pub level: u32,
    pub current_exp: u32,
    pub needed_exp: u32,
}

impl Default for CategoryProgress {
    fn default() -> Self {
        Self {
            level: 1,
            current_exp: 0,
            needed_exp: 150,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_aliases() {
        assert_eq!(Category::from_str("money"), Some(Category::Finance));
        assert_eq!(Category::from_str("PHYSICAL"), Some(Category::Physical));
        assert_eq!(Category::from_str("cooking"), None);
        for category in Category::ALL {
            assert_eq!(Category::from_str(category.as_str()), Some(category));
        }
    }

    #[test]
    fn test_category_map_keys_serialize_as_strings() {
        let mut map = std::collections::BTreeMap::new();
        map.insert(Category::Finance, CategoryProgress::default());
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(
            json,
            r#"{"finance":{"level":1,"currentExp":0,"neededExp":150}}"#
        );
    }
}
