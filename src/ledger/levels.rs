//! Category level table
//!
//! Maps each level to the experience needed to reach the next one.

/// Level definition
#[derive(Debug, Clone)]
pub struct Level {
    pub level: u32,
    /// Experience needed to advance to the next level (0 at max level)
    pub needed_exp: u32,
    pub title: &'static str,
}

pub const MIN_LEVEL: u32 = 1;
pub const MAX_LEVEL: u32 = 10;

/// All level definitions (must be sorted by level, one per level)
pub static LEVELS: &[Level] = &[
    Level {
        level: 1,
        needed_exp: 150,
        title: "Novice",
    },
    Level {
        level: 2,
        needed_exp: 300,
        title: "Apprentice",
    },
    Level {
        level: 3,
        needed_exp: 500,
        title: "Adept",
    },
    Level {
        level: 4,
        needed_exp: 750,
        title: "Journeyman",
    },
    Level {
        level: 5,
        needed_exp: 1050,
        title: "Practitioner",
    },
    Level {
        level: 6,
        needed_exp: 1400,
        title: "Expert",
    },
    Level {
        level: 7,
        needed_exp: 1800,
        title: "Veteran",
    },
    Level {
        level: 8,
        needed_exp: 2250,
        title: "Master",
    },
    Level {
        level: 9,
        needed_exp: 2750,
        title: "Grandmaster",
    },
    Level {
        level: 10,
        needed_exp: 0,
        title: "Ascended",
    },
];

impl Level {
    /// Look up a level, clamping out-of-range values into 1..=10
    pub fn get(level: u32) -> &'static Level {
        let index = level.clamp(MIN_LEVEL, MAX_LEVEL) - MIN_LEVEL;
        &LEVELS[index as usize]
    }

    /// Experience required to advance from `level` (0 at max level)
    pub fn needed_exp(level: u32) -> u32 {
        Self::get(level).needed_exp
    }

    pub fn is_max(level: u32) -> bool {
        level >= MAX_LEVEL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_needed_exp_table() {
        let expected = [150, 300, 500, 750, 1050, 1400, 1800, 2250, 2750, 0];
        for (i, needed) in expected.iter().enumerate() {
            assert_eq!(Level::needed_exp(i as u32 + 1), *needed);
        }
    }

    #[test]
    fn test_out_of_range_levels_clamp() {
        assert_eq!(Level::needed_exp(0), 150);
        assert_eq!(Level::needed_exp(11), 0);
        assert_eq!(Level::get(42).level, MAX_LEVEL);
        assert!(Level::is_max(10));
        assert!(!Level::is_max(9));
    }

    #[test]
    fn test_table_is_contiguous() {
        for (i, level) in LEVELS.iter().enumerate() {
            assert_eq!(level.level, i as u32 + 1);
        }
        assert_eq!(LEVELS.len() as u32, MAX_LEVEL);
    }
}
