//! Category progress arithmetic: experience carry-over across levels

use super::levels::{Level, MAX_LEVEL, MIN_LEVEL};
use crate::domain::CategoryProgress;

impl CategoryProgress {
    /// Progress at `level` with `current_exp`, `needed_exp` taken from the table
    pub fn at(level: u32, current_exp: u32) -> Self {
        let level = level.clamp(MIN_LEVEL, MAX_LEVEL);
        Self {
            level,
            current_exp,
            needed_exp: Level::needed_exp(level),
        }
    }

    /// Add experience, levelling up while the threshold is met.
    ///
    /// Experience keeps accumulating once the max level is reached.
    pub fn gain(&self, xp: u32) -> Self {
        let mut level = self.level.clamp(MIN_LEVEL, MAX_LEVEL);
        let mut remaining = u64::from(self.current_exp) + u64::from(xp);

        while level < MAX_LEVEL && remaining >= u64::from(Level::needed_exp(level)) {
            remaining -= u64::from(Level::needed_exp(level));
            level += 1;
        }

        Self::at(level, remaining.min(u64::from(u32::MAX)) as u32)
    }

    /// Remove experience, levelling down while it goes negative.
    ///
    /// Floors at level 1 with 0 experience.
    pub fn lose(&self, xp: u32) -> Self {
        let mut level = self.level.clamp(MIN_LEVEL, MAX_LEVEL);
        let mut remaining = i64::from(self.current_exp) - i64::from(xp);

        while level > MIN_LEVEL && remaining < 0 {
            level -= 1;
            remaining += i64::from(Level::needed_exp(level));
        }

        Self::at(level, remaining.max(0) as u32)
    }

    /// Apply a signed experience delta
    pub fn apply(&self, delta: i64) -> Self {
        let magnitude = delta.unsigned_abs().min(u64::from(u32::MAX)) as u32;
        if delta >= 0 {
            self.gain(magnitude)
        } else {
            self.lose(magnitude)
        }
    }

    pub fn title(&self) -> &'static str {
        Level::get(self.level).title
    }

    /// Progress towards the next level (0.0 - 1.0)
    pub fn fraction(&self) -> f32 {
        if self.needed_exp == 0 {
            1.0
        } else {
            (self.current_exp as f32 / self.needed_exp as f32).min(1.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gain_levels_up_with_carry() {
        let p = CategoryProgress::default().gain(200);
        assert_eq!(p, CategoryProgress::at(2, 50));
        assert_eq!(p.needed_exp, 300);
    }

    #[test]
    fn test_gain_crosses_several_levels() {
        // 150 + 300 + 500 = 950 to reach level 4
        let p = CategoryProgress::default().gain(1000);
        assert_eq!((p.level, p.current_exp, p.needed_exp), (4, 50, 750));
    }

    #[test]
    fn test_lose_levels_down_with_borrow() {
        let p = CategoryProgress::at(2, 50).lose(100);
        assert_eq!((p.level, p.current_exp, p.needed_exp), (1, 100, 150));
    }

    #[test]
    fn test_lose_to_exact_zero_stays_on_level() {
        let p = CategoryProgress::at(2, 100).lose(100);
        assert_eq!((p.level, p.current_exp), (2, 0));
    }

    #[test]
    fn test_lose_floors_at_level_one() {
        assert_eq!(CategoryProgress::at(1, 30).lose(100), CategoryProgress::at(1, 0));
        assert_eq!(CategoryProgress::at(3, 10).lose(100_000), CategoryProgress::at(1, 0));
    }

    #[test]
    fn test_max_level_is_a_ceiling() {
        let p = CategoryProgress::at(9, 2700).gain(100);
        assert_eq!((p.level, p.current_exp, p.needed_exp), (10, 50, 0));

        let more = p.gain(10_000);
        assert_eq!(more.level, 10);
        assert_eq!(more.current_exp, 10_050);
        assert!((more.fraction() - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_gain_then_lose_round_trips() {
        for level in 1..MAX_LEVEL {
            let needed = Level::needed_exp(level);
            for exp in [0, needed / 2, needed - 1] {
                let start = CategoryProgress::at(level, exp);
                for delta in [0u32, 1, 50, 149, 150, 200, 999, 5000, 20_000] {
                    let back = start.gain(delta).lose(delta);
                    assert_eq!(back, start, "level {level} exp {exp} delta {delta}");
                }
            }
        }
    }

    #[test]
    fn test_level_always_in_range() {
        let mut p = CategoryProgress::default();
        for delta in [500i64, -3000, 40_000, -1, -100_000, 7] {
            p = p.apply(delta);
            assert!((MIN_LEVEL..=MAX_LEVEL).contains(&p.level));
            assert_eq!(p.needed_exp, Level::needed_exp(p.level));
        }
    }
}
