//! Adaptive difficulty
//!
//! Level is a step function of the number of correct answers:
//! `level = min(MAX_LEVEL, correct / CORRECT_PER_LEVEL + 1)`.

use serde::{Deserialize, Serialize};

use crate::consts::{CORRECT_PER_LEVEL, LEVEL_TABLE, MAX_LEVEL};

/// Speed and timing derived from a level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultySettings {
    pub level: u32,
    /// Scales gate travel and spawn cadence (higher = faster)
    pub speed_multiplier: f32,
    /// Nominal time to answer, for display only
    pub decision_window_ms: u32,
}

impl DifficultySettings {
    pub fn for_level(level: u32) -> Self {
        let level = level.clamp(1, MAX_LEVEL);
        let (speed_multiplier, decision_window_ms) = LEVEL_TABLE[level as usize - 1];
        Self {
            level,
            speed_multiplier,
            decision_window_ms,
        }
    }
}

/// Level for a given correct-answer count
pub fn level_for_correct(correct: u32) -> u32 {
    (correct / CORRECT_PER_LEVEL + 1).min(MAX_LEVEL)
}

/// Tracks the resolved level and reports transitions
#[derive(Debug, Clone)]
pub struct DifficultyController {
    current: DifficultySettings,
}

impl Default for DifficultyController {
    fn default() -> Self {
        Self::new()
    }
}

impl DifficultyController {
    /// Starts at level 1 without reporting it
    pub fn new() -> Self {
        Self {
            current: DifficultySettings::for_level(1),
        }
    }

    pub fn settings(&self) -> DifficultySettings {
        self.current
    }

    pub fn level(&self) -> u32 {
        self.current.level
    }

    /// Recompute settings from the correct-answer count.
    ///
    /// Returns the new level when it differs from the previously resolved one.
    pub fn update(&mut self, correct_answers: u32) -> (DifficultySettings, Option<u32>) {
        let level = level_for_correct(correct_answers);
        if level == self.current.level {
            return (self.current, None);
        }

        log::info!("Level {} -> {}", self.current.level, level);
        self.current = DifficultySettings::for_level(level);
        (self.current, Some(level))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_level_steps() {
        assert_eq!(level_for_correct(0), 1);
        assert_eq!(level_for_correct(49), 1);
        assert_eq!(level_for_correct(50), 2);
        assert_eq!(level_for_correct(249), 5);
        assert_eq!(level_for_correct(250), 6);
        assert_eq!(level_for_correct(10_000), 6);
    }

    #[test]
    fn test_table_is_ordered() {
        for pair in LEVEL_TABLE.windows(2) {
            assert!(pair[1].0 > pair[0].0, "speed must increase");
            assert!(pair[1].1 < pair[0].1, "window must shrink");
        }
        let first = DifficultySettings::for_level(1);
        assert_eq!(first.speed_multiplier, 1.0);
        assert_eq!(first.decision_window_ms, 3000);
        let last = DifficultySettings::for_level(MAX_LEVEL);
        assert_eq!(last.speed_multiplier, 1.25);
        assert_eq!(last.decision_window_ms, 1500);
    }

    #[test]
    fn test_level_change_reported_once() {
        let mut controller = DifficultyController::new();
        assert_eq!(controller.level(), 1);

        // Initial level is never reported
        assert_eq!(controller.update(0).1, None);
        assert_eq!(controller.update(49).1, None);

        let (settings, change) = controller.update(50);
        assert_eq!(change, Some(2));
        assert_eq!(settings.level, 2);

        // Ties never fire
        assert_eq!(controller.update(50).1, None);
        assert_eq!(controller.update(99).1, None);
        assert_eq!(controller.update(100).1, Some(3));
    }

    #[test]
    fn test_saturates_at_max() {
        let mut controller = DifficultyController::new();
        let mut changes = Vec::new();
        for correct in 0..1000 {
            if let (_, Some(level)) = controller.update(correct) {
                changes.push(level);
            }
        }
        assert_eq!(changes, vec![2, 3, 4, 5, 6]);
        assert_eq!(controller.level(), MAX_LEVEL);
    }

    proptest! {
        #[test]
        fn prop_level_is_monotonic_and_bounded(a in 0u32..100_000, b in 0u32..100_000) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(level_for_correct(lo) <= level_for_correct(hi));
            prop_assert!(level_for_correct(hi) <= MAX_LEVEL);
            prop_assert!(level_for_correct(lo) >= 1);
        }
    }
}
