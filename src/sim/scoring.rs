//! Scoring and streaks

use serde::{Deserialize, Serialize};

use crate::consts::{
    BASE_POINTS, SPEED_BONUS, SPEED_BONUS_WINDOW_MS, STREAK_BONUS_5, STREAK_BONUS_10,
    STREAK_BONUS_REPEAT,
};

/// Breakdown of the points for one answer
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PointsAward {
    pub base_points: u32,
    pub speed_bonus: u32,
    pub streak_bonus: u32,
    pub multiplier: f32,
    pub total_points: u32,
}

/// Running score state
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoringEngine {
    total_score: u64,
    current_streak: u32,
    max_streak: u32,
    correct_count: u32,
    total_count: u32,
}

impl ScoringEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one answer and return the points it earned
    pub fn record_answer(
        &mut self,
        is_correct: bool,
        decision_time_ms: u32,
        level: u32,
    ) -> PointsAward {
        self.total_count += 1;

        if !is_correct {
            self.current_streak = 0;
            return PointsAward::default();
        }

        self.correct_count += 1;
        self.current_streak += 1;
        self.max_streak = self.max_streak.max(self.current_streak);

        let speed_bonus = if decision_time_ms < SPEED_BONUS_WINDOW_MS {
            SPEED_BONUS
        } else {
            0
        };
        let streak_bonus = streak_bonus(self.current_streak);

        // Multiplier in tenths: 1.0 at level 1, +0.2 per level
        let tenths = 10 + 2 * level.max(1).saturating_sub(1);
        let total_points = (BASE_POINTS + speed_bonus) * tenths / 10 + streak_bonus;

        self.total_score += total_points as u64;

        PointsAward {
            base_points: BASE_POINTS,
            speed_bonus,
            streak_bonus,
            multiplier: tenths as f32 / 10.0,
            total_points,
        }
    }

    pub fn score(&self) -> u64 {
        self.total_score
    }

    pub fn streak(&self) -> u32 {
        self.current_streak
    }

    pub fn max_streak(&self) -> u32 {
        self.max_streak
    }

    pub fn correct_count(&self) -> u32 {
        self.correct_count
    }

    pub fn total_count(&self) -> u32 {
        self.total_count
    }

    /// Percentage of correct answers, rounded; 0 before any answer
    pub fn accuracy(&self) -> u32 {
        if self.total_count == 0 {
            return 0;
        }
        (self.correct_count as f64 / self.total_count as f64 * 100.0).round() as u32
    }
}

/// One-time bonuses at 5 and 10, then a repeat bonus at every further multiple of 5
fn streak_bonus(streak: u32) -> u32 {
    match streak {
        5 => STREAK_BONUS_5,
        10 => STREAK_BONUS_10,
        s if s > 10 && s % 5 == 0 => STREAK_BONUS_REPEAT,
        _ => 0,
    }
}
