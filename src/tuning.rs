//! Data-driven game balance
//!
//! Gate timing and life rules. Defaults are the shipped tuning; a JSON file
//! may override any subset of fields.

use serde::{Deserialize, Serialize};

use crate::consts::{LIFE_BONUS_EVERY, MAX_LIVES, STARTING_LIVES};

#[derive(Debug, thiserror::Error)]
pub enum TuningError {
    #[error("invalid tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning: {0}")]
    Invalid(&'static str),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Time for a gate to reach the player at speed 1.0
    pub base_travel_ms: f64,
    /// Time between spawns at speed 1.0
    pub base_spacing_ms: f64,
    /// Progress at which the answer is checked
    pub collision_threshold: f64,
    /// Progress past which a gate is removed
    pub retire_threshold: f64,
    /// Duration of the lane-change lock
    pub lane_move_ms: f64,
    /// Distance units per second at speed 1.0
    pub run_speed: f64,
    pub starting_lives: u8,
    pub max_lives: u8,
    /// Every Nth correct answer restores a life (0 disables)
    pub life_bonus_every: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            base_travel_ms: 5000.0,
            base_spacing_ms: 2000.0,
            collision_threshold: 0.96,
            retire_threshold: 1.15,
            lane_move_ms: 150.0,
            run_speed: 10.0,
            starting_lives: STARTING_LIVES,
            max_lives: MAX_LIVES,
            life_bonus_every: LIFE_BONUS_EVERY,
        }
    }
}

impl Tuning {
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn validate(&self) -> Result<(), TuningError> {
        if self.base_travel_ms <= 0.0 || self.base_spacing_ms <= 0.0 {
            return Err(TuningError::Invalid("travel and spacing times must be positive"));
        }
        if self.collision_threshold <= 0.0 || self.retire_threshold <= self.collision_threshold {
            return Err(TuningError::Invalid(
                "retire threshold must exceed a positive collision threshold",
            ));
        }
        if self.starting_lives == 0 || self.starting_lives > self.max_lives {
            return Err(TuningError::Invalid("starting lives must be within 1..=max_lives"));
        }
        if self.lane_move_ms < 0.0 || self.run_speed < 0.0 {
            return Err(TuningError::Invalid("lane move time and run speed must not be negative"));
        }
        Ok(())
    }

    /// Travel time at a given speed multiplier
    pub fn travel_ms(&self, speed_multiplier: f32) -> f64 {
        self.base_travel_ms / speed_multiplier.max(f32::EPSILON) as f64
    }

    /// Spawn interval at a given speed multiplier
    pub fn spacing_ms(&self, speed_multiplier: f32) -> f64 {
        self.base_spacing_ms / speed_multiplier.max(f32::EPSILON) as f64
    }

    /// Time a promoted prompt is shown before its gate collides, when gates follow
    /// each other at the regular spacing
    pub fn prompt_lead_ms(&self, speed_multiplier: f32) -> f64 {
        let overlap = (self.retire_threshold - self.collision_threshold)
            * self.travel_ms(speed_multiplier);
        self.spacing_ms(speed_multiplier) - overlap
    }
}
