//! Deterministic gameplay core
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time only enters through the `dt` passed to `tick`
//! - Seeded RNG only
//! - Gates are processed in spawn order
//! - No rendering, audio or platform dependencies

pub mod difficulty;
pub mod scoring;
pub mod selector;
pub mod state;
pub mod tick;

pub use difficulty::{DifficultyController, DifficultySettings, level_for_correct};
pub use scoring::{PointsAward, ScoringEngine};
pub use selector::{
    AnswerOption, Lane, PromptDirection, Question, QuestionMode, RecencyBuffer, WordSelector,
};
pub use state::{EndReason, GameEvent, GameOverStats, GamePhase, GameState, Gate, PlayerLane};
pub use tick::{TickInput, quit, start, tick};
