//! Lane Lingo - an endless-runner vocabulary game
//!
//! Core modules:
//! - `sim`: Deterministic gameplay core (word selection, difficulty, scoring, gates)
//! - `session`: Session facade driven by an external frame tick
//! - `vocab` / `deck`: Built-in vocabulary tables and user-imported decks
//! - `audio`: Cue names and the injected audio sink
//! - `persistence`: Key/value storage abstraction
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod deck;
pub mod highscores;
pub mod persistence;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;
pub mod vocab;

pub use highscores::HighScores;
pub use session::GameSession;
pub use settings::Settings;
pub use tuning::Tuning;
pub use vocab::{Language, Vocabulary, VocabularyProvider, Word};

/// Game configuration constants
pub mod consts {
    /// Number of lanes (left, center, right)
    pub const LANE_COUNT: usize = 3;

    /// Words remembered by the recency buffer
    pub const RECENCY_WINDOW: usize = 20;

    /// Highest difficulty level
    pub const MAX_LEVEL: u32 = 6;
    /// Correct answers needed per level step
    pub const CORRECT_PER_LEVEL: u32 = 50;

    /// Per-level (speed multiplier, decision window ms), index 0 = level 1
    pub const LEVEL_TABLE: [(f32, u32); MAX_LEVEL as usize] = [
        (1.00, 3000),
        (1.05, 2700),
        (1.10, 2400),
        (1.15, 2100),
        (1.20, 1800),
        (1.25, 1500),
    ];

    /// Scoring
    pub const BASE_POINTS: u32 = 100;
    pub const SPEED_BONUS: u32 = 50;
    /// Answers faster than this earn the speed bonus
    pub const SPEED_BONUS_WINDOW_MS: u32 = 1000;
    pub const STREAK_BONUS_5: u32 = 200;
    pub const STREAK_BONUS_10: u32 = 500;
    /// Awarded at every multiple of 5 past 10
    pub const STREAK_BONUS_REPEAT: u32 = 300;

    /// Lives
    pub const STARTING_LIVES: u8 = 3;
    pub const MAX_LIVES: u8 = 3;
    /// Every Nth correct answer restores a life
    pub const LIFE_BONUS_EVERY: u32 = 10;

    /// Category assigned to imported words without one
    pub const DEFAULT_CATEGORY: &str = "custom";
}
