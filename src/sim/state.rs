//! Game state and core simulation types
//!
//! Everything a session mutates lives here and is owned by one `GameState`.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::difficulty::{DifficultyController, DifficultySettings};
use super::scoring::{PointsAward, ScoringEngine};
use super::selector::{Lane, Question, QuestionMode, WordSelector};
use crate::tuning::Tuning;

/// Current phase of the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Constructed, waiting for start
    Ready,
    /// Gates spawning and moving
    Running,
    /// Clock frozen, input ignored
    Paused,
    /// Run ended; ticks are no-ops
    GameOver,
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    OutOfLives,
    Quit,
}

/// Player lane and the lane-change lock
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerLane {
    pub lane: Lane,
    /// Game time at which the current lane change finishes
    locked_until: Option<f64>,
}

impl PlayerLane {
    pub fn is_moving(&self) -> bool {
        self.locked_until.is_some()
    }

    /// Release the lock once the transition has finished
    pub fn update(&mut self, now: f64) {
        if self.locked_until.is_some_and(|until| now >= until) {
            self.locked_until = None;
        }
    }

    /// Start a move to `lane`. Ignored while moving or if already there.
    pub fn try_move(&mut self, lane: Lane, now: f64, duration_ms: f64) -> bool {
        if self.is_moving() || lane == self.lane {
            return false;
        }
        self.lane = lane;
        self.locked_until = Some(now + duration_ms);
        true
    }
}

/// A question travelling toward the player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Gate {
    pub id: u32,
    pub question: Question,
    /// Game time of spawn (ms)
    pub spawned_at: f64,
    /// 0 at spawn, 1 at the player; keeps growing until retirement
    pub progress: f64,
    pub resolved: bool,
    /// Set when resolved
    pub answered_correctly: Option<bool>,
}

impl Gate {
    pub fn new(id: u32, question: Question, spawned_at: f64) -> Self {
        Self {
            id,
            question,
            spawned_at,
            progress: 0.0,
            resolved: false,
            answered_correctly: None,
        }
    }

    /// Recompute progress from elapsed game time
    pub fn advance(&mut self, now: f64, travel_ms: f64) {
        self.progress = (now - self.spawned_at).max(0.0) / travel_ms;
    }
}

/// Final run snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameOverStats {
    pub final_score: u64,
    pub distance: f64,
    pub correct_answers: u32,
    pub total_answers: u32,
    pub accuracy: u32,
    pub max_streak: u32,
    pub final_level: u32,
    pub used_custom_deck: bool,
    pub reason: EndReason,
}

/// Transient events for renderers and the audio layer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum GameEvent {
    GateSpawned {
        gate_id: u32,
    },
    /// A new prompt is now displayed
    PromptChanged {
        gate_id: u32,
        prompt: String,
        mode: QuestionMode,
        decision_window_ms: u32,
    },
    LaneChanged {
        from: Lane,
        to: Lane,
    },
    AnswerCorrect {
        gate_id: u32,
        lane: Lane,
        answer: String,
        decision_ms: u32,
        award: PointsAward,
    },
    AnswerIncorrect {
        gate_id: u32,
        chosen: Lane,
        correct_lane: Lane,
        answer: String,
    },
    StreakBonus {
        streak: u32,
        bonus: u32,
    },
    LifeLost {
        lives: u8,
    },
    LifeGained {
        lives: u8,
    },
    LevelUp {
        settings: DifficultySettings,
    },
    GateRetired {
        gate_id: u32,
    },
    Paused,
    Resumed,
    GameOver(GameOverStats),
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    pub seed: u64,
    pub tuning: Tuning,
    pub phase: GamePhase,
    /// Game clock (ms); only advances while running
    pub clock_ms: f64,
    pub lives: u8,
    pub distance: f64,
    /// Active gates, oldest first
    pub gates: VecDeque<Gate>,
    /// Gate whose prompt is displayed
    pub current_gate: Option<u32>,
    /// Game time the current prompt was shown
    pub decision_started_at: f64,
    pub last_spawn_at: f64,
    pub player: PlayerLane,
    pub selector: WordSelector,
    pub scoring: ScoringEngine,
    pub difficulty: DifficultyController,
    pub used_custom_deck: bool,
    /// Set while the word pool cannot produce a question
    pub pool_empty: bool,
    /// Pending events, drained by the session
    pub events: Vec<GameEvent>,
    pub final_stats: Option<GameOverStats>,
    next_gate_id: u32,
}

impl GameState {
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        Self {
            seed,
            lives: tuning.starting_lives,
            tuning,
            phase: GamePhase::Ready,
            clock_ms: 0.0,
            distance: 0.0,
            gates: VecDeque::new(),
            current_gate: None,
            decision_started_at: 0.0,
            last_spawn_at: 0.0,
            player: PlayerLane::default(),
            selector: WordSelector::new(seed),
            scoring: ScoringEngine::new(),
            difficulty: DifficultyController::new(),
            used_custom_deck: false,
            pool_empty: false,
            events: Vec::new(),
            final_stats: None,
            next_gate_id: 1,
        }
    }

    pub fn next_gate_id(&mut self) -> u32 {
        let id = self.next_gate_id;
        self.next_gate_id += 1;
        id
    }

    pub fn current_gate(&self) -> Option<&Gate> {
        let id = self.current_gate?;
        self.gates.iter().find(|g| g.id == id)
    }

    /// Question behind the displayed prompt
    pub fn current_question(&self) -> Option<&Question> {
        self.current_gate().map(|g| &g.question)
    }

    pub fn level(&self) -> u32 {
        self.difficulty.level()
    }

    pub fn stats(&self, reason: EndReason) -> GameOverStats {
        GameOverStats {
            final_score: self.scoring.score(),
            distance: self.distance,
            correct_answers: self.scoring.correct_count(),
            total_answers: self.scoring.total_count(),
            accuracy: self.scoring.accuracy(),
            max_streak: self.scoring.max_streak(),
            final_level: self.difficulty.level(),
            used_custom_deck: self.used_custom_deck,
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lane_lock() {
        let mut player = PlayerLane::default();
        assert_eq!(player.lane, Lane::Center);

        assert!(player.try_move(Lane::Left, 0.0, 150.0));
        assert!(player.is_moving());
        assert!(!player.try_move(Lane::Right, 100.0, 150.0));
        assert_eq!(player.lane, Lane::Left);

        player.update(149.0);
        assert!(player.is_moving());
        player.update(150.0);
        assert!(!player.is_moving());
        assert!(!player.try_move(Lane::Left, 150.0, 150.0), "same lane is a no-op");
        assert!(player.try_move(Lane::Right, 150.0, 150.0));
    }

    #[test]
    fn test_new_state() {
        let state = GameState::new(1, Tuning::default());
        assert_eq!(state.phase, GamePhase::Ready);
        assert_eq!(state.lives, 3);
        assert!(state.gates.is_empty());
        assert!(state.current_question().is_none());
        assert_eq!(state.level(), 1);
    }
}
