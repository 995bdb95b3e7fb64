//! Audio cues
//!
//! The core only names cues; synthesis lives outside the crate behind
//! `AudioSink`. A sink is passed into each session, so tests can record cues.

use serde::{Deserialize, Serialize};

use crate::settings::Settings;
use crate::sim::GameEvent;
use crate::sim::state::EndReason;

/// Sound cue names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundCue {
    /// Player started a lane change
    LaneChange,
    /// Gate answered correctly
    Correct,
    /// Gate answered incorrectly
    Incorrect,
    /// A life was lost
    LifeLost,
    /// Streak bonus awarded
    StreakBonus,
    /// Difficulty level increased
    LevelUp,
    /// Out of lives
    GameOver,
}

impl SoundCue {
    pub fn as_str(&self) -> &'static str {
        match self {
            SoundCue::LaneChange => "lane_change",
            SoundCue::Correct => "correct",
            SoundCue::Incorrect => "incorrect",
            SoundCue::LifeLost => "life_lost",
            SoundCue::StreakBonus => "streak_bonus",
            SoundCue::LevelUp => "level_up",
            SoundCue::GameOver => "game_over",
        }
    }

    /// Cue announcing an event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::LaneChanged { .. } => Some(SoundCue::LaneChange),
            GameEvent::AnswerCorrect { .. } => Some(SoundCue::Correct),
            GameEvent::AnswerIncorrect { .. } => Some(SoundCue::Incorrect),
            GameEvent::LifeLost { .. } => Some(SoundCue::LifeLost),
            GameEvent::StreakBonus { .. } => Some(SoundCue::StreakBonus),
            GameEvent::LevelUp { .. } => Some(SoundCue::LevelUp),
            GameEvent::GameOver(stats) if stats.reason == EndReason::OutOfLives => {
                Some(SoundCue::GameOver)
            }
            _ => None,
        }
    }
}

/// Fire-and-forget cue output
pub trait AudioSink {
    fn play(&mut self, cue: SoundCue);
}

/// Discards every cue
#[derive(Debug, Default, Clone, Copy)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, _cue: SoundCue) {}
}

/// Keeps every cue in order
#[derive(Debug, Default, Clone)]
pub struct RecordingAudio {
    pub cues: Vec<SoundCue>,
}

impl RecordingAudio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, cue: SoundCue) -> usize {
        self.cues.iter().filter(|&&c| c == cue).count()
    }
}

impl AudioSink for RecordingAudio {
    fn play(&mut self, cue: SoundCue) {
        self.cues.push(cue);
    }
}

/// Volume-aware sink for headless runs; cues go to the log
#[derive(Debug, Clone)]
pub struct AudioManager {
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
    played: u64,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
            played: 0,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        let mut audio = Self::new();
        audio.set_master_volume(settings.master_volume);
        audio.set_sfx_volume(settings.sfx_volume);
        audio.set_muted(settings.muted);
        audio
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Cues actually played (not muted)
    pub fn played(&self) -> u64 {
        self.played
    }
}

impl AudioSink for AudioManager {
    fn play(&mut self, cue: SoundCue) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        self.played += 1;
        log::debug!("♪ {} (vol {:.2})", cue.as_str(), vol);
    }
}
