//! Game session
//!
//! Owns one run's `GameState` plus its injected collaborators. An external
//! frame loop calls `update` with the elapsed time; input arrives between
//! frames and is consumed by the next update.

use crate::audio::{AudioSink, NullAudio, SoundCue};
use crate::sim::{
    self, GameEvent, GameOverStats, GamePhase, GameState, Lane, QuestionMode, TickInput,
};
use crate::tuning::Tuning;
use crate::vocab::VocabularyProvider;

/// What the prompt display needs
#[derive(Debug, Clone, PartialEq)]
pub struct PromptView {
    pub gate_id: u32,
    pub prompt: String,
    /// Pronunciation of the prompt word when the prompt shows target text
    pub pronunciation: Option<String>,
    pub mode: QuestionMode,
    pub decision_window_ms: u32,
    /// Time since the prompt appeared
    pub elapsed_ms: f64,
}

/// What a renderer needs per gate
#[derive(Debug, Clone, PartialEq)]
pub struct GateView {
    pub id: u32,
    pub progress: f64,
    pub resolved: bool,
    pub answered_correctly: Option<bool>,
    /// (lane, label) ordered by lane
    pub options: Vec<(Lane, String)>,
}

/// HUD numbers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hud {
    pub score: u64,
    pub lives: u8,
    pub level: u32,
    pub distance: f64,
    pub streak: u32,
    pub accuracy: u32,
}

pub struct GameSession<A: AudioSink = NullAudio> {
    state: GameState,
    vocab: Box<dyn VocabularyProvider>,
    audio: A,
    input: TickInput,
    events: Vec<GameEvent>,
}

impl<A: AudioSink> GameSession<A> {
    pub fn new(vocab: Box<dyn VocabularyProvider>, audio: A, tuning: Tuning, seed: u64) -> Self {
        Self {
            state: GameState::new(seed, tuning),
            vocab,
            audio,
            input: TickInput::default(),
            events: Vec::new(),
        }
    }

    /// Begin the run (no-op unless freshly constructed)
    pub fn start(&mut self) {
        self.input = TickInput::default();
        sim::start(&mut self.state, self.vocab.as_ref());
        self.dispatch_events();
    }

    /// Advance by one frame of `dt_ms` milliseconds
    pub fn update(&mut self, dt_ms: f64) {
        if self.state.phase == GamePhase::GameOver {
            return;
        }
        let input = std::mem::take(&mut self.input);
        sim::tick(&mut self.state, &input, dt_ms, self.vocab.as_ref());
        self.dispatch_events();
    }

    /// Queue a lane change for the next update. Ignored unless a run is in progress.
    pub fn request_lane(&mut self, lane: Lane) {
        if self.in_progress() {
            self.input.lane = Some(lane);
        }
    }

    /// Queue a pause/resume toggle for the next update. Ignored unless a run is in progress.
    pub fn toggle_pause(&mut self) {
        if self.in_progress() {
            self.input.pause = !self.input.pause;
        }
    }

    fn in_progress(&self) -> bool {
        matches!(self.state.phase, GamePhase::Running | GamePhase::Paused)
    }

    /// End the run now
    pub fn quit(&mut self) {
        sim::quit(&mut self.state);
        self.input = TickInput::default();
        self.dispatch_events();
    }

    /// Throw the run away and start a fresh one with the same collaborators
    pub fn restart(&mut self, seed: u64) {
        let tuning = self.state.tuning.clone();
        self.state = GameState::new(seed, tuning);
        self.input = TickInput::default();
        self.events.clear();
        log::info!("Restarting with seed {}", seed);
        self.start();
    }

    /// One cue per event, in order
    fn dispatch_events(&mut self) {
        for event in self.state.events.drain(..) {
            if let Some(cue) = SoundCue::for_event(&event) {
                self.audio.play(cue);
            }
            self.events.push(event);
        }
    }

    /// Events since the last drain, oldest first
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn is_over(&self) -> bool {
        self.state.phase == GamePhase::GameOver
    }

    pub fn hud(&self) -> Hud {
        Hud {
            score: self.state.scoring.score(),
            lives: self.state.lives,
            level: self.state.level(),
            distance: self.state.distance,
            streak: self.state.scoring.streak(),
            accuracy: self.state.scoring.accuracy(),
        }
    }

    pub fn player_lane(&self) -> Lane {
        self.state.player.lane
    }

    pub fn current_prompt(&self) -> Option<PromptView> {
        let gate = self.state.current_gate()?;
        let question = &gate.question;
        let pronunciation = match question.mode.direction {
            sim::PromptDirection::ShowTarget if !question.correct_word.pronunciation.is_empty() => {
                Some(question.correct_word.pronunciation.clone())
            }
            _ => None,
        };
        Some(PromptView {
            gate_id: gate.id,
            prompt: question.prompt().to_string(),
            pronunciation,
            mode: question.mode,
            decision_window_ms: self.state.difficulty.settings().decision_window_ms,
            elapsed_ms: self.state.clock_ms - self.state.decision_started_at,
        })
    }

    pub fn gates(&self) -> Vec<GateView> {
        self.state
            .gates
            .iter()
            .map(|gate| GateView {
                id: gate.id,
                progress: gate.progress,
                resolved: gate.resolved,
                answered_correctly: gate.answered_correctly,
                options: gate
                    .question
                    .options
                    .iter()
                    .map(|o| (o.lane, gate.question.mode.answer_text(&o.word).to_string()))
                    .collect(),
            })
            .collect()
    }

    pub fn final_stats(&self) -> Option<&GameOverStats> {
        self.state.final_stats.as_ref()
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn audio_mut(&mut self) -> &mut A {
        &mut self.audio
    }
}
