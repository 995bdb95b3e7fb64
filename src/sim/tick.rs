//! Per-frame simulation tick
//!
//! Gate lifecycle: spawn -> travel -> resolve (once) -> retire, in spawn order.
//! Progress is recomputed from the game clock each tick rather than accumulated.

use super::difficulty::DifficultySettings;
use super::selector::Lane;
use super::state::{EndReason, GameEvent, GamePhase, GameState, Gate};
use crate::vocab::VocabularyProvider;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Requested lane (one-shot)
    pub lane: Option<Lane>,
    /// Pause toggle
    pub pause: bool,
}

/// Begin the run: spawn the first gate at time zero
pub fn start(state: &mut GameState, vocab: &dyn VocabularyProvider) {
    if state.phase != GamePhase::Ready {
        return;
    }
    state.phase = GamePhase::Running;
    state.used_custom_deck = vocab.active_deck().is_some();
    log::info!(
        "Run started (seed {}, {}{})",
        state.seed,
        vocab.language().as_str(),
        if state.used_custom_deck { ", custom deck" } else { "" }
    );

    let settings = state.difficulty.settings();
    spawn_gate(state, settings, vocab);
}

/// End the run early
pub fn quit(state: &mut GameState) {
    if matches!(state.phase, GamePhase::Running | GamePhase::Paused) {
        end_game(state, EndReason::Quit);
    }
}

/// Advance the game by `dt_ms` milliseconds of wall time
pub fn tick(
    state: &mut GameState,
    input: &TickInput,
    dt_ms: f64,
    vocab: &dyn VocabularyProvider,
) {
    // Handle pause toggle
    if input.pause {
        match state.phase {
            GamePhase::Running => {
                state.phase = GamePhase::Paused;
                state.events.push(GameEvent::Paused);
                return;
            }
            GamePhase::Paused => {
                state.phase = GamePhase::Running;
                state.events.push(GameEvent::Resumed);
            }
            _ => {}
        }
    }

    // Don't tick unless running
    if state.phase != GamePhase::Running {
        return;
    }

    state.clock_ms += dt_ms.max(0.0);
    let now = state.clock_ms;

    // Difficulty follows the correct count from previous ticks
    let (settings, level_change) = state.difficulty.update(state.scoring.correct_count());
    if level_change.is_some() {
        state.events.push(GameEvent::LevelUp { settings });
    }

    state.distance +=
        state.tuning.run_speed * settings.speed_multiplier as f64 * dt_ms.max(0.0) / 1000.0;

    state.player.update(now);
    if let Some(lane) = input.lane {
        request_lane(state, lane);
    }

    let spawn_due = state.gates.is_empty()
        || now - state.last_spawn_at > state.tuning.spacing_ms(settings.speed_multiplier);
    if spawn_due {
        spawn_gate(state, settings, vocab);
    }

    let travel_ms = state.tuning.travel_ms(settings.speed_multiplier);
    for gate in state.gates.iter_mut() {
        gate.advance(now, travel_ms);
    }

    resolve_gates(state, settings);
    if state.phase == GamePhase::GameOver {
        return;
    }

    retire_gates(state);
}

/// Move the player, respecting the lane-change lock
fn request_lane(state: &mut GameState, lane: Lane) {
    let from = state.player.lane;
    if state
        .player
        .try_move(lane, state.clock_ms, state.tuning.lane_move_ms)
    {
        state.events.push(GameEvent::LaneChanged { from, to: lane });
    }
}

fn spawn_gate(state: &mut GameState, settings: DifficultySettings, vocab: &dyn VocabularyProvider) {
    let Some(question) = state.selector.select_question(settings.level, vocab) else {
        if state.pool_empty {
            log::debug!("Still no words for level {}", settings.level);
        } else {
            log::warn!("No words available for level {}; gate not spawned", settings.level);
            state.pool_empty = true;
        }
        return;
    };
    state.pool_empty = false;

    let id = state.next_gate_id();
    log::debug!(
        "Spawn gate {} at {:.0}ms: '{}' ({:?})",
        id,
        state.clock_ms,
        question.prompt(),
        question.correct_lane
    );
    state.gates.push_back(Gate::new(id, question, state.clock_ms));
    state.last_spawn_at = state.clock_ms;
    state.events.push(GameEvent::GateSpawned { gate_id: id });

    if state.gates.len() == 1 {
        promote_front(state, settings);
    }
}

/// Publish the oldest gate's prompt and restart the decision timer
fn promote_front(state: &mut GameState, settings: DifficultySettings) {
    let Some(gate) = state.gates.front() else {
        state.current_gate = None;
        return;
    };

    let event = GameEvent::PromptChanged {
        gate_id: gate.id,
        prompt: gate.question.prompt().to_string(),
        mode: gate.question.mode,
        decision_window_ms: settings.decision_window_ms,
    };
    state.current_gate = Some(gate.id);
    state.decision_started_at = state.clock_ms;
    state.events.push(event);
}

/// Check every gate that crossed the collision threshold, exactly once each
fn resolve_gates(state: &mut GameState, settings: DifficultySettings) {
    let threshold = state.tuning.collision_threshold;

    for i in 0..state.gates.len() {
        if state.phase == GamePhase::GameOver {
            break;
        }

        let gate = &state.gates[i];
        if gate.resolved || gate.progress < threshold {
            continue;
        }

        let gate_id = gate.id;
        let correct_lane = gate.question.correct_lane;
        let answer = gate.question.correct_answer().to_string();
        let shown_at = if state.current_gate == Some(gate_id) {
            state.decision_started_at
        } else {
            gate.spawned_at
        };
        let decision_ms = (state.clock_ms - shown_at).max(0.0).round() as u32;

        let chosen = state.player.lane;
        let is_correct = chosen == correct_lane;

        let gate = &mut state.gates[i];
        gate.resolved = true;
        gate.answered_correctly = Some(is_correct);

        let award = state
            .scoring
            .record_answer(is_correct, decision_ms, settings.level);
        log::debug!(
            "Gate {} resolved: {} in {}ms (+{})",
            gate_id,
            if is_correct { "correct" } else { "incorrect" },
            decision_ms,
            award.total_points
        );

        if is_correct {
            state.events.push(GameEvent::AnswerCorrect {
                gate_id,
                lane: chosen,
                answer,
                decision_ms,
                award,
            });
            if award.streak_bonus > 0 {
                state.events.push(GameEvent::StreakBonus {
                    streak: state.scoring.streak(),
                    bonus: award.streak_bonus,
                });
            }

            let every = state.tuning.life_bonus_every;
            if every > 0
                && state.scoring.correct_count() % every == 0
                && state.lives < state.tuning.max_lives
            {
                state.lives += 1;
                state.events.push(GameEvent::LifeGained { lives: state.lives });
            }
        } else {
            state.events.push(GameEvent::AnswerIncorrect {
                gate_id,
                chosen,
                correct_lane,
                answer,
            });
            state.lives = state.lives.saturating_sub(1);
            state.events.push(GameEvent::LifeLost { lives: state.lives });

            if state.lives == 0 {
                end_game(state, EndReason::OutOfLives);
            }
        }
    }
}

/// Remove gates past the retirement threshold, oldest first
fn retire_gates(state: &mut GameState) {
    let threshold = state.tuning.retire_threshold;

    while state
        .gates
        .front()
        .is_some_and(|g| g.progress > threshold)
    {
        let Some(gate) = state.gates.pop_front() else {
            break;
        };
        state.events.push(GameEvent::GateRetired { gate_id: gate.id });

        if state.current_gate == Some(gate.id) {
            let settings = state.difficulty.settings();
            promote_front(state, settings);
        }
    }
}

fn end_game(state: &mut GameState, reason: EndReason) {
    let stats = state.stats(reason);
    log::info!(
        "Game over ({:?}): score {}, {}/{} correct, level {}",
        reason,
        stats.final_score,
        stats.correct_answers,
        stats.total_answers,
        stats.final_level
    );
    state.phase = GamePhase::GameOver;
    state.final_stats = Some(stats.clone());
    state.events.push(GameEvent::GameOver(stats));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::selector::Lane;
    use crate::tuning::Tuning;
    use crate::vocab::{Language, Vocabulary};
    use proptest::prelude::*;

    const DT: f64 = 1000.0 / 60.0;

    fn running(seed: u64) -> (GameState, Vocabulary) {
        let vocab = Vocabulary::builtin(Language::Mandarin);
        let mut state = GameState::new(seed, Tuning::default());
        start(&mut state, &vocab);
        (state, vocab)
    }

    fn steer(lane: Lane) -> TickInput {
        TickInput {
            lane: Some(lane),
            ..Default::default()
        }
    }

    fn wrong_lane(state: &GameState) -> Option<Lane> {
        let correct = state.current_question()?.correct_lane;
        Lane::ALL.into_iter().find(|&l| l != correct)
    }

    #[test]
    fn test_start_spawns_first_gate() {
        let (state, _) = running(1);
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.gates.len(), 1);
        assert_eq!(state.current_gate, Some(state.gates[0].id));
        assert!(
            state
                .events
                .iter()
                .any(|e| matches!(e, GameEvent::PromptChanged { .. }))
        );
    }

    #[test]
    fn test_tick_ignored_before_start() {
        let vocab = Vocabulary::builtin(Language::Mandarin);
        let mut state = GameState::new(1, Tuning::default());
        tick(&mut state, &TickInput::default(), DT, &vocab);
        assert_eq!(state.clock_ms, 0.0);
        assert!(state.gates.is_empty());
    }

    #[test]
    fn test_progress_from_elapsed_time() {
        let (mut state, vocab) = running(2);
        tick(&mut state, &TickInput::default(), 2500.0, &vocab);
        assert!((state.gates[0].progress - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_spawn_cadence() {
        let (mut state, vocab) = running(3);
        tick(&mut state, &TickInput::default(), 2000.0, &vocab);
        assert_eq!(state.gates.len(), 1, "spawn requires strictly more than the spacing");
        tick(&mut state, &TickInput::default(), 1.0, &vocab);
        assert_eq!(state.gates.len(), 2);
        // The second gate does not steal the prompt
        assert_eq!(state.current_gate, Some(state.gates[0].id));
    }

    #[test]
    fn test_resolution_fires_once() {
        let (mut state, vocab) = running(4);
        let correct = state.current_question().unwrap().correct_lane;
        tick(&mut state, &steer(correct), DT, &vocab);

        // Step to just past the collision threshold
        tick(&mut state, &TickInput::default(), 4800.0, &vocab);
        assert!(state.gates[0].resolved);
        assert_eq!(state.scoring.total_count(), 1);

        for _ in 0..20 {
            tick(&mut state, &TickInput::default(), 10.0, &vocab);
        }
        assert_eq!(state.scoring.total_count(), 1);
        assert_eq!(state.gates[0].answered_correctly, Some(true));
    }

    #[test]
    fn test_retirement_promotes_next_gate() {
        let (mut state, vocab) = running(5);
        let first = state.gates[0].id;
        let mut t = 0.0;
        while t < 5800.0 {
            tick(&mut state, &TickInput::default(), DT, &vocab);
            t += DT;
        }
        assert!(state.gates.iter().all(|g| g.id != first));
        let front = state.gates.front().unwrap().id;
        assert_eq!(state.current_gate, Some(front));
        assert!(state.clock_ms - state.decision_started_at < 1000.0);
        assert!(
            state
                .events
                .iter()
                .any(|e| *e == GameEvent::GateRetired { gate_id: first })
        );
    }

    #[test]
    fn test_pause_freezes_clock() {
        let (mut state, vocab) = running(6);
        tick(&mut state, &TickInput::default(), 1000.0, &vocab);
        let progress = state.gates[0].progress;

        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &pause, 1000.0, &vocab);
        assert_eq!(state.phase, GamePhase::Paused);
        for _ in 0..100 {
            tick(&mut state, &steer(Lane::Left), 1000.0, &vocab);
        }
        assert_eq!(state.gates[0].progress, progress);
        assert_eq!(state.player.lane, Lane::Center, "input ignored while paused");

        // Resume tick advances normally
        tick(&mut state, &pause, 100.0, &vocab);
        assert_eq!(state.phase, GamePhase::Running);
        assert!((state.clock_ms - 1100.0).abs() < 1e-9);
    }

    #[test]
    fn test_lane_change_locked_while_moving() {
        let (mut state, vocab) = running(7);
        state.events.clear();
        tick(&mut state, &steer(Lane::Left), DT, &vocab);
        tick(&mut state, &steer(Lane::Right), DT, &vocab);
        assert_eq!(state.player.lane, Lane::Left);

        for _ in 0..10 {
            tick(&mut state, &TickInput::default(), DT, &vocab);
        }
        tick(&mut state, &steer(Lane::Right), DT, &vocab);
        assert_eq!(state.player.lane, Lane::Right);

        let changes = state
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::LaneChanged { .. }))
            .count();
        assert_eq!(changes, 2);
    }

    #[test]
    fn test_three_misses_end_the_game() {
        let (mut state, vocab) = running(8);
        let mut guard = 0;
        while state.phase != GamePhase::GameOver && guard < 10_000 {
            let input = TickInput {
                lane: wrong_lane(&state),
                ..Default::default()
            };
            tick(&mut state, &input, DT, &vocab);
            guard += 1;
        }

        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.lives, 0);
        let stats = state.final_stats.clone().unwrap();
        assert_eq!(stats.correct_answers, 0);
        assert_eq!(stats.total_answers, 3);
        assert_eq!(stats.reason, EndReason::OutOfLives);

        // Further ticks are no-ops
        let clock = state.clock_ms;
        tick(&mut state, &TickInput::default(), 1000.0, &vocab);
        assert_eq!(state.clock_ms, clock);
    }

    #[test]
    fn test_empty_pool_spawns_nothing_until_words_exist() {
        let empty = Vocabulary::builtin(Language::Custom);
        let mut state = GameState::new(11, Tuning::default());
        start(&mut state, &empty);
        assert!(state.pool_empty);
        for _ in 0..60 {
            tick(&mut state, &TickInput::default(), DT, &empty);
        }
        assert!(state.gates.is_empty());
        assert!(state.pool_empty);
        assert_eq!(state.current_gate, None);

        let vocab = Vocabulary::builtin(Language::Mandarin);
        tick(&mut state, &TickInput::default(), DT, &vocab);
        assert_eq!(state.gates.len(), 1);
        assert!(!state.pool_empty);
        assert_eq!(state.current_gate, Some(state.gates[0].id));
    }

    #[test]
    fn test_quit_records_stats() {
        let (mut state, vocab) = running(9);
        tick(&mut state, &TickInput::default(), 1000.0, &vocab);
        quit(&mut state);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.final_stats.as_ref().unwrap().reason, EndReason::Quit);
        assert!(state.distance > 0.0);
    }

    proptest! {
        #[test]
        fn prop_progress_monotonic(steps in proptest::collection::vec(0.0f64..200.0, 1..50)) {
            let (mut state, vocab) = running(10);
            let id = state.gates[0].id;
            let mut last = 0.0;
            for dt in steps {
                tick(&mut state, &TickInput::default(), dt, &vocab);
                match state.gates.iter().find(|g| g.id == id) {
                    Some(gate) => {
                        prop_assert!(gate.progress >= last);
                        last = gate.progress;
                    }
                    None => break,
                }
            }
        }
    }
}
