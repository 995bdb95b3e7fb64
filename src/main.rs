//! Lane Lingo headless runner
//!
//! Plays one run with an autopilot at a fixed step and records the result.

use std::error::Error;
use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::Parser;
use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use lane_lingo::audio::AudioManager;
use lane_lingo::deck;
use lane_lingo::highscores::HighScoreEntry;
use lane_lingo::persistence::FileStorage;
use lane_lingo::sim::{GameEvent, Lane};
use lane_lingo::{GameSession, HighScores, Language, Settings, Tuning, Vocabulary};

/// Fixed simulation step (60 Hz)
const SIM_DT_MS: f64 = 1000.0 / 60.0;
/// Runs longer than this (game clock) are quit
const MAX_RUN_MS: f64 = 30.0 * 60.0 * 1000.0;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Session seed (defaults to the current time)
    #[arg(long)]
    seed: Option<u64>,

    /// Built-in vocabulary: mandarin or arabic (defaults to the saved setting)
    #[arg(long, value_parser = parse_builtin_language)]
    language: Option<Language>,

    /// Delimited word list to import as the active custom deck
    #[arg(long)]
    deck: Option<PathBuf>,

    /// Percentage of prompts the autopilot answers correctly
    #[arg(long, default_value_t = 85, value_parser = clap::value_parser!(u32).range(0..=100))]
    accuracy: u32,

    /// JSON file overriding the default tuning
    #[arg(long)]
    tuning: Option<PathBuf>,

    /// Directory holding settings, deck and high scores
    #[arg(long, default_value = ".lane-lingo")]
    data_dir: PathBuf,
}

fn parse_builtin_language(s: &str) -> Result<Language, String> {
    match s.parse::<Language>() {
        Ok(Language::Custom) => Err("custom decks are selected with --deck".to_string()),
        Ok(language) => Ok(language),
        Err(e) => Err(e.to_string()),
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Picks a lane for each new prompt, right `accuracy`% of the time
struct Autopilot {
    rng: Pcg32,
    accuracy: u32,
    gate_id: Option<u32>,
    target: Lane,
}

impl Autopilot {
    fn new(seed: u64, accuracy: u32) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed ^ 0x5EED),
            accuracy,
            gate_id: None,
            target: Lane::Center,
        }
    }

    fn steer(&mut self, session: &mut GameSession<AudioManager>) {
        let Some(gate) = session.state().current_gate() else {
            return;
        };
        if self.gate_id != Some(gate.id) {
            self.gate_id = Some(gate.id);
            let correct = gate.question.correct_lane;
            self.target = if self.rng.random_range(0..100) < self.accuracy {
                correct
            } else {
                let wrong: Vec<Lane> = Lane::ALL.into_iter().filter(|&l| l != correct).collect();
                wrong[self.rng.random_range(0..wrong.len())]
            };
        }
        if session.player_lane() != self.target {
            session.request_lane(self.target);
        }
    }
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let seed = args.seed.unwrap_or_else(now_ms);
    let mut storage = FileStorage::new(&args.data_dir);
    let settings = Settings::load(&storage);

    let tuning = match &args.tuning {
        Some(path) => Tuning::from_json(&fs::read_to_string(path)?)?,
        None => Tuning::default(),
    };

    if let Some(path) = &args.deck {
        let import = deck::import_deck(&mut storage, &fs::read_to_string(path)?)?;
        println!(
            "Imported {} words from {} ({} rows skipped)",
            import.words.len(),
            path.display(),
            import.errors.len()
        );
    }

    let mut language = args.language.unwrap_or(settings.language);
    if language == Language::Custom {
        language = Language::Mandarin;
    }
    let mut vocab = Vocabulary::builtin(language);
    if let Some(words) = deck::load_deck(&storage) {
        vocab = vocab.with_deck(words);
    }

    log::info!(
        "Starting run: seed {}, {} vocabulary, autopilot accuracy {}%",
        seed,
        language.as_str(),
        args.accuracy
    );

    let mut session = GameSession::new(
        Box::new(vocab),
        AudioManager::from_settings(&settings),
        tuning,
        seed,
    );
    let mut pilot = Autopilot::new(seed, args.accuracy);
    session.start();

    while !session.is_over() {
        if session.state().clock_ms >= MAX_RUN_MS {
            log::info!("Time cap reached, quitting");
            session.quit();
            break;
        }
        pilot.steer(&mut session);
        session.update(SIM_DT_MS);
        for event in session.drain_events() {
            match &event {
                GameEvent::PromptChanged { prompt, .. } => log::debug!("Prompt: {}", prompt),
                GameEvent::AnswerCorrect { answer, award, .. } => {
                    log::debug!("Correct '{}' +{}", answer, award.total_points)
                }
                GameEvent::AnswerIncorrect { answer, .. } => {
                    log::debug!("Incorrect, answer was '{}'", answer)
                }
                GameEvent::LevelUp { settings } => log::info!("Level {}", settings.level),
                _ => {}
            }
        }
    }

    let Some(stats) = session.final_stats() else {
        return Err("run ended without final stats".into());
    };
    println!("{}", serde_json::to_string_pretty(stats)?);
    log::info!("{} cues played", session.audio().played());

    let timestamp = now_ms() as f64;
    let mut scores = HighScores::load(&storage);
    match scores.add(HighScoreEntry::from_stats(stats, timestamp)) {
        Some(rank) => {
            println!("New high score! Rank #{}", rank);
            scores.save(&mut storage)?;
        }
        None => println!("Best so far: {}", scores.top_score().unwrap_or(0)),
    }
    Ok(())
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    if let Err(e) = run(args) {
        log::error!("{}", e);
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_defaults() {
        let args = Args::try_parse_from(["lane-lingo"]).unwrap();
        assert_eq!(args.seed, None);
        assert_eq!(args.language, None);
        assert_eq!(args.accuracy, 85);
        assert_eq!(args.data_dir, PathBuf::from(".lane-lingo"));
    }

    #[test]
    fn test_args_values() {
        let args = Args::try_parse_from([
            "lane-lingo",
            "--seed",
            "42",
            "--language",
            "Arabic",
            "--accuracy",
            "100",
            "--deck",
            "words.csv",
        ])
        .unwrap();
        assert_eq!(args.seed, Some(42));
        assert_eq!(args.language, Some(Language::Arabic));
        assert_eq!(args.accuracy, 100);
        assert_eq!(args.deck, Some(PathBuf::from("words.csv")));
    }

    #[test]
    fn test_args_rejected() {
        assert!(Args::try_parse_from(["lane-lingo", "--accuracy", "101"]).is_err());
        assert!(Args::try_parse_from(["lane-lingo", "--language", "custom"]).is_err());
        assert!(Args::try_parse_from(["lane-lingo", "--language", "klingon"]).is_err());
        assert!(Args::try_parse_from(["lane-lingo", "--seed", "abc"]).is_err());
    }
}
