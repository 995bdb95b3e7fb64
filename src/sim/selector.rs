//! Word selection
//!
//! Picks the prompt word and two distractors for each gate, avoiding recently
//! used words and preferring distractors from the same category.

use std::collections::VecDeque;

use rand::Rng;
use rand::SeedableRng;
use rand::seq::{IndexedRandom, SliceRandom};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::{LANE_COUNT, RECENCY_WINDOW};
use crate::vocab::{Language, VocabularyProvider, Word};

/// One of the three player positions; also indexes the answer options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Lane {
    Left,
    #[default]
    Center,
    Right,
}

impl Lane {
    pub const ALL: [Lane; LANE_COUNT] = [Lane::Left, Lane::Center, Lane::Right];

    pub fn index(self) -> usize {
        match self {
            Lane::Left => 0,
            Lane::Center => 1,
            Lane::Right => 2,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Lane::Left => "left",
            Lane::Center => "center",
            Lane::Right => "right",
        }
    }
}

/// Which side of the word the prompt shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PromptDirection {
    /// Prompt is English, lanes hold target-language text
    ShowEnglish,
    /// Prompt is target-language text, lanes hold English
    ShowTarget,
}

/// Prompt direction tagged with the language of the pool it came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionMode {
    pub direction: PromptDirection,
    pub language: Language,
}

impl QuestionMode {
    /// Text shown as the prompt for `word`
    pub fn prompt_text<'a>(&self, word: &'a Word) -> &'a str {
        match self.direction {
            PromptDirection::ShowEnglish => &word.english,
            PromptDirection::ShowTarget => &word.text,
        }
    }

    /// Text shown on a lane holding `word`
    pub fn answer_text<'a>(&self, word: &'a Word) -> &'a str {
        match self.direction {
            PromptDirection::ShowEnglish => &word.text,
            PromptDirection::ShowTarget => &word.english,
        }
    }
}

/// A word placed in a lane
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerOption {
    pub lane: Lane,
    pub word: Word,
}

/// A three-way multiple-choice question, fixed for the lifetime of its gate.
///
/// `options` is ordered by lane. It holds fewer than three entries only when
/// the candidate pool had fewer than three distinct words.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub correct_word: Word,
    pub options: Vec<AnswerOption>,
    pub correct_lane: Lane,
    pub mode: QuestionMode,
}

impl Question {
    pub fn prompt(&self) -> &str {
        self.mode.prompt_text(&self.correct_word)
    }

    /// Answer text the player should have picked
    pub fn correct_answer(&self) -> &str {
        self.mode.answer_text(&self.correct_word)
    }

    pub fn option_in(&self, lane: Lane) -> Option<&AnswerOption> {
        self.options.iter().find(|o| o.lane == lane)
    }

    pub fn is_correct(&self, lane: Lane) -> bool {
        lane == self.correct_lane
    }
}

/// Bounded FIFO of recently used word texts
#[derive(Debug, Clone)]
pub struct RecencyBuffer {
    entries: VecDeque<String>,
    capacity: usize,
}

impl Default for RecencyBuffer {
    fn default() -> Self {
        Self::new(RECENCY_WINDOW)
    }
}

impl RecencyBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Record a word, evicting the oldest entry past capacity
    pub fn push(&mut self, text: &str) {
        if self.capacity == 0 {
            return;
        }
        self.entries.push_back(text.to_string());
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    pub fn contains(&self, text: &str) -> bool {
        self.entries.iter().any(|t| t == text)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Oldest first
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }
}

/// Question generator with its own seeded RNG and recency memory
#[derive(Debug, Clone)]
pub struct WordSelector {
    rng: Pcg32,
    recent: RecencyBuffer,
}

impl WordSelector {
    pub fn new(seed: u64) -> Self {
        Self::with_window(seed, RECENCY_WINDOW)
    }

    pub fn with_window(seed: u64, recency_window: usize) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            recent: RecencyBuffer::new(recency_window),
        }
    }

    pub fn recent(&self) -> &RecencyBuffer {
        &self.recent
    }

    /// Build a question for `level`.
    ///
    /// Precondition: the candidate pool holds at least three distinct words.
    /// Smaller pools yield questions with fewer options; an empty pool yields `None`.
    pub fn select_question(
        &mut self,
        level: u32,
        vocab: &dyn VocabularyProvider,
    ) -> Option<Question> {
        let pool = candidate_pool(level, vocab);

        let fresh: Vec<&Word> = pool
            .iter()
            .copied()
            .filter(|w| !self.recent.contains(&w.text))
            .collect();
        let correct = if fresh.is_empty() {
            pool.choose(&mut self.rng).copied()?
        } else {
            fresh.choose(&mut self.rng).copied()?
        };
        self.recent.push(&correct.text);

        let distractors = self.pick_distractors(correct, &pool);
        if distractors.len() < LANE_COUNT - 1 {
            log::warn!(
                "Word pool for level {} too small: only {} distractor(s) for '{}'",
                level,
                distractors.len(),
                correct.text
            );
        }

        let correct_lane = Lane::ALL[self.rng.random_range(0..LANE_COUNT)];
        let mut remaining = distractors.into_iter();
        let options = Lane::ALL
            .iter()
            .filter_map(|&lane| {
                let word = if lane == correct_lane {
                    correct
                } else {
                    remaining.next()?
                };
                Some(AnswerOption {
                    lane,
                    word: word.clone(),
                })
            })
            .collect();

        let direction = if self.rng.random_bool(0.5) {
            PromptDirection::ShowEnglish
        } else {
            PromptDirection::ShowTarget
        };

        Some(Question {
            correct_word: correct.clone(),
            options,
            correct_lane,
            mode: QuestionMode {
                direction,
                language: vocab.language(),
            },
        })
    }

    /// Same-category words first, then anything else in the pool
    fn pick_distractors<'a>(&mut self, correct: &Word, pool: &[&'a Word]) -> Vec<&'a Word> {
        let need = LANE_COUNT - 1;
        let mut chosen: Vec<&'a Word> = Vec::with_capacity(need);

        let mut same_category: Vec<&'a Word> = pool
            .iter()
            .copied()
            .filter(|w| w.category == correct.category && w.text != correct.text)
            .collect();
        same_category.shuffle(&mut self.rng);
        fill_distinct(&mut chosen, same_category, need);

        if chosen.len() < need {
            let mut rest: Vec<&'a Word> = pool
                .iter()
                .copied()
                .filter(|w| w.text != correct.text && !chosen.iter().any(|c| c.text == w.text))
                .collect();
            rest.shuffle(&mut self.rng);
            fill_distinct(&mut chosen, rest, need);
        }

        chosen
    }
}

/// Current level plus the one below it, or the whole custom deck
fn candidate_pool(level: u32, vocab: &dyn VocabularyProvider) -> Vec<&Word> {
    if let Some(deck) = vocab.active_deck() {
        return deck.iter().collect();
    }

    let mut pool: Vec<&Word> = vocab.words_for_level(level).iter().collect();
    if level > 1 {
        pool.extend(vocab.words_for_level(level - 1));
    }
    pool
}

fn fill_distinct<'a>(chosen: &mut Vec<&'a Word>, candidates: Vec<&'a Word>, need: usize) {
    for word in candidates {
        if chosen.len() >= need {
            break;
        }
        if !chosen.iter().any(|c| c.text == word.text) {
            chosen.push(word);
        }
    }
}
