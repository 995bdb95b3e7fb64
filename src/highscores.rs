//! High score leaderboard
//!
//! Tracks the top 10 finished runs.

use serde::{Deserialize, Serialize};

use crate::persistence::{Storage, StorageError, load_json, save_json};
use crate::sim::GameOverStats;

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub score: u64,
    pub level: u32,
    pub accuracy: u32,
    pub max_streak: u32,
    pub custom_deck: bool,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
}

impl HighScoreEntry {
    pub fn from_stats(stats: &GameOverStats, timestamp: f64) -> Self {
        Self {
            score: stats.final_score,
            level: stats.final_level,
            accuracy: stats.accuracy,
            max_streak: stats.max_streak,
            custom_deck: stats.used_custom_deck,
            timestamp,
        }
    }
}

/// High score leaderboard, sorted by score descending
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    const STORAGE_KEY: &'static str = "lane_lingo_highscores";

    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().is_none_or(|e| score > e.score)
    }

    /// Rank a score would achieve (1-indexed, None if it doesn't qualify)
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Record a finished run. Returns the rank achieved, if any.
    pub fn add(&mut self, entry: HighScoreEntry) -> Option<usize> {
        let rank = self.potential_rank(entry.score)?;
        self.entries.insert(rank - 1, entry);
        self.entries.truncate(MAX_HIGH_SCORES);
        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    pub fn load(storage: &dyn Storage) -> Self {
        match load_json::<HighScores>(storage, Self::STORAGE_KEY) {
            Some(scores) => {
                log::info!("Loaded {} high scores", scores.entries.len());
                scores
            }
            None => {
                log::info!("No high scores found, starting fresh");
                Self::new()
            }
        }
    }

    pub fn save(&self, storage: &mut dyn Storage) -> Result<(), StorageError> {
        save_json(storage, Self::STORAGE_KEY, self)?;
        log::info!("High scores saved ({} entries)", self.entries.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStorage;

    fn entry(score: u64) -> HighScoreEntry {
        HighScoreEntry {
            score,
            level: 1,
            accuracy: 100,
            max_streak: 0,
            custom_deck: false,
            timestamp: 0.0,
        }
    }

    #[test]
    fn test_ranks_and_truncation() {
        let mut scores = HighScores::new();
        assert_eq!(scores.add(entry(0)), None);
        assert_eq!(scores.add(entry(500)), Some(1));
        assert_eq!(scores.add(entry(900)), Some(1));
        assert_eq!(scores.add(entry(700)), Some(2));
        assert_eq!(scores.top_score(), Some(900));

        for i in 0..20 {
            scores.add(entry(1000 + i));
        }
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        assert!(!scores.qualifies(100));
        assert_eq!(scores.potential_rank(5000), Some(1));
    }

    #[test]
    fn test_persistence() {
        let mut storage = MemoryStorage::new();
        let mut scores = HighScores::new();
        scores.add(entry(150));
        scores.save(&mut storage).unwrap();
        let loaded = HighScores::load(&storage);
        assert_eq!(loaded.entries, scores.entries);
    }
}
