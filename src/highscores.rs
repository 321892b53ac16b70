//! High score leaderboard
//!
//! One leaderboard per game variant, persisted under the variant's storage
//! namespace. Tracks the top 10 runs.

use serde::{Deserialize, Serialize};

use crate::persistence::KeyValueStore;
use crate::settings::GameVariant;

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single finished run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub score: u64,
    /// Wave reached
    pub wave: u32,
    /// Problems answered correctly
    pub hits: u32,
    /// Wrong answers and escaped enemies
    pub misses: u32,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
}

impl HighScoreEntry {
    /// Fraction of answers that were correct (1.0 when nothing was answered)
    pub fn accuracy(&self) -> f32 {
        let total = self.hits + self.misses;
        if total == 0 {
            1.0
        } else {
            self.hits as f32 / total as f32
        }
    }
}

/// High score leaderboard, sorted by descending score
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        // Must beat the lowest entry
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Add a finished run (if it qualifies)
    /// Returns the rank achieved (1-indexed) or None if didn't qualify
    pub fn add(&mut self, entry: HighScoreEntry) -> Option<usize> {
        if !self.qualifies(entry.score) {
            return None;
        }

        // Ties rank below earlier runs
        let pos = self.entries.iter().position(|e| entry.score > e.score);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };

        self.entries.truncate(MAX_HIGH_SCORES);
        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Load a variant's leaderboard, empty if missing or unreadable
    pub fn load(store: &dyn KeyValueStore, variant: GameVariant) -> Self {
        let key = variant.highscores_key();
        match store.get(&key) {
            Ok(Some(json)) => match serde_json::from_str::<HighScores>(&json) {
                Ok(scores) => {
                    log::info!("Loaded {} high scores", scores.entries.len());
                    scores
                }
                Err(e) => {
                    log::warn!("Discarding unreadable high scores: {}", e);
                    Self::new()
                }
            },
            Ok(None) => {
                log::info!("No high scores found, starting fresh");
                Self::new()
            }
            Err(e) => {
                log::warn!("Could not read high scores: {}", e);
                Self::new()
            }
        }
    }

    /// Save a variant's leaderboard
    pub fn save(&self, store: &mut dyn KeyValueStore, variant: GameVariant) {
        match serde_json::to_string(self) {
            Ok(json) => match store.set(&variant.highscores_key(), &json) {
                Ok(()) => log::info!("High scores saved ({} entries)", self.entries.len()),
                Err(e) => log::warn!("Could not save high scores: {}", e),
            },
            Err(e) => log::warn!("Could not encode high scores: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    fn entry(score: u64) -> HighScoreEntry {
        HighScoreEntry {
            score,
            wave: 1,
            hits: 3,
            misses: 1,
            timestamp: 0.0,
        }
    }

    #[test]
    fn test_sorted_and_truncated() {
        let mut scores = HighScores::new();
        for s in 1..=12u64 {
            scores.add(entry(s * 10));
        }
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(scores.top_score(), Some(120));
        assert_eq!(scores.entries.last().map(|e| e.score), Some(30));
        assert!(!scores.qualifies(30));
        assert_eq!(scores.add(entry(55)), Some(8));
    }

    #[test]
    fn test_zero_never_qualifies() {
        let mut scores = HighScores::new();
        assert_eq!(scores.add(entry(0)), None);
        assert!(scores.is_empty());
    }

    #[test]
    fn test_accuracy() {
        assert_eq!(entry(1).accuracy(), 0.75);
        let none = HighScoreEntry { hits: 0, misses: 0, ..entry(1) };
        assert_eq!(none.accuracy(), 1.0);
    }

    #[test]
    fn test_per_variant_storage() {
        let mut store = MemoryStore::new();
        let mut scores = HighScores::new();
        scores.add(entry(99));
        scores.save(&mut store, GameVariant::Invaders);

        assert_eq!(HighScores::load(&store, GameVariant::Invaders).top_score(), Some(99));
        assert!(HighScores::load(&store, GameVariant::Asteroids).is_empty());
    }
}
