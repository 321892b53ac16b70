//! Running score

use serde::{Deserialize, Serialize};

use super::facts::Fact;

/// Accumulates points. No decay, no cap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreKeeper {
    total: u64,
}

impl ScoreKeeper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, points: u64) {
        self.total = self.total.saturating_add(points);
    }

    pub fn total(&self) -> u64 {
        self.total
    }
}

/// Points for destroying an enemy: the answer, doubled for a missed fact
pub fn points_for(problem: Fact, is_missed: bool) -> u64 {
    let answer = problem.answer();
    if is_missed { answer.saturating_mul(2) } else { answer }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add() {
        let mut score = ScoreKeeper::new();
        score.add(42);
        score.add(0);
        score.add(8);
        assert_eq!(score.total(), 50);
    }

    #[test]
    fn test_missed_bonus() {
        assert_eq!(points_for(Fact::new(6, 7), false), 42);
        assert_eq!(points_for(Fact::new(6, 7), true), 84);
    }
}
