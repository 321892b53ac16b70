//! Problem generation biased toward weak facts

use rand::Rng;

use super::facts::{Fact, FactBank};
use crate::error::SimError;

/// Picks the factor pair for a new enemy
#[derive(Debug, Clone, Copy)]
pub struct ProblemGenerator {
    /// Probability of drawing from the weak facts instead of uniformly
    pub p_weak: f64,
}

impl ProblemGenerator {
    pub fn new(p_weak: f64) -> Self {
        Self {
            p_weak: p_weak.clamp(0.0, 1.0),
        }
    }

    /// Generate a fact with both factors in `[min, max]`
    pub fn next<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        bank: &FactBank,
        min: u32,
        max: u32,
    ) -> Result<Fact, SimError> {
        if min > max {
            return Err(SimError::InvalidRange { min, max });
        }

        let baseline = Fact::new(rng.random_range(min..=max), rng.random_range(min..=max));

        let fact = if !bank.is_empty() && rng.random_bool(self.p_weak) {
            match weighted_weak_draw(rng, bank) {
                // Either order may be shown; the bank only stores one
                Some(weak) if weak.in_range(min, max) => {
                    if rng.random_bool(0.5) {
                        Fact::new(weak.factor2, weak.factor1)
                    } else {
                        weak
                    }
                }
                Some(weak) => {
                    log::debug!("Weak fact {} outside [{}, {}], using {}", weak, min, max, baseline);
                    baseline
                }
                None => baseline,
            }
        } else {
            baseline
        };

        assert!(
            fact.in_range(min, max),
            "generated fact {} outside [{}, {}]",
            fact,
            min,
            max
        );
        Ok(fact)
    }
}

/// Pick a weak fact with probability proportional to its bank weight
fn weighted_weak_draw<R: Rng + ?Sized>(rng: &mut R, bank: &FactBank) -> Option<Fact> {
    let total: u64 = bank.weak_facts().map(|f| bank.weight(f) as u64).sum();
    if total == 0 {
        return None;
    }

    let mut roll = rng.random_range(0..total);
    for fact in bank.weak_facts() {
        let weight = bank.weight(fact) as u64;
        if roll < weight {
            return Some(fact);
        }
        roll -= weight;
    }
    None
}
