//! Multiplication facts and the bank of facts the player has missed
//!
//! A fact is an unordered factor pair. Lookups use the canonical ordering
//! (smaller factor first) so `3×4` and `4×3` share one record, while the
//! generated order is kept for display.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A factor pair, in generation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Fact {
    pub factor1: u32,
    pub factor2: u32,
}

impl Fact {
    pub fn new(factor1: u32, factor2: u32) -> Self {
        Self { factor1, factor2 }
    }

    /// Lookup form: smaller factor first
    pub fn canonical(&self) -> Self {
        if self.factor1 <= self.factor2 {
            *self
        } else {
            Self::new(self.factor2, self.factor1)
        }
    }

    /// The product the player has to type
    pub fn answer(&self) -> u64 {
        self.factor1 as u64 * self.factor2 as u64
    }

    /// True if both factors lie in `[min, max]`
    pub fn in_range(&self, min: u32, max: u32) -> bool {
        (min..=max).contains(&self.factor1) && (min..=max).contains(&self.factor2)
    }

    /// Display label, e.g. `6×7`
    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Fact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}×{}", self.factor1, self.factor2)
    }
}

/// Persisted form of one missed fact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissedFactRecord {
    pub factor1: u32,
    pub factor2: u32,
    pub exposure_count: u32,
}

impl MissedFactRecord {
    pub fn fact(&self) -> Fact {
        Fact::new(self.factor1, self.factor2)
    }
}

/// Missed facts with their exposure counts
///
/// Records are only ever added or incremented, so exposure counts never
/// decrease during a session.
#[derive(Debug, Clone, Default)]
pub struct FactBank {
    records: BTreeMap<Fact, u32>,
}

impl FactBank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one miss of `fact`
    pub fn record_miss(&mut self, fact: Fact) {
        let count = self.records.entry(fact.canonical()).or_insert(0);
        *count = count.saturating_add(1);
        log::debug!("Missed {} (exposure {})", fact, count);
    }

    /// Number of recorded misses of `fact` (0 if never missed)
    pub fn exposure(&self, fact: Fact) -> u32 {
        self.records.get(&fact.canonical()).copied().unwrap_or(0)
    }

    /// True once `fact` has been missed at least once
    pub fn is_weak(&self, fact: Fact) -> bool {
        self.exposure(fact) >= 1
    }

    /// Selection weight: 1 for unseen facts, growing with each miss
    pub fn weight(&self, fact: Fact) -> u32 {
        1u32.saturating_add(self.exposure(fact))
    }

    /// Weak facts in canonical order
    pub fn weak_facts(&self) -> impl Iterator<Item = Fact> + '_ {
        self.records
            .iter()
            .filter(|(_, count)| **count >= 1)
            .map(|(fact, _)| *fact)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Flat record list, ordered by canonical fact
    pub fn export(&self) -> Vec<MissedFactRecord> {
        self.records
            .iter()
            .map(|(fact, count)| MissedFactRecord {
                factor1: fact.factor1,
                factor2: fact.factor2,
                exposure_count: *count,
            })
            .collect()
    }

    /// Merge records into the bank; duplicate facts sum their counts
    pub fn import(&mut self, records: &[MissedFactRecord]) {
        for record in records.iter().filter(|r| r.exposure_count > 0) {
            let count = self.records.entry(record.fact().canonical()).or_insert(0);
            *count = count.saturating_add(record.exposure_count);
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.export())
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let records: Vec<MissedFactRecord> = serde_json::from_str(json)?;
        let mut bank = Self::new();
        bank.import(&records);
        Ok(bank)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_lookup() {
        let mut bank = FactBank::new();
        bank.record_miss(Fact::new(7, 3));
        assert!(bank.is_weak(Fact::new(3, 7)));
        assert!(bank.is_weak(Fact::new(7, 3)));
        assert_eq!(bank.len(), 1);
    }

    #[test]
    fn test_display_keeps_generation_order() {
        assert_eq!(Fact::new(7, 3).label(), "7×3");
        assert_eq!(Fact::new(7, 3).answer(), 21);
    }

    #[test]
    fn test_exposure_increments() {
        let mut bank = FactBank::new();
        let fact = Fact::new(4, 5);
        assert_eq!(bank.exposure(fact), 0);
        assert!(!bank.is_weak(fact));

        let mut last = 0;
        for _ in 0..3 {
            bank.record_miss(fact);
            let now = bank.exposure(fact);
            assert!(now > last);
            last = now;
        }
        assert_eq!(bank.exposure(fact), 3);
    }

    #[test]
    fn test_weight_grows_with_misses() {
        let mut bank = FactBank::new();
        let fact = Fact::new(4, 5);
        for _ in 0..3 {
            bank.record_miss(fact);
        }
        let unseen = Fact::new(2, 9);
        assert_eq!(bank.weight(unseen), 1);
        assert!(bank.weight(fact) > bank.weight(unseen));
    }

    #[test]
    fn test_export_is_ordered() {
        let mut bank = FactBank::new();
        bank.record_miss(Fact::new(9, 8));
        bank.record_miss(Fact::new(2, 3));
        bank.record_miss(Fact::new(8, 9));

        let records = bank.export();
        assert_eq!(
            records,
            vec![
                MissedFactRecord { factor1: 2, factor2: 3, exposure_count: 1 },
                MissedFactRecord { factor1: 8, factor2: 9, exposure_count: 2 },
            ]
        );
    }

    #[test]
    fn test_import_sums_duplicates() {
        let mut bank = FactBank::new();
        bank.record_miss(Fact::new(6, 7));
        bank.import(&[
            MissedFactRecord { factor1: 7, factor2: 6, exposure_count: 2 },
            MissedFactRecord { factor1: 6, factor2: 7, exposure_count: 1 },
            MissedFactRecord { factor1: 5, factor2: 5, exposure_count: 0 },
        ]);
        assert_eq!(bank.exposure(Fact::new(6, 7)), 4);
        assert!(!bank.is_weak(Fact::new(5, 5)));
    }

    #[test]
    fn test_json_shape() {
        let mut bank = FactBank::new();
        bank.record_miss(Fact::new(3, 4));
        let json = bank.to_json().unwrap();
        assert_eq!(json, r#"[{"factor1":3,"factor2":4,"exposure_count":1}]"#);

        let restored = FactBank::from_json(&json).unwrap();
        assert_eq!(restored.exposure(Fact::new(4, 3)), 1);
    }
}
