//! A play session: simulation + persistent missed facts + leaderboard
//!
//! The session restores the variant's missed facts at open, writes them back
//! after every tick that recorded a miss, and files the final score on the
//! leaderboard when the run ends. Storage failures are logged and never
//! interrupt play.

use crate::consts::{MAX_SUBSTEPS, SIM_DT};
use crate::error::{SimError, StoreError};
use crate::highscores::{HighScoreEntry, HighScores};
use crate::persistence::KeyValueStore;
use crate::settings::{GameVariant, Settings};
use crate::sim::{FactBank, GameEvent, GameState, Snapshot, TickInput, tick};

pub struct Session<S: KeyValueStore> {
    state: GameState,
    store: S,
    highscores: HighScores,
    accumulator: f32,
    /// Shots waiting for the next substep
    pending_fire: Vec<i64>,
}

impl<S: KeyValueStore> Session<S> {
    /// Open a session, restoring the variant's missed facts from `store`
    pub fn open(settings: Settings, seed: u64, store: S) -> Result<Self, SimError> {
        let variant = settings.variant;
        let facts = load_facts(&store, variant);
        let state = GameState::new(settings, seed)?.with_fact_bank(facts);
        let highscores = HighScores::load(&store, variant);
        Ok(Self {
            state,
            store,
            highscores,
            accumulator: 0.0,
            pending_fire: Vec::new(),
        })
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn highscores(&self) -> &HighScores {
        &self.highscores
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.state)
    }

    pub fn start(&mut self) -> Result<(), SimError> {
        self.state.start()
    }

    pub fn set_thrust(&mut self, engaged: bool) -> Result<(), SimError> {
        self.state.set_thrust(engaged)
    }

    pub fn set_turn(&mut self, turn: f32) -> Result<(), SimError> {
        self.state.set_turn(turn)
    }

    pub fn set_fast_descent(&mut self, active: bool) -> Result<(), SimError> {
        self.state.set_fast_descent(active)
    }

    pub fn fire(&mut self, payload: i64) -> Result<u32, SimError> {
        self.state.fire(payload)
    }

    /// Run one fixed tick; returns the events it produced
    pub fn tick(&mut self, input: &TickInput, dt: f32) -> Vec<GameEvent> {
        tick(&mut self.state, input, dt);
        let events = self.state.drain_events();
        if events
            .iter()
            .any(|e| matches!(e, GameEvent::Missed { .. } | GameEvent::Escaped { .. }))
        {
            self.save_facts();
        }
        events
    }

    /// Advance by a frame's worth of wall time in fixed `SIM_DT` substeps
    ///
    /// Shots in `input.fire` go out on the next substep that runs, which may
    /// be in a later frame when this one is shorter than `SIM_DT`.
    pub fn advance(&mut self, frame_dt: f32, input: &TickInput) -> Vec<GameEvent> {
        self.accumulator += frame_dt.min(0.1);
        self.pending_fire.extend_from_slice(&input.fire);

        let mut events = Vec::new();
        let mut input = input.clone();
        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            input.fire = std::mem::take(&mut self.pending_fire);
            events.extend(self.tick(&input, SIM_DT));
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        events
    }

    /// End the run and file it on the leaderboard
    ///
    /// Returns the leaderboard rank, if the score qualified.
    pub fn end(&mut self, timestamp: f64) -> Result<Option<usize>, SimError> {
        self.state.end()?;
        self.save_facts();

        let entry = HighScoreEntry {
            score: self.state.score.total(),
            wave: self.state.wave,
            hits: self.state.hits,
            misses: self.state.misses,
            timestamp,
        };
        log::info!(
            "Run over: {} hits, {} misses ({:.0}% accuracy)",
            entry.hits,
            entry.misses,
            entry.accuracy() * 100.0
        );
        let rank = self.highscores.add(entry);
        if let Some(rank) = rank {
            log::info!("New high score #{}: {}", rank, self.state.score.total());
            self.highscores
                .save(&mut self.store, self.state.settings.variant);
        }
        Ok(rank)
    }

    /// Write the missed-fact records to the store
    pub fn save_facts(&mut self) {
        let key = self.state.settings.variant.storage_key();
        let result = self
            .state
            .facts
            .to_json()
            .map_err(StoreError::from)
            .and_then(|json| self.store.set(&key, &json));
        match result {
            Ok(()) => log::debug!("Saved {} missed facts", self.state.facts.len()),
            Err(e) => log::warn!("Could not save missed facts: {}", e),
        }
    }

    /// Close the session, handing back the store
    pub fn into_store(self) -> S {
        self.store
    }
}

/// Restore a variant's missed facts; unreadable data starts a fresh bank
pub fn load_facts(store: &dyn KeyValueStore, variant: GameVariant) -> FactBank {
    match store.get(&variant.storage_key()) {
        Ok(Some(json)) => match FactBank::from_json(&json) {
            Ok(bank) => {
                log::info!("Restored {} missed facts for {}", bank.len(), variant.as_str());
                bank
            }
            Err(e) => {
                log::warn!("Discarding unreadable missed facts: {}", e);
                FactBank::new()
            }
        },
        Ok(None) => FactBank::new(),
        Err(e) => {
            log::warn!("Could not read missed facts: {}", e);
            FactBank::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;
    use crate::sim::{EntitySize, Fact, GamePhase};
    use glam::Vec2;

    fn session(variant: GameVariant, store: MemoryStore) -> Session<MemoryStore> {
        Session::open(Settings::for_variant(variant), 21, store).unwrap()
    }

    /// Shoot the wrong answer at the first enemy from point blank
    fn miss_first_enemy(session: &mut Session<MemoryStore>) -> Fact {
        let state = &mut session.state;
        let target = state.entities[0].clone();
        let wrong = target.problem.answer() as i64 + 1;
        let id = state.fire(wrong).unwrap();
        let bullet = state.bullets.iter_mut().find(|b| b.id == id).unwrap();
        bullet.pos = target.pos;
        bullet.vel = Vec2::ZERO;
        // Keep the enemy still so the bullet is on it after integration
        state.entities[0].vel = Vec2::ZERO;
        target.problem
    }

    #[test]
    fn test_miss_is_persisted_per_variant() {
        let mut s = session(GameVariant::Asteroids, MemoryStore::new());
        s.start().unwrap();
        let fact = miss_first_enemy(&mut s);
        let events = s.tick(&TickInput::default(), SIM_DT);
        assert!(events.iter().any(|e| matches!(e, GameEvent::Missed { .. })));

        let store = s.into_store();
        let saved = store.get(&GameVariant::Asteroids.storage_key()).unwrap().unwrap();
        assert!(FactBank::from_json(&saved).unwrap().is_weak(fact));
        assert_eq!(store.get(&GameVariant::Invaders.storage_key()).unwrap(), None);
    }

    #[test]
    fn test_restored_fact_drives_generation() {
        let mut store = MemoryStore::new();
        store
            .set(
                &GameVariant::Invaders.storage_key(),
                r#"[{"factor1":3,"factor2":4,"exposure_count":3}]"#,
            )
            .unwrap();

        let settings = Settings {
            min_factor: 3,
            max_factor: 4,
            p_weak: 1.0,
            ..Settings::for_variant(GameVariant::Invaders)
        };
        let mut s = Session::open(settings, 5, store).unwrap();
        assert_eq!(s.state().facts.exposure(Fact::new(4, 3)), 3);

        s.start().unwrap();
        for entity in &s.state().entities {
            assert_eq!(entity.problem.canonical(), Fact::new(3, 4));
            assert!(entity.is_missed);
            assert_eq!(entity.size, EntitySize::Large);
        }
    }

    #[test]
    fn test_corrupt_store_starts_fresh() {
        let mut store = MemoryStore::new();
        store
            .set(&GameVariant::Asteroids.storage_key(), "not json")
            .unwrap();
        let s = session(GameVariant::Asteroids, store);
        assert!(s.state().facts.is_empty());
    }

    #[test]
    fn test_end_records_high_score() {
        let mut s = session(GameVariant::Asteroids, MemoryStore::new());
        s.start().unwrap();
        let target = s.state.entities[0].clone();
        s.state.entities.retain(|e| e.id == target.id);
        s.state.entities[0].vel = Vec2::ZERO;
        s.state.entities[0].size = EntitySize::Small;
        let id = s.fire(target.problem.answer() as i64).unwrap();
        let bullet = s.state.bullets.iter_mut().find(|b| b.id == id).unwrap();
        bullet.pos = target.pos;
        bullet.vel = Vec2::ZERO;
        s.tick(&TickInput::default(), SIM_DT);
        assert_eq!(s.state().score.total(), target.problem.answer());

        let rank = s.end(1_700_000_000_000.0).unwrap();
        assert_eq!(rank, Some(1));
        assert_eq!(s.state().phase, GamePhase::Ended);
        assert!(s.end(0.0).is_err());

        let store = s.into_store();
        let scores = HighScores::load(&store, GameVariant::Asteroids);
        assert_eq!(scores.top_score(), Some(target.problem.answer()));
    }

    #[test]
    fn test_advance_runs_fixed_substeps() {
        let mut s = session(GameVariant::Invaders, MemoryStore::new());
        s.start().unwrap();
        let input = TickInput {
            fire: vec![1000],
            ..Default::default()
        };
        s.advance(SIM_DT * 3.5, &input);
        assert_eq!(s.state().time_ticks, 3);
        // One shot despite three substeps
        assert!(s.state().bullets.len() <= 1);
    }

    #[test]
    fn test_short_frame_keeps_queued_shot() {
        let mut s = session(GameVariant::Invaders, MemoryStore::new());
        s.start().unwrap();
        let frame = 1.0 / 144.0;
        let input = TickInput {
            fire: vec![1000],
            ..Default::default()
        };

        let events = s.advance(frame, &input);
        assert!(events.is_empty());
        assert_eq!(s.state().time_ticks, 0);
        assert!(s.state().bullets.is_empty());

        s.advance(frame, &TickInput::default());
        let events = s.advance(frame, &TickInput::default());
        assert_eq!(s.state().time_ticks, 1);
        assert_eq!(s.state().bullets.len(), 1);
        assert_eq!(s.state().bullets[0].payload, 1000);
        assert!(
            events
                .iter()
                .any(|e| matches!(e, GameEvent::Fired { payload: 1000, .. }))
        );

        // Delivered once only
        s.advance(SIM_DT * 2.0, &TickInput::default());
        assert!(s.state().bullets.len() <= 1);
    }
}
