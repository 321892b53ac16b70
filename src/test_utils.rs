//! Test utilities for simulation tests.
//!
//! Provides fixtures for building sessions in known configurations.

/// Fixtures for creating test game states.
pub mod fixtures {
    use glam::Vec2;

    use crate::settings::{GameVariant, Settings};
    use crate::sim::{Bullet, Entity, EntitySize, Fact, GamePhase, GameState};

    /// A started session with its first wave spawned.
    pub fn playing_state(variant: GameVariant, seed: u64) -> GameState {
        let mut state = GameState::new(Settings::for_variant(variant), seed)
            .expect("default settings are valid");
        state.start().expect("fresh state can start");
        state.drain_events();
        state
    }

    /// A playing session holding exactly one enemy with id 1.
    ///
    /// The enemy sits well outside the safe zone and the wave counter is 1,
    /// as if the first wave had been whittled down to this one enemy.
    pub fn lone_enemy(variant: GameVariant, problem: Fact, size: EntitySize, is_missed: bool) -> GameState {
        let mut state = GameState::new(Settings::for_variant(variant), 7)
            .expect("default settings are valid");
        state.phase = GamePhase::Playing;
        state.wave = 1;
        let id = state.next_entity_id();
        let vel = match variant {
            GameVariant::Asteroids => Vec2::new(10.0, 0.0),
            GameVariant::Invaders => Vec2::new(0.0, state.settings.descent_speed),
        };
        state.entities.push(Entity {
            id,
            pos: Vec2::new(400.0, 60.0),
            vel,
            size,
            problem,
            is_missed,
        });
        state
    }

    /// Place a motionless bullet on top of an enemy; returns the bullet id.
    pub fn bullet_at(state: &mut GameState, entity_id: u32, payload: i64) -> u32 {
        let pos = state
            .entities
            .iter()
            .find(|e| e.id == entity_id)
            .map(|e| e.pos)
            .expect("entity exists");
        let id = state.next_entity_id();
        state.bullets.push(Bullet {
            id,
            pos,
            vel: Vec2::ZERO,
            payload,
            ttl_ticks: state.settings.bullet_ttl_ticks,
            struck: Vec::new(),
        });
        id
    }
}
