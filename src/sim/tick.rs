//! Fixed timestep simulation tick
//!
//! Core game loop that advances the simulation deterministically. Order per
//! tick: apply input → integrate physics → detect and resolve collisions →
//! expire escaped enemies → refill the wave.

use super::combat;
use super::physics::{self, KinematicsMode};
use super::state::{GameEvent, GamePhase, GameState};
use crate::error::SimError;

/// Input commands for a single tick (deterministic)
///
/// `None` leaves the corresponding control as it was.
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Engage/release thrust (Asteroids)
    pub thrust: Option<bool>,
    /// Turn input in [-1, 1] (Asteroids)
    pub turn: Option<f32>,
    /// Hold/release fast descent (Invaders)
    pub fast_descent: Option<bool>,
    /// Answers fired this tick, in order
    pub fire: Vec<i64>,
}

/// Advance the game state by one fixed timestep
///
/// Does nothing outside `Playing`.
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if state.phase != GamePhase::Playing {
        return;
    }
    if let Err(e) = step(state, input, dt) {
        log::error!("Tick {} aborted: {}", state.time_ticks, e);
    }

    // Ensure deterministic ordering
    state.normalize_order();
}

fn step(state: &mut GameState, input: &TickInput, dt: f32) -> Result<(), SimError> {
    state.time_ticks += 1;

    if let Some(thrust) = input.thrust {
        state.set_thrust(thrust)?;
    }
    if let Some(turn) = input.turn {
        state.set_turn(turn)?;
    }
    if let Some(fast) = input.fast_descent {
        state.set_fast_descent(fast)?;
    }
    for &payload in &input.fire {
        state.fire(payload)?;
    }

    physics::integrate(state, dt);
    combat::resolve_collisions(state)?;
    expire_escaped(state)?;

    if state.entities.is_empty() {
        state.start_next_wave()?;
    }
    Ok(())
}

/// Descent mode: an enemy that falls past the bottom counts as a miss of its
/// fact and is replaced by a fresh spawn
fn expire_escaped(state: &mut GameState) -> Result<(), SimError> {
    if state.kinematics() != KinematicsMode::Descent {
        return Ok(());
    }

    let floor = state.settings.field_height;
    let (escaped, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut state.entities)
        .into_iter()
        .partition(|e| e.pos.y - e.radius() > floor);
    state.entities = kept;

    for entity in escaped {
        log::debug!("#{} {} escaped", entity.id, entity.problem);
        state.facts.record_miss(entity.problem);
        state.misses += 1;
        state.events.push(GameEvent::Escaped {
            entity_id: entity.id,
            problem: entity.problem,
        });
        state.spawn_enemy()?;
    }
    Ok(())
}
