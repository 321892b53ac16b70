//! Kinematics for the two game variants
//!
//! - Momentum (Asteroids): thrust accelerates the ship along its heading,
//!   nothing resets velocity, everything wraps around the field.
//! - Descent (Invaders): enemies fall at their base speed, multiplied while
//!   fast descent is held. The multiplier is applied at integration time and
//!   never written back, so toggling cannot drift the base speed.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{GameState, Ship};
use crate::settings::Settings;
use crate::{heading_dir, normalize_angle, wrap_position};

/// Kinematic model selected by the game variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KinematicsMode {
    Momentum,
    Descent,
}

/// Velocity an entity moves with, given the fast-descent state
#[inline]
pub fn effective_velocity(
    vel: Vec2,
    mode: KinematicsMode,
    fast_descent: bool,
    multiplier: f32,
) -> Vec2 {
    match mode {
        KinematicsMode::Descent if fast_descent => Vec2::new(vel.x, vel.y * multiplier),
        _ => vel,
    }
}

/// Advance ship, enemies and bullets by one timestep
pub fn integrate(state: &mut GameState, dt: f32) {
    let mode = state.kinematics();
    let field = state.settings.field();

    integrate_ship(&mut state.ship, &state.settings, mode, dt);

    let fast = state.is_fast_descent;
    let multiplier = state.settings.fast_descent_multiplier;
    for entity in &mut state.entities {
        let vel = effective_velocity(entity.vel, mode, fast, multiplier);
        entity.pos += vel * dt;
        match mode {
            KinematicsMode::Momentum => entity.pos = wrap_position(entity.pos, field),
            KinematicsMode::Descent => {
                // Side walls bounce; falling past the bottom is handled as an escape
                let r = entity.radius();
                if (entity.pos.x < r && entity.vel.x < 0.0)
                    || (entity.pos.x > field.x - r && entity.vel.x > 0.0)
                {
                    entity.vel.x = -entity.vel.x;
                }
                entity.pos.x = entity.pos.x.clamp(r.min(field.x / 2.0), (field.x - r).max(field.x / 2.0));
            }
        }
    }

    for bullet in &mut state.bullets {
        bullet.pos += bullet.vel * dt;
        bullet.ttl_ticks = bullet.ttl_ticks.saturating_sub(1);
        if mode == KinematicsMode::Momentum {
            bullet.pos = wrap_position(bullet.pos, field);
        }
    }
    state.bullets.retain(|b| {
        b.ttl_ticks > 0
            && (mode == KinematicsMode::Momentum
                || (b.pos.x >= 0.0 && b.pos.x <= field.x && b.pos.y >= 0.0 && b.pos.y <= field.y))
    });
}

/// Advance the ship
pub fn integrate_ship(ship: &mut Ship, settings: &Settings, mode: KinematicsMode, dt: f32) {
    match mode {
        KinematicsMode::Momentum => {
            ship.heading = normalize_angle(ship.heading + ship.turn * settings.turn_rate * dt);
            if ship.thrust_engaged {
                ship.vel += heading_dir(ship.heading) * settings.thrust_accel * dt;
            }
            if settings.friction > 0.0 {
                ship.vel *= 1.0 - settings.friction;
            }
            ship.vel = ship.vel.clamp_length_max(settings.max_ship_speed);
            ship.pos = wrap_position(ship.pos + ship.vel * dt, settings.field());
        }
        // Fixed turret at the bottom of the field, aiming into the upper half-plane
        KinematicsMode::Descent => {
            ship.vel = Vec2::ZERO;
            ship.heading = (ship.heading + ship.turn * settings.turn_rate * dt)
                .clamp(-std::f32::consts::PI, 0.0);
        }
    }
}
