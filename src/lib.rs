//! Math Arcade - simulation core for Math Asteroids and Math Invaders
//!
//! Core modules:
//! - `sim`: Deterministic simulation (facts, spawning, physics, combat, scoring)
//! - `session`: Wires a simulation to persistent storage and the leaderboard
//! - `persistence`: Key/value stores (LocalStorage on web, files on native)
//! - `settings`: Data-driven game tuning

pub mod error;
pub mod highscores;
pub mod persistence;
pub mod session;
pub mod settings;
pub mod sim;

#[cfg(test)]
pub mod test_utils;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use error::{SimError, StoreError};
pub use highscores::HighScores;
pub use session::Session;
pub use settings::{GameVariant, MissPolicy, Settings};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Play field dimensions (screen coordinates, y grows downward)
    pub const FIELD_WIDTH: f32 = 800.0;
    pub const FIELD_HEIGHT: f32 = 600.0;

    /// Default factor range for generated problems
    pub const MIN_FACTOR: u32 = 1;
    pub const MAX_FACTOR: u32 = 12;

    /// Minimum spawn distance from the ship
    pub const SAFE_ZONE_RADIUS: f32 = 150.0;
    /// Vertical speed multiplier while fast descent is held
    pub const FAST_DESCENT_MULTIPLIER: f32 = 4.0;
    /// Probability that a new problem is drawn from the weak facts
    pub const P_WEAK: f64 = 0.5;
    /// Candidate positions sampled before falling back to the farthest one
    pub const SPAWN_ATTEMPTS: u32 = 100;

    /// Ship defaults
    pub const SHIP_THRUST_ACCEL: f32 = 240.0;
    pub const SHIP_MAX_SPEED: f32 = 360.0;
    pub const SHIP_TURN_RATE: f32 = 4.0; // radians per second
    pub const SHIP_FRICTION: f32 = 0.0;

    /// Bullet defaults
    pub const BULLET_SPEED: f32 = 480.0;
    pub const BULLET_RADIUS: f32 = 3.0;
    pub const BULLET_TTL_TICKS: u32 = 90;

    /// Enemy defaults
    pub const LARGE_RADIUS: f32 = 36.0;
    pub const SMALL_RADIUS: f32 = 20.0;
    pub const ASTEROID_SPEED: f32 = 40.0;
    pub const DESCENT_SPEED: f32 = 20.0;
    /// Children leave a split at ± this angle from the parent heading
    pub const SPLIT_ANGLE: f32 = 0.5; // radians (~29 degrees)
    pub const SPLIT_SPEED_SCALE: f32 = 1.5;
    /// Floor for child speed when the parent was (nearly) stationary
    pub const MIN_SPLIT_SPEED: f32 = 30.0;
    /// Invaders spawn in the top fraction of the field
    pub const INVADER_SPAWN_BAND: f32 = 0.35;

    /// Enemies per wave
    pub const ASTEROID_WAVE_SIZE: u32 = 4;
    pub const INVADER_WAVE_SIZE: u32 = 6;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Unit vector pointing along `heading` (radians)
#[inline]
pub fn heading_dir(heading: f32) -> Vec2 {
    Vec2::new(heading.cos(), heading.sin())
}

/// Wrap a position into the toroidal field `[0, size)`
#[inline]
pub fn wrap_position(pos: Vec2, size: Vec2) -> Vec2 {
    Vec2::new(pos.x.rem_euclid(size.x), pos.y.rem_euclid(size.y))
}
