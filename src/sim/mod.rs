//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering, storage or platform dependencies

pub mod combat;
pub mod facts;
pub mod physics;
pub mod problem;
pub mod score;
pub mod snapshot;
pub mod spawn;
pub mod state;
pub mod tick;

pub use combat::{CombatOutcome, detect_collisions, fire, resolve_collision, resolve_collisions};
pub use facts::{Fact, FactBank, MissedFactRecord};
pub use physics::{KinematicsMode, effective_velocity, integrate};
pub use problem::ProblemGenerator;
pub use score::{ScoreKeeper, points_for};
pub use snapshot::{BulletView, EntityView, ShipView, Snapshot};
pub use spawn::{EntitySpawner, Spawn};
pub use state::{Bullet, Entity, EntitySize, GameEvent, GamePhase, GameState, Ship};
pub use tick::{TickInput, tick};
