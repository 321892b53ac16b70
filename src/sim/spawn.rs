//! Enemy spawning and splitting
//!
//! Spawn positions honor a safe zone around the ship. Each enemy gets a
//! problem from the generator, and its missed-highlight is read from the
//! fact bank once, here, and never recomputed.

use glam::Vec2;
use rand::Rng;

use super::facts::FactBank;
use super::physics::KinematicsMode;
use super::problem::ProblemGenerator;
use super::state::{Entity, EntitySize};
use crate::consts::INVADER_SPAWN_BAND;
use crate::error::SimError;
use crate::settings::Settings;

/// Result of a spawn
#[derive(Debug, Clone)]
pub struct Spawn {
    pub entity: Entity,
    /// Retry budget ran out; entity placed at the farthest candidate
    pub fallback: bool,
}

/// Creates enemies for one variant
#[derive(Debug, Clone)]
pub struct EntitySpawner {
    pub mode: KinematicsMode,
    pub field: Vec2,
    pub safe_zone_radius: f32,
    pub max_attempts: u32,
    pub min_factor: u32,
    pub max_factor: u32,
    pub generator: ProblemGenerator,
    pub asteroid_speed: f32,
    pub descent_speed: f32,
    pub split_angle: f32,
    pub split_speed_scale: f32,
    pub min_split_speed: f32,
}

impl EntitySpawner {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            mode: settings.variant.kinematics(),
            field: settings.field(),
            safe_zone_radius: settings.safe_zone_radius,
            max_attempts: settings.spawn_attempts.max(1),
            min_factor: settings.min_factor,
            max_factor: settings.max_factor,
            generator: ProblemGenerator::new(settings.p_weak),
            asteroid_speed: settings.asteroid_speed,
            descent_speed: settings.descent_speed,
            split_angle: settings.split_angle,
            split_speed_scale: settings.split_speed_scale,
            min_split_speed: settings.min_split_speed,
        }
    }

    /// Spawn a large enemy at least `safe_zone_radius` from `ship_pos`
    pub fn spawn<R: Rng + ?Sized>(
        &self,
        id: u32,
        ship_pos: Vec2,
        rng: &mut R,
        bank: &FactBank,
    ) -> Result<Spawn, SimError> {
        let mut farthest = (Vec2::ZERO, f32::NEG_INFINITY);
        let mut placed = None;

        for _ in 0..self.max_attempts {
            let candidate = self.sample_position(rng);
            let distance = candidate.distance(ship_pos);
            if distance >= self.safe_zone_radius {
                placed = Some(candidate);
                break;
            }
            if distance > farthest.1 {
                farthest = (candidate, distance);
            }
        }

        let fallback = placed.is_none();
        let pos = placed.unwrap_or_else(|| {
            log::warn!(
                "No spawn position outside safe zone after {} attempts; using farthest ({:.1} from ship)",
                self.max_attempts,
                farthest.1
            );
            farthest.0
        });

        let problem = self
            .generator
            .next(rng, bank, self.min_factor, self.max_factor)?;
        let vel = match self.mode {
            KinematicsMode::Momentum => {
                let angle = rng.random_range(0.0..std::f32::consts::TAU);
                Vec2::from_angle(angle) * self.asteroid_speed
            }
            KinematicsMode::Descent => Vec2::new(0.0, self.descent_speed),
        };

        let entity = Entity {
            id,
            pos,
            vel,
            size: EntitySize::Large,
            problem,
            is_missed: bank.is_weak(problem),
        };
        log::debug!(
            "Spawned #{} {} at ({:.0}, {:.0}){}",
            id,
            problem,
            pos.x,
            pos.y,
            if entity.is_missed { " [missed]" } else { "" }
        );
        Ok(Spawn { entity, fallback })
    }

    /// Split a large enemy into two small ones with fresh problems
    ///
    /// Children start at the parent's position and fly off at ± `split_angle`
    /// from the parent's heading, faster than the parent. A stationary parent
    /// still yields moving children.
    ///
    /// # Panics
    /// If `parent` is not large.
    pub fn split<R: Rng + ?Sized>(
        &self,
        parent: &Entity,
        ids: [u32; 2],
        rng: &mut R,
        bank: &FactBank,
    ) -> Result<[Entity; 2], SimError> {
        assert_eq!(
            parent.size,
            EntitySize::Large,
            "only large entities split (entity #{})",
            parent.id
        );

        let scaled = parent.vel * self.split_speed_scale;
        let base = if scaled.length() >= self.min_split_speed {
            scaled
        } else {
            scaled.try_normalize().unwrap_or(Vec2::X) * self.min_split_speed
        };

        let mut child = |id: u32, angle: f32| -> Result<Entity, SimError> {
            let problem = self
                .generator
                .next(&mut *rng, bank, self.min_factor, self.max_factor)?;
            Ok(Entity {
                id,
                pos: parent.pos,
                vel: Vec2::from_angle(angle).rotate(base),
                size: EntitySize::Small,
                problem,
                is_missed: bank.is_weak(problem),
            })
        };

        let left = child(ids[0], self.split_angle)?;
        let right = child(ids[1], -self.split_angle)?;
        log::debug!(
            "Split #{} into #{} {} and #{} {}",
            parent.id,
            left.id,
            left.problem,
            right.id,
            right.problem
        );
        Ok([left, right])
    }

    fn sample_position<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec2 {
        match self.mode {
            KinematicsMode::Momentum => Vec2::new(
                rng.random_range(0.0..self.field.x),
                rng.random_range(0.0..self.field.y),
            ),
            KinematicsMode::Descent => {
                let margin = EntitySize::Large.radius().min(self.field.x / 2.0);
                let band = (self.field.y * INVADER_SPAWN_BAND).max(margin + 1.0);
                Vec2::new(
                    rng.random_range(margin..=self.field.x - margin),
                    rng.random_range(margin..=band),
                )
            }
        }
    }
}
