//! Firing, bullet/enemy collision detection and hit/miss resolution
//!
//! A bullet carries the player's answer. Striking an enemy with the right
//! answer destroys it (large enemies split in two); the wrong answer records
//! a miss of the enemy's fact. Resolution touches only the score, the fact
//! bank, and the entity and bullet sets. No I/O.

use super::score::points_for;
use super::state::{Bullet, EntitySize, GameEvent, GameState};
use crate::error::SimError;
use crate::heading_dir;
use crate::settings::MissPolicy;

/// Outcome of one bullet striking one enemy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombatOutcome {
    /// Correct answer; `children` holds the split ids for a large enemy
    Hit { points: u64, children: Option<[u32; 2]> },
    /// Wrong answer
    Miss { bullet_consumed: bool },
}

/// Fire a bullet from the ship along its heading
pub fn fire(state: &mut GameState, payload: i64) -> Result<u32, SimError> {
    state.require_playing("fire")?;
    let id = state.next_entity_id();
    state.bullets.push(Bullet {
        id,
        pos: state.ship.pos,
        vel: heading_dir(state.ship.heading) * state.settings.bullet_speed,
        payload,
        ttl_ticks: state.settings.bullet_ttl_ticks,
        struck: Vec::new(),
    });
    log::debug!("Fired #{} carrying {}", id, payload);
    state.events.push(GameEvent::Fired {
        bullet_id: id,
        payload,
    });
    Ok(id)
}

/// Overlapping (bullet, enemy) pairs, ordered by bullet id then enemy id
///
/// Pairs a pass-through bullet already missed are skipped.
pub fn detect_collisions(state: &GameState) -> Vec<(u32, u32)> {
    let mut pairs = Vec::new();
    for bullet in &state.bullets {
        for entity in &state.entities {
            if bullet.struck.contains(&entity.id) {
                continue;
            }
            let reach = bullet.radius() + entity.radius();
            if bullet.pos.distance_squared(entity.pos) <= reach * reach {
                pairs.push((bullet.id, entity.id));
            }
        }
    }
    pairs.sort_unstable();
    pairs
}

/// Resolve a bullet striking an enemy
pub fn resolve_collision(
    state: &mut GameState,
    bullet_id: u32,
    entity_id: u32,
) -> Result<CombatOutcome, SimError> {
    state.require_playing("resolve a collision")?;
    let bullet_idx = state
        .bullets
        .iter()
        .position(|b| b.id == bullet_id)
        .ok_or(SimError::UnknownBullet(bullet_id))?;
    let entity_idx = state
        .entities
        .iter()
        .position(|e| e.id == entity_id)
        .ok_or(SimError::UnknownEntity(entity_id))?;

    let payload = state.bullets[bullet_idx].payload;
    let problem = state.entities[entity_idx].problem;
    let correct = i64::try_from(problem.answer()).is_ok_and(|answer| answer == payload);

    if correct {
        // Split first so a failure leaves the entity and bullet in place
        let entity = state.entities[entity_idx].clone();
        let split = match entity.size {
            EntitySize::Large => {
                let ids = [state.next_entity_id(), state.next_entity_id()];
                Some(state.spawner().split(&entity, ids, &mut state.rng, &state.facts)?)
            }
            EntitySize::Small => None,
        };
        state.entities.remove(entity_idx);
        state.bullets.remove(bullet_idx);

        let points = points_for(entity.problem, entity.is_missed);
        state.score.add(points);
        state.hits += 1;
        log::debug!("Hit #{} {} for {} points", entity.id, entity.problem, points);
        state.events.push(GameEvent::Hit {
            entity_id,
            problem,
            points,
        });

        let children = split.map(|pair| {
            let ids = [pair[0].id, pair[1].id];
            for child in &pair {
                state.events.push(GameEvent::Spawned {
                    entity_id: child.id,
                    problem: child.problem,
                    is_missed: child.is_missed,
                });
            }
            state.entities.extend(pair);
            state.events.push(GameEvent::Split {
                parent_id: entity.id,
                children: ids,
            });
            ids
        });

        Ok(CombatOutcome::Hit { points, children })
    } else {
        // The struck entity keeps its spawn-time highlight
        state.facts.record_miss(problem);
        state.misses += 1;
        state.events.push(GameEvent::Missed {
            entity_id,
            problem,
            payload,
        });

        let bullet_consumed = match state.settings.miss_policy {
            MissPolicy::Consume => {
                state.bullets.remove(bullet_idx);
                true
            }
            MissPolicy::PassThrough => {
                state.bullets[bullet_idx].struck.push(entity_id);
                false
            }
        };

        if state.settings.replace_on_miss {
            state.entities.remove(entity_idx);
            state.spawn_enemy()?;
        }

        Ok(CombatOutcome::Miss { bullet_consumed })
    }
}

/// Detect and resolve every collision of this tick
///
/// Pairs whose bullet or enemy was removed by an earlier pair are skipped.
pub fn resolve_collisions(state: &mut GameState) -> Result<(), SimError> {
    for (bullet_id, entity_id) in detect_collisions(state) {
        let live = state.bullets.iter().any(|b| b.id == bullet_id)
            && state.entities.iter().any(|e| e.id == entity_id);
        if live {
            resolve_collision(state, bullet_id, entity_id)?;
        }
    }
    Ok(())
}
