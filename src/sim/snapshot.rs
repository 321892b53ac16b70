//! Read-only view of the simulation for renderers and test harnesses

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{EntitySize, GamePhase, GameState};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipView {
    pub pos: Vec2,
    pub vel: Vec2,
    pub heading: f32,
    pub thrust_engaged: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityView {
    pub id: u32,
    pub pos: Vec2,
    /// Velocity including any fast-descent multiplier
    pub vel: Vec2,
    pub size: EntitySize,
    pub radius: f32,
    /// Problem label, e.g. `6×7`
    pub problem: String,
    pub is_missed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulletView {
    pub id: u32,
    pub pos: Vec2,
    pub payload: i64,
}

/// Everything the shell may observe after a tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub wave: u32,
    pub score: u64,
    pub hits: u32,
    pub misses: u32,
    pub ship: ShipView,
    pub entities: Vec<EntityView>,
    pub bullets: Vec<BulletView>,
    pub safe_zone_radius: f32,
    pub fast_descent_multiplier: f32,
    pub is_fast_descent: bool,
}

impl Snapshot {
    pub fn capture(state: &GameState) -> Self {
        Self {
            phase: state.phase,
            wave: state.wave,
            score: state.score.total(),
            hits: state.hits,
            misses: state.misses,
            ship: ShipView {
                pos: state.ship.pos,
                vel: state.ship.vel,
                heading: state.ship.heading,
                thrust_engaged: state.ship.thrust_engaged,
            },
            entities: state
                .entities
                .iter()
                .map(|e| EntityView {
                    id: e.id,
                    pos: e.pos,
                    vel: state.effective_velocity(e),
                    size: e.size,
                    radius: e.radius(),
                    problem: e.problem.label(),
                    is_missed: e.is_missed,
                })
                .collect(),
            bullets: state
                .bullets
                .iter()
                .map(|b| BulletView {
                    id: b.id,
                    pos: b.pos,
                    payload: b.payload,
                })
                .collect(),
            safe_zone_radius: state.settings.safe_zone_radius,
            fast_descent_multiplier: state.settings.fast_descent_multiplier,
            is_fast_descent: state.is_fast_descent,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::GameVariant;
    use crate::sim::facts::Fact;
    use crate::test_utils::fixtures;

    #[test]
    fn test_snapshot_labels_and_flags() {
        let mut state = fixtures::lone_enemy(GameVariant::Invaders, Fact::new(7, 6), EntitySize::Large, true);
        state.set_fast_descent(true).unwrap();
        let snap = Snapshot::capture(&state);

        assert_eq!(snap.entities.len(), 1);
        assert_eq!(snap.entities[0].problem, "7×6");
        assert!(snap.entities[0].is_missed);
        assert!(snap.is_fast_descent);
        assert_eq!(
            snap.entities[0].vel.y,
            state.entities[0].vel.y * snap.fast_descent_multiplier
        );
        assert_eq!(snap.safe_zone_radius, state.settings.safe_zone_radius);
    }

    #[test]
    fn test_snapshot_json() {
        let state = fixtures::playing_state(GameVariant::Asteroids, 2);
        let json = Snapshot::capture(&state).to_json().unwrap();
        let back: Snapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back.entities.len(), state.entities.len());
        assert_eq!(back.phase, GamePhase::Playing);
    }
}
