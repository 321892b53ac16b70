//! Game state and core simulation types
//!
//! `GameState` is the single owner of every mutable collection. The external
//! shell reads and writes it only through the operations defined here and in
//! the sibling modules.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::combat;
use super::facts::{Fact, FactBank};
use super::physics::{self, KinematicsMode};
use super::score::ScoreKeeper;
use super::spawn::EntitySpawner;
use crate::consts::{BULLET_RADIUS, LARGE_RADIUS, SMALL_RADIUS};
use crate::error::SimError;
use crate::settings::Settings;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the start signal
    NotStarted,
    /// Active gameplay
    Playing,
    /// Run ended (decided by the shell)
    Ended,
}

/// Enemy size. Large enemies split in two when destroyed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntitySize {
    Large,
    Small,
}

impl EntitySize {
    pub fn radius(&self) -> f32 {
        match self {
            EntitySize::Large => LARGE_RADIUS,
            EntitySize::Small => SMALL_RADIUS,
        }
    }
}

/// An enemy (asteroid or alien) carrying a problem
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: u32,
    pub pos: Vec2,
    /// Base velocity; descent mode scales it at integration time
    pub vel: Vec2,
    pub size: EntitySize,
    pub problem: Fact,
    /// Weak-fact highlight, fixed when the entity spawned
    pub is_missed: bool,
}

impl Entity {
    pub fn radius(&self) -> f32 {
        self.size.radius()
    }
}

/// A bullet carrying the player's answer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub payload: i64,
    pub ttl_ticks: u32,
    /// Entities this bullet already missed (pass-through policy)
    #[serde(default)]
    pub struck: Vec<u32>,
}

impl Bullet {
    pub fn radius(&self) -> f32 {
        BULLET_RADIUS
    }
}

/// The player's ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ship {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Facing angle in radians (screen coordinates, -π/2 points up)
    pub heading: f32,
    pub thrust_engaged: bool,
    /// Turn input in [-1, 1]
    pub turn: f32,
}

impl Ship {
    /// Starting ship for a kinematics mode
    pub fn spawn(mode: KinematicsMode, field: Vec2) -> Self {
        let pos = match mode {
            KinematicsMode::Momentum => field / 2.0,
            KinematicsMode::Descent => Vec2::new(field.x / 2.0, field.y - 40.0),
        };
        Self {
            pos,
            vel: Vec2::ZERO,
            heading: -std::f32::consts::FRAC_PI_2,
            thrust_engaged: false,
            turn: 0.0,
        }
    }
}

/// Things that happened during a tick, drained by the shell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Started,
    Ended { score: u64 },
    WaveStarted { wave: u32, enemies: u32 },
    Spawned { entity_id: u32, problem: Fact, is_missed: bool },
    SpawnFallback { entity_id: u32, distance: f32 },
    Fired { bullet_id: u32, payload: i64 },
    Hit { entity_id: u32, problem: Fact, points: u64 },
    Split { parent_id: u32, children: [u32; 2] },
    Missed { entity_id: u32, problem: Fact, payload: i64 },
    Escaped { entity_id: u32, problem: Fact },
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    pub settings: Settings,
    /// Run seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub phase: GamePhase,
    /// Current wave (1-based once started)
    pub wave: u32,
    pub score: ScoreKeeper,
    pub facts: FactBank,
    pub ship: Ship,
    /// Active enemies (sorted by id for determinism)
    pub entities: Vec<Entity>,
    /// Active bullets (sorted by id for determinism)
    pub bullets: Vec<Bullet>,
    /// Global fast-descent toggle (descent mode only)
    pub is_fast_descent: bool,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Correct answers
    pub hits: u32,
    /// Wrong answers and escaped enemies
    pub misses: u32,
    pub(crate) events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a new game state; rejects invalid settings up front
    pub fn new(settings: Settings, seed: u64) -> Result<Self, SimError> {
        settings.validate()?;
        let mode = settings.variant.kinematics();
        Ok(Self {
            ship: Ship::spawn(mode, settings.field()),
            settings,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::NotStarted,
            wave: 0,
            score: ScoreKeeper::new(),
            facts: FactBank::new(),
            entities: Vec::new(),
            bullets: Vec::new(),
            is_fast_descent: false,
            time_ticks: 0,
            hits: 0,
            misses: 0,
            events: Vec::new(),
            next_id: 1,
        })
    }

    /// Replace the fact bank (restored from storage before starting)
    pub fn with_fact_bank(mut self, facts: FactBank) -> Self {
        self.facts = facts;
        self
    }

    pub fn kinematics(&self) -> KinematicsMode {
        self.settings.variant.kinematics()
    }

    /// Spawner for the current settings
    pub fn spawner(&self) -> EntitySpawner {
        EntitySpawner::from_settings(&self.settings)
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Fail unless the session is in `Playing`
    pub fn require_playing(&self, action: &'static str) -> Result<(), SimError> {
        if self.phase == GamePhase::Playing {
            Ok(())
        } else {
            Err(SimError::InvalidState {
                action,
                phase: self.phase,
            })
        }
    }

    /// NotStarted → Playing, spawning the first wave
    pub fn start(&mut self) -> Result<(), SimError> {
        if self.phase != GamePhase::NotStarted {
            return Err(SimError::InvalidState {
                action: "start",
                phase: self.phase,
            });
        }
        self.phase = GamePhase::Playing;
        log::info!(
            "{} started (seed {}, {} weak facts)",
            self.settings.variant.as_str(),
            self.seed,
            self.facts.len()
        );
        self.events.push(GameEvent::Started);
        self.start_next_wave()
    }

    /// Playing → Ended
    pub fn end(&mut self) -> Result<(), SimError> {
        self.require_playing("end")?;
        self.phase = GamePhase::Ended;
        log::info!("Game over: score {}, wave {}", self.score.total(), self.wave);
        self.events.push(GameEvent::Ended {
            score: self.score.total(),
        });
        Ok(())
    }

    pub fn set_thrust(&mut self, engaged: bool) -> Result<(), SimError> {
        self.require_playing("set thrust")?;
        self.ship.thrust_engaged = engaged;
        Ok(())
    }

    pub fn set_turn(&mut self, turn: f32) -> Result<(), SimError> {
        self.require_playing("turn")?;
        self.ship.turn = turn.clamp(-1.0, 1.0);
        Ok(())
    }

    pub fn set_fast_descent(&mut self, active: bool) -> Result<(), SimError> {
        self.require_playing("toggle fast descent")?;
        if self.is_fast_descent != active {
            log::debug!("Fast descent {}", if active { "on" } else { "off" });
        }
        self.is_fast_descent = active;
        Ok(())
    }

    /// Fire a bullet carrying `payload`; returns the bullet id
    pub fn fire(&mut self, payload: i64) -> Result<u32, SimError> {
        combat::fire(self, payload)
    }

    /// Spawn one enemy outside the ship's safe zone; returns its id
    pub fn spawn_enemy(&mut self) -> Result<u32, SimError> {
        self.require_playing("spawn")?;
        let id = self.next_entity_id();
        let spawn = self
            .spawner()
            .spawn(id, self.ship.pos, &mut self.rng, &self.facts)?;
        if spawn.fallback {
            self.events.push(GameEvent::SpawnFallback {
                entity_id: id,
                distance: spawn.entity.pos.distance(self.ship.pos),
            });
        }
        self.events.push(GameEvent::Spawned {
            entity_id: id,
            problem: spawn.entity.problem,
            is_missed: spawn.entity.is_missed,
        });
        self.entities.push(spawn.entity);
        Ok(id)
    }

    /// Advance the wave counter and spawn a full wave
    pub fn start_next_wave(&mut self) -> Result<(), SimError> {
        self.wave += 1;
        for _ in 0..self.settings.wave_size {
            self.spawn_enemy()?;
        }
        log::info!("Wave {} ({} enemies)", self.wave, self.settings.wave_size);
        self.events.push(GameEvent::WaveStarted {
            wave: self.wave,
            enemies: self.settings.wave_size,
        });
        Ok(())
    }

    /// Velocity an entity actually moves with this tick
    pub fn effective_velocity(&self, entity: &Entity) -> Vec2 {
        physics::effective_velocity(
            entity.vel,
            self.kinematics(),
            self.is_fast_descent,
            self.settings.fast_descent_multiplier,
        )
    }

    /// Take the events recorded since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Ensure collections are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.entities.sort_by_key(|e| e.id);
        self.bullets.sort_by_key(|b| b.id);
    }
}
