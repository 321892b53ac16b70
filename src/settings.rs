//! Game settings and tuning
//!
//! Fixed at simulation construction. Persisted separately from the
//! missed-fact records.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::SimError;
use crate::persistence::KeyValueStore;
use crate::sim::KinematicsMode;

/// Which of the two games is being played
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GameVariant {
    #[default]
    Asteroids,
    Invaders,
}

impl GameVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameVariant::Asteroids => "Asteroids",
            GameVariant::Invaders => "Invaders",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "asteroids" | "math-asteroids" => Some(GameVariant::Asteroids),
            "invaders" | "math-invaders" => Some(GameVariant::Invaders),
            _ => None,
        }
    }

    /// Kinematics used by this variant
    pub fn kinematics(&self) -> KinematicsMode {
        match self {
            GameVariant::Asteroids => KinematicsMode::Momentum,
            GameVariant::Invaders => KinematicsMode::Descent,
        }
    }

    /// Namespace prefix for everything this variant stores
    pub fn storage_prefix(&self) -> &'static str {
        match self {
            GameVariant::Asteroids => "math_asteroids",
            GameVariant::Invaders => "math_invaders",
        }
    }

    /// Storage key for the missed-fact records
    pub fn storage_key(&self) -> String {
        format!("{}_missed_facts", self.storage_prefix())
    }

    /// Storage key for the leaderboard
    pub fn highscores_key(&self) -> String {
        format!("{}_highscores", self.storage_prefix())
    }
}

/// What happens to a bullet whose payload was wrong for the struck enemy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum MissPolicy {
    /// Bullet is removed on the first enemy it strikes
    #[default]
    Consume,
    /// Bullet keeps flying and may strike other enemies
    PassThrough,
}

/// Simulation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub variant: GameVariant,

    // === Problems ===
    /// Smallest factor generated (inclusive)
    pub min_factor: u32,
    /// Largest factor generated (inclusive)
    pub max_factor: u32,
    /// Probability of drawing from weak facts (0.0 - 1.0)
    pub p_weak: f64,

    // === Field ===
    pub field_width: f32,
    pub field_height: f32,
    pub safe_zone_radius: f32,
    pub spawn_attempts: u32,
    pub wave_size: u32,

    // === Kinematics ===
    pub fast_descent_multiplier: f32,
    pub descent_speed: f32,
    pub asteroid_speed: f32,
    pub thrust_accel: f32,
    pub max_ship_speed: f32,
    pub turn_rate: f32,
    /// Fraction of ship velocity lost per tick (0 keeps full momentum)
    pub friction: f32,
    pub split_angle: f32,
    pub split_speed_scale: f32,
    pub min_split_speed: f32,

    // === Bullets ===
    pub bullet_speed: f32,
    pub bullet_ttl_ticks: u32,
    pub miss_policy: MissPolicy,
    /// Remove and respawn an enemy struck with a wrong answer
    pub replace_on_miss: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self::for_variant(GameVariant::Asteroids)
    }
}

impl Settings {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "math_arcade_settings";

    /// Default settings for a variant
    pub fn for_variant(variant: GameVariant) -> Self {
        let wave_size = match variant {
            GameVariant::Asteroids => ASTEROID_WAVE_SIZE,
            GameVariant::Invaders => INVADER_WAVE_SIZE,
        };
        Self {
            variant,

            min_factor: MIN_FACTOR,
            max_factor: MAX_FACTOR,
            p_weak: P_WEAK,

            field_width: FIELD_WIDTH,
            field_height: FIELD_HEIGHT,
            safe_zone_radius: SAFE_ZONE_RADIUS,
            spawn_attempts: SPAWN_ATTEMPTS,
            wave_size,

            fast_descent_multiplier: FAST_DESCENT_MULTIPLIER,
            descent_speed: DESCENT_SPEED,
            asteroid_speed: ASTEROID_SPEED,
            thrust_accel: SHIP_THRUST_ACCEL,
            max_ship_speed: SHIP_MAX_SPEED,
            turn_rate: SHIP_TURN_RATE,
            friction: SHIP_FRICTION,
            split_angle: SPLIT_ANGLE,
            split_speed_scale: SPLIT_SPEED_SCALE,
            min_split_speed: MIN_SPLIT_SPEED,

            bullet_speed: BULLET_SPEED,
            bullet_ttl_ticks: BULLET_TTL_TICKS,
            miss_policy: MissPolicy::Consume,
            replace_on_miss: false,
        }
    }

    /// Field size as a vector
    pub fn field(&self) -> Vec2 {
        Vec2::new(self.field_width, self.field_height)
    }

    /// Reject configurations the simulation cannot honor
    pub fn validate(&self) -> Result<(), SimError> {
        if self.min_factor > self.max_factor {
            return Err(SimError::InvalidRange {
                min: self.min_factor,
                max: self.max_factor,
            });
        }
        if !(0.0..=1.0).contains(&self.p_weak) {
            return Err(SimError::InvalidConfig(format!(
                "p_weak must be within [0, 1], got {}",
                self.p_weak
            )));
        }
        if self.field_width <= 0.0 || self.field_height <= 0.0 {
            return Err(SimError::InvalidConfig("field must have positive size".into()));
        }
        if self.safe_zone_radius < 0.0 {
            return Err(SimError::InvalidConfig("safe zone radius is negative".into()));
        }
        if self.spawn_attempts == 0 {
            return Err(SimError::InvalidConfig("spawn_attempts must be at least 1".into()));
        }
        if self.fast_descent_multiplier <= 0.0 {
            return Err(SimError::InvalidConfig(
                "fast descent multiplier must be positive".into(),
            ));
        }
        if !(0.0..1.0).contains(&self.friction) {
            return Err(SimError::InvalidConfig(format!(
                "friction must be within [0, 1), got {}",
                self.friction
            )));
        }
        if self.min_split_speed <= 0.0 || self.split_speed_scale <= 0.0 {
            return Err(SimError::InvalidConfig("split speeds must be positive".into()));
        }
        Ok(())
    }

    /// Load settings from a store, falling back to variant defaults
    pub fn load(store: &dyn KeyValueStore, variant: GameVariant) -> Self {
        let loaded = match store.get(Self::STORAGE_KEY) {
            Ok(Some(json)) => serde_json::from_str::<Settings>(&json).ok(),
            Ok(None) => None,
            Err(e) => {
                log::warn!("Could not read settings: {}", e);
                None
            }
        };

        match loaded {
            Some(settings) if settings.variant == variant && settings.validate().is_ok() => {
                log::info!("Loaded settings for {}", variant.as_str());
                settings
            }
            _ => {
                log::info!("Using default settings for {}", variant.as_str());
                Self::for_variant(variant)
            }
        }
    }

    /// Save settings to a store
    pub fn save(&self, store: &mut dyn KeyValueStore) {
        match serde_json::to_string(self) {
            Ok(json) => match store.set(Self::STORAGE_KEY, &json) {
                Ok(()) => log::info!("Settings saved"),
                Err(e) => log::warn!("Could not save settings: {}", e),
            },
            Err(e) => log::warn!("Could not encode settings: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_defaults_validate() {
        assert!(Settings::for_variant(GameVariant::Asteroids).validate().is_ok());
        assert!(Settings::for_variant(GameVariant::Invaders).validate().is_ok());
    }

    #[test]
    fn test_rejects_inverted_range() {
        let settings = Settings {
            min_factor: 9,
            max_factor: 3,
            ..Settings::default()
        };
        assert_eq!(
            settings.validate(),
            Err(SimError::InvalidRange { min: 9, max: 3 })
        );
    }

    #[test]
    fn test_rejects_bad_probability() {
        let settings = Settings {
            p_weak: 1.5,
            ..Settings::default()
        };
        assert!(matches!(settings.validate(), Err(SimError::InvalidConfig(_))));
    }

    #[test]
    fn test_variant_keys_are_namespaced() {
        assert_ne!(
            GameVariant::Asteroids.storage_key(),
            GameVariant::Invaders.storage_key()
        );
        assert_eq!(
            GameVariant::Invaders.storage_key(),
            "math_invaders_missed_facts"
        );
        assert_eq!(GameVariant::from_str("Invaders"), Some(GameVariant::Invaders));
    }

    #[test]
    fn test_load_save() {
        let mut store = MemoryStore::new();
        let mut settings = Settings::for_variant(GameVariant::Invaders);
        settings.max_factor = 9;
        settings.save(&mut store);

        let loaded = Settings::load(&store, GameVariant::Invaders);
        assert_eq!(loaded.max_factor, 9);

        // Stored settings for another variant are ignored
        let other = Settings::load(&store, GameVariant::Asteroids);
        assert_eq!(other.max_factor, MAX_FACTOR);
    }
}
