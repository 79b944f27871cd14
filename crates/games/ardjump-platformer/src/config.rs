use ardjump_core::config;
pub use ardjump_core::config::ConfigError;
use serde::{Deserialize, Serialize};

/// Integrator and collision response constants. Units are world units and ticks.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Added to vy every airborne tick (y grows downward).
    pub gravity: f32,
    /// vx multiplier per grounded tick.
    pub ground_friction: f32,
    /// vx multiplier per airborne tick.
    pub air_drag: f32,
    /// Landing / head-bump window around a platform face.
    pub contact_tolerance: f32,
    /// Head-bump window for obstacles.
    pub obstacle_head_tolerance: f32,
    /// Gap left between an entity and the face it was pushed out of.
    pub side_margin: f32,
    pub platform_side_restitution: f32,
    pub obstacle_side_restitution: f32,
    /// Downward speed after bumping a platform from below.
    pub head_bump_speed: f32,
    /// Downward speed after bumping an obstacle from below.
    pub obstacle_head_bounce: f32,
    /// Coyote-time buffer in ticks.
    pub coyote_ticks: u32,
    /// How far feet may sit from a platform top and still count as resting on it.
    pub rest_tolerance: f32,
    pub entity_width: f32,
    pub entity_height: f32,
    /// Falling this far below the viewport counts as a void fall.
    pub void_margin: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: 0.8,
            ground_friction: 0.8,
            air_drag: 0.99,
            contact_tolerance: 20.0,
            obstacle_head_tolerance: 15.0,
            side_margin: 5.0,
            platform_side_restitution: 0.5,
            obstacle_side_restitution: 0.8,
            head_bump_speed: 3.0,
            obstacle_head_bounce: 5.0,
            coyote_ticks: 5,
            rest_tolerance: 0.5,
            entity_width: 40.0,
            entity_height: 40.0,
            void_margin: 100.0,
        }
    }
}

/// Charge bar and launch constants.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JumpConfig {
    /// Power gained per tick while charging.
    pub charge_rate: f32,
    pub max_power: f32,
    /// Upward speed gained at full power, on top of `base_lift`.
    pub lift: f32,
    pub base_lift: f32,
    /// Forward speed gained at full power, on top of `base_thrust`.
    pub thrust: f32,
    pub base_thrust: f32,
    /// Releases closer together than this extend the combo.
    pub combo_window_ms: f64,
    /// Score multiplier added per combo step.
    pub combo_step: f64,
}

impl Default for JumpConfig {
    fn default() -> Self {
        Self {
            charge_rate: 2.0,
            max_power: 100.0,
            lift: 15.0,
            base_lift: 5.0,
            thrust: 8.0,
            base_thrust: 2.0,
            combo_window_ms: 2000.0,
            combo_step: 0.1,
        }
    }
}

/// Level generation and course geometry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    pub finish_distance: f32,
    pub viewport_width: f32,
    pub viewport_height: f32,
    /// Landing on the finish platform only counts beyond `finish_distance - finish_zone`.
    pub finish_zone: f32,
    pub spawn_x: f32,
    /// Spawn sits this far above the bottom of the viewport.
    pub spawn_height: f32,
    pub solo_finish_width: f32,
    pub race_finish_width: f32,
    pub solo_obstacle_chance: f64,
    /// No solo obstacles this close to the finish.
    pub solo_obstacle_clearance: f32,
    pub checkpoint_interval: f32,
    pub checkpoint_width: f32,
    /// Relative weights of ground run, void crossing, staircase and two-tier combo.
    pub archetype_weights: [f64; 4],
    /// Chance of a bonus coin cluster after each race section.
    pub coin_cluster_chance: f64,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            finish_distance: 5000.0,
            viewport_width: 1280.0,
            viewport_height: 800.0,
            finish_zone: 300.0,
            spawn_x: 150.0,
            spawn_height: 200.0,
            solo_finish_width: 400.0,
            race_finish_width: 500.0,
            solo_obstacle_chance: 0.4,
            solo_obstacle_clearance: 500.0,
            checkpoint_interval: 1000.0,
            checkpoint_width: 150.0,
            archetype_weights: [1.0, 1.0, 1.0, 1.0],
            coin_cluster_chance: 0.3,
        }
    }
}

impl LevelConfig {
    pub fn ground_level(&self) -> f32 {
        self.viewport_height - 100.0
    }

    pub fn mid_level(&self) -> f32 {
        self.viewport_height - 250.0
    }

    pub fn high_level(&self) -> f32 {
        self.viewport_height - 400.0
    }

    pub fn spawn_y(&self) -> f32 {
        self.viewport_height - self.spawn_height
    }

    /// Entities below this y have fallen into the void.
    pub fn void_y(&self, physics: &PhysicsConfig) -> f32 {
        self.viewport_height + physics.void_margin
    }
}

/// Opponent timing model.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    /// Chance to start charging when the think timer runs out.
    pub commit_chance: f64,
    /// Chance a committed jump aims for `good_power` instead of `weak_power`.
    pub good_chance: f64,
    pub good_power: [f32; 2],
    pub weak_power: [f32; 2],
    /// Release happens at target ± this much charge.
    pub release_noise: f32,
    /// Ticks to wait after a release before thinking again.
    pub think_delay: [f32; 2],
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            commit_chance: 0.7,
            good_chance: 0.5,
            good_power: [60.0, 100.0],
            weak_power: [30.0, 80.0],
            release_noise: 10.0,
            think_delay: [10.0, 30.0],
        }
    }
}

/// Score rules for the human runner.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub obstacle_head_penalty: i64,
    pub obstacle_side_penalty: i64,
    /// Race only: falling into the void.
    pub void_penalty: i64,
    pub checkpoint_bonus: i64,
    pub coin_value: i64,
    pub victory_bonus: i64,
    /// Solo only: bonus per second left on the clock at the finish.
    pub time_bonus_per_sec: i64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            obstacle_head_penalty: 10,
            obstacle_side_penalty: 5,
            void_penalty: 50,
            checkpoint_bonus: 20,
            coin_value: 10,
            victory_bonus: 1000,
            time_bonus_per_sec: 10,
        }
    }
}

/// Single-player run limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SoloConfig {
    pub lives: u32,
    pub time_limit_secs: u32,
}

impl Default for SoloConfig {
    fn default() -> Self {
        Self {
            lives: 3,
            time_limit_secs: 180,
        }
    }
}

/// Top-level platformer configuration, loadable from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformerConfig {
    pub physics: PhysicsConfig,
    pub jump: JumpConfig,
    pub level: LevelConfig,
    pub bot: BotConfig,
    pub scoring: ScoringConfig,
    pub solo: SoloConfig,
}

impl PlatformerConfig {
    /// Parse a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        config::parse_toml(content)
    }

    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        config::read_toml(path)
    }

    /// Load config from `ARDJUMP_PLATFORMER_CONFIG` or `config/platformer.toml`.
    /// Falls back to defaults if the file is missing or unparseable.
    pub fn load() -> Self {
        config::load_or_default("ARDJUMP_PLATFORMER_CONFIG", "config/platformer.toml")
    }
}
