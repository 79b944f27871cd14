use ardjump_core::config;
pub use ardjump_core::config::ConfigError;
use serde::{Deserialize, Serialize};

/// Ball motion over the [0, 100] track.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BallConfig {
    /// Slowest speed, in track percent per tick.
    pub base_speed: f64,
    /// Each roll adds U[0, spread) on top of `base_speed`.
    pub speed_spread: f64,
}

impl Default for BallConfig {
    fn default() -> Self {
        Self {
            base_speed: 3.0,
            speed_spread: 2.0,
        }
    }
}

/// Position remapping and payout rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HouseEdgeConfig {
    /// Manipulation percent added per consecutive win.
    pub win_step_pct: f64,
    /// Profit is divided by this to get its manipulation percent.
    pub profit_divisor: f64,
    /// Cap on the profit term.
    pub profit_cap_pct: f64,
    /// Zones paying at least this much are remapped.
    pub manipulate_min_multiplier: f64,
    /// Rounds at or above this multiplier count as wins.
    pub win_multiplier: f64,
    /// Payout bonus per streak step.
    pub streak_bonus: f64,
    /// Multiplier drop that triggers a near-miss notice.
    pub near_miss_threshold: f64,
    pub near_miss_delay_ms: f64,
    pub near_miss_duration_ms: u32,
}

impl Default for HouseEdgeConfig {
    fn default() -> Self {
        Self {
            win_step_pct: 1.5,
            profit_divisor: 100.0,
            profit_cap_pct: 5.0,
            manipulate_min_multiplier: 5.0,
            win_multiplier: 2.0,
            streak_bonus: 0.1,
            near_miss_threshold: 3.0,
            near_miss_delay_ms: 500.0,
            near_miss_duration_ms: 2000,
        }
    }
}

/// Deferred stop injection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LagConfig {
    /// Consecutive wins needed before the streak rule applies.
    pub streak_trigger: u32,
    pub streak_chance: f64,
    /// Profit above this share of the balance arms the profit rule.
    pub profit_ratio: f64,
    pub profit_chance: f64,
    /// Delay range in milliseconds.
    pub delay_ms: [f64; 2],
}

impl Default for LagConfig {
    fn default() -> Self {
        Self {
            streak_trigger: 2,
            streak_chance: 0.15,
            profit_ratio: 0.2,
            profit_chance: 0.25,
            delay_ms: [20.0, 50.0],
        }
    }
}

/// Top-level bounce configuration, loadable from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BounceConfig {
    pub starting_balance: i64,
    pub min_bet: i64,
    pub default_bet: i64,
    pub ball: BallConfig,
    pub house_edge: HouseEdgeConfig,
    pub lag: LagConfig,
}

impl Default for BounceConfig {
    fn default() -> Self {
        Self {
            starting_balance: 1000,
            min_bet: 10,
            default_bet: 50,
            ball: BallConfig::default(),
            house_edge: HouseEdgeConfig::default(),
            lag: LagConfig::default(),
        }
    }
}

impl BounceConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        config::parse_toml(content)
    }

    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        config::read_toml(path)
    }

    /// Load config from `ARDJUMP_BOUNCE_CONFIG` or `config/bounce.toml`.
    /// Falls back to defaults if the file is missing or unparseable.
    pub fn load() -> Self {
        config::load_or_default("ARDJUMP_BOUNCE_CONFIG", "config/bounce.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_keeps_defaults() {
        let cfg = BounceConfig::from_toml_str(
            r#"
            min_bet = 25

            [lag]
            delay_ms = [10.0, 15.0]
            "#,
        )
        .unwrap();
        assert_eq!(cfg.min_bet, 25);
        assert_eq!(cfg.starting_balance, 1000);
        assert_eq!(cfg.lag.delay_ms, [10.0, 15.0]);
        assert_eq!(cfg.lag.streak_chance, 0.15);
        assert_eq!(cfg.house_edge.near_miss_threshold, 3.0);
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        assert!(matches!(
            BounceConfig::from_toml_str("[house_edge\n"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn shipped_config_matches_defaults() {
        let cfg = BounceConfig::from_toml_str(include_str!("../../../../config/bounce.toml")).unwrap();
        assert_eq!(cfg.starting_balance, 1000);
        assert_eq!(cfg.house_edge.near_miss_delay_ms, 500.0);
        assert_eq!(cfg.lag.delay_ms, LagConfig::default().delay_ms);
    }
}
