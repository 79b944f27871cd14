//! Payout manipulation: where the ball is shown to stop versus where it
//! is paid out, the streak-scaled payout, and deferred stop injection.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::{HouseEdgeConfig, LagConfig};
use crate::zones::{Zone, classify};

/// Outcome of resolving a stop position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    /// Where the ball visibly stopped.
    pub stop_position: f64,
    pub displayed: Zone,
    /// Position used for the payout.
    pub actual_position: f64,
    /// Zone that is paid.
    pub paid: Zone,
}

impl Resolution {
    /// The shown zone pays more than the paid one by at least `threshold`.
    pub fn is_near_miss(&self, threshold: f64) -> bool {
        self.displayed.multiplier - self.paid.multiplier >= threshold
    }
}

/// Manipulation percentage for the current session. Only a positive profit
/// adds to the streak term.
pub fn manipulation_pct(consecutive_wins: u32, total_profit: i64, cfg: &HouseEdgeConfig) -> f64 {
    let mut pct = f64::from(consecutive_wins) * cfg.win_step_pct;
    if total_profit > 0 {
        pct += (total_profit as f64 / cfg.profit_divisor).min(cfg.profit_cap_pct);
    }
    pct
}

/// Push `position` away from the centre of `zone` by `1 + pct/100`,
/// clamped to the zone and the track.
pub fn push_from_center(position: f64, zone: &Zone, pct: f64) -> f64 {
    let shrink = 1.0 + pct.max(0.0) / 100.0;
    let center = zone.center();
    let offset = (position - center).abs() * shrink;
    let pushed = if position < center {
        center - offset
    } else {
        center + offset
    };
    pushed.clamp(zone.start, zone.end).clamp(0.0, 100.0)
}

/// Resolve a stop. High-paying zones get their position remapped; the
/// paid multiplier never exceeds the displayed one.
pub fn resolve(
    stop_position: f64,
    consecutive_wins: u32,
    total_profit: i64,
    cfg: &HouseEdgeConfig,
) -> Resolution {
    let displayed = *classify(stop_position);
    if displayed.multiplier < cfg.manipulate_min_multiplier {
        return Resolution {
            stop_position,
            displayed,
            actual_position: stop_position,
            paid: displayed,
        };
    }

    let pct = manipulation_pct(consecutive_wins, total_profit, cfg);
    let actual_position = push_from_center(stop_position, &displayed, pct);
    let landed = *classify(actual_position);
    // A pushed position on a shared boundary can classify into a richer neighbour.
    let paid = if landed.multiplier > displayed.multiplier {
        displayed
    } else {
        landed
    };
    if paid.multiplier < displayed.multiplier {
        tracing::debug!(
            stop_position,
            actual_position,
            displayed = displayed.multiplier,
            paid = paid.multiplier,
            "stop remapped"
        );
    }
    Resolution {
        stop_position,
        displayed,
        actual_position,
        paid,
    }
}

/// Multiplier including the streak bonus.
pub fn total_multiplier(multiplier: f64, streak: u32, streak_bonus: f64) -> f64 {
    multiplier * (1.0 + f64::from(streak) * streak_bonus)
}

/// `floor(bet × multiplier × (1 + streak × bonus))`.
pub fn win_amount(bet: i64, multiplier: f64, streak: u32, streak_bonus: f64) -> i64 {
    (bet as f64 * total_multiplier(multiplier, streak, streak_bonus)).floor() as i64
}

/// Whether this stop gets deferred. The streak rule rolls first; the
/// profit rule only rolls if the streak rule did not fire.
pub fn should_lag(
    consecutive_wins: u32,
    total_profit: i64,
    balance: i64,
    rng: &mut impl Rng,
    cfg: &LagConfig,
) -> bool {
    if consecutive_wins >= cfg.streak_trigger && rng.random::<f64>() < cfg.streak_chance {
        return true;
    }
    total_profit as f64 > balance as f64 * cfg.profit_ratio
        && rng.random::<f64>() < cfg.profit_chance
}

pub fn lag_delay_ms(rng: &mut impl Rng, cfg: &LagConfig) -> f64 {
    let [lo, hi] = cfg.delay_ms;
    if hi > lo { rng.random_range(lo..hi) } else { lo }
}

/// Headline for a result screen.
pub fn result_title(multiplier: f64) -> &'static str {
    if multiplier >= 20.0 {
        "JACKPOT!!!"
    } else if multiplier >= 10.0 {
        "AMAZING!"
    } else if multiplier >= 5.0 {
        "GREAT HIT!"
    } else if multiplier >= 2.0 {
        "NICE!"
    } else {
        "SMALL WIN"
    }
}
