use serde::{Deserialize, Serialize};

use crate::config::JumpConfig;
use crate::physics::Body;

/// Charge meter for one racer. Reset on every press and every release.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PowerBar {
    pub charging: bool,
    pub power: f32,
}

impl PowerBar {
    pub fn press(&mut self) {
        self.charging = true;
        self.power = 0.0;
    }

    /// Grow the charge by one tick's worth when charging and jump-eligible.
    pub fn charge(&mut self, eligible: bool, jump: &JumpConfig) {
        if self.charging && eligible {
            self.power = (self.power + jump.charge_rate).min(jump.max_power);
        }
    }

    /// Stop charging. Returns the stored power when a charge was in progress
    /// and non-zero.
    pub fn release(&mut self) -> Option<f32> {
        let stored = (self.charging && self.power > 0.0).then_some(self.power);
        self.charging = false;
        self.power = 0.0;
        stored
    }
}

/// Apply a jump impulse if the body may jump. Returns true when it launched.
pub fn launch(body: &mut Body, power: f32, jump: &JumpConfig) -> bool {
    if !body.can_jump() || power <= 0.0 {
        return false;
    }
    let ratio = power.min(jump.max_power) / jump.max_power;
    body.vy = -jump.lift * ratio - jump.base_lift;
    body.vx = jump.thrust * ratio + jump.base_thrust;
    body.grounded = false;
    body.ground_timer = 0;
    true
}

/// Counts quick successive jumps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComboTracker {
    pub combo: u32,
    pub last_jump_ms: Option<f64>,
}

impl ComboTracker {
    /// Record a jump at `now_ms` and return the new combo count.
    pub fn register(&mut self, now_ms: f64, window_ms: f64) -> u32 {
        self.combo = match self.last_jump_ms {
            Some(last) if now_ms - last < window_ms => self.combo + 1,
            _ => 1,
        };
        self.last_jump_ms = Some(now_ms);
        self.combo
    }
}
