use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use crate::config::PlatformerConfig;
use crate::jump::PowerBar;
use crate::physics::Body;
use crate::pilot::{Pilot, PilotSignal};

/// Scripted opponent with deliberately imperfect timing.
///
/// While it can jump, a think timer counts down one per tick. When it runs
/// out the bot usually commits to a jump with a good or weak target power,
/// then releases once the bar passes the target give or take some noise.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BotPilot {
    /// Ticks until the next decision.
    pub think_timer: f32,
    pub target_power: f32,
}

fn uniform(rng: &mut dyn RngCore, range: [f32; 2]) -> f32 {
    range[0] + rng.random::<f32>() * (range[1] - range[0])
}

impl Pilot for BotPilot {
    fn signals(
        &mut self,
        body: &Body,
        bar: &PowerBar,
        rng: &mut dyn RngCore,
        config: &PlatformerConfig,
    ) -> Vec<PilotSignal> {
        if !body.can_jump() {
            return Vec::new();
        }

        let bot = &config.bot;
        let mut signals = Vec::new();
        self.think_timer -= 1.0;

        if self.think_timer <= 0.0 && !bar.charging && rng.random::<f64>() < bot.commit_chance {
            self.target_power = if rng.random::<f64>() < bot.good_chance {
                uniform(rng, bot.good_power)
            } else {
                uniform(rng, bot.weak_power)
            };
            signals.push(PilotSignal::ChargeStart);
        }

        if bar.charging {
            let noise = uniform(rng, [-bot.release_noise, bot.release_noise]);
            if bar.power >= self.target_power + noise {
                signals.push(PilotSignal::ChargeRelease);
                self.think_timer = uniform(rng, bot.think_delay);
            }
        }

        signals
    }

    fn scores(&self) -> bool {
        false
    }
}
