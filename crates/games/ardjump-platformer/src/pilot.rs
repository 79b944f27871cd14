//! Who is at the controls of a racer.
//!
//! A racer only knows how to charge and release; a [`Pilot`] decides when.
//! The human pilot replays queued input, the bot pilot runs a timing model.

use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::bot::BotPilot;
use crate::config::PlatformerConfig;
use crate::jump::PowerBar;
use crate::physics::Body;

/// A charge-bar action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PilotSignal {
    ChargeStart,
    ChargeRelease,
}

pub trait Pilot {
    /// Signals to apply this tick, in order, before the bar charges and
    /// physics runs.
    fn signals(
        &mut self,
        body: &Body,
        bar: &PowerBar,
        rng: &mut dyn RngCore,
        config: &PlatformerConfig,
    ) -> Vec<PilotSignal>;

    /// Whether jumps by this pilot earn score.
    fn scores(&self) -> bool;
}

/// Replays press/release input collected since the last tick.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HumanPilot {
    #[serde(skip)]
    queued: Vec<PilotSignal>,
}

impl HumanPilot {
    pub fn push(&mut self, signal: PilotSignal) {
        self.queued.push(signal);
    }

    pub fn clear(&mut self) {
        self.queued.clear();
    }
}

impl Pilot for HumanPilot {
    fn signals(
        &mut self,
        _body: &Body,
        _bar: &PowerBar,
        _rng: &mut dyn RngCore,
        _config: &PlatformerConfig,
    ) -> Vec<PilotSignal> {
        std::mem::take(&mut self.queued)
    }

    fn scores(&self) -> bool {
        true
    }
}

/// Serializable pilot slot on a racer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AnyPilot {
    Human(HumanPilot),
    Bot(BotPilot),
}

impl AnyPilot {
    pub fn as_human_mut(&mut self) -> Option<&mut HumanPilot> {
        match self {
            Self::Human(h) => Some(h),
            Self::Bot(_) => None,
        }
    }
}

impl Pilot for AnyPilot {
    fn signals(
        &mut self,
        body: &Body,
        bar: &PowerBar,
        rng: &mut dyn RngCore,
        config: &PlatformerConfig,
    ) -> Vec<PilotSignal> {
        match self {
            Self::Human(p) => p.signals(body, bar, rng, config),
            Self::Bot(p) => p.signals(body, bar, rng, config),
        }
    }

    fn scores(&self) -> bool {
        match self {
            Self::Human(p) => p.scores(),
            Self::Bot(p) => p.scores(),
        }
    }
}
