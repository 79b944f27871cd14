use ardjump_core::game_trait::EntityId;
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::bot::BotPilot;
use crate::config::PlatformerConfig;
use crate::course_gen::{Coin, Course, Platform};
use crate::jump::{ComboTracker, PowerBar, launch};
use crate::physics::{Body, StepReport, step_body};
use crate::pilot::{AnyPilot, HumanPilot, Pilot, PilotSignal};
use crate::scoring::jump_score;

pub const HUMAN_SKIN: &str = "🎮";
pub const BOT_SKIN: &str = "🤖";

/// A controllable entity on the course. Human and bot racers share this
/// type and differ only in their pilot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Racer {
    pub id: EntityId,
    pub body: Body,
    pub bar: PowerBar,
    pub pilot: AnyPilot,
    /// Opaque display id.
    pub skin: String,
    /// floor(x)
    pub distance: i64,
    pub coins: u32,
    pub checkpoint_x: f32,
    pub checkpoint_y: f32,
    pub score: i64,
    pub combo: ComboTracker,
    pub finish_time_ms: Option<f64>,
}

/// A jump performed during a tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Launch {
    pub power: f32,
    pub combo: u32,
    /// Score added for the jump (zero for non-scoring pilots).
    pub earned: i64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RacerTick {
    pub launch: Option<Launch>,
    pub step: StepReport,
}

impl Racer {
    pub fn new(id: EntityId, pilot: AnyPilot, skin: &str, course: &Course, config: &PlatformerConfig) -> Self {
        Self {
            id,
            body: Body::new(course.spawn_x, course.spawn_y, &config.physics),
            bar: PowerBar::default(),
            pilot,
            skin: skin.to_string(),
            distance: course.spawn_x.floor() as i64,
            coins: 0,
            checkpoint_x: course.spawn_x,
            checkpoint_y: course.spawn_y,
            score: 0,
            combo: ComboTracker::default(),
            finish_time_ms: None,
        }
    }

    pub fn human(id: EntityId, skin: &str, course: &Course, config: &PlatformerConfig) -> Self {
        Self::new(id, AnyPilot::Human(HumanPilot::default()), skin, course, config)
    }

    pub fn bot(id: EntityId, course: &Course, config: &PlatformerConfig) -> Self {
        Self::new(id, AnyPilot::Bot(BotPilot::default()), BOT_SKIN, course, config)
    }

    pub fn is_human(&self) -> bool {
        matches!(self.pilot, AnyPilot::Human(_))
    }

    pub fn has_finished(&self) -> bool {
        self.finish_time_ms.is_some()
    }

    /// Queue a press/release for the next tick. Ignored for scripted racers.
    pub fn queue_signal(&mut self, signal: PilotSignal) {
        if let Some(human) = self.pilot.as_human_mut() {
            human.push(signal);
        }
    }

    /// One fixed tick: pilot signals, bar charge, then physics.
    pub fn tick(
        &mut self,
        course: &Course,
        config: &PlatformerConfig,
        void_y: f32,
        now_ms: f64,
        rng: &mut dyn RngCore,
    ) -> RacerTick {
        let signals = self.pilot.signals(&self.body, &self.bar, rng, config);

        let mut jumped = None;
        for signal in signals {
            match signal {
                PilotSignal::ChargeStart => self.bar.press(),
                PilotSignal::ChargeRelease => {
                    if let Some(power) = self.bar.release()
                        && launch(&mut self.body, power, &config.jump)
                    {
                        jumped = Some(self.register_jump(power, now_ms, config));
                    }
                },
            }
        }

        self.bar.charge(self.body.can_jump(), &config.jump);
        let step = step_body(&mut self.body, course, &config.physics, void_y);
        self.sync_distance();

        RacerTick {
            launch: jumped,
            step,
        }
    }

    fn register_jump(&mut self, power: f32, now_ms: f64, config: &PlatformerConfig) -> Launch {
        let combo = self.combo.register(now_ms, config.jump.combo_window_ms);
        let earned = if self.pilot.scores() {
            jump_score(power, combo, config.jump.combo_step)
        } else {
            0
        };
        self.score += earned;
        Launch {
            power,
            combo,
            earned,
        }
    }

    pub fn sync_distance(&mut self) {
        self.distance = self.body.x.floor() as i64;
    }

    /// Move the checkpoint to this platform if it lies further along.
    /// Returns true when the checkpoint advanced.
    pub fn reach_checkpoint(&mut self, platform: &Platform) -> bool {
        let x = platform.rect.center_x();
        if x <= self.checkpoint_x {
            return false;
        }
        self.checkpoint_x = x;
        self.checkpoint_y = platform.rect.y - self.body.h;
        true
    }

    pub fn respawn_at_checkpoint(&mut self) {
        self.body.place(self.checkpoint_x, self.checkpoint_y);
        self.bar = PowerBar::default();
        self.sync_distance();
    }

    /// Collect every uncollected coin the racer overlaps. Returns how many.
    pub fn collect_coins(&mut self, coins: &mut [Coin]) -> u32 {
        let rect = self.body.rect();
        let mut taken = 0;
        for coin in coins.iter_mut() {
            if crate::collision::overlaps(&rect, &coin.pickup_rect()) && coin.collect() {
                taken += 1;
            }
        }
        self.coins += taken;
        taken
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::collision::Rect;
    use crate::course_gen::{PlatformKind, generate_race_course};

    fn flat_course() -> Course {
        Course {
            platforms: vec![
                Platform {
                    rect: Rect::new(0.0, 700.0, 2000.0, 100.0),
                    kind: PlatformKind::Ground,
                },
                Platform {
                    rect: Rect::new(2000.0, 700.0, 150.0, 100.0),
                    kind: PlatformKind::Checkpoint,
                },
            ],
            obstacles: Vec::new(),
            coins: Vec::new(),
            finish_distance: 5000.0,
            finish_line_x: 4700.0,
            spawn_x: 150.0,
            spawn_y: 600.0,
        }
    }

    fn settle(racer: &mut Racer, course: &Course, cfg: &PlatformerConfig, rng: &mut StdRng) {
        for i in 0..60 {
            racer.tick(course, cfg, 900.0, i as f64 * 16.0, rng);
        }
        assert!(racer.body.grounded);
    }

    #[test]
    fn human_charge_and_release_jumps_and_scores() {
        let cfg = PlatformerConfig::default();
        let course = flat_course();
        let mut rng = StdRng::seed_from_u64(1);
        let mut racer = Racer::human(1, HUMAN_SKIN, &course, &cfg);
        settle(&mut racer, &course, &cfg, &mut rng);

        racer.queue_signal(PilotSignal::ChargeStart);
        for _ in 0..25 {
            racer.tick(&course, &cfg, 900.0, 1000.0, &mut rng);
        }
        assert_eq!(racer.bar.power, 50.0);

        racer.queue_signal(PilotSignal::ChargeRelease);
        let tick = racer.tick(&course, &cfg, 900.0, 1016.0, &mut rng);
        let launch = tick.launch.unwrap();
        assert_eq!(launch.power, 50.0);
        assert_eq!(launch.combo, 1);
        assert_eq!(launch.earned, 5);
        assert_eq!(racer.score, 5);
        assert!(!racer.body.grounded);
        assert!(racer.body.vy < 0.0);
    }

    #[test]
    fn bot_jumps_without_scoring() {
        let cfg = PlatformerConfig::default();
        let course = generate_race_course(&mut StdRng::seed_from_u64(5), &cfg.level);
        let mut rng = StdRng::seed_from_u64(5);
        let mut racer = Racer::bot(2, &course, &cfg);
        let mut jumps = 0;
        for i in 0..600 {
            if racer.tick(&course, &cfg, 900.0, i as f64 * 16.0, &mut rng).launch.is_some() {
                jumps += 1;
            }
        }
        assert!(jumps > 0);
        assert_eq!(racer.score, 0);
        assert!(racer.distance > 150);
    }

    #[test]
    fn signals_ignored_for_bot() {
        let cfg = PlatformerConfig::default();
        let course = flat_course();
        let mut racer = Racer::bot(2, &course, &cfg);
        racer.queue_signal(PilotSignal::ChargeStart);
        assert!(matches!(racer.pilot, AnyPilot::Bot(_)));
    }

    #[test]
    fn checkpoint_never_regresses() {
        let cfg = PlatformerConfig::default();
        let course = flat_course();
        let mut racer = Racer::human(1, HUMAN_SKIN, &course, &cfg);

        let far = Platform {
            rect: Rect::new(3000.0, 700.0, 150.0, 100.0),
            kind: PlatformKind::Checkpoint,
        };
        assert!(racer.reach_checkpoint(&course.platforms[1]));
        assert_eq!(racer.checkpoint_x, 2075.0);
        assert_eq!(racer.checkpoint_y, 660.0);
        assert!(!racer.reach_checkpoint(&course.platforms[1]));
        assert!(racer.reach_checkpoint(&far));
        assert!(!racer.reach_checkpoint(&course.platforms[1]));
        assert_eq!(racer.checkpoint_x, 3075.0);
    }

    #[test]
    fn respawn_places_at_checkpoint() {
        let cfg = PlatformerConfig::default();
        let course = flat_course();
        let mut racer = Racer::human(1, HUMAN_SKIN, &course, &cfg);
        racer.reach_checkpoint(&course.platforms[1]);
        racer.body.x = 2500.0;
        racer.body.y = 950.0;
        racer.body.vx = 3.0;
        racer.bar.press();

        racer.respawn_at_checkpoint();
        assert_eq!((racer.body.x, racer.body.y), (2075.0, 660.0));
        assert_eq!(racer.body.vx, 0.0);
        assert!(!racer.bar.charging);
        assert_eq!(racer.distance, 2075);
    }

    #[test]
    fn coins_collect_once() {
        let cfg = PlatformerConfig::default();
        let course = flat_course();
        let mut racer = Racer::human(1, HUMAN_SKIN, &course, &cfg);
        let mut coins = vec![
            Coin::new(170.0, 620.0),
            Coin::new(175.0, 625.0),
            Coin::new(900.0, 620.0),
        ];
        assert_eq!(racer.collect_coins(&mut coins), 2);
        assert_eq!(racer.collect_coins(&mut coins), 0);
        assert_eq!(racer.coins, 2);
        assert!(!coins[2].collected);
    }
}
