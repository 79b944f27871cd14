pub mod bot;
pub mod collision;
pub mod config;
pub mod course_gen;
pub mod jump;
pub mod physics;
pub mod pilot;
pub mod race;
pub mod racer;
pub mod scoring;
pub mod solo;

use std::collections::VecDeque;
use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use ardjump_core::arcade_game_boilerplate;
use ardjump_core::game_trait::{
    ArcadeGame, EntityId, EntityScore, GameEvent, GameMetadata, SessionConfig,
};
use ardjump_core::notice::Notice;

use config::PlatformerConfig;
use course_gen::{Coin, Course, PlatformKind, generate_race_course};
use physics::ObstacleHit;
use pilot::PilotSignal;
use race::{RaceArbiter, RaceStatus, Side, on_finish, status_notice};
use racer::{HUMAN_SKIN, Racer, RacerTick};

pub use solo::SoloJumper;

/// Entity id of the human racer in both platformer games.
pub const HUMAN_ID: EntityId = 1;
/// Entity id of the scripted opponent.
pub const BOT_ID: EntityId = 2;

const COMBO_NOTICE_MS: u32 = 1000;
const CHECKPOINT_NOTICE_MS: u32 = 1000;
const VOID_NOTICE_MS: u32 = 1500;

/// Input events for the platformer games, MessagePack-encoded on the wire
/// between host and game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlatformerInput {
    /// Press: start charging the power bar.
    ChargeStart,
    /// Release: jump with the stored power.
    ChargeRelease,
    /// Throw away the run and start over on a fresh level.
    Restart,
}

impl PlatformerInput {
    pub fn encode(&self) -> Vec<u8> {
        rmp_serde::to_vec(self).unwrap_or_default()
    }
}

/// Drain queued input into the human racer. Returns true when a restart
/// was requested; input queued after the restart is dropped with it.
pub(crate) fn drain_inputs(queue: &mut VecDeque<PlatformerInput>, human: &mut Racer) -> bool {
    while let Some(input) = queue.pop_front() {
        match input {
            PlatformerInput::ChargeStart => human.queue_signal(PilotSignal::ChargeStart),
            PlatformerInput::ChargeRelease => human.queue_signal(PilotSignal::ChargeRelease),
            PlatformerInput::Restart => {
                queue.clear();
                return true;
            },
        }
    }
    false
}

/// Events common to both games after a racer tick: jump score and combo
/// notice, landing, obstacle penalties for scoring racers.
pub(crate) fn report_tick(
    racer: &mut Racer,
    tick: &RacerTick,
    config: &PlatformerConfig,
    events: &mut Vec<GameEvent>,
) {
    if let Some(launch) = tick.launch
        && racer.is_human()
    {
        events.push(GameEvent::ScoreUpdate {
            entity: racer.id,
            score: racer.score,
        });
        if launch.combo > 1 {
            events.push(GameEvent::Notify(
                Notice::info(scoring::combo_message(launch.combo, launch.earned))
                    .with_duration(COMBO_NOTICE_MS),
            ));
        }
    }

    if tick.step.touched_down {
        events.push(GameEvent::Landed {
            entity: racer.id,
            x: racer.body.x,
            y: racer.body.y,
        });
    }

    if racer.is_human() && !tick.step.obstacle_hits.is_empty() {
        for hit in &tick.step.obstacle_hits {
            racer.score -= match hit {
                ObstacleHit::Head => config.scoring.obstacle_head_penalty,
                ObstacleHit::Side => config.scoring.obstacle_side_penalty,
            };
        }
        events.push(GameEvent::ScoreUpdate {
            entity: racer.id,
            score: racer.score,
        });
    }
}

pub(crate) fn camera_offset(x: f32, config: &PlatformerConfig) -> f32 {
    (x - config.level.viewport_width / 3.0).max(0.0)
}

/// Serializable race snapshot for the render collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RaceState {
    pub human: Racer,
    pub bot: Racer,
    pub coins: Vec<Coin>,
    pub arbiter: RaceArbiter,
    /// Simulation time since the race started.
    pub clock_ms: f64,
    pub camera_x: f32,
    pub round_complete: bool,
}

impl RaceState {
    fn new(course: &Course, skin: &str, config: &PlatformerConfig) -> Self {
        Self {
            human: Racer::human(HUMAN_ID, skin, course, config),
            bot: Racer::bot(BOT_ID, course, config),
            coins: course.coins.clone(),
            arbiter: RaceArbiter::default(),
            clock_ms: 0.0,
            camera_x: 0.0,
            round_complete: false,
        }
    }
}

/// Race against the scripted bot to the end of a generated course.
pub struct PlatformRacer {
    config: PlatformerConfig,
    course: Course,
    state: RaceState,
    rng: StdRng,
    skin: String,
    pending_inputs: VecDeque<PlatformerInput>,
    paused: bool,
}

impl PlatformRacer {
    pub fn new() -> Self {
        Self::with_config(PlatformerConfig::load())
    }

    pub fn with_config(config: PlatformerConfig) -> Self {
        let mut rng = StdRng::seed_from_u64(0);
        let course = generate_race_course(&mut rng, &config.level);
        let state = RaceState::new(&course, HUMAN_SKIN, &config);
        Self {
            config,
            course,
            state,
            rng,
            skin: HUMAN_SKIN.to_string(),
            pending_inputs: VecDeque::new(),
            paused: false,
        }
    }

    pub fn state(&self) -> &RaceState {
        &self.state
    }

    pub fn course(&self) -> &Course {
        &self.course
    }

    pub fn config(&self) -> &PlatformerConfig {
        &self.config
    }

    /// Fresh level from the session RNG, fresh racers.
    fn restart(&mut self) {
        self.course = generate_race_course(&mut self.rng, &self.config.level);
        self.state = RaceState::new(&self.course, &self.skin, &self.config);
        tracing::info!(
            platforms = self.course.platforms.len(),
            "race course generated"
        );
    }

    /// Tick one racer and apply race rules. Returns true when the racer
    /// crossed the finish this tick.
    fn advance(&mut self, side: Side, events: &mut Vec<GameEvent>) -> bool {
        let void_y = self.config.level.void_y(&self.config.physics);
        let now = self.state.clock_ms;
        let RaceState { human, bot, coins, .. } = &mut self.state;
        let racer = match side {
            Side::Human => human,
            Side::Bot => bot,
        };

        let tick = racer.tick(&self.course, &self.config, void_y, now, &mut self.rng);
        report_tick(racer, &tick, &self.config, events);
        let scoring = &self.config.scoring;
        let mut finished = false;

        if tick.step.fell_into_void {
            racer.respawn_at_checkpoint();
            if racer.is_human() {
                racer.score -= scoring.void_penalty;
                events.push(GameEvent::ScoreUpdate {
                    entity: racer.id,
                    score: racer.score,
                });
                events.push(GameEvent::Notify(
                    Notice::warning(format!(
                        "Fell into void! -{} points",
                        scoring.void_penalty
                    ))
                    .with_duration(VOID_NOTICE_MS),
                ));
            }
        } else if let Some(index) = tick.step.standing_on {
            let platform = &self.course.platforms[index];
            if platform.kind == PlatformKind::Checkpoint && racer.reach_checkpoint(platform) {
                tracing::debug!(
                    entity = racer.id,
                    x = racer.checkpoint_x,
                    "checkpoint advanced"
                );
                if racer.is_human() {
                    racer.score += scoring.checkpoint_bonus;
                    events.push(GameEvent::ScoreUpdate {
                        entity: racer.id,
                        score: racer.score,
                    });
                    events.push(GameEvent::Notify(
                        Notice::success("Checkpoint!").with_duration(CHECKPOINT_NOTICE_MS),
                    ));
                }
            }
            if on_finish(&self.course, racer, index) {
                finished = RaceArbiter::record_finish(racer, now);
            }
        }

        let taken = racer.collect_coins(coins);
        if taken > 0 && racer.is_human() {
            racer.score += i64::from(taken) * scoring.coin_value;
            events.push(GameEvent::ScoreUpdate {
                entity: racer.id,
                score: racer.score,
            });
        }

        finished
    }

    fn settle(&mut self, events: &mut Vec<GameEvent>) {
        let status = self.state.arbiter.settle(&self.state.human, &self.state.bot);
        match status {
            RaceStatus::Over { winner } => {
                let human = &mut self.state.human;
                let message = match winner {
                    Side::Human => {
                        human.score += self.config.scoring.victory_bonus;
                        events.push(GameEvent::ScoreUpdate {
                            entity: human.id,
                            score: human.score,
                        });
                        Notice::success("You Win!")
                    },
                    Side::Bot => Notice::info("Bot Wins!"),
                };
                tracing::info!(?winner, score = human.score, "race over");
                events.push(GameEvent::Notify(message));
                self.state.round_complete = true;
                events.push(GameEvent::RoundComplete);
            },
            other => events.extend(status_notice(other).map(GameEvent::Notify)),
        }
    }
}

impl Default for PlatformRacer {
    fn default() -> Self {
        Self::new()
    }
}

impl ArcadeGame for PlatformRacer {
    fn metadata(&self) -> GameMetadata {
        GameMetadata {
            name: "Ard Jump Race".to_string(),
            description: "Charge, jump and beat the bot to the finish!".to_string(),
            estimated_round_duration: Duration::from_secs(90),
        }
    }

    fn init(&mut self, config: &SessionConfig) {
        self.rng = StdRng::seed_from_u64(config.seed);
        self.skin = config
            .custom_str("skin")
            .unwrap_or(HUMAN_SKIN)
            .to_string();
        self.pending_inputs.clear();
        self.paused = false;
        self.restart();
    }

    fn update(&mut self, dt: f32) -> Vec<GameEvent> {
        if self.paused {
            return Vec::new();
        }
        if drain_inputs(&mut self.pending_inputs, &mut self.state.human) {
            self.restart();
            return Vec::new();
        }
        if self.state.round_complete {
            return Vec::new();
        }

        let mut events = Vec::new();
        if dt.is_finite() && dt > 0.0 {
            self.state.clock_ms += f64::from(dt) * 1000.0;
        }

        let human_finished = self.advance(Side::Human, &mut events);
        let bot_finished = self.advance(Side::Bot, &mut events);
        if human_finished || bot_finished {
            self.settle(&mut events);
        }

        if let Some(notice) = self
            .state
            .arbiter
            .track_lead(self.state.human.distance, self.state.bot.distance)
        {
            events.push(GameEvent::Notify(notice));
        }

        self.state.camera_x = camera_offset(self.state.human.body.x, &self.config);
        events
    }

    arcade_game_boilerplate!(state_type: RaceState);

    fn apply_input(&mut self, input: &[u8]) {
        if let Ok(input) = rmp_serde::from_slice::<PlatformerInput>(input) {
            self.pending_inputs.push_back(input);
        }
    }

    fn round_results(&self) -> Vec<EntityScore> {
        [&self.state.human, &self.state.bot]
            .into_iter()
            .map(|r| EntityScore {
                entity: r.id,
                score: r.score,
            })
            .collect()
    }
}
