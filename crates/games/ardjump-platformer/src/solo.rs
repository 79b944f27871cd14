use std::collections::VecDeque;
use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use ardjump_core::arcade_game_boilerplate;
use ardjump_core::game_trait::{ArcadeGame, EntityScore, GameEvent, GameMetadata, SessionConfig};
use ardjump_core::notice::Notice;
use ardjump_core::schedule::{Scheduler, TaskId};

use crate::config::PlatformerConfig;
use crate::course_gen::{Course, generate_solo_course};
use crate::race::on_finish;
use crate::racer::{HUMAN_SKIN, Racer};
use crate::scoring::{format_clock, solo_victory_bonus};
use crate::{HUMAN_ID, PlatformerInput, camera_offset, drain_inputs, report_tick};

/// Below this many seconds the clock is shown as a warning.
pub const LOW_TIME_SECS: u32 = 30;

const COUNTDOWN_PERIOD_MS: f64 = 1000.0;

/// How a solo run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoloOutcome {
    Victory,
    OutOfLives,
    OutOfTime,
}

/// Serializable solo run snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoloState {
    pub runner: Racer,
    pub lives: u32,
    pub time_left_secs: u32,
    pub clock_ms: f64,
    pub camera_x: f32,
    pub outcome: Option<SoloOutcome>,
    pub round_complete: bool,
}

impl SoloState {
    fn new(course: &Course, skin: &str, config: &PlatformerConfig) -> Self {
        Self {
            runner: Racer::human(HUMAN_ID, skin, course, config),
            lives: config.solo.lives,
            time_left_secs: config.solo.time_limit_secs,
            clock_ms: 0.0,
            camera_x: 0.0,
            outcome: None,
            round_complete: false,
        }
    }

    pub fn time_warning(&self) -> bool {
        self.time_left_secs <= LOW_TIME_SECS
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SoloTask {
    CountdownTick,
}

/// Single-player run: reach the finish with lives and time to spare.
pub struct SoloJumper {
    config: PlatformerConfig,
    course: Course,
    state: SoloState,
    rng: StdRng,
    skin: String,
    scheduler: Scheduler<SoloTask>,
    countdown: Option<TaskId>,
    pending_inputs: VecDeque<PlatformerInput>,
    paused: bool,
}

impl SoloJumper {
    pub fn new() -> Self {
        Self::with_config(PlatformerConfig::load())
    }

    pub fn with_config(config: PlatformerConfig) -> Self {
        let mut rng = StdRng::seed_from_u64(0);
        let course = generate_solo_course(&mut rng, &config.level);
        let state = SoloState::new(&course, HUMAN_SKIN, &config);
        Self {
            config,
            course,
            state,
            rng,
            skin: HUMAN_SKIN.to_string(),
            scheduler: Scheduler::new(),
            countdown: None,
            pending_inputs: VecDeque::new(),
            paused: false,
        }
    }

    pub fn state(&self) -> &SoloState {
        &self.state
    }

    pub fn course(&self) -> &Course {
        &self.course
    }

    fn restart(&mut self) {
        self.course = generate_solo_course(&mut self.rng, &self.config.level);
        self.state = SoloState::new(&self.course, &self.skin, &self.config);
        self.scheduler.reset();
        self.countdown = Some(
            self.scheduler
                .every(COUNTDOWN_PERIOD_MS, SoloTask::CountdownTick),
        );
        tracing::info!(
            lives = self.state.lives,
            time_limit = self.state.time_left_secs,
            "solo run started"
        );
    }

    fn end(&mut self, outcome: SoloOutcome, events: &mut Vec<GameEvent>) {
        if let Some(id) = self.countdown.take() {
            self.scheduler.cancel(id);
        }
        let runner = &mut self.state.runner;
        let notice = match outcome {
            SoloOutcome::Victory => {
                runner.score += solo_victory_bonus(self.state.time_left_secs, &self.config.scoring);
                events.push(GameEvent::ScoreUpdate {
                    entity: runner.id,
                    score: runner.score,
                });
                Notice::success("You Win!")
            },
            SoloOutcome::OutOfLives => Notice::error("Game Over!"),
            SoloOutcome::OutOfTime => Notice::error("Time's up!"),
        };
        tracing::info!(
            ?outcome,
            score = runner.score,
            time_left = %format_clock(self.state.time_left_secs),
            "solo run over"
        );
        events.push(GameEvent::Notify(notice));
        self.state.outcome = Some(outcome);
        self.state.round_complete = true;
        events.push(GameEvent::RoundComplete);
    }

    /// Returns true when the countdown ran out.
    fn run_countdown(&mut self, dt_ms: f64) -> bool {
        for task in self.scheduler.advance(dt_ms) {
            match task {
                SoloTask::CountdownTick => {
                    self.state.time_left_secs = self.state.time_left_secs.saturating_sub(1);
                    if self.state.time_left_secs == 0 {
                        return true;
                    }
                },
            }
        }
        false
    }
}

impl Default for SoloJumper {
    fn default() -> Self {
        Self::new()
    }
}

impl ArcadeGame for SoloJumper {
    fn metadata(&self) -> GameMetadata {
        GameMetadata {
            name: "Ard Jump".to_string(),
            description: "Charge your jump and reach the finish before time runs out!"
                .to_string(),
            estimated_round_duration: Duration::from_secs(u64::from(
                self.config.solo.time_limit_secs,
            )),
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
        if drain_inputs(&mut self.pending_inputs, &mut self.state.runner) {
            self.restart();
            return Vec::new();
        }
        if self.state.round_complete {
            return Vec::new();
        }

        let mut events = Vec::new();
        let dt_ms = if dt.is_finite() && dt > 0.0 {
            f64::from(dt) * 1000.0
        } else {
            0.0
        };
        self.state.clock_ms += dt_ms;

        if self.run_countdown(dt_ms) {
            self.end(SoloOutcome::OutOfTime, &mut events);
            return events;
        }

        let void_y = self.config.level.void_y(&self.config.physics);
        let now = self.state.clock_ms;
        let runner = &mut self.state.runner;
        let tick = runner.tick(&self.course, &self.config, void_y, now, &mut self.rng);
        report_tick(runner, &tick, &self.config, &mut events);

        if tick.step.fell_into_void {
            self.state.lives = self.state.lives.saturating_sub(1);
            tracing::debug!(lives = self.state.lives, "fell into the void");
            if self.state.lives == 0 {
                self.end(SoloOutcome::OutOfLives, &mut events);
                return events;
            }
            self.state.runner.respawn_at_checkpoint();
        } else if let Some(index) = tick.step.standing_on
            && on_finish(&self.course, &self.state.runner, index)
        {
            self.end(SoloOutcome::Victory, &mut events);
        }

        self.state.camera_x = camera_offset(self.state.runner.body.x, &self.config);
        events
    }

    arcade_game_boilerplate!(state_type: SoloState);

    fn apply_input(&mut self, input: &[u8]) {
        if let Ok(input) = rmp_serde::from_slice::<PlatformerInput>(input) {
            self.pending_inputs.push_back(input);
        }
    }

    fn round_results(&self) -> Vec<EntityScore> {
        vec![EntityScore {
            entity: self.state.runner.id,
            score: self.state.runner.score,
        }]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SoloConfig;
    use ardjump_core::test_helpers::{self, TEST_DT, default_session, run_game_ticks};

    fn solo(seed: u64) -> SoloJumper {
        let mut game = SoloJumper::with_config(PlatformerConfig::default());
        game.init(&default_session(seed));
        game
    }

    #[test]
    fn contract_init_creates_state() {
        let mut game = SoloJumper::with_config(PlatformerConfig::default());
        test_helpers::contract_init_creates_state(&mut game);
    }

    #[test]
    fn contract_apply_input_changes_state() {
        let mut game = solo(42);
        test_helpers::contract_apply_input_changes_state(
            &mut game,
            &PlatformerInput::ChargeStart.encode(),
        );
    }

    #[test]
    fn contract_update_advances_time() {
        let mut game = solo(42);
        test_helpers::contract_update_advances_time(&mut game);
    }

    #[test]
    fn contract_state_roundtrip_preserves() {
        let mut game = solo(42);
        run_game_ticks(&mut game, 10, TEST_DT);
        test_helpers::contract_state_roundtrip_preserves(&mut game);
    }

    #[test]
    fn contract_pause_stops_updates() {
        let mut game = solo(42);
        test_helpers::contract_pause_stops_updates(&mut game);
    }

    #[test]
    fn contract_round_results_complete() {
        let game = solo(42);
        test_helpers::contract_round_results_complete(&game, 1);
    }

    #[test]
    fn countdown_ticks_once_per_second() {
        let mut game = solo(1);
        run_game_ticks(&mut game, 60, TEST_DT);
        assert_eq!(game.state.time_left_secs, 179);
        run_game_ticks(&mut game, 120, TEST_DT);
        assert_eq!(game.state.time_left_secs, 177);
    }

    #[test]
    fn countdown_frozen_while_paused() {
        let mut game = solo(1);
        game.pause();
        run_game_ticks(&mut game, 600, TEST_DT);
        game.resume();
        assert_eq!(game.state.time_left_secs, 180);
    }

    #[test]
    fn running_out_of_time_ends_run() {
        let cfg = PlatformerConfig {
            solo: SoloConfig {
                time_limit_secs: 2,
                ..SoloConfig::default()
            },
            ..PlatformerConfig::default()
        };
        let mut game = SoloJumper::with_config(cfg);
        game.init(&default_session(1));

        let events = run_game_ticks(&mut game, 130, TEST_DT);
        assert!(game.is_round_complete());
        assert_eq!(game.state.outcome, Some(SoloOutcome::OutOfTime));
        assert_eq!(game.state.time_left_secs, 0);
        assert_eq!(
            events
                .iter()
                .filter(|e| **e == GameEvent::RoundComplete)
                .count(),
            1
        );
        assert!(game.countdown.is_none());
        assert!(game.scheduler.is_empty());
    }

    #[test]
    fn void_costs_a_life_and_respawns_at_spawn() {
        let mut game = solo(2);
        run_game_ticks(&mut game, 30, TEST_DT);
        game.state.runner.body.place(600.0, 2000.0);
        game.update(TEST_DT);

        assert_eq!(game.state.lives, 2);
        assert!(!game.is_round_complete());
        let body = &game.state.runner.body;
        assert_eq!((body.x, body.y), (150.0, 600.0));
    }

    #[test]
    fn last_life_ends_run() {
        let mut game = solo(2);
        for _ in 0..3 {
            game.state.runner.body.place(600.0, 2000.0);
            game.update(TEST_DT);
        }
        assert_eq!(game.state.lives, 0);
        assert_eq!(game.state.outcome, Some(SoloOutcome::OutOfLives));
        assert!(game.is_round_complete());
        assert!(game.scheduler.is_empty());
    }

    #[test]
    fn reaching_finish_wins_with_time_bonus() {
        let mut game = solo(3);
        run_game_ticks(&mut game, 60 * 5, TEST_DT);
        let seconds_left = game.state.time_left_secs;
        let score_before = game.state.runner.score;

        let finish = game.course.finish().unwrap().rect;
        let runner = &mut game.state.runner;
        runner
            .body
            .place(finish.x.max(game.course.finish_line_x) + 10.0, finish.y - 41.0);
        runner.body.vy = 1.0;

        let events = game.update(TEST_DT);
        assert_eq!(game.state.outcome, Some(SoloOutcome::Victory));
        assert!(events.contains(&GameEvent::RoundComplete));
        assert_eq!(
            game.state.runner.score,
            score_before + 1000 + i64::from(seconds_left) * 10
        );
        assert!(game.scheduler.is_empty());
    }

    #[test]
    fn restart_rearms_countdown() {
        let mut game = solo(4);
        for _ in 0..3 {
            game.state.runner.body.place(600.0, 2000.0);
            game.update(TEST_DT);
        }
        assert!(game.is_round_complete());

        game.apply_input(&PlatformerInput::Restart.encode());
        game.update(TEST_DT);
        assert!(!game.is_round_complete());
        assert_eq!(game.state.lives, 3);
        assert_eq!(game.state.time_left_secs, 180);
        assert!(game.countdown.is_some_and(|id| game.scheduler.is_pending(id)));
    }

    #[test]
    fn time_warning_threshold() {
        let mut game = solo(5);
        assert!(!game.state.time_warning());
        game.state.time_left_secs = 30;
        assert!(game.state.time_warning());
    }
}
