pub mod config;
pub mod house_edge;
pub mod zones;

use std::collections::VecDeque;
use std::fmt;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use ardjump_core::arcade_game_boilerplate;
use ardjump_core::game_trait::{
    ArcadeGame, EntityId, EntityScore, GameEvent, GameMetadata, SessionConfig,
};
use ardjump_core::notice::Notice;
use ardjump_core::schedule::Scheduler;

use config::BounceConfig;
use house_edge::{Resolution, lag_delay_ms, resolve, result_title, should_lag, win_amount};
use zones::Zone;

/// Entity id of the player in the bounce game.
pub const BETTOR_ID: EntityId = 1;

const CASH_OUT_NOTICE_MS: u32 = 2000;
const RESULT_NOTICE_MS: u32 = 2500;

/// A refused bounce action. Refusals never change state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BounceError {
    BetBelowMinimum,
    BetExceedsBalance,
    /// Balance cannot cover the repeated bet.
    InsufficientBalance,
    NothingToCashOut,
    /// The ball is rolling, or a result is waiting for continue/cash-out.
    RoundInProgress,
    NoRoundInProgress,
}

impl BounceError {
    /// Text for the notification collaborator.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::BetBelowMinimum | Self::BetExceedsBalance => "Invalid bet amount!",
            Self::InsufficientBalance => "Not enough balance! Cash out first.",
            Self::NothingToCashOut => "Nothing to cash out.",
            Self::RoundInProgress => "Finish the current round first.",
            Self::NoRoundInProgress => "No round in progress.",
        }
    }
}

impl fmt::Display for BounceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BetBelowMinimum => write!(f, "bet below table minimum"),
            Self::BetExceedsBalance => write!(f, "bet exceeds balance"),
            Self::InsufficientBalance => write!(f, "balance cannot cover the bet"),
            Self::NothingToCashOut => write!(f, "no winnings to cash out"),
            Self::RoundInProgress => write!(f, "a round is in progress"),
            Self::NoRoundInProgress => write!(f, "no round in progress"),
        }
    }
}

impl std::error::Error for BounceError {}

/// Player actions, MessagePack-encoded on the wire between host and game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BounceInput {
    Start { bet: i64 },
    /// Tap: stop the ball.
    Stop,
    /// Re-bet the previous stake and roll again.
    Continue,
    CashOut,
}

impl BounceInput {
    pub fn encode(&self) -> Vec<u8> {
        rmp_serde::to_vec(self).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Waiting for a bet.
    Idle,
    Rolling,
    /// A result is showing; continue or cash out.
    Resolved,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BounceStats {
    pub best_streak: u32,
    pub total_wins: u32,
    pub total_games: u32,
    pub biggest_win: i64,
}

impl BounceStats {
    /// Winning rounds as a rounded percentage of rounds played.
    pub fn win_rate(&self) -> u32 {
        if self.total_games == 0 {
            return 0;
        }
        (f64::from(self.total_wins) / f64::from(self.total_games) * 100.0).round() as u32
    }
}

/// The last resolved stop, for the result screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundResult {
    pub resolution: Resolution,
    pub win_amount: i64,
    pub total_multiplier: f64,
    pub title: String,
}

/// Serializable bounce snapshot for the render collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BounceState {
    pub balance: i64,
    pub current_bet: i64,
    pub phase: Phase,
    /// Percent along the track, in [0, 100].
    pub ball_position: f64,
    /// +1 or -1.
    pub ball_direction: f64,
    pub ball_speed: f64,
    pub current_winnings: i64,
    pub streak: u32,
    pub consecutive_wins: u32,
    pub total_profit: i64,
    pub stats: BounceStats,
    pub last_result: Option<RoundResult>,
    /// A deferred stop is waiting to be processed.
    pub lag_pending: bool,
    pub clock_ms: f64,
    /// Set once the bankroll can no longer cover a bet.
    pub round_complete: bool,
}

impl BounceState {
    fn new(balance: i64, bet: i64) -> Self {
        Self {
            balance,
            current_bet: bet,
            phase: Phase::Idle,
            ball_position: 0.0,
            ball_direction: 1.0,
            ball_speed: 0.0,
            current_winnings: 0,
            streak: 0,
            consecutive_wins: 0,
            total_profit: 0,
            stats: BounceStats::default(),
            last_result: None,
            lag_pending: false,
            clock_ms: 0.0,
            round_complete: false,
        }
    }

    fn move_ball(&mut self) {
        self.ball_position += self.ball_speed * self.ball_direction;
        if self.ball_position >= 100.0 {
            self.ball_position = 100.0;
            self.ball_direction = -1.0;
        } else if self.ball_position <= 0.0 {
            self.ball_position = 0.0;
            self.ball_direction = 1.0;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum BounceTask {
    /// Deferred stop from input lag.
    ProcessStop,
    NearMiss { shown: Zone },
}

/// Stop the bouncing ball on a multiplier zone.
pub struct BounceGame {
    config: BounceConfig,
    state: BounceState,
    rng: StdRng,
    scheduler: Scheduler<BounceTask>,
    pending_inputs: VecDeque<BounceInput>,
    /// Events produced outside `update`, handed out by the next tick.
    outbox: Vec<GameEvent>,
    paused: bool,
}

impl BounceGame {
    pub fn new() -> Self {
        Self::with_config(BounceConfig::load())
    }

    pub fn with_config(config: BounceConfig) -> Self {
        let state = BounceState::new(config.starting_balance, config.default_bet);
        Self {
            config,
            state,
            rng: StdRng::seed_from_u64(0),
            scheduler: Scheduler::new(),
            pending_inputs: VecDeque::new(),
            outbox: Vec::new(),
            paused: false,
        }
    }

    pub fn state(&self) -> &BounceState {
        &self.state
    }

    pub fn config(&self) -> &BounceConfig {
        &self.config
    }

    /// Place a bet and start the ball.
    pub fn start_round(&mut self, bet: i64) -> Result<(), BounceError> {
        if self.state.phase != Phase::Idle {
            return Err(BounceError::RoundInProgress);
        }
        if bet < self.config.min_bet {
            return Err(BounceError::BetBelowMinimum);
        }
        if bet > self.state.balance {
            return Err(BounceError::BetExceedsBalance);
        }
        self.launch(bet);
        Ok(())
    }

    /// Roll again with the previous bet, keeping winnings and streak.
    pub fn continue_round(&mut self) -> Result<(), BounceError> {
        match self.state.phase {
            Phase::Rolling => return Err(BounceError::RoundInProgress),
            Phase::Idle => return Err(BounceError::NoRoundInProgress),
            Phase::Resolved => {},
        }
        if self.state.current_bet > self.state.balance {
            return Err(BounceError::InsufficientBalance);
        }
        self.launch(self.state.current_bet);
        Ok(())
    }

    /// Stop the ball. May be deferred by input lag; a second stop while
    /// one is pending is ignored.
    pub fn stop(&mut self) -> Result<(), BounceError> {
        if self.state.phase != Phase::Rolling {
            return Err(BounceError::NoRoundInProgress);
        }
        if self.state.lag_pending {
            return Ok(());
        }

        let s = &self.state;
        if should_lag(
            s.consecutive_wins,
            s.total_profit,
            s.balance,
            &mut self.rng,
            &self.config.lag,
        ) {
            let delay = lag_delay_ms(&mut self.rng, &self.config.lag);
            self.state.lag_pending = true;
            self.scheduler.after(delay, BounceTask::ProcessStop);
            tracing::debug!(delay_ms = delay, "stop deferred");
            return Ok(());
        }

        self.process_stop();
        Ok(())
    }

    /// Move winnings into the balance and reset the streak.
    pub fn cash_out(&mut self) -> Result<i64, BounceError> {
        if self.state.phase == Phase::Rolling {
            return Err(BounceError::RoundInProgress);
        }
        let amount = self.state.current_winnings;
        if amount == 0 {
            return Err(BounceError::NothingToCashOut);
        }

        let s = &mut self.state;
        s.balance += amount;
        s.current_winnings = 0;
        s.streak = 0;
        s.consecutive_wins = 0;
        s.phase = Phase::Idle;
        tracing::info!(amount, balance = s.balance, "cashed out");

        let score = self.score_event();
        self.outbox.push(score);
        self.outbox.push(GameEvent::Notify(
            Notice::success(format!("Cashed out {amount} coins!")).with_duration(CASH_OUT_NOTICE_MS),
        ));
        Ok(amount)
    }

    fn launch(&mut self, bet: i64) {
        let ball = &self.config.ball;
        let speed = ball.base_speed + self.rng.random::<f64>() * ball.speed_spread;
        let s = &mut self.state;
        s.balance -= bet;
        s.current_bet = bet;
        s.ball_speed = speed;
        s.phase = Phase::Rolling;
        s.stats.total_games += 1;
        let score = self.score_event();
        self.outbox.push(score);
    }

    fn process_stop(&mut self) {
        let he = &self.config.house_edge;
        let s = &mut self.state;
        s.phase = Phase::Resolved;
        s.lag_pending = false;

        let resolution = resolve(s.ball_position, s.consecutive_wins, s.total_profit, he);
        let multiplier = resolution.paid.multiplier;
        let total = house_edge::total_multiplier(multiplier, s.streak, he.streak_bonus);
        let win = win_amount(s.current_bet, multiplier, s.streak, he.streak_bonus);

        s.current_winnings += win;
        s.total_profit += win - s.current_bet;

        if resolution.is_near_miss(he.near_miss_threshold) {
            self.scheduler.after(
                he.near_miss_delay_ms,
                BounceTask::NearMiss {
                    shown: resolution.displayed,
                },
            );
        }

        if multiplier >= he.win_multiplier {
            s.streak += 1;
            s.consecutive_wins += 1;
            s.stats.total_wins += 1;
            s.stats.best_streak = s.stats.best_streak.max(s.streak);
        } else {
            s.streak = 0;
            s.consecutive_wins = 0;
        }
        s.stats.biggest_win = s.stats.biggest_win.max(win);

        let title = result_title(multiplier);
        tracing::info!(
            position = resolution.stop_position,
            multiplier,
            win,
            streak = s.streak,
            "ball stopped"
        );
        s.last_result = Some(RoundResult {
            resolution,
            win_amount: win,
            total_multiplier: total,
            title: title.to_string(),
        });

        let score = self.score_event();
        self.outbox.push(score);
        self.outbox.push(GameEvent::Notify(
            Notice::success(format!("{title} {total:.1}x +{win}")).with_duration(RESULT_NOTICE_MS),
        ));
    }

    fn run_task(&mut self, task: BounceTask) {
        match task {
            BounceTask::ProcessStop => {
                if self.state.phase == Phase::Rolling {
                    self.process_stop();
                }
            },
            BounceTask::NearMiss { shown } => {
                self.outbox.push(GameEvent::Notify(
                    Notice::warning(format!("SO CLOSE to {}!", shown.label()))
                        .with_duration(self.config.house_edge.near_miss_duration_ms),
                ));
            },
        }
    }

    fn handle_input(&mut self, input: BounceInput) {
        let result = match input {
            BounceInput::Start { bet } => self.start_round(bet),
            BounceInput::Stop => self.stop(),
            BounceInput::Continue => self.continue_round(),
            BounceInput::CashOut => self.cash_out().map(|_| ()),
        };
        match (input, result) {
            (_, Ok(())) => {},
            // A late tap after the ball stopped is not worth a notice.
            (BounceInput::Stop, Err(BounceError::NoRoundInProgress)) => {},
            (_, Err(err)) => {
                tracing::debug!(?input, %err, "input refused");
                self.outbox
                    .push(GameEvent::Notify(Notice::error(err.user_message())));
            },
        }
    }

    fn score_event(&self) -> GameEvent {
        GameEvent::ScoreUpdate {
            entity: BETTOR_ID,
            score: self.state.balance + self.state.current_winnings,
        }
    }

    fn is_broke(&self) -> bool {
        let s = &self.state;
        s.phase != Phase::Rolling && s.current_winnings == 0 && s.balance < self.config.min_bet
    }

    fn check_bankroll(&mut self) {
        if !self.state.round_complete && self.is_broke() {
            self.state.round_complete = true;
            tracing::info!(balance = self.state.balance, "bankroll exhausted");
            self.outbox.push(GameEvent::RoundComplete);
        }
    }
}

impl Default for BounceGame {
    fn default() -> Self {
        Self::new()
    }
}

impl ArcadeGame for BounceGame {
    fn metadata(&self) -> GameMetadata {
        GameMetadata {
            name: "Ard Bounce".to_string(),
            description: "Stop the ball on a high multiplier and cash out in time!".to_string(),
            estimated_round_duration: Duration::from_secs(10),
        }
    }

    fn init(&mut self, config: &SessionConfig) {
        self.rng = StdRng::seed_from_u64(config.seed);
        let balance = config
            .custom_i64("balance")
            .unwrap_or(self.config.starting_balance);
        self.state = BounceState::new(balance, self.config.default_bet);
        self.scheduler.reset();
        self.pending_inputs.clear();
        self.outbox.clear();
        self.paused = false;
        self.check_bankroll();
    }

    fn update(&mut self, dt: f32) -> Vec<GameEvent> {
        if self.paused {
            return Vec::new();
        }
        while let Some(input) = self.pending_inputs.pop_front() {
            self.handle_input(input);
        }

        let dt_ms = if dt.is_finite() && dt > 0.0 {
            f64::from(dt) * 1000.0
        } else {
            0.0
        };
        self.state.clock_ms += dt_ms;

        if self.state.phase == Phase::Rolling {
            self.state.move_ball();
        }
        for task in self.scheduler.advance(dt_ms) {
            self.run_task(task);
        }

        self.check_bankroll();
        std::mem::take(&mut self.outbox)
    }

    arcade_game_boilerplate!(state_type: BounceState);

    fn apply_input(&mut self, input: &[u8]) {
        if let Ok(input) = rmp_serde::from_slice::<BounceInput>(input) {
            self.pending_inputs.push_back(input);
        }
    }

    fn round_results(&self) -> Vec<EntityScore> {
        vec![EntityScore {
            entity: BETTOR_ID,
            score: self.state.balance + self.state.current_winnings,
        }]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ardjump_core::notice::NoticeKind;
    use ardjump_core::test_helpers::{self, TEST_DT, default_session, run_game_ticks};

    use crate::config::LagConfig;

    /// Config with input lag switched off so stops resolve immediately.
    fn no_lag() -> BounceConfig {
        BounceConfig {
            lag: LagConfig {
                streak_chance: 0.0,
                profit_chance: 0.0,
                ..LagConfig::default()
            },
            ..BounceConfig::default()
        }
    }

    fn game_with(config: BounceConfig) -> BounceGame {
        let mut game = BounceGame::with_config(config);
        game.init(&default_session(42));
        game
    }

    fn stop_at(game: &mut BounceGame, position: f64) {
        game.state.ball_position = position;
        game.stop().unwrap();
    }

    fn notices(events: &[GameEvent]) -> Vec<&Notice> {
        events
            .iter()
            .filter_map(|e| match e {
                GameEvent::Notify(n) => Some(n),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn contract_init_creates_state() {
        let mut game = BounceGame::with_config(BounceConfig::default());
        test_helpers::contract_init_creates_state(&mut game);
    }

    #[test]
    fn contract_apply_input_changes_state() {
        let mut game = game_with(BounceConfig::default());
        test_helpers::contract_apply_input_changes_state(
            &mut game,
            &BounceInput::Start { bet: 50 }.encode(),
        );
    }

    #[test]
    fn contract_update_advances_time() {
        let mut game = game_with(BounceConfig::default());
        test_helpers::contract_update_advances_time(&mut game);
    }

    #[test]
    fn contract_state_roundtrip() {
        let mut game = game_with(BounceConfig::default());
        game.start_round(100).unwrap();
        run_game_ticks(&mut game, 5, TEST_DT);
        test_helpers::contract_state_roundtrip_preserves(&mut game);
    }

    #[test]
    fn contract_pause_stops_updates() {
        let mut game = game_with(BounceConfig::default());
        game.start_round(50).unwrap();
        test_helpers::contract_pause_stops_updates(&mut game);
    }

    #[test]
    fn contract_round_results_complete() {
        let game = game_with(BounceConfig::default());
        let results = test_helpers::contract_round_results_complete(&game, 1);
        assert_eq!(results[0].score, 1000);
    }

    #[test]
    fn ten_x_hit_then_cash_out() {
        let mut game = game_with(no_lag());
        game.start_round(100).unwrap();
        assert_eq!(game.state.balance, 900);
        stop_at(&mut game, 65.0);

        let result = game.state.last_result.clone().unwrap();
        assert_eq!(result.win_amount, 1000);
        assert_eq!(result.title, "AMAZING!");
        assert_eq!(game.state.current_winnings, 1000);
        assert_eq!(game.state.total_profit, 900);

        assert_eq!(game.cash_out(), Ok(1000));
        assert_eq!(game.state.balance, 1900);
        assert_eq!(game.state.current_winnings, 0);
        assert_eq!(game.state.phase, Phase::Idle);

        let events = game.update(TEST_DT);
        let shown = notices(&events);
        assert!(shown.iter().any(|n| n.message == "AMAZING! 10.0x +1000"));
        assert!(
            shown
                .iter()
                .any(|n| n.message == "Cashed out 1000 coins!" && n.duration_ms == 2000)
        );
    }

    #[test]
    fn streak_grows_on_wins_and_resets_on_small_hits() {
        let mut game = game_with(no_lag());
        game.start_round(50).unwrap();
        stop_at(&mut game, 30.0);
        assert_eq!(game.state.streak, 1);
        assert_eq!(game.state.consecutive_wins, 1);
        assert_eq!(game.state.current_winnings, 100);

        game.continue_round().unwrap();
        assert_eq!(game.state.balance, 900);
        stop_at(&mut game, 10.0);
        // 1.2x with one streak step: floor(50 × 1.2 × 1.1)
        assert_eq!(game.state.current_winnings, 166);
        assert_eq!(game.state.streak, 0);
        assert_eq!(game.state.consecutive_wins, 0);
        assert_eq!(game.state.stats.best_streak, 1);
        assert_eq!(game.state.stats.total_wins, 1);
        assert_eq!(game.state.stats.total_games, 2);
        assert_eq!(game.state.stats.biggest_win, 100);
        assert_eq!(game.state.stats.win_rate(), 50);
    }

    #[test]
    fn best_streak_is_monotone() {
        let mut game = game_with(no_lag());
        game.start_round(10).unwrap();
        let mut best = 0;
        for position in [30.0, 50.0, 10.0, 30.0, 10.0] {
            stop_at(&mut game, position);
            assert!(game.state.stats.best_streak >= best);
            best = game.state.stats.best_streak;
            game.continue_round().unwrap();
        }
        assert_eq!(best, 2);
    }

    #[test]
    fn invalid_bets_leave_state_untouched() {
        let mut game = game_with(no_lag());
        let before = game.serialize_state();
        assert_eq!(game.start_round(5), Err(BounceError::BetBelowMinimum));
        assert_eq!(game.start_round(1001), Err(BounceError::BetExceedsBalance));
        assert_eq!(game.serialize_state(), before);
    }

    #[test]
    fn refused_input_becomes_error_notice() {
        let mut game = game_with(no_lag());
        game.apply_input(&BounceInput::Start { bet: 5 }.encode());
        let events = game.update(TEST_DT);
        let shown = notices(&events);
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].message, "Invalid bet amount!");
        assert_eq!(shown[0].kind, NoticeKind::Error);
        assert_eq!(game.state.balance, 1000);
        assert_eq!(game.state.stats.total_games, 0);
    }

    #[test]
    fn late_stop_is_silent() {
        let mut game = game_with(no_lag());
        game.apply_input(&BounceInput::Stop.encode());
        assert!(notices(&game.update(TEST_DT)).is_empty());
    }

    #[test]
    fn continue_refused_when_balance_is_short() {
        let mut game = game_with(no_lag());
        game.start_round(1000).unwrap();
        stop_at(&mut game, 10.0);
        let before = game.serialize_state();
        assert_eq!(game.continue_round(), Err(BounceError::InsufficientBalance));
        assert_eq!(game.serialize_state(), before);
        assert_eq!(game.cash_out(), Ok(1200));
        assert_eq!(game.state.balance, 1200);
    }

    #[test]
    fn phase_guards() {
        let mut game = game_with(no_lag());
        assert_eq!(game.cash_out(), Err(BounceError::NothingToCashOut));
        assert_eq!(game.continue_round(), Err(BounceError::NoRoundInProgress));
        assert_eq!(game.stop(), Err(BounceError::NoRoundInProgress));

        game.start_round(50).unwrap();
        assert_eq!(game.start_round(50), Err(BounceError::RoundInProgress));
        assert_eq!(game.cash_out(), Err(BounceError::RoundInProgress));
        assert_eq!(game.continue_round(), Err(BounceError::RoundInProgress));

        stop_at(&mut game, 30.0);
        assert_eq!(game.start_round(50), Err(BounceError::RoundInProgress));
    }

    #[test]
    fn ball_speed_and_bounce() {
        let mut game = game_with(no_lag());
        game.start_round(50).unwrap();
        assert!((3.0..5.0).contains(&game.state.ball_speed));

        game.state.ball_position = 99.0;
        game.state.ball_direction = 1.0;
        game.update(TEST_DT);
        assert_eq!(game.state.ball_position, 100.0);
        assert_eq!(game.state.ball_direction, -1.0);

        game.state.ball_position = 1.0;
        game.update(TEST_DT);
        assert_eq!(game.state.ball_position, 0.0);
        assert_eq!(game.state.ball_direction, 1.0);
    }

    #[test]
    fn ball_rests_outside_a_round() {
        let mut game = game_with(no_lag());
        run_game_ticks(&mut game, 10, TEST_DT);
        assert_eq!(game.state.ball_position, 0.0);
    }

    #[test]
    fn lagged_stop_resolves_later_while_ball_moves() {
        let config = BounceConfig {
            lag: LagConfig {
                streak_trigger: 0,
                streak_chance: 1.0,
                ..LagConfig::default()
            },
            ..BounceConfig::default()
        };
        let mut game = game_with(config);
        game.start_round(50).unwrap();
        game.state.ball_position = 10.0;
        game.state.ball_direction = 1.0;

        game.stop().unwrap();
        assert!(game.state.lag_pending);
        assert_eq!(game.state.phase, Phase::Rolling);

        // Second tap while the first is pending does nothing
        game.stop().unwrap();
        game.update(TEST_DT);
        assert!(game.state.ball_position > 10.0);

        run_game_ticks(&mut game, 3, TEST_DT);
        assert_eq!(game.state.phase, Phase::Resolved);
        assert!(!game.state.lag_pending);
        assert_eq!(game.state.stats.total_games, 1);
        let result = game.state.last_result.as_ref().unwrap();
        assert!(result.resolution.stop_position > 10.0);
    }

    #[test]
    fn pause_freezes_pending_stop() {
        let config = BounceConfig {
            lag: LagConfig {
                streak_trigger: 0,
                streak_chance: 1.0,
                ..LagConfig::default()
            },
            ..BounceConfig::default()
        };
        let mut game = game_with(config);
        game.start_round(50).unwrap();
        game.stop().unwrap();
        game.pause();
        run_game_ticks(&mut game, 10, TEST_DT);
        assert!(game.state.lag_pending);
        game.resume();
        run_game_ticks(&mut game, 4, TEST_DT);
        assert_eq!(game.state.phase, Phase::Resolved);
    }

    #[test]
    fn near_miss_notice_is_delayed() {
        let mut game = game_with(no_lag());
        game.start_round(50).unwrap();
        game.state.consecutive_wins = 20;
        game.state.total_profit = 1000;
        stop_at(&mut game, 60.2);

        let result = game.state.last_result.clone().unwrap();
        assert_eq!(result.resolution.displayed.multiplier, 10.0);
        assert_eq!(result.resolution.paid.multiplier, 5.0);

        // 500 ms at 60 Hz
        let early = run_game_ticks(&mut game, 29, TEST_DT);
        assert!(!notices(&early).iter().any(|n| n.message.starts_with("SO CLOSE")));
        let late = run_game_ticks(&mut game, 2, TEST_DT);
        let near = notices(&late);
        let near = near
            .iter()
            .find(|n| n.message == "SO CLOSE to 10x!")
            .unwrap();
        assert_eq!(near.kind, NoticeKind::Warning);
        assert_eq!(near.duration_ms, 2000);
    }

    #[test]
    fn session_balance_and_bankroll_end() {
        let mut game = BounceGame::with_config(no_lag());
        let mut session = default_session(1);
        session
            .custom
            .insert("balance".to_string(), serde_json::json!(2500));
        game.init(&session);
        assert_eq!(game.state.balance, 2500);
        assert!(!game.is_round_complete());

        session
            .custom
            .insert("balance".to_string(), serde_json::json!(5));
        game.init(&session);
        assert!(game.is_round_complete());
        let events = game.update(TEST_DT);
        assert!(events.contains(&GameEvent::RoundComplete));
        assert!(!game.update(TEST_DT).contains(&GameEvent::RoundComplete));
    }

    #[test]
    fn win_rate_rounds() {
        let stats = BounceStats {
            total_wins: 2,
            total_games: 3,
            ..BounceStats::default()
        };
        assert_eq!(stats.win_rate(), 67);
        assert_eq!(BounceStats::default().win_rate(), 0);
    }

    #[test]
    fn error_messages() {
        assert_eq!(
            BounceError::BetExceedsBalance.user_message(),
            "Invalid bet amount!"
        );
        assert_eq!(
            BounceError::InsufficientBalance.to_string(),
            "balance cannot cover the bet"
        );
    }
}
