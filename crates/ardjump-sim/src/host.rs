use std::time::Duration;

use ardjump_core::game_registry::GameId;
use ardjump_core::game_trait::{ArcadeGame, EntityScore, GameEvent, SessionConfig};
use ardjump_core::notice::{NoticeKind, NoticeQueue};

use crate::autoplay::Autoplayer;

/// Options for one headless session.
#[derive(Debug, Clone)]
pub struct HostOptions {
    pub game: GameId,
    pub seed: u64,
    /// Upper bound on simulated ticks.
    pub max_ticks: u64,
    /// Pace ticks against the wall clock instead of running flat out.
    pub realtime: bool,
    /// Starting balance handed to the bounce game.
    pub balance: Option<i64>,
}

impl Default for HostOptions {
    fn default() -> Self {
        Self {
            game: GameId::Race,
            seed: 0,
            max_ticks: 60 * 300,
            realtime: false,
            balance: None,
        }
    }
}

impl HostOptions {
    pub fn session(&self) -> SessionConfig {
        let mut session = SessionConfig::with_seed(self.seed);
        if let Some(balance) = self.balance {
            session
                .custom
                .insert("balance".to_string(), serde_json::json!(balance));
        }
        session
    }
}

#[derive(Debug)]
pub struct RunSummary {
    pub ticks: u64,
    pub completed: bool,
    pub notices: usize,
    pub results: Vec<EntityScore>,
}

/// Drive `game` at its tick rate until the round completes or the tick
/// budget runs out.
pub async fn run_session(game: &mut dyn ArcadeGame, options: &HostOptions) -> RunSummary {
    game.init(&options.session());
    let mut autoplayer = Autoplayer::new(options.game, options.seed);
    let mut notices = NoticeQueue::new();

    let tick_rate = game.tick_rate();
    let dt = 1.0 / tick_rate;
    let mut interval = options.realtime.then(|| {
        let mut interval = tokio::time::interval(Duration::from_secs_f32(dt));
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        interval
    });

    let mut ticks = 0;
    let mut shown = 0;
    let mut completed = false;
    while ticks < options.max_ticks && !completed {
        if let Some(interval) = interval.as_mut() {
            interval.tick().await;
        }

        if let Some(input) = autoplayer.next_input(game) {
            game.apply_input(&input);
        }
        for event in game.update(dt) {
            match event {
                GameEvent::ScoreUpdate { entity, score } => {
                    tracing::debug!(entity, score, "score");
                },
                GameEvent::Landed { entity, x, y } => {
                    tracing::trace!(entity, x, y, "landed");
                },
                GameEvent::Notify(notice) => {
                    match notice.kind {
                        NoticeKind::Error | NoticeKind::Warning => {
                            tracing::warn!(tick = ticks, "{}", notice.message)
                        },
                        NoticeKind::Info | NoticeKind::Success => {
                            tracing::info!(tick = ticks, "{}", notice.message)
                        },
                    }
                    shown += 1;
                    notices.push(notice);
                },
                GameEvent::RoundComplete => completed = true,
            }
        }
        notices.tick(f64::from(dt) * 1000.0);
        ticks += 1;
    }

    let results = game.round_results();
    tracing::info!(game = %options.game, ticks, completed, ?results, "session finished");
    RunSummary {
        ticks,
        completed,
        notices: shown,
        results,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::GameRegistry;

    fn options(game: GameId, max_ticks: u64) -> HostOptions {
        HostOptions {
            game,
            seed: 11,
            max_ticks,
            ..HostOptions::default()
        }
    }

    #[tokio::test]
    async fn race_runs_to_budget_or_finish() {
        let registry = GameRegistry::new();
        let mut game = registry.create(GameId::Race).unwrap();
        let summary = run_session(game.as_mut(), &options(GameId::Race, 1200)).await;
        assert!(summary.ticks <= 1200);
        assert_eq!(summary.results.len(), 2);
    }

    #[tokio::test]
    async fn solo_countdown_ends_the_run() {
        let registry = GameRegistry::new();
        let mut game = registry.create(GameId::Solo).unwrap();
        // 180 s at 60 Hz, plus slack
        let summary = run_session(game.as_mut(), &options(GameId::Solo, 60 * 200)).await;
        assert!(summary.completed);
        assert!(summary.notices > 0);
    }

    #[tokio::test]
    async fn bounce_session_plays_rounds() {
        let registry = GameRegistry::new();
        let mut game = registry.create(GameId::Bounce).unwrap();
        let opts = HostOptions {
            balance: Some(500),
            ..options(GameId::Bounce, 3000)
        };
        let summary = run_session(game.as_mut(), &opts).await;
        assert_eq!(summary.ticks, 3000);
        assert!(!summary.completed);
        assert!(summary.notices > 0);
        assert_eq!(summary.results.len(), 1);
    }

    #[test]
    fn session_carries_balance() {
        let opts = HostOptions {
            balance: Some(750),
            ..HostOptions::default()
        };
        assert_eq!(opts.session().custom_i64("balance"), Some(750));
        assert_eq!(HostOptions::default().session().custom_i64("balance"), None);
    }
}
