//! Scripted stand-in for the input collaborator.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use ardjump_bounce::{BounceInput, BounceState, Phase};
use ardjump_core::game_registry::GameId;
use ardjump_core::game_trait::ArcadeGame;
use ardjump_platformer::PlatformerInput;

/// Smallest stake the autoplayer puts down.
const MIN_STAKE: i64 = 10;

/// Produces one encoded input per tick at most.
pub struct Autoplayer {
    game: GameId,
    rng: StdRng,
    charging: bool,
    /// Ticks until the next action.
    countdown: u32,
}

impl Autoplayer {
    pub fn new(game: GameId, seed: u64) -> Self {
        Self {
            game,
            rng: StdRng::seed_from_u64(seed.wrapping_add(1)),
            charging: false,
            countdown: 0,
        }
    }

    pub fn next_input(&mut self, game: &dyn ArcadeGame) -> Option<Vec<u8>> {
        match self.game {
            GameId::Solo | GameId::Race => self.platformer_input(),
            GameId::Bounce => {
                let state = rmp_serde::from_slice::<BounceState>(&game.serialize_state()).ok()?;
                self.bounce_input(&state)
            },
        }
    }

    /// Hold the charge for a random stretch, release, wait, repeat.
    fn platformer_input(&mut self) -> Option<Vec<u8>> {
        if self.countdown > 0 {
            self.countdown -= 1;
            return None;
        }
        let input = if self.charging {
            self.countdown = self.rng.random_range(20..50);
            PlatformerInput::ChargeRelease
        } else {
            self.countdown = self.rng.random_range(15..50);
            PlatformerInput::ChargeStart
        };
        self.charging = !self.charging;
        Some(input.encode())
    }

    fn bounce_input(&mut self, state: &BounceState) -> Option<Vec<u8>> {
        let input = match state.phase {
            Phase::Idle => {
                if state.balance < MIN_STAKE {
                    return None;
                }
                self.countdown = self.rng.random_range(10..90);
                BounceInput::Start {
                    bet: (state.balance / 10).max(MIN_STAKE),
                }
            },
            Phase::Rolling => {
                if state.lag_pending {
                    return None;
                }
                if self.countdown > 0 {
                    self.countdown -= 1;
                    return None;
                }
                BounceInput::Stop
            },
            Phase::Resolved => {
                if state.current_bet <= state.balance && self.rng.random_bool(0.5) {
                    self.countdown = self.rng.random_range(10..90);
                    BounceInput::Continue
                } else {
                    BounceInput::CashOut
                }
            },
        };
        Some(input.encode())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ardjump_bounce::BounceGame;
    use ardjump_bounce::config::BounceConfig;
    use ardjump_core::game_trait::SessionConfig;

    #[test]
    fn platformer_alternates_press_and_release() {
        let mut bot = Autoplayer::new(GameId::Race, 3);
        let mut decoded = Vec::new();
        for _ in 0..400 {
            if let Some(bytes) = bot.platformer_input() {
                decoded.push(rmp_serde::from_slice::<PlatformerInput>(&bytes).unwrap());
            }
        }
        assert!(decoded.len() >= 6);
        for pair in decoded.chunks(2) {
            assert_eq!(pair[0], PlatformerInput::ChargeStart);
            if let Some(second) = pair.get(1) {
                assert_eq!(*second, PlatformerInput::ChargeRelease);
            }
        }
    }

    #[test]
    fn bounce_bets_a_tenth_of_balance() {
        let mut game = BounceGame::with_config(BounceConfig::default());
        game.init(&SessionConfig::with_seed(5));
        let mut bot = Autoplayer::new(GameId::Bounce, 5);
        let bytes = bot.next_input(&game).unwrap();
        assert_eq!(
            rmp_serde::from_slice::<BounceInput>(&bytes).unwrap(),
            BounceInput::Start { bet: 100 }
        );
    }

    #[test]
    fn bounce_waits_when_broke() {
        let mut game = BounceGame::with_config(BounceConfig::default());
        let mut session = SessionConfig::with_seed(5);
        session
            .custom
            .insert("balance".to_string(), serde_json::json!(4));
        game.init(&session);
        let mut bot = Autoplayer::new(GameId::Bounce, 5);
        assert!(bot.next_input(&game).is_none());
    }
}
