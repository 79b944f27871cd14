pub mod config;
pub mod game_registry;
pub mod game_trait;
pub mod notice;
pub mod schedule;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use crate::game_trait::{ArcadeGame, EntityScore, GameEvent, SessionConfig};

    /// Fixed step used by the contract tests (60 Hz).
    pub const TEST_DT: f32 = 1.0 / 60.0;

    /// Session config with the given seed and no custom options.
    pub fn default_session(seed: u64) -> SessionConfig {
        SessionConfig::with_seed(seed)
    }

    /// Run N game ticks, returning all accumulated events.
    pub fn run_game_ticks(game: &mut dyn ArcadeGame, n: usize, dt: f32) -> Vec<GameEvent> {
        let mut all_events = Vec::new();
        for _ in 0..n {
            all_events.extend(game.update(dt));
        }
        all_events
    }

    /// Assert that the game's serialized state differs from `before`.
    pub fn assert_game_state_changed(game: &dyn ArcadeGame, before: &[u8]) {
        let after = game.serialize_state();
        assert_ne!(
            before,
            &after[..],
            "Game state should have changed after operation"
        );
    }

    // ================================================================
    // Game Trait Contract Tests
    // ================================================================
    // Every ArcadeGame implementation calls these from its own
    // #[cfg(test)] module with a concrete game instance.

    /// After init(), serialize_state() must return non-empty bytes.
    pub fn contract_init_creates_state(game: &mut dyn ArcadeGame) {
        game.init(&default_session(42));
        let state = game.serialize_state();
        assert!(
            !state.is_empty(),
            "serialize_state() must return non-empty bytes after init"
        );
    }

    /// apply_input() with valid data followed by update() must change state.
    pub fn contract_apply_input_changes_state(game: &mut dyn ArcadeGame, valid_input: &[u8]) {
        let before = game.serialize_state();
        game.apply_input(valid_input);
        game.update(TEST_DT);
        assert_game_state_changed(game, &before);
    }

    /// update() with dt>0 must advance the game clock.
    pub fn contract_update_advances_time(game: &mut dyn ArcadeGame) {
        let before = game.serialize_state();
        game.update(TEST_DT);
        assert_game_state_changed(game, &before);
    }

    /// serialize → apply → serialize must be stable.
    pub fn contract_state_roundtrip_preserves(game: &mut dyn ArcadeGame) {
        let state_a = game.serialize_state();
        game.apply_state(&state_a);
        let state_b = game.serialize_state();
        assert_eq!(
            state_a, state_b,
            "State must be stable after serialize→apply→serialize roundtrip"
        );
    }

    /// pause() must freeze the simulation, resume() must unfreeze it.
    pub fn contract_pause_stops_updates(game: &mut dyn ArcadeGame) {
        game.pause();
        let before = game.serialize_state();
        for _ in 0..30 {
            game.update(TEST_DT);
        }
        let during_pause = game.serialize_state();
        assert_eq!(before, during_pause, "State must not change while paused");

        game.resume();
        game.update(TEST_DT);
        assert_game_state_changed(game, &during_pause);
    }

    /// round_results() must return an entry for each simulated entity.
    pub fn contract_round_results_complete(
        game: &dyn ArcadeGame,
        expected_entities: usize,
    ) -> Vec<EntityScore> {
        let results = game.round_results();
        assert_eq!(
            results.len(),
            expected_entities,
            "round_results must have one entry per entity"
        );
        results
    }
}
