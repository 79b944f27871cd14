use std::collections::HashMap;

use ardjump_core::game_registry::GameId;
use ardjump_core::game_trait::ArcadeGame;

/// Factory function type for creating game instances.
type GameFactory = fn() -> Box<dyn ArcadeGame>;

/// Registry mapping game IDs to factory functions.
pub struct GameRegistry {
    factories: HashMap<GameId, GameFactory>,
}

impl Default for GameRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl GameRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            factories: HashMap::new(),
        };
        registry.register_defaults();
        registry
    }

    fn register_defaults(&mut self) {
        self.factories.insert(GameId::Solo, || {
            Box::new(ardjump_platformer::SoloJumper::new())
        });
        self.factories.insert(GameId::Race, || {
            Box::new(ardjump_platformer::PlatformRacer::new())
        });
        self.factories
            .insert(GameId::Bounce, || Box::new(ardjump_bounce::BounceGame::new()));
    }

    pub fn create(&self, game_id: GameId) -> Option<Box<dyn ArcadeGame>> {
        self.factories.get(&game_id).map(|f| f())
    }

    pub fn available_games(&self) -> usize {
        self.factories.len()
    }
}
