use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::notice::Notice;

/// Identifier for a simulated entity (the human runner, a bot, the bettor).
pub type EntityId = u64;

/// Core trait that every Ard Jump game implements.
///
/// The host owns the tick scheduler, input collection and the render /
/// notification collaborators; the game only owns its simulation.
pub trait ArcadeGame: Send {
    /// Game metadata for the menu shell.
    fn metadata(&self) -> GameMetadata;

    /// (Re)start a session. Any previous state, queued input and scheduled
    /// tasks are discarded.
    fn init(&mut self, config: &SessionConfig);

    /// Advance one fixed simulation step. `dt` is the wall time the step
    /// represents, in seconds. Queued input is drained first.
    fn update(&mut self, dt: f32) -> Vec<GameEvent>;

    /// Serialize the current state snapshot for the render collaborator.
    fn serialize_state(&self) -> Vec<u8>;

    /// Replace the state with a previously serialized snapshot.
    fn apply_state(&mut self, state: &[u8]);

    /// Queue an encoded input event. It is consumed by the next `update`.
    fn apply_input(&mut self, input: &[u8]);

    /// Simulation tick rate in Hz.
    fn tick_rate(&self) -> f32 {
        60.0
    }

    /// Freeze the simulation. No ticks or scheduled tasks run while paused.
    fn pause(&mut self);

    /// Resume after `pause`.
    fn resume(&mut self);

    /// Whether the current round/run is over.
    fn is_round_complete(&self) -> bool;

    /// Final scores for the current round.
    fn round_results(&self) -> Vec<EntityScore>;
}

/// Game metadata for the menu shell.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameMetadata {
    pub name: String,
    pub description: String,
    pub estimated_round_duration: Duration,
}

/// Options for a game session, read by the host from the persistence
/// collaborator (balance carry-over, skin) plus the RNG seed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionConfig {
    pub seed: u64,
    pub custom: HashMap<String, serde_json::Value>,
}

impl SessionConfig {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            custom: HashMap::new(),
        }
    }

    pub fn custom_i64(&self, key: &str) -> Option<i64> {
        self.custom.get(key).and_then(|v| v.as_i64())
    }

    pub fn custom_str(&self, key: &str) -> Option<&str> {
        self.custom.get(key).and_then(|v| v.as_str())
    }
}

/// Events emitted by a game during `update`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    ScoreUpdate { entity: EntityId, score: i64 },
    /// An entity touched down after being airborne (landing effects).
    Landed { entity: EntityId, x: f32, y: f32 },
    Notify(Notice),
    RoundComplete,
}

/// Score entry for an entity at the end of a round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityScore {
    pub entity: EntityId,
    pub score: i64,
}

/// Generates the 5 boilerplate `ArcadeGame` methods shared by every game:
/// `serialize_state`, `apply_state`, `pause`, `resume`, `is_round_complete`.
///
/// Requires the implementing struct to have `state: $StateType` and `paused: bool` fields,
/// and `$StateType` to have a `round_complete: bool` field.
#[macro_export]
macro_rules! arcade_game_boilerplate {
    (state_type: $StateType:ty) => {
        fn serialize_state(&self) -> Vec<u8> {
            rmp_serde::to_vec(&self.state).expect("game state serialization must succeed")
        }

        fn apply_state(&mut self, state: &[u8]) {
            if let Ok(s) = rmp_serde::from_slice::<$StateType>(state) {
                self.state = s;
            }
        }

        fn pause(&mut self) {
            self.paused = true;
        }

        fn resume(&mut self) {
            self.paused = false;
        }

        fn is_round_complete(&self) -> bool {
            self.state.round_complete
        }
    };
}
