use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The games a host can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameId {
    /// Single-player jumper with lives and a countdown.
    Solo,
    /// Race against the scripted bot.
    Race,
    /// Bounce betting game.
    Bounce,
}

impl GameId {
    pub const ALL: [GameId; 3] = [GameId::Solo, GameId::Race, GameId::Bounce];

    pub fn as_str(&self) -> &'static str {
        match self {
            GameId::Solo => "solo",
            GameId::Race => "race",
            GameId::Bounce => "bounce",
        }
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for an unrecognised game name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownGame(pub String);

impl fmt::Display for UnknownGame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown game: {:?}", self.0)
    }
}

impl std::error::Error for UnknownGame {}

impl FromStr for GameId {
    type Err = UnknownGame;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "solo" | "single" => Ok(GameId::Solo),
            "race" | "multiplayer" => Ok(GameId::Race),
            "bounce" => Ok(GameId::Bounce),
            _ => Err(UnknownGame(s.to_string())),
        }
    }
}
