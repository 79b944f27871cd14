//! Multiplier zones on the [0, 100] track.

use serde::{Deserialize, Serialize};

/// A contiguous stretch of the track paying `multiplier`. Bounds are
/// inclusive; neighbouring zones share their boundary value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub multiplier: f64,
    pub start: f64,
    pub end: f64,
}

impl Zone {
    pub const fn new(multiplier: f64, start: f64, end: f64) -> Self {
        Self {
            multiplier,
            start,
            end,
        }
    }

    pub fn center(&self) -> f64 {
        (self.start + self.end) / 2.0
    }

    pub fn contains(&self, position: f64) -> bool {
        position >= self.start && position <= self.end
    }

    pub fn width(&self) -> f64 {
        self.end - self.start
    }

    pub fn label(&self) -> String {
        format!("{}x", self.multiplier)
    }
}

/// The track, left to right. The jackpot sits in the middle.
pub const ZONES: [Zone; 7] = [
    Zone::new(1.2, 0.0, 25.0),
    Zone::new(2.0, 25.0, 45.0),
    Zone::new(5.0, 45.0, 60.0),
    Zone::new(10.0, 60.0, 70.0),
    Zone::new(20.0, 70.0, 75.0),
    Zone::new(10.0, 75.0, 85.0),
    Zone::new(5.0, 85.0, 100.0),
];

/// Zone containing `position`. The first match wins on a shared
/// boundary; anything off the track (NaN included) maps to the lowest zone.
pub fn classify(position: f64) -> &'static Zone {
    ZONES
        .iter()
        .find(|z| z.contains(position))
        .unwrap_or(&ZONES[0])
}
