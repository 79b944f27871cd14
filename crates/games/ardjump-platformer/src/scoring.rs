use crate::config::ScoringConfig;

/// Points for a launch: a tenth of the power, boosted 10% per combo step.
pub fn jump_score(power: f32, combo: u32, combo_step: f64) -> i64 {
    let base = (power / 10.0).floor() as f64;
    (base * (1.0 + combo as f64 * combo_step)).floor() as i64
}

/// Solo finish bonus: flat victory bonus plus time left on the clock.
pub fn solo_victory_bonus(seconds_left: u32, scoring: &ScoringConfig) -> i64 {
    scoring.victory_bonus + i64::from(seconds_left) * scoring.time_bonus_per_sec
}

pub fn combo_message(combo: u32, earned: i64) -> String {
    format!("x{combo} COMBO! +{earned}")
}

/// `m:ss` countdown display.
pub fn format_clock(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// `m:ss.cc` race time display.
pub fn format_race_time(ms: f64) -> String {
    let ms = ms.max(0.0) as u64;
    let seconds = ms / 1000;
    format!(
        "{}:{:02}.{:02}",
        seconds / 60,
        seconds % 60,
        (ms % 1000) / 10
    )
}
