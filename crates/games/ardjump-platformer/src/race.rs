use ardjump_core::notice::Notice;
use serde::{Deserialize, Serialize};

use crate::course_gen::Course;
use crate::racer::Racer;
use crate::scoring::format_race_time;

/// Race participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Human,
    Bot,
}

/// Progress of the race after a finish was recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RaceStatus {
    Running,
    /// The human is in, the bot is still racing.
    HumanWaiting,
    /// The bot is in, the human is still racing.
    BotWaiting,
    Over { winner: Side },
}

/// Tracks finish times, the winner and the current leader.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RaceArbiter {
    pub leader: Option<Side>,
    pub winner: Option<Side>,
}

const LEAD_NOTICE_MS: u32 = 1500;
const FINISH_NOTICE_MS: u32 = 3000;

/// Whether a racer standing on `platform_index` has crossed the finish.
pub fn on_finish(course: &Course, racer: &Racer, platform_index: usize) -> bool {
    course
        .platforms
        .get(platform_index)
        .is_some_and(|p| p.is_finish())
        && racer.body.x >= course.finish_line_x
}

impl RaceArbiter {
    /// Stamp the racer's finish time. Only the first call has any effect.
    pub fn record_finish(racer: &mut Racer, now_ms: f64) -> bool {
        if racer.has_finished() {
            return false;
        }
        racer.finish_time_ms = Some(now_ms);
        tracing::info!(entity = racer.id, time = %format_race_time(now_ms), "racer finished");
        true
    }

    /// Evaluate the race after a finish. Both in: the smaller time wins
    /// (a tie goes to the bot).
    pub fn settle(&mut self, human: &Racer, bot: &Racer) -> RaceStatus {
        match (human.finish_time_ms, bot.finish_time_ms) {
            (Some(h), Some(b)) => {
                let winner = if h < b { Side::Human } else { Side::Bot };
                self.winner = Some(winner);
                RaceStatus::Over { winner }
            },
            (Some(_), None) => RaceStatus::HumanWaiting,
            (None, Some(_)) => RaceStatus::BotWaiting,
            (None, None) => RaceStatus::Running,
        }
    }

    /// Update the leader from the two distances. A tie keeps the previous
    /// leader. Returns a notice when the lead changes hands.
    pub fn track_lead(&mut self, human_distance: i64, bot_distance: i64) -> Option<Notice> {
        let current = match human_distance.cmp(&bot_distance) {
            std::cmp::Ordering::Greater => Some(Side::Human),
            std::cmp::Ordering::Less => Some(Side::Bot),
            std::cmp::Ordering::Equal => self.leader,
        };
        let previous = std::mem::replace(&mut self.leader, current);
        match (previous, current) {
            (Some(p), Some(c)) if p != c => Some(lead_notice(c)),
            _ => None,
        }
    }
}

fn lead_notice(leader: Side) -> Notice {
    match leader {
        Side::Bot => Notice::warning("Bot takes the lead!").with_duration(LEAD_NOTICE_MS),
        Side::Human => Notice::success("You're back in front!").with_duration(LEAD_NOTICE_MS),
    }
}

/// Notice shown when one side finished and the other has not.
pub fn status_notice(status: RaceStatus) -> Option<Notice> {
    match status {
        RaceStatus::HumanWaiting => Some(
            Notice::info("You finished! Waiting for bot...").with_duration(FINISH_NOTICE_MS),
        ),
        RaceStatus::BotWaiting => {
            Some(Notice::warning("Bot finished! Hurry up!").with_duration(FINISH_NOTICE_MS))
        },
        RaceStatus::Running | RaceStatus::Over { .. } => None,
    }
}
