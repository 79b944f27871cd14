use serde::{Deserialize, Serialize};

use crate::collision::{Rect, overlaps};
use crate::config::PhysicsConfig;
use crate::course_gen::Course;

/// Kinematic state of one controllable entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub w: f32,
    pub h: f32,
    pub grounded: bool,
    /// Coyote-time buffer: ticks left during which a jump is still allowed.
    pub ground_timer: u32,
}

impl Body {
    pub fn new(x: f32, y: f32, physics: &PhysicsConfig) -> Self {
        Self {
            x,
            y,
            vx: 0.0,
            vy: 0.0,
            w: physics.entity_width,
            h: physics.entity_height,
            grounded: false,
            ground_timer: 0,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.w, self.h)
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// Grounded, or still inside the coyote-time buffer.
    pub fn can_jump(&self) -> bool {
        self.grounded || self.ground_timer > 0
    }

    /// Teleport to a standstill, airborne.
    pub fn place(&mut self, x: f32, y: f32) {
        self.x = x;
        self.y = y;
        self.vx = 0.0;
        self.vy = 0.0;
        self.grounded = false;
        self.ground_timer = 0;
    }
}

/// Which face of an obstacle was struck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleHit {
    Head,
    Side,
}

/// What happened to a body during one tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepReport {
    /// Airborne at the start of the tick, grounded at the end.
    pub touched_down: bool,
    /// Index into `Course::platforms` of the platform under the body.
    pub standing_on: Option<usize>,
    pub obstacle_hits: Vec<ObstacleHit>,
    pub fell_into_void: bool,
}

/// Advance a body by one fixed tick: gravity, integration, drag, platform
/// and obstacle response, void check, coyote timer.
pub fn step_body(
    body: &mut Body,
    course: &Course,
    physics: &PhysicsConfig,
    void_y: f32,
) -> StepReport {
    let mut report = StepReport::default();

    if !body.grounded {
        body.vy += physics.gravity;
    }

    body.x += body.vx;
    body.y += body.vy;

    body.vx *= if body.grounded {
        physics.ground_friction
    } else {
        physics.air_drag
    };

    let was_grounded = body.grounded;
    body.grounded = false;

    // A body resting on a top face keeps its support even when rounding
    // sinks it a hair into the platform.
    let resting = if was_grounded && body.vy >= 0.0 {
        resting_support(body, course, physics)
    } else {
        None
    };
    if let Some(i) = resting {
        body.y = course.platforms[i].rect.y - body.h;
        body.vy = 0.0;
        body.grounded = true;
        report.standing_on = Some(i);
    }

    for (i, platform) in course.platforms.iter().enumerate() {
        if resting == Some(i) {
            continue;
        }
        if resolve_platform(body, &platform.rect, physics) {
            report.standing_on = Some(i);
        }
    }

    for obstacle in &course.obstacles {
        if let Some(hit) = resolve_obstacle(body, &obstacle.rect, physics) {
            report.obstacle_hits.push(hit);
        }
    }

    report.fell_into_void = body.y > void_y;
    report.touched_down = body.grounded && !was_grounded;

    if body.grounded {
        body.ground_timer = physics.coyote_ticks;
    } else {
        body.ground_timer = body.ground_timer.saturating_sub(1);
    }

    report
}

/// Returns true when the body landed on this platform.
fn resolve_platform(body: &mut Body, platform: &Rect, physics: &PhysicsConfig) -> bool {
    if !overlaps(&body.rect(), platform) {
        return false;
    }

    if body.vy > 0.0 && body.bottom() <= platform.y + physics.contact_tolerance {
        body.y = platform.y - body.h;
        body.vy = 0.0;
        body.grounded = true;
        return true;
    }

    if body.vy < 0.0 && body.y >= platform.bottom() - physics.contact_tolerance {
        body.y = platform.bottom();
        body.vy = physics.head_bump_speed;
        return false;
    }

    push_out_sideways(body, platform, physics.side_margin);
    body.vx = -body.vx.abs() * physics.platform_side_restitution;
    false
}

fn resolve_obstacle(
    body: &mut Body,
    obstacle: &Rect,
    physics: &PhysicsConfig,
) -> Option<ObstacleHit> {
    if !overlaps(&body.rect(), obstacle) {
        return None;
    }

    if body.vy < 0.0 && body.y >= obstacle.bottom() - physics.obstacle_head_tolerance {
        body.vy = physics.obstacle_head_bounce;
        return Some(ObstacleHit::Head);
    }

    push_out_sideways(body, obstacle, physics.side_margin);
    body.vx = -body.vx.abs() * physics.obstacle_side_restitution;
    Some(ObstacleHit::Side)
}

fn push_out_sideways(body: &mut Body, solid: &Rect, margin: f32) {
    if body.x < solid.x {
        body.x = solid.x - body.w - margin;
    } else {
        body.x = solid.right() + margin;
    }
}

fn resting_support(body: &Body, course: &Course, physics: &PhysicsConfig) -> Option<usize> {
    course.platforms.iter().position(|p| {
        (body.bottom() - p.rect.y).abs() <= physics.rest_tolerance
            && body.x < p.rect.right()
            && body.x + body.w > p.rect.x
    })
}
