use rand::Rng;
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;
use serde::{Deserialize, Serialize};

use crate::collision::Rect;
use crate::config::LevelConfig;

/// Platform category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlatformKind {
    Ground,
    Floating,
    Step,
    Checkpoint,
    Finish,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub rect: Rect,
    pub kind: PlatformKind,
}

impl Platform {
    pub fn is_finish(&self) -> bool {
        self.kind == PlatformKind::Finish
    }
}

/// Harmful block: bounces entities back and costs the human points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub rect: Rect,
}

/// Side of an obstacle.
pub const OBSTACLE_SIZE: f32 = 40.0;
/// Side of the square used to pick a coin up.
pub const COIN_PICKUP_SIZE: f32 = 30.0;
/// Platform thickness for ground, step and checkpoint platforms.
const SLAB_HEIGHT: f32 = 100.0;
/// The finish platform always ends this far past the finish distance.
const FINISH_OVERHANG: f32 = 200.0;

/// A collectible coin. Once collected it stays collected.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coin {
    pub x: f32,
    pub y: f32,
    pub collected: bool,
}

impl Coin {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            collected: false,
        }
    }

    pub fn pickup_rect(&self) -> Rect {
        Rect::centered(self.x, self.y, COIN_PICKUP_SIZE)
    }

    /// Mark the coin collected. Returns true only on the first call.
    pub fn collect(&mut self) -> bool {
        if self.collected {
            return false;
        }
        self.collected = true;
        true
    }
}

/// Static level geometry for one run. Coins are copied into the game state
/// at init since they are the only mutable part of a level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    /// Platforms in generation order; the last one is the finish.
    pub platforms: Vec<Platform>,
    pub obstacles: Vec<Obstacle>,
    pub coins: Vec<Coin>,
    pub finish_distance: f32,
    /// Landing on the finish platform counts only at or beyond this x.
    pub finish_line_x: f32,
    pub spawn_x: f32,
    pub spawn_y: f32,
}

impl Course {
    pub fn finish(&self) -> Option<&Platform> {
        self.platforms.iter().rev().find(|p| p.is_finish())
    }

    /// Rightmost platform edge.
    pub fn far_edge(&self) -> f32 {
        self.platforms
            .iter()
            .map(|p| p.rect.right())
            .fold(0.0, f32::max)
    }
}

/// Race level section archetypes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    /// Several ground slabs with coins over the wider gaps.
    GroundRun,
    /// Floating islands over a void, alternating mid and high elevation.
    VoidCrossing,
    /// Ascending or descending steps with a coin over each.
    Staircase,
    /// Ground slab with a floating platform and a coin line between the tiers.
    TwoTier,
}

const SECTIONS: [Section; 4] = [
    Section::GroundRun,
    Section::VoidCrossing,
    Section::Staircase,
    Section::TwoTier,
];

/// Accumulates geometry behind a cursor that only moves forward.
struct CourseBuilder {
    cursor: f32,
    platforms: Vec<Platform>,
    obstacles: Vec<Obstacle>,
    coins: Vec<Coin>,
}

impl CourseBuilder {
    fn new() -> Self {
        Self {
            cursor: 0.0,
            platforms: Vec::new(),
            obstacles: Vec::new(),
            coins: Vec::new(),
        }
    }

    fn platform(&mut self, x: f32, y: f32, w: f32, h: f32, kind: PlatformKind) {
        self.platforms.push(Platform {
            rect: Rect::new(x, y, w, h),
            kind,
        });
    }

    /// Obstacle standing on a surface at `surface_y`.
    fn obstacle(&mut self, x: f32, surface_y: f32) {
        self.obstacles.push(Obstacle {
            rect: Rect::new(x, surface_y - OBSTACLE_SIZE, OBSTACLE_SIZE, OBSTACLE_SIZE),
        });
    }

    fn coin(&mut self, x: f32, y: f32) {
        self.coins.push(Coin::new(x, y));
    }

    fn finish(mut self, level: &LevelConfig, width: f32, y: f32) -> Course {
        let finish_x = self
            .cursor
            .max(level.finish_distance + FINISH_OVERHANG - width);
        self.platform(finish_x, y, width, SLAB_HEIGHT, PlatformKind::Finish);
        Course {
            platforms: self.platforms,
            obstacles: self.obstacles,
            coins: self.coins,
            finish_distance: level.finish_distance,
            finish_line_x: level.finish_distance - level.finish_zone,
            spawn_x: level.spawn_x,
            spawn_y: level.spawn_y(),
        }
    }
}

fn uniform(rng: &mut impl Rng, lo: f32, hi: f32) -> f32 {
    lo + rng.random::<f32>() * (hi - lo)
}

fn chance(rng: &mut impl Rng, p: f64) -> bool {
    rng.random::<f64>() < p
}

/// Single-player level: islands of random width and elevation separated by
/// random gaps, some carrying an obstacle.
pub fn generate_solo_course(rng: &mut impl Rng, level: &LevelConfig) -> Course {
    let h = level.viewport_height;
    let mut b = CourseBuilder::new();

    b.platform(0.0, h - SLAB_HEIGHT, 300.0, SLAB_HEIGHT, PlatformKind::Ground);
    b.cursor = 300.0;

    while b.cursor < level.finish_distance {
        let gap = uniform(rng, 100.0, 300.0);
        let width = uniform(rng, 100.0, 250.0);
        let thickness = uniform(rng, 70.0, 100.0);
        let y = h - thickness - uniform(rng, 0.0, 100.0);

        b.cursor += gap;
        b.platform(b.cursor, y, width, thickness, PlatformKind::Floating);

        if chance(rng, level.solo_obstacle_chance)
            && b.cursor < level.finish_distance - level.solo_obstacle_clearance
        {
            b.obstacle(b.cursor + width / 2.0 - OBSTACLE_SIZE / 2.0, y);
        }

        b.cursor += width;
    }

    b.finish(level, level.solo_finish_width, h - SLAB_HEIGHT)
}

/// Race level: weighted section archetypes with a checkpoint slab every
/// `checkpoint_interval` units, coins throughout and a coin arc at the finish.
pub fn generate_race_course(rng: &mut impl Rng, level: &LevelConfig) -> Course {
    let ground = level.ground_level();
    let mut b = CourseBuilder::new();

    b.platform(0.0, ground, 400.0, SLAB_HEIGHT, PlatformKind::Ground);
    b.cursor = 400.0;

    let chooser = WeightedIndex::new(level.archetype_weights).ok();
    let mut next_checkpoint = level.checkpoint_interval;

    while b.cursor < level.finish_distance {
        let before = b.cursor;

        if level.checkpoint_interval > 0.0 && b.cursor >= next_checkpoint {
            b.platform(
                b.cursor,
                ground,
                level.checkpoint_width,
                SLAB_HEIGHT,
                PlatformKind::Checkpoint,
            );
            b.cursor += level.checkpoint_width;
            while next_checkpoint <= b.cursor {
                next_checkpoint += level.checkpoint_interval;
            }
        } else {
            let section = match &chooser {
                Some(dist) => SECTIONS[dist.sample(rng)],
                None => SECTIONS[rng.random_range(0..SECTIONS.len())],
            };
            match section {
                Section::GroundRun => ground_run(&mut b, rng, level),
                Section::VoidCrossing => void_crossing(&mut b, rng, level),
                Section::Staircase => staircase(&mut b, rng, level),
                Section::TwoTier => two_tier(&mut b, rng, level),
            }

            if chance(rng, level.coin_cluster_chance) {
                let size: u32 = rng.random_range(3..=6);
                let y = ground - 150.0 - uniform(rng, 0.0, 100.0);
                for c in 0..size {
                    b.coin(b.cursor - 100.0 + c as f32 * 35.0, y);
                }
            }
        }

        // Degenerate configs (zero widths) must still terminate.
        if b.cursor <= before {
            b.cursor = before + 1.0;
        }
    }

    let mut course = b.finish(level, level.race_finish_width, ground);
    if let Some(finish_x) = course.finish().map(|p| p.rect.x) {
        for c in 0..10i32 {
            course.coins.push(Coin::new(
                finish_x + 50.0 + c as f32 * 30.0,
                ground - 100.0 - (5 - c).abs() as f32 * 20.0,
            ));
        }
    }
    tracing::debug!(
        platforms = course.platforms.len(),
        obstacles = course.obstacles.len(),
        coins = course.coins.len(),
        "generated race course"
    );
    course
}

fn ground_run(b: &mut CourseBuilder, rng: &mut impl Rng, level: &LevelConfig) {
    let ground = level.ground_level();
    let count: u32 = rng.random_range(2..=4);
    for _ in 0..count {
        let gap = uniform(rng, 80.0, 200.0);
        let width = uniform(rng, 120.0, 220.0);
        let gap_start = b.cursor;
        b.cursor += gap;
        b.platform(b.cursor, ground, width, SLAB_HEIGHT, PlatformKind::Ground);

        if gap > 100.0 {
            let coin_count = (gap / 30.0).floor() as usize;
            let spacing = gap / (coin_count + 1) as f32;
            for c in 0..coin_count {
                let y = ground - 80.0 - uniform(rng, 0.0, 40.0);
                b.coin(gap_start + (c + 1) as f32 * spacing, y);
            }
        }

        b.cursor += width;
    }
}

fn void_crossing(b: &mut CourseBuilder, rng: &mut impl Rng, level: &LevelConfig) {
    let void_width = uniform(rng, 300.0, 700.0);
    let islands: u32 = rng.random_range(2..=4);
    let gap = void_width / (islands + 1) as f32;

    for i in 0..islands {
        let width = uniform(rng, 100.0, 220.0);
        let thickness = uniform(rng, 60.0, 100.0);
        let y = if i % 2 == 0 {
            level.mid_level()
        } else {
            level.high_level()
        };

        b.cursor += gap;
        b.platform(b.cursor, y, width, thickness, PlatformKind::Floating);

        for c in 0..3 {
            let coin_y = y - 60.0 - uniform(rng, 0.0, 30.0);
            b.coin(b.cursor + (c as f32 + 0.5) * (width / 4.0), coin_y);
        }

        if chance(rng, 0.3) && width > 100.0 {
            b.obstacle(b.cursor + width / 2.0 - OBSTACLE_SIZE / 2.0, y);
        }

        b.cursor += width;
    }

    // Landing slab on the far side
    b.cursor += gap;
    b.platform(
        b.cursor,
        level.ground_level(),
        150.0,
        SLAB_HEIGHT,
        PlatformKind::Ground,
    );
    b.cursor += 150.0;
}

fn staircase(b: &mut CourseBuilder, rng: &mut impl Rng, level: &LevelConfig) {
    let ground = level.ground_level();
    let ascending = rng.random_bool(0.5);
    let steps: u32 = rng.random_range(3..=5);
    let step_width = uniform(rng, 100.0, 150.0);
    let step_gap = uniform(rng, 60.0, 120.0);

    for i in 0..steps {
        let rise = if ascending { i } else { steps - i - 1 };
        let y = ground - rise as f32 * 80.0;

        b.cursor += step_gap;
        b.platform(b.cursor, y, step_width, SLAB_HEIGHT, PlatformKind::Step);
        b.coin(b.cursor + step_width / 2.0, y - 60.0);
        b.cursor += step_width;
    }
}

fn two_tier(b: &mut CourseBuilder, rng: &mut impl Rng, level: &LevelConfig) {
    let ground = level.ground_level();
    let mid = level.mid_level();
    let base_width = uniform(rng, 200.0, 350.0);
    let gap = uniform(rng, 100.0, 200.0);

    b.cursor += gap;
    b.platform(b.cursor, ground, base_width, SLAB_HEIGHT, PlatformKind::Ground);

    let float_width = uniform(rng, 80.0, 160.0);
    let float_offset = uniform(rng, 0.0, base_width - float_width);
    b.platform(
        b.cursor + float_offset,
        mid,
        float_width,
        60.0,
        PlatformKind::Floating,
    );

    for c in 0..4 {
        b.coin(b.cursor + 50.0 + c as f32 * 40.0, mid + 100.0);
    }

    if chance(rng, 0.4) {
        b.obstacle(b.cursor + base_width - 80.0, ground);
    }

    b.cursor += base_width;
}
