//! The core tank actor
//!
//! Movement resolves against obstacles one axis at a time, so a diagonal move
//! blocked on one axis still slides along the other. Firing and planting
//! reuse fixed pool slots; running out of idle slots is the rate limit.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::ammo::Ammunition;
use crate::sim::bomb::Bomb;
use crate::sim::nav::Navigator;
use crate::sim::obstacle::Obstacle;
use crate::sim::state::{burst, Fragment, GameEvent};
use crate::sim::variant::TankKind;
use crate::{aim_angle, heading_vec, normalize_angle};

/// One of the eight movement directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    North,
    South,
    East,
    West,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
}

impl Direction {
    pub const CARDINALS: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    pub fn random_cardinal(rng: &mut Pcg32) -> Direction {
        Self::CARDINALS[rng.random_range(0..Self::CARDINALS.len())]
    }

    /// Unit steps on each axis, y growing downward.
    pub fn steps(self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::South => (0, 1),
            Direction::East => (1, 0),
            Direction::West => (-1, 0),
            Direction::NorthEast => (1, -1),
            Direction::NorthWest => (-1, -1),
            Direction::SouthEast => (1, 1),
            Direction::SouthWest => (-1, 1),
        }
    }

    /// Direction matching a pair of unit steps, if any.
    pub fn from_steps(dx: i32, dy: i32) -> Option<Direction> {
        match (dx, dy) {
            (1, 0) => Some(Direction::East),
            (-1, 0) => Some(Direction::West),
            (0, 1) => Some(Direction::South),
            (0, -1) => Some(Direction::North),
            (1, 1) => Some(Direction::SouthEast),
            (1, -1) => Some(Direction::NorthEast),
            (-1, 1) => Some(Direction::SouthWest),
            (-1, -1) => Some(Direction::NorthWest),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tank {
    pub kind: TankKind,
    /// Top-left corner of the bounding box.
    pub pos: Vec2,
    pub size: f32,
    pub speed: f32,
    /// Barrel heading in `[0, 2π)`.
    pub aim_angle: f32,
    pub is_destroyed: bool,
    /// Remaining wreck explosion ticks; zero once fully inert.
    pub explosion_ticks_left: u32,
    pub ammo: Vec<Ammunition>,
    pub bombs: Vec<Bomb>,
    pub navigator: Navigator,
    pub last_direction_moved: Option<Direction>,
    /// Whether the last move attempt was stopped by geometry.
    pub last_move_blocked: bool,
    /// How many times in a row the same direction was requested.
    pub consecutive_direction_moves: u32,
    pub fire_cooldown_left: u32,
    pub plant_cooldown_left: u32,
    /// Signed tick budget for the random aim sweep; sign is the turn
    /// direction.
    sweep_budget: i32,
    #[serde(skip)]
    pub fragments: Vec<Fragment>,
}

impl Tank {
    pub fn new(
        kind: TankKind,
        pos: Vec2,
        ammo: Vec<Ammunition>,
        bombs: Vec<Bomb>,
        navigator: Navigator,
    ) -> Self {
        let spec = kind.spec();
        Self {
            kind,
            pos,
            size: spec.size,
            speed: spec.speed,
            aim_angle: 0.0,
            is_destroyed: false,
            explosion_ticks_left: 0,
            ammo,
            bombs,
            navigator,
            last_direction_moved: None,
            last_move_blocked: false,
            consecutive_direction_moves: 0,
            fire_cooldown_left: spec.initial_fire_cooldown,
            plant_cooldown_left: 0,
            sweep_budget: 0,
            fragments: Vec::new(),
        }
    }

    pub fn left(&self) -> f32 {
        self.pos.x
    }

    pub fn right(&self) -> f32 {
        self.pos.x + self.size
    }

    pub fn top(&self) -> f32 {
        self.pos.y
    }

    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size
    }

    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::splat(self.size / 2.0)
    }

    /// Tip of the gun barrel; the muzzle position for new shots.
    pub fn barrel_end(&self) -> Vec2 {
        self.center() + heading_vec(self.aim_angle) * self.size
    }

    /// Strict AABB containment, matching the projectile hit rule.
    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x > self.left() && p.x < self.right() && p.y > self.top() && p.y < self.bottom()
    }

    pub fn is_exploding(&self) -> bool {
        self.explosion_ticks_left > 0
    }

    /// Attempt to advance one tick's worth of distance in `dir`. Each axis is
    /// resolved separately: a blocking obstacle snaps the tank to its near
    /// edge on that axis while the other axis stays free to slide. The whole
    /// move counts as blocked only when every requested axis was stopped.
    pub fn move_in_direction(&mut self, dir: Direction, obstacles: &[Obstacle], bounds: Vec2) {
        if self.is_destroyed {
            return;
        }
        if self.last_direction_moved == Some(dir) {
            self.consecutive_direction_moves += 1;
        } else {
            self.consecutive_direction_moves = 0;
        }
        self.last_direction_moved = Some(dir);

        let (sx, sy) = dir.steps();
        let mut blocked_x = false;
        let mut blocked_y = false;

        if sy != 0 {
            blocked_y = self.step_axis_y(sy as f32 * self.speed, obstacles);
            if !blocked_y {
                self.pos.y =
                    (self.pos.y + sy as f32 * self.speed).clamp(0.0, bounds.y - self.size);
            }
        }
        if sx != 0 {
            blocked_x = self.step_axis_x(sx as f32 * self.speed, obstacles);
            if !blocked_x {
                self.pos.x =
                    (self.pos.x + sx as f32 * self.speed).clamp(0.0, bounds.x - self.size);
            }
        }

        self.last_move_blocked = match (sx != 0, sy != 0) {
            (true, true) => blocked_x && blocked_y,
            (true, false) => blocked_x,
            (false, true) => blocked_y,
            (false, false) => false,
        };
    }

    /// Vertical sweep against obstacles. On a hit, snaps to the obstacle's
    /// near edge and reports the axis blocked.
    fn step_axis_y(&mut self, dy: f32, obstacles: &[Obstacle]) -> bool {
        if dy < 0.0 {
            for obs in obstacles {
                if self.pos.y + dy < obs.bottom
                    && self.pos.y > obs.top
                    && obs.left < self.right()
                    && self.pos.x < obs.right
                {
                    self.pos.y = obs.bottom;
                    return true;
                }
            }
        } else {
            for obs in obstacles {
                if self.pos.y + dy + self.size > obs.top
                    && self.pos.y < obs.bottom
                    && obs.left < self.right()
                    && self.pos.x < obs.right
                {
                    self.pos.y = obs.top - self.size;
                    return true;
                }
            }
        }
        false
    }

    fn step_axis_x(&mut self, dx: f32, obstacles: &[Obstacle]) -> bool {
        if dx < 0.0 {
            for obs in obstacles {
                if self.pos.x + dx < obs.right
                    && self.pos.x > obs.left
                    && obs.top < self.bottom()
                    && self.pos.y < obs.bottom
                {
                    self.pos.x = obs.right;
                    return true;
                }
            }
        } else {
            for obs in obstacles {
                if self.pos.x + dx + self.size > obs.left
                    && self.pos.x < obs.right
                    && obs.top < self.bottom()
                    && self.pos.y < obs.bottom
                {
                    self.pos.x = obs.left - self.size;
                    return true;
                }
            }
        }
        false
    }

    /// Point the barrel at an arena position.
    pub fn aim_at(&mut self, target: Vec2) {
        if self.is_destroyed {
            return;
        }
        self.aim_angle = aim_angle(self.center(), target);
    }

    /// Random aim sweep: turn 0.01 rad per tick until the drawn budget is
    /// spent, then draw a fresh signed budget.
    pub fn sweep_aim(&mut self, rng: &mut Pcg32) {
        if self.is_destroyed {
            return;
        }
        if self.sweep_budget > 0 {
            self.aim_angle = normalize_angle(self.aim_angle + 0.01);
            self.sweep_budget -= 1;
        } else if self.sweep_budget < 0 {
            self.aim_angle = normalize_angle(self.aim_angle - 0.01);
            self.sweep_budget += 1;
        } else {
            self.sweep_budget = rng.random_range(-360..=360);
        }
    }

    /// Fire from the first idle pool slot. Predictive variants simulate the
    /// flight first and keep the slot idle when the shot would miss. With a
    /// fully in-flight pool this is a silent no-op.
    pub fn try_fire(
        &mut self,
        obstacles: &[Obstacle],
        arena: Vec2,
        target: Option<&Tank>,
        events: &mut Vec<GameEvent>,
    ) {
        if self.is_destroyed || self.fire_cooldown_left > 0 {
            return;
        }
        let Some(slot) = self.ammo.iter().position(Ammunition::is_available) else {
            return;
        };
        let muzzle = self.barrel_end();
        let theta = self.aim_angle;
        self.ammo[slot].reload(muzzle, theta);
        if self.kind.spec().predictive_fire {
            if let Some(target) = target {
                if !self.ammo[slot].will_hit(obstacles, arena, target) {
                    return;
                }
            }
        }
        self.ammo[slot].activate();
        self.fire_cooldown_left = self.kind.spec().fire_cooldown;
        events.push(GameEvent::TankFired);
    }

    /// Plant a bomb at the tank center from the first idle slot. When a
    /// target is given (AI tanks), the fuse is only armed if the blast would
    /// already cover the target's center; bombs do not move after planting.
    pub fn try_plant(&mut self, target: Option<&Tank>, now: u64) {
        if self.is_destroyed || self.plant_cooldown_left > 0 {
            return;
        }
        let Some(slot) = self.bombs.iter().position(Bomb::is_idle) else {
            return;
        };
        let center = self.center();
        self.bombs[slot].place(center);
        if let Some(target) = target {
            if !self.bombs[slot].is_point_inside_blast(target.center()) {
                return;
            }
        }
        self.bombs[slot].arm(now);
        self.plant_cooldown_left = self.kind.spec().plant_cooldown;
    }

    /// Transition to the terminal wreck state. At most one transition ever
    /// happens; repeat hits in the same tick are absorbed here.
    pub fn destroy(&mut self, rng: &mut Pcg32, events: &mut Vec<GameEvent>) {
        if self.is_destroyed {
            return;
        }
        self.is_destroyed = true;
        self.explosion_ticks_left = TANK_EXPLOSION_TICKS;
        self.fragments = burst(self.center(), TANK_FRAGMENT_COUNT, TANK_FRAGMENT_LIFE, rng);
        events.push(GameEvent::TankDestroyed);
    }

    /// Advance the wreck explosion, if one is playing.
    pub fn update_wreck(&mut self) {
        if self.explosion_ticks_left == 0 {
            return;
        }
        for fragment in &mut self.fragments {
            fragment.update();
        }
        self.fragments.retain(Fragment::alive);
        self.explosion_ticks_left -= 1;
        if self.explosion_ticks_left == 0 {
            self.fragments.clear();
        }
    }
}
