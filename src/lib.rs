//! Tank Duel - a top-down tank battle simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, ballistics, bombs, pathfinding)
//! - `level`: Data-driven arena and tank roster descriptions
//!
//! The crate owns no rendering, input capture or audio. An external driver
//! feeds a [`sim::TickInput`] into [`sim::GameState::tick`] once per frame and
//! reads entity state back for drawing; discrete audio cues are drained via
//! [`sim::GameState::take_events`].

pub mod level;
pub mod sim;

pub use level::LevelSpec;
pub use sim::{GameEvent, GameState, Outcome, TickInput};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Simulation rate; one tick corresponds to one 60 Hz animation frame.
    pub const TICK_HZ: u32 = 60;
    /// Wall-clock milliseconds covered by one tick.
    pub const MS_PER_TICK: f32 = 1000.0 / TICK_HZ as f32;

    /// Navigation grid cell edge length in arena units.
    pub const GRID_CELL_SIZE: f32 = 30.0;

    /// Projectile defaults
    pub const AMMO_RADIUS: f32 = 4.0;
    /// Post-destruction fragment burst of a projectile (500 ms).
    pub const AMMO_EXPLOSION_TICKS: u32 = 30;
    pub const AMMO_FRAGMENT_COUNT: usize = 15;
    pub const AMMO_FRAGMENT_LIFE: f32 = 10.0;
    /// Upper bound on prediction replay length.
    pub const PREDICTION_STEP_CAP: u32 = 4096;

    /// Bomb defaults
    /// Radius within which a projectile sets off a planted bomb.
    pub const BOMB_TRIGGER_RADIUS: f32 = 15.0;
    /// Fuse length (6 s).
    pub const BOMB_FUSE_TICKS: u32 = 6 * TICK_HZ;
    pub const BOMB_FRAGMENT_COUNT: usize = 50;

    /// Tank defaults
    /// Wreck explosion duration (1 s).
    pub const TANK_EXPLOSION_TICKS: u32 = 60;
    pub const TANK_FRAGMENT_COUNT: usize = 50;
    pub const TANK_FRAGMENT_LIFE: f32 = 10.0;

    /// Navigator tuning
    /// Full A* replan cadence.
    pub const ASTAR_RECALC_TICKS: u32 = 60;
    /// Greedy walker replan cadence.
    pub const GREEDY_RECALC_TICKS: u32 = 120;
    /// Steps planned per greedy walk.
    pub const GREEDY_PLAN_STEPS: u32 = 10;
    /// Repeated blocked moves tolerated before stuck recovery kicks in.
    pub const STUCK_MOVE_THRESHOLD: u32 = 2;
}

/// Normalize an angle to `[0, 2π)`
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::TAU;
    while angle >= TAU {
        angle -= TAU;
    }
    while angle < 0.0 {
        angle += TAU;
    }
    angle
}

/// Unit vector pointing along heading `theta`
#[inline]
pub fn heading_vec(theta: f32) -> Vec2 {
    Vec2::new(theta.cos(), theta.sin())
}

/// Heading from `from` toward `to`, normalized to `[0, 2π)`
#[inline]
pub fn aim_angle(from: Vec2, to: Vec2) -> f32 {
    normalize_angle((to.y - from.y).atan2(to.x - from.x))
}
