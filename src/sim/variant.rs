//! Closed variant tables for tanks, ammunition and bombs.
//!
//! Behavior differences between variants are data: a kind enum plus a
//! constant table looked up at runtime, never a type hierarchy.

use serde::{Deserialize, Serialize};

/// Projectile flavor. Determines speed and how many bounces a shot survives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AmmoKind {
    Player,
    Basic,
    Super,
}

impl AmmoKind {
    pub fn speed(self) -> f32 {
        match self {
            AmmoKind::Player | AmmoKind::Basic => 4.0,
            AmmoKind::Super => 6.0,
        }
    }

    pub fn max_bounces(self) -> u32 {
        match self {
            AmmoKind::Player | AmmoKind::Basic => 1,
            AmmoKind::Super => 2,
        }
    }
}

/// Bomb flavor. Determines blast radius (and, through it, how long the
/// explosion window stays active).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BombKind {
    Player,
    Basic,
    Super,
    Love,
}

impl BombKind {
    pub fn blast_radius(self) -> f32 {
        match self {
            BombKind::Player | BombKind::Basic => 50.0,
            BombKind::Super => 100.0,
            BombKind::Love => 80.0,
        }
    }
}

/// How a tank picks its aim angle each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AimMode {
    /// Follow the pointer position from the tick input (player).
    Pointer,
    /// Track the opposing tank's center.
    AtTarget,
    /// Sweep the barrel back and forth by a randomly drawn amount.
    RandomSweep,
}

/// Which movement strategy drives a tank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NavigatorKind {
    Stationary,
    SimpleGreedy,
    AStar,
}

/// Tank flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TankKind {
    Player,
    Stationary,
    StationaryRandomAim,
    SimpleMoving,
    Bomber,
    SuperBomber,
}

/// Per-kind constants. `fire_cooldown` / `plant_cooldown` are in ticks; zero
/// means the action is limited only by pool availability.
#[derive(Debug, Clone)]
pub struct TankSpec {
    pub speed: f32,
    pub size: f32,
    pub color: &'static str,
    pub aim: AimMode,
    pub navigator: NavigatorKind,
    pub aggression: i32,
    /// Simulate the shot first and only fire when it would connect.
    pub predictive_fire: bool,
    pub fire_cooldown: u32,
    /// Lockout applied once at spawn before the first shot.
    pub initial_fire_cooldown: u32,
    pub plant_cooldown: u32,
}

static PLAYER: TankSpec = TankSpec {
    speed: 2.0,
    size: 30.0,
    color: "#6384a1",
    aim: AimMode::Pointer,
    navigator: NavigatorKind::Stationary,
    aggression: 0,
    predictive_fire: false,
    fire_cooldown: 0,
    initial_fire_cooldown: 0,
    plant_cooldown: 0,
};

static STATIONARY: TankSpec = TankSpec {
    speed: 0.0,
    size: 30.0,
    color: "#5784ba",
    aim: AimMode::AtTarget,
    navigator: NavigatorKind::Stationary,
    aggression: 0,
    predictive_fire: false,
    fire_cooldown: 300,
    initial_fire_cooldown: 0,
    plant_cooldown: 0,
};

static STATIONARY_RANDOM_AIM: TankSpec = TankSpec {
    speed: 0.0,
    size: 30.0,
    color: "#ebe1b9",
    aim: AimMode::RandomSweep,
    navigator: NavigatorKind::Stationary,
    aggression: 0,
    predictive_fire: true,
    fire_cooldown: 0,
    initial_fire_cooldown: 0,
    plant_cooldown: 0,
};

static SIMPLE_MOVING: TankSpec = TankSpec {
    speed: 1.2,
    size: 30.0,
    color: "#fd8a8a",
    aim: AimMode::AtTarget,
    navigator: NavigatorKind::AStar,
    aggression: 15,
    predictive_fire: true,
    fire_cooldown: 0,
    initial_fire_cooldown: 0,
    plant_cooldown: 0,
};

static BOMBER: TankSpec = TankSpec {
    speed: 2.0,
    size: 30.0,
    color: "#f7e463",
    aim: AimMode::AtTarget,
    navigator: NavigatorKind::AStar,
    aggression: 4,
    predictive_fire: true,
    fire_cooldown: 1200,
    initial_fire_cooldown: 0,
    plant_cooldown: 60,
};

static SUPER_BOMBER: TankSpec = TankSpec {
    speed: 2.2,
    size: 30.0,
    color: "#ffc2d1",
    aim: AimMode::AtTarget,
    navigator: NavigatorKind::AStar,
    aggression: 5,
    predictive_fire: true,
    fire_cooldown: 60,
    initial_fire_cooldown: 60,
    plant_cooldown: 60,
};

impl TankKind {
    pub fn spec(self) -> &'static TankSpec {
        match self {
            TankKind::Player => &PLAYER,
            TankKind::Stationary => &STATIONARY,
            TankKind::StationaryRandomAim => &STATIONARY_RANDOM_AIM,
            TankKind::SimpleMoving => &SIMPLE_MOVING,
            TankKind::Bomber => &BOMBER,
            TankKind::SuperBomber => &SUPER_BOMBER,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turrets_do_not_move() {
        assert_eq!(TankKind::Stationary.spec().speed, 0.0);
        assert_eq!(TankKind::StationaryRandomAim.spec().speed, 0.0);
        assert_eq!(
            TankKind::Stationary.spec().navigator,
            NavigatorKind::Stationary
        );
    }

    #[test]
    fn test_super_ammo_outranges_basic() {
        assert!(AmmoKind::Super.speed() > AmmoKind::Basic.speed());
        assert!(AmmoKind::Super.max_bounces() > AmmoKind::Basic.max_bounces());
    }
}
