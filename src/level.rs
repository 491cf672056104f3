//! Data-driven arena and tank roster descriptions
//!
//! A [`LevelSpec`] is everything the simulation needs to build a
//! [`GameState`](crate::sim::GameState): arena dimensions, obstacles and the
//! tank roster with pool sizes and navigator choices. Specs are plain serde
//! data so they can live in JSON next to the binary that drives the sim.

use serde::{Deserialize, Serialize};

use crate::sim::variant::{AmmoKind, BombKind, NavigatorKind, TankKind};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObstacleSpec {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerSpec {
    pub x: f32,
    pub y: f32,
    #[serde(default = "default_player_ammo")]
    pub ammo: usize,
    #[serde(default = "default_player_bombs")]
    pub bombs: usize,
}

fn default_player_ammo() -> usize {
    5
}

fn default_player_bombs() -> usize {
    2
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnemySpec {
    pub kind: TankKind,
    pub x: f32,
    pub y: f32,
    pub ammo_kind: AmmoKind,
    pub ammo: usize,
    #[serde(default)]
    pub bomb_kind: Option<BombKind>,
    #[serde(default)]
    pub bombs: usize,
    /// Override the kind's default movement strategy.
    #[serde(default)]
    pub navigator: Option<NavigatorKind>,
    /// Override the kind's default aggression factor.
    #[serde(default)]
    pub aggression: Option<i32>,
}

impl EnemySpec {
    fn new(kind: TankKind, x: f32, y: f32, ammo_kind: AmmoKind, ammo: usize) -> Self {
        Self {
            kind,
            x,
            y,
            ammo_kind,
            ammo,
            bomb_kind: None,
            bombs: 0,
            navigator: None,
            aggression: None,
        }
    }

    fn with_bombs(mut self, kind: BombKind, count: usize) -> Self {
        self.bomb_kind = Some(kind);
        self.bombs = count;
        self
    }
}

/// Complete description of one playable level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelSpec {
    pub width: f32,
    pub height: f32,
    pub obstacles: Vec<ObstacleSpec>,
    pub player: PlayerSpec,
    pub enemies: Vec<EnemySpec>,
}

const ARENA_WIDTH: f32 = 1000.0;
const ARENA_HEIGHT: f32 = 500.0;

fn obstacle(x: f32, y: f32, width: f32, height: f32) -> ObstacleSpec {
    ObstacleSpec {
        x,
        y,
        width,
        height,
    }
}

fn player(x: f32, y: f32) -> PlayerSpec {
    PlayerSpec {
        x,
        y,
        ammo: default_player_ammo(),
        bombs: default_player_bombs(),
    }
}

fn stationary(x: f32, y: f32) -> EnemySpec {
    EnemySpec::new(TankKind::Stationary, x, y, AmmoKind::Basic, 1)
}

impl LevelSpec {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    fn arena(obstacles: Vec<ObstacleSpec>, player: PlayerSpec, enemies: Vec<EnemySpec>) -> Self {
        Self {
            width: ARENA_WIDTH,
            height: ARENA_HEIGHT,
            obstacles,
            player,
            enemies,
        }
    }

    /// One turret behind a single pillar.
    pub fn one() -> Self {
        Self::arena(
            vec![obstacle(300.0, 200.0, 40.0, 100.0)],
            player(100.0, 250.0),
            vec![stationary(900.0, 240.0)],
        )
    }

    /// Three turrets.
    pub fn two() -> Self {
        Self::arena(
            vec![obstacle(300.0, 200.0, 40.0, 100.0)],
            player(100.0, 250.0),
            vec![
                stationary(800.0, 100.0),
                stationary(900.0, 240.0),
                stationary(800.0, 400.0),
            ],
        )
    }

    /// A sweeping turret with bank-shot ammunition.
    pub fn three() -> Self {
        Self::arena(
            vec![
                obstacle(100.0, 100.0, 200.0, 100.0),
                obstacle(550.0, 200.0, 30.0, 200.0),
            ],
            player(200.0, 250.0),
            vec![EnemySpec::new(
                TankKind::StationaryRandomAim,
                800.0,
                300.0,
                AmmoKind::Super,
                1,
            )],
        )
    }

    /// First pathing hunter.
    pub fn four() -> Self {
        Self::arena(
            vec![
                obstacle(250.0, 100.0, 600.0, 40.0),
                obstacle(100.0, 350.0, 600.0, 40.0),
            ],
            player(50.0, 450.0),
            vec![EnemySpec::new(
                TankKind::SimpleMoving,
                900.0,
                50.0,
                AmmoKind::Basic,
                1,
            )],
        )
    }

    /// Mixed roster: hunter, sweeper and turret.
    pub fn five() -> Self {
        Self::arena(
            vec![
                obstacle(100.0, 100.0, 200.0, 100.0),
                obstacle(700.0, 100.0, 30.0, 100.0),
                obstacle(700.0, 350.0, 30.0, 100.0),
            ],
            player(200.0, 250.0),
            vec![
                EnemySpec::new(TankKind::SimpleMoving, 800.0, 300.0, AmmoKind::Basic, 1),
                EnemySpec::new(
                    TankKind::StationaryRandomAim,
                    800.0,
                    100.0,
                    AmmoKind::Super,
                    1,
                ),
                stationary(800.0, 200.0),
            ],
        )
    }

    /// Bomber pack.
    pub fn six() -> Self {
        let bomber = |y: f32| {
            EnemySpec::new(TankKind::Bomber, 800.0, y, AmmoKind::Basic, 1)
                .with_bombs(BombKind::Basic, 3)
        };
        Self::arena(
            vec![
                obstacle(100.0, 100.0, 200.0, 100.0),
                obstacle(700.0, 100.0, 30.0, 300.0),
            ],
            player(200.0, 250.0),
            vec![bomber(100.0), bomber(200.0), bomber(300.0)],
        )
    }

    /// Fast bombers with bank-shot ammunition.
    pub fn seven() -> Self {
        let bomber = |y: f32| {
            EnemySpec::new(TankKind::SuperBomber, 800.0, y, AmmoKind::Super, 3)
                .with_bombs(BombKind::Love, 2)
        };
        Self::arena(
            vec![obstacle(700.0, 100.0, 30.0, 300.0)],
            player(200.0, 250.0),
            vec![bomber(100.0), bomber(200.0), bomber(300.0)],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_round_trip() {
        let level = LevelSpec::six();
        let json = level.to_json().unwrap();
        let back = LevelSpec::from_json(&json).unwrap();
        assert_eq!(level, back);
    }

    #[test]
    fn test_optional_fields_default() {
        let json = r#"{
            "width": 600.0,
            "height": 400.0,
            "obstacles": [],
            "player": { "x": 50.0, "y": 50.0 },
            "enemies": [
                { "kind": "Stationary", "x": 500.0, "y": 300.0,
                  "ammo_kind": "Basic", "ammo": 1 }
            ]
        }"#;
        let level = LevelSpec::from_json(json).unwrap();
        assert_eq!(level.player.ammo, 5);
        assert_eq!(level.player.bombs, 2);
        assert_eq!(level.enemies[0].bombs, 0);
        assert!(level.enemies[0].navigator.is_none());
    }

    #[test]
    fn test_preset_rosters() {
        assert_eq!(LevelSpec::one().enemies.len(), 1);
        assert_eq!(LevelSpec::two().enemies.len(), 3);
        assert_eq!(LevelSpec::seven().enemies.len(), 3);
        assert!(LevelSpec::seven()
            .enemies
            .iter()
            .all(|e| e.kind == TankKind::SuperBomber && e.bombs == 2));
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(LevelSpec::from_json("{ not json").is_err());
    }
}
