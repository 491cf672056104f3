//! Game state and shared simulation types
//!
//! Everything that must survive a save/replay round-trip lives here and is
//! serializable; fragment bursts are render-only and skipped.

use glam::Vec2;
use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::heading_vec;
use crate::level::LevelSpec;
use crate::sim::ammo::Ammunition;
use crate::sim::bomb::Bomb;
use crate::sim::nav::{NavigationGrid, Navigator};
use crate::sim::obstacle::Obstacle;
use crate::sim::tank::Tank;
use crate::sim::variant::{AmmoKind, BombKind, TankKind};

/// Terminal result of a level. `Playing` until one side is wiped out; a
/// terminal value freezes further ticks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    #[default]
    Playing,
    PlayerWin,
    EnemyWin,
}

/// Discrete cue raised during a tick, drained by the audio layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    TankFired,
    TankDestroyed,
    AmmoExploded,
    BombExploded,
}

/// Input intents for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    /// Fire the player's gun this tick.
    pub fire: bool,
    /// Plant a bomb at the player's position this tick.
    pub plant_bomb: bool,
    /// Pointer position the player is aiming at.
    pub aim: Vec2,
}

/// A particle of an explosion burst. Purely visual.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fragment {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Color-scale position in `[0, 1]`, mapped by the renderer.
    pub shade: f32,
    pub life: f32,
    life_max: f32,
}

impl Fragment {
    pub fn update(&mut self) {
        self.pos += self.vel;
        self.life -= 1.0;
    }

    pub fn alive(&self) -> bool {
        self.life > 0.0
    }

    /// Remaining-life factor for shrinking the drawn radius.
    pub fn scale(&self) -> f32 {
        (self.life / self.life_max).max(0.0)
    }
}

/// Scatter `count` fragments from `center` with random headings.
pub fn burst(center: Vec2, count: usize, life: f32, rng: &mut Pcg32) -> Vec<Fragment> {
    (0..count)
        .map(|_| {
            let angle = rng.random_range(0.0..std::f32::consts::TAU);
            let speed = rng.random_range(2.0..7.0);
            Fragment {
                pos: center,
                vel: heading_vec(angle) * speed,
                radius: rng.random_range(1.0..3.0),
                shade: rng.random::<f32>(),
                life,
                life_max: life,
            }
        })
        .collect()
}

/// Complete simulation state for one level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub width: f32,
    pub height: f32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub outcome: Outcome,
    pub obstacles: Vec<Obstacle>,
    pub player: Tank,
    pub enemies: Vec<Tank>,
    /// Walkability grid shared by every pathing navigator.
    pub grid: NavigationGrid,
    pub rng: Pcg32,
    pub(crate) events: Vec<GameEvent>,
}

impl GameState {
    /// Build the full entity roster for a level.
    pub fn new(level: &LevelSpec, seed: u64) -> Self {
        let obstacles: Vec<Obstacle> = level
            .obstacles
            .iter()
            .map(|o| Obstacle::new(o.x, o.y, o.width, o.height))
            .collect();
        let grid = NavigationGrid::new(level.width, level.height, &obstacles);
        let arena_center = Vec2::new(level.width / 2.0, level.height / 2.0);

        let ammo = (0..level.player.ammo)
            .map(|_| Ammunition::new_idle(AmmoKind::Player))
            .collect();
        let bombs = (0..level.player.bombs)
            .map(|_| Bomb::new_idle(BombKind::Player))
            .collect();
        let mut player = Tank::new(
            TankKind::Player,
            Vec2::new(level.player.x, level.player.y),
            ammo,
            bombs,
            Navigator::Stationary,
        );
        player.aim_at(arena_center);

        let enemies = level
            .enemies
            .iter()
            .map(|e| {
                let spec = e.kind.spec();
                let navigator = Navigator::from_kind(
                    e.navigator.unwrap_or(spec.navigator),
                    e.aggression.unwrap_or(spec.aggression),
                );
                let ammo = (0..e.ammo).map(|_| Ammunition::new_idle(e.ammo_kind)).collect();
                let bombs = match e.bomb_kind {
                    Some(kind) => (0..e.bombs).map(|_| Bomb::new_idle(kind)).collect(),
                    None => Vec::new(),
                };
                let mut tank = Tank::new(e.kind, Vec2::new(e.x, e.y), ammo, bombs, navigator);
                tank.aim_at(arena_center);
                tank
            })
            .collect();

        Self {
            seed,
            width: level.width,
            height: level.height,
            time_ticks: 0,
            outcome: Outcome::Playing,
            obstacles,
            player,
            enemies,
            grid,
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
        }
    }

    /// Arena dimensions as a vector.
    pub fn arena(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Advance the simulation by one tick.
    pub fn tick(&mut self, input: &TickInput) {
        crate::sim::tick::tick(self, input);
    }

    /// Drain the cues raised since the last call.
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::LevelSpec;

    #[test]
    fn test_burst_spawns_requested_count() {
        let mut rng = Pcg32::seed_from_u64(7);
        let fragments = burst(Vec2::new(10.0, 10.0), 15, 10.0, &mut rng);
        assert_eq!(fragments.len(), 15);
        assert!(fragments.iter().all(Fragment::alive));
    }

    #[test]
    fn test_fragment_dies_after_life_ticks() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut fragment = burst(Vec2::ZERO, 1, 3.0, &mut rng)[0];
        for _ in 0..3 {
            fragment.update();
        }
        assert!(!fragment.alive());
        assert_eq!(fragment.scale(), 0.0);
    }

    #[test]
    fn test_new_game_builds_roster() {
        let state = GameState::new(&LevelSpec::five(), 42);
        assert_eq!(state.enemies.len(), 3);
        assert_eq!(state.player.ammo.len(), 5);
        assert_eq!(state.outcome, Outcome::Playing);
        assert!(!state.obstacles.is_empty());
    }

    #[test]
    fn test_take_events_drains() {
        let mut state = GameState::new(&LevelSpec::one(), 1);
        state.events.push(GameEvent::TankFired);
        assert_eq!(state.take_events(), vec![GameEvent::TankFired]);
        assert!(state.take_events().is_empty());
    }
}
