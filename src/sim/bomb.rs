//! Planted explosives
//!
//! A bomb never moves after planting; it counts down a fuse, then holds a
//! blast window during which anything inside the radius is destroyed.

use glam::Vec2;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::state::{burst, Fragment, GameEvent};
use crate::sim::tank::Tank;
use crate::sim::variant::BombKind;

/// Fraction-of-fuse-elapsed thresholds at which the bomb flashes red.
const FLASH_THRESHOLDS: [f32; 10] = [
    0.25, 0.5, 0.625, 0.75, 0.8125, 0.875, 0.90625, 0.9375, 0.96875, 0.984375,
];

fn flash_at(fraction: f32) -> bool {
    FLASH_THRESHOLDS
        .iter()
        .any(|&t| fraction > t && fraction < t + 0.01)
}

/// Lifecycle of a pooled bomb slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BombState {
    /// Pooled and reusable.
    Idle,
    /// Fuse burning since the recorded tick.
    Armed { armed_at: u64 },
    /// Blast window: the radius test destroys tanks while this lasts.
    Exploding { ticks_left: u32 },
}

/// A single bomb slot in a tank's fixed-capacity pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bomb {
    pub kind: BombKind,
    pub pos: Vec2,
    pub state: BombState,
    /// Cosmetic about-to-detonate cue for the renderer.
    pub flash_red: bool,
    #[serde(skip)]
    pub fragments: Vec<Fragment>,
}

impl Bomb {
    pub fn new_idle(kind: BombKind) -> Self {
        Self {
            kind,
            pos: Vec2::ZERO,
            state: BombState::Idle,
            flash_red: false,
            fragments: Vec::new(),
        }
    }

    /// Body radius used for projectile collision, not the blast.
    pub fn radius(&self) -> f32 {
        BOMB_TRIGGER_RADIUS
    }

    pub fn blast_radius(&self) -> f32 {
        self.kind.blast_radius()
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, BombState::Idle)
    }

    pub fn is_armed(&self) -> bool {
        matches!(self.state, BombState::Armed { .. })
    }

    pub fn is_exploding(&self) -> bool {
        matches!(self.state, BombState::Exploding { .. })
    }

    pub fn place(&mut self, pos: Vec2) {
        self.pos = pos;
    }

    /// Start the fuse. No-op unless the slot is idle: an armed or exploding
    /// bomb cannot be replanted.
    pub fn arm(&mut self, now: u64) {
        if self.is_idle() {
            self.flash_red = false;
            self.state = BombState::Armed { armed_at: now };
        }
    }

    /// Detonate an armed bomb: open the blast window and spawn the burst.
    pub fn detonate(&mut self, rng: &mut Pcg32, events: &mut Vec<GameEvent>) {
        if !self.is_armed() {
            return;
        }
        let blast = self.blast_radius();
        self.fragments = burst(self.pos, BOMB_FRAGMENT_COUNT, blast, rng);
        self.state = BombState::Exploding {
            ticks_left: blast as u32,
        };
        self.flash_red = false;
        events.push(GameEvent::BombExploded);
    }

    /// Advance one tick of fuse or blast.
    pub fn update(&mut self, now: u64, rng: &mut Pcg32, events: &mut Vec<GameEvent>) {
        match self.state {
            BombState::Armed { armed_at } => {
                let elapsed = now.saturating_sub(armed_at) as u32;
                self.flash_red = flash_at(elapsed as f32 / BOMB_FUSE_TICKS as f32);
                if elapsed >= BOMB_FUSE_TICKS {
                    self.detonate(rng, events);
                }
            }
            BombState::Exploding { ticks_left } => {
                for fragment in &mut self.fragments {
                    fragment.update();
                }
                self.fragments.retain(Fragment::alive);
                if ticks_left <= 1 {
                    self.state = BombState::Idle;
                    self.fragments.clear();
                } else {
                    self.state = BombState::Exploding {
                        ticks_left: ticks_left - 1,
                    };
                }
            }
            BombState::Idle => {}
        }
    }

    /// Euclidean blast test; the sole hit rule while exploding.
    pub fn is_point_inside_blast(&self, p: Vec2) -> bool {
        self.pos.distance(p) <= self.blast_radius()
    }

    /// Blast test against a tank's corners and center.
    pub fn blast_covers_tank(&self, tank: &Tank) -> bool {
        let points = [
            tank.center(),
            Vec2::new(tank.left(), tank.top()),
            Vec2::new(tank.right(), tank.top()),
            Vec2::new(tank.left(), tank.bottom()),
            Vec2::new(tank.right(), tank.bottom()),
        ];
        points.iter().any(|&p| self.is_point_inside_blast(p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::nav::Navigator;
    use crate::sim::variant::TankKind;
    use rand::SeedableRng;

    fn armed_bomb(kind: BombKind, pos: Vec2, now: u64) -> Bomb {
        let mut bomb = Bomb::new_idle(kind);
        bomb.place(pos);
        bomb.arm(now);
        bomb
    }

    #[test]
    fn test_fuse_boundary() {
        let mut bomb = armed_bomb(BombKind::Basic, Vec2::new(100.0, 100.0), 0);
        let mut rng = Pcg32::seed_from_u64(0);
        let mut events = Vec::new();

        bomb.update(u64::from(BOMB_FUSE_TICKS) - 1, &mut rng, &mut events);
        assert!(bomb.is_armed());
        assert!(!bomb.is_exploding());

        bomb.update(u64::from(BOMB_FUSE_TICKS), &mut rng, &mut events);
        assert!(bomb.is_exploding());
        assert_eq!(events, vec![GameEvent::BombExploded]);
    }

    #[test]
    fn test_blast_window_closes() {
        let mut bomb = armed_bomb(BombKind::Basic, Vec2::ZERO, 0);
        let mut rng = Pcg32::seed_from_u64(0);
        let mut events = Vec::new();
        let mut now = u64::from(BOMB_FUSE_TICKS);
        bomb.update(now, &mut rng, &mut events);
        assert!(bomb.is_exploding());

        let window = bomb.blast_radius() as u32;
        for _ in 0..window {
            assert!(bomb.is_exploding());
            now += 1;
            bomb.update(now, &mut rng, &mut events);
        }
        assert!(bomb.is_idle());
        assert!(bomb.fragments.is_empty());
    }

    #[test]
    fn test_cannot_rearm_while_armed_or_exploding() {
        let mut bomb = armed_bomb(BombKind::Basic, Vec2::ZERO, 5);
        bomb.arm(99);
        assert_eq!(bomb.state, BombState::Armed { armed_at: 5 });

        let mut rng = Pcg32::seed_from_u64(0);
        let mut events = Vec::new();
        bomb.update(5 + u64::from(BOMB_FUSE_TICKS), &mut rng, &mut events);
        assert!(bomb.is_exploding());
        bomb.arm(100);
        assert!(bomb.is_exploding());
    }

    #[test]
    fn test_blast_radius_point_test() {
        let bomb = armed_bomb(BombKind::Super, Vec2::new(200.0, 200.0), 0);
        assert!(bomb.is_point_inside_blast(Vec2::new(200.0, 300.0)));
        assert!(!bomb.is_point_inside_blast(Vec2::new(200.0, 301.0)));
    }

    #[test]
    fn test_blast_covers_tank_by_corner() {
        let bomb = armed_bomb(BombKind::Basic, Vec2::new(100.0, 100.0), 0);
        // Tank center is out of range but the near corner is inside.
        let tank = Tank::new(
            TankKind::Player,
            Vec2::new(130.0, 130.0),
            Vec::new(),
            Vec::new(),
            Navigator::Stationary,
        );
        assert!(bomb.blast_covers_tank(&tank));

        let far = Tank::new(
            TankKind::Player,
            Vec2::new(400.0, 400.0),
            Vec::new(),
            Vec::new(),
            Navigator::Stationary,
        );
        assert!(!bomb.blast_covers_tank(&far));
    }

    #[test]
    fn test_flash_schedule_is_deterministic() {
        assert!(flash_at(0.255));
        assert!(!flash_at(0.3));
        assert!(flash_at(0.505));
        assert!(!flash_at(0.24));
    }
}
