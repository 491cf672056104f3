//! Projectile ballistics
//!
//! One stepping function drives both live flight and shot prediction, so the
//! two can never disagree about where a shot ends up.

use glam::Vec2;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::heading_vec;
use crate::sim::obstacle::Obstacle;
use crate::sim::state::{burst, Fragment, GameEvent};
use crate::sim::tank::Tank;
use crate::sim::variant::AmmoKind;

/// Kinematic state advanced by [`step_kinematics`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kinematics {
    pub pos: Vec2,
    pub vel: Vec2,
    pub bounces: u32,
}

/// Advance one tick: integrate position, reflect off arena edges, then
/// reflect off any obstacle the position landed in by snapping just outside
/// the nearest face and negating the matching velocity component.
pub fn step_kinematics(k: &mut Kinematics, obstacles: &[Obstacle], arena: Vec2) {
    k.pos += k.vel;

    if k.pos.x <= 0.0 || k.pos.x > arena.x {
        k.vel.x = -k.vel.x;
        k.bounces += 1;
    }
    if k.pos.y <= 0.0 || k.pos.y > arena.y {
        k.vel.y = -k.vel.y;
        k.bounces += 1;
    }

    for obs in obstacles {
        if !obs.contains_point(k.pos) {
            continue;
        }
        k.bounces += 1;
        let from_left = k.pos.x - obs.left;
        let from_right = obs.right - k.pos.x;
        let from_top = k.pos.y - obs.top;
        let from_bottom = obs.bottom - k.pos.y;
        let nearest = from_left.min(from_right).min(from_top).min(from_bottom);

        if nearest == from_top {
            k.pos.y = obs.top - 1.0;
            k.vel.y = -k.vel.y;
        } else if nearest == from_bottom {
            k.pos.y = obs.bottom + 1.0;
            k.vel.y = -k.vel.y;
        } else if nearest == from_left {
            k.pos.x = obs.left - 1.0;
            k.vel.x = -k.vel.x;
        } else {
            k.pos.x = obs.right + 1.0;
            k.vel.x = -k.vel.x;
        }
    }
}

/// Lifecycle of a pooled projectile slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AmmoState {
    /// Pooled and reusable.
    Idle,
    /// Live in the arena.
    Flying,
    /// Fragment burst playing out; no longer moves or collides.
    Exploding { ticks_left: u32 },
}

/// A single projectile slot in a tank's fixed-capacity pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ammunition {
    pub kind: AmmoKind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub theta: f32,
    pub bounces: u32,
    pub state: AmmoState,
    #[serde(skip)]
    pub fragments: Vec<Fragment>,
}

impl Ammunition {
    pub fn new_idle(kind: AmmoKind) -> Self {
        Self {
            kind,
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            theta: 0.0,
            bounces: 0,
            state: AmmoState::Idle,
            fragments: Vec::new(),
        }
    }

    pub fn radius(&self) -> f32 {
        AMMO_RADIUS
    }

    /// Slot can be reloaded by a fire action.
    pub fn is_available(&self) -> bool {
        matches!(self.state, AmmoState::Idle)
    }

    pub fn is_live(&self) -> bool {
        matches!(self.state, AmmoState::Flying)
    }

    pub fn is_exploding(&self) -> bool {
        matches!(self.state, AmmoState::Exploding { .. })
    }

    /// Re-point the slot at a muzzle position and heading. The slot stays
    /// idle until [`activate`](Self::activate); predictive shooters reload
    /// first, simulate, and only commit the shot when it would connect.
    pub fn reload(&mut self, pos: Vec2, theta: f32) {
        self.pos = pos;
        self.theta = theta;
        self.vel = heading_vec(theta) * self.kind.speed();
        self.bounces = 0;
        self.state = AmmoState::Idle;
    }

    pub fn activate(&mut self) {
        self.state = AmmoState::Flying;
    }

    /// Destroy a live projectile: start the fragment burst sub-state.
    pub fn explode(&mut self, rng: &mut Pcg32, events: &mut Vec<GameEvent>) {
        if !self.is_live() {
            return;
        }
        self.fragments = burst(self.pos, AMMO_FRAGMENT_COUNT, AMMO_FRAGMENT_LIFE, rng);
        self.state = AmmoState::Exploding {
            ticks_left: AMMO_EXPLOSION_TICKS,
        };
        events.push(GameEvent::AmmoExploded);
    }

    /// Advance one tick of flight or explosion.
    pub fn update(&mut self, obstacles: &[Obstacle], arena: Vec2, rng: &mut Pcg32, events: &mut Vec<GameEvent>) {
        match self.state {
            AmmoState::Flying => {
                let mut k = Kinematics {
                    pos: self.pos,
                    vel: self.vel,
                    bounces: self.bounces,
                };
                step_kinematics(&mut k, obstacles, arena);
                self.pos = k.pos;
                self.vel = k.vel;
                self.bounces = k.bounces;
                if self.bounces > self.kind.max_bounces() {
                    self.explode(rng, events);
                }
            }
            AmmoState::Exploding { ticks_left } => {
                for fragment in &mut self.fragments {
                    fragment.update();
                }
                self.fragments.retain(Fragment::alive);
                if ticks_left <= 1 {
                    self.state = AmmoState::Idle;
                    self.fragments.clear();
                } else {
                    self.state = AmmoState::Exploding {
                        ticks_left: ticks_left - 1,
                    };
                }
            }
            AmmoState::Idle => {}
        }
    }

    /// Replay the flight on a copy of the kinematic state and report whether
    /// it would land inside `target` before the bounce budget runs out. The
    /// check order matches [`update`] exactly: a step that both exhausts the
    /// budget and lands in the target is a destroyed shot, not a hit.
    pub fn will_hit(&self, obstacles: &[Obstacle], arena: Vec2, target: &Tank) -> bool {
        let mut k = Kinematics {
            pos: self.pos,
            vel: self.vel,
            bounces: 0,
        };
        let max_bounces = self.kind.max_bounces();
        for _ in 0..PREDICTION_STEP_CAP {
            step_kinematics(&mut k, obstacles, arena);
            if k.bounces > max_bounces {
                return false;
            }
            if target.contains_point(k.pos) {
                return true;
            }
        }
        false
    }

    /// Circle test against another circular entity.
    pub fn overlaps_circle(&self, center: Vec2, radius: f32) -> bool {
        self.pos.distance(center) < self.radius() + radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::nav::Navigator;
    use crate::sim::variant::TankKind;
    use proptest::prelude::*;
    use rand::SeedableRng;

    fn arena() -> Vec2 {
        Vec2::new(1000.0, 500.0)
    }

    fn target_at(x: f32, y: f32) -> Tank {
        Tank::new(
            TankKind::Player,
            Vec2::new(x, y),
            Vec::new(),
            Vec::new(),
            Navigator::Stationary,
        )
    }

    fn flying(kind: AmmoKind, pos: Vec2, theta: f32) -> Ammunition {
        let mut ammo = Ammunition::new_idle(kind);
        ammo.reload(pos, theta);
        ammo.activate();
        ammo
    }

    #[test]
    fn test_wall_bounce_negates_velocity() {
        // Canvas width 10: from (5,5) at speed 2 east, the third step crosses
        // the edge and reflects.
        let arena = Vec2::new(10.0, 10.0);
        let mut k = Kinematics {
            pos: Vec2::new(5.0, 5.0),
            vel: Vec2::new(2.0, 0.0),
            bounces: 0,
        };
        step_kinematics(&mut k, &[], arena);
        step_kinematics(&mut k, &[], arena);
        assert_eq!(k.bounces, 0);
        step_kinematics(&mut k, &[], arena);
        assert_eq!(k.bounces, 1);
        assert_eq!(k.vel.x, -2.0);
        assert!(k.pos.x > 10.0);
    }

    #[test]
    fn test_obstacle_reflection_snaps_outside() {
        let obs = Obstacle::new(100.0, 0.0, 40.0, 200.0);
        let mut k = Kinematics {
            pos: Vec2::new(98.0, 50.0),
            vel: Vec2::new(4.0, 0.0),
            bounces: 0,
        };
        step_kinematics(&mut k, &[obs], arena());
        assert_eq!(k.bounces, 1);
        assert_eq!(k.pos.x, 99.0);
        assert_eq!(k.vel.x, -4.0);
        assert!(!obs.contains_point(k.pos));
    }

    #[test]
    fn test_obstacle_reflection_picks_nearest_face() {
        let obs = Obstacle::new(100.0, 100.0, 100.0, 100.0);
        // Entering from above, closest to the top face.
        let mut k = Kinematics {
            pos: Vec2::new(150.0, 98.0),
            vel: Vec2::new(0.0, 4.0),
            bounces: 0,
        };
        step_kinematics(&mut k, &[obs], arena());
        assert_eq!(k.pos.y, 99.0);
        assert_eq!(k.vel.y, -4.0);
        assert_eq!(k.vel.x, 0.0);
    }

    #[test]
    fn test_bounce_budget_boundary() {
        // Player ammo survives one bounce and dies the instant a second one
        // would be recorded.
        let arena = Vec2::new(100.0, 100.0);
        let mut ammo = flying(AmmoKind::Player, Vec2::new(50.0, 50.0), 0.0);
        let mut rng = Pcg32::seed_from_u64(0);
        let mut events = Vec::new();
        let mut ticks = 0;
        while ammo.is_live() && ticks < 1000 {
            ammo.update(&[], arena, &mut rng, &mut events);
            ticks += 1;
        }
        assert!(ammo.is_exploding());
        assert_eq!(ammo.bounces, AmmoKind::Player.max_bounces() + 1);
        assert_eq!(events, vec![GameEvent::AmmoExploded]);
    }

    #[test]
    fn test_explosion_window_then_poolable() {
        let arena = Vec2::new(100.0, 100.0);
        let mut ammo = flying(AmmoKind::Player, Vec2::new(50.0, 50.0), 0.0);
        let mut rng = Pcg32::seed_from_u64(0);
        let mut events = Vec::new();
        while ammo.is_live() {
            ammo.update(&[], arena, &mut rng, &mut events);
        }
        for _ in 0..AMMO_EXPLOSION_TICKS {
            assert!(!ammo.is_available());
            ammo.update(&[], arena, &mut rng, &mut events);
        }
        assert!(ammo.is_available());
        assert!(ammo.fragments.is_empty());
    }

    #[test]
    fn test_will_hit_direct_shot() {
        let target = target_at(500.0, 235.0);
        let ammo = flying(AmmoKind::Basic, Vec2::new(100.0, 250.0), 0.0);
        assert!(ammo.will_hit(&[], arena(), &target));
    }

    #[test]
    fn test_will_hit_blocked_by_obstacle() {
        let wall = Obstacle::new(300.0, 0.0, 40.0, 500.0);
        let target = target_at(500.0, 235.0);
        let ammo = flying(AmmoKind::Basic, Vec2::new(100.0, 250.0), 0.0);
        assert!(!ammo.will_hit(&[wall], arena(), &target));
    }

    #[test]
    fn test_will_hit_does_not_mutate() {
        let target = target_at(500.0, 235.0);
        let ammo = flying(AmmoKind::Basic, Vec2::new(100.0, 250.0), 0.0);
        let before = ammo.clone();
        let _ = ammo.will_hit(&[], arena(), &target);
        assert_eq!(ammo, before);
    }

    /// Step a live projectile to destruction and report whether it entered
    /// the target box first, using the live `update` path only.
    fn live_replay_hits(mut ammo: Ammunition, obstacles: &[Obstacle], arena: Vec2, target: &Tank) -> bool {
        let mut rng = Pcg32::seed_from_u64(0);
        let mut events = Vec::new();
        for _ in 0..PREDICTION_STEP_CAP {
            ammo.update(obstacles, arena, &mut rng, &mut events);
            if !ammo.is_live() {
                return false;
            }
            if target.contains_point(ammo.pos) {
                return true;
            }
        }
        false
    }

    proptest! {
        #[test]
        fn prop_prediction_matches_live_stepping(theta in 0.0f32..std::f32::consts::TAU) {
            let obstacles = [Obstacle::new(300.0, 200.0, 40.0, 100.0)];
            let target = target_at(800.0, 240.0);
            let ammo = flying(AmmoKind::Super, Vec2::new(120.0, 260.0), theta);

            let predicted = ammo.will_hit(&obstacles, arena(), &target);
            let lived = live_replay_hits(ammo, &obstacles, arena(), &target);
            prop_assert_eq!(predicted, lived);
        }

        #[test]
        fn prop_reflection_stays_outside_obstacle(theta in 0.0f32..std::f32::consts::TAU) {
            let obs = Obstacle::new(300.0, 200.0, 40.0, 100.0);
            let mut k = Kinematics {
                pos: Vec2::new(120.0, 260.0),
                vel: crate::heading_vec(theta) * 6.0,
                bounces: 0,
            };
            for _ in 0..500 {
                step_kinematics(&mut k, &[obs], arena());
                prop_assert!(!obs.contains_point(k.pos));
            }
        }
    }
}
