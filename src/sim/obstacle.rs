//! Static axis-aligned obstacles.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Immutable axis-aligned rectangle that blocks tank movement, reflects
/// projectiles and carves unwalkable cells out of the navigation grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Obstacle {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            left: x,
            top: y,
            right: x + width,
            bottom: y + height,
        }
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    /// Strict interior test. Points exactly on an edge are outside, which is
    /// what the projectile reflection rule relies on after snapping.
    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x > self.left && p.x < self.right && p.y > self.top && p.y < self.bottom
    }

    /// Overlap test against another axis-aligned rectangle.
    pub fn overlaps_rect(&self, left: f32, top: f32, right: f32, bottom: f32) -> bool {
        right > self.left && left < self.right && bottom > self.top && top < self.bottom
    }
}
