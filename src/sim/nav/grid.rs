//! Walkability grid and A* search
//!
//! The arena is discretized into fixed-size cells whose walkability is
//! computed once from obstacle overlap. Search scratch (`g`/`h`/`f`/parent)
//! lives in the nodes and must be cleared with [`NavigationGrid::reset`]
//! before every search; stale costs make rediscovered nodes look cheap.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::GRID_CELL_SIZE;
use crate::sim::obstacle::Obstacle;
use crate::sim::tank::Tank;

/// Grid coordinates of one navigation cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Center of the cell in arena units.
    pub fn center(&self) -> Vec2 {
        Vec2::new(
            self.x as f32 * GRID_CELL_SIZE + GRID_CELL_SIZE / 2.0,
            self.y as f32 * GRID_CELL_SIZE + GRID_CELL_SIZE / 2.0,
        )
    }

    fn distance_to(&self, other: Cell) -> f32 {
        let dx = (self.x - other.x) as f32;
        let dy = (self.y - other.y) as f32;
        (dx * dx + dy * dy).sqrt()
    }
}

/// One grid node: fixed walkability plus per-search scratch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub cell: Cell,
    pub walkable: bool,
    g: f32,
    h: f32,
    f: f32,
    parent: Option<usize>,
}

/// Discretized arena used by the pathing navigators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigationGrid {
    pub cols: i32,
    pub rows: i32,
    nodes: Vec<Node>,
}

impl NavigationGrid {
    /// Build the grid for an arena, marking every cell that overlaps an
    /// obstacle as unwalkable.
    pub fn new(width: f32, height: f32, obstacles: &[Obstacle]) -> Self {
        let cols = (width / GRID_CELL_SIZE).floor() as i32;
        let rows = (height / GRID_CELL_SIZE).floor() as i32;
        let mut nodes = Vec::with_capacity((cols.max(0) * rows.max(0)) as usize);
        for y in 0..rows {
            for x in 0..cols {
                let left = x as f32 * GRID_CELL_SIZE;
                let top = y as f32 * GRID_CELL_SIZE;
                let walkable = !obstacles.iter().any(|obs| {
                    obs.overlaps_rect(left, top, left + GRID_CELL_SIZE, top + GRID_CELL_SIZE)
                });
                nodes.push(Node {
                    cell: Cell::new(x, y),
                    walkable,
                    g: 0.0,
                    h: 0.0,
                    f: 0.0,
                    parent: None,
                });
            }
        }
        Self { cols, rows, nodes }
    }

    fn index(&self, cell: Cell) -> Option<usize> {
        if cell.x < 0 || cell.y < 0 || cell.x >= self.cols || cell.y >= self.rows {
            return None;
        }
        Some((cell.y * self.cols + cell.x) as usize)
    }

    pub fn is_walkable(&self, cell: Cell) -> bool {
        self.index(cell).is_some_and(|i| self.nodes[i].walkable)
    }

    /// All walkable cells, for debug overlays.
    pub fn walkable_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.nodes.iter().filter(|n| n.walkable).map(|n| n.cell)
    }

    /// Clear search scratch. Required before every [`a_star`](Self::a_star).
    pub fn reset(&mut self) {
        for node in &mut self.nodes {
            node.g = 0.0;
            node.h = 0.0;
            node.f = 0.0;
            node.parent = None;
        }
    }

    /// Cell containing a point, clamped to grid bounds.
    pub fn cell_from_point(&self, p: Vec2) -> Cell {
        let x = ((p.x / GRID_CELL_SIZE).floor() as i32).clamp(0, (self.cols - 1).max(0));
        let y = ((p.y / GRID_CELL_SIZE).floor() as i32).clamp(0, (self.rows - 1).max(0));
        Cell::new(x, y)
    }

    /// Cell under a tank's center, clamped to grid bounds.
    pub fn cell_for_tank(&self, tank: &Tank) -> Cell {
        self.cell_from_point(tank.center())
    }

    /// Uniformly pick a walkable cell whose distance to `target` lies in
    /// `[radius - 1, radius + 1]`. `None` when the annulus is empty; callers
    /// hold position and retry at the next replan.
    pub fn sample_node_near(&self, target: Cell, radius: i32, rng: &mut Pcg32) -> Option<Cell> {
        let candidates: Vec<Cell> = self
            .nodes
            .iter()
            .filter(|n| n.walkable)
            .map(|n| n.cell)
            .filter(|c| {
                let distance = c.distance_to(target);
                distance >= (radius - 1) as f32 && distance <= (radius + 1) as f32
            })
            .collect();
        if candidates.is_empty() {
            None
        } else {
            Some(candidates[rng.random_range(0..candidates.len())])
        }
    }

    /// Classic grid A*: 8-directional neighbors, axis cost 1, diagonal cost
    /// √2, heuristic = rounded Euclidean distance. The open list is re-sorted
    /// by `f` each iteration with stable ties, so equal-cost nodes pop in
    /// insertion order. Returns the node sequence from start to goal
    /// inclusive, or `None` once the open list empties.
    pub fn a_star(&mut self, start: Cell, goal: Cell) -> Option<Vec<Cell>> {
        let start_i = self.index(start)?;
        let goal_i = self.index(goal)?;
        let mut open: Vec<usize> = vec![start_i];
        let mut closed = vec![false; self.nodes.len()];

        while !open.is_empty() {
            open.sort_by(|&a, &b| {
                self.nodes[a]
                    .f
                    .partial_cmp(&self.nodes[b].f)
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
            let current = open.remove(0);
            if current == goal_i {
                return Some(self.reconstruct(current));
            }
            closed[current] = true;

            let current_cell = self.nodes[current].cell;
            let current_g = self.nodes[current].g;
            for neighbor in self.walkable_neighbors(current_cell) {
                if closed[neighbor] {
                    continue;
                }
                let cell = self.nodes[neighbor].cell;
                let step = if cell.x == current_cell.x || cell.y == current_cell.y {
                    1.0
                } else {
                    std::f32::consts::SQRT_2
                };
                let tentative_g = current_g + step;
                if !open.contains(&neighbor) {
                    open.push(neighbor);
                } else if tentative_g >= self.nodes[neighbor].g {
                    continue;
                }
                let h = cell.distance_to(goal).round();
                let node = &mut self.nodes[neighbor];
                node.parent = Some(current);
                node.g = tentative_g;
                node.h = h;
                node.f = tentative_g + h;
            }
        }
        None
    }

    fn reconstruct(&self, goal: usize) -> Vec<Cell> {
        let mut path = Vec::new();
        let mut current = Some(goal);
        while let Some(i) = current {
            path.push(self.nodes[i].cell);
            current = self.nodes[i].parent;
        }
        path.reverse();
        path
    }

    fn walkable_neighbors(&self, cell: Cell) -> Vec<usize> {
        let mut neighbors = Vec::with_capacity(8);
        for dx in -1..=1 {
            for dy in -1..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let candidate = Cell::new(cell.x + dx, cell.y + dy);
                if let Some(i) = self.index(candidate) {
                    if self.nodes[i].walkable {
                        neighbors.push(i);
                    }
                }
            }
        }
        neighbors
    }
}
