//! Movement strategies for enemy tanks
//!
//! Each strategy keeps its own scratch (current plan, replan countdown) and
//! issues at most one directional move per tick on the tank it drives.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::nav::grid::{Cell, NavigationGrid};
use crate::sim::obstacle::Obstacle;
use crate::sim::tank::{Direction, Tank};
use crate::sim::variant::NavigatorKind;

/// Mutable scratch shared by the pathing strategies.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanState {
    pub path: Vec<Cell>,
    pub recalc_in: u32,
    /// Radius around the target's cell from which the destination is
    /// sampled; smaller approaches closer.
    pub aggression: i32,
}

/// Movement strategy, a closed set of variants.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum Navigator {
    /// Turrets: never moves.
    #[default]
    Stationary,
    /// Coarse greedy walker ignoring obstacle-aware optimality.
    SimpleGreedy(PlanState),
    /// Full A* with periodic replans and stuck recovery.
    AStar(PlanState),
}

impl Navigator {
    pub fn from_kind(kind: NavigatorKind, aggression: i32) -> Self {
        match kind {
            NavigatorKind::Stationary => Navigator::Stationary,
            NavigatorKind::SimpleGreedy => Navigator::SimpleGreedy(PlanState {
                path: Vec::new(),
                recalc_in: GREEDY_RECALC_TICKS,
                aggression,
            }),
            NavigatorKind::AStar => Navigator::AStar(PlanState {
                path: Vec::new(),
                recalc_in: ASTAR_RECALC_TICKS,
                aggression,
            }),
        }
    }

    /// Current plan, for debug overlays.
    pub fn path(&self) -> &[Cell] {
        match self {
            Navigator::Stationary => &[],
            Navigator::SimpleGreedy(state) | Navigator::AStar(state) => &state.path,
        }
    }

    /// Advance `tank` one tick toward `target`.
    pub fn advance(
        &mut self,
        tank: &mut Tank,
        target: &Tank,
        grid: &mut NavigationGrid,
        obstacles: &[Obstacle],
        bounds: Vec2,
        rng: &mut Pcg32,
    ) {
        match self {
            Navigator::Stationary => {}
            Navigator::SimpleGreedy(state) => {
                advance_greedy(state, tank, target, grid, obstacles, bounds, rng)
            }
            Navigator::AStar(state) => {
                advance_astar(state, tank, target, grid, obstacles, bounds, rng)
            }
        }
    }
}

fn advance_astar(
    state: &mut PlanState,
    tank: &mut Tank,
    target: &Tank,
    grid: &mut NavigationGrid,
    obstacles: &[Obstacle],
    bounds: Vec2,
    rng: &mut Pcg32,
) {
    state.recalc_in = state.recalc_in.saturating_sub(1);
    if state.path.is_empty() || state.recalc_in == 0 {
        state.recalc_in = ASTAR_RECALC_TICKS;
        grid.reset();
        let start = grid.cell_for_tank(tank);
        let near_target = grid.cell_for_tank(target);
        match grid.sample_node_near(near_target, state.aggression, rng) {
            Some(destination) => {
                state.path = grid.a_star(start, destination).unwrap_or_else(|| {
                    log::debug!("no path from {:?} to {:?}", start, destination);
                    Vec::new()
                });
            }
            // Hold position; the annulus may open up by the next replan.
            None => log::debug!(
                "no walkable cell at radius {} around {:?}",
                state.aggression,
                near_target
            ),
        }
        return;
    }

    let current = grid.cell_for_tank(tank);
    let next = state.path[0];
    let dx = next.x - current.x;
    let dy = next.y - current.y;

    if tank.last_move_blocked && tank.consecutive_direction_moves > STUCK_MOVE_THRESHOLD {
        // Cornered: the grid is coarser than the collision geometry, so pure
        // pathing cannot see the pocket. Jolt out with a random cardinal
        // move, then a diagonal biased toward the planned step.
        tank.move_in_direction(Direction::random_cardinal(rng), obstacles, bounds);
        tank.consecutive_direction_moves = 0;
        let flip = rng.random::<f32>() < 0.5;
        if let Some(dir) = escape_direction(dx, dy, flip) {
            tank.move_in_direction(dir, obstacles, bounds);
        }
    } else if let Some(dir) = Direction::from_steps(dx, dy) {
        tank.move_in_direction(dir, obstacles, bounds);
    }

    if next == current {
        state.path.remove(0);
    }
}

/// Diagonal (or perpendicular, for diagonal plans) escape move biased toward
/// the planned step.
fn escape_direction(dx: i32, dy: i32, flip: bool) -> Option<Direction> {
    match (dx, dy) {
        (1, 0) => Some(if flip {
            Direction::SouthEast
        } else {
            Direction::NorthEast
        }),
        (-1, 0) => Some(if flip {
            Direction::NorthWest
        } else {
            Direction::SouthWest
        }),
        (0, 1) => Some(if flip {
            Direction::SouthEast
        } else {
            Direction::SouthWest
        }),
        (0, -1) => Some(if flip {
            Direction::NorthWest
        } else {
            Direction::NorthEast
        }),
        (1, 1) => Some(if flip {
            Direction::South
        } else {
            Direction::East
        }),
        (1, -1) => Some(if flip {
            Direction::North
        } else {
            Direction::East
        }),
        (-1, 1) => Some(if flip {
            Direction::South
        } else {
            Direction::West
        }),
        (-1, -1) => Some(if flip {
            Direction::North
        } else {
            Direction::West
        }),
        _ => None,
    }
}

fn advance_greedy(
    state: &mut PlanState,
    tank: &mut Tank,
    target: &Tank,
    grid: &mut NavigationGrid,
    obstacles: &[Obstacle],
    bounds: Vec2,
    rng: &mut Pcg32,
) {
    state.recalc_in = state.recalc_in.saturating_sub(1);
    if state.path.is_empty() || state.recalc_in == 0 {
        state.recalc_in = GREEDY_RECALC_TICKS;
        let start = grid.cell_for_tank(tank);
        let near_target = grid.cell_for_tank(target);
        match grid.sample_node_near(near_target, state.aggression, rng) {
            Some(destination) => state.path = greedy_path(grid, start, destination),
            None => log::debug!(
                "no walkable cell at radius {} around {:?}",
                state.aggression,
                near_target
            ),
        }
        return;
    }

    let current = grid.cell_for_tank(tank);
    let next = state.path[0];
    if state.path.len() > 1 {
        if let Some(dir) = Direction::from_steps(next.x - current.x, next.y - current.y) {
            tank.move_in_direction(dir, obstacles, bounds);
        }
    }
    if next == current {
        state.path.remove(0);
    }
}

/// Short fixed-length walk of locally best axis steps. No backtracking or
/// obstacle-aware lookahead; dead ends simply stall until the next replan.
fn greedy_path(grid: &NavigationGrid, start: Cell, goal: Cell) -> Vec<Cell> {
    let mut current = start;
    let mut path = vec![current];
    for _ in 0..GREEDY_PLAN_STEPS {
        current = greedy_step(grid, current, goal);
        path.push(current);
    }
    path
}

/// Best of the four axis-aligned neighbor cells by Manhattan distance to the
/// goal; stays put when every candidate is worse or unwalkable.
fn greedy_step(grid: &NavigationGrid, current: Cell, goal: Cell) -> Cell {
    if current == goal {
        return current;
    }
    let moves = [
        Cell::new(current.x + 1, current.y),
        Cell::new(current.x - 1, current.y),
        Cell::new(current.x, current.y + 1),
        Cell::new(current.x, current.y - 1),
    ];
    let mut best = current;
    let mut best_distance = i32::MAX;
    for candidate in moves {
        if grid.is_walkable(candidate) {
            let distance = (candidate.x - goal.x).abs() + (candidate.y - goal.y).abs();
            if distance < best_distance {
                best_distance = distance;
                best = candidate;
            }
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::variant::TankKind;
    use rand::SeedableRng;

    const BOUNDS: Vec2 = Vec2::new(1000.0, 500.0);

    fn tank_at(kind: TankKind, x: f32, y: f32) -> Tank {
        Tank::new(
            kind,
            Vec2::new(x, y),
            Vec::new(),
            Vec::new(),
            Navigator::Stationary,
        )
    }

    #[test]
    fn test_stationary_never_moves() {
        let mut nav = Navigator::from_kind(NavigatorKind::Stationary, 0);
        let mut tank = tank_at(TankKind::Stationary, 800.0, 240.0);
        let player = tank_at(TankKind::Player, 100.0, 240.0);
        let mut grid = NavigationGrid::new(1000.0, 500.0, &[]);
        let mut rng = Pcg32::seed_from_u64(0);
        for _ in 0..200 {
            nav.advance(&mut tank, &player, &mut grid, &[], BOUNDS, &mut rng);
        }
        assert_eq!(tank.pos, Vec2::new(800.0, 240.0));
        assert!(nav.path().is_empty());
    }

    #[test]
    fn test_astar_navigator_closes_distance() {
        let mut nav = Navigator::from_kind(NavigatorKind::AStar, 3);
        let mut tank = tank_at(TankKind::SimpleMoving, 900.0, 50.0);
        let player = tank_at(TankKind::Player, 100.0, 400.0);
        let mut grid = NavigationGrid::new(1000.0, 500.0, &[]);
        let mut rng = Pcg32::seed_from_u64(9);

        let start_distance = tank.center().distance(player.center());
        for _ in 0..600 {
            nav.advance(&mut tank, &player, &mut grid, &[], BOUNDS, &mut rng);
        }
        let end_distance = tank.center().distance(player.center());
        assert!(end_distance < start_distance / 2.0);
    }

    #[test]
    fn test_astar_replans_when_path_exhausted() {
        let mut nav = Navigator::from_kind(NavigatorKind::AStar, 3);
        let mut tank = tank_at(TankKind::SimpleMoving, 500.0, 250.0);
        let player = tank_at(TankKind::Player, 400.0, 250.0);
        let mut grid = NavigationGrid::new(1000.0, 500.0, &[]);
        let mut rng = Pcg32::seed_from_u64(1);

        nav.advance(&mut tank, &player, &mut grid, &[], BOUNDS, &mut rng);
        assert!(!nav.path().is_empty());
    }

    #[test]
    fn test_empty_sample_annulus_holds_position() {
        // Aggression far beyond the grid diagonal: the annulus is empty.
        let mut nav = Navigator::from_kind(NavigatorKind::AStar, 500);
        let mut tank = tank_at(TankKind::SimpleMoving, 500.0, 250.0);
        let player = tank_at(TankKind::Player, 100.0, 250.0);
        let mut grid = NavigationGrid::new(1000.0, 500.0, &[]);
        let mut rng = Pcg32::seed_from_u64(1);

        for _ in 0..10 {
            nav.advance(&mut tank, &player, &mut grid, &[], BOUNDS, &mut rng);
        }
        assert_eq!(tank.pos, Vec2::new(500.0, 250.0));
        assert!(nav.path().is_empty());
    }

    #[test]
    fn test_stuck_recovery_breaks_repeat_streak() {
        let mut nav = Navigator::from_kind(NavigatorKind::AStar, 3);
        let mut tank = tank_at(TankKind::SimpleMoving, 500.0, 250.0);
        let player = tank_at(TankKind::Player, 100.0, 250.0);
        let mut grid = NavigationGrid::new(1000.0, 500.0, &[]);
        let mut rng = Pcg32::seed_from_u64(1);

        // Seed a plan, then fake a blocked streak.
        nav.advance(&mut tank, &player, &mut grid, &[], BOUNDS, &mut rng);
        assert!(!nav.path().is_empty());
        tank.last_move_blocked = true;
        tank.consecutive_direction_moves = 5;
        nav.advance(&mut tank, &player, &mut grid, &[], BOUNDS, &mut rng);
        assert!(tank.consecutive_direction_moves <= 1);
    }

    #[test]
    fn test_greedy_path_walks_toward_goal() {
        let grid = NavigationGrid::new(600.0, 600.0, &[]);
        let path = greedy_path(&grid, Cell::new(0, 0), Cell::new(4, 4));
        assert_eq!(path.len(), GREEDY_PLAN_STEPS as usize + 1);
        assert_eq!(path[0], Cell::new(0, 0));
        // Arrives and then stays put.
        assert_eq!(*path.last().unwrap(), Cell::new(4, 4));
    }

    #[test]
    fn test_greedy_step_avoids_unwalkable_cells() {
        let obs = Obstacle::new(30.0, 0.0, 30.0, 30.0);
        let grid = NavigationGrid::new(300.0, 300.0, &[obs]);
        // Goal straight east but cell (1, 0) is blocked.
        let step = greedy_step(&grid, Cell::new(0, 0), Cell::new(5, 0));
        assert_ne!(step, Cell::new(1, 0));
    }
}
