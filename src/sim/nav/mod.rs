//! Grid-based navigation: walkability grid, A* search and the movement
//! strategies that drive enemy tanks.

pub mod grid;
pub mod navigator;

pub use grid::{Cell, NavigationGrid, Node};
pub use navigator::Navigator;
