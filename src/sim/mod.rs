//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only (one tick per driver call)
//! - Seeded RNG only
//! - Stable update order: move, aim, fire/plant, advance, collide, score
//! - No rendering or platform dependencies

pub mod ammo;
pub mod bomb;
pub mod nav;
pub mod obstacle;
pub mod state;
pub mod tank;
pub mod tick;
pub mod variant;

pub use ammo::{step_kinematics, AmmoState, Ammunition, Kinematics};
pub use bomb::{Bomb, BombState};
pub use nav::{Cell, NavigationGrid, Navigator};
pub use obstacle::Obstacle;
pub use state::{Fragment, GameEvent, GameState, Outcome, TickInput};
pub use tank::{Direction, Tank};
pub use tick::tick;
pub use variant::{AimMode, AmmoKind, BombKind, NavigatorKind, TankKind};
