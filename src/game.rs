//! Game layer for Gamma.
//!
//! Implements the rules on top of a union-find over the board cells:
//! - Board with fields owned by players
//! - Area tracking with merges and rebuild-based splits
//! - Normal and golden moves under the area limit
//! - Field counting and text rendering
//! - Invariant checks for tests and debugging

mod grid;
mod invariants;
mod player;
mod regions;
mod render;
mod state;
mod union_find;

pub use grid::{Cell, Coord, Grid};
pub use invariants::{assert_invariants, check_invariants, InvariantViolation};
pub use player::{Player, PlayerId};
pub use render::ID_DELIMITER;
pub use state::Game;
