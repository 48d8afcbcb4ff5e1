// Allow unwrap and lossy casts in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::cast_possible_truncation))]
//! Gamma: a territory-claiming board game engine.
//!
//! Players take turns claiming free fields of a rectangular board. Each
//! player may hold at most a fixed number of areas, where an area is a
//! maximal 4-connected group of fields owned by that player. Once per game
//! a player may make a golden move and take over an opponent's field, as
//! long as the split it causes keeps the opponent within the area limit.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │   gamma binary (batch / TUI)        │
//! ├─────────────────────────────────────┤
//! │   Session driver + line protocol    │
//! ├─────────────────────────────────────┤
//! │   Game rules (moves, golden moves)  │
//! ├─────────────────────────────────────┤
//! │   Union-find over board cells       │
//! └─────────────────────────────────────┘
//! ```

pub mod error;
pub mod game;
pub mod protocol;
pub mod session;

pub use error::{GameError, GameResult};

// Re-export key game types at crate root for convenience
pub use game::{Coord, Game, PlayerId};
