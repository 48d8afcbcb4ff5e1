//! Error types for the game engine.

use std::fmt;

use crate::game::{Coord, PlayerId};

/// Reasons an engine call is rejected.
///
/// Every rejection leaves the game exactly as it was before the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameError {
    /// Width, height, player count or area limit was zero.
    InvalidParameters,
    /// The board does not fit in the address space.
    BoardTooLarge,
    /// Memory for the board (or its rendering) could not be reserved.
    Allocation,
    /// Player id is zero or greater than the number of players.
    InvalidPlayer(PlayerId),
    /// Coordinate lies outside the board.
    OutOfBounds(Coord),
    /// Target field of a normal move is already taken.
    FieldOccupied(Coord),
    /// Claiming the field would give the player a new area above the limit.
    AreaLimit {
        /// Player whose limit would be exceeded.
        player: PlayerId,
    },
    /// The player has already used their golden move.
    GoldenMoveUsed(PlayerId),
    /// Golden move target is empty or belongs to the acting player.
    NotOpponentField(Coord),
    /// Taking the field would split the victim into too many areas.
    SplitExceedsLimit {
        /// Owner of the field that was targeted.
        victim: PlayerId,
    },
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::InvalidParameters => {
                write!(f, "board dimensions, players and areas must be positive")
            }
            GameError::BoardTooLarge => write!(f, "board is too large"),
            GameError::Allocation => write!(f, "out of memory"),
            GameError::InvalidPlayer(player) => write!(f, "invalid player {player}"),
            GameError::OutOfBounds(coord) => {
                write!(f, "field ({}, {}) is outside the board", coord.x, coord.y)
            }
            GameError::FieldOccupied(coord) => {
                write!(f, "field ({}, {}) is already taken", coord.x, coord.y)
            }
            GameError::AreaLimit { player } => {
                write!(f, "player {player} cannot start another area")
            }
            GameError::GoldenMoveUsed(player) => {
                write!(f, "player {player} has already used the golden move")
            }
            GameError::NotOpponentField(coord) => write!(
                f,
                "field ({}, {}) does not belong to an opponent",
                coord.x, coord.y
            ),
            GameError::SplitExceedsLimit { victim } => {
                write!(f, "taking the field would split player {victim} into too many areas")
            }
        }
    }
}

impl std::error::Error for GameError {}

/// Result type for engine operations.
pub type GameResult<T> = Result<T, GameError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_mentions_coordinates() {
        let msg = GameError::FieldOccupied(Coord::new(3, 7)).to_string();
        assert!(msg.contains("(3, 7)"));
    }

    #[test]
    fn test_display_split_names_victim() {
        let msg = GameError::SplitExceedsLimit { victim: 4 }.to_string();
        assert!(msg.contains("player 4"));
    }
}
