//! Text rendering of the board.

use std::fmt::Write;

use crate::error::{GameError, GameResult};
use crate::game::{Coord, Game};

/// Delimiter around multi-digit player ids on boards with ten or more players.
pub const ID_DELIMITER: char = '|';

impl Game {
    /// Render ownership as text.
    ///
    /// The row with the highest `y` comes first. Free fields are `.`, taken
    /// fields show the owner's number. With ten or more players, ids of two
    /// or more digits are wrapped in [`ID_DELIMITER`]:
    ///
    /// ```text
    /// 1.|12|
    /// ..3
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Allocation`] if the output buffer cannot be
    /// reserved.
    pub fn board(&self) -> GameResult<String> {
        let width = self.width();
        let height = self.height();
        let delimit = self.player_count() >= 10;

        let id_width = if delimit {
            digits(self.player_count()) + 2
        } else {
            1
        };
        let capacity = usize::try_from(u64::from(width) * u64::from(id_width) + 1)
            .ok()
            .and_then(|row| row.checked_mul(usize::try_from(height).ok()?))
            .ok_or(GameError::Allocation)?;

        let mut out = String::new();
        out.try_reserve_exact(capacity)
            .map_err(|_| GameError::Allocation)?;

        for y in (0..height).rev() {
            for x in 0..width {
                match self.owner(Coord::new(x, y)) {
                    None => out.push('.'),
                    Some(id) if delimit && id >= 10 => {
                        write!(out, "{ID_DELIMITER}{id}{ID_DELIMITER}")
                            .map_err(|_| GameError::Allocation)?;
                    }
                    Some(id) => write!(out, "{id}").map_err(|_| GameError::Allocation)?,
                }
            }
            out.push('\n');
        }

        Ok(out)
    }
}

/// Number of decimal digits in `n`.
fn digits(n: u32) -> u32 {
    n.checked_ilog10().map_or(1, |log| log + 1)
}
