//! Line protocol for the text front ends.
//!
//! Each input line is either ignorable (comment or blank), a command, or
//! malformed. Lines are passed with their trailing `\n` so a final line cut
//! off at end of input can be told apart from a complete one.

use std::fmt;

use crate::game::{Coord, PlayerId};

/// Characters that separate tokens within a line.
const SEPARATORS: [char; 5] = [' ', '\t', '\x0B', '\x0C', '\r'];

/// Board parameters from a session header line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameParams {
    /// Board width.
    pub width: u32,
    /// Board height.
    pub height: u32,
    /// Number of players.
    pub players: u32,
    /// Maximum number of areas per player.
    pub max_areas: u32,
}

/// A parsed protocol command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// `B w h p a` - start a batch session.
    Batch(GameParams),
    /// `I w h p a` - start an interactive session.
    Interactive(GameParams),
    /// `m p x y` - normal move.
    Move {
        /// Acting player.
        player: PlayerId,
        /// Target field.
        coord: Coord,
    },
    /// `g p x y` - golden move.
    GoldenMove {
        /// Acting player.
        player: PlayerId,
        /// Target field.
        coord: Coord,
    },
    /// `b p` - busy fields query.
    BusyFields(PlayerId),
    /// `f p` - free fields query.
    FreeFields(PlayerId),
    /// `q p` - golden move possibility query.
    GoldenPossible(PlayerId),
    /// `p` - print the board.
    Print,
}

/// Why a line was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    /// Line is cut off, starts with whitespace or has stray characters.
    Malformed,
    /// First token is not a known command.
    UnknownCommand,
    /// Wrong number of arguments for the command.
    ArgumentCount,
    /// An argument is not an unsigned 32-bit number.
    BadNumber,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Malformed => write!(f, "malformed line"),
            ParseError::UnknownCommand => write!(f, "unknown command"),
            ParseError::ArgumentCount => write!(f, "wrong number of arguments"),
            ParseError::BadNumber => write!(f, "invalid number"),
        }
    }
}

impl std::error::Error for ParseError {}

/// Parse one input line, including its trailing newline if present.
///
/// Returns `Ok(None)` for comments and blank lines.
///
/// # Errors
///
/// Returns a [`ParseError`] for any line that is not a well-formed command.
pub fn parse_line(line: &str) -> Result<Option<Command>, ParseError> {
    if line.starts_with('#') || line == "\n" {
        return Ok(None);
    }

    let Some(body) = line.strip_suffix('\n') else {
        return Err(ParseError::Malformed);
    };
    if body.starts_with(SEPARATORS)
        || !body
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || SEPARATORS.contains(&ch))
    {
        return Err(ParseError::Malformed);
    }

    let mut tokens = body.split(SEPARATORS).filter(|token| !token.is_empty());
    let Some(name) = tokens.next() else {
        return Err(ParseError::Malformed);
    };
    let args: Vec<&str> = tokens.collect();

    let command = match name {
        "B" => Command::Batch(header_params(&args)?),
        "I" => Command::Interactive(header_params(&args)?),
        "m" => {
            let [player, x, y] = numbers::<3>(&args)?;
            Command::Move {
                player,
                coord: Coord::new(x, y),
            }
        }
        "g" => {
            let [player, x, y] = numbers::<3>(&args)?;
            Command::GoldenMove {
                player,
                coord: Coord::new(x, y),
            }
        }
        "b" => {
            let [player] = numbers::<1>(&args)?;
            Command::BusyFields(player)
        }
        "f" => {
            let [player] = numbers::<1>(&args)?;
            Command::FreeFields(player)
        }
        "q" => {
            let [player] = numbers::<1>(&args)?;
            Command::GoldenPossible(player)
        }
        "p" => {
            numbers::<0>(&args)?;
            Command::Print
        }
        _ => return Err(ParseError::UnknownCommand),
    };

    Ok(Some(command))
}

/// Header arguments are positive and written without leading zeros.
fn header_params(args: &[&str]) -> Result<GameParams, ParseError> {
    if args.iter().any(|arg| arg.starts_with('0')) {
        return Err(ParseError::BadNumber);
    }
    let [width, height, players, max_areas] = numbers::<4>(args)?;
    Ok(GameParams {
        width,
        height,
        players,
        max_areas,
    })
}

fn numbers<const N: usize>(args: &[&str]) -> Result<[u32; N], ParseError> {
    if args.len() != N {
        return Err(ParseError::ArgumentCount);
    }

    let mut values = [0u32; N];
    for (value, arg) in values.iter_mut().zip(args) {
        if !arg.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ParseError::BadNumber);
        }
        *value = arg.parse().map_err(|_| ParseError::BadNumber)?;
    }
    Ok(values)
}
