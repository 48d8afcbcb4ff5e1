//! Session driver for the text protocol.
//!
//! A session starts in the header phase, waiting for a `B` or `I` line.
//! After `B` every following line is a batch command answered on the output
//! stream; after `I` the game is handed back to the caller for interactive
//! play. Rejected lines produce `ERROR <line>` on the error stream.

use std::io::{self, BufRead, Read, Write};

use crate::game::Game;
use crate::protocol::{parse_line, Command, GameParams};

/// How a session ended.
#[derive(Debug)]
pub enum SessionEnd {
    /// Input ran out before any game was created.
    NoGame,
    /// A batch game ran until end of input.
    Batch(Game),
    /// An interactive game was requested.
    Interactive {
        /// The freshly created game.
        game: Game,
        /// Number of the line holding the `I` header.
        line: u64,
    },
}

/// Run a session over `input`, writing answers to `out` and diagnostics to
/// `err`.
///
/// # Errors
///
/// Returns an error only if reading the input or writing an answer fails.
pub fn run<R, O, E>(mut input: R, out: &mut O, err: &mut E) -> io::Result<SessionEnd>
where
    R: BufRead,
    O: Write,
    E: Write,
{
    let mut lines = Lines::new(&mut input);

    while let Some((number, line)) = lines.next_line()? {
        match line.as_deref().map(parse_line) {
            Some(Ok(None)) => {}
            Some(Ok(Some(Command::Batch(params)))) => {
                if let Some(mut game) = create(params) {
                    writeln!(out, "OK {number}")?;
                    run_batch(&mut game, &mut lines, out, err)?;
                    return Ok(SessionEnd::Batch(game));
                }
                report(err, number)?;
            }
            Some(Ok(Some(Command::Interactive(params)))) => {
                if let Some(game) = create(params) {
                    return Ok(SessionEnd::Interactive { game, line: number });
                }
                report(err, number)?;
            }
            _ => report(err, number)?,
        }
    }

    Ok(SessionEnd::NoGame)
}

fn create(params: GameParams) -> Option<Game> {
    Game::new(params.width, params.height, params.players, params.max_areas).ok()
}

fn run_batch<R, O, E>(game: &mut Game, lines: &mut Lines<R>, out: &mut O, err: &mut E) -> io::Result<()>
where
    R: BufRead,
    O: Write,
    E: Write,
{
    while let Some((number, line)) = lines.next_line()? {
        match line.as_deref().map(parse_line) {
            Some(Ok(None)) => {}
            Some(Ok(Some(command))) => match answer(game, command) {
                Some(reply) => out.write_all(reply.as_bytes())?,
                None => report(err, number)?,
            },
            _ => report(err, number)?,
        }
    }
    Ok(())
}

/// Execute a batch command. None means the command is not valid here.
fn answer(game: &mut Game, command: Command) -> Option<String> {
    let reply = match command {
        Command::Move { player, coord } => flag(game.place(player, coord).is_ok()),
        Command::GoldenMove { player, coord } => flag(game.golden_move(player, coord).is_ok()),
        Command::BusyFields(player) => format!("{}\n", game.busy_fields(player)),
        Command::FreeFields(player) => format!("{}\n", game.free_fields(player)),
        Command::GoldenPossible(player) => flag(game.golden_possible(player)),
        Command::Print => game.board().ok()?,
        Command::Batch(_) | Command::Interactive(_) => return None,
    };
    Some(reply)
}

fn flag(value: bool) -> String {
    if value { "1\n" } else { "0\n" }.to_string()
}

fn report<E: Write>(err: &mut E, line: u64) -> io::Result<()> {
    writeln!(err, "ERROR {line}")
}

/// Longest accepted line in bytes, newline included.
pub const MAX_LINE_LEN: usize = 4096;

/// Numbered lines of the input, newline included.
///
/// Lines that are not valid UTF-8 or longer than [`MAX_LINE_LEN`] come
/// back as None.
struct Lines<'a, R> {
    input: &'a mut R,
    number: u64,
    buf: Vec<u8>,
}

impl<'a, R: BufRead> Lines<'a, R> {
    fn new(input: &'a mut R) -> Self {
        Self {
            input,
            number: 0,
            buf: Vec::new(),
        }
    }

    fn next_line(&mut self) -> io::Result<Option<(u64, Option<String>)>> {
        self.buf.clear();
        let limit = MAX_LINE_LEN as u64;
        if (&mut *self.input).take(limit).read_until(b'\n', &mut self.buf)? == 0 {
            return Ok(None);
        }
        self.number += 1;

        if self.buf.len() == MAX_LINE_LEN && self.buf.last() != Some(&b'\n') {
            self.skip_rest()?;
            return Ok(Some((self.number, None)));
        }

        let line = String::from_utf8(std::mem::take(&mut self.buf)).ok();
        Ok(Some((self.number, line)))
    }

    /// Drop input up to and including the next newline.
    fn skip_rest(&mut self) -> io::Result<()> {
        loop {
            let available = self.input.fill_buf()?;
            if available.is_empty() {
                return Ok(());
            }
            if let Some(pos) = available.iter().position(|&b| b == b'\n') {
                self.input.consume(pos + 1);
                return Ok(());
            }
            let len = available.len();
            self.input.consume(len);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transcript(input: &str) -> (String, String, SessionEnd) {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let end = run(input.as_bytes(), &mut out, &mut err).unwrap();
        (
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
            end,
        )
    }

    #[test]
    fn test_empty_input() {
        let (out, err, end) = transcript("");
        assert!(out.is_empty());
        assert!(err.is_empty());
        assert!(matches!(end, SessionEnd::NoGame));
    }

    #[test]
    fn test_header_errors_before_game() {
        let (out, err, end) = transcript("# comment\nB 0 1 1 1\nm 1 0 0\n\nX\n");
        assert!(out.is_empty());
        assert_eq!(err, "ERROR 2\nERROR 3\nERROR 5\n");
        assert!(matches!(end, SessionEnd::NoGame));
    }

    #[test]
    fn test_batch_session() {
        let input = "B 3 2 2 1\nm 1 0 0\nm 1 0 0\nm 2 2 1\nb 1\nf 1\nq 1\np\n";
        let (out, err, end) = transcript(input);
        assert_eq!(out, "OK 1\n1\n0\n1\n1\n2\n0\n..2\n1..\n");
        assert!(err.is_empty());

        let SessionEnd::Batch(game) = end else {
            panic!("expected a batch session");
        };
        assert_eq!(game.busy_fields(2), 1);
    }

    #[test]
    fn test_batch_errors_keep_numbering() {
        let input = "\nB 2 2 2 2\n# comment\nm 1 0\nB 2 2 2 2\nm 1 0 0\n m 1 1 1\nm 1 1 1";
        let (out, err, _) = transcript(input);
        assert_eq!(out, "OK 2\n1\n");
        assert_eq!(err, "ERROR 4\nERROR 5\nERROR 7\nERROR 8\n");
    }

    #[test]
    fn test_engine_rejections_print_zero() {
        let input = "B 2 2 2 1\nm 3 0 0\nm 1 5 5\ng 1 0 0\nb 7\nf 0\nq 9\n";
        let (out, err, _) = transcript(input);
        assert_eq!(out, "OK 1\n0\n0\n0\n0\n0\n0\n");
        assert!(err.is_empty());
    }

    #[test]
    fn test_interactive_header_returns_game() {
        let (out, err, end) = transcript("I 0 1 1 1\nI 4 3 2 1\nm 1 0 0\n");
        assert!(out.is_empty());
        assert_eq!(err, "ERROR 1\n");
        match end {
            SessionEnd::Interactive { game, line } => {
                assert_eq!(line, 2);
                assert_eq!(game.width(), 4);
                assert_eq!(game.height(), 3);
            }
            other => panic!("unexpected end {other:?}"),
        }
    }

    #[test]
    fn test_invalid_utf8_is_an_error_line() {
        let mut input = b"B 1 1 1 1\n".to_vec();
        input.extend_from_slice(&[0xFF, b'\n']);
        input.extend_from_slice(b"b 1\n");
        let mut out = Vec::new();
        let mut err = Vec::new();
        run(input.as_slice(), &mut out, &mut err).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "OK 1\n0\n");
        assert_eq!(String::from_utf8(err).unwrap(), "ERROR 2\n");
    }

    #[test]
    fn test_overlong_line_is_one_error() {
        let mut input = String::from("B 2 2 2 1\n");
        input.push_str("m 1 0 0");
        input.push_str(&" ".repeat(MAX_LINE_LEN));
        input.push_str("\nb 1\nm 1 1 1\n");

        let (out, err, _) = transcript(&input);
        assert_eq!(out, "OK 1\n0\n1\n");
        assert_eq!(err, "ERROR 2\n");
    }

    #[test]
    fn test_longest_line_is_accepted() {
        let mut line = String::from("m 1 0 0");
        line.push_str(&" ".repeat(MAX_LINE_LEN - line.len() - 1));
        line.push('\n');
        assert_eq!(line.len(), MAX_LINE_LEN);

        let (out, err, _) = transcript(&format!("B 2 2 2 1\n{line}"));
        assert_eq!(out, "OK 1\n1\n");
        assert!(err.is_empty());
    }

    #[test]
    fn test_overlong_line_without_newline_at_end() {
        let input = format!("B 1 1 1 1\n{}", "#".repeat(MAX_LINE_LEN * 3));
        let (out, err, _) = transcript(&input);
        assert_eq!(out, "OK 1\n");
        assert_eq!(err, "ERROR 2\n");
    }
}
