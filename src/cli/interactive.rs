//! Interactive mode - full-screen TUI where players take turns at one keyboard.

// Board geometry is bounded by the terminal size checked up front
#![allow(clippy::cast_possible_truncation)]

use super::CliError;
use crossterm::{
    cursor::Show,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{self, disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use gamma::game::ID_DELIMITER;
use gamma::{Coord, Game, PlayerId};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};
use std::io::{stdout, Stdout};

/// Rows taken by everything except the board: header, status and footer
/// blocks plus the board's own border.
const CHROME_ROWS: u64 = 3 + 4 + 3 + 2;

/// Narrowest terminal that still shows the status and key help.
const MIN_COLUMNS: u64 = 48;

const CONTROLS: &str = " [←↑↓→] Move  [Space] Claim  [g] Golden  [c] Skip  [q] Quit ";

/// Raw mode and alternate screen, restored when dropped.
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalGuard {
    fn new() -> Result<Self, CliError> {
        enable_raw_mode()?;
        let mut out = stdout();
        if let Err(e) = execute!(out, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(e.into());
        }
        let terminal = Terminal::new(CrosstermBackend::new(out)).map_err(|e| {
            let _ = disable_raw_mode();
            let _ = execute!(stdout(), LeaveAlternateScreen);
            CliError::new(e.to_string())
        })?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen, Show);
    }
}

/// Terminal size `(columns, rows)` needed to show `game`.
pub(crate) fn required_size(game: &Game) -> (u64, u64) {
    let columns = u64::from(game.width()) * u64::from(cell_width(game.player_count())) + 2;
    let rows = u64::from(game.height()) + CHROME_ROWS;
    (columns.max(MIN_COLUMNS), rows)
}

/// Whether the current terminal can show `game`.
///
/// # Errors
///
/// Returns an error if the terminal size cannot be queried.
pub(crate) fn fits_terminal(game: &Game) -> Result<bool, CliError> {
    let (columns, rows) = terminal::size()?;
    let (need_columns, need_rows) = required_size(game);
    Ok(u64::from(columns) >= need_columns && u64::from(rows) >= need_rows)
}

/// Play `game` interactively until nobody can move or the players quit.
///
/// # Errors
///
/// Returns an error if the TUI fails.
pub(crate) fn execute(game: Game) -> Result<Game, CliError> {
    let mut app = App::new(game);
    let mut guard = TerminalGuard::new()?;

    while !app.finished {
        guard
            .terminal
            .draw(|f| ui(f, &app))
            .map_err(|e| CliError::new(e.to_string()))?;

        if let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            app.handle_key(key);
        }
    }

    drop(guard);
    Ok(app.game)
}

/// App state for the TUI.
struct App {
    game: Game,
    cursor: Coord,
    player: PlayerId,
    golden_possible: bool,
    message: Option<String>,
    finished: bool,
}

impl App {
    fn new(game: Game) -> Self {
        let cursor = Coord::new(game.width() / 2, game.height() / 2);
        let mut app = Self {
            game,
            cursor,
            player: 0,
            golden_possible: false,
            message: None,
            finished: false,
        };
        app.next_turn();
        app
    }

    /// Pass the turn to the next player who has a legal move.
    fn next_turn(&mut self) {
        let count = self.game.player_count();
        let mut candidate = self.player;
        for _ in 0..count {
            candidate = candidate % count + 1;
            if self.game.can_move(candidate) {
                self.player = candidate;
                self.golden_possible = self.game.golden_possible(candidate);
                return;
            }
        }
        self.finished = true;
    }

    fn handle_key(&mut self, key: KeyEvent) {
        self.message = None;
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.finished = true,
            KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.finished = true;
            }
            KeyCode::Left => self.cursor.x = self.cursor.x.saturating_sub(1),
            KeyCode::Down => self.cursor.y = self.cursor.y.saturating_sub(1),
            KeyCode::Right if self.cursor.x + 1 < self.game.width() => self.cursor.x += 1,
            KeyCode::Up if self.cursor.y + 1 < self.game.height() => self.cursor.y += 1,
            KeyCode::Char(' ') => match self.game.place(self.player, self.cursor) {
                Ok(()) => self.next_turn(),
                Err(e) => self.message = Some(e.to_string()),
            },
            KeyCode::Char('g' | 'G') => match self.game.golden_move(self.player, self.cursor) {
                Ok(()) => self.next_turn(),
                Err(e) => self.message = Some(e.to_string()),
            },
            KeyCode::Char('c' | 'C') => self.next_turn(),
            _ => {}
        }
    }
}

fn ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(3),    // Board
            Constraint::Length(4), // Status
            Constraint::Length(3), // Footer
        ])
        .split(f.area());

    render_header(f, chunks[0], app);
    render_board(f, chunks[1], app);
    render_status(f, chunks[2], app);

    let footer = Paragraph::new(CONTROLS)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(footer, chunks[3]);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let title = format!(
        " Gamma | {}x{} | {} players | {} areas max ",
        app.game.width(),
        app.game.height(),
        app.game.player_count(),
        app.game.max_areas()
    );

    let header = Paragraph::new(title)
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(header, area);
}

fn render_board(f: &mut Frame, area: Rect, app: &App) {
    let game = &app.game;
    let width = cell_width(game.player_count()) as usize;
    let delimit = game.player_count() >= 10;

    let mut lines: Vec<Line> = Vec::with_capacity(game.height() as usize);
    for y in (0..game.height()).rev() {
        let mut spans = Vec::with_capacity(game.width() as usize);
        for x in 0..game.width() {
            let coord = Coord::new(x, y);
            let owner = game.owner(coord);
            let text = match owner {
                None => ".".to_string(),
                Some(id) if delimit && id >= 10 => format!("{ID_DELIMITER}{id}{ID_DELIMITER}"),
                Some(id) => id.to_string(),
            };

            let mut style = Style::default().fg(owner.map_or(Color::DarkGray, player_color));
            if coord == app.cursor {
                style = style.add_modifier(Modifier::REVERSED);
            }
            spans.push(Span::styled(format!("{text:>width$}"), style));
        }
        lines.push(Line::from(spans));
    }

    let board = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Board "));
    f.render_widget(board, area);
}

fn render_status(f: &mut Frame, area: Rect, app: &App) {
    let game = &app.game;
    let player = app.player;

    let mut status = format!(
        "PLAYER {player} {} {}",
        game.busy_fields(player),
        game.free_fields(player)
    );
    if app.golden_possible {
        status.push_str(" G");
    }

    let detail = app.message.clone().unwrap_or_else(|| {
        format!(
            "areas {}/{}  cursor ({}, {})",
            game.area_count(player),
            game.max_areas(),
            app.cursor.x,
            app.cursor.y
        )
    });

    let lines = vec![
        Line::from(Span::styled(
            status,
            Style::default()
                .fg(player_color(player))
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(detail),
    ];

    let widget = Paragraph::new(lines).block(Block::default().borders(Borders::ALL));
    f.render_widget(widget, area);
}

/// Columns per board field.
fn cell_width(player_count: u32) -> u32 {
    if player_count >= 10 {
        player_count.to_string().len() as u32 + 2
    } else {
        1
    }
}

fn player_color(id: PlayerId) -> Color {
    const PALETTE: [Color; 8] = [
        Color::Red,
        Color::Blue,
        Color::Green,
        Color::Yellow,
        Color::Magenta,
        Color::Cyan,
        Color::LightRed,
        Color::LightBlue,
    ];
    PALETTE[(id.saturating_sub(1) % 8) as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn test_cursor_stays_on_board() {
        let mut app = App::new(Game::new(2, 2, 2, 1).unwrap());
        assert_eq!(app.cursor, Coord::new(1, 1));

        press(&mut app, KeyCode::Up);
        press(&mut app, KeyCode::Right);
        assert_eq!(app.cursor, Coord::new(1, 1));

        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Left);
        press(&mut app, KeyCode::Left);
        assert_eq!(app.cursor, Coord::new(0, 0));
    }

    #[test]
    fn test_turns_rotate_after_moves() {
        let mut app = App::new(Game::new(3, 3, 2, 2).unwrap());
        assert_eq!(app.player, 1);

        press(&mut app, KeyCode::Char(' '));
        assert_eq!(app.game.owner(Coord::new(1, 1)), Some(1));
        assert_eq!(app.player, 2);

        // Occupied field: the move fails and the turn stays.
        press(&mut app, KeyCode::Char(' '));
        assert_eq!(app.player, 2);
        assert!(app.message.is_some());

        press(&mut app, KeyCode::Char('c'));
        assert_eq!(app.player, 1);
    }

    #[test]
    fn test_golden_key() {
        let mut app = App::new(Game::new(3, 1, 2, 2).unwrap());
        press(&mut app, KeyCode::Char(' '));
        assert_eq!(app.player, 2);
        assert!(app.golden_possible);

        press(&mut app, KeyCode::Char('g'));
        assert_eq!(app.game.owner(Coord::new(1, 0)), Some(2));
        assert!(app.game.golden_used(2));
        assert_eq!(app.player, 1);
    }

    #[test]
    fn test_players_without_moves_are_skipped() {
        let mut app = App::new(Game::new(1, 2, 3, 1).unwrap());
        // Player 1 claims (0,1); player 2 takes it back with a golden move.
        press(&mut app, KeyCode::Char(' '));
        assert_eq!(app.player, 2);
        press(&mut app, KeyCode::Char('g'));
        assert_eq!(app.player, 3);
        // Player 3 fills the last field. Player 1 still has a golden move.
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Char(' '));
        assert_eq!(app.player, 1);
        assert!(!app.finished);
    }

    #[test]
    fn test_game_ends_when_nobody_can_move() {
        let mut app = App::new(Game::new(1, 1, 1, 1).unwrap());
        press(&mut app, KeyCode::Char(' '));
        assert!(app.finished);
    }

    #[test]
    fn test_quit_keys() {
        let mut app = App::new(Game::new(2, 2, 2, 1).unwrap());
        app.handle_key(KeyEvent::new(KeyCode::Char('d'), KeyModifiers::CONTROL));
        assert!(app.finished);

        let mut app = App::new(Game::new(2, 2, 2, 1).unwrap());
        press(&mut app, KeyCode::Esc);
        assert!(app.finished);
    }

    #[test]
    fn test_required_size() {
        let game = Game::new(100, 20, 2, 1).unwrap();
        assert_eq!(required_size(&game), (102, 20 + CHROME_ROWS));

        let game = Game::new(10, 5, 12, 1).unwrap();
        assert_eq!(required_size(&game), (MIN_COLUMNS, 5 + CHROME_ROWS));

        let game = Game::new(30, 5, 12, 1).unwrap();
        assert_eq!(required_size(&game), (30 * 4 + 2, 5 + CHROME_ROWS));
    }
}
