use crate::{Coords, TermInt};
use crate::app::{Flow, Input, InputSource, Notifier, Renderer};
use crate::game::{Command, Frame, GameOverReport, GameStatus};
use crate::grid::{Cell, Grid};
use crate::snake::Direction;
use std::{io::{Stdout, Write, stdout}, time::Duration};

use anyhow::{bail, Context, Result};
use crossterm::{cursor, execute, queue, style, terminal};
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers, read, poll};
use log::trace;

// Each board cell is two terminal columns wide so the board looks square
const CELL_WIDTH: TermInt = 2;

const SNAKE_HEAD: &str = "██";
const SNAKE_BODY: &str = "▓▓";
const FOOD: &str = "()";
const EMPTY: &str = "  ";

const LOGO: &[&str] = &[
    "S N A K E",
    "",
    "Press SPACE to start",
    "Arrow keys or WASD to move",
    "q or CTRL+C to quit",
];

pub struct TermManager<W: Write = Stdout> {
    width: TermInt,
    height: TermInt,
    out: W,
    screen: Vec<char>,
    current_msg: Option<Message>,
    board_origin: Coords,
    grid: Grid,
    active: bool,
}

struct Message {
    top_left: Coords,
    width: TermInt,
    height: TermInt,
}

/// Translates a key press into game input. Unknown keys map to `None`.
pub fn map_key(ev: &KeyEvent) -> Option<Input> {
    if is_ctrl_c(ev) {
        return Some(Input::Quit);
    }

    let cmd = match ev.code {
        KeyCode::Char(' ') => Command::Activate,
        KeyCode::Char('w') | KeyCode::Up => Command::Direction(Direction::Up),
        KeyCode::Char('a') | KeyCode::Left => Command::Direction(Direction::Left),
        KeyCode::Char('s') | KeyCode::Down => Command::Direction(Direction::Down),
        KeyCode::Char('d') | KeyCode::Right => Command::Direction(Direction::Right),
        KeyCode::Char('q') => return Some(Input::Quit),
        _ => return None,
    };

    Some(Input::Command(cmd))
}

fn is_ctrl_c(ev: &KeyEvent) -> bool {
    ev.code == KeyCode::Char('c') && ev.modifiers.contains(KeyModifiers::CONTROL)
}

/// Where terminal events come from.
pub trait EventSource {
    fn pending(&mut self) -> Result<bool>;
    fn next(&mut self) -> Result<Event>;
}

pub struct CrosstermEvents;

impl EventSource for CrosstermEvents {
    fn pending(&mut self) -> Result<bool> {
        poll(Duration::from_millis(0)).context("Error polling events.")
    }

    fn next(&mut self) -> Result<Event> {
        read().context("Error reading event.")
    }
}

/// Throws away every event already queued, so a following read waits for a
/// fresh key. Returns how many were dropped.
pub fn discard_pending<E: EventSource>(events: &mut E) -> Result<usize> {
    let mut dropped = 0;
    while events.pending()? {
        events.next()?;
        dropped += 1;
    }
    Ok(dropped)
}

/// Top-left corner of the board frame when centred in a `width` x `height`
/// terminal, or `None` if it does not fit. The score line sits above the frame.
pub fn board_origin(width: TermInt, height: TermInt, grid: &Grid) -> Option<Coords> {
    let board_w = grid.size() as TermInt * CELL_WIDTH + 2;
    let board_h = grid.size() as TermInt + 2;

    if width < board_w || height < board_h + 1 {
        return None;
    }

    Some(((width - board_w) / 2, (height - board_h + 1) / 2))
}

impl TermManager<Stdout> {
    pub fn new(grid: Grid) -> Result<Self> {
        let (width, height) = terminal::size().context("Error reading size.")?;
        TermManager::with_writer(grid, width, height, stdout())
    }
}

impl<W: Write> TermManager<W> {
    /// A manager drawing into `out` as if it were a `width` x `height` terminal.
    pub fn with_writer(grid: Grid, width: TermInt, height: TermInt, out: W) -> Result<Self> {
        let board_origin = match board_origin(width, height, &grid) {
            Some(origin) => origin,
            None => bail!("Terminal is {}x{}, too small for a {}x{} board", width, height, grid.size(), grid.size()),
        };

        let screen = vec![' '; width as usize * height as usize];
        Ok(TermManager { width, height, out, screen, current_msg: None, board_origin, grid, active: false })
    }

    pub fn setup(&mut self) -> Result<()> {
        execute!(self.out, EnterAlternateScreen).context("Error entering alt screen")?;
        self.active = true;
        terminal::enable_raw_mode().context("Error setting raw mode.")?;
        execute!(self.out, cursor::Hide, cursor::DisableBlinking).context("Error hiding cursor.")?;
        self.clear()?;
        self.draw_borders()
    }

    pub fn restore(&mut self) -> Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;

        terminal::disable_raw_mode().context("Error setting raw mode.")?;
        execute!(self.out, cursor::Show, cursor::EnableBlinking).context("Error showing cursor.")?;
        execute!(self.out, LeaveAlternateScreen).context("Error leaving alt screen")?;
        Ok(())
    }

    pub fn read_key_blocking(&self) -> Result<KeyEvent> {
        loop {
            if let Event::Key(ev) = read().context("Error reading event.")? {
                return Ok(ev);
            }
        }
    }

    /// Waits up to `timeout` for the first key, then drains whatever else is
    /// already queued.
    pub fn read_key_events_queue(&self, timeout: Duration) -> Result<Vec<KeyEvent>> {
        let mut events = vec![];
        let mut wait = timeout;

        while poll(wait).context("Error polling events.")? {
            if let Event::Key(ev) = read().context("Error reading event.")? {
                events.push(ev);
            }
            wait = Duration::from_millis(0);
        }

        Ok(events)
    }

    /// Draws the frame around the board.
    pub fn draw_borders(&mut self) -> Result<()> {
        let (left, top) = self.board_origin;
        let width = self.grid.size() as TermInt * CELL_WIDTH + 2;
        let height = self.grid.size() as TermInt + 2;
        let end_x = left + width - 1;
        let end_y = top + height - 1;

        for x in left..=end_x {
            let ch = if x == left || x == end_x {'+'} else {'-'};
            self.print_at((x, top), ch)?;
            self.print_at((x, end_y), ch)?;
        }

        for y in top + 1..end_y {
            self.print_at((left, y), '|')?;
            self.print_at((end_x, y), '|')?;
        }

        self.flush()
    }

    pub fn show_message(&mut self, lines: &[&str]) -> Result<()> {
        if self.has_message() {
            self.hide_message()?;
        }

        let msg_height = (lines.len() + 2) as TermInt;
        let msg_width = (lines.iter().map(|x| x.chars().count()).max().unwrap_or(0) + 4) as TermInt;
        let center = (self.width / 2, self.height / 2);
        let top_left = (center.0.saturating_sub(msg_width / 2), center.1.saturating_sub(msg_height / 2));

        // Print the top and bottom empty lines
        for y in [top_left.1, top_left.1 + msg_height - 1].iter() {
            for x_diff in 0..msg_width {
                self.print_at_no_save((top_left.0 + x_diff, *y), ' ')?;
            }
        }

        // Print the message lines
        for (i, line) in lines.iter().enumerate() {
            let padded_line = format!("{line: ^width$}", line = line, width = msg_width as usize);
            let y = top_left.1 + i as TermInt + 1;
            for (x_diff, ch) in padded_line.chars().enumerate() {
                self.print_at_no_save((top_left.0 + x_diff as TermInt, y), ch)?;
            }
        }

        self.current_msg = Some(Message::new(msg_width, msg_height, top_left));
        self.flush()
    }

    pub fn hide_message(&mut self) -> Result<()> {
        let msg = match self.current_msg.take() {
            Some(msg) => msg,
            None => return Ok(()),
        };
        let top_left = msg.top_left();

        // Restore the content from the screen buffer
        for y_diff in 0..msg.height() {
            for x_diff in 0..msg.width() {
                let (x, y) = (top_left.0 + x_diff, top_left.1 + y_diff);
                if let Some(ch) = self.screen_char((x, y)) {
                    self.print_at_no_save((x, y), ch)?;
                }
            }
        }

        self.flush()
    }

    pub fn print_at(&mut self, pos: Coords, ch: char) -> Result<()> {
        if let Some(i) = self.screen_index(pos) {
            self.screen[i] = ch;
        }
        // Keep whatever message is showing on top
        if self.covered_by_message(pos) {
            return Ok(());
        }
        self.print_at_no_save(pos, ch)
    }

    pub fn print_str_at(&mut self, pos: Coords, s: &str) -> Result<()> {
        for (i, ch) in s.chars().enumerate() {
            self.print_at((pos.0 + i as TermInt, pos.1), ch)?;
        }
        Ok(())
    }

    pub fn clear(&mut self) -> Result<()> {
        execute!(self.out, terminal::Clear(ClearType::All)).context("Error clearing.")?;
        self.screen = vec![' '; self.width as usize * self.height as usize];
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.out.flush().context("Error flushing.")
    }

    pub fn has_message(&self) -> bool {
        self.current_msg.is_some()
    }

    ///////////////////////////////////////////////////////////////////////////

    fn cell_pos(&self, cell: Cell) -> Coords {
        let cell = self.grid.wrap_cell(cell);
        let (left, top) = self.board_origin;
        (left + 1 + (cell.x as TermInt - 1) * CELL_WIDTH, top + 1 + (cell.y as TermInt - 1))
    }

    fn draw_cell(&mut self, cell: Cell, s: &str) -> Result<()> {
        let pos = self.cell_pos(cell);
        self.print_str_at(pos, s)
    }

    fn draw_score_line(&mut self, frame: &Frame) -> Result<()> {
        let (left, top) = self.board_origin;
        let row = top.saturating_sub(1);
        let board_w = self.grid.size() as TermInt * CELL_WIDTH + 2;

        let score = format!("SCORE {}", frame.score);
        let high = match &frame.high_score {
            Some(high) => format!("HIGH {}", high),
            None => String::new(),
        };
        let gap = (board_w as usize).saturating_sub(score.len() + high.len());
        let line = format!("{}{}{}", score, " ".repeat(gap), high);
        self.print_str_at((left, row), &line)
    }

    fn screen_index(&self, pos: Coords) -> Option<usize> {
        if pos.0 < self.width && pos.1 < self.height {
            Some(self.width as usize * pos.1 as usize + pos.0 as usize)
        } else {
            None
        }
    }

    fn screen_char(&self, pos: Coords) -> Option<char> {
        self.screen_index(pos).map(|i| self.screen[i])
    }

    fn covered_by_message(&self, pos: Coords) -> bool {
        self.current_msg.as_ref().map_or(false, |msg| msg.covers(pos))
    }

    fn print_at_no_save(&mut self, pos: Coords, ch: char) -> Result<()> {
        // To be used for printing messages, where we don't wanna overwrite our
        // local buffer to restore it when the message is hidden
        queue!(self.out, cursor::MoveTo(pos.0, pos.1), style::Print(ch)).context("Error printing.")
    }
}

impl<W: Write> Renderer for TermManager<W> {
    fn draw(&mut self, frame: &Frame) -> Result<()> {
        let size = self.grid.size();
        for y in 1..=size {
            for x in 1..=size {
                self.draw_cell(Cell::new(x, y), EMPTY)?;
            }
        }

        if let Some(food) = frame.food {
            self.draw_cell(food, FOOD)?;
        }

        for (i, segment) in frame.snake.iter().enumerate() {
            self.draw_cell(*segment, if i == 0 {SNAKE_HEAD} else {SNAKE_BODY})?;
        }

        self.draw_score_line(frame)?;

        match frame.status {
            GameStatus::Idle if !self.has_message() => self.show_message(LOGO)?,
            GameStatus::Running => self.hide_message()?,
            _ => {}
        }

        self.flush()
    }
}

impl<W: Write> InputSource for TermManager<W> {
    fn poll_input(&mut self, timeout: Duration) -> Result<Vec<Input>> {
        let events = self.read_key_events_queue(timeout)?;
        Ok(events.iter().filter_map(|ev| {
            let input = map_key(ev);
            if input.is_none() {
                trace!("Ignoring key {:?}", ev.code);
            }
            input
        }).collect())
    }
}

impl<W: Write> Notifier for TermManager<W> {
    fn game_over(&mut self, report: &GameOverReport) -> Result<Flow> {
        let mut lines = report.lines();
        lines.push(String::new());
        lines.push("Press any key to continue,".to_string());
        lines.push("or CTRL+C to quit.".to_string());

        let lines: Vec<&str> = lines.iter().map(String::as_str).collect();
        self.show_message(&lines)?;

        // Keys already queued, e.g. a held arrow, must not close the dialog
        let dropped = discard_pending(&mut CrosstermEvents)?;
        trace!("Discarded {} queued events before game over dialog", dropped);
        let key = self.read_key_blocking()?;
        self.hide_message()?;

        Ok(if is_ctrl_c(&key) { Flow::Quit } else { Flow::Continue })
    }
}

impl<W: Write> Drop for TermManager<W> {
    fn drop(&mut self) {
        let _ = self.restore();
    }
}

impl Message {
    pub fn new(width: TermInt, height: TermInt, top_left: Coords) -> Self {
        Message { width, height, top_left }
    }

    pub fn width(&self) -> TermInt {
        self.width
    }

    pub fn height(&self) -> TermInt {
        self.height
    }

    pub fn top_left(&self) -> Coords {
        self.top_left
    }

    fn covers(&self, pos: Coords) -> bool {
        (self.top_left.0..self.top_left.0 + self.width).contains(&pos.0)
            && (self.top_left.1..self.top_left.1 + self.height).contains(&pos.1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{GameLoop, RoundResult};
    use rand::{rngs::StdRng, SeedableRng};
    use std::collections::VecDeque;
    use std::time::Instant;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent { code, modifiers: KeyModifiers::NONE }
    }

    #[test]
    fn space_activates() {
        assert_eq!(map_key(&key(KeyCode::Char(' '))), Some(Input::Command(Command::Activate)));
    }

    #[test]
    fn arrows_and_wasd_steer() {
        let dir = |d| Some(Input::Command(Command::Direction(d)));
        assert_eq!(map_key(&key(KeyCode::Up)), dir(Direction::Up));
        assert_eq!(map_key(&key(KeyCode::Down)), dir(Direction::Down));
        assert_eq!(map_key(&key(KeyCode::Left)), dir(Direction::Left));
        assert_eq!(map_key(&key(KeyCode::Right)), dir(Direction::Right));
        assert_eq!(map_key(&key(KeyCode::Char('w'))), dir(Direction::Up));
        assert_eq!(map_key(&key(KeyCode::Char('a'))), dir(Direction::Left));
        assert_eq!(map_key(&key(KeyCode::Char('s'))), dir(Direction::Down));
        assert_eq!(map_key(&key(KeyCode::Char('d'))), dir(Direction::Right));
    }

    #[test]
    fn quit_keys() {
        let ctrl_c = KeyEvent { code: KeyCode::Char('c'), modifiers: KeyModifiers::CONTROL };
        assert_eq!(map_key(&ctrl_c), Some(Input::Quit));
        assert_eq!(map_key(&key(KeyCode::Char('q'))), Some(Input::Quit));
    }

    #[test]
    fn unknown_keys_are_ignored() {
        assert_eq!(map_key(&key(KeyCode::Char('x'))), None);
        assert_eq!(map_key(&key(KeyCode::Enter)), None);
        assert_eq!(map_key(&key(KeyCode::Char('c'))), None);
    }

    #[test]
    fn board_fits_and_centres() {
        let grid = Grid::new(20);
        // frame is 42x22 plus a score line
        assert_eq!(board_origin(42, 23, &grid), Some((0, 1)));
        assert_eq!(board_origin(80, 24, &grid), Some((19, 1)));
        assert_eq!(board_origin(41, 30, &grid), None);
        assert_eq!(board_origin(80, 22, &grid), None);
    }

    struct QueuedEvents(VecDeque<Event>);

    impl EventSource for QueuedEvents {
        fn pending(&mut self) -> Result<bool> {
            Ok(!self.0.is_empty())
        }

        fn next(&mut self) -> Result<Event> {
            match self.0.pop_front() {
                Some(ev) => Ok(ev),
                None => bail!("no event queued"),
            }
        }
    }

    #[test]
    fn held_keys_are_discarded_before_the_dialog_waits() {
        let mut events = QueuedEvents(VecDeque::from(vec![
            Event::Key(key(KeyCode::Left)),
            Event::Key(key(KeyCode::Left)),
            Event::Resize(80, 24),
            Event::Key(key(KeyCode::Left)),
        ]));

        assert_eq!(discard_pending(&mut events).unwrap(), 4);
        assert!(events.0.is_empty());
        assert_eq!(discard_pending(&mut events).unwrap(), 0);
    }

    fn buffer_term() -> TermManager<Vec<u8>> {
        TermManager::with_writer(Grid::new(20), 80, 24, Vec::new()).unwrap()
    }

    fn output(term: &TermManager<Vec<u8>>) -> String {
        String::from_utf8_lossy(&term.out).into_owned()
    }

    fn row_text(term: &TermManager<Vec<u8>>, y: TermInt) -> String {
        (0..term.width).filter_map(|x| term.screen_char((x, y))).collect()
    }

    #[test]
    fn too_small_terminal_is_an_error() {
        assert!(TermManager::with_writer(Grid::new(20), 40, 24, Vec::new()).is_err());
    }

    #[test]
    fn logo_shows_while_idle_and_goes_away_when_running() {
        let mut term = buffer_term();
        let mut game = GameLoop::new(Grid::new(20), StdRng::seed_from_u64(3));

        term.draw(&game.frame()).unwrap();
        assert!(term.has_message());

        game.start(Instant::now());
        term.draw(&game.frame()).unwrap();
        assert!(!term.has_message());

        let head = term.cell_pos(game.snake().head());
        assert_eq!(term.screen_char(head), Some('█'));
        let food = term.cell_pos(game.food().unwrap());
        assert_eq!(term.screen_char(food), Some('('));
    }

    #[test]
    fn cells_drawn_under_a_dialog_reappear_when_it_closes() {
        let mut term = buffer_term();
        term.show_message(&["Game Over!", "Your Score: 3"]).unwrap();
        let top_left = term.current_msg.as_ref().unwrap().top_left();
        let pos = (top_left.0 + 1, top_left.1 + 1);

        term.out.clear();
        term.print_at(pos, 'X').unwrap();
        assert!(term.out.is_empty());
        assert_eq!(term.screen_char(pos), Some('X'));

        term.hide_message().unwrap();
        assert!(!term.has_message());
        assert!(output(&term).contains('X'));
    }

    #[test]
    fn score_line_shows_high_score_once_known() {
        let mut term = buffer_term();
        let mut game = GameLoop::new(Grid::new(20), StdRng::seed_from_u64(3));

        let score_row = term.board_origin.1 - 1;

        term.draw(&game.frame()).unwrap();
        assert!(row_text(&term, score_row).contains("SCORE 000"));
        assert!(!row_text(&term, score_row).contains("HIGH"));

        game.reset(RoundResult::Collision);
        term.draw(&game.frame()).unwrap();
        assert!(row_text(&term, score_row).contains("HIGH 000"));
    }
}
