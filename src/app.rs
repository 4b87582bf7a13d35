//! Interactive terminal front-end
//!
//! Reads grid snapshots from the [`Controller`] and turns key and mouse events
//! into controller commands. It never touches cells directly.

use crate::config::Speed;
use crate::controller::Controller;
use crate::error::Result;
use crate::input::SizeField;
use crate::terminal::Terminal;
use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::style::Color;
use std::io;
use std::time::{Duration, Instant};
use tracing::{info, warn};

const LIVE_COLOR: Color = Color::Magenta;
const DEAD_COLOR: Color = Color::DarkGrey;
const CURSOR_COLOR: Color = Color::Yellow;
const BORDER_COLOR: Color = Color::Grey;
/// Longest the loop sleeps when no tick is pending
const IDLE_POLL: Duration = Duration::from_millis(250);

const KEY_HINTS: &str =
    "Space start/stop  n step  r random  c clear  t toggle  1-3 speed  z cell size  g resize  q quit";

/// On-screen width of a cell (presentation only)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CellSize {
    Small,
    #[default]
    Large,
}

impl CellSize {
    fn columns(self) -> u16 {
        match self {
            CellSize::Small => 1,
            CellSize::Large => 2,
        }
    }

    fn toggled(self) -> Self {
        match self {
            CellSize::Small => CellSize::Large,
            CellSize::Large => CellSize::Small,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FormField {
    Rows,
    Cols,
}

/// The "update grid" form: two size fields, submitted together
struct SizeForm {
    rows: SizeField,
    cols: SizeField,
    focus: FormField,
}

impl SizeForm {
    fn focused(&mut self) -> &mut SizeField {
        match self.focus {
            FormField::Rows => &mut self.rows,
            FormField::Cols => &mut self.cols,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum Action {
    Continue,
    Quit,
}

pub struct App {
    controller: Controller,
    cursor: (usize, usize),
    cell_size: CellSize,
    form: Option<SizeForm>,
    message: Option<String>,
}

impl App {
    pub fn new(controller: Controller) -> Self {
        Self {
            controller,
            cursor: (0, 0),
            cell_size: CellSize::default(),
            form: None,
            message: None,
        }
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    pub fn handle_event(&mut self, event: Event, now: Instant) -> Action {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key, now),
            Event::Mouse(mouse) => {
                self.handle_mouse(mouse);
                Action::Continue
            }
            _ => Action::Continue,
        }
    }

    fn handle_key(&mut self, key: KeyEvent, now: Instant) -> Action {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Action::Quit;
        }
        if self.form.is_some() {
            self.handle_form_key(key.code);
            return Action::Continue;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return Action::Quit,
            KeyCode::Char(' ') => self.controller.toggle_running(now),
            KeyCode::Char('n') | KeyCode::Char('.') => self.controller.step(),
            KeyCode::Char('r') => {
                let result = self.controller.randomize();
                self.report(result);
            }
            KeyCode::Char('c') => self.controller.clear(),
            KeyCode::Up | KeyCode::Char('k') => self.move_cursor(-1, 0),
            KeyCode::Down | KeyCode::Char('j') => self.move_cursor(1, 0),
            KeyCode::Left | KeyCode::Char('h') => self.move_cursor(0, -1),
            KeyCode::Right | KeyCode::Char('l') => self.move_cursor(0, 1),
            KeyCode::Enter | KeyCode::Char('t') => {
                let (row, col) = self.cursor;
                let result = self.controller.toggle_cell(row as i64, col as i64);
                self.report(result);
            }
            KeyCode::Char('1') => self.controller.set_speed(Speed::Slow),
            KeyCode::Char('2') => self.controller.set_speed(Speed::Medium),
            KeyCode::Char('3') => self.controller.set_speed(Speed::Fast),
            KeyCode::Char('z') => self.cell_size = self.cell_size.toggled(),
            KeyCode::Char('g') => {
                let dims = self.controller.grid().dimensions();
                self.form = Some(SizeForm {
                    rows: SizeField::new(dims.rows),
                    cols: SizeField::new(dims.cols),
                    focus: FormField::Rows,
                });
            }
            _ => {}
        }
        Action::Continue
    }

    fn handle_form_key(&mut self, code: KeyCode) {
        let Some(form) = self.form.as_mut() else {
            return;
        };
        match code {
            KeyCode::Esc => self.form = None,
            KeyCode::Tab | KeyCode::BackTab => {
                form.focus = match form.focus {
                    FormField::Rows => FormField::Cols,
                    FormField::Cols => FormField::Rows,
                };
            }
            KeyCode::Backspace => form.focused().backspace(),
            KeyCode::Char(ch) => {
                let result = form.focused().push(ch);
                self.report(result);
            }
            KeyCode::Enter => {
                let (rows, cols) = (form.rows.value(), form.cols.value());
                self.form = None;
                match self.controller.resize(rows as i64, cols as i64) {
                    Ok(_) => {
                        self.message = None;
                        self.clamp_cursor();
                    }
                    Err(err) => self.report(Err(err)),
                }
            }
            _ => {}
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return;
        }
        if let Some((row, col)) = self.cell_at(mouse.column, mouse.row) {
            self.cursor = (row, col);
            let result = self.controller.toggle_cell(row as i64, col as i64);
            self.report(result);
        }
    }

    /// Surface a rejected command in the status line; state is already unchanged
    fn report(&mut self, result: Result<()>) {
        match result {
            Ok(()) => self.message = None,
            Err(err) => {
                warn!(%err, "command rejected");
                self.message = Some(err.to_string());
            }
        }
    }

    fn move_cursor(&mut self, dr: isize, dc: isize) {
        let dims = self.controller.grid().dimensions();
        let (row, col) = self.cursor;
        let row = row.saturating_add_signed(dr).min(dims.rows.saturating_sub(1));
        let col = col.saturating_add_signed(dc).min(dims.cols.saturating_sub(1));
        self.cursor = (row, col);
    }

    fn clamp_cursor(&mut self) {
        self.move_cursor(0, 0);
    }

    /// Map a screen position to a grid cell. The grid sits inside a border at (1, 1).
    fn cell_at(&self, x: u16, y: u16) -> Option<(usize, usize)> {
        let dims = self.controller.grid().dimensions();
        let x = x.checked_sub(1)?;
        let y = y.checked_sub(1)?;
        let row = y as usize;
        let col = (x / self.cell_size.columns()) as usize;
        (row < dims.rows && col < dims.cols).then_some((row, col))
    }

    pub fn draw(&self, term: &mut Terminal) {
        let grid = self.controller.grid();
        let width = self.cell_size.columns();
        let inner_w = grid.cols() as i32 * width as i32;
        let inner_h = grid.rows() as i32;

        draw_border(term, inner_w + 2, inner_h + 2);

        for (r, row) in grid.iter_rows().enumerate() {
            for (c, &alive) in row.iter().enumerate() {
                let is_cursor = self.cursor == (r, c);
                let (ch, color) = match (alive, is_cursor) {
                    (true, false) => ('█', LIVE_COLOR),
                    (false, false) => ('·', DEAD_COLOR),
                    (true, true) => ('█', CURSOR_COLOR),
                    (false, true) => ('▒', CURSOR_COLOR),
                };
                let x = 1 + c as i32 * width as i32;
                let y = 1 + r as i32;
                term.set(x, y, ch, Some(color), false);
                if width == 2 {
                    let fill = if alive { ch } else { ' ' };
                    term.set(x + 1, y, fill, Some(color), false);
                }
            }
        }

        let state = self.controller.state();
        let footer = inner_h + 2;
        let (label, label_color) = if state.running {
            ("● RUNNING", Color::Green)
        } else {
            ("■ IDLE", Color::Red)
        };
        term.set_str(0, footer, label, Some(label_color), true);
        let status = format!(
            "  gen {}  |  {}  |  {} ({} ms)  |  alive {}",
            state.generation,
            state.dimensions,
            state.speed,
            state.tick_interval.as_millis(),
            grid.alive_count()
        );
        term.set_str(label.chars().count() as i32, footer, &status, Some(Color::Grey), false);
        term.set_str(0, footer + 1, KEY_HINTS, Some(Color::DarkGrey), false);

        if let Some(form) = &self.form {
            let field = |name: &str, value: &SizeField, focused: bool| {
                let marker = if focused { '>' } else { ' ' };
                format!("{marker}{name}: [{:>3}] ", value.text())
            };
            let line = format!(
                "{}{}  Tab switch  Enter apply  Esc cancel  (max 100)",
                field("Rows", &form.rows, form.focus == FormField::Rows),
                field("Cols", &form.cols, form.focus == FormField::Cols),
            );
            term.set_str(0, footer + 2, &line, Some(Color::White), true);
        } else if let Some(message) = &self.message {
            term.set_str(0, footer + 2, message, Some(Color::Red), false);
        }
    }
}

fn draw_border(term: &mut Terminal, width: i32, height: i32) {
    let right = width - 1;
    let bottom = height - 1;
    for x in 1..right {
        term.set(x, 0, '─', Some(BORDER_COLOR), false);
        term.set(x, bottom, '─', Some(BORDER_COLOR), false);
    }
    for y in 1..bottom {
        term.set(0, y, '│', Some(BORDER_COLOR), false);
        term.set(right, y, '│', Some(BORDER_COLOR), false);
    }
    term.set(0, 0, '┌', Some(BORDER_COLOR), false);
    term.set(right, 0, '┐', Some(BORDER_COLOR), false);
    term.set(0, bottom, '└', Some(BORDER_COLOR), false);
    term.set(right, bottom, '┘', Some(BORDER_COLOR), false);
}

/// Run the interactive simulator until the user quits
pub fn run(controller: Controller) -> io::Result<()> {
    let mut term = Terminal::new()?;
    term.clear_screen()?;
    let mut app = App::new(controller);
    info!(dimensions = %app.controller.grid().dimensions(), "interactive session started");

    loop {
        app.controller.poll(Instant::now());

        term.clear();
        app.draw(&mut term);
        term.present()?;

        let timeout = app
            .controller
            .next_deadline()
            .map(|due| due.saturating_duration_since(Instant::now()))
            .unwrap_or(IDLE_POLL)
            .min(IDLE_POLL);

        match term.poll_event(timeout)? {
            Some(Event::Resize(w, h)) => {
                term.resize(w, h);
                term.clear_screen()?;
            }
            Some(event) => {
                if app.handle_event(event, Instant::now()) == Action::Quit {
                    break;
                }
            }
            None => {}
        }
    }

    info!(generation = app.controller.state().generation, "interactive session ended");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use crossterm::event::KeyEventState;
    use crate::grid::Dimensions;

    fn app() -> App {
        App::new(Controller::new(SimConfig {
            seed: Some(3),
            ..SimConfig::default()
        }))
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        })
    }

    fn press(app: &mut App, codes: &[KeyCode]) {
        let now = Instant::now();
        for &code in codes {
            app.handle_event(key(code), now);
        }
    }

    fn click(column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn space_toggles_run_state() {
        let mut app = app();
        press(&mut app, &[KeyCode::Char(' ')]);
        assert!(app.controller().is_running());
        press(&mut app, &[KeyCode::Char(' ')]);
        assert!(!app.controller().is_running());
    }

    #[test]
    fn quit_keys() {
        let mut app = app();
        assert_eq!(app.handle_event(key(KeyCode::Char('q')), Instant::now()), Action::Quit);
        assert_eq!(app.handle_event(key(KeyCode::Esc), Instant::now()), Action::Quit);
    }

    #[test]
    fn cursor_toggle_and_bounds() {
        let mut app = app();
        press(&mut app, &[KeyCode::Down, KeyCode::Right, KeyCode::Enter]);
        assert_eq!(app.controller().grid().get(1, 1), Some(true));

        // Cursor stops at the edge instead of wrapping
        press(&mut app, &[KeyCode::Up, KeyCode::Up, KeyCode::Up, KeyCode::Char('t')]);
        assert_eq!(app.controller().grid().get(0, 1), Some(true));
    }

    #[test]
    fn speed_keys() {
        let mut app = app();
        press(&mut app, &[KeyCode::Char('3')]);
        assert_eq!(app.controller().state().speed, Speed::Fast);
        press(&mut app, &[KeyCode::Char('1')]);
        assert_eq!(app.controller().state().speed, Speed::Slow);
    }

    #[test]
    fn resize_form_submits_normalized_size() {
        let mut app = app();
        press(
            &mut app,
            &[
                KeyCode::Char('g'),
                KeyCode::Backspace,
                KeyCode::Backspace,
                KeyCode::Char('0'),
                KeyCode::Char('1'),
                KeyCode::Char('2'),
                KeyCode::Tab,
                KeyCode::Char('5'),
                KeyCode::Char('0'),
                KeyCode::Char('0'),
                KeyCode::Enter,
            ],
        );
        // rows typed as "012" become 12, cols grow past the cap and clamp to 100
        assert_eq!(app.controller().grid().dimensions(), Dimensions::new(12, 100));
        assert!(app.form.is_none());
    }

    #[test]
    fn resize_form_rejects_letters() {
        let mut app = app();
        press(&mut app, &[KeyCode::Char('g'), KeyCode::Char('x')]);
        assert!(app.message.is_some());
        assert_eq!(app.form.as_ref().map(|f| f.rows.value()), Some(30));
        press(&mut app, &[KeyCode::Esc]);
        assert!(app.form.is_none());
        assert_eq!(app.controller().grid().dimensions(), Dimensions::new(30, 30));
    }

    #[test]
    fn resize_to_zero_then_toggle_reports_error() {
        let mut app = app();
        press(
            &mut app,
            &[
                KeyCode::Char('g'),
                KeyCode::Backspace,
                KeyCode::Backspace,
                KeyCode::Enter,
                KeyCode::Enter,
            ],
        );
        assert_eq!(app.controller().grid().rows(), 0);
        assert!(app.message.as_deref().is_some_and(|m| m.contains("outside")));
    }

    #[test]
    fn click_toggles_cell_under_pointer() {
        let mut app = app();
        // Large cells are two columns wide, offset by the border
        app.handle_event(click(5, 3), Instant::now());
        assert_eq!(app.controller().grid().get(2, 2), Some(true));
        assert_eq!(app.cursor, (2, 2));

        press(&mut app, &[KeyCode::Char('z')]);
        app.handle_event(click(5, 3), Instant::now());
        assert_eq!(app.controller().grid().get(2, 4), Some(true));
    }

    #[test]
    fn click_on_border_is_ignored() {
        let mut app = app();
        app.handle_event(click(0, 0), Instant::now());
        app.handle_event(click(200, 5), Instant::now());
        assert!(app.controller().grid().is_empty());
    }
}
