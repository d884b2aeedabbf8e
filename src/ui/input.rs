//! Key mapping and grid cursor
//!
//! Keys mean different things per screen: Enter starts the game on the
//! title, picks a level or flips a card, moves on after a win and retries
//! after a loss.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::session::Screen;

/// Cursor movement on a grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Left,
    Right,
    Up,
    Down,
}

/// A player intent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Move(Step),
    /// Pick the level or card under the cursor
    Confirm,
    Restart,
    Next,
    Menu,
    Back,
    RetrySave,
    Help,
    Quit,
}

pub fn map_key(key: KeyEvent, screen: Screen) -> Option<Command> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Command::Quit);
    }

    let command = match key.code {
        KeyCode::Left | KeyCode::Char('h') => Command::Move(Step::Left),
        KeyCode::Right | KeyCode::Char('l') => Command::Move(Step::Right),
        KeyCode::Up | KeyCode::Char('k') => Command::Move(Step::Up),
        KeyCode::Down | KeyCode::Char('j') => Command::Move(Step::Down),
        KeyCode::Enter | KeyCode::Char(' ') => match screen {
            Screen::Title => Command::Start,
            Screen::LevelSelect | Screen::Playing => Command::Confirm,
            Screen::Won => Command::Next,
            Screen::Lost => Command::Restart,
        },
        KeyCode::Esc => match screen {
            Screen::Title => Command::Quit,
            Screen::LevelSelect => Command::Back,
            _ => Command::Menu,
        },
        KeyCode::Backspace | KeyCode::Char('b') => Command::Back,
        KeyCode::Char('r') => Command::Restart,
        KeyCode::Char('n') => Command::Next,
        KeyCode::Char('m') => Command::Menu,
        KeyCode::Char('s') => Command::RetrySave,
        KeyCode::Char('?') => Command::Help,
        KeyCode::Char('q') => Command::Quit,
        _ => return None,
    };
    Some(command)
}

/// Selection over `len` items laid out `cols` per row
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    pub index: usize,
}

impl Cursor {
    pub fn at(index: usize) -> Self {
        Self { index }
    }

    pub fn step(&mut self, step: Step, len: usize, cols: usize) {
        if len == 0 {
            self.index = 0;
            return;
        }
        let cols = cols.max(1);
        let i = self.index.min(len - 1);
        self.index = match step {
            Step::Left => i.saturating_sub(1),
            Step::Right => (i + 1).min(len - 1),
            Step::Up => i.checked_sub(cols).unwrap_or(i),
            Step::Down if i + cols < len => i + cols,
            Step::Down => i,
        };
    }
}

pub fn help_lines() -> &'static [&'static str] {
    &[
        "Arrows / hjkl  move",
        "Enter / Space  pick level, flip card",
        "r              restart the level",
        "n              next level after a win",
        "m / Esc        back to the level list",
        "b              back to the title screen",
        "s              retry saving or loading progress",
        "?              toggle this help",
        "q              quit",
    ]
}
