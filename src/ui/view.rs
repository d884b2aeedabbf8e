//! Full-screen frame layout

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Margin, Rect},
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

use super::board::{BoardWidget, hud_line};
use super::input::help_lines;
use super::menu::{LevelGridWidget, ResultPopup, title_text};
use crate::session::{LevelEntry, Screen, SessionSnapshot};
use crate::sim::{RoundPhase, Symbol};

/// One frame of the game
pub struct GameView<'a> {
    pub snapshot: &'a SessionSnapshot,
    pub levels: &'a [LevelEntry],
    pub cursor: usize,
    pub reveal: &'a [(usize, Symbol)],
    /// Last message for the player (rejected input, save failures)
    pub status: Option<&'a str>,
    pub show_timer: bool,
    pub show_help: bool,
}

impl GameView<'_> {
    fn header(&self) -> Line<'static> {
        match &self.snapshot.round {
            Some(round) if self.snapshot.screen != Screen::LevelSelect => {
                let elapsed = self.show_timer.then_some(self.snapshot.elapsed_secs);
                hud_line(round, elapsed)
            }
            _ => Line::from(format!(
                "Highest unlocked: level {}",
                self.snapshot.highest_unlocked.ordinal()
            )),
        }
    }

    fn status_line(&self) -> Line<'static> {
        let warn = Style::default().fg(Color::Yellow);
        if let Some(status) = self.status {
            return Line::styled(status.to_string(), warn);
        }
        if self.snapshot.progress_unreadable {
            return Line::styled("Saved progress could not be read (s: retry)", warn);
        }
        if self.snapshot.unsaved_progress {
            return Line::styled("Progress not saved yet (s: retry)", warn);
        }
        match &self.snapshot.round {
            Some(round) if round.phase == RoundPhase::AwaitingSecondFlip => {
                Line::from("Pick a second card")
            }
            _ => Line::from(""),
        }
    }

    fn hints(&self) -> &'static str {
        match self.snapshot.screen {
            Screen::Title => "Enter: play  ?: help  q: quit",
            Screen::LevelSelect => "Arrows: move  Enter: play  b: back  ?: help",
            Screen::Playing => "Arrows: move  Enter: flip  r: restart  m: menu  ?: help",
            Screen::Won => "Enter: next level  m: menu",
            Screen::Lost => "Enter: try again  m: menu",
        }
    }
}

impl Widget for GameView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(3),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .split(area);

        Paragraph::new(self.header())
            .block(Block::default().borders(Borders::ALL).title(" Memory Match "))
            .render(chunks[0], buf);

        let body = chunks[1].inner(Margin::new(1, 1));
        match self.snapshot.screen {
            Screen::Title => Paragraph::new(title_text())
                .alignment(Alignment::Center)
                .render(body, buf),
            Screen::LevelSelect => LevelGridWidget {
                levels: self.levels,
                cursor: self.cursor,
            }
            .render(body, buf),
            Screen::Playing | Screen::Won | Screen::Lost => {
                if let Some(round) = &self.snapshot.round {
                    let mut board = BoardWidget::new(round).reveal(self.reveal);
                    if self.snapshot.screen == Screen::Playing {
                        board = board.cursor(self.cursor);
                    }
                    board.render(body, buf);
                }
                ResultPopup {
                    snapshot: self.snapshot,
                }
                .render(chunks[1], buf);
            }
        }

        self.status_line().render(chunks[2], buf);
        Paragraph::new(self.hints())
            .style(Style::default().fg(Color::DarkGray))
            .render(chunks[3], buf);

        if self.show_help {
            let popup_area = centered_rect(70, 70, area);
            Clear.render(popup_area, buf);
            let lines: Vec<Line> = help_lines().iter().map(|l| Line::from(*l)).collect();
            Paragraph::new(lines)
                .block(Block::default().borders(Borders::ALL).title(" Keys "))
                .render(popup_area, buf);
        }
    }
}

/// Rect of `percent_x` by `percent_y` centered in `r`
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Level, start_round};
    use crate::ui::buffer_rows;

    fn snapshot(screen: Screen) -> SessionSnapshot {
        SessionSnapshot {
            screen,
            highest_unlocked: Level::MIN,
            round: None,
            elapsed_secs: 0,
            can_advance: false,
            unsaved_progress: false,
            progress_unreadable: false,
        }
    }

    fn draw(view: GameView) -> String {
        let area = Rect::new(0, 0, 60, 20);
        let mut buf = Buffer::empty(area);
        view.render(area, &mut buf);
        buffer_rows(&buf).join("\n")
    }

    fn view<'a>(snapshot: &'a SessionSnapshot, levels: &'a [LevelEntry]) -> GameView<'a> {
        GameView {
            snapshot,
            levels,
            cursor: 0,
            reveal: &[],
            status: None,
            show_timer: true,
            show_help: false,
        }
    }

    #[test]
    fn test_title_frame() {
        let snapshot = snapshot(Screen::Title);
        let screen = draw(view(&snapshot, &[]));
        assert!(screen.contains("MEMORY MATCH"));
        assert!(screen.contains("Enter: play"));
    }

    #[test]
    fn test_unreadable_progress_is_shown() {
        let mut snapshot = snapshot(Screen::LevelSelect);
        snapshot.progress_unreadable = true;
        let screen = draw(view(&snapshot, &[]));
        assert!(screen.contains("could not be read"));
    }

    #[test]
    fn test_status_takes_precedence() {
        let mut snapshot = snapshot(Screen::LevelSelect);
        snapshot.unsaved_progress = true;
        let mut frame = view(&snapshot, &[]);
        frame.status = Some("level 3 is locked");
        let screen = draw(frame);
        assert!(screen.contains("level 3 is locked"));
        assert!(!screen.contains("not saved"));
    }

    #[test]
    fn test_playing_frame_shows_board_and_timer() {
        let round = start_round(Level::new(3).unwrap(), 5);
        let mut snapshot = snapshot(Screen::Playing);
        snapshot.round = Some(round.view());
        snapshot.elapsed_secs = 61;
        let screen = draw(view(&snapshot, &[]));
        assert!(screen.contains("Level 2 (3 pairs)"));
        assert!(screen.contains("01:01"));
        assert_eq!(screen.matches("[ ]").count(), 6);
    }

    #[test]
    fn test_help_overlay() {
        let snapshot = snapshot(Screen::Playing);
        let mut frame = view(&snapshot, &[]);
        frame.show_help = true;
        assert!(draw(frame).contains("toggle this help"));
    }
}
