//! Title, level select, and result screens

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Margin, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

use super::view::centered_rect;
use crate::session::{LevelEntry, SessionSnapshot};
use crate::sim::RoundPhase;

pub const LEVELS_PER_ROW: usize = 6;

pub fn title_text() -> Text<'static> {
    Text::from(vec![
        Line::from(Span::styled(
            "MEMORY MATCH",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("Find every pair before you run out of lives."),
        Line::from(""),
        Line::from("Press Enter to play, q to quit"),
    ])
}

/// Level grid: unlocked levels by number, locked ones as a padlock
pub struct LevelGridWidget<'a> {
    pub levels: &'a [LevelEntry],
    pub cursor: usize,
}

impl LevelGridWidget<'_> {
    pub fn lines(&self) -> Vec<Line<'static>> {
        self.levels
            .chunks(LEVELS_PER_ROW)
            .enumerate()
            .map(|(row, entries)| {
                let mut spans = Vec::with_capacity(entries.len() * 2);
                for (col, entry) in entries.iter().enumerate() {
                    if col > 0 {
                        spans.push(Span::raw(" "));
                    }
                    let (text, style) = if entry.unlocked {
                        (
                            format!("[{:>2}]", entry.level.ordinal()),
                            Style::default().fg(Color::Cyan),
                        )
                    } else {
                        ("[🔒]".to_string(), Style::default().fg(Color::DarkGray))
                    };
                    let style = if row * LEVELS_PER_ROW + col == self.cursor {
                        style.add_modifier(Modifier::REVERSED)
                    } else {
                        style
                    };
                    spans.push(Span::styled(text, style));
                }
                Line::from(spans)
            })
            .collect()
    }
}

impl Widget for LevelGridWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut lines = vec![Line::from("Select a level"), Line::from("")];
        lines.extend(self.lines());
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .render(area, buf);
    }
}

/// Win/lose modal text with the actions available
pub fn result_lines(snapshot: &SessionSnapshot) -> Option<Vec<Line<'static>>> {
    let round = snapshot.round.as_ref()?;
    let mut lines = Vec::new();
    match round.phase {
        RoundPhase::Won => {
            lines.push(Line::from(Span::styled(
                "WIN!",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(format!("{} mistakes", round.mistakes)));
            if snapshot.unsaved_progress {
                lines.push(Line::from(Span::styled(
                    "Progress could not be saved (s: retry)",
                    Style::default().fg(Color::Yellow),
                )));
            }
            lines.push(Line::from(""));
            if snapshot.can_advance {
                lines.push(Line::from("Enter: next level   m: menu"));
            } else {
                lines.push(Line::from("All levels cleared!   m: menu"));
            }
        }
        RoundPhase::Lost => {
            lines.push(Line::from(Span::styled(
                "You Lose!",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(""));
            lines.push(Line::from("Enter: try again   m: menu"));
        }
        _ => return None,
    }
    Some(lines)
}

/// Result modal drawn over the board
pub struct ResultPopup<'a> {
    pub snapshot: &'a SessionSnapshot,
}

impl Widget for ResultPopup<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let Some(lines) = result_lines(self.snapshot) else {
            return;
        };
        let popup_area = centered_rect(60, 60, area);
        Clear.render(popup_area, buf);
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .render(popup_area, buf);
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .render(popup_area.inner(Margin::new(1, 1)), buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Screen;
    use crate::sim::{Deck, Level, RoundState, Symbol};
    use crate::ui::line_text;

    fn entries(unlocked_through: u8) -> Vec<LevelEntry> {
        Level::all()
            .take(8)
            .map(|level| LevelEntry {
                level,
                unlocked: level.get() <= unlocked_through,
            })
            .collect()
    }

    #[test]
    fn test_level_grid() {
        let levels = entries(3);
        let grid = LevelGridWidget {
            levels: &levels,
            cursor: 1,
        };
        let rows: Vec<String> = grid.lines().iter().map(line_text).collect();
        assert_eq!(rows[0], "[ 1] [ 2] [🔒] [🔒] [🔒] [🔒]");
        assert_eq!(rows[1], "[🔒] [🔒]");

        let lines = grid.lines();
        assert!(lines[0].spans[2].style.add_modifier.contains(Modifier::REVERSED));
    }

    #[test]
    fn test_result_screens() {
        let mut round = RoundState::with_deck(
            Level::MIN,
            0,
            Deck::from_symbols(vec![Symbol(0), Symbol(0), Symbol(1), Symbol(1)]).unwrap(),
        );
        round.phase = RoundPhase::Lost;
        let mut snapshot = SessionSnapshot {
            screen: Screen::Lost,
            highest_unlocked: Level::MIN,
            round: Some(round.view()),
            elapsed_secs: 0,
            can_advance: false,
            unsaved_progress: false,
            progress_unreadable: false,
        };
        let text = |s: &SessionSnapshot| -> String {
            result_lines(s)
                .unwrap()
                .iter()
                .map(line_text)
                .collect::<Vec<_>>()
                .join("\n")
        };
        assert!(text(&snapshot).contains("try again"));

        round.phase = RoundPhase::Won;
        snapshot.round = Some(round.view());
        snapshot.can_advance = true;
        snapshot.unsaved_progress = true;
        let won = text(&snapshot);
        assert!(won.contains("next level"));
        assert!(won.contains("retry"));

        round.phase = RoundPhase::AwaitingFirstFlip;
        snapshot.round = Some(round.view());
        assert!(result_lines(&snapshot).is_none());
    }
}
