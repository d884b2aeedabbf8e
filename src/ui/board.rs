//! Board and HUD widgets

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::sim::{CardFace, RoundView, Symbol};

/// Hearts are drawn individually up to this budget, as a count above it
const MAX_HEART_ICONS: u32 = 10;

/// Format seconds as MM:SS
pub fn format_mm_ss(total_secs: u64) -> String {
    format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
}

/// Cards per row for a board of `cards` cards
pub fn columns(cards: usize) -> usize {
    match cards {
        0..=4 => 2,
        5..=12 => 4,
        13..=30 => 6,
        _ => 8,
    }
}

/// Lives text: filled hearts for remaining lives, hollow for spent ones
pub fn render_lives(remaining: u32, budget: u32) -> String {
    if budget > MAX_HEART_ICONS {
        return format!("Lives {remaining}/{budget}");
    }
    let spent = budget.saturating_sub(remaining) as usize;
    format!(
        "Lives {}{}",
        "♥".repeat(remaining as usize),
        "♡".repeat(spent)
    )
}

/// HUD line above the board
pub fn hud_line(view: &RoundView, elapsed_secs: Option<u64>) -> Line<'static> {
    let mut spans = vec![
        Span::styled(
            format!("Level {}", view.level.ordinal()),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(" ({} pairs)  ", view.level.pair_count())),
        Span::styled(
            render_lives(view.remaining_lives, view.level.mistake_budget()),
            Style::default().fg(Color::Red),
        ),
    ];
    if let Some(secs) = elapsed_secs {
        spans.push(Span::styled(
            format!("  {}", format_mm_ss(secs)),
            Style::default().fg(Color::Cyan),
        ));
    }
    Line::from(spans)
}

/// Card grid.
///
/// `reveal` lists cards to show face up regardless of state (a mismatched
/// pair that was just turned back down).
pub struct BoardWidget<'a> {
    pub view: &'a RoundView,
    pub reveal: &'a [(usize, Symbol)],
    pub cursor: Option<usize>,
}

impl<'a> BoardWidget<'a> {
    pub fn new(view: &'a RoundView) -> Self {
        Self {
            view,
            reveal: &[],
            cursor: None,
        }
    }

    pub fn reveal(mut self, reveal: &'a [(usize, Symbol)]) -> Self {
        self.reveal = reveal;
        self
    }

    pub fn cursor(mut self, cursor: usize) -> Self {
        self.cursor = Some(cursor);
        self
    }

    fn card(&self, index: usize, face: &CardFace) -> Span<'static> {
        let revealed = self
            .reveal
            .iter()
            .find(|(i, _)| *i == index)
            .map(|(_, s)| *s);
        let (text, style) = match (face, revealed) {
            (CardFace::Solved(s), _) => (format!("({s})"), Style::default().fg(Color::Green)),
            (CardFace::Up(s), _) => (
                format!("[{s}]"),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            (CardFace::Down, Some(s)) => (
                format!("[{s}]"),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            (CardFace::Down, None) => ("[ ]".to_string(), Style::default().fg(Color::Gray)),
        };
        let style = if self.cursor == Some(index) {
            style.add_modifier(Modifier::REVERSED)
        } else {
            style
        };
        Span::styled(text, style)
    }

    pub fn lines(&self) -> Vec<Line<'static>> {
        let cols = columns(self.view.cards.len());
        self.view
            .cards
            .chunks(cols)
            .enumerate()
            .map(|(row, faces)| {
                let mut spans = Vec::with_capacity(faces.len() * 2);
                for (col, face) in faces.iter().enumerate() {
                    if col > 0 {
                        spans.push(Span::raw(" "));
                    }
                    spans.push(self.card(row * cols + col, face));
                }
                Line::from(spans)
            })
            .collect()
    }
}

impl Widget for BoardWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Paragraph::new(self.lines())
            .alignment(Alignment::Center)
            .render(area, buf);
    }
}
