//! Terminal presentation
//!
//! ratatui widgets over session snapshots plus crossterm key mapping. No
//! game rules live here.

pub mod board;
pub mod input;
pub mod menu;
pub mod view;

pub use board::{BoardWidget, columns, format_mm_ss, hud_line, render_lives};
pub use input::{Command, Cursor, Step, help_lines, map_key};
pub use menu::{LEVELS_PER_ROW, LevelGridWidget, ResultPopup, result_lines, title_text};
pub use view::GameView;

#[cfg(test)]
pub(crate) fn line_text(line: &ratatui::text::Line) -> String {
    line.spans.iter().map(|span| span.content.as_ref()).collect()
}

#[cfg(test)]
pub(crate) fn buffer_rows(buf: &ratatui::buffer::Buffer) -> Vec<String> {
    let area = buf.area;
    (area.top()..area.bottom())
        .map(|y| {
            (area.left()..area.right())
                .map(|x| buf[(x, y)].symbol())
                .collect()
        })
        .collect()
}
