//! Input field rendering
//!
//! Draws the labelled handle field with a block cursor, or the placeholder
//! when the field is empty.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::app::App;

pub const INPUT_LABEL: &str = " Codeforces Handle ";
pub const INPUT_PLACEHOLDER: &str = "Enter your handle (e.g., Hamim99)";
/// Height of the bordered input field
pub const INPUT_HEIGHT: u16 = 3;

/// Render the handle input field
pub fn render_field(app: &mut App, frame: &mut Frame, area: Rect) {
    let viewport_width = area.width.saturating_sub(2) as usize;
    app.input.calculate_scroll_offset(viewport_width);

    let border_color = if app.show_required_hint {
        Color::Yellow
    } else {
        Color::Cyan
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(INPUT_LABEL)
        .border_style(Style::default().fg(border_color));

    let cursor_style = Style::default().add_modifier(Modifier::REVERSED);

    let line = if app.input.is_empty() {
        Line::from(vec![
            Span::styled(" ", cursor_style),
            Span::styled(INPUT_PLACEHOLDER, Style::default().fg(Color::DarkGray)),
        ])
    } else {
        let visible: Vec<char> = app
            .input
            .handle()
            .chars()
            .skip(app.input.scroll_offset)
            .take(viewport_width)
            .collect();
        let cursor_in_viewport = app
            .input
            .cursor_col()
            .saturating_sub(app.input.scroll_offset);
        Line::from(spans_with_cursor(&visible, cursor_in_viewport, cursor_style))
    };

    frame.render_widget(Paragraph::new(line).block(block), area);
}

/// Split visible text around the cursor, styling the character under it
fn spans_with_cursor(visible: &[char], cursor: usize, cursor_style: Style) -> Vec<Span<'static>> {
    let before: String = visible.iter().take(cursor).collect();
    let under = visible
        .get(cursor)
        .map(|c| c.to_string())
        .unwrap_or_else(|| " ".to_string());
    let after: String = visible.iter().skip(cursor + 1).collect();

    let mut spans = Vec::with_capacity(3);
    if !before.is_empty() {
        spans.push(Span::raw(before));
    }
    spans.push(Span::styled(under, cursor_style));
    if !after.is_empty() {
        spans.push(Span::raw(after));
    }
    spans
}

#[cfg(test)]
#[path = "input_render_tests.rs"]
mod input_render_tests;
