use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use unicode_width::UnicodeWidthChar;

use super::app_state::App;
use crate::input::input_render::{self, INPUT_HEIGHT};

pub const TITLE: &str = "Codeforces Problem Recommender";
pub const BUTTON_CAPTION: &str = "Get Recommendations";
pub const BUTTON_LOADING_CAPTION: &str = "Loading...";
pub const REQUIRED_HINT: &str = "Please fill out this field.";
const RESULTS_HEADING: &str = " Recommended Problems ";
const KEY_HELP: &str = " Enter: submit  ↑/↓ PgUp/PgDn: scroll  Esc: quit ";

/// Widest the form column grows
const FORM_MAX_WIDTH: u16 = 64;
const BUTTON_HEIGHT: u16 = 3;
/// Rows the results list needs to show its border and one item
const RESULTS_MIN_HEIGHT: u16 = 3;

impl App {
    pub fn render(&mut self, frame: &mut Frame) {
        let [body_area, footer_area] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(frame.area());

        let column = centered_column(body_area, FORM_MAX_WIDTH);

        // Pre-wrapped so the area is exactly as tall as the message
        let error_lines = self
            .recommender
            .error
            .as_deref()
            .map(|error| wrap_to_width(error, column.width as usize))
            .unwrap_or_default();
        let error_height = u16::try_from(error_lines.len()).unwrap_or(u16::MAX);
        let [
            title_area,
            _,
            input_area,
            hint_area,
            button_area,
            error_area,
            results_area,
        ] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(INPUT_HEIGHT),
            Constraint::Length(1),
            Constraint::Length(BUTTON_HEIGHT),
            Constraint::Length(error_height),
            Constraint::Min(0),
        ])
        .areas(column);

        render_title(frame, title_area);
        input_render::render_field(self, frame, input_area);
        if self.show_required_hint {
            frame.render_widget(
                Paragraph::new(REQUIRED_HINT).style(Style::default().fg(Color::Yellow)),
                hint_area,
            );
        }
        render_button(self, frame, button_area);
        if !error_lines.is_empty() {
            let lines: Vec<Line> = error_lines.into_iter().map(Line::from).collect();
            frame.render_widget(
                Paragraph::new(lines).style(Style::default().fg(Color::Red)),
                error_area,
            );
        }
        let results_shown = render_results(self, frame, results_area);
        render_footer(self, frame, footer_area, results_shown);
    }
}

/// Horizontally centre a column at most `max_width` wide
fn centered_column(area: Rect, max_width: u16) -> Rect {
    let width = area.width.min(max_width);
    let x = area.x + (area.width - width) / 2;
    Rect { x, width, ..area }
}

fn render_title(frame: &mut Frame, area: Rect) {
    let title = Paragraph::new(TITLE)
        .alignment(Alignment::Center)
        .style(Style::default().add_modifier(Modifier::BOLD));
    frame.render_widget(title, area);
}

/// The submit button; dimmed while a request is pending but still live
fn render_button(app: &App, frame: &mut Frame, area: Rect) {
    let (caption, style) = if app.recommender.is_loading() {
        (
            BUTTON_LOADING_CAPTION,
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::DIM),
        )
    } else {
        (
            BUTTON_CAPTION,
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )
    };

    let button = Paragraph::new(caption)
        .alignment(Alignment::Center)
        .style(style)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Blue)),
        );
    frame.render_widget(button, area);
}

/// Draw the results list; returns false if there was no room for it
fn render_results(app: &mut App, frame: &mut Frame, area: Rect) -> bool {
    if app.recommender.recommendations.is_empty() {
        app.results_viewport_height = 0;
        return true;
    }
    if area.height < RESULTS_MIN_HEIGHT {
        app.results_viewport_height = 0;
        return false;
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .title(RESULTS_HEADING)
        .border_style(Style::default().fg(Color::Cyan));
    let inner_width = area.width.saturating_sub(2) as usize;

    app.results_viewport_height = area.height.saturating_sub(2);
    app.results_scroll = app.results_scroll.min(app.max_scroll());

    let lines: Vec<Line> = app
        .recommender
        .recommendations
        .iter()
        .skip(app.results_scroll as usize)
        .take(app.results_viewport_height as usize)
        .map(|item| Line::from(truncate_to_width(item, inner_width)))
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
    true
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect, results_shown: bool) {
    let mut spans = vec![Span::styled(KEY_HELP, Style::default().fg(Color::DarkGray))];
    if !results_shown {
        spans.push(Span::styled(
            hidden_results_notice(app.recommender.recommendations.len()),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ));
    }
    match &app.status_message {
        Some(message) => spans.push(Span::styled(
            message.as_str(),
            Style::default().fg(Color::Yellow),
        )),
        None => spans.push(Span::styled(
            app.endpoint.as_str(),
            Style::default().fg(Color::DarkGray),
        )),
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Footer text when the list has no room on screen
pub(crate) fn hidden_results_notice(count: usize) -> String {
    let noun = if count == 1 { "result" } else { "results" };
    format!("{} {} (enlarge terminal) ", count, noun)
}

/// Break `text` into lines of at most `width` display columns
///
/// Lines break at spaces where possible; a word wider than the line is
/// split across lines. Nothing is dropped except the spaces broken at.
pub(crate) fn wrap_to_width(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return Vec::new();
    }

    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut line = String::new();
        let mut used = 0;

        for word in paragraph.split(' ') {
            let word_width: usize = word.chars().map(|c| c.width().unwrap_or(0)).sum();
            if used > 0 && used + 1 + word_width <= width {
                line.push(' ');
                line.push_str(word);
                used += 1 + word_width;
                continue;
            }
            if used > 0 {
                lines.push(std::mem::take(&mut line));
                used = 0;
            }
            for c in word.chars() {
                let w = c.width().unwrap_or(0);
                if used > 0 && used + w > width {
                    lines.push(std::mem::take(&mut line));
                    used = 0;
                }
                line.push(c);
                used += w;
            }
        }

        lines.push(line);
    }
    lines
}

/// Cut `text` to at most `max_width` display columns, marking the cut with '…'
pub(crate) fn truncate_to_width(text: &str, max_width: usize) -> String {
    let total: usize = text.chars().map(|c| c.width().unwrap_or(0)).sum();
    if total <= max_width {
        return text.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let budget = max_width - 1;
    let mut used = 0;
    let mut out = String::new();
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push('…');
    out
}

#[cfg(test)]
#[path = "app_render_tests.rs"]
mod app_render_tests;
