use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tui_textarea::TextArea;

/// Single-line handle input
pub struct InputState {
    pub textarea: TextArea<'static>,
    pub scroll_offset: usize,
}

impl InputState {
    pub fn new() -> Self {
        Self {
            textarea: TextArea::default(),
            scroll_offset: 0,
        }
    }

    /// Current handle text
    pub fn handle(&self) -> &str {
        self.textarea.lines()[0].as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.handle().is_empty()
    }

    /// Replace the contents (used for `--handle`)
    pub fn set_handle(&mut self, handle: &str) {
        self.textarea = TextArea::default();
        self.textarea.insert_str(&single_line(handle));
        self.scroll_offset = 0;
    }

    /// Forward an editing key to the textarea
    ///
    /// Returns true if the text changed. Keys that would open a second line
    /// are swallowed.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let opens_line = matches!(key.code, KeyCode::Enter)
            || (ctrl && matches!(key.code, KeyCode::Char('m') | KeyCode::Char('j')));
        if opens_line {
            return false;
        }
        self.textarea.input(key)
    }

    /// Insert pasted text with line breaks removed
    pub fn paste(&mut self, text: &str) -> bool {
        let text = single_line(text);
        if text.is_empty() {
            return false;
        }
        self.textarea.insert_str(&text)
    }

    /// Cursor column in characters
    pub fn cursor_col(&self) -> usize {
        self.textarea.cursor().1
    }

    /// Keep the cursor inside a viewport `viewport_width` characters wide
    pub fn calculate_scroll_offset(&mut self, viewport_width: usize) {
        if viewport_width == 0 {
            self.scroll_offset = 0;
            return;
        }

        let cursor_col = self.cursor_col();
        let text_length = self.handle().chars().count();

        let mut new_scroll = self.scroll_offset;

        if cursor_col < new_scroll {
            new_scroll = cursor_col;
        } else if cursor_col >= new_scroll + viewport_width {
            new_scroll = cursor_col + 1 - viewport_width;
        }

        if text_length < new_scroll + viewport_width {
            let min_scroll = text_length.saturating_sub(viewport_width);
            let max_scroll_for_cursor = cursor_col.saturating_sub(viewport_width - 1);
            new_scroll = new_scroll.min(min_scroll.max(max_scroll_for_cursor));
        }

        self.scroll_offset = new_scroll;
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

fn single_line(text: &str) -> String {
    text.chars().filter(|c| *c != '\n' && *c != '\r').collect()
}

#[cfg(test)]
#[path = "input_state_tests.rs"]
mod input_state_tests;
