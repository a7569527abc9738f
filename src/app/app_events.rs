use ratatui::crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::app_state::App;

/// Lines moved by PageUp/PageDown
const PAGE_SCROLL: u16 = 10;

impl App {
    /// Handle a terminal event and update application state
    pub fn handle_event(&mut self, event: Event) {
        match event {
            // Check that it's a key press event to avoid duplicates
            Event::Key(key_event) if key_event.kind == KeyEventKind::Press => {
                self.handle_key_event(key_event);
            }
            Event::Paste(text) => {
                if self.input.paste(&text) {
                    self.show_required_hint = false;
                }
            }
            _ => {}
        }
    }

    /// Handle key press events
    pub fn handle_key_event(&mut self, key: KeyEvent) {
        if self.handle_global_keys(key) {
            return;
        }

        if self.input.handle_key(key) {
            self.show_required_hint = false;
        }
    }

    /// Handle keys that are not text editing
    /// Returns true if key was handled, false otherwise
    fn handle_global_keys(&mut self, key: KeyEvent) -> bool {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            // Esc / Ctrl+C: Exit application
            KeyCode::Esc => {
                self.should_quit = true;
                true
            }
            KeyCode::Char('c') if ctrl => {
                self.should_quit = true;
                true
            }
            // Enter: submit, even while a request is pending (the new one supersedes it)
            KeyCode::Enter => {
                self.submit();
                true
            }
            KeyCode::Down => {
                self.scroll_down(1);
                true
            }
            KeyCode::Up => {
                self.scroll_up(1);
                true
            }
            KeyCode::PageDown => {
                self.scroll_down(PAGE_SCROLL);
                true
            }
            KeyCode::PageUp => {
                self.scroll_up(PAGE_SCROLL);
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
#[path = "app_events_tests.rs"]
mod app_events_tests;
