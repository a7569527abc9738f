use crate::config::Config;
use crate::input::InputState;
use crate::recommender::{RecommenderState, SubmitOutcome};

/// Application state
pub struct App {
    pub input: InputState,
    pub recommender: RecommenderState,
    /// Set when an empty handle was submitted; cleared on the next edit
    pub show_required_hint: bool,
    /// First visible recommendation
    pub results_scroll: u16,
    /// Rows available to the recommendation list (set during render)
    pub results_viewport_height: u16,
    /// Endpoint shown in the footer
    pub endpoint: String,
    /// Non-fatal startup problem (e.g. unreadable config) shown in the footer
    pub status_message: Option<String>,
    pub should_quit: bool,
}

impl App {
    /// Create a new App instance
    ///
    /// The recommender starts without channels; call
    /// [`RecommenderState::set_channels`] once the worker is running.
    pub fn new(config: &Config) -> Self {
        Self {
            input: InputState::new(),
            recommender: RecommenderState::new(),
            show_required_hint: false,
            results_scroll: 0,
            results_viewport_height: 0,
            endpoint: config.api.endpoint.clone(),
            status_message: None,
            should_quit: false,
        }
    }

    /// Check if the application should quit
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Get the current handle text
    pub fn handle(&self) -> &str {
        self.input.handle()
    }

    /// Submit the current handle
    ///
    /// An empty handle shows the "required" hint instead of issuing a request.
    pub fn submit(&mut self) -> SubmitOutcome {
        let handle = self.input.handle().to_string();
        let outcome = self.recommender.submit(&handle);
        match outcome {
            SubmitOutcome::EmptyHandle => self.show_required_hint = true,
            SubmitOutcome::Sent(_) | SubmitOutcome::WorkerUnavailable => {
                self.show_required_hint = false;
                self.results_scroll = 0;
            }
        }
        outcome
    }

    /// Apply any worker responses that have arrived
    ///
    /// Returns true if the visible state changed.
    pub fn poll_responses(&mut self) -> bool {
        let changed = self.recommender.poll_responses();
        if changed {
            self.results_scroll = 0;
        }
        changed
    }

    /// Get the maximum scroll position based on content and viewport
    pub fn max_scroll(&self) -> u16 {
        let total = self.recommender.recommendations.len().min(u16::MAX as usize) as u16;
        total.saturating_sub(self.results_viewport_height)
    }

    pub fn scroll_down(&mut self, lines: u16) {
        self.results_scroll = self.results_scroll.saturating_add(lines).min(self.max_scroll());
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.results_scroll = self.results_scroll.saturating_sub(lines);
    }
}

#[cfg(test)]
#[path = "app_state_tests.rs"]
mod app_state_tests;
