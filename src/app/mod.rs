mod app_events;
mod app_render;
mod app_state;

// Re-export public types
pub use app_render::{BUTTON_CAPTION, BUTTON_LOADING_CAPTION, REQUIRED_HINT, TITLE};
pub use app_state::App;
