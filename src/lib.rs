//! cfrec: Codeforces problem recommendations in the terminal
//!
//! A single form: type a handle, submit it to the recommendation API, and
//! read back the recommended problems.

pub mod app;
pub mod config;
pub mod error;
pub mod input;
pub mod recommender;
