mod client;
mod recommender_state;
mod worker;

// Re-export public types
pub use client::{DEFAULT_ENDPOINT, RecommendClient};
pub use recommender_state::{
    Phase, RecommendRequest, RecommendResponse, RecommenderState, SubmitOutcome,
};
pub use worker::spawn_worker;
