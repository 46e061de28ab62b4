use crate::state::AppState;
use axum::routing::post;
use axum::Router;

pub mod artifacts;
pub mod dto;
pub mod error;
pub mod handler;
pub mod lock;
pub mod service;
#[cfg(test)]
pub mod testing;

pub fn router() -> Router<AppState> {
    Router::new().route("/process-video", post(handler::process_video))
}
