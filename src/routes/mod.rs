use axum::routing::{get, post};
use axum::Router;

use crate::app_state::AppState;

pub mod events;
pub mod health;
pub mod metrics;

/// Trigger and health routes. `/metrics` and middleware are added by the
/// binary.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/events/storage", post(events::storage_event))
        .route("/events/notification", post(events::completion_notification))
        .with_state(state)
}
