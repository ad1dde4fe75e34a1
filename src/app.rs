use crate::handlers;
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/api/users/:user_id",
            get(handlers::get_user)
                .post(handlers::create_user)
                .delete(handlers::delete_user),
        )
        .route("/api/users/:user_id/dashboard", get(handlers::user_dashboard))
        .route(
            "/api/users/:user_id/trackers/:tracker",
            get(handlers::get_tracker)
                .put(handlers::put_tracker)
                .delete(handlers::reset_tracker),
        )
        .route(
            "/api/users/:user_id/trackers/:tracker/summary",
            get(handlers::tracker_summary),
        )
        .with_state(state)
}
