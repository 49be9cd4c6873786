use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;

use crate::server::endpoints::{layout, lookup, schedule, status};
use crate::types::WrapperState;

mod endpoints;
mod types;

pub use types::ApiErrorType;

/// Creates a router that can be used by `axum`.
///
/// # Parameters
/// - `app_state`: The app server state.
///
/// # Returns
/// The router.
pub fn create_router(app_state: Arc<WrapperState>) -> Router {
    let lookup_router = Router::new()
        .route("/tree", post(lookup::post_tree))
        .route("/search", post(lookup::post_search))
        .route("/keyword_search", post(lookup::post_keyword_search))
        .route("/check_course", post(lookup::post_check_course))
        .route("/check_courses", post(lookup::post_check_courses))
        .route("/gather", post(lookup::post_gather));

    let layout_router = Router::new()
        .route("/grid", get(layout::get_grid))
        .route("/buildings", get(layout::get_buildings))
        .route("/distance", get(layout::get_distance));

    let schedule_router = Router::new()
        .route("/schedule", post(schedule::post_schedule))
        .route("/schedule/next", post(schedule::post_next))
        .route("/schedule/prev", post(schedule::post_prev))
        .route("/schedule/current", get(schedule::get_current));

    Router::new()
        .route("/health", get(status::get_health))
        .merge(lookup_router)
        .merge(layout_router)
        .merge(schedule_router)
        .with_state(app_state)
}
