use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, info};

use crate::schedule;
use crate::server::types::ApiErrorType;
use crate::types::WrapperState;

#[derive(Debug, Deserialize)]
pub struct ScheduleBody {
    pub courses: Vec<String>,
}

/// POST /schedule
///
/// Builds a new schedule and shows its first option. Exhaustion is reported
/// in the body's `status`, not as an error.
pub async fn post_schedule(
    State(s): State<Arc<WrapperState>>,
    Json(body): Json<ScheduleBody>,
) -> Response {
    info!("POST /schedule ({})", body.courses.join(","));

    match schedule::create_schedule(&s, &body.courses).await {
        Ok(outcome) => (StatusCode::OK, Json(outcome)).into_response(),
        Err(e) => {
            error!("Failed to build schedule: {}", e);
            ApiErrorType::from(e).into_response()
        }
    }
}

/// POST /schedule/next
pub async fn post_next(State(s): State<Arc<WrapperState>>) -> Response {
    info!("POST /schedule/next");

    match schedule::next_page(&s).await {
        Ok(outcome) => (StatusCode::OK, Json(outcome)).into_response(),
        Err(e) => {
            error!("Failed to advance schedule page: {}", e);
            ApiErrorType::from(e).into_response()
        }
    }
}

/// POST /schedule/prev
pub async fn post_prev(State(s): State<Arc<WrapperState>>) -> Response {
    info!("POST /schedule/prev");
    (StatusCode::OK, Json(schedule::previous_page(&s).await)).into_response()
}

/// GET /schedule/current
pub async fn get_current(State(s): State<Arc<WrapperState>>) -> Response {
    info!("GET /schedule/current");
    (StatusCode::OK, Json(schedule::current_page(&s).await)).into_response()
}
