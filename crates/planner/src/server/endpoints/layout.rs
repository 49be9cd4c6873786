use axum::{
    extract::{Query, State},
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

/// Query parameters for the weekly grid.
#[derive(Debug, Deserialize)]
pub struct GridQueryParams {
    /// Comma-separated course ids, e.g. `CSE142 B,EE233`
    #[serde(default)]
    pub courses: String,
}

#[derive(Debug, Deserialize)]
pub struct DistanceQueryParams {
    pub from: String,
    pub to: String,
}

/// GET /grid?courses=A,B
pub async fn get_grid(
    State(s): State<Arc<WrapperState>>,
    Query(params): Query<GridQueryParams>,
) -> Response {
    info!("GET /grid (courses={})", params.courses);

    let courses: Vec<String> = params.courses.split(',').map(str::to_string).collect();
    match schedule::weekly_grid(&s, &courses).await {
        Ok(grid) => (StatusCode::OK, Json(grid)).into_response(),
        Err(e) => {
            error!("Failed to build weekly grid: {}", e);
            ApiErrorType::from(e).into_response()
        }
    }
}

/// GET /buildings
pub async fn get_buildings(State(s): State<Arc<WrapperState>>) -> Response {
    info!("GET /buildings");

    match schedule::campus_buildings(&s).await {
        Ok(buildings) => (StatusCode::OK, Json(buildings)).into_response(),
        Err(e) => {
            error!("Failed to fetch campus buildings: {}", e);
            ApiErrorType::from(e).into_response()
        }
    }
}

/// GET /distance?from=X&to=Y
pub async fn get_distance(
    State(s): State<Arc<WrapperState>>,
    Query(params): Query<DistanceQueryParams>,
) -> Response {
    info!("GET /distance (from={}, to={})", params.from, params.to);

    match schedule::building_distance(&s, &params.from, &params.to).await {
        Ok(distance) => (StatusCode::OK, Json(distance)).into_response(),
        Err(e) => {
            error!("Failed to compute building distance: {}", e);
            ApiErrorType::from(e).into_response()
        }
    }
}
