//! Endpoints for tree lookups, search, course checks, and gathering.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info};

use crate::lookup;
use crate::server::types::ApiErrorType;
use crate::types::WrapperState;

#[derive(Debug, Deserialize)]
pub struct NameBody {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct KeywordBody {
    #[serde(default)]
    pub keyword: String,
}

#[derive(Debug, Deserialize)]
pub struct CourseBody {
    pub course: String,
}

#[derive(Debug, Deserialize)]
pub struct CoursesBody {
    pub courses: Vec<String>,
}

/// POST /tree
pub async fn post_tree(
    State(s): State<Arc<WrapperState>>,
    Json(body): Json<NameBody>,
) -> Response {
    info!("POST /tree ({})", body.name);

    match lookup::lookup_tree(&s, &body.name).await {
        Ok(reply) => (StatusCode::OK, Json(reply)).into_response(),
        Err(e) => {
            error!("Tree lookup for {} failed: {}", body.name, e);
            ApiErrorType::from(e).into_response()
        }
    }
}

/// POST /search
///
/// Search-bar lookup; rejected with 409 while another search runs.
pub async fn post_search(
    State(s): State<Arc<WrapperState>>,
    Json(body): Json<NameBody>,
) -> Response {
    info!("POST /search ({})", body.name);

    match lookup::search_course(&s, &body.name).await {
        Ok(reply) => (StatusCode::OK, Json(reply)).into_response(),
        Err(e) => {
            error!("Search for {} failed: {}", body.name, e);
            ApiErrorType::from(e).into_response()
        }
    }
}

/// POST /keyword_search
pub async fn post_keyword_search(
    State(s): State<Arc<WrapperState>>,
    Json(body): Json<KeywordBody>,
) -> Response {
    info!("POST /keyword_search ({})", body.keyword);

    match lookup::keyword_search(&s, &body.keyword).await {
        Ok(matches) => (StatusCode::OK, Json(matches)).into_response(),
        Err(e) => {
            error!("Keyword search failed: {}", e);
            ApiErrorType::from(e).into_response()
        }
    }
}

/// POST /check_course
pub async fn post_check_course(
    State(s): State<Arc<WrapperState>>,
    Json(body): Json<CourseBody>,
) -> Response {
    info!("POST /check_course ({})", body.course);

    match lookup::check_course(&s, &body.course).await {
        Ok(check) => (StatusCode::OK, Json(check)).into_response(),
        Err(e) => {
            error!("Course check for {} failed: {}", body.course, e);
            ApiErrorType::from(e).into_response()
        }
    }
}

/// POST /check_courses
pub async fn post_check_courses(
    State(s): State<Arc<WrapperState>>,
    Json(body): Json<CoursesBody>,
) -> Response {
    info!("POST /check_courses ({} courses)", body.courses.len());

    match lookup::check_courses(&s, &body.courses).await {
        Ok(checks) => (StatusCode::OK, Json(checks)).into_response(),
        Err(e) => {
            error!("Batch course check failed: {}", e);
            ApiErrorType::from(e).into_response()
        }
    }
}

/// POST /gather
pub async fn post_gather(State(s): State<Arc<WrapperState>>) -> Response {
    info!("POST /gather");

    match lookup::gather(&s).await {
        Ok(()) => (StatusCode::OK, Json(json!({ "gathered": true }))).into_response(),
        Err(e) => {
            error!("Gather failed: {}", e);
            ApiErrorType::from(e).into_response()
        }
    }
}
