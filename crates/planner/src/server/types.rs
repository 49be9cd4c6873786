use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::PlannerError;
use crate::upstream::UpstreamError;

/// JSON body of every error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorType {
    #[serde(skip)]
    pub status: u16,
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl From<(StatusCode, &str, Option<String>)> for ApiErrorType {
    fn from((status, message, details): (StatusCode, &str, Option<String>)) -> Self {
        Self {
            status: status.as_u16(),
            error: status
                .canonical_reason()
                .unwrap_or("Unknown Error")
                .to_string(),
            message: message.to_string(),
            details,
        }
    }
}

impl From<PlannerError> for ApiErrorType {
    fn from(error: PlannerError) -> Self {
        let (status, message) = match &error {
            PlannerError::Layout(_) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "Course data could not be laid out",
            ),
            PlannerError::OperationInProgress { .. } => (
                StatusCode::CONFLICT,
                "A request for this control is already running",
            ),
            PlannerError::Superseded => (
                StatusCode::CONFLICT,
                "The schedule was rebuilt while this page was loading",
            ),
            PlannerError::InvalidRequest { .. } => (StatusCode::BAD_REQUEST, "Invalid request"),
            PlannerError::Upstream(UpstreamError::CircuitBreakerOpen) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "Planner server temporarily unavailable due to repeated failures",
            ),
            PlannerError::Upstream(UpstreamError::Timeout { .. }) => (
                StatusCode::GATEWAY_TIMEOUT,
                "Planner server timed out",
            ),
            PlannerError::Upstream(_) => (
                StatusCode::BAD_GATEWAY,
                "Planner server request failed",
            ),
        };

        ApiErrorType::from((status, message, Some(error.to_string())))
    }
}

impl IntoResponse for ApiErrorType {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::LayoutError;
    use crate::types::Control;

    fn status_of(error: PlannerError) -> u16 {
        ApiErrorType::from(error).status
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            status_of(PlannerError::Layout(LayoutError::UnknownCourse {
                course: "CSE999".to_string()
            })),
            422
        );
        assert_eq!(
            status_of(PlannerError::OperationInProgress {
                control: Control::Search
            }),
            409
        );
        assert_eq!(status_of(PlannerError::Superseded), 409);
        assert_eq!(
            status_of(PlannerError::Upstream(UpstreamError::CircuitBreakerOpen)),
            503
        );
        assert_eq!(
            status_of(PlannerError::Upstream(UpstreamError::Timeout {
                message: "slow".to_string()
            })),
            504
        );
        assert_eq!(
            status_of(PlannerError::Upstream(UpstreamError::Decode {
                message: "bad".to_string()
            })),
            502
        );
    }

    #[test]
    fn test_body_shape() {
        let body = serde_json::to_value(ApiErrorType::from(PlannerError::InvalidRequest {
            message: "keyword must not be empty".to_string(),
        }))
        .unwrap();

        assert_eq!(body["error"], "Bad Request");
        assert_eq!(body["message"], "Invalid request");
        assert_eq!(body["details"], "Invalid request: keyword must not be empty");
        assert!(body.get("status").is_none());
    }
}
